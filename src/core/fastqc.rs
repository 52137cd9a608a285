use crate::{
    config::*,
    core::script::PairLayout,
    executor::job::{mkdir, Job},
};

/// Run fastqc on the filtered reads
///
/// # Example
/// ```rust, ignore
/// let jobs = fastqc(&config, &layout);
/// ```
pub fn fastqc(config: &Config, layout: &PairLayout) -> Vec<Job> {
    vec![
        mkdir(&layout.fastqc_dir),
        Job::new(&config.fastqc())
            .path(&layout.filtered_1)
            .path(&layout.filtered_2)
            .arg("-o")
            .path(&layout.fastqc_dir),
    ]
}
