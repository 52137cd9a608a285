use crate::{
    config::*,
    core::script::PairLayout,
    executor::job::{mkdir, Job},
};

/// Run quast on the SPAdes contigs
///
/// # Example
/// ```rust, ignore
/// let jobs = quast(&config, &layout)?;
/// ```
pub fn quast(config: &Config, layout: &PairLayout) -> Result<Vec<Job>, ConfigError> {
    let threads = config.threads()?.to_string();

    let jobs = vec![
        mkdir(&layout.quast_dir),
        Job::new(&config.quast()?)
            .path(&layout.contigs)
            .arg("-o")
            .path(&layout.quast_dir)
            .args(&["-t", &threads]),
    ];

    Ok(jobs)
}
