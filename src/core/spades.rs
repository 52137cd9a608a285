use crate::{
    config::*,
    core::script::PairLayout,
    executor::job::{mkdir, Job},
};

/// Run SPAdes on the filtered reads as paired-end library 1
///
/// # Arguments
/// * `config` - The configuration for the pipeline.
/// * `layout` - Output paths of the pair.
///
/// # Returns
/// The output directory job followed by the assembly job. `SPADES_FLAGS`
/// is appended verbatim.
///
/// # Example
/// ```rust, ignore
/// let jobs = spades(&config, &layout)?;
/// ```
pub fn spades(config: &Config, layout: &PairLayout) -> Result<Vec<Job>, ConfigError> {
    let threads = config.threads()?.to_string();

    let jobs = vec![
        mkdir(&layout.spades_dir),
        Job::new(&config.spades()?)
            .arg("-o")
            .path(&layout.spades_dir)
            .arg("--pe1-1")
            .path(&layout.filtered_1)
            .arg("--pe1-2")
            .path(&layout.filtered_2)
            .args(&["-t", &threads])
            .raw(&config.spades_flags()),
    ];

    Ok(jobs)
}
