use crate::{
    config::*,
    core::{pairs::ReadPair, script::PairLayout},
    executor::job::Job,
};

/// Run seqtk trimfq on both mates
///
/// # Arguments
/// * `config` - The configuration for the pipeline.
/// * `pair` - The raw read files.
/// * `layout` - Output paths of the pair.
///
/// # Returns
/// One job per mate, each redirected into its filtered FASTQ.
///
/// # Example
/// ```rust, ignore
/// let jobs = seqtk(&config, &pair, &layout)?;
/// ```
pub fn seqtk(
    config: &Config,
    pair: &ReadPair,
    layout: &PairLayout,
) -> Result<Vec<Job>, ConfigError> {
    let exec = config.seqtk()?;

    let jobs = vec![
        Job::new(&exec)
            .arg("trimfq")
            .path(&pair.file1)
            .stdout(&layout.filtered_1),
        Job::new(&exec)
            .arg("trimfq")
            .path(&pair.file2)
            .stdout(&layout.filtered_2),
    ];

    Ok(jobs)
}
