pub mod fastqc;
pub mod pairs;
pub mod quast;
pub mod script;
pub mod seqtk;
pub mod spades;

use std::path::{Path, PathBuf};

use crate::{
    config::*,
    consts::*,
    core::{pairs::*, script::PipelineScript},
    executor::manager::{LaunchScript, ParallelManager},
};

/// Zero-pad width for `num_pairs` indices: digits of `num_pairs - 1`,
/// never less than 1.
///
/// # Example
///
/// ```rust, ignore
/// assert_eq!(pad_width(3), 1);
/// assert_eq!(pad_width(12), 2);
/// ```
pub fn pad_width(num_pairs: usize) -> usize {
    num_pairs.saturating_sub(1).to_string().len()
}

/// Sortable pair label, e.g. `07_sampleA`
pub fn identifier(index: usize, width: usize, sample: &str) -> String {
    format!("{:0width$}_{}", index, sample, width = width)
}

/// Discover the read pairs of `input_dir` and label them
///
/// # Returns
/// (identifier, pair) tuples in index order.
pub fn label_pairs(
    input_dir: &Path,
    config: &Config,
) -> Result<Vec<(String, ReadPair)>, Box<dyn std::error::Error>> {
    let (marker1, marker2) = config.markers();
    let pairs = find_pairs(input_dir, &marker1, &marker2)?;
    let width = pad_width(pairs.len());

    let labeled = pairs
        .into_iter()
        .enumerate()
        .map(|(index, pair)| (identifier(index, width, &pair.sample(&marker1)), pair))
        .collect();

    Ok(labeled)
}

/// Write one pipeline script per read pair plus the array-job launcher
///
/// Pair `i` gets `<scripts_dir>/<i>.sh` working in
/// `<output_dir>/<identifier>`; the launcher is `<scripts_dir>/launch.sh`
/// and logs to `<output_dir>/log`.
///
/// # Arguments
/// * `input_dir` - Directory holding the raw reads.
/// * `output_dir` - Root of every per-pair output directory.
/// * `scripts_dir` - Where scripts are written.
/// * `config` - The configuration for the pipeline.
/// * `manager` - Scheduler flavour of the launcher.
///
/// # Returns
/// The number of pairs found. Nothing is written when it is 0.
///
/// # Example
/// ```rust, ignore
/// let n = assemble_directory(&input, &output, &scripts, &config, ParallelManager::Pbs)?;
/// ```
pub fn assemble_directory(
    input_dir: &Path,
    output_dir: &Path,
    scripts_dir: &Path,
    config: &Config,
    manager: ParallelManager,
) -> Result<usize, Box<dyn std::error::Error>> {
    let pairs = label_pairs(input_dir, config)?;
    let num_pairs = pairs.len();

    if num_pairs == 0 {
        log::warn!(
            "WARN: no read pairs found in {}, nothing to write",
            input_dir.display()
        );
        return Ok(0);
    }

    // all config errors must surface before the first write
    let launch = LaunchScript::from_config(manager, config, num_pairs, scripts_dir, output_dir)?;
    let scripts = pairs
        .iter()
        .map(|(id, pair)| PipelineScript::new(config, pair, &output_dir.join(id)))
        .collect::<Result<Vec<_>, _>>()?;

    log::info!(
        "INFO: found {} read pairs in {}",
        num_pairs,
        input_dir.display()
    );

    std::fs::create_dir_all(scripts_dir)?;
    std::fs::create_dir_all(output_dir)?;

    for (index, script) in scripts.iter().enumerate() {
        script.write(&script_path(scripts_dir, index))?;
    }

    let launch_path = scripts_dir.join(LAUNCH_SCRIPT);
    launch.write(&launch_path)?;

    log::info!(
        "SUCCESS: wrote {} pipeline scripts -> submit with '{} {}'",
        num_pairs,
        manager.submit_cmd(),
        launch_path.display()
    );

    Ok(num_pairs)
}

/// `<scripts_dir>/<index>.sh`
pub fn script_path(scripts_dir: &Path, index: usize) -> PathBuf {
    scripts_dir.join(format!("{}.{}", index, SCRIPT_EXT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    const CONFIG: &str = "SEQTK_EXEC=seqtk\nSPADES_EXEC=spades.py\nQUAST_EXEC=quast.py\nNUM_THREADS=4\nMEMORY_GB=8\n";

    #[test]
    fn test_pad_width() {
        assert_eq!(pad_width(0), 1);
        assert_eq!(pad_width(1), 1);
        assert_eq!(pad_width(3), 1);
        assert_eq!(pad_width(10), 1);
        assert_eq!(pad_width(11), 2);
        assert_eq!(pad_width(12), 2);
        assert_eq!(pad_width(100), 2);
        assert_eq!(pad_width(101), 3);
    }

    #[test]
    fn test_identifier() {
        assert_eq!(identifier(0, 1, "x"), "0_x");
        assert_eq!(identifier(2, 1, "x"), "2_x");
        assert_eq!(identifier(0, 2, "x"), "00_x");
        assert_eq!(identifier(11, 2, "x"), "11_x");
    }

    #[test]
    fn test_assemble_directory() {
        let input = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        for i in 1..4 {
            File::create(input.path().join(format!("reads{}_R1_001.fastq", i))).unwrap();
            File::create(input.path().join(format!("reads{}_R2_001.fastq", i))).unwrap();
        }

        let output = work.path().join("out");
        let scripts = work.path().join("scripts");
        let config = Config::parse(&format!("{}SLOT_LIMIT=2\n", CONFIG)).unwrap();

        let n = assemble_directory(input.path(), &output, &scripts, &config, ParallelManager::Pbs)
            .unwrap();
        assert_eq!(n, 3);

        for (index, id) in ["0_reads1", "1_reads2", "2_reads3"].iter().enumerate() {
            let contents = std::fs::read_to_string(script_path(&scripts, index)).unwrap();
            let sub = output.join(id);

            assert!(contents.contains(&format!("mkdir -p {}\n", sub.display())));
            assert!(contents.contains(&format!("reads{}_R1_001.fastq", index + 1)));
        }

        let launch = std::fs::read_to_string(scripts.join(LAUNCH_SCRIPT)).unwrap();
        assert!(launch.contains("#PBS -t 0-2%2\n"));
        assert!(!scripts.join("3.sh").exists());
    }

    #[test]
    fn test_assemble_empty_directory() {
        let input = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let scripts = work.path().join("scripts");
        let config = Config::parse(CONFIG).unwrap();

        let n = assemble_directory(
            input.path(),
            &work.path().join("out"),
            &scripts,
            &config,
            ParallelManager::Pbs,
        )
        .unwrap();

        assert_eq!(n, 0);
        assert!(!scripts.exists());
    }

    #[test]
    fn test_missing_memory_writes_nothing() {
        let input = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        File::create(input.path().join("a_R1_.fq")).unwrap();
        File::create(input.path().join("a_R2_.fq")).unwrap();

        let scripts = work.path().join("scripts");
        let config = Config::parse(
            "SEQTK_EXEC=seqtk\nSPADES_EXEC=spades.py\nQUAST_EXEC=quast.py\nNUM_THREADS=4\n",
        )
        .unwrap();

        let result = assemble_directory(
            input.path(),
            &work.path().join("out"),
            &scripts,
            &config,
            ParallelManager::Slurm,
        );

        assert!(result.is_err());
        assert!(!scripts.exists());
    }

    #[test]
    fn test_output_dir_with_whitespace_writes_nothing() {
        let input = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        File::create(input.path().join("a_R1_.fq")).unwrap();
        File::create(input.path().join("a_R2_.fq")).unwrap();

        let scripts = work.path().join("scripts");
        let result = assemble_directory(
            input.path(),
            &work.path().join("my out"),
            &scripts,
            &Config::parse(CONFIG).unwrap(),
            ParallelManager::Pbs,
        );

        assert!(result.is_err());
        assert!(!scripts.exists());
    }

    #[test]
    fn test_label_pairs_width() {
        let input = tempfile::tempdir().unwrap();
        for i in 0..12 {
            File::create(input.path().join(format!("s{:02}_R1_.fq", i))).unwrap();
            File::create(input.path().join(format!("s{:02}_R2_.fq", i))).unwrap();
        }

        let labeled = label_pairs(input.path(), &Config::parse(CONFIG).unwrap()).unwrap();

        assert_eq!(labeled.len(), 12);
        assert_eq!(labeled[0].0, "00_s00");
        assert_eq!(labeled[11].0, "11_s11");
    }
}
