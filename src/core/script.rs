use std::path::{Path, PathBuf};

use crate::{
    config::*,
    consts::*,
    core::{fastqc::fastqc, pairs::ReadPair, quast::quast, seqtk::seqtk, spades::spades},
    executor::job::{mkdir, Job},
};

/// Every path a pair script reads or writes, all rooted at `sub_output_dir`
#[derive(Debug, Clone, PartialEq)]
pub struct PairLayout {
    pub sub_output_dir: PathBuf,
    pub filtered_1: PathBuf,
    pub filtered_2: PathBuf,
    pub fastqc_dir: PathBuf,
    pub spades_dir: PathBuf,
    pub contigs: PathBuf,
    pub corrected: PathBuf,
    pub quast_dir: PathBuf,
}

impl PairLayout {
    pub fn new(sub_output_dir: &Path) -> Self {
        let spades_dir = sub_output_dir.join(SPADES_OUT);

        Self {
            sub_output_dir: sub_output_dir.to_path_buf(),
            filtered_1: sub_output_dir.join(FILTERED_1),
            filtered_2: sub_output_dir.join(FILTERED_2),
            fastqc_dir: sub_output_dir.join(FASTQC_OUT),
            contigs: spades_dir.join(CONTIGS),
            corrected: spades_dir.join(CORRECTED),
            quast_dir: sub_output_dir.join(QUAST_OUT),
            spades_dir,
        }
    }
}

/// A per-pair shell script: a fixed sequence of stages, each a list of jobs
#[derive(Debug, Clone)]
pub struct PipelineScript {
    pub sub_output_dir: PathBuf,
    pub fail_fast: bool,
    pub stages: Vec<(PipelineStage, Vec<Job>)>,
}

impl PipelineScript {
    /// Build the filter -> raw QC -> assembly -> assembly QC -> cleanup
    /// script of one read pair.
    ///
    /// # Arguments
    /// * `config` - The configuration for the pipeline.
    /// * `pair` - The raw read files.
    /// * `sub_output_dir` - Directory owned exclusively by this pair.
    ///
    /// # Example
    /// ```rust, ignore
    /// let script = PipelineScript::new(&config, &pair, Path::new("out/0_reads1"))?;
    /// script.write(Path::new("scripts/0.sh"))?;
    /// ```
    pub fn new(
        config: &Config,
        pair: &ReadPair,
        sub_output_dir: &Path,
    ) -> Result<Self, ConfigError> {
        let layout = PairLayout::new(sub_output_dir);

        let mut stages = Vec::with_capacity(PipelineStage::ALL.len());
        for stage in PipelineStage::ALL {
            let jobs = match stage {
                PipelineStage::Filter => seqtk(config, pair, &layout)?,
                PipelineStage::RawQc => fastqc(config, &layout),
                PipelineStage::Assembly => spades(config, &layout)?,
                PipelineStage::AssemblyQc => quast(config, &layout)?,
                PipelineStage::Cleanup => cleanup(&layout),
            };
            stages.push((stage, jobs));
        }

        Ok(Self {
            sub_output_dir: layout.sub_output_dir,
            fail_fast: config.fail_fast()?,
            stages,
        })
    }

    /// Render the script text, newline terminated
    pub fn render(&self) -> String {
        let mut lines = vec![SHEBANG.to_string(), String::new()];

        if self.fail_fast {
            lines.push("set -e".to_string());
        }
        lines.push(mkdir(&self.sub_output_dir).to_string());

        for (stage, jobs) in &self.stages {
            lines.push(String::new());
            lines.push(stage.header().to_string());
            lines.extend(jobs.iter().map(|job| job.to_string()));
        }

        let mut script = lines.join("\n");
        script.push('\n');

        script
    }

    /// Write the script to `path` and mark it executable
    pub fn write(&self, path: &Path) -> Result<(), std::io::Error> {
        std::fs::write(path, self.render())?;
        set_executable(path)?;

        log::debug!("DEBUG: wrote {}", path.display());

        Ok(())
    }
}

/// Remove SPAdes corrected reads and the filtered FASTQs
fn cleanup(layout: &PairLayout) -> Vec<Job> {
    vec![
        Job::new("rm").arg("-rf").path(&layout.corrected),
        Job::new("rm").arg("-f").path(&layout.filtered_1),
        Job::new("rm").arg("-f").path(&layout.filtered_2),
    ]
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), std::io::Error> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), std::io::Error> {
    Ok(())
}
