use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{
    config::{Config, ConfigError},
    consts::*,
    executor::job::shell_quote,
};

/// Array-job submission script for all per-pair scripts
///
/// Task `i` runs `<scripts_dir>/<i>.sh`, for `i` in `0..num_tasks`.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchScript {
    /// Scheduler flavour of the directives
    pub manager: ParallelManager,
    pub job_name: String,
    pub num_tasks: usize,
    pub scripts_dir: PathBuf,
    pub threads: u32,
    pub memory_gb: u32,
    pub log_dir: PathBuf,
    /// Max concurrently running tasks, if any
    pub slot_limit: Option<u32>,
    pub queue: String,
}

impl LaunchScript {
    /// Create a new launch script from the config resources
    ///
    /// # Example
    ///
    /// ```rust, ignore
    /// let launch = LaunchScript::from_config(ParallelManager::Pbs, &config, 5, scripts_dir, log_dir)?;
    /// launch.write(&scripts_dir.join(LAUNCH_SCRIPT))?;
    /// ```
    pub fn from_config(
        manager: ParallelManager,
        config: &Config,
        num_tasks: usize,
        scripts_dir: &Path,
        log_dir: &Path,
    ) -> Result<Self, ConfigError> {
        check_directive_path(&log_dir.join(LOG_FILE))?;

        Ok(Self {
            manager,
            job_name: config.job_name(),
            num_tasks,
            scripts_dir: scripts_dir.to_path_buf(),
            threads: config.threads()?,
            memory_gb: config.memory_gb()?,
            log_dir: log_dir.to_path_buf(),
            slot_limit: config.slot_limit()?,
            queue: config.queue(),
        })
    }

    /// Task range `0-(n-1)`, with a `%limit` suffix when the slot limit
    /// is below the task count
    ///
    /// # Example
    ///
    /// ```rust, ignore
    /// assert_eq!(launch.task_range(), "0-4%2");
    /// ```
    pub fn task_range(&self) -> String {
        let last = self.num_tasks.saturating_sub(1);

        match self.slot_limit {
            Some(limit) if (limit as usize) < self.num_tasks => format!("0-{}%{}", last, limit),
            _ => format!("0-{}", last),
        }
    }

    /// Render the script text, newline terminated
    ///
    /// The log path goes into a scheduler directive, which is not parsed
    /// by the shell and cannot be quoted; `from_config` rejects log paths
    /// with whitespace. The scripts directory is quoted in the final line.
    pub fn render(&self) -> String {
        let log = self.log_dir.join(LOG_FILE);
        let mut lines = vec![SHEBANG.to_string()];

        match self.manager {
            ParallelManager::Pbs => {
                lines.push(format!("#PBS -N {}", self.job_name));
                lines.push(format!("#PBS -t {}", self.task_range()));
                lines.push(format!("#PBS -l nodes=1:ppn={}", self.threads));
                lines.push(format!("#PBS -l pvmem={}gb", self.memory_gb));
                lines.push(format!("#PBS -o {}", log.display()));
                lines.push("#PBS -joe".to_string());
                lines.push(format!("#PBS -q {}", self.queue));
            }
            ParallelManager::Slurm => {
                lines.push(format!("#SBATCH --job-name={}", self.job_name));
                lines.push(format!("#SBATCH --array={}", self.task_range()));
                lines.push("#SBATCH --nodes=1".to_string());
                lines.push(format!("#SBATCH --cpus-per-task={}", self.threads));
                lines.push(format!("#SBATCH --mem={}G", self.memory_gb));
                lines.push(format!("#SBATCH --output={}", log.display()));
                lines.push(format!("#SBATCH --partition={}", self.queue));
            }
        }

        lines.push(format!(
            "{}/${{{}}}.{}",
            shell_quote(&self.scripts_dir.to_string_lossy()),
            self.manager.task_variable(),
            SCRIPT_EXT
        ));

        let mut script = lines.join("\n");
        script.push('\n');

        script
    }

    /// Write the launch script to `path`
    pub fn write(&self, path: &Path) -> Result<(), std::io::Error> {
        std::fs::write(path, self.render())?;

        log::debug!("DEBUG: wrote {}", path.display());

        Ok(())
    }
}

/// Scheduler directives are split on whitespace by qsub/sbatch
fn check_directive_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();

    if text.chars().any(char::is_whitespace) {
        return Err(ConfigError::UnsupportedPath(text.into_owned()));
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParallelManager {
    /// PBS/Torque job arrays (`qsub -t`)
    Pbs,

    /// Slurm job arrays (`sbatch --array`)
    Slurm,
}

impl ParallelManager {
    /// Environment variable holding the array index at runtime
    pub fn task_variable(&self) -> &'static str {
        match self {
            ParallelManager::Pbs => "PBS_ARRAYID",
            ParallelManager::Slurm => "SLURM_ARRAY_TASK_ID",
        }
    }

    /// Command used to submit the launch script
    pub fn submit_cmd(&self) -> &'static str {
        match self {
            ParallelManager::Pbs => "qsub",
            ParallelManager::Slurm => "sbatch",
        }
    }
}

impl FromStr for ParallelManager {
    type Err = String;

    /// Convert a string to a ParallelManager
    ///
    /// # Example
    ///
    /// ```rust, ignore
    /// let manager = ParallelManager::from_str("slurm").unwrap();
    /// assert_eq!(manager, ParallelManager::Slurm);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pbs" | "torque" => Ok(ParallelManager::Pbs),
            "slurm" => Ok(ParallelManager::Slurm),
            _ => Err(format!("ERROR: Unknown parallel manager: {}", s)),
        }
    }
}

impl std::fmt::Display for ParallelManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParallelManager::Pbs => write!(f, "pbs"),
            ParallelManager::Slurm => write!(f, "slurm"),
        }
    }
}
