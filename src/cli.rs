use clap::{Parser, Subcommand};
use log::Level;
use std::path::PathBuf;

use crate::consts::DEFAULT_CONFIG;
use crate::executor::manager::ParallelManager;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubArgs,

    #[arg(
        short = 'm',
        long = "manager",
        help = "Array-job scheduler of the launch script [pbs, slurm]",
        value_name = "MANAGER",
        required = false,
        global = true,
        default_value = "pbs"
    )]
    pub manager: ParallelManager,

    #[arg(short = 'v', long = "verbose", help = "Increase verbosity", global = true)]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long = "quiet",
        help = "Decrease verbosity",
        global = true,
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::Debug
        } else if self.quiet {
            Level::Warn
        } else {
            Level::Info
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum SubArgs {
    #[command(name = "assemble")]
    Assemble {
        #[command(flatten)]
        args: AssembleArgs,
    },
    #[command(name = "pairs")]
    Pairs {
        #[command(flatten)]
        args: PairsArgs,
    },
}

/// Write one assembly script per read pair and an array-job launcher
///
/// # Example
///
/// ```bash,no_run
/// pipeline-lite assemble -i reads/ -o assemblies/ -s scripts/ -c pipeline.cfg
/// qsub scripts/launch.sh
/// ```
///
/// # Arguments
///
/// * `input_dir` - Directory with paired FASTQ files
/// * `output_dir` - Root of the per-pair output directories
/// * `scripts_dir` - Where the scripts are written
/// * `config` - Path to the configuration file
#[derive(Debug, Parser, Clone)]
pub struct AssembleArgs {
    #[arg(
        short = 'i',
        long = "input-dir",
        help = "Input directory",
        value_name = "DIR",
        required = true
    )]
    pub input_dir: PathBuf,

    #[arg(
        short = 'o',
        long = "output-dir",
        help = "Output directory",
        value_name = "DIR",
        required = true
    )]
    pub output_dir: PathBuf,

    #[arg(
        short = 's',
        long = "scripts-dir",
        help = "Scripts directory",
        value_name = "DIR",
        required = true
    )]
    pub scripts_dir: PathBuf,

    #[arg(
        short = 'c',
        long = "config",
        help = "Pipeline configuration",
        value_name = "CONFIG",
        default_value = DEFAULT_CONFIG
    )]
    pub config: PathBuf,
}

/// List the read pairs and identifiers found in a directory
///
/// # Example
///
/// ```bash,no_run
/// pipeline-lite pairs -i reads/ -c pipeline.cfg
/// ```
#[derive(Debug, Parser, Clone)]
pub struct PairsArgs {
    #[arg(
        short = 'i',
        long = "input-dir",
        help = "Input directory",
        value_name = "DIR",
        required = true
    )]
    pub input_dir: PathBuf,

    #[arg(
        short = 'c',
        long = "config",
        help = "Pipeline configuration",
        value_name = "CONFIG",
        default_value = DEFAULT_CONFIG
    )]
    pub config: PathBuf,
}
