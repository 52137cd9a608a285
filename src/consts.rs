// config keys
pub const SPADES_EXEC: &str = "SPADES_EXEC";
pub const SEQTK_EXEC: &str = "SEQTK_EXEC";
pub const QUAST_EXEC: &str = "QUAST_EXEC";
pub const FASTQC_EXEC: &str = "FASTQC_EXEC";
pub const R1_MARKER: &str = "R1_MARKER";
pub const R2_MARKER: &str = "R2_MARKER";
pub const NUM_THREADS: &str = "NUM_THREADS";
pub const MEMORY_GB: &str = "MEMORY_GB";
pub const SPADES_FLAGS: &str = "SPADES_FLAGS";
pub const SLOT_LIMIT: &str = "SLOT_LIMIT";
pub const QUEUE: &str = "QUEUE";
pub const JOB_NAME: &str = "JOB_NAME";
pub const FAIL_FAST: &str = "FAIL_FAST";

// defaults
pub const DEFAULT_CONFIG: &str = "pipeline.cfg";
pub const DEFAULT_R1_MARKER: &str = "_R1_";
pub const DEFAULT_R2_MARKER: &str = "_R2_";
pub const DEFAULT_FASTQC: &str = "fastqc";
pub const DEFAULT_QUEUE: &str = "memroute";
pub const DEFAULT_JOB_NAME: &str = "assembly";

// filenames
pub const FILTERED_1: &str = "filtered_1.fastq";
pub const FILTERED_2: &str = "filtered_2.fastq";
pub const FASTQC_OUT: &str = "fastqc_out";
pub const SPADES_OUT: &str = "spades_out";
pub const QUAST_OUT: &str = "quast_out";
pub const CONTIGS: &str = "contigs.fasta";
pub const CORRECTED: &str = "corrected";
pub const LAUNCH_SCRIPT: &str = "launch.sh";
pub const LOG_FILE: &str = "log";
pub const SHEBANG: &str = "#!/bin/bash";
pub const SCRIPT_EXT: &str = "sh";

// collections
pub const REQUIRED_KEYS: &[&str] = &[SPADES_EXEC, SEQTK_EXEC, QUAST_EXEC];
pub const NUMERIC_KEYS: &[&str] = &[NUM_THREADS, MEMORY_GB, SLOT_LIMIT];
pub const TOML_EXT: &str = "toml";
