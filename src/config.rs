use serde::Deserialize;
use thiserror::Error;

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::consts::*;

/// A struct representing a pipeline configuration file.
///
/// # Fields
///
/// * `values` - A HashMap containing every key-value pair found in the file.
///
/// # Example
///
/// ``` text
/// # tools
/// SEQTK_EXEC=seqtk
/// SPADES_EXEC=$HOME/tools/SPAdes-3.0.0-Linux/bin/spades.py
/// QUAST_EXEC=$HOME/tools/quast-2.3/metaquast.py
///
/// NUM_THREADS=4
/// MEMORY_GB=8
/// ```
///
/// ``` rust, ignore
/// let config = Config::read(PathBuf::from("pipeline.cfg")).unwrap();
/// assert_eq!(config.get(SEQTK_EXEC), Some("seqtk".into()));
/// ```
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Config {
    values: HashMap<String, ParamValue>,
}

impl Config {
    /// Read a configuration file and return a validated Config struct.
    ///
    /// Files ending in `.toml` are read as a flat TOML table, everything
    /// else as `key=value` lines.
    ///
    /// # Arguments
    ///
    /// * `config` - A PathBuf containing the path to the configuration file.
    ///
    /// # Returns
    ///
    /// A Result containing a Config struct or a ConfigError.
    ///
    /// # Example
    ///
    /// ``` rust, ignore
    /// let config = Config::read(PathBuf::from("pipeline.cfg"));
    /// ```
    pub fn read(config: PathBuf) -> Result<Self, ConfigError> {
        let config = Self::read_unchecked(&config)?;
        config.validate()?;

        Ok(config)
    }

    /// Read only what pair discovery needs: the read-pair markers.
    ///
    /// A missing file yields the default markers; tool keys are not
    /// required.
    ///
    /// # Example
    ///
    /// ``` rust, ignore
    /// let config = Config::read_markers(PathBuf::from("pipeline.cfg"))?;
    /// let (r1, r2) = config.markers();
    /// ```
    pub fn read_markers(config: PathBuf) -> Result<Self, ConfigError> {
        if !config.exists() {
            log::info!(
                "INFO: {} not found, using default read-pair markers",
                config.display()
            );
            return Ok(Self::default());
        }

        let config = Self::read_unchecked(&config)?;
        config.validate_markers()?;

        Ok(config)
    }

    fn read_unchecked(config: &Path) -> Result<Self, ConfigError> {
        let mut file = File::open(config)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let is_toml = config
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(TOML_EXT))
            .unwrap_or(false);

        if is_toml {
            Ok(toml::from_str(&contents)?)
        } else {
            Self::parse_lines(&contents)
        }
    }

    /// Parse `key=value` lines into a validated Config.
    ///
    /// Blank lines and lines starting with `#` are ignored. The value is
    /// everything after the first `=`; both key and value are trimmed.
    ///
    /// # Example
    ///
    /// ``` rust, ignore
    /// let config = Config::parse("SEQTK_EXEC=seqtk\n# comment\n...").unwrap();
    /// ```
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config = Self::parse_lines(contents)?;
        config.validate()?;

        Ok(config)
    }

    fn parse_lines(contents: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();

        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = match line.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => (key.trim(), value.trim()),
                _ => return Err(ConfigError::Malformed { line: idx + 1 }),
            };

            values.insert(key.to_string(), ParamValue::Str(value.to_string()));
        }

        Ok(Self { values })
    }

    /// Parse a flat TOML table into a validated Config.
    ///
    /// # Example
    ///
    /// ``` rust, ignore
    /// let config = Config::from_toml("SEQTK_EXEC = \"seqtk\"\nNUM_THREADS = 4").unwrap();
    /// ```
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;

        Ok(config)
    }

    /// Check required keys and numeric settings.
    fn validate(&self) -> Result<(), ConfigError> {
        for key in REQUIRED_KEYS {
            match self.values.get(*key) {
                None => return Err(ConfigError::MissingKey(key.to_string())),
                Some(value) if value.to_string().trim().is_empty() => {
                    return Err(ConfigError::EmptyValue(key.to_string()))
                }
                _ => (),
            }
        }

        for key in NUMERIC_KEYS {
            if let Some(value) = self.values.get(*key) {
                value.to_positive_int(key)?;
            }
        }

        if let Some(value) = self.values.get(FAIL_FAST) {
            value.to_bool(FAIL_FAST)?;
        }

        self.validate_markers()
    }

    /// Markers must be non-empty and distinct, otherwise a file would
    /// either match nothing or be paired with itself.
    fn validate_markers(&self) -> Result<(), ConfigError> {
        for key in [R1_MARKER, R2_MARKER] {
            if let Some(value) = self.values.get(key) {
                if value.to_string().trim().is_empty() {
                    return Err(ConfigError::EmptyValue(key.to_string()));
                }
            }
        }

        let (marker1, marker2) = self.markers();
        if marker1 == marker2 {
            return Err(ConfigError::InvalidValue {
                key: R2_MARKER.to_string(),
                value: marker2,
            });
        }

        Ok(())
    }

    /// Get a value from the Config as a string.
    ///
    /// # Example
    ///
    /// ``` rust, ignore
    /// let value = config.get(SEQTK_EXEC);
    ///
    /// assert_eq!(value, Some("seqtk".into()));
    /// ```
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|value| value.to_string())
    }

    /// Get a value or fall back to `default` when the key is absent.
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a value that must be present.
    pub fn require(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    pub fn seqtk(&self) -> Result<String, ConfigError> {
        self.require(SEQTK_EXEC)
    }

    pub fn spades(&self) -> Result<String, ConfigError> {
        self.require(SPADES_EXEC)
    }

    pub fn quast(&self) -> Result<String, ConfigError> {
        self.require(QUAST_EXEC)
    }

    pub fn fastqc(&self) -> String {
        self.get_or(FASTQC_EXEC, DEFAULT_FASTQC)
    }

    pub fn spades_flags(&self) -> String {
        self.get_or(SPADES_FLAGS, "")
    }

    pub fn queue(&self) -> String {
        self.get_or(QUEUE, DEFAULT_QUEUE)
    }

    pub fn job_name(&self) -> String {
        self.get_or(JOB_NAME, DEFAULT_JOB_NAME)
    }

    /// Read-pair markers as (file1, file2).
    pub fn markers(&self) -> (String, String) {
        (
            self.get_or(R1_MARKER, DEFAULT_R1_MARKER),
            self.get_or(R2_MARKER, DEFAULT_R2_MARKER),
        )
    }

    /// Thread count handed to every tool and to the scheduler.
    pub fn threads(&self) -> Result<u32, ConfigError> {
        self.positive_int(NUM_THREADS)?
            .ok_or_else(|| ConfigError::MissingKey(NUM_THREADS.to_string()))
    }

    /// Per-task memory ceiling in GB.
    pub fn memory_gb(&self) -> Result<u32, ConfigError> {
        self.positive_int(MEMORY_GB)?
            .ok_or_else(|| ConfigError::MissingKey(MEMORY_GB.to_string()))
    }

    /// Optional cap on concurrently running array tasks.
    pub fn slot_limit(&self) -> Result<Option<u32>, ConfigError> {
        self.positive_int(SLOT_LIMIT)
    }

    /// Whether generated scripts should stop on the first failing command.
    pub fn fail_fast(&self) -> Result<bool, ConfigError> {
        match self.values.get(FAIL_FAST) {
            Some(value) => value.to_bool(FAIL_FAST),
            None => Ok(false),
        }
    }

    fn positive_int(&self, key: &str) -> Result<Option<u32>, ConfigError> {
        self.values
            .get(key)
            .map(|value| value.to_positive_int(key))
            .transpose()
    }
}

/// error handling for configuration files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Improperly formatted configuration file. Error on line #{line}")]
    Malformed { line: usize },
    #[error("Invalid configuration file. Must contain field '{0}'")]
    MissingKey(String),
    #[error("Invalid configuration file. Field '{0}' must not be empty")]
    EmptyValue(String),
    #[error("Invalid configuration file. Field '{key}' has invalid value '{value}'")]
    InvalidValue { key: String, value: String },
    #[error("Scheduler log path '{0}' must not contain whitespace")]
    UnsupportedPath(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// An enum representing the stages of a per-pair pipeline script,
/// in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PipelineStage {
    Filter,
    RawQc,
    Assembly,
    AssemblyQc,
    Cleanup,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::Filter,
        PipelineStage::RawQc,
        PipelineStage::Assembly,
        PipelineStage::AssemblyQc,
        PipelineStage::Cleanup,
    ];

    /// Comment line written above the stage commands.
    ///
    /// # Example
    ///
    /// ``` rust, ignore
    /// assert_eq!(PipelineStage::Filter.header(), "# Filtering - seqtk");
    /// ```
    pub fn header(&self) -> &'static str {
        match self {
            PipelineStage::Filter => "# Filtering - seqtk",
            PipelineStage::RawQc => "# Quality assessment - fastqc",
            PipelineStage::Assembly => "# Assembly - SPAdes",
            PipelineStage::AssemblyQc => "# Quality assessment - quast",
            PipelineStage::Cleanup => "# Clean up",
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            PipelineStage::Filter => "filter",
            PipelineStage::RawQc => "raw_qc",
            PipelineStage::Assembly => "assembly",
            PipelineStage::AssemblyQc => "assembly_qc",
            PipelineStage::Cleanup => "cleanup",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Represents a configuration value
///
/// `key=value` files always produce `Str`; TOML files may carry any variant.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl ParamValue {
    /// Convert a ParamValue to a strictly positive integer.
    pub fn to_positive_int(&self, key: &str) -> Result<u32, ConfigError> {
        let parsed = match self {
            ParamValue::Int(i) => u32::try_from(*i).ok(),
            ParamValue::Str(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        };

        match parsed {
            Some(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: self.to_string(),
            }),
        }
    }

    /// Convert a ParamValue to a bool, accepting `true/false`, `yes/no` and `1/0`.
    pub fn to_bool(&self, key: &str) -> Result<bool, ConfigError> {
        match self {
            ParamValue::Bool(b) => Ok(*b),
            ParamValue::Int(0) => Ok(false),
            ParamValue::Int(1) => Ok(true),
            ParamValue::Str(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(true),
                "false" | "no" | "0" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: s.clone(),
                }),
            },
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: self.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(flt) => write!(f, "{}", flt),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Str(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BASIC: &str = "\
# Pipeline configuration
SPADES_EXEC=$HOME/tools/SPAdes-3.0.0-Linux/bin/spades.py

SEQTK_EXEC=seqtk
QUAST_EXEC=$HOME/tools/quast-2.3/metaquast.py
   # indented comment
R1_MARKER=_R1_
R2_MARKER=_R2_
NUM_THREADS=4
MEMORY_GB=8
SPADES_FLAGS=--careful --cov-cutoff=auto
";

    #[test]
    fn test_parse_reproduces_mapping() {
        let config = Config::parse(BASIC).expect("ERROR: Could not parse config!");

        assert_eq!(config.values.len(), 8);
        assert_eq!(
            config.get(SPADES_EXEC),
            Some("$HOME/tools/SPAdes-3.0.0-Linux/bin/spades.py".into())
        );
        assert_eq!(config.get(SEQTK_EXEC), Some("seqtk".into()));
        assert_eq!(
            config.get(QUAST_EXEC),
            Some("$HOME/tools/quast-2.3/metaquast.py".into())
        );
        assert_eq!(config.get(R1_MARKER), Some("_R1_".into()));
        assert_eq!(config.get(R2_MARKER), Some("_R2_".into()));
        assert_eq!(
            config.spades_flags(),
            "--careful --cov-cutoff=auto".to_string()
        );
        assert_eq!(config.threads().unwrap(), 4);
        assert_eq!(config.memory_gb().unwrap(), 8);
        assert_eq!(config.slot_limit().unwrap(), None);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let contents = "SEQTK_EXEC=seqtk\n\n# comment\nNOT_A_PAIR\n";
        let err = Config::parse(contents).unwrap_err();

        assert!(matches!(err, ConfigError::Malformed { line: 4 }));
        assert!(err.to_string().contains("line #4"));
    }

    #[test]
    fn test_empty_key_is_malformed() {
        let err = Config::parse("=value\n").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { line: 1 }));
    }

    #[test]
    fn test_missing_required_keys_fail_closed() {
        for missing in REQUIRED_KEYS {
            let contents = REQUIRED_KEYS
                .iter()
                .filter(|key| *key != missing)
                .map(|key| format!("{}=tool\n", key))
                .collect::<String>();

            match Config::parse(&contents) {
                Err(ConfigError::MissingKey(key)) => assert_eq!(key, *missing),
                other => panic!("expected missing {}, got {:?}", missing, other),
            }
        }
    }

    #[test]
    fn test_empty_required_value() {
        let contents = "SEQTK_EXEC=\nSPADES_EXEC=spades.py\nQUAST_EXEC=quast.py\n";
        let err = Config::parse(contents).unwrap_err();

        assert!(matches!(err, ConfigError::EmptyValue(key) if key == SEQTK_EXEC));
    }

    #[test]
    fn test_empty_marker() {
        let base = "SEQTK_EXEC=seqtk\nSPADES_EXEC=spades.py\nQUAST_EXEC=quast.py\n";

        let err = Config::parse(&format!("{}R1_MARKER=\n", base)).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue(key) if key == R1_MARKER));

        let err = Config::parse(&format!("{}R2_MARKER=   \n", base)).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue(key) if key == R2_MARKER));
    }

    #[test]
    fn test_identical_markers() {
        let base = "SEQTK_EXEC=seqtk\nSPADES_EXEC=spades.py\nQUAST_EXEC=quast.py\n";

        let err = Config::parse(&format!("{}R1_MARKER=_R1_\nR2_MARKER=_R1_\n", base)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == R2_MARKER));

        // only one side set, colliding with the other default
        let err = Config::parse(&format!("{}R2_MARKER=_R1_\n", base)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == R2_MARKER));

        let config = Config::parse(&format!("{}R1_MARKER=.1.\nR2_MARKER=.2.\n", base)).unwrap();
        assert_eq!(config.markers(), (".1.".to_string(), ".2.".to_string()));
    }

    #[test]
    fn test_read_markers() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::read_markers(dir.path().join("pipeline.cfg")).unwrap();
        assert_eq!(config.markers(), ("_R1_".to_string(), "_R2_".to_string()));

        let path = dir.path().join("markers.cfg");
        std::fs::write(&path, "R1_MARKER=_1.\nR2_MARKER=_2.\n").unwrap();
        let config = Config::read_markers(path.clone()).unwrap();
        assert_eq!(config.markers(), ("_1.".to_string(), "_2.".to_string()));
        assert!(Config::read(path).is_err());

        let path = dir.path().join("bad.cfg");
        std::fs::write(&path, "R1_MARKER=\n").unwrap();
        assert!(matches!(
            Config::read_markers(path),
            Err(ConfigError::EmptyValue(key)) if key == R1_MARKER
        ));
    }

    #[test]
    fn test_invalid_numeric_value() {
        let contents = "SEQTK_EXEC=seqtk\nSPADES_EXEC=spades.py\nQUAST_EXEC=quast.py\nNUM_THREADS=four\n";
        let err = Config::parse(contents).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == NUM_THREADS));

        let contents = "SEQTK_EXEC=seqtk\nSPADES_EXEC=spades.py\nQUAST_EXEC=quast.py\nSLOT_LIMIT=0\n";
        assert!(Config::parse(contents).is_err());
    }

    #[test]
    fn test_defaults_and_missing_threads() {
        let contents = "SEQTK_EXEC=seqtk\nSPADES_EXEC=spades.py\nQUAST_EXEC=quast.py\n";
        let config = Config::parse(contents).unwrap();

        assert_eq!(config.fastqc(), DEFAULT_FASTQC);
        assert_eq!(config.queue(), DEFAULT_QUEUE);
        assert_eq!(config.job_name(), DEFAULT_JOB_NAME);
        assert_eq!(config.markers(), ("_R1_".to_string(), "_R2_".to_string()));
        assert!(!config.fail_fast().unwrap());
        assert!(matches!(config.threads(), Err(ConfigError::MissingKey(key)) if key == NUM_THREADS));
    }

    #[test]
    fn test_read_toml_config() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "SEQTK_EXEC = \"seqtk\"\nSPADES_EXEC = \"spades.py\"\nQUAST_EXEC = \"quast.py\"\nNUM_THREADS = 16\nMEMORY_GB = 32\nSLOT_LIMIT = 2\nFAIL_FAST = true"
        )
        .unwrap();

        let config = Config::read(file.path().to_path_buf()).unwrap();

        assert_eq!(config.threads().unwrap(), 16);
        assert_eq!(config.memory_gb().unwrap(), 32);
        assert_eq!(config.slot_limit().unwrap(), Some(2));
        assert!(config.fail_fast().unwrap());
    }

    #[test]
    fn test_from_toml_validation() {
        let err = Config::from_toml("SEQTK_EXEC = \"seqtk\"\nSPADES_EXEC = \"spades.py\"").unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(key) if key == QUAST_EXEC));

        let nested = "SEQTK_EXEC = \"seqtk\"\n[tools]\nquast = \"quast.py\"";
        assert!(matches!(Config::from_toml(nested), Err(ConfigError::TomlError(_))));
    }

    #[test]
    fn test_read_cfg_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", BASIC).unwrap();

        let config = Config::read(file.path().to_path_buf()).unwrap();
        assert_eq!(config, Config::parse(BASIC).unwrap());
    }

    #[test]
    fn test_stage_order() {
        let mut stages = PipelineStage::ALL.to_vec();
        stages.reverse();
        stages.sort();

        assert_eq!(stages, PipelineStage::ALL.to_vec());
        assert_eq!(PipelineStage::Cleanup.header(), "# Clean up");
    }
}
