use std::path::{Path, PathBuf};

/// Paired-end read files of one sample
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReadPair {
    pub file1: PathBuf,
    pub file2: PathBuf,
}

impl ReadPair {
    pub fn new(file1: PathBuf, file2: PathBuf) -> Self {
        Self { file1, file2 }
    }

    /// Sample name: the part of the file1 name before `marker`
    ///
    /// # Example
    ///
    /// ```rust, ignore
    /// let pair = ReadPair::new("in/S1_L001_R1_001.fastq".into(), "in/S1_L001_R2_001.fastq".into());
    ///
    /// assert_eq!(pair.sample("_R1_"), "S1_L001");
    /// ```
    pub fn sample(&self, marker: &str) -> String {
        let name = self
            .file1
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        match name.split_once(marker) {
            Some((head, _)) => head.to_string(),
            None => name,
        }
    }
}

/// Build the expected mate file name by replacing the first occurrence
/// of `marker1` with `marker2`. Returns None if `marker1` is absent.
///
/// # Example
///
/// ```rust, ignore
/// assert_eq!(
///     mate_name("x_R1_001.fastq", "_R1_", "_R2_"),
///     Some("x_R2_001.fastq".to_string())
/// );
/// ```
pub fn mate_name(filename: &str, marker1: &str, marker2: &str) -> Option<String> {
    if marker1.is_empty() || !filename.contains(marker1) {
        return None;
    }

    Some(filename.replacen(marker1, marker2, 1))
}

/// Find paired read files in `input_dir`
///
/// Every regular file whose name carries `marker1` is paired with the file
/// named by `mate_name`, if that one exists. Unmatched files are skipped
/// with a warning. Pairs are sorted by file1 path.
///
/// # Example
///
/// ```rust, ignore
/// let pairs = find_pairs(Path::new("reads"), "_R1_", "_R2_").unwrap();
/// ```
pub fn find_pairs(
    input_dir: &Path,
    marker1: &str,
    marker2: &str,
) -> Result<Vec<ReadPair>, std::io::Error> {
    let mut pairs = Vec::new();

    for entry in std::fs::read_dir(input_dir)?.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(filename) = entry.file_name().to_str().map(str::to_owned) else {
            log::warn!(
                "WARN: skipping non UTF-8 file name: {}",
                path.display()
            );
            continue;
        };

        let Some(mate) = mate_name(&filename, marker1, marker2) else {
            continue;
        };

        let file2 = input_dir.join(&mate);
        if file2.is_file() {
            pairs.push(ReadPair::new(path, file2));
        } else {
            log::warn!(
                "WARN: no mate found for {} (expected {})",
                path.display(),
                file2.display()
            );
        }
    }

    pairs.sort();

    Ok(pairs)
}
