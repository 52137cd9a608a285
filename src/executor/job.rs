use std::path::Path;

/// Struct to represent a single shell command
/// written into a pipeline script
///
/// Arguments added through `arg` and `path` are quoted for a POSIX
/// shell; `raw` text is appended untouched.
///
/// # Example
///
/// ```rust, ignore
/// use pipeline_lite::executor::job::Job;
///
/// let job = Job::new("seqtk")
///     .arg("trimfq")
///     .arg("reads 1.fastq")
///     .stdout(Path::new("out/filtered_1.fastq"));
///
/// assert_eq!(job.cmd(), "seqtk trimfq 'reads 1.fastq' > out/filtered_1.fastq");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub cmd: String,
}

impl Job {
    /// Create a new job from an executable
    ///
    /// The executable is kept verbatim so config values such as
    /// `$HOME/tools/spades.py` still expand at runtime.
    pub fn new(exec: &str) -> Self {
        Self {
            cmd: exec.to_string(),
        }
    }

    /// Add a quoted argument to the job
    ///
    /// # Example
    ///
    /// ```rust, ignore
    /// let job = Job::new("rm").arg("-f").arg("a b");
    ///
    /// assert_eq!(job.cmd(), "rm -f 'a b'");
    /// ```
    pub fn arg(mut self, arg: &str) -> Self {
        self.cmd.push(' ');
        self.cmd.push_str(&shell_quote(arg));
        self
    }

    /// Add multiple quoted arguments to the job
    pub fn args(mut self, args: &[&str]) -> Self {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Add a quoted path argument to the job
    pub fn path(self, path: &Path) -> Self {
        self.arg(&path.to_string_lossy())
    }

    /// Append unquoted text, skipped when blank
    ///
    /// # Example
    ///
    /// ```rust, ignore
    /// let job = Job::new("spades.py").raw("--careful --cov-cutoff auto");
    ///
    /// assert_eq!(job.cmd(), "spades.py --careful --cov-cutoff auto");
    /// ```
    pub fn raw(mut self, text: &str) -> Self {
        let text = text.trim();
        if !text.is_empty() {
            self.cmd.push(' ');
            self.cmd.push_str(text);
        }
        self
    }

    /// Redirect stdout of the job into `path`
    pub fn stdout(mut self, path: &Path) -> Self {
        self.cmd.push_str(" > ");
        self.cmd.push_str(&shell_quote(&path.to_string_lossy()));
        self
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cmd)
    }
}

/// `mkdir -p <dir>`
pub fn mkdir(dir: &Path) -> Job {
    Job::new("mkdir").arg("-p").path(dir)
}

/// Quote a word for a POSIX shell
///
/// Words made only of `[A-Za-z0-9_./:-]` are returned as-is; anything
/// else is wrapped in single quotes with embedded quotes escaped.
pub fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        "''".to_string()
    } else if s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_./:".contains(c))
    {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\"'\"'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("reads_R1_001.fastq"), "reads_R1_001.fastq");
        assert_eq!(shell_quote("/data/run-1/x.fq"), "/data/run-1/x.fq");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("a b"), "'a b'");
        assert_eq!(shell_quote("$(rm -rf /)"), "'$(rm -rf /)'");
        assert_eq!(shell_quote("it's"), "'it'\"'\"'s'");
    }

    #[test]
    fn test_job_building() {
        let job = Job::new("seqtk")
            .arg("trimfq")
            .path(Path::new("in dir/reads_R1_.fq"))
            .stdout(Path::new("out/filtered_1.fastq"));

        assert_eq!(
            job.cmd(),
            "seqtk trimfq 'in dir/reads_R1_.fq' > out/filtered_1.fastq"
        );
    }

    #[test]
    fn test_raw_and_args() {
        let job = Job::new("$HOME/spades.py")
            .args(&["-t", "4"])
            .raw("  ")
            .raw("--careful --only-assembler");

        assert_eq!(
            job.to_string(),
            "$HOME/spades.py -t 4 --careful --only-assembler"
        );
        assert_eq!(mkdir(Path::new("out/x")).cmd(), "mkdir -p out/x");
    }
}
