// error.rs - Error taxonomy for the profiling engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring, ingesting or profiling reads
#[derive(Error, Debug)]
pub enum SspError {
    /// Invalid metric name, offset bounds or thread count. Fatal, raised
    /// before any worker is spawned.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A read references a chromosome absent from the registry. The read is
    /// dropped and ingestion continues.
    #[error("Chromosome '{chrom}' is not in the genome table")]
    MissingChromosomeData {
        /// Name carried by the offending read
        chrom: String,
    },

    /// Empty read set or degenerate profile.
    #[error("No signal for {scope}: {reason}")]
    NoSignal {
        /// Chromosome name, or "genome"
        scope: String,
        /// What made the profile unusable
        reason: String,
    },

    /// Failure reading or writing a file.
    #[error("I/O failure on '{}': {source}", path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed input table line.
    #[error("Parse error in '{}' line {line}: {message}", path.display())]
    Parse {
        /// Input file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// Worker pool could not be created.
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SspError {
    pub fn no_signal(scope: impl Into<String>, reason: impl Into<String>) -> Self {
        SspError::NoSignal {
            scope: scope.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SspError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_no_signal(&self) -> bool {
        matches!(self, SspError::NoSignal { .. })
    }
}

pub type Result<T> = std::result::Result<T, SspError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_signal_message() {
        let err = SspError::no_signal("chr1", "no reverse-strand reads");
        assert!(err.is_no_signal());
        assert_eq!(err.to_string(), "No signal for chr1: no reverse-strand reads");
    }

    #[test]
    fn test_io_message_carries_path() {
        let err = SspError::io(
            "/tmp/out.tsv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/out.tsv"));
        assert!(!err.is_no_signal());
    }
}
