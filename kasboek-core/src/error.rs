use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure classes shared by every conversion step.
#[derive(Debug, Error)]
pub enum Error {
    /// The input statement does not exist.
    #[error("input not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The input could not be read or holds data the pipeline cannot use.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// A configured column position does not fit a row.
    #[error("column {position} is out of range for row {row} ({width} columns)")]
    OutOfRange {
        row: usize,
        position: usize,
        width: usize,
    },

    /// The output artifact could not be written.
    #[error("writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
