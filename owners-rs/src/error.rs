use std::path::PathBuf;

use thiserror::Error;

/// Result type for ownership resolution operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ownership resolution operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An unrecognized non-empty line in a policy file. Fatal for that
    /// directory's load; the offending text is the trimmed line and the
    /// line number is 1-based.
    #[error("{}:{}: syntax error: {}", .path.display(), .line, .text)]
    Syntax {
        path: PathBuf,
        line: usize,
        text: String,
    },

    /// A supplied file path is not contained within the repository root.
    #[error("path is outside the repository root: {0}")]
    InvalidPath(String),

    /// A supplied reviewer identifier is neither the wildcard nor
    /// email-shaped.
    #[error("invalid reviewer identifier: {0}")]
    InvalidReviewer(String),

    /// A policy file exists but could not be read.
    #[error("failed to read policy file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
