//! Errors surfaced by file operations.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to open or save the edited file.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no filename")]
    NoFilename,
}

impl FileError {
    /// Path the failing operation was working on, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } => Some(path),
            Self::NoFilename => None,
        }
    }
}
