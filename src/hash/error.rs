// Error types for scanning and digesting
// Walk errors abort a scan, I/O errors on single files are recovered by the caller

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for hashsum
///
/// Every variant carries the path it concerns and ends its message with a
/// suggestion line for the console.
#[derive(Debug, Error)]
pub enum HashSumError {
    #[error("Directory not found: {}\nSuggestion: Check that the directory path is correct and the directory exists", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {}\nSuggestion: Pass the directory that contains the files to digest", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Cannot walk directory {}: {reason}\nSuggestion: Check directory permissions", path.display())]
    Walk { path: PathBuf, reason: String },

    #[error("Permission denied while {operation} file: {}\nSuggestion: Check file permissions or run with appropriate privileges", path.display())]
    PermissionDenied { path: PathBuf, operation: String },

    #[error("I/O error while {operation} file {}: {source}\nSuggestion: Check that the file still exists and is readable", path.display())]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write report {}: {source}\nSuggestion: Check disk space and write permissions", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HashSumError {
    /// Classify an io::Error raised while performing `operation` on `path`
    ///
    /// Operations mentioning "directory" or "walking" turn a NotFound into
    /// [`HashSumError::DirectoryNotFound`]; everything else stays a file error.
    pub fn from_io_error(err: io::Error, operation: &str, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound
                if operation.contains("directory") || operation.contains("walking") =>
            {
                HashSumError::DirectoryNotFound { path }
            }
            io::ErrorKind::PermissionDenied => HashSumError::PermissionDenied {
                path,
                operation: operation.to_string(),
            },
            _ => HashSumError::Io {
                path,
                operation: operation.to_string(),
                source: err,
            },
        }
    }

    /// True for errors that stop a walk rather than a single file
    pub fn is_walk_error(&self) -> bool {
        matches!(
            self,
            HashSumError::DirectoryNotFound { .. }
                | HashSumError::NotADirectory { .. }
                | HashSumError::Walk { .. }
        )
    }

    /// Path the error concerns
    pub fn path(&self) -> &std::path::Path {
        match self {
            HashSumError::DirectoryNotFound { path }
            | HashSumError::NotADirectory { path }
            | HashSumError::Walk { path, .. }
            | HashSumError::PermissionDenied { path, .. }
            | HashSumError::Io { path, .. }
            | HashSumError::ReportWrite { path, .. } => path,
        }
    }
}
