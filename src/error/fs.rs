//! File system errors

use std::path::Path;

use super::StagehandError;

/// Creates a file read error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> StagehandError {
    StagehandError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file write error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> StagehandError {
    StagehandError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Maps an IO error on `path` to a read failure
pub fn read_error(path: &Path, e: &std::io::Error) -> StagehandError {
    read_failed(path.display().to_string(), e.to_string())
}

/// Maps an IO error on `path` to a write failure
pub fn write_error(path: &Path, e: &std::io::Error) -> StagehandError {
    write_failed(path.display().to_string(), e.to_string())
}
