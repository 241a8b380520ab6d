//! Bindings staging errors

use super::StagehandError;

/// Creates a source path not found error
pub fn source_path_not_found(
    package: impl Into<String>,
    path: impl Into<String>,
) -> StagehandError {
    StagehandError::SourcePathNotFound {
        package: package.into(),
        path: path.into(),
    }
}

/// Creates a destination write error
pub fn destination_write(path: impl Into<String>, reason: impl Into<String>) -> StagehandError {
    StagehandError::DestinationWriteError {
        path: path.into(),
        reason: reason.into(),
    }
}
