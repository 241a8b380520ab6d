//! Configuration errors

use super::StagehandError;

/// Creates a configuration not found error
pub fn not_found(path: impl Into<String>) -> StagehandError {
    StagehandError::ConfigNotFound { path: path.into() }
}

/// Creates a configuration parse error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> StagehandError {
    StagehandError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid configuration error
pub fn invalid(message: impl Into<String>) -> StagehandError {
    StagehandError::ConfigInvalid {
        message: message.into(),
    }
}

/// Attach the file a parse error came from
pub fn in_file(err: StagehandError, path: impl Into<String>) -> StagehandError {
    match err {
        StagehandError::ConfigParseFailed { reason, .. } => parse_failed(path, reason),
        other => other,
    }
}
