//! Cache errors

use super::StagehandError;

/// Creates a cache operation failed error
pub fn operation_failed(message: impl Into<String>) -> StagehandError {
    StagehandError::CacheOperationFailed {
        message: message.into(),
    }
}
