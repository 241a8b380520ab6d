//! Lockfile errors

use super::StagehandError;

/// Creates a lockfile outdated error
pub fn outdated() -> StagehandError {
    StagehandError::LockfileOutdated
}

/// Creates a lockfile missing error
pub fn missing() -> StagehandError {
    StagehandError::LockfileMissing
}
