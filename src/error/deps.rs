//! Dependency graph errors

use super::StagehandError;

/// Creates a circular dependency error
pub fn circular(chain: impl Into<String>) -> StagehandError {
    StagehandError::CircularDependency {
        chain: chain.into(),
    }
}
