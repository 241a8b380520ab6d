//! Generator errors

use super::StagehandError;

/// Creates a generator not found error
pub fn not_found(name: impl Into<String>) -> StagehandError {
    StagehandError::GeneratorNotFound { name: name.into() }
}

/// Creates a duplicate generator error
pub fn duplicate(name: impl Into<String>) -> StagehandError {
    StagehandError::DuplicateGenerator { name: name.into() }
}
