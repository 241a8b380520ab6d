//! Requirement and package resolution errors

use super::StagehandError;

/// Creates a version conflict error
pub fn version_conflict(
    name: impl Into<String>,
    existing: impl Into<String>,
    requested: impl Into<String>,
) -> StagehandError {
    StagehandError::VersionConflict {
        name: name.into(),
        existing: existing.into(),
        requested: requested.into(),
    }
}

/// Creates a package not found error
pub fn not_found(
    name: impl Into<String>,
    version: impl Into<String>,
    reason: impl Into<String>,
) -> StagehandError {
    StagehandError::PackageNotFound {
        name: name.into(),
        version: version.into(),
        reason: reason.into(),
    }
}

/// Creates an option conflict error
pub fn option_conflict(
    package: impl Into<String>,
    key: impl Into<String>,
    reason: impl Into<String>,
) -> StagehandError {
    StagehandError::OptionConflict {
        package: package.into(),
        key: key.into(),
        reason: reason.into(),
    }
}

/// Creates a package not resolved error
pub fn not_resolved(name: impl Into<String>) -> StagehandError {
    StagehandError::PackageNotResolved { name: name.into() }
}

/// Creates an invalid reference error
pub fn invalid_reference(
    reference: impl Into<String>,
    reason: impl Into<String>,
) -> StagehandError {
    StagehandError::InvalidReference {
        reference: reference.into(),
        reason: reason.into(),
    }
}
