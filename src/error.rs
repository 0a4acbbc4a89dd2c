//! Error types for package import
//!
//! Package-level errors abort an import before any entity is touched.
//! `InvalidEntity` is raised per record and is recovered by the importer,
//! which skips the record and carries on with the rest of the package.

use crate::model::EntityKind;
use thiserror::Error;

/// Result type alias using the importer's error type.
pub type Result<T> = std::result::Result<T, ImportError>;

/// Errors raised while importing a package
#[derive(Error, Debug)]
pub enum ImportError {
    /// Input is not JSON, or not a non-empty JSON object
    #[error("Malformed package: {0}")]
    MalformedPackage(String),

    /// `meta.version` is absent or empty
    #[error("Package is missing meta.version")]
    MissingVersion,

    /// `meta.version` could not be resolved to a dotted version
    #[error("Invalid package version '{0}'")]
    InvalidVersion(String),

    /// A single record lacks its identifying attribute
    #[error("Invalid {kind} record: {reason}")]
    InvalidEntity { kind: EntityKind, reason: String },

    /// Failure surfaced by the persistence collaborator
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ImportError {
    /// Build an `InvalidEntity` error for the given kind
    pub fn invalid_entity(kind: EntityKind, reason: impl Into<String>) -> Self {
        ImportError::InvalidEntity {
            kind,
            reason: reason.into(),
        }
    }

    /// Whether the error only concerns one record and the import may continue
    pub fn is_entity_level(&self) -> bool {
        matches!(self, ImportError::InvalidEntity { .. })
    }
}
