//! Error types for entity operations.

use thiserror::Error;

/// Structured error types for entity operations.
///
/// Absent relation data is not an error (materialization yields `None`);
/// these variants cover data of the wrong shape and relation cache misuse.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EntityError {
    /// Relation data exists but has the wrong shape for the request
    #[error("relation '{key}' cannot be materialized: expected {expected}, found {found}")]
    RelationShape {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A relation is already materialized under a different type or cardinality
    #[error("relation '{key}' is already loaded as a different type (requested {requested})")]
    RelationType {
        key: String,
        requested: &'static str,
    },

    /// Entity data must be map-shaped
    #[error("entity data must be map-shaped, found {found}")]
    NotAMap { found: &'static str },
}

impl EntityError {
    /// Check if this error reports wrongly shaped data
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            EntityError::RelationShape { .. } | EntityError::NotAMap { .. }
        )
    }

    /// Check if this error reports a relation cache type conflict
    pub fn is_type_error(&self) -> bool {
        matches!(self, EntityError::RelationType { .. })
    }

    /// Get the relation key this error is about, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            EntityError::RelationShape { key, .. } | EntityError::RelationType { key, .. } => {
                Some(key)
            }
            _ => None,
        }
    }
}

impl From<EntityError> for crate::Error {
    fn from(err: EntityError) -> Self {
        crate::Error::Entity(err)
    }
}
