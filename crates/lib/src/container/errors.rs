//! Error types for container operations.
//!
//! Absent values are not errors: lookups return `Option`/`None` for them.
//! The variants here cover the conditions the container refuses to coerce
//! silently: traversal or writes through data of the wrong shape, list
//! writes outside the existing bounds, and failed value conversions.

use thiserror::Error;

/// Structured error types for container operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Data at a path has the wrong shape for the requested operation
    #[error("shape mismatch at '{path}': expected {expected}, found {found}")]
    ShapeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A list index outside the existing bounds; lists are never grown implicitly
    #[error("list index {index} out of bounds at '{path}' (len {len})")]
    IndexOutOfBounds {
        path: String,
        index: usize,
        len: usize,
    },

    /// A value could not be converted to the requested type
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// No value at the given path where one was required
    #[error("no value at '{path}'")]
    NotFound { path: String },
}

impl ContainerError {
    /// Check if this error reports wrongly shaped data
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, ContainerError::ShapeMismatch { .. })
    }

    /// Check if this error reports an out-of-bounds list index
    pub fn is_index_error(&self) -> bool {
        matches!(self, ContainerError::IndexOutOfBounds { .. })
    }

    /// Check if this error reports a failed value conversion
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, ContainerError::TypeMismatch { .. })
    }

    /// Check if this error reports an absent value
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContainerError::NotFound { .. })
    }

    /// Get the path this error is about, if it carries one
    pub fn path(&self) -> Option<&str> {
        match self {
            ContainerError::ShapeMismatch { path, .. }
            | ContainerError::IndexOutOfBounds { path, .. }
            | ContainerError::NotFound { path } => Some(path),
            _ => None,
        }
    }
}

impl From<ContainerError> for crate::Error {
    fn from(err: ContainerError) -> Self {
        crate::Error::Container(err)
    }
}
