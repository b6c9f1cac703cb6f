//! Error types for collection operations.

use thiserror::Error;

/// Structured error types for collection operations.
///
/// Element type homogeneity is enforced by the type system; what remains at
/// runtime is element *shape* during promotion from raw list data, and index
/// validity for the mutating accessors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CollectionError {
    /// A collection was built from data that is not list-shaped
    #[error("collection data must be list-shaped, found {found}")]
    NotAList { found: &'static str },

    /// A list slot could not be promoted into an element record
    #[error("list slot {index} cannot be promoted: expected map, found {found}")]
    ElementShape { index: usize, found: &'static str },

    /// An index outside the collection bounds
    #[error("collection index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

impl CollectionError {
    /// Check if this error reports wrongly shaped data
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            CollectionError::NotAList { .. } | CollectionError::ElementShape { .. }
        )
    }

    /// Check if this error reports an out-of-bounds index
    pub fn is_index_error(&self) -> bool {
        matches!(self, CollectionError::IndexOutOfBounds { .. })
    }

    /// Get the element index this error is about, if any
    pub fn index(&self) -> Option<usize> {
        match self {
            CollectionError::ElementShape { index, .. }
            | CollectionError::IndexOutOfBounds { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl From<CollectionError> for crate::Error {
    fn from(err: CollectionError) -> Self {
        crate::Error::Collection(err)
    }
}
