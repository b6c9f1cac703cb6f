//!
//! Tether: typed records over shared nested data.
//!
//! A record fetched from an external source is a plain nested structure of
//! maps, lists and scalars. Application code wants strongly-shaped child
//! objects instead, and it wants a write through a child to be visible
//! through the parent without an explicit sync step. Tether provides that
//! as four pieces:
//!
//! * **Containers (`container::Container`)**: nested key/value storage
//!   addressed by dotted paths, built from shared [`container::Node`] cells
//!   so that two owners can hold the same storage and observe each other's
//!   writes.
//! * **Entities (`entity::Entity`)**: one record over one container, with
//!   lazily materialized, identity-stable child entities ("relations") that
//!   alias sub-trees of the parent's storage.
//! * **Collections (`collection::Collection`)**: ordered, homogeneous
//!   sequences of typed records, promotable from raw list data slot by slot.
//! * **Relations (`relations`)**: static, compile-time-checked registration
//!   of which keys produce which child types, used for introspection and
//!   post-construction auto-loading.
//!
//! The `remote` module defines the transport boundary (`remote::Transport`)
//! and the record lifecycle verbs (`remote::Remote`) as thin orchestration
//! over the core.
//!
//! # Aliasing, not copies
//!
//! Promoting a sub-tree into a child entity never copies it: parent and
//! child read and write the same storage cells through reference-counted,
//! interior-mutable nodes. This makes an entity graph shared-mutable state
//! by design, and therefore single-threaded: the types are intentionally
//! `!Send`, and a graph must stay on one logical thread of control.

pub mod collection;
pub mod container;
pub mod entity;
pub mod relations;
pub mod remote;

pub use collection::{Collection, Direction};
pub use container::{Container, Node, Value};
pub use entity::Entity;
pub use relations::{Cardinality, Record, Relation};
pub use remote::{Params, Remote, Transport, TransportError};

/// Result type used throughout the tether library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the tether library.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured container errors from the container module
    #[error(transparent)]
    Container(container::ContainerError),

    /// Structured entity errors from the entity module
    #[error(transparent)]
    Entity(entity::EntityError),

    /// Structured collection errors from the collection module
    #[error(transparent)]
    Collection(collection::CollectionError),

    /// Transport-level errors owned by the remote collaborator
    #[error(transparent)]
    Transport(remote::TransportError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Serialize(_) => "serialize",
            Error::Container(_) => "container",
            Error::Entity(_) => "entity",
            Error::Collection(_) => "collection",
            Error::Transport(_) => "remote",
        }
    }

    /// Check if this error reports data of the wrong shape (a path traversed
    /// through a scalar, a relation over non-branch data, a list slot that
    /// cannot be promoted).
    pub fn is_shape_error(&self) -> bool {
        match self {
            Error::Container(err) => err.is_shape_mismatch(),
            Error::Entity(err) => err.is_shape_error(),
            Error::Collection(err) => err.is_shape_error(),
            _ => false,
        }
    }

    /// Check if this error is a type mismatch (value conversion or a relation
    /// cached under a different type).
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Container(err) => err.is_type_mismatch(),
            Error::Entity(err) => err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error reports an out-of-range list or collection index.
    pub fn is_index_error(&self) -> bool {
        match self {
            Error::Container(err) => err.is_index_error(),
            Error::Collection(err) => err.is_index_error(),
            _ => false,
        }
    }

    /// Check if this error indicates a value was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Container(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error came from the remote transport.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}
