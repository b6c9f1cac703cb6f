//! Typed records and static relation registration.
//!
//! [`Record`] is the capability contract for typed entity wrappers: anything
//! that can be constructed from record data (or from a shared storage node)
//! and hands back its underlying [`Entity`]. Child types used in relations
//! are `Record` implementors; [`Entity`] itself implements `Record` as the
//! untyped degenerate case.
//!
//! Which keys of a record produce which child types is declared statically
//! through [`Relation`] descriptors instead of discovered through runtime
//! reflection: every descriptor names its key, its cardinality and its
//! concrete target type at compile time, and carries a monomorphized loader
//! so a relation can be materialized without knowing the target type at the
//! call site. [`relation_map`] and [`distinct_targets`] enumerate the
//! declared surface; [`autoload`] is the explicit post-construction hook
//! that eagerly materializes the subset a record opts into.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use tether::{Entity, Record, Relation};
//!
//! struct Profile { entity: Entity }
//!
//! impl Record for Profile {
//!     fn from_entity(entity: Entity) -> Self {
//!         Self { entity }
//!     }
//!
//!     fn entity(&self) -> &Entity {
//!         &self.entity
//!     }
//! }
//!
//! struct User { entity: Entity }
//!
//! impl User {
//!     fn profile(&self) -> tether::Result<Option<Rc<Profile>>> {
//!         self.entity.relation::<Profile>("profile")
//!     }
//! }
//!
//! impl Record for User {
//!     fn from_entity(entity: Entity) -> Self {
//!         Self { entity }
//!     }
//!
//!     fn entity(&self) -> &Entity {
//!         &self.entity
//!     }
//!
//!     fn relations() -> &'static [Relation] {
//!         static RELATIONS: &[Relation] = &[Relation::one::<Profile>("profile")];
//!         RELATIONS
//!     }
//! }
//! ```

use std::any::TypeId;
use std::fmt;

use crate::collection::Collection;
use crate::container::{Node, Value};
use crate::entity::Entity;

/// Capability contract for typed records over an [`Entity`].
pub trait Record: Sized + 'static {
    /// Wraps an entity in this record type
    fn from_entity(entity: Entity) -> Self;

    /// The underlying entity
    fn entity(&self) -> &Entity;

    /// The declared relation surface of this record type.
    ///
    /// Every relation-producing key should appear here once; introspection
    /// ([`relation_map`], [`distinct_targets`]) and auto-loading read this
    /// list and nothing else.
    fn relations() -> &'static [Relation] {
        &[]
    }

    /// The relations to materialize eagerly right after construction and
    /// after a remote hydrate/refresh. Defaults to none.
    fn autoload() -> &'static [Relation] {
        &[]
    }

    /// Constructs a record from a fresh copy of `data` and runs the
    /// auto-load hook.
    fn from_data(data: impl Into<Value>) -> crate::Result<Self> {
        let record = Self::from_entity(Entity::from_data(data)?);
        autoload(&record)?;
        Ok(record)
    }

    /// Constructs a record over shared storage (the node is aliased, not
    /// copied) and runs the auto-load hook. The node must be map-shaped.
    fn from_node(node: Node) -> crate::Result<Self> {
        let record = Self::from_entity(Entity::from_node(node)?);
        autoload(&record)?;
        Ok(record)
    }

    /// Returns a new collection of this record type
    fn collection(records: Vec<Self>) -> Collection<Self> {
        Collection::new(records)
    }
}

impl Record for Entity {
    fn from_entity(entity: Entity) -> Self {
        entity
    }

    fn entity(&self) -> &Entity {
        self
    }
}

/// Whether a relation produces a single child or a collection of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// A single child record
    One,
    /// A homogeneous collection of child records
    Many,
}

/// A statically declared relation: key, cardinality and target type.
///
/// Descriptors are const-constructible so record types can declare their
/// relation surface in a `static` slice. The loader is monomorphized at
/// declaration time, which is what lets [`autoload`] materialize a relation
/// without naming the target type.
#[derive(Clone, Copy)]
pub struct Relation {
    key: &'static str,
    cardinality: Cardinality,
    target_name: fn() -> &'static str,
    target_id: fn() -> TypeId,
    load: fn(&Entity, &str) -> crate::Result<bool>,
}

impl Relation {
    /// Declares a single-child relation at `key` producing `T`
    pub const fn one<T: Record>(key: &'static str) -> Self {
        Self {
            key,
            cardinality: Cardinality::One,
            target_name: std::any::type_name::<T>,
            target_id: TypeId::of::<T>,
            load: load_one::<T>,
        }
    }

    /// Declares a collection relation at `key` with element type `T`
    pub const fn many<T: Record>(key: &'static str) -> Self {
        Self {
            key,
            cardinality: Cardinality::Many,
            target_name: std::any::type_name::<T>,
            target_id: TypeId::of::<T>,
            load: load_many::<T>,
        }
    }

    /// The relation key (a path into the record's container)
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Whether this relation produces one child or many
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// The target child type's name
    pub fn target_name(&self) -> &'static str {
        (self.target_name)()
    }

    /// The target child type's `TypeId`
    pub fn target_id(&self) -> TypeId {
        (self.target_id)()
    }

    /// Materializes this relation on `entity`.
    ///
    /// Returns whether a child was produced; absent data is `Ok(false)`.
    pub fn load(&self, entity: &Entity) -> crate::Result<bool> {
        (self.load)(entity, self.key)
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("key", &self.key)
            .field("cardinality", &self.cardinality)
            .field("target", &self.target_name())
            .finish()
    }
}

fn load_one<T: Record>(entity: &Entity, key: &str) -> crate::Result<bool> {
    Ok(entity.relation::<T>(key)?.is_some())
}

fn load_many<T: Record>(entity: &Entity, key: &str) -> crate::Result<bool> {
    Ok(entity.relation_list::<T>(key)?.is_some())
}

/// The declared relation surface of `T` as `(key, target type name)` pairs,
/// in declaration order.
pub fn relation_map<T: Record>() -> Vec<(&'static str, &'static str)> {
    T::relations()
        .iter()
        .map(|relation| (relation.key(), relation.target_name()))
        .collect()
}

/// The distinct child types reachable from `T`'s declared relations.
///
/// Targets are compared by `TypeId`, reported once each, in declaration
/// order.
pub fn distinct_targets<T: Record>() -> Vec<&'static str> {
    let mut seen: Vec<TypeId> = Vec::new();
    let mut targets = Vec::new();
    for relation in T::relations() {
        let id = relation.target_id();
        if !seen.contains(&id) {
            seen.push(id);
            targets.push(relation.target_name());
        }
    }
    targets
}

/// Looks up a declared relation of `T` by key.
pub fn find<T: Record>(key: &str) -> Option<&'static Relation> {
    T::relations().iter().find(|relation| relation.key() == key)
}

/// Materializes every auto-load relation of `record` whose key holds data.
///
/// Absent keys are skipped and do not abort the remaining loads. Wrongly
/// shaped data surfaces as an error, per the crate-wide policy.
pub fn autoload<T: Record>(record: &T) -> crate::Result<()> {
    for relation in T::autoload() {
        if record.entity().has(relation.key()) {
            relation.load(record.entity())?;
        }
    }
    Ok(())
}
