//! Records over shared nested storage, with lazily materialized relations.
//!
//! An [`Entity`] wraps exactly one [`Container`] and adds the relation
//! protocol on top: a sub-tree of the container can be promoted into a typed
//! child record ([`Entity::relation`]) or a typed collection
//! ([`Entity::relation_list`]). Promotion never copies. The child's
//! container is the same storage addressed from a different root, so a write
//! through either side is immediately visible through the other.
//!
//! Each relation key is materialized at most once per entity: repeated
//! access returns the identical `Rc`. Absent (or explicitly null) data
//! yields `None` and caches nothing; scalar data where a relation was
//! requested is a shape error, never a silent `None`.
//!
//! All operations take `&self`; entities are interior-mutable and
//! single-threaded, like the nodes they are built on.
//!
//! # Examples
//!
//! ```
//! use tether::Entity;
//! use serde_json::json;
//!
//! let order = Entity::from_data(json!({"customer": {"name": "Alice"}}))?;
//!
//! // Promote the sub-tree; `Entity` itself works as an untyped child type.
//! let customer = order.relation::<Entity>("customer")?.unwrap();
//! customer.set("name", "Bob")?;
//!
//! // The write is visible through the parent, and vice versa.
//! assert_eq!(order.get_as::<String>("customer.name"), Some("Bob".to_string()));
//! order.set("customer.vip", true)?;
//! assert_eq!(customer.get_as::<bool>("vip"), Some(true));
//! # Ok::<(), tether::Error>(())
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Serialize, Serializer, de::DeserializeOwned};

use crate::collection::Collection;
use crate::container::{Container, ContainerError, Node, Value};
use crate::relations::Record;

pub mod errors;

pub use errors::EntityError;


/// One structured record, backed by one container.
pub struct Entity {
    container: Container,
    relations: RefCell<HashMap<String, Rc<dyn Any>>>,
    exists: Cell<bool>,
}

impl Entity {
    /// Creates an empty entity
    pub fn new() -> Self {
        Self::over(Container::new())
    }

    /// Creates an entity from a fresh copy of `data`.
    ///
    /// The data must be map-shaped. The copy is deep: the new entity shares
    /// no storage with the caller, even when `data` carries branch nodes.
    pub fn from_data(data: impl Into<Value>) -> crate::Result<Self> {
        match data.into() {
            Value::Map(node) => Ok(Self::over(Container::from_node(node.deep_copy()))),
            other => Err(EntityError::NotAMap {
                found: other.type_name(),
            }
            .into()),
        }
    }

    /// Creates an entity over existing shared storage.
    ///
    /// The node must be map-shaped and is aliased, not copied: this is the
    /// constructor a parent uses to promote one of its own sub-trees.
    pub fn from_node(node: Node) -> crate::Result<Self> {
        if !node.is_map() {
            return Err(EntityError::NotAMap {
                found: node.kind(),
            }
            .into());
        }
        Ok(Self::over(Container::from_node(node)))
    }

    fn over(container: Container) -> Self {
        Self {
            container,
            relations: RefCell::new(HashMap::new()),
            exists: Cell::new(false),
        }
    }

    /// The backing container
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Gets the value at a dotted path; see [`Container::get`]
    pub fn get(&self, path: impl AsRef<str>) -> Option<Value> {
        self.container.get(path)
    }

    /// Gets a value with automatic type conversion; see [`Container::get_as`]
    pub fn get_as<T>(&self, path: impl AsRef<str>) -> Option<T>
    where
        T: for<'v> TryFrom<&'v Value, Error = ContainerError>,
    {
        self.container.get_as(path)
    }

    /// Returns true iff the path holds a value
    pub fn has(&self, path: impl AsRef<str>) -> bool {
        self.container.has(path)
    }

    /// Sets the value at a dotted path, returning the previous value; see
    /// [`Container::set`].
    ///
    /// To store another record or collection at a key so that it becomes a
    /// loaded relation sharing storage with this entity, use
    /// [`Entity::set_relation`] / [`Entity::set_relation_list`] instead of
    /// snapshotting it through this method.
    pub fn set(&self, path: impl AsRef<str>, value: impl Into<Value>) -> crate::Result<Option<Value>> {
        Ok(self.container.set(path, value)?)
    }

    /// Deep-merges a nested structure into this entity; see
    /// [`Container::merge`]. Materialized relations stay attached because
    /// the merge recurses in place.
    pub fn merge(&self, data: impl Into<Value>) -> crate::Result<()> {
        Ok(self.container.merge(data)?)
    }

    /// Removes all top-level keys except those in `except` and those backing
    /// currently-loaded relations.
    ///
    /// This is the "discard local data" operation: materialized children
    /// keep their storage and stay attached.
    pub fn clear(&self, except: &[&str]) {
        let relations = self.relations.borrow();
        let mut preserved: Vec<&str> = except.to_vec();
        for key in relations.keys() {
            let head = key.split('.').next().unwrap_or(key.as_str());
            if !preserved.contains(&head) {
                preserved.push(head);
            }
        }
        self.container.clear(&preserved);
    }

    /// Deep snapshot as interchange data; the serialization representation
    pub fn to_structure(&self) -> serde_json::Value {
        self.container.to_structure()
    }

    /// Serializes any value to interchange data and stores it at `path`
    pub fn set_json<T: Serialize>(
        &self,
        path: impl AsRef<str>,
        value: &T,
    ) -> crate::Result<Option<Value>> {
        self.container.set_json(path, value)
    }

    /// Deserializes the value at `path` into any `Deserialize` type
    pub fn get_json<T: DeserializeOwned>(&self, path: impl AsRef<str>) -> crate::Result<T> {
        self.container.get_json(path)
    }

    /// Materializes the relation at `key` as a single child record.
    ///
    /// * Already materialized: returns the identical `Rc` (identity-stable).
    /// * Absent or null data: returns `None`, caches nothing.
    /// * Map-shaped data: constructs `T` aliasing that sub-tree, caches it
    ///   under `key` and returns it.
    /// * Anything else: a shape error — list data needs
    ///   [`Entity::relation_list`], scalar data cannot back a relation.
    pub fn relation<T: Record>(&self, key: impl AsRef<str>) -> crate::Result<Option<Rc<T>>> {
        let key = key.as_ref();
        if let Some(cached) = self.cached_any(key) {
            return downcast::<T>(cached, key).map(Some);
        }

        match self.container.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Map(node)) => {
                let child = Rc::new(T::from_node(node)?);
                self.remember(key, child.clone());
                Ok(Some(child))
            }
            Some(Value::List(_)) => Err(EntityError::RelationShape {
                key: key.to_string(),
                expected: "map",
                found: "list",
            }
            .into()),
            Some(other) => Err(EntityError::RelationShape {
                key: key.to_string(),
                expected: "map or list",
                found: other.type_name(),
            }
            .into()),
        }
    }

    /// Materializes the relation at `key` as a collection of child records.
    ///
    /// Mirrors [`Entity::relation`] with list-shaped data: every slot of the
    /// stored list is promoted into a `T` aliasing that slot.
    pub fn relation_list<T: Record>(
        &self,
        key: impl AsRef<str>,
    ) -> crate::Result<Option<Rc<Collection<T>>>> {
        let key = key.as_ref();
        if let Some(cached) = self.cached_any(key) {
            return downcast::<Collection<T>>(cached, key).map(Some);
        }

        match self.container.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::List(node)) => {
                let children = Rc::new(Collection::<T>::from_node(&node)?);
                self.remember(key, children.clone());
                Ok(Some(children))
            }
            Some(Value::Map(_)) => Err(EntityError::RelationShape {
                key: key.to_string(),
                expected: "list",
                found: "map",
            }
            .into()),
            Some(other) => Err(EntityError::RelationShape {
                key: key.to_string(),
                expected: "map or list",
                found: other.type_name(),
            }
            .into()),
        }
    }

    /// Stores `child` at `key` as an aliased reference and registers it as
    /// the loaded relation for that key.
    ///
    /// The entity's storage at `key` becomes the child's own storage (not a
    /// snapshot), so later writes on either side remain visible on both.
    pub fn set_relation<T: Record>(&self, key: impl AsRef<str>, child: Rc<T>) -> crate::Result<()> {
        let key = key.as_ref();
        let node = child.entity().container().root().clone();
        self.container.set(key, Value::Map(node))?;
        self.remember(key, child);
        Ok(())
    }

    /// Stores `children` at `key` as a list of aliased references and
    /// registers the collection as the loaded relation for that key.
    pub fn set_relation_list<T: Record>(
        &self,
        key: impl AsRef<str>,
        children: Rc<Collection<T>>,
    ) -> crate::Result<()> {
        let key = key.as_ref();
        let node = Node::list();
        for child in children.iter() {
            node.push(Value::Map(child.entity().container().root().clone()));
        }
        self.container.set(key, Value::List(node))?;
        self.remember(key, children);
        Ok(())
    }

    /// Returns true if a relation is materialized at `key`
    pub fn relation_loaded(&self, key: impl AsRef<str>) -> bool {
        self.relations.borrow().contains_key(key.as_ref())
    }

    /// The materialized relation at `key`, if it is loaded and of type `T`
    pub fn cached_relation<T: Record>(&self, key: impl AsRef<str>) -> Option<Rc<T>> {
        self.cached_any(key.as_ref())?.downcast::<T>().ok()
    }

    /// Whether this record is known to exist on its remote source.
    ///
    /// Passthrough state for the remote lifecycle; the core never reads it.
    pub fn exists(&self) -> bool {
        self.exists.get()
    }

    /// Sets the remote existence flag
    pub fn set_exists(&self, exists: bool) {
        self.exists.set(exists);
    }

    fn cached_any(&self, key: &str) -> Option<Rc<dyn Any>> {
        self.relations.borrow().get(key).cloned()
    }

    fn remember<T: Any>(&self, key: &str, child: Rc<T>) {
        self.relations
            .borrow_mut()
            .insert(key.to_string(), child as Rc<dyn Any>);
    }
}

fn downcast<T: Any>(cached: Rc<dyn Any>, key: &str) -> crate::Result<Rc<T>> {
    cached.downcast::<T>().map_err(|_| {
        EntityError::RelationType {
            key: key.to_string(),
            requested: std::any::type_name::<T>(),
        }
        .into()
    })
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut loaded: Vec<String> = self.relations.borrow().keys().cloned().collect();
        loaded.sort();
        f.debug_struct("Entity")
            .field("container", &self.container)
            .field("relations", &loaded)
            .field("exists", &self.exists.get())
            .finish()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.container)
    }
}

impl Serialize for Entity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.container.serialize(serializer)
    }
}
