//! Shared storage cells for nested containers.
//!
//! A [`Node`] is one map or list cell behind a reference-counted,
//! interior-mutable handle. Cloning a node clones the handle: every clone
//! reads and writes the same storage, which is what lets a child entity
//! alias a sub-tree of its parent without copying. This is the aliasing
//! primitive the rest of the crate is built on.
//!
//! Nodes are deliberately not thread-safe (`Rc`/`RefCell`); a node graph
//! belongs to one logical thread of control.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Serialize, Serializer};

use super::path;
use super::value::Value;

/// A shared handle to one map or list storage cell.
#[derive(Debug, Clone)]
pub struct Node {
    storage: Rc<RefCell<Storage>>,
}

#[derive(Debug)]
enum Storage {
    Map(HashMap<String, Value>),
    List(Vec<Value>),
}

impl Node {
    /// Creates a new empty map node
    pub fn map() -> Self {
        Self {
            storage: Rc::new(RefCell::new(Storage::Map(HashMap::new()))),
        }
    }

    /// Creates a new empty list node
    pub fn list() -> Self {
        Self {
            storage: Rc::new(RefCell::new(Storage::List(Vec::new()))),
        }
    }

    /// Returns true if this node holds a map
    pub fn is_map(&self) -> bool {
        matches!(*self.storage.borrow(), Storage::Map(_))
    }

    /// Returns true if this node holds a list
    pub fn is_list(&self) -> bool {
        matches!(*self.storage.borrow(), Storage::List(_))
    }

    /// Returns the node kind as a string, `"map"` or `"list"`
    pub fn kind(&self) -> &'static str {
        if self.is_map() { "map" } else { "list" }
    }

    /// Returns the number of entries or elements
    pub fn len(&self) -> usize {
        match &*self.storage.borrow() {
            Storage::Map(entries) => entries.len(),
            Storage::List(elements) => elements.len(),
        }
    }

    /// Returns true if the node has no entries or elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if both handles point at the same storage cell
    pub fn same(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.storage, &other.storage)
    }

    /// Gets the value for a map key.
    ///
    /// # Panics
    /// Panics when called on a list node; picking the wrong accessor for a
    /// node kind is a programming error, like a malformed path.
    pub fn get_key(&self, key: &str) -> Option<Value> {
        match &*self.storage.borrow() {
            Storage::Map(entries) => entries.get(key).cloned(),
            Storage::List(_) => panic!("get_key on a list node"),
        }
    }

    /// Inserts a map entry, returning the previous value if present.
    ///
    /// # Panics
    /// Panics when called on a list node.
    pub fn insert_key(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        match &mut *self.storage.borrow_mut() {
            Storage::Map(entries) => entries.insert(key.into(), value.into()),
            Storage::List(_) => panic!("insert_key on a list node"),
        }
    }

    /// Removes a map entry, returning it if present.
    ///
    /// # Panics
    /// Panics when called on a list node.
    pub fn remove_key(&self, key: &str) -> Option<Value> {
        match &mut *self.storage.borrow_mut() {
            Storage::Map(entries) => entries.remove(key),
            Storage::List(_) => panic!("remove_key on a list node"),
        }
    }

    /// Returns true if the map contains the given key
    pub fn contains_key(&self, key: &str) -> bool {
        match &*self.storage.borrow() {
            Storage::Map(entries) => entries.contains_key(key),
            Storage::List(_) => false,
        }
    }

    /// Snapshot of the map keys.
    ///
    /// # Panics
    /// Panics when called on a list node.
    pub fn keys(&self) -> Vec<String> {
        match &*self.storage.borrow() {
            Storage::Map(entries) => entries.keys().cloned().collect(),
            Storage::List(_) => panic!("keys on a list node"),
        }
    }

    /// Snapshot of the map entries.
    ///
    /// # Panics
    /// Panics when called on a list node.
    pub fn entries(&self) -> Vec<(String, Value)> {
        match &*self.storage.borrow() {
            Storage::Map(entries) => entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            Storage::List(_) => panic!("entries on a list node"),
        }
    }

    /// Gets the value at a list index.
    ///
    /// # Panics
    /// Panics when called on a map node.
    pub fn get_index(&self, index: usize) -> Option<Value> {
        match &*self.storage.borrow() {
            Storage::List(elements) => elements.get(index).cloned(),
            Storage::Map(_) => panic!("get_index on a map node"),
        }
    }

    /// Overwrites the value at an existing list index, returning the previous
    /// value; returns `None` without writing when the index is out of bounds.
    ///
    /// # Panics
    /// Panics when called on a map node.
    pub fn set_index(&self, index: usize, value: impl Into<Value>) -> Option<Value> {
        match &mut *self.storage.borrow_mut() {
            Storage::List(elements) => {
                let slot = elements.get_mut(index)?;
                Some(std::mem::replace(slot, value.into()))
            }
            Storage::Map(_) => panic!("set_index on a map node"),
        }
    }

    /// Appends a value to a list node.
    ///
    /// # Panics
    /// Panics when called on a map node.
    pub fn push(&self, value: impl Into<Value>) {
        match &mut *self.storage.borrow_mut() {
            Storage::List(elements) => elements.push(value.into()),
            Storage::Map(_) => panic!("push on a map node"),
        }
    }

    /// Snapshot of the list elements.
    ///
    /// # Panics
    /// Panics when called on a map node.
    pub fn elements(&self) -> Vec<Value> {
        match &*self.storage.borrow() {
            Storage::List(elements) => elements.clone(),
            Storage::Map(_) => panic!("elements on a map node"),
        }
    }

    /// Replaces the contents of a list node in place, keeping the node
    /// identity (and therefore every alias of it) intact.
    ///
    /// # Panics
    /// Panics when called on a map node.
    pub fn replace_elements(&self, values: Vec<Value>) {
        match &mut *self.storage.borrow_mut() {
            Storage::List(elements) => *elements = values,
            Storage::Map(_) => panic!("replace_elements on a map node"),
        }
    }

    /// Resolves one path segment against this node: a key on maps, a parsed
    /// index on lists.
    pub(crate) fn child(&self, segment: &str) -> Option<Value> {
        match &*self.storage.borrow() {
            Storage::Map(entries) => entries.get(segment).cloned(),
            Storage::List(elements) => {
                let index = path::index(segment)?;
                elements.get(index).cloned()
            }
        }
    }

    /// Deep copy into fresh storage, sharing nothing with this node
    pub fn deep_copy(&self) -> Node {
        match &*self.storage.borrow() {
            Storage::Map(entries) => {
                let copy = Node::map();
                for (key, value) in entries {
                    copy.insert_key(key.clone(), value.deep_copy());
                }
                copy
            }
            Storage::List(elements) => {
                let copy = Node::list();
                for value in elements {
                    copy.push(value.deep_copy());
                }
                copy
            }
        }
    }

    /// Deep snapshot of this node as interchange data
    pub fn to_structure(&self) -> serde_json::Value {
        match &*self.storage.borrow() {
            Storage::Map(entries) => {
                let mut out = serde_json::Map::new();
                for (key, value) in entries {
                    out.insert(key.clone(), value.to_structure());
                }
                serde_json::Value::Object(out)
            }
            Storage::List(elements) => {
                serde_json::Value::Array(elements.iter().map(Value::to_structure).collect())
            }
        }
    }
}

// Structural equality, with a pointer fast path for aliased handles.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        if self.same(other) {
            return true;
        }
        match (&*self.storage.borrow(), &*other.storage.borrow()) {
            (Storage::Map(a), Storage::Map(b)) => a == b,
            (Storage::List(a), Storage::List(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.storage.borrow() {
            Storage::Map(entries) => {
                write!(f, "{{")?;
                let mut first = true;
                for (key, value) in entries {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                    first = false;
                }
                write!(f, "}}")
            }
            Storage::List(elements) => {
                write!(f, "[")?;
                for (i, value) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::{SerializeMap, SerializeSeq};

        match &*self.storage.borrow() {
            Storage::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Storage::List(elements) => {
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for value in elements {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
        }
    }
}
