//! Nested, dotted-path-addressable key/value storage.
//!
//! A [`Container`] wraps one root [`Node`] and resolves dotted paths
//! (`"a.b.0.c"`) against the nested maps and lists below it. Containers are
//! cheap handles: cloning one, or constructing one with
//! [`Container::from_node`], shares the underlying storage, and a write
//! through any handle is immediately visible through all of them. That
//! shared-mutable behavior is the point: it is what keeps a parent record
//! and its promoted children synchronized without a sync step.
//!
//! Absence is a normal, silent outcome (`None`); data of the wrong shape is
//! a [`ContainerError`] and is never coerced. Malformed paths panic, see
//! [`path`].
//!
//! # Examples
//!
//! ```
//! use tether::Container;
//! use serde_json::json;
//!
//! let container = Container::from_value(json!({"user": {"name": "Alice"}})).unwrap();
//! container.set("user.age", 30).unwrap();
//!
//! assert_eq!(container.get_as::<i64>("user.age"), Some(30));
//! assert_eq!(container.get_as::<String>("user.name"), Some("Alice".to_string()));
//! assert!(container.get("user.missing").is_none());
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned};

pub mod errors;
pub mod node;
pub mod path;
pub mod value;

pub use errors::ContainerError;
pub use node::Node;
pub use value::Value;

/// Nested key/value storage addressed by dotted paths.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    root: Node,
}

impl Container {
    /// Creates a new container with an empty map root
    pub fn new() -> Self {
        Self { root: Node::map() }
    }

    /// Creates a container from an initial nested structure.
    ///
    /// The structure must be map- or list-shaped at the root. Interchange
    /// data (`serde_json::Value`) always builds fresh storage; passing a
    /// branch [`Value`] shares its node.
    pub fn from_value(data: impl Into<Value>) -> Result<Self, ContainerError> {
        match data.into() {
            Value::Map(node) | Value::List(node) => Ok(Self { root: node }),
            other => Err(ContainerError::ShapeMismatch {
                path: "(root)".to_string(),
                expected: "map or list",
                found: other.type_name(),
            }),
        }
    }

    /// Creates a container over existing shared storage.
    ///
    /// The new container aliases `node`: writes through either owner are
    /// visible through both. This is the constructor relation promotion is
    /// built on.
    pub fn from_node(node: Node) -> Self {
        Self { root: node }
    }

    /// The root storage node
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Resolves a dotted path to the value stored there.
    ///
    /// Returns `None` when any segment is missing or traverses data of the
    /// wrong shape; no side effects. A returned [`Value::Map`] or
    /// [`Value::List`] carries a live node handle and may be retained to
    /// mutate the underlying cell or to root another container.
    ///
    /// # Panics
    /// Panics on a malformed path (empty, or with empty segments).
    pub fn get(&self, path: impl AsRef<str>) -> Option<Value> {
        let segments: Vec<&str> = path::segments(path.as_ref()).collect();
        let mut node = self.root.clone();

        for (i, segment) in segments.iter().enumerate() {
            let value = node.child(segment)?;
            if i + 1 == segments.len() {
                return Some(value);
            }
            match value {
                Value::Map(next) | Value::List(next) => node = next,
                _ => return None,
            }
        }
        None
    }

    /// Gets a value with automatic type conversion.
    ///
    /// Returns `None` if the path is absent or the value cannot convert.
    ///
    /// ```
    /// # use tether::Container;
    /// # use serde_json::json;
    /// let container = Container::from_value(json!({"n": 7})).unwrap();
    /// assert_eq!(container.get_as::<i64>("n"), Some(7));
    /// assert_eq!(container.get_as::<String>("n"), None);
    /// ```
    pub fn get_as<T>(&self, path: impl AsRef<str>) -> Option<T>
    where
        T: for<'v> TryFrom<&'v Value, Error = ContainerError>,
    {
        let value = self.get(path)?;
        T::try_from(&value).ok()
    }

    /// Gets the shared node handle at a path, if the value there is a branch.
    ///
    /// Returns `None` both for absent paths and for scalar values; use
    /// [`Container::get`] when the distinction matters.
    pub fn node(&self, path: impl AsRef<str>) -> Option<Node> {
        self.get(path)?.as_node().cloned()
    }

    /// Returns true iff `get` would return a value
    pub fn has(&self, path: impl AsRef<str>) -> bool {
        self.get(path).is_some()
    }

    /// Sets the value at a dotted path, returning the previous value.
    ///
    /// Intermediate maps are created for missing segments. Lists are never
    /// created or grown implicitly: a list index in the path must already
    /// exist. Traversal through a scalar is a shape-mismatch error.
    ///
    /// # Panics
    /// Panics on a malformed path.
    pub fn set(
        &self,
        path: impl AsRef<str>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, ContainerError> {
        let path = path.as_ref();
        let segments: Vec<&str> = path::segments(path).collect();
        let mut node = self.root.clone();

        for (i, segment) in segments[..segments.len() - 1].iter().enumerate() {
            match node.child(segment) {
                Some(Value::Map(next)) | Some(Value::List(next)) => node = next,
                Some(other) => {
                    return Err(ContainerError::ShapeMismatch {
                        path: segments[..=i].join("."),
                        expected: "map or list",
                        found: other.type_name(),
                    });
                }
                None => {
                    if node.is_list() {
                        return Err(match path::index(segment) {
                            Some(index) => ContainerError::IndexOutOfBounds {
                                path: segments[..=i].join("."),
                                index,
                                len: node.len(),
                            },
                            None => ContainerError::ShapeMismatch {
                                path: segments[..=i].join("."),
                                expected: "list index",
                                found: "key",
                            },
                        });
                    }
                    let fresh = Node::map();
                    node.insert_key(*segment, Value::Map(fresh.clone()));
                    node = fresh;
                }
            }
        }

        let last = *segments.last().expect("validated path has a last segment");
        if node.is_map() {
            Ok(node.insert_key(last, value))
        } else {
            match path::index(last) {
                Some(index) => {
                    let len = node.len();
                    node.set_index(index, value)
                        .map(Some)
                        .ok_or(ContainerError::IndexOutOfBounds {
                            path: path.to_string(),
                            index,
                            len,
                        })
                }
                None => Err(ContainerError::ShapeMismatch {
                    path: path.to_string(),
                    expected: "list index",
                    found: "key",
                }),
            }
        }
    }

    /// Removes all top-level entries except those named in `except`.
    ///
    /// On a list-rooted container the list is emptied; `except` names keys
    /// and does not apply.
    pub fn clear(&self, except: &[&str]) {
        if self.root.is_map() {
            for key in self.root.keys() {
                if !except.contains(&key.as_str()) {
                    self.root.remove_key(&key);
                }
            }
        } else {
            self.root.replace_elements(Vec::new());
        }
    }

    /// Deep-merges a nested structure into this container.
    ///
    /// Existing keys are overwritten, new keys are added, and keys absent
    /// from `data` are left alone. Where both sides are maps the merge
    /// recurses **in place**, and where both sides are lists the existing
    /// list node is refilled in place: node identity is preserved, so
    /// children aliasing those nodes stay attached and observe the merge.
    pub fn merge(&self, data: impl Into<Value>) -> Result<(), ContainerError> {
        match data.into() {
            Value::Map(incoming) if self.root.is_map() => {
                merge_nodes(&self.root, &incoming);
                Ok(())
            }
            Value::List(incoming) if self.root.is_list() => {
                self.root.replace_elements(incoming.elements());
                Ok(())
            }
            other => Err(ContainerError::ShapeMismatch {
                path: "(root)".to_string(),
                expected: self.root.kind(),
                found: other.type_name(),
            }),
        }
    }

    /// Deep snapshot of the container as interchange data.
    ///
    /// The snapshot is a tree: shared nodes in the live graph are expanded,
    /// and the result aliases nothing.
    pub fn to_structure(&self) -> serde_json::Value {
        self.root.to_structure()
    }

    /// Snapshot of the top-level keys of a map-rooted container
    pub fn keys(&self) -> Vec<String> {
        if self.root.is_map() {
            self.root.keys()
        } else {
            Vec::new()
        }
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Returns true if the container holds no data
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Serializes any value to interchange data and stores it at `path`
    pub fn set_json<T>(&self, path: impl AsRef<str>, value: &T) -> crate::Result<Option<Value>>
    where
        T: Serialize,
    {
        let raw = serde_json::to_value(value)?;
        self.set(path, Value::from(raw)).map_err(Into::into)
    }

    /// Deserializes the value at `path` into any `Deserialize` type
    pub fn get_json<T>(&self, path: impl AsRef<str>) -> crate::Result<T>
    where
        T: DeserializeOwned,
    {
        let value = self
            .get(path.as_ref())
            .ok_or_else(|| ContainerError::NotFound {
                path: path.as_ref().to_string(),
            })?;
        serde_json::from_value(value.to_structure()).map_err(Into::into)
    }
}

fn merge_nodes(target: &Node, incoming: &Node) {
    for (key, value) in incoming.entries() {
        match (target.get_key(&key), value) {
            (Some(Value::Map(existing)), Value::Map(new)) => merge_nodes(&existing, &new),
            (Some(Value::List(existing)), Value::List(new)) => {
                existing.replace_elements(new.elements());
            }
            (_, value) => {
                target.insert_key(key, value);
            }
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl Serialize for Container {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.root.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Container {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Container::from_value(raw).map_err(serde::de::Error::custom)
    }
}
