//! Value types for nested containers.
//!
//! [`Value`] represents everything that can be stored in a container cell.
//! Scalars (`Null`, `Bool`, `Int`, `Float`, `Text`) are terminal and stored
//! by value. Branches (`Map`, `List`) carry a live [`Node`] handle: cloning
//! a branch value clones the handle, not the storage, so a `Value` read out
//! of a container is itself an aliasable reference into that container.
//!
//! `Null` is a present value; absence is expressed as `Option::None` by the
//! lookup operations, never as a `Value`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::ContainerError;
use super::node::Node;

/// A single container cell: a scalar, or a shared handle to a branch node.
///
/// # Direct comparisons
///
/// `Value` implements `PartialEq` against primitives for ergonomic use in
/// assertions and predicates:
///
/// ```
/// # use tether::Value;
/// let text = Value::Text("hello".to_string());
/// let number = Value::Int(42);
///
/// assert!(text == "hello");
/// assert!(number == 42);
/// assert!(!(number == "hello"));
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value, distinct from absence
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text string value
    Text(String),
    /// Shared handle to a string-keyed map node
    Map(Node),
    /// Shared handle to an ordered list node
    List(Node),
}

impl Value {
    /// Returns true if this is a scalar (terminal) value
    pub fn is_scalar(&self) -> bool {
        !self.is_branch()
    }

    /// Returns true if this value carries a branch node handle
    pub fn is_branch(&self) -> bool {
        matches!(self, Value::Map(_) | Value::List(_))
    }

    /// Returns true if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Map(_) => "map",
            Value::List(_) => "list",
        }
    }

    /// Attempts to convert to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a float; integers widen losslessly
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Attempts to convert to a string slice
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the node handle if this is a branch value
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Map(node) | Value::List(node) => Some(node),
            _ => None,
        }
    }

    /// Returns the node handle if this is a map value
    pub fn as_map(&self) -> Option<&Node> {
        match self {
            Value::Map(node) => Some(node),
            _ => None,
        }
    }

    /// Returns the node handle if this is a list value
    pub fn as_list(&self) -> Option<&Node> {
        match self {
            Value::List(node) => Some(node),
            _ => None,
        }
    }

    /// Deep snapshot of this value as interchange data.
    ///
    /// Branch handles are dereferenced; the result is a tree that no longer
    /// aliases any container storage.
    pub fn to_structure(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::Number((*n).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Map(node) | Value::List(node) => node.to_structure(),
        }
    }

    /// Deep copy of this value into fresh storage, sharing nothing with the
    /// original.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::Map(node) => Value::Map(node.deep_copy()),
            Value::List(node) => Value::List(node.deep_copy()),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Map(node) | Value::List(node) => write!(f, "{node}"),
        }
    }
}

// Structural equality; branch handles pointing at the same storage compare
// equal without recursing.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Map(a), Value::Map(b)) | (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

// Convenient From implementations for common types
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        if node.is_list() {
            Value::List(node)
        } else {
            Value::Map(node)
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

// Interchange data builds fresh storage: converting a `serde_json::Value`
// never aliases anything.
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                let node = Node::list();
                for item in items {
                    node.push(Value::from(item));
                }
                Value::List(node)
            }
            serde_json::Value::Object(entries) => {
                let node = Node::map();
                for (key, item) in entries {
                    node.insert_key(key, Value::from(item));
                }
                Value::Map(node)
            }
        }
    }
}

// TryFrom implementations for type coercion via `get_as`
impl TryFrom<&Value> for String {
    type Error = ContainerError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            _ => Err(ContainerError::TypeMismatch {
                expected: "text",
                found: value.type_name(),
            }),
        }
    }
}

impl<'a> TryFrom<&'a Value> for &'a str {
    type Error = ContainerError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(s) => Ok(s),
            _ => Err(ContainerError::TypeMismatch {
                expected: "text",
                found: value.type_name(),
            }),
        }
    }
}

impl TryFrom<&Value> for i64 {
    type Error = ContainerError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_int().ok_or(ContainerError::TypeMismatch {
            expected: "int",
            found: value.type_name(),
        })
    }
}

impl TryFrom<&Value> for f64 {
    type Error = ContainerError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_float().ok_or(ContainerError::TypeMismatch {
            expected: "float",
            found: value.type_name(),
        })
    }
}

impl TryFrom<&Value> for bool {
    type Error = ContainerError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_bool().ok_or(ContainerError::TypeMismatch {
            expected: "bool",
            found: value.type_name(),
        })
    }
}

// PartialEq implementations for comparing Value with primitives
impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        match self {
            Value::Text(s) => s == other,
            _ => false,
        }
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        match self {
            Value::Int(n) => n == other,
            _ => false,
        }
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        match self {
            Value::Bool(b) => b == other,
            _ => false,
        }
    }
}

// Reverse implementations for symmetry
impl PartialEq<Value> for str {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        other == *self
    }
}

impl PartialEq<Value> for String {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for i64 {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for bool {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

// Serialization is the snapshot: branch handles serialize their current
// contents, so the output is always a tree.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Map(node) | Value::List(node) => node.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(Value::from(raw))
    }
}
