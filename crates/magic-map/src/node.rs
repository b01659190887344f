//! Tagged tree values and the wrap/unwrap conversions against
//! [`serde_json::Value`].

use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::path::is_valid_index;

/// Ordered key -> node mapping backing [`Node::Mapping`].
pub type Mapping = IndexMap<String, Node>;

pub(crate) static NULL: Node = Node::null();

/// Opaque leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Converts the scalar back into its raw JSON form.
    pub fn to_value(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Number(n) => Value::Number(n.clone()),
            Scalar::String(s) => Value::String(s.clone()),
        }
    }
}

/// The three shapes a tree value can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Mapping,
    Sequence,
    Scalar,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Mapping => "mapping",
            NodeKind::Sequence => "sequence",
            NodeKind::Scalar => "scalar",
        })
    }
}

/// A wrapped tree value.
///
/// Children of a mapping or sequence are always nodes themselves, so a tree
/// built through [`Node::wrap`] or any of the `From` impls is wrapped all the
/// way down.
///
/// # Example
///
/// ```
/// use magic_map::Node;
/// use serde_json::json;
///
/// let raw = json!({"user": {"hobbies": ["reading", "traveling"]}});
/// let node = Node::wrap(raw.clone());
/// assert_eq!(node["user"]["hobbies"][1].as_str(), Some("traveling"));
/// assert_eq!(node.raw(), raw);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Node {
    Mapping(Mapping),
    Sequence(Vec<Node>),
    Scalar(Scalar),
}

impl Node {
    /// An empty mapping node.
    pub fn mapping() -> Self {
        Node::Mapping(Mapping::new())
    }

    pub const fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    /// Wraps a raw JSON value, recursing into objects and arrays.
    pub fn wrap(value: Value) -> Self {
        match value {
            Value::Object(map) => Node::Mapping(
                map.into_iter()
                    .map(|(key, val)| (key, Node::wrap(val)))
                    .collect(),
            ),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::wrap).collect()),
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n)),
            Value::String(s) => Node::Scalar(Scalar::String(s)),
        }
    }

    /// Depth-first unwrap back into a raw JSON value.
    pub fn raw(&self) -> Value {
        match self {
            Node::Mapping(map) => Value::Object(
                map.iter()
                    .map(|(key, val)| (key.clone(), val.raw()))
                    .collect::<Map<String, Value>>(),
            ),
            Node::Sequence(items) => Value::Array(items.iter().map(Node::raw).collect()),
            Node::Scalar(scalar) => scalar.to_value(),
        }
    }

    /// Consuming variant of [`Node::raw`].
    pub fn into_raw(self) -> Value {
        match self {
            Node::Mapping(map) => Value::Object(
                map.into_iter()
                    .map(|(key, val)| (key, val.into_raw()))
                    .collect::<Map<String, Value>>(),
            ),
            Node::Sequence(items) => Value::Array(items.into_iter().map(Node::into_raw).collect()),
            Node::Scalar(scalar) => scalar.to_value(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Mapping(_) => NodeKind::Mapping,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::Scalar(_) => NodeKind::Scalar,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Scalar(Scalar::Number(n)) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Node::Scalar(Scalar::Number(n)) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Scalar(Scalar::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    /// Number of direct children. Scalars have none.
    pub fn len(&self) -> usize {
        match self {
            Node::Mapping(map) => map.len(),
            Node::Sequence(items) => items.len(),
            Node::Scalar(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys of a mapping in insertion order; empty for anything else.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.as_mapping()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    /// Resolves one path segment against this node.
    ///
    /// Mappings look the segment up as a key, sequences parse it as a
    /// canonical decimal index, scalars have no children.
    pub fn child(&self, segment: &str) -> Option<&Node> {
        match self {
            Node::Mapping(map) => map.get(segment),
            Node::Sequence(items) => parse_index(segment).and_then(|idx| items.get(idx)),
            Node::Scalar(_) => None,
        }
    }

    pub fn child_mut(&mut self, segment: &str) -> Option<&mut Node> {
        match self {
            Node::Mapping(map) => map.get_mut(segment),
            Node::Sequence(items) => parse_index(segment).and_then(|idx| items.get_mut(idx)),
            Node::Scalar(_) => None,
        }
    }
}

pub(crate) fn parse_index(segment: &str) -> Option<usize> {
    if !is_valid_index(segment) {
        return None;
    }
    segment.parse().ok()
}

impl Default for Node {
    fn default() -> Self {
        Node::mapping()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.raw()).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Indexing a node returns a shared null node for a missing key, an
/// out-of-range index or a scalar, the way `serde_json::Value` does.
impl Index<&str> for Node {
    type Output = Node;

    fn index(&self, key: &str) -> &Node {
        self.child(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for Node {
    type Output = Node;

    fn index(&self, idx: usize) -> &Node {
        match self {
            Node::Sequence(items) => items.get(idx).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::wrap(value)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        node.into_raw()
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        node.raw()
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Node::Mapping(map)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(items: Vec<T>) -> Self {
        Node::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Node::null, Into::into)
    }
}

impl From<()> for Node {
    fn from(_: ()) -> Self {
        Node::null()
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Bool(b))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(Scalar::String(s))
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::String(s.to_string()))
    }
}

/// Non-finite floats have no JSON representation and become null.
impl From<f64> for Node {
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or_else(Node::null, |n| Node::Scalar(Scalar::Number(n)))
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Node {
                fn from(n: $ty) -> Self {
                    Node::Scalar(Scalar::Number(Number::from(n)))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
