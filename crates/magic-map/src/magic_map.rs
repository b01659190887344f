use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{MagicMapError, Result};
use crate::matcher;
use crate::node::Node;
use crate::path;
use crate::serialize::{self, SerializeOptions};
use crate::snapshot;

/// Facade owning one root [`Node`].
///
/// Reads borrow the tree, [`MagicMap::set`] mutates it in place and
/// [`MagicMap::set_immutable`] writes into a fresh deep copy.
///
/// # Example
///
/// ```
/// use magic_map::MagicMap;
/// use serde_json::json;
///
/// let mut map = MagicMap::from_raw(json!({
///     "user": {"profile": {"name": "Alice", "age": 30}, "hobbies": ["reading", "traveling"]}
/// }));
///
/// assert_eq!(map.get("user.profile.name").unwrap().as_str(), Some("Alice"));
/// assert_eq!(map["user"]["hobbies"][0].as_str(), Some("reading"));
///
/// map.set("user.profile.age", 31).unwrap();
/// assert_eq!(map.get("user.profile.age").unwrap().as_i64(), Some(31));
///
/// let renamed = map.set_immutable("user.profile.name", "Bob").unwrap();
/// assert_eq!(renamed.get("user.profile.name").unwrap().as_str(), Some("Bob"));
/// assert_eq!(map.get("user.profile.name").unwrap().as_str(), Some("Alice"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MagicMap {
    root: Node,
}

impl MagicMap {
    /// An empty mapping root.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_node(root: Node) -> Self {
        Self { root }
    }

    pub fn from_raw(value: Value) -> Self {
        Self::from_node(Node::wrap(value))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serialize::from_json(text).map(Self::from_node)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// Unwraps the whole tree.
    pub fn raw(&self) -> Value {
        self.root.raw()
    }

    pub fn into_raw(self) -> Value {
        self.root.into_raw()
    }

    /// Strict lookup; see [`path::get`].
    pub fn get(&self, path: &str) -> Result<&Node> {
        path::get(&self.root, path)
    }

    /// Lookup falling back to `default` on any traversal failure.
    pub fn get_or<'a>(&'a self, path: &str, default: &'a Node) -> &'a Node {
        path::get_or(&self.root, path, default)
    }

    /// Lookup falling back to null.
    pub fn get_or_null(&self, path: &str) -> &Node {
        path::get_or_null(&self.root, path)
    }

    pub fn get_mut(&mut self, path: &str) -> Result<&mut Node> {
        path::get_mut(&mut self.root, path)
    }

    pub fn has(&self, path: &str) -> bool {
        path::has(&self.root, path)
    }

    /// Writes in place; see [`path::set`].
    pub fn set(&mut self, path: &str, value: impl Into<Node>) -> Result<()> {
        path::set(&mut self.root, path, value)
    }

    pub fn remove(&mut self, path: &str) -> Result<Node> {
        path::remove(&mut self.root, path)
    }

    /// Writes into a deep copy and returns it as a new map. `self` is left
    /// as it was, whether or not the write succeeds.
    pub fn set_immutable(&self, path: &str, value: impl Into<Node>) -> Result<Self> {
        snapshot::set_immutable(&self.root, path, value).map(Self::from_node)
    }

    /// Every node matching a glob pattern; see [`crate::matcher`].
    pub fn get_with_glob(&self, pattern: &str) -> Result<Vec<&Node>> {
        matcher::get_with_glob(&self.root, pattern)
    }

    pub fn get_with_glob_paths(&self, pattern: &str) -> Result<Vec<(String, &Node)>> {
        matcher::get_with_glob_paths(&self.root, pattern)
    }

    /// Single-key read. `key` is taken literally, dots included.
    pub fn attr(&self, key: &str) -> Result<&Node> {
        self.root
            .child(key)
            .ok_or_else(|| MagicMapError::not_found(&[key], 0))
    }

    /// Single-key write. `key` is taken literally, dots included.
    pub fn set_attr(&mut self, key: &str, value: impl Into<Node>) -> Result<()> {
        match &mut self.root {
            Node::Mapping(map) => {
                map.insert(key.to_string(), value.into());
                Ok(())
            }
            other => Err(MagicMapError::InvalidRoot { kind: other.kind() }),
        }
    }

    pub fn to_json(&self, opts: &SerializeOptions<'_>) -> Result<String> {
        serialize::to_json(&self.root, opts)
    }

    /// Compact JSON text.
    pub fn to_json_string(&self) -> Result<String> {
        self.to_json(&SerializeOptions::default())
    }
}

impl From<Value> for MagicMap {
    fn from(value: Value) -> Self {
        Self::from_raw(value)
    }
}

impl From<Node> for MagicMap {
    fn from(root: Node) -> Self {
        Self::from_node(root)
    }
}

impl FromStr for MagicMap {
    type Err = MagicMapError;

    fn from_str(text: &str) -> Result<Self> {
        Self::from_json(text)
    }
}

impl fmt::Display for MagicMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

impl Index<&str> for MagicMap {
    type Output = Node;

    fn index(&self, key: &str) -> &Node {
        &self.root[key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> MagicMap {
        MagicMap::from_raw(json!({
            "user": {
                "profile": {"name": "Alice", "age": 30},
                "hobbies": ["reading", "traveling"]
            }
        }))
    }

    #[test]
    fn test_new_is_empty_mapping() {
        let map = MagicMap::new();
        assert!(map.root().is_mapping());
        assert_eq!(map.to_json_string().unwrap(), "{}");
    }

    #[test]
    fn test_from_json_and_display() {
        let map: MagicMap = r#"{"b": 1, "a": [true]}"#.parse().unwrap();
        assert_eq!(map.to_string(), r#"{"b":1,"a":[true]}"#);
        assert!("[1,".parse::<MagicMap>().is_err());
    }

    #[test]
    fn test_get_or_default() {
        let map = sample();
        let na = Node::from("N/A");
        assert_eq!(map.get_or("user.contact.email", &na).as_str(), Some("N/A"));
        assert!(map.get_or_null("user.contact.email").is_null());
    }

    #[test]
    fn test_strict_get_failure() {
        let map = sample();
        let err = map.get("user.contact.email").unwrap_err();
        assert!(matches!(err, MagicMapError::PathNotFound { ref segment, ref path }
            if segment == "contact" && path == "user.contact"));
    }

    #[test]
    fn test_attr_access() {
        let mut map = sample();
        assert!(map.attr("user").unwrap().is_mapping());
        assert!(map.attr("nobody").is_err());

        map.set_attr("dotted.key", 1).unwrap();
        assert_eq!(map.attr("dotted.key").unwrap().as_i64(), Some(1));
        assert!(!map.has("dotted.key"));
        assert_eq!(map["dotted.key"].as_i64(), Some(1));
    }

    #[test]
    fn test_set_attr_requires_mapping_root() {
        let mut map = MagicMap::from_raw(json!("scalar"));
        assert!(matches!(
            map.set_attr("a", 1),
            Err(MagicMapError::InvalidRoot { .. })
        ));
    }

    #[test]
    fn test_set_immutable_snapshot() {
        let map = sample();
        let next = map.set_immutable("user.profile.name", "Bob").unwrap();
        assert_eq!(map["user"]["profile"]["name"].as_str(), Some("Alice"));
        assert_eq!(next["user"]["profile"]["name"].as_str(), Some("Bob"));
        assert_eq!(next["user"]["hobbies"], map["user"]["hobbies"]);
    }

    #[test]
    fn test_glob_through_facade() {
        let map = sample();
        let names = map.get_with_glob("user.*.name").unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].as_str(), Some("Alice"));
    }

    #[test]
    fn test_to_json_indented() {
        let map = MagicMap::from_raw(json!({"a": 1}));
        assert_eq!(map.to_json(&SerializeOptions::indented(2)).unwrap(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_remove_and_raw() {
        let mut map = sample();
        map.remove("user.hobbies").unwrap();
        assert_eq!(
            map.into_raw(),
            json!({"user": {"profile": {"name": "Alice", "age": 30}}})
        );
    }
}
