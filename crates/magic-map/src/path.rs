//! Dot-path resolution.
//!
//! A path such as `user.hobbies.0` is split on `.` and walked one segment at
//! a time. Whether a segment is a key or an index is decided by the node it
//! is applied to: mappings treat it as a key, sequences as a decimal index.
//!
//! Reads and writes are deliberately asymmetric. [`get`] indexes into
//! sequences by numeric segment, while [`set`] only ever walks and creates
//! mappings: a numeric segment under a mapping is an ordinary key, and a
//! sequence in the middle of a write path is replaced by a fresh mapping.

use tracing::{debug, trace};

use crate::error::{MagicMapError, Result};
use crate::node::{parse_index, Mapping, Node, NULL};

/// Splits a dot path into its segments. The empty path addresses the root.
///
/// # Example
///
/// ```
/// use magic_map::split_path;
///
/// assert_eq!(split_path(""), Vec::<&str>::new());
/// assert_eq!(split_path("user.profile.name"), vec!["user", "profile", "name"]);
/// assert_eq!(split_path("a..b"), vec!["a", "", "b"]);
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split('.').collect()
}

/// Joins segments back into a dot path.
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(segment.as_ref());
    }
    out
}

/// Check if a string represents a valid non-negative integer sequence index.
///
/// Leading zeros are rejected, so `"01"` never addresses element 1.
///
/// # Example
///
/// ```
/// use magic_map::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("123"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("abc"));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}

fn walk<'a>(root: &'a Node, segments: &[&str]) -> Result<&'a Node> {
    let mut current = root;
    for (i, segment) in segments.iter().enumerate() {
        current = current
            .child(segment)
            .ok_or_else(|| MagicMapError::not_found(segments, i))?;
    }
    Ok(current)
}

fn walk_mut<'a>(root: &'a mut Node, segments: &[&str]) -> Result<&'a mut Node> {
    let mut current = root;
    for (i, segment) in segments.iter().enumerate() {
        current = current
            .child_mut(segment)
            .ok_or_else(|| MagicMapError::not_found(segments, i))?;
    }
    Ok(current)
}

/// Strict lookup.
///
/// # Errors
///
/// `PathNotFound` when a mapping lacks the key, a sequence has no element at
/// the segment (or the segment is not an index), or the walk reaches a
/// scalar with segments left over.
///
/// # Example
///
/// ```
/// use magic_map::{get, MagicMapError, Node};
/// use serde_json::json;
///
/// let root = Node::wrap(json!({"user": {"hobbies": ["reading", "traveling"]}}));
/// assert_eq!(get(&root, "user.hobbies.1").unwrap().as_str(), Some("traveling"));
///
/// let err = get(&root, "user.contact.email").unwrap_err();
/// assert!(matches!(err, MagicMapError::PathNotFound { ref path, .. } if path == "user.contact"));
/// ```
pub fn get<'a>(root: &'a Node, path: &str) -> Result<&'a Node> {
    let segments = split_path(path);
    walk(root, &segments).inspect_err(|err| debug!(path, %err, "strict get failed"))
}

/// Strict mutable lookup, with the same failure rules as [`get`].
pub fn get_mut<'a>(root: &'a mut Node, path: &str) -> Result<&'a mut Node> {
    let segments = split_path(path);
    walk_mut(root, &segments)
}

/// Tolerant lookup: any traversal failure yields `default`.
pub fn get_or<'a>(root: &'a Node, path: &str, default: &'a Node) -> &'a Node {
    let segments = split_path(path);
    walk(root, &segments).unwrap_or(default)
}

/// Tolerant lookup with a null fallback.
pub fn get_or_null<'a>(root: &'a Node, path: &str) -> &'a Node {
    get_or(root, path, &NULL)
}

/// Whether `path` resolves under [`get`]'s rules.
pub fn has(root: &Node, path: &str) -> bool {
    let segments = split_path(path);
    walk(root, &segments).is_ok()
}

fn mapping_root<'a>(root: &'a mut Node) -> Result<&'a mut Mapping> {
    match root {
        Node::Mapping(map) => Ok(map),
        other => Err(MagicMapError::InvalidRoot { kind: other.kind() }),
    }
}

/// Replaces `slot` with an empty mapping unless it already is one.
fn vivify(slot: &mut Node) -> &mut Mapping {
    if !slot.is_mapping() {
        trace!(was = %slot.kind(), "replacing intermediate value with a mapping");
        *slot = Node::mapping();
    }
    match slot {
        Node::Mapping(map) => map,
        Node::Sequence(_) | Node::Scalar(_) => unreachable!("slot was just replaced by a mapping"),
    }
}

/// Writes `value` at `path`, creating intermediate mappings as needed.
///
/// Every non-final segment that is absent or holds anything other than a
/// mapping is overwritten with an empty mapping, so a write always lands.
/// Segments are always keys here; see the module docs.
///
/// # Errors
///
/// `InvalidRoot` when `root` is not a mapping, `PathNotFound` for the empty
/// path. Both are reported before anything is mutated.
///
/// # Example
///
/// ```
/// use magic_map::{get, set, Node};
/// use serde_json::json;
///
/// let mut root = Node::wrap(json!({"user": "not a mapping"}));
/// set(&mut root, "user.profile.age", 31).unwrap();
/// assert_eq!(root.raw(), json!({"user": {"profile": {"age": 31}}}));
/// ```
pub fn set(root: &mut Node, path: &str, value: impl Into<Node>) -> Result<()> {
    let mut current = mapping_root(root)?;
    let segments = split_path(path);
    let Some((last, parents)) = segments.split_last() else {
        return Err(MagicMapError::PathNotFound {
            segment: String::new(),
            path: String::new(),
        });
    };

    for segment in parents {
        let slot = current
            .entry((*segment).to_string())
            .or_insert_with(Node::mapping);
        current = vivify(slot);
    }

    debug!(path, "set");
    current.insert((*last).to_string(), value.into());
    Ok(())
}

/// Removes and returns the node at `path`.
///
/// The parent is resolved strictly; the final segment is a key when the
/// parent is a mapping and an index when it is a sequence (later elements
/// shift down).
///
/// # Errors
///
/// `InvalidRoot` when `root` is not a mapping, `PathNotFound` when the path
/// is empty or does not resolve.
pub fn remove(root: &mut Node, path: &str) -> Result<Node> {
    mapping_root(root)?;
    let segments = split_path(path);
    let Some((last, parents)) = segments.split_last() else {
        return Err(MagicMapError::PathNotFound {
            segment: String::new(),
            path: String::new(),
        });
    };
    let last_idx = parents.len();

    let removed = match walk_mut(root, parents)? {
        Node::Mapping(map) => map.shift_remove(*last),
        Node::Sequence(items) => match parse_index(last) {
            Some(idx) if idx < items.len() => Some(items.remove(idx)),
            _ => None,
        },
        Node::Scalar(_) => None,
    };
    removed.ok_or_else(|| MagicMapError::not_found(&segments, last_idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Node {
        Node::wrap(json!({
            "user": {
                "profile": {"name": "Alice", "age": 30},
                "hobbies": ["reading", "traveling"]
            }
        }))
    }

    #[test]
    fn test_get_nested() {
        let root = sample();
        assert_eq!(get(&root, "user.profile.name").unwrap().as_str(), Some("Alice"));
        assert_eq!(get(&root, "user.hobbies.0").unwrap().as_str(), Some("reading"));
        assert!(get(&root, "user.profile").unwrap().is_mapping());
    }

    #[test]
    fn test_empty_path_is_root() {
        let root = sample();
        assert_eq!(get(&root, "").unwrap(), &root);
    }

    #[test]
    fn test_get_missing_key() {
        let root = sample();
        let err = get(&root, "user.contact.email").unwrap_err();
        match err {
            MagicMapError::PathNotFound { segment, path } => {
                assert_eq!(segment, "contact");
                assert_eq!(path, "user.contact");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_get_out_of_range_index() {
        let root = sample();
        let err = get(&root, "user.hobbies.2").unwrap_err();
        assert!(matches!(err, MagicMapError::PathNotFound { ref segment, ref path }
            if segment == "2" && path == "user.hobbies.2"));
        assert!(get(&root, "user.hobbies.first").is_err());
    }

    #[test]
    fn test_get_through_scalar() {
        let root = sample();
        let err = get(&root, "user.profile.name.first").unwrap_err();
        assert!(matches!(err, MagicMapError::PathNotFound { ref segment, .. } if segment == "first"));
    }

    #[test]
    fn test_get_or_defaults() {
        let root = sample();
        let fallback = Node::from("N/A");
        assert_eq!(get_or(&root, "user.contact.email", &fallback).as_str(), Some("N/A"));
        assert_eq!(get_or(&root, "user.profile.name", &fallback).as_str(), Some("Alice"));
        assert!(get_or_null(&root, "nope.nope").is_null());
        assert!(has(&root, "user.hobbies.1"));
        assert!(!has(&root, "user.hobbies.5"));
    }

    #[test]
    fn test_get_mut_edits_in_place() {
        let mut root = sample();
        *get_mut(&mut root, "user.hobbies.1").unwrap() = Node::from("cooking");
        assert_eq!(root["user"]["hobbies"][1].as_str(), Some("cooking"));
        assert!(get_mut(&mut root, "user.hobbies.9").is_err());
    }

    #[test]
    fn test_set_overwrites_existing() {
        let mut root = sample();
        set(&mut root, "user.profile.age", 31).unwrap();
        assert_eq!(get(&root, "user.profile.age").unwrap().as_i64(), Some(31));
        let keys: Vec<_> = root["user"]["profile"].keys().collect();
        assert_eq!(keys, vec!["name", "age"]);
    }

    #[test]
    fn test_set_autovivifies() {
        let mut root = Node::mapping();
        set(&mut root, "a.b.c", json!({"d": [1]})).unwrap();
        assert_eq!(root.raw(), json!({"a": {"b": {"c": {"d": [1]}}}}));
        assert!(get(&root, "a.b.c.d").unwrap().is_sequence());
    }

    #[test]
    fn test_set_replaces_non_mapping_intermediates() {
        let mut root = sample();
        set(&mut root, "user.profile.name.first", "Alice").unwrap();
        assert_eq!(root["user"]["profile"]["name"].raw(), json!({"first": "Alice"}));
    }

    #[test]
    fn test_set_numeric_segment_is_a_key() {
        let mut root = sample();
        set(&mut root, "user.hobbies.0", "chess").unwrap();
        assert_eq!(root["user"]["hobbies"].raw(), json!({"0": "chess"}));

        let mut fresh = Node::mapping();
        set(&mut fresh, "list.0", 1).unwrap();
        assert_eq!(fresh.raw(), json!({"list": {"0": 1}}));
    }

    #[test]
    fn test_set_rejects_non_mapping_root() {
        let mut root = Node::wrap(json!([1, 2]));
        let err = set(&mut root, "0", 5).unwrap_err();
        assert!(matches!(err, MagicMapError::InvalidRoot { .. }));
        assert_eq!(root.raw(), json!([1, 2]));
    }

    #[test]
    fn test_set_empty_path() {
        let mut root = sample();
        let before = root.clone();
        assert!(matches!(set(&mut root, "", 1), Err(MagicMapError::PathNotFound { .. })));
        assert_eq!(root, before);
    }

    #[test]
    fn test_remove_from_mapping_and_sequence() {
        let mut root = sample();
        assert_eq!(remove(&mut root, "user.hobbies.0").unwrap().as_str(), Some("reading"));
        assert_eq!(root["user"]["hobbies"].raw(), json!(["traveling"]));
        assert_eq!(remove(&mut root, "user.profile.name").unwrap().as_str(), Some("Alice"));
        assert_eq!(root["user"]["profile"].raw(), json!({"age": 30}));
    }

    #[test]
    fn test_remove_missing() {
        let mut root = sample();
        let err = remove(&mut root, "user.profile.email").unwrap_err();
        assert!(matches!(err, MagicMapError::PathNotFound { ref path, .. } if path == "user.profile.email"));
        let err = remove(&mut root, "user.nothing.email").unwrap_err();
        assert!(matches!(err, MagicMapError::PathNotFound { ref path, .. } if path == "user.nothing"));
        assert!(remove(&mut root, "user.hobbies.2").is_err());
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path(&["a", "0", "b"]), "a.0.b");
        assert_eq!(join_path::<&str>(&[]), "");
    }
}
