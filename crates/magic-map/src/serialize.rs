//! JSON text boundary.

use std::fmt;

use serde::Serialize;
use serde_json::ser::{CompactFormatter, PrettyFormatter};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::node::{Node, Scalar};
use crate::path::join_path;

/// Per-leaf hook called with the leaf's dot path and value; its return
/// value is encoded in place of the original.
pub type Replacer<'a> = dyn Fn(&str, &Scalar) -> Scalar + 'a;

/// Options for [`to_json`].
#[derive(Clone, Copy, Default)]
pub struct SerializeOptions<'a> {
    /// Spaces per nesting level. `None` and `Some(0)` both emit compact
    /// output.
    pub indent: Option<usize>,
    pub replacer: Option<&'a Replacer<'a>>,
}

impl<'a> SerializeOptions<'a> {
    pub fn indented(width: usize) -> Self {
        Self {
            indent: Some(width),
            replacer: None,
        }
    }

    pub fn with_replacer(mut self, replacer: &'a Replacer<'a>) -> Self {
        self.replacer = Some(replacer);
        self
    }
}

impl fmt::Debug for SerializeOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializeOptions")
            .field("indent", &self.indent)
            .field("replacer", &self.replacer.map(|_| ".."))
            .finish()
    }
}

/// Parses JSON text into a wrapped tree.
pub fn from_json(text: &str) -> Result<Node> {
    let value: Value = serde_json::from_str(text)?;
    Ok(Node::wrap(value))
}

/// Encodes a tree as JSON text.
///
/// # Example
///
/// ```
/// use magic_map::{from_json, to_json, SerializeOptions};
///
/// let node = from_json(r#"{"a":[1,2]}"#).unwrap();
/// assert_eq!(to_json(&node, &SerializeOptions::default()).unwrap(), r#"{"a":[1,2]}"#);
/// assert_eq!(
///     to_json(&node, &SerializeOptions::indented(2)).unwrap(),
///     "{\n  \"a\": [\n    1,\n    2\n  ]\n}"
/// );
/// ```
pub fn to_json(node: &Node, opts: &SerializeOptions<'_>) -> Result<String> {
    let value = match opts.replacer {
        Some(replacer) => replace(node, &mut Vec::new(), replacer),
        None => node.raw(),
    };

    let mut buf = Vec::new();
    match opts.indent {
        Some(width) if width > 0 => {
            let indent = " ".repeat(width);
            let mut ser =
                serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
            value.serialize(&mut ser)?;
        }
        _ => {
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, CompactFormatter);
            value.serialize(&mut ser)?;
        }
    }
    String::from_utf8(buf).map_err(|err| <serde_json::Error as serde::ser::Error>::custom(err).into())
}

fn replace(node: &Node, path: &mut Vec<String>, replacer: &Replacer<'_>) -> Value {
    match node {
        Node::Mapping(map) => {
            let mut out = Map::new();
            for (key, child) in map {
                path.push(key.clone());
                out.insert(key.clone(), replace(child, path, replacer));
                path.pop();
            }
            Value::Object(out)
        }
        Node::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (idx, child) in items.iter().enumerate() {
                path.push(idx.to_string());
                out.push(replace(child, path, replacer));
                path.pop();
            }
            Value::Array(out)
        }
        Node::Scalar(scalar) => replacer(&join_path(path.as_slice()), scalar).to_value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MagicMapError;

    #[test]
    fn test_from_json_rejects_bad_text() {
        assert!(matches!(from_json("{not json"), Err(MagicMapError::Json(_))));
    }

    #[test]
    fn test_zero_indent_is_compact() {
        let node = from_json(r#"{"a": {"b": 1}}"#).unwrap();
        assert_eq!(to_json(&node, &SerializeOptions::indented(0)).unwrap(), r#"{"a":{"b":1}}"#);
    }

    #[test]
    fn test_four_space_indent() {
        let node = from_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(to_json(&node, &SerializeOptions::indented(4)).unwrap(), "{\n    \"a\": 1\n}");
    }

    #[test]
    fn test_replacer_sees_leaf_paths() {
        let node = from_json(r#"{"user": {"name": "Alice", "tags": ["x", "y"]}, "n": 1}"#).unwrap();
        let redact = |path: &str, scalar: &Scalar| match path {
            "user.name" => Scalar::String("***".to_string()),
            "user.tags.1" => Scalar::Null,
            _ => scalar.clone(),
        };
        let opts = SerializeOptions::default().with_replacer(&redact);
        assert_eq!(
            to_json(&node, &opts).unwrap(),
            r#"{"user":{"name":"***","tags":["x",null]},"n":1}"#
        );
    }

    #[test]
    fn test_root_scalar_replacer_gets_empty_path() {
        let node = Node::from(5);
        let seen = |path: &str, _: &Scalar| Scalar::String(format!("<{path}>"));
        let opts = SerializeOptions::default().with_replacer(&seen);
        assert_eq!(to_json(&node, &opts).unwrap(), r#""<>""#);
    }
}
