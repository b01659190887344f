//! Deep copies for copy-on-write edits.
//!
//! There is no structural sharing: every immutable edit copies the whole
//! tree, so its cost is linear in the node count.

use tracing::debug;

use crate::error::Result;
use crate::node::Node;
use crate::path;

/// Creates a deep clone of a node tree.
///
/// The copy shares no mapping or sequence with `node`; scalars are copied by
/// value.
///
/// # Example
///
/// ```
/// use magic_map::{deep_clone, Node};
/// use serde_json::json;
///
/// let original = Node::wrap(json!({"foo": [1, 2, 3]}));
/// let cloned = deep_clone(&original);
/// assert_eq!(original, cloned);
/// ```
pub fn deep_clone(node: &Node) -> Node {
    match node {
        Node::Mapping(map) => Node::Mapping(
            map.iter()
                .map(|(key, val)| (key.clone(), deep_clone(val)))
                .collect(),
        ),
        Node::Sequence(items) => Node::Sequence(items.iter().map(deep_clone).collect()),
        Node::Scalar(scalar) => Node::Scalar(scalar.clone()),
    }
}

/// Clones `root`, applies [`path::set`] to the clone and returns it.
///
/// `root` is never touched, including when the write fails.
pub fn set_immutable(root: &Node, path: &str, value: impl Into<Node>) -> Result<Node> {
    let mut copy = deep_clone(root);
    path::set(&mut copy, path, value)?;
    debug!(path, nodes = count_nodes(&copy), "set on snapshot");
    Ok(copy)
}

/// Total number of nodes in the tree, including the root.
pub fn count_nodes(node: &Node) -> usize {
    1 + match node {
        Node::Mapping(map) => map.values().map(count_nodes).sum::<usize>(),
        Node::Sequence(items) => items.iter().map(count_nodes).sum::<usize>(),
        Node::Scalar(_) => 0,
    }
}
