//! Wildcard queries over a whole tree.
//!
//! A pattern is a dot path whose segments may be:
//!
//! - a literal, equal to the key (or decimal index) at that depth,
//! - a glob segment such as `*`, `user_*` or `item[0-3]`, matching exactly
//!   one key or index at that depth with shell glob rules,
//! - `**`, matching zero or more levels.
//!
//! Candidate paths render sequence elements by bare index, so
//! `user.hobbies.*` and `user.hobbies.1` both address sequence elements.
//! Every non-root node is a candidate and matched independently; a node
//! and one of its descendants can both be reported.

use glob::Pattern;
use tracing::trace;

use crate::error::{MagicMapError, Result};
use crate::node::Node;
use crate::path::{join_path, split_path};

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Wildcard(Pattern),
    AnyDepth,
}

impl Segment {
    fn parse(segment: &str, pattern: &str) -> Result<Self> {
        if segment == "**" {
            return Ok(Segment::AnyDepth);
        }
        if !segment.contains(['*', '?', '[']) {
            return Ok(Segment::Literal(segment.to_string()));
        }
        Pattern::new(segment)
            .map(Segment::Wildcard)
            .map_err(|err| MagicMapError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: err.to_string(),
            })
    }

    fn matches(&self, segment: &str) -> bool {
        match self {
            Segment::Literal(literal) => literal == segment,
            Segment::Wildcard(pattern) => pattern.matches(segment),
            Segment::AnyDepth => true,
        }
    }
}

/// A compiled dot-glob pattern.
///
/// # Example
///
/// ```
/// use magic_map::{GlobPattern, Node};
/// use serde_json::json;
///
/// let root = Node::wrap(json!({"a": {"x": 1, "y": {"x": 2}}}));
///
/// let one_level = GlobPattern::compile("a.*").unwrap();
/// assert_eq!(one_level.select(&root).len(), 2);
///
/// let any_depth = GlobPattern::compile("**.x").unwrap();
/// let found: Vec<_> = any_depth.select(&root).iter().filter_map(|n| n.as_i64()).collect();
/// assert_eq!(found, vec![1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    segments: Vec<Segment>,
}

impl GlobPattern {
    /// Compiles `pattern`.
    ///
    /// Runs of `**` collapse into one since they match the same paths.
    ///
    /// # Errors
    ///
    /// `InvalidPattern` when a glob segment is malformed, e.g. an unclosed
    /// `[` or a `**` that does not stand alone in its segment.
    pub fn compile(pattern: &str) -> Result<Self> {
        let mut segments: Vec<Segment> = Vec::new();
        for raw in split_path(pattern) {
            let segment = Segment::parse(raw, pattern)?;
            if matches!(segment, Segment::AnyDepth) && matches!(segments.last(), Some(Segment::AnyDepth)) {
                continue;
            }
            segments.push(segment);
        }
        trace!(pattern, segments = segments.len(), "compiled glob");
        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Depth every match has, or `None` when the pattern contains `**`.
    pub fn fixed_depth(&self) -> Option<usize> {
        if self.segments.iter().any(|s| matches!(s, Segment::AnyDepth)) {
            None
        } else {
            Some(self.segments.len())
        }
    }

    /// Tests a path, given as its segments, against the pattern.
    pub fn matches<S: AsRef<str>>(&self, path: &[S]) -> bool {
        match_from(&self.segments, path)
    }

    /// Same as [`GlobPattern::matches`] for a dot path string.
    pub fn matches_path(&self, path: &str) -> bool {
        self.matches(split_path(path).as_slice())
    }

    /// Every matching node in depth-first pre-order.
    pub fn select<'a>(&self, root: &'a Node) -> Vec<&'a Node> {
        let mut out = Vec::new();
        self.walk(root, &mut Vec::new(), &mut |_, node| out.push(node));
        out
    }

    /// Like [`GlobPattern::select`], paired with each match's dot path.
    pub fn select_with_paths<'a>(&self, root: &'a Node) -> Vec<(String, &'a Node)> {
        let mut out = Vec::new();
        self.walk(root, &mut Vec::new(), &mut |path, node| {
            out.push((join_path(path), node))
        });
        out
    }

    fn walk<'a, F>(&self, node: &'a Node, path: &mut Vec<String>, emit: &mut F)
    where
        F: FnMut(&[String], &'a Node),
    {
        // Nothing below this depth can match a fixed-depth pattern.
        if self.fixed_depth().is_some_and(|depth| path.len() >= depth) {
            return;
        }
        match node {
            Node::Mapping(map) => {
                for (key, child) in map {
                    path.push(key.clone());
                    self.visit(child, path, emit);
                    path.pop();
                }
            }
            Node::Sequence(items) => {
                for (idx, child) in items.iter().enumerate() {
                    path.push(idx.to_string());
                    self.visit(child, path, emit);
                    path.pop();
                }
            }
            Node::Scalar(_) => {}
        }
    }

    fn visit<'a, F>(&self, node: &'a Node, path: &mut Vec<String>, emit: &mut F)
    where
        F: FnMut(&[String], &'a Node),
    {
        if self.matches(path.as_slice()) {
            emit(path.as_slice(), node);
        }
        self.walk(node, path, emit);
    }
}

fn match_from<S: AsRef<str>>(pattern: &[Segment], path: &[S]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            match_from(rest, path) || (!path.is_empty() && match_from(pattern, &path[1..]))
        }
        Some((segment, rest)) => match path.split_first() {
            Some((head, tail)) => segment.matches(head.as_ref()) && match_from(rest, tail),
            None => false,
        },
    }
}

/// Compiles `pattern` and collects every matching node under `root`.
///
/// # Example
///
/// ```
/// use magic_map::{get_with_glob, Node};
/// use serde_json::json;
///
/// let root = Node::wrap(json!({
///     "user": {"profile": {"name": "Alice"}, "hobbies": ["reading", "traveling"]}
/// }));
/// let names = get_with_glob(&root, "user.*.name").unwrap();
/// assert_eq!(names.len(), 1);
/// assert_eq!(names[0].as_str(), Some("Alice"));
/// ```
pub fn get_with_glob<'a>(root: &'a Node, pattern: &str) -> Result<Vec<&'a Node>> {
    Ok(GlobPattern::compile(pattern)?.select(root))
}

/// Like [`get_with_glob`], paired with each match's dot path.
pub fn get_with_glob_paths<'a>(root: &'a Node, pattern: &str) -> Result<Vec<(String, &'a Node)>> {
    Ok(GlobPattern::compile(pattern)?.select_with_paths(root))
}
