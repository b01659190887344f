//! Path-addressable view over JSON trees.
//!
//! This crate wraps JSON-like data into a tagged [`Node`] tree and offers:
//!
//! - dot-path reads with strict and defaulted variants ([`get`], [`get_or`]),
//! - writes that create intermediate mappings ([`set`]),
//! - glob queries across the whole tree ([`get_with_glob`]),
//! - copy-on-write edits that keep the previous tree intact
//!   ([`set_immutable`]).
//!
//! [`MagicMap`] bundles these behind one owning facade.
//!
//! # Example
//!
//! ```
//! use magic_map::{MagicMap, Node};
//!
//! let map: MagicMap = r#"{"user": {"profile": {"name": "Alice"}}}"#.parse().unwrap();
//!
//! assert_eq!(map.get("user.profile.name").unwrap().as_str(), Some("Alice"));
//!
//! let na = Node::from("N/A");
//! assert_eq!(map.get_or("user.contact.email", &na).as_str(), Some("N/A"));
//!
//! let hits = map.get_with_glob("user.*.name").unwrap();
//! assert_eq!(hits.len(), 1);
//! ```

pub mod error;
pub use error::{MagicMapError, Result};

pub mod node;
pub use node::{Mapping, Node, NodeKind, Scalar};

pub mod path;
pub use path::{get, get_mut, get_or, get_or_null, has, is_valid_index, join_path, remove, set, split_path};

pub mod matcher;
pub use matcher::{get_with_glob, get_with_glob_paths, GlobPattern};

pub mod snapshot;
pub use snapshot::{count_nodes, deep_clone, set_immutable};

pub mod serialize;
pub use serialize::{from_json, to_json, Replacer, SerializeOptions};

mod magic_map;
pub use magic_map::MagicMap;
