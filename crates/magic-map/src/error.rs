use thiserror::Error;

use crate::node::NodeKind;

/// Errors produced by path, glob and JSON boundary operations.
#[derive(Debug, Error)]
pub enum MagicMapError {
    /// A write was attempted against a root that is not a mapping.
    #[error("invalid root: expected a mapping, found a {kind}")]
    InvalidRoot { kind: NodeKind },
    /// Strict traversal could not resolve `segment`.
    ///
    /// `path` is the prefix walked so far, ending with the failing segment.
    #[error("path not found: no `{segment}` at `{path}`")]
    PathNotFound { segment: String, path: String },
    #[error("invalid glob pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MagicMapError {
    pub(crate) fn not_found(segments: &[&str], idx: usize) -> Self {
        MagicMapError::PathNotFound {
            segment: segments[idx].to_string(),
            path: segments[..=idx].join("."),
        }
    }

    /// The offending path, when the error carries one.
    pub fn path(&self) -> Option<&str> {
        match self {
            MagicMapError::PathNotFound { path, .. } => Some(path),
            MagicMapError::InvalidPattern { pattern, .. } => Some(pattern),
            MagicMapError::InvalidRoot { .. } | MagicMapError::Json(_) => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MagicMapError>;
