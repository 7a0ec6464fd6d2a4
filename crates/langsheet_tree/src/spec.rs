//! Error types for key-path decoding and tree transformation.

use std::path::PathBuf;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region KeyPathErrors

/// Key path could not be built or decoded without ambiguity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyPathError {
    /// Encoded path is empty.
    #[error("Key path is empty.")]
    EmptyPath,
    /// Encoded path contains an empty segment (`a..b`, `.a`, `a.`).
    #[error("Key path {path:?} contains an empty segment.")]
    EmptySegment {
        /// Offending encoded path (or parent path when building).
        path: String,
    },
    /// A segment contains the separator and would be split on decode.
    #[error("Key segment {segment:?} under {path:?} contains the separator '.'.")]
    SeparatorInSegment {
        /// Encoded parent path of the segment.
        path: String,
        /// Offending segment.
        segment: String,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TreeErrors

/// Which kind of node already occupies a conflicting position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumNodeKind {
    /// A leaf string value.
    Leaf,
    /// A nested mapping.
    Node,
}

impl std::fmt::Display for EnumNodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leaf => write!(f, "leaf"),
            Self::Node => write!(f, "mapping"),
        }
    }
}

/// Failures of tree parsing, flattening and unflattening.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Key segment or path is invalid.
    #[error(transparent)]
    KeyPath(#[from] KeyPathError),

    /// Unflattening hit a position already taken by an incompatible node.
    #[error("Key path {path:?} conflicts with existing {kind_occupied} at {path_occupied:?}.")]
    ShapeConflict {
        /// Key path being inserted.
        path: String,
        /// Prefix of `path` where the conflicting node sits.
        path_occupied: String,
        /// Kind of the node already present at `path_occupied`.
        kind_occupied: EnumNodeKind,
    },

    /// JSON document root is not an object.
    #[error("JSON document root must be an object, found {found}.")]
    RootNotObject {
        /// JSON type name of the root value.
        found: &'static str,
    },

    /// Language position outside the accumulator width.
    #[error("Language position {position} out of range (languages={n_languages}).")]
    LanguagePositionOutOfRange {
        /// Requested position.
        position: usize,
        /// Accumulator width.
        n_languages: usize,
    },

    /// JSON syntax or serialization failure.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// File could not be read.
    #[error("Failed to read {}: {message}", path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
