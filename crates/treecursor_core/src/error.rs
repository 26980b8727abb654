//! Error types for cursors, the boundary, configuration and the harness.

use std::fmt;

use thiserror::Error;
use treecursor_tree::StoreError;

use crate::{CursorHandle, CursorMode, StoreHandle};

/// Errors from cursor movement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The operation is not available in the current mode.
    #[error("Operation requires {expected} mode, cursor is in {actual} mode")]
    WrongMode {
        expected: CursorMode,
        actual: CursorMode,
    },

    /// A node index past the end of the current field.
    #[error("Node index {index} out of bounds for field of length {len}")]
    OutOfBounds { index: u32, len: u32 },

    /// Tried to exit the top-level sequence.
    #[error("Cursor is at the root and cannot exit further")]
    AtRoot,

    /// The tree has no top-level node to stand on.
    #[error("Tree has no nodes")]
    EmptyTree,

    /// The cursor's position does not exist in the tree it was used with.
    #[error("Cursor position does not belong to this tree")]
    ForeignStore,
}

/// What a stale handle referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Released {
    Cursor(CursorHandle),
    Store(StoreHandle),
}

impl fmt::Display for Released {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Released::Cursor(handle) => write!(f, "cursor {handle}"),
            Released::Store(handle) => write!(f, "store {handle}"),
        }
    }
}

/// Errors crossing the calling boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundaryError {
    /// A cursor was requested for a store that was never built or is released.
    #[error("Invalid store handle {0}")]
    InvalidStore(StoreHandle),

    /// An operation used a cursor (or the store under it) after release.
    #[error("Use after free: {0} was already released")]
    UseAfterFree(Released),

    /// Cursor movement failed.
    #[error("Cursor error: {0}")]
    Cursor(#[from] CursorError),

    /// The tree could not be built.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl BoundaryError {
    /// Returns true for errors caused by using a released handle.
    pub fn is_use_after_free(&self) -> bool {
        matches!(self, BoundaryError::UseAfterFree(_))
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not JSON.
    #[error("Invalid JSON: {0}")]
    Json(String),

    /// The document does not match the config schema.
    #[error("Config validation failed: {0}")]
    Validation(String),

    /// A strategy name that does not exist.
    #[error("Unknown strategy '{0}' (expected one of: per-step, owned-cursor, node-object, host-native)")]
    UnknownStrategy(String),

    /// A value that passes the schema but cannot be run.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an invalid-value error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Errors that end a benchmark run.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A strategy counted a different number of nodes than the shape implies.
    #[error(
        "Consistency violation: strategy '{strategy}' counted {actual} nodes, expected {expected} (invocation {invocation})"
    )]
    ConsistencyViolation {
        strategy: String,
        expected: usize,
        actual: usize,
        invocation: u64,
    },

    /// A strategy failed mid-traversal.
    #[error("Strategy '{strategy}' failed: {source}")]
    Traversal {
        strategy: String,
        #[source]
        source: BoundaryError,
    },

    /// Setting up the fixture failed.
    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    /// The configuration cannot be run.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl HarnessError {
    /// Creates a traversal error.
    pub fn traversal(strategy: impl Into<String>, source: BoundaryError) -> Self {
        Self::Traversal {
            strategy: strategy.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Handle;

    #[test]
    fn test_use_after_free_display() {
        let handle = CursorHandle(Handle::new(3, 1));
        let err = BoundaryError::UseAfterFree(Released::Cursor(handle));

        assert!(err.is_use_after_free());
        assert_eq!(
            err.to_string(),
            "Use after free: cursor 3v1 was already released"
        );
    }

    #[test]
    fn test_wrong_mode_display() {
        let err = CursorError::WrongMode {
            expected: CursorMode::Fields,
            actual: CursorMode::Nodes,
        };
        assert_eq!(
            err.to_string(),
            "Operation requires fields mode, cursor is in nodes mode"
        );
    }

    #[test]
    fn test_consistency_violation_display() {
        let err = HarnessError::ConsistencyViolation {
            strategy: "per-step".to_string(),
            expected: 11,
            actual: 10,
            invocation: 4,
        };
        assert!(err.to_string().contains("counted 10 nodes, expected 11"));
    }
}
