//! # treecursor_tree
//!
//! Tree storage for treecursor.
//!
//! This crate provides the two tree representations the traversal core walks:
//!
//! - [`CompactTree`]: a uniform-chunk encoding. One flat table of schemas plus a
//!   single byte buffer. Nodes are addressed by opaque [`NodeRef`] values and
//!   never materialized as objects.
//! - [`HostNode`]: an ordinary tree of nodes allocated in a [`TreeArena`]. This is
//!   the host-native reference representation.
//!
//! ## Architecture
//!
//! - Uses `bumpalo` for arena allocation of host-native nodes
//! - All host nodes of one tree live in one arena and are freed together
//! - Compact trees are built from a [`TreeShape`] or validated from raw schemas
//!
//! ## Example
//!
//! ```rust
//! use treecursor_tree::{HostNode, TreeArena, TreeShape};
//!
//! let shape = TreeShape::new(2, 5);
//! let tree = shape.build().unwrap();
//! assert_eq!(tree.total_nodes(), 11);
//!
//! let arena = TreeArena::new();
//! let root = HostNode::from_shape(&arena, &shape);
//! assert_eq!(root.fields.len(), 2);
//! ```

mod arena;
mod error;
mod host;
mod label;
mod shape;
mod store;
pub mod visitor;

pub use arena::TreeArena;
pub use error::StoreError;
pub use host::{HostField, HostNode};
pub use label::{FieldKey, TreeType};
pub use shape::{MAX_DEPTH, TreeShape};
pub use store::{ChunkSchema, CompactTree, NodeRef, OffsetSchema, SchemaId, Sequence};

// Re-export commonly used visitor items for convenience
pub use visitor::{VisitResult, Visitor};
