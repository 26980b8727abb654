//! Host-side traversal of [`HostNode`](crate::HostNode) trees.
//!
//! The host-native strategy counts nodes with a [`Visitor`]; the same hooks
//! serve any other read-only pass over an arena tree.
//!
//! Collecting the field keys of the root:
//!
//! ```rust
//! use treecursor_tree::{HostField, TreeArena, TreeShape, HostNode};
//! use treecursor_tree::visitor::{Visitor, VisitResult, walk_field, walk_node};
//!
//! struct KeyCollector<'a> {
//!     keys: Vec<&'a str>,
//! }
//!
//! impl<'a> Visitor<'a> for KeyCollector<'a> {
//!     fn visit_field(&mut self, field: &HostField<'a>) -> VisitResult {
//!         self.keys.push(field.key);
//!         walk_field(self, field)
//!     }
//! }
//!
//! let arena = TreeArena::new();
//! let root = HostNode::from_shape(&arena, &TreeShape::new(2, 1));
//!
//! let mut collector = KeyCollector { keys: Vec::new() };
//! let _ = walk_node(&mut collector, root);
//! assert_eq!(collector.keys, vec!["field0", "field1"]);
//! ```
//!
//! Stopping at the first leaf:
//!
//! ```rust
//! use treecursor_tree::{HostNode, TreeArena, TreeShape};
//! use treecursor_tree::visitor::{Visitor, VisitResult, walk_node};
//! use std::ops::ControlFlow;
//!
//! struct FirstLeaf<'a> {
//!     found: Option<&'a str>,
//! }
//!
//! impl<'a> Visitor<'a> for FirstLeaf<'a> {
//!     fn enter_node(&mut self, node: &HostNode<'a>) -> VisitResult {
//!         if node.is_leaf() {
//!             self.found = Some(node.node_type);
//!             return ControlFlow::Break(());
//!         }
//!         ControlFlow::Continue(())
//!     }
//! }
//!
//! let arena = TreeArena::new();
//! let root = HostNode::from_shape(&arena, &TreeShape::new(3, 3));
//! let mut finder = FirstLeaf { found: None };
//! assert!(walk_node(&mut finder, root).is_break());
//! assert_eq!(finder.found, Some("level1"));
//! ```

mod visit;
mod walk;

pub use visit::{VisitResult, Visitor};
pub use walk::{walk_field, walk_fields, walk_node};
