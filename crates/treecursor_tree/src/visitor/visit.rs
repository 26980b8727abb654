//! The [`Visitor`] trait.
//!
//! Every hook defaults to continuing the walk; override only the ones you need.

use std::ops::ControlFlow;

use crate::{HostField, HostNode};

use super::walk::{walk_field, walk_fields};

/// `Break` stops the walk at the current node.
pub type VisitResult = ControlFlow<()>;

/// Read-only walk over a [`HostNode`] tree.
///
/// Nodes are visited depth-first, fields in declaration order. `'a` is the
/// lifetime of the arena the tree lives in, so a visitor may keep references
/// to labels and nodes it sees.
pub trait Visitor<'a>: Sized {
    /// Called before a node's fields are visited.
    #[inline]
    fn enter_node(&mut self, _node: &HostNode<'a>) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Called after a node and everything below it was visited.
    #[inline]
    fn exit_node(&mut self, _node: &HostNode<'a>) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Visits the fields of a node.
    #[inline]
    fn visit_node(&mut self, node: &HostNode<'a>) -> VisitResult {
        walk_fields(self, node)
    }

    /// Visits the nodes of one field.
    #[inline]
    fn visit_field(&mut self, field: &HostField<'a>) -> VisitResult {
        walk_field(self, field)
    }
}
