//! Default traversal order, shared by the [`Visitor`] hooks.

use std::ops::ControlFlow;

use crate::{HostField, HostNode};

use super::visit::{VisitResult, Visitor};

/// Runs `enter_node`, `visit_node` and `exit_node` for one node.
pub fn walk_node<'a, V>(visitor: &mut V, node: &HostNode<'a>) -> VisitResult
where
    V: Visitor<'a>,
{
    visitor.enter_node(node)?;
    visitor.visit_node(node)?;
    visitor.exit_node(node)
}

/// Walks all fields of a node in order.
#[inline]
pub fn walk_fields<'a, V>(visitor: &mut V, node: &HostNode<'a>) -> VisitResult
where
    V: Visitor<'a>,
{
    for field in node.fields {
        visitor.visit_field(field)?;
    }
    ControlFlow::Continue(())
}

/// Walks all nodes of a field in order.
#[inline]
pub fn walk_field<'a, V>(visitor: &mut V, field: &HostField<'a>) -> VisitResult
where
    V: Visitor<'a>,
{
    for node in field.nodes {
        walk_node(visitor, node)?;
    }
    ControlFlow::Continue(())
}
