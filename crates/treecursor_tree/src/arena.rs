//! Arena for host-native trees.
//!
//! A [`HostNode`] tree never frees individual nodes: it is built once, walked
//! many times, then dropped as a whole. Every label, payload and slice of one
//! tree is bump-allocated in a single [`TreeArena`] and released with it.

use bumpalo::Bump;

use crate::{HostField, HostNode, TreeShape};

/// Room reserved for one generated label such as `field12` or `level3`.
const LABEL_BYTES: usize = 16;

/// Owner of every allocation of one host-native tree.
///
/// # Example
///
/// ```rust
/// use treecursor_tree::{HostNode, TreeArena};
///
/// let arena = TreeArena::new();
/// let leaf = HostNode::new_leaf(arena.label("leaf"), Some(arena.payload(&[7])));
/// let nodes = arena.nodes(&[leaf, leaf]);
///
/// assert_eq!(nodes.len(), 2);
/// assert_eq!(nodes[1].payload, Some(&[7u8][..]));
/// ```
pub struct TreeArena {
    bump: Bump,
}

impl TreeArena {
    #[inline]
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Creates an arena sized for [`HostNode::from_shape`], which shares one
    /// child slice per level. Levels no field reaches take no room.
    pub fn for_shape(shape: &TreeShape) -> Self {
        let depth = shape.effective_depth() as usize;
        let fields = if depth == 0 {
            0
        } else {
            shape.fields_per_node as usize
        };
        let per_level = size_of::<HostNode<'_>>()
            .saturating_mul(shape.nodes_per_field as usize)
            .saturating_add(size_of::<HostField<'_>>().saturating_mul(fields))
            .saturating_add(LABEL_BYTES);
        let root = size_of::<HostNode<'_>>() + LABEL_BYTES;
        let capacity = depth
            .saturating_mul(per_level)
            .saturating_add(root)
            .saturating_add(fields.saturating_mul(LABEL_BYTES));
        Self {
            bump: Bump::with_capacity(capacity),
        }
    }

    /// Copies a node type or field key into the arena.
    #[inline]
    pub fn label(&self, label: &str) -> &str {
        self.bump.alloc_str(label)
    }

    #[inline]
    pub fn payload(&self, bytes: &[u8]) -> &[u8] {
        self.bump.alloc_slice_copy(bytes)
    }

    #[inline]
    pub fn node<'a>(&'a self, node: HostNode<'a>) -> &'a HostNode<'a> {
        self.bump.alloc(node)
    }

    #[inline]
    pub fn nodes<'a>(&'a self, nodes: &[HostNode<'a>]) -> &'a [HostNode<'a>] {
        self.bump.alloc_slice_copy(nodes)
    }

    #[inline]
    pub fn fields<'a>(&'a self, fields: &[HostField<'a>]) -> &'a [HostField<'a>] {
        self.bump.alloc_slice_copy(fields)
    }

    /// Bytes handed out so far, across all chunks.
    #[inline]
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_share_children() {
        let arena = TreeArena::new();
        let leaf = HostNode::new_leaf(arena.label("leaf"), None);
        let children = arena.nodes(&[leaf; 3]);
        let fields = arena.fields(&[
            HostField {
                key: arena.label("left"),
                nodes: children,
            },
            HostField {
                key: arena.label("right"),
                nodes: children,
            },
        ]);

        assert!(std::ptr::eq(fields[0].nodes, fields[1].nodes));
        assert_eq!(fields[1].key, "right");
    }

    #[test]
    fn test_for_shape() {
        let shape = TreeShape::new(1000, 10);
        let arena = TreeArena::for_shape(&shape);
        assert!(arena.allocated_bytes() > 0);

        let root = HostNode::from_shape(&arena, &shape);
        assert_eq!(root.fields.len(), 1000);
        assert_eq!(root.children().count(), 10_000);
    }

    #[test]
    fn test_for_shape_without_fields_stays_small() {
        let arena = TreeArena::for_shape(&TreeShape::new(0, u32::MAX));
        assert!(arena.allocated_bytes() < 4096);
    }
}
