//! Host-native tree representation.
//!
//! Ordinary nodes holding references to their fields and children, allocated
//! in a [`TreeArena`]. Walking these involves no decoding at all, which makes
//! them the reference point the compact representation is measured against.

use crate::{CompactTree, NodeRef, TreeArena, TreeShape};

/// A node in a host-native tree.
///
/// # Lifetime
///
/// The `'a` lifetime ties this node to its arena allocator,
/// ensuring that all field and child references remain valid.
///
/// # Example
///
/// ```rust
/// use treecursor_tree::{HostField, HostNode, TreeArena};
///
/// let arena = TreeArena::new();
///
/// let leaf = HostNode::new_leaf("leaf", None);
/// let nodes = arena.nodes(&[leaf, leaf]);
/// let fields = arena.fields(&[HostField { key: "items", nodes }]);
/// let root = HostNode::new_parent("root", None, fields);
///
/// assert_eq!(root.children().count(), 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HostNode<'a> {
    pub node_type: &'a str,
    pub payload: Option<&'a [u8]>,
    pub fields: &'a [HostField<'a>],
}

/// A named field of a [`HostNode`].
#[derive(Debug, Clone, Copy)]
pub struct HostField<'a> {
    pub key: &'a str,
    pub nodes: &'a [HostNode<'a>],
}

impl<'a> HostNode<'a> {
    /// Creates a node without fields.
    #[inline]
    pub const fn new_leaf(node_type: &'a str, payload: Option<&'a [u8]>) -> Self {
        Self {
            node_type,
            payload,
            fields: &[],
        }
    }

    /// Creates a node with fields.
    #[inline]
    pub const fn new_parent(
        node_type: &'a str,
        payload: Option<&'a [u8]>,
        fields: &'a [HostField<'a>],
    ) -> Self {
        Self {
            node_type,
            payload,
            fields,
        }
    }

    /// Returns true if this node has no fields.
    #[inline]
    pub const fn is_leaf(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates every child of this node, field by field.
    pub fn children(&self) -> impl Iterator<Item = &'a HostNode<'a>> + use<'a> {
        let fields: &'a [HostField<'a>] = self.fields;
        fields.iter().flat_map(|field| field.nodes.iter())
    }

    /// Builds the root of a regular tree.
    ///
    /// Every field of a level shares one child slice, so the arena holds one
    /// node per level no matter how wide the tree is.
    pub fn from_shape(arena: &'a TreeArena, shape: &TreeShape) -> &'a HostNode<'a> {
        let depth = shape.effective_depth();
        let keys: Vec<&'a str> = (0..shape.fields_per_node)
            .map(|index| arena.label(&format!("field{index}")))
            .collect();

        let mut node = HostNode::new_leaf(
            arena.label(&format!("level{depth}")),
            Some(arena.payload(&[depth as u8])),
        );

        for level in (0..depth).rev() {
            let children = arena.nodes(&vec![node; shape.nodes_per_field as usize]);
            let fields: Vec<HostField<'a>> = keys
                .iter()
                .map(|&key| HostField {
                    key,
                    nodes: children,
                })
                .collect();
            node = HostNode::new_parent(
                arena.label(&format!("level{level}")),
                Some(arena.payload(&[level as u8])),
                arena.fields(&fields),
            );
        }

        arena.node(node)
    }

    /// Copies the top-level nodes of a compact tree into the arena.
    pub fn from_compact(arena: &'a TreeArena, tree: &CompactTree) -> &'a [HostNode<'a>] {
        let roots: Vec<HostNode<'a>> = tree
            .sequence(tree.root_sequence())
            .map(|node| Self::copy_node(arena, tree, node))
            .collect();
        arena.nodes(&roots)
    }

    fn copy_node(arena: &'a TreeArena, tree: &CompactTree, node: NodeRef) -> HostNode<'a> {
        let fields: Vec<HostField<'a>> = tree
            .fields(node)
            .map(|(key, sequence)| {
                let nodes: Vec<HostNode<'a>> = tree
                    .sequence(sequence)
                    .map(|child| Self::copy_node(arena, tree, child))
                    .collect();
                HostField {
                    key: arena.label(key.as_str()),
                    nodes: arena.nodes(&nodes),
                }
            })
            .collect();

        HostNode::new_parent(
            arena.label(tree.node_type(node).as_str()),
            tree.payload(node).map(|bytes| arena.payload(bytes)),
            arena.fields(&fields),
        )
    }
}
