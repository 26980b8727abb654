//! Cursor over a [`CompactTree`].
//!
//! A cursor is either positioned at a node ([`CursorMode::Nodes`]) or at one of
//! the fields of the node it last entered ([`CursorMode::Fields`]). Entering a
//! field or a child pushes a level onto an explicit stack; exhausting it pops
//! the level and restores the parent's position, so a depth-first walk only
//! ever sees the top of the stack through the movement primitives.
//!
//! [`CursorState`] holds the position without borrowing the tree, which lets
//! it live on the far side of a calling boundary next to a handle to its store.
//! [`Cursor`] binds a state to a tree for direct use.

use std::fmt;

use serde::Serialize;
use treecursor_tree::{CompactTree, FieldKey, NodeRef, Sequence, TreeType};

use crate::CursorError;

/// What a cursor is currently positioned at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CursorMode {
    /// At a node inside a field (or the top-level sequence).
    Nodes,
    /// At a field of the entered node.
    Fields,
}

impl fmt::Display for CursorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorMode::Nodes => f.write_str("nodes"),
            CursorMode::Fields => f.write_str("fields"),
        }
    }
}

/// Position within one sequence of sibling nodes.
#[derive(Debug, Clone, Copy)]
struct NodesLevel {
    sequence: Sequence,
    index: u32,
}

/// Position within the fields of one node.
#[derive(Debug, Clone, Copy)]
struct FieldsLevel {
    index: u32,
    /// Entered by key rather than by iterating from the first field.
    keyed: bool,
}

/// Position of a cursor, independent of the tree it walks.
///
/// Invariants:
/// - `nodes` is never empty; `nodes[0]` is the top-level sequence.
/// - In `Nodes` mode, `fields.len() == nodes.len() - 1`.
/// - In `Fields` mode, `fields.len() == nodes.len()` and `fields.last()` is the
///   field being iterated on the node at `nodes.last()`.
#[derive(Debug, Clone)]
pub struct CursorState {
    mode: CursorMode,
    nodes: Vec<NodesLevel>,
    fields: Vec<FieldsLevel>,
    /// Set by [`descend`](Self::descend) once every child of the current node
    /// was entered. Any other movement clears it.
    finished: bool,
}

impl CursorState {
    /// Creates a state positioned at the first top-level node.
    pub fn new(tree: &CompactTree) -> Result<Self, CursorError> {
        let sequence = tree.root_sequence();
        if tree.sequence_len(sequence) == 0 {
            return Err(CursorError::EmptyTree);
        }
        Ok(Self {
            mode: CursorMode::Nodes,
            nodes: vec![NodesLevel { sequence, index: 0 }],
            fields: Vec::new(),
            finished: false,
        })
    }

    /// Returns the current mode.
    #[inline]
    pub fn mode(&self) -> CursorMode {
        self.mode
    }

    /// Whether the current position is waiting on data that is not loaded.
    ///
    /// Compact trees are fully resident, so this is always `false`.
    #[inline]
    pub const fn pending(&self) -> bool {
        false
    }

    /// Number of nodes entered below the top-level sequence.
    #[inline]
    pub fn depth(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Returns true if positioned at the first top-level node with nothing entered.
    pub fn is_at_root(&self) -> bool {
        self.mode == CursorMode::Nodes && self.nodes.len() == 1 && self.nodes[0].index == 0
    }

    /// Moves back to the first top-level node.
    pub fn reset(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0].index = 0;
        self.fields.clear();
        self.mode = CursorMode::Nodes;
        self.finished = false;
    }

    #[inline]
    fn expect_mode(&self, expected: CursorMode) -> Result<(), CursorError> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(CursorError::WrongMode {
                expected,
                actual: self.mode,
            })
        }
    }

    #[inline]
    fn level(&self) -> NodesLevel {
        // `nodes` is never empty.
        self.nodes[self.nodes.len() - 1]
    }

    /// The node at the top of the stack: the current node in `Nodes` mode,
    /// the node owning the current field in `Fields` mode.
    fn node(&self, tree: &CompactTree) -> Result<NodeRef, CursorError> {
        let level = self.level();
        tree.node_at(level.sequence, level.index)
            .ok_or(CursorError::ForeignStore)
    }

    fn field_position(&self) -> u32 {
        self.fields.last().map_or(0, |level| level.index)
    }

    fn current_field<'t>(&self, tree: &'t CompactTree) -> Result<(&'t FieldKey, Sequence), CursorError> {
        let node = self.node(tree)?;
        tree.field(node, self.field_position() as usize)
            .ok_or(CursorError::ForeignStore)
    }

    // ********** Nodes mode ********** //

    /// Index of the current node within its field.
    pub fn field_index(&self) -> Result<u32, CursorError> {
        self.expect_mode(CursorMode::Nodes)?;
        Ok(self.level().index)
    }

    /// Index of the first node of the current chunk.
    ///
    /// A field of a uniform chunk is a single chunk, so this is always 0.
    pub fn chunk_start(&self) -> Result<u32, CursorError> {
        self.expect_mode(CursorMode::Nodes)?;
        Ok(0)
    }

    /// Length of the current chunk.
    pub fn chunk_length(&self, tree: &CompactTree) -> Result<u32, CursorError> {
        self.expect_mode(CursorMode::Nodes)?;
        Ok(tree.sequence_len(self.level().sequence))
    }

    /// Moves `offset` nodes within the current field.
    ///
    /// Seeking past either end exits to the parent field (mode becomes
    /// `Fields`) and returns `false`. In the top-level sequence there is no
    /// parent field: the cursor stays where it is and `false` is returned.
    pub fn seek_nodes(&mut self, tree: &CompactTree, offset: i32) -> Result<bool, CursorError> {
        self.expect_mode(CursorMode::Nodes)?;
        self.finished = false;

        let last = self.nodes.len() - 1;
        let level = self.nodes[last];
        let target = i64::from(level.index) + i64::from(offset);
        if (0..i64::from(tree.sequence_len(level.sequence))).contains(&target) {
            self.nodes[last].index = target as u32;
            return Ok(true);
        }

        if last > 0 {
            self.nodes.pop();
            self.mode = CursorMode::Fields;
        }
        Ok(false)
    }

    /// Moves to the next sibling. Same as `seek_nodes(1)`.
    #[inline]
    pub fn next_node(&mut self, tree: &CompactTree) -> Result<bool, CursorError> {
        self.seek_nodes(tree, 1)
    }

    /// Exits the current node to its parent field.
    pub fn exit_node(&mut self) -> Result<(), CursorError> {
        self.expect_mode(CursorMode::Nodes)?;
        if self.nodes.len() == 1 {
            return Err(CursorError::AtRoot);
        }
        self.finished = false;
        self.nodes.pop();
        self.mode = CursorMode::Fields;
        Ok(())
    }

    /// Enters the first field of the current node.
    ///
    /// Returns `false` and stays in `Nodes` mode if the node has no fields.
    pub fn first_field(&mut self, tree: &CompactTree) -> Result<bool, CursorError> {
        self.expect_mode(CursorMode::Nodes)?;
        self.finished = false;

        if tree.field_count(self.node(tree)?) == 0 {
            return Ok(false);
        }
        self.fields.push(FieldsLevel {
            index: 0,
            keyed: false,
        });
        self.mode = CursorMode::Fields;
        Ok(true)
    }

    /// Enters the field named `key`.
    ///
    /// Returns `false` and stays in `Nodes` mode if there is no such field.
    /// A field entered this way is not part of an iteration: the following
    /// `next_field` goes back to the owning node.
    pub fn enter_field(&mut self, tree: &CompactTree, key: &str) -> Result<bool, CursorError> {
        self.expect_mode(CursorMode::Nodes)?;
        self.finished = false;

        match tree.field_index_of(self.node(tree)?, key) {
            Some(index) => {
                self.fields.push(FieldsLevel {
                    index: index as u32,
                    keyed: true,
                });
                self.mode = CursorMode::Fields;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Type of the current node.
    pub fn node_type<'t>(&self, tree: &'t CompactTree) -> Result<&'t TreeType, CursorError> {
        self.expect_mode(CursorMode::Nodes)?;
        Ok(tree.node_type(self.node(tree)?))
    }

    /// Numeric value of the current node's payload.
    pub fn value(&self, tree: &CompactTree) -> Result<Option<f64>, CursorError> {
        self.expect_mode(CursorMode::Nodes)?;
        Ok(tree.value(self.node(tree)?))
    }

    /// Raw payload of the current node.
    pub fn payload<'t>(&self, tree: &'t CompactTree) -> Result<Option<&'t [u8]>, CursorError> {
        self.expect_mode(CursorMode::Nodes)?;
        Ok(tree.payload(self.node(tree)?))
    }

    // ********** Fields mode ********** //

    /// Moves to the next field.
    ///
    /// When fields are exhausted, or the field was entered by key, returns
    /// `false` and goes back to the owning node (mode becomes `Nodes`).
    pub fn next_field(&mut self, tree: &CompactTree) -> Result<bool, CursorError> {
        self.expect_mode(CursorMode::Fields)?;
        self.finished = false;

        let count = tree.field_count(self.node(tree)?);
        let last = self.fields.len() - 1;
        let level = self.fields[last];
        if !level.keyed && (level.index as usize) + 1 < count {
            self.fields[last].index += 1;
            return Ok(true);
        }
        self.fields.pop();
        self.mode = CursorMode::Nodes;
        Ok(false)
    }

    /// Skips fields whose contents are pending.
    ///
    /// Nothing is ever pending, so this stays on the current field.
    pub fn skip_pending_fields(&mut self) -> Result<bool, CursorError> {
        self.expect_mode(CursorMode::Fields)?;
        Ok(true)
    }

    /// Goes back to the node owning the current field.
    pub fn exit_field(&mut self) -> Result<(), CursorError> {
        self.expect_mode(CursorMode::Fields)?;
        self.finished = false;
        self.fields.pop();
        self.mode = CursorMode::Nodes;
        Ok(())
    }

    /// Key of the current field.
    pub fn field_key<'t>(&self, tree: &'t CompactTree) -> Result<&'t FieldKey, CursorError> {
        self.expect_mode(CursorMode::Fields)?;
        Ok(self.current_field(tree)?.0)
    }

    /// Number of nodes in the current field.
    pub fn field_length(&self, tree: &CompactTree) -> Result<u32, CursorError> {
        self.expect_mode(CursorMode::Fields)?;
        Ok(tree.sequence_len(self.current_field(tree)?.1))
    }

    /// Enters the first node of the current field.
    ///
    /// Returns `false` and stays in `Fields` mode if the field is empty.
    pub fn first_node(&mut self, tree: &CompactTree) -> Result<bool, CursorError> {
        self.expect_mode(CursorMode::Fields)?;
        self.finished = false;

        let (_, sequence) = self.current_field(tree)?;
        if tree.sequence_len(sequence) == 0 {
            return Ok(false);
        }
        self.nodes.push(NodesLevel { sequence, index: 0 });
        self.mode = CursorMode::Nodes;
        Ok(true)
    }

    /// Enters the node at `index` of the current field.
    pub fn enter_node(&mut self, tree: &CompactTree, index: u32) -> Result<(), CursorError> {
        self.expect_mode(CursorMode::Fields)?;

        let (_, sequence) = self.current_field(tree)?;
        let len = tree.sequence_len(sequence);
        if index >= len {
            return Err(CursorError::OutOfBounds { index, len });
        }
        self.finished = false;
        self.nodes.push(NodesLevel { sequence, index });
        self.mode = CursorMode::Nodes;
        Ok(())
    }

    // ********** Depth-first stepping ********** //

    /// Advances a depth-first walk by one child.
    ///
    /// Enters the next child of the current node, in field order, and returns
    /// `true`. Once the current node has no children left, returns `false`:
    /// below the top level the node is marked finished, and the following call
    /// moves on to its next sibling (or the parent's next field). A finished
    /// top-level node is left unmarked, ready for another walk.
    ///
    /// Counting a subtree with this needs one call per node plus one per
    /// child rather than one call per primitive:
    ///
    /// ```text
    /// count(c): total = 1; while c.descend() { total += count(c) }; total
    /// ```
    pub fn descend(&mut self, tree: &CompactTree) -> Result<bool, CursorError> {
        self.expect_mode(CursorMode::Nodes)?;

        let entered = if self.finished {
            self.finished = false;
            if self.seek_nodes(tree, 1)? {
                return Ok(true);
            }
            // Back in the parent's field: its remaining fields are next.
            self.next_field(tree)? && self.enter_first_child(tree)?
        } else if self.first_field(tree)? {
            self.enter_first_child(tree)?
        } else {
            false
        };

        if entered {
            return Ok(true);
        }
        self.finished = self.nodes.len() > 1;
        Ok(false)
    }

    /// From `Fields` mode, enters the first child of the current field or of
    /// a later one. When every field is empty, ends in `Nodes` mode on the
    /// owning node.
    fn enter_first_child(&mut self, tree: &CompactTree) -> Result<bool, CursorError> {
        loop {
            if self.first_node(tree)? {
                return Ok(true);
            }
            if !self.next_field(tree)? {
                return Ok(false);
            }
        }
    }
}

/// The four movement primitives a depth-first walk needs.
///
/// Implemented by every cursor-like handle so one counting routine serves
/// all of them.
pub trait CursorNavigation {
    type Error;

    fn first_field(&mut self) -> Result<bool, Self::Error>;
    fn next_field(&mut self) -> Result<bool, Self::Error>;
    fn first_node(&mut self) -> Result<bool, Self::Error>;
    fn next_node(&mut self) -> Result<bool, Self::Error>;
}

/// A cursor that walks depth-first one child at a time.
///
/// See [`CursorState::descend`].
pub trait Descend {
    type Error;

    fn descend(&mut self) -> Result<bool, Self::Error>;
}

/// A cursor bound to a tree.
///
/// # Example
///
/// ```rust
/// use treecursor_core::{Cursor, count_subtree};
/// use treecursor_tree::TreeShape;
///
/// let tree = TreeShape::new(2, 5).build().unwrap();
/// let mut cursor = Cursor::new(&tree).unwrap();
/// assert_eq!(count_subtree(&mut cursor).unwrap(), 11);
/// cursor.free();
/// ```
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    tree: &'a CompactTree,
    state: CursorState,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the first top-level node of `tree`.
    pub fn new(tree: &'a CompactTree) -> Result<Self, CursorError> {
        Ok(Self {
            tree,
            state: CursorState::new(tree)?,
        })
    }

    /// Releases the cursor.
    pub fn free(self) {}

    /// Returns the position state.
    pub fn state(&self) -> &CursorState {
        &self.state
    }

    pub fn mode(&self) -> CursorMode {
        self.state.mode()
    }

    pub fn pending(&self) -> bool {
        self.state.pending()
    }

    pub fn depth(&self) -> usize {
        self.state.depth()
    }

    pub fn is_at_root(&self) -> bool {
        self.state.is_at_root()
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn field_index(&self) -> Result<u32, CursorError> {
        self.state.field_index()
    }

    pub fn chunk_start(&self) -> Result<u32, CursorError> {
        self.state.chunk_start()
    }

    pub fn chunk_length(&self) -> Result<u32, CursorError> {
        self.state.chunk_length(self.tree)
    }

    pub fn seek_nodes(&mut self, offset: i32) -> Result<bool, CursorError> {
        self.state.seek_nodes(self.tree, offset)
    }

    pub fn exit_node(&mut self) -> Result<(), CursorError> {
        self.state.exit_node()
    }

    pub fn enter_field(&mut self, key: &str) -> Result<bool, CursorError> {
        self.state.enter_field(self.tree, key)
    }

    pub fn node_type(&self) -> Result<&'a TreeType, CursorError> {
        self.state.node_type(self.tree)
    }

    pub fn value(&self) -> Result<Option<f64>, CursorError> {
        self.state.value(self.tree)
    }

    pub fn payload(&self) -> Result<Option<&'a [u8]>, CursorError> {
        self.state.payload(self.tree)
    }

    pub fn skip_pending_fields(&mut self) -> Result<bool, CursorError> {
        self.state.skip_pending_fields()
    }

    pub fn exit_field(&mut self) -> Result<(), CursorError> {
        self.state.exit_field()
    }

    pub fn field_key(&self) -> Result<&'a FieldKey, CursorError> {
        self.state.field_key(self.tree)
    }

    pub fn field_length(&self) -> Result<u32, CursorError> {
        self.state.field_length(self.tree)
    }

    pub fn enter_node(&mut self, index: u32) -> Result<(), CursorError> {
        self.state.enter_node(self.tree, index)
    }
}

impl CursorNavigation for Cursor<'_> {
    type Error = CursorError;

    fn first_field(&mut self) -> Result<bool, CursorError> {
        self.state.first_field(self.tree)
    }

    fn next_field(&mut self) -> Result<bool, CursorError> {
        self.state.next_field(self.tree)
    }

    fn first_node(&mut self) -> Result<bool, CursorError> {
        self.state.first_node(self.tree)
    }

    fn next_node(&mut self) -> Result<bool, CursorError> {
        self.state.next_node(self.tree)
    }
}

impl Descend for Cursor<'_> {
    type Error = CursorError;

    fn descend(&mut self) -> Result<bool, CursorError> {
        self.state.descend(self.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use treecursor_tree::TreeShape;

    fn tree(fields: u32, nodes: u32) -> CompactTree {
        TreeShape::new(fields, nodes).build().unwrap()
    }

    #[test]
    fn test_new_cursor_at_root() {
        let tree = tree(2, 5);
        let cursor = Cursor::new(&tree).unwrap();

        assert!(cursor.is_at_root());
        assert_eq!(cursor.mode(), CursorMode::Nodes);
        assert_eq!(cursor.node_type().unwrap().as_str(), "level0");
        assert_eq!(cursor.field_index().unwrap(), 0);
        assert!(!cursor.pending());
    }

    #[test]
    fn test_leaf_root_has_no_fields() {
        let tree = tree(0, 0);
        let mut cursor = Cursor::new(&tree).unwrap();

        assert!(!cursor.first_field().unwrap());
        assert_eq!(cursor.mode(), CursorMode::Nodes);
        cursor.free();
    }

    #[test]
    fn test_empty_field_has_no_nodes() {
        let tree = tree(1, 0);
        let mut cursor = Cursor::new(&tree).unwrap();

        assert!(cursor.first_field().unwrap());
        assert_eq!(cursor.field_length().unwrap(), 0);
        assert!(!cursor.first_node().unwrap());
        assert_eq!(cursor.mode(), CursorMode::Fields);
        assert!(!cursor.next_field().unwrap());
        assert!(cursor.is_at_root());
    }

    #[test]
    fn test_exhausted_child_restores_parent_position() {
        let tree = tree(2, 3);
        let mut cursor = Cursor::new(&tree).unwrap();

        assert!(cursor.first_field().unwrap());
        assert!(cursor.first_node().unwrap());
        assert!(cursor.next_node().unwrap());
        assert_eq!(cursor.field_index().unwrap(), 1);

        // Walk the (empty) subtree of the second child.
        assert!(!cursor.first_field().unwrap());

        assert!(cursor.next_node().unwrap());
        assert_eq!(cursor.field_index().unwrap(), 2);
        assert!(!cursor.next_node().unwrap());

        // Back on the root's first field.
        assert_eq!(cursor.mode(), CursorMode::Fields);
        assert_eq!(cursor.field_key().unwrap().as_str(), "field0");
        assert!(cursor.next_field().unwrap());
        assert_eq!(cursor.field_key().unwrap().as_str(), "field1");
        assert!(!cursor.next_field().unwrap());
        assert!(cursor.is_at_root());
    }

    #[test]
    fn test_wrong_mode() {
        let tree = tree(2, 5);
        let mut cursor = Cursor::new(&tree).unwrap();

        assert_eq!(
            cursor.next_field().unwrap_err(),
            CursorError::WrongMode {
                expected: CursorMode::Fields,
                actual: CursorMode::Nodes,
            }
        );
        assert!(cursor.first_field().unwrap());
        assert!(matches!(
            cursor.next_node(),
            Err(CursorError::WrongMode { .. })
        ));
        assert!(matches!(cursor.value(), Err(CursorError::WrongMode { .. })));
    }

    #[test]
    fn test_root_level_bounds() {
        let tree = tree(2, 5);
        let mut cursor = Cursor::new(&tree).unwrap();

        assert!(!cursor.next_node().unwrap());
        assert!(!cursor.seek_nodes(-1).unwrap());
        assert!(cursor.is_at_root());
        assert_eq!(cursor.exit_node().unwrap_err(), CursorError::AtRoot);
    }

    #[test]
    fn test_seek_and_enter_node() {
        let tree = tree(2, 5);
        let mut cursor = Cursor::new(&tree).unwrap();

        assert!(cursor.enter_field("field1").unwrap());
        cursor.enter_node(3).unwrap();
        assert_eq!(cursor.field_index().unwrap(), 3);
        assert_eq!(cursor.chunk_start().unwrap(), 0);
        assert_eq!(cursor.chunk_length().unwrap(), 5);
        assert_eq!(cursor.value().unwrap(), Some(1.0));
        assert_eq!(cursor.payload().unwrap(), Some(&[1u8][..]));

        assert!(cursor.seek_nodes(-3).unwrap());
        assert_eq!(cursor.field_index().unwrap(), 0);
        assert!(!cursor.seek_nodes(-1).unwrap());
        assert_eq!(cursor.mode(), CursorMode::Fields);
        assert_eq!(cursor.field_key().unwrap().as_str(), "field1");

        assert_eq!(
            cursor.enter_node(5).unwrap_err(),
            CursorError::OutOfBounds { index: 5, len: 5 }
        );
        cursor.exit_field().unwrap();
        assert!(cursor.is_at_root());
    }

    #[test]
    fn test_enter_unknown_field() {
        let tree = tree(2, 5);
        let mut cursor = Cursor::new(&tree).unwrap();

        assert!(!cursor.enter_field("missing").unwrap());
        assert_eq!(cursor.mode(), CursorMode::Nodes);
    }

    #[test]
    fn test_next_field_after_enter_field_exits() {
        let tree = tree(2, 5);
        let mut cursor = Cursor::new(&tree).unwrap();

        assert!(cursor.enter_field("field0").unwrap());
        assert!(!cursor.next_field().unwrap());
        assert_eq!(cursor.mode(), CursorMode::Nodes);
        assert!(cursor.is_at_root());

        // Iterating from the first field still visits both.
        assert!(cursor.first_field().unwrap());
        assert!(cursor.next_field().unwrap());
        assert_eq!(cursor.field_key().unwrap().as_str(), "field1");
    }

    #[test]
    fn test_exit_node_and_reset() {
        let tree = tree(2, 5);
        let mut cursor = Cursor::new(&tree).unwrap();

        assert!(cursor.first_field().unwrap());
        assert!(cursor.first_node().unwrap());
        assert_eq!(cursor.depth(), 1);
        cursor.exit_node().unwrap();
        assert_eq!(cursor.mode(), CursorMode::Fields);
        assert_eq!(cursor.depth(), 0);

        assert!(cursor.first_node().unwrap());
        cursor.reset();
        assert!(cursor.is_at_root());
        assert!(cursor.skip_pending_fields().is_err());
    }

    #[test]
    fn test_descend_visits_every_child() {
        let tree = tree(2, 3);
        let mut cursor = Cursor::new(&tree).unwrap();

        let mut entered = Vec::new();
        while cursor.descend().unwrap() {
            entered.push(cursor.field_index().unwrap());
            // Leaves have no children.
            assert!(!cursor.descend().unwrap());
        }
        assert_eq!(entered, vec![0, 1, 2, 0, 1, 2]);
        assert!(cursor.is_at_root());

        // The walk can start over right away.
        assert!(cursor.descend().unwrap());
    }

    #[test]
    fn test_descend_skips_empty_fields() {
        let tree = tree(3, 0);
        let mut cursor = Cursor::new(&tree).unwrap();

        assert!(!cursor.descend().unwrap());
        assert!(cursor.is_at_root());
    }

    #[test]
    fn test_empty_tree() {
        use treecursor_tree::{ChunkSchema, SchemaId};

        let schema = ChunkSchema {
            node_type: TreeType::new("none"),
            node_count: 0,
            bytes_per_node: 1,
            payload_size: None,
            fields: Vec::new(),
        };
        let tree = CompactTree::new(vec![schema], SchemaId(0), Vec::new()).unwrap();

        assert_eq!(Cursor::new(&tree).unwrap_err(), CursorError::EmptyTree);
    }
}
