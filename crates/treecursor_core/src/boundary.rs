//! Native model of the calling boundary.
//!
//! Stores and cursors live in handle tables "on the far side"; the host only
//! ever holds [`StoreHandle`]s and [`CursorHandle`]s. Every exported operation
//! counts one crossing, which is what the strategies are compared on when no
//! real foreign module is involved.
//!
//! A `Boundary` is single-threaded: it is neither `Send` nor `Sync`, and all
//! operations take `&self` so several cursors can be driven side by side.

use std::cell::{Cell, RefCell};

use tracing::{debug, warn};
use treecursor_tree::{CompactTree, TreeShape};

use crate::handle::{CursorHandle, HandleTable, NodeHandle, StoreHandle};
use crate::{BoundaryError, CursorError, CursorMode, CursorState, Released};

#[derive(Debug)]
struct BoundCursor {
    store: StoreHandle,
    state: CursorState,
}

/// Owner of every store and cursor behind the boundary.
#[derive(Debug, Default)]
pub struct Boundary {
    stores: RefCell<HandleTable<CompactTree>>,
    cursors: RefCell<HandleTable<BoundCursor>>,
    crossings: Cell<u64>,
}

impl Boundary {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn cross(&self) {
        self.crossings.set(self.crossings.get() + 1);
    }

    /// Total crossings so far.
    #[inline]
    pub fn crossings(&self) -> u64 {
        self.crossings.get()
    }

    /// Number of live stores.
    pub fn store_count(&self) -> usize {
        self.stores.borrow().len()
    }

    /// Number of live cursors.
    pub fn cursor_count(&self) -> usize {
        self.cursors.borrow().len()
    }

    // ********** Stores ********** //

    /// Builds the regular tree described by `shape`.
    pub fn build_store(&self, shape: &TreeShape) -> Result<StoreHandle, BoundaryError> {
        self.cross();
        let tree = shape.build()?;
        let handle = StoreHandle(self.stores.borrow_mut().insert(tree));
        debug!(
            "Built store {} ({} fields x {} nodes, depth {})",
            handle, shape.fields_per_node, shape.nodes_per_field, shape.depth
        );
        Ok(handle)
    }

    /// Takes ownership of an already built tree.
    pub fn adopt_store(&self, tree: CompactTree) -> StoreHandle {
        self.cross();
        let handle = StoreHandle(self.stores.borrow_mut().insert(tree));
        debug!("Adopted store {}", handle);
        handle
    }

    /// Releases a store.
    ///
    /// Cursors still bound to it stay allocated, but every later operation on
    /// them fails with [`BoundaryError::UseAfterFree`].
    pub fn release_store(&self, store: StoreHandle) -> Result<(), BoundaryError> {
        self.cross();
        self.stores
            .borrow_mut()
            .remove(store.0)
            .ok_or(BoundaryError::UseAfterFree(Released::Store(store)))?;

        let dangling = self
            .cursors
            .borrow()
            .values()
            .filter(|cursor| cursor.store == store)
            .count();
        if dangling > 0 {
            warn!(
                "Store {} released while {} cursor(s) are still bound to it",
                store, dangling
            );
        }
        debug!("Released store {}", store);
        Ok(())
    }

    /// Returns the number of nodes in a store.
    pub fn total_nodes(&self, store: StoreHandle) -> Result<usize, BoundaryError> {
        self.cross();
        self.stores
            .borrow()
            .get(store.0)
            .map(CompactTree::total_nodes)
            .ok_or(BoundaryError::InvalidStore(store))
    }

    // ********** Cursor lifecycle ********** //

    /// Creates a cursor at the first top-level node of `store`.
    pub fn create_cursor(&self, store: StoreHandle) -> Result<CursorHandle, BoundaryError> {
        self.cross();
        let state = {
            let stores = self.stores.borrow();
            let tree = stores
                .get(store.0)
                .ok_or(BoundaryError::InvalidStore(store))?;
            CursorState::new(tree)?
        };
        let handle = CursorHandle(self.cursors.borrow_mut().insert(BoundCursor { store, state }));
        debug!("Created cursor {} on store {}", handle, store);
        Ok(handle)
    }

    /// Releases a cursor. Releasing it again is a use after free.
    pub fn free_cursor(&self, cursor: CursorHandle) -> Result<(), BoundaryError> {
        self.cross();
        self.cursors
            .borrow_mut()
            .remove(cursor.0)
            .ok_or(BoundaryError::UseAfterFree(Released::Cursor(cursor)))?;
        debug!("Freed cursor {}", cursor);
        Ok(())
    }

    /// Runs one operation against a live cursor and its store.
    fn with_cursor<R>(
        &self,
        cursor: CursorHandle,
        op: impl FnOnce(&mut CursorState, &CompactTree) -> Result<R, CursorError>,
    ) -> Result<R, BoundaryError> {
        self.cross();
        let mut cursors = self.cursors.borrow_mut();
        let bound = cursors
            .get_mut(cursor.0)
            .ok_or(BoundaryError::UseAfterFree(Released::Cursor(cursor)))?;
        let stores = self.stores.borrow();
        let tree = stores
            .get(bound.store.0)
            .ok_or(BoundaryError::UseAfterFree(Released::Store(bound.store)))?;
        Ok(op(&mut bound.state, tree)?)
    }

    // ********** Cursor movement ********** //

    pub fn first_field(&self, cursor: CursorHandle) -> Result<bool, BoundaryError> {
        self.with_cursor(cursor, |state, tree| state.first_field(tree))
    }

    pub fn next_field(&self, cursor: CursorHandle) -> Result<bool, BoundaryError> {
        self.with_cursor(cursor, |state, tree| state.next_field(tree))
    }

    pub fn first_node(&self, cursor: CursorHandle) -> Result<bool, BoundaryError> {
        self.with_cursor(cursor, |state, tree| state.first_node(tree))
    }

    pub fn next_node(&self, cursor: CursorHandle) -> Result<bool, BoundaryError> {
        self.with_cursor(cursor, |state, tree| state.next_node(tree))
    }

    /// One depth-first step, see [`CursorState::descend`].
    pub fn descend(&self, cursor: CursorHandle) -> Result<bool, BoundaryError> {
        self.with_cursor(cursor, |state, tree| state.descend(tree))
    }

    /// Moves the cursor back to the first top-level node.
    pub fn reset_cursor(&self, cursor: CursorHandle) -> Result<(), BoundaryError> {
        self.with_cursor(cursor, |state, _| {
            state.reset();
            Ok(())
        })
    }

    pub fn cursor_mode(&self, cursor: CursorHandle) -> Result<CursorMode, BoundaryError> {
        self.with_cursor(cursor, |state, _| Ok(state.mode()))
    }

    pub fn is_at_root(&self, cursor: CursorHandle) -> Result<bool, BoundaryError> {
        self.with_cursor(cursor, |state, _| Ok(state.is_at_root()))
    }

    // ********** Node objects ********** //

    /// Returns the first top-level node of `store`.
    pub fn root_node(&self, store: StoreHandle) -> Result<NodeHandle, BoundaryError> {
        self.cross();
        let stores = self.stores.borrow();
        let tree = stores
            .get(store.0)
            .ok_or(BoundaryError::InvalidStore(store))?;
        let node = tree
            .node_at(tree.root_sequence(), 0)
            .ok_or(CursorError::EmptyTree)?;
        Ok(NodeHandle { store, node })
    }

    /// Returns every child of `node` in one crossing.
    pub fn children(&self, node: NodeHandle) -> Result<Vec<NodeHandle>, BoundaryError> {
        self.cross();
        let stores = self.stores.borrow();
        let tree = stores
            .get(node.store.0)
            .ok_or(BoundaryError::UseAfterFree(Released::Store(node.store)))?;
        Ok(tree
            .children(node.node)
            .map(|child| NodeHandle {
                store: node.store,
                node: child,
            })
            .collect())
    }
}
