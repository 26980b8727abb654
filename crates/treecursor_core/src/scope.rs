//! Scoped ownership of boundary-side objects.
//!
//! Stores and cursors behind a [`Boundary`] are not reclaimed by anything on
//! the host side. These guards release them when dropped, so every exit path
//! (including `?` on an error) frees what was acquired.

use std::mem::ManuallyDrop;

use tracing::warn;
use treecursor_tree::TreeShape;

use crate::{Boundary, BoundaryError, CursorHandle, CursorNavigation, Descend, StoreHandle};

/// A store released on drop.
///
/// Drop every [`ScopedCursor`] bound to it first.
#[derive(Debug)]
pub struct ScopedStore<'b> {
    boundary: &'b Boundary,
    handle: StoreHandle,
}

impl<'b> ScopedStore<'b> {
    /// Builds a store for `shape`.
    pub fn build(boundary: &'b Boundary, shape: &TreeShape) -> Result<Self, BoundaryError> {
        let handle = boundary.build_store(shape)?;
        Ok(Self { boundary, handle })
    }

    #[inline]
    pub fn handle(&self) -> StoreHandle {
        self.handle
    }

    /// Creates a cursor on this store.
    pub fn cursor(&self) -> Result<ScopedCursor<'b>, BoundaryError> {
        ScopedCursor::create(self.boundary, self.handle)
    }

    /// Releases the store now, reporting failure instead of logging it.
    pub fn release(self) -> Result<(), BoundaryError> {
        let this = ManuallyDrop::new(self);
        this.boundary.release_store(this.handle)
    }
}

impl Drop for ScopedStore<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.boundary.release_store(self.handle) {
            warn!("Failed to release store {}: {}", self.handle, e);
        }
    }
}

/// A cursor freed on drop.
#[derive(Debug)]
pub struct ScopedCursor<'b> {
    boundary: &'b Boundary,
    handle: CursorHandle,
}

impl<'b> ScopedCursor<'b> {
    /// Creates a cursor at the first top-level node of `store`.
    pub fn create(boundary: &'b Boundary, store: StoreHandle) -> Result<Self, BoundaryError> {
        let handle = boundary.create_cursor(store)?;
        Ok(Self { boundary, handle })
    }

    #[inline]
    pub fn handle(&self) -> CursorHandle {
        self.handle
    }

    /// Moves the cursor back to the first top-level node.
    pub fn reset(&mut self) -> Result<(), BoundaryError> {
        self.boundary.reset_cursor(self.handle)
    }

    /// Frees the cursor now, reporting failure instead of logging it.
    pub fn free(self) -> Result<(), BoundaryError> {
        let this = ManuallyDrop::new(self);
        this.boundary.free_cursor(this.handle)
    }
}

impl Drop for ScopedCursor<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.boundary.free_cursor(self.handle) {
            warn!("Failed to free cursor {}: {}", self.handle, e);
        }
    }
}

impl CursorNavigation for ScopedCursor<'_> {
    type Error = BoundaryError;

    fn first_field(&mut self) -> Result<bool, BoundaryError> {
        self.boundary.first_field(self.handle)
    }

    fn next_field(&mut self) -> Result<bool, BoundaryError> {
        self.boundary.next_field(self.handle)
    }

    fn first_node(&mut self) -> Result<bool, BoundaryError> {
        self.boundary.first_node(self.handle)
    }

    fn next_node(&mut self) -> Result<bool, BoundaryError> {
        self.boundary.next_node(self.handle)
    }
}

impl Descend for ScopedCursor<'_> {
    type Error = BoundaryError;

    fn descend(&mut self) -> Result<bool, BoundaryError> {
        self.boundary.descend(self.handle)
    }
}
