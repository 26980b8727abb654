//! WebAssembly bindings.
//!
//! Everything exported here lives on the far side of the wasm boundary:
//! JavaScript holds only the wrapper objects and must `free()` them. A
//! [`WasmCursor`] or [`NodeObject`] keeps a weak reference to its
//! [`TreeStore`], so using one after its store was freed throws instead of
//! reading released memory. Calling a method on an object that was itself
//! freed is rejected by the generated bindings before reaching Rust.

use std::rc::{Rc, Weak};

use thiserror::Error;
use treecursor_core::{
    BenchConfig, Clock, CursorError, CursorNavigation, CursorState, Descend, Harness, ReportSink,
    count_subtree,
};
use treecursor_tree::{CompactTree, NodeRef, StoreError, TreeShape};
use wasm_bindgen::prelude::*;

/// Converts any `Display`-implementing error into `JsError`.
///
/// We cannot use `impl From<E> for JsError` due to the orphan rule.
fn to_js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}

/// Errors raised by the bindings before they reach JavaScript.
#[derive(Debug, Error)]
enum BindingError {
    #[error("Use after free: the tree store was already released")]
    StoreReleased,

    #[error(transparent)]
    Cursor(#[from] CursorError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A compact tree owned by the wasm module.
#[wasm_bindgen]
pub struct TreeStore {
    tree: Rc<CompactTree>,
    shape: TreeShape,
}

impl TreeStore {
    fn build(shape: TreeShape) -> Result<Self, BindingError> {
        let tree = shape.build()?;
        Ok(Self {
            tree: Rc::new(tree),
            shape,
        })
    }
}

#[wasm_bindgen]
impl TreeStore {
    /// Builds a tree with one level of children below the root.
    #[wasm_bindgen(constructor)]
    pub fn new(fields_per_node: u32, nodes_per_field: u32) -> Result<TreeStore, JsError> {
        set_panic_hook();
        Self::build(TreeShape::new(fields_per_node, nodes_per_field)).map_err(to_js_error)
    }

    /// Builds a tree with `depth` levels below the root.
    #[wasm_bindgen(js_name = withDepth)]
    pub fn with_depth(
        fields_per_node: u32,
        nodes_per_field: u32,
        depth: u32,
    ) -> Result<TreeStore, JsError> {
        set_panic_hook();
        Self::build(TreeShape::new(fields_per_node, nodes_per_field).with_depth(depth))
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter, js_name = totalNodes)]
    pub fn total_nodes(&self) -> usize {
        self.tree.total_nodes()
    }

    #[wasm_bindgen(getter, js_name = expectedCount)]
    pub fn expected_count(&self) -> usize {
        self.shape.expected_count()
    }

    /// Creates a cursor at the root of this tree.
    #[wasm_bindgen(js_name = createCursor)]
    pub fn create_cursor(&self) -> Result<WasmCursor, JsError> {
        WasmCursor::attach(&self.tree, None).map_err(to_js_error)
    }

    /// Returns the root as a node object.
    #[wasm_bindgen(js_name = rootNode)]
    pub fn root_node(&self) -> Result<NodeObject, JsError> {
        let node = self
            .tree
            .node_at(self.tree.root_sequence(), 0)
            .ok_or(CursorError::EmptyTree)
            .map_err(to_js_error)?;
        Ok(NodeObject {
            store: Rc::downgrade(&self.tree),
            node,
        })
    }
}

/// A cursor and the tree it walks, borrowed for the duration of one call.
struct Attached<'a> {
    state: &'a mut CursorState,
    tree: &'a CompactTree,
}

impl CursorNavigation for Attached<'_> {
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

impl Descend for Attached<'_> {
    type Error = CursorError;

    fn descend(&mut self) -> Result<bool, CursorError> {
        self.state.descend(self.tree)
    }
}

/// Cursor over a [`TreeStore`].
///
/// Mirrors the native cursor: every movement primitive is one call across
/// the boundary, while the frame stack stays in wasm memory.
#[wasm_bindgen]
pub struct WasmCursor {
    store: Weak<CompactTree>,
    /// Set when the cursor built its own tree.
    owned: Option<Rc<CompactTree>>,
    state: CursorState,
}

impl WasmCursor {
    fn attach(tree: &Rc<CompactTree>, owned: Option<Rc<CompactTree>>) -> Result<Self, BindingError> {
        Ok(Self {
            store: Rc::downgrade(tree),
            state: CursorState::new(tree)?,
            owned,
        })
    }

    fn with_tree<R>(
        &mut self,
        op: impl FnOnce(Attached<'_>) -> Result<R, CursorError>,
    ) -> Result<R, BindingError> {
        let tree = self.store.upgrade().ok_or(BindingError::StoreReleased)?;
        Ok(op(Attached {
            state: &mut self.state,
            tree: &tree,
        })?)
    }

    fn read<R>(
        &self,
        op: impl FnOnce(&CursorState, &CompactTree) -> Result<R, CursorError>,
    ) -> Result<R, BindingError> {
        let tree = self.store.upgrade().ok_or(BindingError::StoreReleased)?;
        Ok(op(&self.state, &tree)?)
    }
}

#[wasm_bindgen]
impl WasmCursor {
    /// Creates a cursor over its own default tree (2 fields of 5 nodes).
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmCursor, JsError> {
        set_panic_hook();
        let tree = Rc::new(TreeShape::default().build().map_err(to_js_error)?);
        Self::attach(&tree, Some(Rc::clone(&tree))).map_err(to_js_error)
    }

    /// Whether the tree under this cursor is still alive.
    #[wasm_bindgen(getter)]
    pub fn attached(&self) -> bool {
        self.owned.is_some() || self.store.strong_count() > 0
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> Result<String, JsError> {
        self.read(|state, _| Ok(state.mode().to_string()))
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn pending(&self) -> Result<bool, JsError> {
        self.read(|state, _| Ok(state.pending()))
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn depth(&self) -> Result<usize, JsError> {
        self.read(|state, _| Ok(state.depth()))
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = isAtRoot)]
    pub fn is_at_root(&self) -> Result<bool, JsError> {
        self.read(|state, _| Ok(state.is_at_root()))
            .map_err(to_js_error)
    }

    /// Moves back to the root of the same tree.
    pub fn reset(&mut self) -> Result<(), JsError> {
        self.with_tree(|mut c| {
            c.state.reset();
            Ok(())
        })
        .map_err(to_js_error)
    }

    // ********** Movement primitives ********** //

    #[wasm_bindgen(js_name = firstField)]
    pub fn first_field(&mut self) -> Result<bool, JsError> {
        self.with_tree(|mut c| c.first_field()).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = nextField)]
    pub fn next_field(&mut self) -> Result<bool, JsError> {
        self.with_tree(|mut c| c.next_field()).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = firstNode)]
    pub fn first_node(&mut self) -> Result<bool, JsError> {
        self.with_tree(|mut c| c.first_node()).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = nextNode)]
    pub fn next_node(&mut self) -> Result<bool, JsError> {
        self.with_tree(|mut c| c.next_node()).map_err(to_js_error)
    }

    // ********** Nodes mode ********** //

    #[wasm_bindgen(js_name = seekNodes)]
    pub fn seek_nodes(&mut self, offset: i32) -> Result<bool, JsError> {
        self.with_tree(|mut c| c.state.seek_nodes(c.tree, offset))
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = exitNode)]
    pub fn exit_node(&mut self) -> Result<(), JsError> {
        self.with_tree(|mut c| c.state.exit_node()).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = enterField)]
    pub fn enter_field(&mut self, key: &str) -> Result<bool, JsError> {
        self.with_tree(|mut c| c.state.enter_field(c.tree, key))
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = fieldIndex)]
    pub fn field_index(&self) -> Result<u32, JsError> {
        self.read(|state, _| state.field_index())
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = chunkStart)]
    pub fn chunk_start(&self) -> Result<u32, JsError> {
        self.read(|state, _| state.chunk_start())
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = chunkLength)]
    pub fn chunk_length(&self) -> Result<u32, JsError> {
        self.read(|state, tree| state.chunk_length(tree))
            .map_err(to_js_error)
    }

    /// Type of the current node.
    #[wasm_bindgen(js_name = "type")]
    pub fn node_type(&self) -> Result<String, JsError> {
        self.read(|state, tree| Ok(state.node_type(tree)?.to_string()))
            .map_err(to_js_error)
    }

    /// Payload of the current node decoded as a number.
    pub fn value(&self) -> Result<Option<f64>, JsError> {
        self.read(|state, tree| state.value(tree))
            .map_err(to_js_error)
    }

    // ********** Fields mode ********** //

    #[wasm_bindgen(js_name = exitField)]
    pub fn exit_field(&mut self) -> Result<(), JsError> {
        self.with_tree(|mut c| c.state.exit_field()).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = skipPendingFields)]
    pub fn skip_pending_fields(&mut self) -> Result<bool, JsError> {
        self.with_tree(|mut c| c.state.skip_pending_fields())
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = fieldKey)]
    pub fn field_key(&self) -> Result<String, JsError> {
        self.read(|state, tree| Ok(state.field_key(tree)?.to_string()))
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = getFieldLength)]
    pub fn field_length(&self) -> Result<u32, JsError> {
        self.read(|state, tree| state.field_length(tree))
            .map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = enterNode)]
    pub fn enter_node(&mut self, index: u32) -> Result<(), JsError> {
        self.with_tree(|mut c| c.state.enter_node(c.tree, index))
            .map_err(to_js_error)
    }

    // ********** Whole-step calls ********** //

    /// Enters the next child in depth-first order, or returns `false` once
    /// the current node has none left.
    pub fn descend(&mut self) -> Result<bool, JsError> {
        self.with_tree(|mut c| c.descend()).map_err(to_js_error)
    }

    /// Counts the subtree under the current node without leaving wasm.
    #[wasm_bindgen(js_name = countSubtree)]
    pub fn count_subtree(&mut self) -> Result<usize, JsError> {
        self.with_tree(|mut c| count_subtree(&mut c))
            .map_err(to_js_error)
    }
}

/// A node handle whose children come back in one call.
#[wasm_bindgen]
pub struct NodeObject {
    store: Weak<CompactTree>,
    node: NodeRef,
}

impl NodeObject {
    fn tree(&self) -> Result<Rc<CompactTree>, BindingError> {
        self.store.upgrade().ok_or(BindingError::StoreReleased)
    }

    fn child_objects(&self) -> Result<Vec<NodeObject>, BindingError> {
        let tree = self.tree()?;
        Ok(tree
            .children(self.node)
            .map(|node| NodeObject {
                store: Weak::clone(&self.store),
                node,
            })
            .collect())
    }

    fn count_children(&self) -> Result<usize, BindingError> {
        Ok(self.tree()?.children(self.node).count())
    }
}

#[wasm_bindgen]
impl NodeObject {
    #[wasm_bindgen(js_name = "type")]
    pub fn node_type(&self) -> Result<String, JsError> {
        let tree = self.tree().map_err(to_js_error)?;
        Ok(tree.node_type(self.node).to_string())
    }

    pub fn value(&self) -> Result<Option<f64>, JsError> {
        let tree = self.tree().map_err(to_js_error)?;
        Ok(tree.value(self.node))
    }

    /// Every child of this node, field by field.
    pub fn children(&self) -> Result<Vec<NodeObject>, JsError> {
        self.child_objects().map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = childCount)]
    pub fn child_count(&self) -> Result<usize, JsError> {
        self.count_children().map_err(to_js_error)
    }
}

/// Wall clock of the JavaScript host.
struct DateClock;

impl Clock for DateClock {
    fn now_ns(&self) -> u64 {
        (js_sys::Date::now() * 1_000_000.0) as u64
    }
}

/// Passes every line to a JavaScript callback.
struct CallbackSink<'f> {
    emit: &'f js_sys::Function,
    error: Option<JsValue>,
}

impl ReportSink for CallbackSink<'_> {
    fn emit(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.emit.call1(&JsValue::NULL, &JsValue::from_str(line)) {
            self.error = Some(e);
        }
    }
}

/// Runs the benchmark harness inside wasm.
///
/// `config` uses the same camelCase keys as the CLI's JSON config; `null` or
/// `undefined` selects the defaults. `emit` receives each progress line.
/// Resolves to the report object, or throws on the first inconsistent count.
#[wasm_bindgen(js_name = runBenchmark)]
pub fn run_benchmark(config: JsValue, emit: &js_sys::Function) -> Result<JsValue, JsError> {
    set_panic_hook();
    let config: BenchConfig = if config.is_undefined() || config.is_null() {
        BenchConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config).map_err(to_js_error)?
    };
    let harness = Harness::new(config).map_err(to_js_error)?;

    let mut sink = CallbackSink { emit, error: None };
    let result = harness.run_with_clock(&mut sink, &DateClock);
    if let Some(e) = sink.error {
        return Err(JsError::new(&format!(
            "Report callback failed: {:?}",
            e
        )));
    }
    let report = result.map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&report).map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use treecursor_core::count_descending;

    fn count_node_objects(node: &NodeObject) -> usize {
        1 + node
            .child_objects()
            .unwrap()
            .iter()
            .map(count_node_objects)
            .sum::<usize>()
    }

    #[test]
    fn test_default_cursor_counts_eleven() {
        let mut cursor = WasmCursor::new().unwrap();
        for _ in 0..100 {
            assert_eq!(cursor.with_tree(|mut c| count_subtree(&mut c)).unwrap(), 11);
        }
    }

    #[test]
    fn test_cursor_lifecycle() {
        let store = TreeStore::new(0, 0).unwrap();
        let cursor = store.create_cursor().unwrap();
        assert!(cursor.attached());
        drop(cursor);
    }

    #[test]
    fn test_descending_matches_per_step() {
        let store = TreeStore::new(1000, 10).unwrap();
        let mut cursor = store.create_cursor().unwrap();

        let per_step = cursor.with_tree(|mut c| count_subtree(&mut c)).unwrap();
        let descending = cursor.with_tree(|mut c| count_descending(&mut c)).unwrap();
        assert_eq!(per_step, 10001);
        assert_eq!(descending, 10001);
        assert_eq!(store.expected_count(), 10001);
    }

    #[test]
    fn test_node_objects() {
        let store = TreeStore::with_depth(2, 3, 2).unwrap();
        let root = store.root_node().unwrap();

        assert_eq!(count_node_objects(&root), store.total_nodes());
        assert_eq!(root.child_objects().unwrap().len(), 6);
        assert_eq!(root.count_children().unwrap(), 6);
    }

    #[test]
    fn test_child_count_of_leaf_and_root() {
        let store = TreeStore::new(3, 4).unwrap();
        let root = store.root_node().unwrap();
        let children = root.child_objects().unwrap();

        assert_eq!(root.count_children().unwrap(), 12);
        assert!(children.iter().all(|child| child.count_children().unwrap() == 0));
    }

    #[test]
    fn test_reset_after_partial_walk() {
        let store = TreeStore::new(2, 5).unwrap();
        let mut cursor = store.create_cursor().unwrap();
        cursor
            .with_tree(|mut c| {
                c.first_field()?;
                c.first_node()?;
                c.next_node()
            })
            .unwrap();
        assert_eq!(cursor.read(|state, _| Ok(state.depth())).unwrap(), 1);

        cursor
            .with_tree(|mut c| {
                c.state.reset();
                Ok(())
            })
            .unwrap();
        assert!(cursor.read(|state, _| Ok(state.is_at_root())).unwrap());
        assert_eq!(cursor.with_tree(|mut c| count_subtree(&mut c)).unwrap(), 11);
    }

    #[test]
    fn test_freed_store_detaches_cursor() {
        let store = TreeStore::new(2, 5).unwrap();
        let mut cursor = store.create_cursor().unwrap();
        let node = store.root_node().unwrap();
        drop(store);

        assert!(!cursor.attached());
        assert!(matches!(
            cursor.with_tree(|mut c| c.first_field()),
            Err(BindingError::StoreReleased)
        ));
        assert!(matches!(
            node.child_objects(),
            Err(BindingError::StoreReleased)
        ));
        assert!(matches!(
            node.count_children(),
            Err(BindingError::StoreReleased)
        ));

        // state reads and reset go through the same check as movement
        for result in [
            cursor.read(|state, _| Ok(state.mode().to_string())).map(drop),
            cursor.read(|state, _| Ok(state.depth())).map(drop),
            cursor.read(|state, _| Ok(state.is_at_root())).map(drop),
            cursor.read(|state, _| state.field_index()).map(drop),
            cursor.read(|state, _| state.chunk_start()).map(drop),
            cursor
                .with_tree(|mut c| {
                    c.state.reset();
                    Ok(())
                })
                .map(drop),
        ] {
            assert!(matches!(result, Err(BindingError::StoreReleased)));
        }
    }

    #[test]
    fn test_default_cursor_owns_its_tree() {
        let cursor = WasmCursor::new().unwrap();
        assert!(cursor.attached());
        assert!(cursor.owned.is_some());
    }
}
