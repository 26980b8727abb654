//! Traversal strategies.
//!
//! Every strategy counts the nodes of the tree with the same depth-first
//! recursion. They differ only in where the movement happens relative to the
//! boundary and how many crossings a traversal takes:
//!
//! | strategy | crossings per traversal |
//! |----------|-------------------------|
//! | `per-step` | one per primitive |
//! | `owned-cursor` | one per recursive step |
//! | `node-object` | one per node |
//! | `host-native` | none |

use std::fmt;
use std::ops::ControlFlow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use treecursor_tree::visitor::{VisitResult, Visitor, walk_node};
use treecursor_tree::HostNode;

use crate::{Boundary, BoundaryError, ConfigError, CursorNavigation, Descend, NodeHandle, ScopedCursor, StoreHandle};

/// Counts the subtree under the cursor's current node, one primitive at a time.
///
/// The cursor ends where it started: every node entered is exhausted and
/// exited again before returning.
pub fn count_subtree<C>(cursor: &mut C) -> Result<usize, C::Error>
where
    C: CursorNavigation + ?Sized,
{
    let mut total = 1;
    if cursor.first_field()? {
        loop {
            if cursor.first_node()? {
                loop {
                    total += count_subtree(cursor)?;
                    if !cursor.next_node()? {
                        break;
                    }
                }
            }
            if !cursor.next_field()? {
                break;
            }
        }
    }
    Ok(total)
}

/// Counts the subtree under the cursor's current node, one child at a time.
pub fn count_descending<D>(cursor: &mut D) -> Result<usize, D::Error>
where
    D: Descend + ?Sized,
{
    let mut total = 1;
    while cursor.descend()? {
        total += count_descending(cursor)?;
    }
    Ok(total)
}

/// Counts the subtree under `node`, fetching each node's children in one call.
pub fn count_node_objects(boundary: &Boundary, node: NodeHandle) -> Result<usize, BoundaryError> {
    let mut total = 1;
    for child in boundary.children(node)? {
        total += count_node_objects(boundary, child)?;
    }
    Ok(total)
}

#[derive(Default)]
struct NodeCounter {
    count: usize,
}

impl<'a> Visitor<'a> for NodeCounter {
    fn enter_node(&mut self, _node: &HostNode<'a>) -> VisitResult {
        self.count += 1;
        ControlFlow::Continue(())
    }
}

/// Counts a host-native tree.
pub fn count_host_native(root: &HostNode<'_>) -> usize {
    let mut counter = NodeCounter::default();
    let flow = walk_node(&mut counter, root);
    // the counter never breaks
    debug_assert!(flow.is_continue());
    counter.count
}

/// Everything a strategy may traverse: one store behind the boundary and the
/// equivalent host-native tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeFixture<'a> {
    pub boundary: &'a Boundary,
    pub store: StoreHandle,
    pub host_root: &'a HostNode<'a>,
}

/// Where a traversal runs relative to the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Host-side recursion, every primitive crosses.
    #[serde(rename = "per-step")]
    BoundaryPerStep,
    /// Cursor state stays on the far side; one crossing per recursive step.
    #[serde(rename = "owned-cursor")]
    BoundaryOwnedCursor,
    /// Node handles whose children come back in a single crossing.
    #[serde(rename = "node-object")]
    BoundaryNodeObject,
    /// No boundary at all.
    #[serde(rename = "host-native")]
    HostNative,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::BoundaryPerStep,
        Strategy::BoundaryOwnedCursor,
        Strategy::BoundaryNodeObject,
        Strategy::HostNative,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Strategy::BoundaryPerStep => "per-step",
            Strategy::BoundaryOwnedCursor => "owned-cursor",
            Strategy::BoundaryNodeObject => "node-object",
            Strategy::HostNative => "host-native",
        }
    }

    /// Counts every node of the fixture's tree.
    ///
    /// Cursor-based strategies create a fresh cursor per run and free it
    /// before returning.
    pub fn run(self, fixture: &TreeFixture<'_>) -> Result<usize, BoundaryError> {
        match self {
            Strategy::BoundaryPerStep => {
                let mut cursor = ScopedCursor::create(fixture.boundary, fixture.store)?;
                let count = count_subtree(&mut cursor)?;
                cursor.free()?;
                Ok(count)
            }
            Strategy::BoundaryOwnedCursor => {
                let mut cursor = ScopedCursor::create(fixture.boundary, fixture.store)?;
                let count = count_descending(&mut cursor)?;
                cursor.free()?;
                Ok(count)
            }
            Strategy::BoundaryNodeObject => {
                let root = fixture.boundary.root_node(fixture.store)?;
                count_node_objects(fixture.boundary, root)
            }
            Strategy::HostNative => Ok(count_host_native(fixture.host_root)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| ConfigError::UnknownStrategy(s.to_string()))
    }
}
