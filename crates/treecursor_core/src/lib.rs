//! # treecursor_core
//!
//! Cursor traversal over compact trees held behind a calling boundary.
//!
//! This crate provides:
//! - The [`Cursor`] state machine and its movement primitives
//! - A native [`Boundary`] model with generational handles and crossing counts
//! - Four traversal [`Strategy`] variants that must agree on every count
//! - The benchmark/consistency [`Harness`] and its report sinks
//!
//! ## Example
//!
//! ```rust
//! use treecursor_core::{BenchConfig, Harness, Strategy, VecSink};
//!
//! let config = BenchConfig::default()
//!     .with_shape(2, 5)
//!     .with_iterations(10)
//!     .with_strategies(Strategy::ALL);
//! let harness = Harness::new(config).unwrap();
//!
//! let mut sink = VecSink::new();
//! let report = harness.run(&mut sink).unwrap();
//! assert_eq!(report.expected_count, 11);
//! assert_eq!(sink.lines.last().map(String::as_str), Some("done"));
//! ```

mod boundary;
mod clock;
mod config;
mod cursor;
mod error;
mod handle;
mod harness;
mod report;
mod scope;
mod sink;
mod strategy;

pub use boundary::Boundary;
#[cfg(not(target_arch = "wasm32"))]
pub use clock::InstantClock;
pub use clock::Clock;
pub use config::{BenchConfig, MAX_TREE_NODES};
pub use cursor::{Cursor, CursorMode, CursorNavigation, CursorState, Descend};
pub use error::{BoundaryError, ConfigError, CursorError, HarnessError, Released};
pub use handle::{CursorHandle, Handle, HandleTable, NodeHandle, StoreHandle};
pub use harness::Harness;
pub use report::{BenchReport, StrategyReport};
pub use scope::{ScopedCursor, ScopedStore};
pub use sink::{ReportSink, TracingSink, VecSink};
pub use strategy::{
    Strategy, TreeFixture, count_descending, count_host_native, count_node_objects, count_subtree,
};
