//! Integration tests for cursor and store lifecycles across the boundary.

use pretty_assertions::assert_eq;
use treecursor_core::{
    BenchConfig, Boundary, BoundaryError, CursorNavigation, Harness, HarnessError, Released,
    ScopedCursor, ScopedStore, Strategy, VecSink,
};
use treecursor_tree::TreeShape;

#[test]
fn test_create_and_free_leaf_cursor() {
    let boundary = Boundary::new();
    let store = boundary.build_store(&TreeShape::new(0, 0)).unwrap();
    let cursor = boundary.create_cursor(store).unwrap();

    boundary.free_cursor(cursor).unwrap();
    boundary.release_store(store).unwrap();
    assert_eq!(boundary.cursor_count(), 0);
    assert_eq!(boundary.store_count(), 0);
}

#[test]
fn test_first_field_after_free_is_use_after_free() {
    let boundary = Boundary::new();
    let store = ScopedStore::build(&boundary, &TreeShape::new(2, 5)).unwrap();
    let cursor = store.cursor().unwrap();
    let handle = cursor.handle();
    cursor.free().unwrap();

    let err = boundary.first_field(handle).unwrap_err();
    assert_eq!(err, BoundaryError::UseAfterFree(Released::Cursor(handle)));
}

#[test]
fn test_double_free_is_reported() {
    let boundary = Boundary::new();
    let store = boundary.build_store(&TreeShape::new(1, 1)).unwrap();
    let cursor = boundary.create_cursor(store).unwrap();

    boundary.free_cursor(cursor).unwrap();
    assert!(boundary.free_cursor(cursor).unwrap_err().is_use_after_free());
}

#[test]
fn test_create_on_released_store_is_invalid() {
    let boundary = Boundary::new();
    let store = boundary.build_store(&TreeShape::new(1, 1)).unwrap();
    boundary.release_store(store).unwrap();

    assert_eq!(
        ScopedCursor::create(&boundary, store).unwrap_err(),
        BoundaryError::InvalidStore(store)
    );
}

#[test]
fn test_cursor_outliving_store_fails_fast() {
    let boundary = Boundary::new();
    let store = boundary.build_store(&TreeShape::new(2, 5)).unwrap();
    let mut cursor = ScopedCursor::create(&boundary, store).unwrap();
    boundary.release_store(store).unwrap();

    assert_eq!(
        cursor.first_field().unwrap_err(),
        BoundaryError::UseAfterFree(Released::Store(store))
    );
}

#[test]
fn test_harness_reports_done() {
    let config = BenchConfig::default()
        .with_batches(1, 1)
        .with_iterations(100)
        .with_strategies(Strategy::ALL);
    let harness = Harness::new(config).unwrap();
    let mut sink = VecSink::new();

    let report = harness.run(&mut sink).unwrap();

    assert_eq!(report.strategies.len(), 4);
    assert_eq!(sink.lines.first().map(String::as_str), Some("per-step"));
    assert_eq!(sink.lines.last().map(String::as_str), Some("done"));
    for strategy in report.strategies {
        assert_eq!(strategy.invocations, 200);
    }
}

#[test]
fn test_harness_rejects_oversized_tree() {
    let config = BenchConfig::default().with_shape(u32::MAX, u32::MAX);
    assert!(matches!(Harness::new(config), Err(HarnessError::Config(_))));
}
