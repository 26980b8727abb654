//! Integration tests for traversal strategies.
//!
//! Every strategy must produce `N * F + 1` for a one-level tree and agree
//! with the others on deeper ones, no matter how often it runs.

use pretty_assertions::assert_eq;
use rstest::rstest;
use treecursor_core::{
    Boundary, Cursor, CursorNavigation, ScopedStore, Strategy, TreeFixture, count_descending,
    count_subtree,
};
use treecursor_tree::{CompactTree, HostNode, TreeArena, TreeShape};

fn run_all(shape: TreeShape) -> Vec<(Strategy, usize)> {
    let boundary = Boundary::new();
    let store = ScopedStore::build(&boundary, &shape).expect("Failed to build store");
    let arena = TreeArena::new();
    let fixture = TreeFixture {
        boundary: &boundary,
        store: store.handle(),
        host_root: HostNode::from_shape(&arena, &shape),
    };

    Strategy::ALL
        .into_iter()
        .map(|strategy| (strategy, strategy.run(&fixture).unwrap()))
        .collect()
}

#[test]
fn test_scenario_a_reference_walk() {
    let tree = CompactTree::from_shape(&TreeShape::new(2, 5)).unwrap();
    let mut cursor = Cursor::new(&tree).unwrap();

    assert_eq!(count_subtree(&mut cursor).unwrap(), 11);
    cursor.free();
}

#[test]
fn test_scenario_b_every_strategy() {
    for (strategy, count) in run_all(TreeShape::new(1000, 10)) {
        assert_eq!(count, 10001, "{strategy}");
    }
}

#[rstest]
#[case(0, 0)]
#[case(0, 3)]
#[case(1, 0)]
#[case(1, 1)]
#[case(3, 7)]
#[case(10, 1)]
#[case(1, 10)]
#[case(0, u32::MAX)]
fn test_shape_invariant(#[case] fields: u32, #[case] nodes: u32) {
    let expected = (fields * nodes + 1) as usize;
    for (strategy, count) in run_all(TreeShape::new(fields, nodes)) {
        assert_eq!(count, expected, "{strategy} on F={fields} N={nodes}");
    }
}

#[rstest]
#[case::two_levels(TreeShape::new(2, 3).with_depth(2))]
#[case::three_levels(TreeShape::new(3, 2).with_depth(3))]
#[case::narrow_deep(TreeShape::new(1, 1).with_depth(40))]
#[case::root_only(TreeShape::new(5, 5).with_depth(0))]
fn test_strategies_agree_on_deeper_trees(#[case] shape: TreeShape) {
    let counts = run_all(shape);
    for (strategy, count) in counts {
        assert_eq!(count, shape.expected_count(), "{strategy}");
    }
}

#[test]
fn test_idempotent_retraversal() {
    let tree = CompactTree::from_shape(&TreeShape::new(4, 4)).unwrap();

    let first = count_subtree(&mut Cursor::new(&tree).unwrap()).unwrap();
    let second = count_subtree(&mut Cursor::new(&tree).unwrap()).unwrap();
    assert_eq!(first, second);

    // The same cursor comes back to the root and can walk again.
    let mut cursor = Cursor::new(&tree).unwrap();
    let counts: Vec<usize> = (0..3)
        .map(|_| count_descending(&mut cursor).unwrap())
        .collect();
    assert_eq!(counts, vec![17, 17, 17]);
    assert!(cursor.is_at_root());
}

#[test]
fn test_cursors_on_one_store_are_independent() {
    let boundary = Boundary::new();
    let store = ScopedStore::build(&boundary, &TreeShape::new(2, 5)).unwrap();
    let mut first = store.cursor().unwrap();
    let mut second = store.cursor().unwrap();

    // Move the first cursor into the tree, then walk with the second.
    assert!(first.first_field().unwrap());
    assert!(first.first_node().unwrap());

    assert_eq!(count_subtree(&mut second).unwrap(), 11);
    assert!(first.next_field().is_err());
    assert!(first.next_node().unwrap());
}
