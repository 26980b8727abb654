//! Strategy comparison benchmarks.
//!
//! Measures one full traversal per strategy as the tree gets wider.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use treecursor_core::{Boundary, ScopedStore, Strategy, TreeFixture};
use treecursor_tree::{HostNode, TreeArena, TreeShape};

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");

    let shapes = [TreeShape::new(2, 5), TreeShape::new(10, 10), TreeShape::new(1000, 10)];

    for shape in shapes {
        let boundary = Boundary::new();
        let store = ScopedStore::build(&boundary, &shape).expect("Failed to build store");
        let arena = TreeArena::for_shape(&shape);
        let fixture = TreeFixture {
            boundary: &boundary,
            store: store.handle(),
            host_root: HostNode::from_shape(&arena, &shape),
        };

        group.throughput(Throughput::Elements(shape.expected_count() as u64));

        for strategy in Strategy::ALL {
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), shape.expected_count()),
                &fixture,
                |b, fixture| b.iter(|| black_box(strategy.run(fixture).expect("Traversal failed"))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
