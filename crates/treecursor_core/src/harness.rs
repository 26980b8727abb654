//! Benchmark and consistency harness.
//!
//! Builds one tree per run and hands it to every selected strategy. Each
//! traversal's count is compared against the closed form for the shape; the
//! first mismatch ends the run.

use tracing::{debug, info};
use treecursor_tree::{HostNode, TreeArena, TreeShape};

use crate::{
    BenchConfig, BenchReport, Boundary, Clock, HarnessError, ReportSink, ScopedStore, Strategy,
    StrategyReport, TreeFixture,
};

/// Runs strategies against one tree shape.
#[derive(Debug, Clone)]
pub struct Harness {
    config: BenchConfig,
    shape: TreeShape,
}

impl Harness {
    pub fn new(config: BenchConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        let shape = config.shape();
        Ok(Self { config, shape })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Node count every traversal must produce.
    pub fn expected_count(&self) -> usize {
        self.shape.expected_count()
    }

    /// Runs the benchmark timed by the system clock.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run(&self, sink: &mut dyn ReportSink) -> Result<BenchReport, HarnessError> {
        self.run_with_clock(sink, &crate::InstantClock::new())
    }

    /// Runs the benchmark.
    ///
    /// Emits each strategy's name, one latency line per measured batch, and
    /// `done` once every strategy passed.
    pub fn run_with_clock(
        &self,
        sink: &mut dyn ReportSink,
        clock: &dyn Clock,
    ) -> Result<BenchReport, HarnessError> {
        info!(
            "Benchmarking {} strategies on {} nodes ({} fields x {} nodes, depth {})",
            self.config.strategies.len(),
            self.expected_count(),
            self.shape.fields_per_node,
            self.shape.nodes_per_field,
            self.shape.depth
        );

        let strategies = self.with_fixture(|fixture| {
            let mut strategies = Vec::with_capacity(self.config.strategies.len());
            for &strategy in &self.config.strategies {
                sink.emit(strategy.name());
                strategies.push(self.run_strategy(strategy, fixture, sink, clock)?);
            }
            Ok(strategies)
        })?;
        sink.emit("done");

        Ok(BenchReport {
            shape: self.shape,
            expected_count: self.expected_count(),
            iterations: self.config.iterations,
            strategies,
        })
    }

    /// Runs a single checked traversal with `strategy`.
    pub fn count_once(&self, strategy: Strategy) -> Result<usize, HarnessError> {
        self.with_fixture(|fixture| {
            let mut invocation = 0;
            self.check(strategy, fixture, &mut invocation)
        })
    }

    /// Builds the tree on both sides of the boundary and releases it afterwards.
    fn with_fixture<R>(
        &self,
        op: impl FnOnce(&TreeFixture<'_>) -> Result<R, HarnessError>,
    ) -> Result<R, HarnessError> {
        let boundary = Boundary::new();
        let store = ScopedStore::build(&boundary, &self.shape)?;
        let arena = TreeArena::for_shape(&self.shape);
        let fixture = TreeFixture {
            boundary: &boundary,
            store: store.handle(),
            host_root: HostNode::from_shape(&arena, &self.shape),
        };
        debug!(
            "Built fixture: {} nodes, {} bytes of host tree",
            self.expected_count(),
            arena.allocated_bytes()
        );

        let result = op(&fixture)?;
        store.release()?;
        Ok(result)
    }

    fn run_strategy(
        &self,
        strategy: Strategy,
        fixture: &TreeFixture<'_>,
        sink: &mut dyn ReportSink,
        clock: &dyn Clock,
    ) -> Result<StrategyReport, HarnessError> {
        let mut invocation = 0u64;

        for _ in 0..self.config.warmup_batches {
            self.run_batch(strategy, fixture, &mut invocation)?;
        }
        debug!("{}: {} warm-up traversals passed", strategy, invocation);

        let crossings_before = fixture.boundary.crossings();
        let measured_before = invocation;
        let mut batch_latency_ns = Vec::with_capacity(self.config.batches as usize);
        for batch in 1..=self.config.batches {
            let start = clock.now_ns();
            self.run_batch(strategy, fixture, &mut invocation)?;
            let elapsed = clock.now_ns().saturating_sub(start);

            let latency = elapsed as f64 / f64::from(self.config.iterations);
            sink.emit(&format!(
                "{}: batch {}/{} {:.1} mean ns/traversal",
                strategy, batch, self.config.batches, latency
            ));
            batch_latency_ns.push(latency);
        }

        let measured = (invocation - measured_before).max(1);
        let crossings = fixture.boundary.crossings() - crossings_before;
        Ok(StrategyReport::new(
            strategy,
            batch_latency_ns,
            invocation,
            crossings as f64 / measured as f64,
        ))
    }

    fn run_batch(
        &self,
        strategy: Strategy,
        fixture: &TreeFixture<'_>,
        invocation: &mut u64,
    ) -> Result<(), HarnessError> {
        for _ in 0..self.config.iterations {
            self.check(strategy, fixture, invocation)?;
        }
        Ok(())
    }

    /// Runs one traversal and compares its count with the closed form.
    fn check(
        &self,
        strategy: Strategy,
        fixture: &TreeFixture<'_>,
        invocation: &mut u64,
    ) -> Result<usize, HarnessError> {
        *invocation += 1;
        let expected = self.expected_count();
        let actual = strategy
            .run(fixture)
            .map_err(|e| HarnessError::traversal(strategy.name(), e))?;
        if actual != expected {
            return Err(HarnessError::ConsistencyViolation {
                strategy: strategy.name().to_string(),
                expected,
                actual,
                invocation: *invocation,
            });
        }
        Ok(actual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VecSink;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    /// Advances by a fixed step on every read.
    struct StepClock {
        now: Cell<u64>,
        step: u64,
    }

    impl Clock for StepClock {
        fn now_ns(&self) -> u64 {
            let now = self.now.get();
            self.now.set(now + self.step);
            now
        }
    }

    #[test]
    fn test_emits_names_latencies_and_done() {
        let config = BenchConfig::default()
            .with_batches(0, 2)
            .with_iterations(4)
            .with_strategies([Strategy::BoundaryPerStep, Strategy::HostNative]);
        let harness = Harness::new(config).unwrap();
        let clock = StepClock {
            now: Cell::new(0),
            step: 400,
        };

        let mut sink = VecSink::new();
        let report = harness.run_with_clock(&mut sink, &clock).unwrap();

        assert_eq!(
            sink.lines,
            vec![
                "per-step",
                "per-step: batch 1/2 100.0 mean ns/traversal",
                "per-step: batch 2/2 100.0 mean ns/traversal",
                "host-native",
                "host-native: batch 1/2 100.0 mean ns/traversal",
                "host-native: batch 2/2 100.0 mean ns/traversal",
                "done",
            ]
        );
        assert_eq!(report.expected_count, 11);
        assert_eq!(report.strategies.len(), 2);
        assert_eq!(report.strategies[0].invocations, 8);
        assert_eq!(report.strategies[0].crossings_per_traversal, 27.0);
        assert_eq!(report.strategies[1].crossings_per_traversal, 0.0);
    }

    #[test]
    fn test_warmup_counts_invocations() {
        let config = BenchConfig::default()
            .with_batches(2, 1)
            .with_iterations(3)
            .with_strategies([Strategy::BoundaryOwnedCursor]);
        let report = Harness::new(config)
            .unwrap()
            .run(&mut VecSink::new())
            .unwrap();

        assert_eq!(report.strategies[0].invocations, 9);
        assert_eq!(report.strategies[0].batch_latency_ns.len(), 1);
    }

    #[test]
    fn test_count_once() {
        let harness = Harness::new(BenchConfig::default().with_shape(1000, 10)).unwrap();

        for strategy in Strategy::ALL {
            assert_eq!(harness.count_once(strategy).unwrap(), 10001);
        }
    }

    #[test]
    fn test_mismatched_count_stops_batch() {
        let harness = Harness::new(BenchConfig::default().with_iterations(10)).unwrap();

        // 2 fields of 4 nodes, one short of what the harness expects
        let shape = TreeShape::new(2, 4);
        let boundary = Boundary::new();
        let store = ScopedStore::build(&boundary, &shape).unwrap();
        let arena = TreeArena::new();
        let fixture = TreeFixture {
            boundary: &boundary,
            store: store.handle(),
            host_root: HostNode::from_shape(&arena, &shape),
        };

        for strategy in Strategy::ALL {
            let mut invocation = 0;
            let err = harness
                .run_batch(strategy, &fixture, &mut invocation)
                .unwrap_err();

            assert_eq!(invocation, 1);
            match err {
                HarnessError::ConsistencyViolation {
                    strategy: name,
                    expected,
                    actual,
                    invocation,
                } => {
                    assert_eq!(name, strategy.name());
                    assert_eq!((expected, actual, invocation), (11, 9, 1));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_rejects_deep_chain() {
        let config = BenchConfig::default().with_shape(1, 1).with_depth(1_000_000);
        assert!(matches!(
            Harness::new(config),
            Err(HarnessError::Config(_))
        ));
    }

    #[test]
    fn test_count_once_without_fields() {
        let harness = Harness::new(BenchConfig::default().with_shape(0, u32::MAX)).unwrap();

        for strategy in Strategy::ALL {
            assert_eq!(harness.count_once(strategy).unwrap(), 1);
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = BenchConfig::default().with_iterations(0);
        assert!(matches!(
            Harness::new(config),
            Err(HarnessError::Config(_))
        ));
    }
}
