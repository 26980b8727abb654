//! Benchmark results.

use serde::Serialize;
use treecursor_tree::TreeShape;

use crate::Strategy;

/// Results of one harness run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchReport {
    pub shape: TreeShape,
    pub expected_count: usize,
    pub iterations: u32,
    pub strategies: Vec<StrategyReport>,
}

/// Timings of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyReport {
    pub strategy: Strategy,
    /// Mean latency of one traversal in each measured batch.
    pub batch_latency_ns: Vec<f64>,
    pub mean_ns: f64,
    pub min_ns: f64,
    pub max_ns: f64,
    /// Traversals run, warm-up included. Every one was checked.
    pub invocations: u64,
    pub crossings_per_traversal: f64,
}

impl StrategyReport {
    /// Summarizes per-batch latencies.
    pub fn new(
        strategy: Strategy,
        batch_latency_ns: Vec<f64>,
        invocations: u64,
        crossings_per_traversal: f64,
    ) -> Self {
        let count = batch_latency_ns.len().max(1) as f64;
        let mean_ns = batch_latency_ns.iter().sum::<f64>() / count;
        let min_ns = batch_latency_ns.iter().copied().fold(f64::INFINITY, f64::min);
        let max_ns = batch_latency_ns.iter().copied().fold(0.0, f64::max);
        Self {
            strategy,
            batch_latency_ns,
            mean_ns,
            min_ns: if min_ns.is_finite() { min_ns } else { 0.0 },
            max_ns,
            invocations,
            crossings_per_traversal,
        }
    }
}

impl BenchReport {
    /// Returns the report for `strategy`, if it ran.
    pub fn get(&self, strategy: Strategy) -> Option<&StrategyReport> {
        self.strategies.iter().find(|report| report.strategy == strategy)
    }
}
