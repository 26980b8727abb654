//! Benchmark configuration.

use serde::{Deserialize, Serialize};
use treecursor_tree::{MAX_DEPTH, TreeShape};

use crate::{ConfigError, Strategy};

#[cfg(feature = "native")]
use jsonschema::Validator;
#[cfg(feature = "native")]
use std::sync::OnceLock;

// Embed the schema
#[cfg(feature = "native")]
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/bench.json");
#[cfg(feature = "native")]
static BENCH_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Upper bound on nodes per tree the harness agrees to build.
pub const MAX_TREE_NODES: usize = 1 << 26;

/// What to build and how often to traverse it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BenchConfig {
    pub fields_per_node: u32,
    pub nodes_per_field: u32,
    /// Levels of nesting below the root.
    pub depth: u32,
    /// Batches run before measuring. Counts are still checked.
    pub warmup_batches: u32,
    pub batches: u32,
    /// Traversals per batch.
    pub iterations: u32,
    pub strategies: Vec<Strategy>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            fields_per_node: 2,
            nodes_per_field: 5,
            depth: 1,
            warmup_batches: 1,
            batches: 5,
            iterations: 100,
            strategies: Strategy::ALL.to_vec(),
        }
    }
}

#[cfg(feature = "native")]
fn schema() -> Result<&'static Validator, ConfigError> {
    BENCH_SCHEMA
        .get_or_init(|| {
            let schema_json: serde_json::Value = serde_json::from_str(SCHEMA_JSON)
                .map_err(|e| format!("Invalid embedded bench schema: {}", e))?;
            Validator::new(&schema_json).map_err(|e| format!("Invalid bench schema: {}", e))
        })
        .as_ref()
        .map_err(|e| ConfigError::validation(e.clone()))
}

impl BenchConfig {
    /// Loads configuration from a JSON file.
    #[cfg(feature = "native")]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Parses configuration from a JSON string with schema validation.
    #[cfg(feature = "native")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        // Parse into Value first for validation
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;

        if let Err(e) = schema()?.validate(&value) {
            return Err(ConfigError::validation(format!(
                "{} at {}",
                e,
                e.instance_path()
            )));
        }

        let config: Self =
            serde_json::from_value(value).map_err(|e| ConfigError::invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks constraints the schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batches == 0 {
            return Err(ConfigError::invalid("batches must be at least 1"));
        }
        if self.iterations == 0 {
            return Err(ConfigError::invalid("iterations must be at least 1"));
        }
        if self.strategies.is_empty() {
            return Err(ConfigError::invalid("at least one strategy is required"));
        }
        for (index, strategy) in self.strategies.iter().enumerate() {
            if self.strategies[..index].contains(strategy) {
                return Err(ConfigError::invalid(format!(
                    "strategy '{}' is listed twice",
                    strategy
                )));
            }
        }
        if self.depth > MAX_DEPTH {
            return Err(ConfigError::invalid(format!(
                "depth {} exceeds the maximum of {}",
                self.depth, MAX_DEPTH
            )));
        }
        let nodes = self.shape().expected_count();
        if nodes > MAX_TREE_NODES {
            return Err(ConfigError::invalid(format!(
                "tree would have {} nodes, the limit is {}",
                nodes, MAX_TREE_NODES
            )));
        }
        Ok(())
    }

    /// The tree shape under test.
    pub fn shape(&self) -> TreeShape {
        TreeShape::new(self.fields_per_node, self.nodes_per_field).with_depth(self.depth)
    }

    pub fn with_shape(mut self, fields_per_node: u32, nodes_per_field: u32) -> Self {
        self.fields_per_node = fields_per_node;
        self.nodes_per_field = nodes_per_field;
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_batches(mut self, warmup_batches: u32, batches: u32) -> Self {
        self.warmup_batches = warmup_batches;
        self.batches = batches;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_strategies(mut self, strategies: impl IntoIterator<Item = Strategy>) -> Self {
        self.strategies = strategies.into_iter().collect();
        self
    }
}
