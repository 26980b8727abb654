//! Destinations for harness progress lines.

use tracing::info;

/// Receives one line per strategy name, per measured batch, and a final `done`.
pub trait ReportSink {
    fn emit(&mut self, line: &str);
}

/// Writes every line as a `tracing` event at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn emit(&mut self, line: &str) {
        info!("{}", line);
    }
}

/// Collects lines in memory.
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    pub lines: Vec<String>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for VecSink {
    fn emit(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
