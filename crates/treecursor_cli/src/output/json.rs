//! JSON output formatter

use miette::{IntoDiagnostic, Result};
use treecursor_core::BenchReport;

pub fn output_json(report: &BenchReport) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(report).into_diagnostic()?
    );
    Ok(())
}
