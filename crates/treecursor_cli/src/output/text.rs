//! Text output formatter

use treecursor_core::BenchReport;

pub fn output_text(report: &BenchReport) {
    let shape = &report.shape;
    println!(
        "Tree: {} fields x {} nodes, depth {} ({} nodes)",
        shape.fields_per_node, shape.nodes_per_field, shape.depth, report.expected_count
    );
    println!();
    println!(
        "{:<14} | {:>12} | {:>12} | {:>12} | {:>10}",
        "Strategy", "Mean (ns)", "Min (ns)", "Max (ns)", "Crossings"
    );
    println!(
        "{:-<14}-+-{:->12}-+-{:->12}-+-{:->12}-+-{:->10}",
        "", "", "", "", ""
    );

    for strategy in &report.strategies {
        println!(
            "{:<14} | {:>12.1} | {:>12.1} | {:>12.1} | {:>10.1}",
            strategy.strategy.name(),
            strategy.mean_ns,
            strategy.min_ns,
            strategy.max_ns,
            strategy.crossings_per_traversal
        );
    }

    let checked: u64 = report.strategies.iter().map(|s| s.invocations).sum();
    println!();
    println!(
        "Checked {} traversals, all counted {} nodes",
        checked, report.expected_count
    );
}
