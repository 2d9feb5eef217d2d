//! In-game counts per entity kind

use anyhow::Result;
use std::path::Path;
use xdtinfo::ValiditySummary;

/// One line per entity kind
pub fn render(summary: &ValiditySummary) -> Vec<String> {
    summary
        .0
        .iter()
        .map(|(kind, count)| format!("{:<16} {:>8} / {:<8}", kind, count.in_game, count.total))
        .collect()
}

pub fn handle(build_dir: &Path, server_data_dir: &Path, patches: &[String]) -> Result<()> {
    let derived = super::derive_one(build_dir, server_data_dir, patches)?;

    println!("{:<16} {:>8} / {:<8}", "Kind", "In game", "Total");
    println!("{}", "-".repeat(35));
    for line in render(&derived.validity) {
        println!("{}", line);
    }

    let cycles = derived.sources.diagnostics.len();
    if cycles > 0 {
        println!("\n{} items skipped: their crates contain themselves", cycles);
    }
    Ok(())
}
