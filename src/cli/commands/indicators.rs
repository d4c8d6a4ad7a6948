//! List indicators command.

use anyhow::Result;
use quant_indicators::IndicatorKind;

pub fn run() -> Result<()> {
    println!("Available Indicators");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for kind in IndicatorKind::all() {
        println!("  {:<16} {}", kind.to_string(), kind.description());
        if kind.min_period() > 1 {
            println!("  {:<16} period >= {}", "", kind.min_period());
        }
    }

    println!();
    println!("Use `kind = \"<name>\"` in a [[pipelines.indicators]] table.");

    Ok(())
}
