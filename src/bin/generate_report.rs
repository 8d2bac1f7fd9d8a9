//! Assemble a standalone HTML report for one scenario
//!
//! Usage: cargo run --bin generate_report -- [output_dir] [scenario.json]
//!
//! Scenario inputs can also be overridden via environment variables:
//!   UTILIZATION_RATE, BORROW_RATE, WRAPPER_YIELD,
//!   MAX_BORROW_RATE, MAX_LEND_RATE, UTILIZATION_STEPS

use anyhow::{Context, Result};
use fraxlend_apr::report::render_html;
use fraxlend_apr::{ScenarioConfig, ScenarioOverrides, ScenarioRunner};
use log::info;
use std::env;
use std::path::PathBuf;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();

    let start = Instant::now();
    let mut args = env::args().skip(1);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "output".to_string()));

    let scenario_path = args.next().map(PathBuf::from);
    let config = ScenarioConfig::layered(
        scenario_path.as_deref(),
        |name| env::var(name).ok(),
        &ScenarioOverrides::default(),
    )
    .context("resolving scenario")?;

    let report = ScenarioRunner::new(config).run();
    let html = render_html(&report);

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let path = out_dir.join("report.html");
    std::fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;

    info!("Report generated in {:?}", start.elapsed());
    println!("Report written to {}", path.display());
    Ok(())
}
