//! gold-sim: drives the USDGOLD rebase machinery in-process.
//!
//! Runs the supply precision walk, then a scripted policy run over the
//! configured market-rate path, and prints a JSON report to stdout. Logs go
//! to stderr.

mod config;
mod precision;
mod scenario;

use serde::Serialize;
use tracing::info;

use crate::config::SimConfig;
use crate::precision::PrecisionReport;
use crate::scenario::ScenarioReport;

#[derive(Serialize)]
struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    precision: Option<PrecisionReport>,
    scenario: ScenarioReport,
}

fn main() -> anyhow::Result<()> {
    let config = SimConfig::load()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log.directive().parse()?),
        )
        .init();

    info!(
        initial_supply = config.ledger.initial_supply,
        epochs = config.simulation.market_rates.len(),
        "gold-sim starting"
    );

    let precision = if config.simulation.precision_check {
        Some(precision::run(config.ledger.initial_supply)?)
    } else {
        None
    };

    let scenario = scenario::run(&config)?;
    info!(final_supply = scenario.final_supply, "gold-sim finished");

    let report = Report {
        precision,
        scenario,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
