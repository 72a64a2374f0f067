//! Estimate command: pooled Markov chain estimation and ergodic analysis.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use plutus_chain::estimate;

use crate::cli::EstimateArgs;
use crate::config::PlutusConfig;
use crate::input::read_grid;
use crate::report::{EstimateReport, chain_report, grid_summary, to_json};

/// Run the pooled estimation pipeline.
pub fn run(args: EstimateArgs) -> Result<()> {
    let _cmd = info_span!("estimate").entered();

    // 1. Load configuration and resolve paths.
    let config = PlutusConfig::load(args.config.as_deref())?;
    let input = args.input.or(config.io.input).ok_or_else(|| {
        anyhow::anyhow!("no input path: set [io].input in config or use --input")
    })?;

    // 2. Read the state grid.
    info!(path = %input.display(), "reading state grid");
    let grid = read_grid(&input)?;
    info!(
        n_subjects = grid.n_subjects(),
        n_periods = grid.n_periods(),
        "state grid loaded"
    );

    // 3. Estimate the pooled chain.
    let est = estimate(&grid).context("estimation failed")?;
    info!(
        k = est.alphabet().len(),
        transitions = est.counts().total(),
        "pooled chain estimated"
    );

    // 4. Build the report, with ergodic analysis when enabled.
    let report = EstimateReport {
        input: grid_summary(&est, grid.n_subjects(), grid.n_periods()),
        pooled: chain_report(est.counts(), est.probabilities(), config.analysis.ergodics),
    };
    let json = to_json(&report)?;

    // 5. Write the report JSON.
    let output = args
        .output
        .or(config.io.output)
        .unwrap_or_else(|| input.with_extension("report.json"));
    std::fs::write(&output, &json)
        .with_context(|| format!("failed to write report: {}", output.display()))?;
    info!(path = %output.display(), "report written");

    Ok(())
}
