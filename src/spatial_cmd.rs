//! Spatial command: conditionally bucketed estimation plus homogeneity tests.

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use plutus_chain::estimate_conditional;
use plutus_homogeneity::test_homogeneity;

use crate::cli::SpatialArgs;
use crate::config::PlutusConfig;
use crate::input::read_grid;
use crate::report::{ClassReport, SpatialReport, chain_report, grid_summary, to_json};

/// Run the conditional estimation pipeline.
pub fn run(args: SpatialArgs) -> Result<()> {
    let _cmd = info_span!("spatial").entered();

    // 1. Load configuration and resolve paths.
    let config = PlutusConfig::load(args.config.as_deref())?;
    let input = args.input.or(config.io.input).ok_or_else(|| {
        anyhow::anyhow!("no input path: set [io].input in config or use --input")
    })?;
    let conditioning = args.conditioning.or(config.io.conditioning).ok_or_else(|| {
        anyhow::anyhow!("no conditioning path: set [io].conditioning in config or use --conditioning")
    })?;

    // 2. Read both grids.
    info!(path = %input.display(), "reading state grid");
    let grid = read_grid(&input)?;
    info!(path = %conditioning.display(), "reading conditioning grid");
    let cond = read_grid(&conditioning)?;

    // 3. Estimate per-class and pooled chains.
    let est = estimate_conditional(&grid, &cond).context("conditional estimation failed")?;
    info!(
        k = est.pooled().alphabet().len(),
        m = est.n_classes(),
        transitions = est.pooled().counts().total(),
        "conditional chains estimated"
    );

    // 4. Homogeneity tests across classes.
    let (homogeneity, homogeneity_skipped) = if !config.analysis.homogeneity {
        (None, None)
    } else if est.n_classes() < 2 {
        let reason = format!(
            "only {} conditioning class(es) observed, need at least 2",
            est.n_classes()
        );
        warn!("{reason}");
        (None, Some(reason))
    } else {
        let result = test_homogeneity(est.all_class_counts(), est.pooled().counts())
            .context("homogeneity tests failed")?;
        info!(
            lr = result.likelihood_ratio.statistic,
            p = result.likelihood_ratio.p_value,
            "homogeneity tested"
        );
        (Some(result), None)
    };

    // 5. Build the report.
    let ergodics = config.analysis.ergodics;
    let conditional: Vec<ClassReport> = (0..est.n_classes())
        .map(|c| ClassReport {
            // Classes were discovered from this grid, so the label exists.
            class: est.classes().label(c).copied().unwrap_or_default(),
            chain: chain_report(est.class_counts(c), est.class_matrix(c), ergodics),
        })
        .collect();

    let report = SpatialReport {
        input: grid_summary(est.pooled(), grid.n_subjects(), grid.n_periods()),
        classes: est.classes().labels().to_vec(),
        pooled: chain_report(est.pooled().counts(), est.pooled().probabilities(), ergodics),
        conditional,
        homogeneity,
        homogeneity_skipped,
    };
    let json = to_json(&report)?;

    // 6. Write the report JSON.
    let output = args
        .output
        .or(config.io.output)
        .unwrap_or_else(|| input.with_extension("spatial.json"));
    std::fs::write(&output, &json)
        .with_context(|| format!("failed to write report: {}", output.display()))?;
    info!(path = %output.display(), "report written");

    Ok(())
}
