//! JSON report structures for estimation results.

use anyhow::{Context, Result};
use ndarray::Array2;
use serde::Serialize;

use plutus_chain::{MarkovEstimate, TransitionCounts, TransitionMatrix};
use plutus_ergodic::{passage_times, steady_state};
use plutus_homogeneity::HomogeneityResult;

/// Top-level report for the `estimate` subcommand.
#[derive(Debug, Serialize)]
pub struct EstimateReport {
    /// Input panel summary.
    pub input: GridSummary,
    /// Pooled chain estimate and ergodic analysis.
    pub pooled: ChainReport,
}

/// Top-level report for the `spatial` subcommand.
#[derive(Debug, Serialize)]
pub struct SpatialReport {
    /// Input panel summary.
    pub input: GridSummary,
    /// Conditioning-class labels in class-index order.
    pub classes: Vec<i64>,
    /// Pooled chain estimate and ergodic analysis.
    pub pooled: ChainReport,
    /// Per-class estimates in class-index order.
    pub conditional: Vec<ClassReport>,
    /// Homogeneity test results, when requested and applicable.
    pub homogeneity: Option<HomogeneityResult>,
    /// Reason the homogeneity tests were skipped, if they were.
    pub homogeneity_skipped: Option<String>,
}

/// Shape and alphabet of the input panel.
#[derive(Debug, Serialize)]
pub struct GridSummary {
    pub n_subjects: usize,
    pub n_periods: usize,
    pub n_states: usize,
    pub labels: Vec<i64>,
}

/// One estimated chain: counts, probabilities, and ergodic behavior.
#[derive(Debug, Serialize)]
pub struct ChainReport {
    /// Transition counts, row-major.
    pub counts: Vec<Vec<u64>>,
    /// Row-stochastic transition probabilities, row-major.
    pub probabilities: Vec<Vec<f64>>,
    /// Indices of origin states with no observed transitions.
    pub degenerate_rows: Vec<usize>,
    /// Total observed transitions.
    pub n_transitions: u64,
    /// Stationary distribution and passage times, when computable.
    pub ergodics: Option<ErgodicReport>,
    /// Reason the ergodic analysis was skipped, if it was.
    pub ergodics_skipped: Option<String>,
}

/// Long-run behavior of an estimated chain.
#[derive(Debug, Serialize)]
pub struct ErgodicReport {
    /// Stationary distribution over states.
    pub steady_state: Vec<f64>,
    /// First mean passage times, row-major; diagonal is recurrence time.
    pub passage_times: Vec<Vec<f64>>,
}

/// Estimate for one conditioning class.
#[derive(Debug, Serialize)]
pub struct ClassReport {
    /// The conditioning-class label.
    pub class: i64,
    /// Chain estimated from this class's transitions only.
    pub chain: ChainReport,
}

pub fn grid_summary(est: &MarkovEstimate<i64>, n_subjects: usize, n_periods: usize) -> GridSummary {
    GridSummary {
        n_subjects,
        n_periods,
        n_states: est.alphabet().len(),
        labels: est.alphabet().labels().to_vec(),
    }
}

/// Builds a [`ChainReport`], running the ergodic solvers when `ergodics` is
/// set. Reducible chains and degenerate rows downgrade the ergodic section
/// to a skip reason instead of failing the whole report.
pub fn chain_report(
    counts: &TransitionCounts,
    matrix: &TransitionMatrix,
    ergodics: bool,
) -> ChainReport {
    let (ergodic, skipped) = if !ergodics {
        (None, None)
    } else if !matrix.is_complete() {
        (
            None,
            Some(format!(
                "states {:?} were never observed as transition origins",
                matrix.degenerate_rows()
            )),
        )
    } else {
        match steady_state(matrix.probs())
            .and_then(|pi| passage_times(matrix.probs(), &pi).map(|m| (pi, m)))
        {
            Ok((pi, m)) => (
                Some(ErgodicReport {
                    steady_state: pi.to_vec(),
                    passage_times: rows_f64(&m),
                }),
                None,
            ),
            Err(e) => (None, Some(e.to_string())),
        }
    };

    ChainReport {
        counts: rows_u64(counts.counts()),
        probabilities: rows_f64(matrix.probs()),
        degenerate_rows: matrix.degenerate_rows().to_vec(),
        n_transitions: counts.total(),
        ergodics: ergodic,
        ergodics_skipped: skipped,
    }
}

fn rows_f64(m: &Array2<f64>) -> Vec<Vec<f64>> {
    m.rows().into_iter().map(|r| r.to_vec()).collect()
}

fn rows_u64(m: &Array2<u64>) -> Vec<Vec<u64>> {
    m.rows().into_iter().map(|r| r.to_vec()).collect()
}

/// Serialize a report to a pretty-printed JSON string.
pub fn to_json<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use plutus_chain::{StateGrid, estimate};

    fn sticky_estimate() -> MarkovEstimate<i64> {
        // Every state is visited as an origin; chain is irreducible.
        let grid = StateGrid::from_rows(vec![
            vec![1, 1, 2, 1, 2],
            vec![2, 2, 1, 2, 2],
            vec![1, 2, 2, 1, 1],
        ])
        .unwrap();
        estimate(&grid).unwrap()
    }

    #[test]
    fn chain_report_includes_ergodics() {
        let est = sticky_estimate();
        let report = chain_report(est.counts(), est.probabilities(), true);
        let ergodics = report.ergodics.expect("irreducible chain has ergodics");
        assert_eq!(ergodics.steady_state.len(), 2);
        assert_eq!(ergodics.passage_times.len(), 2);
        assert!(report.ergodics_skipped.is_none());
        assert_eq!(report.n_transitions, 12);
    }

    #[test]
    fn chain_report_skips_on_degenerate_rows() {
        // State 3 only appears at the final period.
        let grid = StateGrid::from_rows(vec![vec![1, 2, 3], vec![2, 1, 3]]).unwrap();
        let est = estimate(&grid).unwrap();
        let report = chain_report(est.counts(), est.probabilities(), true);
        assert!(report.ergodics.is_none());
        let reason = report.ergodics_skipped.expect("skip reason");
        assert!(reason.contains("never observed"));
    }

    #[test]
    fn chain_report_respects_toggle() {
        let est = sticky_estimate();
        let report = chain_report(est.counts(), est.probabilities(), false);
        assert!(report.ergodics.is_none());
        assert!(report.ergodics_skipped.is_none());
    }

    #[test]
    fn estimate_report_serializes() {
        let est = sticky_estimate();
        let report = EstimateReport {
            input: grid_summary(&est, 3, 5),
            pooled: chain_report(est.counts(), est.probabilities(), true),
        };
        let json = to_json(&report).unwrap();
        assert!(json.contains("\"n_subjects\": 3"));
        assert!(json.contains("\"n_periods\": 5"));
        assert!(json.contains("\"steady_state\""));
        assert!(json.contains("\"passage_times\""));
    }
}
