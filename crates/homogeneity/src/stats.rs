//! Test statistics for conditional-vs-pooled transition matrix comparison.

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use tracing::debug;

use plutus_chain::TransitionCounts;

use crate::error::HomogeneityError;

/// A single test statistic with its degrees of freedom and p-value.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TestStatistic {
    /// The statistic value.
    pub statistic: f64,
    /// Degrees of freedom of the reference chi-squared distribution.
    pub dof: usize,
    /// Upper-tail p-value.
    pub p_value: f64,
}

/// Results of testing the null hypothesis that all conditional transition
/// matrices equal the pooled matrix.
///
/// The likelihood-ratio and Pearson statistics share a zero-row-adjusted
/// degrees-of-freedom count; the Kullback information statistic is reported
/// with the classic unadjusted `k(k-1)(m-1)` and coincides with the
/// likelihood-ratio statistic when no row is structurally zero.
#[derive(Debug, Clone, Serialize)]
pub struct HomogeneityResult {
    /// Likelihood-ratio statistic.
    pub likelihood_ratio: TestStatistic,
    /// Pearson chi-squared statistic.
    pub pearson: TestStatistic,
    /// Kullback information statistic.
    pub kullback: TestStatistic,
}

/// Upper-tail chi-squared probability. Zero degrees of freedom means no free
/// parameters, so there is nothing to reject: the p-value is 1.
fn upper_tail(statistic: f64, dof: usize) -> f64 {
    if dof == 0 || statistic.is_nan() {
        return 1.0;
    }
    if statistic == f64::INFINITY {
        return 0.0;
    }
    // Construction cannot fail for dof >= 1.
    match ChiSquared::new(dof as f64) {
        Ok(dist) => (1.0 - dist.cdf(statistic)).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

fn n_log_n(n: u64) -> f64 {
    if n == 0 {
        0.0
    } else {
        let n = n as f64;
        n * n.ln()
    }
}

/// Tests whether per-class transition dynamics differ from the pooled
/// dynamics.
///
/// `class_counts` holds one count matrix per conditioning class;
/// `pooled` is the unconditioned count matrix over the same alphabet.
/// Cells with a zero observed count contribute nothing to the
/// likelihood-ratio sum (0·ln 0 = 0), and origin rows with a zero marginal in
/// a class contribute no free parameters to the degrees of freedom.
///
/// # Errors
///
/// Returns [`HomogeneityError::TooFewClasses`] for fewer than two classes,
/// [`HomogeneityError::EmptyMatrix`] for order-0 matrices,
/// [`HomogeneityError::OrderMismatch`] when a class matrix disagrees in order
/// with the pooled matrix, and [`HomogeneityError::CountMismatch`] when the
/// class counts do not sum cell-wise to the pooled counts.
pub fn test_homogeneity(
    class_counts: &[TransitionCounts],
    pooled: &TransitionCounts,
) -> Result<HomogeneityResult, HomogeneityError> {
    let m = class_counts.len();
    if m < 2 {
        return Err(HomogeneityError::TooFewClasses { m });
    }
    let k = pooled.order();
    if k == 0 {
        return Err(HomogeneityError::EmptyMatrix);
    }
    for (class, counts) in class_counts.iter().enumerate() {
        if counts.order() != k {
            return Err(HomogeneityError::OrderMismatch {
                class,
                got: counts.order(),
                expected: k,
            });
        }
    }
    // Cell-wise agreement. This also guarantees that every positive class
    // cell has a positive pooled cell (finite likelihood ratios) and that
    // every positive pooled row has at least one positive class row.
    for i in 0..k {
        for j in 0..k {
            let summed: u64 = class_counts.iter().map(|c| c.count(i, j)).sum();
            if summed != pooled.count(i, j) {
                return Err(HomogeneityError::CountMismatch {
                    from: i,
                    to: j,
                    summed,
                    pooled: pooled.count(i, j),
                });
            }
        }
    }

    let pooled_probs = pooled.to_probabilities();

    // Likelihood-ratio and Pearson statistics, accumulated per class cell.
    let mut lr = 0.0;
    let mut pearson = 0.0;
    for counts in class_counts {
        for i in 0..k {
            let row_total = counts.row_total(i);
            if row_total == 0 {
                continue;
            }
            for j in 0..k {
                let n = counts.count(i, j);
                let p_pooled = pooled_probs.prob(i, j);

                let expected = row_total as f64 * p_pooled;
                if expected > 0.0 {
                    let diff = n as f64 - expected;
                    pearson += diff * diff / expected;
                }

                if n > 0 {
                    // A positive cell implies a positive pooled cell, so the
                    // ratio is finite.
                    let p_class = n as f64 / row_total as f64;
                    lr += 2.0 * n as f64 * (p_class / p_pooled).ln();
                }
            }
        }
    }

    // Adjusted DOF: each origin row with a positive marginal contributes
    // (k - 1) free parameters per class under the alternative, minus the
    // pooled parameters under the null. Cell-wise validation guarantees
    // class_rows >= pooled_rows.
    let class_rows: usize = class_counts
        .iter()
        .map(|c| (0..k).filter(|&i| c.row_total(i) > 0).count())
        .sum();
    let pooled_rows = (0..k).filter(|&i| pooled.row_total(i) > 0).count();
    let dof = (k - 1) * (class_rows - pooled_rows);

    // Kullback information statistic via the n·ln(n) closed form over the
    // class x origin x destination contingency structure.
    let mut s_cell = 0.0; // sum over (c, i, j)
    let mut s_class_row = 0.0; // sum over (c, i) marginals
    for counts in class_counts {
        for i in 0..k {
            s_class_row += n_log_n(counts.row_total(i));
            for j in 0..k {
                s_cell += n_log_n(counts.count(i, j));
            }
        }
    }
    let mut s_pooled_cell = 0.0; // sum over (i, j) pooled cells
    let mut s_pooled_row = 0.0; // sum over pooled origin marginals
    for i in 0..k {
        s_pooled_row += n_log_n(pooled.row_total(i));
        for j in 0..k {
            s_pooled_cell += n_log_n(pooled.count(i, j));
        }
    }
    let kullback = 2.0 * (s_cell - s_class_row - s_pooled_cell + s_pooled_row);
    let kullback_dof = k * (k - 1) * (m - 1);

    debug!(k, m, dof, lr, pearson, "homogeneity statistics computed");

    Ok(HomogeneityResult {
        likelihood_ratio: TestStatistic {
            statistic: lr,
            dof,
            p_value: upper_tail(lr, dof),
        },
        pearson: TestStatistic {
            statistic: pearson,
            dof,
            p_value: upper_tail(pearson, dof),
        },
        kullback: TestStatistic {
            statistic: kullback,
            dof: kullback_dof,
            p_value: upper_tail(kullback, kullback_dof),
        },
    })
}
