//! Stationary distribution of a row-stochastic matrix.

use ndarray::{Array1, Array2, array};
use tracing::debug;

use crate::error::ErgodicError;
use crate::solve::solve;

/// Row-sum tolerance when checking stochasticity.
const ROW_SUM_TOL: f64 = 1e-8;

/// Checks that `p` is square, non-empty, and row-stochastic.
pub(crate) fn validate_stochastic(p: &Array2<f64>) -> Result<(), ErgodicError> {
    if p.nrows() == 0 {
        return Err(ErgodicError::EmptyMatrix);
    }
    if p.nrows() != p.ncols() {
        return Err(ErgodicError::NotSquare {
            rows: p.nrows(),
            cols: p.ncols(),
        });
    }
    for (i, row) in p.rows().into_iter().enumerate() {
        let mut sum = 0.0;
        for (j, &v) in row.iter().enumerate() {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(ErgodicError::InvalidEntry {
                    row: i,
                    col: j,
                    value: v,
                });
            }
            sum += v;
        }
        if (sum - 1.0).abs() > ROW_SUM_TOL {
            return Err(ErgodicError::NotStochastic { row: i, sum });
        }
    }
    Ok(())
}

/// True if every state communicates with every other state.
///
/// Runs forward and backward reachability over the positive-entry adjacency
/// structure starting from state 0; the chain is irreducible exactly when
/// both searches reach every state.
pub fn is_irreducible(p: &Array2<f64>) -> bool {
    check_irreducible(p).is_ok()
}

pub(crate) fn check_irreducible(p: &Array2<f64>) -> Result<(), ErgodicError> {
    let k = p.nrows();
    let forward = reachable(p, false);
    let backward = reachable(p, true);
    for state in 0..k {
        if !forward[state] || !backward[state] {
            return Err(ErgodicError::ReducibleChain { state });
        }
    }
    Ok(())
}

/// States reachable from state 0 following positive entries, optionally on
/// the transposed structure.
fn reachable(p: &Array2<f64>, transpose: bool) -> Vec<bool> {
    let k = p.nrows();
    let mut seen = vec![false; k];
    if k == 0 {
        return seen;
    }
    let mut stack = vec![0_usize];
    seen[0] = true;
    while let Some(i) = stack.pop() {
        for j in 0..k {
            let edge = if transpose { p[[j, i]] } else { p[[i, j]] };
            if edge > 0.0 && !seen[j] {
                seen[j] = true;
                stack.push(j);
            }
        }
    }
    seen
}

/// Computes the stationary distribution π of an irreducible row-stochastic
/// matrix: the unique probability vector with πP = π.
///
/// Solves the linear system (Pᵀ − I)π = 0 with one equation replaced by the
/// normalization constraint Σπ = 1, then clips negligible negative numerical
/// residue to zero and renormalizes.
///
/// # Errors
///
/// - [`ErgodicError::ReducibleChain`] when the chain has no unique stationary
///   distribution. Detected structurally up front — this solver never returns
///   an arbitrary eigenvector for a reducible input.
/// - [`ErgodicError::NotStochastic`] / [`ErgodicError::InvalidEntry`] /
///   [`ErgodicError::NotSquare`] / [`ErgodicError::EmptyMatrix`] for malformed
///   input.
/// - [`ErgodicError::SingularSystem`] if elimination still breaks down.
pub fn steady_state(p: &Array2<f64>) -> Result<Array1<f64>, ErgodicError> {
    validate_stochastic(p)?;
    check_irreducible(p)?;

    let k = p.nrows();
    if k == 1 {
        return Ok(array![1.0]);
    }

    // A = P^T - I, last equation replaced by the normalization row.
    let mut a = p.t().to_owned();
    for i in 0..k {
        a[[i, i]] -= 1.0;
    }
    for j in 0..k {
        a[[k - 1, j]] = 1.0;
    }
    let mut b = Array1::zeros(k);
    b[k - 1] = 1.0;

    let mut pi = solve(a, b).ok_or_else(|| ErgodicError::SingularSystem {
        context: "solving for the stationary distribution".to_string(),
    })?;

    // Clip numerical residue and renormalize.
    pi.mapv_inplace(|v| if v < 0.0 { 0.0 } else { v });
    let total = pi.sum();
    if !(total > 0.0) || !total.is_finite() {
        return Err(ErgodicError::SingularSystem {
            context: "normalizing the stationary distribution".to_string(),
        });
    }
    pi.mapv_inplace(|v| v / total);

    debug!(k, "stationary distribution solved");
    Ok(pi)
}
