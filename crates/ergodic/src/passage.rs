//! First mean passage times for an ergodic chain.

use ndarray::{Array1, Array2};
use rayon::prelude::*;
use tracing::debug;

use crate::error::ErgodicError;
use crate::solve::solve;
use crate::steady::{check_irreducible, validate_stochastic};

/// Computes the matrix of first mean passage times for an irreducible
/// row-stochastic matrix `p` with stationary distribution `pi`.
///
/// Entry `(i, j)` is the expected number of steps to first reach state `j`
/// starting from state `i`. For each target `j` the off-diagonal column
/// solves the (k−1)-dimensional system `(I − P₋ⱼ) m = 1`, where `P₋ⱼ` is `P`
/// with row and column `j` removed; the diagonal holds the mean recurrence
/// times `1 / π_j`. The per-target solves are independent and run in
/// parallel.
///
/// # Errors
///
/// - [`ErgodicError::ReducibleChain`] when passage times are not guaranteed
///   finite.
/// - [`ErgodicError::DimensionMismatch`] when `pi` does not match the order
///   of `p`, and [`ErgodicError::InvalidStationary`] when a `pi` entry is not
///   a positive probability.
/// - [`ErgodicError::SingularSystem`] if a per-target system has no unique
///   solution; never silently Inf or NaN.
pub fn passage_times(p: &Array2<f64>, pi: &Array1<f64>) -> Result<Array2<f64>, ErgodicError> {
    validate_stochastic(p)?;
    let k = p.nrows();
    if pi.len() != k {
        return Err(ErgodicError::DimensionMismatch {
            len: pi.len(),
            order: k,
        });
    }
    for (state, &v) in pi.iter().enumerate() {
        if !v.is_finite() || v <= 0.0 || v > 1.0 {
            return Err(ErgodicError::InvalidStationary { state, value: v });
        }
    }
    check_irreducible(p)?;

    let columns: Vec<(usize, Array1<f64>)> = (0..k)
        .into_par_iter()
        .map(|j| {
            let kept: Vec<usize> = (0..k).filter(|&i| i != j).collect();
            let mut a = Array2::zeros((k - 1, k - 1));
            for (ri, &i) in kept.iter().enumerate() {
                for (ci, &l) in kept.iter().enumerate() {
                    let identity = if i == l { 1.0 } else { 0.0 };
                    a[[ri, ci]] = identity - p[[i, l]];
                }
            }
            let b = Array1::ones(k - 1);
            let column = solve(a, b).ok_or_else(|| ErgodicError::SingularSystem {
                context: format!("solving first mean passage times into state {j}"),
            })?;
            Ok((j, column))
        })
        .collect::<Result<_, ErgodicError>>()?;

    let mut times = Array2::zeros((k, k));
    for (j, column) in columns {
        times[[j, j]] = 1.0 / pi[j];
        for (ri, i) in (0..k).filter(|&i| i != j).enumerate() {
            times[[i, j]] = column[ri];
        }
    }

    debug!(k, "first mean passage times solved");
    Ok(times)
}
