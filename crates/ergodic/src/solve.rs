//! Dense linear solve via Gaussian elimination with partial pivoting.
//!
//! The systems solved in this crate have order k (number of chain states),
//! which is small — typically under a dozen — so a direct dense elimination
//! is both adequate and dependency-free.
//!
//! **Not part of the public API.**

use ndarray::{Array1, Array2};

/// Pivots with absolute value below this are treated as zero.
const PIVOT_TOL: f64 = 1e-12;

/// Solves `A x = b`, consuming both. Returns `None` when no pivot of
/// sufficient magnitude exists (singular or near-singular system).
pub(crate) fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    debug_assert_eq!(a.ncols(), n, "coefficient matrix must be square");
    debug_assert_eq!(b.len(), n, "rhs length must match matrix order");

    // Forward elimination.
    for col in 0..n {
        let mut pivot_row = col;
        let mut pivot_mag = a[[col, col]].abs();
        for r in col + 1..n {
            let mag = a[[r, col]].abs();
            if mag > pivot_mag {
                pivot_row = r;
                pivot_mag = mag;
            }
        }
        if !pivot_mag.is_finite() || pivot_mag < PIVOT_TOL {
            return None;
        }
        if pivot_row != col {
            for c in col..n {
                a.swap([col, c], [pivot_row, c]);
            }
            b.swap(col, pivot_row);
        }

        let pivot = a[[col, col]];
        for r in col + 1..n {
            let factor = a[[r, col]] / pivot;
            if factor == 0.0 {
                continue;
            }
            for c in col..n {
                a[[r, c]] -= factor * a[[col, c]];
            }
            b[r] -= factor * b[col];
        }
    }

    // Back substitution.
    let mut x = Array1::zeros(n);
    for row in (0..n).rev() {
        let mut acc = b[row];
        for c in row + 1..n {
            acc -= a[[row, c]] * x[c];
        }
        x[row] = acc / a[[row, row]];
    }
    Some(x)
}
