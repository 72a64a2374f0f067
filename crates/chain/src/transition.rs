//! Pooled transition counting and row-stochastic matrix estimation.

use ndarray::{Array2, ArrayView1};
use tracing::debug;

use crate::error::ChainError;
use crate::grid::{Alphabet, StateGrid};

/// Row-sum tolerance for [`TransitionMatrix::validate`].
const ROW_SUM_TOL: f64 = 1e-9;

/// A k x k matrix of observed one-step transition counts.
///
/// Entry `(i, j)` is the number of observed transitions from state `i` to
/// state `j`, pooled over all subjects and consecutive period pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionCounts {
    counts: Array2<u64>,
}

impl TransitionCounts {
    pub(crate) fn zeros(k: usize) -> Self {
        Self {
            counts: Array2::zeros((k, k)),
        }
    }

    /// Wraps an existing k x k count matrix.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidMatrix`] if the matrix is not square.
    pub fn from_matrix(counts: Array2<u64>) -> Result<Self, ChainError> {
        if counts.nrows() != counts.ncols() {
            return Err(ChainError::InvalidMatrix {
                reason: format!(
                    "count matrix is not square: {}x{}",
                    counts.nrows(),
                    counts.ncols()
                ),
            });
        }
        Ok(Self { counts })
    }

    pub(crate) fn record(&mut self, from: usize, to: usize) {
        self.counts[[from, to]] += 1;
    }

    /// Number of states k.
    pub fn order(&self) -> usize {
        self.counts.nrows()
    }

    /// The count of observed transitions from state `from` to state `to`.
    pub fn count(&self, from: usize, to: usize) -> u64 {
        self.counts[[from, to]]
    }

    /// The full count matrix.
    pub fn counts(&self) -> &Array2<u64> {
        &self.counts
    }

    /// Total transitions observed out of state `from`.
    pub fn row_total(&self, from: usize) -> u64 {
        self.counts.row(from).sum()
    }

    /// Total transitions observed. Equals N x (T - 1) for an unconditioned
    /// estimate over an N x T grid.
    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    /// Row-normalizes the counts into a [`TransitionMatrix`].
    ///
    /// Rows with a zero total are left all-zero and flagged as degenerate
    /// rather than divided by zero or filled with an invented distribution.
    pub fn to_probabilities(&self) -> TransitionMatrix {
        let k = self.order();
        let mut probs = Array2::zeros((k, k));
        let mut degenerate_rows = Vec::new();

        for i in 0..k {
            let row_total = self.row_total(i);
            if row_total == 0 {
                degenerate_rows.push(i);
                continue;
            }
            for j in 0..k {
                probs[[i, j]] = self.counts[[i, j]] as f64 / row_total as f64;
            }
        }

        TransitionMatrix {
            probs,
            degenerate_rows,
        }
    }
}

/// A k x k row-stochastic transition probability matrix.
///
/// Each non-degenerate row is a probability distribution over next states.
/// Degenerate rows (states never observed as a transition origin) are all-zero
/// and their indices are listed in [`TransitionMatrix::degenerate_rows`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    probs: Array2<f64>,
    degenerate_rows: Vec<usize>,
}

impl TransitionMatrix {
    /// Number of states k.
    pub fn order(&self) -> usize {
        self.probs.nrows()
    }

    /// The probability of transitioning from state `from` to state `to`.
    pub fn prob(&self, from: usize, to: usize) -> f64 {
        self.probs[[from, to]]
    }

    /// The transition distribution out of state `from`.
    pub fn row(&self, from: usize) -> ArrayView1<'_, f64> {
        self.probs.row(from)
    }

    /// The full probability matrix.
    pub fn probs(&self) -> &Array2<f64> {
        &self.probs
    }

    /// Indices of rows with no observed transitions, in ascending order.
    pub fn degenerate_rows(&self) -> &[usize] {
        &self.degenerate_rows
    }

    /// True if state `from` was never observed as a transition origin.
    pub fn is_degenerate(&self, from: usize) -> bool {
        self.degenerate_rows.binary_search(&from).is_ok()
    }

    /// True if no row is degenerate.
    pub fn is_complete(&self) -> bool {
        self.degenerate_rows.is_empty()
    }

    /// Validates that the matrix is row-stochastic.
    ///
    /// Checks that all entries are finite and in `[0, 1]`, and that each row
    /// sums to approximately 1.0 — except degenerate rows, which must be
    /// exactly all-zero.
    pub fn validate(&self) -> Result<(), ChainError> {
        for (i, row) in self.probs.rows().into_iter().enumerate() {
            let mut sum = 0.0;
            for (j, &p) in row.iter().enumerate() {
                if !p.is_finite() {
                    return Err(ChainError::InvalidMatrix {
                        reason: format!("probs[{i}][{j}] is not finite: {p}"),
                    });
                }
                if !(0.0..=1.0).contains(&p) {
                    return Err(ChainError::InvalidMatrix {
                        reason: format!("probs[{i}][{j}] = {p} is outside [0, 1]"),
                    });
                }
                sum += p;
            }
            if self.is_degenerate(i) {
                if sum != 0.0 {
                    return Err(ChainError::InvalidMatrix {
                        reason: format!("degenerate row {i} is not all-zero (sums to {sum})"),
                    });
                }
            } else if (sum - 1.0).abs() > ROW_SUM_TOL {
                return Err(ChainError::InvalidMatrix {
                    reason: format!("row {i} sums to {sum}, expected ~1.0"),
                });
            }
        }
        Ok(())
    }
}

/// Pooled Markov chain estimate: alphabet, counts, and probabilities.
///
/// All fields are derived once from the input grid and immutable thereafter.
#[derive(Debug, Clone)]
pub struct MarkovEstimate<L> {
    alphabet: Alphabet<L>,
    counts: TransitionCounts,
    probabilities: TransitionMatrix,
}

impl<L> MarkovEstimate<L> {
    /// The sorted alphabet of states discovered in the grid.
    pub fn alphabet(&self) -> &Alphabet<L> {
        &self.alphabet
    }

    /// The pooled transition count matrix.
    pub fn counts(&self) -> &TransitionCounts {
        &self.counts
    }

    /// The pooled transition probability matrix.
    pub fn probabilities(&self) -> &TransitionMatrix {
        &self.probabilities
    }
}

pub(crate) fn check_observable<L>(grid: &StateGrid<L>) -> Result<(), ChainError> {
    if grid.n_subjects() == 0 || grid.n_periods() < 2 {
        return Err(ChainError::EmptyInput {
            n_subjects: grid.n_subjects(),
            n_periods: grid.n_periods(),
        });
    }
    Ok(())
}

/// Estimates a pooled first-order Markov chain from a panel of observations.
///
/// Every consecutive pair of periods `(t, t + 1)` for every subject
/// contributes one transition. The state alphabet is discovered from the grid
/// and sorted; the count matrix is row-normalized with zero-total rows left
/// as flagged all-zero rows.
///
/// # Errors
///
/// Returns [`ChainError::EmptyInput`] if the grid has no subjects or fewer
/// than 2 periods.
pub fn estimate<L: Ord + Clone>(grid: &StateGrid<L>) -> Result<MarkovEstimate<L>, ChainError> {
    check_observable(grid)?;

    let alphabet = Alphabet::discover(grid.cells());
    let mut counts = TransitionCounts::zeros(alphabet.len());

    for subject in 0..grid.n_subjects() {
        let row = grid.row(subject);
        for t in 1..row.len() {
            // Alphabet was discovered from this grid, so lookups cannot miss.
            let from = alphabet.index_of(&row[t - 1]).unwrap_or_default();
            let to = alphabet.index_of(&row[t]).unwrap_or_default();
            counts.record(from, to);
        }
    }

    let probabilities = counts.to_probabilities();
    debug!(
        k = alphabet.len(),
        transitions = counts.total(),
        degenerate_rows = probabilities.degenerate_rows().len(),
        "estimated pooled transition matrix"
    );

    Ok(MarkovEstimate {
        alphabet,
        counts,
        probabilities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(rows: Vec<Vec<char>>) -> StateGrid<char> {
        StateGrid::from_rows(rows).unwrap()
    }

    // 1. estimate_total_invariant
    #[test]
    fn estimate_total_invariant() {
        let g = grid(vec![
            vec!['a', 'b', 'a', 'a'],
            vec!['b', 'b', 'a', 'b'],
            vec!['a', 'a', 'a', 'a'],
        ]);
        let est = estimate(&g).unwrap();
        assert_eq!(est.counts().total(), 3 * (4 - 1));
    }

    // 2. estimate_simple_counts
    #[test]
    fn estimate_simple_counts() {
        // a->b, b->a, a->a
        let g = grid(vec![vec!['a', 'b', 'a', 'a']]);
        let est = estimate(&g).unwrap();
        assert_eq!(est.alphabet().labels(), &['a', 'b']);
        assert_eq!(est.counts().count(0, 0), 1); // a->a
        assert_eq!(est.counts().count(0, 1), 1); // a->b
        assert_eq!(est.counts().count(1, 0), 1); // b->a
        assert_eq!(est.counts().count(1, 1), 0);
    }

    // 3. estimate_rows_sum_to_one
    #[test]
    fn estimate_rows_sum_to_one() {
        let g = grid(vec![
            vec!['a', 'b', 'c', 'a', 'b'],
            vec!['c', 'c', 'b', 'a', 'a'],
        ]);
        let est = estimate(&g).unwrap();
        let tm = est.probabilities();
        assert!(tm.is_complete());
        for i in 0..tm.order() {
            let sum: f64 = tm.row(i).sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        }
        tm.validate().unwrap();
    }

    // 4. estimate_degenerate_row_flagged
    #[test]
    fn estimate_degenerate_row_flagged() {
        // 'c' only ever appears in the final period: never an origin.
        let g = grid(vec![vec!['a', 'b', 'c'], vec!['b', 'a', 'c']]);
        let est = estimate(&g).unwrap();
        let tm = est.probabilities();
        let c = est.alphabet().index_of(&'c').unwrap();
        assert_eq!(tm.degenerate_rows(), &[c]);
        assert!(tm.is_degenerate(c));
        assert!(!tm.is_degenerate(0));
        assert_relative_eq!(tm.row(c).sum(), 0.0);
        tm.validate().unwrap();
    }

    // 5. estimate_empty_errors
    #[test]
    fn estimate_empty_errors() {
        let g: StateGrid<char> = StateGrid::from_rows(vec![]).unwrap();
        assert_eq!(
            estimate(&g).err(),
            Some(ChainError::EmptyInput {
                n_subjects: 0,
                n_periods: 0,
            })
        );

        let g = grid(vec![vec!['a'], vec!['b']]);
        assert_eq!(
            estimate(&g).err(),
            Some(ChainError::EmptyInput {
                n_subjects: 2,
                n_periods: 1,
            })
        );
    }

    // 6. validate_rejects_bad_sum
    #[test]
    fn validate_rejects_bad_sum() {
        let g = grid(vec![vec!['a', 'b', 'a']]);
        let mut tm = estimate(&g).unwrap().probabilities().clone();
        tm.probs[[0, 0]] = 0.9; // corrupt a row
        assert!(matches!(
            tm.validate(),
            Err(ChainError::InvalidMatrix { .. })
        ));
    }

    // 7. validate_rejects_non_finite
    #[test]
    fn validate_rejects_non_finite() {
        let g = grid(vec![vec!['a', 'b', 'a']]);
        let mut tm = estimate(&g).unwrap().probabilities().clone();
        tm.probs[[0, 0]] = f64::NAN;
        assert!(matches!(
            tm.validate(),
            Err(ChainError::InvalidMatrix { .. })
        ));
    }

    // 8. single_state_chain
    #[test]
    fn single_state_chain() {
        let g = grid(vec![vec!['a', 'a', 'a', 'a']]);
        let est = estimate(&g).unwrap();
        assert_eq!(est.alphabet().len(), 1);
        assert_eq!(est.counts().count(0, 0), 3);
        assert_relative_eq!(est.probabilities().prob(0, 0), 1.0);
    }
}
