//! Conditionally bucketed ("spatial Markov") transition estimation.
//!
//! Every transition is bucketed by the value of a parallel conditioning grid
//! at the *origin* period — e.g. the spatial-lag class of a region's
//! neighborhood at time `t` conditions the transition from `t` to `t + 1`.

use tracing::debug;

use crate::error::ChainError;
use crate::grid::{Alphabet, StateGrid};
use crate::transition::{
    MarkovEstimate, TransitionCounts, TransitionMatrix, check_observable, estimate,
};

/// Conditional Markov chain estimate: one transition matrix per conditioning
/// class, plus the pooled (unconditioned) estimate over the same grid.
///
/// Class matrices share the pooled alphabet, so row/column indices line up
/// across all matrices.
#[derive(Debug, Clone)]
pub struct ConditionalEstimate<L, C> {
    pooled: MarkovEstimate<L>,
    classes: Alphabet<C>,
    class_counts: Vec<TransitionCounts>,
    class_matrices: Vec<TransitionMatrix>,
}

impl<L, C> ConditionalEstimate<L, C> {
    /// The pooled (unconditioned) estimate.
    pub fn pooled(&self) -> &MarkovEstimate<L> {
        &self.pooled
    }

    /// The sorted alphabet of conditioning classes.
    ///
    /// Discovered from origin-period cells only: the final period never
    /// buckets a transition, so a class seen only there would produce an
    /// empty matrix.
    pub fn classes(&self) -> &Alphabet<C> {
        &self.classes
    }

    /// Number of conditioning classes m.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// The count matrix for one conditioning class.
    ///
    /// # Panics
    ///
    /// Panics if `class` is out of range.
    pub fn class_counts(&self, class: usize) -> &TransitionCounts {
        &self.class_counts[class]
    }

    /// The probability matrix for one conditioning class.
    ///
    /// # Panics
    ///
    /// Panics if `class` is out of range.
    pub fn class_matrix(&self, class: usize) -> &TransitionMatrix {
        &self.class_matrices[class]
    }

    /// All per-class count matrices in class-index order.
    pub fn all_class_counts(&self) -> &[TransitionCounts] {
        &self.class_counts
    }

    /// All per-class probability matrices in class-index order.
    pub fn all_class_matrices(&self) -> &[TransitionMatrix] {
        &self.class_matrices
    }
}

/// Estimates one transition matrix per conditioning class alongside the
/// pooled matrix.
///
/// `conditioning` must have the same shape as `grid`. Each transition
/// `(t, t + 1)` is assigned to the class given by the conditioning cell at
/// `(subject, t)`. Summing the per-class count matrices reproduces the pooled
/// count matrix exactly.
///
/// # Errors
///
/// Returns [`ChainError::ShapeMismatch`] if the grids disagree in shape, or
/// [`ChainError::EmptyInput`] if no transitions are observable.
pub fn estimate_conditional<L, C>(
    grid: &StateGrid<L>,
    conditioning: &StateGrid<C>,
) -> Result<ConditionalEstimate<L, C>, ChainError>
where
    L: Ord + Clone,
    C: Ord + Clone,
{
    if grid.n_subjects() != conditioning.n_subjects()
        || grid.n_periods() != conditioning.n_periods()
    {
        return Err(ChainError::ShapeMismatch {
            rows: grid.n_subjects(),
            cols: grid.n_periods(),
            cond_rows: conditioning.n_subjects(),
            cond_cols: conditioning.n_periods(),
        });
    }
    check_observable(grid)?;

    let pooled = estimate(grid)?;
    let alphabet = pooled.alphabet();

    // Origin-period conditioning cells: all but the last column.
    let classes = Alphabet::discover(
        (0..conditioning.n_subjects())
            .flat_map(|s| &conditioning.row(s)[..conditioning.n_periods() - 1]),
    );

    let k = alphabet.len();
    let mut class_counts: Vec<TransitionCounts> =
        (0..classes.len()).map(|_| TransitionCounts::zeros(k)).collect();

    for subject in 0..grid.n_subjects() {
        let row = grid.row(subject);
        let cond_row = conditioning.row(subject);
        for t in 1..row.len() {
            // Both alphabets were discovered from these grids.
            let from = alphabet.index_of(&row[t - 1]).unwrap_or_default();
            let to = alphabet.index_of(&row[t]).unwrap_or_default();
            let class = classes.index_of(&cond_row[t - 1]).unwrap_or_default();
            class_counts[class].record(from, to);
        }
    }

    let class_matrices: Vec<TransitionMatrix> = class_counts
        .iter()
        .map(TransitionCounts::to_probabilities)
        .collect();

    debug!(
        k,
        m = classes.len(),
        transitions = pooled.counts().total(),
        "estimated conditional transition matrices"
    );

    Ok(ConditionalEstimate {
        pooled,
        classes,
        class_counts,
        class_matrices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grids() -> (StateGrid<char>, StateGrid<u8>) {
        let states = StateGrid::from_rows(vec![
            vec!['a', 'b', 'a', 'a'],
            vec!['b', 'b', 'a', 'b'],
            vec!['a', 'a', 'b', 'a'],
        ])
        .unwrap();
        let lags = StateGrid::from_rows(vec![
            vec![0, 0, 1, 1],
            vec![1, 1, 0, 0],
            vec![0, 1, 1, 0],
        ])
        .unwrap();
        (states, lags)
    }

    // 1. class_counts_sum_to_pooled
    #[test]
    fn class_counts_sum_to_pooled() {
        let (states, lags) = grids();
        let est = estimate_conditional(&states, &lags).unwrap();
        let pooled = est.pooled().counts();
        let k = pooled.order();
        for i in 0..k {
            for j in 0..k {
                let summed: u64 = (0..est.n_classes())
                    .map(|c| est.class_counts(c).count(i, j))
                    .sum();
                assert_eq!(summed, pooled.count(i, j), "cell ({i}, {j})");
            }
        }
    }

    // 2. origin_period_bucketing
    #[test]
    fn origin_period_bucketing() {
        // Single subject, conditioning flips at t=1: the a->b transition at
        // (0, 1) belongs to class 0 (origin period 0), the b->a transition at
        // (1, 2) belongs to class 1.
        let states = StateGrid::from_rows(vec![vec!['a', 'b', 'a']]).unwrap();
        let lags = StateGrid::from_rows(vec![vec![0_u8, 1, 0]]).unwrap();
        let est = estimate_conditional(&states, &lags).unwrap();

        assert_eq!(est.classes().labels(), &[0, 1]);
        assert_eq!(est.class_counts(0).count(0, 1), 1); // a->b under class 0
        assert_eq!(est.class_counts(0).total(), 1);
        assert_eq!(est.class_counts(1).count(1, 0), 1); // b->a under class 1
        assert_eq!(est.class_counts(1).total(), 1);
    }

    // 3. final_period_class_ignored
    #[test]
    fn final_period_class_ignored() {
        // Class 9 only appears in the final period, so it must not exist.
        let states = StateGrid::from_rows(vec![vec!['a', 'b', 'a']]).unwrap();
        let lags = StateGrid::from_rows(vec![vec![0_u8, 0, 9]]).unwrap();
        let est = estimate_conditional(&states, &lags).unwrap();
        assert_eq!(est.classes().labels(), &[0]);
        assert_eq!(est.n_classes(), 1);
    }

    // 4. shape_mismatch_errors
    #[test]
    fn shape_mismatch_errors() {
        let states = StateGrid::from_rows(vec![vec!['a', 'b', 'a']]).unwrap();
        let lags = StateGrid::from_rows(vec![vec![0_u8, 0]]).unwrap();
        let result = estimate_conditional(&states, &lags);
        assert_eq!(
            result.err(),
            Some(ChainError::ShapeMismatch {
                rows: 1,
                cols: 3,
                cond_rows: 1,
                cond_cols: 2,
            })
        );
    }

    // 5. empty_input_errors
    #[test]
    fn empty_input_errors() {
        let states = StateGrid::from_rows(vec![vec!['a'], vec!['b']]).unwrap();
        let lags = StateGrid::from_rows(vec![vec![0_u8], vec![0]]).unwrap();
        let result = estimate_conditional(&states, &lags);
        assert_eq!(
            result.err(),
            Some(ChainError::EmptyInput {
                n_subjects: 2,
                n_periods: 1,
            })
        );
    }

    // 6. class_rows_normalized
    #[test]
    fn class_rows_normalized() {
        let (states, lags) = grids();
        let est = estimate_conditional(&states, &lags).unwrap();
        for c in 0..est.n_classes() {
            let tm = est.class_matrix(c);
            tm.validate().unwrap();
            for i in 0..tm.order() {
                let sum: f64 = tm.row(i).sum();
                if tm.is_degenerate(i) {
                    assert_relative_eq!(sum, 0.0);
                } else {
                    assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
                }
            }
        }
    }

    // 7. uniform_conditioning_matches_pooled
    #[test]
    fn uniform_conditioning_matches_pooled() {
        let (states, _) = grids();
        let lags = StateGrid::from_rows(vec![vec![0_u8; 4]; 3]).unwrap();
        let est = estimate_conditional(&states, &lags).unwrap();
        assert_eq!(est.n_classes(), 1);
        assert_eq!(est.class_counts(0), est.pooled().counts());
    }
}
