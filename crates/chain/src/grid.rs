//! Label alphabets and panel grids of discrete observations.

use crate::error::ChainError;

/// Sorted, deduplicated set of labels discovered from a grid.
///
/// Maps each label to a dense index `0..k` and back. The order is the `Ord`
/// order of the labels, which makes state indices deterministic across runs
/// regardless of the order labels appear in the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet<L> {
    labels: Vec<L>,
}

impl<L: Ord + Clone> Alphabet<L> {
    /// Builds an alphabet from an iterator of label references.
    pub fn discover<'a>(labels: impl IntoIterator<Item = &'a L>) -> Self
    where
        L: 'a,
    {
        let mut labels: Vec<L> = labels.into_iter().cloned().collect();
        labels.sort();
        labels.dedup();
        Self { labels }
    }
}

impl<L: Ord> Alphabet<L> {
    /// Returns the dense index of a label, or `None` if unknown.
    pub fn index_of(&self, label: &L) -> Option<usize> {
        self.labels.binary_search(label).ok()
    }
}

impl<L> Alphabet<L> {
    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if no labels were discovered.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the label at a dense index, or `None` if out of range.
    pub fn label(&self, index: usize) -> Option<&L> {
        self.labels.get(index)
    }

    /// All labels in index order.
    pub fn labels(&self) -> &[L] {
        &self.labels
    }
}

/// An N x T panel of discrete observations: one row per subject, one column
/// per time period. Stored row-major.
///
/// Invariant: every row has exactly `n_periods` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateGrid<L> {
    cells: Vec<L>,
    n_subjects: usize,
    n_periods: usize,
}

impl<L> StateGrid<L> {
    /// Builds a grid from per-subject rows.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::RaggedRows`] if any row differs in length from
    /// the first row.
    pub fn from_rows(rows: Vec<Vec<L>>) -> Result<Self, ChainError> {
        let n_subjects = rows.len();
        let n_periods = rows.first().map_or(0, Vec::len);

        let mut cells = Vec::with_capacity(n_subjects * n_periods);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_periods {
                return Err(ChainError::RaggedRows {
                    row: i,
                    got: row.len(),
                    expected: n_periods,
                });
            }
            cells.extend(row);
        }

        Ok(Self {
            cells,
            n_subjects,
            n_periods,
        })
    }

    /// Number of subjects (rows).
    pub fn n_subjects(&self) -> usize {
        self.n_subjects
    }

    /// Number of time periods (columns).
    pub fn n_periods(&self) -> usize {
        self.n_periods
    }

    /// The observation for `subject` at `period`.
    ///
    /// # Panics
    ///
    /// Panics if `subject` or `period` is out of range.
    pub fn get(&self, subject: usize, period: usize) -> &L {
        assert!(subject < self.n_subjects, "subject {subject} out of range");
        assert!(period < self.n_periods, "period {period} out of range");
        &self.cells[subject * self.n_periods + period]
    }

    /// The full observation row for one subject.
    ///
    /// # Panics
    ///
    /// Panics if `subject` is out of range.
    pub fn row(&self, subject: usize) -> &[L] {
        assert!(subject < self.n_subjects, "subject {subject} out of range");
        let start = subject * self.n_periods;
        &self.cells[start..start + self.n_periods]
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[L] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_sorted_and_deduped() {
        let data = vec!['c', 'a', 'b', 'a', 'c'];
        let alpha = Alphabet::discover(&data);
        assert_eq!(alpha.labels(), &['a', 'b', 'c']);
        assert_eq!(alpha.len(), 3);
    }

    #[test]
    fn alphabet_index_round_trip() {
        let data = vec![5_i64, 1, 3, 1];
        let alpha = Alphabet::discover(&data);
        for (i, label) in alpha.labels().iter().enumerate() {
            assert_eq!(alpha.index_of(label), Some(i));
            assert_eq!(alpha.label(i), Some(label));
        }
        assert_eq!(alpha.index_of(&99), None);
        assert_eq!(alpha.label(3), None);
    }

    #[test]
    fn alphabet_empty() {
        let alpha: Alphabet<i64> = Alphabet::discover(&[]);
        assert!(alpha.is_empty());
        assert_eq!(alpha.len(), 0);
    }

    #[test]
    fn grid_from_rows_ok() {
        let grid = StateGrid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(grid.n_subjects(), 2);
        assert_eq!(grid.n_periods(), 3);
        assert_eq!(*grid.get(0, 0), 1);
        assert_eq!(*grid.get(1, 2), 6);
        assert_eq!(grid.row(1), &[4, 5, 6]);
    }

    #[test]
    fn grid_from_rows_ragged() {
        let result = StateGrid::from_rows(vec![vec![1, 2, 3], vec![4, 5]]);
        assert_eq!(
            result,
            Err(ChainError::RaggedRows {
                row: 1,
                got: 2,
                expected: 3,
            })
        );
    }

    #[test]
    fn grid_empty() {
        let grid: StateGrid<i64> = StateGrid::from_rows(vec![]).unwrap();
        assert_eq!(grid.n_subjects(), 0);
        assert_eq!(grid.n_periods(), 0);
    }

    #[test]
    #[should_panic(expected = "subject 2 out of range")]
    fn grid_get_out_of_range_panics() {
        let grid = StateGrid::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        grid.get(2, 0);
    }

    #[test]
    fn accessors_need_no_label_bounds() {
        // Generic callers without `Ord`/`Clone` bounds must still be able to
        // read dimensions and labels.
        fn dims<L>(grid: &StateGrid<L>) -> (usize, usize) {
            (grid.n_subjects(), grid.n_periods())
        }
        fn order<L>(alpha: &Alphabet<L>) -> usize {
            alpha.len()
        }

        #[derive(Debug, PartialEq)]
        struct Opaque(u8);

        let grid = StateGrid::from_rows(vec![vec![Opaque(1), Opaque(2)]]).unwrap();
        assert_eq!(dims(&grid), (1, 2));
        assert_eq!(grid.row(0), &[Opaque(1), Opaque(2)]);

        let alpha = Alphabet::discover(&['a', 'b']);
        assert_eq!(order(&alpha), 2);
    }
}
