//! Error types for the plutus-chain crate.

/// Error type for all fallible operations in the plutus-chain crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// Returned when no transitions are observable.
    #[error(
        "no transitions observable: {n_subjects} subject(s) x {n_periods} period(s) \
         (need at least 1 subject and 2 periods)"
    )]
    EmptyInput {
        /// Number of subjects (rows) in the grid.
        n_subjects: usize,
        /// Number of periods (columns) in the grid.
        n_periods: usize,
    },

    /// Returned when the conditioning grid shape differs from the state grid shape.
    #[error(
        "shape mismatch: state grid is {rows}x{cols}, conditioning grid is {cond_rows}x{cond_cols}"
    )]
    ShapeMismatch {
        /// Rows in the state grid.
        rows: usize,
        /// Columns in the state grid.
        cols: usize,
        /// Rows in the conditioning grid.
        cond_rows: usize,
        /// Columns in the conditioning grid.
        cond_cols: usize,
    },

    /// Returned when a grid row has a different length from the first row.
    #[error("ragged grid: row {row} has {got} column(s), expected {expected}")]
    RaggedRows {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the offending row.
        got: usize,
        /// Length of the first row.
        expected: usize,
    },

    /// Returned when a probability matrix fails validation.
    #[error("invalid probability matrix: {reason}")]
    InvalidMatrix {
        /// Description of the problem.
        reason: String,
    },
}
