//! Error types for the plutus-ergodic crate.

/// Error type for all fallible operations in the plutus-ergodic crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErgodicError {
    /// Returned when the input matrix has no rows.
    #[error("matrix is empty")]
    EmptyMatrix,

    /// Returned when the input matrix is not square.
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Returned when a matrix entry is not a probability.
    #[error("entry [{row}][{col}] = {value} is not a probability in [0, 1]")]
    InvalidEntry {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when a row does not sum to 1.
    #[error("matrix is not row-stochastic: row {row} sums to {sum}")]
    NotStochastic {
        /// The offending row.
        row: usize,
        /// Its sum.
        sum: f64,
    },

    /// Returned when the chain has no unique stationary distribution.
    #[error("chain is reducible: state {state} does not communicate with state 0")]
    ReducibleChain {
        /// A state outside the communicating class of state 0.
        state: usize,
    },

    /// Returned when a linear system has no unique solution.
    #[error("singular linear system while {context}")]
    SingularSystem {
        /// What was being solved.
        context: String,
    },

    /// Returned when the stationary vector length does not match the matrix.
    #[error("stationary vector has length {len}, matrix has order {order}")]
    DimensionMismatch {
        /// Length of the supplied vector.
        len: usize,
        /// Order of the matrix.
        order: usize,
    },

    /// Returned when a stationary probability is not positive.
    #[error("stationary probability for state {state} is {value}, expected > 0")]
    InvalidStationary {
        /// The offending state.
        state: usize,
        /// Its stationary probability.
        value: f64,
    },
}
