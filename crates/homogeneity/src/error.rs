//! Error types for the plutus-homogeneity crate.

/// Error type for all fallible operations in the plutus-homogeneity crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HomogeneityError {
    /// Returned when fewer than two conditioning classes are supplied.
    #[error("need at least 2 conditioning classes, got {m}")]
    TooFewClasses {
        /// Number of classes supplied.
        m: usize,
    },

    /// Returned when a class matrix order differs from the pooled matrix.
    #[error("class {class} matrix has order {got}, pooled matrix has order {expected}")]
    OrderMismatch {
        /// Index of the offending class.
        class: usize,
        /// Order of the class matrix.
        got: usize,
        /// Order of the pooled matrix.
        expected: usize,
    },

    /// Returned when the matrices have order zero.
    #[error("count matrices have order 0, nothing to test")]
    EmptyMatrix,

    /// Returned when a class-count cell sum disagrees with the pooled cell.
    #[error(
        "class counts for transition {from}->{to} sum to {summed}, pooled cell has {pooled}"
    )]
    CountMismatch {
        /// Origin state index of the offending cell.
        from: usize,
        /// Destination state index of the offending cell.
        to: usize,
        /// Cell sum across all class matrices.
        summed: u64,
        /// Pooled cell count.
        pooled: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_too_few_classes() {
        let e = HomogeneityError::TooFewClasses { m: 1 };
        assert_eq!(e.to_string(), "need at least 2 conditioning classes, got 1");
    }

    #[test]
    fn error_order_mismatch() {
        let e = HomogeneityError::OrderMismatch {
            class: 2,
            got: 3,
            expected: 4,
        };
        assert_eq!(
            e.to_string(),
            "class 2 matrix has order 3, pooled matrix has order 4"
        );
    }

    #[test]
    fn error_empty_matrix() {
        let e = HomogeneityError::EmptyMatrix;
        assert_eq!(e.to_string(), "count matrices have order 0, nothing to test");
    }

    #[test]
    fn error_count_mismatch() {
        let e = HomogeneityError::CountMismatch {
            from: 1,
            to: 0,
            summed: 90,
            pooled: 100,
        };
        assert_eq!(
            e.to_string(),
            "class counts for transition 1->0 sum to 90, pooled cell has 100"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<HomogeneityError>();
    }
}
