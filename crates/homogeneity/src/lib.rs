//! Homogeneity tests for conditional vs pooled Markov transition matrices.
//!
//! Given the per-conditioning-class transition count matrices from
//! `plutus-chain` and the pooled count matrix over the same alphabet, this
//! crate tests the null hypothesis that transition dynamics are independent
//! of the conditioning variable. Three statistics are reported:
//! likelihood-ratio, Pearson chi-squared, and the Kullback information
//! statistic, each with degrees of freedom and an upper-tail p-value.
//!
//! # Quick start
//!
//! ```rust
//! use ndarray::array;
//! use plutus_chain::TransitionCounts;
//! use plutus_homogeneity::test_homogeneity;
//!
//! let a = TransitionCounts::from_matrix(array![[10_u64, 10], [20, 20]]).unwrap();
//! let b = TransitionCounts::from_matrix(array![[30_u64, 30], [5, 5]]).unwrap();
//! let pooled = TransitionCounts::from_matrix(array![[40_u64, 40], [25, 25]]).unwrap();
//!
//! let result = test_homogeneity(&[a, b], &pooled).unwrap();
//! // Identical class dynamics: nothing to reject.
//! assert!(result.likelihood_ratio.p_value > 0.99);
//! ```

pub mod error;
pub mod stats;

pub use error::HomogeneityError;
pub use stats::{HomogeneityResult, TestStatistic, test_homogeneity};
