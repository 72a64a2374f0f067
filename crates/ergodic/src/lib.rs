//! Ergodic analysis of row-stochastic transition matrices.
//!
//! Given a transition probability matrix estimated elsewhere (see
//! `plutus-chain`), this crate computes the long-run behavior of the chain:
//!
//! - [`steady_state`] — the stationary distribution π with πP = π, Σπ = 1;
//! - [`passage_times`] — the matrix of first mean passage times, with mean
//!   recurrence times 1/π on the diagonal.
//!
//! Both solvers require an irreducible chain and report
//! [`ErgodicError::ReducibleChain`] otherwise; a reducible input never
//! silently yields an arbitrary eigenvector or non-finite passage times.
//!
//! # Quick start
//!
//! ```rust
//! use ndarray::array;
//! use plutus_ergodic::{passage_times, steady_state};
//!
//! let p = array![[0.9, 0.1], [0.5, 0.5]];
//! let pi = steady_state(&p).unwrap();
//! let m = passage_times(&p, &pi).unwrap();
//!
//! assert!((pi[0] - 5.0 / 6.0).abs() < 1e-10);
//! assert!((m[[0, 1]] - 10.0).abs() < 1e-10);
//! ```

pub mod error;
pub mod passage;
mod solve;
pub mod steady;

pub use error::ErgodicError;
pub use passage::passage_times;
pub use steady::{is_irreducible, steady_state};
