//! Discrete Markov chain estimation from panels of categorical observations.
//!
//! This crate consumes an N x T grid of discrete state labels (one row per
//! subject, one column per time period) and produces transition counts,
//! row-stochastic transition probability matrices, and — when a parallel
//! conditioning grid is supplied — one matrix per conditioning class (the
//! "spatial Markov" layout).
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌────────────────┐     ┌──────────────────────┐
//!  │  StateGrid    │────▶│  estimate      │────▶│  plutus-ergodic /    │
//!  │  (N x T)      │     │  (counts, P)   │     │  plutus-homogeneity  │
//!  └──────────────┘     └────────────────┘     └──────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use plutus_chain::{StateGrid, estimate};
//!
//! let grid = StateGrid::from_rows(vec![
//!     vec![1_i64, 2, 1],
//!     vec![2, 2, 3],
//! ]).unwrap();
//!
//! let est = estimate(&grid).unwrap();
//! assert_eq!(est.counts().total(), 4); // N * (T - 1)
//! ```

pub mod conditional;
pub mod error;
pub mod grid;
pub mod transition;

pub use conditional::{ConditionalEstimate, estimate_conditional};
pub use error::ChainError;
pub use grid::{Alphabet, StateGrid};
pub use transition::{MarkovEstimate, TransitionCounts, TransitionMatrix, estimate};
