//! # K4 Derandomization
//!
//! A deterministic 2-coloring of the edges of \(K_n\) that keeps the number of
//! monochromatic 4-cliques at or below its random-coloring expectation, found
//! with the method of conditional expectations.
//!
//! This crate provides:
//! - A complete-graph model with a per-edge color slot that only moves from
//!   uncolored to `A` or `B`.
//! - An exact conditional-expectation estimator over all \(\binom{n}{4}\)
//!   quadruples, optionally split across a rayon pool.
//! - The greedy derandomizer that commits edges one at a time in lexicographic order.
//! - An exhaustive counter and the closed-form ceiling \(n(n-1)(n-2)(n-3)/64\).
//!
//! ## Quick Start
//!
//! ```
//! use k4_derand::{count_monochromatic_k4, theoretical_ceiling, two_color};
//!
//! let graph = two_color(10).expect("n is non-negative");
//! let count = count_monochromatic_k4(&graph).expect("every edge is colored");
//! assert!(count <= theoretical_ceiling(10));
//! ```
//!
//! ## Full Pipeline
//!
//! ```
//! use k4_derand::solve::{solve, ColoringConfig};
//!
//! let outcome = solve(8, &ColoringConfig::sequential()).unwrap();
//! assert!(outcome.graph.is_fully_colored());
//! assert!(outcome.trace.final_expectation <= outcome.trace.initial_expectation);
//! assert_eq!(outcome.count as f64, outcome.trace.final_expectation);
//! ```
//!
//! ## Modules
//!
//! - [`graph`]: Complete graph, edges, colors and quadruple enumeration.
//! - [`estimate`]: Conditional expectation of monochromatic 4-cliques.
//! - [`derandomize`]: Edge-by-edge method of conditional expectations.
//! - [`validate`]: Exact counting and the ceiling check.
//! - [`solve`]: Configuration and the end-to-end pipeline.
//!
//! ## Performance Notes
//!
//! - Each expectation is recomputed from scratch in `O(n^4)`, twice per edge, so a
//!   full pass is `O(n^6)`.
//! - The parallel estimator partitions quadruples by smallest vertex; its result is
//!   bit-identical to the sequential one.
//! - For maximum performance, compile with: `RUSTFLAGS="-C target-cpu=native" cargo build --release`

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::inline_always)] // Intentional for hot-path code
#![allow(clippy::many_single_char_names)] // Mathematical variable names
#![allow(clippy::doc_markdown)] // LaTeX-style notation in docs
#![allow(clippy::float_cmp)] // Expectations are exact dyadic rationals
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod derandomize;
pub mod error;
pub mod estimate;
pub mod graph;
pub mod solve;
pub mod validate;

pub use error::{ColoringError, Result};
pub use estimate::expected_monochromatic_k4;
pub use graph::{Color, CompleteGraph, Edge, Quadruple};
pub use solve::two_color;
pub use validate::{count_monochromatic_k4, theoretical_ceiling};

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::derandomize::{Decision, Derandomizer, Trace};
    pub use crate::error::{ColoringError, Result};
    pub use crate::estimate::{expected_monochromatic_k4, initial_expectation, Estimator};
    pub use crate::graph::{Color, CompleteGraph, Edge, Quadruple};
    pub use crate::solve::{solve, solve_with, two_color, ColoringConfig, ColoringOutcome};
    pub use crate::validate::{count_monochromatic_k4, theoretical_ceiling, validate_coloring};
}
