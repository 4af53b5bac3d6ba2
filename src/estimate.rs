//! Conditional expectation of the number of monochromatic 4-cliques.
//!
//! Every uncolored edge is treated as an independent fair coin over {A, B};
//! colored edges are fixed. The per-quadruple value is the fold described on
//! [`quadruple_probability`], summed over all \(\binom{n}{4}\) quadruples and
//! recomputed from scratch on each call (`O(n^4)`).
//!
//! Every per-quadruple value is `0`, `1` or a power of one half no smaller than
//! `1/32`, so partial sums are multiples of `1/32` and stay exact in an `f64`
//! until \(\binom{n}{4}\) reaches about `2^48`. Within that range the parallel
//! reduction returns the same bits as the sequential loop whatever order rayon
//! combines the partial sums in.

use rayon::prelude::*;

use crate::graph::{choose4, Color, CompleteGraph, Quadruple, Quadruples};

/// Below this many vertices the parallel estimator falls back to the sequential loop.
pub const DEFAULT_PARALLEL_MIN_VERTICES: usize = 12;

/// Folds the six edge colors of one quadruple (canonical order) into its
/// contribution to the expectation.
///
/// Rules, applied edge by edge with an accumulator starting at `1`:
/// - uncolored edge: halve the accumulator, except for the very first edge,
///   which leaves it unchanged;
/// - colored edge with no target yet: it becomes the target;
/// - colored edge matching the target: no change;
/// - colored edge differing from the target: the result is `0`.
///
/// An all-uncolored quadruple yields `1/32`; a fully colored one yields `1`
/// exactly when it is monochromatic.
#[inline]
pub fn quadruple_probability(colors: [Option<Color>; 6]) -> f64 {
    let mut target: Option<Color> = None;
    let mut acc = 1.0f64;
    for (i, color) in colors.into_iter().enumerate() {
        match (color, target) {
            (None, _) => {
                if i > 0 {
                    acc *= 0.5;
                }
            }
            (Some(c), None) => target = Some(c),
            (Some(c), Some(t)) => {
                if c != t {
                    return 0.0;
                }
            }
        }
    }
    acc
}

/// Sum of [`quadruple_probability`] over the quadruples in `quads`.
#[inline]
fn sum_over(graph: &CompleteGraph, quads: Quadruples) -> f64 {
    quads
        .map(|q: Quadruple| quadruple_probability(graph.quadruple_colors(q)))
        .sum()
}

/// Expected number of monochromatic 4-cliques, single-threaded.
pub fn expected_monochromatic_k4(graph: &CompleteGraph) -> f64 {
    sum_over(graph, graph.quadruples())
}

/// Expected number of monochromatic 4-cliques, with the quadruple space
/// partitioned by smallest vertex across the rayon pool.
pub fn expected_monochromatic_k4_par(graph: &CompleteGraph) -> f64 {
    let n = graph.n();
    (0..n.saturating_sub(3))
        .into_par_iter()
        .map(|first| sum_over(graph, Quadruples::with_first(first, n)))
        .sum()
}

/// Expectation of the all-uncolored \(K_n\): \(\binom{n}{4} / 32\).
pub fn initial_expectation(n: usize) -> f64 {
    choose4(n as u64) as f64 / 32.0
}

/// Picks the sequential or the parallel estimator for a given graph size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Estimator {
    parallel: bool,
    parallel_min_vertices: usize,
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new(true, DEFAULT_PARALLEL_MIN_VERTICES)
    }
}

impl Estimator {
    /// Creates an estimator. With `parallel` set, graphs of at least
    /// `parallel_min_vertices` vertices are evaluated on the rayon pool.
    pub const fn new(parallel: bool, parallel_min_vertices: usize) -> Self {
        Self {
            parallel,
            parallel_min_vertices,
        }
    }

    /// A strictly single-threaded estimator.
    pub const fn sequential() -> Self {
        Self::new(false, usize::MAX)
    }

    /// Whether a graph on `n` vertices would be evaluated in parallel.
    #[inline]
    pub fn is_parallel_for(&self, n: usize) -> bool {
        self.parallel && n >= self.parallel_min_vertices
    }

    /// Expected number of monochromatic 4-cliques of `graph`.
    #[inline]
    pub fn expectation(&self, graph: &CompleteGraph) -> f64 {
        if self.is_parallel_for(graph.n()) {
            expected_monochromatic_k4_par(graph)
        } else {
            expected_monochromatic_k4(graph)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
