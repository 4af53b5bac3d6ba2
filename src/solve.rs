//! End-to-end pipeline: build \(K_n\), derandomize the coloring, count what is left.

use serde::Serialize;
use tracing::info;

use crate::derandomize::{Decision, Derandomizer, Trace};
use crate::error::Result;
use crate::estimate::{Estimator, DEFAULT_PARALLEL_MIN_VERTICES};
use crate::graph::{Color, CompleteGraph};
use crate::validate::{theoretical_ceiling, validate_coloring};

// ============================================================================
// Configuration
// ============================================================================

/// Pipeline configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColoringConfig {
    /// Evaluate each expectation on the rayon pool.
    pub parallel: bool,
    /// Graphs smaller than this are evaluated sequentially even when `parallel` is set.
    pub parallel_min_vertices: usize,
    /// Fail the pass if a commit raises the expectation.
    pub check_monotone: bool,
}

impl Default for ColoringConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_min_vertices: DEFAULT_PARALLEL_MIN_VERTICES,
            check_monotone: true,
        }
    }
}

impl ColoringConfig {
    /// A configuration that never leaves the calling thread.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Estimator selected by this configuration.
    pub fn estimator(&self) -> Estimator {
        Estimator::new(self.parallel, self.parallel_min_vertices)
    }

    /// Derandomizer selected by this configuration.
    pub fn derandomizer(&self) -> Derandomizer {
        Derandomizer::new(self.estimator(), self.check_monotone)
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Everything a run produces: the coloring, its decision trace and the count.
#[derive(Clone, Debug)]
pub struct ColoringOutcome {
    /// The fully colored graph.
    pub graph: CompleteGraph,
    /// Expectations and decisions of the pass.
    pub trace: Trace,
    /// Exact number of monochromatic 4-cliques.
    pub count: u64,
    /// `floor(n(n-1)(n-2)(n-3)/64)`.
    pub ceiling: u64,
}

/// Serializable summary of a [`ColoringOutcome`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColoringReport {
    /// Vertex count.
    pub n: usize,
    /// Edge count.
    pub edges: usize,
    /// Edges colored `A`.
    pub edges_a: usize,
    /// Edges colored `B`.
    pub edges_b: usize,
    /// Expectation of the uncolored graph.
    pub initial_expectation: f64,
    /// Expectation after the last commit.
    pub final_expectation: f64,
    /// Exact number of monochromatic 4-cliques.
    pub count: u64,
    /// Closed-form ceiling.
    pub ceiling: u64,
}

impl ColoringOutcome {
    /// Summary suitable for printing or serializing.
    pub fn report(&self) -> ColoringReport {
        ColoringReport {
            n: self.graph.n(),
            edges: self.graph.edge_count(),
            edges_a: self.graph.color_count(Color::A),
            edges_b: self.graph.color_count(Color::B),
            initial_expectation: self.trace.initial_expectation,
            final_expectation: self.trace.final_expectation,
            count: self.count,
            ceiling: self.ceiling,
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Builds \(K_n\) and colors every edge with the default configuration.
///
/// # Errors
/// Returns [`crate::ColoringError::InvalidSize`] if `n < 0`.
pub fn two_color(n: i64) -> Result<CompleteGraph> {
    let mut graph = CompleteGraph::build(n)?;
    ColoringConfig::default().derandomizer().run(&mut graph)?;
    Ok(graph)
}

/// Runs the whole pipeline for `n` vertices.
///
/// # Errors
/// See [`solve_with`].
pub fn solve(n: i64, config: &ColoringConfig) -> Result<ColoringOutcome> {
    solve_with(n, config, |_| {})
}

/// Runs the whole pipeline for `n` vertices, calling `on_decision` after every
/// committed edge.
///
/// # Errors
/// Returns [`crate::ColoringError::InvalidSize`] for negative `n`, any error raised
/// by the derandomizer, and [`crate::ColoringError::CeilingExceeded`] if the
/// final count is above the ceiling.
pub fn solve_with<F>(n: i64, config: &ColoringConfig, on_decision: F) -> Result<ColoringOutcome>
where
    F: FnMut(&Decision),
{
    let mut graph = CompleteGraph::build(n)?;
    let trace = config.derandomizer().run_with(&mut graph, on_decision)?;
    let count = validate_coloring(&graph)?;
    let ceiling = theoretical_ceiling(graph.n() as u64);
    debug_assert_eq!(trace.final_expectation, count as f64);

    info!(
        n = graph.n(),
        count,
        ceiling,
        initial_expectation = trace.initial_expectation,
        "monochromatic K4 counted"
    );
    Ok(ColoringOutcome {
        graph,
        trace,
        count,
        ceiling,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ColoringError;
    use crate::validate::count_monochromatic_k4;

    #[test]
    fn default_config_is_parallel_and_checked() {
        let cfg = ColoringConfig::default();
        assert!(cfg.parallel);
        assert!(cfg.check_monotone);
        assert!(!ColoringConfig::sequential().estimator().is_parallel_for(100));
    }

    #[test]
    fn solve_rejects_negative_n() {
        let err = solve(-4, &ColoringConfig::sequential()).unwrap_err();
        assert_eq!(err, ColoringError::InvalidSize { n: -4 });
        assert_eq!(two_color(-1).unwrap_err(), ColoringError::InvalidSize { n: -1 });
    }

    #[test]
    fn report_summarizes_outcome() {
        let outcome = solve(7, &ColoringConfig::sequential()).unwrap();
        let report = outcome.report();
        assert_eq!(report.n, 7);
        assert_eq!(report.edges, 21);
        assert_eq!(report.edges_a + report.edges_b, 21);
        assert_eq!(report.count, count_monochromatic_k4(&outcome.graph).unwrap());
        assert_eq!(report.final_expectation, report.count as f64);
        assert!(report.count <= report.ceiling);
    }

    #[test]
    fn solve_and_two_color_agree() {
        let outcome = solve(9, &ColoringConfig::default()).unwrap();
        assert_eq!(outcome.graph, two_color(9).unwrap());
    }

    #[test]
    fn report_serializes_to_json() {
        let outcome = solve(5, &ColoringConfig::sequential()).unwrap();
        let json = serde_json::to_value(outcome.report()).unwrap();
        assert_eq!(json["n"], 5);
        assert_eq!(json["edges"], 10);
        assert_eq!(json["ceiling"], 1);
    }
}
