//! Method of conditional expectations over the edges of \(K_n\).
//!
//! Edges are visited once each, in ascending `(u, v)` order. For every edge the
//! estimator is evaluated with the edge tentatively colored `A` and then `B`; the
//! smaller expectation wins and ties go to `A`. The trial colors are written into
//! the graph in place and overwritten by the committed one, so at most one edge
//! differs between the two evaluations and no copy of the graph is made.

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::error::{ColoringError, Result};
use crate::estimate::Estimator;
use crate::graph::{Color, CompleteGraph, Edge};

/// One committed edge with both trial expectations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Decision {
    /// The edge that was colored.
    pub edge: Edge,
    /// Expectation with the edge colored `A`.
    pub if_a: f64,
    /// Expectation with the edge colored `B`.
    pub if_b: f64,
    /// Committed color.
    pub chosen: Color,
}

impl Decision {
    /// Expectation after the commit.
    #[inline]
    pub fn expectation(&self) -> f64 {
        match self.chosen {
            Color::A => self.if_a,
            Color::B => self.if_b,
        }
    }
}

/// Expectations and decisions of one full pass.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trace {
    /// Expectation before the first commit.
    pub initial_expectation: f64,
    /// Expectation after the last commit; equals the exact count.
    pub final_expectation: f64,
    /// Decisions in commit order.
    pub decisions: Vec<Decision>,
}

/// Greedy edge-by-edge derandomizer.
#[derive(Clone, Copy, Debug)]
pub struct Derandomizer {
    estimator: Estimator,
    check_monotone: bool,
}

impl Default for Derandomizer {
    fn default() -> Self {
        Self::new(Estimator::default(), true)
    }
}

impl Derandomizer {
    /// Creates a derandomizer. With `check_monotone` set, a commit that raises
    /// the expectation aborts the pass with [`ColoringError::EstimatorIncreased`].
    pub const fn new(estimator: Estimator, check_monotone: bool) -> Self {
        Self {
            estimator,
            check_monotone,
        }
    }

    /// The estimator used for trial evaluations.
    pub const fn estimator(&self) -> Estimator {
        self.estimator
    }

    /// Evaluates both colors for `edge` and commits the cheaper one.
    ///
    /// # Errors
    /// Returns [`ColoringError::VertexOutOfRange`] if `edge` is not in the graph and
    /// [`ColoringError::AlreadyColored`] if it already carries a color.
    pub fn step(&self, graph: &mut CompleteGraph, edge: Edge) -> Result<Decision> {
        if !graph.contains(edge) {
            return Err(ColoringError::vertex_out_of_range(
                edge.u(),
                edge.v(),
                graph.n(),
            ));
        }
        if let Some(existing) = graph.get_color(edge) {
            return Err(ColoringError::already_colored(edge, existing));
        }

        graph.overwrite(edge, Some(Color::A));
        let if_a = self.estimator.expectation(graph);
        graph.overwrite(edge, Some(Color::B));
        let if_b = self.estimator.expectation(graph);

        let chosen = if if_a <= if_b { Color::A } else { Color::B };
        graph.overwrite(edge, Some(chosen));

        trace!(%edge, if_a, if_b, %chosen, "trial colorings evaluated");
        Ok(Decision {
            edge,
            if_a,
            if_b,
            chosen,
        })
    }

    /// Colors every edge of `graph`.
    ///
    /// # Errors
    /// See [`Derandomizer::run_with`].
    pub fn run(&self, graph: &mut CompleteGraph) -> Result<Trace> {
        self.run_with(graph, |_| {})
    }

    /// Colors every edge of `graph`, calling `on_decision` after each commit.
    ///
    /// # Errors
    /// Returns [`ColoringError::AlreadyColored`] when the pass reaches an edge that
    /// is already colored, and [`ColoringError::EstimatorIncreased`] if monotonicity
    /// checking is on and a commit raises the expectation. The graph keeps every
    /// commit made before the error.
    pub fn run_with<F>(&self, graph: &mut CompleteGraph, mut on_decision: F) -> Result<Trace>
    where
        F: FnMut(&Decision),
    {
        let initial_expectation = self.estimator.expectation(graph);
        info!(
            n = graph.n(),
            edges = graph.edge_count(),
            parallel = self.estimator.is_parallel_for(graph.n()),
            initial_expectation,
            "derandomizing edge coloring"
        );

        let mut current = initial_expectation;
        let mut decisions = Vec::with_capacity(graph.edge_count());
        for edge in graph.edges() {
            let decision = self.step(graph, edge)?;
            let after = decision.expectation();
            if self.check_monotone && after > current {
                return Err(ColoringError::EstimatorIncreased {
                    u: edge.u(),
                    v: edge.v(),
                    before: current,
                    after,
                });
            }
            debug!(
                %edge,
                if_a = decision.if_a,
                if_b = decision.if_b,
                chosen = %decision.chosen,
                "edge committed"
            );
            current = after;
            on_decision(&decision);
            decisions.push(decision);
        }

        info!(final_expectation = current, "coloring complete");
        Ok(Trace {
            initial_expectation,
            final_expectation: current,
            decisions,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::{expected_monochromatic_k4, initial_expectation};

    fn sequential() -> Derandomizer {
        Derandomizer::new(Estimator::sequential(), true)
    }

    // -------------------------------------------------------------------------
    // Single steps
    // -------------------------------------------------------------------------

    #[test]
    fn first_step_ties_toward_a() {
        let mut g = CompleteGraph::new(6);
        let d = sequential().step(&mut g, Edge::new(0, 1)).unwrap();
        // The first edge of every quadruple fixes the target without changing its weight.
        assert_eq!(d.if_a, d.if_b);
        assert_eq!(d.chosen, Color::A);
        assert_eq!(g.get_color(Edge::new(0, 1)), Some(Color::A));
        assert_eq!(g.uncolored_count(), 14);
    }

    #[test]
    fn step_leaves_other_edges_untouched() {
        let mut g = CompleteGraph::new(7);
        let before = g.clone();
        let edge = Edge::new(0, 1);
        sequential().step(&mut g, edge).unwrap();
        for e in g.edges().filter(|&e| e != edge) {
            assert_eq!(g.get_color(e), before.get_color(e));
        }
    }

    #[test]
    fn step_refuses_colored_edge() {
        let mut g = CompleteGraph::new(5);
        let edge = Edge::new(2, 3);
        g.set_color(edge, Color::B).unwrap();
        let err = sequential().step(&mut g, edge).unwrap_err();
        assert_eq!(err, ColoringError::already_colored(edge, Color::B));
        assert_eq!(g.get_color(edge), Some(Color::B));
    }

    #[test]
    fn step_refuses_foreign_edge() {
        let mut g = CompleteGraph::new(5);
        let err = sequential().step(&mut g, Edge::new(1, 5)).unwrap_err();
        assert_eq!(err, ColoringError::vertex_out_of_range(1, 5, 5));
    }

    #[test]
    fn second_edge_of_a_quadruple_prefers_matching_color() {
        let mut g = CompleteGraph::new(4);
        let der = sequential();
        der.step(&mut g, Edge::new(0, 1)).unwrap();
        let d = der.step(&mut g, Edge::new(0, 2)).unwrap();
        // Matching keeps the single K4 alive, so the other color is strictly better.
        assert!(d.if_b < d.if_a);
        assert_eq!(d.chosen, Color::B);
    }

    // -------------------------------------------------------------------------
    // Full passes
    // -------------------------------------------------------------------------

    #[test]
    fn run_colors_every_edge_in_order() {
        let mut g = CompleteGraph::new(8);
        let trace = sequential().run(&mut g).unwrap();
        assert!(g.is_fully_colored());
        let visited: Vec<Edge> = trace.decisions.iter().map(|d| d.edge).collect();
        let expected: Vec<Edge> = g.edges().collect();
        assert_eq!(visited, expected);
        for d in &trace.decisions {
            assert_eq!(g.get_color(d.edge), Some(d.chosen));
        }
    }

    #[test]
    fn run_expectation_never_increases() {
        for n in [4usize, 5, 6, 9, 12] {
            let mut g = CompleteGraph::new(n);
            let trace = sequential().run(&mut g).unwrap();
            assert_eq!(trace.initial_expectation, initial_expectation(n));

            let mut before = trace.initial_expectation;
            for d in &trace.decisions {
                assert!(d.expectation() <= before, "n={n} edge {}", d.edge);
                assert_eq!(d.expectation(), d.if_a.min(d.if_b));
                before = d.expectation();
            }
            assert_eq!(trace.final_expectation, before);
            assert_eq!(trace.final_expectation, expected_monochromatic_k4(&g));
        }
    }

    #[test]
    fn run_calls_back_once_per_edge() {
        let mut g = CompleteGraph::new(6);
        let mut seen = 0usize;
        sequential().run_with(&mut g, |_| seen += 1).unwrap();
        assert_eq!(seen, 15);
    }

    #[test]
    fn run_aborts_on_precolored_edge() {
        let mut g = CompleteGraph::new(5);
        g.set_color(Edge::new(0, 3), Color::A).unwrap();
        let err = sequential().run(&mut g).unwrap_err();
        assert_eq!(err, ColoringError::already_colored(Edge::new(0, 3), Color::A));
        // Edges before (0, 3) were committed before the abort.
        assert!(g.get_color(Edge::new(0, 2)).is_some());
        assert!(g.get_color(Edge::new(0, 4)).is_none());
    }

    #[test]
    fn run_on_tiny_graphs_is_trivial() {
        for n in 0..4 {
            let mut g = CompleteGraph::new(n);
            let trace = sequential().run(&mut g).unwrap();
            assert_eq!(trace.decisions.len(), g.edge_count());
            assert_eq!(trace.initial_expectation, 0.0);
            assert_eq!(trace.final_expectation, 0.0);
            assert!(trace.decisions.iter().all(|d| d.chosen == Color::A));
        }
    }

    #[test]
    fn parallel_and_sequential_passes_agree() {
        let n = 13;
        let mut seq = CompleteGraph::new(n);
        let mut par = CompleteGraph::new(n);
        let t_seq = sequential().run(&mut seq).unwrap();
        let t_par = Derandomizer::new(Estimator::new(true, 0), true)
            .run(&mut par)
            .unwrap();
        assert_eq!(seq, par);
        assert_eq!(t_seq, t_par);
    }
}
