//! Error type shared by the graph model, the derandomizer and the counter.

use thiserror::Error;

use crate::graph::{Color, Edge};

/// Errors raised while building, coloring or counting a complete graph.
///
/// Every variant is a usage or invariant error: none of them is transient, so
/// callers should abort rather than retry.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ColoringError {
    /// The requested vertex count is negative.
    #[error("invalid graph size: n = {n} (expected n >= 0)")]
    InvalidSize {
        /// Requested vertex count.
        n: i64,
    },

    /// An edge endpoint lies outside `[0, n)` or the endpoints coincide.
    #[error("edge ({u}, {v}) is not an edge of K_{n}")]
    VertexOutOfRange {
        /// First endpoint.
        u: usize,
        /// Second endpoint.
        v: usize,
        /// Vertex count of the graph.
        n: usize,
    },

    /// An edge that already carries a color was colored again with a different color,
    /// or was reached a second time by the derandomizer.
    #[error("graph is not two-colorable: edge ({u}, {v}) is already colored {existing}")]
    AlreadyColored {
        /// First endpoint.
        u: usize,
        /// Second endpoint.
        v: usize,
        /// Color the edge already carries.
        existing: Color,
    },

    /// The counter was given a graph with uncolored edges.
    #[error("coloring is incomplete: {uncolored} edge(s) still uncolored")]
    IncompleteColoring {
        /// Number of uncolored edges.
        uncolored: usize,
    },

    /// The exact count is above `n(n-1)(n-2)(n-3)/64`.
    #[error("monochromatic K4 count {count} exceeds the ceiling {ceiling}")]
    CeilingExceeded {
        /// Exact count of monochromatic 4-cliques.
        count: u64,
        /// Closed-form ceiling.
        ceiling: u64,
    },

    /// Committing an edge raised the conditional expectation.
    #[error("expectation increased from {before} to {after} when committing edge ({u}, {v})")]
    EstimatorIncreased {
        /// First endpoint.
        u: usize,
        /// Second endpoint.
        v: usize,
        /// Expectation before the commit.
        before: f64,
        /// Expectation after the commit.
        after: f64,
    },
}

impl ColoringError {
    /// Create an `InvalidSize` error.
    pub fn invalid_size(n: i64) -> Self {
        Self::InvalidSize { n }
    }

    /// Create a `VertexOutOfRange` error.
    pub fn vertex_out_of_range(u: usize, v: usize, n: usize) -> Self {
        Self::VertexOutOfRange { u, v, n }
    }

    /// Create an `AlreadyColored` error.
    pub fn already_colored(edge: Edge, existing: Color) -> Self {
        Self::AlreadyColored {
            u: edge.u(),
            v: edge.v(),
            existing,
        }
    }

    /// Create an `IncompleteColoring` error.
    pub fn incomplete(uncolored: usize) -> Self {
        Self::IncompleteColoring { uncolored }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ColoringError>;

// ============================================================================
// Tests
// ============================================================================
