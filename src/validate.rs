//! Exact counting and validation of finished colorings.

use crate::error::{ColoringError, Result};
use crate::graph::{CompleteGraph, Quadruple};

// ============================================================================
// Public API
// ============================================================================

/// Closed-form ceiling \(\lfloor n(n-1)(n-2)(n-3)/64 \rfloor\) on the number of
/// monochromatic 4-cliques the derandomized coloring may contain.
///
/// Zero for `n < 4`; saturates at `u64::MAX` for absurdly large `n`.
pub fn theoretical_ceiling(n: u64) -> u64 {
    if n < 4 {
        return 0;
    }
    let n = u128::from(n);
    [n - 1, n - 2, n - 3]
        .into_iter()
        .try_fold(n, u128::checked_mul)
        .and_then(|product| u64::try_from(product / 64).ok())
        .unwrap_or(u64::MAX)
}

/// Returns whether `quad` is monochromatic, short-circuiting on the first edge
/// that differs from the first one. Uncolored edges never match.
#[inline]
pub fn is_monochromatic(graph: &CompleteGraph, quad: Quadruple) -> bool {
    let colors = graph.quadruple_colors(quad);
    match colors[0] {
        Some(first) => colors[1..].iter().all(|&c| c == Some(first)),
        None => false,
    }
}

/// Exact number of monochromatic 4-cliques of a fully colored graph.
///
/// # Errors
/// Returns [`ColoringError::IncompleteColoring`] if any edge is uncolored.
pub fn count_monochromatic_k4(graph: &CompleteGraph) -> Result<u64> {
    ensure_complete(graph)?;
    Ok(graph
        .quadruples()
        .filter(|&q| is_monochromatic(graph, q))
        .count() as u64)
}

/// The monochromatic 4-cliques of a fully colored graph, in lexicographic order.
///
/// # Errors
/// Returns [`ColoringError::IncompleteColoring`] if any edge is uncolored.
pub fn monochromatic_quadruples(graph: &CompleteGraph) -> Result<Vec<Quadruple>> {
    ensure_complete(graph)?;
    Ok(graph
        .quadruples()
        .filter(|&q| is_monochromatic(graph, q))
        .collect())
}

/// Counts the monochromatic 4-cliques and checks the count against
/// [`theoretical_ceiling`].
///
/// Returns the count on success.
///
/// # Errors
/// Returns [`ColoringError::IncompleteColoring`] if any edge is uncolored and
/// [`ColoringError::CeilingExceeded`] if the count is above the ceiling.
pub fn validate_coloring(graph: &CompleteGraph) -> Result<u64> {
    let count = count_monochromatic_k4(graph)?;
    let ceiling = theoretical_ceiling(graph.n() as u64);
    if count > ceiling {
        return Err(ColoringError::CeilingExceeded { count, ceiling });
    }
    Ok(count)
}

// ============================================================================
// Internal
// ============================================================================

fn ensure_complete(graph: &CompleteGraph) -> Result<()> {
    match graph.uncolored_count() {
        0 => Ok(()),
        uncolored => Err(ColoringError::incomplete(uncolored)),
    }
}

// ============================================================================
// Tests
// ============================================================================
