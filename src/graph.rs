//! Complete-graph model: the edges of \(K_n\) with a per-edge two-color state.

use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{ColoringError, Result};

// ============================================================================
// Counting helpers
// ============================================================================

/// Returns `n * (n-1) / 2`, the number of edges of \(K_n\).
#[inline(always)]
pub const fn choose2(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Returns \(\binom{n}{4}\), the number of 4-vertex subsets of `n` vertices.
#[inline]
pub const fn choose4(n: u64) -> u64 {
    if n < 4 {
        return 0;
    }
    // Intermediate products stay divisible at every step.
    let mut acc = n * (n - 1) / 2;
    acc = acc * (n - 2) / 3;
    acc * (n - 3) / 4
}

// ============================================================================
// Colors and edges
// ============================================================================

/// One of the two edge colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Color {
    /// First color. Ties in the derandomizer resolve here.
    A,
    /// Second color.
    B,
}

impl Color {
    /// Character used by the matrix writer.
    #[inline]
    pub const fn as_char(self) -> char {
        match self {
            Color::A => 'A',
            Color::B => 'B',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// An undirected edge `(u, v)`, stored canonically with `u < v`.
///
/// The derived ordering is lexicographic on `(u, v)`, which is the order the
/// derandomizer visits edges in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Edge {
    u: usize,
    v: usize,
}

impl Edge {
    /// Creates the edge between `a` and `b`, in either order.
    ///
    /// # Panics
    /// Panics in debug builds if `a == b`.
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        debug_assert_ne!(a, b, "self-loop ({a}, {a}) is not an edge");
        Self {
            u: a.min(b),
            v: a.max(b),
        }
    }

    /// Smaller endpoint.
    #[inline(always)]
    pub const fn u(self) -> usize {
        self.u
    }

    /// Larger endpoint.
    #[inline(always)]
    pub const fn v(self) -> usize {
        self.v
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.u, self.v)
    }
}

/// Iterator over the edges of \(K_n\) in ascending `(u, v)` order.
#[derive(Clone, Debug)]
pub struct Edges {
    n: usize,
    u: usize,
    v: usize,
}

impl Iterator for Edges {
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        if self.v >= self.n {
            if self.u + 2 >= self.n {
                return None;
            }
            self.u += 1;
            self.v = self.u + 1;
        }
        let edge = Edge {
            u: self.u,
            v: self.v,
        };
        self.v += 1;
        Some(edge)
    }
}

// ============================================================================
// Quadruples
// ============================================================================

/// Four vertices `v1 < v2 < v3 < v4`; a 4-clique of the complete graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Quadruple([usize; 4]);

impl Quadruple {
    /// Creates a quadruple from four strictly ascending vertices.
    ///
    /// # Panics
    /// Panics in debug builds if the vertices are not strictly ascending.
    #[inline]
    pub fn new(vertices: [usize; 4]) -> Self {
        debug_assert!(
            vertices.windows(2).all(|w| w[0] < w[1]),
            "quadruple {vertices:?} is not strictly ascending"
        );
        Self(vertices)
    }

    /// The four vertices in ascending order.
    #[inline(always)]
    pub const fn vertices(self) -> [usize; 4] {
        self.0
    }

    /// The six induced edges in canonical order:
    /// `v1v2, v1v3, v1v4, v2v3, v2v4, v3v4`.
    #[inline]
    pub fn edges(self) -> [Edge; 6] {
        let [a, b, c, d] = self.0;
        [
            Edge { u: a, v: b },
            Edge { u: a, v: c },
            Edge { u: a, v: d },
            Edge { u: b, v: c },
            Edge { u: b, v: d },
            Edge { u: c, v: d },
        ]
    }
}

impl fmt::Display for Quadruple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{{{a}, {b}, {c}, {d}}}")
    }
}

/// Lexicographic iterator over 4-vertex subsets of `[0, n)`, optionally
/// restricted to a range of smallest vertices.
#[derive(Clone, Debug)]
pub struct Quadruples {
    n: usize,
    first_end: usize,
    next: Option<[usize; 4]>,
}

impl Quadruples {
    /// All \(\binom{n}{4}\) quadruples.
    pub fn all(n: usize) -> Self {
        Self::with_first_in(0, n, n)
    }

    /// Quadruples whose smallest vertex is exactly `first`.
    ///
    /// Partitioning by `first` for `first in 0..n` covers every quadruple once.
    pub fn with_first(first: usize, n: usize) -> Self {
        Self::with_first_in(first, first + 1, n)
    }

    fn with_first_in(start: usize, end: usize, n: usize) -> Self {
        let next = (start < end && start + 3 < n).then(|| [start, start + 1, start + 2, start + 3]);
        Self {
            n,
            first_end: end,
            next,
        }
    }
}

impl Iterator for Quadruples {
    type Item = Quadruple;

    fn next(&mut self) -> Option<Quadruple> {
        let current = self.next?;
        let [a, b, c, d] = current;
        let n = self.n;
        self.next = if d + 1 < n {
            Some([a, b, c, d + 1])
        } else if c + 2 < n {
            Some([a, b, c + 1, c + 2])
        } else if b + 3 < n {
            Some([a, b + 1, b + 2, b + 3])
        } else if a + 4 < n && a + 1 < self.first_end {
            Some([a + 1, a + 2, a + 3, a + 4])
        } else {
            None
        };
        Some(Quadruple(current))
    }
}

// ============================================================================
// CompleteGraph
// ============================================================================

/// The complete graph \(K_n\) with a color slot per edge.
///
/// Representation:
/// - `colors[i]` is the color of the `i`-th edge in lexicographic order, `None` while uncolored.
/// - `row_offsets[u]` is the index of edge `(u, u+1)`, so `(u, v)` lives at
///   `row_offsets[u] + (v - u - 1)`.
///
/// The edge set is fixed at construction. Through the public API a color only
/// moves from uncolored to `A` or `B` and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompleteGraph {
    n: usize,
    row_offsets: Vec<usize>,
    colors: Vec<Option<Color>>,
}

impl CompleteGraph {
    /// Creates \(K_n\) with every edge uncolored.
    pub fn new(n: usize) -> Self {
        let mut row_offsets = Vec::with_capacity(n);
        let mut offset = 0usize;
        for u in 0..n {
            row_offsets.push(offset);
            offset += n - u - 1;
        }
        debug_assert_eq!(offset, choose2(n));
        Self {
            n,
            row_offsets,
            colors: vec![None; choose2(n)],
        }
    }

    /// Creates \(K_n\) from a signed vertex count.
    ///
    /// # Errors
    /// Returns [`ColoringError::InvalidSize`] if `n < 0`.
    pub fn build(n: i64) -> Result<Self> {
        let n = usize::try_from(n).map_err(|_| ColoringError::invalid_size(n))?;
        Ok(Self::new(n))
    }

    /// Number of vertices.
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of edges, `n(n-1)/2`.
    #[inline(always)]
    pub fn edge_count(&self) -> usize {
        self.colors.len()
    }

    /// Number of edges still uncolored.
    pub fn uncolored_count(&self) -> usize {
        self.colors.iter().filter(|c| c.is_none()).count()
    }

    /// Number of edges carrying `color`.
    pub fn color_count(&self, color: Color) -> usize {
        self.colors.iter().filter(|&&c| c == Some(color)).count()
    }

    /// Returns whether every edge carries a color.
    pub fn is_fully_colored(&self) -> bool {
        self.colors.iter().all(Option::is_some)
    }

    /// Edges in ascending `(u, v)` order.
    pub fn edges(&self) -> Edges {
        Edges {
            n: self.n,
            u: 0,
            v: 1,
        }
    }

    /// Returns whether `edge` is an edge of this graph.
    #[inline]
    pub fn contains(&self, edge: Edge) -> bool {
        edge.u < edge.v && edge.v < self.n
    }

    /// Position of `(u, v)` (with `u < v`) in the color array.
    #[inline(always)]
    fn index(&self, u: usize, v: usize) -> usize {
        debug_assert!(u < v && v < self.n);
        self.row_offsets[u] + (v - u - 1)
    }

    /// Returns the color of `edge`, or `None` while it is uncolored.
    ///
    /// # Panics
    /// Panics if `edge` is not an edge of this graph.
    #[inline]
    pub fn get_color(&self, edge: Edge) -> Option<Color> {
        assert!(self.contains(edge), "edge {edge} is not an edge of K_{}", self.n);
        self.colors[self.index(edge.u, edge.v)]
    }

    /// Colors `edge`. Re-setting the color an edge already has is a no-op.
    ///
    /// # Errors
    /// Returns [`ColoringError::VertexOutOfRange`] if `edge` is not in the graph and
    /// [`ColoringError::AlreadyColored`] if it already carries the other color.
    pub fn set_color(&mut self, edge: Edge, color: Color) -> Result<()> {
        if !self.contains(edge) {
            return Err(ColoringError::vertex_out_of_range(edge.u, edge.v, self.n));
        }
        let slot = self.index(edge.u, edge.v);
        match self.colors[slot] {
            Some(existing) if existing != color => {
                Err(ColoringError::already_colored(edge, existing))
            }
            _ => {
                self.colors[slot] = Some(color);
                Ok(())
            }
        }
    }

    /// Overwrites the color slot of `edge` without the monotonicity check.
    ///
    /// Used by the derandomizer to evaluate a trial coloring in place and undo it.
    #[inline]
    pub(crate) fn overwrite(&mut self, edge: Edge, color: Option<Color>) {
        let slot = self.index(edge.u, edge.v);
        self.colors[slot] = color;
    }

    /// Colors of the six edges of `quad`, in canonical order.
    #[inline(always)]
    pub fn quadruple_colors(&self, quad: Quadruple) -> [Option<Color>; 6] {
        let [a, b, c, d] = quad.0;
        let ra = self.row_offsets[a];
        let rb = self.row_offsets[b];
        let rc = self.row_offsets[c];
        [
            self.colors[ra + (b - a - 1)],
            self.colors[ra + (c - a - 1)],
            self.colors[ra + (d - a - 1)],
            self.colors[rb + (c - b - 1)],
            self.colors[rb + (d - b - 1)],
            self.colors[rc + (d - c - 1)],
        ]
    }

    /// All quadruples of this graph in lexicographic order.
    pub fn quadruples(&self) -> Quadruples {
        Quadruples::all(self.n)
    }

    /// Saves the coloring to a file as an `n x n` character matrix.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file(&self, filename: impl AsRef<Path>) -> io::Result<()> {
        let mut f = File::create(filename)?;
        self.write_to(&mut f)
    }

    /// Writes the coloring as an `n x n` character matrix: `A`/`B` for colored
    /// edges, `.` for uncolored ones and `-` on the diagonal.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        for i in 0..self.n {
            for j in 0..self.n {
                let ch = if i == j {
                    '-'
                } else {
                    let slot = self.index(i.min(j), i.max(j));
                    self.colors[slot].map_or('.', Color::as_char)
                };
                write!(w, "{ch}")?;
            }
            writeln!(w)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    #[test]
    fn new_graph_has_all_edges_uncolored() {
        for n in 0..10 {
            let g = CompleteGraph::new(n);
            assert_eq!(g.edge_count(), n * n.saturating_sub(1) / 2);
            assert_eq!(g.uncolored_count(), g.edge_count());
            assert_eq!(g.is_fully_colored(), g.edge_count() == 0);
        }
    }

    #[test]
    fn build_rejects_negative_sizes() {
        assert_eq!(
            CompleteGraph::build(-1),
            Err(ColoringError::InvalidSize { n: -1 })
        );
        assert_eq!(CompleteGraph::build(0).unwrap().n(), 0);
        assert_eq!(CompleteGraph::build(7).unwrap().edge_count(), 21);
    }

    #[test]
    fn choose_helpers() {
        assert_eq!(choose2(0), 0);
        assert_eq!(choose2(1), 0);
        assert_eq!(choose2(20), 190);
        assert_eq!(choose4(3), 0);
        assert_eq!(choose4(4), 1);
        assert_eq!(choose4(5), 5);
        assert_eq!(choose4(20), 4845);
    }

    // -------------------------------------------------------------------------
    // Edge order
    // -------------------------------------------------------------------------

    #[test]
    fn edges_are_lexicographic_and_complete() {
        let g = CompleteGraph::new(6);
        let edges: Vec<Edge> = g.edges().collect();
        assert_eq!(edges.len(), 15);
        assert_eq!(edges[0], Edge::new(0, 1));
        assert_eq!(edges[4], Edge::new(0, 5));
        assert_eq!(edges[5], Edge::new(1, 2));
        assert_eq!(edges[14], Edge::new(4, 5));
        assert!(edges.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn edges_of_tiny_graphs() {
        assert_eq!(CompleteGraph::new(0).edges().count(), 0);
        assert_eq!(CompleteGraph::new(1).edges().count(), 0);
        assert_eq!(
            CompleteGraph::new(2).edges().collect::<Vec<_>>(),
            vec![Edge::new(0, 1)]
        );
    }

    #[test]
    fn edge_index_follows_iteration_order() {
        let g = CompleteGraph::new(9);
        for (i, e) in g.edges().enumerate() {
            assert_eq!(g.index(e.u(), e.v()), i, "edge {e}");
        }
    }

    #[test]
    fn edge_new_canonicalizes() {
        let e = Edge::new(5, 2);
        assert_eq!((e.u(), e.v()), (2, 5));
        assert_eq!(e, Edge::new(2, 5));
    }

    // -------------------------------------------------------------------------
    // Coloring
    // -------------------------------------------------------------------------

    #[test]
    fn set_color_is_monotone() {
        let mut g = CompleteGraph::new(5);
        let e = Edge::new(1, 3);
        assert_eq!(g.get_color(e), None);

        g.set_color(e, Color::B).unwrap();
        assert_eq!(g.get_color(e), Some(Color::B));
        assert_eq!(g.uncolored_count(), 9);

        // Idempotent re-set is fine.
        g.set_color(e, Color::B).unwrap();

        let err = g.set_color(e, Color::A).unwrap_err();
        assert_eq!(
            err,
            ColoringError::AlreadyColored {
                u: 1,
                v: 3,
                existing: Color::B,
            }
        );
        assert_eq!(g.get_color(e), Some(Color::B));
    }

    #[test]
    fn set_color_rejects_foreign_edges() {
        let mut g = CompleteGraph::new(4);
        let err = g.set_color(Edge::new(2, 4), Color::A).unwrap_err();
        assert_eq!(err, ColoringError::VertexOutOfRange { u: 2, v: 4, n: 4 });
    }

    #[test]
    fn quadruple_colors_follow_canonical_edge_order() {
        let mut g = CompleteGraph::new(7);
        let quad = Quadruple::new([1, 2, 4, 6]);
        for (i, e) in quad.edges().into_iter().enumerate() {
            let color = if i % 2 == 0 { Color::A } else { Color::B };
            g.set_color(e, color).unwrap();
        }
        let colors = g.quadruple_colors(quad);
        let expected: Vec<Option<Color>> = quad.edges().iter().map(|&e| g.get_color(e)).collect();
        assert_eq!(colors.to_vec(), expected);
        assert_eq!(colors[0], Some(Color::A));
        assert_eq!(colors[5], Some(Color::B));
    }

    // -------------------------------------------------------------------------
    // Quadruple enumeration
    // -------------------------------------------------------------------------

    #[test]
    fn quadruples_match_nested_loops() {
        for n in 0..10 {
            let mut expected = Vec::new();
            for a in 0..n {
                for b in (a + 1)..n {
                    for c in (b + 1)..n {
                        for d in (c + 1)..n {
                            expected.push(Quadruple::new([a, b, c, d]));
                        }
                    }
                }
            }
            let got: Vec<Quadruple> = Quadruples::all(n).collect();
            assert_eq!(got, expected, "n={n}");
            assert_eq!(got.len() as u64, choose4(n as u64));
        }
    }

    #[test]
    fn partition_by_first_vertex_covers_everything_once() {
        let n = 11;
        let mut parts: Vec<Quadruple> = (0..n).flat_map(|a| Quadruples::with_first(a, n)).collect();
        assert!(parts.iter().all(|q| q.vertices()[0] < n - 3));
        parts.sort();
        let all: Vec<Quadruple> = Quadruples::all(n).collect();
        assert_eq!(parts, all);
    }

    // -------------------------------------------------------------------------
    // Matrix output
    // -------------------------------------------------------------------------

    #[test]
    fn write_to_renders_matrix() {
        let mut g = CompleteGraph::new(3);
        g.set_color(Edge::new(0, 1), Color::A).unwrap();
        g.set_color(Edge::new(1, 2), Color::B).unwrap();

        let mut buf = Vec::new();
        g.write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "-A.\nA-B\n.B-\n");
    }
}
