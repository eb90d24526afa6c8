pub mod error;
pub mod dary;
pub mod iheap;
pub mod graph;
pub mod sp;
pub mod mst;

use std::{cmp::Ordering, fmt::Debug};

use num_traits::Float;

pub use error::{Error, Invalid, Result};



/// An edge of a weighted graph, seen from one of its endpoints.
pub trait Edge: Clone {
    type Weight: Float + Debug;
    fn weight(&self) -> Self::Weight;
    /// An endpoint the edge can be followed out of: the source of an arc, either end of an undirected edge
    fn tail(&self) -> usize;
    /// The endpoint reached when leaving `v` along this edge.
    /// For a directed arc this is always the head, for an undirected edge it is the endpoint other than `v`.
    fn head(&self, v: usize) -> usize;
}

/// A weighted graph on the vertices `0..vertex_count()`.
/// The graph must not change while an algorithm holds a reference to it.
pub trait WeightedGraph {
    type Edge: Edge;
    fn vertex_count(&self) -> usize;
    /// Edges that can be followed out of `v`
    fn adj(&self, v: usize) -> impl Iterator<Item = &Self::Edge> + '_;
    /// Every edge exactly once
    fn edges(&self) -> impl Iterator<Item = &Self::Edge> + '_;
}

/// Marker for graphs whose edges can be followed in both directions, so `adj(v)` lists every edge touching `v`.
pub trait Undirected: WeightedGraph {}



/// Shape of a d-ary heap.
/// Every heap in the crate takes one of these at construction; the comparison function is passed alongside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapOptions {
    /// Maximum number of children per node, at least 2
    pub arity: usize
}

impl HeapOptions {
    /// The classic binary heap
    pub const BINARY: Self = Self{arity: 2};
    /// Four children per node: shallower, which pays off when decrease-key dominates
    pub const QUATERNARY: Self = Self{arity: 4};

    pub(crate) fn check(&self) -> Result<()> {
        if self.arity < 2 {
            Err(Invalid::Arity(self.arity))?
        }
        Ok(())
    }
}

impl Default for HeapOptions {
    fn default() -> Self {
        Self::BINARY
    }
}

/// Total order on weights.
/// Callers must ensure neither weight is NaN: NaN compares equal to everything here,
/// so a heap ordered by this function with NaN keys silently loses its heap order.
/// The algorithms in this crate reject NaN weights before building any heap.
pub fn cmp_weight<W: Float>(a: &W, b: &W) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}
