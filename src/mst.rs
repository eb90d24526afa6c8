use std::cmp::Ordering;

use num_traits::{Float, Zero};

use crate::{cmp_weight, dary::DaryHeap, graph::check_weights, iheap::IndexedMinHeap, Edge, Error, HeapOptions, Result, Undirected, WeightedGraph};

/// Minimum spanning forest of an undirected graph found by Prim's algorithm.
/// Prim grows one tree from a root, always adding the lightest edge crossing the cut between the tree and everything else.
/// A disconnected graph gets one tree per connected component: every vertex not yet in a tree starts a new one.
/// Negative weights are fine, NaN weights are rejected.
#[derive(Clone, Debug)]
pub struct MinimumSpanningForest<E: Edge> {
    edges: Vec<E>,
    weight: E::Weight,
    components: usize
}

impl<E: Edge> MinimumSpanningForest<E> {
    /// Eager Prim with a binary indexed heap of vertices: O(E log(V))
    pub fn new<G: Undirected<Edge = E>>(g: &G) -> Result<Self> {
        Self::with_options(g, HeapOptions::default())
    }

    /// Eager Prim keeping at most one heap entry per vertex, keyed by the lightest edge seen so far
    /// that connects it to the tree: O(E log_d(V))
    pub fn with_options<G: Undirected<Edge = E>>(g: &G, options: HeapOptions) -> Result<Self> {
        check_input(g)?;
        let n = g.vertex_count();
        let mut dist_to = vec![E::Weight::infinity(); n];
        let mut edge_to: Vec<Option<E>> = vec![None; n];
        let mut marked = vec![false; n];
        let mut pq = IndexedMinHeap::with_options(n, options, cmp_weight::<E::Weight>)?;
        let mut components = 0;
        for s in 0..n {
            if marked[s] {
                continue
            }
            components += 1;
            dist_to[s] = E::Weight::zero();
            pq.insert(s, E::Weight::zero())?;
            while !pq.is_empty() {
                let v = pq.delete_min()?;
                marked[v] = true;
                for e in g.adj(v) {
                    let w = e.head(v);
                    // a vertex with no crossing edge yet has no edge_to, whatever its weight
                    if marked[w] || (edge_to[w].is_some() && e.weight() >= dist_to[w]) {
                        continue
                    }
                    tracing::trace!(from = v, to = w, "lighter crossing edge");
                    dist_to[w] = e.weight();
                    edge_to[w] = Some(e.clone());
                    if pq.contains(w) {
                        pq.decrease_key(w, e.weight())?
                    } else {
                        pq.insert(w, e.weight())?
                    }
                }
            }
        }
        Ok(Self::assemble(edge_to.into_iter().flatten().collect(), components))
    }

    /// Lazy Prim: pushes every edge leaving the tree into a plain heap and discards the stale ones as they surface.
    /// O(E log(E)) time and O(E) space, but no decrease-key is needed.
    pub fn lazy<G: Undirected<Edge = E>>(g: &G) -> Result<Self> {
        check_input(g)?;
        let n = g.vertex_count();
        let mut marked = vec![false; n];
        let mut pq = DaryHeap::with_cmp(|a: &(usize, E), b: &(usize, E)|cmp_weight(&a.1.weight(), &b.1.weight()));
        let mut edges = Vec::new();
        let mut components = 0;
        for s in 0..n {
            if marked[s] {
                continue
            }
            components += 1;
            visit(g, s, &mut marked, &mut pq);
            while let Some((v, e)) = pq.pop() {
                let w = e.head(v);
                if marked[w] {
                    continue
                }
                edges.push(e);
                visit(g, w, &mut marked, &mut pq);
            }
        }
        Ok(Self::assemble(edges, components))
    }

    fn assemble(edges: Vec<E>, components: usize) -> Self {
        let weight = edges.iter().fold(E::Weight::zero(), |a, e|a + e.weight());
        tracing::debug!(edges = edges.len(), components, weight = ?weight, "spanning forest complete");
        Self{edges, weight, components}
    }

    /// The edges of the forest, in no particular order
    pub fn edges(&self) -> &[E] {
        &self.edges
    }

    /// Sum of the weights of the forest's edges
    pub fn weight(&self) -> E::Weight {
        self.weight
    }

    /// Number of trees in the forest, which is the number of connected components of the graph
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Check the forest against the graph it was built from: the cached weight matches the edges,
    /// the edges contain no cycle and connect every pair of vertices the graph connects,
    /// and no graph edge crossing the cut made by removing a forest edge is lighter than that forest edge.
    pub fn verify<G: Undirected<Edge = E>>(&self, g: &G) -> Result<()> {
        let n = g.vertex_count();
        let total = self.edges.iter().fold(E::Weight::zero(), |a, e|a + e.weight());
        if total != self.weight {
            return Err(Error::InvariantViolated("cached weight differs from the sum of the edge weights".into()))
        }
        let mut forest = Partition::new(n);
        for e in &self.edges {
            let (v, w) = endpoints(e);
            if !forest.union(v, w) {
                return Err(Error::InvariantViolated(format!("edge {}-{} closes a cycle", v, w)))
            }
        }
        for e in g.edges() {
            let (v, w) = endpoints(e);
            if forest.find(v) != forest.find(w) {
                return Err(Error::InvariantViolated(format!("edge {}-{} joins two trees", v, w)))
            }
        }
        if self.edges.len() + self.components != n {
            return Err(Error::InvariantViolated(format!("{} edges cannot span {} vertices in {} trees", self.edges.len(), n, self.components)))
        }
        for (i, e) in self.edges.iter().enumerate() {
            let mut cut = Partition::new(n);
            for (_, f) in self.edges.iter().enumerate().filter(|&(j, _)|j != i) {
                let (v, w) = endpoints(f);
                cut.union(v, w);
            }
            for f in g.edges() {
                let (v, w) = endpoints(f);
                if cut.find(v) != cut.find(w) && f.weight() < e.weight() {
                    let (a, b) = endpoints(e);
                    return Err(Error::InvariantViolated(format!("edge {}-{} is lighter than forest edge {}-{} across its cut", v, w, a, b)))
                }
            }
        }
        Ok(())
    }
}

fn check_input<G: WeightedGraph>(g: &G) -> Result<()> {
    check_weights(g, true).inspect_err(|e|tracing::debug!(error = %e, "rejected graph for spanning forest"))
}

fn endpoints<E: Edge>(e: &E) -> (usize, usize) {
    let v = e.tail();
    (v, e.head(v))
}

fn visit<G, C>(g: &G, v: usize, marked: &mut [bool], pq: &mut DaryHeap<(usize, G::Edge), C>)
where G: WeightedGraph, C: Fn(&(usize, G::Edge), &(usize, G::Edge)) -> Ordering {
    marked[v] = true;
    for e in g.adj(v) {
        if !marked[e.head(v)] {
            pq.push((v, e.clone()))
        }
    }
}

/// Disjoint sets of vertices with path halving and union by size, used to check forests
struct Partition {
    parent: Vec<usize>,
    size: Vec<usize>
}

impl Partition {
    fn new(n: usize) -> Self {
        Self{parent: (0..n).collect(), size: vec![1; n]}
    }

    fn find(&mut self, mut v: usize) -> usize {
        while self.parent[v] != v {
            self.parent[v] = self.parent[self.parent[v]];
            v = self.parent[v];
        }
        v
    }

    /// Returns false if v and w were already in the same set
    fn union(&mut self, v: usize, w: usize) -> bool {
        let (mut a, mut b) = (self.find(v), self.find(w));
        if a == b {
            return false
        }
        if self.size[a] < self.size[b] {
            (a, b) = (b, a);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
        true
    }
}
