use num_traits::{Float, Zero};

use crate::{cmp_weight, graph::check_weights, iheap::IndexedMinHeap, Edge, Error, HeapOptions, Invalid, Result, WeightedGraph};

/// Single source shortest paths found by Dijkstra's algorithm.
/// Works on directed and undirected graphs alike, since it only ever follows edges out of the vertex being settled.
/// All edge weights must be non-negative; this is checked before the search starts.
/// Construction takes O(E log_d(V)) time; distance queries are O(1) and path queries are O(path length).
#[derive(Clone, Debug)]
pub struct ShortestPathTree<E: Edge> {
    source: usize,
    dist_to: Vec<E::Weight>,
    /// For each reached vertex other than the source, the vertex it was reached from and the edge used
    edge_to: Vec<Option<(usize, E)>>
}

impl<E: Edge> ShortestPathTree<E> {
    /// Compute the shortest path tree from `source` using a binary heap
    pub fn new<G: WeightedGraph<Edge = E>>(g: &G, source: usize) -> Result<Self> {
        Self::with_options(g, source, HeapOptions::default())
    }

    /// Compute the shortest path tree from `source` using a heap of the given shape.
    /// Fails if `source` is not a vertex of `g` or if any edge has a negative or NaN weight.
    pub fn with_options<G: WeightedGraph<Edge = E>>(g: &G, source: usize, options: HeapOptions) -> Result<Self> {
        let n = g.vertex_count();
        if source >= n {
            Err(Invalid::VertexOutOfRange{vertex: source, vertex_count: n})?
        }
        if let Err(e) = check_weights(g, false) {
            tracing::debug!(source, error = %e, "rejected graph for shortest paths");
            return Err(e)
        }
        let mut dist_to = vec![E::Weight::infinity(); n];
        let mut edge_to = vec![None; n];
        dist_to[source] = E::Weight::zero();
        let mut pq = IndexedMinHeap::with_options(n, options, cmp_weight::<E::Weight>)?;
        pq.insert(source, E::Weight::zero())?;
        let mut settled = 0usize;
        while !pq.is_empty() {
            let v = pq.delete_min()?;
            settled += 1;
            for e in g.adj(v) {
                let w = e.head(v);
                let d = dist_to[v] + e.weight();
                if d < dist_to[w] {
                    tracing::trace!(from = v, to = w, "relaxed");
                    dist_to[w] = d;
                    edge_to[w] = Some((v, e.clone()));
                    if pq.contains(w) {
                        pq.decrease_key(w, d)?
                    } else {
                        pq.insert(w, d)?
                    }
                }
            }
        }
        tracing::debug!(source, vertices = n, settled, "shortest path tree complete");
        Ok(Self{source, dist_to, edge_to})
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn vertex_count(&self) -> usize {
        self.dist_to.len()
    }

    /// Length of the shortest path from the source to v, or infinity if v is unreachable
    pub fn dist_to(&self, v: usize) -> Result<E::Weight> {
        self.check_vertex(v)?;
        Ok(self.dist_to[v])
    }

    pub fn has_path_to(&self, v: usize) -> Result<bool> {
        Ok(self.dist_to(v)? < E::Weight::infinity())
    }

    /// Edges of a shortest path from the source to v in order, or None if v is unreachable.
    /// The path to the source itself is empty.
    pub fn path_to(&self, v: usize) -> Result<Option<Vec<&E>>> {
        if !self.has_path_to(v)? {
            return Ok(None)
        }
        let mut path = Vec::new();
        let mut x = v;
        while let Some((p, e)) = &self.edge_to[x] {
            path.push(e);
            x = *p;
        }
        path.reverse();
        Ok(Some(path))
    }

    /// Check the optimality conditions against the graph the tree was built from:
    /// the source is at distance zero with no tree edge, no edge can shorten any distance,
    /// and every tree edge is tight.
    pub fn verify<G: WeightedGraph<Edge = E>>(&self, g: &G) -> Result<()> {
        let n = self.vertex_count();
        if g.vertex_count() != n {
            return Err(Error::InvariantViolated(format!("tree has {} vertices but graph has {}", n, g.vertex_count())))
        }
        if !self.dist_to[self.source].is_zero() || self.edge_to[self.source].is_some() {
            return Err(Error::InvariantViolated(format!("source {} is not the root of the tree", self.source)))
        }
        for v in 0..n {
            if v != self.source && self.edge_to[v].is_none() != self.dist_to[v].is_infinite() {
                return Err(Error::InvariantViolated(format!("vertex {} has a distance but no tree edge or vice versa", v)))
            }
            for e in g.adj(v) {
                let w = e.head(v);
                if self.dist_to[v] + e.weight() < self.dist_to[w] {
                    return Err(Error::InvariantViolated(format!("edge {}-{} would shorten the path to {}", v, w, w)))
                }
            }
        }
        for (w, ent) in self.edge_to.iter().enumerate() {
            let Some((v, e)) = ent else { continue };
            if e.head(*v) != w || self.dist_to[*v] + e.weight() != self.dist_to[w] {
                return Err(Error::InvariantViolated(format!("tree edge {}-{} is not tight", v, w)))
            }
        }
        Ok(())
    }

    fn check_vertex(&self, v: usize) -> Result<()> {
        if v >= self.vertex_count() {
            Err(Invalid::VertexOutOfRange{vertex: v, vertex_count: self.vertex_count()})?
        }
        Ok(())
    }
}

/// Shortest paths between every pair of vertices, as one `ShortestPathTree` per source.
/// Takes O(EV log_d(V)) time and O(V^2) space.
#[derive(Clone, Debug)]
pub struct AllPairsShortestPaths<E: Edge> {
    trees: Vec<ShortestPathTree<E>>
}

impl<E: Edge> AllPairsShortestPaths<E> {
    pub fn new<G: WeightedGraph<Edge = E>>(g: &G) -> Result<Self> {
        Self::with_options(g, HeapOptions::default())
    }

    pub fn with_options<G: WeightedGraph<Edge = E>>(g: &G, options: HeapOptions) -> Result<Self> {
        let trees = (0..g.vertex_count())
            .map(|s|ShortestPathTree::with_options(g, s, options))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self{trees})
    }

    /// The tree of shortest paths out of s
    pub fn tree(&self, s: usize) -> Result<&ShortestPathTree<E>> {
        self.trees.get(s).ok_or(Error::InvalidArgument(Invalid::VertexOutOfRange{vertex: s, vertex_count: self.trees.len()}))
    }

    pub fn dist(&self, s: usize, t: usize) -> Result<E::Weight> {
        self.tree(s)?.dist_to(t)
    }

    pub fn has_path(&self, s: usize, t: usize) -> Result<bool> {
        self.tree(s)?.has_path_to(t)
    }

    pub fn path(&self, s: usize, t: usize) -> Result<Option<Vec<&E>>> {
        self.tree(s)?.path_to(t)
    }
}
