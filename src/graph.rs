use std::fmt::Debug;

use num_traits::{Float, ToPrimitive, Zero};
use rand::{distributions::Distribution, Rng};

use crate::{Edge, Invalid, Result, Undirected, WeightedGraph};


/// A weighted edge that can only be followed from `from` to `to`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedArc<W> {
    from: usize,
    to: usize,
    weight: W
}

impl<W: Float + Debug> WeightedArc<W> {
    pub fn new(from: usize, to: usize, weight: W) -> Self {
        Self{from, to, weight}
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }
}

impl<W: Float + Debug> Edge for WeightedArc<W> {
    type Weight = W;
    fn weight(&self) -> W {
        self.weight
    }
    fn tail(&self) -> usize {
        self.from
    }
    fn head(&self, _v: usize) -> usize {
        self.to
    }
}

/// A weighted edge between `v` and `w` that can be followed either way
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedEdge<W> {
    v: usize,
    w: usize,
    weight: W
}

impl<W: Float + Debug> WeightedEdge<W> {
    pub fn new(v: usize, w: usize, weight: W) -> Self {
        Self{v, w, weight}
    }

    /// One of the endpoints, with no promise about which
    pub fn either(&self) -> usize {
        self.v
    }

    /// The endpoint opposite `vertex`, which must be one of the two endpoints
    pub fn other(&self, vertex: usize) -> Result<usize> {
        if vertex == self.v {
            Ok(self.w)
        } else if vertex == self.w {
            Ok(self.v)
        } else {
            Err(Invalid::NotAnEndpoint{vertex, v: self.v, w: self.w}.into())
        }
    }
}

impl<W: Float + Debug> Edge for WeightedEdge<W> {
    type Weight = W;
    fn weight(&self) -> W {
        self.weight
    }
    fn tail(&self) -> usize {
        self.v
    }
    fn head(&self, v: usize) -> usize {
        if v == self.v { self.w } else { self.v }
    }
}

fn check_vertex(vertex: usize, vertex_count: usize) -> Result<()> {
    if vertex >= vertex_count {
        Err(Invalid::VertexOutOfRange{vertex, vertex_count})?
    }
    Ok(())
}

/// Reject NaN weights, and negative weights unless `allow_negative`
pub(crate) fn check_weights<G: WeightedGraph>(g: &G, allow_negative: bool) -> Result<()> {
    for v in 0..g.vertex_count() {
        for e in g.adj(v) {
            let weight = e.weight();
            if weight.is_nan() {
                Err(Invalid::NanWeight{from: v, to: e.head(v)})?
            } else if !allow_negative && weight < <G::Edge as Edge>::Weight::zero() {
                Err(Invalid::NegativeWeight{from: v, to: e.head(v), weight: weight.to_f64().unwrap_or(f64::NAN)})?
            }
        }
    }
    Ok(())
}

fn random_endpoints<R: Rng + ?Sized>(vertex_count: usize, edge_count: usize, rng: &mut R) -> Result<Vec<(usize, usize)>> {
    if vertex_count == 0 && edge_count > 0 {
        Err(Invalid::VertexOutOfRange{vertex: 0, vertex_count})?
    }
    Ok((0..edge_count).map(|_|(rng.gen_range(0..vertex_count), rng.gen_range(0..vertex_count))).collect())
}



/// Edge weighted directed graph stored as one list of outgoing arcs per vertex
#[derive(Clone, Debug)]
pub struct AdjDigraph<W> {
    adj: Vec<Vec<WeightedArc<W>>>,
    edge_count: usize
}

impl<W: Float + Debug> AdjDigraph<W> {
    /// Create a graph with vertices `0..vertex_count` and no arcs
    pub fn new(vertex_count: usize) -> Self {
        Self{adj: vec![Vec::new(); vertex_count], edge_count: 0}
    }

    /// Create a graph from a list of arcs, failing on the first arc with an endpoint out of range
    pub fn from_edges(vertex_count: usize, arcs: impl IntoIterator<Item = WeightedArc<W>>) -> Result<Self> {
        let mut res = Self::new(vertex_count);
        for e in arcs {
            res.add_edge(e)?;
        }
        Ok(res)
    }

    /// Create a graph with `edge_count` arcs between uniformly random endpoints, with weights drawn from `weights`.
    /// Self loops and parallel arcs are allowed.
    pub fn random<R: Rng + ?Sized>(vertex_count: usize, edge_count: usize, weights: &impl Distribution<W>, rng: &mut R) -> Result<Self> {
        let endpoints = random_endpoints(vertex_count, edge_count, &mut *rng)?;
        Self::from_edges(vertex_count, endpoints.into_iter().map(|(v, w)|WeightedArc::new(v, w, weights.sample(&mut *rng))))
    }

    pub fn add_edge(&mut self, e: WeightedArc<W>) -> Result<()> {
        check_vertex(e.from, self.adj.len())?;
        check_vertex(e.to, self.adj.len())?;
        self.adj[e.from].push(e);
        self.edge_count += 1;
        Ok(())
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn outdegree(&self, v: usize) -> Result<usize> {
        check_vertex(v, self.adj.len())?;
        Ok(self.adj[v].len())
    }
}

impl<W: Float + Debug> WeightedGraph for AdjDigraph<W> {
    type Edge = WeightedArc<W>;
    fn vertex_count(&self) -> usize {
        self.adj.len()
    }
    fn adj(&self, v: usize) -> impl Iterator<Item = &WeightedArc<W>> + '_ {
        self.adj.get(v).into_iter().flatten()
    }
    fn edges(&self) -> impl Iterator<Item = &WeightedArc<W>> + '_ {
        self.adj.iter().flatten()
    }
}



/// Edge weighted undirected graph.
/// Each edge is stored once and referenced from the adjacency lists of both endpoints
/// (a self loop is referenced once).
#[derive(Clone, Debug)]
pub struct AdjGraph<W> {
    edges: Vec<WeightedEdge<W>>,
    adj: Vec<Vec<usize>>
}

impl<W: Float + Debug> AdjGraph<W> {
    /// Create a graph with vertices `0..vertex_count` and no edges
    pub fn new(vertex_count: usize) -> Self {
        Self{edges: Vec::new(), adj: vec![Vec::new(); vertex_count]}
    }

    /// Create a graph from a list of edges, failing on the first edge with an endpoint out of range
    pub fn from_edges(vertex_count: usize, edges: impl IntoIterator<Item = WeightedEdge<W>>) -> Result<Self> {
        let mut res = Self::new(vertex_count);
        for e in edges {
            res.add_edge(e)?;
        }
        Ok(res)
    }

    /// Create a graph with `edge_count` edges between uniformly random endpoints, with weights drawn from `weights`.
    /// Self loops and parallel edges are allowed.
    pub fn random<R: Rng + ?Sized>(vertex_count: usize, edge_count: usize, weights: &impl Distribution<W>, rng: &mut R) -> Result<Self> {
        let endpoints = random_endpoints(vertex_count, edge_count, &mut *rng)?;
        Self::from_edges(vertex_count, endpoints.into_iter().map(|(v, w)|WeightedEdge::new(v, w, weights.sample(&mut *rng))))
    }

    pub fn add_edge(&mut self, e: WeightedEdge<W>) -> Result<()> {
        check_vertex(e.v, self.adj.len())?;
        check_vertex(e.w, self.adj.len())?;
        let idx = self.edges.len();
        self.adj[e.v].push(idx);
        if e.w != e.v {
            self.adj[e.w].push(idx);
        }
        self.edges.push(e);
        Ok(())
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn degree(&self, v: usize) -> Result<usize> {
        check_vertex(v, self.adj.len())?;
        Ok(self.adj[v].len())
    }
}

impl<W: Float + Debug> WeightedGraph for AdjGraph<W> {
    type Edge = WeightedEdge<W>;
    fn vertex_count(&self) -> usize {
        self.adj.len()
    }
    fn adj(&self, v: usize) -> impl Iterator<Item = &WeightedEdge<W>> + '_ {
        self.adj.get(v).into_iter().flatten().map(|&i|&self.edges[i])
    }
    fn edges(&self) -> impl Iterator<Item = &WeightedEdge<W>> + '_ {
        self.edges.iter()
    }
}

impl<W: Float + Debug> Undirected for AdjGraph<W> {}

#[cfg(test)]
mod tests {
    use rand::{distributions::Uniform, rngs::StdRng, SeedableRng};

    use super::*;
    use crate::Error;

    #[test]
    fn endpoints_are_checked() {
        let mut g = AdjDigraph::new(3);
        assert_eq!(g.add_edge(WeightedArc::new(0, 3, 1.0)),
            Err(Error::InvalidArgument(Invalid::VertexOutOfRange{vertex: 3, vertex_count: 3})));
        assert_eq!(g.edge_count(), 0);
        let mut g = AdjGraph::new(2);
        assert!(g.add_edge(WeightedEdge::new(5, 0, 1.0f32)).is_err());
        assert_eq!(g.edge_count(), 0);
        assert!(g.degree(2).is_err());
    }

    #[test]
    fn undirected_edges_are_shared() {
        let g = AdjGraph::from_edges(4, [
            WeightedEdge::new(0, 1, 1.0),
            WeightedEdge::new(1, 2, 2.0),
            WeightedEdge::new(2, 2, 0.5),
        ]).unwrap();
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.degree(1), Ok(2));
        assert_eq!(g.degree(2), Ok(2));
        assert_eq!(g.degree(3), Ok(0));
        let heads: Vec<usize> = g.adj(1).map(|e|e.head(1)).collect();
        assert_eq!(heads, vec![0, 2]);
        assert_eq!(g.adj(2).map(|e|e.head(2)).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(g.edges().count(), 3);
    }

    #[test]
    fn other_endpoint() {
        let e = WeightedEdge::new(3, 7, 2.0);
        assert_eq!(e.either(), 3);
        assert_eq!(e.other(3), Ok(7));
        assert_eq!(e.other(7), Ok(3));
        assert_eq!(e.other(4), Err(Error::InvalidArgument(Invalid::NotAnEndpoint{vertex: 4, v: 3, w: 7})));
    }

    #[test]
    fn directed_adjacency() {
        let g = AdjDigraph::from_edges(3, [
            WeightedArc::new(0, 1, 1.0),
            WeightedArc::new(1, 0, 4.0),
            WeightedArc::new(0, 2, 2.0),
        ]).unwrap();
        assert_eq!(g.outdegree(0), Ok(2));
        assert_eq!(g.outdegree(2), Ok(0));
        assert_eq!(g.adj(0).map(WeightedArc::to).collect::<Vec<_>>(), vec![1, 2]);
        assert!(g.adj(1).all(|e|e.from() == 1));
        assert_eq!(g.adj(7).count(), 0);
        assert_eq!(g.edges().count(), g.edge_count());
    }

    #[test]
    fn random_graphs() {
        let mut rng = StdRng::seed_from_u64(3);
        let weights = Uniform::new(0.0, 1.0);
        let g = AdjDigraph::random(20, 100, &weights, &mut rng).unwrap();
        assert_eq!(g.vertex_count(), 20);
        assert_eq!(g.edge_count(), 100);
        assert!(g.edges().all(|e|(0.0..1.0).contains(&e.weight())));
        let g = AdjGraph::random(20, 50, &weights, &mut rng).unwrap();
        assert_eq!(g.edges().count(), 50);
        assert!(AdjGraph::random(0, 1, &weights, &mut rng).is_err());
        assert_eq!(AdjGraph::random(0, 0, &weights, &mut rng).map(|g|g.vertex_count()), Ok(0));
    }
}
