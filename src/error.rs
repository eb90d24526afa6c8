/// The precise reason an argument was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Invalid {
    #[error("index {index} is outside [0, {capacity})")]
    IndexOutOfRange { index: usize, capacity: usize },
    #[error("index {0} is already in the priority queue")]
    DuplicateIndex(usize),
    #[error("index {0} is not in the priority queue")]
    AbsentIndex(usize),
    #[error("new key for index {0} does not strictly decrease its key")]
    NotDecreasing(usize),
    #[error("new key for index {0} does not strictly increase its key")]
    NotIncreasing(usize),
    #[error("vertex {vertex} is outside [0, {vertex_count})")]
    VertexOutOfRange { vertex: usize, vertex_count: usize },
    #[error("edge {from}-{to} has negative weight {weight}")]
    NegativeWeight { from: usize, to: usize, weight: f64 },
    #[error("edge {from}-{to} has a weight that is not a number")]
    NanWeight { from: usize, to: usize },
    #[error("vertex {vertex} is not an endpoint of edge {v}-{w}")]
    NotAnEndpoint { vertex: usize, v: usize, w: usize },
    #[error("heap arity must be at least 2, got {0}")]
    Arity(usize),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] Invalid),
    #[error("priority queue is empty")]
    EmptyQueue,
    #[error("index {0} is not in the priority queue")]
    NotFound(usize),
    #[error("invariant violated: {0}")]
    InvariantViolated(String),
}

pub type Result<T> = std::result::Result<T, Error>;
