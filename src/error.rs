/// Every failure the graph store, the priority queue and the solver can report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("node {label} not found in the graph")]
    NodeNotFound { label: String },

    #[error("no edge from {source_label} to {target_label}")]
    EdgeNotFound {
        source_label: String,
        target_label: String,
    },

    #[error("index {index} out of range for {len} nodes")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("edge {source_label} -> {target_label} is not directed; this graph only stores directed edges")]
    NotDirected {
        source_label: String,
        target_label: String,
    },

    #[error("edge weight {weight} is not a non-negative number")]
    InvalidWeight { weight: f64 },

    /// The solver was handed a graph whose `is_directed()` is false.
    #[error("the graph is not directed")]
    UndirectedGraph,

    #[error("the graph has no nodes")]
    EmptyGraph,

    #[error("shortest paths have not been computed yet")]
    NotComputed,

    /// A node already extracted from the queue got a shorter tentative distance.
    /// Only possible with negative weights, which construction rejects.
    #[error("node at index {index} improved after being settled (distance {settled} -> {candidate})")]
    SettledNodeImproved {
        index: usize,
        settled: f64,
        candidate: f64,
    },

    #[error("the priority queue is empty")]
    EmptyQueue,

    #[error("item {item} is not in the priority queue")]
    NotInQueue { item: usize },

    #[error("item {item} is already in the priority queue")]
    AlreadyQueued { item: usize },

    #[error("new priority {requested} is not strictly less than current priority {current}")]
    PriorityNotDecreased { current: f64, requested: f64 },

    #[error("priority must not be NaN")]
    InvalidPriority,

    /// Queue items are dense ids; the handle table cannot grow to hold this one.
    #[error("item {item} is too large to be tracked by the priority queue")]
    ItemTooLarge { item: usize },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn label_of<L: std::fmt::Debug>(label: &L) -> String {
    format!("{label:?}")
}
