//! Directed weighted graph on an adjacency matrix, a binary min-heap with
//! handles for O(log n) decrease-priority, and a Dijkstra single-source
//! shortest-path solver built on both.
//!
//! ```
//! use digraph_sssp::{DiGraph, DijkstraSolver};
//!
//! let mut g = DiGraph::new();
//! for label in ["a", "b", "c"] {
//!     g.add_node(label);
//! }
//! g.add_weighted_edge(&"a", &"b", 2.0)?;
//! g.add_weighted_edge(&"b", &"c", 0.5)?;
//!
//! let mut solver = DijkstraSolver::new(&g)?;
//! solver.compute_shortest_paths_from(&"a")?;
//! let path = solver.shortest_path_to(&"c")?.expect("c is reachable");
//! assert_eq!(solver.print_path(&path), "[ a -- 2.0 --> b -- 0.5 --> c ]");
//! # Ok::<(), digraph_sssp::Error>(())
//! ```

pub mod dijkstra;
pub mod edge;
pub mod error;
pub mod graph;
pub mod node;
pub mod priority_queue;

pub use dijkstra::{shortest_path_tree, DijkstraSolver, ShortestPathTree};
pub use edge::{Edge, DEFAULT_WEIGHT};
pub use error::{Error, Result};
pub use graph::DiGraph;
pub use node::{Color, Node};
pub use priority_queue::{HeapEntry, MinPriorityQueue};
