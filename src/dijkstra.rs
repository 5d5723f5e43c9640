use std::fmt::{Debug, Display};
use std::hash::Hash;
use tracing::{debug, trace};

use crate::edge::{is_valid_weight, Edge};
use crate::error::{label_of, Error, Result};
use crate::graph::DiGraph;
use crate::node::Node;
use crate::priority_queue::{HeapEntry, MinPriorityQueue};

/// Distances and predecessors of one run, by node index.
#[derive(Clone, Debug, PartialEq)]
pub struct ShortestPathTree {
    source: usize,
    distances: Vec<f64>,
    previous: Vec<Option<usize>>,
}

impl ShortestPathTree {
    pub fn source(&self) -> usize {
        self.source
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// `f64::INFINITY` for nodes the source cannot reach.
    pub fn distance(&self, index: usize) -> Result<f64> {
        self.check(index).map(|i| self.distances[i])
    }

    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Predecessor of `index` on its shortest path; `None` for the source
    /// and for unreachable nodes.
    pub fn previous(&self, index: usize) -> Result<Option<usize>> {
        self.check(index).map(|i| self.previous[i])
    }

    pub fn is_reachable(&self, index: usize) -> Result<bool> {
        self.check(index).map(|i| self.reached(i))
    }

    pub fn reachable_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.reached(i)).count()
    }

    /// Node indices from the source to `target`, both included, or `None`
    /// if `target` is unreachable.
    pub fn path_indices(&self, target: usize) -> Result<Option<Vec<usize>>> {
        if !self.is_reachable(target)? {
            return Ok(None);
        }
        let mut path = vec![target];
        let mut current = target;
        while let Some(p) = self.previous[current] {
            path.push(p);
            current = p;
        }
        path.reverse();
        Ok(Some(path))
    }

    fn reached(&self, index: usize) -> bool {
        index == self.source || self.previous[index].is_some()
    }

    fn check(&self, index: usize) -> Result<usize> {
        if index < self.len() {
            Ok(index)
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.len(),
            })
        }
    }
}

/// Dijkstra from `source` over an adjacency list of `(target, weight)` pairs.
///
/// Every node is queued once up front, the source with priority 0 and the
/// rest with infinity; relaxation only ever lowers a queued priority. Weights
/// must be non-negative, which makes an extracted node's distance final: an
/// improvement to a settled node is reported as
/// [`Error::SettledNodeImproved`] instead of being dropped.
pub fn shortest_path_tree(adj: &[Vec<(usize, f64)>], source: usize) -> Result<ShortestPathTree> {
    let n = adj.len();
    if source >= n {
        return Err(Error::IndexOutOfRange { index: source, len: n });
    }

    let mut distances = vec![f64::INFINITY; n];
    let mut previous: Vec<Option<usize>> = vec![None; n];
    distances[source] = 0.0;

    let mut queue = MinPriorityQueue::with_capacity(n);
    for (node_id, &distance) in distances.iter().enumerate() {
        queue.insert(node_id, distance)?;
    }

    while let Ok(HeapEntry { item: node_id, priority: cost, .. }) = queue.extract_minimum() {
        for &(next, weight) in &adj[node_id] {
            let next_cost = cost + weight;
            if next_cost >= distances[next] {
                continue;
            }
            if !queue.contains(next) {
                return Err(Error::SettledNodeImproved {
                    index: next,
                    settled: distances[next],
                    candidate: next_cost,
                });
            }
            trace!(from = node_id, to = next, old = distances[next], new = next_cost, "relax");
            distances[next] = next_cost;
            previous[next] = Some(node_id);
            queue.decrease_priority(next, next_cost)?;
        }
    }

    Ok(ShortestPathTree {
        source,
        distances,
        previous,
    })
}

/// Single-source shortest paths over a [`DiGraph`].
///
/// The solver borrows the graph for its whole lifetime, so the weights it
/// validated at construction cannot change underneath it. Each call to
/// [`compute_shortest_paths_from`](Self::compute_shortest_paths_from)
/// replaces the previous run's results.
#[derive(Debug)]
pub struct DijkstraSolver<'g, L> {
    graph: &'g DiGraph<L>,
    tree: Option<ShortestPathTree>,
}

impl<'g, L> DijkstraSolver<'g, L>
where
    L: Eq + Hash + Clone + Debug,
{
    /// Binds a solver to `graph`.
    ///
    /// Fails with [`Error::EmptyGraph`] for a graph without nodes,
    /// [`Error::UndirectedGraph`] for an undirected graph and
    /// [`Error::InvalidWeight`] if any stored edge has a NaN or negative weight.
    pub fn new(graph: &'g DiGraph<L>) -> Result<Self> {
        if graph.is_empty() {
            return Err(Error::EmptyGraph);
        }
        if !graph.is_directed() {
            return Err(Error::UndirectedGraph);
        }
        if let Some(edge) = graph.edges().into_iter().find(|e| !is_valid_weight(e.weight())) {
            return Err(Error::InvalidWeight {
                weight: edge.weight(),
            });
        }
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "shortest path solver ready"
        );
        Ok(Self { graph, tree: None })
    }

    pub fn graph(&self) -> &'g DiGraph<L> {
        self.graph
    }

    pub fn is_computed(&self) -> bool {
        self.tree.is_some()
    }

    /// Results of the last run, if any.
    pub fn tree(&self) -> Option<&ShortestPathTree> {
        self.tree.as_ref()
    }

    /// Runs Dijkstra from the node labelled `source`.
    ///
    /// On error the previous run, if any, is kept.
    pub fn compute_shortest_paths_from(&mut self, source: &L) -> Result<()> {
        let source_index = self.graph.node_index_of(source)?;
        let tree = shortest_path_tree(&self.graph.adjacency_list(), source_index)?;
        debug!(
            source = ?source,
            reachable = tree.reachable_count(),
            nodes = self.graph.node_count(),
            "computed shortest paths"
        );
        self.tree = Some(tree);
        Ok(())
    }

    pub fn last_source(&self) -> Result<&'g Node<L>> {
        let tree = self.computed()?;
        self.graph.node_at(tree.source())
    }

    /// Shortest distance from the last source to `target`; infinite when
    /// `target` is unreachable.
    pub fn distance_to(&self, target: &L) -> Result<f64> {
        let tree = self.computed()?;
        let index = self.graph.node_index_of(target)?;
        tree.distance(index)
    }

    /// Edges of the shortest path from the last source to `target`, in
    /// source-to-target order.
    ///
    /// The path to the source itself is empty; `None` means `target` was
    /// never reached.
    pub fn shortest_path_to(&self, target: &L) -> Result<Option<Vec<&'g Edge<L>>>> {
        let tree = self.computed()?;
        let index = self.graph.node_index_of(target)?;
        let Some(nodes) = tree.path_indices(index)? else {
            return Ok(None);
        };

        nodes
            .windows(2)
            .map(|pair| {
                let (from, to) = (pair[0], pair[1]);
                match self.graph.edge_at(from, to)? {
                    Some(edge) => Ok(edge),
                    None => Err(Error::EdgeNotFound {
                        source_label: label_of(self.graph.node_at(from)?.label()),
                        target_label: label_of(self.graph.node_at(to)?.label()),
                    }),
                }
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Renders a path as `[ a -- 1.0 --> b -- 2.5 --> c ]`, or `[ ]` when empty.
    ///
    /// Weights use the `{:?}` float format: integral values keep a trailing
    /// `.0`, and exponents only appear below `1e-4` or from `1e16` up, so
    /// `1e10` prints as `10000000000.0` and `1e-7` as `1e-7`.
    pub fn print_path(&self, path: &[&Edge<L>]) -> String
    where
        L: Display,
    {
        let Some(first) = path.first() else {
            return String::from("[ ]");
        };
        let mut out = format!("[ {}", first.source());
        for edge in path {
            out.push_str(&format!(" -- {:?} --> {}", edge.weight(), edge.target()));
        }
        out.push_str(" ]");
        out
    }

    fn computed(&self) -> Result<&ShortestPathTree> {
        self.tree.as_ref().ok_or(Error::NotComputed)
    }
}
