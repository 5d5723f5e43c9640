//! Directed graph stored as an adjacency matrix.
//!
//! Nodes get dense indices `0..node_count()` in insertion order. Cell `(i, j)`
//! of the matrix holds the edge from node `i` to node `j`, if any, so the
//! matrix is always `node_count() x node_count()`. Removing a node drops its
//! row and column and shifts every later node down by one: indices are not
//! stable across removals.

use fnv::FnvBuildHasher;
use hashbrown::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

use crate::edge::{is_valid_weight, Edge};
use crate::error::{label_of, Error, Result};
use crate::node::Node;

type Matrix<L> = Vec<Vec<Option<Edge<L>>>>;

#[derive(Clone, Debug)]
pub struct DiGraph<L> {
    // index -> node
    nodes: Vec<Node<L>>,
    // label -> index, kept in lockstep with `nodes`
    indices: HashMap<L, usize, FnvBuildHasher>,
    matrix: Matrix<L>,
    edge_count: usize,
}

impl<L> Default for DiGraph<L> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            indices: HashMap::with_hasher(FnvBuildHasher::default()),
            matrix: Vec::new(),
            edge_count: 0,
        }
    }
}

impl<L> DiGraph<L>
where
    L: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of nodes plus number of edges.
    pub fn size(&self) -> usize {
        self.node_count() + self.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Always `true`: this store only accepts directed edges.
    pub fn is_directed(&self) -> bool {
        true
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.indices.clear();
        self.matrix.clear();
        self.edge_count = 0;
    }

    /// Adds a node, or a bare label, at the next free index.
    ///
    /// Returns `false` and leaves the graph untouched if a node with the same
    /// label is already present.
    pub fn add_node(&mut self, node: impl Into<Node<L>>) -> bool {
        let node = node.into();
        if self.indices.contains_key(node.label()) {
            return false;
        }
        let index = self.nodes.len();
        self.indices.insert(node.label().clone(), index);
        self.nodes.push(node);

        for row in self.matrix.iter_mut() {
            row.push(None);
        }
        self.matrix.push(vec![None; index + 1]);
        true
    }

    /// Removes the node with `label` together with every incident edge.
    pub fn remove_node(&mut self, label: &L) -> Result<Node<L>> {
        let index = self.index_of(label)?;
        Ok(self.remove_index(index))
    }

    pub fn remove_node_at(&mut self, index: usize) -> Result<Node<L>> {
        self.check_index(index)?;
        Ok(self.remove_index(index))
    }

    fn remove_index(&mut self, index: usize) -> Node<L> {
        let outgoing = self.matrix[index].iter().flatten().count();
        let incoming = self.matrix.iter().filter(|row| row[index].is_some()).count();
        let self_loop = usize::from(self.matrix[index][index].is_some());
        self.edge_count -= outgoing + incoming - self_loop;

        self.matrix.remove(index);
        for row in self.matrix.iter_mut() {
            row.remove(index);
        }

        let node = self.nodes.remove(index);
        self.indices.remove(node.label());
        for (i, shifted) in self.nodes.iter().enumerate().skip(index) {
            if let Some(slot) = self.indices.get_mut(shifted.label()) {
                *slot = i;
            }
        }

        debug!(
            label = ?node.label(),
            index,
            dropped_edges = outgoing + incoming - self_loop,
            shifted = self.nodes.len() - index,
            "removed node"
        );
        node
    }

    pub fn contains_node(&self, label: &L) -> bool {
        self.indices.contains_key(label)
    }

    pub fn node(&self, label: &L) -> Option<&Node<L>> {
        self.indices.get(label).map(|&i| &self.nodes[i])
    }

    /// Mutable access to a node's metadata. The label itself cannot change.
    pub fn node_mut(&mut self, label: &L) -> Option<&mut Node<L>> {
        let index = *self.indices.get(label)?;
        Some(&mut self.nodes[index])
    }

    pub fn node_at(&self, index: usize) -> Result<&Node<L>> {
        self.check_index(index)?;
        Ok(&self.nodes[index])
    }

    /// Current index of the node with `label`.
    pub fn node_index_of(&self, label: &L) -> Result<usize> {
        self.index_of(label)
    }

    pub fn nodes(&self) -> HashSet<&Node<L>> {
        self.nodes.iter().collect()
    }

    /// Nodes in index order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node<L>> + '_ {
        self.nodes.iter()
    }

    /// Stores `edge` in the cell of its endpoints.
    ///
    /// Fails with [`Error::NotDirected`] for undirected edges and with
    /// [`Error::NodeNotFound`] if an endpoint is missing. Returns `Ok(false)`
    /// if the cell already holds an edge, whatever its weight.
    pub fn add_edge(&mut self, edge: Edge<L>) -> Result<bool> {
        if !edge.is_directed() {
            return Err(Error::NotDirected {
                source_label: label_of(edge.source()),
                target_label: label_of(edge.target()),
            });
        }
        let i = self.index_of(edge.source())?;
        let j = self.index_of(edge.target())?;
        Ok(self.store(i, j, edge))
    }

    /// Adds `from -> to` with the default weight.
    pub fn connect(&mut self, from: &L, to: &L) -> Result<bool> {
        self.add_edge(Edge::directed(from.clone(), to.clone()))
    }

    pub fn add_weighted_edge(&mut self, from: &L, to: &L, weight: f64) -> Result<bool> {
        if !is_valid_weight(weight) {
            return Err(Error::InvalidWeight { weight });
        }
        self.add_edge(Edge::weighted(from.clone(), to.clone(), weight))
    }

    pub fn add_edge_at(&mut self, i: usize, j: usize) -> Result<bool> {
        self.check_index(i)?;
        self.check_index(j)?;
        let edge = Edge::directed(self.nodes[i].label().clone(), self.nodes[j].label().clone());
        Ok(self.store(i, j, edge))
    }

    pub fn add_weighted_edge_at(&mut self, i: usize, j: usize, weight: f64) -> Result<bool> {
        self.check_index(i)?;
        self.check_index(j)?;
        if !is_valid_weight(weight) {
            return Err(Error::InvalidWeight { weight });
        }
        let edge = Edge::weighted(
            self.nodes[i].label().clone(),
            self.nodes[j].label().clone(),
            weight,
        );
        Ok(self.store(i, j, edge))
    }

    fn store(&mut self, i: usize, j: usize, edge: Edge<L>) -> bool {
        let cell = &mut self.matrix[i][j];
        if cell.is_some() {
            return false;
        }
        *cell = Some(edge);
        self.edge_count += 1;
        true
    }

    pub fn remove_edge(&mut self, from: &L, to: &L) -> Result<Edge<L>> {
        let i = self.index_of(from)?;
        let j = self.index_of(to)?;
        self.take(i, j)
    }

    pub fn remove_edge_at(&mut self, i: usize, j: usize) -> Result<Edge<L>> {
        self.check_index(i)?;
        self.check_index(j)?;
        self.take(i, j)
    }

    fn take(&mut self, i: usize, j: usize) -> Result<Edge<L>> {
        let edge = self.matrix[i][j].take().ok_or_else(|| Error::EdgeNotFound {
            source_label: label_of(self.nodes[i].label()),
            target_label: label_of(self.nodes[j].label()),
        })?;
        self.edge_count -= 1;
        Ok(edge)
    }

    /// The stored edge `from -> to`, or `None` if the cell is empty.
    pub fn edge(&self, from: &L, to: &L) -> Result<Option<&Edge<L>>> {
        let i = self.index_of(from)?;
        let j = self.index_of(to)?;
        Ok(self.matrix[i][j].as_ref())
    }

    pub fn edge_at(&self, i: usize, j: usize) -> Result<Option<&Edge<L>>> {
        self.check_index(i)?;
        self.check_index(j)?;
        Ok(self.matrix[i][j].as_ref())
    }

    /// `true` if exactly this edge, weight included, is stored.
    pub fn contains_edge(&self, edge: &Edge<L>) -> bool {
        match (self.indices.get(edge.source()), self.indices.get(edge.target())) {
            (Some(&i), Some(&j)) => self.matrix[i][j].as_ref() == Some(edge),
            _ => false,
        }
    }

    pub fn edges(&self) -> HashSet<&Edge<L>> {
        self.matrix.iter().flatten().flatten().collect()
    }

    pub fn adjacent_nodes_of(&self, label: &L) -> Result<HashSet<&Node<L>>> {
        Ok(self.successors(self.index_of(label)?))
    }

    pub fn adjacent_nodes_of_at(&self, index: usize) -> Result<HashSet<&Node<L>>> {
        self.check_index(index)?;
        Ok(self.successors(index))
    }

    pub fn predecessor_nodes_of(&self, label: &L) -> Result<HashSet<&Node<L>>> {
        Ok(self.predecessors(self.index_of(label)?))
    }

    pub fn predecessor_nodes_of_at(&self, index: usize) -> Result<HashSet<&Node<L>>> {
        self.check_index(index)?;
        Ok(self.predecessors(index))
    }

    /// Outgoing edges of the node with `label`.
    pub fn edges_of(&self, label: &L) -> Result<HashSet<&Edge<L>>> {
        Ok(self.row(self.index_of(label)?).collect())
    }

    pub fn edges_of_at(&self, index: usize) -> Result<HashSet<&Edge<L>>> {
        self.check_index(index)?;
        Ok(self.row(index).collect())
    }

    pub fn ingoing_edges_of(&self, label: &L) -> Result<HashSet<&Edge<L>>> {
        Ok(self.column(self.index_of(label)?).collect())
    }

    pub fn ingoing_edges_of_at(&self, index: usize) -> Result<HashSet<&Edge<L>>> {
        self.check_index(index)?;
        Ok(self.column(index).collect())
    }

    pub fn out_degree(&self, label: &L) -> Result<usize> {
        Ok(self.row(self.index_of(label)?).count())
    }

    pub fn in_degree(&self, label: &L) -> Result<usize> {
        Ok(self.column(self.index_of(label)?).count())
    }

    /// Snapshot of the stored edges as `(target index, weight)` lists, one per
    /// node, in index order.
    pub fn adjacency_list(&self) -> Vec<Vec<(usize, f64)>> {
        self.matrix
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter_map(|(j, cell)| cell.as_ref().map(|e| (j, e.weight())))
                    .collect()
            })
            .collect()
    }

    fn row(&self, i: usize) -> impl Iterator<Item = &Edge<L>> + '_ {
        self.matrix[i].iter().flatten()
    }

    fn column(&self, j: usize) -> impl Iterator<Item = &Edge<L>> + '_ {
        self.matrix.iter().filter_map(move |row| row[j].as_ref())
    }

    fn successors(&self, i: usize) -> HashSet<&Node<L>> {
        self.matrix[i]
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_some())
            .map(|(j, _)| &self.nodes[j])
            .collect()
    }

    fn predecessors(&self, j: usize) -> HashSet<&Node<L>> {
        self.matrix
            .iter()
            .enumerate()
            .filter(|(_, row)| row[j].is_some())
            .map(|(i, _)| &self.nodes[i])
            .collect()
    }

    fn index_of(&self, label: &L) -> Result<usize> {
        self.indices
            .get(label)
            .copied()
            .ok_or_else(|| Error::NodeNotFound {
                label: label_of(label),
            })
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.nodes.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abcd() -> DiGraph<&'static str> {
        let mut g = DiGraph::new();
        for label in ["a", "b", "c", "d"] {
            assert!(g.add_node(label));
        }
        g
    }

    /// Every label maps to its position and the matrix is square.
    fn assert_consistent<L: Eq + Hash + Clone + Debug>(g: &DiGraph<L>) {
        assert_eq!(g.indices.len(), g.nodes.len());
        for (i, node) in g.nodes.iter().enumerate() {
            assert_eq!(g.indices[node.label()], i);
        }
        assert_eq!(g.matrix.len(), g.node_count());
        for (i, row) in g.matrix.iter().enumerate() {
            assert_eq!(row.len(), g.node_count());
            for (j, cell) in row.iter().enumerate() {
                if let Some(edge) = cell {
                    assert_eq!(edge.source(), g.nodes[i].label());
                    assert_eq!(edge.target(), g.nodes[j].label());
                }
            }
        }
        assert_eq!(g.matrix.iter().flatten().flatten().count(), g.edge_count());
    }

    #[test]
    fn add_node_assigns_insertion_order() {
        let mut g = abcd();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.node_index_of(&"c"), Ok(2));
        assert!(!g.add_node("a"));
        assert!(!g.add_node(Node::new("b")));
        assert_eq!(g.node_count(), 4);
        assert_consistent(&g);
    }

    #[test]
    fn remove_node_compacts_indices() {
        let mut g = abcd();
        g.connect(&"a", &"c").unwrap();
        g.connect(&"c", &"d").unwrap();
        g.connect(&"b", &"d").unwrap();
        g.connect(&"d", &"b").unwrap();

        let removed = g.remove_node(&"b").unwrap();
        assert_eq!(removed.label(), &"b");
        assert_eq!(g.node_index_of(&"a"), Ok(0));
        assert_eq!(g.node_index_of(&"c"), Ok(1));
        assert_eq!(g.node_index_of(&"d"), Ok(2));
        assert!(g.node(&"b").is_none());
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edge_at(0, 1).unwrap(), Some(&Edge::directed("a", "c")));
        assert_eq!(g.edge_at(1, 2).unwrap(), Some(&Edge::directed("c", "d")));
        assert_consistent(&g);

        assert!(matches!(g.remove_node(&"b"), Err(Error::NodeNotFound { .. })));
    }

    #[test]
    fn add_remove_round_trip_keeps_bijection() {
        let mut g = DiGraph::new();
        for i in 0..10u32 {
            g.add_node(i);
        }
        for i in 0..10u32 {
            g.add_weighted_edge(&i, &((i * 3 + 1) % 10), f64::from(i)).unwrap();
            g.connect(&i, &i).unwrap();
        }
        for victim in [0u32, 9, 4, 5] {
            g.remove_node(&victim).unwrap();
            assert_consistent(&g);
        }
        g.add_node(42);
        assert_eq!(g.node_index_of(&42), Ok(6));
        assert_consistent(&g);
        // 3 -> 0 was dropped with 0, 2 -> 7 survives at its new coordinates
        let (i, j) = (g.node_index_of(&2).unwrap(), g.node_index_of(&7).unwrap());
        assert_eq!(g.edge_at(i, j).unwrap().map(Edge::weight), Some(2.0));
        assert_eq!(g.edge(&3, &0), Err(Error::NodeNotFound { label: "0".into() }));
    }

    #[test]
    fn remove_node_at_and_bounds() {
        let mut g = abcd();
        assert_eq!(g.remove_node_at(0).unwrap().label(), &"a");
        assert_eq!(g.node_at(0).unwrap().label(), &"b");
        assert_eq!(
            g.remove_node_at(3).unwrap_err(),
            Error::IndexOutOfRange { index: 3, len: 3 }
        );
        assert!(matches!(g.node_at(7), Err(Error::IndexOutOfRange { .. })));
    }

    #[test]
    fn add_edge_rules() {
        let mut g = abcd();
        assert_eq!(g.add_edge(Edge::weighted("a", "b", 2.0)), Ok(true));
        // occupied cell: no overwrite, whatever the weight
        assert_eq!(g.add_edge(Edge::weighted("a", "b", 5.0)), Ok(false));
        assert_eq!(g.edge(&"a", &"b").unwrap().map(Edge::weight), Some(2.0));
        assert_eq!(g.edge_count(), 1);

        assert!(matches!(
            g.add_edge(Edge::new("a", "c", false, 1.0)),
            Err(Error::NotDirected { .. })
        ));
        assert!(matches!(
            g.add_edge(Edge::directed("a", "z")),
            Err(Error::NodeNotFound { .. })
        ));
        assert_eq!(
            g.add_weighted_edge(&"a", &"c", -1.0),
            Err(Error::InvalidWeight { weight: -1.0 })
        );
        assert!(g.add_weighted_edge_at(0, 2, f64::NAN).is_err());
        assert_eq!(g.add_edge_at(3, 0), Ok(true));
        assert!(g.contains_edge(&Edge::directed("d", "a")));
        assert!(!g.contains_edge(&Edge::weighted("d", "a", 3.0)));
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.size(), 6);
        assert_consistent(&g);
    }

    #[test]
    fn remove_edge_distinguishes_missing_node_and_edge() {
        let mut g = abcd();
        g.connect(&"a", &"b").unwrap();
        assert!(matches!(
            g.remove_edge(&"a", &"z"),
            Err(Error::NodeNotFound { .. })
        ));
        assert!(matches!(
            g.remove_edge(&"b", &"a"),
            Err(Error::EdgeNotFound { .. })
        ));
        assert_eq!(g.remove_edge_at(0, 1), Ok(Edge::directed("a", "b")));
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.edge(&"a", &"b"), Ok(None));
    }

    #[test]
    fn adjacency_queries() {
        let mut g = abcd();
        g.connect(&"a", &"b").unwrap();
        g.connect(&"a", &"c").unwrap();
        g.connect(&"c", &"b").unwrap();

        let adjacent = g.adjacent_nodes_of(&"a").unwrap();
        assert_eq!(adjacent.len(), 2);
        assert!(adjacent.contains(&Node::new("b")));
        assert!(adjacent.contains(&Node::new("c")));

        let predecessors = g.predecessor_nodes_of(&"b").unwrap();
        assert_eq!(predecessors.len(), 2);
        assert!(predecessors.contains(&Node::new("a")));
        assert!(predecessors.contains(&Node::new("c")));

        let ingoing = g.ingoing_edges_of(&"b").unwrap();
        assert!(ingoing.contains(&Edge::directed("a", "b")));
        assert!(ingoing.contains(&Edge::directed("c", "b")));
        assert!(g.ingoing_edges_of(&"a").unwrap().is_empty());

        assert_eq!(g.edges_of(&"a").unwrap().len(), 2);
        assert_eq!(g.edges_of_at(3).unwrap().len(), 0);
        assert_eq!(g.out_degree(&"c"), Ok(1));
        assert_eq!(g.in_degree(&"b"), Ok(2));
        assert_eq!(g.edges().len(), 3);
        assert!(g.predecessor_nodes_of_at(9).is_err());
        assert_eq!(g.adjacent_nodes_of_at(2).unwrap().len(), 1);
        assert_eq!(
            g.adjacency_list(),
            vec![vec![(1, 1.0), (2, 1.0)], vec![], vec![(1, 1.0)], vec![]]
        );
    }

    #[test]
    fn self_loop_counts_once() {
        let mut g = DiGraph::new();
        g.add_node("a");
        assert_eq!(g.connect(&"a", &"a"), Ok(true));
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edges_of(&"a").unwrap().len(), 1);
        assert_eq!(g.ingoing_edges_of(&"a").unwrap().len(), 1);
        assert!(g.adjacent_nodes_of(&"a").unwrap().contains(&Node::new("a")));

        g.remove_node(&"a").unwrap();
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
    }

    #[test]
    fn clear_and_metadata() {
        let mut g = abcd();
        g.connect(&"a", &"b").unwrap();
        g.node_mut(&"a").unwrap().set_integer_distance(Some(3));
        assert_eq!(g.node(&"a").unwrap().integer_distance(), Some(3));
        assert!(g.is_directed());

        g.clear();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.nodes().is_empty());
        assert!(g.add_node("a"));
        assert_eq!(g.node_index_of(&"a"), Ok(0));
    }
}
