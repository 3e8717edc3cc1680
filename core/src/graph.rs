use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::GraphError;

/// Anything usable as a node identifier: strings, integers, interned symbols.
pub trait Node: Eq + Hash + Clone + fmt::Debug {}

impl<T: Eq + Hash + Clone + fmt::Debug> Node for T {}

/// Edge weight. Stored with each edge but ignored by BFS (unit cost).
pub type Weight = i64;

/// Dense internal slot assigned to a node in insertion order.
pub type NodeIdx = u32;

/// One direction of an undirected edge in the adjacency list.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub target: NodeIdx,
    pub weight: Weight,
}

/// In-memory undirected graph: interned nodes + insertion-ordered adjacency.
///
/// Every edge `{a, b}` is stored in both `adjacency[a]` and `adjacency[b]`
/// (once for a self-loop). Neighbor order is the order in which edges were
/// first added, so traversals over an unmodified graph are reproducible.
pub struct Graph<N> {
    index: HashMap<N, NodeIdx>,
    nodes: Vec<N>,
    adjacency: Vec<Vec<Edge>>,
    /// (low, high) slot pair → positions in `adjacency[low]` and `adjacency[high]`.
    edge_slots: HashMap<(NodeIdx, NodeIdx), (usize, usize)>,
}

impl<N: Node> Graph<N> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            nodes: Vec::new(),
            adjacency: Vec::new(),
            edge_slots: HashMap::new(),
        }
    }

    /// Pre-allocate for a known graph size.
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            index: HashMap::with_capacity(node_count),
            nodes: Vec::with_capacity(node_count),
            adjacency: Vec::with_capacity(node_count),
            edge_slots: HashMap::with_capacity(edge_count),
        }
    }

    /// Register a node, returning its slot. Existing nodes keep their slot.
    pub fn add_node(&mut self, node: N) -> NodeIdx {
        if let Some(&idx) = self.index.get(&node) {
            return idx;
        }
        let idx = self.nodes.len() as NodeIdx;
        self.index.insert(node.clone(), idx);
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Add an undirected edge with the default weight of 1.
    pub fn add_edge(&mut self, a: N, b: N) {
        self.add_weighted_edge(a, b, 1);
    }

    /// Add an undirected edge, inserting missing endpoints.
    ///
    /// Re-adding an existing edge (either orientation) only updates its weight.
    pub fn add_weighted_edge(&mut self, a: N, b: N, weight: Weight) {
        let ia = self.add_node(a);
        let ib = self.add_node(b);
        let key = (ia.min(ib), ia.max(ib));

        if let Some(&(pos_low, pos_high)) = self.edge_slots.get(&key) {
            self.adjacency[key.0 as usize][pos_low].weight = weight;
            self.adjacency[key.1 as usize][pos_high].weight = weight;
            return;
        }

        let pos_low = self.adjacency[key.0 as usize].len();
        self.adjacency[key.0 as usize].push(Edge {
            target: key.1,
            weight,
        });

        // Self-loop: a single adjacency entry serves both ends.
        let pos_high = if key.0 == key.1 {
            pos_low
        } else {
            let pos = self.adjacency[key.1 as usize].len();
            self.adjacency[key.1 as usize].push(Edge {
                target: key.0,
                weight,
            });
            pos
        };

        self.edge_slots.insert(key, (pos_low, pos_high));
    }

    /// Add an edge whose weight must first be coerced to a [`Weight`].
    ///
    /// The graph is unchanged if the weight does not fit.
    pub fn try_add_weighted_edge<W>(&mut self, a: N, b: N, weight: W) -> Result<(), GraphError>
    where
        W: TryInto<Weight> + fmt::Display + Copy,
    {
        let w = weight
            .try_into()
            .map_err(|_| GraphError::WeightOutOfRange {
                value: weight.to_string(),
            })?;
        self.add_weighted_edge(a, b, w);
        Ok(())
    }

    /// Nodes adjacent to `node`, in edge-insertion order.
    ///
    /// A node that is not in the graph simply has no neighbors.
    pub fn neighbors<'a>(&'a self, node: &N) -> impl Iterator<Item = &'a N> + 'a {
        self.slot(node)
            .into_iter()
            .flat_map(move |idx| self.adjacent(idx).iter())
            .map(move |e| &self.nodes[e.target as usize])
    }

    /// Weight of the edge `{a, b}`, if present.
    pub fn edge_weight(&self, a: &N, b: &N) -> Option<Weight> {
        let (ia, ib) = (self.slot(a)?, self.slot(b)?);
        let key = (ia.min(ib), ia.max(ib));
        self.edge_slots
            .get(&key)
            .map(|&(pos_low, _)| self.adjacency[key.0 as usize][pos_low].weight)
    }

    pub fn has_edge(&self, a: &N, b: &N) -> bool {
        self.edge_weight(a, b).is_some()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    /// Number of adjacency entries for `node` (a self-loop counts once).
    pub fn degree(&self, node: &N) -> usize {
        self.slot(node).map_or(0, |idx| self.adjacent(idx).len())
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// Every undirected edge exactly once, as `(a, b, weight)`.
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N, Weight)> {
        self.adjacency.iter().enumerate().flat_map(move |(src, list)| {
            list.iter()
                .filter(move |e| e.target as usize >= src)
                .map(move |e| (&self.nodes[src], &self.nodes[e.target as usize], e.weight))
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_slots.len()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let nodes_mem = self.nodes.len() * (2 * size_of::<N>() + size_of::<NodeIdx>() + 16);
        let adj_mem: usize = self
            .adjacency
            .iter()
            .map(|v| size_of::<Vec<Edge>>() + v.capacity() * size_of::<Edge>())
            .sum();
        let slot_mem = self.edge_slots.len()
            * (size_of::<(NodeIdx, NodeIdx)>() + size_of::<(usize, usize)>() + 8);

        nodes_mem + adj_mem + slot_mem
    }

    pub(crate) fn slot(&self, node: &N) -> Option<NodeIdx> {
        self.index.get(node).copied()
    }

    pub(crate) fn node_at(&self, idx: NodeIdx) -> &N {
        &self.nodes[idx as usize]
    }

    pub(crate) fn adjacent(&self, idx: NodeIdx) -> &[Edge] {
        self.adjacency
            .get(idx as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

impl<N: Node> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> fmt::Debug for Graph<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edge_slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbors_of<'a>(g: &'a Graph<&'static str>, n: &'static str) -> Vec<&'a str> {
        g.neighbors(&n).copied().collect()
    }

    #[test]
    fn test_add_edge_inserts_endpoints() {
        let mut g = Graph::new();
        g.add_edge("A", "B");
        assert!(g.contains(&"A"));
        assert!(g.contains(&"B"));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_undirected_adjacency() {
        let mut g = Graph::new();
        g.add_edge("A", "B");
        assert_eq!(neighbors_of(&g, "A"), vec!["B"]);
        assert_eq!(neighbors_of(&g, "B"), vec!["A"]);
    }

    #[test]
    fn test_default_weight_is_one() {
        let mut g = Graph::new();
        g.add_edge("A", "B");
        assert_eq!(g.edge_weight(&"A", &"B"), Some(1));
        assert_eq!(g.edge_weight(&"B", &"A"), Some(1));
    }

    #[test]
    fn test_duplicate_edge_updates_weight() {
        let mut g = Graph::new();
        g.add_weighted_edge("A", "B", 3);
        g.add_weighted_edge("B", "A", 7);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.degree(&"A"), 1);
        assert_eq!(g.degree(&"B"), 1);
        assert_eq!(g.edge_weight(&"A", &"B"), Some(7));
    }

    #[test]
    fn test_neighbor_order_follows_insertion() {
        let mut g = Graph::new();
        g.add_edge("A", "C");
        g.add_edge("A", "B");
        g.add_edge("D", "A");
        assert_eq!(neighbors_of(&g, "A"), vec!["C", "B", "D"]);
        // Re-adding does not move the edge.
        g.add_edge("A", "C");
        assert_eq!(neighbors_of(&g, "A"), vec!["C", "B", "D"]);
    }

    #[test]
    fn test_neighbors_unknown_node_is_empty() {
        let mut g = Graph::new();
        g.add_edge("A", "B");
        assert!(neighbors_of(&g, "Z").is_empty());
        assert_eq!(g.degree(&"Z"), 0);
    }

    #[test]
    fn test_isolated_node() {
        let mut g = Graph::new();
        g.add_edge("A", "B");
        g.add_node("C");
        g.add_node("C");
        assert_eq!(g.node_count(), 3);
        assert!(neighbors_of(&g, "C").is_empty());
    }

    #[test]
    fn test_self_loop_single_entry() {
        let mut g = Graph::new();
        g.add_edge("A", "A");
        assert_eq!(neighbors_of(&g, "A"), vec!["A"]);
        assert_eq!(g.edge_count(), 1);
        g.add_weighted_edge("A", "A", 5);
        assert_eq!(g.edge_weight(&"A", &"A"), Some(5));
        assert_eq!(g.degree(&"A"), 1);
    }

    #[test]
    fn test_edges_listed_once() {
        let mut g = Graph::new();
        g.add_edge("A", "B");
        g.add_edge("B", "C");
        g.add_edge("C", "C");
        g.add_weighted_edge("C", "A", 4);
        let mut edges: Vec<(&str, &str, Weight)> =
            g.edges().map(|(a, b, w)| (*a, *b, w)).collect();
        edges.sort();
        assert_eq!(
            edges,
            vec![("A", "B", 1), ("A", "C", 4), ("B", "C", 1), ("C", "C", 1)]
        );
    }

    #[test]
    fn test_nodes_insertion_order() {
        let mut g = Graph::new();
        g.add_edge("X", "Y");
        g.add_node("W");
        g.add_edge("Y", "Z");
        let nodes: Vec<&str> = g.nodes().copied().collect();
        assert_eq!(nodes, vec!["X", "Y", "W", "Z"]);
    }

    #[test]
    fn test_try_add_weighted_edge_coerces() {
        let mut g: Graph<u64> = Graph::new();
        g.try_add_weighted_edge(0, 1, 42u8).unwrap();
        g.try_add_weighted_edge(1, 2, -3i32).unwrap();
        assert_eq!(g.edge_weight(&0, &1), Some(42));
        assert_eq!(g.edge_weight(&2, &1), Some(-3));
    }

    #[test]
    fn test_try_add_weighted_edge_out_of_range() {
        let mut g: Graph<u64> = Graph::new();
        let err = g.try_add_weighted_edge(0, 1, u64::MAX).unwrap_err();
        assert!(matches!(err, GraphError::WeightOutOfRange { ref value } if value == "18446744073709551615"));
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_string_nodes() {
        let mut g: Graph<String> = Graph::new();
        g.add_edge("alpha".to_string(), "beta".to_string());
        let n: Vec<&String> = g.neighbors(&"alpha".to_string()).collect();
        assert_eq!(n, vec!["beta"]);
    }

    #[test]
    fn test_memory_usage_nonzero() {
        let mut g: Graph<u64> = Graph::with_capacity(10, 10);
        for i in 0..9 {
            g.add_edge(i, i + 1);
        }
        assert!(g.memory_usage() > 0);
    }

    #[test]
    fn test_empty_graph() {
        let g: Graph<u64> = Graph::default();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.edges().count(), 0);
        assert!(!g.has_edge(&0, &1));
    }
}
