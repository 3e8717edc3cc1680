use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};

use tracing::{debug, trace};

use crate::config::{Interleave, SearchConfig};
use crate::graph::{Graph, Node, NodeIdx};

/// An ordered node sequence from a search's start to its end.
///
/// Consecutive nodes are joined by an edge. An empty path means the end
/// is unreachable from the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path<N> {
    nodes: Vec<N>,
}

impl<N> Path<N> {
    /// The "no path exists" result.
    pub fn empty() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edge count, or None for an empty path.
    pub fn hops(&self) -> Option<usize> {
        self.nodes.len().checked_sub(1)
    }

    pub fn start(&self) -> Option<&N> {
        self.nodes.first()
    }

    pub fn end(&self) -> Option<&N> {
        self.nodes.last()
    }

    /// Consecutive node pairs, i.e. the edges walked by this path.
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N)> {
        self.nodes.windows(2).map(|w| (&w[0], &w[1]))
    }

    pub fn into_vec(self) -> Vec<N> {
        self.nodes
    }
}

impl<N: Node> Path<N> {
    /// True when every node is in `graph` and every consecutive pair is an edge.
    pub fn is_walk_in(&self, graph: &Graph<N>) -> bool {
        self.nodes.iter().all(|n| graph.contains(n))
            && self.edges().all(|(a, b)| graph.has_edge(a, b))
    }
}

impl<N> From<Vec<N>> for Path<N> {
    fn from(nodes: Vec<N>) -> Self {
        Self { nodes }
    }
}

impl<N> From<Path<N>> for Vec<N> {
    fn from(path: Path<N>) -> Self {
        path.nodes
    }
}

impl<N> IntoIterator for Path<N> {
    type Item = N;
    type IntoIter = std::vec::IntoIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

/// Work done by a single search call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes placed in a visited set (both directions combined).
    pub nodes_visited: usize,
    /// Nodes dequeued and had their neighbors scanned.
    pub nodes_expanded: usize,
}

/// Runs shortest-path queries against a borrowed graph.
///
/// The graph is read-only for the engine's lifetime, so one graph can back
/// any number of engines and searches.
#[derive(Debug, Clone)]
pub struct PathEngine<'g, N> {
    graph: &'g Graph<N>,
    config: SearchConfig,
}

impl<'g, N: Node> PathEngine<'g, N> {
    pub fn new(graph: &'g Graph<N>) -> Self {
        Self::with_config(graph, SearchConfig::default())
    }

    pub fn with_config(graph: &'g Graph<N>, config: SearchConfig) -> Self {
        Self { graph, config }
    }

    pub fn graph(&self) -> &'g Graph<N> {
        self.graph
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Single-direction BFS from `start`, stopping when `end` is dequeued.
    pub fn standard_bfs(&self, start: &N, end: &N) -> Path<N> {
        self.standard_bfs_with_stats(start, end).0
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn standard_bfs_with_stats(&self, start: &N, end: &N) -> (Path<N>, SearchStats) {
        let (Some(s), Some(t)) = (self.graph.slot(start), self.graph.slot(end)) else {
            debug!("endpoint not in graph");
            return (Path::empty(), SearchStats::default());
        };

        let mut side = Side::seeded(s);

        while let Some(current) = side.queue.pop_front() {
            if current == t {
                let nodes = side.walk_to_seed(current, Vec::new());
                let path = self.resolve(nodes.into_iter().rev());
                debug!(hops = path.hops(), nodes_visited = side.visited.len(), "path found");
                return (path, side.stats());
            }

            side.expanded += 1;
            let depth = side.visited[&current].depth;
            for edge in self.graph.adjacent(current) {
                side.discover(edge.target, current, depth);
            }
        }

        debug!(nodes_visited = side.visited.len(), "frontier exhausted");
        (Path::empty(), side.stats())
    }

    /// Meet-in-the-middle BFS from both endpoints.
    ///
    /// With [`Interleave::PerLayer`] the result is always a shortest path.
    /// With [`Interleave::PerNode`] the first meeting wins even if a shorter
    /// connection exists that neither side has reached yet.
    pub fn bidirectional_bfs(&self, start: &N, end: &N) -> Path<N> {
        self.bidirectional_bfs_with_stats(start, end).0
    }

    #[tracing::instrument(level = "debug", skip(self), fields(interleave = %self.config.interleave))]
    pub fn bidirectional_bfs_with_stats(&self, start: &N, end: &N) -> (Path<N>, SearchStats) {
        let (Some(s), Some(t)) = (self.graph.slot(start), self.graph.slot(end)) else {
            debug!("endpoint not in graph");
            return (Path::empty(), SearchStats::default());
        };

        if s == t {
            let stats = SearchStats {
                nodes_visited: 1,
                nodes_expanded: 0,
            };
            return (Path::from(vec![start.clone()]), stats);
        }

        let mut forward = Side::seeded(s);
        let mut backward = Side::seeded(t);

        while !forward.queue.is_empty() && !backward.queue.is_empty() {
            if let Some((near, far)) = self.step(&mut forward, &backward) {
                trace!(direction = "forward", "frontiers met");
                return self.join(&forward, near, &backward, far);
            }
            if let Some((near, far)) = self.step(&mut backward, &forward) {
                trace!(direction = "backward", "frontiers met");
                return self.join(&forward, far, &backward, near);
            }
        }

        let stats = combined_stats(&forward, &backward);
        debug!(nodes_visited = stats.nodes_visited, "frontiers exhausted without meeting");
        (Path::empty(), stats)
    }

    /// Expand one turn's worth of `this` side.
    ///
    /// Returns `(expanded, neighbor)` when a neighbor is already in `other`'s
    /// visited set.
    fn step(&self, this: &mut Side, other: &Side) -> Option<(NodeIdx, NodeIdx)> {
        let batch = match self.config.interleave {
            // The queue holds exactly one layer at the start of each turn.
            Interleave::PerLayer => this.queue.len(),
            Interleave::PerNode => 1,
        };

        for _ in 0..batch {
            let Some(current) = this.queue.pop_front() else {
                break;
            };
            this.expanded += 1;
            let depth = this.visited[&current].depth;

            for edge in self.graph.adjacent(current) {
                if other.visited.contains_key(&edge.target) {
                    return Some((current, edge.target));
                }
                this.discover(edge.target, current, depth);
            }
        }

        None
    }

    /// Stitch `start .. f` (forward half) to `b .. end` (backward half).
    fn join(
        &self,
        forward: &Side,
        f: NodeIdx,
        backward: &Side,
        b: NodeIdx,
    ) -> (Path<N>, SearchStats) {
        let mut nodes = forward.walk_to_seed(f, Vec::new());
        nodes.reverse();
        let nodes = backward.walk_to_seed(b, nodes);

        let path = self.resolve(nodes.into_iter());
        let stats = combined_stats(forward, backward);
        debug!(hops = path.hops(), nodes_visited = stats.nodes_visited, "path found");
        (path, stats)
    }

    fn resolve(&self, slots: impl Iterator<Item = NodeIdx>) -> Path<N> {
        Path::from(slots.map(|i| self.graph.node_at(i).clone()).collect::<Vec<_>>())
    }
}

/// Shortest path by plain BFS using the default [`SearchConfig`].
pub fn standard_bfs<N: Node>(graph: &Graph<N>, start: &N, end: &N) -> Path<N> {
    PathEngine::new(graph).standard_bfs(start, end)
}

/// Shortest path by bidirectional BFS using the default [`SearchConfig`].
pub fn bidirectional_bfs<N: Node>(graph: &Graph<N>, start: &N, end: &N) -> Path<N> {
    PathEngine::new(graph).bidirectional_bfs(start, end)
}

/// Predecessor record kept for each visited node. The seed is its own parent.
#[derive(Debug, Clone, Copy)]
struct Visit {
    parent: NodeIdx,
    depth: u32,
}

/// Frontier and visited set for one search direction.
struct Side {
    queue: VecDeque<NodeIdx>,
    visited: HashMap<NodeIdx, Visit>,
    expanded: usize,
}

impl Side {
    fn seeded(seed: NodeIdx) -> Self {
        let mut visited = HashMap::new();
        visited.insert(seed, Visit { parent: seed, depth: 0 });
        Self {
            queue: VecDeque::from([seed]),
            visited,
            expanded: 0,
        }
    }

    /// Mark `node` visited (at enqueue time) unless it already is.
    fn discover(&mut self, node: NodeIdx, parent: NodeIdx, parent_depth: u32) {
        if let Entry::Vacant(slot) = self.visited.entry(node) {
            slot.insert(Visit {
                parent,
                depth: parent_depth + 1,
            });
            self.queue.push_back(node);
        }
    }

    /// Append `node, parent(node), ..., seed` to `out`.
    ///
    /// Each step lands on a visited neighbor one hop closer to the seed.
    fn walk_to_seed(&self, node: NodeIdx, mut out: Vec<NodeIdx>) -> Vec<NodeIdx> {
        let mut current = node;
        loop {
            out.push(current);
            let parent = self.visited[&current].parent;
            if parent == current {
                return out;
            }
            current = parent;
        }
    }

    fn stats(&self) -> SearchStats {
        SearchStats {
            nodes_visited: self.visited.len(),
            nodes_expanded: self.expanded,
        }
    }
}

fn combined_stats(forward: &Side, backward: &Side) -> SearchStats {
    SearchStats {
        nodes_visited: forward.visited.len() + backward.visited.len(),
        nodes_expanded: forward.expanded + backward.expanded,
    }
}
