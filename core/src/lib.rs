//! bibfs-core: shortest paths on unweighted, undirected in-memory graphs.
//!
//! A [`Graph`] stores nodes and undirected edges with insertion-ordered
//! adjacency. A [`PathEngine`] borrows a graph read-only and answers
//! shortest-path queries with either a single-direction BFS
//! ([`PathEngine::standard_bfs`]) or a meet-in-the-middle BFS from both
//! endpoints ([`PathEngine::bidirectional_bfs`]).
//!
//! An empty [`Path`] means "no path". Unknown nodes are not errors: they
//! have no neighbors and are reachable from nothing.

mod config;
mod error;
mod graph;
mod traversal;

pub use config::{Interleave, SearchConfig};
pub use error::{ConfigError, GraphError};
pub use graph::{Graph, Node, NodeIdx, Weight};
pub use traversal::{bidirectional_bfs, standard_bfs, Path, PathEngine, SearchStats};
