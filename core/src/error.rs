use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("edge weight {value} does not fit in a 64-bit signed integer")]
    WeightOutOfRange { value: String },
}

/// Errors raised while loading a [`SearchConfig`](crate::SearchConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read search config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid search config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown interleave policy '{0}' (use 'per_layer' or 'per_node')")]
    UnknownInterleave(String),
}
