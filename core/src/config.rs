use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How much work each side of a bidirectional search does per turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interleave {
    /// Expand one complete BFS layer per side per turn.
    ///
    /// The first meeting point found is always on a minimum-length path.
    #[default]
    PerLayer,
    /// Expand a single dequeued node per side per turn.
    ///
    /// Can report a meeting before the shortest connection has been seen,
    /// so the returned path may be longer than the true distance.
    PerNode,
}

impl Interleave {
    pub fn as_str(self) -> &'static str {
        match self {
            Interleave::PerLayer => "per_layer",
            Interleave::PerNode => "per_node",
        }
    }
}

impl fmt::Display for Interleave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts "per_layer"/"layer" and "per_node"/"node" (case-insensitive, `-` or `_`).
impl FromStr for Interleave {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "per_layer" | "layer" => Ok(Interleave::PerLayer),
            "per_node" | "node" => Ok(Interleave::PerNode),
            _ => Err(ConfigError::UnknownInterleave(s.to_string())),
        }
    }
}

/// Search tuning shared by every query a [`PathEngine`](crate::PathEngine) runs.
///
/// Every field has a default, so `{}` is a valid config document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Bidirectional interleaving policy. Default: `per_layer`.
    pub interleave: Interleave,
}

impl SearchConfig {
    pub fn with_interleave(mut self, interleave: Interleave) -> Self {
        self.interleave = interleave;
        self
    }

    /// Parse a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        tracing::debug!(path = %path.display(), interleave = %config.interleave, "loaded search config");
        Ok(config)
    }
}
