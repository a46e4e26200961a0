use serde::{Deserialize, Serialize};

use super::defaults;

/// Consensus builder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Reconciling with fewer reviewers than this logs a warning.
    pub min_reviewers: usize,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            min_reviewers: defaults::DEFAULT_MIN_REVIEWERS,
        }
    }
}
