//! Folder tree configuration.

use serde::{Deserialize, Serialize};

/// Limits applied while walking the folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderConfig {
    /// Maximum number of folders on one chain, the top level included.
    /// Longer chains are reported as malformed.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    1000
}
