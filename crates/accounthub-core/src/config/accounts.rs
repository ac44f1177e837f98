//! Account pacing configuration.

use serde::{Deserialize, Serialize};

/// Range from which fresh pacing intervals are drawn.
///
/// Both bounds are inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Smallest interval assigned to a new account.
    #[serde(default = "default_interval_min")]
    pub interval_min: u8,
    /// Largest interval assigned to a new account.
    #[serde(default = "default_interval_max")]
    pub interval_max: u8,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            interval_min: default_interval_min(),
            interval_max: default_interval_max(),
        }
    }
}

fn default_interval_min() -> u8 {
    15
}

fn default_interval_max() -> u8 {
    40
}
