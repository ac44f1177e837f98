//! Campaign launch quotas.

use serde::{Deserialize, Serialize};

/// Per-account username quotas checked before a campaign launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Usernames required per account to launch inviting.
    #[serde(default = "default_quota")]
    pub usernames_per_account_inviting: usize,
    /// Usernames required per account to launch a username mailing.
    #[serde(default = "default_quota")]
    pub usernames_per_account_mailing: usize,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            usernames_per_account_inviting: default_quota(),
            usernames_per_account_mailing: default_quota(),
        }
    }
}

fn default_quota() -> usize {
    5
}
