//! Account settings read model.

use serde::{Deserialize, Serialize};

use accounthub_core::types::{AccountId, FolderId};

use super::status::StatusBlock;
use crate::folder::ChainEntry;

/// An account together with the folder context shown on its settings page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSettings {
    /// Account ID.
    pub id: AccountId,
    /// Account name.
    pub name: String,
    /// Account phone number.
    pub phone: String,
    /// Whether the account takes part in the running campaign.
    pub launch: bool,
    /// Pacing interval.
    pub interval: u8,
    /// Block status.
    pub status_block: StatusBlock,
    /// Owning folder ID.
    pub folder_id: FolderId,
    /// Owning folder name.
    pub folder_name: String,
    /// Owning folder chat.
    pub chat: Option<String>,
    /// Folders the account may be moved to, ordered by name.
    pub move_targets: Vec<ChainEntry>,
}
