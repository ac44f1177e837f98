//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use accounthub_core::types::{AccountId, FolderId};

use super::status::StatusBlock;

/// An automation identity owned by exactly one folder.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: AccountId,
    /// The owning folder.
    pub folder_id: FolderId,
    /// Account display name.
    pub name: String,
    /// Phone number the account is registered with.
    pub phone: String,
    /// Campaign pacing interval; `0` means not configured.
    #[sqlx(try_from = "i16")]
    pub interval: u8,
    /// Block status reported by the platform.
    pub status_block: StatusBlock,
    /// Whether the account has been verified.
    pub verify: bool,
    /// Whether the account takes part in the running campaign.
    pub launch: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Whether a pacing interval has been set.
    pub fn has_interval(&self) -> bool {
        self.interval != 0
    }
}

/// Data required to insert a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    /// The owning folder.
    pub folder_id: FolderId,
    /// Account display name.
    pub name: String,
    /// Phone number.
    pub phone: String,
    /// Pacing interval.
    pub interval: u8,
    /// Initial block status.
    pub status_block: StatusBlock,
    /// Initial verification flag.
    pub verify: bool,
    /// Initial launch flag.
    pub launch: bool,
}

/// Mutable account fields written back by a settings update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAccount {
    /// The account being updated.
    pub id: AccountId,
    /// The (possibly new) owning folder.
    pub folder_id: FolderId,
    /// Account display name.
    pub name: String,
    /// Phone number.
    pub phone: String,
    /// Pacing interval.
    pub interval: u8,
    /// Launch flag.
    pub launch: bool,
}
