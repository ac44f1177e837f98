//! Store traits consumed by the service layer.
//!
//! Both traits are object safe so services can hold `Arc<dyn FolderStore>`
//! and swap the PostgreSQL repositories for the in-memory store.

use async_trait::async_trait;

use accounthub_core::result::AppResult;
use accounthub_core::types::{AccountId, FolderId};
use accounthub_entity::account::{Account, CreateAccount, UpdateAccount};
use accounthub_entity::campaign::CampaignMode;
use accounthub_entity::folder::{CreateFolder, Folder, FolderPath};

/// Persistence operations for folders.
///
/// Mutations on a missing folder fail with a `NotFound` error; I/O
/// failures surface as `StoreLookupFailed`.
#[async_trait]
pub trait FolderStore: Send + Sync + 'static {
    /// Find a folder by ID.
    async fn get_folder(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// List every folder, ordered by name.
    async fn list_folders(&self) -> AppResult<Vec<Folder>>;

    /// List folders whose stored path equals `path`, ordered by name.
    async fn list_children(&self, path: FolderPath) -> AppResult<Vec<Folder>>;

    /// Create a new folder.
    ///
    /// Fails with `NotFound` if the parent does not exist when the row is
    /// written.
    async fn create_folder(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Rename a folder.
    async fn rename_folder(&self, id: FolderId, name: &str) -> AppResult<Folder>;

    /// Store a new parent reference for a folder.
    ///
    /// The destination is checked in the same atomic step as the write: a
    /// missing destination fails with `NotFound`, and a destination that is
    /// the folder itself or lies beneath it fails with `IllegalMove`.
    async fn move_folder(&self, id: FolderId, destination: FolderPath) -> AppResult<Folder>;

    /// Delete a folder, any folders still beneath it, and the accounts they
    /// own. Returns `true` if the folder existed.
    async fn delete_folder(&self, id: FolderId) -> AppResult<bool>;

    /// Bind or clear the folder chat.
    async fn update_chat(&self, id: FolderId, chat: Option<&str>) -> AppResult<Folder>;

    /// Set or clear the folder message template.
    async fn update_message(&self, id: FolderId, message: Option<&str>) -> AppResult<Folder>;

    /// Replace the folder username list.
    async fn update_usernames(&self, id: FolderId, usernames: &[String]) -> AppResult<Folder>;

    /// Replace the folder group list.
    async fn update_groups(&self, id: FolderId, groups: &[String]) -> AppResult<Folder>;

    /// Record a campaign launch and flag every paced account as launched.
    async fn launch_campaign(&self, id: FolderId, mode: CampaignMode) -> AppResult<Folder>;
}

/// Persistence operations for accounts.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Find an account by ID.
    async fn get_account(&self, id: AccountId) -> AppResult<Option<Account>>;

    /// List the accounts owned by a folder, oldest first.
    async fn list_accounts_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<Account>>;

    /// Count the accounts owned by a folder.
    async fn count_accounts(&self, folder_id: FolderId) -> AppResult<u64>;

    /// Create a new account.
    async fn create_account(&self, data: &CreateAccount) -> AppResult<Account>;

    /// Write back an account's mutable fields.
    async fn update_account(&self, data: &UpdateAccount) -> AppResult<Account>;

    /// Set one account's pacing interval.
    async fn set_interval(&self, id: AccountId, interval: u8) -> AppResult<Account>;

    /// Delete an account. Returns `true` if deleted.
    async fn delete_account(&self, id: AccountId) -> AppResult<bool>;
}
