//! Aggregate read model returned when a folder is opened.

use serde::{Deserialize, Serialize};

use super::model::Folder;
use super::tree::{AncestorChain, MoveTargets};
use crate::account::Account;

/// Everything needed to render one folder page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderView {
    /// The folder itself.
    pub folder: Folder,
    /// Accounts owned by the folder.
    pub accounts: Vec<Account>,
    /// Direct child folders, ordered by name.
    pub child_folders: Vec<Folder>,
    /// Number of accounts owned by the folder.
    pub account_count: u64,
    /// Where the folder may be moved.
    pub move_targets: MoveTargets,
    /// Breadcrumb trail ending at the folder.
    pub ancestors: AncestorChain,
}
