//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use accounthub_core::result::AppResult;
use accounthub_core::types::FolderId;

use super::path::FolderPath;
use crate::campaign::CampaignMode;

/// A folder grouping accounts together with their campaign data.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Display name. Siblings may share a name.
    pub name: String,
    /// Stored parent reference: `/` or the parent folder id.
    ///
    /// Kept as the raw stored string; use [`Folder::parent`] to read it.
    pub path: String,
    /// Chat that inviting campaigns add users to.
    pub chat: Option<String>,
    /// Message template for mailing campaigns.
    pub message: Option<String>,
    /// Target usernames, in the order they were entered.
    pub usernames: Vec<String>,
    /// Target groups, in the order they were entered.
    pub groups: Vec<String>,
    /// The most recently launched campaign, if any.
    pub campaign: Option<CampaignMode>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Parse the stored parent reference.
    pub fn parent(&self) -> AppResult<FolderPath> {
        FolderPath::resolve(&self.path)
    }

    /// Check if this is a top-level folder.
    pub fn is_top_level(&self) -> bool {
        self.path == super::path::ROOT_PATH
    }

    /// Whether a chat has been bound.
    pub fn has_chat(&self) -> bool {
        is_set(self.chat.as_deref())
    }

    /// Whether a message template has been entered.
    pub fn has_message(&self) -> bool {
        is_set(self.message.as_deref())
    }
}

fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Where the folder is created.
    pub path: FolderPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(path: &str) -> Folder {
        Folder {
            id: FolderId::new(),
            name: "Leads".to_string(),
            path: path.to_string(),
            chat: Some("   ".to_string()),
            message: None,
            usernames: Vec::new(),
            groups: Vec::new(),
            campaign: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_parent_resolution() {
        assert!(folder("/").is_top_level());
        assert_eq!(folder("/").parent().unwrap(), FolderPath::Root);
        assert!(folder("garbage").parent().is_err());
    }

    #[test]
    fn test_blank_values_are_unset() {
        let mut f = folder("/");
        assert!(!f.has_chat());
        assert!(!f.has_message());
        f.chat = Some("@sales_chat".to_string());
        assert!(f.has_chat());
    }
}
