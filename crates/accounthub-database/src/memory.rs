//! In-process folder and account store backed by `dashmap`.
//!
//! Behaves like the PostgreSQL repositories, including the cascade from a
//! deleted folder to its accounts. Useful for tests and for tooling that
//! runs without a database.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use accounthub_core::error::AppError;
use accounthub_core::result::AppResult;
use accounthub_core::types::{AccountId, FolderId};
use accounthub_entity::account::{Account, CreateAccount, UpdateAccount};
use accounthub_entity::campaign::CampaignMode;
use accounthub_entity::folder::{CreateFolder, Folder, FolderPath};

use crate::store::{AccountStore, FolderStore};

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    folders: DashMap<FolderId, Folder>,
    accounts: DashMap<AccountId, Account>,
    /// Taken by create, move and delete for their check and write.
    shape: Mutex<()>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a folder record exactly as given, replacing any folder with
    /// the same id. The stored path is not validated.
    pub fn insert_folder(&self, folder: Folder) {
        self.folders.insert(folder.id, folder);
    }

    /// Insert an account record exactly as given.
    pub fn insert_account(&self, account: Account) {
        self.accounts.insert(account.id, account);
    }

    /// Number of stored folders.
    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    fn lock_shape(&self) -> MutexGuard<'_, ()> {
        self.shape.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the parent chain starting at `start` passes through `id`.
    fn chain_contains(&self, start: FolderId, id: FolderId) -> bool {
        let mut seen = HashSet::new();
        let mut current = start;
        loop {
            if current == id {
                return true;
            }
            if !seen.insert(current) {
                return false;
            }
            let parent = self.folders.get(&current).and_then(|f| f.parent().ok());
            match parent {
                Some(FolderPath::Folder(next)) => current = next,
                Some(FolderPath::Root) | None => return false,
            }
        }
    }

    /// `id` and every folder whose chain leads back to it.
    fn subtree(&self, id: FolderId) -> Vec<FolderId> {
        let mut found = vec![id];
        let mut seen = HashSet::from([id]);
        let mut next = 0;
        while next < found.len() {
            let stored = found[next].to_string();
            next += 1;
            for entry in self.folders.iter().filter(|e| e.path == stored) {
                if seen.insert(entry.id) {
                    found.push(entry.id);
                }
            }
        }
        found
    }

    fn modify_folder(&self, id: FolderId, f: impl FnOnce(&mut Folder)) -> AppResult<Folder> {
        let mut entry = self
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        f(entry.value_mut());
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    fn modify_account(&self, id: AccountId, f: impl FnOnce(&mut Account)) -> AppResult<Account> {
        let mut entry = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Account {id} not found")))?;
        f(entry.value_mut());
        Ok(entry.clone())
    }

    fn sorted_folders(&self, filter: impl Fn(&Folder) -> bool) -> Vec<Folder> {
        let mut folders: Vec<Folder> = self
            .folders
            .iter()
            .filter(|entry| filter(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.0.cmp(&b.id.0)));
        folders
    }
}

#[async_trait]
impl FolderStore for MemoryStore {
    async fn get_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.folders.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        Ok(self.sorted_folders(|_| true))
    }

    async fn list_children(&self, path: FolderPath) -> AppResult<Vec<Folder>> {
        let stored = path.to_string();
        Ok(self.sorted_folders(|f| f.path == stored))
    }

    async fn create_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        let _shape = self.lock_shape();
        if let FolderPath::Folder(parent) = data.path {
            if !self.folders.contains_key(&parent) {
                return Err(AppError::not_found(format!("Parent folder {parent} not found")));
            }
        }

        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(),
            name: data.name.clone(),
            path: data.path.to_string(),
            chat: None,
            message: None,
            usernames: Vec::new(),
            groups: Vec::new(),
            campaign: None,
            created_at: now,
            updated_at: now,
        };
        self.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn rename_folder(&self, id: FolderId, name: &str) -> AppResult<Folder> {
        self.modify_folder(id, |f| f.name = name.to_string())
    }

    async fn move_folder(&self, id: FolderId, destination: FolderPath) -> AppResult<Folder> {
        let _shape = self.lock_shape();
        if let FolderPath::Folder(target) = destination {
            if !self.folders.contains_key(&target) {
                return Err(AppError::not_found(format!(
                    "Destination folder {target} not found"
                )));
            }
            if self.chain_contains(target, id) {
                return Err(AppError::illegal_move(format!(
                    "Folder {id} cannot be moved into {target}, which lies within it"
                )));
            }
        }
        self.modify_folder(id, |f| f.path = destination.to_string())
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<bool> {
        let _shape = self.lock_shape();
        if !self.folders.contains_key(&id) {
            return Ok(false);
        }

        let doomed = self.subtree(id);
        for folder_id in &doomed {
            self.folders.remove(folder_id);
        }
        self.accounts
            .retain(|_, account| !doomed.contains(&account.folder_id));
        debug!(
            folder_id = %id,
            removed = doomed.len(),
            "Removed folder subtree and its accounts from memory store"
        );
        Ok(true)
    }

    async fn update_chat(&self, id: FolderId, chat: Option<&str>) -> AppResult<Folder> {
        self.modify_folder(id, |f| f.chat = chat.map(str::to_string))
    }

    async fn update_message(&self, id: FolderId, message: Option<&str>) -> AppResult<Folder> {
        self.modify_folder(id, |f| f.message = message.map(str::to_string))
    }

    async fn update_usernames(&self, id: FolderId, usernames: &[String]) -> AppResult<Folder> {
        self.modify_folder(id, |f| f.usernames = usernames.to_vec())
    }

    async fn update_groups(&self, id: FolderId, groups: &[String]) -> AppResult<Folder> {
        self.modify_folder(id, |f| f.groups = groups.to_vec())
    }

    async fn launch_campaign(&self, id: FolderId, mode: CampaignMode) -> AppResult<Folder> {
        let folder = self.modify_folder(id, |f| f.campaign = Some(mode))?;
        for mut account in self.accounts.iter_mut() {
            if account.folder_id == id && account.has_interval() {
                account.launch = true;
            }
        }
        Ok(folder)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn get_account(&self, id: AccountId) -> AppResult<Option<Account>> {
        Ok(self.accounts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_accounts_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .filter(|entry| entry.folder_id == folder_id)
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        Ok(accounts)
    }

    async fn count_accounts(&self, folder_id: FolderId) -> AppResult<u64> {
        Ok(self
            .accounts
            .iter()
            .filter(|entry| entry.folder_id == folder_id)
            .count() as u64)
    }

    async fn create_account(&self, data: &CreateAccount) -> AppResult<Account> {
        if !self.folders.contains_key(&data.folder_id) {
            return Err(AppError::not_found(format!(
                "Folder {} not found",
                data.folder_id
            )));
        }
        let account = Account {
            id: AccountId::new(),
            folder_id: data.folder_id,
            name: data.name.clone(),
            phone: data.phone.clone(),
            interval: data.interval,
            status_block: data.status_block,
            verify: data.verify,
            launch: data.launch,
            created_at: Utc::now(),
        };
        self.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update_account(&self, data: &UpdateAccount) -> AppResult<Account> {
        if !self.folders.contains_key(&data.folder_id) {
            return Err(AppError::not_found(format!(
                "Folder {} not found",
                data.folder_id
            )));
        }
        self.modify_account(data.id, |account| {
            account.folder_id = data.folder_id;
            account.name = data.name.clone();
            account.phone = data.phone.clone();
            account.interval = data.interval;
            account.launch = data.launch;
        })
    }

    async fn set_interval(&self, id: AccountId, interval: u8) -> AppResult<Account> {
        self.modify_account(id, |account| account.interval = interval)
    }

    async fn delete_account(&self, id: AccountId) -> AppResult<bool> {
        Ok(self.accounts.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accounthub_core::ErrorKind;
    use accounthub_entity::account::StatusBlock;

    fn new_account(folder_id: FolderId, interval: u8) -> CreateAccount {
        CreateAccount {
            folder_id,
            name: "bot".to_string(),
            phone: "+10000000000".to_string(),
            interval,
            status_block: StatusBlock::Clean,
            verify: false,
            launch: false,
        }
    }

    #[tokio::test]
    async fn test_children_listed_by_path() {
        let store = MemoryStore::new();
        let parent = store
            .create_folder(&CreateFolder {
                name: "Parent".to_string(),
                path: FolderPath::Root,
            })
            .await
            .unwrap();
        for name in ["b", "a"] {
            store
                .create_folder(&CreateFolder {
                    name: name.to_string(),
                    path: FolderPath::Folder(parent.id),
                })
                .await
                .unwrap();
        }

        let children = store.list_children(FolderPath::Folder(parent.id)).await.unwrap();
        let names: Vec<_> = children.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(store.list_children(FolderPath::Root).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_folder_removes_accounts() {
        let store = MemoryStore::new();
        let folder = store
            .create_folder(&CreateFolder {
                name: "Doomed".to_string(),
                path: FolderPath::Root,
            })
            .await
            .unwrap();
        store.create_account(&new_account(folder.id, 20)).await.unwrap();

        assert!(store.delete_folder(folder.id).await.unwrap());
        assert_eq!(store.count_accounts(folder.id).await.unwrap(), 0);
        assert!(!store.delete_folder(folder.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_launch_flags_paced_accounts_only() {
        let store = MemoryStore::new();
        let folder = store
            .create_folder(&CreateFolder {
                name: "Run".to_string(),
                path: FolderPath::Root,
            })
            .await
            .unwrap();
        let paced = store.create_account(&new_account(folder.id, 25)).await.unwrap();
        let idle = store.create_account(&new_account(folder.id, 0)).await.unwrap();

        let launched = store
            .launch_campaign(folder.id, CampaignMode::MailingGroups)
            .await
            .unwrap();
        assert_eq!(launched.campaign, Some(CampaignMode::MailingGroups));
        assert!(store.get_account(paced.id).await.unwrap().unwrap().launch);
        assert!(!store.get_account(idle.id).await.unwrap().unwrap().launch);
    }

    #[tokio::test]
    async fn test_account_requires_existing_folder() {
        let store = MemoryStore::new();
        let err = store
            .create_account(&new_account(FolderId::new(), 20))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    async fn top(store: &MemoryStore, name: &str, path: FolderPath) -> Folder {
        store
            .create_folder(&CreateFolder {
                name: name.to_string(),
                path,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_move_under_own_subtree_rejected() {
        let store = MemoryStore::new();
        let a = top(&store, "a", FolderPath::Root).await;
        let b = top(&store, "b", FolderPath::Folder(a.id)).await;
        let c = top(&store, "c", FolderPath::Folder(b.id)).await;

        for target in [a.id, b.id, c.id] {
            let err = store
                .move_folder(a.id, FolderPath::Folder(target))
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::IllegalMove);
        }
        let err = store
            .move_folder(a.id, FolderPath::Folder(FolderId::new()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let moved = store.move_folder(c.id, FolderPath::Root).await.unwrap();
        assert_eq!(moved.path, "/");
        store.move_folder(a.id, FolderPath::Folder(c.id)).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_under_missing_parent_rejected() {
        let store = MemoryStore::new();
        let err = store
            .create_folder(&CreateFolder {
                name: "orphan".to_string(),
                path: FolderPath::Folder(FolderId::new()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(store.folder_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_sweeps_remaining_subtree() {
        let store = MemoryStore::new();
        let a = top(&store, "a", FolderPath::Root).await;
        let b = top(&store, "b", FolderPath::Folder(a.id)).await;
        let c = top(&store, "c", FolderPath::Folder(b.id)).await;
        let other = top(&store, "other", FolderPath::Root).await;
        store.create_account(&new_account(c.id, 20)).await.unwrap();

        assert!(store.delete_folder(a.id).await.unwrap());
        assert_eq!(store.folder_count(), 1);
        assert!(store.get_folder(other.id).await.unwrap().is_some());
        assert_eq!(store.count_accounts(c.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mutating_missing_folder_is_not_found() {
        let store = MemoryStore::new();
        let err = store.rename_folder(FolderId::new(), "x").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
