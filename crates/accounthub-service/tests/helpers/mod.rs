//! Shared helpers for service integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use accounthub_core::config::{AccountConfig, CampaignConfig, FolderConfig};
use accounthub_core::result::AppResult;
use accounthub_core::types::FolderId;
use accounthub_database::store::{AccountStore, FolderStore};
use accounthub_database::MemoryStore;
use accounthub_entity::account::Account;
use accounthub_entity::campaign::CampaignMode;
use accounthub_entity::folder::{CreateFolder, Folder, FolderPath};
use accounthub_service::account::service::CreateAccountRequest;
use accounthub_service::folder::service::CreateFolderRequest;
use accounthub_service::{AccountService, FolderService, IntervalGenerator, RequestContext};

/// Services wired to one in-memory store.
pub struct TestApp {
    /// Backing store, for seeding records the services would reject.
    pub store: Arc<MemoryStore>,
    /// Folder service under test.
    pub folders: FolderService,
    /// Account service under test.
    pub accounts: AccountService,
}

impl TestApp {
    /// Create a test application with default configuration.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::wired(store.clone(), store)
    }

    /// Like [`TestApp::new`], but folder reads yield to the scheduler so
    /// concurrent requests interleave between their reads and writes.
    pub fn yielding() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::wired(store.clone(), Arc::new(YieldingStore::new(store)))
    }

    fn wired(store: Arc<MemoryStore>, folder_store: Arc<dyn FolderStore>) -> Self {
        let account_store: Arc<dyn AccountStore> = store.clone();
        let intervals = Arc::new(
            IntervalGenerator::with_seed(&AccountConfig::default(), 7)
                .expect("default interval range is valid"),
        );

        Self {
            folders: FolderService::new(
                Arc::clone(&folder_store),
                Arc::clone(&account_store),
                &FolderConfig::default(),
                CampaignConfig::default(),
            ),
            accounts: AccountService::new(account_store, folder_store, intervals),
            store,
        }
    }

    /// A fresh request context.
    pub fn ctx(&self) -> RequestContext {
        RequestContext::new()
    }

    /// Create a folder through the service.
    pub async fn folder(&self, name: &str, path: FolderPath) -> Folder {
        self.folders
            .create_folder(
                &self.ctx(),
                CreateFolderRequest {
                    name: name.to_string(),
                    path,
                },
            )
            .await
            .expect("Failed to create folder")
    }

    /// Create a top-level folder.
    pub async fn top(&self, name: &str) -> Folder {
        self.folder(name, FolderPath::Root).await
    }

    /// Create a folder under `parent`.
    pub async fn child(&self, name: &str, parent: &Folder) -> Folder {
        self.folder(name, FolderPath::Folder(parent.id)).await
    }

    /// Create an account with an explicit interval.
    pub async fn account(&self, folder: &Folder, interval: u8) -> Account {
        self.accounts
            .create_account(
                &self.ctx(),
                CreateAccountRequest {
                    folder_id: folder.id,
                    name: "bot".to_string(),
                    phone: "+10000000000".to_string(),
                    interval: Some(interval),
                },
            )
            .await
            .expect("Failed to create account")
    }

    /// Insert a folder record verbatim, bypassing every check.
    pub fn raw_folder(&self, id: FolderId, name: &str, path: &str) -> Folder {
        let folder = raw_record(id, name, path);
        self.store.insert_folder(folder.clone());
        folder
    }
}

/// Build a folder record without touching any store.
pub fn raw_record(id: FolderId, name: &str, path: &str) -> Folder {
    Folder {
        id,
        name: name.to_string(),
        path: path.to_string(),
        chat: None,
        message: None,
        usernames: Vec::new(),
        groups: Vec::new(),
        campaign: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Usernames `@user0..@user{n}`.
pub fn usernames(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("@user{i}")).collect()
}

/// Folder store that counts single-folder lookups.
pub struct CountingStore {
    inner: Arc<MemoryStore>,
    lookups: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }

    /// Number of `get_folder` calls so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FolderStore for CountingStore {
    async fn get_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_folder(id).await
    }

    async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        self.inner.list_folders().await
    }

    async fn list_children(&self, path: FolderPath) -> AppResult<Vec<Folder>> {
        self.inner.list_children(path).await
    }

    async fn create_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        self.inner.create_folder(data).await
    }

    async fn rename_folder(&self, id: FolderId, name: &str) -> AppResult<Folder> {
        self.inner.rename_folder(id, name).await
    }

    async fn move_folder(&self, id: FolderId, destination: FolderPath) -> AppResult<Folder> {
        self.inner.move_folder(id, destination).await
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<bool> {
        self.inner.delete_folder(id).await
    }

    async fn update_chat(&self, id: FolderId, chat: Option<&str>) -> AppResult<Folder> {
        self.inner.update_chat(id, chat).await
    }

    async fn update_message(&self, id: FolderId, message: Option<&str>) -> AppResult<Folder> {
        self.inner.update_message(id, message).await
    }

    async fn update_usernames(&self, id: FolderId, usernames: &[String]) -> AppResult<Folder> {
        self.inner.update_usernames(id, usernames).await
    }

    async fn update_groups(&self, id: FolderId, groups: &[String]) -> AppResult<Folder> {
        self.inner.update_groups(id, groups).await
    }

    async fn launch_campaign(&self, id: FolderId, mode: CampaignMode) -> AppResult<Folder> {
        self.inner.launch_campaign(id, mode).await
    }
}

/// Folder store whose reads give up the task after fetching.
pub struct YieldingStore {
    inner: Arc<MemoryStore>,
}

impl YieldingStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl FolderStore for YieldingStore {
    async fn get_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        let folder = self.inner.get_folder(id).await;
        tokio::task::yield_now().await;
        folder
    }

    async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        let folders = self.inner.list_folders().await;
        tokio::task::yield_now().await;
        folders
    }

    async fn list_children(&self, path: FolderPath) -> AppResult<Vec<Folder>> {
        let children = self.inner.list_children(path).await;
        tokio::task::yield_now().await;
        children
    }

    async fn create_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        self.inner.create_folder(data).await
    }

    async fn rename_folder(&self, id: FolderId, name: &str) -> AppResult<Folder> {
        self.inner.rename_folder(id, name).await
    }

    async fn move_folder(&self, id: FolderId, destination: FolderPath) -> AppResult<Folder> {
        self.inner.move_folder(id, destination).await
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<bool> {
        self.inner.delete_folder(id).await
    }

    async fn update_chat(&self, id: FolderId, chat: Option<&str>) -> AppResult<Folder> {
        self.inner.update_chat(id, chat).await
    }

    async fn update_message(&self, id: FolderId, message: Option<&str>) -> AppResult<Folder> {
        self.inner.update_message(id, message).await
    }

    async fn update_usernames(&self, id: FolderId, usernames: &[String]) -> AppResult<Folder> {
        self.inner.update_usernames(id, usernames).await
    }

    async fn update_groups(&self, id: FolderId, groups: &[String]) -> AppResult<Folder> {
        self.inner.update_groups(id, groups).await
    }

    async fn launch_campaign(&self, id: FolderId, mode: CampaignMode) -> AppResult<Folder> {
        self.inner.launch_campaign(id, mode).await
    }
}
