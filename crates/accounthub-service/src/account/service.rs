//! Account CRUD, settings, and interval assignment.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use accounthub_core::error::AppError;
use accounthub_core::result::AppResult;
use accounthub_core::types::{AccountId, FolderId};
use accounthub_database::store::{AccountStore, FolderStore};
use accounthub_entity::account::{
    Account, AccountSettings, CreateAccount, StatusBlock, UpdateAccount,
};
use accounthub_entity::folder::{ChainEntry, Folder};

use super::interval::IntervalGenerator;
use crate::context::RequestContext;

/// Manages the accounts owned by folders.
#[derive(Clone)]
pub struct AccountService {
    /// Account store.
    accounts: Arc<dyn AccountStore>,
    /// Folder store.
    folders: Arc<dyn FolderStore>,
    /// Process-wide interval generator.
    intervals: Arc<IntervalGenerator>,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("intervals", &self.intervals)
            .finish_non_exhaustive()
    }
}

/// Request to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    /// Owning folder.
    pub folder_id: FolderId,
    /// Account name.
    pub name: String,
    /// Phone number.
    pub phone: String,
    /// Pacing interval; drawn at random when omitted.
    #[serde(default)]
    pub interval: Option<u8>,
}

/// Partial update of an account's settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    /// New name.
    pub name: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New pacing interval (0 unsets it).
    pub interval: Option<u8>,
    /// New launch flag.
    pub launch: Option<bool>,
    /// Folder to move the account to.
    pub folder_id: Option<FolderId>,
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        folders: Arc<dyn FolderStore>,
        intervals: Arc<IntervalGenerator>,
    ) -> Self {
        Self {
            accounts,
            folders,
            intervals,
        }
    }

    /// Creates an account in a folder.
    pub async fn create_account(
        &self,
        ctx: &RequestContext,
        req: CreateAccountRequest,
    ) -> AppResult<Account> {
        let name = require_field("name", &req.name)?;
        let phone = require_field("phone", &req.phone)?;
        self.folder(ctx, req.folder_id).await?;

        let interval = req.interval.unwrap_or_else(|| self.intervals.draw());
        let account = ctx
            .run(self.accounts.create_account(&CreateAccount {
                folder_id: req.folder_id,
                name,
                phone,
                interval,
                status_block: StatusBlock::Clean,
                verify: false,
                launch: false,
            }))
            .await?;

        info!(
            request_id = %ctx.request_id,
            account_id = %account.id,
            folder_id = %account.folder_id,
            interval = account.interval,
            "Account created"
        );
        Ok(account)
    }

    /// Gets an account by ID.
    pub async fn get_account(&self, ctx: &RequestContext, account_id: AccountId) -> AppResult<Account> {
        ctx.run(self.accounts.get_account(account_id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Account {account_id} not found")))
    }

    /// Lists a folder's accounts in creation order.
    pub async fn list_accounts(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<Vec<Account>> {
        self.folder(ctx, folder_id).await?;
        ctx.run(self.accounts.list_accounts_by_folder(folder_id))
            .await
    }

    /// The settings page of an account viewed from its folder.
    pub async fn settings(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        account_id: AccountId,
    ) -> AppResult<AccountSettings> {
        let folder = self.folder(ctx, folder_id).await?;
        let account = self.get_account(ctx, account_id).await?;
        if account.folder_id != folder_id {
            return Err(AppError::not_found(format!(
                "Account {account_id} not found in folder {folder_id}"
            )));
        }

        let move_targets = ctx
            .run(self.folders.list_folders())
            .await?
            .into_iter()
            .filter(|f| f.id != folder_id)
            .map(|f| ChainEntry {
                id: f.id,
                name: f.name,
            })
            .collect();

        Ok(AccountSettings {
            id: account.id,
            name: account.name,
            phone: account.phone,
            launch: account.launch,
            interval: account.interval,
            status_block: account.status_block,
            folder_id: folder.id,
            folder_name: folder.name,
            chat: folder.chat,
            move_targets,
        })
    }

    /// Applies a settings update.
    pub async fn update_account(
        &self,
        ctx: &RequestContext,
        account_id: AccountId,
        req: UpdateAccountRequest,
    ) -> AppResult<Account> {
        let current = self.get_account(ctx, account_id).await?;

        let name = match req.name {
            Some(name) => require_field("name", &name)?,
            None => current.name,
        };
        let phone = match req.phone {
            Some(phone) => require_field("phone", &phone)?,
            None => current.phone,
        };
        let folder_id = match req.folder_id {
            Some(folder_id) if folder_id != current.folder_id => {
                self.folder(ctx, folder_id).await?;
                folder_id
            }
            _ => current.folder_id,
        };

        let account = ctx
            .run(self.accounts.update_account(&UpdateAccount {
                id: account_id,
                folder_id,
                name,
                phone,
                interval: req.interval.unwrap_or(current.interval),
                launch: req.launch.unwrap_or(current.launch),
            }))
            .await?;

        info!(
            request_id = %ctx.request_id,
            account_id = %account_id,
            folder_id = %account.folder_id,
            moved = account.folder_id != current.folder_id,
            "Account updated"
        );
        Ok(account)
    }

    /// Deletes an account.
    pub async fn delete_account(&self, ctx: &RequestContext, account_id: AccountId) -> AppResult<()> {
        if !ctx.run(self.accounts.delete_account(account_id)).await? {
            return Err(AppError::not_found(format!("Account {account_id} not found")));
        }
        info!(request_id = %ctx.request_id, account_id = %account_id, "Account deleted");
        Ok(())
    }

    /// Assigns a fresh random interval to every account of the folder.
    pub async fn generate_intervals(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<Vec<Account>> {
        let accounts = self.list_accounts(ctx, folder_id).await?;

        let mut updated = Vec::with_capacity(accounts.len());
        for account in accounts {
            let interval = self.intervals.draw();
            updated.push(ctx.run(self.accounts.set_interval(account.id, interval)).await?);
        }

        info!(
            request_id = %ctx.request_id,
            folder_id = %folder_id,
            count = updated.len(),
            "Account intervals regenerated"
        );
        Ok(updated)
    }

    async fn folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<Folder> {
        ctx.run(self.folders.get_folder(folder_id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }
}

fn require_field(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("Account {field} cannot be empty")));
    }
    Ok(value.to_string())
}
