//! Folder operations: CRUD, campaign data, tree navigation, and launch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use accounthub_core::config::{CampaignConfig, FolderConfig};
use accounthub_core::error::AppError;
use accounthub_core::result::AppResult;
use accounthub_core::types::FolderId;
use accounthub_database::store::{AccountStore, FolderStore};
use accounthub_entity::campaign::CampaignMode;
use accounthub_entity::folder::{
    AncestorChain, CreateFolder, Folder, FolderPath, FolderView, MoveTargets,
};

use super::readiness::{ReadinessSnapshot, ReadinessValidator};
use super::tree::TreeService;
use crate::context::RequestContext;

/// Manages folders and the campaigns they launch.
#[derive(Clone)]
pub struct FolderService {
    /// Folder store.
    folders: Arc<dyn FolderStore>,
    /// Account store.
    accounts: Arc<dyn AccountStore>,
    /// Tree walks.
    tree: TreeService,
    /// Launch checklist.
    readiness: ReadinessValidator,
    /// Held across every check-then-write that changes the tree shape.
    structure: Arc<Mutex<()>>,
}

impl std::fmt::Debug for FolderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderService")
            .field("tree", &self.tree)
            .field("readiness", &self.readiness)
            .finish_non_exhaustive()
    }
}

/// Request to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Where to create it; root when omitted.
    #[serde(default)]
    pub path: FolderPath,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        accounts: Arc<dyn AccountStore>,
        folder_config: &FolderConfig,
        quotas: CampaignConfig,
    ) -> Self {
        Self {
            tree: TreeService::new(Arc::clone(&folders), folder_config.max_depth),
            folders,
            accounts,
            readiness: ReadinessValidator::new(quotas),
            structure: Arc::new(Mutex::new(())),
        }
    }

    /// The tree walker used by this service.
    pub fn tree(&self) -> &TreeService {
        &self.tree
    }

    /// Lists the folders directly under `path`, ordered by name.
    pub async fn list_children(
        &self,
        ctx: &RequestContext,
        path: FolderPath,
    ) -> AppResult<Vec<Folder>> {
        ctx.run(self.folders.list_children(path)).await
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<Folder> {
        ctx.run(self.folders.get_folder(folder_id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Creates a new folder.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<Folder> {
        let name = require_name(&req.name)?;
        let _shape = self.lock_structure(ctx).await?;

        if let FolderPath::Folder(parent_id) = req.path {
            self.get_folder(ctx, parent_id).await?;
        }

        let folder = ctx
            .run(self.folders.create_folder(&CreateFolder {
                name,
                path: req.path,
            }))
            .await?;

        info!(
            request_id = %ctx.request_id,
            folder_id = %folder.id,
            path = %folder.path,
            "Folder created"
        );
        Ok(folder)
    }

    /// Renames a folder.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        new_name: &str,
    ) -> AppResult<Folder> {
        let name = require_name(new_name)?;
        let folder = ctx.run(self.folders.rename_folder(folder_id, &name)).await?;

        info!(
            request_id = %ctx.request_id,
            folder_id = %folder_id,
            new_name = %folder.name,
            "Folder renamed"
        );
        Ok(folder)
    }

    /// Where the folder may be moved.
    pub async fn move_targets(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<MoveTargets> {
        let folder = self.get_folder(ctx, folder_id).await?;
        self.tree.legal_targets(ctx, &folder).await
    }

    /// Moves a folder under `destination`.
    ///
    /// The destination is validated against the tree as it is now, not
    /// against whatever target list the caller was shown. Creates, moves
    /// and deletes on one service never interleave between that check and
    /// the write.
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        destination: FolderPath,
    ) -> AppResult<Folder> {
        let _shape = self.lock_structure(ctx).await?;
        let folder = self.get_folder(ctx, folder_id).await?;
        if folder.parent()? == destination {
            debug!(folder_id = %folder_id, "Folder already at destination");
            return Ok(folder);
        }

        if let Err(e) = self.tree.ensure_legal_move(ctx, folder_id, destination).await {
            warn!(
                request_id = %ctx.request_id,
                folder_id = %folder_id,
                destination = %destination,
                error = %e,
                "Folder move rejected"
            );
            return Err(e);
        }

        let moved = ctx
            .run(self.folders.move_folder(folder_id, destination))
            .await?;

        info!(
            request_id = %ctx.request_id,
            folder_id = %folder_id,
            from = %folder.path,
            to = %moved.path,
            "Folder moved"
        );
        Ok(moved)
    }

    /// Breadcrumb trail from the top level down to the folder.
    pub async fn breadcrumbs(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<AncestorChain> {
        self.tree.ancestor_chain(ctx, folder_id).await
    }

    /// Loads everything shown on a folder page.
    pub async fn open_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<FolderView> {
        let folder = self.get_folder(ctx, folder_id).await?;

        let accounts = ctx
            .run(self.accounts.list_accounts_by_folder(folder_id))
            .await?;
        let account_count = ctx.run(self.accounts.count_accounts(folder_id)).await?;
        let child_folders = ctx
            .run(self.folders.list_children(FolderPath::Folder(folder_id)))
            .await?;
        let move_targets = self.tree.legal_targets(ctx, &folder).await?;
        let ancestors = self.tree.ancestor_chain(ctx, folder_id).await?;

        Ok(FolderView {
            folder,
            accounts,
            child_folders,
            account_count,
            move_targets,
            ancestors,
        })
    }

    /// Deletes a folder, its whole subtree, and every account they own.
    ///
    /// Descendants go first, deepest level first, so an interrupted delete
    /// never leaves a folder pointing at a removed parent.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<()> {
        let _shape = self.lock_structure(ctx).await?;
        self.get_folder(ctx, folder_id).await?;
        let descendants = self.tree.descendants(ctx, folder_id).await?;

        for child in descendants.iter().rev() {
            ctx.run(self.folders.delete_folder(child.id)).await?;
        }
        if !ctx.run(self.folders.delete_folder(folder_id)).await? {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }

        info!(
            request_id = %ctx.request_id,
            folder_id = %folder_id,
            descendants = descendants.len(),
            "Folder deleted"
        );
        Ok(())
    }

    /// Binds the chat inviting campaigns add users to. Blank clears it.
    pub async fn change_chat(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        chat: &str,
    ) -> AppResult<Folder> {
        let chat = non_blank(chat);
        let folder = ctx.run(self.folders.update_chat(folder_id, chat)).await?;
        info!(folder_id = %folder_id, cleared = chat.is_none(), "Folder chat changed");
        Ok(folder)
    }

    /// Sets the mailing message template. Blank clears it.
    pub async fn change_message(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        message: &str,
    ) -> AppResult<Folder> {
        let message = non_blank(message);
        let folder = ctx
            .run(self.folders.update_message(folder_id, message))
            .await?;
        info!(folder_id = %folder_id, cleared = message.is_none(), "Folder message changed");
        Ok(folder)
    }

    /// Replaces the target usernames. Entries are trimmed and blanks dropped.
    pub async fn change_usernames(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        usernames: &[String],
    ) -> AppResult<Folder> {
        let usernames = clean_list(usernames);
        let folder = ctx
            .run(self.folders.update_usernames(folder_id, &usernames))
            .await?;
        info!(folder_id = %folder_id, count = usernames.len(), "Folder usernames changed");
        Ok(folder)
    }

    /// Replaces the target groups. Entries are trimmed and blanks dropped.
    pub async fn change_groups(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        groups: &[String],
    ) -> AppResult<Folder> {
        let groups = clean_list(groups);
        let folder = ctx
            .run(self.folders.update_groups(folder_id, &groups))
            .await?;
        info!(folder_id = %folder_id, count = groups.len(), "Folder groups changed");
        Ok(folder)
    }

    /// Fails with `NotReady` when the folder cannot launch `mode` yet.
    pub async fn check_readiness(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        mode: CampaignMode,
    ) -> AppResult<()> {
        let folder = self.get_folder(ctx, folder_id).await?;
        let accounts = ctx
            .run(self.accounts.list_accounts_by_folder(folder_id))
            .await?;
        let snapshot = ReadinessSnapshot::capture(&folder, &accounts);

        self.readiness.check(&snapshot, mode).map_err(|reason| {
            warn!(
                folder_id = %folder_id,
                mode = %mode,
                reason = reason.code(),
                "Folder not ready for launch"
            );
            AppError::not_ready(reason)
        })
    }

    /// Launches a campaign once the folder passes the readiness checklist.
    pub async fn launch(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        mode: CampaignMode,
    ) -> AppResult<Folder> {
        self.check_readiness(ctx, folder_id, mode).await?;
        let folder = ctx
            .run(self.folders.launch_campaign(folder_id, mode))
            .await?;

        info!(
            request_id = %ctx.request_id,
            folder_id = %folder_id,
            mode = %mode,
            "Campaign launched"
        );
        Ok(folder)
    }

    /// Launches an inviting campaign.
    pub async fn launch_inviting(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<Folder> {
        self.launch(ctx, folder_id, CampaignMode::Inviting).await
    }

    /// Launches a mailing campaign targeting usernames.
    pub async fn launch_mailing_usernames(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<Folder> {
        self.launch(ctx, folder_id, CampaignMode::MailingUsernames)
            .await
    }

    /// Launches a mailing campaign targeting groups.
    pub async fn launch_mailing_groups(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<Folder> {
        self.launch(ctx, folder_id, CampaignMode::MailingGroups).await
    }

    async fn lock_structure(&self, ctx: &RequestContext) -> AppResult<MutexGuard<'_, ()>> {
        ctx.run(async { Ok(self.structure.lock().await) }).await
    }
}

fn require_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    Ok(name.to_string())
}

fn non_blank(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn clean_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
