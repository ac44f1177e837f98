//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use accounthub_core::error::{AppError, ErrorKind};
use accounthub_core::result::AppResult;
use accounthub_core::types::FolderId;
use accounthub_entity::campaign::CampaignMode;
use accounthub_entity::folder::{CreateFolder, Folder, FolderPath};

use crate::store::FolderStore;

const SELECT_FOLDER: &str = "SELECT id, name, path, chat, message, usernames, \"groups\", \
     campaign, created_at, updated_at FROM folders";

/// Whether the parent chain starting at `$1` passes through `$2`.
/// `UNION` drops repeated rows, so a cycle in stored data still terminates.
const CHAIN_CONTAINS: &str = "WITH RECURSIVE chain (id, path) AS ( \
         SELECT id, path FROM folders WHERE id = $1 \
         UNION \
         SELECT f.id, f.path FROM folders f JOIN chain c ON c.path = f.id::text \
     ) \
     SELECT EXISTS (SELECT 1 FROM chain WHERE id = $2)";

const DELETE_SUBTREE: &str = "WITH RECURSIVE subtree (id) AS ( \
         SELECT id FROM folders WHERE id = $1 \
         UNION \
         SELECT f.id FROM folders f JOIN subtree s ON f.path = s.id::text \
     ) \
     DELETE FROM folders WHERE id IN (SELECT id FROM subtree)";

/// PostgreSQL-backed folder store.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction that holds the folder table lock.
    ///
    /// Creates, moves and deletes take this lock before they check the
    /// tree, so two of them never act on the same stale view.
    async fn begin_shape_change(&self) -> AppResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to begin transaction", e)
        })?;
        sqlx::query("LOCK TABLE folders IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to lock folders", e)
            })?;
        Ok(tx)
    }

    async fn exists_in(tx: &mut Transaction<'static, Postgres>, id: FolderId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM folders WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to find folder", e)
            })
    }

    async fn commit(tx: Transaction<'static, Postgres>, action: &str) -> AppResult<()> {
        tx.commit().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreLookupFailed,
                format!("Failed to commit {action}"),
                e,
            )
        })
    }

    /// Run an `UPDATE ... RETURNING` that targets a single folder.
    async fn update_one<'q>(
        &self,
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, Folder, sqlx::postgres::PgArguments>,
        id: FolderId,
        action: &str,
    ) -> AppResult<Folder> {
        query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreLookupFailed,
                    format!("Failed to {action}"),
                    e,
                )
            })?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }
}

#[async_trait]
impl FolderStore for FolderRepository {
    async fn get_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(&format!("{SELECT_FOLDER} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to find folder", e)
            })
    }

    async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(&format!("{SELECT_FOLDER} ORDER BY name ASC, id ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to list folders", e)
            })
    }

    async fn list_children(&self, path: FolderPath) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(&format!(
            "{SELECT_FOLDER} WHERE path = $1 ORDER BY name ASC, id ASC"
        ))
        .bind(path.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to list child folders", e)
        })
    }

    async fn create_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut tx = self.begin_shape_change().await?;
        if let FolderPath::Folder(parent) = data.path {
            if !Self::exists_in(&mut tx, parent).await? {
                return Err(AppError::not_found(format!("Parent folder {parent} not found")));
            }
        }

        let folder = sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, name, path) VALUES ($1, $2, $3) \
             RETURNING id, name, path, chat, message, usernames, \"groups\", \
             campaign, created_at, updated_at",
        )
        .bind(FolderId::new())
        .bind(&data.name)
        .bind(data.path.to_string())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to create folder", e))?;

        Self::commit(tx, "folder creation").await?;
        Ok(folder)
    }

    async fn rename_folder(&self, id: FolderId, name: &str) -> AppResult<Folder> {
        let query = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING id, name, path, chat, message, usernames, \"groups\", \
             campaign, created_at, updated_at",
        )
        .bind(id)
        .bind(name);
        self.update_one(query, id, "rename folder").await
    }

    async fn move_folder(&self, id: FolderId, destination: FolderPath) -> AppResult<Folder> {
        let mut tx = self.begin_shape_change().await?;
        if let FolderPath::Folder(target) = destination {
            if !Self::exists_in(&mut tx, target).await? {
                return Err(AppError::not_found(format!(
                    "Destination folder {target} not found"
                )));
            }
            let inside = sqlx::query_scalar::<_, bool>(CHAIN_CONTAINS)
                .bind(target)
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::StoreLookupFailed,
                        "Failed to walk destination chain",
                        e,
                    )
                })?;
            if inside {
                return Err(AppError::illegal_move(format!(
                    "Folder {id} cannot be moved into {target}, which lies within it"
                )));
            }
        }

        let folder = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET path = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING id, name, path, chat, message, usernames, \"groups\", \
             campaign, created_at, updated_at",
        )
        .bind(id)
        .bind(destination.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to move folder", e))?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        Self::commit(tx, "folder move").await?;
        Ok(folder)
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<bool> {
        let mut tx = self.begin_shape_change().await?;
        // accounts.folder_id cascades
        let result = sqlx::query(DELETE_SUBTREE)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to delete folder", e)
            })?;
        Self::commit(tx, "folder deletion").await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_chat(&self, id: FolderId, chat: Option<&str>) -> AppResult<Folder> {
        let query = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET chat = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING id, name, path, chat, message, usernames, \"groups\", \
             campaign, created_at, updated_at",
        )
        .bind(id)
        .bind(chat);
        self.update_one(query, id, "update folder chat").await
    }

    async fn update_message(&self, id: FolderId, message: Option<&str>) -> AppResult<Folder> {
        let query = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET message = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING id, name, path, chat, message, usernames, \"groups\", \
             campaign, created_at, updated_at",
        )
        .bind(id)
        .bind(message);
        self.update_one(query, id, "update folder message").await
    }

    async fn update_usernames(&self, id: FolderId, usernames: &[String]) -> AppResult<Folder> {
        let query = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET usernames = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING id, name, path, chat, message, usernames, \"groups\", \
             campaign, created_at, updated_at",
        )
        .bind(id)
        .bind(usernames);
        self.update_one(query, id, "update folder usernames").await
    }

    async fn update_groups(&self, id: FolderId, groups: &[String]) -> AppResult<Folder> {
        let query = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET \"groups\" = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING id, name, path, chat, message, usernames, \"groups\", \
             campaign, created_at, updated_at",
        )
        .bind(id)
        .bind(groups);
        self.update_one(query, id, "update folder groups").await
    }

    async fn launch_campaign(&self, id: FolderId, mode: CampaignMode) -> AppResult<Folder> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to begin transaction", e)
        })?;

        let folder = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET campaign = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING id, name, path, chat, message, usernames, \"groups\", \
             campaign, created_at, updated_at",
        )
        .bind(id)
        .bind(mode)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to launch campaign", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        sqlx::query("UPDATE accounts SET launch = TRUE WHERE folder_id = $1 AND \"interval\" <> 0")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreLookupFailed,
                    "Failed to flag launched accounts",
                    e,
                )
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to commit launch", e)
        })?;

        Ok(folder)
    }
}
