//! Account repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use accounthub_core::error::{AppError, ErrorKind};
use accounthub_core::result::AppResult;
use accounthub_core::types::{AccountId, FolderId};
use accounthub_entity::account::{Account, CreateAccount, UpdateAccount};

use crate::store::AccountStore;

/// PostgreSQL-backed account store.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn get_account(&self, id: AccountId) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to find account", e)
            })
    }

    async fn list_accounts_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<Account>> {
        sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE folder_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to list accounts", e))
    }

    async fn count_accounts(&self, folder_id: FolderId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE folder_id = $1")
            .bind(folder_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to count accounts", e)
            })?;
        Ok(count as u64)
    }

    async fn create_account(&self, data: &CreateAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, folder_id, name, phone, \"interval\", status_block, verify, launch) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(AccountId::new())
        .bind(data.folder_id)
        .bind(&data.name)
        .bind(&data.phone)
        .bind(i16::from(data.interval))
        .bind(data.status_block)
        .bind(data.verify)
        .bind(data.launch)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("accounts_folder_id_fkey") =>
            {
                AppError::not_found(format!("Folder {} not found", data.folder_id))
            }
            _ => AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to create account", e),
        })
    }

    async fn update_account(&self, data: &UpdateAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET folder_id = $2, name = $3, phone = $4, \"interval\" = $5, launch = $6 \
             WHERE id = $1 RETURNING *",
        )
        .bind(data.id)
        .bind(data.folder_id)
        .bind(&data.name)
        .bind(&data.phone)
        .bind(i16::from(data.interval))
        .bind(data.launch)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to update account", e))?
        .ok_or_else(|| AppError::not_found(format!("Account {} not found", data.id)))
    }

    async fn set_interval(&self, id: AccountId, interval: u8) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET \"interval\" = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(i16::from(interval))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to set account interval", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Account {id} not found")))
    }

    async fn delete_account(&self, id: AccountId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::StoreLookupFailed, "Failed to delete account", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
