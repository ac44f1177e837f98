//! CLI command definitions and dispatch.

pub mod account;
pub mod folder;
pub mod migrate;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use accounthub_core::config::AppConfig;
use accounthub_core::error::AppError;
use accounthub_core::types::{AccountId, FolderId};
use accounthub_database::DatabasePool;
use accounthub_database::store::{AccountStore, FolderStore};
use accounthub_entity::folder::FolderPath;
use accounthub_service::{AccountService, FolderService, IntervalGenerator, RequestContext};

use crate::output::OutputFormat;

/// AccountHub — folder tree and campaign administration
#[derive(Debug, Parser)]
#[command(name = "accounthub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// Account management
    Account(account::AccountArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, config).await,
            Commands::Folder(args) => folder::execute(args, config, self.format).await,
            Commands::Account(args) => account::execute(args, config, self.format).await,
        }
    }
}

/// Services wired to the configured database.
pub struct Services {
    /// Open connection pool.
    pub pool: DatabasePool,
    /// Folder operations.
    pub folders: FolderService,
    /// Account operations.
    pub accounts: AccountService,
}

impl Services {
    /// Connect to the database and build the services.
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let pool = DatabasePool::connect(&config.database).await?;
        let (folder_repo, account_repo) = pool.repositories();
        let folder_store: Arc<dyn FolderStore> = Arc::new(folder_repo);
        let account_store: Arc<dyn AccountStore> = Arc::new(account_repo);
        let intervals = Arc::new(IntervalGenerator::from_config(&config.accounts)?);

        Ok(Self {
            folders: FolderService::new(
                Arc::clone(&folder_store),
                Arc::clone(&account_store),
                &config.folders,
                config.campaign.clone(),
            ),
            accounts: AccountService::new(account_store, folder_store, intervals),
            pool,
        })
    }
}

/// A request context honouring the configured timeout.
pub fn request_context(config: &AppConfig) -> RequestContext {
    RequestContext::from_config(&config.requests)
}

/// Parse a folder id argument.
pub fn parse_folder_id(raw: &str) -> Result<FolderId, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid folder id '{raw}'")))
}

/// Parse an account id argument.
pub fn parse_account_id(raw: &str) -> Result<AccountId, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid account id '{raw}'")))
}

/// Parse a destination: `/` for the top level, otherwise a folder id.
pub fn parse_destination(raw: &str) -> Result<FolderPath, AppError> {
    raw.trim().parse()
}
