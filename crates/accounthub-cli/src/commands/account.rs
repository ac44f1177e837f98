//! Account management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use accounthub_core::config::AppConfig;
use accounthub_core::error::AppError;
use accounthub_entity::account::Account;
use accounthub_service::account::service::{CreateAccountRequest, UpdateAccountRequest};

use super::{Services, parse_account_id, parse_folder_id, request_context};
use crate::output::{self, OutputFormat};

/// Arguments for account commands
#[derive(Debug, Args)]
pub struct AccountArgs {
    /// Account subcommand
    #[command(subcommand)]
    pub command: AccountCommand,
}

/// Account subcommands
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Create an account in a folder
    Create {
        /// Owning folder ID
        #[arg(long)]
        folder: String,
        /// Account name
        #[arg(short, long)]
        name: String,
        /// Phone number
        #[arg(short, long)]
        phone: String,
        /// Pacing interval (random when omitted)
        #[arg(short, long)]
        interval: Option<u8>,
    },
    /// List the accounts of a folder
    List {
        /// Folder ID
        folder: String,
    },
    /// Show an account's settings page
    Settings {
        /// Folder ID
        folder: String,
        /// Account ID
        id: String,
    },
    /// Update an account
    Update {
        /// Account ID
        id: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New phone number
        #[arg(short, long)]
        phone: Option<String>,
        /// New pacing interval (0 unsets it)
        #[arg(short, long)]
        interval: Option<u8>,
        /// New launch flag
        #[arg(long)]
        launch: Option<bool>,
        /// Move the account to this folder
        #[arg(long)]
        folder: Option<String>,
    },
    /// Delete an account
    Delete {
        /// Account ID
        id: String,
    },
    /// Draw fresh intervals for every account of a folder
    RegenerateIntervals {
        /// Folder ID
        folder: String,
    },
}

/// Account display row
#[derive(Debug, Serialize, Tabled)]
struct AccountRow {
    /// Account ID
    id: String,
    /// Name
    name: String,
    /// Phone
    phone: String,
    /// Interval
    interval: u8,
    /// Status
    status: String,
    /// Verified
    verify: bool,
    /// Launched
    launch: bool,
}

impl From<&Account> for AccountRow {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id.to_string(),
            name: a.name.clone(),
            phone: a.phone.clone(),
            interval: a.interval,
            status: a.status_block.to_string(),
            verify: a.verify,
            launch: a.launch,
        }
    }
}

/// Execute account commands
pub async fn execute(
    args: &AccountArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let services = Services::connect(config).await?;
    let accounts = &services.accounts;
    let ctx = request_context(config);

    match &args.command {
        AccountCommand::Create {
            folder,
            name,
            phone,
            interval,
        } => {
            let account = accounts
                .create_account(
                    &ctx,
                    CreateAccountRequest {
                        folder_id: parse_folder_id(folder)?,
                        name: name.clone(),
                        phone: phone.clone(),
                        interval: *interval,
                    },
                )
                .await?;
            output::print_success(&format!(
                "Account '{}' created (id: {}, interval: {})",
                account.name, account.id, account.interval
            ));
        }
        AccountCommand::List { folder } => {
            let list = accounts.list_accounts(&ctx, parse_folder_id(folder)?).await?;
            let rows: Vec<AccountRow> = list.iter().map(AccountRow::from).collect();
            output::print_list(&rows, format);
        }
        AccountCommand::Settings { folder, id } => {
            let settings = accounts
                .settings(&ctx, parse_folder_id(folder)?, parse_account_id(id)?)
                .await?;
            let targets: Vec<&str> = settings
                .move_targets
                .iter()
                .map(|e| e.name.as_str())
                .collect();
            output::print_record(
                &settings,
                &[
                    ("ID", settings.id.to_string()),
                    ("Name", settings.name.clone()),
                    ("Phone", settings.phone.clone()),
                    ("Interval", settings.interval.to_string()),
                    ("Status", settings.status_block.to_string()),
                    ("Launch", settings.launch.to_string()),
                    ("Folder", format!("{} ({})", settings.folder_name, settings.folder_id)),
                    ("Chat", output::or_dash(settings.chat.as_deref())),
                    ("Can move to", targets.join(", ")),
                ],
                format,
            );
        }
        AccountCommand::Update {
            id,
            name,
            phone,
            interval,
            launch,
            folder,
        } => {
            let folder_id = folder.as_deref().map(parse_folder_id).transpose()?;
            let account = accounts
                .update_account(
                    &ctx,
                    parse_account_id(id)?,
                    UpdateAccountRequest {
                        name: name.clone(),
                        phone: phone.clone(),
                        interval: *interval,
                        launch: *launch,
                        folder_id,
                    },
                )
                .await?;
            output::print_success(&format!("Account '{}' updated", account.name));
        }
        AccountCommand::Delete { id } => {
            accounts.delete_account(&ctx, parse_account_id(id)?).await?;
            output::print_success("Account deleted");
        }
        AccountCommand::RegenerateIntervals { folder } => {
            let updated = accounts
                .generate_intervals(&ctx, parse_folder_id(folder)?)
                .await?;
            let rows: Vec<AccountRow> = updated.iter().map(AccountRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    services.pool.close().await;
    Ok(())
}
