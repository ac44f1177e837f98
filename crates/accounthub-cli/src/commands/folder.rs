//! Folder management CLI commands.

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use accounthub_core::config::AppConfig;
use accounthub_core::error::AppError;
use accounthub_entity::campaign::CampaignMode;
use accounthub_entity::folder::Folder;
use accounthub_service::folder::service::CreateFolderRequest;

use super::{Services, parse_destination, parse_folder_id, request_context};
use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List the folders under a parent
    List {
        /// Parent: `/` or a folder ID
        #[arg(short, long, default_value = "/")]
        parent: String,
    },
    /// Create a new folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Parent: `/` or a folder ID
        #[arg(short, long, default_value = "/")]
        parent: String,
    },
    /// Show a folder with its accounts, children, and breadcrumbs
    Open {
        /// Folder ID
        id: String,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        id: String,
        /// New name
        name: String,
    },
    /// Move a folder under another folder or to the top level
    Move {
        /// Folder ID
        id: String,
        /// Destination: `/` or a folder ID
        destination: String,
    },
    /// List where a folder may be moved
    Targets {
        /// Folder ID
        id: String,
    },
    /// Show the breadcrumb trail of a folder
    Breadcrumbs {
        /// Folder ID
        id: String,
    },
    /// Bind the chat for inviting (empty clears it)
    SetChat {
        /// Folder ID
        id: String,
        /// Chat handle
        chat: String,
    },
    /// Set the mailing message (empty clears it)
    SetMessage {
        /// Folder ID
        id: String,
        /// Message template
        message: String,
    },
    /// Replace the target usernames
    SetUsernames {
        /// Folder ID
        id: String,
        /// Usernames
        usernames: Vec<String>,
    },
    /// Replace the target groups
    SetGroups {
        /// Folder ID
        id: String,
        /// Groups
        groups: Vec<String>,
    },
    /// Launch a campaign
    Launch {
        /// Folder ID
        id: String,
        /// Campaign mode
        #[arg(short, long, value_enum)]
        mode: ModeArg,
    },
    /// Delete a folder, its subfolders, and their accounts
    Delete {
        /// Folder ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Campaign mode argument
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Invite usernames into the bound chat
    Inviting,
    /// Message every username
    MailingUsernames,
    /// Post into every group
    MailingGroups,
}

impl From<ModeArg> for CampaignMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Inviting => Self::Inviting,
            ModeArg::MailingUsernames => Self::MailingUsernames,
            ModeArg::MailingGroups => Self::MailingGroups,
        }
    }
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Parent
    path: String,
    /// Usernames
    usernames: usize,
    /// Groups
    groups: usize,
    /// Last campaign
    campaign: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            path: f.path.clone(),
            usernames: f.usernames.len(),
            groups: f.groups.len(),
            campaign: output::or_dash(f.campaign.as_ref().map(CampaignMode::as_str)),
        }
    }
}

/// Move target display row
#[derive(Debug, Serialize, Tabled)]
struct TargetRow {
    /// Destination
    destination: String,
    /// Label
    label: String,
    /// Current location
    current: String,
}

/// Breadcrumb display row
#[derive(Debug, Serialize, Tabled)]
struct CrumbRow {
    /// Level
    level: usize,
    /// Folder ID
    id: String,
    /// Name
    name: String,
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let services = Services::connect(config).await?;
    let folders = &services.folders;
    let ctx = request_context(config);

    match &args.command {
        FolderCommand::List { parent } => {
            let parent = parse_destination(parent)?;
            let children = folders.list_children(&ctx, parent).await?;
            let rows: Vec<FolderRow> = children.iter().map(FolderRow::from).collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Create { name, parent } => {
            let folder = folders
                .create_folder(
                    &ctx,
                    CreateFolderRequest {
                        name: name.clone(),
                        path: parse_destination(parent)?,
                    },
                )
                .await?;
            output::print_success(&format!("Folder '{}' created (id: {})", folder.name, folder.id));
        }
        FolderCommand::Open { id } => {
            let view = folders.open_folder(&ctx, parse_folder_id(id)?).await?;
            let trail: Vec<&str> = view.ancestors.entries.iter().map(|e| e.name.as_str()).collect();
            let f = &view.folder;
            output::print_record(
                &view,
                &[
                    ("ID", f.id.to_string()),
                    ("Name", f.name.clone()),
                    ("Breadcrumbs", trail.join(" / ")),
                    ("Chat", output::or_dash(f.chat.as_deref())),
                    ("Message", output::or_dash(f.message.as_deref())),
                    ("Usernames", f.usernames.len().to_string()),
                    ("Groups", f.groups.len().to_string()),
                    ("Accounts", view.account_count.to_string()),
                    ("Subfolders", view.child_folders.len().to_string()),
                    ("Move targets", view.move_targets.len().to_string()),
                    (
                        "Campaign",
                        output::or_dash(f.campaign.as_ref().map(CampaignMode::as_str)),
                    ),
                ],
                format,
            );
        }
        FolderCommand::Rename { id, name } => {
            let folder = folders.rename_folder(&ctx, parse_folder_id(id)?, name).await?;
            output::print_success(&format!("Folder {} renamed to '{}'", folder.id, folder.name));
        }
        FolderCommand::Move { id, destination } => {
            let destination = parse_destination(destination)?;
            let folder = folders
                .move_folder(&ctx, parse_folder_id(id)?, destination)
                .await?;
            output::print_success(&format!("Folder '{}' now under {}", folder.name, folder.path));
        }
        FolderCommand::Targets { id } => {
            let targets = folders.move_targets(&ctx, parse_folder_id(id)?).await?;
            let rows: Vec<TargetRow> = targets
                .entries
                .iter()
                .map(|t| TargetRow {
                    destination: t.destination.to_string(),
                    label: t.label.clone(),
                    current: if t.current { "*".to_string() } else { String::new() },
                })
                .collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Breadcrumbs { id } => {
            let chain = folders.breadcrumbs(&ctx, parse_folder_id(id)?).await?;
            let rows: Vec<CrumbRow> = chain
                .entries
                .iter()
                .enumerate()
                .map(|(level, e)| CrumbRow {
                    level,
                    id: e.id.to_string(),
                    name: e.name.clone(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        FolderCommand::SetChat { id, chat } => {
            let folder = folders.change_chat(&ctx, parse_folder_id(id)?, chat).await?;
            output::print_success(&format!(
                "Chat of '{}' set to {}",
                folder.name,
                output::or_dash(folder.chat.as_deref())
            ));
        }
        FolderCommand::SetMessage { id, message } => {
            let folder = folders
                .change_message(&ctx, parse_folder_id(id)?, message)
                .await?;
            output::print_success(&format!("Message of '{}' updated", folder.name));
        }
        FolderCommand::SetUsernames { id, usernames } => {
            let folder = folders
                .change_usernames(&ctx, parse_folder_id(id)?, usernames)
                .await?;
            output::print_success(&format!(
                "'{}' now targets {} usernames",
                folder.name,
                folder.usernames.len()
            ));
        }
        FolderCommand::SetGroups { id, groups } => {
            let folder = folders
                .change_groups(&ctx, parse_folder_id(id)?, groups)
                .await?;
            output::print_success(&format!(
                "'{}' now targets {} groups",
                folder.name,
                folder.groups.len()
            ));
        }
        FolderCommand::Launch { id, mode } => {
            let mode = CampaignMode::from(*mode);
            let folder = folders.launch(&ctx, parse_folder_id(id)?, mode).await?;
            output::print_success(&format!("Launched {mode} for '{}'", folder.name));
        }
        FolderCommand::Delete { id, yes } => {
            let folder_id = parse_folder_id(id)?;
            let folder = folders.get_folder(&ctx, folder_id).await?;

            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete '{}' with all its subfolders and accounts?",
                        folder.name
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            // The prompt can outlast the request deadline.
            let ctx = request_context(config);
            folders.delete_folder(&ctx, folder_id).await?;
            output::print_success(&format!("Folder '{}' deleted", folder.name));
        }
    }

    services.pool.close().await;
    Ok(())
}
