//! Campaign mode enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bulk operations a folder's accounts can be launched into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "campaign_mode", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CampaignMode {
    /// Invite the folder's usernames into its chat.
    Inviting,
    /// Send the folder's message to each username.
    MailingUsernames,
    /// Post the folder's message into each group.
    MailingGroups,
}

impl CampaignMode {
    /// All modes, in display order.
    pub const ALL: [CampaignMode; 3] = [
        Self::Inviting,
        Self::MailingUsernames,
        Self::MailingGroups,
    ];

    /// Return the mode as a kebab-case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inviting => "inviting",
            Self::MailingUsernames => "mailing-usernames",
            Self::MailingGroups => "mailing-groups",
        }
    }

    /// Whether this mode consumes the folder's username list.
    pub fn uses_usernames(&self) -> bool {
        matches!(self, Self::Inviting | Self::MailingUsernames)
    }

    /// Whether this mode sends the folder's message.
    pub fn uses_message(&self) -> bool {
        matches!(self, Self::MailingUsernames | Self::MailingGroups)
    }
}

impl fmt::Display for CampaignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignMode {
    type Err = accounthub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inviting" => Ok(Self::Inviting),
            "mailing-usernames" => Ok(Self::MailingUsernames),
            "mailing-groups" => Ok(Self::MailingGroups),
            _ => Err(accounthub_core::AppError::validation(format!(
                "Invalid campaign mode: '{s}'. Expected one of: inviting, mailing-usernames, mailing-groups"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            "Mailing-Groups".parse::<CampaignMode>().unwrap(),
            CampaignMode::MailingGroups
        );
        assert!("broadcast".parse::<CampaignMode>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for mode in CampaignMode::ALL {
            assert_eq!(mode.to_string().parse::<CampaignMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_data_requirements() {
        assert!(CampaignMode::Inviting.uses_usernames());
        assert!(!CampaignMode::Inviting.uses_message());
        assert!(!CampaignMode::MailingGroups.uses_usernames());
        assert!(CampaignMode::MailingUsernames.uses_message());
    }
}
