//! Campaign readiness failure reasons.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a folder is not ready to launch a campaign.
///
/// Each reason maps to one distinct user-facing message. Reasons are
/// reported in the precedence order of the readiness checklist, so a
/// folder missing several pieces of data only ever reports the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The folder has no usernames.
    MissingUsernames,
    /// The folder has no chat to invite into.
    MissingChat,
    /// Fewer usernames than the inviting quota requires for all accounts.
    InsufficientUsernamesForInviting,
    /// Fewer usernames than the mailing quota requires for all accounts.
    InsufficientUsernamesForMailing,
    /// The folder has no message template.
    MissingMessage,
    /// The folder has no groups to mail.
    MissingGroups,
    /// No account in the folder has a pacing interval set.
    NoAccountsConfigured,
}

impl FailureReason {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingUsernames => "missing_usernames",
            Self::MissingChat => "missing_chat",
            Self::InsufficientUsernamesForInviting => "insufficient_usernames_for_inviting",
            Self::InsufficientUsernamesForMailing => "insufficient_usernames_for_mailing",
            Self::MissingMessage => "missing_message",
            Self::MissingGroups => "missing_groups",
            Self::NoAccountsConfigured => "no_accounts_configured",
        }
    }

    /// Message shown to the operator.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingUsernames => "First specify the usernames",
            Self::MissingChat => "First specify the chat",
            Self::InsufficientUsernamesForInviting => {
                "The number of usernames is not enough to invite with all accounts"
            }
            Self::InsufficientUsernamesForMailing => {
                "The number of usernames is not enough to mail with all accounts"
            }
            Self::MissingMessage => "First specify the message",
            Self::MissingGroups => "First specify the groups",
            Self::NoAccountsConfigured => "None of the accounts have intervals set",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_distinct() {
        let all = [
            FailureReason::MissingUsernames,
            FailureReason::MissingChat,
            FailureReason::InsufficientUsernamesForInviting,
            FailureReason::InsufficientUsernamesForMailing,
            FailureReason::MissingMessage,
            FailureReason::MissingGroups,
            FailureReason::NoAccountsConfigured,
        ];
        let messages: std::collections::HashSet<_> =
            all.iter().map(FailureReason::user_message).collect();
        assert_eq!(messages.len(), all.len());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&FailureReason::MissingGroups).unwrap();
        assert_eq!(json, "\"missing_groups\"");
    }
}
