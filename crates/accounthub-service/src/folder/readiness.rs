//! Campaign readiness checklist.
//!
//! The checklist is an ordered table of predicate → reason rules. Rules
//! are evaluated top to bottom and the first one that matches decides the
//! reported reason, so a folder missing both usernames and a chat is told
//! about the usernames only.

use accounthub_core::config::CampaignConfig;
use accounthub_core::types::FailureReason;
use accounthub_entity::account::Account;
use accounthub_entity::campaign::CampaignMode;
use accounthub_entity::folder::Folder;

/// The folder data the checklist looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadinessSnapshot {
    /// Number of usernames.
    pub usernames: usize,
    /// Whether a chat is bound.
    pub has_chat: bool,
    /// Whether a message template is set.
    pub has_message: bool,
    /// Number of groups.
    pub groups: usize,
    /// Number of accounts owned by the folder.
    pub accounts: usize,
    /// Number of those accounts with a nonzero interval.
    pub paced_accounts: usize,
}

impl ReadinessSnapshot {
    /// Summarise a folder and its accounts.
    pub fn capture(folder: &Folder, accounts: &[Account]) -> Self {
        Self {
            usernames: folder.usernames.len(),
            has_chat: folder.has_chat(),
            has_message: folder.has_message(),
            groups: folder.groups.len(),
            accounts: accounts.len(),
            paced_accounts: accounts.iter().filter(|a| a.has_interval()).count(),
        }
    }
}

type Predicate = fn(&ReadinessSnapshot, CampaignMode, &CampaignConfig) -> bool;

/// One checklist entry.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Reported when the predicate holds.
    pub reason: FailureReason,
    predicate: Predicate,
}

impl Rule {
    /// Whether this rule rejects the launch.
    pub fn matches(&self, snapshot: &ReadinessSnapshot, mode: CampaignMode, quotas: &CampaignConfig) -> bool {
        (self.predicate)(snapshot, mode, quotas)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("reason", &self.reason).finish()
    }
}

const CHECKLIST: [Rule; 7] = [
    Rule {
        reason: FailureReason::MissingUsernames,
        predicate: |s, mode, _| mode.uses_usernames() && s.usernames == 0,
    },
    Rule {
        reason: FailureReason::MissingChat,
        predicate: |s, mode, _| mode == CampaignMode::Inviting && !s.has_chat,
    },
    Rule {
        reason: FailureReason::InsufficientUsernamesForInviting,
        predicate: |s, mode, q| {
            mode == CampaignMode::Inviting
                && s.usernames < s.accounts.saturating_mul(q.usernames_per_account_inviting)
        },
    },
    Rule {
        reason: FailureReason::InsufficientUsernamesForMailing,
        predicate: |s, mode, q| {
            mode == CampaignMode::MailingUsernames
                && s.usernames < s.accounts.saturating_mul(q.usernames_per_account_mailing)
        },
    },
    Rule {
        reason: FailureReason::MissingMessage,
        predicate: |s, mode, _| mode.uses_message() && !s.has_message,
    },
    Rule {
        reason: FailureReason::MissingGroups,
        predicate: |s, mode, _| mode == CampaignMode::MailingGroups && s.groups == 0,
    },
    Rule {
        reason: FailureReason::NoAccountsConfigured,
        predicate: |s, _, _| s.paced_accounts == 0,
    },
];

/// Decides whether a folder may launch a campaign.
#[derive(Debug, Clone, Default)]
pub struct ReadinessValidator {
    quotas: CampaignConfig,
}

impl ReadinessValidator {
    /// Creates a validator with the given username quotas.
    pub fn new(quotas: CampaignConfig) -> Self {
        Self { quotas }
    }

    /// The checklist in evaluation order.
    pub fn rules(&self) -> &'static [Rule] {
        &CHECKLIST
    }

    /// Returns the first failing precondition for `mode`, if any.
    pub fn check(&self, snapshot: &ReadinessSnapshot, mode: CampaignMode) -> Result<(), FailureReason> {
        match CHECKLIST
            .iter()
            .find(|rule| rule.matches(snapshot, mode, &self.quotas))
        {
            Some(rule) => Err(rule.reason),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_for_everything() -> ReadinessSnapshot {
        ReadinessSnapshot {
            usernames: 100,
            has_chat: true,
            has_message: true,
            groups: 3,
            accounts: 4,
            paced_accounts: 4,
        }
    }

    fn check(snapshot: ReadinessSnapshot, mode: CampaignMode) -> Result<(), FailureReason> {
        ReadinessValidator::default().check(&snapshot, mode)
    }

    #[test]
    fn test_complete_folder_passes_every_mode() {
        for mode in CampaignMode::ALL {
            assert_eq!(check(ready_for_everything(), mode), Ok(()));
        }
    }

    #[test]
    fn test_missing_usernames_wins_over_missing_chat() {
        let snapshot = ReadinessSnapshot {
            usernames: 0,
            has_chat: false,
            ..ready_for_everything()
        };
        assert_eq!(
            check(snapshot, CampaignMode::Inviting),
            Err(FailureReason::MissingUsernames)
        );
    }

    #[test]
    fn test_inviting_quota_boundary() {
        let short = ReadinessSnapshot {
            usernames: 19,
            ..ready_for_everything()
        };
        assert_eq!(
            check(short, CampaignMode::Inviting),
            Err(FailureReason::InsufficientUsernamesForInviting)
        );

        let exact = ReadinessSnapshot {
            usernames: 20,
            ..ready_for_everything()
        };
        assert_eq!(check(exact, CampaignMode::Inviting), Ok(()));
    }

    #[test]
    fn test_mailing_usernames_quota() {
        let short = ReadinessSnapshot {
            usernames: 19,
            ..ready_for_everything()
        };
        assert_eq!(
            check(short, CampaignMode::MailingUsernames),
            Err(FailureReason::InsufficientUsernamesForMailing)
        );
    }

    #[test]
    fn test_chat_only_required_for_inviting() {
        let snapshot = ReadinessSnapshot {
            has_chat: false,
            ..ready_for_everything()
        };
        assert_eq!(
            check(snapshot, CampaignMode::Inviting),
            Err(FailureReason::MissingChat)
        );
        assert_eq!(check(snapshot, CampaignMode::MailingUsernames), Ok(()));
        assert_eq!(check(snapshot, CampaignMode::MailingGroups), Ok(()));
    }

    #[test]
    fn test_group_mailing_ignores_usernames() {
        let snapshot = ReadinessSnapshot {
            usernames: 0,
            has_chat: false,
            ..ready_for_everything()
        };
        assert_eq!(check(snapshot, CampaignMode::MailingGroups), Ok(()));
    }

    #[test]
    fn test_message_checked_before_groups() {
        let snapshot = ReadinessSnapshot {
            has_message: false,
            groups: 0,
            ..ready_for_everything()
        };
        assert_eq!(
            check(snapshot, CampaignMode::MailingGroups),
            Err(FailureReason::MissingMessage)
        );

        let no_groups = ReadinessSnapshot {
            groups: 0,
            ..ready_for_everything()
        };
        assert_eq!(
            check(no_groups, CampaignMode::MailingGroups),
            Err(FailureReason::MissingGroups)
        );
    }

    #[test]
    fn test_unpaced_accounts_rejected_last() {
        let snapshot = ReadinessSnapshot {
            paced_accounts: 0,
            ..ready_for_everything()
        };
        for mode in CampaignMode::ALL {
            assert_eq!(check(snapshot, mode), Err(FailureReason::NoAccountsConfigured));
        }
    }

    #[test]
    fn test_no_accounts_at_all() {
        let snapshot = ReadinessSnapshot {
            usernames: 1,
            accounts: 0,
            paced_accounts: 0,
            ..ready_for_everything()
        };
        assert_eq!(
            check(snapshot, CampaignMode::Inviting),
            Err(FailureReason::NoAccountsConfigured)
        );
    }

    #[test]
    fn test_custom_quota() {
        let validator = ReadinessValidator::new(CampaignConfig {
            usernames_per_account_inviting: 10,
            usernames_per_account_mailing: 1,
        });
        let snapshot = ReadinessSnapshot {
            usernames: 20,
            ..ready_for_everything()
        };
        assert_eq!(
            validator.check(&snapshot, CampaignMode::Inviting),
            Err(FailureReason::InsufficientUsernamesForInviting)
        );
        assert_eq!(validator.check(&snapshot, CampaignMode::MailingUsernames), Ok(()));
    }

    #[test]
    fn test_rule_order() {
        let reasons: Vec<_> = ReadinessValidator::default()
            .rules()
            .iter()
            .map(|r| r.reason)
            .collect();
        assert_eq!(
            reasons,
            [
                FailureReason::MissingUsernames,
                FailureReason::MissingChat,
                FailureReason::InsufficientUsernamesForInviting,
                FailureReason::InsufficientUsernamesForMailing,
                FailureReason::MissingMessage,
                FailureReason::MissingGroups,
                FailureReason::NoAccountsConfigured,
            ]
        );
    }
}
