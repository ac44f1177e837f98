//! Account block status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether the messaging platform has restricted an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status_block", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StatusBlock {
    /// No restriction.
    Clean,
    /// The platform has blocked the account.
    Blocked,
}

impl StatusBlock {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Blocked => "blocked",
        }
    }
}

impl Default for StatusBlock {
    fn default() -> Self {
        Self::Clean
    }
}

impl fmt::Display for StatusBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusBlock {
    type Err = accounthub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clean" => Ok(Self::Clean),
            "blocked" => Ok(Self::Blocked),
            _ => Err(accounthub_core::AppError::validation(format!(
                "Invalid block status: '{s}'. Expected one of: clean, blocked"
            ))),
        }
    }
}
