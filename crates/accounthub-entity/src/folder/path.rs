//! Typed parent references.
//!
//! A folder stores its parent as a string: either the root sentinel `/`
//! or the parent folder's id. [`FolderPath`] is the parsed form used by
//! every piece of tree logic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use accounthub_core::error::AppError;
use accounthub_core::result::AppResult;
use accounthub_core::types::FolderId;

/// The stored path of a top-level folder.
pub const ROOT_PATH: &str = "/";

/// Where a folder hangs in the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FolderPath {
    /// The folder is top-level.
    #[default]
    Root,
    /// The folder lives under another folder.
    Folder(FolderId),
}

impl FolderPath {
    /// Parse a stored path string.
    ///
    /// Surrounding whitespace is not tolerated: stored paths are written by
    /// this crate and anything else is corrupt data.
    pub fn resolve(raw: &str) -> AppResult<Self> {
        if raw == ROOT_PATH {
            return Ok(Self::Root);
        }
        raw.parse::<FolderId>()
            .map(Self::Folder)
            .map_err(|e| AppError::invalid_path(format!("Invalid folder path '{raw}': {e}")))
    }

    /// Whether this is the root sentinel.
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }

    /// The parent folder id, if any.
    pub fn folder_id(&self) -> Option<FolderId> {
        match self {
            Self::Root => None,
            Self::Folder(id) => Some(*id),
        }
    }

    /// Whether this path points at the given folder.
    pub fn points_to(&self, id: FolderId) -> bool {
        self.folder_id() == Some(id)
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str(ROOT_PATH),
            Self::Folder(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for FolderPath {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

impl TryFrom<String> for FolderPath {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::resolve(&value)
    }
}

impl From<FolderPath> for String {
    fn from(path: FolderPath) -> String {
        path.to_string()
    }
}

impl From<FolderId> for FolderPath {
    fn from(id: FolderId) -> Self {
        Self::Folder(id)
    }
}
