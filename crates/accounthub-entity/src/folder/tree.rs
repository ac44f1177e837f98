//! Transient tree structures computed per request.

use serde::{Deserialize, Serialize};

use accounthub_core::types::FolderId;

use super::path::{FolderPath, ROOT_PATH};

/// One folder on a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
}

/// The folders from the top level down to a target folder.
///
/// Entries are ordered root-first; the last entry is the target itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorChain {
    /// Breadcrumb entries, outermost first.
    pub entries: Vec<ChainEntry>,
}

impl AncestorChain {
    /// Folder ids in breadcrumb order.
    pub fn ids(&self) -> impl Iterator<Item = FolderId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    /// Whether the given folder appears on the trail.
    pub fn contains(&self, id: FolderId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Number of folders on the trail.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the trail is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A destination a folder may be moved under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTarget {
    /// Where the folder would be placed.
    pub destination: FolderPath,
    /// Display label: the destination folder's name, or `/` for root.
    pub label: String,
    /// Whether this is where the folder already is.
    pub current: bool,
}

/// Legal move destinations for one folder.
///
/// Keyed by destination, so folders sharing a name stay distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTargets {
    /// Root first, then folders ordered by name.
    pub entries: Vec<MoveTarget>,
}

impl MoveTargets {
    /// Build the root entry.
    pub fn root_entry(current: bool) -> MoveTarget {
        MoveTarget {
            destination: FolderPath::Root,
            label: ROOT_PATH.to_string(),
            current,
        }
    }

    /// Whether the destination is offered.
    pub fn contains(&self, destination: &FolderPath) -> bool {
        self.entries.iter().any(|e| &e.destination == destination)
    }

    /// Whether the folder is offered as a destination.
    pub fn contains_folder(&self, id: FolderId) -> bool {
        self.contains(&FolderPath::Folder(id))
    }

    /// The entry marking the folder's present location.
    pub fn current(&self) -> Option<&MoveTarget> {
        self.entries.iter().find(|e| e.current)
    }

    /// Number of destinations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no destination is offered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
