//! Folder tree walks: breadcrumbs, legal move targets, and subtrees.
//!
//! Folders only know their parent, so every question about the tree is
//! answered by walking parent references upward. A walk visits at most
//! `max_depth` folders and remembers the ones it has seen, so corrupt
//! data (a cycle or a dangling parent) becomes a `MalformedPathChain`
//! error instead of an endless loop.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tracing::{debug, warn};

use accounthub_core::error::AppError;
use accounthub_core::result::AppResult;
use accounthub_core::types::FolderId;
use accounthub_database::store::FolderStore;
use accounthub_entity::folder::{
    AncestorChain, ChainEntry, Folder, FolderPath, MoveTarget, MoveTargets,
};

use crate::context::RequestContext;

/// The parts of a folder a walk needs.
#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: FolderPath,
}

impl Node {
    fn from_folder(folder: &Folder) -> AppResult<Self> {
        Ok(Self {
            name: folder.name.clone(),
            parent: folder.parent()?,
        })
    }
}

/// Per-request folder cache in front of the store.
struct Walker<'a> {
    store: &'a dyn FolderStore,
    ctx: &'a RequestContext,
    max_depth: usize,
    nodes: HashMap<FolderId, Node>,
}

impl<'a> Walker<'a> {
    fn new(store: &'a dyn FolderStore, ctx: &'a RequestContext, max_depth: usize) -> Self {
        Self {
            store,
            ctx,
            max_depth,
            nodes: HashMap::new(),
        }
    }

    /// Pre-load folders from a snapshot so walks over them need no lookups.
    fn seed<'f>(&mut self, folders: impl IntoIterator<Item = &'f Folder>) -> AppResult<()> {
        for folder in folders {
            self.nodes.insert(folder.id, Node::from_folder(folder)?);
        }
        Ok(())
    }

    async fn node(&mut self, id: FolderId) -> AppResult<Option<Node>> {
        if let Some(node) = self.nodes.get(&id) {
            return Ok(Some(node.clone()));
        }
        let Some(folder) = self.ctx.run(self.store.get_folder(id)).await? else {
            return Ok(None);
        };
        let node = Node::from_folder(&folder)?;
        self.nodes.insert(id, node.clone());
        Ok(Some(node))
    }

    /// Whether `start` is `ancestor` or lies somewhere beneath it.
    ///
    /// `verdicts` memoizes answers for every folder a walk passes through,
    /// so repeated calls for the same `ancestor` touch each folder once.
    async fn is_within(
        &mut self,
        start: FolderId,
        ancestor: FolderId,
        verdicts: &mut HashMap<FolderId, bool>,
    ) -> AppResult<bool> {
        verdicts.insert(ancestor, true);

        let mut trail: Vec<FolderId> = Vec::new();
        let mut seen: HashSet<FolderId> = HashSet::new();
        let mut current = start;

        let verdict = loop {
            if let Some(known) = verdicts.get(&current) {
                break *known;
            }
            if !seen.insert(current) {
                return Err(AppError::malformed_chain(format!(
                    "Folder {current} is its own ancestor"
                )));
            }
            if trail.len() >= self.max_depth {
                return Err(AppError::malformed_chain(format!(
                    "Folder {start} does not reach the root within {} levels",
                    self.max_depth
                )));
            }

            let node = self.node(current).await?.ok_or_else(|| {
                AppError::malformed_chain(format!(
                    "Folder {current} on the chain of {start} does not exist"
                ))
            })?;
            trail.push(current);

            match node.parent {
                FolderPath::Root => break false,
                FolderPath::Folder(parent) => current = parent,
            }
        };

        for id in trail {
            verdicts.insert(id, verdict);
        }
        Ok(verdict)
    }
}

/// Answers structural questions about the folder tree.
#[derive(Clone)]
pub struct TreeService {
    /// Folder store.
    folders: Arc<dyn FolderStore>,
    /// Maximum number of folders on any chain, the top level included.
    max_depth: usize,
}

impl std::fmt::Debug for TreeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeService")
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(folders: Arc<dyn FolderStore>, max_depth: usize) -> Self {
        Self { folders, max_depth }
    }

    /// Builds the breadcrumb trail from the top level down to `folder_id`.
    ///
    /// Issues one store lookup per folder on the trail and never more than
    /// `max_depth` in total.
    pub async fn ancestor_chain(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<AncestorChain> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        let mut current = folder_id;

        for depth in 0..self.max_depth {
            if !seen.insert(current) {
                warn!(folder_id = %folder_id, repeated = %current, "Cyclic folder chain");
                return Err(AppError::malformed_chain(format!(
                    "Folder {current} is its own ancestor"
                )));
            }

            let folder = ctx
                .run(self.folders.get_folder(current))
                .await?
                .ok_or_else(|| {
                    if depth == 0 {
                        AppError::not_found(format!("Folder {folder_id} not found"))
                    } else {
                        AppError::malformed_chain(format!(
                            "Folder {current} on the chain of {folder_id} does not exist"
                        ))
                    }
                })?;
            let parent = folder.parent()?;

            entries.push(ChainEntry {
                id: folder.id,
                name: folder.name,
            });

            match parent {
                FolderPath::Root => {
                    entries.reverse();
                    debug!(folder_id = %folder_id, depth, "Built ancestor chain");
                    return Ok(AncestorChain { entries });
                }
                FolderPath::Folder(parent_id) => current = parent_id,
            }
        }

        warn!(folder_id = %folder_id, max_depth = self.max_depth, "Folder chain too deep");
        Err(AppError::malformed_chain(format!(
            "Folder {folder_id} does not reach the root within {} levels",
            self.max_depth
        )))
    }

    /// Computes where `folder` may be moved.
    ///
    /// Every folder except `folder` itself and its descendants is offered,
    /// plus the root. The folder's present location is flagged `current`.
    pub async fn legal_targets(
        &self,
        ctx: &RequestContext,
        folder: &Folder,
    ) -> AppResult<MoveTargets> {
        let current = folder.parent()?;
        let all = ctx.run(self.folders.list_folders()).await?;

        let mut walker = Walker::new(self.folders.as_ref(), ctx, self.max_depth);
        walker.seed(&all)?;
        let mut verdicts = HashMap::new();

        let mut folders: Vec<MoveTarget> = Vec::new();
        for candidate in all.iter().filter(|f| f.id != folder.id) {
            if walker.is_within(candidate.id, folder.id, &mut verdicts).await? {
                continue;
            }
            folders.push(MoveTarget {
                destination: FolderPath::Folder(candidate.id),
                label: candidate.name.clone(),
                current: current.points_to(candidate.id),
            });
        }

        // The snapshot can miss a parent created after it was taken.
        if let FolderPath::Folder(parent_id) = current {
            if !folders.iter().any(|t| t.current) {
                let parent = walker.node(parent_id).await?.ok_or_else(|| {
                    AppError::malformed_chain(format!(
                        "Parent {parent_id} of folder {} does not exist",
                        folder.id
                    ))
                })?;
                folders.push(MoveTarget {
                    destination: current,
                    label: parent.name,
                    current: true,
                });
            }
        }

        folders.sort_by(|a, b| {
            a.label
                .cmp(&b.label)
                .then_with(|| a.destination.to_string().cmp(&b.destination.to_string()))
        });

        let mut entries = Vec::with_capacity(folders.len() + 1);
        entries.push(MoveTargets::root_entry(current.is_root()));
        entries.extend(folders);

        debug!(
            folder_id = %folder.id,
            candidates = all.len(),
            targets = entries.len(),
            "Computed legal move targets"
        );
        Ok(MoveTargets { entries })
    }

    /// Fails with `IllegalMove` unless `folder_id` may be placed at `destination`.
    ///
    /// Walks upward from the destination, so the check reflects the store
    /// at the moment of the move rather than an earlier target listing.
    pub async fn ensure_legal_move(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        destination: FolderPath,
    ) -> AppResult<()> {
        let FolderPath::Folder(target) = destination else {
            return Ok(());
        };
        if target == folder_id {
            return Err(AppError::illegal_move(format!(
                "Folder {folder_id} cannot be moved into itself"
            )));
        }

        let mut walker = Walker::new(self.folders.as_ref(), ctx, self.max_depth);
        if walker.node(target).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Destination folder {target} not found"
            )));
        }

        let mut verdicts = HashMap::new();
        if walker.is_within(target, folder_id, &mut verdicts).await? {
            return Err(AppError::illegal_move(format!(
                "Folder {folder_id} cannot be moved into its descendant {target}"
            )));
        }
        Ok(())
    }

    /// Collects every descendant of `folder_id`, parents before children.
    pub async fn descendants(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<Vec<Folder>> {
        let mut found = Vec::new();
        let mut seen = HashSet::from([folder_id]);
        let mut queue = VecDeque::from([(folder_id, 0usize)]);

        while let Some((parent, depth)) = queue.pop_front() {
            let children = ctx
                .run(self.folders.list_children(FolderPath::Folder(parent)))
                .await?;
            if !children.is_empty() && depth + 1 >= self.max_depth {
                return Err(AppError::malformed_chain(format!(
                    "Subtree of folder {folder_id} is deeper than {} levels",
                    self.max_depth
                )));
            }
            for child in children {
                if !seen.insert(child.id) {
                    return Err(AppError::malformed_chain(format!(
                        "Folder {} appears twice under folder {folder_id}",
                        child.id
                    )));
                }
                queue.push_back((child.id, depth + 1));
                found.push(child);
            }
        }

        Ok(found)
    }
}
