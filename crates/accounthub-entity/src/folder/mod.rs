//! Folder domain entities.

pub mod model;
pub mod path;
pub mod tree;
pub mod view;

pub use model::{CreateFolder, Folder};
pub use path::{FolderPath, ROOT_PATH};
pub use tree::{AncestorChain, ChainEntry, MoveTarget, MoveTargets};
pub use view::FolderView;
