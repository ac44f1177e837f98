//! Folder management, tree, and readiness services.

pub mod readiness;
pub mod service;
pub mod tree;

pub use readiness::{ReadinessSnapshot, ReadinessValidator};
pub use service::FolderService;
pub use tree::TreeService;
