//! PostgreSQL repository implementations.

pub mod account;
pub mod folder;

pub use account::AccountRepository;
pub use folder::FolderRepository;
