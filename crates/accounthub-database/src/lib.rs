//! # accounthub-database
//!
//! Persistence for AccountHub folders and accounts. The services consume
//! the [`FolderStore`] and [`AccountStore`] traits; this crate provides a
//! PostgreSQL implementation (the `repositories` module) and an
//! in-process implementation ([`MemoryStore`]).

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{AccountStore, FolderStore};
