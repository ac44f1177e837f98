//! # accounthub-core
//!
//! Core crate for AccountHub. Contains configuration schemas, typed
//! identifiers, readiness reasons, and the unified error system.
//!
//! This crate has **no** internal dependencies on other AccountHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
