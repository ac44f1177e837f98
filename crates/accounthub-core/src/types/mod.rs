//! Core type definitions used across the AccountHub workspace.

pub mod id;
pub mod readiness;

pub use id::*;
pub use readiness::FailureReason;
