//! # accounthub-service
//!
//! Business logic service layer for AccountHub. The folder services keep
//! the folder graph a forest, build breadcrumbs, and gate campaign
//! launches behind the readiness checklist; the account services manage
//! the automation identities each folder owns.
//!
//! Services follow constructor injection: stores are provided at
//! construction time via `Arc` references.

pub mod account;
pub mod context;
pub mod folder;

pub use account::{AccountService, IntervalGenerator};
pub use context::RequestContext;
pub use folder::{FolderService, ReadinessValidator, TreeService};
