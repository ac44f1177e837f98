//! Account management services.

pub mod interval;
pub mod service;

pub use interval::IntervalGenerator;
pub use service::AccountService;
