//! Account domain entities.

pub mod model;
pub mod settings;
pub mod status;

pub use model::{Account, CreateAccount, UpdateAccount};
pub use settings::AccountSettings;
pub use status::StatusBlock;
