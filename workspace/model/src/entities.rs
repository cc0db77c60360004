//! SeaORM entities for the work-tracking application.
//!
//! Two tables: `accounts` (who can log in) and `work_updates` (one record per
//! employee per day).

pub mod account;
pub mod work_update;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::account::Entity as Account;
    pub use super::account::{Role, Specialization};
    pub use super::work_update::Entity as WorkUpdate;
    pub use super::work_update::UpdateStatus;
}
