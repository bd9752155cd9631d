//! Admin handlers.
//!
//! ## Queries
//! - `GetPlatformStatsHandler` - platform-wide counts and revenue
//! - `ListUsersHandler` - accounts, optionally filtered by role
//! - `ListRecentOrdersHandler` - most recent payment orders
//!
//! ## Commands
//! - `ChangeUserRoleHandler` - promote or demote an account

mod orders;
mod platform_stats;
mod users;

pub use orders::{ListRecentOrdersHandler, ListRecentOrdersQuery};
pub use platform_stats::GetPlatformStatsHandler;
pub use users::{ChangeUserRoleCommand, ChangeUserRoleHandler, ListUsersHandler, ListUsersQuery};
