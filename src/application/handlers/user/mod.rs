//! User account handlers.
//!
//! ## Commands
//! - `SyncProfileHandler` - registers on first call, refreshes afterwards
//!
//! ## Queries
//! - `GetMeHandler` - the caller's stored account

mod account;

pub use account::{GetMeHandler, SyncProfileHandler, SyncProfileResult};
