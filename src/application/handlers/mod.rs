//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations, grouped
//! by area. Each handler holds the ports it needs as `Arc<dyn Port>`.

pub mod admin;
pub mod catalog;
pub mod commerce;
pub mod content;
pub mod learning;
pub mod user;
