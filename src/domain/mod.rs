//! Domain layer - value objects, aggregates and pure domain services.

pub mod catalog;
pub mod commerce;
pub mod content;
pub mod foundation;
pub mod learning;
pub mod notification;
pub mod user;
