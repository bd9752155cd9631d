//! Market Academy - stock-market education platform backend.
//!
//! Courses and webinars, per-student learning progress, Razorpay payments
//! and the entitlements they grant, editorial content and admin analytics.
//!
//! The crate is laid out hexagonally:
//! - `domain` - aggregates, value objects and invariants
//! - `ports` - traits the domain needs from the outside world
//! - `application` - command and query handlers
//! - `adapters` - PostgreSQL, in-memory, Razorpay, JWT and HTTP implementations
//! - `config` - environment configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
