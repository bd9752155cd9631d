//! HTTP adapter - the axum REST API.
//!
//! Each area has its own `dto`, `handlers` and `routes` modules; `router`
//! assembles them under `/api` and applies authentication and role gates.

pub mod admin;
pub mod catalog;
pub mod content;
pub mod error;
pub mod instructor;
pub mod learning;
pub mod middleware;
pub mod payments;
pub mod router;
pub mod state;
pub mod users;

pub use error::{ApiError, ErrorResponse};
pub use router::{api_routes, build_router};
pub use state::{AppState, Repositories};
