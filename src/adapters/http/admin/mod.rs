//! HTTP adapter for the admin area, mounted at `/api/admin`.
//!
//! - `GET /analytics` - platform statistics
//! - `GET /users`, `PUT /users/:id/role`
//! - `GET /orders` - most recent payment orders
//! - `GET|POST /content`, `PUT|DELETE /content/:id`,
//!   `POST /content/:id/publish`, `POST /content/:id/unpublish`

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::admin_routes;
