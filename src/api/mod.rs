//! # HTTP API
//!
//! Axum router, handlers, error mapping, and the OpenAPI documentation
//! surface.

pub mod docs;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod routes;
pub mod server;

pub use routes::{build_router, ApiState};
pub use server::start_server;
