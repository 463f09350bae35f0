//! # Storage Layer
//!
//! SQLite persistence: connection pool management, embedded schema
//! migrations, and the account repository.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use migrations::run_migrations;
pub use pool::{create_pool, DbPool};
pub use repositories::{AccountRepository, SqlxAccountRepository};
