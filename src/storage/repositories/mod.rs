//! Repository implementations over the SQLite pool.

mod account;

pub use account::{AccountRepository, SqlxAccountRepository};
