//! # Inkpost
//!
//! Authentication and credential-lifecycle backend for a social-blogging
//! platform: registration with email verification, username/password login
//! issuing JWT bearer tokens, and a two-phase password-reset flow backed by
//! SQLite.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod notifier;
pub mod observability;
pub mod storage;

pub use errors::{InkpostError, Result};
