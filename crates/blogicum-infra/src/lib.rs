//! # Blogicum Infrastructure
//!
//! Concrete implementations of the ports defined in `blogicum-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory store only
//! - `postgres` - PostgreSQL content store via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;
pub mod memory;

#[cfg(feature = "auth")]
pub mod auth;

pub use memory::InMemoryContentStore;

pub use database::DatabaseConfig;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
