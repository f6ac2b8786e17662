//! # Database
//!
//! - [`connection`] - pool creation from [`DatabaseConfig`](crate::config::DatabaseConfig) and health check
//! - [`migrations`] - embedded schema migrations for `teams` and `members`

pub mod connection;
pub mod migrations;

pub use connection::DatabaseConnection;
pub use migrations::{DatabaseMigrations, MIGRATOR};
