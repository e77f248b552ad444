//! # Drydock
//!
//! Database schema migration engine for SQL Server, PostgreSQL, and SQLite.
//!
//! Given a target database, a connection string, and a directory of
//! migration artifacts, drydock advances the schema from its current state
//! to the latest declared state: previously-unapplied migrations run
//! exactly once, in ascending version order, each in its own transaction,
//! and the run halts on the first failure.
//!
//! ## Architecture
//!
//! - **dialect**: per-database quoting, default schema, version-table DDL
//! - **connection**: the `SqlConnection` driver seam + factory registry
//! - **driver**: built-in PostgreSQL (may_postgres) and SQLite (rusqlite)
//!   connections
//! - **migration**: discovery, ordering, bookkeeping, and the orchestrator
//! - **transaction**: per-migration transaction guard
//! - **error_log**: append-only audit trail for critical failures
//!
//! ## Example
//!
//! ```rust,no_run
//! use drydock::execute_migrations;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = execute_migrations("SQLite", "app.db", "./migrations")?;
//!     println!("applied {} migration(s)", report.applied.len());
//!     Ok(())
//! }
//! ```

pub mod config;

pub mod connection;

pub mod dialect;

pub mod driver;

pub mod error_log;

pub mod migration;

pub mod transaction;

// Test doubles shared by the unit tests
#[cfg(test)]
pub mod test_support;

// Re-export configuration for convenience
pub use config::MigratorConfig;

// Re-export connection types for convenience
pub use connection::{
    open_connection, register_driver, validate_connection_string, ConnectionError, DriverFactory,
    SqlConnection,
};

pub use dialect::DatabaseType;

pub use error_log::ErrorLogSink;

// Re-export the engine surface for convenience
pub use migration::{
    execute_migrations, register_migration, Migration, MigrationError, Migrator, RunReport,
};

pub use transaction::Transaction;
