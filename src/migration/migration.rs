//! Migration trait definition

use crate::connection::{ConnectionError, SqlConnection};

/// Trait implemented by native (compiled) migrations
///
/// Each native migration declares a version, an optional description, and an
/// imperative `apply()` that issues DDL/DML against the engine's active
/// connection. `apply()` runs inside the transaction the engine opened for
/// this migration and MUST NOT write to the version-info table; the engine
/// records the version itself after a successful apply, for native and SQL
/// migrations alike.
pub trait Migration: Send + Sync {
    /// Migration version; orders this unit against every other unit
    /// (canonically a 12-digit `YYYYMMDDHHMM` timestamp)
    fn version(&self) -> i64;

    /// Human-readable description, stored alongside the version record
    fn description(&self) -> &str {
        ""
    }

    /// Apply the migration against the active connection/transaction
    ///
    /// # Errors
    ///
    /// Any error rolls back this migration's transaction and halts the run.
    fn apply(&self, conn: &mut dyn SqlConnection) -> Result<(), ConnectionError>;
}
