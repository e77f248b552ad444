//! Version-info table bookkeeping
//!
//! The `VersionInfo` table is the persistent record of applied migrations:
//! one row per committed migration, a unique index `UC_Version` on the
//! version column, created on first use and never dropped. The store also
//! owns the in-memory applied set for the duration of a run.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::connection::{ConnectionError, SqlConnection};
use crate::dialect::DatabaseType;
use crate::migration::MigrationError;

/// One row of the version-info table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    /// Migration version
    pub version: i64,

    /// When the migration was committed (client-side UTC)
    pub applied_on: DateTime<Utc>,

    /// Human-readable migration description
    pub description: String,
}

impl VersionRecord {
    /// Create a record stamped with the current UTC time
    #[must_use]
    pub fn new(version: i64, description: impl Into<String>) -> Self {
        Self {
            version,
            applied_on: Utc::now(),
            description: description.into(),
        }
    }
}

/// Bookkeeping for applied versions, persistent and in-memory
///
/// The applied set loaded at the start of a run is authoritative for the
/// "already applied" decision; versions committed during the run are added
/// via [`VersionStore::mark_applied`].
pub struct VersionStore {
    db: DatabaseType,
    applied: HashSet<i64>,
}

impl VersionStore {
    /// Create a store for the given dialect with an empty applied set
    pub fn new(db: DatabaseType) -> Self {
        Self {
            db,
            applied: HashSet::new(),
        }
    }

    /// Create the version-info table and its unique index if absent
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::VersionStore` if the DDL fails.
    pub fn ensure(&self, conn: &mut dyn SqlConnection) -> Result<(), MigrationError> {
        for statement in self.db.ensure_version_table_sql() {
            conn.execute(&statement)
                .map_err(|cause| MigrationError::VersionStore {
                    context: "creating the version-info table".to_string(),
                    cause,
                })?;
        }
        Ok(())
    }

    /// Load every recorded version into the applied set
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::VersionStore` if the query fails.
    pub fn load(&mut self, conn: &mut dyn SqlConnection) -> Result<(), MigrationError> {
        let versions = conn
            .query_i64(&self.db.select_versions_sql())
            .map_err(|cause| MigrationError::VersionStore {
                context: "reading applied versions".to_string(),
                cause,
            })?;

        self.applied = versions.into_iter().collect();
        Ok(())
    }

    /// Whether a version is applied: loaded from the table or committed
    /// earlier in this run
    pub fn has(&self, version: i64) -> bool {
        self.applied.contains(&version)
    }

    /// Highest applied version, if any
    pub fn max_applied(&self) -> Option<i64> {
        self.applied.iter().copied().max()
    }

    /// Number of versions in the applied set
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    /// Insert one version record
    ///
    /// Runs on the caller's connection, inside the caller's transaction.
    /// The applied-set gate means an existing row should be unreachable; if
    /// one exists anyway, the `UC_Version` unique index rejects the insert
    /// and the error propagates as a migration failure.
    ///
    /// # Errors
    ///
    /// Returns the driver's error, including duplicate-key violations.
    pub fn record(
        &self,
        conn: &mut dyn SqlConnection,
        record: &VersionRecord,
    ) -> Result<(), ConnectionError> {
        conn.execute(&self.db.insert_version_sql(record))
    }

    /// Add a version committed during this run to the applied set
    pub fn mark_applied(&mut self, version: i64) {
        self.applied.insert(version);
    }
}
