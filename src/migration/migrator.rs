//! Migrator - core migration orchestration
//!
//! Drives one run end to end: discover SQL scripts and native units, merge
//! them into the ordered job list, then apply each previously-unapplied job
//! in its own transaction, halting on the first failure. Jobs are strictly
//! sequential; commits are observed in ascending version order.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::connection::{self, ConnectionError, SqlConnection};
use crate::dialect::DatabaseType;
use crate::error_log::ErrorLogSink;
use crate::migration::job::{build_jobs, MigrationJob};
use crate::migration::script::discover_scripts;
use crate::migration::version_store::{VersionRecord, VersionStore};
use crate::migration::{registry, Migration, MigrationError};
use crate::transaction::Transaction;

/// Summary of one migration run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Versions committed by this run, in application order
    pub applied: Vec<i64>,

    /// Versions skipped because they were already applied
    pub skipped: Vec<i64>,

    /// Versions applied below an already-applied higher version
    pub out_of_order: Vec<i64>,
}

/// Core migration execution engine
///
/// A `Migrator` is configured with the migrations directory and optionally
/// an explicit native-unit collection and an error-log location, then run
/// against one database connection.
pub struct Migrator {
    migrations_dir: PathBuf,
    native: Option<Vec<Arc<dyn Migration>>>,
    error_log: ErrorLogSink,
}

impl Migrator {
    /// Create a migrator over the given migrations directory
    ///
    /// Native units are taken from the process-global registry unless
    /// [`Migrator::with_native_migrations`] supplies them explicitly.
    pub fn new(migrations_dir: impl AsRef<Path>) -> Self {
        Self {
            migrations_dir: migrations_dir.as_ref().to_path_buf(),
            native: None,
            error_log: ErrorLogSink::default(),
        }
    }

    /// Use an explicit native-unit collection instead of the registry
    #[must_use]
    pub fn with_native_migrations(mut self, native: Vec<Arc<dyn Migration>>) -> Self {
        self.native = Some(native);
        self
    }

    /// Write critical failures to an error log rooted at a custom location
    #[must_use]
    pub fn with_error_log(mut self, sink: ErrorLogSink) -> Self {
        self.error_log = sink;
        self
    }

    /// Discover, merge, and order every migration unit
    ///
    /// # Errors
    ///
    /// Returns `DirectoryMissing` if the migrations directory does not
    /// exist, `DuplicateVersion` if two units share a version, or
    /// `LoaderFailure` if native units cannot be collected. All of these
    /// surface before any database work.
    pub fn discover_jobs(&self) -> Result<Vec<MigrationJob>, MigrationError> {
        let scripts = discover_scripts(&self.migrations_dir)?;
        let native = match &self.native {
            Some(native) => native.clone(),
            None => registry::registered_migrations()?,
        };
        build_jobs(native, scripts)
    }

    /// Run every pending migration against the given database
    ///
    /// Opens one connection through the driver registry. When the job list
    /// is empty the run succeeds without touching the database at all.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error; earlier committed migrations stay
    /// applied.
    pub fn execute(
        &self,
        db: DatabaseType,
        connection_string: &str,
    ) -> Result<RunReport, MigrationError> {
        let jobs = self.discover_jobs()?;

        if jobs.is_empty() {
            log::warn!(
                "No migrations found in {}",
                self.migrations_dir.display()
            );
            log::info!("Migration run complete: nothing to apply");
            return Ok(RunReport::default());
        }

        let mut conn = connection::open_connection(db, connection_string)?;
        self.apply_jobs(db, conn.as_mut(), &jobs)
    }

    /// Apply an ordered job list over an existing connection
    ///
    /// # Errors
    ///
    /// Returns `VersionStore` errors from table setup, or `MigrationFailed`
    /// from the first job that fails.
    pub fn apply_jobs(
        &self,
        db: DatabaseType,
        conn: &mut dyn SqlConnection,
        jobs: &[MigrationJob],
    ) -> Result<RunReport, MigrationError> {
        let mut store = VersionStore::new(db);
        store.ensure(conn)?;
        store.load(conn)?;

        let mut report = RunReport::default();

        for job in jobs {
            let version = job.version();

            if store.has(version) {
                log::info!("Skipping already applied migration (from previous run): {version}");
                report.skipped.push(version);
                continue;
            }

            if let Some(max_so_far) = store.max_applied() {
                if max_so_far > 0 && version < max_so_far {
                    log::warn!(
                        "Applying out-of-order migration: Version {version} is being applied \
                         after a higher version {max_so_far} has already been applied."
                    );
                    report.out_of_order.push(version);
                }
            }

            self.apply_one(db, conn, &store, job)?;
            store.mark_applied(version);
            report.applied.push(version);
        }

        log::info!(
            "Migration run complete: {} applied, {} skipped",
            report.applied.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Apply a single job in its own transaction
    fn apply_one(
        &self,
        db: DatabaseType,
        conn: &mut dyn SqlConnection,
        store: &VersionStore,
        job: &MigrationJob,
    ) -> Result<(), MigrationError> {
        log::info!(
            "Applying {} migration {} ({})",
            job.kind(),
            job.version(),
            job.source()
        );

        let mut tx = match Transaction::begin(conn) {
            Ok(tx) => tx,
            Err(cause) => return Err(self.halt(job, cause)),
        };

        match apply_in_transaction(db, &mut tx, store, job) {
            Ok(()) => tx.commit().map_err(|cause| self.halt(job, cause)),
            Err(cause) => {
                if let Err(rollback_err) = tx.rollback() {
                    log::error!(
                        "Failed to roll back migration {}: {rollback_err}",
                        job.version()
                    );
                }
                Err(self.halt(job, cause))
            }
        }
    }

    /// Log the critical failure, mirror it to the error log sink, and build
    /// the error that ends the run
    fn halt(&self, job: &MigrationJob, cause: ConnectionError) -> MigrationError {
        let message = format!(
            "CRITICAL ERROR applying {} migration {} ({}). Halting execution.",
            job.kind(),
            job.version(),
            job.source()
        );
        log::error!("{message}");
        self.error_log.append(&format!("{message}\nError: {cause}"));

        MigrationError::MigrationFailed {
            version: job.version(),
            source: job.source(),
            cause: Box::new(cause),
        }
    }
}

/// Run the job's change and record its version, all inside `tx`
fn apply_in_transaction(
    db: DatabaseType,
    tx: &mut Transaction<'_>,
    store: &VersionStore,
    job: &MigrationJob,
) -> Result<(), ConnectionError> {
    match job {
        MigrationJob::Native(migration) => migration.apply(tx.connection())?,
        MigrationJob::Script(script) => {
            let sql = fs::read_to_string(&script.path).map_err(|e| {
                ConnectionError::Other(format!("Failed to read {}: {e}", script.path.display()))
            })?;
            for batch in db.split_batches(&sql) {
                tx.execute(&batch)?;
            }
        }
    }

    let record = VersionRecord::new(job.version(), job.description());
    store.record(tx.connection(), &record)
}

/// Run all pending migrations: the engine's single entrypoint
///
/// `db_type` is one of `SqlServer`, `PostgreSql`, `SQLite`
/// (case-insensitive).
///
/// # Errors
///
/// Returns `UnsupportedDialect` for an unknown `db_type`,
/// `DirectoryMissing` / `DuplicateVersion` for setup problems (all before
/// any database work), or the first error of the run itself.
pub fn execute_migrations(
    db_type: &str,
    connection_string: &str,
    migrations_path: impl AsRef<Path>,
) -> Result<RunReport, MigrationError> {
    let db: DatabaseType = db_type.parse()?;
    Migrator::new(migrations_path).execute(db, connection_string)
}
