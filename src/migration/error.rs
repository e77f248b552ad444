//! Migration-specific error types

use std::path::PathBuf;

use crate::connection::ConnectionError;
use crate::dialect::DatabaseType;

/// Errors surfaced by the migration engine
///
/// The orchestrator recovers from nothing: the first fatal error ends the
/// run and is returned with its underlying error chain intact.
#[derive(Debug)]
pub enum MigrationError {
    /// The migrations directory does not exist
    DirectoryMissing(PathBuf),
    /// The requested database type is not recognized
    UnsupportedDialect(String),
    /// Two or more migration units declare the same version
    DuplicateVersion(Vec<(i64, Vec<String>)>),
    /// Native migrations could not be collected
    LoaderFailure(String),
    /// Engine configuration could not be loaded
    Configuration(String),
    /// A migration failed during application; the run halted
    MigrationFailed {
        version: i64,
        source: String,
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The version-info table could not be created or read
    VersionStore {
        context: String,
        cause: ConnectionError,
    },
    /// A known database type has no registered connection factory
    DriverUnavailable(DatabaseType),
    /// The database connection could not be established or used
    Connection(ConnectionError),
}

impl std::fmt::Display for MigrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationError::DirectoryMissing(path) => {
                write!(f, "Migrations directory not found: {}", path.display())
            }
            MigrationError::UnsupportedDialect(name) => {
                write!(
                    f,
                    "Unsupported database type '{}' (expected SqlServer, PostgreSql, or SQLite)",
                    name
                )
            }
            MigrationError::DuplicateVersion(duplicates) => {
                write!(f, "Duplicate migration version(s): ")?;
                for (i, (version, sources)) in duplicates.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{} ({})", version, sources.join(", "))?;
                }
                Ok(())
            }
            MigrationError::LoaderFailure(msg) => {
                write!(f, "Failed to collect native migrations: {}", msg)
            }
            MigrationError::Configuration(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            MigrationError::MigrationFailed {
                version,
                source,
                cause,
            } => {
                write!(
                    f,
                    "Migration {} ({}) failed, run halted: {}",
                    version, source, cause
                )
            }
            MigrationError::VersionStore { context, cause } => {
                write!(f, "Version-info table error while {}: {}", context, cause)
            }
            MigrationError::DriverUnavailable(db) => {
                write!(
                    f,
                    "No database driver registered for {}; register one with register_driver()",
                    db
                )
            }
            MigrationError::Connection(e) => write!(f, "Connection error: {}", e),
        }
    }
}

impl std::error::Error for MigrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MigrationError::MigrationFailed { cause, .. } => Some(cause.as_ref()),
            MigrationError::VersionStore { cause, .. } => Some(cause),
            MigrationError::Connection(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConnectionError> for MigrationError {
    fn from(error: ConnectionError) -> Self {
        match error {
            ConnectionError::DriverUnavailable(db) => MigrationError::DriverUnavailable(db),
            other => MigrationError::Connection(other),
        }
    }
}

impl From<crate::dialect::UnknownDialect> for MigrationError {
    fn from(error: crate::dialect::UnknownDialect) -> Self {
        MigrationError::UnsupportedDialect(error.0)
    }
}
