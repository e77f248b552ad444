//! In-process migration execution helpers
//!
//! Thin wrappers for applications that run their migrations during startup
//! instead of through a dedicated tool, configured via [`MigratorConfig`].

use crate::config::MigratorConfig;
use crate::migration::{execute_migrations, MigrationError, RunReport};

/// Run migrations on application startup using the given configuration
///
/// # Errors
///
/// Returns the engine's error unchanged; applications should fail fast when
/// their migrations cannot be applied.
pub fn startup_migrations(config: &MigratorConfig) -> Result<RunReport, MigrationError> {
    let report = execute_migrations(
        &config.database_type,
        &config.database_url,
        &config.migrations_path,
    )?;

    if report.applied.is_empty() {
        log::debug!("No pending migrations to apply");
    } else {
        log::info!("Applied {} migration(s) on startup", report.applied.len());
    }

    Ok(report)
}

/// Run migrations on startup from `config/config.toml` and `DRYDOCK__*`
/// environment variables
///
/// # Errors
///
/// Returns `MigrationError::Configuration` if configuration loading fails,
/// otherwise behaves like [`startup_migrations`].
pub fn startup_migrations_from_env() -> Result<RunReport, MigrationError> {
    let config = MigratorConfig::load().map_err(|e| {
        MigrationError::Configuration(format!("Failed to load migrator configuration: {e}"))
    })?;
    startup_migrations(&config)
}
