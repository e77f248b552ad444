//! Native-migration registry for runtime registration
//!
//! Hosts register their compiled migrations here at startup (explicit
//! registration replaces reflective artifact scanning); the engine takes a
//! snapshot per run. Tests that want to avoid process-global state can hand
//! the engine an explicit collection via
//! [`Migrator::with_native_migrations`](crate::migration::Migrator::with_native_migrations).

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

use crate::migration::{Migration, MigrationError};

static MIGRATION_REGISTRY: LazyLock<Mutex<HashMap<i64, Arc<dyn Migration>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Register a native migration
///
/// # Errors
///
/// Returns `MigrationError::DuplicateVersion` if a migration with the same
/// version is already registered, or `MigrationError::LoaderFailure` if the
/// registry lock cannot be acquired.
pub fn register_migration(migration: Arc<dyn Migration>) -> Result<(), MigrationError> {
    let version = migration.version();

    let mut registry = MIGRATION_REGISTRY
        .lock()
        .map_err(|e| MigrationError::LoaderFailure(format!("Failed to lock registry: {e}")))?;

    if let Some(existing) = registry.get(&version) {
        return Err(MigrationError::DuplicateVersion(vec![(
            version,
            vec![
                existing.description().to_string(),
                migration.description().to_string(),
            ],
        )]));
    }

    registry.insert(version, migration);
    Ok(())
}

/// Snapshot every registered migration, sorted by version
///
/// An empty registry is a valid state and yields an empty vec.
///
/// # Errors
///
/// Returns `MigrationError::LoaderFailure` if the registry lock cannot be
/// acquired.
pub fn registered_migrations() -> Result<Vec<Arc<dyn Migration>>, MigrationError> {
    let registry = MIGRATION_REGISTRY
        .lock()
        .map_err(|e| MigrationError::LoaderFailure(format!("Failed to lock registry: {e}")))?;

    let mut migrations: Vec<Arc<dyn Migration>> = registry.values().cloned().collect();
    migrations.sort_by_key(|m| m.version());
    Ok(migrations)
}

/// Check whether a version is registered
///
/// # Errors
///
/// Returns `MigrationError::LoaderFailure` if the registry lock cannot be
/// acquired.
pub fn is_registered(version: i64) -> Result<bool, MigrationError> {
    let registry = MIGRATION_REGISTRY
        .lock()
        .map_err(|e| MigrationError::LoaderFailure(format!("Failed to lock registry: {e}")))?;

    Ok(registry.contains_key(&version))
}

/// Remove a specific migration from the registry
///
/// Returns `Ok(true)` if the migration was present.
///
/// # Errors
///
/// Returns `MigrationError::LoaderFailure` if the registry lock cannot be
/// acquired.
pub fn unregister_migration(version: i64) -> Result<bool, MigrationError> {
    let mut registry = MIGRATION_REGISTRY
        .lock()
        .map_err(|e| MigrationError::LoaderFailure(format!("Failed to lock registry: {e}")))?;

    Ok(registry.remove(&version).is_some())
}

/// Remove every registered migration
///
/// Intended for tests that need a clean registry.
///
/// # Errors
///
/// Returns `MigrationError::LoaderFailure` if the registry lock cannot be
/// acquired.
pub fn clear_registry() -> Result<(), MigrationError> {
    let mut registry = MIGRATION_REGISTRY
        .lock()
        .map_err(|e| MigrationError::LoaderFailure(format!("Failed to lock registry: {e}")))?;

    registry.clear();
    Ok(())
}
