//! SQL migration script discovery and filename parsing

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::migration::MigrationError;

/// A raw SQL migration script discovered on disk
///
/// The script's contents are never parsed or validated; they are read at
/// apply time and submitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlScript {
    /// Path to the script file
    pub path: PathBuf,

    /// Original filename, kept for diagnostics and duplicate reporting
    pub file_name: String,

    /// Migration version captured from the 12-digit filename prefix
    pub version: i64,

    /// Description stored in the version record
    pub description: String,
}

impl SqlScript {
    /// Parse a filename of the form `<12-digit version>_<name>.sql`
    ///
    /// The extension is matched case-insensitively. Returns `None` for
    /// filenames that are not migration scripts.
    pub fn parse_filename(filename: &str, pattern: &Regex) -> Option<(i64, String)> {
        let caps = pattern.captures(filename)?;
        // Twelve decimal digits always fit in an i64.
        let version = caps.get(1)?.as_str().parse::<i64>().ok()?;
        Some((version, format!("SQL Migration: {filename}")))
    }
}

fn script_pattern() -> Result<Regex, MigrationError> {
    Regex::new(r"^(\d{12})_.+\.(?i:sql)$")
        .map_err(|e| MigrationError::LoaderFailure(format!("Invalid script pattern: {e}")))
}

/// Discover SQL migration scripts in a directory
///
/// Scans non-recursively. Entries that do not match the
/// `<12-digit>_<name>.sql` pattern are debug-logged and ignored; an empty
/// directory yields an empty vec. The result is sorted by version.
///
/// # Errors
///
/// Returns `MigrationError::DirectoryMissing` if the directory does not
/// exist; callers surface this unchanged, before any database work.
pub fn discover_scripts(migrations_dir: &Path) -> Result<Vec<SqlScript>, MigrationError> {
    if !migrations_dir.is_dir() {
        return Err(MigrationError::DirectoryMissing(
            migrations_dir.to_path_buf(),
        ));
    }

    let pattern = script_pattern()?;
    let mut scripts = Vec::new();

    let entries = fs::read_dir(migrations_dir).map_err(|e| {
        MigrationError::LoaderFailure(format!(
            "Failed to read migrations directory {}: {e}",
            migrations_dir.display()
        ))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            MigrationError::LoaderFailure(format!("Failed to read directory entry: {e}"))
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            log::debug!("Ignoring entry with non-UTF-8 name: {}", path.display());
            continue;
        };

        match SqlScript::parse_filename(file_name, &pattern) {
            Some((version, description)) => {
                scripts.push(SqlScript {
                    path: path.clone(),
                    file_name: file_name.to_string(),
                    version,
                    description,
                });
            }
            None => {
                log::debug!("Ignoring non-migration file: {}", path.display());
            }
        }
    }

    scripts.sort_by_key(|s| s.version);
    Ok(scripts)
}
