//! Migration jobs: the merged, ordered unit of work
//!
//! Native and SQL units are merged into one tagged union so the
//! orchestrator can treat them uniformly. Ordering is by version alone;
//! the kind never influences it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::migration::{Migration, MigrationError, SqlScript};

/// One unit of schema change, native or SQL
pub enum MigrationJob {
    Native(Arc<dyn Migration>),
    Script(SqlScript),
}

impl MigrationJob {
    /// The unit's version
    pub fn version(&self) -> i64 {
        match self {
            MigrationJob::Native(m) => m.version(),
            MigrationJob::Script(s) => s.version,
        }
    }

    /// Description stored in the version record
    pub fn description(&self) -> String {
        match self {
            MigrationJob::Native(m) => m.description().to_string(),
            MigrationJob::Script(s) => s.description.clone(),
        }
    }

    /// Kind label used in log and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            MigrationJob::Native(_) => "native",
            MigrationJob::Script(_) => "SQL",
        }
    }

    /// Where the unit came from: script filename, or the native unit's
    /// description
    pub fn source(&self) -> String {
        match self {
            MigrationJob::Native(m) => {
                let description = m.description();
                if description.is_empty() {
                    format!("native migration {}", m.version())
                } else {
                    description.to_string()
                }
            }
            MigrationJob::Script(s) => s.file_name.clone(),
        }
    }
}

impl fmt::Debug for MigrationJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} migration {} ({})", self.kind(), self.version(), self.source())
    }
}

/// Merge native and SQL units into the ordered job list
///
/// Every version must be unique across the union, including within a kind;
/// two SQL files whose prefixes collide (for example through extension case
/// variance) are duplicates too.
///
/// # Errors
///
/// Returns `MigrationError::DuplicateVersion` listing each offending
/// version with the sources that declared it.
pub fn build_jobs(
    native: Vec<Arc<dyn Migration>>,
    scripts: Vec<SqlScript>,
) -> Result<Vec<MigrationJob>, MigrationError> {
    let mut jobs: Vec<MigrationJob> = native
        .into_iter()
        .map(MigrationJob::Native)
        .chain(scripts.into_iter().map(MigrationJob::Script))
        .collect();

    let mut by_version: BTreeMap<i64, Vec<String>> = BTreeMap::new();
    for job in &jobs {
        by_version.entry(job.version()).or_default().push(job.source());
    }

    let duplicates: Vec<(i64, Vec<String>)> = by_version
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .collect();

    if !duplicates.is_empty() {
        return Err(MigrationError::DuplicateVersion(duplicates));
    }

    jobs.sort_by_key(MigrationJob::version);
    Ok(jobs)
}
