//! Test doubles shared by the unit tests

use std::sync::{Arc, Mutex};

use crate::connection::{ConnectionError, SqlConnection};

/// Scripted in-memory connection
///
/// Records every operation (`BEGIN`/`COMMIT`/`ROLLBACK` markers plus the
/// raw SQL passed to `execute`) into a shared log, answers `query_i64` with
/// a configured version list, and can be told to fail on statements
/// containing a given substring.
pub struct MockConnection {
    log: Arc<Mutex<Vec<String>>>,
    fail_on: Vec<String>,
    versions: Vec<i64>,
}

impl Default for MockConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            fail_on: Vec::new(),
            versions: Vec::new(),
        }
    }

    /// Versions returned by `query_i64` (the applied-set load)
    pub fn with_applied_versions(mut self, versions: Vec<i64>) -> Self {
        self.versions = versions;
        self
    }

    /// Fail any `execute` whose SQL contains `needle`
    pub fn with_failure_on(mut self, needle: &str) -> Self {
        self.fail_on.push(needle.to_string());
        self
    }

    /// Handle onto the operation log, usable after the connection has been
    /// handed to the engine
    pub fn log_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.log)
    }

    fn push(&self, entry: impl Into<String>) {
        self.log
            .lock()
            .expect("Mock log lock poisoned")
            .push(entry.into());
    }
}

impl SqlConnection for MockConnection {
    fn execute(&mut self, sql: &str) -> Result<(), ConnectionError> {
        self.push(sql);
        for needle in &self.fail_on {
            if sql.contains(needle.as_str()) {
                return Err(ConnectionError::Other(format!(
                    "forced failure on statement containing '{needle}'"
                )));
            }
        }
        Ok(())
    }

    fn query_i64(&mut self, sql: &str) -> Result<Vec<i64>, ConnectionError> {
        self.push(sql);
        Ok(self.versions.clone())
    }

    fn begin(&mut self) -> Result<(), ConnectionError> {
        self.push("BEGIN");
        Ok(())
    }

    fn commit(&mut self) -> Result<(), ConnectionError> {
        self.push("COMMIT");
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), ConnectionError> {
        self.push("ROLLBACK");
        Ok(())
    }
}
