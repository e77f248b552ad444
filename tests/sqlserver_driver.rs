//! SQL Server driver contract
//!
//! The engine ships no SQL Server client; the host registers a connection
//! factory. This suite plugs in a recording connection and checks the SQL
//! the engine submits: bracket-quoted `dbo`-qualified names and `GO` batch
//! splitting.

use std::fs;
use std::sync::{Arc, Mutex};

use drydock::{
    execute_migrations, register_driver, ConnectionError, DatabaseType, SqlConnection,
};

struct RecordingConnection {
    log: Arc<Mutex<Vec<String>>>,
}

impl SqlConnection for RecordingConnection {
    fn execute(&mut self, sql: &str) -> Result<(), ConnectionError> {
        self.log.lock().unwrap().push(sql.to_string());
        Ok(())
    }

    fn query_i64(&mut self, sql: &str) -> Result<Vec<i64>, ConnectionError> {
        self.log.lock().unwrap().push(sql.to_string());
        Ok(Vec::new())
    }

    fn begin(&mut self) -> Result<(), ConnectionError> {
        self.log.lock().unwrap().push("BEGIN".to_string());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), ConnectionError> {
        self.log.lock().unwrap().push("COMMIT".to_string());
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), ConnectionError> {
        self.log.lock().unwrap().push("ROLLBACK".to_string());
        Ok(())
    }
}

#[test]
fn host_registered_driver_receives_dialect_sql() {
    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let factory_log = Arc::clone(&log);

    register_driver(
        DatabaseType::SqlServer,
        Arc::new(move |_connection_string| {
            Ok(Box::new(RecordingConnection {
                log: Arc::clone(&factory_log),
            }) as Box<dyn SqlConnection>)
        }),
    )
    .expect("Driver registration should succeed");

    let dir = tempfile::tempdir().expect("Failed to create tempdir");
    fs::write(
        dir.path().join("202401011000_CreateUsers.sql"),
        "CREATE TABLE Users (Id INT)\nGO\nINSERT INTO Users VALUES (1)\nGO\n",
    )
    .expect("Failed to write script");

    let report = execute_migrations(
        "SqlServer",
        "Server=localhost;Database=app;Trusted_Connection=True;",
        dir.path(),
    )
    .expect("Run against the registered driver should succeed");
    assert_eq!(report.applied, vec![202401011000]);

    let log = log.lock().unwrap();
    assert!(
        log[0].contains("IF OBJECT_ID(N'[dbo].[VersionInfo]'"),
        "Table DDL uses bracket quoting: {}",
        log[0]
    );
    assert!(log[1].contains("CREATE UNIQUE INDEX [UC_Version]"));
    assert!(log[2].starts_with("SELECT [Version] FROM [dbo].[VersionInfo]"));
    assert_eq!(log[3], "BEGIN");

    // The two GO-separated batches arrive as separate submissions with the
    // separator stripped.
    assert!(log[4].contains("CREATE TABLE Users"));
    assert!(!log[4].to_uppercase().contains("\nGO"));
    assert!(log[5].contains("INSERT INTO Users VALUES (1)"));

    assert!(log[6].starts_with("INSERT INTO [dbo].[VersionInfo]"));
    assert!(log[6].contains("202401011000"));
    assert_eq!(log[7], "COMMIT");
    assert_eq!(log.len(), 8);
}
