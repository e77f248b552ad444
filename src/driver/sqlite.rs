//! SQLite driver over `rusqlite`

use rusqlite::Connection;

use crate::connection::{ConnectionError, SqlConnection};

/// A live SQLite connection
pub struct SqliteConnection {
    conn: Connection,
}

/// Open a SQLite database
///
/// The connection string is a filesystem path, created on first use, or
/// `:memory:` for a private in-memory database.
///
/// # Errors
///
/// Returns `ConnectionError::Database` if the file cannot be opened.
pub fn connect(connection_string: &str) -> Result<SqliteConnection, ConnectionError> {
    let conn = if connection_string == ":memory:" {
        Connection::open_in_memory()
    } else {
        Connection::open(connection_string)
    }
    .map_err(|e| ConnectionError::Database(Box::new(e)))?;

    Ok(SqliteConnection { conn })
}

impl SqlConnection for SqliteConnection {
    fn execute(&mut self, sql: &str) -> Result<(), ConnectionError> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| ConnectionError::Database(Box::new(e)))
    }

    fn query_i64(&mut self, sql: &str) -> Result<Vec<i64>, ConnectionError> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| ConnectionError::Database(Box::new(e)))?;

        let rows = stmt
            .query_map([], |row| row.get::<_, i64>(0))
            .map_err(|e| ConnectionError::Database(Box::new(e)))?;

        let mut values = Vec::new();
        for value in rows {
            values.push(
                value
                    .map_err(|e| ConnectionError::Parse(format!("Failed to read column: {e}")))?,
            );
        }
        Ok(values)
    }

    fn begin(&mut self) -> Result<(), ConnectionError> {
        self.conn
            .execute_batch("BEGIN")
            .map_err(|e| ConnectionError::Database(Box::new(e)))
    }

    fn commit(&mut self) -> Result<(), ConnectionError> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| ConnectionError::Database(Box::new(e)))
    }

    fn rollback(&mut self) -> Result<(), ConnectionError> {
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| ConnectionError::Database(Box::new(e)))
    }
}
