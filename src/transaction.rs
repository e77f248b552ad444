//! Transaction guard
//!
//! Wraps a [`SqlConnection`] for the duration of one migration. Exactly one
//! transaction level is supported; the guard rolls back on drop if neither
//! [`Transaction::commit`] nor [`Transaction::rollback`] consumed it, so a
//! panic mid-migration cannot leave an open transaction behind.

use crate::connection::{ConnectionError, SqlConnection};

/// An open database transaction
pub struct Transaction<'a> {
    conn: &'a mut dyn SqlConnection,
    open: bool,
}

impl<'a> Transaction<'a> {
    /// Start a transaction on the given connection
    ///
    /// # Errors
    ///
    /// Returns the driver's error if the transaction cannot be started.
    pub fn begin(conn: &'a mut dyn SqlConnection) -> Result<Self, ConnectionError> {
        conn.begin()?;
        Ok(Self { conn, open: true })
    }

    /// Submit one or more SQL statements inside this transaction
    ///
    /// # Errors
    ///
    /// Returns the driver's error if execution fails; the transaction stays
    /// open so the caller decides between rollback and further statements.
    pub fn execute(&mut self, sql: &str) -> Result<(), ConnectionError> {
        self.conn.execute(sql)
    }

    /// Access the underlying connection for the duration of the transaction
    pub fn connection(&mut self) -> &mut dyn SqlConnection {
        &mut *self.conn
    }

    /// Commit the transaction
    ///
    /// # Errors
    ///
    /// Returns the driver's error if the commit fails. The guard is consumed
    /// either way; a failed commit leaves cleanup to the server.
    pub fn commit(mut self) -> Result<(), ConnectionError> {
        self.open = false;
        self.conn.commit()
    }

    /// Roll back the transaction
    ///
    /// # Errors
    ///
    /// Returns the driver's error if the rollback fails.
    pub fn rollback(mut self) -> Result<(), ConnectionError> {
        self.open = false;
        self.conn.rollback()
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = self.conn.rollback() {
                log::error!("Failed to roll back abandoned transaction: {e}");
            }
        }
    }
}
