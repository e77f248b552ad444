//! Built-in driver implementations
//!
//! Each driver adapts one database client crate to [`SqlConnection`].
//! SQL Server has no built-in driver; hosts targeting it register a
//! factory through [`crate::connection::register_driver`].
//!
//! [`SqlConnection`]: crate::connection::SqlConnection

pub mod postgres;
pub mod sqlite;
