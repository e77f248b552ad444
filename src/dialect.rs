//! Database dialect registry
//!
//! Per-dialect knowledge lives here: identifier quoting, default schema,
//! the `VersionInfo` table DDL, and batch splitting for scripts. Everything
//! is plain SQL text; the drivers only ever see finished statements.

use std::fmt;
use std::str::FromStr;

use crate::migration::version_store::VersionRecord;

/// Supported target databases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseType {
    SqlServer,
    PostgreSql,
    Sqlite,
}

/// Error returned when a database type string is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDialect(pub String);

impl fmt::Display for UnknownDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown database type '{}' (expected SqlServer, PostgreSql, or SQLite)",
            self.0
        )
    }
}

impl std::error::Error for UnknownDialect {}

impl FromStr for DatabaseType {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        if normalized.eq_ignore_ascii_case("sqlserver") || normalized.eq_ignore_ascii_case("mssql")
        {
            Ok(DatabaseType::SqlServer)
        } else if normalized.eq_ignore_ascii_case("postgresql")
            || normalized.eq_ignore_ascii_case("postgres")
        {
            Ok(DatabaseType::PostgreSql)
        } else if normalized.eq_ignore_ascii_case("sqlite") {
            Ok(DatabaseType::Sqlite)
        } else {
            Err(UnknownDialect(s.to_string()))
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatabaseType::SqlServer => "SqlServer",
            DatabaseType::PostgreSql => "PostgreSql",
            DatabaseType::Sqlite => "SQLite",
        };
        write!(f, "{name}")
    }
}

impl DatabaseType {
    /// Quote an identifier for this dialect
    ///
    /// SQL Server uses bracket quoting (`[x]`), PostgreSQL and SQLite use
    /// double quotes (`"x"`). Embedded closing delimiters are doubled.
    pub fn quote_ident(&self, ident: &str) -> String {
        match self {
            DatabaseType::SqlServer => format!("[{}]", ident.replace(']', "]]")),
            DatabaseType::PostgreSql | DatabaseType::Sqlite => {
                format!("\"{}\"", ident.replace('"', "\"\""))
            }
        }
    }

    /// Default schema for unqualified objects, if the dialect has one
    pub fn default_schema(&self) -> Option<&'static str> {
        match self {
            DatabaseType::SqlServer => Some("dbo"),
            DatabaseType::PostgreSql => Some("public"),
            DatabaseType::Sqlite => None,
        }
    }

    /// Quote a string literal for this dialect
    ///
    /// All three dialects double embedded single quotes.
    pub fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Schema-qualified, quoted name of the version-info table
    pub fn version_table(&self) -> String {
        match self.default_schema() {
            Some(schema) => format!(
                "{}.{}",
                self.quote_ident(schema),
                self.quote_ident("VersionInfo")
            ),
            None => self.quote_ident("VersionInfo"),
        }
    }

    /// DDL statements that create the version-info table and its unique
    /// index if they do not exist yet
    ///
    /// The table has no primary key; the `UC_Version` unique index is the
    /// authority on version uniqueness.
    pub fn ensure_version_table_sql(&self) -> Vec<String> {
        let table = self.version_table();
        match self {
            DatabaseType::SqlServer => vec![
                format!(
                    "IF OBJECT_ID(N'{table}', N'U') IS NULL\n\
                     CREATE TABLE {table} (\n    \
                         [Version] BIGINT NOT NULL,\n    \
                         [AppliedOn] DATETIME2 NOT NULL,\n    \
                         [Description] NVARCHAR(1024) NULL\n\
                     )"
                ),
                format!(
                    "IF NOT EXISTS (SELECT 1 FROM sys.indexes WHERE name = N'UC_Version' \
                     AND object_id = OBJECT_ID(N'{table}'))\n\
                     CREATE UNIQUE INDEX [UC_Version] ON {table} ([Version])"
                ),
            ],
            DatabaseType::PostgreSql | DatabaseType::Sqlite => vec![
                format!(
                    "CREATE TABLE IF NOT EXISTS {table} (\n    \
                         \"Version\" BIGINT NOT NULL,\n    \
                         \"AppliedOn\" TIMESTAMP NOT NULL,\n    \
                         \"Description\" TEXT NULL\n\
                     )"
                ),
                format!(
                    "CREATE UNIQUE INDEX IF NOT EXISTS \"UC_Version\" ON {table} (\"Version\")"
                ),
            ],
        }
    }

    /// Query returning every applied version, ascending
    pub fn select_versions_sql(&self) -> String {
        let version = self.quote_ident("Version");
        format!(
            "SELECT {version} FROM {table} ORDER BY {version} ASC",
            table = self.version_table()
        )
    }

    /// INSERT statement recording one applied version
    pub fn insert_version_sql(&self, record: &VersionRecord) -> String {
        format!(
            "INSERT INTO {table} ({version}, {applied_on}, {description}) VALUES ({v}, {ts}, {d})",
            table = self.version_table(),
            version = self.quote_ident("Version"),
            applied_on = self.quote_ident("AppliedOn"),
            description = self.quote_ident("Description"),
            v = record.version,
            ts = self.quote_literal(&record.applied_on.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            d = self.quote_literal(&record.description),
        )
    }

    /// Split a script into the batches the driver should submit
    ///
    /// SQL Server scripts may contain `GO` batch separators, which are a
    /// client-side construct and must be removed before submission. The
    /// other dialects accept multi-statement text as a single batch.
    pub fn split_batches(&self, script: &str) -> Vec<String> {
        match self {
            DatabaseType::SqlServer => {
                let mut batches = Vec::new();
                let mut current = String::new();
                for line in script.lines() {
                    if line.trim().eq_ignore_ascii_case("go") {
                        if !current.trim().is_empty() {
                            batches.push(current.clone());
                        }
                        current.clear();
                    } else {
                        current.push_str(line);
                        current.push('\n');
                    }
                }
                if !current.trim().is_empty() {
                    batches.push(current);
                }
                batches
            }
            DatabaseType::PostgreSql | DatabaseType::Sqlite => {
                if script.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![script.to_string()]
                }
            }
        }
    }
}
