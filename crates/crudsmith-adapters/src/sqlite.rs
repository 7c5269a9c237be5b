//! SQLite schema reader using `rusqlite`.
//!
//! Metadata comes from the `pragma_table_info` and `pragma_foreign_key_list`
//! table-valued functions, so table names are bound as parameters.

use std::path::Path;

use rusqlite::{Connection, OpenFlags, types::ValueRef};
use tracing::{debug, instrument};

use crudsmith_core::{
    application::{
        ApplicationError,
        ports::{ColumnInfo, ForeignKeyInfo, SchemaReader},
    },
    error::{CrudsmithError, CrudsmithResult},
};

/// Read-only view of one SQLite database.
pub struct SqliteSchemaReader {
    connection: String,
    conn: Connection,
}

impl std::fmt::Debug for SqliteSchemaReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteSchemaReader")
            .field("connection", &self.connection)
            .finish_non_exhaustive()
    }
}

impl SqliteSchemaReader {
    /// Open an existing database file read-only.
    #[instrument(skip_all, fields(connection = %connection.as_ref(), path = %path.as_ref().display()))]
    pub fn open(connection: impl AsRef<str>, path: impl AsRef<Path>) -> CrudsmithResult<Self> {
        let name = connection.as_ref().to_owned();
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| connection_error(&name, e))?;
        debug!("database opened");
        Ok(Self::from_connection(name, conn))
    }

    /// Wrap an already open connection.
    pub fn from_connection(connection: impl Into<String>, conn: Connection) -> Self {
        Self {
            connection: connection.into(),
            conn,
        }
    }

    fn err(&self, e: rusqlite::Error) -> CrudsmithError {
        connection_error(&self.connection, e)
    }
}

fn connection_error(connection: &str, e: rusqlite::Error) -> CrudsmithError {
    ApplicationError::ConnectionError {
        connection: connection.to_owned(),
        reason: e.to_string(),
    }
    .into()
}

fn value_to_string(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(r) => Some(r.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

impl SchemaReader for SqliteSchemaReader {
    fn connection_name(&self) -> String {
        self.connection.clone()
    }

    fn table_exists(&self, table: &str) -> CrudsmithResult<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE",
                [table],
                |row| row.get(0),
            )
            .map_err(|e| self.err(e))?;
        Ok(count > 0)
    }

    fn columns(&self, table: &str) -> CrudsmithResult<Vec<ColumnInfo>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid")
            .map_err(|e| self.err(e))?;
        let rows = stmt
            .query_map([table], |row| {
                Ok(ColumnInfo {
                    name: row.get(0)?,
                    native_type: row.get(1)?,
                    nullable: row.get::<_, i64>(2)? == 0,
                    default: value_to_string(row.get_ref(3)?),
                    primary: row.get::<_, i64>(4)? > 0,
                })
            })
            .map_err(|e| self.err(e))?;

        rows.collect::<Result<Vec<_>, _>>().map_err(|e| self.err(e))
    }

    fn foreign_keys(&self, table: &str) -> CrudsmithResult<Vec<ForeignKeyInfo>> {
        let mut stmt = self
            .conn
            .prepare("SELECT \"from\", \"table\", \"to\" FROM pragma_foreign_key_list(?1) ORDER BY id, seq")
            .map_err(|e| self.err(e))?;
        let rows = stmt
            .query_map([table], |row| {
                Ok(ForeignKeyInfo {
                    column: row.get(0)?,
                    referenced_table: row.get(1)?,
                    // `to` is NULL when the constraint targets the parent's primary key.
                    referenced_column: row
                        .get::<_, Option<String>>(2)?
                        .unwrap_or_else(|| "id".to_owned()),
                })
            })
            .map_err(|e| self.err(e))?;

        rows.collect::<Result<Vec<_>, _>>().map_err(|e| self.err(e))
    }
}
