//! SQLite adapter for [`GenericClient`] built on `rusqlite`.
//!
//! The connection sits behind a mutex; each call runs on tokio's blocking
//! pool and goes through the connection's prepared-statement cache.

use crate::client::{ExecResult, GenericClient};
use crate::compile::Dialect;
use crate::error::{DbxError, DbxResult};
use crate::row::ResultSet;
use crate::value::{TIMESTAMP_FORMAT, Value};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// A shared SQLite connection.
#[derive(Clone)]
pub struct SqliteClient {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteClient").finish_non_exhaustive()
    }
}

impl SqliteClient {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> DbxResult<Self> {
        Ok(Self::from_connection(Connection::open(path)?))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> DbxResult<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    /// Wrap an already configured connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run one or more `;`-separated statements without arguments (DDL, setup).
    pub async fn execute_batch(&self, sql: &str) -> DbxResult<()> {
        let sql = sql.to_string();
        self.run(move |conn| conn.execute_batch(&sql).map_err(DbxError::from))
            .await
    }

    async fn run<T, F>(&self, f: F) -> DbxResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> DbxResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| DbxError::client("sqlite connection mutex poisoned"))?;
            f(&guard)
        })
        .await?
    }
}

fn query_blocking(conn: &Connection, sql: &str, args: &[Value]) -> DbxResult<ResultSet> {
    let mut stmt = conn.prepare_cached(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query(params_from_iter(args.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            values.push(from_sqlite(row.get_ref(index)?));
        }
        out.push(values);
    }
    ResultSet::new(columns, out)
}

fn execute_blocking(conn: &Connection, sql: &str, args: &[Value]) -> DbxResult<ExecResult> {
    let mut stmt = conn.prepare_cached(sql)?;
    let affected = stmt.execute(params_from_iter(args.iter()))?;
    Ok(ExecResult {
        rows_affected: affected as u64,
        last_insert_id: conn.last_insert_rowid(),
    })
}

fn from_sqlite(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::BigInt(i),
        ValueRef::Real(x) => Value::Float(x),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Bytes(bytes.to_vec()),
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Int(i) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*i))),
            Value::BigInt(i) => ToSqlOutput::Owned(SqlValue::Integer(*i)),
            Value::Float(x) => ToSqlOutput::Owned(SqlValue::Real(*x)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Bytes(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
            Value::Timestamp(ts) => {
                ToSqlOutput::Owned(SqlValue::Text(ts.format(TIMESTAMP_FORMAT).to_string()))
            }
            Value::List(_) => {
                return Err(rusqlite::Error::ToSqlConversionFailure(Box::new(
                    DbxError::validation("a list value cannot be bound to a single placeholder"),
                )));
            }
        })
    }
}

impl GenericClient for SqliteClient {
    async fn query(&self, sql: &str, args: &[Value]) -> DbxResult<ResultSet> {
        let sql = sql.to_string();
        let args = args.to_vec();
        self.run(move |conn| query_blocking(conn, &sql, &args)).await
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> DbxResult<ExecResult> {
        let sql = sql.to_string();
        let args = args.to_vec();
        self.run(move |conn| execute_blocking(conn, &sql, &args)).await
    }

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }
}
