//! Generic client trait for unified database access.

use crate::compile::Dialect;
use crate::error::DbxResult;
use crate::row::ResultSet;
use crate::value::Value;

/// Outcome of a statement that does not return rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Number of rows changed by the statement.
    pub rows_affected: u64,
    /// Identity value assigned by the last successful INSERT on this connection.
    pub last_insert_id: i64,
}

/// The minimal capability the query builder needs from a SQL client.
///
/// Implementations own statement preparation, connection management and
/// driver dispatch. Statements use `?` as the positional placeholder and
/// `args` holds one value per placeholder, in order.
///
/// A transaction-scoped client can implement this trait as well; the builder
/// never begins or commits transactions itself.
pub trait GenericClient: Send + Sync {
    /// Run a query and drain every row.
    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = DbxResult<ResultSet>> + Send;

    /// Run a statement and report affected rows and the last insert id.
    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = DbxResult<ExecResult>> + Send;

    /// SQL flavour this client accepts. Defaults to MySQL.
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }
}

impl<C: GenericClient> GenericClient for &C {
    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = DbxResult<ResultSet>> + Send {
        (**self).query(sql, args)
    }

    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = DbxResult<ExecResult>> + Send {
        (**self).execute(sql, args)
    }

    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }
}

impl<C: GenericClient> GenericClient for std::sync::Arc<C> {
    fn query(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = DbxResult<ResultSet>> + Send {
        (**self).query(sql, args)
    }

    fn execute(
        &self,
        sql: &str,
        args: &[Value],
    ) -> impl std::future::Future<Output = DbxResult<ExecResult>> + Send {
        (**self).execute(sql, args)
    }

    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }
}
