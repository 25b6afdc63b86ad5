//! Chainable query cursor over one table.
//!
//! A [`Query`] collects a projection, a selector, a sort order and a row
//! window, then is consumed by exactly one terminal operation.
//!
//! # Example
//!
//! ```ignore
//! use dbx::prelude::*;
//!
//! let users: Vec<User> = db
//!     .table("user")
//!     .fields(["uid", "gid", "name"])
//!     .find([Selector::lte("uid", 5)])
//!     .sort(["-gid", "-uid"])
//!     .limit(10)
//!     .all()
//!     .await?;
//! ```

use crate::client::GenericClient;
use crate::compile::{self, InsertVerb, Statement, Window};
use crate::db::Db;
use crate::doc::IntoDoc;
use crate::error::{DbxError, DbxResult};
use crate::mapper::{self, RowMap};
use crate::record::Record;
use crate::selector::Selector;
use crate::value::FromValue;


/// A single-use query against one table.
#[must_use = "a query does nothing until a terminal operation runs"]
#[derive(Debug)]
pub struct Query<'a, C> {
    db: &'a Db<C>,
    table: String,
    fields: Vec<String>,
    selector: Vec<Selector>,
    order_by: Vec<String>,
    skip: u64,
    limit: u64,
}

impl<'a, C: GenericClient> Query<'a, C> {
    pub(crate) fn new(db: &'a Db<C>, table: String) -> Self {
        Self {
            db,
            table,
            fields: Vec::new(),
            selector: Vec::new(),
            order_by: Vec::new(),
            skip: 0,
            limit: 0,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Columns to project. Empty selects `*`.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Predicates used by the read operations, AND-ed in order.
    pub fn find(mut self, selector: impl IntoIterator<Item = Selector>) -> Self {
        self.selector = selector.into_iter().collect();
        self
    }

    /// Sort specs: `"col"` ascending, `"-col"` descending.
    pub fn sort<I, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by = specs.into_iter().map(Into::into).collect();
        self
    }

    /// Maximum rows for [`all`](Self::all) and friends. Zero means no limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Rows to skip; only applied together with a non-zero limit.
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Render the multi-row SELECT without running it.
    pub fn to_select_sql(&self) -> DbxResult<Statement> {
        self.select(Window::Page {
            skip: self.skip,
            limit: self.limit,
        })
    }

    fn select(&self, window: Window) -> DbxResult<Statement> {
        compile::build_select(
            &self.table,
            &self.fields,
            &self.selector,
            &self.order_by,
            window,
        )
    }

    async fn write(&self, verb: InsertVerb, doc: impl IntoDoc) -> DbxResult<i64> {
        let doc = doc.into_doc()?;
        let stmt = compile::build_insert(self.db.client().dialect(), verb, &self.table, &doc)?;
        Ok(self.db.exec(&stmt).await?.last_insert_id)
    }

    // ── writes ──

    /// `INSERT INTO`; returns the last insert id.
    pub async fn insert(self, doc: impl IntoDoc) -> DbxResult<i64> {
        self.write(InsertVerb::Insert, doc).await
    }

    /// `INSERT IGNORE INTO` (`INSERT OR IGNORE INTO` on SQLite); returns the
    /// last insert id.
    pub async fn insert_ignore(self, doc: impl IntoDoc) -> DbxResult<i64> {
        self.write(InsertVerb::InsertIgnore, doc).await
    }

    /// `REPLACE INTO`; returns the last insert id.
    pub async fn replace(self, doc: impl IntoDoc) -> DbxResult<i64> {
        self.write(InsertVerb::Replace, doc).await
    }

    /// `UPDATE ... SET ... WHERE selector`; returns affected rows.
    ///
    /// Uses `selector`, not the cursor's own [`find`](Self::find) predicates.
    pub async fn update(
        self,
        doc: impl IntoDoc,
        selector: impl IntoIterator<Item = Selector>,
    ) -> DbxResult<u64> {
        let doc = doc.into_doc()?;
        let selector: Vec<Selector> = selector.into_iter().collect();
        let stmt = compile::build_update(&self.table, &doc, &selector)?;
        Ok(self.db.exec(&stmt).await?.rows_affected)
    }

    /// `DELETE FROM ... WHERE selector`; returns affected rows.
    pub async fn delete(self, selector: impl IntoIterator<Item = Selector>) -> DbxResult<u64> {
        let selector: Vec<Selector> = selector.into_iter().collect();
        let stmt = compile::build_delete(&self.table, &selector)?;
        Ok(self.db.exec(&stmt).await?.rows_affected)
    }

    // ── reads ──

    /// `SELECT COUNT(*) ... WHERE selector`.
    pub async fn count(self, selector: impl IntoIterator<Item = Selector>) -> DbxResult<i64> {
        let selector: Vec<Selector> = selector.into_iter().collect();
        let stmt = compile::build_count(&self.table, &selector)?;
        let set = self.db.fetch(&stmt).await?;
        let value = set
            .rows()
            .first()
            .and_then(|row| row.get(0))
            .cloned()
            .ok_or_else(|| self.db.fail(DbxError::not_found("COUNT(*) returned no rows"), &stmt))?;
        i64::from_value(value).map_err(|e| self.db.fail(e.in_column("COUNT(*)"), &stmt))
    }

    /// First matching row as a fresh `T`.
    pub async fn one<T: Record + 'static>(self) -> DbxResult<T> {
        let mut record = T::default();
        self.one_into(&mut record).await?;
        Ok(record)
    }

    /// Bind the first matching row into `dest`.
    ///
    /// Fields whose columns are not projected keep their current values.
    /// No match is [`DbxError::NotFound`].
    pub async fn one_into<T: Record + 'static>(self, dest: &mut T) -> DbxResult<()> {
        let stmt = self.select(Window::First)?;
        let set = self.db.fetch(&stmt).await?;
        match mapper::bind_one(set, dest) {
            Err(e) if e.is_not_found() => Err(e),
            Err(e) => Err(self.db.fail(e, &stmt)),
            Ok(()) => Ok(()),
        }
    }

    /// Every matching row within the window.
    pub async fn all<T: Record + 'static>(self) -> DbxResult<Vec<T>> {
        let mut out = Vec::new();
        self.all_into(&mut out).await?;
        Ok(out)
    }

    /// Append every matching row to `dest`; returns how many were appended.
    ///
    /// On a mapping failure `dest` is left unchanged.
    pub async fn all_into<T: Record + 'static>(self, dest: &mut Vec<T>) -> DbxResult<usize> {
        let stmt = self.to_select_sql()?;
        let set = self.db.fetch(&stmt).await?;
        mapper::bind_all_into(set, dest).map_err(|e| self.db.fail(e, &stmt))
    }

    /// First matching row as a map plus the column list; `None` when nothing matched.
    pub async fn one_map(self) -> DbxResult<(Option<RowMap>, Vec<String>)> {
        let stmt = self.select(Window::First)?;
        let set = self.db.fetch(&stmt).await?;
        Ok(mapper::map_one(set))
    }

    /// Every matching row within the window as maps plus the column list.
    pub async fn all_map(self) -> DbxResult<(Vec<RowMap>, Vec<String>)> {
        let stmt = self.to_select_sql()?;
        let set = self.db.fetch(&stmt).await?;
        Ok(mapper::map_all(set))
    }
}
