//! Selector/update compiler.
//!
//! Pure functions that turn selectors, write elements, projections, sort
//! specs and pagination into SQL fragments with `?` placeholders. Every
//! function that produces placeholders returns its arguments in the order the
//! placeholders appear. Nothing here touches a connection.

use crate::doc::{Doc, DocElem};
use crate::error::{DbxError, DbxResult};
use crate::selector::{Selector, Symbol, in_elements};
use crate::value::Value;

/// A rendered SQL fragment plus its positional arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Fragment {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// A complete statement ready to hand to a client.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

/// Rendered INSERT column and placeholder lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertFragment {
    /// `` `a`, `b` ``
    pub columns: String,
    /// `?, ?`
    pub placeholders: String,
    pub args: Vec<Value>,
}

/// Verb used by the insert family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertVerb {
    Insert,
    InsertIgnore,
    Replace,
}

impl InsertVerb {
    /// Statement prefix for `dialect`.
    pub fn as_sql(&self, dialect: Dialect) -> &'static str {
        match (self, dialect) {
            (InsertVerb::Insert, _) => "INSERT INTO",
            (InsertVerb::InsertIgnore, Dialect::MySql) => "INSERT IGNORE INTO",
            (InsertVerb::InsertIgnore, Dialect::Sqlite) => "INSERT OR IGNORE INTO",
            (InsertVerb::Replace, _) => "REPLACE INTO",
        }
    }
}

/// SQL flavour spoken by a client.
///
/// Only the insert family differs; everything else renders identically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    #[default]
    MySql,
    Sqlite,
}

/// Backtick-quote an identifier. No escaping or validation is performed.
pub fn quote_ident(name: &str) -> String {
    format!("`{name}`")
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Render a projection list; empty means `*`.
pub fn render_fields<S: AsRef<str>>(names: &[S]) -> String {
    if names.is_empty() {
        return "*".to_string();
    }
    names
        .iter()
        .map(|name| quote_ident(&strip_whitespace(name.as_ref())))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render ` ORDER BY ...`; a leading `-` sorts descending.
///
/// Returns an empty string when no spec survives whitespace stripping.
pub fn render_order_by<S: AsRef<str>>(specs: &[S]) -> String {
    let terms: Vec<String> = specs
        .iter()
        .map(|spec| strip_whitespace(spec.as_ref()))
        .filter(|spec| !spec.is_empty())
        .map(|spec| match spec.strip_prefix('-') {
            Some(column) => format!("{} DESC", quote_ident(column)),
            None => format!("{} ASC", quote_ident(&spec)),
        })
        .collect();

    if terms.is_empty() {
        String::new()
    } else {
        format!(" ORDER BY {}", terms.join(","))
    }
}

/// Render ` LIMIT skip,limit`; nothing at all when `limit` is zero.
pub fn render_limit(skip: u64, limit: u64) -> String {
    if limit == 0 {
        String::new()
    } else {
        format!(" LIMIT {skip},{limit}")
    }
}

/// Render ` WHERE ...` from a selector.
///
/// Entries are joined with `AND` in order. An `IN` entry over an empty list
/// contributes no predicate; if no predicate is left, no `WHERE` is emitted.
/// An `IN` entry whose value is not a list of integers or strings aborts with
/// [`DbxError::UnsupportedValueType`].
pub fn render_where(selector: &[Selector]) -> DbxResult<Fragment> {
    let mut predicates = Vec::with_capacity(selector.len());
    let mut args = Vec::with_capacity(selector.len());

    for entry in selector {
        let column = quote_ident(&entry.field);
        match entry.symbol {
            Symbol::In => {
                let items = in_elements(&entry.field, &entry.value)?;
                if items.is_empty() {
                    continue;
                }
                let marks = vec!["?"; items.len()].join(",");
                predicates.push(format!("{column} IN ({marks})"));
                args.extend(items.iter().cloned());
            }
            symbol => {
                predicates.push(format!("{column} {} ?", symbol.as_sql()));
                args.push(entry.value.clone());
            }
        }
    }

    if predicates.is_empty() {
        return Ok(Fragment::default());
    }

    Ok(Fragment {
        sql: format!(" WHERE {}", predicates.join(" AND ")),
        args,
    })
}

fn check_field(elem: &DocElem) -> DbxResult<()> {
    if elem.field.is_empty() {
        return Err(DbxError::validation("write element has an empty field spec"));
    }
    Ok(())
}

/// Render the column and placeholder lists of an INSERT.
pub fn render_insert(doc: &Doc) -> DbxResult<InsertFragment> {
    if doc.is_empty() {
        return Err(DbxError::validation("INSERT requires at least one element"));
    }

    let mut columns = Vec::with_capacity(doc.len());
    let mut args = Vec::with_capacity(doc.len());
    for elem in doc {
        check_field(elem)?;
        columns.push(quote_ident(&elem.field));
        args.push(elem.value.clone());
    }

    Ok(InsertFragment {
        columns: columns.join(", "),
        placeholders: vec!["?"; args.len()].join(", "),
        args,
    })
}

/// Render the SET list of an UPDATE.
///
/// `+col` renders `` `col`=`col`+? ``, `-col` renders `` `col`=`col`-? ``,
/// anything else renders `` `field`=? ``.
pub fn render_update_set(doc: &Doc) -> DbxResult<Fragment> {
    if doc.is_empty() {
        return Err(DbxError::validation("UPDATE requires at least one element"));
    }

    let mut sets = Vec::with_capacity(doc.len());
    let mut args = Vec::with_capacity(doc.len());
    for elem in doc {
        check_field(elem)?;
        let (op, column) = if let Some(column) = elem.field.strip_prefix('+') {
            (Some('+'), column)
        } else if let Some(column) = elem.field.strip_prefix('-') {
            (Some('-'), column)
        } else {
            (None, elem.field.as_str())
        };
        match op {
            Some(_) if column.is_empty() => {
                return Err(DbxError::validation(format!(
                    "field spec '{}' names no column",
                    elem.field
                )));
            }
            Some(op) => {
                let column = quote_ident(column);
                sets.push(format!("{column}={column}{op}?"));
            }
            None => sets.push(format!("{}=?", quote_ident(column))),
        }
        args.push(elem.value.clone());
    }

    Ok(Fragment {
        sql: sets.join(", "),
        args,
    })
}

/// `INSERT INTO `t`(...) VALUES (...)` and its siblings.
pub fn build_insert(
    dialect: Dialect,
    verb: InsertVerb,
    table: &str,
    doc: &Doc,
) -> DbxResult<Statement> {
    let insert = render_insert(doc)?;
    let sql = format!(
        "{} {}({}) VALUES ({})",
        verb.as_sql(dialect),
        quote_ident(table),
        insert.columns,
        insert.placeholders
    );
    Ok(Statement::new(sql, insert.args))
}

/// `UPDATE `t` SET ... WHERE ...`
pub fn build_update(table: &str, doc: &Doc, selector: &[Selector]) -> DbxResult<Statement> {
    let set = render_update_set(doc)?;
    let filter = render_where(selector)?;
    let sql = format!("UPDATE {} SET {}{}", quote_ident(table), set.sql, filter.sql);
    let mut args = set.args;
    args.extend(filter.args);
    Ok(Statement::new(sql, args))
}

/// `DELETE FROM `t` WHERE ...`
pub fn build_delete(table: &str, selector: &[Selector]) -> DbxResult<Statement> {
    let filter = render_where(selector)?;
    let sql = format!("DELETE FROM {}{}", quote_ident(table), filter.sql);
    Ok(Statement::new(sql, filter.args))
}

/// `SELECT COUNT(*) FROM `t` WHERE ...`
pub fn build_count(table: &str, selector: &[Selector]) -> DbxResult<Statement> {
    let filter = render_where(selector)?;
    let sql = format!("SELECT COUNT(*) FROM {}{}", quote_ident(table), filter.sql);
    Ok(Statement::new(sql, filter.args))
}

/// Row window of a SELECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// `LIMIT 1`, skip ignored
    First,
    /// `LIMIT skip,limit` when `limit > 0`
    Page { skip: u64, limit: u64 },
}

/// `SELECT fields FROM `t` WHERE ... ORDER BY ... LIMIT ...`
pub fn build_select<S: AsRef<str>, O: AsRef<str>>(
    table: &str,
    fields: &[S],
    selector: &[Selector],
    order_by: &[O],
    window: Window,
) -> DbxResult<Statement> {
    let filter = render_where(selector)?;
    let limit = match window {
        Window::First => " LIMIT 1".to_string(),
        Window::Page { skip, limit } => render_limit(skip, limit),
    };
    let sql = format!(
        "SELECT {} FROM {}{}{}{}",
        render_fields(fields),
        quote_ident(table),
        filter.sql,
        render_order_by(order_by),
        limit
    );
    Ok(Statement::new(sql, filter.args))
}

#[cfg(test)]
mod tests;
