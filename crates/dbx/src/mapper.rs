//! Row mapper: result rows into tagged records or generic maps.
//!
//! The typed path resolves the destination's [`TagMap`] once per result set
//! and builds a positional [`BindPlan`]: columns whose names are tagged are
//! bound into the matching field, every other column is consumed and
//! discarded so later columns stay aligned. The generic path keeps every
//! column.

use crate::error::{DbxError, DbxResult};
use crate::record::{Record, TagMap};
use crate::row::{ResultSet, Row};
use crate::value::Value;
use std::collections::HashMap;

/// A generic result row keyed by column name.
pub type RowMap = HashMap<String, Value>;

/// Column position → field index plan for one result set.
#[derive(Debug, Clone)]
pub struct BindPlan {
    columns: Vec<String>,
    slots: Vec<Option<usize>>,
}

impl BindPlan {
    pub fn new(map: &TagMap, columns: &[String]) -> Self {
        Self {
            columns: columns.to_vec(),
            slots: columns.iter().map(|c| map.field_for(c)).collect(),
        }
    }

    /// Number of columns that bind into a field.
    pub fn bound(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Bind one row into `dest`.
    pub fn bind<T: Record>(&self, row: Row, dest: &mut T) -> DbxResult<()> {
        let values = row.into_values();
        if values.len() != self.slots.len() {
            return Err(DbxError::InvalidDestination(format!(
                "row has {} values for {} planned columns",
                values.len(),
                self.slots.len()
            )));
        }
        for ((slot, column), value) in self.slots.iter().zip(&self.columns).zip(values) {
            let Some(field_index) = *slot else {
                continue;
            };
            dest.set_field(field_index, value)
                .map_err(|e| e.in_column(column))?;
        }
        Ok(())
    }
}

fn plan_for<T: Record + 'static>(set: &ResultSet) -> BindPlan {
    BindPlan::new(&TagMap::of::<T>(), set.columns())
}

/// Bind the first row into `dest`; zero rows is [`DbxError::NotFound`].
pub fn bind_one<T: Record + 'static>(set: ResultSet, dest: &mut T) -> DbxResult<()> {
    let plan = plan_for::<T>(&set);
    let row = set
        .into_rows()
        .into_iter()
        .next()
        .ok_or_else(|| DbxError::not_found("no rows in result set"))?;
    plan.bind(row, dest)
}

/// Materialize every row as a fresh `T`.
pub fn bind_all<T: Record + 'static>(set: ResultSet) -> DbxResult<Vec<T>> {
    let plan = plan_for::<T>(&set);
    set.into_rows()
        .into_iter()
        .map(|row| {
            let mut record = T::default();
            plan.bind(row, &mut record)?;
            Ok(record)
        })
        .collect()
}

/// Append every row to `dest`, returning how many were appended.
///
/// Either every row is appended or, on the first failure, none are.
pub fn bind_all_into<T: Record + 'static>(set: ResultSet, dest: &mut Vec<T>) -> DbxResult<usize> {
    let records = bind_all(set)?;
    let count = records.len();
    dest.extend(records);
    Ok(count)
}

/// Every column of a row, keyed by name.
pub fn map_row(row: Row) -> RowMap {
    let columns = row.columns().to_vec();
    columns.into_iter().zip(row.into_values()).collect()
}

/// First row as a map (absent when there are no rows) plus the column list.
pub fn map_one(set: ResultSet) -> (Option<RowMap>, Vec<String>) {
    let columns = set.columns().to_vec();
    let row = set.into_rows().into_iter().next().map(map_row);
    (row, columns)
}

/// Every row as a map plus the column list.
pub fn map_all(set: ResultSet) -> (Vec<RowMap>, Vec<String>) {
    let columns = set.columns().to_vec();
    let rows = set.into_rows().into_iter().map(map_row).collect();
    (rows, columns)
}
