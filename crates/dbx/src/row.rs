//! Result sets returned by a [`GenericClient`](crate::GenericClient).

use crate::error::{DbxError, DbxResult};
use crate::value::{FromValue, Value};
use std::sync::Arc;

/// Fully drained query result: column names plus positional rows.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    columns: Arc<[String]>,
    rows: Vec<Row>,
}

impl ResultSet {
    /// Build a result set from column names and row values.
    ///
    /// Every row must carry exactly one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> DbxResult<Self> {
        let columns: Arc<[String]> = columns.into();
        let rows = rows
            .into_iter()
            .map(|values| {
                if values.len() != columns.len() {
                    return Err(DbxError::InvalidDestination(format!(
                        "row has {} values for {} columns",
                        values.len(),
                        columns.len()
                    )));
                }
                Ok(Row {
                    columns: Arc::clone(&columns),
                    values,
                })
            })
            .collect::<DbxResult<Vec<_>>>()?;
        Ok(Self { columns, rows })
    }

    /// Column names in projection order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One result row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consume the row into its positional values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Value at a column position.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Value of the first column with this name.
    pub fn get_by_name(&self, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.values.get(index)
    }

    /// Typed value of a named column.
    pub fn try_get<T: FromValue>(&self, column: &str) -> DbxResult<T> {
        let value = self
            .get_by_name(column)
            .ok_or_else(|| DbxError::InvalidDestination(format!("no column named '{column}'")))?;
        T::from_value(value.clone()).map_err(|e| e.in_column(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultSet {
        ResultSet::new(
            vec!["uid".into(), "name".into()],
            vec![
                vec![Value::BigInt(1), Value::from("a")],
                vec![Value::BigInt(2), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_positional_and_named_access() {
        let set = sample();
        assert_eq!(set.columns(), ["uid", "name"]);
        let row = &set.rows()[0];
        assert_eq!(row.get(0), Some(&Value::BigInt(1)));
        assert_eq!(row.get_by_name("name"), Some(&Value::from("a")));
        assert_eq!(row.try_get::<i64>("uid").unwrap(), 1);
    }

    #[test]
    fn test_try_get_reports_column() {
        let set = sample();
        let err = set.rows()[1].try_get::<String>("name").unwrap_err();
        assert!(matches!(err, DbxError::TypeMismatch { ref column, .. } if column == "name"));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = ResultSet::new(vec!["a".into()], vec![vec![]]).unwrap_err();
        assert!(matches!(err, DbxError::InvalidDestination(_)));
    }
}
