//! Ordered column/value pairs describing a write.
//!
//! The same [`Doc`] is used for INSERT (every element is a plain assignment)
//! and UPDATE (a field spec starting with `+` or `-` adjusts the named column
//! by the value instead of overwriting it).

use crate::error::{DbxError, DbxResult};
use crate::record::{Record, TagMap};
use crate::value::Value;

/// One `(field spec, value)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DocElem {
    pub field: String,
    pub value: Value,
}

impl DocElem {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// An ordered list of write elements.
///
/// ```ignore
/// let doc = Doc::new().set("name", "test").incr("score", 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Doc {
    elems: Vec<DocElem>,
}

impl Doc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `field = value`.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.elems.push(DocElem::new(field, value));
        self
    }

    /// Append `column = column + value` (UPDATE only; INSERT treats `+column` as a name).
    pub fn incr(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.elems.push(DocElem::new(format!("+{column}"), value));
        self
    }

    /// Append `column = column - value` (UPDATE only; INSERT treats `-column` as a name).
    pub fn decr(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.elems.push(DocElem::new(format!("-{column}"), value));
        self
    }

    /// Append an element in place.
    pub fn push(&mut self, elem: DocElem) {
        self.elems.push(elem);
    }

    pub fn elems(&self) -> &[DocElem] {
        &self.elems
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DocElem> {
        self.elems.iter()
    }
}

impl<F: Into<String>, V: Into<Value>> FromIterator<(F, V)> for Doc {
    fn from_iter<I: IntoIterator<Item = (F, V)>>(iter: I) -> Self {
        Self {
            elems: iter
                .into_iter()
                .map(|(field, value)| DocElem::new(field, value))
                .collect(),
        }
    }
}

impl<F: Into<String>, V: Into<Value>> From<Vec<(F, V)>> for Doc {
    fn from(pairs: Vec<(F, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<Vec<DocElem>> for Doc {
    fn from(elems: Vec<DocElem>) -> Self {
        Self { elems }
    }
}

impl<'a> IntoIterator for &'a Doc {
    type Item = &'a DocElem;
    type IntoIter = std::slice::Iter<'a, DocElem>;

    fn into_iter(self) -> Self::IntoIter {
        self.elems.iter()
    }
}

/// Anything that can be written as INSERT/UPDATE elements.
pub trait IntoDoc {
    fn into_doc(self) -> DbxResult<Doc>;
}

impl IntoDoc for Doc {
    fn into_doc(self) -> DbxResult<Doc> {
        Ok(self)
    }
}

impl IntoDoc for Vec<DocElem> {
    fn into_doc(self) -> DbxResult<Doc> {
        Ok(Doc::from(self))
    }
}

impl<T: Record + 'static> IntoDoc for &T {
    fn into_doc(self) -> DbxResult<Doc> {
        record_to_doc(self)
    }
}

/// Convert a record into write elements, in tag order, skipping
/// auto-generated fields.
pub fn record_to_doc<T: Record + 'static>(record: &T) -> DbxResult<Doc> {
    let map = TagMap::of::<T>();
    let mut doc = Doc::new();
    for entry in map.writable() {
        let value = record.field_value(entry.field_index).ok_or_else(|| {
            DbxError::validation(format!(
                "record has no value for tagged column '{}'",
                entry.column
            ))
        })?;
        doc.push(DocElem {
            field: entry.column.to_string(),
            value,
        });
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_order() {
        let doc = Doc::new().set("gid", 2).set("name", "test").incr("score", 5);
        let fields: Vec<_> = doc.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["gid", "name", "+score"]);
    }

    #[test]
    fn test_from_pairs() {
        let doc = Doc::from(vec![("gid", Value::from(1)), ("name", Value::from("admin1"))]);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.elems()[1].value, Value::Text("admin1".into()));
    }
}
