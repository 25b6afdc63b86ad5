//! Tagged records and the field tag resolver.
//!
//! A [`Record`] exposes a declaration-ordered table of [`FieldTag`]s, normally
//! generated by `#[derive(Record)]`:
//!
//! ```ignore
//! use dbx::Record;
//!
//! #[derive(Debug, Default, Record)]
//! struct User {
//!     #[dbx("uid,auto_increment")]
//!     uid: i64,
//!     #[dbx("gid")]
//!     gid: i64,
//!     #[dbx(column = "name")]
//!     name: String,
//!     // no tag: never read, never written
//!     cached_label: Option<String>,
//! }
//! ```
//!
//! [`TagMap`] turns that table into the column lookup used by the row mapper
//! and the write-element conversion.

use crate::error::DbxResult;
use crate::value::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

/// Column metadata declared on one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTag {
    /// Column name the field maps to.
    pub column: &'static str,
    /// Database-assigned column: read from results, never written.
    pub auto_generated: bool,
}

impl FieldTag {
    pub const fn new(column: &'static str, auto_generated: bool) -> Self {
        Self {
            column,
            auto_generated,
        }
    }
}

/// A struct whose tagged fields map to result columns.
///
/// Indices passed to [`Record::set_field`] and [`Record::field_value`] are
/// positions in [`Record::field_tags`]. Fields without a tag are absent from
/// the table and keep their `Default` value when a record is read.
pub trait Record: Default {
    /// Declaration-ordered tag table.
    fn field_tags() -> &'static [FieldTag];

    /// Bind a scanned value into the field at `index`.
    ///
    /// Returns [`DbxError::InvalidDestination`](crate::DbxError::InvalidDestination)
    /// for an index outside the tag table and
    /// [`DbxError::TypeMismatch`](crate::DbxError::TypeMismatch) when the value
    /// does not convert into the field type.
    fn set_field(&mut self, index: usize, value: Value) -> DbxResult<()>;

    /// Current value of the field at `index`, or `None` outside the tag table.
    fn field_value(&self, index: usize) -> Option<Value>;
}

/// One resolved tag entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagEntry {
    pub column: &'static str,
    pub auto_generated: bool,
    /// Position of the field in [`Record::field_tags`].
    pub field_index: usize,
}

/// Resolved column mapping of a record type.
#[derive(Debug, Clone, Default)]
pub struct TagMap {
    entries: Vec<TagEntry>,
    by_column: HashMap<&'static str, usize>,
}

impl TagMap {
    /// Resolve a tag table.
    ///
    /// When two fields declare the same column the first-declared one wins;
    /// the later field is dropped from both reading and writing.
    pub fn from_tags(tags: &'static [FieldTag]) -> Self {
        let mut entries = Vec::with_capacity(tags.len());
        let mut by_column = HashMap::with_capacity(tags.len());

        for (field_index, tag) in tags.iter().enumerate() {
            if by_column.contains_key(tag.column) {
                tracing::warn!(
                    target: "dbx.record",
                    column = tag.column,
                    field_index,
                    "duplicate column tag ignored"
                );
                continue;
            }
            by_column.insert(tag.column, field_index);
            entries.push(TagEntry {
                column: tag.column,
                auto_generated: tag.auto_generated,
                field_index,
            });
        }

        Self { entries, by_column }
    }

    /// Resolve (and cache) the mapping of `T`.
    pub fn of<T: Record + 'static>() -> Arc<TagMap> {
        static CACHE: OnceLock<RwLock<HashMap<TypeId, Arc<TagMap>>>> = OnceLock::new();

        let cache = CACHE.get_or_init(|| RwLock::new(HashMap::new()));
        let key = TypeId::of::<T>();

        if let Ok(guard) = cache.read() {
            if let Some(map) = guard.get(&key) {
                return Arc::clone(map);
            }
        }

        let map = Arc::new(Self::from_tags(T::field_tags()));
        if let Ok(mut guard) = cache.write() {
            guard.entry(key).or_insert_with(|| Arc::clone(&map));
        }
        map
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    /// Entries that take part in INSERT/UPDATE.
    pub fn writable(&self) -> impl Iterator<Item = &TagEntry> {
        self.entries.iter().filter(|e| !e.auto_generated)
    }

    /// Field index bound to `column`, if any.
    pub fn field_for(&self, column: &str) -> Option<usize> {
        self.by_column.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
