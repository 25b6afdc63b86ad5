//! Dynamic values carried through selectors, write elements and generic rows.
//!
//! [`Value`] is a closed set of scalar kinds plus [`Value::List`], which only
//! has meaning as the right-hand side of an `IN` selector. [`ToValue`] and
//! [`FromValue`] bridge Rust field types and `Value` for record mapping.

use crate::error::{DbxError, DbxResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Layout used when a timestamp travels as text. Fractional seconds are
/// printed only when present.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A dynamically typed SQL value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL
    Null,
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    BigInt(i64),
    /// Floating point number
    Float(f64),
    /// Text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Timestamp without time zone
    Timestamp(NaiveDateTime),
    /// Ordered sequence, used by `IN` selectors
    List(Vec<Value>),
}

impl Value {
    /// Wrap raw bytes.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(bytes.into())
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "int",
            Value::BigInt(_) => "bigint",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Timestamp(_) => "timestamp",
            Value::List(_) => "list",
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string slice if this is [`Value::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is [`Value::Int`] or [`Value::BigInt`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(i64::from(*i)),
            Value::BigInt(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Int(i) => write!(f, "{i}"),
            Value::BigInt(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            Value::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::BigInt(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Int(i32::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v.naive_utc())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

/// Borrowing conversion from a record field into a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

macro_rules! to_value_via_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::from(self.clone())
                }
            }
        )*
    };
}

to_value_via_from!(i32, i64, u32, f64, bool, String, NaiveDateTime, DateTime<Utc>);

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToValue::to_value)
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

/// Conversion from a scanned column [`Value`] into a record field type.
///
/// Mismatches are reported as [`DbxError::TypeMismatch`] with an empty column
/// name; the row mapper fills in the column it was binding.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> DbxResult<Self>;
}

fn mismatch(expected: &'static str, value: &Value) -> DbxError {
    DbxError::type_mismatch("", expected, value.type_name())
}

impl FromValue for Value {
    fn from_value(value: Value) -> DbxResult<Self> {
        Ok(value)
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> DbxResult<Self> {
        match value {
            Value::Int(i) => Ok(i64::from(i)),
            Value::BigInt(i) => Ok(i),
            Value::Text(ref s) => s.trim().parse().map_err(|_| mismatch("i64", &value)),
            other => Err(mismatch("i64", &other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> DbxResult<Self> {
        let found = value.type_name();
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|_| {
            DbxError::type_mismatch("", "i32", format!("{found} {wide} out of range"))
        })
    }
}

impl FromValue for u32 {
    fn from_value(value: Value) -> DbxResult<Self> {
        let found = value.type_name();
        let wide = i64::from_value(value)?;
        u32::try_from(wide).map_err(|_| {
            DbxError::type_mismatch("", "u32", format!("{found} {wide} out of range"))
        })
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> DbxResult<Self> {
        match value {
            Value::Float(x) => Ok(x),
            Value::Int(i) => Ok(f64::from(i)),
            Value::BigInt(i) => Ok(i as f64),
            Value::Text(ref s) => s.trim().parse().map_err(|_| mismatch("f64", &value)),
            other => Err(mismatch("f64", &other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> DbxResult<Self> {
        match value {
            Value::Int(i) => Ok(i != 0),
            Value::BigInt(i) => Ok(i != 0),
            Value::Text(ref s) => match s.trim() {
                "1" | "true" | "TRUE" => Ok(true),
                "0" | "false" | "FALSE" => Ok(false),
                _ => Err(mismatch("bool", &value)),
            },
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> DbxResult<Self> {
        match value {
            Value::Text(s) => Ok(s),
            Value::Int(i) => Ok(i.to_string()),
            Value::BigInt(i) => Ok(i.to_string()),
            Value::Float(x) => Ok(x.to_string()),
            Value::Timestamp(ts) => Ok(ts.format(TIMESTAMP_FORMAT).to_string()),
            Value::Bytes(b) => {
                String::from_utf8(b).map_err(|_| DbxError::type_mismatch("", "String", "non-utf8 bytes"))
            }
            other => Err(mismatch("String", &other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> DbxResult<Self> {
        match value {
            Value::Bytes(b) => Ok(b),
            Value::Text(s) => Ok(s.into_bytes()),
            other => Err(mismatch("Vec<u8>", &other)),
        }
    }
}

/// Parse the textual timestamp layouts SQL engines commonly return.
pub(crate) fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> DbxResult<Self> {
        match value {
            Value::Timestamp(ts) => Ok(ts),
            Value::Text(ref s) => parse_timestamp(s).ok_or_else(|| {
                DbxError::type_mismatch("", "NaiveDateTime", format!("text {s:?}"))
            }),
            other => Err(mismatch("NaiveDateTime", &other)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> DbxResult<Self> {
        NaiveDateTime::from_value(value).map(|naive| naive.and_utc())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> DbxResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(8, 5, 7)
            .unwrap()
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from(7i32), Value::Int(7));
        assert_eq!(Value::from(7i64), Value::BigInt(7));
        assert_eq!(Value::from("a"), Value::Text("a".into()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(
            Value::from(vec![1i64, 2]),
            Value::List(vec![Value::BigInt(1), Value::BigInt(2)])
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Timestamp(ts()).to_string(), "2024-03-09 08:05:07");
        let fine = ts() + chrono::Duration::milliseconds(250);
        assert_eq!(Value::Timestamp(fine).to_string(), "2024-03-09 08:05:07.250");
        assert_eq!(Value::from(vec![1, 2, 3]).to_string(), "[1 2 3]");
    }

    #[test]
    fn test_integer_widening_and_narrowing() {
        assert_eq!(i64::from_value(Value::Int(5)).unwrap(), 5);
        assert_eq!(i32::from_value(Value::BigInt(5)).unwrap(), 5);
        let err = i32::from_value(Value::BigInt(i64::MAX)).unwrap_err();
        assert!(matches!(err, DbxError::TypeMismatch { expected: "i32", .. }));
    }

    #[test]
    fn test_unsigned_range_checked() {
        assert_eq!(Value::from(u32::MAX), Value::BigInt(4_294_967_295));
        assert_eq!(7u32.to_value(), Value::BigInt(7));
        assert_eq!(u32::from_value(Value::Int(7)).unwrap(), 7);
        assert_eq!(u32::from_value(Value::BigInt(4_294_967_295)).unwrap(), u32::MAX);
        assert_eq!(u32::from_value(Value::from(" 12 ")).unwrap(), 12);

        let err = u32::from_value(Value::Int(-1)).unwrap_err();
        assert!(matches!(
            err,
            DbxError::TypeMismatch { expected: "u32", ref found, .. } if found == "int -1 out of range"
        ));
        let err = u32::from_value(Value::BigInt(1 << 32)).unwrap_err();
        assert!(matches!(err, DbxError::TypeMismatch { expected: "u32", .. }));
    }

    #[test]
    fn test_null_into_non_option_is_mismatch() {
        let err = i64::from_value(Value::Null).unwrap_err();
        assert!(matches!(err, DbxError::TypeMismatch { ref found, .. } if found == "null"));
        assert_eq!(Option::<i64>::from_value(Value::Null).unwrap(), None);
    }

    #[test]
    fn test_timestamp_from_text() {
        let parsed = NaiveDateTime::from_value(Value::from("2024-03-09 08:05:07")).unwrap();
        assert_eq!(parsed, ts());
        let parsed = NaiveDateTime::from_value(Value::from("2024-03-09T08:05:07Z")).unwrap();
        assert_eq!(parsed, ts());
        assert!(NaiveDateTime::from_value(Value::from("yesterday")).is_err());
    }

    #[test]
    fn test_to_value_option() {
        assert_eq!(Some(3i64).to_value(), Value::BigInt(3));
        assert_eq!(None::<String>.to_value(), Value::Null);
        assert_eq!("x".to_value(), Value::Text("x".into()));
    }

    #[test]
    fn test_serialize_untagged() {
        let json = serde_json::to_string(&vec![
            Value::BigInt(1),
            Value::from("a"),
            Value::Null,
        ])
        .unwrap();
        assert_eq!(json, r#"[1,"a",null]"#);
    }
}
