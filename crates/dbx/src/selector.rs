//! Filter triples for WHERE clauses.
//!
//! A selector is an ordered list of [`Selector`] entries; the entries are
//! rendered in order and joined with `AND`.
//!
//! # Example
//! ```ignore
//! use dbx::Selector;
//!
//! let selector = vec![
//!     Selector::eq("gid", 3),
//!     Selector::lte("uid", 5),
//!     Selector::in_list("name", vec!["a", "b"])?,
//! ];
//! ```

use crate::error::{DbxError, DbxResult};
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// Comparison symbol of a selector entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Symbol {
    /// `=` (also parsed from the empty string)
    #[default]
    Eq,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `!=`
    Ne,
    /// `IN (...)`, expanded from a [`Value::List`]
    In,
}

impl Symbol {
    /// SQL text of the operator.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Symbol::Eq => "=",
            Symbol::Lt => "<",
            Symbol::Lte => "<=",
            Symbol::Gt => ">",
            Symbol::Gte => ">=",
            Symbol::Ne => "!=",
            Symbol::In => "IN",
        }
    }
}

impl FromStr for Symbol {
    type Err = DbxError;

    fn from_str(s: &str) -> DbxResult<Self> {
        match s.trim() {
            "" | "=" => Ok(Symbol::Eq),
            "<" => Ok(Symbol::Lt),
            "<=" => Ok(Symbol::Lte),
            ">" => Ok(Symbol::Gt),
            ">=" => Ok(Symbol::Gte),
            "!=" => Ok(Symbol::Ne),
            other if other.eq_ignore_ascii_case("IN") => Ok(Symbol::In),
            other => Err(DbxError::InvalidSymbol(other.to_string())),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One `(field, symbol, value)` filter triple.
///
/// Field names are raw column names and are not validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub field: String,
    pub symbol: Symbol,
    pub value: Value,
}

impl Selector {
    /// Build an entry from a textual symbol (`""`, `=`, `<`, `<=`, `>`, `>=`, `!=`, `IN`).
    ///
    /// Unknown symbols fail with [`DbxError::InvalidSymbol`]; an `IN` entry whose
    /// value is not a list of integers or strings fails with
    /// [`DbxError::UnsupportedValueType`].
    pub fn new(field: impl Into<String>, symbol: &str, value: impl Into<Value>) -> DbxResult<Self> {
        let selector = Self {
            field: field.into(),
            symbol: symbol.parse()?,
            value: value.into(),
        };
        if selector.symbol == Symbol::In {
            in_elements(&selector.field, &selector.value)?;
        }
        Ok(selector)
    }

    fn with(field: impl Into<String>, symbol: Symbol, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            symbol,
            value: value.into(),
        }
    }

    /// `field = value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with(field, Symbol::Eq, value)
    }

    /// `field != value`
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with(field, Symbol::Ne, value)
    }

    /// `field < value`
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with(field, Symbol::Lt, value)
    }

    /// `field <= value`
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with(field, Symbol::Lte, value)
    }

    /// `field > value`
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with(field, Symbol::Gt, value)
    }

    /// `field >= value`
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::with(field, Symbol::Gte, value)
    }

    /// `field IN (values...)`
    ///
    /// The values must all be `i32`, all `i64` or all strings.
    pub fn in_list<T: Into<Value>>(field: impl Into<String>, values: Vec<T>) -> DbxResult<Self> {
        let selector = Self::with(field, Symbol::In, values);
        in_elements(&selector.field, &selector.value)?;
        Ok(selector)
    }
}

/// Validate the value of an `IN` entry and return its elements.
///
/// Accepted: a list whose elements are all [`Value::Int`], all
/// [`Value::BigInt`] or all [`Value::Text`]. The empty list is accepted.
pub(crate) fn in_elements<'a>(field: &str, value: &'a Value) -> DbxResult<&'a [Value]> {
    let unsupported = |found: String| DbxError::UnsupportedValueType {
        field: field.to_string(),
        found,
    };

    let Value::List(items) = value else {
        return Err(unsupported(value.type_name().to_string()));
    };
    let Some(first) = items.first() else {
        return Ok(items);
    };
    if !matches!(first, Value::Int(_) | Value::BigInt(_) | Value::Text(_)) {
        return Err(unsupported(format!("list of {}", first.type_name())));
    }
    let kind = std::mem::discriminant(first);
    if let Some(odd) = items.iter().find(|v| std::mem::discriminant(*v) != kind) {
        return Err(unsupported(format!(
            "mixed list of {} and {}",
            first.type_name(),
            odd.type_name()
        )));
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_parse() {
        assert_eq!("".parse::<Symbol>().unwrap(), Symbol::Eq);
        assert_eq!("=".parse::<Symbol>().unwrap(), Symbol::Eq);
        assert_eq!("<=".parse::<Symbol>().unwrap(), Symbol::Lte);
        assert_eq!("!=".parse::<Symbol>().unwrap(), Symbol::Ne);
        assert_eq!("IN".parse::<Symbol>().unwrap(), Symbol::In);
        assert_eq!("in".parse::<Symbol>().unwrap(), Symbol::In);
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        let err = Selector::new("name", "LIKE", "a%").unwrap_err();
        assert!(matches!(err, DbxError::InvalidSymbol(ref s) if s == "LIKE"));
    }

    #[test]
    fn test_in_list_accepts_supported_sequences() {
        assert!(Selector::in_list("uid", vec![1i32, 2]).is_ok());
        assert!(Selector::in_list("uid", vec![1i64, 2]).is_ok());
        assert!(Selector::in_list("name", vec!["a", "b"]).is_ok());
        assert!(Selector::in_list("uid", Vec::<i64>::new()).is_ok());
    }

    #[test]
    fn test_in_list_rejects_floats() {
        let err = Selector::in_list("score", vec![1.5f64, 2.0]).unwrap_err();
        assert!(err.is_unsupported_value_type());
    }

    #[test]
    fn test_in_rejects_scalar_value() {
        let err = Selector::new("uid", "IN", 3).unwrap_err();
        assert!(err.is_unsupported_value_type());
    }

    #[test]
    fn test_in_rejects_mixed_list() {
        let value = Value::List(vec![Value::BigInt(1), Value::from("x")]);
        assert!(in_elements("uid", &value).is_err());
    }
}
