//! Captured queries, their bind values and the canonical form produced by the
//! [`Normalizer`](crate::Normalizer).

use std::fmt;

/// Kind of statement, read from the first keyword of the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Select => "SELECT",
            Operation::Insert => "INSERT",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
            Operation::Other => "OTHER",
        };
        f.write_str(name)
    }
}

/// Detect the operation of a raw query from its first six bytes, ignoring ASCII case.
///
/// Leading whitespace or a leading comment is not skipped, so such queries are
/// [`Operation::Other`].
///
/// ## Example
///
/// ```rust
/// use sql_parity::{detect_operation, Operation};
///
/// assert_eq!(detect_operation("select * from users"), Operation::Select);
/// assert_eq!(detect_operation("  SELECT 1"), Operation::Other);
/// ```
pub fn detect_operation(sql: &str) -> Operation {
    let Some(prefix) = sql.as_bytes().get(..6) else {
        return Operation::Other;
    };
    match prefix.to_ascii_uppercase().as_slice() {
        b"SELECT" => Operation::Select,
        b"INSERT" => Operation::Insert,
        b"UPDATE" => Operation::Update,
        b"DELETE" => Operation::Delete,
        _ => Operation::Other,
    }
}

/// A bind value as passed alongside a query. Never normalized.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl From<bool> for BindValue {
    fn from(value: bool) -> Self {
        BindValue::Bool(value)
    }
}

impl From<i32> for BindValue {
    fn from(value: i32) -> Self {
        BindValue::Int(value.into())
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        BindValue::Int(value)
    }
}

impl From<f64> for BindValue {
    fn from(value: f64) -> Self {
        BindValue::Float(value)
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        BindValue::Text(value.to_string())
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        BindValue::Text(value)
    }
}

impl From<Vec<u8>> for BindValue {
    fn from(value: Vec<u8>) -> Self {
        BindValue::Bytes(value)
    }
}

impl<T: Into<BindValue>> From<Option<T>> for BindValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(BindValue::Null, Into::into)
    }
}

/// A query exactly as it was issued: text and ordered bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuery {
    pub sql: String,
    pub args: Vec<BindValue>,
}

impl RawQuery {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<BindValue>) -> Self {
        self.args = args;
        self
    }
}

/// Output of [`Normalizer::canonicalize`](crate::Normalizer::canonicalize).
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalQuery {
    pub raw: String,
    pub normalized: String,
    pub args: Vec<BindValue>,
    pub operation: Operation,
}

impl AsRef<str> for CanonicalQuery {
    fn as_ref(&self) -> &str {
        &self.normalized
    }
}
