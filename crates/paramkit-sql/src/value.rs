//! SQL argument values.
//!
//! Values are carried out-of-band as positional arguments; the builder never
//! interpolates them into statement text.

/// One positional argument for a generated statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// SQL NULL, used to clear the opposite side of a mutually exclusive
    /// column pair.
    Null,
    /// A boolean column value.
    Bool(bool),
    /// A 64-bit integer column value.
    Int(i64),
    /// A text column value.
    Text(String),
    /// An integer-array column value.
    IntList(Vec<i64>),
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value.into())
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<Vec<i64>> for SqlValue {
    fn from(value: Vec<i64>) -> Self {
        SqlValue::IntList(value)
    }
}
