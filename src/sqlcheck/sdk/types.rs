//! SQL value and schema types
//!
//! Mirrors the native SDK's closed type enum and provides the typed value
//! representation the checkers compare. Timestamps are carried as integer
//! epoch values and dates as strings, matching what the router's getters
//! return.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Column types supported by the SQL router.
///
/// The canonical names returned by [`SqlType::name`] are the ones fixtures
/// are expected to use in `columns` entries; [`SqlType::parse`] additionally
/// accepts the aliases the fixture format has historically allowed
/// (`int`, `bigint`, `smallint`, `varchar`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    Bool,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    Date,
    Timestamp,
    String,
}

impl SqlType {
    /// Canonical type name, as used in schema diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            SqlType::Bool => "bool",
            SqlType::Int16 => "int16",
            SqlType::Int32 => "int32",
            SqlType::Int64 => "int64",
            SqlType::Float => "float",
            SqlType::Double => "double",
            SqlType::Date => "date",
            SqlType::Timestamp => "timestamp",
            SqlType::String => "string",
        }
    }

    /// Parse a fixture type token, accepting known aliases.
    pub fn parse(token: &str) -> Option<SqlType> {
        match token {
            "bool" => Some(SqlType::Bool),
            "int16" | "smallint" => Some(SqlType::Int16),
            "int32" | "int" => Some(SqlType::Int32),
            "int64" | "bigint" => Some(SqlType::Int64),
            "float" => Some(SqlType::Float),
            "double" => Some(SqlType::Double),
            "date" => Some(SqlType::Date),
            "timestamp" => Some(SqlType::Timestamp),
            "string" | "varchar" => Some(SqlType::String),
            _ => None,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed SQL value as materialized from the router or coerced from a
/// fixture literal.
///
/// Integer-family columns (int16/int32/int64, timestamp) all materialize as
/// `Int`; float and double as `Float`; date as `Str`. `Null` is the SQL NULL
/// sentinel, distinct from the empty string and from the literal text
/// `"None"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Total order used for the pre-comparison `order` sort.
    ///
    /// Values of different variants order by variant rank so the sort is
    /// always defined; floats use `total_cmp`.
    pub fn cmp_for_sort(&self, other: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Null => 0,
                Value::Bool(_) => 1,
                Value::Int(_) => 2,
                Value::Float(_) => 3,
                Value::Str(_) => 4,
            }
        }
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// One column of a result or table schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub ty: SqlType,

    /// Whether the column rejects NULL
    #[serde(default)]
    pub not_null: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: SqlType) -> Self {
        Self {
            name: name.into(),
            ty,
            not_null: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }
}

/// An ordered result/table schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    /// Index of the named column, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_parse_accepts_aliases() {
        assert_eq!(SqlType::parse("int"), Some(SqlType::Int32));
        assert_eq!(SqlType::parse("bigint"), Some(SqlType::Int64));
        assert_eq!(SqlType::parse("smallint"), Some(SqlType::Int16));
        assert_eq!(SqlType::parse("varchar"), Some(SqlType::String));
        assert_eq!(SqlType::parse("decimal"), None);
    }

    #[test]
    fn value_sort_order_is_total() {
        let mut vs = vec![
            Value::Str("b".to_string()),
            Value::Null,
            Value::Int(3),
            Value::Int(1),
            Value::Str("a".to_string()),
        ];
        vs.sort_by(|a, b| a.cmp_for_sort(b));
        assert_eq!(
            vs,
            vec![
                Value::Null,
                Value::Int(1),
                Value::Int(3),
                Value::Str("a".to_string()),
                Value::Str("b".to_string()),
            ]
        );
    }

    #[test]
    fn schema_index_lookup() {
        let schema = Schema::new(vec![
            Column::new("c1", SqlType::String),
            Column::new("c2", SqlType::Int32),
        ]);
        assert_eq!(schema.index_of("c2"), Some(1));
        assert_eq!(schema.index_of("missing"), None);
    }
}
