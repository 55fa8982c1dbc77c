//! Materialized query outcomes
//!
//! [`QueryResult`] is what the checkers compare against: a success flag, a
//! row count, the materialized rows and the result schema. It is built
//! either from a live [`ResultSet`] cursor or deserialized from a recorded
//! YAML/JSON dump for offline checking.

use super::error::{CheckError, CheckResult};
use crate::sqlcheck::sdk::router::ResultSet;
use crate::sqlcheck::sdk::types::{Schema, SqlType, Value};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Outcome of one statement execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    /// Whether execution succeeded
    pub ok: bool,

    /// Row count reported by the engine
    #[serde(default)]
    pub count: i64,

    /// Materialized rows
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,

    /// Result schema, ordered
    #[serde(default)]
    pub schema: Schema,

    /// Engine error message when `ok` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    /// Successful outcome with no result set (DDL, inserts).
    pub fn empty_success() -> Self {
        Self {
            ok: true,
            ..Default::default()
        }
    }

    /// Failed outcome carrying the engine's message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Materialize a result cursor into rows.
    ///
    /// Each cell is read through the getter matching its schema type, with
    /// NULL checked first, mirroring the native cursor protocol.
    pub fn from_result_set(mut rs: Box<dyn ResultSet>) -> CheckResult<Self> {
        let schema = rs.schema().clone();
        let count = rs.size() as i64;
        let mut rows = Vec::with_capacity(rs.size());
        while rs.next() {
            let mut row = Vec::with_capacity(schema.column_count());
            for (i, column) in schema.columns.iter().enumerate() {
                if rs.is_null(i) {
                    row.push(Value::Null);
                    continue;
                }
                let value = match column.ty {
                    SqlType::Bool => Value::Bool(rs.get_bool(i)?),
                    SqlType::Int16 => Value::Int(rs.get_int16(i)? as i64),
                    SqlType::Int32 => Value::Int(rs.get_int32(i)? as i64),
                    SqlType::Int64 => Value::Int(rs.get_int64(i)?),
                    SqlType::Float => Value::Float(rs.get_float(i)? as f64),
                    SqlType::Double => Value::Float(rs.get_double(i)?),
                    SqlType::String => Value::Str(rs.get_string(i)?),
                    SqlType::Date => Value::Str(rs.get_date_string(i)?),
                    SqlType::Timestamp => Value::Int(rs.get_timestamp(i)?),
                };
                row.push(value);
            }
            rows.push(row);
        }
        Ok(Self {
            ok: true,
            count,
            rows,
            schema,
            error: None,
        })
    }

    /// Load a recorded result dump from YAML on disk.
    pub fn from_file(path: impl AsRef<Path>) -> CheckResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CheckError::Io {
            message: e.to_string(),
            path: path.display().to_string(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| CheckError::CaseParse {
            message: e.to_string(),
            file: path.display().to_string(),
        })
    }
}
