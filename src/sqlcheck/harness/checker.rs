//! Expectation checkers
//!
//! The checker set is closed: rows, columns, count and success, dispatched
//! through a single `validate` entry point. The factory emits one checker
//! per recognized key present in the expectation and rejects anything else,
//! so fixture typos fail before any comparison runs. `order` is consumed by
//! the rows check as a pre-comparison sort key.

use super::case::{split_column, Expectation};
use super::error::{CheckError, CheckResult};
use super::result::QueryResult;
use crate::sqlcheck::sdk::types::{SqlType, Value};

/// A single-purpose validator over one aspect of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checker {
    Rows,
    Columns,
    Count,
    Success,
}

impl Checker {
    /// Name used in diagnostics and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Checker::Rows => "rows",
            Checker::Columns => "columns",
            Checker::Count => "count",
            Checker::Success => "success",
        }
    }

    /// Run this checker against an expectation/result pair.
    pub fn validate(&self, expect: &Expectation, actual: &QueryResult) -> CheckResult<()> {
        match self {
            Checker::Rows => check_rows(expect, actual),
            Checker::Columns => check_columns(expect, actual),
            Checker::Count => check_count(expect, actual),
            Checker::Success => check_success(expect, actual),
        }
    }
}

/// Build the checker list for an expectation.
///
/// Emits one checker per present key in a fixed order (rows, columns,
/// count, success) and skips `order`. Any unrecognized key is a schema
/// error, raised before any comparison.
pub fn build_checkers(expect: &Expectation) -> CheckResult<Vec<Checker>> {
    if let Some(key) = expect.unknown.keys().next() {
        return Err(CheckError::UnknownChecker { key: key.clone() });
    }
    let mut checkers = Vec::new();
    if expect.rows.is_some() {
        checkers.push(Checker::Rows);
    }
    if expect.columns.is_some() {
        checkers.push(Checker::Columns);
    }
    if expect.count.is_some() {
        checkers.push(Checker::Count);
    }
    if expect.success.is_some() {
        checkers.push(Checker::Success);
    }
    Ok(checkers)
}

/// Build and run all checkers for an expectation, fail-fast.
pub fn run_checks(expect: &Expectation, actual: &QueryResult) -> CheckResult<()> {
    for checker in build_checkers(expect)? {
        log::info!("running {} check", checker.name());
        checker.validate(expect, actual)?;
    }
    Ok(())
}

fn check_rows(expect: &Expectation, actual: &QueryResult) -> CheckResult<()> {
    let Some(expected_rows) = expect.rows.as_ref() else {
        return Ok(());
    };
    if expected_rows.len() != actual.rows.len() {
        return Err(CheckError::CheckFailed {
            check: "rows".to_string(),
            expected: expected_rows.len().to_string(),
            actual: actual.rows.len().to_string(),
            message: "row count mismatch".to_string(),
        });
    }

    let mut expected = coerce_rows(expected_rows, expect.columns.as_deref())?;
    let mut actual_rows = actual.rows.clone();

    if let Some(order) = expect.order.as_deref().filter(|o| !o.is_empty()) {
        let idx = actual
            .schema
            .index_of(order)
            .ok_or_else(|| CheckError::MalformedColumn {
                column: format!("order column '{}' not in result schema", order),
            })?;
        let key = |row: &Vec<Value>| row.get(idx).cloned().unwrap_or(Value::Null);
        expected.sort_by(|a, b| key(a).cmp_for_sort(&key(b)));
        actual_rows.sort_by(|a, b| key(a).cmp_for_sort(&key(b)));
        log::debug!("sorted expected by '{}': {:?}", order, expected);
        log::debug!("sorted actual by '{}': {:?}", order, actual_rows);
    }

    for (i, (exp, act)) in expected.iter().zip(actual_rows.iter()).enumerate() {
        if exp != act {
            return Err(CheckError::CheckFailed {
                check: "rows".to_string(),
                expected: format_row(exp),
                actual: format_row(act),
                message: format!("row {} mismatch", i),
            });
        }
    }
    Ok(())
}

fn check_columns(expect: &Expectation, actual: &QueryResult) -> CheckResult<()> {
    let Some(expected) = expect.columns.as_ref() else {
        return Ok(());
    };
    if expected.len() != actual.schema.column_count() {
        return Err(CheckError::CheckFailed {
            check: "columns".to_string(),
            expected: expected.len().to_string(),
            actual: actual.schema.column_count().to_string(),
            message: "column count mismatch".to_string(),
        });
    }
    for (i, (expected_column, column)) in
        expected.iter().zip(actual.schema.columns.iter()).enumerate()
    {
        let actual_desc = format!("{} {}", column.name, column.ty.name());
        if actual_desc != canonical_column(expected_column)? {
            return Err(CheckError::CheckFailed {
                check: "columns".to_string(),
                expected: expected_column.clone(),
                actual: actual_desc,
                message: format!("column {} mismatch", i),
            });
        }
    }
    Ok(())
}

fn check_count(expect: &Expectation, actual: &QueryResult) -> CheckResult<()> {
    let Some(expected) = expect.count else {
        return Ok(());
    };
    if actual.count != expected {
        return Err(CheckError::CheckFailed {
            check: "count".to_string(),
            expected: expected.to_string(),
            actual: actual.count.to_string(),
            message: "row count mismatch".to_string(),
        });
    }
    Ok(())
}

fn check_success(expect: &Expectation, actual: &QueryResult) -> CheckResult<()> {
    let Some(expected) = expect.success else {
        return Ok(());
    };
    if actual.ok != expected {
        return Err(CheckError::CheckFailed {
            check: "success".to_string(),
            expected: expected.to_string(),
            actual: actual.ok.to_string(),
            message: "success flag mismatch".to_string(),
        });
    }
    Ok(())
}

/// Convert fixture rows into typed values.
///
/// With a column list, each cell's string form is coerced per the declared
/// type; without one, YAML scalars map directly onto their natural typed
/// value.
fn coerce_rows(
    rows: &[Vec<serde_yaml::Value>],
    columns: Option<&[String]>,
) -> CheckResult<Vec<Vec<Value>>> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let mut converted = Vec::with_capacity(row.len());
        for (i, cell) in row.iter().enumerate() {
            let value = match columns.filter(|c| !c.is_empty()) {
                Some(columns) => {
                    let column = columns.get(i).ok_or_else(|| CheckError::MalformedColumn {
                        column: format!("no column declared for cell index {}", i),
                    })?;
                    coerce_cell(cell, column)?
                }
                None => literal_value(cell)?,
            };
            converted.push(value);
        }
        out.push(converted);
    }
    Ok(out)
}

/// Coerce one fixture cell per its `"name type"` column declaration.
pub fn coerce_cell(cell: &serde_yaml::Value, column: &str) -> CheckResult<Value> {
    if cell.is_null() {
        return Ok(Value::Null);
    }
    let (_, ty_token) = split_column(column)?;
    let raw = scalar_to_string(cell, column)?;
    coerce_str(&raw, ty_token, column)
}

fn coerce_str(data: &str, ty_token: &str, column: &str) -> CheckResult<Value> {
    // The literal string "None" is the null sentinel, whatever the type.
    if data == "None" {
        return Ok(Value::Null);
    }
    let coercion_err = |message: String| CheckError::Coercion {
        column: column.to_string(),
        value: data.to_string(),
        message,
    };
    match ty_token {
        "int" | "int32" | "int64" | "bigint" | "smallint" | "int16" | "timestamp" => data
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| coercion_err(e.to_string())),
        "float" | "double" => data
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| coercion_err(e.to_string())),
        "bool" => match data.to_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(coercion_err("not a boolean literal".to_string())),
        },
        "string" | "date" => Ok(Value::Str(data.to_string())),
        other => {
            // Historical fallback: unrecognized type names leave the raw
            // string in place. A frequent source of silently-green fixtures,
            // hence the warning.
            log::warn!(
                "unrecognized column type '{}' in '{}', leaving value as string",
                other,
                column
            );
            Ok(Value::Str(data.to_string()))
        }
    }
}

/// Map a YAML scalar cell directly to a typed value, no column declaration.
fn literal_value(cell: &serde_yaml::Value) -> CheckResult<Value> {
    use serde_yaml::Value as Yaml;
    match cell {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(*b)),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(CheckError::Coercion {
                    column: String::new(),
                    value: n.to_string(),
                    message: "number out of range".to_string(),
                })
            }
        }
        Yaml::String(s) => {
            if s == "None" {
                Ok(Value::Null)
            } else {
                Ok(Value::Str(s.clone()))
            }
        }
        other => Err(CheckError::Coercion {
            column: String::new(),
            value: format!("{:?}", other),
            message: "expected a scalar".to_string(),
        }),
    }
}

/// String form of a YAML scalar, fed to the per-type coercion.
fn scalar_to_string(cell: &serde_yaml::Value, column: &str) -> CheckResult<String> {
    use serde_yaml::Value as Yaml;
    match cell {
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::String(s) => Ok(s.clone()),
        other => Err(CheckError::Coercion {
            column: column.to_string(),
            value: format!("{:?}", other),
            message: "expected a scalar".to_string(),
        }),
    }
}

/// Normalize an expected `"name type"` string through the alias parser so
/// `"c2 int"` matches a schema reporting `"c2 int32"`.
fn canonical_column(column: &str) -> CheckResult<String> {
    let (name, ty_token) = split_column(column)?;
    match SqlType::parse(ty_token) {
        Some(ty) => Ok(format!("{} {}", name, ty.name())),
        None => Ok(format!("{} {}", name, ty_token)),
    }
}

fn format_row(row: &[Value]) -> String {
    let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
    format!("[{}]", cells.join(", "))
}
