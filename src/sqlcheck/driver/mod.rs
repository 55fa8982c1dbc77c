//! DBAPI-shaped driver wrapper
//!
//! A thin connection/cursor adapter over the router SDK. The cursor
//! dispatches on textual command prefixes (`create table`, `create
//! database`, `insert into`, `select`) and adds no engine logic of its own:
//! it marshals parameters into the SDK's insert builder and materializes
//! query rows through schema-typed getters.
//!
//! Connections and cursors are two-state machines (open, closed) with no
//! reopen transition; every operation starts with an explicit guard.

use crate::sqlcheck::harness::error::{CheckError, CheckResult};
use crate::sqlcheck::sdk::router::{InsertBuilder, ResultSet, SqlRouter};
use crate::sqlcheck::sdk::types::{Schema, SqlType, Value};

/// A connection bound to one database on one router.
pub struct Connection {
    db: String,
    router: Box<dyn SqlRouter>,
    open: bool,
}

impl Connection {
    pub fn new(db: impl Into<String>, router: Box<dyn SqlRouter>) -> Self {
        Self {
            db: db.into(),
            router,
            open: true,
        }
    }

    /// Database this connection operates on.
    pub fn db(&self) -> &str {
        &self.db
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Close the connection. There is no reopen.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Open a cursor on this connection.
    pub fn cursor(&mut self) -> Cursor<'_> {
        Cursor {
            conn: self,
            open: true,
            result: None,
            description: None,
            rowcount: -1,
        }
    }

    /// Direct access to the underlying router, for SDK-level calls the
    /// cursor does not cover (database creation scripting, inspection).
    pub fn router_mut(&mut self) -> &mut dyn SqlRouter {
        self.router.as_mut()
    }
}

/// A statement cursor.
pub struct Cursor<'a> {
    conn: &'a mut Connection,
    open: bool,
    result: Option<Box<dyn ResultSet>>,
    description: Option<Schema>,
    rowcount: i64,
}

impl<'a> Cursor<'a> {
    fn ensure_open(&self) -> CheckResult<()> {
        if !self.open {
            return Err(CheckError::CursorClosed);
        }
        if !self.conn.open {
            return Err(CheckError::ConnectionClosed);
        }
        Ok(())
    }

    /// Close the cursor; subsequent operations fail.
    pub fn close(&mut self) -> CheckResult<()> {
        self.ensure_open()?;
        self.open = false;
        self.result = None;
        Ok(())
    }

    /// Rows in the pending result, -1 when none.
    pub fn rowcount(&self) -> i64 {
        self.rowcount
    }

    /// Schema of the pending result.
    pub fn description(&self) -> Option<&Schema> {
        self.description.as_ref()
    }

    /// Execute a statement, binding positional parameters into `?` holes.
    pub fn execute(&mut self, operation: &str, parameters: &[Value]) -> CheckResult<()> {
        self.ensure_open()?;
        let command = operation.trim();
        if command.is_empty() {
            return Err(CheckError::Unsupported {
                command: "(empty statement)".to_string(),
            });
        }
        let lower = command.to_lowercase();
        if lower.starts_with("create table ") {
            self.conn.router.execute_ddl(&self.conn.db, command)?;
            Ok(())
        } else if lower.starts_with("create database ") {
            let db = command
                .split_whitespace()
                .last()
                .map(|t| t.trim_end_matches(';'))
                .unwrap_or_default();
            self.conn.router.create_db(db)?;
            Ok(())
        } else if lower.starts_with("insert into ") {
            self.execute_insert(command, parameters)
        } else if lower.starts_with("select ") {
            self.execute_select(command)
        } else {
            // The historical wrapper silently ignored anything else; here an
            // unknown statement is an error.
            Err(CheckError::Unsupported {
                command: command.to_string(),
            })
        }
    }

    fn execute_insert(&mut self, command: &str, parameters: &[Value]) -> CheckResult<()> {
        let holes = command.matches('?').count();
        if holes == 0 {
            self.conn.router.execute_insert(&self.conn.db, command)?;
            return Ok(());
        }
        if parameters.len() != holes {
            return Err(CheckError::Parameter {
                message: format!(
                    "statement has {} placeholders, got {} parameters",
                    holes,
                    parameters.len()
                ),
            });
        }
        let mut builder = self.conn.router.get_insert_builder(&self.conn.db, command)?;
        let hole_indices = builder.hole_indices();
        if hole_indices.len() != parameters.len() {
            return Err(CheckError::Parameter {
                message: format!(
                    "builder expects {} values, got {} parameters",
                    hole_indices.len(),
                    parameters.len()
                ),
            });
        }

        // First pass: validate nullability for string columns and size the
        // string payload. A violation must abort before any append call.
        let mut string_size = 0usize;
        for (value, &idx) in parameters.iter().zip(hole_indices.iter()) {
            let column = builder
                .schema()
                .column(idx)
                .ok_or_else(|| CheckError::Parameter {
                    message: format!("hole index {} outside schema", idx),
                })?;
            if column.ty != SqlType::String {
                continue;
            }
            match value {
                Value::Null => {
                    if column.not_null {
                        return Err(CheckError::Parameter {
                            message: format!(
                                "column '{}' (seq {}) does not allow null",
                                column.name, idx
                            ),
                        });
                    }
                }
                Value::Str(s) => string_size += s.len(),
                other => {
                    return Err(CheckError::Parameter {
                        message: format!(
                            "column '{}' (seq {}) expects a string, got {}",
                            column.name, idx, other
                        ),
                    });
                }
            }
        }
        builder.init(string_size)?;

        // Second pass: append values positionally.
        for (i, (value, &idx)) in parameters.iter().zip(hole_indices.iter()).enumerate() {
            if matches!(value, Value::Null) {
                builder.append_null()?;
                continue;
            }
            let ty = builder
                .schema()
                .column(idx)
                .map(|c| c.ty)
                .ok_or_else(|| CheckError::Parameter {
                    message: format!("hole index {} outside schema", idx),
                })?;
            append_typed(builder.as_mut(), ty, value).map_err(|e| match e {
                CheckError::Parameter { message } => CheckError::Parameter {
                    message: format!("at parameter seq {}: {}", i, message),
                },
                other => other,
            })?;
        }

        self.conn
            .router
            .execute_insert_prepared(&self.conn.db, command, builder)?;
        Ok(())
    }

    fn execute_select(&mut self, command: &str) -> CheckResult<()> {
        let rs = self.conn.router.execute_query(&self.conn.db, command)?;
        self.rowcount = rs.size() as i64;
        self.description = Some(rs.schema().clone());
        self.result = Some(rs);
        Ok(())
    }

    /// Fetch the next row of the pending result.
    ///
    /// Returns `None` when there is no pending result or the cursor is
    /// exhausted; exhaustion resets the pending state.
    pub fn fetch_one(&mut self) -> CheckResult<Option<Vec<Value>>> {
        self.ensure_open()?;
        let Some(rs) = self.result.as_mut() else {
            return Ok(None);
        };
        if !rs.next() {
            self.rowcount = -1;
            self.result = None;
            self.description = None;
            return Ok(None);
        }
        let schema = rs.schema().clone();
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
        Ok(Some(row))
    }

    /// Drain the pending result.
    pub fn fetch_all(&mut self) -> CheckResult<Vec<Vec<Value>>> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetch_one()? {
            rows.push(row);
        }
        Ok(rows)
    }
}

/// Append one non-null value through the getter matching the column type.
fn append_typed(builder: &mut dyn InsertBuilder, ty: SqlType, value: &Value) -> CheckResult<()> {
    let mismatch = |expected: &str| CheckError::Parameter {
        message: format!("expected {} value, got {}", expected, value),
    };
    match ty {
        SqlType::Bool => match value {
            Value::Bool(v) => Ok(builder.append_bool(*v)?),
            _ => Err(mismatch("bool")),
        },
        SqlType::Int16 => match value {
            Value::Int(v) => {
                let v = i16::try_from(*v).map_err(|_| CheckError::Parameter {
                    message: format!("{} out of range for int16", v),
                })?;
                Ok(builder.append_int16(v)?)
            }
            _ => Err(mismatch("int16")),
        },
        SqlType::Int32 => match value {
            Value::Int(v) => {
                let v = i32::try_from(*v).map_err(|_| CheckError::Parameter {
                    message: format!("{} out of range for int32", v),
                })?;
                Ok(builder.append_int32(v)?)
            }
            _ => Err(mismatch("int32")),
        },
        SqlType::Int64 => match value {
            Value::Int(v) => Ok(builder.append_int64(*v)?),
            _ => Err(mismatch("int64")),
        },
        SqlType::Float => match value {
            Value::Float(v) => Ok(builder.append_float(*v as f32)?),
            Value::Int(v) => Ok(builder.append_float(*v as f32)?),
            _ => Err(mismatch("float")),
        },
        SqlType::Double => match value {
            Value::Float(v) => Ok(builder.append_double(*v)?),
            Value::Int(v) => Ok(builder.append_double(*v as f64)?),
            _ => Err(mismatch("double")),
        },
        SqlType::String => match value {
            Value::Str(v) => Ok(builder.append_string(v)?),
            _ => Err(mismatch("string")),
        },
        SqlType::Date => match value {
            Value::Str(v) => Ok(builder.append_date(v)?),
            _ => Err(mismatch("date")),
        },
        SqlType::Timestamp => match value {
            Value::Int(v) => Ok(builder.append_timestamp(*v)?),
            _ => Err(mismatch("timestamp")),
        },
    }
}
