//! Router SDK traits
//!
//! These traits are the boundary to the native SQL router. The real binding
//! forwards them to the engine over RPC; the harness only ever sees this
//! surface. All calls are blocking and synchronous, with retry and
//! cancellation policy owned by the engine side.

use super::types::{Schema, Value};
use std::any::Any;
use std::fmt;

/// Error reported by the router SDK.
#[derive(Debug, Clone)]
pub struct SdkError {
    pub message: String,
}

impl SdkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sdk error: {}", self.message)
    }
}

impl std::error::Error for SdkError {}

/// Result type alias for SDK calls
pub type SdkResult<T> = Result<T, SdkError>;

/// Cursor over a query result.
///
/// The cursor starts positioned before the first row; `next` advances it and
/// reports whether a row is available. Typed getters follow the schema: the
/// caller is expected to dispatch on the column type and use the matching
/// getter, with `is_null` checked first.
pub trait ResultSet: std::fmt::Debug {
    /// Total number of rows in the result.
    fn size(&self) -> usize;

    /// Result schema, ordered.
    fn schema(&self) -> &Schema;

    /// Advance to the next row. Returns false once exhausted.
    fn next(&mut self) -> bool;

    /// Whether the current row holds NULL at the given column.
    fn is_null(&self, col: usize) -> bool;

    fn get_bool(&self, col: usize) -> SdkResult<bool>;
    fn get_int16(&self, col: usize) -> SdkResult<i16>;
    fn get_int32(&self, col: usize) -> SdkResult<i32>;
    fn get_int64(&self, col: usize) -> SdkResult<i64>;
    fn get_float(&self, col: usize) -> SdkResult<f32>;
    fn get_double(&self, col: usize) -> SdkResult<f64>;
    fn get_string(&self, col: usize) -> SdkResult<String>;

    /// Date columns are read back in their string form.
    fn get_date_string(&self, col: usize) -> SdkResult<String>;

    /// Timestamp columns are read back as millisecond epoch values.
    fn get_timestamp(&self, col: usize) -> SdkResult<i64>;
}

/// Positional row builder for prepared inserts.
///
/// `init` must be called with the total string payload size before any
/// append; the engine uses it for row pre-allocation. Values are appended in
/// hole order.
pub trait InsertBuilder {
    /// Schema of the target table.
    fn schema(&self) -> &Schema;

    /// Column indices of the `?` placeholders, in statement order.
    fn hole_indices(&self) -> Vec<usize>;

    /// Pre-allocate with the accumulated string payload size.
    fn init(&mut self, string_size: usize) -> SdkResult<()>;

    fn append_bool(&mut self, v: bool) -> SdkResult<()>;
    fn append_int16(&mut self, v: i16) -> SdkResult<()>;
    fn append_int32(&mut self, v: i32) -> SdkResult<()>;
    fn append_int64(&mut self, v: i64) -> SdkResult<()>;
    fn append_float(&mut self, v: f32) -> SdkResult<()>;
    fn append_double(&mut self, v: f64) -> SdkResult<()>;
    fn append_string(&mut self, v: &str) -> SdkResult<()>;
    fn append_date(&mut self, v: &str) -> SdkResult<()>;
    fn append_timestamp(&mut self, v: i64) -> SdkResult<()>;
    fn append_null(&mut self) -> SdkResult<()>;

    /// Downcast support so a router implementation can recover its own
    /// builder type when the statement is executed.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// The opaque SQL router.
pub trait SqlRouter {
    /// Create a database.
    fn create_db(&mut self, db: &str) -> SdkResult<()>;

    /// Execute a DDL statement.
    fn execute_ddl(&mut self, db: &str, stmt: &str) -> SdkResult<()>;

    /// Obtain a row builder for a parameterized insert statement.
    fn get_insert_builder(&mut self, db: &str, stmt: &str) -> SdkResult<Box<dyn InsertBuilder>>;

    /// Execute a literal insert statement.
    fn execute_insert(&mut self, db: &str, stmt: &str) -> SdkResult<()>;

    /// Execute a parameterized insert with a populated builder.
    fn execute_insert_prepared(
        &mut self,
        db: &str,
        stmt: &str,
        builder: Box<dyn InsertBuilder>,
    ) -> SdkResult<()>;

    /// Execute a query, returning a result cursor.
    fn execute_query(&mut self, db: &str, stmt: &str) -> SdkResult<Box<dyn ResultSet>>;
}
