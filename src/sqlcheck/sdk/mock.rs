//! Scriptable in-memory router
//!
//! A minimal stand-in for the native SDK, good enough to exercise the driver
//! and the checker harness without a live cluster. It understands the DDL
//! and insert statements the harness itself generates, plus `select * from
//! <table>`; anything richer must be scripted with a canned result.

use super::router::{InsertBuilder, ResultSet, SdkError, SdkResult, SqlRouter};
use super::types::{Column, Schema, SqlType, Value};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
struct MockTable {
    schema: Schema,
    rows: Vec<Vec<Value>>,
}

/// In-memory [`SqlRouter`] implementation.
#[derive(Default)]
pub struct MockRouter {
    databases: Vec<String>,
    tables: HashMap<String, MockTable>,
    canned: HashMap<String, (Schema, Vec<Vec<Value>>)>,
    insert_log: Vec<String>,
    /// String payload size passed to the last builder's `init`; shared so
    /// tests can observe it after the router is boxed away.
    init_probe: Rc<Cell<Option<usize>>>,
}

impl MockRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table without going through DDL.
    pub fn with_table(mut self, name: &str, schema: Schema) -> Self {
        self.tables.insert(
            name.to_string(),
            MockTable {
                schema,
                rows: Vec::new(),
            },
        );
        self
    }

    /// Script an exact-match query result.
    pub fn with_result(mut self, stmt: &str, schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        self.canned
            .insert(stmt.trim().to_string(), (schema, rows));
        self
    }

    /// Rows currently stored for a table.
    pub fn table_rows(&self, name: &str) -> Option<&Vec<Vec<Value>>> {
        self.tables.get(name).map(|t| &t.rows)
    }

    /// Literal insert statements seen so far.
    pub fn insert_log(&self) -> &[String] {
        &self.insert_log
    }

    /// Handle observing the string payload size of the last prepared insert.
    pub fn init_size_probe(&self) -> Rc<Cell<Option<usize>>> {
        Rc::clone(&self.init_probe)
    }

    fn table_of_insert(stmt: &str) -> SdkResult<String> {
        let lower = stmt.to_lowercase();
        let rest = lower
            .strip_prefix("insert into ")
            .ok_or_else(|| SdkError::new(format!("not an insert statement: {}", stmt)))?;
        let name = rest
            .split_whitespace()
            .next()
            .ok_or_else(|| SdkError::new("missing table name in insert"))?;
        Ok(name.trim_end_matches('(').to_string())
    }

    fn parse_create_table(stmt: &str) -> SdkResult<(String, Schema)> {
        let lower = stmt.to_lowercase();
        let rest = lower
            .strip_prefix("create table ")
            .ok_or_else(|| SdkError::new(format!("unsupported ddl: {}", stmt)))?;
        let open = rest
            .find('(')
            .ok_or_else(|| SdkError::new("missing column list in create table"))?;
        let close = rest
            .rfind(')')
            .ok_or_else(|| SdkError::new("unterminated column list in create table"))?;
        let name = rest[..open].trim().to_string();
        if name.is_empty() {
            return Err(SdkError::new("missing table name in create table"));
        }
        let mut columns = Vec::new();
        for part in rest[open + 1..close].split(',') {
            let part = part.trim();
            if part.is_empty() || part.starts_with("index(") {
                continue;
            }
            let mut tokens = part.split_whitespace();
            let col_name = tokens
                .next()
                .ok_or_else(|| SdkError::new("empty column definition"))?;
            let ty_token = tokens
                .next()
                .ok_or_else(|| SdkError::new(format!("column '{}' has no type", col_name)))?;
            let ty = SqlType::parse(ty_token)
                .ok_or_else(|| SdkError::new(format!("unknown column type '{}'", ty_token)))?;
            let not_null = part.contains("not null");
            let mut column = Column::new(col_name, ty);
            if not_null {
                column = column.not_null();
            }
            columns.push(column);
        }
        Ok((name, Schema::new(columns)))
    }
}

impl SqlRouter for MockRouter {
    fn create_db(&mut self, db: &str) -> SdkResult<()> {
        if self.databases.iter().any(|d| d == db) {
            return Err(SdkError::new(format!("database '{}' already exists", db)));
        }
        self.databases.push(db.to_string());
        Ok(())
    }

    fn execute_ddl(&mut self, _db: &str, stmt: &str) -> SdkResult<()> {
        let (name, schema) = Self::parse_create_table(stmt)?;
        if self.tables.contains_key(&name) {
            return Err(SdkError::new(format!("table '{}' already exists", name)));
        }
        self.tables.insert(
            name,
            MockTable {
                schema,
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    fn get_insert_builder(&mut self, _db: &str, stmt: &str) -> SdkResult<Box<dyn InsertBuilder>> {
        let table = Self::table_of_insert(stmt)?;
        let schema = self
            .tables
            .get(&table)
            .ok_or_else(|| SdkError::new(format!("unknown table '{}'", table)))?
            .schema
            .clone();
        // Harness-generated inserts hold every column.
        let holes = (0..schema.column_count()).collect();
        Ok(Box::new(MockInsertBuilder {
            table,
            schema,
            holes,
            values: Vec::new(),
            inited: false,
            init_size: None,
        }))
    }

    fn execute_insert(&mut self, _db: &str, stmt: &str) -> SdkResult<()> {
        let table = Self::table_of_insert(stmt)?;
        if !self.tables.contains_key(&table) {
            return Err(SdkError::new(format!("unknown table '{}'", table)));
        }
        self.insert_log.push(stmt.to_string());
        Ok(())
    }

    fn execute_insert_prepared(
        &mut self,
        _db: &str,
        _stmt: &str,
        builder: Box<dyn InsertBuilder>,
    ) -> SdkResult<()> {
        let builder = builder
            .into_any()
            .downcast::<MockInsertBuilder>()
            .map_err(|_| SdkError::new("foreign insert builder"))?;
        if !builder.inited {
            return Err(SdkError::new("insert builder was not initialized"));
        }
        if builder.values.len() != builder.holes.len() {
            return Err(SdkError::new(format!(
                "expected {} values, got {}",
                builder.holes.len(),
                builder.values.len()
            )));
        }
        self.init_probe.set(builder.init_size);
        let table = self
            .tables
            .get_mut(&builder.table)
            .ok_or_else(|| SdkError::new(format!("unknown table '{}'", builder.table)))?;
        table.rows.push(builder.values);
        Ok(())
    }

    fn execute_query(&mut self, _db: &str, stmt: &str) -> SdkResult<Box<dyn ResultSet>> {
        let stmt = stmt.trim();
        if let Some((schema, rows)) = self.canned.get(stmt) {
            return Ok(Box::new(MockResultSet::new(schema.clone(), rows.clone())));
        }
        let lower = stmt.to_lowercase();
        if let Some(rest) = lower.strip_prefix("select * from ") {
            let name = rest.trim_end_matches(';').trim();
            let table = self
                .tables
                .get(name)
                .ok_or_else(|| SdkError::new(format!("unknown table '{}'", name)))?;
            return Ok(Box::new(MockResultSet::new(
                table.schema.clone(),
                table.rows.clone(),
            )));
        }
        Err(SdkError::new(format!("no scripted result for: {}", stmt)))
    }
}

struct MockInsertBuilder {
    table: String,
    schema: Schema,
    holes: Vec<usize>,
    values: Vec<Value>,
    inited: bool,
    init_size: Option<usize>,
}

impl MockInsertBuilder {
    fn push(&mut self, v: Value) -> SdkResult<()> {
        if !self.inited {
            return Err(SdkError::new("append before init"));
        }
        if self.values.len() >= self.holes.len() {
            return Err(SdkError::new("too many appended values"));
        }
        self.values.push(v);
        Ok(())
    }
}

impl InsertBuilder for MockInsertBuilder {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn hole_indices(&self) -> Vec<usize> {
        self.holes.clone()
    }

    fn init(&mut self, string_size: usize) -> SdkResult<()> {
        self.inited = true;
        self.init_size = Some(string_size);
        Ok(())
    }

    fn append_bool(&mut self, v: bool) -> SdkResult<()> {
        self.push(Value::Bool(v))
    }

    fn append_int16(&mut self, v: i16) -> SdkResult<()> {
        self.push(Value::Int(v as i64))
    }

    fn append_int32(&mut self, v: i32) -> SdkResult<()> {
        self.push(Value::Int(v as i64))
    }

    fn append_int64(&mut self, v: i64) -> SdkResult<()> {
        self.push(Value::Int(v))
    }

    fn append_float(&mut self, v: f32) -> SdkResult<()> {
        self.push(Value::Float(v as f64))
    }

    fn append_double(&mut self, v: f64) -> SdkResult<()> {
        self.push(Value::Float(v))
    }

    fn append_string(&mut self, v: &str) -> SdkResult<()> {
        self.push(Value::Str(v.to_string()))
    }

    fn append_date(&mut self, v: &str) -> SdkResult<()> {
        self.push(Value::Str(v.to_string()))
    }

    fn append_timestamp(&mut self, v: i64) -> SdkResult<()> {
        self.push(Value::Int(v))
    }

    fn append_null(&mut self) -> SdkResult<()> {
        self.push(Value::Null)
    }

    fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
        self
    }
}

#[derive(Debug)]
struct MockResultSet {
    schema: Schema,
    rows: Vec<Vec<Value>>,
    // -1 means before the first row
    cursor: isize,
}

impl MockResultSet {
    fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self {
            schema,
            rows,
            cursor: -1,
        }
    }

    fn cell(&self, col: usize) -> SdkResult<&Value> {
        let row = self
            .rows
            .get(self.cursor as usize)
            .ok_or_else(|| SdkError::new("cursor is not positioned on a row"))?;
        row.get(col)
            .ok_or_else(|| SdkError::new(format!("column index {} out of range", col)))
    }
}

impl ResultSet for MockResultSet {
    fn size(&self) -> usize {
        self.rows.len()
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next(&mut self) -> bool {
        if (self.cursor + 1) as usize >= self.rows.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    fn is_null(&self, col: usize) -> bool {
        matches!(self.cell(col), Ok(Value::Null))
    }

    fn get_bool(&self, col: usize) -> SdkResult<bool> {
        match self.cell(col)? {
            Value::Bool(v) => Ok(*v),
            other => Err(SdkError::new(format!("column {} is not bool: {}", col, other))),
        }
    }

    fn get_int16(&self, col: usize) -> SdkResult<i16> {
        match self.cell(col)? {
            Value::Int(v) => Ok(*v as i16),
            other => Err(SdkError::new(format!("column {} is not int16: {}", col, other))),
        }
    }

    fn get_int32(&self, col: usize) -> SdkResult<i32> {
        match self.cell(col)? {
            Value::Int(v) => Ok(*v as i32),
            other => Err(SdkError::new(format!("column {} is not int32: {}", col, other))),
        }
    }

    fn get_int64(&self, col: usize) -> SdkResult<i64> {
        match self.cell(col)? {
            Value::Int(v) => Ok(*v),
            other => Err(SdkError::new(format!("column {} is not int64: {}", col, other))),
        }
    }

    fn get_float(&self, col: usize) -> SdkResult<f32> {
        match self.cell(col)? {
            Value::Float(v) => Ok(*v as f32),
            other => Err(SdkError::new(format!("column {} is not float: {}", col, other))),
        }
    }

    fn get_double(&self, col: usize) -> SdkResult<f64> {
        match self.cell(col)? {
            Value::Float(v) => Ok(*v),
            other => Err(SdkError::new(format!("column {} is not double: {}", col, other))),
        }
    }

    fn get_string(&self, col: usize) -> SdkResult<String> {
        match self.cell(col)? {
            Value::Str(v) => Ok(v.clone()),
            other => Err(SdkError::new(format!("column {} is not string: {}", col, other))),
        }
    }

    fn get_date_string(&self, col: usize) -> SdkResult<String> {
        match self.cell(col)? {
            Value::Str(v) => Ok(v.clone()),
            other => Err(SdkError::new(format!("column {} is not date: {}", col, other))),
        }
    }

    fn get_timestamp(&self, col: usize) -> SdkResult<i64> {
        match self.cell(col)? {
            Value::Int(v) => Ok(*v),
            other => Err(SdkError::new(format!(
                "column {} is not timestamp: {}",
                col, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_registers_table_schema() {
        let mut router = MockRouter::new();
        router
            .execute_ddl("db", "create table t1(c1 string, c2 int, c3 bigint not null);")
            .unwrap();
        let builder = router
            .get_insert_builder("db", "insert into t1 values (?, ?, ?);")
            .unwrap();
        let schema = builder.schema();
        assert_eq!(schema.column_count(), 3);
        assert_eq!(schema.column(1).unwrap().ty, SqlType::Int32);
        assert!(schema.column(2).unwrap().not_null);
    }

    #[test]
    fn select_star_reads_inserted_rows() {
        let mut router = MockRouter::new()
            .with_table("t1", Schema::new(vec![Column::new("c1", SqlType::Int32)]));
        let mut builder = router
            .get_insert_builder("db", "insert into t1 values (?);")
            .unwrap();
        builder.init(0).unwrap();
        builder.append_int32(7).unwrap();
        router
            .execute_insert_prepared("db", "insert into t1 values (?);", builder)
            .unwrap();

        let mut rs = router.execute_query("db", "select * from t1;").unwrap();
        assert_eq!(rs.size(), 1);
        assert!(rs.next());
        assert_eq!(rs.get_int32(0).unwrap(), 7);
        assert!(!rs.next());
    }

    #[test]
    fn literal_inserts_are_logged() {
        let mut router =
            MockRouter::new().with_table("t1", Schema::new(vec![Column::new("c1", SqlType::Int32)]));
        router
            .execute_insert("db", "insert into t1 values (1);")
            .unwrap();
        assert_eq!(router.insert_log(), ["insert into t1 values (1);"]);
    }

    #[test]
    fn unscripted_query_errors() {
        let mut router = MockRouter::new();
        let err = router
            .execute_query("db", "select count(*) from nowhere")
            .unwrap_err();
        assert!(err.message.contains("no scripted result"));
    }
}
