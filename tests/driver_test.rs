//! Driver/cursor wrapper behavior against the in-memory router

use sqlcheck::{
    CheckError, Column, Connection, MockRouter, Schema, SqlRouter, SqlType, Value,
};

fn orders_router() -> MockRouter {
    MockRouter::new().with_table(
        "orders",
        Schema::new(vec![
            Column::new("id", SqlType::Int32),
            Column::new("note", SqlType::String).not_null(),
            Column::new("amount", SqlType::Double),
        ]),
    )
}

#[test]
fn create_table_dispatches_to_ddl() {
    let mut conn = Connection::new("db", Box::new(MockRouter::new()));
    conn.cursor()
        .execute("create table t1(c1 string, c2 int);", &[])
        .unwrap();
    // table now accepts inserts
    conn.cursor()
        .execute(
            "insert into t1 values (?, ?);",
            &[Value::Str("aa".to_string()), Value::Int(1)],
        )
        .unwrap();
}

#[test]
fn create_database_extracts_name() {
    let mut conn = Connection::new("db", Box::new(MockRouter::new()));
    conn.cursor()
        .execute("create database other_db;", &[])
        .unwrap();
    // creating it again through the router errors, proving it exists
    assert!(conn.router_mut().create_db("other_db").is_err());
}

#[test]
fn parameterized_insert_binds_positionally() {
    let mut conn = Connection::new("db", Box::new(orders_router()));
    conn.cursor()
        .execute(
            "insert into orders values (?, ?, ?);",
            &[
                Value::Int(7),
                Value::Str("first".to_string()),
                Value::Float(12.5),
            ],
        )
        .unwrap();

    let mut cursor = conn.cursor();
    cursor.execute("select * from orders;", &[]).unwrap();
    assert_eq!(cursor.rowcount(), 1);
    let row = cursor.fetch_one().unwrap().unwrap();
    assert_eq!(
        row,
        vec![
            Value::Int(7),
            Value::Str("first".to_string()),
            Value::Float(12.5)
        ]
    );
    assert_eq!(cursor.fetch_one().unwrap(), None);
}

#[test]
fn parameter_count_mismatch_is_rejected() {
    let mut conn = Connection::new("db", Box::new(orders_router()));
    let err = conn
        .cursor()
        .execute("insert into orders values (?, ?, ?);", &[Value::Int(7)])
        .unwrap_err();
    assert!(matches!(err, CheckError::Parameter { .. }));
}

#[test]
fn null_in_not_null_string_column_aborts_whole_statement() {
    let mut router = orders_router();
    // pre-existing row proves later that nothing was appended
    router.create_db("db").unwrap();
    let mut conn = Connection::new("db", Box::new(router));

    let err = conn
        .cursor()
        .execute(
            "insert into orders values (?, ?, ?);",
            &[Value::Int(7), Value::Null, Value::Float(1.0)],
        )
        .unwrap_err();
    match err {
        CheckError::Parameter { message } => assert!(message.contains("not allow null")),
        other => panic!("expected Parameter, got {:?}", other),
    }

    // the statement aborted before any engine write
    let mut cursor = conn.cursor();
    cursor.execute("select * from orders;", &[]).unwrap();
    assert_eq!(cursor.rowcount(), 0);
}

#[test]
fn string_payload_size_accumulates_across_string_columns() {
    let schema = Schema::new(vec![
        Column::new("a", SqlType::String),
        Column::new("n", SqlType::Int32),
        Column::new("b", SqlType::String),
    ]);
    let router = MockRouter::new().with_table("t", schema);
    let probe = router.init_size_probe();
    let mut conn = Connection::new("db", Box::new(router));
    conn.cursor()
        .execute(
            "insert into t values (?, ?, ?);",
            &[
                Value::Str("abc".to_string()),
                Value::Int(1),
                Value::Str("de".to_string()),
            ],
        )
        .unwrap();

    // "abc" + "de", the int column contributes nothing
    assert_eq!(probe.get(), Some(5));
}

#[test]
fn literal_insert_skips_the_builder() {
    let mut conn = Connection::new("db", Box::new(orders_router()));
    conn.cursor()
        .execute("insert into orders values (1, 'a', 2.0);", &[])
        .unwrap();
}

#[test]
fn non_string_value_for_string_column_is_rejected() {
    let mut conn = Connection::new("db", Box::new(orders_router()));
    let err = conn
        .cursor()
        .execute(
            "insert into orders values (?, ?, ?);",
            &[Value::Int(7), Value::Int(42), Value::Float(1.0)],
        )
        .unwrap_err();
    assert!(matches!(err, CheckError::Parameter { .. }));
}

#[test]
fn unknown_command_is_an_error_not_a_silent_noop() {
    let mut conn = Connection::new("db", Box::new(MockRouter::new()));
    let err = conn.cursor().execute("drop table t1;", &[]).unwrap_err();
    assert!(matches!(err, CheckError::Unsupported { .. }));
}

#[test]
fn closed_cursor_refuses_operations() {
    let mut conn = Connection::new("db", Box::new(MockRouter::new()));
    let mut cursor = conn.cursor();
    cursor.close().unwrap();
    assert!(matches!(
        cursor.execute("select * from t;", &[]),
        Err(CheckError::CursorClosed)
    ));
}

#[test]
fn closed_connection_refuses_cursor_operations() {
    let mut conn = Connection::new("db", Box::new(MockRouter::new()));
    conn.close();
    let mut cursor = conn.cursor();
    assert!(matches!(
        cursor.execute("select * from t;", &[]),
        Err(CheckError::ConnectionClosed)
    ));
}

#[test]
fn select_exposes_description_schema() {
    let mut conn = Connection::new("db", Box::new(orders_router()));
    let mut cursor = conn.cursor();
    cursor.execute("select * from orders;", &[]).unwrap();
    let desc = cursor.description().unwrap();
    assert_eq!(desc.column_count(), 3);
    assert_eq!(desc.column(0).unwrap().name, "id");
    assert_eq!(desc.column(2).unwrap().ty, SqlType::Double);
}

#[test]
fn null_parameters_append_as_null() {
    let schema = Schema::new(vec![
        Column::new("a", SqlType::String),
        Column::new("n", SqlType::Int32),
    ]);
    let router = MockRouter::new().with_table("t", schema);
    let mut conn = Connection::new("db", Box::new(router));
    conn.cursor()
        .execute(
            "insert into t values (?, ?);",
            &[Value::Null, Value::Null],
        )
        .unwrap();
    let mut cursor = conn.cursor();
    cursor.execute("select * from t;", &[]).unwrap();
    assert_eq!(
        cursor.fetch_one().unwrap().unwrap(),
        vec![Value::Null, Value::Null]
    );
}
