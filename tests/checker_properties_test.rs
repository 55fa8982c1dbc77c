//! Checker behavior over expectation/result pairs

use sqlcheck::{build_checkers, run_checks, CheckError, Column, Expectation, QueryResult, Schema, SqlType, Value};

fn expectation(yaml: &str) -> Expectation {
    serde_yaml::from_str(yaml).unwrap()
}

fn result_with(schema: Vec<Column>, rows: Vec<Vec<Value>>) -> QueryResult {
    QueryResult {
        ok: true,
        count: rows.len() as i64,
        rows,
        schema: Schema::new(schema),
        error: None,
    }
}

#[test]
fn count_only_passes_iff_counts_match() {
    for (expected, actual, should_pass) in [(0i64, 0i64, true), (3, 3, true), (2, 1, false)] {
        let expect = expectation(&format!("count: {}", expected));
        let mut result = QueryResult::empty_success();
        result.count = actual;
        let outcome = run_checks(&expect, &result);
        assert_eq!(outcome.is_ok(), should_pass, "count {} vs {}", expected, actual);
    }
}

#[test]
fn rows_without_columns_compare_positionally() {
    let expect = expectation("rows:\n  - [1, \"a\"]\n  - [2, \"b\"]");
    let schema = vec![Column::new("k", SqlType::Int32), Column::new("v", SqlType::String)];
    let matching = result_with(
        schema.clone(),
        vec![
            vec![Value::Int(1), Value::Str("a".to_string())],
            vec![Value::Int(2), Value::Str("b".to_string())],
        ],
    );
    run_checks(&expect, &matching).unwrap();

    // same rows, different order: positional comparison must fail
    let swapped = result_with(
        schema,
        vec![
            vec![Value::Int(2), Value::Str("b".to_string())],
            vec![Value::Int(1), Value::Str("a".to_string())],
        ],
    );
    assert!(run_checks(&expect, &swapped).is_err());
}

#[test]
fn zero_rows_pass_against_empty_expectation_rows() {
    let expect = expectation("rows: []");
    let result = result_with(vec![Column::new("k", SqlType::Int32)], vec![]);
    run_checks(&expect, &result).unwrap();
}

#[test]
fn typed_coercion_makes_string_fixtures_comparable() {
    // ["5", "2.5", "None"] with [a int32, b double, c string] ==
    // [Int(5), Float(2.5), Null]
    let expect = expectation(
        r#"
columns: ["a int32", "b double", "c string"]
rows:
  - ["5", "2.5", "None"]
"#,
    );
    let result = result_with(
        vec![
            Column::new("a", SqlType::Int32),
            Column::new("b", SqlType::Double),
            Column::new("c", SqlType::String),
        ],
        vec![vec![Value::Int(5), Value::Float(2.5), Value::Null]],
    );
    run_checks(&expect, &result).unwrap();
}

#[test]
fn none_literal_is_null_not_empty_string() {
    let expect = expectation("columns: [\"c string\"]\nrows:\n  - [\"None\"]");
    let as_empty = result_with(
        vec![Column::new("c", SqlType::String)],
        vec![vec![Value::Str(String::new())]],
    );
    assert!(run_checks(&expect, &as_empty).is_err());

    let as_text = result_with(
        vec![Column::new("c", SqlType::String)],
        vec![vec![Value::Str("None".to_string())]],
    );
    assert!(run_checks(&expect, &as_text).is_err());

    let as_null = result_with(
        vec![Column::new("c", SqlType::String)],
        vec![vec![Value::Null]],
    );
    run_checks(&expect, &as_null).unwrap();
}

#[test]
fn order_modifier_sorts_both_sides_before_comparing() {
    let expect = expectation(
        r#"
order: k
rows:
  - [1, "a"]
  - [2, "b"]
"#,
    );
    let result = result_with(
        vec![Column::new("k", SqlType::Int32), Column::new("v", SqlType::String)],
        vec![
            vec![Value::Int(2), Value::Str("b".to_string())],
            vec![Value::Int(1), Value::Str("a".to_string())],
        ],
    );
    run_checks(&expect, &result).unwrap();
}

#[test]
fn order_column_missing_from_schema_is_an_error() {
    let expect = expectation("order: zz\nrows:\n  - [1]");
    let result = result_with(vec![Column::new("k", SqlType::Int32)], vec![vec![Value::Int(1)]]);
    assert!(matches!(
        run_checks(&expect, &result),
        Err(CheckError::MalformedColumn { .. })
    ));
}

#[test]
fn unknown_key_fails_before_any_comparison() {
    let expect = expectation("bogus: 1\nrows:\n  - [1]");
    // even with a result that would mismatch rows, the factory error wins
    let result = result_with(vec![Column::new("k", SqlType::Int32)], vec![]);
    match run_checks(&expect, &result) {
        Err(CheckError::UnknownChecker { key }) => assert_eq!(key, "bogus"),
        other => panic!("expected UnknownChecker, got {:?}", other),
    }
}

#[test]
fn row_count_mismatch_reported_before_values() {
    let expect = expectation("rows:\n  - [1]\n  - [2]");
    let result = result_with(vec![Column::new("k", SqlType::Int32)], vec![vec![Value::Int(99)]]);
    match run_checks(&expect, &result) {
        Err(CheckError::CheckFailed { expected, actual, message, .. }) => {
            assert_eq!(expected, "2");
            assert_eq!(actual, "1");
            assert!(message.contains("count"));
        }
        other => panic!("expected CheckFailed, got {:?}", other),
    }
}

#[test]
fn success_checker_compares_ok_flag() {
    let expect = expectation("success: false");
    let failed = QueryResult::failure("table not found");
    run_checks(&expect, &failed).unwrap();
    let succeeded = QueryResult::empty_success();
    assert!(run_checks(&expect, &succeeded).is_err());
}

#[test]
fn checks_run_fail_fast() {
    // both rows and count mismatch; rows is built first and must be the
    // error we see
    let expect = expectation("rows:\n  - [1]\ncount: 5");
    let result = result_with(vec![Column::new("k", SqlType::Int32)], vec![]);
    match run_checks(&expect, &result) {
        Err(CheckError::CheckFailed { check, .. }) => assert_eq!(check, "rows"),
        other => panic!("expected CheckFailed, got {:?}", other),
    }
}

#[test]
fn factory_emits_one_checker_per_present_key() {
    let expect = expectation("count: 1\nsuccess: true\norder: k");
    let checkers = build_checkers(&expect).unwrap();
    assert_eq!(checkers.len(), 2);
}
