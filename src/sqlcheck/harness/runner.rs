//! Case execution
//!
//! Drives a [`TestCase`] through a [`Connection`]: creates and populates the
//! input tables, runs the case's SQL statements in order, wraps the last
//! outcome in a [`QueryResult`] and runs the expectation checkers against
//! it. Execution failures do not abort the case; they produce a result with
//! `ok: false` so `success: false` expectations can pass.

use super::case::TestCase;
use super::checker::{coerce_cell, run_checks};
use super::error::{CheckError, CheckResult};
use super::result::QueryResult;
use crate::sqlcheck::driver::Connection;

/// Runs cases over one connection. Fresh per run, no state between cases
/// beyond what the engine itself keeps.
pub struct CaseRunner<'a> {
    conn: &'a mut Connection,
}

impl<'a> CaseRunner<'a> {
    pub fn new(conn: &'a mut Connection) -> Self {
        Self { conn }
    }

    /// Run one case end to end: inputs, SQL, checks.
    ///
    /// Returns `Err` with a `CheckFailed` variant on expectation mismatch,
    /// other variants on harness errors, `Ok` when every check passes.
    pub fn run_case(&mut self, case: &TestCase) -> CheckResult<()> {
        log::info!("running case: {}", case.display_name());
        self.setup_inputs(case)?;

        let mut last = QueryResult::empty_success();
        for stmt in &case.sql {
            last = self.execute_statement(stmt)?;
        }

        match &case.expect {
            Some(expect) => run_checks(expect, &last),
            None => Ok(()),
        }
    }

    /// Create and populate every input table.
    fn setup_inputs(&mut self, case: &TestCase) -> CheckResult<()> {
        for input in &case.inputs {
            let ddl = input.create_statement()?;
            log::debug!("input ddl: {}", ddl);
            self.conn.cursor().execute(&ddl, &[])?;

            let insert = input.insert_statement();
            for row in &input.rows {
                if row.len() != input.columns.len() {
                    return Err(CheckError::Parameter {
                        message: format!(
                            "input '{}': row has {} values for {} columns",
                            input.name,
                            row.len(),
                            input.columns.len()
                        ),
                    });
                }
                let mut params = Vec::with_capacity(row.len());
                for (cell, column) in row.iter().zip(input.columns.iter()) {
                    params.push(coerce_cell(cell, column)?);
                }
                self.conn.cursor().execute(&insert, &params)?;
            }
        }
        Ok(())
    }

    /// Execute one statement, folding engine failures into the result.
    fn execute_statement(&mut self, stmt: &str) -> CheckResult<QueryResult> {
        let is_query = stmt.trim().to_lowercase().starts_with("select ");
        let mut cursor = self.conn.cursor();
        match cursor.execute(stmt, &[]) {
            Ok(()) if is_query => {
                let count = cursor.rowcount();
                let schema = cursor.description().cloned().unwrap_or_default();
                let rows = cursor.fetch_all()?;
                Ok(QueryResult {
                    ok: true,
                    count,
                    rows,
                    schema,
                    error: None,
                })
            }
            Ok(()) => Ok(QueryResult::empty_success()),
            // Engine-side rejection is an outcome, not a harness error.
            Err(CheckError::Sdk { message }) => {
                log::info!("statement failed in engine: {}", message);
                Ok(QueryResult::failure(message))
            }
            Err(other) => Err(other),
        }
    }
}

/// Convenience: run a whole case list, returning per-case outcomes.
pub fn run_cases<'c>(
    conn: &mut Connection,
    cases: impl IntoIterator<Item = &'c TestCase>,
) -> Vec<(String, CheckResult<()>)> {
    let mut outcomes = Vec::new();
    let mut runner = CaseRunner::new(conn);
    for case in cases {
        let outcome = runner.run_case(case);
        outcomes.push((case.display_name().to_string(), outcome));
    }
    outcomes
}
