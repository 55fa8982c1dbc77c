//! # sqlcheck
//!
//! A fixture-driven validation harness for SQL query results, together with a
//! DBAPI-shaped driver adapter over an opaque SQL router SDK.
//!
//! The crate has three layers:
//!
//! - **sdk**: the trait seam to the external SQL router (query execution,
//!   DDL, insert building). The real engine lives behind these traits and is
//!   never reimplemented here; a scriptable in-memory router is provided for
//!   harness self-testing.
//! - **driver**: a cursor/connection wrapper that dispatches textual SQL
//!   commands to the router and materializes rows through schema-typed
//!   getters.
//! - **harness**: declarative YAML test cases with an `expect` block
//!   (`rows`, `columns`, `count`, `success`, `order`), a checker factory
//!   that turns present keys into validators, and fail-fast comparison with
//!   rich diagnostics.
//!
//! ## Quick start
//!
//! ```rust
//! use sqlcheck::{run_checks, Expectation, QueryResult};
//!
//! let expect: Expectation = serde_yaml::from_str("count: 0").unwrap();
//! let actual = QueryResult::empty_success();
//! run_checks(&expect, &actual).unwrap();
//! ```

pub mod sqlcheck;

// Re-export the main types for convenience
pub use crate::sqlcheck::driver::{Connection, Cursor};
pub use crate::sqlcheck::harness::case::{CaseFile, Expectation, InputDesc, TestCase};
pub use crate::sqlcheck::harness::checker::{build_checkers, run_checks, Checker};
pub use crate::sqlcheck::harness::error::{CheckError, CheckResult};
pub use crate::sqlcheck::harness::report::{CaseReport, CaseStatus, OutputFormat, RunReport};
pub use crate::sqlcheck::harness::result::QueryResult;
pub use crate::sqlcheck::harness::runner::{run_cases, CaseRunner};
pub use crate::sqlcheck::sdk::mock::MockRouter;
pub use crate::sqlcheck::sdk::router::{InsertBuilder, ResultSet, SdkError, SqlRouter};
pub use crate::sqlcheck::sdk::types::{Column, Schema, SqlType, Value};
