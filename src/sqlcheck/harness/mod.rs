//! Fixture-driven validation harness
//!
//! Flow for one case:
//!
//! 1. Parse the YAML case file ([`case`])
//! 2. Create and populate input tables through the driver ([`runner`])
//! 3. Execute the case's SQL, materializing the last outcome ([`result`])
//! 4. Build one checker per expectation key and run them fail-fast
//!    ([`checker`])
//! 5. Aggregate per-case outcomes into a run report ([`report`])

pub mod case;
pub mod checker;
pub mod error;
pub mod report;
pub mod result;
pub mod runner;

pub use case::{CaseFile, Expectation, InputDesc, TestCase};
pub use checker::{build_checkers, run_checks, Checker};
pub use error::{CheckError, CheckResult};
pub use report::{CaseReport, CaseStatus, OutputFormat, RunReport};
pub use result::QueryResult;
pub use runner::{run_cases, CaseRunner};
