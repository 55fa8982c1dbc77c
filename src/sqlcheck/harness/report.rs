//! Run report generation
//!
//! Aggregates per-case outcomes into a report renderable as human-readable
//! text or machine-readable JSON. A case that failed a check is `Failed`; a
//! case that could not run (parse error, SDK error, bad fixture) is `Error`.

use super::error::CheckError;
use serde::{Deserialize, Serialize};

/// Output formats for rendered reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

/// Status of a single case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Passed,
    Failed,
    Error,
}

/// Report for one case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub name: String,
    pub status: CaseStatus,
    /// Failure or error detail, absent when passed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Summary statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
}

/// Complete run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Suite name (usually the case file)
    pub suite: String,
    pub summary: RunSummary,
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            summary: RunSummary::default(),
            cases: Vec::new(),
        }
    }

    /// Record one case outcome.
    pub fn record(&mut self, name: impl Into<String>, outcome: &Result<(), CheckError>) {
        let (status, detail) = match outcome {
            Ok(()) => (CaseStatus::Passed, None),
            Err(e) if e.is_assertion() => (CaseStatus::Failed, Some(e.to_string())),
            Err(e) => (CaseStatus::Error, Some(e.to_string())),
        };
        self.summary.total += 1;
        match status {
            CaseStatus::Passed => self.summary.passed += 1,
            CaseStatus::Failed => self.summary.failed += 1,
            CaseStatus::Error => self.summary.errors += 1,
        }
        self.cases.push(CaseReport {
            name: name.into(),
            status,
            detail,
        });
    }

    pub fn all_passed(&self) -> bool {
        self.summary.failed == 0 && self.summary.errors == 0
    }

    /// Render in the requested format.
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.render_text(),
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
            }
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("suite: {}\n", self.suite));
        for case in &self.cases {
            let marker = match case.status {
                CaseStatus::Passed => "PASS",
                CaseStatus::Failed => "FAIL",
                CaseStatus::Error => "ERROR",
            };
            out.push_str(&format!("  [{}] {}\n", marker, case.name));
            if let Some(detail) = &case.detail {
                out.push_str(&format!("         {}\n", detail));
            }
        }
        out.push_str(&format!(
            "{} total, {} passed, {} failed, {} errors\n",
            self.summary.total, self.summary.passed, self.summary.failed, self.summary.errors
        ));
        out
    }
}
