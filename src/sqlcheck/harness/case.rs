//! Test case and expectation fixtures
//!
//! Defines the YAML case-file format:
//!
//! ```yaml
//! db: test_db
//! cases:
//!   - desc: simple projection
//!     inputs:
//!       - name: t1
//!         columns: ["c1 string", "c2 int", "c4 timestamp"]
//!         rows:
//!           - ["aa", 2, 1590738989000]
//!     sql: select * from t1;
//!     expect:
//!       order: c1
//!       columns: ["c1 string", "c2 int32", "c4 timestamp"]
//!       rows:
//!         - ["aa", 2, 1590738989000]
//! ```
//!
//! An `expect` block may carry any subset of `rows`, `columns`, `count`,
//! `success` and `order`. Unknown keys are captured at parse time and
//! rejected when checkers are built, so a typo in a fixture fails loudly
//! instead of silently validating nothing.

use super::error::{CheckError, CheckResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A case file: shared database name plus a list of cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFile {
    /// Database the cases run against
    #[serde(default)]
    pub db: Option<String>,

    /// Test cases
    pub cases: Vec<TestCase>,
}

/// One declarative test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Stable case id, used for filtering
    #[serde(default)]
    pub id: Option<String>,

    /// Human-readable description
    #[serde(default)]
    pub desc: Option<String>,

    /// Input tables created and populated before the SQL runs
    #[serde(default)]
    pub inputs: Vec<InputDesc>,

    /// SQL to execute; a scalar or a list, checked against the last result
    #[serde(default, deserialize_with = "scalar_or_seq")]
    pub sql: Vec<String>,

    /// Expected outcome
    #[serde(default)]
    pub expect: Option<Expectation>,
}

impl TestCase {
    /// Display name for reports: id, else desc, else a placeholder.
    pub fn display_name(&self) -> &str {
        self.id
            .as_deref()
            .or(self.desc.as_deref())
            .unwrap_or("(unnamed case)")
    }
}

/// An input table: name, `"name type"` column strings, literal rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDesc {
    /// Table name
    pub name: String,

    /// Column definitions as `"name type"` strings
    pub columns: Vec<String>,

    /// Literal rows to insert
    #[serde(default)]
    pub rows: Vec<Vec<serde_yaml::Value>>,
}

impl InputDesc {
    /// Render the CREATE TABLE statement for this input.
    pub fn create_statement(&self) -> CheckResult<String> {
        let mut defs = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let (name, ty) = split_column(column)?;
            defs.push(format!("{} {}", name, ty));
        }
        Ok(format!("create table {}({});", self.name, defs.join(", ")))
    }

    /// Render the parameterized INSERT statement for this input.
    pub fn insert_statement(&self) -> String {
        let holes = vec!["?"; self.columns.len()].join(", ");
        format!("insert into {} values ({});", self.name, holes)
    }
}

/// The declarative expectation record.
///
/// Every field is optional; the set of checkers run is exactly the set of
/// recognized keys present. `order` is a modifier consumed by the rows
/// check, not a checker of its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Expectation {
    /// Expected result rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Vec<serde_yaml::Value>>>,

    /// Expected result columns as `"name type"` strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,

    /// Expected row count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,

    /// Expected success flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    /// Column to sort both row sets by before comparison
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,

    /// Unrecognized keys, rejected by the checker factory
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_yaml::Value>,
}

/// Split a `"name type"` column string; the type is the last whitespace
/// token, anything before it is the name.
pub fn split_column(column: &str) -> CheckResult<(&str, &str)> {
    let mut tokens = column.split_whitespace();
    let name = tokens.next();
    let mut ty = None;
    for token in tokens {
        ty = Some(token);
    }
    match (name, ty) {
        (Some(name), Some(ty)) => Ok((name, ty)),
        _ => Err(CheckError::MalformedColumn {
            column: column.to_string(),
        }),
    }
}

fn scalar_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(stmt) => vec![stmt],
        OneOrMany::Many(stmts) => stmts,
    })
}

impl CaseFile {
    /// Load a case file from YAML on disk.
    pub fn from_file(path: impl AsRef<Path>) -> CheckResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CheckError::Io {
            message: e.to_string(),
            path: path.display().to_string(),
        })?;
        Self::from_yaml(&content, path.display().to_string())
    }

    /// Parse a case file from a YAML string.
    pub fn from_yaml(yaml: &str, file_name: String) -> CheckResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| CheckError::CaseParse {
            message: e.to_string(),
            file: file_name,
        })
    }

    /// Structural validation without execution: column strings must split,
    /// declared types in inputs must be known, and every expectation must
    /// construct its checker list.
    pub fn validate(&self) -> CheckResult<()> {
        use crate::sqlcheck::harness::checker::build_checkers;
        use crate::sqlcheck::sdk::types::SqlType;

        for case in &self.cases {
            for input in &case.inputs {
                for column in &input.columns {
                    let (_, ty) = split_column(column)?;
                    if SqlType::parse(ty).is_none() {
                        return Err(CheckError::MalformedColumn {
                            column: column.clone(),
                        });
                    }
                }
            }
            if let Some(expect) = &case.expect {
                build_checkers(expect)?;
            }
        }
        Ok(())
    }

    /// Case lookup by id.
    pub fn get_case(&self, id: &str) -> Option<&TestCase> {
        self.cases.iter().find(|c| c.id.as_deref() == Some(id))
    }
}
