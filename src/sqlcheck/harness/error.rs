//! Error types for the validation harness
//!
//! One taxonomy covers the whole crate: schema errors (unknown expectation
//! key, malformed column string, unparsable case file), assertion errors
//! (check mismatches, always surfaced and never swallowed), coercion errors
//! (fixture literal does not parse as the declared type), and driver/SDK
//! errors. There are no partial-failure semantics; the first failure aborts
//! the remaining checks for an expectation.

use crate::sqlcheck::sdk::router::SdkError;
use std::fmt;
use std::io;

/// Main error type for harness operations
#[derive(Debug, Clone)]
pub enum CheckError {
    /// Failed to parse a case or result file
    CaseParse { message: String, file: String },

    /// Expectation carries a key no checker recognizes
    UnknownChecker { key: String },

    /// A `"name type"` column string is malformed
    MalformedColumn { column: String },

    /// A fixture literal does not parse as the declared column type
    Coercion {
        column: String,
        value: String,
        message: String,
    },

    /// A checker found a mismatch (test failure, not an error)
    CheckFailed {
        check: String,
        expected: String,
        actual: String,
        message: String,
    },

    /// Operation on a closed connection
    ConnectionClosed,

    /// Operation on a closed cursor
    CursorClosed,

    /// Statement the cursor does not dispatch
    Unsupported { command: String },

    /// Parameter binding failure (count mismatch, nullability, type)
    Parameter { message: String },

    /// Error reported by the router SDK
    Sdk { message: String },

    /// IO error (file operations)
    Io { message: String, path: String },
}

impl CheckError {
    /// Whether this is an assertion failure rather than a harness error.
    pub fn is_assertion(&self) -> bool {
        matches!(self, CheckError::CheckFailed { .. })
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::CaseParse { message, file } => {
                if file.is_empty() {
                    write!(f, "case parse error: {}", message)
                } else {
                    write!(f, "case parse error in {}: {}", file, message)
                }
            }
            CheckError::UnknownChecker { key } => {
                write!(f, "no checker available for expectation key '{}'", key)
            }
            CheckError::MalformedColumn { column } => {
                write!(f, "malformed column definition '{}'", column)
            }
            CheckError::Coercion {
                column,
                value,
                message,
            } => {
                write!(
                    f,
                    "cannot coerce '{}' for column '{}': {}",
                    value, column, message
                )
            }
            CheckError::CheckFailed {
                check,
                expected,
                actual,
                message,
            } => {
                write!(
                    f,
                    "check '{}' failed: {} (expected: {}, actual: {})",
                    check, message, expected, actual
                )
            }
            CheckError::ConnectionClosed => write!(f, "connection object is closed"),
            CheckError::CursorClosed => write!(f, "cursor object is closed"),
            CheckError::Unsupported { command } => {
                write!(f, "unsupported command: {}", command)
            }
            CheckError::Parameter { message } => write!(f, "parameter error: {}", message),
            CheckError::Sdk { message } => write!(f, "router sdk error: {}", message),
            CheckError::Io { message, path } => {
                if path.is_empty() {
                    write!(f, "io error: {}", message)
                } else {
                    write!(f, "io error for '{}': {}", path, message)
                }
            }
        }
    }
}

impl std::error::Error for CheckError {}

impl From<io::Error> for CheckError {
    fn from(err: io::Error) -> Self {
        CheckError::Io {
            message: err.to_string(),
            path: String::new(),
        }
    }
}

impl From<serde_yaml::Error> for CheckError {
    fn from(err: serde_yaml::Error) -> Self {
        CheckError::CaseParse {
            message: err.to_string(),
            file: String::new(),
        }
    }
}

impl From<SdkError> for CheckError {
    fn from(err: SdkError) -> Self {
        CheckError::Sdk {
            message: err.message,
        }
    }
}

/// Result type alias for harness operations
pub type CheckResult<T> = Result<T, CheckError>;
