//! Trait seam to the external SQL router SDK
//!
//! The actual query engine, its storage and its RPC plumbing are opaque
//! collaborators. This module defines the narrow surface the harness talks
//! to: typed values and schemas, a router trait for DDL/insert/query, and a
//! scriptable in-memory implementation used by tests and the CLI.

pub mod mock;
pub mod router;
pub mod types;

pub use mock::MockRouter;
pub use router::{InsertBuilder, ResultSet, SdkError, SdkResult, SqlRouter};
pub use types::{Column, Schema, SqlType, Value};
