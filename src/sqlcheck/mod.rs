//! sqlcheck module tree
//!
//! - [`sdk`]: trait seam to the opaque SQL router SDK
//! - [`driver`]: DBAPI-shaped connection/cursor wrapper
//! - [`harness`]: fixture parsing, checkers, runner and reporting

pub mod driver;
pub mod harness;
pub mod sdk;
