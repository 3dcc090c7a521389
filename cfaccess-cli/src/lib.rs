//! Access testing tools for the access platform
//!
//! This crate provides:
//! - The YAML test file model (`access-tests` and `group-tests`)
//! - Expected/observed outcome comparison for entitlement checks
//! - A test runner and line-oriented reporter
//! - Shared setup for the `access-test`, `debug-entitlement` and
//!   `check-group-membership` binaries

mod error;
pub mod outcome;
pub mod report;
pub mod runner;
pub mod setup;
pub mod testfile;

pub use error::CliError;
pub use outcome::{AccessOutcome, InvalidExpectedResult, OutcomeMismatch};
pub use report::{Reporter, Summary};
pub use runner::{find_member_group, AccessApi, DirectoryApi, TestRunner, UserDirectory, Verdict};
pub use testfile::{AccessTest, GroupTest, TestFile};
