//! YAML test file model
//!
//! ```yaml
//! access-tests:
//!   - user: alice@example.com
//!     target: "123456789012"
//!     role: AdministratorAccess
//!     expected-result: requires-approval
//! group-tests:
//!   - user: alice@example.com
//!     group: grp_admins
//!     is-member: true
//! ```

use crate::error::CliError;
use serde::Deserialize;
use std::path::Path;

/// A parsed test file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestFile {
    #[serde(default)]
    pub access_tests: Vec<AccessTest>,
    #[serde(default)]
    pub group_tests: Vec<GroupTest>,
}

/// Expected access outcome for a user, target and role
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccessTest {
    /// Email of the user under test
    #[serde(default)]
    pub user: String,

    /// Target lookup string (account ID, name, ...)
    #[serde(default)]
    pub target: String,

    /// Role lookup string
    #[serde(default)]
    pub role: String,

    /// Literal expected result; validated when the test runs so that one bad
    /// value fails only its own test
    #[serde(default)]
    pub expected_result: String,
}

/// Expected group membership for a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupTest {
    #[serde(default)]
    pub user: String,

    /// Group ID
    #[serde(default)]
    pub group: String,

    #[serde(default)]
    pub is_member: bool,
}

impl GroupTest {
    /// "is member of" / "is not member of", as printed in results
    pub fn membership_text(&self) -> &'static str {
        if self.is_member {
            "is member of"
        } else {
            "is not member of"
        }
    }
}

impl TestFile {
    /// Read and parse a test file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CliError::ReadTestFile {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content).map_err(|source| CliError::ParseTestFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse test file contents
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}
