//! Access and group-membership test runner

use crate::error::CliError;
use crate::outcome::AccessOutcome;
use crate::report::{Reporter, Summary};
use crate::testfile::{AccessTest, GroupTest, TestFile};
use async_trait::async_trait;
use cfaccess_sdk::{
    Client, DebugEntitlementAccessRequest, DebugEntitlementAccessResponse, PlatformError,
    Specifier, User, UserGroupMembership,
};
use std::io::Write;

// ============================================================================
// API seams
// ============================================================================

/// Directory queries the runner depends on
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Every user in the directory
    async fn list_users(&self) -> Result<Vec<User>, PlatformError>;

    /// Every group membership of one user
    async fn list_groups_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<UserGroupMembership>, PlatformError>;
}

/// Entitlement queries the runner depends on
#[async_trait]
pub trait AccessApi: Send + Sync {
    /// Debug whether `user_id` can request `role` on `target`
    async fn debug_entitlement_access(
        &self,
        user_id: &str,
        target: &str,
        role: &str,
    ) -> Result<DebugEntitlementAccessResponse, PlatformError>;
}

#[async_trait]
impl DirectoryApi for Client {
    async fn list_users(&self) -> Result<Vec<User>, PlatformError> {
        self.directory().all_users().await
    }

    async fn list_groups_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<UserGroupMembership>, PlatformError> {
        self.directory().all_groups_for_user(user_id).await
    }
}

#[async_trait]
impl AccessApi for Client {
    async fn debug_entitlement_access(
        &self,
        user_id: &str,
        target: &str,
        role: &str,
    ) -> Result<DebugEntitlementAccessResponse, PlatformError> {
        self.access()
            .debug_entitlement_access(DebugEntitlementAccessRequest {
                principal: Specifier::user(user_id),
                target: Specifier::lookup(target),
                role: Specifier::lookup(role),
            })
            .await
    }
}

// ============================================================================
// User lookup
// ============================================================================

/// Users fetched once per run for email-to-ID lookups
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Fetch every user from the directory
    pub async fn fetch(api: &dyn DirectoryApi) -> Result<Self, PlatformError> {
        Ok(Self::new(api.list_users().await?))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Find a user by exact email match; the first match wins
    pub fn find_by_email(&self, email: &str) -> Result<&User, CliError> {
        self.users
            .iter()
            .find(|u| u.email == email)
            .ok_or_else(|| CliError::UserNotFound(email.to_string()))
    }
}

/// Find the membership for `group_id`, if the user has one
pub fn find_member_group<'m>(
    memberships: &'m [UserGroupMembership],
    group_id: &str,
) -> Option<&'m UserGroupMembership> {
    memberships.iter().find(|m| m.group_id() == Some(group_id))
}

// ============================================================================
// Runner
// ============================================================================

/// Result of a single test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Passed,

    /// Passed, but only because a missing user implies the expected absence
    /// of access
    PassedWithWarning(String),

    Failed(String),
}

impl Verdict {
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Failed(_))
    }
}

/// Runs access and group-membership tests against the platform
pub struct TestRunner<'a> {
    directory: &'a dyn DirectoryApi,
    access: &'a dyn AccessApi,
    users: UserDirectory,
}

impl<'a> TestRunner<'a> {
    pub fn new(
        directory: &'a dyn DirectoryApi,
        access: &'a dyn AccessApi,
        users: UserDirectory,
    ) -> Self {
        Self {
            directory,
            access,
            users,
        }
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    /// Check one expected access outcome
    pub async fn run_access_test(&self, test: &AccessTest) -> Verdict {
        let expected = match test.expected_result.parse::<AccessOutcome>() {
            Ok(expected) => expected,
            Err(e) => return Verdict::Failed(e.to_string()),
        };

        let user = match self.users.find_by_email(&test.user) {
            Ok(user) => user,
            Err(e) if expected == AccessOutcome::NoAccess => {
                return Verdict::PassedWithWarning(format!(
                    "error when finding user for email {}, ignoring because expected-result is no-access: {}",
                    test.user, e
                ));
            }
            Err(e) => return Verdict::Failed(e.to_string()),
        };

        tracing::debug!(
            user = %test.user,
            user_id = %user.id,
            target = %test.target,
            role = %test.role,
            "debugging entitlement access"
        );

        let result = match self
            .access
            .debug_entitlement_access(&user.id, &test.target, &test.role)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                return Verdict::Failed(format!(
                    "error calling the Common Fate DebugEntitlementAccess API: {}",
                    e
                ))
            }
        };

        match expected.check(AccessOutcome::from(&result)) {
            Ok(()) => Verdict::Passed,
            Err(mismatch) => Verdict::Failed(mismatch.to_string()),
        }
    }

    /// Check one expected group membership
    pub async fn run_group_test(&self, test: &GroupTest) -> Verdict {
        let user = match self.users.find_by_email(&test.user) {
            Ok(user) => user,
            Err(e) if !test.is_member => {
                return Verdict::PassedWithWarning(format!(
                    "error when finding user for email {}, ignoring because is-member is false: {}",
                    test.user, e
                ));
            }
            Err(e) => return Verdict::Failed(e.to_string()),
        };

        tracing::debug!(user = %test.user, user_id = %user.id, group = %test.group, "checking group membership");

        let memberships = match self.directory.list_groups_for_user(&user.id).await {
            Ok(memberships) => memberships,
            Err(e) => {
                return Verdict::Failed(format!(
                    "error calling the QueryGroupsForUser API: {}",
                    e
                ))
            }
        };

        let is_member = find_member_group(&memberships, &test.group).is_some();

        match (test.is_member, is_member) {
            (true, false) => Verdict::Failed("user is not member of group".to_string()),
            (false, true) => Verdict::Failed("user is member of group".to_string()),
            _ => Verdict::Passed,
        }
    }

    /// Run every test in the file, reporting each result as it completes
    pub async fn run<W: Write>(
        &self,
        tests: &TestFile,
        reporter: &mut Reporter<W>,
    ) -> Result<Summary, CliError> {
        reporter.access_section(tests.access_tests.len())?;
        for test in &tests.access_tests {
            let verdict = self.run_access_test(test).await;
            reporter.access_result(test, &verdict)?;
        }

        reporter.group_section(tests.group_tests.len())?;
        for test in &tests.group_tests {
            let verdict = self.run_group_test(test).await;
            reporter.group_result(test, &verdict)?;
        }

        Ok(reporter.summary()?)
    }
}
