//! Common test utilities shared across test files.
//!
//! Items here may not be used by all test files, hence the module-level allow.
#![allow(dead_code)]

use async_trait::async_trait;
use cfaccess_cli::{AccessApi, DirectoryApi};
use cfaccess_sdk::{DebugEntitlementAccessResponse, Group, PlatformError, User, UserGroupMembership};
use std::collections::HashMap;
use std::sync::Mutex;

pub fn user(id: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        name: String::new(),
    }
}

pub fn membership(group_id: &str, name: &str) -> UserGroupMembership {
    UserGroupMembership {
        group: Some(Group {
            id: group_id.to_string(),
            name: name.to_string(),
            description: String::new(),
        }),
    }
}

// ===== Fake Directory =====

/// In-memory directory; users without an entry have no memberships.
#[derive(Default)]
pub struct FakeDirectory {
    pub users: Vec<User>,
    pub memberships: HashMap<String, Vec<UserGroupMembership>>,
    /// User IDs whose membership query fails
    pub failing_users: Vec<String>,
}

impl FakeDirectory {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users,
            ..Default::default()
        }
    }

    pub fn member_of(mut self, user_id: &str, groups: &[&str]) -> Self {
        self.memberships.insert(
            user_id.to_string(),
            groups.iter().map(|g| membership(g, g)).collect(),
        );
        self
    }
}

#[async_trait]
impl DirectoryApi for FakeDirectory {
    async fn list_users(&self) -> Result<Vec<User>, PlatformError> {
        Ok(self.users.clone())
    }

    async fn list_groups_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<UserGroupMembership>, PlatformError> {
        if self.failing_users.iter().any(|u| u == user_id) {
            return Err(PlatformError::ServiceUnavailable("directory down".to_string()));
        }
        Ok(self.memberships.get(user_id).cloned().unwrap_or_default())
    }
}

// ===== Fake Access =====

/// Returns configured flags per (user ID, target, role); unknown triples get
/// an invalid-request error. Records every call.
#[derive(Default)]
pub struct FakeAccess {
    pub results: HashMap<(String, String, String), DebugEntitlementAccessResponse>,
    pub calls: Mutex<Vec<(String, String, String)>>,
}

impl FakeAccess {
    pub fn grant(mut self, user_id: &str, target: &str, role: &str, can_request: bool, auto_approved: bool) -> Self {
        self.results.insert(
            (user_id.to_string(), target.to_string(), role.to_string()),
            DebugEntitlementAccessResponse {
                can_request,
                auto_approved,
            },
        );
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AccessApi for FakeAccess {
    async fn debug_entitlement_access(
        &self,
        user_id: &str,
        target: &str,
        role: &str,
    ) -> Result<DebugEntitlementAccessResponse, PlatformError> {
        let key = (user_id.to_string(), target.to_string(), role.to_string());
        self.calls.lock().unwrap().push(key.clone());
        self.results
            .get(&key)
            .copied()
            .ok_or_else(|| PlatformError::InvalidRequest(format!("unknown target {}", target)))
    }
}
