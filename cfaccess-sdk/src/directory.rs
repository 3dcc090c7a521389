//! Directory service: users, groups and memberships

use crate::client::Client;
use crate::error::PlatformError;
use crate::pagination::{all_pages, Page};
use serde::{Deserialize, Serialize};

const QUERY_USERS: &str = "commonfate.control.directory.v1alpha1.DirectoryService/QueryUsers";
const QUERY_GROUPS_FOR_USER: &str =
    "commonfate.control.directory.v1alpha1.DirectoryService/QueryGroupsForUser";

// ============================================================================
// Types
// ============================================================================

/// A directory user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// A directory group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A user's membership of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroupMembership {
    #[serde(default)]
    pub group: Option<Group>,
}

impl UserGroupMembership {
    /// The ID of the group, if the platform returned one
    pub fn group_id(&self) -> Option<&str> {
        self.group.as_ref().map(|g| g.id.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryUsersRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryUsersResponse {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryGroupsForUserRequest {
    pub user_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryGroupsForUserResponse {
    #[serde(default)]
    pub memberships: Vec<UserGroupMembership>,
    #[serde(default)]
    pub next_page_token: String,
}

// ============================================================================
// Directory API
// ============================================================================

/// Directory API handle
pub struct Directory<'a> {
    client: &'a Client,
}

impl<'a> Directory<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetch one page of users
    pub async fn query_users(
        &self,
        request: QueryUsersRequest,
    ) -> Result<QueryUsersResponse, PlatformError> {
        self.client
            .unary(&self.client.config().api_url, QUERY_USERS, &request)
            .await
    }

    /// Fetch one page of a user's group memberships
    pub async fn query_groups_for_user(
        &self,
        request: QueryGroupsForUserRequest,
    ) -> Result<QueryGroupsForUserResponse, PlatformError> {
        self.client
            .unary(&self.client.config().api_url, QUERY_GROUPS_FOR_USER, &request)
            .await
    }

    /// Fetch every user in the directory
    pub async fn all_users(&self) -> Result<Vec<User>, PlatformError> {
        all_pages(|token| async move {
            let res = self
                .query_users(QueryUsersRequest {
                    page_token: token.unwrap_or_default(),
                })
                .await?;
            Ok(Page::new(res.users, res.next_page_token))
        })
        .await
    }

    /// Fetch every group membership for a user
    pub async fn all_groups_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<UserGroupMembership>, PlatformError> {
        all_pages(|token| async move {
            let res = self
                .query_groups_for_user(QueryGroupsForUserRequest {
                    user_id: user_id.to_string(),
                    page_token: token.unwrap_or_default(),
                })
                .await?;
            Ok(Page::new(res.memberships, res.next_page_token))
        })
        .await
    }
}
