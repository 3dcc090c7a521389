//! Access service: entitlement debugging

use crate::client::Client;
use crate::error::PlatformError;
use serde::{Deserialize, Serialize};

const DEBUG_ENTITLEMENT_ACCESS: &str =
    "commonfate.access.v1alpha1.AccessService/DebugEntitlementAccess";

/// Entity type used for directory users
pub const USER_ENTITY_TYPE: &str = "CF::User";

/// A typed entity identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eid {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub id: String,
}

/// Identifies an entity either exactly or by a free-form lookup string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Specifier {
    /// An exact entity ID
    Eid(Eid),

    /// A lookup string the platform resolves (name, alias, ID, ...)
    Lookup(String),
}

impl Specifier {
    /// Specify a directory user by ID
    pub fn user(id: impl Into<String>) -> Self {
        Specifier::Eid(Eid {
            entity_type: USER_ENTITY_TYPE.to_string(),
            id: id.into(),
        })
    }

    pub fn lookup(value: impl Into<String>) -> Self {
        Specifier::Lookup(value.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugEntitlementAccessRequest {
    pub principal: Specifier,
    pub target: Specifier,
    pub role: Specifier,
}

/// Whether a principal could request an entitlement, and whether it would be
/// auto-approved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugEntitlementAccessResponse {
    #[serde(default)]
    pub can_request: bool,
    #[serde(default)]
    pub auto_approved: bool,
}

/// Access API handle
pub struct Access<'a> {
    client: &'a Client,
}

impl<'a> Access<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Evaluate whether a principal can request a role on a target
    pub async fn debug_entitlement_access(
        &self,
        request: DebugEntitlementAccessRequest,
    ) -> Result<DebugEntitlementAccessResponse, PlatformError> {
        self.client
            .unary(
                &self.client.config().access_url,
                DEBUG_ENTITLEMENT_ACCESS,
                &request,
            )
            .await
    }
}
