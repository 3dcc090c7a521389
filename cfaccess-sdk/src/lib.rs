//! Minimal client for the access platform's directory and entitlement APIs
//!
//! This crate speaks the platform's Connect (JSON over HTTP) API. It covers
//! just enough surface to query directory users and group memberships and to
//! debug entitlement access for a user.
//!
//! # Quick Start
//!
//! ```no_run
//! // Requires CF_API_URL, CF_OIDC_ISSUER, CF_OIDC_CLIENT_ID, CF_OIDC_CLIENT_SECRET
//! use cfaccess_sdk::{Client, DebugEntitlementAccessRequest, Specifier};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::from_env()?;
//!
//! let users = client.directory().all_users().await?;
//! let user = users.iter().find(|u| u.email == "alice@example.com").unwrap();
//!
//! let result = client
//!     .access()
//!     .debug_entitlement_access(DebugEntitlementAccessRequest {
//!         principal: Specifier::user(&user.id),
//!         target: Specifier::lookup("123456789012"),
//!         role: Specifier::lookup("AdministratorAccess"),
//!     })
//!     .await?;
//!
//! println!("can request: {}, auto approved: {}", result.can_request, result.auto_approved);
//! # Ok(())
//! # }
//! ```
//!
//! # Retry Configuration
//!
//! ```
//! use cfaccess_sdk::{ClientConfig, RetryConfig};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::builder()
//!     .api_url("https://api.example.com")
//!     .oidc_issuer("https://auth.example.com")
//!     .client_id("client-id")
//!     .client_secret("client-secret")
//!     .retry_config(RetryConfig {
//!         max_retries: 3,
//!         base_delay: Duration::from_millis(250),
//!         max_delay: Duration::from_secs(4),
//!         jitter: 0.25,
//!     })
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// Domain modules
pub mod access;
mod auth;
mod client;
mod config;
pub mod directory;
mod error;
pub mod pagination;

// Client types
pub use client::Client;
pub use config::{
    ClientConfig, ClientConfigBuilder, ENV_ACCESS_URL, ENV_API_URL, ENV_OIDC_CLIENT_ID,
    ENV_OIDC_CLIENT_SECRET, ENV_OIDC_ISSUER,
};

// Error types
pub use error::{ConnectErrorBody, PlatformError, RetryConfig};

// Directory
pub use directory::{Group, User, UserGroupMembership};

// Access
pub use access::{DebugEntitlementAccessRequest, DebugEntitlementAccessResponse, Eid, Specifier};

// Pagination
pub use pagination::{all_pages, Page};
