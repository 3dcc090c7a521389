//! Client configuration

use crate::error::{PlatformError, RetryConfig};
use std::time::Duration;

/// Environment variable holding the API base URL
pub const ENV_API_URL: &str = "CF_API_URL";

/// Environment variable holding an optional separate access service URL
pub const ENV_ACCESS_URL: &str = "CF_ACCESS_URL";

/// Environment variable holding the OIDC issuer URL
pub const ENV_OIDC_ISSUER: &str = "CF_OIDC_ISSUER";

/// Environment variable holding the OIDC client ID
pub const ENV_OIDC_CLIENT_ID: &str = "CF_OIDC_CLIENT_ID";

/// Environment variable holding the OIDC client secret
pub const ENV_OIDC_CLIENT_SECRET: &str = "CF_OIDC_CLIENT_SECRET";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for a platform deployment
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL for the directory (control plane) API
    pub api_url: String,

    /// Base URL for the access API; usually the same as `api_url`
    pub access_url: String,

    /// OIDC issuer used to discover the token endpoint
    pub oidc_issuer: String,

    /// OIDC client ID for the client-credentials grant
    pub client_id: String,

    /// OIDC client secret for the client-credentials grant
    pub client_secret: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Retry behavior for RPC calls
    pub retry_config: RetryConfig,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("access_url", &self.access_url)
            .field("oidc_issuer", &self.oidc_issuer)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("retry_config", &self.retry_config)
            .finish()
    }
}

impl ClientConfig {
    /// Load the configuration from the process environment
    ///
    /// Reads `CF_API_URL`, `CF_OIDC_ISSUER`, `CF_OIDC_CLIENT_ID` and
    /// `CF_OIDC_CLIENT_SECRET`. `CF_ACCESS_URL` is optional and defaults to
    /// the API URL.
    pub fn from_env() -> Result<Self, PlatformError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PlatformError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    PlatformError::Configuration(format!(
                        "{} environment variable not set",
                        name
                    ))
                })
        };

        let mut builder = Self::builder()
            .api_url(required(ENV_API_URL)?)
            .oidc_issuer(required(ENV_OIDC_ISSUER)?)
            .client_id(required(ENV_OIDC_CLIENT_ID)?)
            .client_secret(required(ENV_OIDC_CLIENT_SECRET)?);

        if let Some(access_url) = lookup(ENV_ACCESS_URL).filter(|v| !v.trim().is_empty()) {
            builder = builder.access_url(access_url);
        }

        builder.build()
    }

    /// Create a builder for explicit configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`]
///
/// `api_url`, `oidc_issuer`, `client_id` and `client_secret` are required.
#[derive(Default)]
pub struct ClientConfigBuilder {
    api_url: Option<String>,
    access_url: Option<String>,
    oidc_issuer: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    timeout: Option<Duration>,
    retry_config: Option<RetryConfig>,
}

impl ClientConfigBuilder {
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn access_url(mut self, url: impl Into<String>) -> Self {
        self.access_url = Some(url.into());
        self
    }

    pub fn oidc_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.oidc_issuer = Some(issuer.into());
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Set the request timeout (default: 60s)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of retries (default: 2)
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        let mut config = self.retry_config.take().unwrap_or_default();
        config.max_retries = max_retries;
        self.retry_config = Some(config);
        self
    }

    /// Set custom retry configuration
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    pub fn build(self) -> Result<ClientConfig, PlatformError> {
        let missing = |field: &str| PlatformError::Configuration(format!("{} is required", field));

        let api_url = trim_url(self.api_url.ok_or_else(|| missing("API URL"))?);
        let access_url = self
            .access_url
            .map(trim_url)
            .unwrap_or_else(|| api_url.clone());

        Ok(ClientConfig {
            api_url,
            access_url,
            oidc_issuer: trim_url(self.oidc_issuer.ok_or_else(|| missing("OIDC issuer"))?),
            client_id: self.client_id.ok_or_else(|| missing("OIDC client ID"))?,
            client_secret: self
                .client_secret
                .ok_or_else(|| missing("OIDC client secret"))?,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            retry_config: self.retry_config.unwrap_or_default(),
        })
    }
}

fn trim_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
