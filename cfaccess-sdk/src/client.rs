//! Platform API client

use crate::access::Access;
use crate::auth::TokenSource;
use crate::config::ClientConfig;
use crate::directory::Directory;
use crate::error::{ConnectErrorBody, PlatformError, RetryConfig};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::sync::Arc;

/// Connect protocol version header value
const CONNECT_PROTOCOL_VERSION: &str = "1";

// ============================================================================
// Client
// ============================================================================

/// Client for the platform's directory and access APIs
///
/// Cloning is cheap; clones share the HTTP connection pool and the cached
/// access token.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    tokens: Arc<TokenSource>,
}

impl Client {
    /// Create a client from explicit configuration
    pub fn new(config: ClientConfig) -> Result<Self, PlatformError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                PlatformError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        let tokens = TokenSource::new(
            &config.oidc_issuer,
            &config.client_id,
            &config.client_secret,
        );

        Ok(Self {
            http,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
        })
    }

    /// Create a client from the `CF_*` environment variables
    pub fn from_env() -> Result<Self, PlatformError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get a handle to the directory API
    pub fn directory(&self) -> Directory<'_> {
        Directory::new(self)
    }

    /// Get a handle to the access API
    pub fn access(&self) -> Access<'_> {
        Access::new(self)
    }

    /// Invoke a Connect unary procedure, retrying transient failures
    ///
    /// `procedure` is the fully qualified `package.Service/Method` path.
    pub(crate) async fn unary<Req, Res>(
        &self,
        base_url: &str,
        procedure: &str,
        request: &Req,
    ) -> Result<Res, PlatformError>
    where
        Req: serde::Serialize,
        Res: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{}", base_url, procedure);
        let retry_config: &RetryConfig = &self.config.retry_config;
        let mut last_error: Option<PlatformError> = None;

        for attempt in 0..=retry_config.max_retries {
            let headers = self.build_headers().await?;
            tracing::debug!(procedure, attempt, "calling platform API");

            let result = self
                .http
                .post(&url)
                .headers(headers)
                .json(request)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return response.json::<Res>().await.map_err(|e| {
                            PlatformError::InvalidResponse(format!(
                                "Failed to parse {} response: {}",
                                procedure, e
                            ))
                        });
                    }

                    let status_code = status.as_u16();
                    let retry_after = RetryConfig::parse_retry_after(response.headers());
                    let error_body = response.text().await.unwrap_or_default();
                    let error = parse_error_response(&error_body, status_code);

                    if attempt < retry_config.max_retries
                        && (error.is_retryable() || PlatformError::is_retryable_status(status_code))
                    {
                        // Server hints never exceed the configured ceiling
                        let delay = retry_after
                            .map(|d| d.min(retry_config.max_delay))
                            .unwrap_or_else(|| retry_config.delay_for_attempt(attempt));
                        tracing::warn!(
                            procedure,
                            status = status_code,
                            delay_ms = delay.as_millis() as u64,
                            "retrying platform API call: {}",
                            error
                        );
                        tokio::time::sleep(delay).await;
                        last_error = Some(error);
                        continue;
                    }

                    return Err(error);
                }
                Err(e) => {
                    let error = PlatformError::from_reqwest_error(e);

                    if attempt < retry_config.max_retries && error.is_retryable() {
                        let delay = retry_config.delay_for_attempt(attempt);
                        tracing::warn!(
                            procedure,
                            delay_ms = delay.as_millis() as u64,
                            "retrying platform API call: {}",
                            error
                        );
                        tokio::time::sleep(delay).await;
                        last_error = Some(error);
                        continue;
                    }

                    return Err(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| PlatformError::Other("Max retries exceeded".to_string())))
    }

    async fn build_headers(&self) -> Result<HeaderMap, PlatformError> {
        let token = self.tokens.token(&self.http).await?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                PlatformError::InvalidResponse(format!("Access token is not a valid header: {}", e))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "connect-protocol-version",
            HeaderValue::from_static(CONNECT_PROTOCOL_VERSION),
        );
        Ok(headers)
    }
}

// ============================================================================
// Shared Helpers
// ============================================================================

fn parse_error_response(body: &str, status_code: u16) -> PlatformError {
    if let Ok(error) = serde_json::from_str::<ConnectErrorBody>(body) {
        return PlatformError::from_connect_error(&error, status_code);
    }

    let msg = if body.is_empty() {
        format!("HTTP {}", status_code)
    } else {
        body.to_string()
    };

    PlatformError::from_status(status_code, msg)
}
