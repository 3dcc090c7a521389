//! OIDC client-credentials token source
//!
//! The token endpoint is discovered once from the issuer's
//! `/.well-known/openid-configuration` document. Access tokens are cached and
//! refreshed shortly before they expire.

use crate::error::PlatformError;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Refresh tokens this long before their reported expiry
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    token_endpoint: String,
}

/// Token endpoint response for the client-credentials grant
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// OAuth error body (RFC 6749 section 5.2)
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_at: Option<Instant>,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        self.refresh_at.map_or(true, |at| now < at)
    }
}

#[derive(Debug, Default)]
struct TokenState {
    token_endpoint: Option<String>,
    cached: Option<CachedToken>,
}

/// Fetches and caches bearer tokens for the platform APIs
pub(crate) struct TokenSource {
    issuer: String,
    client_id: String,
    client_secret: String,
    state: Mutex<TokenState>,
}

impl TokenSource {
    pub(crate) fn new(issuer: &str, client_id: &str, client_secret: &str) -> Self {
        Self {
            issuer: issuer.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            state: Mutex::new(TokenState::default()),
        }
    }

    /// Return a valid access token, fetching a new one if needed
    pub(crate) async fn token(&self, http: &reqwest::Client) -> Result<String, PlatformError> {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        if let Some(cached) = state.cached.as_ref().filter(|c| c.is_fresh(now)) {
            return Ok(cached.access_token.clone());
        }

        let token_endpoint = match state.token_endpoint.clone() {
            Some(endpoint) => endpoint,
            None => {
                let endpoint = self.discover(http).await?;
                state.token_endpoint = Some(endpoint.clone());
                endpoint
            }
        };

        let token = self.request_token(http, &token_endpoint).await?;
        let refresh_at = token
            .expires_in
            .map(|secs| now + Duration::from_secs(secs).saturating_sub(EXPIRY_MARGIN));

        tracing::debug!(
            expires_in = ?token.expires_in,
            "obtained access token via client credentials"
        );

        state.cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            refresh_at,
        });

        Ok(token.access_token)
    }

    async fn discover(&self, http: &reqwest::Client) -> Result<String, PlatformError> {
        let url = format!("{}/.well-known/openid-configuration", self.issuer);
        tracing::debug!(%url, "discovering OIDC token endpoint");

        let response = http
            .get(&url)
            .send()
            .await
            .map_err(PlatformError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Authentication(format!(
                "OIDC discovery at {} returned HTTP {}",
                url,
                status.as_u16()
            )));
        }

        let document = response.json::<DiscoveryDocument>().await.map_err(|e| {
            PlatformError::InvalidResponse(format!("Failed to parse OIDC discovery document: {}", e))
        })?;

        Ok(document.token_endpoint)
    }

    async fn request_token(
        &self,
        http: &reqwest::Client,
        token_endpoint: &str,
    ) -> Result<TokenResponse, PlatformError> {
        let response = http
            .post(token_endpoint)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(PlatformError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let msg = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
                Err(_) if body.is_empty() => format!("HTTP {}", status.as_u16()),
                Err(_) => body,
            };

            return Err(if status.is_client_error() {
                PlatformError::Authentication(msg)
            } else {
                PlatformError::from_status(status.as_u16(), msg)
            });
        }

        response.json::<TokenResponse>().await.map_err(|e| {
            PlatformError::InvalidResponse(format!("Failed to parse token response: {}", e))
        })
    }
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSource")
            .field("issuer", &self.issuer)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_discovery(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/.well-known/openid-configuration"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "issuer": server.uri(),
                "token_endpoint": format!("{}/oauth2/token", server.uri())
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn test_cached_token_freshness() {
        let now = Instant::now();
        let forever = CachedToken {
            access_token: "t".to_string(),
            refresh_at: None,
        };
        let expired = CachedToken {
            access_token: "t".to_string(),
            refresh_at: Some(now),
        };

        assert!(forever.is_fresh(now));
        assert!(!expired.is_fresh(now));
    }

    #[tokio::test]
    async fn test_token_is_fetched_once_and_cached() {
        let server = MockServer::start().await;
        mount_discovery(&server).await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=my-client"))
            .and(body_string_contains("client_secret=my-secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "token-123",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = TokenSource::new(&server.uri(), "my-client", "my-secret");
        let http = reqwest::Client::new();

        assert_eq!(source.token(&http).await.unwrap(), "token-123");
        assert_eq!(source.token(&http).await.unwrap(), "token-123");
    }

    #[tokio::test]
    async fn test_short_lived_token_is_refreshed() {
        let server = MockServer::start().await;
        mount_discovery(&server).await;

        // expires_in below the refresh margin, so every call refreshes
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "short",
                "expires_in": 5
            })))
            .expect(2)
            .mount(&server)
            .await;

        let source = TokenSource::new(&server.uri(), "c", "s");
        let http = reqwest::Client::new();

        source.token(&http).await.unwrap();
        source.token(&http).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let server = MockServer::start().await;
        mount_discovery(&server).await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": "invalid_client",
                "error_description": "Client authentication failed"
            })))
            .mount(&server)
            .await;

        let source = TokenSource::new(&server.uri(), "c", "wrong");
        let err = source.token(&reqwest::Client::new()).await.unwrap_err();

        assert!(matches!(err, PlatformError::Authentication(_)));
        assert!(err.to_string().contains("invalid_client"));
    }

    #[tokio::test]
    async fn test_discovery_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/.well-known/openid-configuration"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = TokenSource::new(&server.uri(), "c", "s");
        let err = source.token(&reqwest::Client::new()).await.unwrap_err();

        assert!(matches!(err, PlatformError::Authentication(_)));
    }
}
