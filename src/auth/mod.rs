//! Bearer-token acquisition for the service clients
//!
//! Every request to the catalog or deployment endpoints carries a bearer
//! token obtained from a [`TokenProvider`]. The production implementation
//! exchanges an API key at a token endpoint and caches the result until
//! shortly before expiry; tests inject [`StaticTokenProvider`] instead.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::client::ApiError;

/// Tokens within this window of their expiry are treated as stale so a
/// request never goes out with a token about to lapse mid-flight.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Capability for obtaining a bearer token for outgoing requests.
///
/// Implementations must be safe for concurrent token retrieval; the harness
/// shares one provider across all service clients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a token valid for at least the next request.
    async fn access_token(&self) -> Result<String, ApiError>;
}

/// Fixed token, for tests and pre-authenticated environments.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, ApiError> {
        Ok(self.token.clone())
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - now > Duration::seconds(EXPIRY_MARGIN_SECS)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Exchanges an API key for a bearer token and caches it until shortly
/// before expiry.
///
/// The cache is an explicit object with a single fetch-or-use-cached path;
/// concurrent callers serialize on the cache lock so at most one exchange is
/// in flight at a time.
pub struct IamTokenManager {
    client: reqwest::Client,
    token_url: String,
    api_key: String,
    cache: Mutex<Option<CachedToken>>,
}

impl IamTokenManager {
    pub fn new(
        client: reqwest::Client,
        token_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_url: token_url.into(),
            api_key: api_key.into(),
            cache: Mutex::new(None),
        }
    }

    async fn exchange(&self) -> Result<CachedToken, ApiError> {
        tracing::debug!(token_url = %self.token_url, "exchanging API key for bearer token");

        let response = self
            .client
            .post(&self.token_url)
            .form(&[("grant_type", "apikey"), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                operation: "token exchange",
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                operation: "token exchange",
                status,
                body,
            });
        }

        let token: TokenResponse =
            response
                .json()
                .await
                .map_err(|source| ApiError::Decode {
                    operation: "token exchange",
                    source,
                })?;

        Ok(CachedToken {
            token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        })
    }
}

#[async_trait]
impl TokenProvider for IamTokenManager {
    async fn access_token(&self) -> Result<String, ApiError> {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if cached.is_fresh(Utc::now()) {
                return Ok(cached.token.clone());
            }
        }

        let fresh = self.exchange().await?;
        let token = fresh.token.clone();
        *cache = Some(fresh);

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    #[tokio::test]
    async fn access_token_caches_until_expiry() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/identity/token");
            then.status(200)
                .json_body(serde_json::json!({"access_token": "tok-1", "expires_in": 3600}));
        });

        let manager = IamTokenManager::new(
            reqwest::Client::new(),
            server.url("/identity/token"),
            "api-key",
        );

        assert_eq!(manager.access_token().await.unwrap(), "tok-1");
        assert_eq!(manager.access_token().await.unwrap(), "tok-1");

        // Second call must come from the cache
        mock.assert_hits(1);
    }

    #[tokio::test]
    async fn expired_token_is_refreshed() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/identity/token");
            then.status(200)
                .json_body(serde_json::json!({"access_token": "tok-2", "expires_in": 10}));
        });

        let manager = IamTokenManager::new(
            reqwest::Client::new(),
            server.url("/identity/token"),
            "api-key",
        );

        // expires_in of 10s is inside the expiry margin, so every call
        // exchanges again
        assert_eq!(manager.access_token().await.unwrap(), "tok-2");
        assert_eq!(manager.access_token().await.unwrap(), "tok-2");
        mock.assert_hits(2);
    }

    #[tokio::test]
    async fn exchange_failure_includes_status_and_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/identity/token");
            then.status(401).body("invalid api key");
        });

        let manager = IamTokenManager::new(
            reqwest::Client::new(),
            server.url("/identity/token"),
            "bad-key",
        );

        let err = manager.access_token().await.expect_err("exchange fails");
        let message = err.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("invalid api key"));
    }
}
