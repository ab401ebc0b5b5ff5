//! Bearer token acquisition for the Azure planes.
//!
//! Every client in this crate authenticates with a bearer token scoped to a
//! target resource (management plane, Batch service, or Key Vault). The
//! [`TokenCredential`] trait is the seam: "something that can produce a
//! bearer token for a resource". The one concrete implementation is
//! [`ClientSecretCredential`], which performs the OAuth2 client-credential
//! exchange against the identity provider.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer};
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::error::{ApiError, Result};

/// Default authority endpoint for token acquisition
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Tokens are refreshed this long before their reported expiry.
const EXPIRY_MARGIN_SECS: i64 = 120;

/// A bearer token plus its expiry
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_on: DateTime<Utc>,
}

impl AccessToken {
    /// True once the token is inside the refresh margin
    pub fn is_stale(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.expires_on
    }
}

/// Something that can produce a bearer token for a target resource
#[async_trait]
pub trait TokenCredential: Send + Sync {
    async fn get_token(&self, resource: &str) -> Result<AccessToken>;
}

/// OAuth2 client-credential exchange: application id + shared secret in,
/// bearer token out. Tokens are cached per resource and renewed
/// transparently when they go stale.
pub struct ClientSecretCredential {
    authority: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    http: reqwest::Client,
    cache: RwLock<HashMap<String, AccessToken>>,
}

impl ClientSecretCredential {
    pub fn new(
        authority: impl Into<String>,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            authority: authority.into().trim_end_matches('/').to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            http: reqwest::Client::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn token_endpoint(&self) -> String {
        format!("{}/{}/oauth2/token", self.authority, self.tenant_id)
    }

    async fn request_token(&self, resource: &str) -> Result<AccessToken> {
        let endpoint = self.token_endpoint();
        debug!("Requesting token from {} for {}", endpoint, resource);

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("resource", resource),
        ];

        let response = self.http.post(&endpoint).form(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::AuthenticationFailed {
                message: format!("token endpoint returned {}: {}", status, body),
            });
        }

        let token: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| ApiError::AuthenticationFailed {
                    message: format!("malformed token response: {}", e),
                })?;

        let lifetime = token.expires_in.unwrap_or(3600);
        Ok(AccessToken {
            token: token.access_token,
            expires_on: Utc::now() + Duration::seconds(lifetime as i64),
        })
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    async fn get_token(&self, resource: &str) -> Result<AccessToken> {
        {
            let cache = self.cache.read().await;
            if let Some(token) = cache.get(resource)
                && !token.is_stale()
            {
                trace!("Using cached token for {}", resource);
                return Ok(token.clone());
            }
        }

        let token = self.request_token(resource).await?;
        self.cache
            .write()
            .await
            .insert(resource.to_string(), token.clone());
        Ok(token)
    }
}

/// Fixed-token credential for tests and short-lived scripts
pub struct StaticTokenCredential {
    token: String,
}

impl StaticTokenCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn get_token(&self, _resource: &str) -> Result<AccessToken> {
        Ok(AccessToken {
            token: self.token.clone(),
            expires_on: Utc::now() + Duration::hours(1),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    // The identity provider historically returns this as a string.
    #[serde(default, deserialize_with = "string_or_number")]
    expires_in: Option<u64>,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Num(n)) => Ok(Some(n)),
        Some(Raw::Str(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_endpoint_shape() {
        let cred = ClientSecretCredential::new(
            "https://login.microsoftonline.com/",
            "my-tenant",
            "app",
            "secret",
        );
        assert_eq!(
            cred.token_endpoint(),
            "https://login.microsoftonline.com/my-tenant/oauth2/token"
        );
    }

    #[test]
    fn expires_in_accepts_string_and_number() {
        let s: TokenResponse =
            serde_json::from_str(r#"{"access_token": "t", "expires_in": "3599"}"#).unwrap();
        assert_eq!(s.expires_in, Some(3599));

        let n: TokenResponse =
            serde_json::from_str(r#"{"access_token": "t", "expires_in": 3599}"#).unwrap();
        assert_eq!(n.expires_in, Some(3599));

        let missing: TokenResponse = serde_json::from_str(r#"{"access_token": "t"}"#).unwrap();
        assert_eq!(missing.expires_in, None);
    }

    #[test]
    fn fresh_token_is_not_stale() {
        let token = AccessToken {
            token: "t".into(),
            expires_on: Utc::now() + Duration::hours(1),
        };
        assert!(!token.is_stale());

        let expiring = AccessToken {
            token: "t".into(),
            expires_on: Utc::now() + Duration::seconds(30),
        };
        assert!(expiring.is_stale());
    }
}
