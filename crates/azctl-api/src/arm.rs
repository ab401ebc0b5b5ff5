//! Management-plane (ARM) client.
//!
//! All management-plane resources live under
//! `/subscriptions/{id}/...` and every call carries a bearer token for the
//! management endpoint plus an `api-version` query parameter. The per-domain
//! handlers ([`crate::accounts`], [`crate::storage`], [`crate::vaults`])
//! build paths and delegate the HTTP mechanics to this client.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::TokenCredential;
use crate::error::{ApiError, Result};

/// Default management endpoint
pub const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";

/// Authenticated client for the management plane
#[derive(Clone)]
pub struct ArmClient {
    base_url: String,
    subscription_id: String,
    credential: Arc<dyn TokenCredential>,
    http: reqwest::Client,
}

impl ArmClient {
    pub fn builder() -> ArmClientBuilder {
        ArmClientBuilder::default()
    }

    /// The subscription all resource paths are scoped to
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    async fn bearer(&self) -> Result<String> {
        Ok(self.credential.get_token(&self.base_url).await?.token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
    ) -> Result<T> {
        let token = self.bearer().await?;
        trace!("GET {}", path);
        let response = self
            .http
            .get(self.url(path))
            .query(&[("api-version", api_version)])
            .bearer_auth(token)
            .send()
            .await?;
        Self::into_json(response).await
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
        body: &B,
    ) -> Result<T> {
        let token = self.bearer().await?;
        trace!("PUT {}", path);
        let response = self
            .http
            .put(self.url(path))
            .query(&[("api-version", api_version)])
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::into_json(response).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
        body: &B,
    ) -> Result<T> {
        let token = self.bearer().await?;
        trace!("POST {}", path);
        let response = self
            .http
            .post(self.url(path))
            .query(&[("api-version", api_version)])
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::into_json(response).await
    }

    pub(crate) async fn delete(&self, path: &str, api_version: &str) -> Result<()> {
        let token = self.bearer().await?;
        debug!("DELETE {}", path);
        let response = self
            .http
            .delete(self.url(path))
            .query(&[("api-version", api_version)])
            .bearer_auth(token)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, &body))
        }
    }

    async fn into_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, &body))
        }
    }
}

/// Builder for [`ArmClient`]
#[derive(Default)]
pub struct ArmClientBuilder {
    endpoint: Option<String>,
    subscription_id: Option<String>,
    credential: Option<Arc<dyn TokenCredential>>,
    user_agent: Option<String>,
}

impl ArmClientBuilder {
    /// Management endpoint, defaults to the public cloud
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn subscription_id(mut self, id: impl Into<String>) -> Self {
        self.subscription_id = Some(id.into());
        self
    }

    pub fn credential(mut self, credential: Arc<dyn TokenCredential>) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    pub fn build(self) -> Result<ArmClient> {
        let subscription_id = self
            .subscription_id
            .ok_or_else(|| ApiError::Config("subscription_id is required".into()))?;
        let credential = self
            .credential
            .ok_or_else(|| ApiError::Config("credential is required".into()))?;

        let base_url = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_MANAGEMENT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();
        Url::parse(&base_url).map_err(|e| {
            ApiError::Config(format!("invalid management endpoint '{}': {}", base_url, e))
        })?;

        let mut http = reqwest::Client::builder();
        if let Some(ua) = self.user_agent {
            http = http.user_agent(ua);
        }
        let http = http
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(ArmClient {
            base_url,
            subscription_id,
            credential,
            http,
        })
    }
}
