//! Batch service (data-plane) client.
//!
//! Talks to an account endpoint such as `https://{account}.{region}.batch.azure.com`
//! with a bearer token for the Batch resource. Handlers per entity type hang
//! off [`BatchClient`]:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use azctl_api::auth::StaticTokenCredential;
//! # use azctl_api::batch::BatchClient;
//! # async fn example() -> azctl_api::Result<()> {
//! let client = BatchClient::builder()
//!     .endpoint("https://myaccount.westus.batch.azure.com")
//!     .credential(Arc::new(StaticTokenCredential::new("token")))
//!     .build()?;
//! let pool = client.pools().get("render-pool").await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::TokenCredential;
use crate::error::{ApiError, Result};

mod jobs;
mod pools;
mod schedules;

pub use jobs::*;
pub use pools::*;
pub use schedules::*;

const API_VERSION: &str = "2024-02-01.19.0";

/// Token audience for the Batch service
pub const BATCH_RESOURCE: &str = "https://batch.core.windows.net/";

/// Authenticated client for one Batch account endpoint
#[derive(Clone)]
pub struct BatchClient {
    base_url: String,
    credential: Arc<dyn TokenCredential>,
    http: reqwest::Client,
}

impl std::fmt::Debug for BatchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl BatchClient {
    pub fn builder() -> BatchClientBuilder {
        BatchClientBuilder::default()
    }

    pub fn pools(&self) -> PoolHandler {
        PoolHandler::new(self.clone())
    }

    pub fn jobs(&self) -> JobHandler {
        JobHandler::new(self.clone())
    }

    pub fn tasks(&self) -> TaskHandler {
        TaskHandler::new(self.clone())
    }

    pub fn job_schedules(&self) -> JobScheduleHandler {
        JobScheduleHandler::new(self.clone())
    }

    async fn bearer(&self) -> Result<String> {
        Ok(self.credential.get_token(BATCH_RESOURCE).await?.token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.bearer().await?;
        trace!("GET {}", path);
        let response = self
            .http
            .get(self.url(path))
            .query(&[("api-version", API_VERSION)])
            .bearer_auth(token)
            .send()
            .await?;
        Self::into_json(response).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<()> {
        let token = self.bearer().await?;
        debug!("POST {}", path);
        let response = self
            .http
            .post(self.url(path))
            .query(&[("api-version", API_VERSION)])
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let token = self.bearer().await?;
        debug!("DELETE {}", path);
        let response = self
            .http
            .delete(self.url(path))
            .query(&[("api-version", API_VERSION)])
            .bearer_auth(token)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    /// HEAD request, distinguishes "exists" from "not found" without a body
    pub(crate) async fn head(&self, path: &str) -> Result<bool> {
        let token = self.bearer().await?;
        trace!("HEAD {}", path);
        let response = self
            .http
            .head(self.url(path))
            .query(&[("api-version", API_VERSION)])
            .bearer_auth(token)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Ok(false)
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

    async fn expect_success(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, &body))
        }
    }
}

/// Builder for [`BatchClient`]
#[derive(Default)]
pub struct BatchClientBuilder {
    endpoint: Option<String>,
    credential: Option<Arc<dyn TokenCredential>>,
    user_agent: Option<String>,
}

impl BatchClientBuilder {
    /// Account endpoint, e.g. `https://myaccount.westus.batch.azure.com`
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
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

    pub fn build(self) -> Result<BatchClient> {
        let base_url = self
            .endpoint
            .ok_or_else(|| ApiError::Config("batch endpoint is required".into()))?
            .trim_end_matches('/')
            .to_string();
        Url::parse(&base_url)
            .map_err(|e| ApiError::Config(format!("invalid batch endpoint '{}': {}", base_url, e)))?;
        let credential = self
            .credential
            .ok_or_else(|| ApiError::Config("credential is required".into()))?;

        let mut http = reqwest::Client::builder();
        if let Some(ua) = self.user_agent {
            http = http.user_agent(ua);
        }
        let http = http
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(BatchClient {
            base_url,
            credential,
            http,
        })
    }
}
