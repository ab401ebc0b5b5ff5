//! Batch account management operations.

use serde::{Deserialize, Serialize};

use crate::arm::ArmClient;
use crate::error::Result;

const API_VERSION: &str = "2024-02-01";

/// A Batch account as returned by the management plane
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAccount {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub properties: BatchAccountProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAccountProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_storage: Option<AutoStorageProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedicated_core_quota: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_quota: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoStorageProperties {
    pub storage_account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_key_sync: Option<String>,
}

/// Request body for account creation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAccountCreateParams {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BatchAccountCreateProperties>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAccountCreateProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_storage: Option<AutoStorageCreateParams>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoStorageCreateParams {
    pub storage_account_id: String,
}

/// Access keys for a Batch account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAccountKeys {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    pub primary: String,
    pub secondary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKeyName {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegenerateKeyParams {
    key_name: AccountKeyName,
}

/// Per-region Batch quota
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchLocationQuota {
    pub account_quota: i64,
}

/// An application registered under a Batch account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: ApplicationProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub allow_updates: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCreateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<ApplicationCreateProperties>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCreateProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub allow_updates: bool,
}

/// A versioned package blob under an application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPackage {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: ApplicationPackageProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPackageProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_url_expiry: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResult<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

/// Handler for Batch account operations
pub struct BatchAccountHandler {
    client: ArmClient,
}

impl BatchAccountHandler {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }

    fn account_path(&self, resource_group: &str, account: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Batch/batchAccounts/{}",
            self.client.subscription_id(),
            resource_group,
            account
        )
    }

    /// Create or update a Batch account
    pub async fn create(
        &self,
        resource_group: &str,
        account: &str,
        params: &BatchAccountCreateParams,
    ) -> Result<BatchAccount> {
        self.client
            .put_json(&self.account_path(resource_group, account), API_VERSION, params)
            .await
    }

    /// Get a Batch account by name
    pub async fn get(&self, resource_group: &str, account: &str) -> Result<BatchAccount> {
        self.client
            .get_json(&self.account_path(resource_group, account), API_VERSION)
            .await
    }

    /// Delete a Batch account
    pub async fn delete(&self, resource_group: &str, account: &str) -> Result<()> {
        self.client
            .delete(&self.account_path(resource_group, account), API_VERSION)
            .await
    }

    /// List Batch accounts in a resource group
    pub async fn list_by_group(&self, resource_group: &str) -> Result<Vec<BatchAccount>> {
        let path = format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Batch/batchAccounts",
            self.client.subscription_id(),
            resource_group
        );
        let result: ListResult<BatchAccount> =
            self.client.get_json(&path, API_VERSION).await?;
        Ok(result.value)
    }

    /// List every Batch account in the subscription
    pub async fn list(&self) -> Result<Vec<BatchAccount>> {
        let path = format!(
            "/subscriptions/{}/providers/Microsoft.Batch/batchAccounts",
            self.client.subscription_id()
        );
        let result: ListResult<BatchAccount> =
            self.client.get_json(&path, API_VERSION).await?;
        Ok(result.value)
    }

    /// Get the account quota for a region
    pub async fn get_quota(&self, location: &str) -> Result<BatchLocationQuota> {
        let path = format!(
            "/subscriptions/{}/providers/Microsoft.Batch/locations/{}/quotas",
            self.client.subscription_id(),
            location
        );
        self.client.get_json(&path, API_VERSION).await
    }

    /// Fetch the account access keys
    pub async fn get_keys(&self, resource_group: &str, account: &str) -> Result<BatchAccountKeys> {
        let path = format!("{}/listKeys", self.account_path(resource_group, account));
        self.client.post_json(&path, API_VERSION, &()).await
    }

    /// Regenerate one of the account access keys
    pub async fn regenerate_key(
        &self,
        resource_group: &str,
        account: &str,
        key_name: AccountKeyName,
    ) -> Result<BatchAccountKeys> {
        let path = format!("{}/regenerateKeys", self.account_path(resource_group, account));
        self.client
            .post_json(&path, API_VERSION, &RegenerateKeyParams { key_name })
            .await
    }

    /// Register an application under an account
    pub async fn create_application(
        &self,
        resource_group: &str,
        account: &str,
        application: &str,
        params: &ApplicationCreateParams,
    ) -> Result<Application> {
        let path = format!(
            "{}/applications/{}",
            self.account_path(resource_group, account),
            application
        );
        self.client.put_json(&path, API_VERSION, params).await
    }

    /// Delete an application
    pub async fn delete_application(
        &self,
        resource_group: &str,
        account: &str,
        application: &str,
    ) -> Result<()> {
        let path = format!(
            "{}/applications/{}",
            self.account_path(resource_group, account),
            application
        );
        self.client.delete(&path, API_VERSION).await
    }

    /// Allocate a package version slot under an application
    pub async fn create_application_package(
        &self,
        resource_group: &str,
        account: &str,
        application: &str,
        version: &str,
    ) -> Result<ApplicationPackage> {
        let path = format!(
            "{}/applications/{}/versions/{}",
            self.account_path(resource_group, account),
            application,
            version
        );
        self.client.put_json(&path, API_VERSION, &()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_create_body_includes_auto_storage() {
        let params = BatchAccountCreateParams {
            location: "westus".to_string(),
            properties: Some(BatchAccountCreateProperties {
                auto_storage: Some(AutoStorageCreateParams {
                    storage_account_id: "/subscriptions/s/rg/x".to_string(),
                }),
            }),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["location"], "westus");
        assert_eq!(
            json["properties"]["autoStorage"]["storageAccountId"],
            "/subscriptions/s/rg/x"
        );
    }

    #[test]
    fn regenerate_key_body_uses_camel_case() {
        let body = RegenerateKeyParams {
            key_name: AccountKeyName::Primary,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["keyName"], "Primary");
    }

    #[test]
    fn quota_parses_account_quota() {
        let quota: BatchLocationQuota =
            serde_json::from_str(r#"{"accountQuota": 3}"#).unwrap();
        assert_eq!(quota.account_quota, 3);
    }
}
