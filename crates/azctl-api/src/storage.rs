//! Storage account management operations.
//!
//! Only the slice needed to pair a storage account with a Batch account:
//! create a general-purpose v2 account and delete it again.

use serde::{Deserialize, Serialize};

use crate::arm::ArmClient;
use crate::error::Result;

const API_VERSION: &str = "2023-05-01";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccount {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub properties: StorageAccountProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountCreateParams {
    pub location: String,
    pub sku: StorageSku,
    pub kind: StorageKind,
}

impl StorageAccountCreateParams {
    /// Standard locally-redundant general-purpose v2 account
    pub fn standard_lrs(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            sku: StorageSku {
                name: "Standard_LRS".to_string(),
            },
            kind: StorageKind::StorageV2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSku {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageKind {
    StorageV2,
    BlobStorage,
    FileStorage,
}

/// Handler for storage account operations
pub struct StorageAccountHandler {
    client: ArmClient,
}

impl StorageAccountHandler {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }

    fn account_path(&self, resource_group: &str, account: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts/{}",
            self.client.subscription_id(),
            resource_group,
            account
        )
    }

    /// Create or update a storage account
    pub async fn create(
        &self,
        resource_group: &str,
        account: &str,
        params: &StorageAccountCreateParams,
    ) -> Result<StorageAccount> {
        self.client
            .put_json(&self.account_path(resource_group, account), API_VERSION, params)
            .await
    }

    /// Get a storage account by name
    pub async fn get(&self, resource_group: &str, account: &str) -> Result<StorageAccount> {
        self.client
            .get_json(&self.account_path(resource_group, account), API_VERSION)
            .await
    }

    /// Delete a storage account
    pub async fn delete(&self, resource_group: &str, account: &str) -> Result<()> {
        self.client
            .delete(&self.account_path(resource_group, account), API_VERSION)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_lrs_body_shape() {
        let params = StorageAccountCreateParams::standard_lrs("westus");
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["location"], "westus");
        assert_eq!(json["sku"]["name"], "Standard_LRS");
        assert_eq!(json["kind"], "StorageV2");
    }
}
