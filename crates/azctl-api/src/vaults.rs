//! Key Vault management-plane operations.
//!
//! Covers vault creation, deletion and access policy updates. Updates go
//! through a full PUT of the vault properties, so callers read the current
//! vault, edit its policy list and write the whole thing back.

use serde::{Deserialize, Serialize};

use crate::arm::ArmClient;
use crate::error::Result;

const API_VERSION: &str = "2023-07-01";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    pub id: String,
    pub name: String,
    pub location: String,
    pub properties: VaultProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultProperties {
    pub tenant_id: String,
    pub sku: VaultSku,
    #[serde(default)]
    pub access_policies: Vec<AccessPolicyEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_for_deployment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_for_template_deployment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_for_disk_encryption: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultSku {
    pub family: String,
    pub name: VaultSkuName,
}

impl VaultSku {
    pub fn standard() -> Self {
        Self {
            family: "A".to_string(),
            name: VaultSkuName::Standard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultSkuName {
    Standard,
    Premium,
}

/// Grants one Active Directory principal a set of vault permissions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPolicyEntry {
    pub tenant_id: String,
    pub object_id: String,
    pub permissions: Permissions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    #[serde(default)]
    pub keys: Vec<KeyPermission>,
    #[serde(default)]
    pub secrets: Vec<SecretPermission>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyPermission {
    Get,
    List,
    Create,
    Import,
    Update,
    Delete,
    Backup,
    Restore,
    Recover,
    Purge,
    Encrypt,
    Decrypt,
    WrapKey,
    UnwrapKey,
    Sign,
    Verify,
}

impl KeyPermission {
    /// Every key permission the data plane recognises
    pub fn all() -> Vec<KeyPermission> {
        use KeyPermission::*;
        vec![
            Get, List, Create, Import, Update, Delete, Backup, Restore, Recover, Purge,
            Encrypt, Decrypt, WrapKey, UnwrapKey, Sign, Verify,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecretPermission {
    Get,
    List,
    Set,
    Delete,
    Backup,
    Restore,
    Recover,
    Purge,
}

impl SecretPermission {
    /// Every secret permission the data plane recognises
    pub fn all() -> Vec<SecretPermission> {
        use SecretPermission::*;
        vec![Get, List, Set, Delete, Backup, Restore, Recover, Purge]
    }
}

/// Request body for vault create and update
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultCreateParams {
    pub location: String,
    pub properties: VaultProperties,
}

/// Handler for vault management operations
pub struct VaultHandler {
    client: ArmClient,
}

impl VaultHandler {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }

    fn vault_path(&self, resource_group: &str, vault: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.KeyVault/vaults/{}",
            self.client.subscription_id(),
            resource_group,
            vault
        )
    }

    /// Create or update a vault
    pub async fn create(
        &self,
        resource_group: &str,
        vault: &str,
        params: &VaultCreateParams,
    ) -> Result<Vault> {
        self.client
            .put_json(&self.vault_path(resource_group, vault), API_VERSION, params)
            .await
    }

    /// Get a vault by name
    pub async fn get(&self, resource_group: &str, vault: &str) -> Result<Vault> {
        self.client
            .get_json(&self.vault_path(resource_group, vault), API_VERSION)
            .await
    }

    /// List vaults in a resource group
    pub async fn list_by_group(&self, resource_group: &str) -> Result<Vec<Vault>> {
        let path = format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.KeyVault/vaults",
            self.client.subscription_id(),
            resource_group
        );
        #[derive(Deserialize)]
        struct ListResult {
            #[serde(default)]
            value: Vec<Vault>,
        }
        let result: ListResult = self.client.get_json(&path, API_VERSION).await?;
        Ok(result.value)
    }

    /// Delete a vault
    pub async fn delete(&self, resource_group: &str, vault: &str) -> Result<()> {
        self.client
            .delete(&self.vault_path(resource_group, vault), API_VERSION)
            .await
    }

    /// Replace a vault's definition, used for access policy edits
    pub async fn update(
        &self,
        resource_group: &str,
        vault: &str,
        params: &VaultCreateParams,
    ) -> Result<Vault> {
        self.create(resource_group, vault, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_permissions_serialize_camel_case() {
        assert_eq!(
            serde_json::to_value(KeyPermission::WrapKey).unwrap(),
            "wrapKey"
        );
        assert_eq!(serde_json::to_value(KeyPermission::Get).unwrap(), "get");
    }

    #[test]
    fn all_permission_sets_are_distinct() {
        let keys = KeyPermission::all();
        assert_eq!(keys.len(), 16);
        let secrets = SecretPermission::all();
        assert_eq!(secrets.len(), 8);
    }

    #[test]
    fn vault_round_trips_access_policies() {
        let json = r#"{
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.KeyVault/vaults/v",
            "name": "v",
            "location": "westus",
            "properties": {
                "tenantId": "t",
                "sku": {"family": "A", "name": "standard"},
                "accessPolicies": [
                    {
                        "tenantId": "t",
                        "objectId": "o",
                        "permissions": {"keys": ["get"], "secrets": ["get", "list"]}
                    }
                ]
            }
        }"#;
        let vault: Vault = serde_json::from_str(json).unwrap();
        assert_eq!(vault.properties.access_policies.len(), 1);
        assert_eq!(
            vault.properties.access_policies[0].permissions.secrets,
            vec![SecretPermission::Get, SecretPermission::List]
        );
    }
}
