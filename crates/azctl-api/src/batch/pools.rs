//! Pool operations against the Batch service.

use serde::{Deserialize, Serialize};

use super::BatchClient;
use crate::error::Result;

/// Allocation state of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationState {
    Steady,
    Resizing,
    Stopping,
}

/// A pool as returned by the Batch service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudPool {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation_state: Option<AllocationState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_dedicated_nodes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_dedicated_nodes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_service_configuration: Option<CloudServiceConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_machine_configuration: Option<VirtualMachineConfiguration>,
}

/// PaaS node family selection (legacy cloud service pools)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudServiceConfiguration {
    pub os_family: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
}

/// Marketplace image selection for IaaS pools
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    pub publisher: String,
    pub offer: String,
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineConfiguration {
    pub image_reference: ImageReference,
    pub node_agent_sku_id: String,
}

/// Request body for pool creation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolCreateParams {
    pub id: String,
    pub vm_size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_dedicated_nodes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_service_configuration: Option<CloudServiceConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_machine_configuration: Option<VirtualMachineConfiguration>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolResizeParams {
    pub target_dedicated_nodes: i32,
}

#[derive(Debug, Deserialize)]
struct PoolListResult {
    #[serde(default)]
    value: Vec<CloudPool>,
}

/// Handler for pool operations
pub struct PoolHandler {
    client: BatchClient,
}

impl PoolHandler {
    pub fn new(client: BatchClient) -> Self {
        Self { client }
    }

    /// Submit a pool for creation. Allocation continues after this returns.
    pub async fn create(&self, params: &PoolCreateParams) -> Result<()> {
        self.client.post_json("/pools", params).await
    }

    /// Get a pool by id
    pub async fn get(&self, pool_id: &str) -> Result<CloudPool> {
        self.client.get_json(&format!("/pools/{}", pool_id)).await
    }

    /// Check whether a pool exists without fetching its body
    pub async fn exists(&self, pool_id: &str) -> Result<bool> {
        self.client.head(&format!("/pools/{}", pool_id)).await
    }

    /// List all pools under the account
    pub async fn list(&self) -> Result<Vec<CloudPool>> {
        let result: PoolListResult = self.client.get_json("/pools").await?;
        Ok(result.value)
    }

    /// Start a resize to the given dedicated node count
    pub async fn resize(&self, pool_id: &str, target_dedicated_nodes: i32) -> Result<()> {
        self.client
            .post_json(
                &format!("/pools/{}/resize", pool_id),
                &PoolResizeParams {
                    target_dedicated_nodes,
                },
            )
            .await
    }

    /// Delete a pool
    pub async fn delete(&self, pool_id: &str) -> Result<()> {
        self.client.delete(&format!("/pools/{}", pool_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_state_parses_lowercase() {
        let state: AllocationState = serde_json::from_str(r#""steady""#).unwrap();
        assert_eq!(state, AllocationState::Steady);
        let state: AllocationState = serde_json::from_str(r#""resizing""#).unwrap();
        assert_eq!(state, AllocationState::Resizing);
    }

    #[test]
    fn iaas_pool_body_shape() {
        let params = PoolCreateParams {
            id: "p".to_string(),
            vm_size: "STANDARD_D1_V2".to_string(),
            target_dedicated_nodes: Some(3),
            cloud_service_configuration: None,
            virtual_machine_configuration: Some(VirtualMachineConfiguration {
                image_reference: ImageReference {
                    publisher: "canonical".to_string(),
                    offer: "ubuntu-24_04-lts".to_string(),
                    sku: "server".to_string(),
                    version: None,
                },
                node_agent_sku_id: "batch.node.ubuntu 24.04".to_string(),
            }),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["vmSize"], "STANDARD_D1_V2");
        assert_eq!(json["targetDedicatedNodes"], 3);
        assert_eq!(
            json["virtualMachineConfiguration"]["imageReference"]["offer"],
            "ubuntu-24_04-lts"
        );
        assert!(json.get("cloudServiceConfiguration").is_none());
    }
}
