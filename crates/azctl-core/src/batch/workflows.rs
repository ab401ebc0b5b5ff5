//! Batch workflows - multi-step pool and job operations

use crate::error::{CoreError, Result};
use crate::progress::{ProgressCallback, wait_for_pool_steady};
use azctl_api::batch::{
    BatchClient, CloudPool, CloudServiceConfiguration, ImageReference, PoolCreateParams,
    VirtualMachineConfiguration,
};
use std::time::Duration;
use tracing::{debug, info};

/// Cloud service pool: legacy PaaS nodes selected by OS family
pub fn cloud_service_pool(
    pool_id: impl Into<String>,
    vm_size: impl Into<String>,
    target_dedicated_nodes: i32,
    os_family: impl Into<String>,
) -> PoolCreateParams {
    PoolCreateParams {
        id: pool_id.into(),
        vm_size: vm_size.into(),
        target_dedicated_nodes: Some(target_dedicated_nodes),
        cloud_service_configuration: Some(CloudServiceConfiguration {
            os_family: os_family.into(),
            os_version: None,
        }),
        virtual_machine_configuration: None,
    }
}

/// Virtual machine pool: IaaS nodes from a marketplace image
pub fn virtual_machine_pool(
    pool_id: impl Into<String>,
    vm_size: impl Into<String>,
    target_dedicated_nodes: i32,
    image: ImageReference,
    node_agent_sku_id: impl Into<String>,
) -> PoolCreateParams {
    PoolCreateParams {
        id: pool_id.into(),
        vm_size: vm_size.into(),
        target_dedicated_nodes: Some(target_dedicated_nodes),
        cloud_service_configuration: None,
        virtual_machine_configuration: Some(VirtualMachineConfiguration {
            image_reference: image,
            node_agent_sku_id: node_agent_sku_id.into(),
        }),
    }
}

/// Create a pool and wait for its allocation to settle.
///
/// This is a convenience workflow that:
/// 1. Skips creation when a pool with that id already exists
/// 2. Submits the pool otherwise
/// 3. Polls until the allocation state is steady or `timeout` is spent
pub async fn create_pool_and_wait(
    client: &BatchClient,
    params: &PoolCreateParams,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<CloudPool> {
    let pools = client.pools();

    if pools.exists(&params.id).await? {
        debug!("Pool {} already exists, skipping create", params.id);
    } else {
        info!("Creating pool {}", params.id);
        pools.create(params).await?;
    }

    wait_for_pool_steady(client, &params.id, timeout, interval, on_progress).await
}

/// Find a pool by id, comparing case-insensitively.
///
/// Pool ids are case-preserving but unique without regard to case, so a
/// lookup for `Render` finds the pool created as `render`. Returns
/// [`CoreError::NotFound`] when no pool matches.
pub async fn find_pool(client: &BatchClient, pool_id: &str) -> Result<CloudPool> {
    let pools = client.pools().list().await?;
    pools
        .into_iter()
        .find(|p| p.id.eq_ignore_ascii_case(pool_id))
        .ok_or_else(|| CoreError::NotFound(format!("pool '{}'", pool_id)))
}
