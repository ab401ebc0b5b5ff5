//! Management workflows - multi-step account operations
//!
//! These workflows compose individual management calls with quota checks
//! and additional logic.

use crate::error::{CoreError, Result};
use azctl_api::accounts::{
    Application, ApplicationCreateParams, ApplicationCreateProperties, AutoStorageCreateParams,
    BatchAccount, BatchAccountCreateParams, BatchAccountCreateProperties, BatchAccountHandler,
};
use azctl_api::arm::ArmClient;
use azctl_api::storage::{StorageAccountCreateParams, StorageAccountHandler};
use tracing::{info, warn};

/// Count the Batch accounts already placed in a region.
///
/// Region names compare case-insensitively; the management plane reports
/// `westus` but accepts `WestUS` on create.
pub fn region_usage(accounts: &[BatchAccount], region: &str) -> i64 {
    accounts
        .iter()
        .filter(|a| a.location.eq_ignore_ascii_case(region))
        .count() as i64
}

/// Fail with [`CoreError::QuotaExceeded`] if the region has no room for
/// another Batch account.
///
/// The quota is per subscription per region, so this lists every account
/// in the subscription and counts the ones placed in `region`.
pub async fn ensure_region_capacity(client: &ArmClient, region: &str) -> Result<()> {
    let handler = BatchAccountHandler::new(client.clone());

    let quota = handler.get_quota(region).await?.account_quota;
    let accounts = handler.list().await?;
    let in_use = region_usage(&accounts, region);

    if in_use >= quota {
        return Err(CoreError::QuotaExceeded {
            region: region.to_string(),
            quota,
            in_use,
        });
    }
    Ok(())
}

/// Create a Batch account with a paired auto-storage account.
///
/// This is a convenience workflow that:
/// 1. Checks the region has quota for another account
/// 2. Creates the storage account
/// 3. Creates the Batch account bound to it
pub async fn create_account_with_storage(
    client: &ArmClient,
    resource_group: &str,
    region: &str,
    account_name: &str,
    storage_name: &str,
) -> Result<BatchAccount> {
    ensure_region_capacity(client, region).await?;

    info!("Creating storage account {}", storage_name);
    let storage = StorageAccountHandler::new(client.clone())
        .create(
            resource_group,
            storage_name,
            &StorageAccountCreateParams::standard_lrs(region),
        )
        .await?;

    info!("Creating Batch account {}", account_name);
    let account = BatchAccountHandler::new(client.clone())
        .create(
            resource_group,
            account_name,
            &BatchAccountCreateParams {
                location: region.to_string(),
                properties: Some(BatchAccountCreateProperties {
                    auto_storage: Some(AutoStorageCreateParams {
                        storage_account_id: storage.id,
                    }),
                }),
            },
        )
        .await?;

    Ok(account)
}

/// Create a Batch account and register an application under it.
///
/// When `package_version` is given a package slot is allocated as well, so
/// the caller can upload the application binary afterwards.
pub async fn create_account_with_application(
    client: &ArmClient,
    resource_group: &str,
    region: &str,
    account_name: &str,
    application_id: &str,
    display_name: Option<&str>,
    allow_updates: bool,
    package_version: Option<&str>,
) -> Result<(BatchAccount, Application)> {
    ensure_region_capacity(client, region).await?;

    let handler = BatchAccountHandler::new(client.clone());

    info!("Creating Batch account {}", account_name);
    let account = handler
        .create(
            resource_group,
            account_name,
            &BatchAccountCreateParams {
                location: region.to_string(),
                properties: None,
            },
        )
        .await?;

    info!("Registering application {}", application_id);
    let application = handler
        .create_application(
            resource_group,
            account_name,
            application_id,
            &ApplicationCreateParams {
                properties: Some(ApplicationCreateProperties {
                    display_name: display_name.map(str::to_string),
                    allow_updates,
                }),
            },
        )
        .await?;

    if let Some(version) = package_version {
        info!("Allocating package slot {}@{}", application_id, version);
        handler
            .create_application_package(resource_group, account_name, application_id, version)
            .await?;
    }

    Ok((account, application))
}

/// Delete a Batch account and its paired storage account.
///
/// The two deletes are not atomic. If the account delete succeeds but the
/// storage delete fails, this returns [`CoreError::PartialDelete`] so the
/// caller knows the storage account is orphaned rather than still paired.
pub async fn delete_account_with_storage(
    client: &ArmClient,
    resource_group: &str,
    account_name: &str,
    storage_name: &str,
) -> Result<()> {
    info!("Deleting Batch account {}", account_name);
    BatchAccountHandler::new(client.clone())
        .delete(resource_group, account_name)
        .await?;

    info!("Deleting storage account {}", storage_name);
    if let Err(e) = StorageAccountHandler::new(client.clone())
        .delete(resource_group, storage_name)
        .await
    {
        warn!(
            "Batch account {} deleted but storage {} remains: {}",
            account_name, storage_name, e
        );
        return Err(CoreError::PartialDelete {
            account: account_name.to_string(),
            storage: storage_name.to_string(),
            source: e,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str, location: &str) -> BatchAccount {
        serde_json::from_value(serde_json::json!({
            "id": format!("/subscriptions/s/batchAccounts/{}", name),
            "name": name,
            "location": location,
            "properties": {}
        }))
        .unwrap()
    }

    #[test]
    fn region_usage_counts_case_insensitively() {
        let accounts = vec![
            account("a", "westus"),
            account("b", "WestUS"),
            account("c", "eastus"),
        ];
        assert_eq!(region_usage(&accounts, "westus"), 2);
        assert_eq!(region_usage(&accounts, "EASTUS"), 1);
        assert_eq!(region_usage(&accounts, "northeurope"), 0);
    }

    #[test]
    fn region_usage_of_empty_listing_is_zero() {
        assert_eq!(region_usage(&[], "westus"), 0);
    }
}
