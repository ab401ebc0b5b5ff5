//! Batch account command implementations

use azctl_api::accounts::{
    AccountKeyName, ApplicationCreateParams, ApplicationCreateProperties, BatchAccountHandler,
};
use azctl_core::management;
use tracing::debug;

use crate::cli::{AccountCommands, KeyKind};
use crate::commands::confirm;
use crate::connection::ConnectionManager;
use crate::error::AzctlError;
use crate::output::{OutputFormat, print_output};

/// Handle Batch account commands
pub async fn handle_account_command(
    cmd: &AccountCommands,
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    output_format: OutputFormat,
) -> Result<(), AzctlError> {
    let client = conn_mgr.create_arm_client(profile_name)?;
    let handler = BatchAccountHandler::new(client.clone());

    match cmd {
        AccountCommands::Create {
            name,
            resource_group,
            region,
            storage,
            application,
            display_name,
            allow_updates,
            package_version,
        } => match (storage, application) {
            (Some(storage_name), _) => {
                let account = management::create_account_with_storage(
                    &client,
                    resource_group,
                    region,
                    name,
                    storage_name,
                )
                .await?;
                print_output(account, output_format)?;
            }
            (None, Some(application_id)) => {
                let (account, app) = management::create_account_with_application(
                    &client,
                    resource_group,
                    region,
                    name,
                    application_id,
                    display_name.as_deref(),
                    *allow_updates,
                    package_version.as_deref(),
                )
                .await?;
                print_output(
                    serde_json::json!({ "account": account, "application": app }),
                    output_format,
                )?;
            }
            (None, None) => unreachable!("clap requires storage or application"),
        },
        AccountCommands::Show {
            name,
            resource_group,
        } => {
            let account = handler.get(resource_group, name).await?;
            print_output(account, output_format)?;
        }
        AccountCommands::List { resource_group } => {
            let accounts = match resource_group {
                Some(group) => handler.list_by_group(group).await?,
                None => handler.list().await?,
            };
            debug!("Found {} accounts", accounts.len());
            print_output(accounts, output_format)?;
        }
        AccountCommands::Delete {
            name,
            resource_group,
            storage,
            yes,
        } => {
            if !confirm(&format!("Delete Batch account '{}'?", name), *yes)? {
                return Ok(());
            }
            match storage {
                Some(storage_name) => {
                    management::delete_account_with_storage(
                        &client,
                        resource_group,
                        name,
                        storage_name,
                    )
                    .await?;
                }
                None => handler.delete(resource_group, name).await?,
            }
            println!("Deleted account '{}'", name);
        }
        AccountCommands::Keys {
            name,
            resource_group,
        } => {
            let keys = handler.get_keys(resource_group, name).await?;
            print_output(keys, output_format)?;
        }
        AccountCommands::RegenerateKey {
            name,
            resource_group,
            key,
        } => {
            let key_name = match key {
                KeyKind::Primary => AccountKeyName::Primary,
                KeyKind::Secondary => AccountKeyName::Secondary,
            };
            let keys = handler
                .regenerate_key(resource_group, name, key_name)
                .await?;
            print_output(keys, output_format)?;
        }
        AccountCommands::Quota { region } => {
            let quota = handler.get_quota(region).await?;
            let accounts = handler.list().await?;
            let in_use = management::region_usage(&accounts, region);
            print_output(
                serde_json::json!({
                    "region": region,
                    "accountQuota": quota.account_quota,
                    "accountsInUse": in_use,
                }),
                output_format,
            )?;
        }
        AccountCommands::AppCreate {
            application,
            account,
            resource_group,
            display_name,
            allow_updates,
            package_version,
        } => {
            let params = ApplicationCreateParams {
                properties: Some(ApplicationCreateProperties {
                    display_name: display_name.clone(),
                    allow_updates: *allow_updates,
                }),
            };
            let app = handler
                .create_application(resource_group, account, application, &params)
                .await?;
            if let Some(version) = package_version {
                handler
                    .create_application_package(resource_group, account, application, version)
                    .await?;
            }
            print_output(app, output_format)?;
        }
        AccountCommands::AppDelete {
            application,
            account,
            resource_group,
            yes,
        } => {
            if !confirm(
                &format!("Delete application '{}' from '{}'?", application, account),
                *yes,
            )? {
                return Ok(());
            }
            handler
                .delete_application(resource_group, account, application)
                .await?;
            println!("Deleted application '{}'", application);
        }
    }

    Ok(())
}
