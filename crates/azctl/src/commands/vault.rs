//! Vault command implementations (management plane)

use azctl_api::vaults::VaultHandler;
use azctl_core::vault;
use tracing::debug;

use crate::cli::VaultCommands;
use crate::commands::confirm;
use crate::connection::ConnectionManager;
use crate::error::AzctlError;
use crate::output::{OutputFormat, print_output};

/// Handle vault commands
pub async fn handle_vault_command(
    cmd: &VaultCommands,
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    output_format: OutputFormat,
) -> Result<(), AzctlError> {
    let client = conn_mgr.create_arm_client(profile_name)?;
    let handler = VaultHandler::new(client.clone());

    match cmd {
        VaultCommands::Create {
            name,
            resource_group,
            region,
            object_id,
        } => {
            let tenant_id = conn_mgr.tenant_id(profile_name)?;
            let created =
                vault::create_vault(&client, resource_group, name, region, &tenant_id, object_id)
                    .await?;
            print_output(created, output_format)?;
        }
        VaultCommands::Show {
            name,
            resource_group,
        } => {
            let found = handler.get(resource_group, name).await?;
            print_output(found, output_format)?;
        }
        VaultCommands::List { resource_group } => {
            let vaults = handler.list_by_group(resource_group).await?;
            debug!("Found {} vaults", vaults.len());
            print_output(vaults, output_format)?;
        }
        VaultCommands::Delete {
            name,
            resource_group,
            yes,
        } => {
            if !confirm(&format!("Delete vault '{}'?", name), *yes)? {
                return Ok(());
            }
            handler.delete(resource_group, name).await?;
            println!("Deleted vault '{}'", name);
        }
        VaultCommands::Authorize {
            name,
            resource_group,
            object_id,
        } => {
            let tenant_id = conn_mgr.tenant_id(profile_name)?;
            let updated = vault::authorize_application(
                &client,
                resource_group,
                name,
                &tenant_id,
                object_id,
            )
            .await?;
            print_output(updated, output_format)?;
        }
        VaultCommands::BroadenSecrets {
            name,
            resource_group,
            object_id,
        } => {
            let updated =
                vault::broaden_secret_permissions(&client, resource_group, name, object_id).await?;
            print_output(updated, output_format)?;
        }
    }

    Ok(())
}
