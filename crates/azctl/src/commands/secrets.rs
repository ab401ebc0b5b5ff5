//! Vault secret command implementations (data plane)

use azctl_api::keyvault::{KeyAttributes, SecretSetParams};
use tracing::debug;

use crate::cli::SecretCommands;
use crate::commands::confirm;
use crate::connection::ConnectionManager;
use crate::error::AzctlError;
use crate::output::{OutputFormat, print_output};

/// Handle vault secret commands
pub async fn handle_secret_command(
    cmd: &SecretCommands,
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    output_format: OutputFormat,
) -> Result<(), AzctlError> {
    let client = conn_mgr.create_keyvault_client(profile_name)?;

    match cmd {
        SecretCommands::Set {
            name,
            value,
            vault_url,
        } => {
            let params = SecretSetParams {
                value: value.clone(),
                content_type: None,
                attributes: None,
            };
            let secret = client.set_secret(vault_url, name, &params).await?;
            print_output(secret, output_format)?;
        }
        SecretCommands::Show { name, vault_url } => {
            let secret = client.get_secret(vault_url, name).await?;
            print_output(secret, output_format)?;
        }
        SecretCommands::List { vault_url } => {
            let secrets = client.list_secrets(vault_url).await?;
            debug!("Found {} secrets", secrets.len());
            print_output(secrets, output_format)?;
        }
        SecretCommands::UpdateExpiry {
            name,
            vault_url,
            expires,
        } => {
            let attributes = KeyAttributes {
                exp: Some(*expires),
                ..Default::default()
            };
            let secret = client.update_secret(vault_url, name, &attributes).await?;
            print_output(secret, output_format)?;
        }
        SecretCommands::Delete {
            name,
            vault_url,
            yes,
        } => {
            if !confirm(
                &format!("Delete secret '{}' and all its versions?", name),
                *yes,
            )? {
                return Ok(());
            }
            client.delete_secret(vault_url, name).await?;
            println!("Deleted secret '{}'", name);
        }
    }

    Ok(())
}
