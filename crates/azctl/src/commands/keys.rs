//! Vault key command implementations (data plane)

use azctl_api::keyvault::{KeyAttributes, KeyCreateParams, KeyUpdateParams};
use azctl_core::vault::{decrypt_text, encrypt_text};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::cli::KeyCommands;
use crate::commands::confirm;
use crate::connection::ConnectionManager;
use crate::error::AzctlError;
use crate::output::{OutputFormat, print_output};

/// Handle vault key commands
pub async fn handle_key_command(
    cmd: &KeyCommands,
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    output_format: OutputFormat,
) -> Result<(), AzctlError> {
    let client = conn_mgr.create_keyvault_client(profile_name)?;

    match cmd {
        KeyCommands::Create {
            name,
            vault_url,
            size,
        } => {
            let params = KeyCreateParams::rsa(*size);
            let key = client.create_key(vault_url, name, &params).await?;
            print_output(key, output_format)?;
        }
        KeyCommands::Show { name, vault_url } => {
            let key = client.get_key(vault_url, name).await?;
            print_output(key, output_format)?;
        }
        KeyCommands::List { vault_url } => {
            let keys = client.list_keys(vault_url).await?;
            debug!("Found {} keys", keys.len());
            print_output(keys, output_format)?;
        }
        KeyCommands::UpdateExpiry {
            name,
            vault_url,
            expires,
        } => {
            let params = KeyUpdateParams {
                attributes: Some(KeyAttributes {
                    exp: Some(*expires),
                    ..Default::default()
                }),
                ..Default::default()
            };
            let key = client.update_key(vault_url, name, &params).await?;
            print_output(key, output_format)?;
        }
        KeyCommands::Delete {
            name,
            vault_url,
            yes,
        } => {
            if !confirm(&format!("Delete key '{}' and all its versions?", name), *yes)? {
                return Ok(());
            }
            client.delete_key(vault_url, name).await?;
            println!("Deleted key '{}'", name);
        }
        KeyCommands::Encrypt {
            name,
            text,
            vault_url,
        } => {
            let ciphertext = encrypt_text(&client, vault_url, name, text).await?;
            println!("{}", STANDARD.encode(&ciphertext));
        }
        KeyCommands::Decrypt {
            name,
            ciphertext,
            vault_url,
        } => {
            let raw = STANDARD
                .decode(ciphertext)
                .map_err(|e| AzctlError::InvalidInput {
                    message: format!("ciphertext is not valid base64: {}", e),
                })?;
            let text = decrypt_text(&client, vault_url, name, &raw).await?;
            println!("{}", text);
        }
    }

    Ok(())
}
