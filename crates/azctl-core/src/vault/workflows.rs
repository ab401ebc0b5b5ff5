//! Vault workflows - provisioning, access policy edits, text encryption
//!
//! Access policy changes happen through read-modify-write of the whole
//! vault definition, because the management plane only accepts a full PUT.

use crate::error::{CoreError, Result};
use crate::vault::encoding::{decode_utf16, encode_utf16};
use azctl_api::arm::ArmClient;
use azctl_api::keyvault::{EncryptionAlgorithm, KeyVaultClient};
use azctl_api::vaults::{
    AccessPolicyEntry, KeyPermission, Permissions, SecretPermission, Vault, VaultCreateParams,
    VaultHandler, VaultProperties, VaultSku,
};
use tracing::info;

/// Create a vault granting one principal full key access plus secret
/// read rights.
///
/// The initial policy mirrors what an application doing envelope
/// encryption needs: every key permission, and get/list on secrets.
pub async fn create_vault(
    client: &ArmClient,
    resource_group: &str,
    vault_name: &str,
    region: &str,
    tenant_id: &str,
    object_id: &str,
) -> Result<Vault> {
    info!("Creating vault {} in {}", vault_name, region);
    let params = VaultCreateParams {
        location: region.to_string(),
        properties: VaultProperties {
            tenant_id: tenant_id.to_string(),
            sku: VaultSku::standard(),
            access_policies: vec![AccessPolicyEntry {
                tenant_id: tenant_id.to_string(),
                object_id: object_id.to_string(),
                permissions: Permissions {
                    keys: KeyPermission::all(),
                    secrets: vec![SecretPermission::Get, SecretPermission::List],
                },
            }],
            vault_uri: None,
            enabled_for_deployment: None,
            enabled_for_template_deployment: None,
            enabled_for_disk_encryption: None,
        },
    };

    let vault = VaultHandler::new(client.clone())
        .create(resource_group, vault_name, &params)
        .await?;
    Ok(vault)
}

/// Grant a principal full key access plus secret read rights on an
/// existing vault.
///
/// An existing policy for the principal is replaced, any other policies
/// are preserved.
pub async fn authorize_application(
    client: &ArmClient,
    resource_group: &str,
    vault_name: &str,
    tenant_id: &str,
    object_id: &str,
) -> Result<Vault> {
    let handler = VaultHandler::new(client.clone());
    let vault = handler.get(resource_group, vault_name).await?;

    let mut properties = vault.properties;
    properties
        .access_policies
        .retain(|p| p.object_id != object_id);
    properties.access_policies.push(AccessPolicyEntry {
        tenant_id: tenant_id.to_string(),
        object_id: object_id.to_string(),
        permissions: Permissions {
            keys: KeyPermission::all(),
            secrets: vec![SecretPermission::Get, SecretPermission::List],
        },
    });

    info!("Granting {} key access on vault {}", object_id, vault_name);
    let updated = handler
        .update(
            resource_group,
            vault_name,
            &VaultCreateParams {
                location: vault.location,
                properties,
            },
        )
        .await?;
    Ok(updated)
}

/// Widen a principal's secret permissions to the full set and open the
/// vault for deployment use.
///
/// The principal must already hold a policy on the vault; its key
/// permissions are left as they are.
pub async fn broaden_secret_permissions(
    client: &ArmClient,
    resource_group: &str,
    vault_name: &str,
    object_id: &str,
) -> Result<Vault> {
    let handler = VaultHandler::new(client.clone());
    let vault = handler.get(resource_group, vault_name).await?;

    let mut properties = vault.properties;
    let policy = properties
        .access_policies
        .iter_mut()
        .find(|p| p.object_id == object_id)
        .ok_or_else(|| {
            CoreError::NotFound(format!(
                "access policy for '{}' on vault '{}'",
                object_id, vault_name
            ))
        })?;
    policy.permissions.secrets = SecretPermission::all();
    properties.enabled_for_deployment = Some(true);
    properties.enabled_for_template_deployment = Some(true);

    info!(
        "Widening secret permissions for {} on vault {}",
        object_id, vault_name
    );
    let updated = handler
        .update(
            resource_group,
            vault_name,
            &VaultCreateParams {
                location: vault.location,
                properties,
            },
        )
        .await?;
    Ok(updated)
}

/// Encrypt text with a vault key using RSA-OAEP.
///
/// The text is framed as UTF-16 before encryption, so ciphertexts are
/// interchangeable with other tooling that uses the same framing.
pub async fn encrypt_text(
    client: &KeyVaultClient,
    vault_url: &str,
    key_name: &str,
    text: &str,
) -> Result<Vec<u8>> {
    let payload = encode_utf16(text);
    let result = client
        .encrypt(vault_url, key_name, EncryptionAlgorithm::RsaOaep, &payload)
        .await?;
    Ok(result.value)
}

/// Decrypt a ciphertext produced by [`encrypt_text`] back to text.
pub async fn decrypt_text(
    client: &KeyVaultClient,
    vault_url: &str,
    key_name: &str,
    ciphertext: &[u8],
) -> Result<String> {
    let result = client
        .decrypt(vault_url, key_name, EncryptionAlgorithm::RsaOaep, ciphertext)
        .await?;
    decode_utf16(&result.value)
}
