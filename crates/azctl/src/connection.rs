//! Connection management for Azure management, Batch, and Key Vault clients

use std::sync::Arc;

use anyhow::Context;
use azctl_api::arm::ArmClient;
use azctl_api::auth::ClientSecretCredential;
use azctl_api::batch::BatchClient;
use azctl_api::keyvault::KeyVaultClient;
use azctl_core::Config;
use tracing::{debug, info, trace};

use crate::error::Result as CliResult;

/// User agent string for azctl HTTP requests
const AZCTL_USER_AGENT: &str = concat!("azctl/", env!("CARGO_PKG_VERSION"));

/// Credentials after profile resolution and environment overrides
struct ResolvedCredentials {
    subscription_id: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    management_endpoint: String,
    authority: String,
    batch_endpoint: Option<String>,
}

/// Connection manager for creating authenticated clients
#[derive(Clone)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<std::path::PathBuf>,
}

impl ConnectionManager {
    /// Create a new connection manager with a custom config path
    pub fn with_config_path(config: Config, config_path: Option<std::path::PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Save the configuration to the appropriate location
    pub fn save_config(&self) -> CliResult<()> {
        if let Some(ref path) = self.config_path {
            self.config
                .save_to_path(path)
                .context("Failed to save configuration")?;
        } else {
            self.config.save().context("Failed to save configuration")?;
        }
        Ok(())
    }

    /// Resolve credentials from the profile with environment variable override support.
    ///
    /// When --config-file is explicitly specified, environment variables are ignored to provide
    /// true configuration isolation. This allows testing with isolated configs and follows the
    /// principle of "explicit wins" (CLI args > env vars > defaults).
    fn resolve_credentials(&self, profile_name: Option<&str>) -> CliResult<ResolvedCredentials> {
        trace!("Profile name: {:?}", profile_name);

        // When --config-file is explicitly specified, ignore environment variables
        let use_env_vars = self.config_path.is_none();

        debug!(
            "Config path: {:?}, use_env_vars: {}",
            self.config_path, use_env_vars
        );

        if !use_env_vars {
            info!("--config-file specified explicitly, ignoring environment variables");
        }

        let env_var = |name: &str| {
            if use_env_vars {
                std::env::var(name).ok().filter(|v| !v.is_empty())
            } else {
                None
            }
        };

        let env_subscription = env_var("AZURE_SUBSCRIPTION_ID");
        let env_tenant = env_var("AZURE_TENANT_ID");
        let env_client_id = env_var("AZURE_CLIENT_ID");
        let env_client_secret = env_var("AZURE_CLIENT_SECRET");
        let env_batch_endpoint = env_var("AZCTL_BATCH_ENDPOINT");

        if env_subscription.is_some() {
            debug!("Found AZURE_SUBSCRIPTION_ID environment variable");
        }
        if env_client_id.is_some() {
            debug!("Found AZURE_CLIENT_ID environment variable");
        }

        if let (Some(subscription_id), Some(tenant_id), Some(client_id), Some(client_secret)) = (
            &env_subscription,
            &env_tenant,
            &env_client_id,
            &env_client_secret,
        ) {
            // Environment variables provide complete credentials
            info!("Using Azure credentials from environment variables");
            return Ok(ResolvedCredentials {
                subscription_id: subscription_id.clone(),
                tenant_id: tenant_id.clone(),
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                management_endpoint: azctl_api::arm::DEFAULT_MANAGEMENT_ENDPOINT.to_string(),
                authority: azctl_api::auth::DEFAULT_AUTHORITY.to_string(),
                batch_endpoint: env_batch_endpoint,
            });
        }

        let resolved_profile_name = self.config.resolve_profile(profile_name)?;
        info!("Using profile: {}", resolved_profile_name);

        let profile = self.config.get_profile(&resolved_profile_name)?;

        let has_overrides = env_subscription.is_some()
            || env_tenant.is_some()
            || env_client_id.is_some()
            || env_client_secret.is_some()
            || env_batch_endpoint.is_some();

        // Allow partial environment variable overrides
        let resolved = ResolvedCredentials {
            subscription_id: env_subscription.unwrap_or_else(|| profile.subscription_id.clone()),
            tenant_id: env_tenant.unwrap_or_else(|| profile.tenant_id.clone()),
            client_id: env_client_id.unwrap_or_else(|| profile.client_id.clone()),
            client_secret: env_client_secret.unwrap_or_else(|| profile.client_secret.clone()),
            management_endpoint: profile.management_endpoint.clone(),
            authority: profile.authority.clone(),
            batch_endpoint: env_batch_endpoint.or_else(|| profile.batch_endpoint.clone()),
        };

        if has_overrides {
            debug!("Applied partial environment variable overrides");
        }

        Ok(resolved)
    }

    fn credential_for(&self, resolved: &ResolvedCredentials) -> Arc<ClientSecretCredential> {
        Arc::new(ClientSecretCredential::new(
            &resolved.authority,
            &resolved.tenant_id,
            &resolved.client_id,
            &resolved.client_secret,
        ))
    }

    /// Create a management-plane client from profile credentials
    pub fn create_arm_client(&self, profile_name: Option<&str>) -> CliResult<ArmClient> {
        debug!("Creating Azure management client");

        let resolved = self.resolve_credentials(profile_name)?;
        info!(
            "Connecting to management endpoint: {}",
            resolved.management_endpoint
        );

        let credential = self.credential_for(&resolved);
        let client = ArmClient::builder()
            .endpoint(&resolved.management_endpoint)
            .subscription_id(&resolved.subscription_id)
            .credential(credential)
            .user_agent(AZCTL_USER_AGENT)
            .build()
            .context("Failed to create management client")?;

        debug!("Management client created successfully");
        Ok(client)
    }

    /// Create a Batch data-plane client from profile credentials.
    ///
    /// Requires a batch endpoint on the profile or in AZCTL_BATCH_ENDPOINT.
    pub fn create_batch_client(&self, profile_name: Option<&str>) -> CliResult<BatchClient> {
        debug!("Creating Batch service client");

        let resolved = self.resolve_credentials(profile_name)?;
        let endpoint = resolved
            .batch_endpoint
            .clone()
            .ok_or_else(|| crate::error::AzctlError::Configuration(
                "No Batch endpoint configured. Set batch_endpoint on the profile or AZCTL_BATCH_ENDPOINT.".to_string(),
            ))?;
        info!("Connecting to Batch endpoint: {}", endpoint);

        let credential = self.credential_for(&resolved);
        let client = BatchClient::builder()
            .endpoint(&endpoint)
            .credential(credential)
            .user_agent(AZCTL_USER_AGENT)
            .build()
            .context("Failed to create Batch client")?;

        debug!("Batch client created successfully");
        Ok(client)
    }

    /// Create a Key Vault data-plane client from profile credentials
    pub fn create_keyvault_client(&self, profile_name: Option<&str>) -> CliResult<KeyVaultClient> {
        debug!("Creating Key Vault client");

        let resolved = self.resolve_credentials(profile_name)?;
        let credential = self.credential_for(&resolved);
        let client =
            KeyVaultClient::new(credential).context("Failed to create Key Vault client")?;

        debug!("Key Vault client created successfully");
        Ok(client)
    }

    /// Tenant id for the resolved profile, for building vault access policies
    pub fn tenant_id(&self, profile_name: Option<&str>) -> CliResult<String> {
        let resolved = self.resolve_credentials(profile_name)?;
        Ok(resolved.tenant_id)
    }
}
