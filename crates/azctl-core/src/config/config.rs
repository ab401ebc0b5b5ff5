//! Configuration management for Azure tooling
//!
//! Handles configuration loading from files, environment variables, and command-line arguments.
//! Configuration is stored in TOML format with support for multiple named profiles.

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Profile used when none is named on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Individual profile configuration: one subscription plus the service
/// principal used to reach it
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Profile {
    pub subscription_id: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    /// Management endpoint, defaults to the public cloud
    #[serde(default = "default_management_endpoint")]
    pub management_endpoint: String,
    /// Token authority, defaults to the public identity provider
    #[serde(default = "default_authority")]
    pub authority: String,
    /// Batch account endpoint for data-plane commands,
    /// e.g. `https://myaccount.westus.batch.azure.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_endpoint: Option<String>,
}

fn default_management_endpoint() -> String {
    "https://management.azure.com".to_string()
}

fn default_authority() -> String {
    "https://login.microsoftonline.com".to_string()
}

impl Profile {
    /// A profile with only the required fields set
    pub fn new(
        subscription_id: impl Into<String>,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            management_endpoint: default_management_endpoint(),
            authority: default_authority(),
            batch_endpoint: None,
        }
    }

    /// Batch endpoint or an error naming the missing field
    pub fn require_batch_endpoint(&self, profile_name: &str) -> Result<&str> {
        self.batch_endpoint
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField {
                name: profile_name.to_string(),
                field: "batch_endpoint".to_string(),
            })
    }
}

impl Config {
    /// Resolve the profile name to use.
    ///
    /// Resolution order:
    /// 1. Explicitly named profile
    /// 2. `AZCTL_PROFILE` environment variable
    /// 3. `default_profile` from the config file
    /// 4. The only profile, when exactly one exists
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<String> {
        if let Some(profile_name) = explicit_profile {
            return Ok(profile_name.to_string());
        }

        if let Ok(profile_name) = std::env::var("AZCTL_PROFILE")
            && !profile_name.is_empty()
        {
            return Ok(profile_name);
        }

        if let Some(ref default) = self.default_profile {
            return Ok(default.clone());
        }

        if self.profiles.len() == 1
            && let Some(name) = self.profiles.keys().next()
        {
            return Ok(name.clone());
        }

        if self.profiles.is_empty() {
            Err(ConfigError::NoProfiles {
                suggestion: "Use 'azctl profile set' to create a profile.".to_string(),
            })
        } else {
            let mut names: Vec<_> = self.profiles.keys().map(String::as_str).collect();
            names.sort();
            Err(ConfigError::NoProfiles {
                suggestion: format!(
                    "Multiple profiles exist ({}). Pick one with --profile or set default_profile.",
                    names.join(", ")
                ),
            })
        }
    }

    /// Look up a profile by name
    pub fn get_profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        // Expand environment variables in the config content
        let expanded_content = Self::expand_env_vars(&content);

        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Save configuration to the standard location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        // Create parent directories if they don't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Set or update a profile
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Remove a profile by name
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        // Clear the default if it named this profile
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// List all profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Get the path to the configuration file
    ///
    /// On macOS, this supports both the standard macOS path and Linux-style ~/.config path:
    /// 1. Check ~/.config/azctl/config.toml (Linux-style, preferred for consistency)
    /// 2. Fall back to ~/Library/Application Support/com.fabrikam.azctl/config.toml
    ///
    /// On Linux: ~/.config/azctl/config.toml
    /// On Windows: %APPDATA%\fabrikam\azctl\config.toml
    pub fn config_path() -> Result<PathBuf> {
        // On macOS, check for Linux-style path first for cross-platform consistency
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let home_dir = base_dirs.home_dir();
                let linux_style_path = home_dir.join(".config").join("azctl").join("config.toml");

                if linux_style_path.exists() {
                    return Ok(linux_style_path);
                }

                // Also check if the config directory exists (user might have created it)
                if linux_style_path
                    .parent()
                    .map(|p| p.exists())
                    .unwrap_or(false)
                {
                    return Ok(linux_style_path);
                }
            }
        }

        // Use platform-specific standard path
        let proj_dirs =
            ProjectDirs::from("com", "fabrikam", "azctl").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand environment variables in configuration content
    ///
    /// Supports ${VAR} and ${VAR:-default} syntax for environment variable expansion.
    /// This allows configs to reference environment variables while maintaining
    /// static fallback values.
    ///
    /// Example:
    /// ```toml
    /// client_secret = "${AZURE_CLIENT_SECRET}"
    /// management_endpoint = "${AZURE_MANAGEMENT_ENDPOINT:-https://management.azure.com}"
    /// ```
    fn expand_env_vars(content: &str) -> String {
        // Use shellexpand::env_with_context_no_errors which returns unexpanded vars as-is
        // This prevents errors when env vars for unused profiles aren't set
        let expanded =
            shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok());
        expanded.to_string()
    }
}
