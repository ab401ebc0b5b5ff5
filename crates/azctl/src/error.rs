//! Error types for azctl
//!
//! Defines structured error types using thiserror for better error handling and user experience.

use colored::Colorize;
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: profile 'prod' not found
///
///   tip: list available profiles:
///       azctl profile list
/// ```
pub struct CliDiagnostic {
    message: String,
    tips: Vec<(String, Vec<String>)>,
}

impl CliDiagnostic {
    /// Start a new error diagnostic with the given message.
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            tips: Vec::new(),
        }
    }

    /// Add a tip with optional example commands.
    pub fn tip(mut self, description: &str, commands: &[&str]) -> Self {
        self.tips.push((
            description.to_string(),
            commands.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        for (description, commands) in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
            for cmd in commands {
                eprintln!("      {}", cmd);
            }
        }
    }
}

/// Main error type for the azctl application
#[derive(Error, Debug)]
pub enum AzctlError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("No profile configured. Use 'azctl profile set' to configure a profile.")]
    NoProfileConfigured,

    #[error("Missing credentials for profile '{name}'")]
    MissingCredentials { name: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("API error: {message}")]
    ApiError { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    #[error("Timeout: {message}")]
    Timeout { message: String },

    #[error("Quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for azctl operations
pub type Result<T> = std::result::Result<T, AzctlError>;

impl AzctlError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            AzctlError::ProfileNotFound { name } => vec![
                "List available profiles: azctl profile list".to_string(),
                format!("Create profile '{}': azctl profile set {}", name, name),
                "Check profile name spelling".to_string(),
            ],
            AzctlError::NoProfileConfigured => vec![
                "Create a profile: azctl profile set mysub --subscription-id <id> --tenant-id <id> --client-id <id> --client-secret <secret>".to_string(),
                "View profile documentation: azctl profile --help".to_string(),
            ],
            AzctlError::MissingCredentials { name } => vec![
                format!("Update profile credentials: azctl profile set {}", name),
                format!("Check profile details: azctl profile show {}", name),
                "Verify environment variables are set correctly".to_string(),
            ],
            AzctlError::AuthenticationFailed { .. } => vec![
                "Check your credentials: azctl profile show <profile>".to_string(),
                "Verify the service principal client id and secret are correct".to_string(),
                "Ensure the tenant id matches the directory the principal lives in".to_string(),
            ],
            AzctlError::ConnectionError { .. } => vec![
                "Check network connectivity".to_string(),
                "Verify the endpoint URL is correct: azctl profile show <profile>".to_string(),
                "Ensure firewall allows connections to the API endpoint".to_string(),
            ],
            AzctlError::ApiError { message } if message.contains("not found") || message.contains("404") => vec![
                "Verify the resource name is correct".to_string(),
                "List available resources to find the correct name".to_string(),
                "Check that you're using the correct profile".to_string(),
            ],
            AzctlError::QuotaExceeded { .. } => vec![
                "Check regional usage: azctl account list".to_string(),
                "Delete unused accounts or request a quota increase".to_string(),
                "Try a different region".to_string(),
            ],
            AzctlError::Timeout { .. } => vec![
                "Increase the budget with --timeout".to_string(),
                "Check the pool state: azctl pool show <id>".to_string(),
            ],
            AzctlError::InvalidInput { .. } => vec![
                "Check the command syntax: azctl <command> --help".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&format!("{}", self));

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion, &[]);
        }

        diag.print();
    }
}

impl From<azctl_api::ApiError> for AzctlError {
    fn from(err: azctl_api::ApiError) -> Self {
        match err {
            azctl_api::ApiError::AuthenticationFailed { message } => {
                AzctlError::AuthenticationFailed { message }
            }
            azctl_api::ApiError::ConnectionError(message) => {
                AzctlError::ConnectionError { message }
            }
            azctl_api::ApiError::RequestFailed(reqwest_err) if reqwest_err.is_timeout() => {
                AzctlError::Timeout {
                    message: reqwest_err.to_string(),
                }
            }
            azctl_api::ApiError::RequestFailed(reqwest_err) => AzctlError::ConnectionError {
                message: reqwest_err.to_string(),
            },
            _ => AzctlError::ApiError {
                message: err.to_string(),
            },
        }
    }
}

impl From<azctl_core::CoreError> for AzctlError {
    fn from(err: azctl_core::CoreError) -> Self {
        match err {
            azctl_core::CoreError::PoolTimeout { pool_id, timeout } => AzctlError::Timeout {
                message: format!(
                    "pool '{}' did not reach steady state within {} seconds",
                    pool_id,
                    timeout.as_secs()
                ),
            },
            azctl_core::CoreError::QuotaExceeded {
                region,
                quota,
                in_use,
            } => AzctlError::QuotaExceeded {
                message: format!(
                    "region '{}' allows {} Batch accounts and {} are in use",
                    region, quota, in_use
                ),
            },
            azctl_core::CoreError::Validation(msg) => AzctlError::InvalidInput { message: msg },
            azctl_core::CoreError::Config(config_err) => AzctlError::from(config_err),
            azctl_core::CoreError::Api(api_err) => AzctlError::from(api_err),
            _ => AzctlError::ApiError {
                message: err.to_string(),
            },
        }
    }
}

impl From<azctl_core::config::ConfigError> for AzctlError {
    fn from(err: azctl_core::config::ConfigError) -> Self {
        use azctl_core::config::ConfigError;
        match err {
            ConfigError::ProfileNotFound { name } => AzctlError::ProfileNotFound { name },
            ConfigError::NoProfiles { .. } => AzctlError::NoProfileConfigured,
            ConfigError::MissingField { name, .. } => AzctlError::MissingCredentials { name },
            other => AzctlError::Configuration(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AzctlError {
    fn from(err: serde_json::Error) -> Self {
        AzctlError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<std::io::Error> for AzctlError {
    fn from(err: std::io::Error) -> Self {
        AzctlError::OutputError {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<anyhow::Error> for AzctlError {
    fn from(err: anyhow::Error) -> Self {
        AzctlError::Config(err.to_string())
    }
}
