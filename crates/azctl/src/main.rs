use anyhow::Result;
use azctl_core::Config;
use clap::Parser;
use tracing::{debug, error, info, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod connection;
mod error;
mod output;

use cli::{Cli, Commands};
use connection::ConnectionManager;
use error::AzctlError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level
    init_tracing(cli.verbose);

    // Load configuration from specified path or default location
    let (config, config_path) = if let Some(config_file) = &cli.config_file {
        let path = std::path::PathBuf::from(config_file);
        debug!("Loading config from explicit path: {:?}", path);
        let config = Config::load_from_path(&path)?;
        (config, Some(path))
    } else {
        debug!("Loading config from default location");
        (Config::load()?, None)
    };
    debug!(
        "Creating ConnectionManager with config_path: {:?}",
        config_path
    );
    let conn_mgr = ConnectionManager::with_config_path(config, config_path);

    // Execute command
    if let Err(e) = execute_command(&cli, &conn_mgr).await {
        e.print_diagnostic();
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "azctl=warn,azctl_core=warn,azctl_api=warn",
            1 => "azctl=info,azctl_core=info,azctl_api=info",
            2 => "azctl=debug,azctl_core=debug,azctl_api=debug",
            _ => "azctl=trace,azctl_core=trace,azctl_api=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

async fn execute_command(cli: &Cli, conn_mgr: &ConnectionManager) -> Result<(), AzctlError> {
    trace!("Executing command: {:?}", cli.command);
    info!("Command: {}", format_command(&cli.command));

    let start = std::time::Instant::now();
    let profile = cli.profile.as_deref();
    let result = match &cli.command {
        Commands::Account(cmd) => {
            commands::account::handle_account_command(cmd, conn_mgr, profile, cli.output).await
        }
        Commands::Pool(cmd) => {
            commands::pool::handle_pool_command(cmd, conn_mgr, profile, cli.output).await
        }
        Commands::Job(cmd) => {
            commands::job::handle_job_command(cmd, conn_mgr, profile, cli.output).await
        }
        Commands::Task(cmd) => {
            commands::task::handle_task_command(cmd, conn_mgr, profile, cli.output).await
        }
        Commands::Schedule(cmd) => {
            commands::schedule::handle_schedule_command(cmd, conn_mgr, profile, cli.output).await
        }
        Commands::Vault(cmd) => {
            commands::vault::handle_vault_command(cmd, conn_mgr, profile, cli.output).await
        }
        Commands::Key(cmd) => {
            commands::keys::handle_key_command(cmd, conn_mgr, profile, cli.output).await
        }
        Commands::Secret(cmd) => {
            commands::secrets::handle_secret_command(cmd, conn_mgr, profile, cli.output).await
        }
        Commands::Profile(cmd) => {
            commands::profile::handle_profile_command(cmd, conn_mgr, cli.output).await
        }
    };

    let duration = start.elapsed();
    match &result {
        Ok(_) => info!("Command completed successfully in {:?}", duration),
        Err(e) => error!("Command failed after {:?}: {}", duration, e),
    }

    result
}

/// Format command for human-readable logging (without sensitive data)
fn format_command(command: &Commands) -> String {
    match command {
        Commands::Account(cmd) => format!("account {:?}", cmd),
        Commands::Pool(cmd) => format!("pool {:?}", cmd),
        Commands::Job(cmd) => format!("job {:?}", cmd),
        Commands::Task(cmd) => format!("task {:?}", cmd),
        Commands::Schedule(cmd) => format!("schedule {:?}", cmd),
        Commands::Vault(cmd) => format!("vault {:?}", cmd),
        Commands::Key(cmd) => match cmd {
            cli::KeyCommands::Encrypt { name, .. } => {
                format!("key encrypt {} [text redacted]", name)
            }
            cli::KeyCommands::Decrypt { name, .. } => {
                format!("key decrypt {} [ciphertext redacted]", name)
            }
            other => format!("key {:?}", other),
        },
        Commands::Secret(cmd) => match cmd {
            cli::SecretCommands::Set { name, .. } => {
                format!("secret set {} [value redacted]", name)
            }
            other => format!("secret {:?}", other),
        },
        Commands::Profile(cmd) => match cmd {
            cli::ProfileCommands::Set { name, .. } => {
                format!("profile set {} [credentials redacted]", name)
            }
            other => format!("profile {:?}", other),
        },
    }
}
