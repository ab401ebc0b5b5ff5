//! Profile management command implementations

use azctl_core::{Config, Profile};
use colored::Colorize;
use serde_json::json;
use tracing::debug;

use crate::cli::ProfileCommands;
use crate::connection::ConnectionManager;
use crate::error::AzctlError;
use crate::output::{OutputFormat, print_output};

/// Handle profile management commands
pub async fn handle_profile_command(
    cmd: &ProfileCommands,
    conn_mgr: &ConnectionManager,
    output_format: OutputFormat,
) -> Result<(), AzctlError> {
    match cmd {
        ProfileCommands::List => handle_list(conn_mgr, output_format),
        ProfileCommands::Show { name } => handle_show(conn_mgr, name, output_format),
        ProfileCommands::Set {
            name,
            subscription_id,
            tenant_id,
            client_id,
            client_secret,
            batch_endpoint,
            default,
        } => handle_set(
            conn_mgr,
            name,
            subscription_id,
            tenant_id,
            client_id,
            client_secret,
            batch_endpoint.as_deref(),
            *default,
        ),
        ProfileCommands::Remove { name } => handle_remove(conn_mgr, name),
        ProfileCommands::Default { name } => handle_default(conn_mgr, name),
        ProfileCommands::Path => handle_path(conn_mgr),
    }
}

fn handle_list(
    conn_mgr: &ConnectionManager,
    output_format: OutputFormat,
) -> Result<(), AzctlError> {
    debug!("Listing all configured profiles");
    let profiles = conn_mgr.config.list_profiles();

    let rows: Vec<serde_json::Value> = profiles
        .iter()
        .map(|(name, profile)| {
            json!({
                "name": name,
                "subscription_id": profile.subscription_id,
                "tenant_id": profile.tenant_id,
                "is_default": conn_mgr.config.default_profile.as_deref() == Some(name.as_str()),
                "batch_endpoint": profile.batch_endpoint,
            })
        })
        .collect();

    print_output(rows, output_format)?;
    Ok(())
}

fn handle_show(
    conn_mgr: &ConnectionManager,
    name: &str,
    output_format: OutputFormat,
) -> Result<(), AzctlError> {
    let profile = conn_mgr.config.get_profile(name)?;

    // Never print the client secret back out
    print_output(
        json!({
            "name": name,
            "subscription_id": profile.subscription_id,
            "tenant_id": profile.tenant_id,
            "client_id": profile.client_id,
            "client_secret": "***",
            "management_endpoint": profile.management_endpoint,
            "authority": profile.authority,
            "batch_endpoint": profile.batch_endpoint,
        }),
        output_format,
    )?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_set(
    conn_mgr: &ConnectionManager,
    name: &str,
    subscription_id: &str,
    tenant_id: &str,
    client_id: &str,
    client_secret: &str,
    batch_endpoint: Option<&str>,
    default: bool,
) -> Result<(), AzctlError> {
    let mut manager = conn_mgr.clone();

    let mut profile = Profile::new(subscription_id, tenant_id, client_id, client_secret);
    profile.batch_endpoint = batch_endpoint.map(String::from);

    manager.config.set_profile(name.to_string(), profile);
    if default {
        manager.config.default_profile = Some(name.to_string());
    }
    manager.save_config()?;

    println!("{} profile '{}'", "Saved".green(), name);
    Ok(())
}

fn handle_remove(conn_mgr: &ConnectionManager, name: &str) -> Result<(), AzctlError> {
    let mut manager = conn_mgr.clone();

    if manager.config.remove_profile(name).is_none() {
        return Err(AzctlError::ProfileNotFound {
            name: name.to_string(),
        });
    }
    manager.save_config()?;

    println!("Removed profile '{}'", name);
    Ok(())
}

fn handle_default(conn_mgr: &ConnectionManager, name: &str) -> Result<(), AzctlError> {
    let mut manager = conn_mgr.clone();

    // Validate before persisting
    manager.config.get_profile(name)?;
    manager.config.default_profile = Some(name.to_string());
    manager.save_config()?;

    println!("Default profile set to '{}'", name);
    Ok(())
}

fn handle_path(conn_mgr: &ConnectionManager) -> Result<(), AzctlError> {
    let path = match &conn_mgr.config_path {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    println!("{}", path.display());
    Ok(())
}
