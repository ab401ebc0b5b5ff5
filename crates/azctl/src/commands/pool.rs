//! Pool command implementations

use std::time::Duration;

use azctl_api::batch::ImageReference;
use azctl_core::batch::{cloud_service_pool, create_pool_and_wait, find_pool, virtual_machine_pool};
use azctl_core::{ProgressCallback, ProgressEvent, wait_for_pool_steady};
use colored::Colorize;
use tracing::debug;

use crate::cli::PoolCommands;
use crate::commands::confirm;
use crate::connection::ConnectionManager;
use crate::error::AzctlError;
use crate::output::{OutputFormat, print_output};

/// Progress callback printing one line per poll to stderr
fn console_progress() -> ProgressCallback {
    Box::new(|event| match event {
        ProgressEvent::Started { pool_id } => {
            eprintln!("Waiting for pool '{}' to reach steady state...", pool_id);
        }
        ProgressEvent::Polling { state, elapsed, .. } => {
            let state = state
                .map(|s| format!("{:?}", s).to_lowercase())
                .unwrap_or_else(|| "unknown".to_string());
            eprintln!("  {}s: allocation state {}", elapsed.as_secs(), state);
        }
        ProgressEvent::FetchFailed { error, .. } => {
            eprintln!("  {} {}", "poll failed:".yellow(), error);
        }
        ProgressEvent::Ready { pool_id, elapsed } => {
            eprintln!(
                "Pool '{}' steady after {}s",
                pool_id,
                elapsed.as_secs()
            );
        }
    })
}

/// Handle pool commands
pub async fn handle_pool_command(
    cmd: &PoolCommands,
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    output_format: OutputFormat,
) -> Result<(), AzctlError> {
    let client = conn_mgr.create_batch_client(profile_name)?;
    let pools = client.pools();

    match cmd {
        PoolCommands::Create {
            id,
            vm_size,
            nodes,
            os_family,
            image_publisher,
            image_offer,
            image_sku,
            node_agent,
            wait,
            timeout,
            interval,
        } => {
            let params = match (os_family, image_publisher) {
                (Some(family), None) => cloud_service_pool(id, vm_size, *nodes, family),
                (None, Some(publisher)) => {
                    // clap enforces the remaining image flags via requires_all
                    let image = ImageReference {
                        publisher: publisher.clone(),
                        offer: image_offer.clone().unwrap_or_default(),
                        sku: image_sku.clone().unwrap_or_default(),
                        version: None,
                    };
                    let agent = node_agent.clone().unwrap_or_default();
                    virtual_machine_pool(id, vm_size, *nodes, image, agent)
                }
                _ => {
                    return Err(AzctlError::InvalidInput {
                        message: "specify either --os-family or the --image-* flags".to_string(),
                    });
                }
            };

            if *wait {
                let pool = create_pool_and_wait(
                    &client,
                    &params,
                    Duration::from_secs(*timeout),
                    Duration::from_secs(*interval),
                    Some(console_progress()),
                )
                .await?;
                print_output(pool, output_format)?;
            } else {
                pools.create(&params).await?;
                println!("Created pool '{}'", id);
            }
        }
        PoolCommands::Show { id } => {
            let pool = find_pool(&client, id).await?;
            print_output(pool, output_format)?;
        }
        PoolCommands::List => {
            let list = pools.list().await?;
            debug!("Found {} pools", list.len());
            print_output(list, output_format)?;
        }
        PoolCommands::Resize { id, nodes } => {
            pools.resize(id, *nodes).await?;
            println!("Resizing pool '{}' to {} nodes", id, nodes);
        }
        PoolCommands::Delete { id, yes } => {
            if !confirm(&format!("Delete pool '{}'?", id), *yes)? {
                return Ok(());
            }
            pools.delete(id).await?;
            println!("Deleted pool '{}'", id);
        }
        PoolCommands::Wait {
            id,
            timeout,
            interval,
        } => {
            let pool = wait_for_pool_steady(
                &client,
                id,
                Duration::from_secs(*timeout),
                Duration::from_secs(*interval),
                Some(console_progress()),
            )
            .await?;
            print_output(pool, output_format)?;
        }
    }

    Ok(())
}
