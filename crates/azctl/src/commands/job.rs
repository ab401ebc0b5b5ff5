//! Job command implementations

use azctl_api::batch::{JobCreateParams, PoolInformation};
use tracing::debug;

use crate::cli::JobCommands;
use crate::commands::confirm;
use crate::connection::ConnectionManager;
use crate::error::AzctlError;
use crate::output::{OutputFormat, print_output};

/// Handle job commands
pub async fn handle_job_command(
    cmd: &JobCommands,
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    output_format: OutputFormat,
) -> Result<(), AzctlError> {
    let client = conn_mgr.create_batch_client(profile_name)?;
    let jobs = client.jobs();

    match cmd {
        JobCommands::Create {
            id,
            pool,
            display_name,
        } => {
            let params = JobCreateParams {
                id: id.clone(),
                pool_info: PoolInformation {
                    pool_id: pool.clone(),
                },
                display_name: display_name.clone(),
            };
            jobs.create(&params).await?;
            println!("Created job '{}' on pool '{}'", id, pool);
        }
        JobCommands::Show { id } => {
            let job = jobs.get(id).await?;
            print_output(job, output_format)?;
        }
        JobCommands::List => {
            let list = jobs.list().await?;
            debug!("Found {} jobs", list.len());
            print_output(list, output_format)?;
        }
        JobCommands::Delete { id, yes } => {
            if !confirm(&format!("Delete job '{}' and its tasks?", id), *yes)? {
                return Ok(());
            }
            jobs.delete(id).await?;
            println!("Deleted job '{}'", id);
        }
    }

    Ok(())
}
