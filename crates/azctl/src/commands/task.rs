//! Task command implementations

use azctl_api::batch::TaskCreateParams;
use tracing::debug;

use crate::cli::TaskCommands;
use crate::commands::confirm;
use crate::connection::ConnectionManager;
use crate::error::AzctlError;
use crate::output::{OutputFormat, print_output};

/// Handle task commands
pub async fn handle_task_command(
    cmd: &TaskCommands,
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    output_format: OutputFormat,
) -> Result<(), AzctlError> {
    let client = conn_mgr.create_batch_client(profile_name)?;
    let tasks = client.tasks();

    match cmd {
        TaskCommands::Add {
            id,
            job,
            command,
            display_name,
        } => {
            let params = TaskCreateParams {
                id: id.clone(),
                command_line: command.clone(),
                display_name: display_name.clone(),
            };
            tasks.create(job, &params).await?;
            println!("Added task '{}' to job '{}'", id, job);
        }
        TaskCommands::Show { id, job } => {
            let task = tasks.get(job, id).await?;
            print_output(task, output_format)?;
        }
        TaskCommands::List { job } => {
            let list = tasks.list(job).await?;
            debug!("Found {} tasks in job {}", list.len(), job);
            print_output(list, output_format)?;
        }
        TaskCommands::Delete { id, job, yes } => {
            if !confirm(&format!("Delete task '{}' from job '{}'?", id, job), *yes)? {
                return Ok(());
            }
            tasks.delete(job, id).await?;
            println!("Deleted task '{}'", id);
        }
    }

    Ok(())
}
