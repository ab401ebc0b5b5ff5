//! Job schedule command implementations

use azctl_api::batch::{
    JobManagerTask, JobScheduleCreateParams, JobSpecification, PoolInformation,
    RecurrenceInterval, Schedule,
};
use tracing::debug;

use crate::cli::ScheduleCommands;
use crate::commands::confirm;
use crate::connection::ConnectionManager;
use crate::error::AzctlError;
use crate::output::{OutputFormat, print_output};

/// Handle job schedule commands
pub async fn handle_schedule_command(
    cmd: &ScheduleCommands,
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    output_format: OutputFormat,
) -> Result<(), AzctlError> {
    let client = conn_mgr.create_batch_client(profile_name)?;
    let schedules = client.job_schedules();

    match cmd {
        ScheduleCommands::Create {
            id,
            pool,
            hours,
            minutes,
            seconds,
            command,
        } => {
            let interval = RecurrenceInterval::new(*hours, *minutes, *seconds);
            if interval.is_zero() {
                return Err(AzctlError::InvalidInput {
                    message: "recurrence interval must be greater than zero".to_string(),
                });
            }

            let job_manager_task = command.as_ref().map(|command_line| JobManagerTask {
                id: format!("{}-manager", id),
                command_line: command_line.clone(),
                display_name: None,
            });

            let params = JobScheduleCreateParams {
                id: id.clone(),
                schedule: Schedule {
                    recurrence_interval: Some(interval),
                    do_not_run_until: None,
                },
                job_specification: JobSpecification {
                    pool_info: PoolInformation {
                        pool_id: pool.clone(),
                    },
                    job_manager_task,
                },
            };
            schedules.create(&params).await?;
            println!("Created job schedule '{}' recurring every {}", id, interval);
        }
        ScheduleCommands::Show { id } => {
            let schedule = schedules.get(id).await?;
            print_output(schedule, output_format)?;
        }
        ScheduleCommands::List => {
            let list = schedules.list().await?;
            debug!("Found {} job schedules", list.len());
            print_output(list, output_format)?;
        }
        ScheduleCommands::Delete { id, yes } => {
            if !confirm(&format!("Delete job schedule '{}'?", id), *yes)? {
                return Ok(());
            }
            schedules.delete(id).await?;
            println!("Deleted job schedule '{}'", id);
        }
    }

    Ok(())
}
