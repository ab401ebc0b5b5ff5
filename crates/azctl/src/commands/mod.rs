//! Command implementations, grouped by resource

pub mod account;
pub mod job;
pub mod keys;
pub mod pool;
pub mod profile;
pub mod schedule;
pub mod secrets;
pub mod task;
pub mod vault;

use std::io::Write;

use crate::error::{AzctlError, Result};

/// Prompt for confirmation unless --yes was passed.
///
/// Returns Ok(false) when the user declines, so callers can bail without
/// treating it as an error.
pub(crate) fn confirm(prompt: &str, skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }

    print!("{} [y/N]: ", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .map_err(AzctlError::from)?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
