//! Progress tracking and pool polling for async Batch operations
//!
//! Pool allocation continues after the create call returns, so callers poll
//! the pool until its allocation state settles. This module provides that
//! polling with optional progress callbacks for UI updates.

use crate::error::{CoreError, Result};
use azctl_api::batch::{AllocationState, BatchClient, CloudPool};
use std::time::{Duration, Instant};
use tracing::warn;

/// Default poll budget for pool allocation
pub const DEFAULT_POOL_TIMEOUT: Duration = Duration::from_secs(300);

/// Default time between polls
pub const DEFAULT_POOL_INTERVAL: Duration = Duration::from_secs(30);

/// Progress events emitted while waiting on a pool
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Waiting has started
    Started { pool_id: String },
    /// Polling iteration with the current allocation state
    Polling {
        pool_id: String,
        state: Option<AllocationState>,
        elapsed: Duration,
    },
    /// A poll failed with a retryable error and will be retried
    FetchFailed { pool_id: String, error: String },
    /// Pool reached the steady state
    Ready { pool_id: String, elapsed: Duration },
}

/// Callback type for progress updates
///
/// CLI can use this to update spinners/progress bars.
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

fn emit(on_progress: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(callback) = on_progress {
        callback(event);
    }
}

/// Poll a pool until its allocation state is steady.
///
/// Polls every `interval` until `timeout` is spent; with the defaults that
/// is one poll every 30 seconds against a 5 minute budget. The returned
/// future does nothing between polls except sleep, so callers that need
/// cancellation can race it with `tokio::select!` or simply drop it.
///
/// Retryable fetch failures (5xx, throttling, transport errors) are logged
/// and retried on the next tick; anything else fails the wait immediately.
///
/// # Example
///
/// ```rust,ignore
/// use azctl_core::{wait_for_pool_steady, ProgressEvent};
/// use std::time::Duration;
///
/// let pool = wait_for_pool_steady(
///     &client,
///     "render-pool",
///     Duration::from_secs(300),
///     Duration::from_secs(30),
///     Some(Box::new(|event| {
///         if let ProgressEvent::Polling { state, elapsed, .. } = event {
///             println!("state: {:?} ({:.0}s)", state, elapsed.as_secs());
///         }
///     })),
/// ).await?;
/// ```
pub async fn wait_for_pool_steady(
    client: &BatchClient,
    pool_id: &str,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<CloudPool> {
    let start = Instant::now();
    let pools = client.pools();

    emit(
        &on_progress,
        ProgressEvent::Started {
            pool_id: pool_id.to_string(),
        },
    );

    loop {
        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(CoreError::PoolTimeout {
                pool_id: pool_id.to_string(),
                timeout,
            });
        }

        match pools.get(pool_id).await {
            Ok(pool) => {
                emit(
                    &on_progress,
                    ProgressEvent::Polling {
                        pool_id: pool_id.to_string(),
                        state: pool.allocation_state,
                        elapsed,
                    },
                );

                if pool.allocation_state == Some(AllocationState::Steady) {
                    emit(
                        &on_progress,
                        ProgressEvent::Ready {
                            pool_id: pool_id.to_string(),
                            elapsed,
                        },
                    );
                    return Ok(pool);
                }
            }
            Err(e) if e.is_retryable() => {
                warn!("Transient error polling pool {}: {}", pool_id, e);
                emit(
                    &on_progress,
                    ProgressEvent::FetchFailed {
                        pool_id: pool_id.to_string(),
                        error: e.to_string(),
                    },
                );
            }
            Err(e) => return Err(e.into()),
        }

        tokio::time::sleep(interval).await;
    }
}
