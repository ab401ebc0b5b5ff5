//! # azctl-core
//!
//! Shared engine layer for Azure Batch and Key Vault tooling. The CLI is a
//! thin presentation layer over this crate; everything that is not argument
//! parsing or output formatting lives here:
//!
//! - **Config** - named profiles in TOML with env var expansion ([`config`])
//! - **Polling** - wait for pool allocation with progress callbacks ([`progress`])
//! - **Workflows** - multi-step operations such as "create account with
//!   storage" or "create pool and wait" ([`management`], [`batch`], [`vault`])
//! - **Errors** - [`CoreError`] wrapping client errors plus workflow-level
//!   failures like quota exhaustion and partial deletes
//!
//! Workflows are plain async functions over the `azctl-api` clients, so a
//! caller that wants cancellation races them with `tokio::select!`.

pub mod batch;
pub mod config;
pub mod error;
pub mod management;
pub mod progress;
pub mod vault;

pub use config::{Config, Profile};
pub use error::{CoreError, Result};
pub use progress::{
    DEFAULT_POOL_INTERVAL, DEFAULT_POOL_TIMEOUT, ProgressCallback, ProgressEvent,
    wait_for_pool_steady,
};
