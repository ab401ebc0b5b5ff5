//! Typed clients for the Azure management plane, the Batch service and the
//! Key Vault data plane.
//!
//! Three clients cover the three API surfaces:
//!
//! - [`arm::ArmClient`] for subscription-scoped resource management
//!   (Batch accounts, storage accounts, vaults)
//! - [`batch::BatchClient`] for the Batch account endpoint
//!   (pools, jobs, tasks, job schedules)
//! - [`keyvault::KeyVaultClient`] for vault contents
//!   (keys, secrets, encrypt and decrypt)
//!
//! All of them authenticate through the [`auth::TokenCredential`] trait;
//! [`auth::ClientSecretCredential`] implements the service principal flow
//! and caches tokens per resource.
//!
//! Errors come back as [`ApiError`] with the HTTP failure class preserved,
//! so callers can match on [`ApiError::NotFound`] instead of parsing
//! messages.

pub mod accounts;
pub mod arm;
pub mod auth;
pub mod batch;
pub mod error;
pub mod keyvault;
pub mod storage;
pub mod vaults;

pub use error::{ApiError, Result};
