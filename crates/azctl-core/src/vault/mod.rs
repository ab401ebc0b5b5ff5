//! Vault workflows: provisioning, access policies, and text encryption.

pub mod encoding;
pub mod workflows;

pub use workflows::*;
