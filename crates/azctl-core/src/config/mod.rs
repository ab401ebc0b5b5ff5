//! Configuration and profile management for Azure tooling.
//!
// Allow nested config module - this is intentional for the config subsystem

#![allow(clippy::module_inception)]
//!
//! This module provides a reusable configuration system for managing
//! subscription credentials and endpoints.
//!
//! # Features
//!
//! - Multiple named profiles for different subscriptions or tenants
//! - Environment variable expansion in config files
//! - Platform-specific config file locations

pub mod config;
pub mod error;

// Re-export main types for convenience
pub use config::{Config, Profile};
pub use error::{ConfigError, Result};
