//! Management-plane workflows for Batch accounts and their storage.

pub mod workflows;

pub use workflows::*;
