//! Batch service workflows for pools, jobs and tasks.

pub mod workflows;

pub use workflows::*;
