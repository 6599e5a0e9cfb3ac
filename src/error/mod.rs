//! Error module orchestrator.
//!
//! Crate-wide error types live in the private `types` module and are
//! re-exported here for downstream callers.

mod types;

pub use types::{DescriptorIssue, Error, Result};
