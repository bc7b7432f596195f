//! Project/webhook registry client.
//!
//! Resolves a project identifier to its configured webhook URL, with a
//! fallback scan matching sanitized project names.

pub mod client;
pub mod error;

pub use client::RegistryClient;
pub use error::{RegistryError, RegistryResult};
