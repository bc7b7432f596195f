//! S3 object storage gateway.
//!
//! This crate provides:
//! - Content-type lookup without downloading the body
//! - Streaming download into scratch storage
//! - Recursive directory upload with pluggable content-type resolution

pub mod client;
pub mod error;
pub mod operations;

pub use client::{StorageClient, StorageConfig};
pub use error::{StorageError, StorageResult};
pub use operations::ContentTypeResolver;
