//! Per-job transcoding worker.
//!
//! This crate provides:
//! - Environment-driven job configuration (fatal at startup when invalid)
//! - The download → classify → transcode → upload → notify pipeline
//! - Scratch cleanup on both success and failure paths

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::{ConfigError, WorkerConfig};
pub use error::{WorkerError, WorkerResult};
pub use pipeline::{execute, JobContext, JobStore};
