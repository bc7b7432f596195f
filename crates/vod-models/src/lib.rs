//! Shared data models for the VodForge pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Job descriptors and upload-notification events
//! - Media type classification and content-type tables
//! - Webhook events and payloads
//! - Project records and name sanitization

pub mod event;
pub mod job;
pub mod media;
pub mod project;
pub mod webhook;

// Re-export common types
pub use event::{UploadEvent, UploadRecord};
pub use job::Job;
pub use media::{MediaType, ProcessingResult};
pub use project::{sanitize_project_name, ProjectRecord};
pub use webhook::{WebhookEvent, WebhookPayload};
