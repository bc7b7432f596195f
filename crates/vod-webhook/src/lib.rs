//! Fire-and-forget webhook notification.
//!
//! This crate provides:
//! - The HTTP notifier (errors logged, never escalated)
//! - The handler that resolves a job's project to a webhook URL and builds
//!   the terminal event payload

pub mod handler;
pub mod notifier;

pub use handler::{WebhookHandler, WebhookUrlSource};
pub use notifier::WebhookNotifier;
