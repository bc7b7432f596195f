//! Webhook events and payloads sent to project owners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::media::MediaType;

/// Terminal events delivered over the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "video.processed")]
    VideoProcessed,
    #[serde(rename = "image.processed")]
    ImageProcessed,
    #[serde(rename = "video.processing.failed")]
    VideoProcessingFailed,
    #[serde(rename = "image.processing.failed")]
    ImageProcessingFailed,
    /// Failure before the media type was determined.
    #[serde(rename = "processing.failed")]
    ProcessingFailed,
}

impl WebhookEvent {
    /// Success event for a media type.
    pub fn processed(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Image => WebhookEvent::ImageProcessed,
            _ => WebhookEvent::VideoProcessed,
        }
    }

    /// Failure event; generic when the media type was never known.
    pub fn failed(media_type: Option<MediaType>) -> Self {
        match media_type {
            Some(MediaType::Video) => WebhookEvent::VideoProcessingFailed,
            Some(MediaType::Image) => WebhookEvent::ImageProcessingFailed,
            _ => WebhookEvent::ProcessingFailed,
        }
    }
}

/// JSON body POSTed to a project's webhook URL.
///
/// Constructed once per terminal outcome and sent at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub event: WebhookEvent,
    pub project_identifier: String,
    pub input_key: String,
    pub output_key: String,
    pub processed_bucket: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WebhookPayload {
    pub fn new(
        event: WebhookEvent,
        project_identifier: impl Into<String>,
        input_key: impl Into<String>,
        output_key: impl Into<String>,
        processed_bucket: impl Into<String>,
    ) -> Self {
        Self {
            event,
            project_identifier: project_identifier.into(),
            input_key: input_key.into(),
            output_key: output_key.into(),
            processed_bucket: processed_bucket.into(),
            timestamp: Utc::now(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
