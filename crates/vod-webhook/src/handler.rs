//! Terminal-event notification for a job.

use async_trait::async_trait;
use tracing::{info, warn};

use vod_models::{Job, MediaType, WebhookEvent, WebhookPayload};
use vod_registry::{RegistryClient, RegistryResult};

use crate::notifier::WebhookNotifier;

/// Source of webhook URLs. The registry client is the production
/// implementation; tests substitute a fixture.
#[async_trait]
pub trait WebhookUrlSource: Send + Sync {
    async fn get_webhook_url(&self, project_identifier: &str) -> RegistryResult<Option<String>>;
}

#[async_trait]
impl WebhookUrlSource for RegistryClient {
    async fn get_webhook_url(&self, project_identifier: &str) -> RegistryResult<Option<String>> {
        RegistryClient::get_webhook_url(self, project_identifier).await
    }
}

/// Builds and sends at most one webhook per terminal job outcome.
///
/// Every failure inside here is logged and swallowed: notification never
/// changes the job's outcome.
pub struct WebhookHandler<S: WebhookUrlSource> {
    registry: S,
    notifier: WebhookNotifier,
    processed_bucket: String,
}

impl<S: WebhookUrlSource> WebhookHandler<S> {
    pub fn new(registry: S, notifier: WebhookNotifier, processed_bucket: impl Into<String>) -> Self {
        Self {
            registry,
            notifier,
            processed_bucket: processed_bucket.into(),
        }
    }

    pub async fn notify_success(&self, job: &Job, media_type: MediaType) {
        let event = WebhookEvent::processed(media_type);
        if self.notify(job, event, None).await {
            info!("Success webhook notification sent");
        }
    }

    pub async fn notify_failure(&self, job: &Job, media_type: Option<MediaType>, error: &str) {
        let event = WebhookEvent::failed(media_type);
        if self.notify(job, event, Some(error.to_string())).await {
            info!("Failure webhook notification sent");
        }
    }

    /// Returns whether a webhook was actually sent.
    async fn notify(&self, job: &Job, event: WebhookEvent, error: Option<String>) -> bool {
        let Some(project_identifier) = job.project_identifier() else {
            warn!("Cannot send webhook: no project identifier in input key");
            return false;
        };

        let url = match self.registry.get_webhook_url(project_identifier).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                warn!(
                    "Cannot send webhook: no webhook URL configured for {}",
                    project_identifier
                );
                return false;
            }
            Err(e) => {
                warn!("Cannot send webhook: registry lookup failed: {}", e);
                return false;
            }
        };

        let mut payload = WebhookPayload::new(
            event,
            project_identifier,
            &job.input_key,
            &job.output_key,
            &self.processed_bucket,
        );
        if let Some(error) = error {
            payload = payload.with_error(error);
        }

        self.notifier.send(&url, &payload).await;
        true
    }
}
