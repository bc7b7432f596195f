//! HTTP delivery of webhook payloads.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use vod_models::WebhookPayload;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fire-and-forget webhook sender. Delivery failure is logged and
/// swallowed; there is no retry and no signature.
#[derive(Clone)]
pub struct WebhookNotifier {
    http: Client,
}

impl WebhookNotifier {
    pub fn new() -> reqwest::Result<Self> {
        let http = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self { http })
    }

    /// POST the payload as JSON. Never fails from the caller's view.
    pub async fn send(&self, url: &str, payload: &WebhookPayload) {
        match self.http.post(url).json(payload).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Webhook delivered to {}", url);
            }
            Ok(response) => {
                warn!("Webhook to {} answered {}", url, response.status());
            }
            Err(e) => {
                warn!("Failed to send webhook to {}: {}", url, e);
            }
        }
    }
}
