//! Webhook delivery tests against a local mock server.

use async_trait::async_trait;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vod_models::{Job, MediaType, WebhookEvent, WebhookPayload};
use vod_registry::RegistryResult;
use vod_webhook::{WebhookHandler, WebhookNotifier, WebhookUrlSource};

struct FixtureSource {
    url: String,
}

#[async_trait]
impl WebhookUrlSource for FixtureSource {
    async fn get_webhook_url(&self, _id: &str) -> RegistryResult<Option<String>> {
        Ok(Some(self.url.clone()))
    }
}

#[tokio::test]
async fn test_notifier_posts_json_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let payload = WebhookPayload::new(
        WebhookEvent::VideoProcessed,
        "projA",
        "projA/raw/clip.mp4",
        "projA/raw/clip.mp4",
        "processed-bucket",
    );

    let notifier = WebhookNotifier::new().unwrap();
    notifier
        .send(&format!("{}/hook", server.uri()), &payload)
        .await;
}

#[tokio::test]
async fn test_success_notification_carries_event_and_keys() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let handler = WebhookHandler::new(
        FixtureSource { url: server.uri() },
        WebhookNotifier::new().unwrap(),
        "processed-bucket",
    );

    let job = Job::from_input_key("projA/raw/clip.mp4");
    handler.notify_success(&job, MediaType::Video).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["event"], "video.processed");
    assert_eq!(body["input_key"], "projA/raw/clip.mp4");
    assert_eq!(body["project_identifier"], "projA");
    assert_eq!(body["processed_bucket"], "processed-bucket");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_unsupported_type_failure_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let handler = WebhookHandler::new(
        FixtureSource { url: server.uri() },
        WebhookNotifier::new().unwrap(),
        "processed-bucket",
    );

    let job = Job::from_input_key("projA/raw/doc.pdf");
    handler
        .notify_failure(&job, None, "Unsupported content type: application/pdf")
        .await;

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["event"], "processing.failed");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Unsupported content type"));
}

#[tokio::test]
async fn test_server_error_is_swallowed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let payload = WebhookPayload::new(
        WebhookEvent::ProcessingFailed,
        "projA",
        "projA/raw/clip.mp4",
        "projA/raw/clip.mp4",
        "processed-bucket",
    );

    // Must not panic or surface an error.
    let notifier = WebhookNotifier::new().unwrap();
    notifier.send(&server.uri(), &payload).await;
}
