//! The per-job processing pipeline.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use vod_media::{processor_for, FfmpegEncoder, MediaEncoder};
use vod_models::media::{content_type_for_extension, hls_content_type};
use vod_models::MediaType;
use vod_registry::RegistryClient;
use vod_storage::{ContentTypeResolver, StorageClient, StorageConfig, StorageResult};
use vod_webhook::{WebhookHandler, WebhookNotifier, WebhookUrlSource};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};

/// Object storage as the pipeline sees it. The S3 client is the production
/// implementation; tests substitute a fixture.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn head_content_type(&self, key: &str) -> StorageResult<Option<String>>;

    async fn download(&self, key: &str, dest: &Path) -> StorageResult<()>;

    async fn upload_directory(
        &self,
        root: &Path,
        prefix: &str,
        resolver: Option<ContentTypeResolver<'_>>,
    ) -> StorageResult<()>;
}

#[async_trait]
impl JobStore for StorageClient {
    async fn head_content_type(&self, key: &str) -> StorageResult<Option<String>> {
        StorageClient::head_content_type(self, key).await
    }

    async fn download(&self, key: &str, dest: &Path) -> StorageResult<()> {
        StorageClient::download(self, key, dest).await
    }

    async fn upload_directory(
        &self,
        root: &Path,
        prefix: &str,
        resolver: Option<ContentTypeResolver<'_>>,
    ) -> StorageResult<()> {
        StorageClient::upload_directory(self, root, prefix, resolver)
            .await
            .map(|_| ())
    }
}

/// Collaborators for one job execution.
pub struct JobContext<S = StorageClient, U = RegistryClient>
where
    S: JobStore,
    U: WebhookUrlSource,
{
    pub config: WorkerConfig,
    pub storage: S,
    pub encoder: Arc<dyn MediaEncoder>,
    pub webhook: WebhookHandler<U>,
}

impl JobContext {
    pub async fn new(config: WorkerConfig) -> WorkerResult<Self> {
        let storage = StorageClient::new(StorageConfig {
            raw_bucket: config.raw_bucket.clone(),
            processed_bucket: config.processed_bucket.clone(),
        })
        .await;

        let registry = RegistryClient::new(&config.projects_table).await;
        let notifier = WebhookNotifier::new()?;
        let webhook = WebhookHandler::new(registry, notifier, &config.processed_bucket);

        let encoder: Arc<dyn MediaEncoder> = Arc::new(FfmpegEncoder::discover()?);

        Ok(Self {
            config,
            storage,
            encoder,
            webhook,
        })
    }
}

/// Run one job to its terminal state and return the process exit code.
///
/// Notification and cleanup happen on both paths; neither can change the
/// outcome.
pub async fn execute<S: JobStore, U: WebhookUrlSource>(ctx: &JobContext<S, U>) -> i32 {
    let job = &ctx.config.job;
    info!("Processing job: {} -> {}", job.input_key, job.output_key);

    let mut media_type = None;
    let code = match process(ctx, &mut media_type).await {
        Ok(media_type) => {
            ctx.webhook.notify_success(job, media_type).await;
            0
        }
        Err(e) => {
            error!("Processing failed: {}", e);
            ctx.webhook
                .notify_failure(job, media_type, &e.to_string())
                .await;
            1
        }
    };

    cleanup(&ctx.config).await;
    code
}

/// The fallible stages. `media_type` is reported back as soon as
/// classification succeeds so the failure path can name the type.
async fn process<S: JobStore, U: WebhookUrlSource>(
    ctx: &JobContext<S, U>,
    media_type: &mut Option<MediaType>,
) -> WorkerResult<MediaType> {
    let job = &ctx.config.job;

    info!("Downloading input file...");
    let input_path = ctx.config.input_path();
    ctx.storage.download(&job.input_key, &input_path).await?;

    info!("Determining processor...");
    let head = ctx.storage.head_content_type(&job.input_key).await;
    let content_type = resolve_content_type(head, &job.input_key);
    let kind = MediaType::from_content_type(&content_type);
    if kind == MediaType::Unknown {
        return Err(WorkerError::UnsupportedType(content_type));
    }
    *media_type = Some(kind);

    let Some(processor) = processor_for(kind, ctx.encoder.clone()) else {
        return Err(WorkerError::UnsupportedType(content_type));
    };

    info!("Processing file...");
    let output_dir = ctx.config.output_dir(kind);
    let result = processor.process(&input_path, &output_dir).await?;

    info!("Uploading processed files...");
    let resolver: Option<ContentTypeResolver<'_>> = match kind {
        MediaType::Video => Some(&hls_content_type),
        _ => None,
    };
    ctx.storage
        .upload_directory(&output_dir, job.output_prefix(), resolver)
        .await?;

    info!("Successfully processed {} files", result.output_files.len());
    Ok(kind)
}

/// Content type of the input object. An object stored without one is
/// `application/octet-stream`; the extension table is consulted only when
/// the metadata lookup itself fails.
fn resolve_content_type(head: StorageResult<Option<String>>, input_key: &str) -> String {
    match head {
        Ok(Some(content_type)) => content_type,
        Ok(None) => {
            warn!("Object has no stored content type");
            "application/octet-stream".to_string()
        }
        Err(e) => {
            warn!("Failed to get content type from storage: {}", e);
            content_type_for_extension(input_key).to_string()
        }
    }
}

/// Remove the scratch download and output trees. Failures are logged and
/// swallowed; runs on success and failure alike.
pub async fn cleanup(config: &WorkerConfig) {
    let input_path = config.input_path();
    if input_path.exists() {
        if let Err(e) = tokio::fs::remove_file(&input_path).await {
            warn!("Failed to remove {}: {}", input_path.display(), e);
        }
    }

    let output_root = config.output_root();
    if output_root.exists() {
        if let Err(e) = tokio::fs::remove_dir_all(&output_root).await {
            warn!("Failed to remove {}: {}", output_root.display(), e);
        }
    }
}
