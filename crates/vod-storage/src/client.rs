//! S3 client construction.

use aws_config::BehaviorVersion;
use tracing::debug;

/// Bucket pair the pipeline reads from and publishes to.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Bucket holding user uploads
    pub raw_bucket: String,
    /// Bucket delivery artifacts are published to
    pub processed_bucket: String,
}

/// S3 gateway bound to the raw/processed bucket pair.
#[derive(Clone)]
pub struct StorageClient {
    pub(crate) s3: aws_sdk_s3::Client,
    pub(crate) config: StorageConfig,
}

impl StorageClient {
    /// Build a client from the ambient AWS environment.
    pub async fn new(config: StorageConfig) -> Self {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let s3 = aws_sdk_s3::Client::new(&aws_config);

        debug!(
            "Storage client ready: raw={} processed={}",
            config.raw_bucket, config.processed_bucket
        );

        Self { s3, config }
    }

    /// Wrap an existing SDK client; used by tests pointing at stand-ins.
    pub fn with_client(s3: aws_sdk_s3::Client, config: StorageConfig) -> Self {
        Self { s3, config }
    }

    pub fn processed_bucket(&self) -> &str {
        &self.config.processed_bucket
    }
}
