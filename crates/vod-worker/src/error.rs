//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Unsupported content type: {0}. Allowed types: videos and images.")]
    UnsupportedType(String),

    #[error("Storage error: {0}")]
    Storage(#[from] vod_storage::StorageError),

    #[error("Media error: {0}")]
    Media(#[from] vod_media::MediaError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
