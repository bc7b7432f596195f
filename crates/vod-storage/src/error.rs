//! Storage error types.

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to fetch metadata for {key}: {message}")]
    Head { key: String, message: String },

    #[error("Failed to download {key}: {message}")]
    Download { key: String, message: String },

    #[error("Failed to upload {key}: {message}")]
    Upload { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn head(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Head {
            key: key.into(),
            message: message.to_string(),
        }
    }

    pub fn download(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Download {
            key: key.into(),
            message: message.to_string(),
        }
    }

    pub fn upload(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Upload {
            key: key.into(),
            message: message.to_string(),
        }
    }
}
