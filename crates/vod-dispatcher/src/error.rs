//! Dispatcher error types.

use thiserror::Error;

pub type DispatchResult<T> = Result<T, DispatchError>;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<String>),

    #[error("No valid subnet IDs found in SUBNETS environment variable")]
    NoSubnets,

    #[error("Failed to serialize job: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to launch task: {0}")]
    Launch(String),

    #[error(transparent)]
    KeyDecode(#[from] vod_models::event::KeyDecodeError),
}
