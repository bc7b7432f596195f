//! Registry error types.

use thiserror::Error;

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Registry read failed for {project_id}: {message}")]
    Get { project_id: String, message: String },

    #[error("Registry scan failed: {0}")]
    Scan(String),
}

impl RegistryError {
    pub fn get(project_id: impl Into<String>, message: impl ToString) -> Self {
        Self::Get {
            project_id: project_id.into(),
            message: message.to_string(),
        }
    }
}
