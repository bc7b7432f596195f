//! Job descriptor passed from the dispatcher to a worker execution.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single transcoding job: one input object, one output destination.
///
/// The dispatcher serializes this into the worker container's `JOB`
/// environment variable; the worker deserializes it at startup and never
/// mutates it. Keys are camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Source object key, namespaced as `<project-identifier>/...`
    pub input_key: String,
    /// Destination key template; its directory component is the upload prefix
    pub output_key: String,
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Job inputKey must not be empty")]
    EmptyInputKey,

    #[error("Job outputKey must not be empty")]
    EmptyOutputKey,
}

impl Job {
    /// Create a job with the default in-place namespace (output == input).
    ///
    /// The destination is a different bucket, so an identical key does not
    /// overwrite the source object.
    pub fn from_input_key(input_key: impl Into<String>) -> Self {
        let input_key = input_key.into();
        Self {
            output_key: input_key.clone(),
            input_key,
        }
    }

    /// Validate the non-empty invariant on both keys.
    pub fn validate(&self) -> Result<(), JobError> {
        if self.input_key.is_empty() {
            return Err(JobError::EmptyInputKey);
        }
        if self.output_key.is_empty() {
            return Err(JobError::EmptyOutputKey);
        }
        Ok(())
    }

    /// Leading path segment of the input key, which names the project.
    ///
    /// Returns `None` for keys with no `/` separator.
    pub fn project_identifier(&self) -> Option<&str> {
        match self.input_key.split_once('/') {
            Some((first, _)) if !first.is_empty() => Some(first),
            _ => None,
        }
    }

    /// Directory component of the output key; processed artifacts are
    /// published under this prefix.
    pub fn output_prefix(&self) -> &str {
        match self.output_key.rsplit_once('/') {
            Some((dir, _)) => dir,
            None => "",
        }
    }

    /// File extension of the input key (with leading dot), if any.
    pub fn input_extension(&self) -> Option<&str> {
        let name = self.input_key.rsplit('/').next()?;
        let dot = name.rfind('.')?;
        if dot == 0 {
            return None;
        }
        Some(&name[dot..])
    }
}
