//! Worker configuration, read once from the environment at startup.

use std::path::PathBuf;

use thiserror::Error;

use vod_models::{Job, MediaType};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<String>),

    #[error("Invalid JOB value: {0}")]
    InvalidJob(String),
}

/// Everything a worker execution needs, resolved before any job work runs.
///
/// Components take this by value in their constructors; nothing reads the
/// environment after startup.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub raw_bucket: String,
    pub processed_bucket: String,
    pub projects_table: String,
    pub job: Job,
    pub work_dir: PathBuf,
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut require = |name: &str| match std::env::var(name) {
            Ok(v) if !v.is_empty() => Some(v),
            _ => {
                missing.push(name.to_string());
                None
            }
        };

        let raw_bucket = require("RAW_BUCKET");
        let processed_bucket = require("PROCESSED_BUCKET");
        let projects_table = require("PROJECTS_TABLE");
        let job_json = require("JOB");

        let work_dir = std::env::var("WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"));

        match (raw_bucket, processed_bucket, projects_table, job_json) {
            (Some(raw), Some(processed), Some(table), Some(job)) => {
                Self::build(raw, processed, table, &job, work_dir)
            }
            _ => Err(ConfigError::MissingVars(missing)),
        }
    }

    fn build(
        raw_bucket: String,
        processed_bucket: String,
        projects_table: String,
        job_json: &str,
        work_dir: PathBuf,
    ) -> Result<Self, ConfigError> {
        let job: Job =
            serde_json::from_str(job_json).map_err(|e| ConfigError::InvalidJob(e.to_string()))?;
        job.validate()
            .map_err(|e| ConfigError::InvalidJob(e.to_string()))?;

        Ok(Self {
            raw_bucket,
            processed_bucket,
            projects_table,
            job,
            work_dir,
        })
    }

    /// Local path the input object is downloaded to. The extension is
    /// carried over from the input key so the encoder can probe by name.
    pub fn input_path(&self) -> PathBuf {
        let ext = self.job.input_extension().unwrap_or(".mp4");
        self.work_dir.join(format!("input{}", ext))
    }

    /// Root of the scratch output tree.
    pub fn output_root(&self) -> PathBuf {
        self.work_dir.join("output")
    }

    /// Output tree for a media type.
    pub fn output_dir(&self, media_type: MediaType) -> PathBuf {
        match media_type {
            MediaType::Image => self.output_root().join("images"),
            _ => self.output_root().join("hls"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(job_json: &str) -> Result<WorkerConfig, ConfigError> {
        WorkerConfig::build(
            "raw".to_string(),
            "processed".to_string(),
            "projects".to_string(),
            job_json,
            PathBuf::from("/tmp/job"),
        )
    }

    #[test]
    fn test_parses_job_wire_format() {
        let config =
            config_for(r#"{"inputKey":"projA/raw/clip.mp4","outputKey":"projA/raw/clip.mp4"}"#)
                .unwrap();
        assert_eq!(config.job.input_key, "projA/raw/clip.mp4");
        assert_eq!(config.input_path(), PathBuf::from("/tmp/job/input.mp4"));
    }

    #[test]
    fn test_rejects_malformed_job() {
        assert!(matches!(
            config_for("not json"),
            Err(ConfigError::InvalidJob(_))
        ));
        assert!(matches!(
            config_for(r#"{"inputKey":"","outputKey":"x"}"#),
            Err(ConfigError::InvalidJob(_))
        ));
    }

    #[test]
    fn test_input_path_defaults_extension() {
        let config = config_for(r#"{"inputKey":"projA/upload","outputKey":"projA/upload"}"#).unwrap();
        assert_eq!(config.input_path(), PathBuf::from("/tmp/job/input.mp4"));

        let config = config_for(r#"{"inputKey":"projA/pic.PNG","outputKey":"projA/pic.PNG"}"#).unwrap();
        assert_eq!(config.input_path(), PathBuf::from("/tmp/job/input.PNG"));
    }

    #[test]
    fn test_output_dirs_by_media_type() {
        let config = config_for(r#"{"inputKey":"p/a.mp4","outputKey":"p/a.mp4"}"#).unwrap();
        assert_eq!(
            config.output_dir(MediaType::Video),
            PathBuf::from("/tmp/job/output/hls")
        );
        assert_eq!(
            config.output_dir(MediaType::Image),
            PathBuf::from("/tmp/job/output/images")
        );
    }

    #[test]
    fn test_missing_vars_are_reported_by_name() {
        // from_env touches the process environment, so drive the error
        // shape directly.
        let err = ConfigError::MissingVars(vec!["RAW_BUCKET".into(), "JOB".into()]);
        let msg = err.to_string();
        assert!(msg.contains("RAW_BUCKET"));
        assert!(msg.contains("JOB"));
    }
}
