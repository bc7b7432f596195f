//! Narrow seam around the external encoder process.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Encodes can run for a long time; only the tail of stderr is retained.
pub const STDERR_TAIL_BYTES: usize = 10 * 1024;

/// Outcome of one encoder invocation.
#[derive(Debug, Clone)]
pub struct EncoderOutput {
    /// Process exit code; `None` if killed by a signal
    pub exit_code: Option<i32>,
    /// Last `STDERR_TAIL_BYTES` of stderr, lossily decoded
    pub stderr_tail: String,
}

impl EncoderOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Capability to run the external encoder with a prepared argument list.
///
/// Tests substitute a fake implementation so no real encoder is invoked.
#[async_trait]
pub trait MediaEncoder: Send + Sync {
    async fn run(&self, args: &[String]) -> MediaResult<EncoderOutput>;
}

/// Production encoder: spawns the `ffmpeg` binary found on PATH.
pub struct FfmpegEncoder {
    path: PathBuf,
}

impl FfmpegEncoder {
    /// Locate `ffmpeg` on PATH.
    pub fn discover() -> MediaResult<Self> {
        which::which("ffmpeg")
            .map(|path| Self { path })
            .map_err(|_| MediaError::FfmpegNotFound)
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MediaEncoder for FfmpegEncoder {
    async fn run(&self, args: &[String]) -> MediaResult<EncoderOutput> {
        debug!("Running {} with {} args", self.path.display(), args.len());

        let mut child = Command::new(&self.path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| MediaError::ffmpeg_failed("Failed to capture stderr", None, None))?;

        // Drain stderr concurrently with waiting; a full pipe buffer would
        // otherwise deadlock the encoder.
        let drain = tokio::spawn(async move {
            let mut tail: Vec<u8> = Vec::new();
            let mut buf = [0u8; 8192];
            loop {
                match stderr.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        tail.extend_from_slice(&buf[..n]);
                        if tail.len() > STDERR_TAIL_BYTES {
                            let excess = tail.len() - STDERR_TAIL_BYTES;
                            tail.drain(..excess);
                        }
                    }
                }
            }
            tail
        });

        let status = child.wait().await?;
        let tail = drain.await.unwrap_or_default();

        Ok(EncoderOutput {
            exit_code: status.code(),
            stderr_tail: String::from_utf8_lossy(&tail).into_owned(),
        })
    }
}
