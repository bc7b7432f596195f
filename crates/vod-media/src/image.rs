//! Image transcoder producing a size×format delivery matrix.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use vod_models::media::ALLOWED_IMAGE_TYPES;
use vod_models::{MediaType, ProcessingResult};

use crate::encoder::MediaEncoder;
use crate::error::{MediaError, MediaResult};
use crate::processor::Processor;

/// Output sizes; width 0 means convert without resizing.
pub const SIZES: &[(&str, u32)] = &[
    ("thumbnail", 150),
    ("small", 400),
    ("medium", 800),
    ("large", 1200),
    ("original", 0),
];

/// Output formats. AVIF support varies by encoder build and is optional.
pub const FORMATS: &[&str] = &["webp", "avif", "jpg"];

/// Transcodes an image into one file per `sizes × formats` cell, named
/// `<size>.<format>`.
pub struct ImageTranscoder {
    encoder: Arc<dyn MediaEncoder>,
}

impl ImageTranscoder {
    pub fn new(encoder: Arc<dyn MediaEncoder>) -> Self {
        Self { encoder }
    }

    /// Arguments for one matrix cell.
    fn build_args(input: &Path, output: &Path, width: u32, format: &str) -> Vec<String> {
        let mut args: Vec<String> = vec!["-y".into(), "-i".into(), input.display().to_string()];

        if width > 0 {
            args.push("-vf".into());
            args.push(format!("scale={}:-1:flags=lanczos", width));
        }

        match format {
            "webp" => {
                args.extend(["-quality", "85", "-c:v", "libwebp"].map(String::from));
            }
            "avif" => {
                args.extend(
                    ["-c:v", "libaom-av1", "-crf", "30", "-b:v", "0", "-still-picture", "1"]
                        .map(String::from),
                );
            }
            _ => {
                args.extend(["-q:v", "3", "-c:v", "mjpeg"].map(String::from));
            }
        }

        args.push(output.display().to_string());
        args
    }
}

#[async_trait]
impl Processor for ImageTranscoder {
    fn media_type(&self) -> MediaType {
        MediaType::Image
    }

    fn can_process(&self, content_type: &str) -> bool {
        ALLOWED_IMAGE_TYPES.contains(&content_type.to_lowercase().as_str())
    }

    async fn process(&self, input: &Path, output_dir: &Path) -> MediaResult<ProcessingResult> {
        if !input.is_file() {
            return Err(MediaError::FileNotFound(input.to_path_buf()));
        }
        tokio::fs::create_dir_all(output_dir).await?;

        info!(
            "Converting {} into {} variants",
            input.display(),
            SIZES.len() * FORMATS.len()
        );

        let mut output_files = Vec::with_capacity(SIZES.len() * FORMATS.len());

        for format in FORMATS {
            for (size_name, width) in SIZES {
                let output = output_dir.join(format!("{}.{}", size_name, format));
                let args = Self::build_args(input, &output, *width, format);

                let out = self.encoder.run(&args).await?;
                if !out.success() {
                    // AVIF is best-effort: not every ffmpeg build carries
                    // the encoder. Skip the cell and keep going.
                    if *format == "avif" {
                        warn!(
                            "AVIF encode failed for {}, skipping cell: {}",
                            output.display(),
                            out.stderr_tail
                        );
                        continue;
                    }
                    return Err(MediaError::ffmpeg_failed(
                        format!("Image encode failed for {}", output.display()),
                        Some(out.stderr_tail),
                        out.exit_code,
                    ));
                }

                output_files.push(output);
            }
        }

        Ok(ProcessingResult {
            output_path: output_dir.to_path_buf(),
            output_files,
        })
    }
}
