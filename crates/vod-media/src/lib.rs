//! FFmpeg CLI wrapper for the transcoding pipeline.
//!
//! This crate provides:
//! - The `MediaEncoder` seam around the external encoder process
//! - The `Processor` capability trait and its factory
//! - The HLS ladder video transcoder
//! - The size×format matrix image transcoder

pub mod encoder;
pub mod error;
pub mod image;
pub mod processor;
pub mod video;

pub use encoder::{EncoderOutput, FfmpegEncoder, MediaEncoder};
pub use error::{MediaError, MediaResult};
pub use image::ImageTranscoder;
pub use processor::{processor_for, Processor};
pub use video::VideoTranscoder;
