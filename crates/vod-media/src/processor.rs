//! Processor capability trait and selection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use vod_models::{MediaType, ProcessingResult};

use crate::encoder::MediaEncoder;
use crate::error::MediaResult;
use crate::image::ImageTranscoder;
use crate::video::VideoTranscoder;

/// One transcoding strategy: turns a local input file into a delivery tree.
#[async_trait]
pub trait Processor: Send + Sync {
    fn media_type(&self) -> MediaType;

    /// Whether this processor accepts the given content type.
    fn can_process(&self, content_type: &str) -> bool;

    async fn process(&self, input: &Path, output_dir: &Path) -> MediaResult<ProcessingResult>;
}

/// Select the processor for a media type.
///
/// `Unknown` has no processor; the caller reports the unsupported type.
pub fn processor_for(
    media_type: MediaType,
    encoder: Arc<dyn MediaEncoder>,
) -> Option<Box<dyn Processor>> {
    match media_type {
        MediaType::Video => Some(Box::new(VideoTranscoder::new(encoder))),
        MediaType::Image => Some(Box::new(ImageTranscoder::new(encoder))),
        MediaType::Unknown => None,
    }
}

/// Recursively collect every regular file under `root`, sorted for a stable
/// order within a run.
pub(crate) fn collect_output_files(root: &Path) -> MediaResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                stack.push(path);
            } else {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::testing::{exit_ok, FakeEncoder};

    #[test]
    fn test_factory_selects_by_media_type() {
        let encoder: Arc<dyn MediaEncoder> = Arc::new(FakeEncoder::new(|_| exit_ok()));

        let video = processor_for(MediaType::Video, encoder.clone()).unwrap();
        assert_eq!(video.media_type(), MediaType::Video);
        assert!(video.can_process("video/mp4"));
        assert!(!video.can_process("image/png"));

        let image = processor_for(MediaType::Image, encoder.clone()).unwrap();
        assert_eq!(image.media_type(), MediaType::Image);
        assert!(image.can_process("image/png"));

        assert!(processor_for(MediaType::Unknown, encoder).is_none());
    }

    #[test]
    fn test_collect_output_files_walks_recursively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("stream_0")).unwrap();
        std::fs::write(dir.path().join("master.m3u8"), b"#EXTM3U").unwrap();
        std::fs::write(dir.path().join("stream_0/seg_000.ts"), b"x").unwrap();
        std::fs::write(dir.path().join("stream_0/index.m3u8"), b"#EXTM3U").unwrap();

        let files = collect_output_files(dir.path()).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| f.is_file()));
    }
}
