//! Adaptive-bitrate HLS video transcoder.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use vod_models::media::ALLOWED_VIDEO_TYPES;
use vod_models::{MediaType, ProcessingResult};

use crate::encoder::MediaEncoder;
use crate::error::{MediaError, MediaResult};
use crate::processor::{collect_output_files, Processor};

/// One resolution/bitrate tier of the ladder. Rates are in kbit/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rung {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub bitrate_k: u32,
    pub maxrate_k: u32,
    pub bufsize_k: u32,
}

/// The fixed ladder. Invariants: maxrate >= bitrate, bufsize >= 2x bitrate,
/// all three increasing with resolution.
pub const LADDER: &[Rung] = &[
    Rung { name: "240p", width: 426, height: 240, bitrate_k: 400, maxrate_k: 480, bufsize_k: 800 },
    Rung { name: "360p", width: 640, height: 360, bitrate_k: 800, maxrate_k: 960, bufsize_k: 1600 },
    Rung { name: "480p", width: 854, height: 480, bitrate_k: 1400, maxrate_k: 1680, bufsize_k: 2800 },
    Rung { name: "720p", width: 1280, height: 720, bitrate_k: 2800, maxrate_k: 3360, bufsize_k: 5600 },
    Rung { name: "1080p", width: 1920, height: 1080, bitrate_k: 5000, maxrate_k: 6000, bufsize_k: 10000 },
];

/// Uniform segment duration so players can switch rungs at any boundary.
pub const SEGMENT_SECONDS: u32 = 4;

/// Keyframe interval aligned to the segment duration.
const GOP_FRAMES: u32 = 60;

/// Name of the master manifest referencing every rung.
pub const MASTER_MANIFEST: &str = "master.m3u8";

/// Transcodes a video into a segmented HLS package: one independently
/// playable stream per ladder rung plus a master manifest.
pub struct VideoTranscoder {
    encoder: Arc<dyn MediaEncoder>,
}

impl VideoTranscoder {
    pub fn new(encoder: Arc<dyn MediaEncoder>) -> Self {
        Self { encoder }
    }

    /// Build the single-invocation encoder argument list.
    ///
    /// One shared split node feeds every rung; each branch downscales with
    /// aspect preserved and then clamps both dimensions to even values.
    fn build_args(input: &Path, output_dir: &Path) -> Vec<String> {
        let n = LADDER.len();
        let mut args: Vec<String> = vec!["-y".into(), "-i".into(), input.display().to_string()];

        let mut filter = format!("[0:v]split={}", n);
        for i in 0..n {
            filter.push_str(&format!("[vin{}]", i));
        }
        filter.push(';');
        for (i, rung) in LADDER.iter().enumerate() {
            filter.push_str(&format!(
                "[vin{i}]scale={w}:{h}:force_original_aspect_ratio=decrease,\
                 scale=trunc(iw/2)*2:trunc(ih/2)*2[v{i}];",
                i = i,
                w = rung.width,
                h = rung.height,
            ));
        }
        filter.push_str(&format!("[0:a]asplit={}", n));
        for i in 0..n {
            filter.push_str(&format!("[a{}]", i));
        }
        args.push("-filter_complex".into());
        args.push(filter);

        for i in 0..n {
            args.push("-map".into());
            args.push(format!("[v{}]", i));
            args.push("-map".into());
            args.push(format!("[a{}]", i));
        }

        args.extend(["-c:v", "libx264", "-profile:v", "main", "-pix_fmt", "yuv420p"].map(String::from));

        for (i, rung) in LADDER.iter().enumerate() {
            args.push(format!("-b:v:{}", i));
            args.push(format!("{}k", rung.bitrate_k));
            args.push(format!("-maxrate:v:{}", i));
            args.push(format!("{}k", rung.maxrate_k));
            args.push(format!("-bufsize:v:{}", i));
            args.push(format!("{}k", rung.bufsize_k));
        }

        args.extend(["-c:a", "aac", "-b:a", "128k", "-ac", "2", "-ar", "48000"].map(String::from));

        // Fixed GOP, no scene-cut keyframes: segment boundaries line up
        // across rungs.
        args.push("-g".into());
        args.push(GOP_FRAMES.to_string());
        args.push("-keyint_min".into());
        args.push(GOP_FRAMES.to_string());
        args.push("-sc_threshold".into());
        args.push("0".into());

        args.extend(
            [
                "-f",
                "hls",
                "-hls_time",
            ]
            .map(String::from),
        );
        args.push(SEGMENT_SECONDS.to_string());
        args.extend(
            [
                "-hls_playlist_type",
                "vod",
                "-hls_flags",
                "independent_segments",
                "-master_pl_name",
                MASTER_MANIFEST,
            ]
            .map(String::from),
        );

        args.push("-var_stream_map".into());
        args.push(
            (0..n)
                .map(|i| format!("v:{i},a:{i}"))
                .collect::<Vec<_>>()
                .join(" "),
        );

        args.push("-hls_segment_filename".into());
        args.push(
            output_dir
                .join("stream_%v")
                .join("seg_%03d.ts")
                .display()
                .to_string(),
        );
        args.push(
            output_dir
                .join("stream_%v")
                .join("index.m3u8")
                .display()
                .to_string(),
        );

        args
    }
}

#[async_trait]
impl Processor for VideoTranscoder {
    fn media_type(&self) -> MediaType {
        MediaType::Video
    }

    fn can_process(&self, content_type: &str) -> bool {
        ALLOWED_VIDEO_TYPES.contains(&content_type.to_lowercase().as_str())
    }

    async fn process(&self, input: &Path, output_dir: &Path) -> MediaResult<ProcessingResult> {
        if !input.is_file() {
            return Err(MediaError::FileNotFound(input.to_path_buf()));
        }
        tokio::fs::create_dir_all(output_dir).await?;

        info!(
            "Transcoding {} into a {}-rung HLS ladder",
            input.display(),
            LADDER.len()
        );

        let args = Self::build_args(input, output_dir);
        let out = self.encoder.run(&args).await?;
        if !out.success() {
            return Err(MediaError::ffmpeg_failed(
                format!("HLS encode failed for {}", input.display()),
                Some(out.stderr_tail),
                out.exit_code,
            ));
        }

        let output_files = collect_output_files(output_dir)?;
        Ok(ProcessingResult {
            output_path: output_dir.to_path_buf(),
            output_files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::testing::{exit_fail, exit_ok, FakeEncoder};

    #[test]
    fn test_ladder_rate_invariants() {
        for rung in LADDER {
            assert!(rung.maxrate_k >= rung.bitrate_k, "{}", rung.name);
            assert!(rung.bufsize_k >= 2 * rung.bitrate_k, "{}", rung.name);
            assert_eq!(rung.width % 2, 0, "{}", rung.name);
            assert_eq!(rung.height % 2, 0, "{}", rung.name);
        }
    }

    #[test]
    fn test_ladder_is_monotonic() {
        for pair in LADDER.windows(2) {
            assert!(pair[1].height > pair[0].height);
            assert!(pair[1].bitrate_k > pair[0].bitrate_k);
            assert!(pair[1].maxrate_k > pair[0].maxrate_k);
            assert!(pair[1].bufsize_k > pair[0].bufsize_k);
        }
    }

    #[test]
    fn test_build_args_references_every_rung() {
        let args = VideoTranscoder::build_args(Path::new("/tmp/input.mp4"), Path::new("/tmp/out"));

        assert!(args.contains(&MASTER_MANIFEST.to_string()));

        let map_count = args.iter().filter(|a| a.as_str() == "-map").count();
        assert_eq!(map_count, LADDER.len() * 2);

        let var_map_pos = args.iter().position(|a| a == "-var_stream_map").unwrap();
        let var_map = &args[var_map_pos + 1];
        assert_eq!(var_map.split(' ').count(), LADDER.len());

        for (i, rung) in LADDER.iter().enumerate() {
            assert!(args.contains(&format!("-b:v:{}", i)));
            assert!(args.contains(&format!("{}k", rung.bitrate_k)));
        }

        let filter_pos = args.iter().position(|a| a == "-filter_complex").unwrap();
        let filter = &args[filter_pos + 1];
        assert!(filter.contains(&format!("split={}", LADDER.len())));
        assert!(filter.contains("trunc(iw/2)*2:trunc(ih/2)*2"));
        assert!(filter.contains("force_original_aspect_ratio=decrease"));
    }

    #[test]
    fn test_build_args_fixes_segment_duration() {
        let args = VideoTranscoder::build_args(Path::new("/tmp/in.mp4"), Path::new("/tmp/out"));
        let pos = args.iter().position(|a| a == "-hls_time").unwrap();
        assert_eq!(args[pos + 1], SEGMENT_SECONDS.to_string());
        assert!(args.contains(&"independent_segments".to_string()));
    }

    #[tokio::test]
    async fn test_process_collects_encoder_output_tree() {
        let work = tempfile::tempdir().unwrap();
        let input = work.path().join("input.mp4");
        std::fs::write(&input, b"not a real video").unwrap();
        let out_dir = work.path().join("hls");

        let fake_out = out_dir.clone();
        let encoder = Arc::new(FakeEncoder::new(move |_args| {
            for i in 0..LADDER.len() {
                let stream = fake_out.join(format!("stream_{}", i));
                std::fs::create_dir_all(&stream).unwrap();
                std::fs::write(stream.join("index.m3u8"), b"#EXTM3U").unwrap();
                std::fs::write(stream.join("seg_000.ts"), b"x").unwrap();
            }
            std::fs::write(fake_out.join(MASTER_MANIFEST), b"#EXTM3U").unwrap();
            exit_ok()
        }));

        let transcoder = VideoTranscoder::new(encoder);
        let result = transcoder.process(&input, &out_dir).await.unwrap();

        assert_eq!(result.output_path, out_dir);
        // Master manifest plus one playlist and one segment per rung.
        assert_eq!(result.output_files.len(), 1 + LADDER.len() * 2);
        assert!(result
            .output_files
            .iter()
            .any(|f| f.file_name().unwrap() == MASTER_MANIFEST));
    }

    #[tokio::test]
    async fn test_encoder_failure_is_fatal_with_stderr() {
        let work = tempfile::tempdir().unwrap();
        let input = work.path().join("input.mp4");
        std::fs::write(&input, b"x").unwrap();

        let encoder = Arc::new(FakeEncoder::new(|_| exit_fail(1, "moov atom not found")));
        let transcoder = VideoTranscoder::new(encoder);

        let err = transcoder
            .process(&input, &work.path().join("hls"))
            .await
            .unwrap_err();
        match err {
            MediaError::FfmpegFailed {
                stderr, exit_code, ..
            } => {
                assert_eq!(exit_code, Some(1));
                assert!(stderr.unwrap().contains("moov atom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_input_is_reported_before_encoding() {
        let encoder = Arc::new(FakeEncoder::new(|_| exit_ok()));
        let transcoder = VideoTranscoder::new(encoder.clone());

        let err = transcoder
            .process(Path::new("/nonexistent/input.mp4"), Path::new("/tmp/out"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
        assert!(encoder.calls.lock().unwrap().is_empty());
    }
}
