//! Media type classification and content-type tables.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Content types accepted as images.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/bmp",
    "image/svg+xml",
    "image/tiff",
    "image/tif",
    "image/x-icon",
    "image/vnd.microsoft.icon",
    "image/x-png",
    "image/apng",
    "image/avif",
    "image/heic",
    "image/heif",
];

/// Content types accepted as videos.
pub const ALLOWED_VIDEO_TYPES: &[&str] = &[
    "video/mp4",
    "video/mpeg",
    "video/quicktime",
    "video/x-msvideo",
    "video/x-ms-wmv",
    "video/webm",
    "video/ogg",
    "video/x-matroska",
    "video/3gpp",
    "video/3gpp2",
    "video/x-flv",
    "video/x-m4v",
    "video/mp2t",
    "video/x-ms-asf",
    "video/x-ms-wm",
    "video/x-ms-wmx",
    "video/x-ms-wvx",
    "video/avi",
];

/// Kind of media an input object holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Video,
    Image,
    Unknown,
}

impl MediaType {
    /// Classify a content type against the allow-lists.
    pub fn from_content_type(content_type: &str) -> Self {
        let normalized = content_type.to_lowercase();

        if ALLOWED_VIDEO_TYPES.contains(&normalized.as_str()) {
            return MediaType::Video;
        }
        if ALLOWED_IMAGE_TYPES.contains(&normalized.as_str()) {
            return MediaType::Image;
        }
        MediaType::Unknown
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MediaType::Video => "video",
            MediaType::Image => "image",
            MediaType::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Guess a content type from a filename extension.
///
/// Fallback for objects stored without content-type metadata. Unmatched
/// extensions map to `application/octet-stream`, which classifies as
/// `Unknown`.
pub fn content_type_for_extension(filename: &str) -> &'static str {
    let ext = filename
        .rsplit('.')
        .next()
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        // Video
        "mp4" => "video/mp4",
        "mpeg" => "video/mpeg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "wmv" => "video/x-ms-wmv",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mkv" => "video/x-matroska",
        "3gp" => "video/3gpp",
        "3g2" => "video/3gpp2",
        "flv" => "video/x-flv",
        "m4v" => "video/x-m4v",
        "ts" => "video/mp2t",
        "asf" => "video/x-ms-asf",
        // Image
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tiff" | "tif" => "image/tiff",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => "application/octet-stream",
    }
}

/// Content type for a processed delivery artifact, keyed on extension.
///
/// Covers the HLS manifest/segment extensions and the image matrix formats.
pub fn delivery_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "m3u8" => "application/vnd.apple.mpegurl",
        "ts" => "video/mp2t",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tiff" | "tif" => "image/tiff",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => "application/octet-stream",
    }
}

/// Resolver for HLS artifacts only; other files defer to the fallback
/// table. Supplied by the video transcoder's upload step.
pub fn hls_content_type(path: &Path) -> Option<&'static str> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("m3u8") => Some("application/vnd.apple.mpegurl"),
        Some("ts") => Some("video/mp2t"),
        _ => None,
    }
}

/// Local artifacts produced by one transcoder run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingResult {
    /// Root of the output tree
    pub output_path: PathBuf,
    /// Every regular file under the output root
    pub output_files: Vec<PathBuf>,
}
