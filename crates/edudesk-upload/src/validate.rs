//! Local checks a video must pass before an upload slot is requested.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Largest accepted video: 500 MB.
pub const MAX_VIDEO_SIZE: u64 = 500 * 1024 * 1024;

/// Accepted container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoKind {
    Mp4,
    QuickTime,
    Avi,
}

impl VideoKind {
    pub const ALL: [VideoKind; 3] = [VideoKind::Mp4, VideoKind::QuickTime, VideoKind::Avi];

    pub fn mime_type(&self) -> &'static str {
        match self {
            VideoKind::Mp4 => "video/mp4",
            VideoKind::QuickTime => "video/quicktime",
            VideoKind::Avi => "video/x-msvideo",
        }
    }

    /// Case-insensitive extension lookup.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp4" | "m4v" => Some(VideoKind::Mp4),
            "mov" | "qt" => Some(VideoKind::QuickTime),
            "avi" => Some(VideoKind::Avi),
            _ => None,
        }
    }
}

impl fmt::Display for VideoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileRejection {
    #[error("file is empty")]
    Empty,

    #[error("file is {size} bytes, the limit is {max}")]
    TooLarge { size: u64, max: u64 },

    #[error("unsupported file type {0:?}; expected MP4, MOV or AVI")]
    UnsupportedType(String),
}

/// Checks type (by extension) and size.
///
/// # Examples
///
/// ```
/// use edudesk_upload::{validate_video, FileRejection, VideoKind};
///
/// assert_eq!(validate_video("intro.MP4".as_ref(), 1024), Ok(VideoKind::Mp4));
/// assert_eq!(validate_video("intro.mp4".as_ref(), 0), Err(FileRejection::Empty));
/// ```
pub fn validate_video(path: &Path, size: u64) -> Result<VideoKind, FileRejection> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let kind = VideoKind::from_extension(ext)
        .ok_or_else(|| FileRejection::UnsupportedType(ext.to_string()))?;

    if size == 0 {
        return Err(FileRejection::Empty);
    }
    if size > MAX_VIDEO_SIZE {
        return Err(FileRejection::TooLarge {
            size,
            max: MAX_VIDEO_SIZE,
        });
    }
    Ok(kind)
}
