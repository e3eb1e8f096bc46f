//! Media file kinds stored alongside draft metadata.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Container format of a draft's media file.
///
/// The kind is detected from the payload's leading bytes, and decides the
/// file name inside the draft directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// ISO base media (MP4/MOV) video
    Mp4,
    /// PNG image
    Png,
    /// JPEG image
    Jpeg,
    /// WebP image
    Webp,
}

impl MediaKind {
    /// All kinds, in the order a draft directory is searched.
    pub const ALL: [MediaKind; 4] = [
        MediaKind::Mp4,
        MediaKind::Png,
        MediaKind::Jpeg,
        MediaKind::Webp,
    ];

    /// File name used inside a draft directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            MediaKind::Mp4 => "video.mp4",
            MediaKind::Png => "image.png",
            MediaKind::Jpeg => "image.jpg",
            MediaKind::Webp => "image.webp",
        }
    }

    /// MIME type for HTTP responses and uploads.
    pub fn mime_type(&self) -> &'static str {
        match self {
            MediaKind::Mp4 => "video/mp4",
            MediaKind::Png => "image/png",
            MediaKind::Jpeg => "image/jpeg",
            MediaKind::Webp => "image/webp",
        }
    }

    /// Whether this is a video container.
    pub fn is_video(&self) -> bool {
        matches!(self, MediaKind::Mp4)
    }

    /// Detect the kind from the first bytes of a payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelcast_core::MediaKind;
    ///
    /// let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    /// assert_eq!(MediaKind::sniff(&png), Some(MediaKind::Png));
    /// assert_eq!(MediaKind::sniff(b"<html>oops</html>"), None);
    /// ```
    pub fn sniff(data: &[u8]) -> Option<MediaKind> {
        if data.len() >= 12 && &data[4..8] == b"ftyp" {
            return Some(MediaKind::Mp4);
        }
        if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(MediaKind::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(MediaKind::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(MediaKind::Webp);
        }
        None
    }

    /// Find the kind whose file name matches `name`.
    pub fn from_file_name(name: &str) -> Option<MediaKind> {
        Self::ALL.into_iter().find(|kind| kind.file_name() == name)
    }
}

/// A media file belonging to a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    /// Container format
    pub kind: MediaKind,
    /// Absolute or store-relative path
    pub path: PathBuf,
    /// Size in bytes
    pub size_bytes: u64,
}
