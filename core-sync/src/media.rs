//! # Media Classification
//!
//! Classifies camera-roll files as pictures or videos from the file name
//! alone. The camera folder regularly contains sidecar files (thumbnails,
//! `.nomedia`, editor project files); anything that does not classify as an
//! image or video is simply not a sync candidate.

use bridge_traits::transfer::UploadOrigin;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Image extensions and their MIME types, matched case-insensitively.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("dng", "image/x-adobe-dng"),
];

/// Video extensions and their MIME types, matched case-insensitively.
const VIDEO_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("mkv", "video/x-matroska"),
    ("webm", "video/webm"),
    ("3gp", "video/3gpp"),
    ("mpg", "video/mpeg"),
    ("mpeg", "video/mpeg"),
];

/// The two media kinds the camera-roll sync handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Picture,
    Video,
}

impl MediaKind {
    /// String representation for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Picture => "picture",
            MediaKind::Video => "video",
        }
    }

    /// The created-by tag carried on uploads of this kind.
    pub fn upload_origin(&self) -> UploadOrigin {
        match self {
            MediaKind::Picture => UploadOrigin::InstantPicture,
            MediaKind::Video => UploadOrigin::InstantVideo,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a file by name into a media kind plus MIME type.
///
/// Returns `None` for files that are neither image nor video; such files
/// are never sync candidates.
pub fn classify(file_name: &str) -> Option<(MediaKind, &'static str)> {
    let ext = file_name.rsplit_once('.').map(|(_, e)| e)?;
    let ext_lower = ext.to_lowercase();

    if let Some((_, mime)) = IMAGE_TYPES.iter().find(|(e, _)| *e == ext_lower) {
        return Some((MediaKind::Picture, mime));
    }
    if let Some((_, mime)) = VIDEO_TYPES.iter().find(|(e, _)| *e == ext_lower) {
        return Some((MediaKind::Video, mime));
    }

    None
}
