//! Media types, display classification and upload acceptance rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest accepted media upload (50 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Longest accepted video (10 minutes).
pub const MAX_VIDEO_DURATION_SECS: f64 = 600.0;

/// Non-image, non-video content types accepted for media uploads.
pub const ACCEPTED_DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

static IMAGE_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(jpg|jpeg|png|gif|webp|bmp|svg)$").expect("valid regex"));
static VIDEO_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(mp4|mov|avi|wmv|webm|mkv|flv|m4v)$").expect("valid regex"));
static DOCUMENT_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(pdf|doc|docx|txt|rtf|odt|pages)$").expect("valid regex"));
static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([a-z0-9]+)$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Stored media type
// ---------------------------------------------------------------------------

/// Value of the `media.type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Photo,
    Moodboard,
    /// A stored value outside the three known types. Never written.
    #[serde(other)]
    Other,
}

impl MediaType {
    /// Pick the stored type for an uploaded file. Anything whose content
    /// type mentions video is a video; everything else is filed as a photo.
    pub fn for_content_type(content_type: &str) -> Self {
        if content_type.to_ascii_lowercase().contains("video") {
            Self::Video
        } else {
            Self::Photo
        }
    }
}

// ---------------------------------------------------------------------------
// Display classification
// ---------------------------------------------------------------------------

/// How the profile view presents a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Document,
    Other,
}

/// Classify a media item for display.
///
/// The URL extension gives the starting kind; a known stored type then
/// overrides it (`photo`/`moodboard` render as images, `video` as video).
pub fn classify(url: &str, media_type: MediaType) -> MediaKind {
    let by_extension = classify_url(url);
    match media_type {
        MediaType::Video => MediaKind::Video,
        MediaType::Photo | MediaType::Moodboard => MediaKind::Image,
        MediaType::Other => by_extension,
    }
}

/// Classify a URL by its extension alone.
pub fn classify_url(url: &str) -> MediaKind {
    let url = url.to_lowercase();
    if IMAGE_EXT_RE.is_match(&url) {
        MediaKind::Image
    } else if VIDEO_EXT_RE.is_match(&url) {
        MediaKind::Video
    } else if DOCUMENT_EXT_RE.is_match(&url) {
        MediaKind::Document
    } else {
        MediaKind::Other
    }
}

/// Upper-case file extension of a URL, or `"FILE"` when there is none.
pub fn file_extension(url: &str) -> String {
    EXTENSION_RE
        .captures(&url.to_lowercase())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_uppercase())
        .unwrap_or_else(|| "FILE".to_string())
}

// ---------------------------------------------------------------------------
// Upload acceptance
// ---------------------------------------------------------------------------

/// Whether `content_type` is an image type (avatars must be images).
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type.starts_with("image/")
}

/// Whether `content_type` is a video type.
pub fn is_video_content_type(content_type: &str) -> bool {
    content_type.starts_with("video/")
}

/// Whether `content_type` may be uploaded as media.
pub fn is_accepted_content_type(content_type: &str) -> bool {
    is_image_content_type(content_type)
        || is_video_content_type(content_type)
        || ACCEPTED_DOCUMENT_TYPES.contains(&content_type)
}

/// The facts about an upload that acceptance depends on.
#[derive(Debug, Clone)]
pub struct UploadCheck<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub size_bytes: u64,
    /// Probed duration for videos. `None` means the duration could not be
    /// read, which rejects a video.
    pub duration_secs: Option<f64>,
}

/// Why an upload was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UploadRejection {
    #[error("File \"{file_name}\" exceeds 50MB limit.")]
    TooLarge { file_name: String, size_bytes: u64 },

    #[error("Video \"{file_name}\" exceeds 10 minutes.")]
    TooLong { file_name: String, duration_secs: f64 },

    #[error("Video \"{file_name}\" exceeds 10 minutes.")]
    UnreadableDuration { file_name: String },

    #[error("File \"{file_name}\" is not a supported type.")]
    UnsupportedType {
        file_name: String,
        content_type: String,
    },
}

impl UploadRejection {
    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::TooLarge { .. } => "too_large",
            Self::TooLong { .. } => "too_long",
            Self::UnreadableDuration { .. } => "unreadable_duration",
            Self::UnsupportedType { .. } => "unsupported_type",
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            Self::TooLarge { file_name, .. }
            | Self::TooLong { file_name, .. }
            | Self::UnreadableDuration { file_name }
            | Self::UnsupportedType { file_name, .. } => file_name,
        }
    }
}

/// Check one upload against the size, duration and type rules, in that
/// order. The first failing rule is reported.
pub fn validate_upload(check: &UploadCheck<'_>) -> Result<(), UploadRejection> {
    let file_name = check.file_name.to_string();

    if check.size_bytes > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge {
            file_name,
            size_bytes: check.size_bytes,
        });
    }

    if is_video_content_type(check.content_type) {
        match check.duration_secs {
            Some(secs) if secs <= MAX_VIDEO_DURATION_SECS => {}
            Some(secs) => {
                return Err(UploadRejection::TooLong {
                    file_name,
                    duration_secs: secs,
                })
            }
            None => return Err(UploadRejection::UnreadableDuration { file_name }),
        }
    }

    if !is_accepted_content_type(check.content_type) {
        return Err(UploadRejection::UnsupportedType {
            file_name,
            content_type: check.content_type.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check<'a>(content_type: &'a str, size: u64, duration: Option<f64>) -> UploadCheck<'a> {
        UploadCheck {
            file_name: "clip.bin",
            content_type,
            size_bytes: size,
            duration_secs: duration,
        }
    }

    #[test]
    fn media_type_from_content_type() {
        assert_eq!(MediaType::for_content_type("video/mp4"), MediaType::Video);
        assert_eq!(MediaType::for_content_type("image/png"), MediaType::Photo);
        assert_eq!(MediaType::for_content_type("application/pdf"), MediaType::Photo);
    }

    #[test]
    fn stored_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MediaType::Moodboard).unwrap(), "\"moodboard\"");
    }

    #[test]
    fn classify_prefers_stored_video_type() {
        assert_eq!(classify("https://x/a.png", MediaType::Video), MediaKind::Video);
    }

    #[test]
    fn stored_photo_or_moodboard_renders_as_image_whatever_the_extension() {
        assert_eq!(classify("https://x/a.mp4", MediaType::Photo), MediaKind::Image);
        assert_eq!(
            classify("https://x/lab-upload/media/a/brief.pdf", MediaType::Photo),
            MediaKind::Image
        );
        assert_eq!(classify("https://x/notes.txt", MediaType::Moodboard), MediaKind::Image);
    }

    #[test]
    fn unrecognised_stored_type_falls_back_to_extension() {
        let stored: MediaType = serde_json::from_str("\"sketch\"").unwrap();
        assert_eq!(stored, MediaType::Other);
        assert_eq!(classify("https://x/brief.PDF", stored), MediaKind::Document);
        assert_eq!(classify("https://x/clip.webm", stored), MediaKind::Video);
        assert_eq!(classify("https://x/archive.zip", stored), MediaKind::Other);
    }

    #[test]
    fn classify_url_by_extension() {
        assert_eq!(classify_url("https://x/a.JPEG"), MediaKind::Image);
        assert_eq!(classify_url("https://x/a.mkv"), MediaKind::Video);
        assert_eq!(classify_url("https://x/a.docx"), MediaKind::Document);
        assert_eq!(classify_url("https://x/a.zip"), MediaKind::Other);
    }

    #[test]
    fn extension_upper_cased_or_file() {
        assert_eq!(file_extension("https://x/y/photo.jpg"), "JPG");
        assert_eq!(file_extension("https://x/y/noext"), "FILE");
    }

    #[test]
    fn accepts_images_videos_and_documents() {
        assert!(validate_upload(&check("image/png", 10, None)).is_ok());
        assert!(validate_upload(&check("video/mp4", 10, Some(599.0))).is_ok());
        assert!(validate_upload(&check("application/pdf", 10, None)).is_ok());
        assert!(validate_upload(&check("text/plain", 10, None)).is_ok());
    }

    #[test]
    fn rejects_oversized_files() {
        let err = validate_upload(&check("image/png", MAX_UPLOAD_BYTES + 1, None)).unwrap_err();
        assert_eq!(err.reason(), "too_large");
        assert_eq!(err.to_string(), "File \"clip.bin\" exceeds 50MB limit.");
        assert!(validate_upload(&check("image/png", MAX_UPLOAD_BYTES, None)).is_ok());
    }

    #[test]
    fn rejects_long_or_unreadable_videos() {
        let err = validate_upload(&check("video/mp4", 10, Some(600.5))).unwrap_err();
        assert_eq!(err.reason(), "too_long");
        assert_eq!(err.to_string(), "Video \"clip.bin\" exceeds 10 minutes.");
        assert!(validate_upload(&check("video/mp4", 10, Some(600.0))).is_ok());

        let err = validate_upload(&check("video/webm", 10, None)).unwrap_err();
        assert_eq!(err.reason(), "unreadable_duration");
    }

    #[test]
    fn rejects_unsupported_types() {
        let err = validate_upload(&check("application/zip", 10, None)).unwrap_err();
        assert_eq!(err.reason(), "unsupported_type");
        assert_eq!(err.file_name(), "clip.bin");
    }
}
