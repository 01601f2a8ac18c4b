//! Upload validation and storage for review media.
//!
//! Every incoming file is checked against a size ceiling and a content-type
//! allow-list, classified as image or video, and given a generated filename
//! that never depends on the client-supplied name beyond its extension.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub mod store;

pub use store::LocalStore;

/// Upload size ceiling per file: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Content types accepted for review media.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
    "video/mp4",
    "video/webm",
    "video/mov",
    "video/avi",
];

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("file {filename} is too large ({size} bytes); max size is 10MB")]
    TooLarge { filename: String, size: u64 },
    #[error("file type {content_type} is not allowed")]
    UnsupportedType { content_type: String },
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// IMAGE or VIDEO, decided by content-type prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaKind {
    #[serde(rename = "IMAGE")]
    Image,
    #[serde(rename = "VIDEO")]
    Video,
}

impl MediaKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "IMAGE",
            MediaKind::Video => "VIDEO",
        }
    }
}

/// Checks one file against the size ceiling and the content-type allow-list,
/// returning its classification on success.
///
/// # Errors
///
/// Returns [`MediaError::TooLarge`] or [`MediaError::UnsupportedType`] with a
/// message naming the offending file or type.
pub fn validate_upload(
    original_name: &str,
    content_type: &str,
    size: u64,
) -> Result<MediaKind, MediaError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(MediaError::TooLarge {
            filename: original_name.to_string(),
            size,
        });
    }
    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(MediaError::UnsupportedType {
            content_type: content_type.to_string(),
        });
    }
    if content_type.starts_with("image/") {
        Ok(MediaKind::Image)
    } else {
        Ok(MediaKind::Video)
    }
}

/// Generates a collision-free filename: a fresh UUIDv4 plus a sanitized
/// extension taken from the original name (or the content-type subtype when
/// the name carries none). The original name itself never reaches disk, so
/// path traversal through crafted names is impossible.
#[must_use]
pub fn unique_filename(original_name: &str, content_type: &str) -> String {
    let extension = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(str::to_ascii_lowercase)
        .or_else(|| {
            content_type
                .split_once('/')
                .map(|(_, subtype)| subtype.to_ascii_lowercase())
        })
        .unwrap_or_else(|| "bin".to_string());

    format!("{}.{extension}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_is_accepted_and_classified_as_image() {
        let kind = validate_upload("photo.png", "image/png", 1024).expect("valid upload");
        assert_eq!(kind, MediaKind::Image);
    }

    #[test]
    fn mp4_is_accepted_and_classified_as_video() {
        let kind = validate_upload("clip.mp4", "video/mp4", 1024).expect("valid upload");
        assert_eq!(kind, MediaKind::Video);
    }

    #[test]
    fn pdf_is_rejected() {
        let err = validate_upload("doc.pdf", "application/pdf", 1024).unwrap_err();
        assert!(
            matches!(err, MediaError::UnsupportedType { ref content_type } if content_type == "application/pdf")
        );
        assert!(err.to_string().contains("application/pdf"));
    }

    #[test]
    fn oversize_file_is_rejected_with_its_name() {
        let err = validate_upload("big.png", "image/png", MAX_UPLOAD_BYTES + 1).unwrap_err();
        assert!(matches!(err, MediaError::TooLarge { ref filename, .. } if filename == "big.png"));
        assert!(err.to_string().contains("big.png"));
    }

    #[test]
    fn exactly_at_the_ceiling_is_accepted() {
        assert!(validate_upload("edge.png", "image/png", MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn unique_filename_keeps_a_clean_extension() {
        let name = unique_filename("holiday photo.JPEG", "image/jpeg");
        assert!(name.ends_with(".jpeg"), "got {name}");
        assert_eq!(name.len(), 36 + ".jpeg".len());
    }

    #[test]
    fn unique_filename_ignores_path_traversal_names() {
        let name = unique_filename("../../etc/passwd", "image/png");
        assert!(!name.contains('/'), "got {name}");
        assert!(!name.contains(".."), "got {name}");
    }

    #[test]
    fn unique_filename_falls_back_to_content_subtype() {
        let name = unique_filename("noextension", "video/webm");
        assert!(name.ends_with(".webm"), "got {name}");
    }

    #[test]
    fn unique_filenames_do_not_collide() {
        let a = unique_filename("a.png", "image/png");
        let b = unique_filename("a.png", "image/png");
        assert_ne!(a, b);
    }

    #[test]
    fn media_kind_serializes_uppercase() {
        assert_eq!(
            serde_json::to_value(MediaKind::Image).expect("serialize"),
            serde_json::Value::String("IMAGE".to_string())
        );
    }
}
