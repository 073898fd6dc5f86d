//! Captured-image encoding for avatar uploads.
//!
//! The host (camera or picker) hands over an already-compressed image; the
//! encoder wraps it as a multipart part and rejects anything it cannot label.

use crate::api::ImageUpload;

pub const AVATAR_FIELD_NAME: &str = "avatar";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageEncodeError {
    #[error("image is empty")]
    Empty,
    #[error("unsupported image format")]
    UnsupportedFormat,
}

/// Turns captured image bytes into an upload part.
pub trait ImageEncoder: Send + Sync {
    fn encode(&self, image: &[u8], field_name: &str) -> Result<ImageUpload, ImageEncodeError>;
}

/// Labels JPEG and PNG payloads by their magic bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SniffingImageEncoder;

impl ImageEncoder for SniffingImageEncoder {
    fn encode(&self, image: &[u8], field_name: &str) -> Result<ImageUpload, ImageEncodeError> {
        if image.is_empty() {
            return Err(ImageEncodeError::Empty);
        }
        let (content_type, file_name) = if image.starts_with(&[0xFF, 0xD8, 0xFF]) {
            ("image/jpeg", "profile.jpg")
        } else if image.starts_with(b"\x89PNG\r\n\x1a\n") {
            ("image/png", "profile.png")
        } else {
            return Err(ImageEncodeError::UnsupportedFormat);
        };
        Ok(ImageUpload {
            field_name: field_name.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes: image.to_vec(),
        })
    }
}
