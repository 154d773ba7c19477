use skypost_core::constants::{MAX_IMAGE_SIZE, MAX_VIDEO_SIZE};
use skypost_core::models::MediaKind;
use std::path::Path;

use crate::error::AttachmentError;

/// Media file validator
///
/// Decides from the file name and byte length alone whether a local file may be attached.
/// The MIME type comes from the extension; file contents are never sniffed.
#[derive(Debug, Clone, Copy)]
pub struct MediaValidator {
    kind: MediaKind,
    max_file_size: usize,
}

impl MediaValidator {
    pub fn new(kind: MediaKind, max_file_size: usize) -> Self {
        Self {
            kind,
            max_file_size,
        }
    }

    /// Validator with the post limits for `kind`.
    pub fn for_kind(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => Self::new(kind, MAX_IMAGE_SIZE),
            MediaKind::Video => Self::new(kind, MAX_VIDEO_SIZE),
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// MIME type for the file extension (case-insensitive), or `None` if unsupported.
    pub fn detect_mime_type(&self, filename: &str) -> Option<&'static str> {
        detect_mime_type(self.kind, filename)
    }

    /// Validate file size. The limit is inclusive.
    pub fn validate_file_size(&self, path: &str, size: usize) -> Result<(), AttachmentError> {
        if size > self.max_file_size {
            return Err(AttachmentError::SizeExceeded {
                kind: self.kind,
                path: path.to_string(),
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Validate size, then format. Returns the detected MIME type.
    ///
    /// Size is checked first: a file that is both oversized and of an unknown type reports
    /// `SizeExceeded`.
    pub fn validate_all(&self, path: &str, size: usize) -> Result<&'static str, AttachmentError> {
        self.validate_file_size(path, size)?;

        self.detect_mime_type(path)
            .ok_or_else(|| AttachmentError::UnsupportedFormat {
                kind: self.kind,
                path: path.to_string(),
                supported: supported_formats(self.kind),
            })
    }
}

/// Detect the MIME type of `filename` for the given media kind.
pub fn detect_mime_type(kind: MediaKind, filename: &str) -> Option<&'static str> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())?;

    match (kind, extension.as_str()) {
        (MediaKind::Image, "jpg" | "jpeg") => Some("image/jpeg"),
        (MediaKind::Image, "png") => Some("image/png"),
        (MediaKind::Image, "gif") => Some("image/gif"),
        (MediaKind::Image, "webp") => Some("image/webp"),
        (MediaKind::Video, "mp4") => Some("video/mp4"),
        (MediaKind::Video, "mov") => Some("video/quicktime"),
        (MediaKind::Video, "webm") => Some("video/webm"),
        _ => None,
    }
}

/// Validate a file of `kind` with the post limits. Returns the detected MIME type.
pub fn validate(kind: MediaKind, path: &str, size: usize) -> Result<&'static str, AttachmentError> {
    MediaValidator::for_kind(kind).validate_all(path, size)
}

fn supported_formats(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "JPEG, PNG, GIF, WebP",
        MediaKind::Video => "MP4, MOV, WebM",
    }
}
