//! Attachment pipeline errors.
//!
//! Every failure is terminal for the current post; nothing here is retried. Variants name
//! the offending file so an operator can tell a bad local file from a rejected upload or a
//! timed-out video job.

use skypost_api_client::ApiError;
use skypost_core::models::MediaKind;
use std::io;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("Failed to read {kind} file {path}: {source}")]
    FileRead {
        kind: MediaKind,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{kind} {path} exceeds maximum size of {max} bytes (got {size} bytes)")]
    SizeExceeded {
        kind: MediaKind,
        path: String,
        size: usize,
        max: usize,
    },

    #[error("Unsupported {kind} format for file {path} (supported: {supported})")]
    UnsupportedFormat {
        kind: MediaKind,
        path: String,
        supported: &'static str,
    },

    #[error("Maximum {max} images allowed per post, got {count}")]
    TooManyAttachments { count: usize, max: usize },

    #[error("{operation} rejected {path} with status {status}: {body}")]
    UploadRejected {
        path: String,
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Request for {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: ApiError,
    },

    #[error("Video processing failed for {path} (job {job_id}): {reason}")]
    ProcessingFailed {
        path: String,
        job_id: String,
        reason: String,
    },

    #[error("Video processing timed out for {path} (job {job_id}) after {}s", waited.as_secs())]
    ProcessingTimedOut {
        path: String,
        job_id: String,
        waited: Duration,
    },
}

impl AttachmentError {
    /// Split client failures into server rejections and everything else.
    pub(crate) fn from_api(path: &str, err: ApiError) -> Self {
        match err {
            ApiError::Rejected {
                operation,
                status,
                body,
            } => AttachmentError::UploadRejected {
                path: path.to_string(),
                operation,
                status: status.as_u16(),
                body,
            },
            source => AttachmentError::Transport {
                path: path.to_string(),
                source,
            },
        }
    }

    /// File the failure is about, when there is one.
    pub fn path(&self) -> Option<&str> {
        match self {
            AttachmentError::FileRead { path, .. }
            | AttachmentError::SizeExceeded { path, .. }
            | AttachmentError::UnsupportedFormat { path, .. }
            | AttachmentError::UploadRejected { path, .. }
            | AttachmentError::Transport { path, .. }
            | AttachmentError::ProcessingFailed { path, .. }
            | AttachmentError::ProcessingTimedOut { path, .. } => Some(path),
            AttachmentError::TooManyAttachments { .. } => None,
        }
    }
}
