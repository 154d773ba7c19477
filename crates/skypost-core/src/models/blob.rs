//! Content-addressed blob references returned by upload endpoints.

use serde::{Deserialize, Serialize};

fn blob_type() -> String {
    "blob".to_string()
}

/// Content identifier of an uploaded blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobLink {
    #[serde(rename = "$link")]
    pub link: String,
}

/// Opaque reference to uploaded bytes. Embedded verbatim into the post record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    #[serde(rename = "$type", default = "blob_type")]
    pub r#type: String,
    #[serde(rename = "ref")]
    pub reference: BlobLink,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub size: u64,
}

impl Blob {
    pub fn new(link: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            r#type: blob_type(),
            reference: BlobLink { link: link.into() },
            mime_type: mime_type.into(),
            size,
        }
    }

    pub fn link(&self) -> &str {
        &self.reference.link
    }
}

/// Pixel dimensions of an image or video. Absent means unknown, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Returns `None` when either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }
}
