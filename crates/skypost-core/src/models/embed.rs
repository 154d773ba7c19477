//! Post embeds.
//!
//! A post carries at most one embed. `Embed` is a sum type over the three embed shapes;
//! it serializes as the chosen shape's own fields plus its `$type` discriminator, which
//! is exactly the record format the server expects.

use serde::{Deserialize, Serialize};

use super::blob::{AspectRatio, Blob};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Embed {
    #[serde(rename = "app.bsky.embed.external")]
    External(ExternalEmbed),
    #[serde(rename = "app.bsky.embed.images")]
    Images(ImagesEmbed),
    #[serde(rename = "app.bsky.embed.video")]
    Video(VideoEmbed),
}

impl Embed {
    /// Lexicon type of the embed, as written to `$type`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Embed::External(_) => "app.bsky.embed.external",
            Embed::Images(_) => "app.bsky.embed.images",
            Embed::Video(_) => "app.bsky.embed.video",
        }
    }
}

/// Link card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalEmbed {
    pub external: ExternalContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalContent {
    pub uri: String,
    pub title: String,
    pub description: String,
}

/// One to four images, in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesEmbed {
    pub images: Vec<ImageEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub alt: String,
    pub image: Blob,
    #[serde(rename = "aspectRatio", skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoEmbed {
    pub video: Blob,
    #[serde(rename = "aspectRatio", skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub captions: Vec<Caption>,
}

/// Subtitle track attached to a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub lang: String,
    pub file: Blob,
}
