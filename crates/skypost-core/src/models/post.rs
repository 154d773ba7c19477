//! Post record and rich-text facets.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::embed::Embed;
use crate::constants::{FACET_LINK_TYPE, NSID_FEED_POST};

/// Byte range of a facet over the UTF-8 post text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetIndex {
    #[serde(rename = "byteStart")]
    pub byte_start: usize,
    #[serde(rename = "byteEnd")]
    pub byte_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetFeature {
    #[serde(rename = "$type")]
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub index: FacetIndex,
    pub features: Vec<FacetFeature>,
}

impl Facet {
    pub fn link(byte_start: usize, byte_end: usize, uri: impl Into<String>) -> Self {
        Self {
            index: FacetIndex {
                byte_start,
                byte_end,
            },
            features: vec![FacetFeature {
                r#type: FACET_LINK_TYPE.to_string(),
                uri: Some(uri.into()),
            }],
        }
    }

    /// First link URI carried by this facet, if any.
    pub fn link_uri(&self) -> Option<&str> {
        self.features
            .iter()
            .find(|f| f.r#type == FACET_LINK_TYPE)
            .and_then(|f| f.uri.as_deref())
    }
}

/// `app.bsky.feed.post` record
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    #[serde(rename = "$type")]
    pub r#type: String,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub langs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
}

impl Post {
    pub fn new(text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            r#type: NSID_FEED_POST.to_string(),
            text: text.into(),
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            langs: Vec::new(),
            facets: Vec::new(),
            embed: None,
        }
    }

    pub fn with_langs(mut self, langs: Vec<String>) -> Self {
        self.langs = langs;
        self
    }

    pub fn with_facets(mut self, facets: Vec<Facet>) -> Self {
        self.facets = facets;
        self
    }

    pub fn with_embed(mut self, embed: Option<Embed>) -> Self {
        self.embed = embed;
        self
    }
}
