//! Link preview cards built from a page's HTML metadata.

use async_trait::async_trait;
use regex::Regex;
use skypost_core::constants::LINK_CARD_FETCH_TIMEOUT;
use skypost_core::models::{ExternalContent, ExternalEmbed};
use std::sync::LazyLock;
use std::time::Duration;

use crate::traits::LinkCardFetcher;

const MAX_TITLE_CHARS: usize = 100;
const MAX_DESCRIPTION_CHARS: usize = 200;

static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title[^>]*>([^<]*)</title>").expect("valid pattern"));
static OG_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*property="og:title"[^>]*content="([^"]*)""#)
        .expect("valid pattern")
});
static OG_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*property="og:description"[^>]*content="([^"]*)""#)
        .expect("valid pattern")
});
static META_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*name="description"[^>]*content="([^"]*)""#)
        .expect("valid pattern")
});

/// Fetches a page with a single GET and scrapes title and description.
#[derive(Debug, Clone)]
pub struct HttpLinkCardFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpLinkCardFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: LINK_CARD_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch_html(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Failed to fetch URL for link card");
                return None;
            }
        };

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_lowercase();
        if !content_type.contains("text/html") {
            tracing::debug!(url = %url, content_type = %content_type, "Skipping non-HTML URL");
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Failed to read link card body");
                None
            }
        }
    }
}

#[async_trait]
impl LinkCardFetcher for HttpLinkCardFetcher {
    async fn fetch(&self, url: &str) -> Option<ExternalEmbed> {
        let html = self.fetch_html(url).await?;
        let card = card_from_html(url, &html);
        if card.is_none() {
            tracing::debug!(url = %url, "No title found for link card");
        }
        card
    }
}

/// Build a card from page HTML. A page without a title yields no card.
pub fn card_from_html(url: &str, html: &str) -> Option<ExternalEmbed> {
    let title = extract_meta_content(html, &TITLE_TAG)
        .or_else(|| extract_meta_content(html, &OG_TITLE))?;
    let description = extract_meta_content(html, &OG_DESCRIPTION)
        .or_else(|| extract_meta_content(html, &META_DESCRIPTION))
        .unwrap_or_default();

    Some(ExternalEmbed {
        external: ExternalContent {
            uri: url.to_string(),
            title: truncate(&title, MAX_TITLE_CHARS),
            description: truncate(&description, MAX_DESCRIPTION_CHARS),
        },
    })
}

/// First capture of `pattern`, trimmed. Blank captures count as absent.
fn extract_meta_content(html: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Limit to `max` characters, ending with "..." when shortened.
fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max - 3).collect();
    out.push_str("...");
    out
}
