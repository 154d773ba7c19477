//! Skypost CLI: authenticate, compose one post and publish it.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, ValueEnum};
use skypost_api_client::{http_client, ApiClient, CreateRecordResponse, VideoServiceClient};
use skypost_core::constants::{DEFAULT_PDS_URL, DEFAULT_VIDEO_SERVICE_URL, NSID_FEED_POST};
use skypost_core::{Post, VideoSettings};
use skypost_processing::{
    parse_facets, AttachmentOrchestrator, AttachmentRequest, HttpLinkCardFetcher,
    ImageAttachmentProcessor, TokioClock, VideoAttachmentProcessor,
};
use std::sync::Arc;

#[derive(Parser, Clone)]
#[command(name = "skypost", version, about = "Publish a post to a PDS")]
pub struct Cli {
    /// Base URL of the personal data server
    #[arg(long, env = "ATP_PDS_HOST", default_value = DEFAULT_PDS_URL)]
    pub pds_url: String,

    /// Account handle or DID
    #[arg(long, env = "ATP_AUTH_HANDLE")]
    pub handle: String,

    /// Account password or app password
    #[arg(long, env = "ATP_AUTH_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Post text
    #[arg(long, env = "BSKY_MESSAGE")]
    pub text: String,

    /// Post languages, comma-separated
    #[arg(long = "lang", env = "BSKY_LANG", value_delimiter = ',')]
    pub langs: Vec<String>,

    /// debug, info, warn or error
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// Attach a link card for the first URL when no media is given
    #[arg(
        long,
        env = "BSKY_ENABLE_EMBEDS",
        action = ArgAction::Set,
        default_value_t = true
    )]
    pub enable_embeds: bool,

    /// Image files to attach, comma-separated (at most 4)
    #[arg(long, env = "BSKY_IMAGE_PATHS", default_value = "")]
    pub image_paths: String,

    /// Alt texts for the images, comma-separated, by position
    #[arg(long, env = "BSKY_IMAGE_ALTS", default_value = "")]
    pub image_alts: String,

    /// Video file to attach; takes priority over images
    #[arg(long, env = "BSKY_VIDEO_PATH", default_value = "")]
    pub video_path: String,

    #[arg(long, env = "BSKY_VIDEO_ALT", default_value = "")]
    pub video_alt: String,

    /// Base URL of the video-processing service
    #[arg(long, env = "BSKY_VIDEO_SERVICE_URL", default_value = DEFAULT_VIDEO_SERVICE_URL)]
    pub video_service_url: String,
}

impl Cli {
    /// Languages with blanks removed.
    pub fn langs(&self) -> Vec<String> {
        self.langs
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn attachment_request(&self) -> AttachmentRequest {
        AttachmentRequest {
            image_paths: self.image_paths.clone(),
            image_alts: self.image_alts.clone(),
            video_path: self.video_path.clone(),
            video_alt: self.video_alt.clone(),
            link_cards: self.enable_embeds,
        }
    }

    pub fn video_settings(&self) -> VideoSettings {
        VideoSettings::default().with_service_url(&self.video_service_url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Filter directive for a `--log-level` value. Unknown levels fall back to info.
pub fn level_directive(level: &str) -> &'static str {
    match level.trim().to_lowercase().as_str() {
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

/// Initialize tracing. `RUST_LOG` wins over `level` when set.
pub fn init_tracing(level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level_directive(level)));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stdout)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stdout)
            .init(),
    }
}

/// Process-wide context, built once in `main`.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub version: &'static str,
    pub revision: &'static str,
    pub started_at: DateTime<Utc>,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            revision: option_env!("SKYPOST_GIT_REVISION").unwrap_or("unknown"),
            started_at: Utc::now(),
        }
    }

    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Authenticate, resolve the embed and publish the post.
pub async fn run(cli: &Cli) -> anyhow::Result<CreateRecordResponse> {
    let pds = ApiClient::new(&cli.pds_url).context("Failed to build PDS client")?;
    let session = pds
        .create_session(&cli.handle, &cli.password)
        .await
        .context("Failed to create session")?;
    tracing::info!(did = %session.did, "Session created");

    let pds = Arc::new(pds.with_bearer(&session.access_jwt));
    let settings = cli.video_settings();
    let video_service = VideoServiceClient::new(&settings.service_url, settings.upload_timeout)
        .context("Failed to build video service client")?;
    let link_cards = HttpLinkCardFetcher::new(http_client().context("Failed to build HTTP client")?);

    let orchestrator = AttachmentOrchestrator::new(
        ImageAttachmentProcessor::new(pds.clone()),
        VideoAttachmentProcessor::new(
            pds.clone(),
            Arc::new(video_service),
            Arc::new(TokioClock),
            settings,
        ),
        Arc::new(link_cards),
    );

    let facets = parse_facets(&cli.text);
    tracing::debug!(count = facets.len(), "Parsed link facets");

    let embed = orchestrator
        .resolve_embed(&session.did, &cli.attachment_request(), &facets)
        .await
        .context("Failed to prepare attachments")?;
    if let Some(embed) = &embed {
        tracing::info!(embed_type = embed.type_name(), "Embed attached");
    }

    let post = Post::new(cli.text.as_str(), Utc::now())
        .with_langs(cli.langs())
        .with_facets(facets)
        .with_embed(embed);

    let created = pds
        .create_record(&session.did, NSID_FEED_POST, &post)
        .await
        .context("Failed to create post")?;
    tracing::info!(uri = %created.uri, cid = %created.cid, "Post published");

    Ok(created)
}
