//! Embed selection for a post.
//!
//! At most one attachment family is attached: a video wins over images, images win over a
//! link card. A processor failure aborts the post; there is no fallback to a lower tier.

use skypost_core::models::{Embed, Facet};
use std::sync::Arc;

use crate::error::AttachmentError;
use crate::image::{parse_paths, split_alt_texts, ImageAttachmentProcessor};
use crate::richtext::first_link;
use crate::traits::LinkCardFetcher;
use crate::video::VideoAttachmentProcessor;

/// Attachment inputs as supplied by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentRequest {
    /// Comma-separated image paths.
    pub image_paths: String,
    /// Comma-separated alt texts, matched to images by position.
    pub image_alts: String,
    pub video_path: String,
    pub video_alt: String,
    pub link_cards: bool,
}

pub struct AttachmentOrchestrator {
    images: ImageAttachmentProcessor,
    video: VideoAttachmentProcessor,
    link_cards: Arc<dyn LinkCardFetcher>,
}

impl AttachmentOrchestrator {
    pub fn new(
        images: ImageAttachmentProcessor,
        video: VideoAttachmentProcessor,
        link_cards: Arc<dyn LinkCardFetcher>,
    ) -> Self {
        Self {
            images,
            video,
            link_cards,
        }
    }

    /// Pick and build the embed for a post by `did`.
    ///
    /// `facets` are the links found in the post text; only the first one is considered for
    /// a link card. A link card that cannot be built is not an error.
    pub async fn resolve_embed(
        &self,
        did: &str,
        request: &AttachmentRequest,
        facets: &[Facet],
    ) -> Result<Option<Embed>, AttachmentError> {
        let video_path = request.video_path.trim();
        if !video_path.is_empty() {
            if !request.image_paths.trim().is_empty() {
                tracing::info!("Video supplied, ignoring image paths");
            }
            let embed = self
                .video
                .process(did, video_path, &request.video_alt)
                .await?;
            return Ok(Some(Embed::Video(embed)));
        }

        let image_paths = parse_paths(&request.image_paths);
        if !image_paths.is_empty() {
            let alts = split_alt_texts(&request.image_alts);
            let embed = self.images.process(&image_paths, &alts).await?;
            return Ok(embed.map(Embed::Images));
        }

        if request.link_cards {
            if let Some(url) = first_link(facets) {
                tracing::debug!(url = %url, "Fetching link card");
                return Ok(self.link_cards.fetch(url).await.map(Embed::External));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{BlobUploader, Clock, ServiceAuthority, TokioClock, VideoService};
    use async_trait::async_trait;
    use skypost_api_client::ApiResult;
    use skypost_core::models::{
        Blob, ExternalContent, ExternalEmbed, JobStatus, UploadVideoResponse,
    };
    use skypost_core::VideoSettings;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct Counting {
        blob_uploads: AtomicUsize,
        video_uploads: AtomicUsize,
        card_fetches: AtomicUsize,
    }

    struct Uploader(Arc<Counting>);
    struct Authority;
    struct Video(Arc<Counting>);
    struct Cards(Arc<Counting>);

    #[async_trait]
    impl BlobUploader for Uploader {
        async fn upload(&self, data: Vec<u8>, mime_type: &str) -> ApiResult<Blob> {
            self.0.blob_uploads.fetch_add(1, Ordering::SeqCst);
            Ok(Blob::new("bafkimage", mime_type, data.len() as u64))
        }
    }

    #[async_trait]
    impl ServiceAuthority for Authority {
        async fn service_token(&self, _: &str, _: &str, _: i64) -> ApiResult<String> {
            Ok("token".to_string())
        }
    }

    #[async_trait]
    impl VideoService for Video {
        fn audience(&self) -> ApiResult<String> {
            Ok("did:web:video.example".to_string())
        }

        async fn upload(
            &self,
            _: &str,
            _: &str,
            _: &str,
            data: Vec<u8>,
            mime_type: &str,
        ) -> ApiResult<UploadVideoResponse> {
            self.0.video_uploads.fetch_add(1, Ordering::SeqCst);
            Ok(UploadVideoResponse {
                job_id: "job".to_string(),
                job_status: Some(JobStatus {
                    blob: Some(Blob::new("bafkvideo", mime_type, data.len() as u64)),
                    ..Default::default()
                }),
            })
        }

        async fn job_status(&self, _: &str, _: &str) -> ApiResult<JobStatus> {
            unreachable!("upload returns a resolved blob")
        }
    }

    #[async_trait]
    impl LinkCardFetcher for Cards {
        async fn fetch(&self, url: &str) -> Option<ExternalEmbed> {
            self.0.card_fetches.fetch_add(1, Ordering::SeqCst);
            Some(ExternalEmbed {
                external: ExternalContent {
                    uri: url.to_string(),
                    title: "Card".to_string(),
                    description: String::new(),
                },
            })
        }
    }

    fn orchestrator(counts: &Arc<Counting>) -> AttachmentOrchestrator {
        let clock: Arc<dyn Clock> = Arc::new(TokioClock);
        AttachmentOrchestrator::new(
            ImageAttachmentProcessor::new(Arc::new(Uploader(counts.clone()))),
            VideoAttachmentProcessor::new(
                Arc::new(Authority),
                Arc::new(Video(counts.clone())),
                clock,
                VideoSettings::default(),
            ),
            Arc::new(Cards(counts.clone())),
        )
    }

    fn files() -> (TempDir, String, String) {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("a.png");
        let video = dir.path().join("v.mp4");
        std::fs::write(&image, b"png").unwrap();
        std::fs::write(&video, b"mp4").unwrap();
        (
            dir,
            image.to_string_lossy().into_owned(),
            video.to_string_lossy().into_owned(),
        )
    }

    fn facets() -> Vec<Facet> {
        vec![
            Facet::link(0, 20, "https://first.example"),
            Facet::link(21, 42, "https://second.example"),
        ]
    }

    #[tokio::test]
    async fn test_video_beats_images_and_link_card() {
        let counts = Arc::new(Counting::default());
        let (_dir, image, video) = files();
        let request = AttachmentRequest {
            image_paths: image,
            video_path: format!(" {} ", video),
            video_alt: "clip".to_string(),
            link_cards: true,
            ..Default::default()
        };

        let embed = orchestrator(&counts)
            .resolve_embed("did:plc:abc", &request, &facets())
            .await
            .unwrap();

        match embed {
            Some(Embed::Video(v)) => assert_eq!(v.alt, "clip"),
            other => panic!("unexpected embed: {:?}", other),
        }
        assert_eq!(counts.video_uploads.load(Ordering::SeqCst), 1);
        assert_eq!(counts.blob_uploads.load(Ordering::SeqCst), 0);
        assert_eq!(counts.card_fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_images_skip_link_card() {
        let counts = Arc::new(Counting::default());
        let (_dir, image, _) = files();
        let request = AttachmentRequest {
            image_paths: format!("{}, ", image),
            image_alts: "A chart".to_string(),
            video_path: "   ".to_string(),
            link_cards: true,
            ..Default::default()
        };

        let embed = orchestrator(&counts)
            .resolve_embed("did:plc:abc", &request, &facets())
            .await
            .unwrap();

        match embed {
            Some(Embed::Images(images)) => {
                assert_eq!(images.images.len(), 1);
                assert_eq!(images.images[0].alt, "A chart");
            }
            other => panic!("unexpected embed: {:?}", other),
        }
        assert_eq!(counts.card_fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_link_card_for_first_url_only() {
        let counts = Arc::new(Counting::default());
        let request = AttachmentRequest {
            link_cards: true,
            ..Default::default()
        };

        let embed = orchestrator(&counts)
            .resolve_embed("did:plc:abc", &request, &facets())
            .await
            .unwrap();

        match embed {
            Some(Embed::External(card)) => assert_eq!(card.external.uri, "https://first.example"),
            other => panic!("unexpected embed: {:?}", other),
        }
        assert_eq!(counts.card_fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_embed() {
        let counts = Arc::new(Counting::default());
        let orchestrator = orchestrator(&counts);

        let disabled = AttachmentRequest::default();
        assert!(orchestrator
            .resolve_embed("did:plc:abc", &disabled, &facets())
            .await
            .unwrap()
            .is_none());

        let enabled = AttachmentRequest {
            link_cards: true,
            ..Default::default()
        };
        assert!(orchestrator
            .resolve_embed("did:plc:abc", &enabled, &[])
            .await
            .unwrap()
            .is_none());
        assert_eq!(counts.card_fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_image_failure_aborts_without_fallback() {
        let counts = Arc::new(Counting::default());
        let request = AttachmentRequest {
            image_paths: "/nonexistent/a.png".to_string(),
            link_cards: true,
            ..Default::default()
        };

        let err = orchestrator(&counts)
            .resolve_embed("did:plc:abc", &request, &facets())
            .await
            .unwrap_err();

        assert!(matches!(err, AttachmentError::FileRead { .. }));
        assert_eq!(counts.card_fetches.load(Ordering::SeqCst), 0);
    }
}
