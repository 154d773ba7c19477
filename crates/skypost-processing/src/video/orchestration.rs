//! Video attachment orchestration: read → validate → service token → upload → poll job.

use skypost_core::constants::{DEFAULT_VIDEO_ALT, NSID_UPLOAD_BLOB};
use skypost_core::models::{Blob, MediaKind, VideoEmbed};
use skypost_core::VideoSettings;
use std::path::Path;
use std::sync::Arc;

use crate::error::AttachmentError;
use crate::traits::{Clock, ServiceAuthority, VideoService};
use crate::validator::MediaValidator;

/// Uploads one local video and waits until the service has a blob for it.
pub struct VideoAttachmentProcessor {
    authority: Arc<dyn ServiceAuthority>,
    service: Arc<dyn VideoService>,
    clock: Arc<dyn Clock>,
    settings: VideoSettings,
    validator: MediaValidator,
}

impl VideoAttachmentProcessor {
    pub fn new(
        authority: Arc<dyn ServiceAuthority>,
        service: Arc<dyn VideoService>,
        clock: Arc<dyn Clock>,
        settings: VideoSettings,
    ) -> Self {
        Self {
            authority,
            service,
            clock,
            settings,
            validator: MediaValidator::for_kind(MediaKind::Video),
        }
    }

    /// Run the full pipeline for the video at `path` owned by `did`.
    ///
    /// Blank alt text becomes "Video". Aspect ratio and captions are left empty.
    pub async fn process(
        &self,
        did: &str,
        path: &str,
        alt: &str,
    ) -> Result<VideoEmbed, AttachmentError> {
        tracing::info!(path = %path, "Processing video");

        let data = tokio::fs::read(path)
            .await
            .map_err(|source| AttachmentError::FileRead {
                kind: MediaKind::Video,
                path: path.to_string(),
                source,
            })?;

        let mime_type = self.validator.validate_all(path, data.len())?;
        let filename = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path);

        let audience = self
            .service
            .audience()
            .map_err(|e| AttachmentError::from_api(path, e))?;
        let expires_at = self.clock.unix_timestamp() + self.settings.token_ttl.as_secs() as i64;
        let token = self
            .authority
            .service_token(&audience, NSID_UPLOAD_BLOB, expires_at)
            .await
            .map_err(|e| AttachmentError::from_api(path, e))?;

        tracing::info!(
            path = %path,
            size = data.len(),
            mime_type = %mime_type,
            "Uploading video to service"
        );

        let upload = self
            .service
            .upload(&token, did, filename, data, mime_type)
            .await
            .map_err(|e| AttachmentError::from_api(path, e))?;

        let video = match upload.resolved_blob() {
            Some(blob) => {
                tracing::info!(path = %path, "Video already processed, using existing blob");
                blob.clone()
            }
            None => {
                let job_id = if upload.job_id.is_empty() {
                    upload
                        .job_status
                        .as_ref()
                        .map(|s| s.job_id.clone())
                        .unwrap_or_default()
                } else {
                    upload.job_id.clone()
                };
                self.poll_until_complete(path, &token, &job_id).await?
            }
        };

        let alt = match alt.trim() {
            "" => DEFAULT_VIDEO_ALT.to_string(),
            trimmed => trimmed.to_string(),
        };

        Ok(VideoEmbed {
            video,
            aspect_ratio: None,
            alt,
            captions: Vec::new(),
        })
    }

    /// Poll the job until it yields a blob, fails, or exceeds the configured wait.
    ///
    /// The deadline is checked before each poll, so a job is always polled at least once.
    async fn poll_until_complete(
        &self,
        path: &str,
        token: &str,
        job_id: &str,
    ) -> Result<Blob, AttachmentError> {
        let started = self.clock.now();

        loop {
            let waited = self.clock.now().saturating_duration_since(started);
            if waited > self.settings.max_wait {
                return Err(AttachmentError::ProcessingTimedOut {
                    path: path.to_string(),
                    job_id: job_id.to_string(),
                    waited,
                });
            }

            let mut status = self
                .service
                .job_status(token, job_id)
                .await
                .map_err(|e| AttachmentError::from_api(path, e))?;

            tracing::debug!(
                job_id = %job_id,
                state = %status.state,
                progress = ?status.progress,
                "Video processing status"
            );

            if let Some(blob) = status.blob.take() {
                tracing::info!(job_id = %job_id, "Video processing complete");
                return Ok(blob);
            }

            if status.is_failed() {
                return Err(AttachmentError::ProcessingFailed {
                    path: path.to_string(),
                    job_id: job_id.to_string(),
                    reason: status.failure_reason(),
                });
            }

            self.clock.sleep(self.settings.poll_interval).await;
        }
    }
}
