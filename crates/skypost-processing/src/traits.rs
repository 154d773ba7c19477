//! Seams between the attachment pipeline and the network.

use async_trait::async_trait;
use skypost_api_client::ApiResult;
use skypost_core::models::{Blob, ExternalEmbed, JobStatus, UploadVideoResponse};
use std::time::{Duration, Instant};

/// Stores raw bytes in the user's repository and returns the blob reference.
#[async_trait]
pub trait BlobUploader: Send + Sync {
    async fn upload(&self, data: Vec<u8>, mime_type: &str) -> ApiResult<Blob>;
}

/// Mints short-lived tokens for calling another service on the user's behalf.
#[async_trait]
pub trait ServiceAuthority: Send + Sync {
    async fn service_token(&self, audience: &str, lxm: &str, expires_at: i64)
        -> ApiResult<String>;
}

/// Video upload and transcoding service.
#[async_trait]
pub trait VideoService: Send + Sync {
    /// Audience identifier the service token must be minted for.
    fn audience(&self) -> ApiResult<String>;

    async fn upload(
        &self,
        token: &str,
        did: &str,
        filename: &str,
        data: Vec<u8>,
        mime_type: &str,
    ) -> ApiResult<UploadVideoResponse>;

    async fn job_status(&self, token: &str, job_id: &str) -> ApiResult<JobStatus>;
}

/// Builds a link preview card. Any failure means no card.
#[async_trait]
pub trait LinkCardFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<ExternalEmbed>;
}

/// Time source for polling loops.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);

    /// Wall-clock seconds since the epoch, used for token expiry.
    fn unix_timestamp(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Real time, backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
