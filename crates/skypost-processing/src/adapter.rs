//! Trait implementations for the HTTP clients.

use async_trait::async_trait;
use skypost_api_client::{ApiClient, ApiResult, VideoServiceClient};
use skypost_core::models::{Blob, JobStatus, UploadVideoResponse};

use crate::traits::{BlobUploader, ServiceAuthority, VideoService};

#[async_trait]
impl BlobUploader for ApiClient {
    async fn upload(&self, data: Vec<u8>, mime_type: &str) -> ApiResult<Blob> {
        self.upload_blob(data, mime_type).await
    }
}

#[async_trait]
impl ServiceAuthority for ApiClient {
    async fn service_token(
        &self,
        audience: &str,
        lxm: &str,
        expires_at: i64,
    ) -> ApiResult<String> {
        self.get_service_auth(audience, lxm, expires_at).await
    }
}

#[async_trait]
impl VideoService for VideoServiceClient {
    fn audience(&self) -> ApiResult<String> {
        VideoServiceClient::audience(self)
    }

    async fn upload(
        &self,
        token: &str,
        did: &str,
        filename: &str,
        data: Vec<u8>,
        mime_type: &str,
    ) -> ApiResult<UploadVideoResponse> {
        self.upload_video(token, did, filename, data, mime_type).await
    }

    async fn job_status(&self, token: &str, job_id: &str) -> ApiResult<JobStatus> {
        self.get_job_status(token, job_id).await
    }
}
