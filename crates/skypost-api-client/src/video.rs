//! Video-processing service client: upload and job status.
//!
//! Every call authenticates with the audience-scoped service token minted by the personal
//! data server, never with the session token.

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use skypost_core::constants::{NSID_GET_JOB_STATUS, NSID_UPLOAD_VIDEO};
use skypost_core::models::{JobStatus, UploadVideoResponse};
use std::time::Duration;

use crate::{decode, http_client, read_body, ApiClient, ApiError, ApiResult};

/// Error code the service returns when the same video was already processed.
const ALREADY_EXISTS: &str = "already_exists";

#[derive(Debug, Deserialize)]
struct JobStatusResponse {
    #[serde(rename = "jobStatus")]
    job_status: JobStatus,
}

#[derive(Debug, Deserialize)]
struct JobStatusErrorResponse {
    #[serde(default)]
    error: String,
    #[serde(rename = "jobStatus", default)]
    job_status: Option<JobStatus>,
}

/// `did:web` audience of the service at `base_url`.
pub fn service_audience(base_url: &str) -> ApiResult<String> {
    let url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    let host = url.host_str().ok_or_else(|| ApiError::InvalidUrl {
        url: base_url.to_string(),
        reason: "missing host".to_string(),
    })?;

    Ok(match url.port() {
        Some(port) => format!("did:web:{}%3A{}", host, port),
        None => format!("did:web:{}", host),
    })
}

#[derive(Clone, Debug)]
pub struct VideoServiceClient {
    api: ApiClient,
    upload_timeout: Duration,
}

impl VideoServiceClient {
    pub fn new(base_url: &str, upload_timeout: Duration) -> ApiResult<Self> {
        Ok(Self::with_client(http_client()?, base_url, upload_timeout))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, upload_timeout: Duration) -> Self {
        Self {
            api: ApiClient::with_client(client, base_url),
            upload_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    pub fn audience(&self) -> ApiResult<String> {
        service_audience(self.api.base_url())
    }

    /// Upload the video bytes. 200 and 201 are accepted, anything else is rejected.
    pub async fn upload_video(
        &self,
        service_token: &str,
        did: &str,
        filename: &str,
        data: Vec<u8>,
        mime_type: &str,
    ) -> ApiResult<UploadVideoResponse> {
        let api = self.api.with_bearer(service_token);
        let request = api
            .client()
            .post(api.xrpc_url(NSID_UPLOAD_VIDEO))
            .query(&[("did", did), ("name", filename)])
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .timeout(self.upload_timeout)
            .body(data);

        let response = api.send(NSID_UPLOAD_VIDEO, request).await?;
        let (status, body) = read_body(NSID_UPLOAD_VIDEO, response).await?;

        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(ApiError::Rejected {
                operation: NSID_UPLOAD_VIDEO,
                status,
                body,
            });
        }

        decode(NSID_UPLOAD_VIDEO, &body)
    }

    /// Fetch the current status of a job.
    ///
    /// A non-200 answer carrying `already_exists` and a resolved blob is a finished job,
    /// not an error.
    pub async fn get_job_status(&self, service_token: &str, job_id: &str) -> ApiResult<JobStatus> {
        let api = self.api.with_bearer(service_token);
        let request = api
            .client()
            .get(api.xrpc_url(NSID_GET_JOB_STATUS))
            .query(&[("jobId", job_id)]);

        let response = api.send(NSID_GET_JOB_STATUS, request).await?;
        let (status, body) = read_body(NSID_GET_JOB_STATUS, response).await?;

        if status != StatusCode::OK {
            if let Ok(payload) = serde_json::from_str::<JobStatusErrorResponse>(&body) {
                if payload.error == ALREADY_EXISTS {
                    if let Some(job_status) = payload.job_status.filter(|s| s.blob.is_some()) {
                        tracing::debug!(job_id = %job_id, "Video already processed");
                        return Ok(job_status);
                    }
                }
            }
            return Err(ApiError::Rejected {
                operation: NSID_GET_JOB_STATUS,
                status,
                body,
            });
        }

        let response: JobStatusResponse = decode(NSID_GET_JOB_STATUS, &body)?;
        Ok(response.job_status)
    }
}
