//! Video-service job model.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::blob::Blob;

/// Server-side state of a transcoding job. Observed, never driven.
///
/// The service reports its native `JOB_STATE_*` names; the short names are accepted too.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    #[serde(alias = "JOB_STATE_CREATED")]
    Pending,
    #[serde(alias = "JOB_STATE_ENCODING", alias = "JOB_STATE_SCANNING")]
    Processing,
    #[serde(alias = "JOB_STATE_COMPLETED", alias = "completed")]
    Complete,
    #[serde(alias = "JOB_STATE_FAILED")]
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Display for JobState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            JobState::Pending => write!(f, "pending"),
            JobState::Processing => write!(f, "processing"),
            JobState::Complete => write!(f, "complete"),
            JobState::Failed => write!(f, "failed"),
            JobState::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(rename = "jobId", default)]
    pub job_id: String,
    #[serde(default)]
    pub state: JobState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<Blob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl JobStatus {
    /// The job failed when the state says so or an error is reported.
    pub fn is_failed(&self) -> bool {
        self.state == JobState::Failed || self.error.as_deref().is_some_and(|e| !e.is_empty())
    }

    /// Best human-readable reason for a failure.
    pub fn failure_reason(&self) -> String {
        [self.error.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(": ")
    }
}

/// Response of `app.bsky.video.uploadVideo`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadVideoResponse {
    #[serde(rename = "jobId", default)]
    pub job_id: String,
    #[serde(rename = "jobStatus", default, skip_serializing_if = "Option::is_none")]
    pub job_status: Option<JobStatus>,
}

impl UploadVideoResponse {
    /// Blob already resolved by the service (duplicate or cached content).
    pub fn resolved_blob(&self) -> Option<&Blob> {
        self.job_status.as_ref().and_then(|s| s.blob.as_ref())
    }
}
