//! Configuration module
//!
//! Typed settings for the video path. The CLI builds these from its arguments; tests
//! shrink the timings to keep polling scenarios fast.

use std::time::Duration;

use crate::constants::{
    DEFAULT_VIDEO_SERVICE_URL, SERVICE_TOKEN_TTL, VIDEO_STATUS_MAX_WAIT,
    VIDEO_STATUS_POLL_INTERVAL, VIDEO_UPLOAD_TIMEOUT,
};

/// Settings for uploading and polling a video job
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoSettings {
    /// Base URL of the video-processing service
    pub service_url: String,
    pub poll_interval: Duration,
    /// Deadline measured from the first job-status poll
    pub max_wait: Duration,
    /// Requested lifetime of the audience-scoped service token
    pub token_ttl: Duration,
    pub upload_timeout: Duration,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_VIDEO_SERVICE_URL.to_string(),
            poll_interval: VIDEO_STATUS_POLL_INTERVAL,
            max_wait: VIDEO_STATUS_MAX_WAIT,
            token_ttl: SERVICE_TOKEN_TTL,
            upload_timeout: VIDEO_UPLOAD_TIMEOUT,
        }
    }
}

impl VideoSettings {
    pub fn with_service_url(mut self, service_url: impl Into<String>) -> Self {
        self.service_url = service_url.into().trim_end_matches('/').to_string();
        self
    }
}
