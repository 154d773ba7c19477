//! Application-wide constants.

use std::time::Duration;

/// Default personal data server used when none is configured.
pub const DEFAULT_PDS_URL: &str = "https://bsky.social";

/// Default video-processing service.
pub const DEFAULT_VIDEO_SERVICE_URL: &str = "https://video.bsky.app";

/// A post carries at most this many images.
pub const MAX_IMAGES_PER_POST: usize = 4;

/// Largest accepted image, inclusive.
pub const MAX_IMAGE_SIZE: usize = 1_000_000;

/// Largest accepted video, inclusive (50 MiB).
pub const MAX_VIDEO_SIZE: usize = 50 * 1024 * 1024;

/// Delay between two job-status polls.
pub const VIDEO_STATUS_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Polling deadline, measured from the first poll.
pub const VIDEO_STATUS_MAX_WAIT: Duration = Duration::from_secs(5 * 60);

/// Lifetime requested for the video service token.
pub const SERVICE_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Request timeout of the video upload call itself.
pub const VIDEO_UPLOAD_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Timeout for the link-card page fetch.
pub const LINK_CARD_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Alt text used for a video when none is given.
pub const DEFAULT_VIDEO_ALT: &str = "Video";

// Lexicon identifiers
pub const NSID_FEED_POST: &str = "app.bsky.feed.post";
pub const NSID_UPLOAD_BLOB: &str = "com.atproto.repo.uploadBlob";
pub const NSID_CREATE_RECORD: &str = "com.atproto.repo.createRecord";
pub const NSID_CREATE_SESSION: &str = "com.atproto.server.createSession";
pub const NSID_GET_SERVICE_AUTH: &str = "com.atproto.server.getServiceAuth";
pub const NSID_UPLOAD_VIDEO: &str = "app.bsky.video.uploadVideo";
pub const NSID_GET_JOB_STATUS: &str = "app.bsky.video.getJobStatus";
pub const FACET_LINK_TYPE: &str = "app.bsky.richtext.facet#link";
