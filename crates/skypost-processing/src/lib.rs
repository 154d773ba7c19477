//! Skypost attachment pipeline
//!
//! Turns local media paths and post text into the single embed a post carries: validated
//! and uploaded images, a transcoded video, or a link preview card.

pub mod adapter;
pub mod error;
pub mod image;
pub mod link_card;
pub mod orchestrator;
pub mod richtext;
pub mod traits;
pub mod validator;
pub mod video;

// Re-export commonly used types
pub use error::AttachmentError;
pub use image::{ImageAttachmentProcessor, ImageProcessor};
pub use link_card::HttpLinkCardFetcher;
pub use orchestrator::{AttachmentOrchestrator, AttachmentRequest};
pub use richtext::parse_facets;
pub use traits::{BlobUploader, Clock, LinkCardFetcher, ServiceAuthority, TokioClock, VideoService};
pub use validator::MediaValidator;
pub use video::VideoAttachmentProcessor;
