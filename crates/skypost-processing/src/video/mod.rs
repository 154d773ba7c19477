//! Video attachments: upload through the video service and wait for transcoding.

pub mod orchestration;

pub use orchestration::VideoAttachmentProcessor;
