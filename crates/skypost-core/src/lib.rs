//! Skypost Core Library
//!
//! This crate provides the record and embed models, media kinds, constants and typed
//! settings that are shared across all skypost components. It performs no I/O.

pub mod config;
pub mod constants;
pub mod models;

// Re-export commonly used types
pub use config::VideoSettings;
pub use models::{
    AspectRatio, Blob, BlobLink, Caption, Embed, ExternalContent, ExternalEmbed, Facet,
    FacetFeature, FacetIndex, ImageEntry, ImagesEmbed, JobState, JobStatus, MediaKind, Post,
    Session, UploadVideoResponse, VideoEmbed,
};
