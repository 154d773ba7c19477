//! Data models for the application
//!
//! Wire shapes exchanged with the personal data server and the video service, plus the
//! post record and its embeds.

mod blob;
mod embed;
mod media;
mod post;
mod session;
mod video;

// Re-export all models for convenient imports
pub use blob::*;
pub use embed::*;
pub use media::*;
pub use post::*;
pub use session::*;
pub use video::*;
