//! Image attachments
//!
//! - Dimension probing (processor)
//! - Path and alt text parsing, validation and upload (attachments)

pub mod attachments;
pub mod processor;

pub use attachments::{parse_paths, resolve_alt_text, split_alt_texts, ImageAttachmentProcessor};
pub use processor::ImageProcessor;
