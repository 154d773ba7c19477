use skypost_core::constants::MAX_IMAGES_PER_POST;
use skypost_core::models::{ImageEntry, ImagesEmbed, MediaKind};
use std::sync::Arc;

use crate::error::AttachmentError;
use crate::image::processor::ImageProcessor;
use crate::traits::BlobUploader;
use crate::validator::MediaValidator;

/// Split a comma-separated path list, trimming entries and dropping empty ones.
pub fn parse_paths(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a comma-separated alt text list. Empty entries are kept so positions line up
/// with the image paths.
pub fn split_alt_texts(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}

/// Alt text for the image at `index`.
///
/// Uses the entry at the same position if it is not blank, otherwise a single supplied alt
/// text applies to every image, otherwise "Image N" (1-based).
pub fn resolve_alt_text(index: usize, alts: &[String]) -> String {
    if let Some(alt) = alts.get(index).map(|a| a.trim()).filter(|a| !a.is_empty()) {
        return alt.to_string();
    }

    if let [only] = alts {
        let only = only.trim();
        if !only.is_empty() {
            return only.to_string();
        }
    }

    format!("Image {}", index + 1)
}

/// Reads, validates and uploads up to four local images.
pub struct ImageAttachmentProcessor {
    uploader: Arc<dyn BlobUploader>,
    validator: MediaValidator,
}

impl ImageAttachmentProcessor {
    pub fn new(uploader: Arc<dyn BlobUploader>) -> Self {
        Self {
            uploader,
            validator: MediaValidator::for_kind(MediaKind::Image),
        }
    }

    /// Build an images embed from `paths`, in order.
    ///
    /// Returns `Ok(None)` when no paths are given. The count limit is enforced before any
    /// file is read. The first failing image aborts the whole set; images uploaded before
    /// it stay on the server unreferenced.
    pub async fn process(
        &self,
        paths: &[String],
        alts: &[String],
    ) -> Result<Option<ImagesEmbed>, AttachmentError> {
        if paths.is_empty() {
            return Ok(None);
        }

        if paths.len() > MAX_IMAGES_PER_POST {
            return Err(AttachmentError::TooManyAttachments {
                count: paths.len(),
                max: MAX_IMAGES_PER_POST,
            });
        }

        let mut images = Vec::with_capacity(paths.len());
        for (index, path) in paths.iter().enumerate() {
            let alt = resolve_alt_text(index, alts);
            images.push(self.process_one(path, alt).await?);
        }

        Ok(Some(ImagesEmbed { images }))
    }

    async fn process_one(&self, path: &str, alt: String) -> Result<ImageEntry, AttachmentError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| AttachmentError::FileRead {
                kind: MediaKind::Image,
                path: path.to_string(),
                source,
            })?;

        let mime_type = self.validator.validate_all(path, data.len())?;
        let aspect_ratio = ImageProcessor::probe_dimensions(&data);
        let size = data.len();

        let image = self
            .uploader
            .upload(data, mime_type)
            .await
            .map_err(|e| AttachmentError::from_api(path, e))?;

        tracing::info!(
            path = %path,
            mime_type = %mime_type,
            size = size,
            has_aspect_ratio = aspect_ratio.is_some(),
            "Image uploaded"
        );

        Ok(ImageEntry {
            alt,
            image,
            aspect_ratio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::processor::tests::create_test_image;
    use async_trait::async_trait;
    use image::ImageFormat;
    use skypost_api_client::{ApiError, ApiResult};
    use skypost_core::models::{AspectRatio, Blob};
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingUploader {
        uploads: Mutex<Vec<(usize, String)>>,
        reject: bool,
    }

    impl RecordingUploader {
        fn calls(&self) -> Vec<(usize, String)> {
            self.uploads.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BlobUploader for RecordingUploader {
        async fn upload(&self, data: Vec<u8>, mime_type: &str) -> ApiResult<Blob> {
            if self.reject {
                return Err(ApiError::Rejected {
                    operation: "com.atproto.repo.uploadBlob",
                    status: reqwest::StatusCode::PAYLOAD_TOO_LARGE,
                    body: "too big".to_string(),
                });
            }
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push((data.len(), mime_type.to_string()));
            Ok(Blob::new(
                format!("bafk{}", uploads.len()),
                mime_type,
                data.len() as u64,
            ))
        }
    }

    fn write(dir: &TempDir, name: &str, data: &[u8]) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, data).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn alts(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_paths() {
        assert_eq!(parse_paths(""), Vec::<String>::new());
        assert_eq!(parse_paths(" , ,"), Vec::<String>::new());
        assert_eq!(
            parse_paths(" a.png , ,b.jpg,"),
            vec!["a.png".to_string(), "b.jpg".to_string()]
        );
    }

    #[test]
    fn test_split_alt_texts_keeps_empty_entries() {
        assert_eq!(split_alt_texts(""), alts(&[""]));
        assert_eq!(split_alt_texts("a,,c"), alts(&["a", "", "c"]));
    }

    #[test]
    fn test_resolve_alt_text() {
        assert_eq!(resolve_alt_text(0, &alts(&["First", "Second"])), "First");
        assert_eq!(resolve_alt_text(1, &alts(&["First", " Second "])), "Second");
        assert_eq!(resolve_alt_text(2, &alts(&["First", "Second"])), "Image 3");
        assert_eq!(resolve_alt_text(3, &alts(&["Shared"])), "Shared");
        assert_eq!(resolve_alt_text(0, &alts(&[""])), "Image 1");
        assert_eq!(resolve_alt_text(1, &alts(&["a", "  ", "c"])), "Image 2");
        assert_eq!(resolve_alt_text(0, &[]), "Image 1");
    }

    #[tokio::test]
    async fn test_process_no_paths() {
        let uploader = Arc::new(RecordingUploader::default());
        let processor = ImageAttachmentProcessor::new(uploader.clone());

        let result = processor.process(&[], &alts(&["x"])).await.unwrap();
        assert!(result.is_none());
        assert!(uploader.calls().is_empty());
    }

    #[tokio::test]
    async fn test_process_images_in_order() {
        let dir = TempDir::new().unwrap();
        let png = write(&dir, "a.PNG", &create_test_image(100, 50, ImageFormat::Png));
        let gif = write(&dir, "b.gif", b"gif payload bytes");
        let uploader = Arc::new(RecordingUploader::default());
        let processor = ImageAttachmentProcessor::new(uploader.clone());

        let embed = processor
            .process(&[png, gif], &alts(&["Chart", ""]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(embed.images.len(), 2);
        assert_eq!(embed.images[0].alt, "Chart");
        assert_eq!(embed.images[0].image.mime_type, "image/png");
        assert_eq!(embed.images[0].image.link(), "bafk1");
        assert_eq!(
            embed.images[0].aspect_ratio,
            Some(AspectRatio {
                width: 100,
                height: 50
            })
        );
        assert_eq!(embed.images[1].alt, "Image 2");
        assert_eq!(embed.images[1].image.mime_type, "image/gif");
        assert_eq!(embed.images[1].aspect_ratio, None);

        let calls = uploader.calls();
        assert_eq!(calls[1], (17, "image/gif".to_string()));
    }

    #[tokio::test]
    async fn test_too_many_images_checked_before_reading() {
        let uploader = Arc::new(RecordingUploader::default());
        let processor = ImageAttachmentProcessor::new(uploader.clone());
        let paths: Vec<String> = (0..5).map(|i| format!("/nonexistent/{}.png", i)).collect();

        let err = processor.process(&paths, &[]).await.unwrap_err();
        assert!(matches!(
            err,
            AttachmentError::TooManyAttachments { count: 5, max: 4 }
        ));
        assert!(uploader.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let processor = ImageAttachmentProcessor::new(Arc::new(RecordingUploader::default()));
        let err = processor
            .process(&["/nonexistent/image.png".to_string()], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AttachmentError::FileRead { .. }));
    }

    #[tokio::test]
    async fn test_failing_image_aborts_set() {
        let dir = TempDir::new().unwrap();
        let first = write(&dir, "a.jpg", b"jpeg bytes");
        let second = write(&dir, "b.bmp", b"bmp bytes");
        let third = write(&dir, "c.png", b"png bytes");
        let uploader = Arc::new(RecordingUploader::default());
        let processor = ImageAttachmentProcessor::new(uploader.clone());

        let err = processor
            .process(&[first, second, third], &[])
            .await
            .unwrap_err();

        assert!(matches!(err, AttachmentError::UnsupportedFormat { .. }));
        assert_eq!(uploader.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_image() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "big.png", &vec![0u8; 1_000_001]);
        let uploader = Arc::new(RecordingUploader::default());
        let processor = ImageAttachmentProcessor::new(uploader.clone());

        let err = processor.process(&[path], &[]).await.unwrap_err();
        assert!(matches!(err, AttachmentError::SizeExceeded { .. }));
        assert!(uploader.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_rejection() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.webp", b"webp");
        let uploader = Arc::new(RecordingUploader {
            reject: true,
            ..Default::default()
        });
        let processor = ImageAttachmentProcessor::new(uploader);

        let err = processor.process(&[path], &[]).await.unwrap_err();
        assert!(matches!(
            err,
            AttachmentError::UploadRejected { status: 413, .. }
        ));
    }
}
