//! Image processor - dimension probing

use image::ImageReader;
use skypost_core::models::AspectRatio;
use std::io::Cursor;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Read pixel dimensions from the image header without decoding the pixels.
    ///
    /// Returns `None` when the format is not recognised, the header is malformed, or
    /// either side is zero. Callers treat that as "no aspect ratio", never as an error.
    pub fn probe_dimensions(data: &[u8]) -> Option<AspectRatio> {
        let reader = match ImageReader::new(Cursor::new(data)).with_guessed_format() {
            Ok(reader) => reader,
            Err(e) => {
                tracing::debug!(error = %e, "Could not guess image format");
                return None;
            }
        };

        match reader.into_dimensions() {
            Ok((width, height)) => AspectRatio::new(width, height),
            Err(e) => {
                tracing::debug!(error = %e, "Could not read image dimensions");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    pub(crate) fn create_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut cursor = Cursor::new(Vec::new());
        match format {
            ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(img)
                .to_rgb8()
                .write_to(&mut cursor, format)
                .unwrap(),
            _ => img.write_to(&mut cursor, format).unwrap(),
        }
        cursor.into_inner()
    }

    #[test]
    fn test_probe_png_dimensions() {
        let data = create_test_image(100, 50, ImageFormat::Png);
        assert_eq!(
            ImageProcessor::probe_dimensions(&data),
            Some(AspectRatio {
                width: 100,
                height: 50
            })
        );
    }

    #[test]
    fn test_probe_jpeg_dimensions() {
        let data = create_test_image(40, 30, ImageFormat::Jpeg);
        assert_eq!(
            ImageProcessor::probe_dimensions(&data),
            Some(AspectRatio {
                width: 40,
                height: 30
            })
        );
    }

    #[test]
    fn test_probe_invalid_data() {
        assert_eq!(ImageProcessor::probe_dimensions(b"not an image"), None);
        assert_eq!(ImageProcessor::probe_dimensions(&[]), None);
    }

    #[test]
    fn test_probe_truncated_header() {
        let data = create_test_image(10, 10, ImageFormat::Png);
        assert_eq!(ImageProcessor::probe_dimensions(&data[..12]), None);
    }
}
