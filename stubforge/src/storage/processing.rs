//! Image processing for uploads
//!
//! Three operations cover what the upload coordinator needs:
//! - scale down preserving aspect ratio (crop with aspect ratio)
//! - resize down ignoring aspect ratio (crop without aspect ratio)
//! - re-encode unchanged (no crop)
//!
//! Images are never enlarged. Every operation ends by encoding to the
//! configured [`ImageTarget`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use stubforge::config::ImageTarget;
//! use stubforge::storage::{processing::{ImageOperation, ImageProcessor}, UploadedFile};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let file = UploadedFile::new("photo.jpg", "image/jpeg", vec![/* ... */]);
//! let processor = ImageProcessor::new();
//!
//! let op = ImageOperation::ScaleDown { width: Some(800), height: Some(600) };
//! let webp = processor.process(&file, op, ImageTarget::Webp)?;
//! assert_eq!(webp.content_type, "image/webp");
//! # Ok(())
//! # }
//! ```

use super::types::{StorageError, StorageResult, UploadedFile};
use crate::config::ImageTarget;
use image::{imageops::FilterType, DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// What to do with an image before encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOperation {
    /// Fit within the bounds, keeping the aspect ratio
    ScaleDown {
        /// Maximum width, unbounded when `None`
        width: Option<u32>,
        /// Maximum height, unbounded when `None`
        height: Option<u32>,
    },
    /// Shrink each side to its bound independently
    ResizeDown {
        /// Maximum width, unchanged when `None`
        width: Option<u32>,
        /// Maximum height, unchanged when `None`
        height: Option<u32>,
    },
    /// Encode without changing dimensions
    Encode,
}

/// Image decoding, resizing and encoding
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    /// Filter for resizing operations
    filter: FilterType,
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageProcessor {
    /// Creates a processor using `FilterType::Lanczos3`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }

    /// Loads an image from an uploaded file
    fn load_image(file: &UploadedFile) -> StorageResult<DynamicImage> {
        let reader = ImageReader::new(Cursor::new(&file.data))
            .with_guessed_format()
            .map_err(|e| StorageError::Processing(format!("Failed to read image: {e}")))?;

        reader
            .decode()
            .map_err(|e| StorageError::Processing(format!("Failed to decode image: {e}")))
    }

    /// Encodes an image in the target format
    ///
    /// WebP and PNG get RGBA8 pixels, JPEG gets RGB8 since it has no alpha.
    fn encode(image: &DynamicImage, target: ImageTarget) -> StorageResult<Vec<u8>> {
        let (converted, format) = match target {
            ImageTarget::Webp => (DynamicImage::ImageRgba8(image.to_rgba8()), ImageFormat::WebP),
            ImageTarget::Png => (DynamicImage::ImageRgba8(image.to_rgba8()), ImageFormat::Png),
            ImageTarget::Jpeg => (DynamicImage::ImageRgb8(image.to_rgb8()), ImageFormat::Jpeg),
        };

        let mut buffer = Vec::new();
        converted
            .write_to(&mut Cursor::new(&mut buffer), format)
            .map_err(|e| StorageError::Processing(format!("Failed to encode image: {e}")))?;
        Ok(buffer)
    }

    /// Apply `operation` and encode to `target`
    ///
    /// The returned file keeps the client file stem with the target's
    /// extension and MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Processing`] if the file is not a decodable
    /// image or encoding fails.
    pub fn process(
        &self,
        file: &UploadedFile,
        operation: ImageOperation,
        target: ImageTarget,
    ) -> StorageResult<UploadedFile> {
        let img = Self::load_image(file)?;
        let (src_w, src_h) = (img.width(), img.height());

        let img = match operation {
            ImageOperation::ScaleDown { width, height } => {
                let (w, h) = fit_within((src_w, src_h), (width, height));
                if (w, h) == (src_w, src_h) {
                    img
                } else {
                    img.resize_exact(w, h, self.filter)
                }
            }
            ImageOperation::ResizeDown { width, height } => {
                let w = width.map_or(src_w, |w| w.clamp(1, src_w));
                let h = height.map_or(src_h, |h| h.clamp(1, src_h));
                if (w, h) == (src_w, src_h) {
                    img
                } else {
                    img.resize_exact(w, h, self.filter)
                }
            }
            ImageOperation::Encode => img,
        };

        tracing::debug!(
            ?operation,
            from = ?(src_w, src_h),
            to = ?(img.width(), img.height()),
            format = target.extension(),
            "processed image"
        );

        let data = Self::encode(&img, target)?;
        let stem = file
            .filename
            .rsplit_once('.')
            .map_or(file.filename.as_str(), |(stem, _)| stem);

        Ok(UploadedFile {
            filename: format!("{stem}.{}", target.extension()),
            content_type: target.mime_type().to_string(),
            data,
        })
    }

    /// Gets image dimensions without full decoding
    pub fn get_dimensions(&self, file: &UploadedFile) -> StorageResult<(u32, u32)> {
        ImageReader::new(Cursor::new(&file.data))
            .with_guessed_format()
            .map_err(|e| StorageError::Processing(format!("Failed to read image: {e}")))?
            .into_dimensions()
            .map_err(|e| StorageError::Processing(format!("Failed to get dimensions: {e}")))
    }
}

/// Largest size within `bounds` with the aspect ratio of `src`, never larger than `src`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fit_within(src: (u32, u32), bounds: (Option<u32>, Option<u32>)) -> (u32, u32) {
    let ratio_for = |bound: Option<u32>, side: u32| {
        bound.map_or(1.0, |b| f64::from(b.max(1)) / f64::from(side.max(1)))
    };
    let ratio = ratio_for(bounds.0, src.0)
        .min(ratio_for(bounds.1, src.1))
        .min(1.0);

    let scale = |side: u32| ((f64::from(side) * ratio).round() as u32).max(1);
    (scale(src.0), scale(src.1))
}
