//! Thumbnail transformer - decode, resize and re-encode one image

use crate::encoder::ThumbnailFormat;
use crate::image::resize::{resize_image, ThumbnailDimensions};
use blobthumb_core::{PipelineError, PipelineResult};
use bytes::Bytes;
use image::{DynamicImage, GenericImageView};
use std::io::Cursor;

/// An encoded thumbnail ready to publish
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub data: Bytes,
    pub format: ThumbnailFormat,
    pub width: u32,
    pub height: u32,
    pub source_width: u32,
    pub source_height: u32,
}

impl Thumbnail {
    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

pub struct ThumbnailTransformer;

impl ThumbnailTransformer {
    /// Decode source bytes; the format is sniffed from the content.
    ///
    /// `source` only labels the error.
    pub fn decode(data: &[u8], source: &str) -> PipelineResult<DynamicImage> {
        let decode_error = |message: String| PipelineError::Decode {
            url: source.to_string(),
            message,
        };

        let cursor = Cursor::new(data);
        image::ImageReader::new(cursor)
            .with_guessed_format()
            .map_err(|e| decode_error(e.to_string()))?
            .decode()
            .map_err(|e| decode_error(e.to_string()))
    }

    /// Encode with the codec's default settings into a fresh buffer
    pub fn encode(img: &DynamicImage, format: ThumbnailFormat) -> PipelineResult<Bytes> {
        // JPEG has no alpha channel and GIF frames are RGBA
        let converted;
        let img = match format {
            ThumbnailFormat::Jpeg => {
                converted = DynamicImage::ImageRgb8(img.to_rgb8());
                &converted
            }
            ThumbnailFormat::Gif => {
                converted = DynamicImage::ImageRgba8(img.to_rgba8());
                &converted
            }
            ThumbnailFormat::Png => img,
        };

        let (width, height) = img.dimensions();
        let mut buffer = Vec::with_capacity(width as usize * height as usize * 3);
        let mut cursor = Cursor::new(&mut buffer);
        img.write_to(&mut cursor, format.to_image_format())
            .map_err(|e| PipelineError::Encode {
                format: format.to_string(),
                message: e.to_string(),
            })?;

        Ok(Bytes::from(buffer))
    }

    /// Full transform: decode, compute dimensions, resize, encode.
    pub fn create_thumbnail(
        data: &[u8],
        source: &str,
        target_width: u32,
        format: ThumbnailFormat,
    ) -> PipelineResult<Thumbnail> {
        let img = Self::decode(data, source)?;
        let (source_width, source_height) = img.dimensions();

        let dimensions = ThumbnailDimensions::calculate(source_width, source_height, target_width)?;

        tracing::debug!(
            source_width,
            source_height,
            width = dimensions.width,
            height = dimensions.height,
            format = %format,
            "Resizing image"
        );

        let resized = resize_image(&img, dimensions);
        let encoded = Self::encode(&resized, format)?;

        Ok(Thumbnail {
            data: encoded,
            format,
            width: dimensions.width,
            height: dimensions.height,
            source_width,
            source_height,
        })
    }
}
