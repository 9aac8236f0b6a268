//! Encoder selection
//!
//! The output codec is chosen from the source file extension alone. Only GIF,
//! PNG and JPEG are recognized; anything else is declined.

use image::ImageFormat;
use std::fmt;

/// Codec chosen for a source extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderChoice {
    Png,
    Jpeg,
    Gif,
    Unsupported,
}

/// A format the thumbnail can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailFormat {
    Png,
    Jpeg,
    Gif,
}

impl EncoderChoice {
    /// Classify a file extension, with or without its leading dot, ignoring case.
    pub fn from_extension(extension: &str) -> Self {
        let name = extension.strip_prefix('.').unwrap_or(extension);
        match name.to_ascii_lowercase().as_str() {
            "png" => EncoderChoice::Png,
            "jpg" | "jpeg" => EncoderChoice::Jpeg,
            "gif" => EncoderChoice::Gif,
            _ => EncoderChoice::Unsupported,
        }
    }

    /// The output format, or `None` when processing should be skipped
    pub fn format(self) -> Option<ThumbnailFormat> {
        match self {
            EncoderChoice::Png => Some(ThumbnailFormat::Png),
            EncoderChoice::Jpeg => Some(ThumbnailFormat::Jpeg),
            EncoderChoice::Gif => Some(ThumbnailFormat::Gif),
            EncoderChoice::Unsupported => None,
        }
    }
}

impl ThumbnailFormat {
    pub fn to_mime_type(self) -> &'static str {
        match self {
            ThumbnailFormat::Png => "image/png",
            ThumbnailFormat::Jpeg => "image/jpeg",
            ThumbnailFormat::Gif => "image/gif",
        }
    }

    pub fn to_image_format(self) -> ImageFormat {
        match self {
            ThumbnailFormat::Png => ImageFormat::Png,
            ThumbnailFormat::Jpeg => ImageFormat::Jpeg,
            ThumbnailFormat::Gif => ImageFormat::Gif,
        }
    }
}

impl fmt::Display for ThumbnailFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThumbnailFormat::Png => write!(f, "png"),
            ThumbnailFormat::Jpeg => write!(f, "jpeg"),
            ThumbnailFormat::Gif => write!(f, "gif"),
        }
    }
}
