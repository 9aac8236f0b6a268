//! Blobthumb Image Processing Library
//!
//! This crate turns a source image into a thumbnail: encoder selection from
//! the file extension, divisor-based dimension math, resize and re-encode.

pub mod encoder;
pub mod image;

// Re-export commonly used types
pub use encoder::{EncoderChoice, ThumbnailFormat};
pub use self::image::{Thumbnail, ThumbnailDimensions, ThumbnailTransformer, RESIZE_FILTER};
