//! Image processing module
//!
//! - Dimension calculation and resizing (resize)
//! - Decode → resize → encode orchestration (transformer)

pub mod resize;
pub mod transformer;

pub use resize::{ThumbnailDimensions, RESIZE_FILTER};
pub use transformer::{Thumbnail, ThumbnailTransformer};
