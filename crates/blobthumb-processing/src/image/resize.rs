use blobthumb_core::{PipelineError, PipelineResult};
use image::imageops::FilterType;
use image::DynamicImage;

/// Resampling filter used for every thumbnail (bicubic, Catmull-Rom)
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Output size of a thumbnail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailDimensions {
    pub width: u32,
    pub height: u32,
}

impl ThumbnailDimensions {
    /// Divisor-based scaling.
    ///
    /// The width is the target width verbatim. The height is the original
    /// height divided by `original_width / target_width` (integer division),
    /// rounded half to even. This is not the same as scaling by the float
    /// ratio when the original width is not a multiple of the target width.
    pub fn calculate(
        original_width: u32,
        original_height: u32,
        target_width: u32,
    ) -> PipelineResult<Self> {
        if target_width == 0 {
            return Err(PipelineError::Configuration(
                "thumbnail width must be greater than zero".to_string(),
            ));
        }
        if target_width >= original_width {
            return Err(PipelineError::UpscaleUnsupported {
                source_width: original_width,
                target_width,
            });
        }

        let divisor = original_width / target_width;
        let height = (f64::from(original_height) / f64::from(divisor)).round_ties_even() as u32;

        Ok(ThumbnailDimensions {
            width: target_width,
            // A sliver-thin source can round down to zero rows
            height: height.max(1),
        })
    }
}

/// Resize image to exact dimensions with the fixed thumbnail filter
pub fn resize_image(img: &DynamicImage, dimensions: ThumbnailDimensions) -> DynamicImage {
    img.resize_exact(dimensions.width, dimensions.height, RESIZE_FILTER)
}
