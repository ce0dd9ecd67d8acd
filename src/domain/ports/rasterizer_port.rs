//! Port for rendering a crop region into a square bitmap.

use bytes::Bytes;
use image::DynamicImage;
use thiserror::Error;

use crate::domain::entities::CropRect;

/// Rasterization failure.
#[derive(Debug, Clone, Error)]
#[error("rasterization failed: {0}")]
pub struct RasterError(pub String);

/// Renders `rect` of `source` into an `output_size`-square encoded image.
pub trait Rasterizer: Send + Sync {
    /// Produces the encoded output bytes.
    ///
    /// # Errors
    /// Returns error if the region is empty or encoding fails.
    fn rasterize(
        &self,
        source: &DynamicImage,
        rect: CropRect,
        output_size: u32,
    ) -> Result<Bytes, RasterError>;
}
