//! `image`-backed crop rasterizer.
//!
//! The crop rect is sampled at its exact fractional position. Each output
//! pixel center is mapped back into source space and read with bilinear
//! interpolation. Regions larger than the output are first shrunk with the
//! configured filter so downscaling does not alias.

use std::io::Cursor;

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tracing::debug;

use crate::domain::entities::CropRect;
use crate::domain::ports::{RasterError, Rasterizer};

/// Crops, scales to an exact square, and encodes PNG.
#[derive(Debug, Clone, Copy)]
pub struct PngRasterizer {
    filter: FilterType,
}

impl PngRasterizer {
    /// Creates a rasterizer with the given resampling filter.
    #[must_use]
    pub const fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for PngRasterizer {
    fn default() -> Self {
        Self::new(FilterType::Lanczos3)
    }
}

impl Rasterizer for PngRasterizer {
    fn rasterize(
        &self,
        source: &DynamicImage,
        rect: CropRect,
        output_size: u32,
    ) -> Result<Bytes, RasterError> {
        if source.width() == 0 || source.height() == 0 {
            return Err(RasterError("source image is empty".to_string()));
        }
        if output_size == 0 {
            return Err(RasterError("output size must be positive".to_string()));
        }
        if !(rect.size.is_finite() && rect.size > 0.0 && rect.x.is_finite() && rect.y.is_finite())
        {
            return Err(RasterError("crop region is empty".to_string()));
        }

        let (left, top, width, height) = rect.enclosing_pixels(source.width(), source.height());
        debug!(x = rect.x, y = rect.y, size = rect.size, output_size, "Rasterizing avatar crop");

        let mut region = source.crop_imm(left, top, width, height);
        let shrink = f64::from(output_size) / rect.size;
        if shrink < 1.0 {
            region = region.resize_exact(
                scaled_len(width, shrink),
                scaled_len(height, shrink),
                self.filter,
            );
        }
        let region = region.to_rgba8();

        let scale_x = f64::from(region.width()) / f64::from(width);
        let scale_y = f64::from(region.height()) / f64::from(height);
        let step = rect.size / f64::from(output_size);

        let output = RgbaImage::from_fn(output_size, output_size, |i, j| {
            let src_x = rect.x + (f64::from(i) + 0.5) * step;
            let src_y = rect.y + (f64::from(j) + 0.5) * step;
            bilinear(
                &region,
                (src_x - f64::from(left)) * scale_x - 0.5,
                (src_y - f64::from(top)) * scale_y - 0.5,
            )
        });

        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(output)
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| RasterError(format!("PNG encoding failed: {e}")))?;

        Ok(Bytes::from(buffer.into_inner()))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_len(len: u32, factor: f64) -> u32 {
    ((f64::from(len) * factor).round() as u32).max(1)
}

/// Samples `img` at pixel-center coordinates `(x, y)`, clamping to the edges.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bilinear(img: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let max_x = f64::from(img.width() - 1);
    let max_y = f64::from(img.height() - 1);
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);
    let (x0, y0) = (x0 as u32, y0 as u32);
    let x1 = (x0 + 1).min(img.width() - 1);
    let y1 = (y0 + 1).min(img.height() - 1);

    let (a, b) = (img.get_pixel(x0, y0).0, img.get_pixel(x1, y0).0);
    let (c, d) = (img.get_pixel(x0, y1).0, img.get_pixel(x1, y1).0);

    let mut out = [0u8; 4];
    for (k, channel) in out.iter_mut().enumerate() {
        let top = f64::from(a[k]) * (1.0 - fx) + f64::from(b[k]) * fx;
        let bottom = f64::from(c[k]) * (1.0 - fx) + f64::from(d[k]) * fx;
        *channel = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CropTransform;
    use image::GenericImageView;

    fn two_tone(width: u32, height: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(width, height, |_, y| {
            if y < height / 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_output_is_exact_square_png() {
        let source = two_tone(300, 200);
        let rect = CropTransform::identity().crop_rect(300, 200);

        let bytes = PngRasterizer::default()
            .rasterize(&source, rect, 512)
            .unwrap();

        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (512, 512));
    }

    #[test]
    fn test_crop_selects_requested_region() {
        let source = two_tone(100, 400);
        // Pan fully down at zoom 1: the crop covers the bottom 100 rows.
        let rect = CropTransform::new(1.0, 0.0, -1.0).crop_rect(100, 400);

        let bytes = PngRasterizer::new(FilterType::Nearest)
            .rasterize(&source, rect, 16)
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();

        assert_eq!(decoded.get_pixel(8, 8), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_identity_crop_at_native_size_is_lossless() {
        let source = two_tone(64, 64);
        let rect = CropTransform::identity().crop_rect(64, 64);

        let bytes = PngRasterizer::default().rasterize(&source, rect, 64).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();

        assert_eq!(decoded, source.to_rgba8());
    }

    #[test]
    fn test_fractional_crop_is_not_rounded() {
        // Left half red, right half blue. At zoom 3 on 100px the crop spans
        // 33.33..66.67, so the color edge at x=50 lands on output column 256.
        let source = DynamicImage::ImageRgba8(RgbaImage::from_fn(100, 100, |x, _| {
            if x < 50 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        }));
        let rect = CropTransform::new(3.0, 0.0, 0.0).crop_rect(100, 100);

        let bytes = PngRasterizer::default().rasterize(&source, rect, 512).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();

        let left_of_edge = decoded.get_pixel(248, 256);
        let right_of_edge = decoded.get_pixel(262, 256);
        assert!(left_of_edge[0] > left_of_edge[2]);
        assert!(right_of_edge[2] > right_of_edge[0]);
    }

    #[test]
    fn test_zero_output_size_is_rejected() {
        let source = two_tone(10, 10);
        let rect = CropTransform::identity().crop_rect(10, 10);
        assert!(PngRasterizer::default().rasterize(&source, rect, 0).is_err());
    }
}
