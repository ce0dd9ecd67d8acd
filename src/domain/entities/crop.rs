//! Crop/zoom geometry for the avatar editor.
//!
//! Zoom and pan are kept in normalized form: zoom is a factor in
//! [`MIN_ZOOM`, `MAX_ZOOM`] and each pan axis is a fraction in `[-1, 1]` of
//! the largest translation the current zoom allows. All setters clamp.

/// Smallest zoom factor; shows the largest inscribed square.
pub const MIN_ZOOM: f64 = 1.0;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 3.0;
/// Wheel delta (in scroll units) that changes zoom by one.
pub const WHEEL_ZOOM_DIVISOR: f64 = 600.0;
/// Side length of the rasterized avatar, in pixels.
pub const AVATAR_OUTPUT_SIZE: u32 = 512;

/// Square region of the source image, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Side length.
    pub size: f64,
}

impl CropRect {
    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.size
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.size
    }

    /// Whole-pixel box `(left, top, width, height)` covering the rect plus a
    /// one-pixel margin for interpolation, clipped to a `width`×`height`
    /// image. Never empty for a non-empty image.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn enclosing_pixels(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let floor = |v: f64, max: u32| (v.floor().max(0.0) as u32).min(max.saturating_sub(1));
        let ceil = |v: f64, max: u32| (v.ceil().max(0.0) as u32).min(max);

        let left = floor(self.x - 1.0, width);
        let top = floor(self.y - 1.0, height);
        let right = ceil(self.right() + 1.0, width).max(left + 1);
        let bottom = ceil(self.bottom() + 1.0, height).max(top + 1);
        (left, top, right - left, bottom - top)
    }
}

/// How the source image is drawn inside the square editing viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    /// Source-to-viewport scale factor.
    pub scale: f64,
    /// Horizontal translation in viewport pixels.
    pub translate_x: f64,
    /// Vertical translation in viewport pixels.
    pub translate_y: f64,
}

/// Zoom factor plus normalized pan offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropTransform {
    zoom: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Default for CropTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl CropTransform {
    /// Unzoomed, centered transform.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            zoom: MIN_ZOOM,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Creates a transform, clamping every component into range.
    #[must_use]
    pub fn new(zoom: f64, offset_x: f64, offset_y: f64) -> Self {
        let mut transform = Self::identity();
        transform.set_zoom(zoom);
        transform.set_offset(offset_x, offset_y);
        transform
    }

    /// Current zoom factor.
    #[must_use]
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current normalized offset `(x, y)`.
    #[must_use]
    pub const fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    /// Sets zoom, clamped to [`MIN_ZOOM`, `MAX_ZOOM`]. Non-finite input is ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Applies a wheel scroll: `zoom += -delta_y / WHEEL_ZOOM_DIVISOR`.
    pub fn apply_wheel(&mut self, delta_y: f64) {
        self.set_zoom(self.zoom - delta_y / WHEEL_ZOOM_DIVISOR);
    }

    /// Sets the offset, each axis clamped to `[-1, 1]`. Non-finite axes are ignored.
    pub fn set_offset(&mut self, offset_x: f64, offset_y: f64) {
        if offset_x.is_finite() {
            self.offset_x = offset_x.clamp(-1.0, 1.0);
        }
        if offset_y.is_finite() {
            self.offset_y = offset_y.clamp(-1.0, 1.0);
        }
    }

    /// Source region selected for a `natural_width`×`natural_height` image.
    #[must_use]
    pub fn crop_rect(&self, natural_width: u32, natural_height: u32) -> CropRect {
        let width = f64::from(natural_width);
        let height = f64::from(natural_height);

        let min_side = width.min(height);
        let crop_size = min_side / self.zoom;
        let max_off_x = (width - crop_size) / 2.0;
        let max_off_y = (height - crop_size) / 2.0;

        CropRect {
            x: (width - crop_size) / 2.0 - self.offset_x * max_off_x,
            y: (height - crop_size) / 2.0 - self.offset_y * max_off_y,
            size: crop_size,
        }
    }

    /// Transform that maps the crop region onto a `viewport_px` square.
    #[must_use]
    pub fn viewport(
        &self,
        natural_width: u32,
        natural_height: u32,
        viewport_px: f64,
    ) -> ViewportTransform {
        let rect = self.crop_rect(natural_width, natural_height);
        let scale = if rect.size > 0.0 {
            viewport_px / rect.size
        } else {
            1.0
        };
        ViewportTransform {
            scale,
            translate_x: -rect.x * scale,
            translate_y: -rect.y * scale,
        }
    }
}

/// A pointer-drag pan gesture in progress.
///
/// Offsets are computed against the state recorded when the gesture began,
/// so consecutive gestures compose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    start_pointer: (f64, f64),
    start_offset: (f64, f64),
}

impl DragGesture {
    /// Starts a gesture at `pointer` over a transform.
    #[must_use]
    pub const fn begin(pointer: (f64, f64), transform: &CropTransform) -> Self {
        Self {
            start_pointer: pointer,
            start_offset: transform.offset(),
        }
    }

    /// Offset the transform should take with the pointer at `pointer`.
    ///
    /// Screen deltas are normalized by half the viewport side.
    #[must_use]
    pub fn offset_at(&self, pointer: (f64, f64), viewport_px: f64) -> (f64, f64) {
        let half = (viewport_px / 2.0).max(f64::EPSILON);
        let dx = (pointer.0 - self.start_pointer.0) / half;
        let dy = (pointer.1 - self.start_pointer.1) / half;
        (
            (self.start_offset.0 + dx).clamp(-1.0, 1.0),
            (self.start_offset.1 + dy).clamp(-1.0, 1.0),
        )
    }
}
