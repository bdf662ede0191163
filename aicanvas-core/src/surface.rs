//! # Surface
//!
//! The persistent raster that strokes and templates paint into. Always starts opaque white, and goes back to opaque
//! white on [`Surface::clear`] or [`Surface::resize`].

use crate::{brush::Pen, color::Color};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("surface must be at least 1x1 pixels, got {width}x{height}")]
    ZeroSized { width: u32, height: u32 },
    #[error(
        "surface of {width}x{height} pixels exceeds the limit of {} per side, {} total",
        MAX_SIDE,
        MAX_AREA
    )]
    TooLarge { width: u32, height: u32 },
    #[error("pixel density must be finite and positive")]
    BadDensity,
}

/// Largest backing store side, in physical pixels.
pub const MAX_SIDE: u32 = 16384;
/// Largest backing store area, in physical pixels.
pub const MAX_AREA: u64 = 1 << 26;

pub struct Surface {
    pixmap: tiny_skia::Pixmap,
    /// Physical pixels per logical pixel, fixed when the surface was (re)created.
    density: f32,
}
impl Surface {
    /// Create a blank white surface of the given physical size.
    pub fn new(width: u32, height: u32, density: f32) -> Result<Self, SurfaceError> {
        if !density.is_finite() || density <= 0.0 {
            return Err(SurfaceError::BadDensity);
        }
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroSized { width, height });
        }
        if width > MAX_SIDE || height > MAX_SIDE || u64::from(width) * u64::from(height) > MAX_AREA {
            return Err(SurfaceError::TooLarge { width, height });
        }
        // Non-zero and within limits, so this only fails if the platform can't address it.
        let pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or(SurfaceError::TooLarge { width, height })?;
        let mut this = Self { pixmap, density };
        this.clear();
        Ok(this)
    }
    /// Create a surface covering a logical area, backed by `density` physical pixels per logical pixel.
    pub fn with_logical_size(
        logical_width: f32,
        logical_height: f32,
        density: f32,
    ) -> Result<Self, SurfaceError> {
        let [width, height] = physical_size(logical_width, logical_height, density)?;
        Self::new(width, height, density)
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }
    #[must_use]
    pub fn density(&self) -> f32 {
        self.density
    }
    /// Center of the surface, in surface pixels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn center(&self) -> crate::input::Point {
        crate::input::Point::new(self.width() as f32 / 2.0, self.height() as f32 / 2.0)
    }
    /// Reset every pixel to opaque white.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::WHITE);
    }
    /// Reallocate at a new physical size. **Destroys all content**, the result is blank white.
    pub fn resize(&mut self, width: u32, height: u32, density: f32) -> Result<(), SurfaceError> {
        *self = Self::new(width, height, density)?;
        Ok(())
    }
    pub fn stroke_path(&mut self, path: &tiny_skia::Path, pen: &Pen) {
        self.pixmap.stroke_path(
            path,
            &pen.paint(),
            &pen.stroke(),
            tiny_skia::Transform::identity(),
            None,
        );
    }
    pub fn fill_path(&mut self, path: &tiny_skia::Path, pen: &Pen) {
        self.pixmap.fill_path(
            path,
            &pen.paint(),
            tiny_skia::FillRule::Winding,
            tiny_skia::Transform::identity(),
            None,
        );
    }
    /// Read a pixel, demultiplied. `None` if out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        // Pixmap only checks the flat index, so an overlong x would wrap to the next row.
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let px = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(px.red(), px.green(), px.blue(), px.alpha()))
    }
    /// Iterate all pixels, row-major, demultiplied.
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.pixmap.pixels().iter().map(|px| {
            let px = px.demultiply();
            Color::rgba(px.red(), px.green(), px.blue(), px.alpha())
        })
    }
    /// Number of fully opaque pixels.
    #[must_use]
    pub fn opaque_pixels(&self) -> usize {
        self.pixmap
            .pixels()
            .iter()
            .filter(|px| px.alpha() == u8::MAX)
            .count()
    }
    /// Number of pixels that differ from the opaque white background.
    #[must_use]
    pub fn painted_pixels(&self) -> usize {
        self.pixels().filter(|&px| px != Color::WHITE).count()
    }
    /// Is every pixel opaque white?
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.painted_pixels() == 0
    }
    /// Raw premultiplied RGBA8 data, row-major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }
}
impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("density", &self.density)
            .finish_non_exhaustive()
    }
}

/// Physical pixel size of a logical area, rounded down like a canvas backing store.
pub fn physical_size(
    logical_width: f32,
    logical_height: f32,
    density: f32,
) -> Result<[u32; 2], SurfaceError> {
    if !density.is_finite() || density <= 0.0 {
        return Err(SurfaceError::BadDensity);
    }
    // Clamp away negatives and NaN before the truncating cast.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let to_px = |logical: f32| (logical * density).max(0.0).floor().min(u32::MAX as f32) as u32;
    Ok([to_px(logical_width), to_px(logical_height)])
}
