//! Owned RGBA raster images.

use std::path::Path;

use image::{imageops, Rgba, RgbaImage};
use quire_core::{Color, EngineError};

/// How an overlay is combined with the pixels below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Alpha-blend the overlay over the base
    #[default]
    Over,
    /// Replace base pixels with overlay pixels
    Replace,
}

/// Placement and blending for a composite operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompositeOptions {
    /// Horizontal offset in pixels from the base's left edge
    pub x: i64,
    /// Vertical offset in pixels from the base's top edge
    pub y: i64,
    /// Blend mode
    pub mode: CompositeMode,
}

impl CompositeOptions {
    /// Alpha-blend at the given offset.
    pub fn at(x: i64, y: i64) -> Self {
        Self {
            x,
            y,
            mode: CompositeMode::Over,
        }
    }

    /// Set the blend mode.
    pub fn with_mode(mut self, mode: CompositeMode) -> Self {
        self.mode = mode;
        self
    }
}

/// An RGBA image exclusively owned by one layout object.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pixels: RgbaImage,
}

impl Raster {
    /// Create a fully transparent raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    /// Create a raster filled with a single color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(color.to_rgba8())),
        }
    }

    /// Wrap an existing RGBA buffer.
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Decode an image file into a raster.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let decoded = image::open(path.as_ref()).map_err(|e| EngineError::DecodeFailed {
            reason: format!("{}: {}", path.as_ref().display(), e),
        })?;
        Ok(Self::from_image(decoded.to_rgba8()))
    }

    /// Decode an in-memory encoded image into a raster.
    pub fn decode(bytes: &[u8]) -> Result<Self, EngineError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| EngineError::DecodeFailed {
            reason: e.to_string(),
        })?;
        Ok(Self::from_image(decoded.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// RGBA value of a pixel, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Borrow the underlying buffer.
    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Take the underlying buffer.
    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Fill the whole raster with a color.
    pub fn fill(&mut self, color: Color) {
        let rgba = Rgba(color.to_rgba8());
        for pixel in self.pixels.pixels_mut() {
            *pixel = rgba;
        }
    }

    /// Set every pixel of a rectangle, clipped to the raster.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Color) {
        let rgba = Rgba(color.to_rgba8());
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width as i64).min(self.width() as i64);
        let y1 = (y + height as i64).min(self.height() as i64);

        for py in y0..y1 {
            for px in x0..x1 {
                self.pixels.put_pixel(px as u32, py as u32, rgba);
            }
        }
    }

    /// Composite another raster onto this one.
    pub fn composite(&mut self, overlay: &Raster, options: CompositeOptions) {
        match options.mode {
            CompositeMode::Over => {
                imageops::overlay(&mut self.pixels, &overlay.pixels, options.x, options.y)
            }
            CompositeMode::Replace => {
                imageops::replace(&mut self.pixels, &overlay.pixels, options.x, options.y)
            }
        }
    }

    /// Grow the raster downwards by `rows`, filling the new band with `color`.
    pub fn extend_bottom(&mut self, rows: u32, color: Color) {
        if rows == 0 {
            return;
        }
        let (width, height) = self.dimensions();
        let mut grown = RgbaImage::from_pixel(width, height + rows, Rgba(color.to_rgba8()));
        imageops::replace(&mut grown, &self.pixels, 0, 0);
        self.pixels = grown;
    }

    /// Replace an edge band `thickness` pixels wide with `color`.
    ///
    /// Dimensions are unchanged: the outer band is shaved off and re-added as
    /// a solid border.
    pub fn draw_border(&mut self, thickness: u32, color: Color) {
        let (width, height) = self.dimensions();
        let t = thickness.min(width).min(height);
        if t == 0 {
            return;
        }
        self.fill_rect(0, 0, width, t, color);
        self.fill_rect(0, (height - t) as i64, width, t, color);
        self.fill_rect(0, 0, t, height, color);
        self.fill_rect((width - t) as i64, 0, t, height, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    #[test]
    fn test_new_is_transparent() {
        let raster = Raster::new(4, 3);
        assert_eq!(raster.dimensions(), (4, 3));
        assert_eq!(raster.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(raster.pixel(4, 0), None);
    }

    #[test]
    fn test_composite_over_later_wins() {
        let mut base = Raster::new(10, 10);
        base.composite(&Raster::filled(6, 6, RED), CompositeOptions::at(0, 0));
        base.composite(&Raster::filled(6, 6, BLUE), CompositeOptions::at(4, 4));

        assert_eq!(base.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(base.pixel(5, 5), Some([0, 0, 255, 255]));
        assert_eq!(base.pixel(9, 9), Some([0, 0, 255, 255]));
        assert_eq!(base.pixel(0, 9), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_composite_negative_offset_clips() {
        let mut base = Raster::new(4, 4);
        base.composite(&Raster::filled(4, 4, RED), CompositeOptions::at(-2, -2));
        assert_eq!(base.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(base.pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_replace_mode_keeps_transparency() {
        let mut base = Raster::filled(2, 2, RED);
        base.composite(
            &Raster::new(1, 1),
            CompositeOptions::at(0, 0).with_mode(CompositeMode::Replace),
        );
        assert_eq!(base.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(base.pixel(1, 1), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_extend_bottom() {
        let mut raster = Raster::filled(3, 2, RED);
        raster.extend_bottom(1, BLUE);
        assert_eq!(raster.dimensions(), (3, 3));
        assert_eq!(raster.pixel(0, 1), Some([255, 0, 0, 255]));
        assert_eq!(raster.pixel(0, 2), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_draw_border() {
        let mut raster = Raster::new(6, 6);
        raster.draw_border(1, RED);
        assert_eq!(raster.dimensions(), (6, 6));
        assert_eq!(raster.pixel(0, 3), Some([255, 0, 0, 255]));
        assert_eq!(raster.pixel(5, 5), Some([255, 0, 0, 255]));
        assert_eq!(raster.pixel(3, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(Raster::decode(b"not an image").is_err());
    }
}
