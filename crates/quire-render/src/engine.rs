//! The raster engine contract.

use image::imageops::{self, FilterType};
use quire_core::{Color, EngineError};

use crate::raster::{CompositeOptions, Raster};

/// A request to render a single line of styled text.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRequest<'a> {
    /// Text to render; never empty
    pub text: &'a str,
    /// Effective font name, including any style suffixes
    pub font: &'a str,
    /// Font size in points
    pub size: f64,
    /// Foreground color
    pub color: Color,
    /// Output resolution in pixels per inch
    pub resolution: u32,
}

/// The primitive raster operations the layout model needs.
///
/// Only label rendering is required; the other operations have default
/// implementations on top of [`Raster`]. Any error is fatal for the render
/// that issued the call.
pub trait RasterEngine {
    /// Render a transparent-background label for `request`.
    fn render_label(&self, request: &LabelRequest<'_>) -> Result<Raster, EngineError>;

    /// Create a blank, transparent canvas.
    fn canvas(&self, width: u32, height: u32) -> Result<Raster, EngineError> {
        Ok(Raster::new(width, height))
    }

    /// Resample `raster` to exactly `width` by `height` pixels.
    fn resize(&self, raster: &Raster, width: u32, height: u32) -> Result<Raster, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        if raster.dimensions() == (width, height) {
            return Ok(raster.clone());
        }
        let resized = imageops::resize(raster.as_image(), width, height, FilterType::Lanczos3);
        Ok(Raster::from_image(resized))
    }

    /// Composite `overlay` onto `base`.
    fn composite(
        &self,
        base: &mut Raster,
        overlay: &Raster,
        options: CompositeOptions,
    ) -> Result<(), EngineError> {
        base.composite(overlay, options);
        Ok(())
    }
}
