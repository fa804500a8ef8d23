//! Image objects: a source raster scaled into the object's bounds.

use std::path::Path;

use log::debug;
use quire_core::{ConfigError, DVec2, FitMode, RenderError};
use quire_render::{CompositeOptions, Raster, RasterEngine};

use crate::object::{ObjectBase, RenderOptions, Visual};

/// Geometry of a source image placed on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub width: u32,
    pub height: u32,
    pub x: i64,
    pub y: i64,
}

/// Place a `source` sized image onto a `canvas` sized raster.
///
/// `Fit` scales along the more constraining axis and centers the result;
/// `Stretch` fills the canvas exactly.
pub fn fit_geometry(source: (u32, u32), canvas: (u32, u32), fit: FitMode) -> Placement {
    let (sw, sh) = (source.0.max(1) as f64, source.1.max(1) as f64);
    let (cw, ch) = (canvas.0, canvas.1);

    if fit == FitMode::Stretch {
        return Placement {
            width: cw,
            height: ch,
            x: 0,
            y: 0,
        };
    }

    let rw = sw / cw.max(1) as f64;
    let rh = sh / ch.max(1) as f64;
    let (width, height) = if rw > rh {
        (cw, ((sh / rw).round() as u32).max(1))
    } else {
        (((sw / rh).round() as u32).max(1), ch)
    };

    Placement {
        width,
        height,
        x: (cw as i64 - width as i64) / 2,
        y: (ch as i64 - height as i64) / 2,
    }
}

/// A raster image placed in a rectangle.
#[derive(Debug)]
pub struct Image {
    base: ObjectBase,
    source: Option<Raster>,
    fit: FitMode,
}

impl Image {
    /// Create a deferred image object with no source yet.
    pub fn new(position_mm: DVec2, size_mm: DVec2, resolution: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            base: ObjectBase::deferred(position_mm, size_mm, resolution)?,
            source: None,
            fit: FitMode::default(),
        })
    }

    /// Create an image object whose canvas exists immediately.
    pub fn eager(position_mm: DVec2, size_mm: DVec2, resolution: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            base: ObjectBase::eager(position_mm, size_mm, resolution)?,
            source: None,
            fit: FitMode::default(),
        })
    }

    /// Create a deferred image object from a file on disk.
    pub fn open(
        path: impl AsRef<Path>,
        position_mm: DVec2,
        size_mm: DVec2,
        resolution: u32,
    ) -> Result<Self, RenderError> {
        let source = Raster::open(path)?;
        Ok(Self::new(position_mm, size_mm, resolution)?.with_source(source))
    }

    pub fn with_source(mut self, source: Raster) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_fit(mut self, fit: FitMode) -> Self {
        self.fit = fit;
        self
    }

    pub fn set_source(&mut self, source: Raster) {
        self.source = Some(source);
    }

    pub fn source(&self) -> Option<&Raster> {
        self.source.as_ref()
    }

    pub fn fit(&self) -> FitMode {
        self.fit
    }
}

impl Visual for Image {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn finalize(
        &mut self,
        engine: &dyn RasterEngine,
        options: &RenderOptions<'_>,
    ) -> Result<&Raster, RenderError> {
        self.base.begin_finalize()?;
        let source = self.source.as_ref().ok_or(RenderError::MissingImage)?;
        let resolution = options.force_resolution.unwrap_or(self.base.resolution);

        if self.base.is_deferred() {
            let size = self.base.target_pixel_size(options, resolution)?;
            self.base.create_canvas(engine, size)?;
        } else if let Some((width, height)) = options.force_pixel_size {
            self.base.resize_canvas(engine, width, height)?;
        }

        let canvas = self.base.canvas_mut()?;
        if canvas.width() == 0 || canvas.height() == 0 {
            debug!("image canvas {}x{} is empty, skipping source", canvas.width(), canvas.height());
            if self.base.is_deferred() {
                self.base.replay_queue()?;
            }
            return self.base.finish();
        }
        let placement = fit_geometry(source.dimensions(), canvas.dimensions(), self.fit);
        debug!(
            "image {}x{} -> {}x{} at ({}, {}) on {}x{} canvas",
            source.width(),
            source.height(),
            placement.width,
            placement.height,
            placement.x,
            placement.y,
            canvas.width(),
            canvas.height()
        );
        let scaled = engine.resize(source, placement.width, placement.height)?;
        engine.composite(canvas, &scaled, CompositeOptions::at(placement.x, placement.y))?;

        if self.base.is_deferred() {
            self.base.replay_queue()?;
        }
        self.base.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::Color;
    use quire_render::SoftwareEngine;

    const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);

    #[test]
    fn test_fit_wide_source() {
        let placement = fit_geometry((200, 100), (100, 100), FitMode::Fit);
        assert_eq!(
            placement,
            Placement {
                width: 100,
                height: 50,
                x: 0,
                y: 25
            }
        );
    }

    #[test]
    fn test_fit_tall_source() {
        let placement = fit_geometry((50, 100), (100, 100), FitMode::Fit);
        assert_eq!(
            placement,
            Placement {
                width: 50,
                height: 100,
                x: 25,
                y: 0
            }
        );
    }

    #[test]
    fn test_stretch_fills_canvas() {
        let placement = fit_geometry((50, 100), (80, 30), FitMode::Stretch);
        assert_eq!(
            placement,
            Placement {
                width: 80,
                height: 30,
                x: 0,
                y: 0
            }
        );
    }

    #[test]
    fn test_subpixel_size_renders_empty() {
        let engine = SoftwareEngine::new();
        // 0.1mm at 72ppi rounds to zero pixels.
        let mut image = Image::new(DVec2::ZERO, DVec2::new(0.1, 0.1), 72)
            .unwrap()
            .with_source(Raster::filled(4, 4, GREEN));
        let raster = image.finalize(&engine, &RenderOptions::default()).unwrap();
        assert_eq!(raster.dimensions(), (0, 0));

        let mut eager = Image::eager(DVec2::ZERO, DVec2::new(10.0, 10.0), 72)
            .unwrap()
            .with_source(Raster::filled(4, 4, GREEN));
        let raster = eager
            .finalize(&engine, &RenderOptions::new().with_pixel_size(0, 12))
            .unwrap();
        assert_eq!(raster.dimensions(), (0, 12));
    }

    #[test]
    fn test_missing_source() {
        let engine = SoftwareEngine::new();
        let mut image = Image::new(DVec2::ZERO, DVec2::new(10.0, 10.0), 72).unwrap();
        assert!(matches!(
            image.finalize(&engine, &RenderOptions::default()),
            Err(RenderError::MissingImage)
        ));
    }

    #[test]
    fn test_finalize_centers_source() {
        let engine = SoftwareEngine::new();
        let mut image = Image::new(DVec2::ZERO, DVec2::new(25.4, 25.4), 100)
            .unwrap()
            .with_source(Raster::filled(20, 10, GREEN));

        let raster = image.finalize(&engine, &RenderOptions::default()).unwrap();
        assert_eq!(raster.dimensions(), (100, 100));
        assert!(raster.pixel(50, 50).is_some_and(|p| p[3] > 250));
        assert_eq!(raster.pixel(50, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_queue_replays_over_image() {
        let engine = SoftwareEngine::new();
        let mut image = Image::new(DVec2::ZERO, DVec2::new(25.4, 25.4), 100)
            .unwrap()
            .with_source(Raster::filled(10, 10, GREEN))
            .with_fit(FitMode::Stretch);
        image
            .queue_mutate(|raster| {
                raster.fill_rect(0, 0, 1, 1, Color::BLACK);
                Ok(())
            })
            .unwrap();

        let raster = image.finalize(&engine, &RenderOptions::default()).unwrap();
        assert_eq!(raster.pixel(0, 0), Some([0, 0, 0, 255]));
        assert!(raster.pixel(99, 99).is_some_and(|p| p[1] > 250 && p[0] < 5));
    }

    #[test]
    fn test_eager_image_resized_to_forced_size() {
        let engine = SoftwareEngine::new();
        let mut image = Image::eager(DVec2::ZERO, DVec2::new(10.0, 10.0), 72)
            .unwrap()
            .with_source(Raster::filled(4, 4, GREEN));
        let raster = image
            .finalize(&engine, &RenderOptions::new().with_pixel_size(30, 30))
            .unwrap();
        assert_eq!(raster.dimensions(), (30, 30));
    }
}
