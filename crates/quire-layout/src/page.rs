//! Pages: a canvas composed from child objects in insertion order.

use log::debug;
use quire_core::{units, ConfigError, DVec2, RenderError};
use quire_render::{CompositeOptions, Raster, RasterEngine};

use crate::element::Element;
use crate::object::{ObjectBase, RenderContext, RenderOptions, Visual};

/// Width of the debug border drawn around page children, in millimeters.
pub const BORDER_WIDTH_MM: f64 = 0.5;

/// Resolve a child size against its page: negative components are
/// page-relative.
pub fn resolve_child_size(page_mm: DVec2, child_mm: DVec2) -> DVec2 {
    let resolve = |page: f64, child: f64| if child < 0.0 { page + child } else { child };
    DVec2::new(resolve(page_mm.x, child_mm.x), resolve(page_mm.y, child_mm.y))
}

/// Pixel size a page forces on a child, if any.
///
/// A child with a zero size component sizes itself. A child whose size
/// resolves to a non-positive extent is rejected.
pub fn child_pixel_size(
    page_mm: DVec2,
    child_mm: DVec2,
    resolution: u32,
) -> Result<Option<(u32, u32)>, ConfigError> {
    if child_mm.x == 0.0 || child_mm.y == 0.0 {
        return Ok(None);
    }
    let resolved = resolve_child_size(page_mm, child_mm);
    if !(resolved.x > 0.0 && resolved.y > 0.0) {
        return Err(ConfigError::UnresolvedSize {
            width: resolved.x,
            height: resolved.y,
        });
    }
    Ok(Some(units::size_to_px(resolved, resolution)))
}

/// A page: the root of a composition.
#[derive(Debug)]
pub struct Page {
    base: ObjectBase,
    children: Vec<Element>,
}

impl Page {
    /// Create an empty page. Page sizes must be positive.
    pub fn new(size_mm: DVec2, resolution: u32) -> Result<Self, ConfigError> {
        if !(size_mm.x > 0.0 && size_mm.y > 0.0) {
            return Err(ConfigError::InvalidPageSize {
                width: size_mm.x,
                height: size_mm.y,
            });
        }
        Ok(Self {
            base: ObjectBase::deferred(DVec2::ZERO, size_mm, resolution)?,
            children: Vec::new(),
        })
    }

    /// Place this page somewhere other than the origin when it is nested.
    pub fn with_position(mut self, position_mm: DVec2) -> Self {
        self.base.position_mm = position_mm;
        self
    }

    /// Append a child. Later children paint over earlier ones.
    pub fn add(&mut self, child: impl Into<Element>) -> &mut Self {
        self.children.push(child.into());
        self
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Element] {
        &mut self.children
    }
}

impl Visual for Page {
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
        // A nested page lays out in its parent's pixel domain.
        let resolution = options.inherited_resolution(self.base.resolution);
        let size = self.base.target_pixel_size(options, resolution)?;
        self.base.create_canvas(engine, size)?;
        self.base.replay_queue()?;

        let context = RenderContext {
            resolution,
            size_mm: self.base.size_mm,
        };
        let border = options
            .border_color
            .map(|color| (units::mm_to_px(BORDER_WIDTH_MM, resolution).max(0) as u32, color));

        debug!(
            "page {}x{}px at {}ppi with {} children",
            size.0,
            size.1,
            resolution,
            self.children.len()
        );

        let canvas = self.base.canvas_mut()?;
        for (index, child) in self.children.iter_mut().enumerate() {
            let pixel_size = child_pixel_size(context.size_mm, child.size_mm(), resolution)?;
            let (x, y) = units::position_to_px(child.position_mm(), resolution);
            let kind = child.kind();
            child.finalize(engine, &options.for_child(&context, pixel_size))?;

            let Some(image) = child.base_mut().image_mut() else {
                return Err(RenderError::NoCanvas);
            };
            if let Some((thickness, color)) = border {
                image.draw_border(thickness, color);
            }
            debug!(
                "child {} ({}) {}x{}px at ({}, {})",
                index,
                kind,
                image.width(),
                image.height(),
                x,
                y
            );
            engine.composite(canvas, image, CompositeOptions::at(x, y))?;
        }

        self.base.finish()
    }
}
