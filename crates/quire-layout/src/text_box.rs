//! Multi-line markup text wrapped into a rectangle.

use log::debug;
use quire_core::{units, ConfigError, DVec2, MarkupLine, RenderError, TextDefaults};
use quire_render::{CompositeOptions, Raster, RasterEngine};

use crate::flow::TextFlow;
use crate::object::{ObjectBase, RenderOptions, Visual};

/// Vertical gap between output lines, in millimeters.
pub const LINE_GAP_MM: f64 = 2.0;

/// A box of wrapped, styled text.
#[derive(Debug)]
pub struct TextBox {
    base: ObjectBase,
    defaults: TextDefaults,
    lines: Vec<MarkupLine>,
}

impl TextBox {
    pub fn new(position_mm: DVec2, size_mm: DVec2, resolution: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            base: ObjectBase::deferred(position_mm, size_mm, resolution)?,
            defaults: TextDefaults::default(),
            lines: Vec::new(),
        })
    }

    pub fn with_defaults(mut self, defaults: TextDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &TextDefaults {
        &self.defaults
    }

    /// Append an already parsed markup line.
    pub fn push_line(&mut self, line: MarkupLine) {
        self.lines.push(line);
    }

    /// Parse and append markup text, one markup line per text line.
    pub fn push_markup(&mut self, text: &str) {
        self.lines.extend(quire_markup::parse_lines(text));
    }

    pub fn lines(&self) -> &[MarkupLine] {
        &self.lines
    }
}

impl Visual for TextBox {
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
        let resolution = options.inherited_resolution(self.base.resolution);
        let size = self.base.target_pixel_size(options, resolution)?;
        self.base.create_canvas(engine, size)?;
        self.base.resolution = resolution;
        self.base.size_mm = units::size_to_mm(size.0, size.1, resolution);

        let width_mm = self.base.size_mm.x;
        let line_gap = units::mm_to_px(LINE_GAP_MM, resolution);
        let flow = TextFlow::new(engine, &self.defaults, resolution);
        let canvas = self.base.canvas_mut()?;

        let mut y: i64 = 0;
        for markup in &self.lines {
            for line in flow.wrap(markup, width_mm)? {
                let mut x: i64 = 0;
                let mut tallest: u32 = 0;
                for run in &line {
                    let Some(label) = run.image() else {
                        continue;
                    };
                    engine.composite(canvas, label, CompositeOptions::at(x, y))?;
                    x += label.width() as i64;
                    tallest = tallest.max(label.height());
                }
                if !line.is_empty() {
                    y += tallest as i64 + line_gap;
                }
            }
        }
        debug!(
            "text box: {} markup lines in {}x{}px, {}px used",
            self.lines.len(),
            size.0,
            size.1,
            y
        );

        self.base.replay_queue()?;
        self.base.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::Color;
    use quire_render::SoftwareEngine;

    fn ink_rows(raster: &Raster) -> Vec<u32> {
        (0..raster.height())
            .filter(|&y| (0..raster.width()).any(|x| raster.pixel(x, y).is_some_and(|p| p[3] > 0)))
            .collect()
    }

    #[test]
    fn test_finalize_at_own_size() {
        let engine = SoftwareEngine::new();
        let mut text = TextBox::new(DVec2::ZERO, DVec2::new(50.0, 20.0), 72).unwrap();
        text.push_markup("hello");

        let raster = text.finalize(&engine, &RenderOptions::default()).unwrap();
        assert_eq!(raster.dimensions(), (142, 57));
        assert!(!ink_rows(raster).is_empty());
    }

    #[test]
    fn test_forced_size_updates_mm() {
        let engine = SoftwareEngine::new();
        let mut text = TextBox::new(DVec2::ZERO, DVec2::new(50.0, 20.0), 72).unwrap();
        text.push_markup("hello");

        text.finalize(&engine, &RenderOptions::new().with_pixel_size(72, 72))
            .unwrap();
        let size = text.size_mm();
        assert!((size.x - 25.4).abs() < 1e-3);
        assert!((size.y - 25.4).abs() < 1e-3);
    }

    #[test]
    fn test_wrapped_lines_stack_with_gap() {
        let engine = SoftwareEngine::new();
        let mut text = TextBox::new(DVec2::ZERO, DVec2::new(20.0, 40.0), 72).unwrap();
        // 20mm holds 8 characters: two words land on separate lines.
        text.push_markup("aaaaaa bbbbbb");

        let raster = text.finalize(&engine, &RenderOptions::default()).unwrap();
        let rows = ink_rows(raster);
        // Line height 15px plus a 6px gap puts the second line at y = 21.
        assert!(rows.iter().any(|&y| y < 15));
        assert!(rows.iter().any(|&y| (21..36).contains(&y)));
        assert!(rows.iter().all(|&y| y < 36));
    }

    #[test]
    fn test_empty_markup_line_does_not_advance() {
        let engine = SoftwareEngine::new();
        let mut text = TextBox::new(DVec2::ZERO, DVec2::new(50.0, 40.0), 72).unwrap();
        text.push_markup("\nA");

        let raster = text.finalize(&engine, &RenderOptions::default()).unwrap();
        let rows = ink_rows(raster);
        assert_eq!(rows.first(), Some(&2));
    }

    #[test]
    fn test_markup_colors_apply() {
        let engine = SoftwareEngine::new();
        let mut text = TextBox::new(DVec2::ZERO, DVec2::new(50.0, 20.0), 72)
            .unwrap()
            .with_defaults(TextDefaults {
                color: Color::rgb(0.0, 0.0, 1.0),
                ..TextDefaults::default()
            });
        text.push_markup("^(c,#ff0000)A^(r) B");

        let raster = text.finalize(&engine, &RenderOptions::default()).unwrap();
        // Ink boxes start one fifth of the 7px advance in.
        assert_eq!(raster.pixel(3, 8), Some([255, 0, 0, 255]));
        assert_eq!(raster.pixel(17, 8), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_unsized_box_without_parent_fails() {
        let engine = SoftwareEngine::new();
        let mut text = TextBox::new(DVec2::ZERO, DVec2::new(-5.0, 20.0), 72).unwrap();
        assert!(matches!(
            text.finalize(&engine, &RenderOptions::default()),
            Err(RenderError::Config(ConfigError::UnresolvedSize { .. }))
        ));
    }
}
