//! Deterministic software raster engine.
//!
//! Labels are drawn with fixed-advance block glyphs: every character
//! occupies the same advance, and printable characters get a solid ink box.
//! This gives exact, font-independent metrics.

use log::trace;
use quire_core::{Color, EngineError};

use crate::engine::{LabelRequest, RasterEngine};
use crate::raster::Raster;

/// Points per inch.
const POINTS_PER_INCH: f64 = 72.0;

/// Software raster engine with block glyphs.
#[derive(Debug, Clone)]
pub struct SoftwareEngine {
    /// Glyph advance as a fraction of the em size
    pub advance_ratio: f64,
    /// Label height as a fraction of the em size
    pub line_height_ratio: f64,
}

impl Default for SoftwareEngine {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            line_height_ratio: 1.2,
        }
    }
}

impl SoftwareEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Em size in pixels for a point size at a resolution.
    fn em_px(size: f64, resolution: u32) -> f64 {
        size * resolution as f64 / POINTS_PER_INCH
    }

    /// Per-character advance in pixels.
    pub fn advance_px(&self, size: f64, resolution: u32) -> u32 {
        ((Self::em_px(size, resolution) * self.advance_ratio).round() as u32).max(1)
    }

    /// Label height in pixels.
    pub fn line_height_px(&self, size: f64, resolution: u32) -> u32 {
        ((Self::em_px(size, resolution) * self.line_height_ratio).ceil() as u32).max(1)
    }

    fn draw_glyph(
        raster: &mut Raster,
        c: char,
        x: i64,
        advance: u32,
        height: u32,
        bold: bool,
        color: Color,
    ) {
        if c.is_whitespace() || c.is_control() {
            return;
        }

        let inset = if bold { advance / 10 } else { advance / 5 };
        let ink_width = advance.saturating_sub(inset * 2).max(1);
        let h = height as f64;
        let (top, bottom) = match c {
            '-' | '\u{2010}' | '\u{2013}' | '\u{2014}' => (h * 0.45, h * 0.55),
            '.' | ',' | ':' | ';' => (h * 0.65, h * 0.8),
            '\'' | '"' | '^' | '`' => (h * 0.15, h * 0.35),
            c if c.is_uppercase() || c.is_ascii_digit() => (h * 0.15, h * 0.8),
            _ => (h * 0.35, h * 0.8),
        };
        let top = top.floor() as i64;
        let rows = ((bottom.ceil() as i64) - top).max(1) as u32;
        raster.fill_rect(x + inset as i64, top, ink_width, rows, color);
    }
}

impl RasterEngine for SoftwareEngine {
    fn render_label(&self, request: &LabelRequest<'_>) -> Result<Raster, EngineError> {
        let chars = request.text.chars().count() as u32;
        if chars == 0 {
            return Err(EngineError::LabelFailed {
                text: request.text.to_string(),
                reason: "empty label".to_string(),
            });
        }
        if request.resolution == 0 || !(request.size > 0.0) {
            return Err(EngineError::LabelFailed {
                text: request.text.to_string(),
                reason: format!(
                    "invalid size {} at {} ppi",
                    request.size, request.resolution
                ),
            });
        }

        let advance = self.advance_px(request.size, request.resolution);
        let height = self.line_height_px(request.size, request.resolution);
        let bold = request.font.contains("-Bold");

        let mut raster = Raster::new(advance * chars, height);
        for (i, c) in request.text.chars().enumerate() {
            let x = i as i64 * advance as i64;
            Self::draw_glyph(&mut raster, c, x, advance, height, bold, request.color);
        }

        trace!(
            "label {:?} in {} at {}pt/{}ppi -> {}x{}",
            request.text,
            request.font,
            request.size,
            request.resolution,
            raster.width(),
            raster.height()
        );
        Ok(raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> LabelRequest<'_> {
        LabelRequest {
            text,
            font: "DejaVu-Sans",
            size: 12.0,
            color: Color::BLACK,
            resolution: 72,
        }
    }

    #[test]
    fn test_metrics() {
        let engine = SoftwareEngine::new();
        assert_eq!(engine.advance_px(12.0, 72), 7);
        assert_eq!(engine.line_height_px(12.0, 72), 15);
        assert_eq!(engine.advance_px(12.0, 300), 30);
    }

    #[test]
    fn test_label_size_is_per_character() {
        let engine = SoftwareEngine::new();
        let label = engine.render_label(&request("hello")).unwrap();
        assert_eq!(label.dimensions(), (35, 15));
    }

    #[test]
    fn test_label_draws_ink() {
        let engine = SoftwareEngine::new();
        let label = engine.render_label(&request("H")).unwrap();
        assert_eq!(label.pixel(3, 7), Some([0, 0, 0, 255]));
        // Corners stay transparent
        assert_eq!(label.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_space_has_width_but_no_ink() {
        let engine = SoftwareEngine::new();
        let label = engine.render_label(&request("\u{a0}")).unwrap();
        assert_eq!(label.dimensions(), (7, 15));
        assert!(label.as_image().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_empty_label_fails() {
        let engine = SoftwareEngine::new();
        assert!(engine.render_label(&request("")).is_err());
    }

    #[test]
    fn test_default_resize() {
        let engine = SoftwareEngine::new();
        let raster = Raster::filled(4, 4, Color::BLACK);
        let resized = engine.resize(&raster, 8, 2).unwrap();
        assert_eq!(resized.dimensions(), (8, 2));
        assert!(engine.resize(&raster, 0, 2).is_err());
    }
}
