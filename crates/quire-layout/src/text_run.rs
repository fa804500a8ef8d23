//! Single-line styled text.

use log::warn;
use quire_core::markup::{TAG_BOLD, TAG_COLOR, TAG_FONT, TAG_ITALIC, TAG_SIZE, TAG_UNDERLINE};
use quire_core::{
    units, Attribute, Attributes, Color, DVec2, MarkupSegment, RenderError, TextDefaults,
};
use quire_render::{LabelRequest, Raster, RasterEngine};

use crate::object::{ObjectBase, RenderOptions, Visual};

/// Resolution of a text run rendered outside any parent.
pub const DEFAULT_TEXT_RESOLUTION: u32 = 72;

/// Non-breaking space, rendered in place of whitespace-only text so the
/// label keeps its advance.
const NBSP: &str = "\u{a0}";

/// One line of text in a single style.
///
/// The run's size is unknown until it is rendered; finalization sets it
/// from the rendered label.
#[derive(Debug)]
pub struct TextRun {
    base: ObjectBase,
    text: String,
    font: String,
    size: f64,
    color: Color,
    attributes: Attributes,
}

impl TextRun {
    /// Create an unstyled run in the default font, size and color.
    pub fn new(position_mm: DVec2, text: impl Into<String>, defaults: &TextDefaults) -> Self {
        Self {
            base: Self::base_at(position_mm),
            text: text.into(),
            font: defaults.font.clone(),
            size: defaults.size,
            color: defaults.color,
            attributes: Attributes::new(),
        }
    }

    /// Create a run styled by a markup segment's open tags.
    ///
    /// Unparseable size or color parameters fall back to the defaults.
    pub fn from_segment(
        position_mm: DVec2,
        segment: &MarkupSegment,
        defaults: &TextDefaults,
    ) -> Self {
        let mut run = Self::new(position_mm, segment.word.clone(), defaults);

        if let Some(font) = segment.param(TAG_FONT) {
            run.font = font.to_string();
        }
        if let Some(value) = segment.param(TAG_SIZE) {
            match value.trim().parse::<f64>() {
                Ok(size) if size > 0.0 && size.is_finite() => run.size = size,
                _ => warn!("ignoring invalid text size {:?}", value),
            }
        }
        if let Some(value) = segment.param(TAG_COLOR) {
            match Color::parse(value.trim()) {
                Some(color) => run.color = color,
                None => warn!("ignoring invalid text color {:?}", value),
            }
        }

        for (tag, attribute) in [
            (TAG_BOLD, Attribute::Bold),
            (TAG_ITALIC, Attribute::Italic),
            (TAG_UNDERLINE, Attribute::Underline),
        ] {
            if segment.has_tag(tag) {
                run.attributes.push(attribute);
            }
        }
        run
    }

    fn base_at(position_mm: DVec2) -> ObjectBase {
        ObjectBase::self_sized(position_mm, DEFAULT_TEXT_RESOLUTION)
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        if !self.attributes.contains(&attribute) {
            self.attributes.push(attribute);
        }
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn has_attribute(&self, attribute: Attribute) -> bool {
        self.attributes.contains(&attribute)
    }

    /// Move the run; used when a wrapped line is laid out.
    pub fn set_position_mm(&mut self, position_mm: DVec2) {
        self.base.position_mm = position_mm;
    }

    /// Font name with style suffixes: `-Bold`, then `-Oblique`.
    pub fn effective_font(&self) -> String {
        let mut font = self.font.clone();
        if self.has_attribute(Attribute::Bold) {
            font.push_str("-Bold");
        }
        if self.has_attribute(Attribute::Italic) {
            font.push_str("-Oblique");
        }
        font
    }

    /// Same text and style as `self`, with different text.
    pub(crate) fn restyled(&self, text: impl Into<String>) -> Self {
        Self {
            base: Self::base_at(self.base.position_mm),
            text: text.into(),
            font: self.font.clone(),
            size: self.size,
            color: self.color,
            attributes: self.attributes.clone(),
        }
    }
}

impl Visual for TextRun {
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

        let text = if self.text.trim().is_empty() {
            NBSP
        } else {
            self.text.as_str()
        };
        let font = self.effective_font();
        let mut label = engine.render_label(&LabelRequest {
            text,
            font: &font,
            size: self.size,
            color: self.color,
            resolution,
        })?;

        if self.has_attribute(Attribute::Underline) {
            let band = label.height() / 15;
            label.extend_bottom(band, self.color);
        }

        self.base.resolution = resolution;
        self.base.size_mm = units::size_to_mm(label.width(), label.height(), resolution);
        self.base.set_canvas(label);
        self.base.replay_queue()?;
        self.base.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::TagMap;
    use quire_render::SoftwareEngine;

    fn segment(word: &str, tags: &[(&str, Option<&str>)]) -> MarkupSegment {
        let mut map = TagMap::new();
        for (name, param) in tags {
            map.insert(name.to_string(), param.iter().map(|p| p.to_string()).collect());
        }
        MarkupSegment::new(word, map)
    }

    #[test]
    fn test_effective_font_suffixes() {
        let defaults = TextDefaults::default();
        let run = TextRun::new(DVec2::ZERO, "x", &defaults)
            .with_attribute(Attribute::Italic)
            .with_attribute(Attribute::Bold);
        assert_eq!(run.effective_font(), "DejaVu-Sans-Bold-Oblique");
        assert_eq!(
            TextRun::new(DVec2::ZERO, "x", &defaults).effective_font(),
            "DejaVu-Sans"
        );
    }

    #[test]
    fn test_from_segment_styles() {
        let defaults = TextDefaults::default();
        let seg = segment(
            "hi",
            &[
                ("b", None),
                ("c", Some("#ff0000")),
                ("s", Some("18")),
                ("f", Some("Mono")),
            ],
        );
        let run = TextRun::from_segment(DVec2::ZERO, &seg, &defaults);

        assert_eq!(run.font(), "Mono");
        assert_eq!(run.size(), 18.0);
        assert_eq!(run.color(), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(run.attributes(), &[Attribute::Bold]);
        assert_eq!(run.effective_font(), "Mono-Bold");
    }

    #[test]
    fn test_invalid_params_fall_back() {
        let defaults = TextDefaults::default();
        let seg = segment("hi", &[("s", Some("big")), ("c", Some("nope"))]);
        let run = TextRun::from_segment(DVec2::ZERO, &seg, &defaults);
        assert_eq!(run.size(), 12.0);
        assert_eq!(run.color(), Color::BLACK);
    }

    #[test]
    fn test_finalize_sets_size() {
        let engine = SoftwareEngine::new();
        let mut run = TextRun::new(DVec2::ZERO, "hello", &TextDefaults::default());
        let raster = run.finalize(&engine, &RenderOptions::default()).unwrap();
        assert_eq!(raster.dimensions(), (35, 15));

        let size = run.size_mm();
        assert!((size.x - units::px_to_mm(35.0, 72)).abs() < 1e-9);
        assert!((size.y - units::px_to_mm(15.0, 72)).abs() < 1e-9);
    }

    #[test]
    fn test_underline_extends_height() {
        let engine = SoftwareEngine::new();
        let mut run = TextRun::new(DVec2::ZERO, "hello", &TextDefaults::default())
            .with_attribute(Attribute::Underline);
        let raster = run.finalize(&engine, &RenderOptions::default()).unwrap();
        assert_eq!(raster.dimensions(), (35, 16));
        assert_eq!(raster.pixel(0, 15), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_whitespace_renders_blank_advance() {
        let engine = SoftwareEngine::new();
        let mut run = TextRun::new(DVec2::ZERO, " ", &TextDefaults::default());
        let raster = run.finalize(&engine, &RenderOptions::default()).unwrap();
        assert_eq!(raster.dimensions(), (7, 15));
        assert!(raster.as_image().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_context_resolution_wins_over_own() {
        use crate::object::RenderContext;

        let engine = SoftwareEngine::new();
        let ctx = RenderContext {
            resolution: 144,
            size_mm: DVec2::new(100.0, 100.0),
        };
        let mut run = TextRun::new(DVec2::ZERO, "ab", &TextDefaults::default());
        let raster = run
            .finalize(&engine, &RenderOptions::new().with_context(&ctx))
            .unwrap();
        // 12pt at 144ppi: advance 14, height ceil(28.8) = 29
        assert_eq!(raster.dimensions(), (28, 29));
        assert_eq!(run.resolution(), 144);
    }
}
