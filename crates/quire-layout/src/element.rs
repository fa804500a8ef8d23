//! The closed set of visual objects a page can hold.

use quire_core::RenderError;
use quire_render::{Raster, RasterEngine};

use crate::image::Image;
use crate::object::{ObjectBase, RenderOptions, Visual};
use crate::page::Page;
use crate::text_box::TextBox;
use crate::text_run::TextRun;

/// Any visual object.
#[derive(Debug)]
pub enum Element {
    Page(Page),
    Image(Image),
    TextBox(TextBox),
    TextRun(TextRun),
}

impl Element {
    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Page(_) => "page",
            Element::Image(_) => "image",
            Element::TextBox(_) => "text_box",
            Element::TextRun(_) => "text_run",
        }
    }
}

impl Visual for Element {
    fn base(&self) -> &ObjectBase {
        match self {
            Element::Page(page) => page.base(),
            Element::Image(image) => image.base(),
            Element::TextBox(text) => text.base(),
            Element::TextRun(run) => run.base(),
        }
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        match self {
            Element::Page(page) => page.base_mut(),
            Element::Image(image) => image.base_mut(),
            Element::TextBox(text) => text.base_mut(),
            Element::TextRun(run) => run.base_mut(),
        }
    }

    fn finalize(
        &mut self,
        engine: &dyn RasterEngine,
        options: &RenderOptions<'_>,
    ) -> Result<&Raster, RenderError> {
        match self {
            Element::Page(page) => page.finalize(engine, options),
            Element::Image(image) => image.finalize(engine, options),
            Element::TextBox(text) => text.finalize(engine, options),
            Element::TextRun(run) => run.finalize(engine, options),
        }
    }
}

impl From<Page> for Element {
    fn from(page: Page) -> Self {
        Element::Page(page)
    }
}

impl From<Image> for Element {
    fn from(image: Image) -> Self {
        Element::Image(image)
    }
}

impl From<TextBox> for Element {
    fn from(text: TextBox) -> Self {
        Element::TextBox(text)
    }
}

impl From<TextRun> for Element {
    fn from(run: TextRun) -> Self {
        Element::TextRun(run)
    }
}
