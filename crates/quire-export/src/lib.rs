//! Document output for Quire.
//!
//! A [`Document`] renders its pages in order, writes each one as a PNG to a
//! temporary directory, and hands the files to a [`DocumentAssembler`]:
//!
//! - [`PdfAssembler`] - built-in PDF writer (feature `pdf`, default on)
//! - [`MagickAssembler`] - the ImageMagick command line
//!
//! Documents can also be described declaratively as JSON manifests
//! (feature `manifest`, default on).

pub mod document;
pub mod magick;
#[cfg(feature = "manifest")]
pub mod manifest;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod png;

#[cfg(feature = "pdf")]
use std::path::Path;

#[cfg(feature = "pdf")]
use quire_core::ExportError;
#[cfg(feature = "pdf")]
use quire_render::RasterEngine;

pub use document::{Document, DocumentAssembler, WriteOptions};
pub use magick::MagickAssembler;
#[cfg(feature = "manifest")]
pub use manifest::{ElementSpec, Manifest, PageSpec, StyleSpec};
#[cfg(feature = "pdf")]
pub use pdf::{PdfAssembler, PdfOptions};
pub use png::PngOptions;

/// Render `document` and write it as a PDF with default options.
#[cfg(feature = "pdf")]
pub fn write_pdf(
    document: &mut Document,
    output: impl AsRef<Path>,
    engine: &dyn RasterEngine,
) -> Result<(), ExportError> {
    document.write(
        output,
        engine,
        &PdfAssembler::default(),
        &WriteOptions::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::DVec2;
    use quire_layout::{Page, TextBox};
    use quire_render::SoftwareEngine;

    #[test]
    #[cfg(feature = "pdf")]
    fn test_write_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let mut page = Page::new(DVec2::new(60.0, 40.0), 100).unwrap();
        let mut text = TextBox::new(DVec2::new(5.0, 5.0), DVec2::new(-10.0, -10.0), 100).unwrap();
        text.push_markup("^(i)quire^(i) writes ^(u)pages^(u)");
        page.add(text);
        let mut document = Document::with_pages(vec![page]);

        let output = dir.path().join("out.pdf");
        write_pdf(&mut document, &output, &SoftwareEngine::new()).unwrap();
        assert!(std::fs::read(&output).unwrap().starts_with(b"%PDF-"));
    }
}
