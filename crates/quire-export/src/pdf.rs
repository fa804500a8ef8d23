//! PDF assembly using pdf-writer.
//!
//! Every page becomes one full-bleed image: an RGB image XObject with a
//! grayscale soft mask for its alpha channel, both Flate-compressed.

use std::path::{Path, PathBuf};

use log::debug;
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};
use quire_core::ExportError;
use quire_render::Raster;

use crate::document::DocumentAssembler;

const POINTS_PER_INCH: f32 = 72.0;
const IMAGE_NAME: Name<'static> = Name(b"Im1");

/// PDF export options.
#[derive(Debug, Clone)]
pub struct PdfOptions {
    /// zlib compression level for image streams, 0 to 10
    pub compression_level: u8,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            compression_level: 6,
        }
    }
}

/// Assembles page images into a PDF without external tools.
#[derive(Debug, Clone, Default)]
pub struct PdfAssembler {
    pub options: PdfOptions,
}

impl PdfAssembler {
    pub fn new(options: PdfOptions) -> Self {
        Self { options }
    }
}

impl DocumentAssembler for PdfAssembler {
    fn assemble(
        &self,
        pages: &[PathBuf],
        resolution: u32,
        output: &Path,
    ) -> Result<(), ExportError> {
        let rasters = pages
            .iter()
            .map(Raster::open)
            .collect::<Result<Vec<_>, _>>()?;
        let bytes = encode(&rasters, resolution, &self.options)?;
        std::fs::write(output, bytes)?;
        Ok(())
    }
}

/// Encode rasters as a PDF, one page per raster.
///
/// Page sizes follow from pixel dimensions at `resolution`.
pub fn encode(
    pages: &[Raster],
    resolution: u32,
    options: &PdfOptions,
) -> Result<Vec<u8>, ExportError> {
    if pages.is_empty() {
        return Err(ExportError::EmptyDocument);
    }
    if resolution == 0 {
        return Err(ExportError::EncodeFailed {
            reason: "resolution must be positive".to_string(),
        });
    }

    let mut pdf = Pdf::new();
    let mut next = Ref::new(1);
    let catalog_id = next.bump();
    let page_tree_id = next.bump();

    let mut page_ids = Vec::with_capacity(pages.len());
    for raster in pages {
        let page_id = next.bump();
        let content_id = next.bump();
        let image_id = next.bump();
        let mask_id = next.bump();
        page_ids.push(page_id);

        let (width, height) = raster.dimensions();
        let width_pt = width as f32 / resolution as f32 * POINTS_PER_INCH;
        let height_pt = height as f32 / resolution as f32 * POINTS_PER_INCH;

        let pixels = raster.as_image();
        let rgb: Vec<u8> = pixels
            .pixels()
            .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
            .collect();
        let alpha: Vec<u8> = pixels.pixels().map(|p| p.0[3]).collect();
        let rgb = compress_to_vec_zlib(&rgb, options.compression_level);
        let alpha = compress_to_vec_zlib(&alpha, options.compression_level);

        {
            let mut mask = pdf.image_xobject(mask_id, &alpha);
            mask.filter(Filter::FlateDecode);
            mask.width(width as i32);
            mask.height(height as i32);
            mask.color_space().device_gray();
            mask.bits_per_component(8);
        }
        {
            let mut image = pdf.image_xobject(image_id, &rgb);
            image.filter(Filter::FlateDecode);
            image.width(width as i32);
            image.height(height as i32);
            image.color_space().device_rgb();
            image.bits_per_component(8);
            image.s_mask(mask_id);
        }

        let mut content = Content::new();
        content.save_state();
        content.transform([width_pt, 0.0, 0.0, height_pt, 0.0, 0.0]);
        content.x_object(IMAGE_NAME);
        content.restore_state();
        pdf.stream(content_id, &content.finish());

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, width_pt, height_pt));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources().x_objects().pair(IMAGE_NAME, image_id);
        page.finish();

        debug!(
            "pdf page {}x{}px -> {:.1}x{:.1}pt",
            width, height, width_pt, height_pt
        );
    }

    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    Ok(pdf.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::Color;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn test_encode_pages() {
        let pages = vec![
            Raster::filled(144, 72, Color::WHITE),
            Raster::filled(72, 72, Color::BLACK),
        ];
        let bytes = encode(&pages, 72, &PdfOptions::default()).unwrap();

        assert!(bytes.starts_with(b"%PDF-"));
        // Two pages plus the page tree.
        assert_eq!(count(&bytes, b"/Type /Page"), 3);
        assert!(contains(&bytes, b"/Count 2"));
        assert!(contains(&bytes, b"/FlateDecode"));
        assert!(contains(&bytes, b"/SMask"));
        assert_eq!(count(&bytes, b"/MediaBox"), 2);
    }

    #[test]
    fn test_encode_empty_fails() {
        assert!(matches!(
            encode(&[], 72, &PdfOptions::default()),
            Err(ExportError::EmptyDocument)
        ));
    }

    #[test]
    fn test_assembler_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("page.png");
        crate::png::write(&Raster::new(10, 10), &page, &Default::default()).unwrap();

        let output = dir.path().join("out.pdf");
        PdfAssembler::default()
            .assemble(&[page], 300, &output)
            .unwrap();
        let bytes = std::fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
