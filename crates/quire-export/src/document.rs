//! Documents: ordered pages rendered and assembled into one output file.

use std::path::{Path, PathBuf};

use log::{debug, info};
use quire_core::{Color, ExportError};
use quire_layout::{Page, RenderOptions, Visual};
use quire_render::RasterEngine;

use crate::png::{self, PngOptions};

/// Turns an ordered list of page images into one paginated file.
pub trait DocumentAssembler {
    /// Assemble `pages` (PNG files, in order) at `resolution` into `output`.
    fn assemble(&self, pages: &[PathBuf], resolution: u32, output: &Path)
        -> Result<(), ExportError>;
}

/// Document write options.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Debug border color drawn around every page child
    pub border_color: Option<Color>,
    /// Prefix for the transient page directory and output file
    pub temp_prefix: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            border_color: None,
            temp_prefix: ".quire-".to_string(),
        }
    }
}

impl WriteOptions {
    pub fn with_debug_borders(mut self) -> Self {
        self.border_color = Some(Color::DEBUG_BORDER);
        self
    }
}

/// An ordered sequence of pages.
#[derive(Debug, Default)]
pub struct Document {
    pages: Vec<Page>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    pub fn add_page(&mut self, page: Page) -> &mut Self {
        self.pages.push(page);
        self
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Highest page resolution; the document is assembled at this density.
    pub fn max_resolution(&self) -> Option<u32> {
        self.pages.iter().map(Visual::resolution).max()
    }

    /// Render every page and assemble them into `output`.
    ///
    /// Either the output file is fully written or it is left untouched:
    /// pages go to a temporary directory that is always removed, and the
    /// assembled file is renamed into place only on success.
    pub fn write(
        &mut self,
        output: impl AsRef<Path>,
        engine: &dyn RasterEngine,
        assembler: &dyn DocumentAssembler,
        options: &WriteOptions,
    ) -> Result<(), ExportError> {
        let output = output.as_ref();
        let resolution = self.max_resolution().ok_or(ExportError::EmptyDocument)?;

        let scratch = tempfile::Builder::new()
            .prefix(&options.temp_prefix)
            .tempdir()?;
        let page_files = self.render_pages(engine, scratch.path(), options)?;

        let parent = match output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let suffix = output
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let staged = tempfile::Builder::new()
            .prefix(&options.temp_prefix)
            .suffix(&suffix)
            .tempfile_in(parent)?;

        assembler.assemble(&page_files, resolution, staged.path())?;
        staged.persist(output).map_err(|e| ExportError::Io(e.error))?;

        info!(
            "wrote {} pages at {}ppi to {}",
            page_files.len(),
            resolution,
            output.display()
        );
        Ok(())
    }

    /// Render each page in order into `dir` as numbered PNG files.
    pub fn render_pages(
        &mut self,
        engine: &dyn RasterEngine,
        dir: &Path,
        options: &WriteOptions,
    ) -> Result<Vec<PathBuf>, ExportError> {
        let render_options = RenderOptions {
            border_color: options.border_color,
            ..RenderOptions::default()
        };

        let mut files = Vec::with_capacity(self.pages.len());
        for (index, page) in self.pages.iter_mut().enumerate() {
            let raster = page
                .finalize(engine, &render_options)
                .map_err(|source| ExportError::PageFailed { index, source })?;

            let path = dir.join(format!("page-{:04}.png", index));
            png::write(raster, &path, &PngOptions::default())?;
            debug!(
                "page {} rendered {}x{} to {}",
                index,
                raster.width(),
                raster.height(),
                path.display()
            );
            files.push(path);
        }
        Ok(files)
    }
}
