//! Declarative JSON document descriptions.
//!
//! ```json
//! {
//!   "pages": [{
//!     "size": [210, 297],
//!     "resolution": 300,
//!     "children": [
//!       { "kind": "image", "position": [10, 10], "size": [50, 40], "path": "logo.png" },
//!       { "kind": "text_box", "position": [10, 60], "size": [-20, -70],
//!         "lines": ["^(b)Title^(b)", "Body text"] }
//!     ]
//!   }]
//! }
//! ```
//!
//! Sizes and positions are millimeters. Image paths are relative to the
//! manifest's directory.

use std::path::{Path, PathBuf};

use quire_core::{Attribute, Color, ConfigError, DVec2, ExportError, FitMode, TextDefaults};
use quire_layout::{Element, Image, Page, TextBox, TextRun};
use serde::{Deserialize, Serialize};

use crate::document::Document;

/// A whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub pages: Vec<PageSpec>,
}

/// One page and its children, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageSpec {
    #[serde(default = "a4")]
    pub size: [f64; 2],
    pub resolution: u32,
    #[serde(default)]
    pub children: Vec<ElementSpec>,
}

fn a4() -> [f64; 2] {
    quire_core::PAGE_SIZE_A4.to_array()
}

/// Text style overrides; unset fields use the text defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleSpec {
    pub font: Option<String>,
    pub size: Option<f64>,
    pub color: Option<String>,
}

/// A page child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementSpec {
    Image {
        position: [f64; 2],
        size: [f64; 2],
        path: PathBuf,
        #[serde(default)]
        fit: FitMode,
        #[serde(default)]
        resolution: Option<u32>,
    },
    TextBox {
        position: [f64; 2],
        size: [f64; 2],
        /// Markup lines
        #[serde(default)]
        lines: Vec<String>,
        /// Markdown source, appended after `lines`
        #[serde(default)]
        markdown: Option<String>,
        #[serde(default)]
        style: StyleSpec,
        #[serde(default)]
        resolution: Option<u32>,
    },
    TextRun {
        position: [f64; 2],
        text: String,
        #[serde(default)]
        style: StyleSpec,
        #[serde(default)]
        attributes: Vec<Attribute>,
    },
}

impl Manifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        serde_json::from_str(json).map_err(|e| ExportError::InvalidManifest {
            reason: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self).map_err(|e| ExportError::InvalidManifest {
            reason: e.to_string(),
        })
    }

    /// Read a manifest file and build its document.
    pub fn load(path: impl AsRef<Path>) -> Result<Document, ExportError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json(&json)?.build(base)
    }

    /// Build the document; relative image paths resolve against `base`.
    pub fn build(&self, base: &Path) -> Result<Document, ExportError> {
        let mut document = Document::new();
        for (index, spec) in self.pages.iter().enumerate() {
            let page = spec
                .build(base)
                .map_err(|reason| ExportError::InvalidManifest {
                    reason: format!("page {}: {}", index, reason),
                })?;
            document.add_page(page);
        }
        Ok(document)
    }
}

impl PageSpec {
    fn build(&self, base: &Path) -> Result<Page, String> {
        let mut page = Page::new(DVec2::from_array(self.size), self.resolution)
            .map_err(|e| e.to_string())?;
        for (index, child) in self.children.iter().enumerate() {
            let element = child
                .build(base, self.resolution)
                .map_err(|reason| format!("child {} ({}): {}", index, child.kind(), reason))?;
            page.add(element);
        }
        Ok(page)
    }
}

impl StyleSpec {
    fn defaults(&self) -> Result<TextDefaults, String> {
        let mut defaults = TextDefaults::default();
        if let Some(font) = &self.font {
            defaults.font = font.clone();
        }
        if let Some(size) = self.size {
            if !(size > 0.0) {
                return Err(format!("invalid text size {}", size));
            }
            defaults.size = size;
        }
        if let Some(color) = &self.color {
            defaults.color =
                Color::parse(color).ok_or_else(|| format!("invalid color {:?}", color))?;
        }
        Ok(defaults)
    }
}

impl ElementSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            ElementSpec::Image { .. } => "image",
            ElementSpec::TextBox { .. } => "text_box",
            ElementSpec::TextRun { .. } => "text_run",
        }
    }

    fn build(&self, base: &Path, page_resolution: u32) -> Result<Element, String> {
        let config = |e: ConfigError| e.to_string();

        match self {
            ElementSpec::Image {
                position,
                size,
                path,
                fit,
                resolution,
            } => {
                let path = base.join(path);
                let image = Image::open(
                    &path,
                    DVec2::from_array(*position),
                    DVec2::from_array(*size),
                    resolution.unwrap_or(page_resolution),
                )
                .map_err(|e| format!("{}: {}", path.display(), e))?;
                Ok(image.with_fit(*fit).into())
            }
            ElementSpec::TextBox {
                position,
                size,
                lines,
                markdown,
                style,
                resolution,
            } => {
                let mut text = TextBox::new(
                    DVec2::from_array(*position),
                    DVec2::from_array(*size),
                    resolution.unwrap_or(page_resolution),
                )
                .map_err(config)?
                .with_defaults(style.defaults()?);
                for line in lines {
                    text.push_line(quire_markup::parse_line(line));
                }
                if let Some(source) = markdown {
                    for line in quire_markup::parse_markdown(source) {
                        text.push_line(line);
                    }
                }
                Ok(text.into())
            }
            ElementSpec::TextRun {
                position,
                text,
                style,
                attributes,
            } => {
                let mut run = TextRun::new(DVec2::from_array(*position), text, &style.defaults()?);
                for attribute in attributes {
                    run = run.with_attribute(*attribute);
                }
                Ok(run.into())
            }
        }
    }
}
