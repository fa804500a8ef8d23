//! Page layout object model for Quire.
//!
//! A document is built from visual objects positioned in millimeters:
//!
//! - [`Page`] - a canvas composed from child objects in insertion order
//! - [`Image`] - a source raster stretched or fitted into a rectangle
//! - [`TextBox`] - markup text wrapped into a rectangle
//! - [`TextRun`] - a single line of styled text
//!
//! Every object can queue raster edits before it is rendered; the queue is
//! replayed once, in order, when the object is finalized.
//!
//! ```ignore
//! use quire_core::{DVec2, PAGE_SIZE_A4};
//! use quire_layout::{Page, RenderOptions, TextBox, Visual};
//! use quire_render::SoftwareEngine;
//!
//! let mut page = Page::new(PAGE_SIZE_A4, 300)?;
//! let mut text = TextBox::new(DVec2::new(20.0, 20.0), DVec2::new(-40.0, -40.0), 300)?;
//! text.push_markup("^(b)Hello^(b) world");
//! page.add(text);
//!
//! let raster = page.finalize(&SoftwareEngine::new(), &RenderOptions::default())?;
//! ```

pub mod element;
pub mod flow;
pub mod image;
pub mod object;
pub mod page;
pub mod text_box;
pub mod text_run;

pub use element::Element;
pub use flow::{line_width_mm, FlowLine, TextFlow};
pub use image::{fit_geometry, Image, Placement};
pub use object::{
    MutateFn, ObjectBase, ObjectState, QueuedOp, RenderContext, RenderOptions, Visual,
};
pub use page::{child_pixel_size, resolve_child_size, Page, BORDER_WIDTH_MM};
pub use text_box::{TextBox, LINE_GAP_MM};
pub use text_run::{TextRun, DEFAULT_TEXT_RESOLUTION};
