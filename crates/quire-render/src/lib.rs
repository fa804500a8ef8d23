//! Raster images and the raster engine contract for Quire documents.
//!
//! Layout objects never touch pixels directly beyond simple fills and
//! compositing. Anything that needs fonts or resampling goes through a
//! [`RasterEngine`], which callers can back with a real text rasterizer.
//! [`SoftwareEngine`] is a deterministic built-in engine with fixed-advance
//! block glyphs, useful for headless rendering and tests.

mod engine;
mod raster;
mod software;

pub use engine::{LabelRequest, RasterEngine};
pub use raster::{CompositeMode, CompositeOptions, Raster};
pub use software::SoftwareEngine;
