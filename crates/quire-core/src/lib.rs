//! Core types, unit conversion, and errors for the Quire page layout engine.
//!
//! This crate provides the foundational types used across all other quire crates:
//! - Millimeter/pixel unit conversion
//! - Value types (colors, text attributes, fit modes, page sizes)
//! - The markup segment data model produced by the markup parser
//! - Error types

pub mod errors;
pub mod markup;
pub mod types;
pub mod units;

pub use errors::*;
pub use markup::{MarkupLine, MarkupSegment, TagMap};
pub use types::*;
pub use units::*;

/// Geometry vectors (millimeters) are glam's double precision vectors.
pub use glam::DVec2;
