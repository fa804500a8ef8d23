//! Error types for the Quire engine.

use thiserror::Error;

/// Top-level error type for the Quire engine.
#[derive(Debug, Error)]
pub enum QuireError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Malformed geometry or resolution, rejected before any rendering.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid page size {width}x{height}mm: both dimensions must be positive")]
    InvalidPageSize { width: f64, height: f64 },

    #[error("Invalid size {width}x{height}mm for an eagerly created object")]
    InvalidEagerSize { width: f64, height: f64 },

    #[error("Resolution must be positive")]
    ZeroResolution,

    #[error("Size {width}x{height}mm is unresolved; negative or zero sizes need a parent page")]
    UnresolvedSize { width: f64, height: f64 },
}

/// Failures reported by the raster engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Label rendering failed for {text:?}: {reason}")]
    LabelFailed { text: String, reason: String },

    #[error("Cannot create a {width}x{height} raster")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Image decoding failed: {reason}")]
    DecodeFailed { reason: String },

    #[error("{tool} exited with status {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("I/O error in raster engine: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors during object finalization.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Object has already been finalized")]
    AlreadyFinalized,

    #[error("Image object has no source image")]
    MissingImage,

    #[error("Object has no canvas to draw on")]
    NoCanvas,

    #[error("Queued mutation failed: {reason}")]
    MutationFailed { reason: String },
}

/// Errors during document export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Document has no pages")]
    EmptyDocument,

    #[error("I/O error during export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Page {index} failed to render: {source}")]
    PageFailed {
        index: usize,
        #[source]
        source: RenderError,
    },

    #[error("Image encoding failed: {reason}")]
    EncodeFailed { reason: String },

    #[error("Document assembly failed: {0}")]
    Assembly(#[from] EngineError),

    #[error("Invalid manifest: {reason}")]
    InvalidManifest { reason: String },
}
