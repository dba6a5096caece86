//! Error types for gridscale-transform

use thiserror::Error;

/// Errors that can occur while configuring or computing a scale
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] gridscale_core::Error),

    /// Invalid scale factor
    #[error("invalid scale factor: {0}")]
    InvalidScaleFactor(String),

    /// Sample type not handled by the scale engine or not matching between rasters
    #[error("unsupported sample type: {0}")]
    UnsupportedSampleType(String),

    /// Band layout not handled by the scale engine
    #[error("unsupported bands: {0}")]
    UnsupportedBands(String),

    /// Invalid transformation parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
