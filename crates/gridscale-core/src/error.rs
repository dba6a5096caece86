//! Error types for gridscale-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal buffer layout details.

use crate::raster::SampleType;
use crate::rect::Rect;
use thiserror::Error;

/// gridscale-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid raster dimensions
    #[error("invalid raster dimensions: {width}x{height}")]
    InvalidDimension { width: i32, height: i32 },

    /// Invalid band count for the requested sample type
    #[error("invalid band count {bands} for {sample_type:?} samples")]
    InvalidBands { bands: u32, sample_type: SampleType },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Pixel coordinate outside the raster
    #[error("pixel ({x}, {y}) outside raster bounds {bounds:?}")]
    PixelOutOfBounds { x: i32, y: i32, bounds: Rect },

    /// Requested rectangle not contained in the raster
    #[error("rectangle {requested:?} not contained in {bounds:?}")]
    RectOutOfBounds { requested: Rect, bounds: Rect },

    /// Sample type of two rasters or of a typed access does not match
    #[error("sample type mismatch: expected {expected:?}, got {actual:?}")]
    SampleTypeMismatch {
        expected: SampleType,
        actual: SampleType,
    },

    /// Sample type not supported by this operation
    #[error("unsupported sample type: {0:?}")]
    UnsupportedSampleType(SampleType),

    /// Raw buffer length does not match the raster geometry
    #[error("buffer length mismatch: expected {expected}, got {actual}")]
    BufferLength { expected: usize, actual: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operation not supported
    #[error("operation not supported: {0}")]
    NotSupported(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
