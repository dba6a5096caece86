//! gridscale - Tile-based raster scaling for Rust
//!
//! # Overview
//!
//! gridscale scales and translates multi-band rasters by arbitrary factors.
//! Coordinates are mapped with exact rational arithmetic, so results do not
//! depend on how the image is tiled:
//!
//! - Nearest, bilinear, bicubic and caller-supplied kernels
//! - 1-bit packed, 8/16/32-bit integer and 32/64-bit float samples
//! - Region-of-interest masks and no-data value ranges
//! - Tile-parallel computation
//!
//! # Example
//!
//! ```
//! use gridscale::transform::{Interpolation, ScaleOptions, scale};
//! use gridscale::{Raster, Rect, SampleType, TiledImage};
//!
//! let rect = Rect::new(0, 0, 8, 8).unwrap();
//! let src = Raster::new_filled(rect, SampleType::U16, &[500.0]).unwrap();
//! let spec = ScaleOptions::new(0.5, 0.5)
//!     .interpolation(Interpolation::bilinear())
//!     .build()
//!     .unwrap();
//! let out = scale(&TiledImage::new(src, 4, 4).unwrap(), &spec).unwrap();
//! assert_eq!(out.sample_type(), SampleType::U16);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use gridscale_core::*;

// Re-export the scale engine as a module to avoid name conflicts
pub use gridscale_transform as transform;
