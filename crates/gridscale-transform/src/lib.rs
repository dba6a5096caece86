//! gridscale-transform - Rational-precision raster scaling
//!
//! This crate scales and translates tiled rasters:
//!
//! - Exact coordinate mapping with rational scale factors ([`RationalMapper`])
//! - Nearest, bilinear, bicubic and caller-supplied kernels ([`interp`])
//! - Region-of-interest masking and no-data ranges ([`policy`])
//! - Packed 1-bit rasters alongside 8/16/32-bit integer and float samples
//! - Tile-parallel computation over tiled sources ([`ScaleOp`])
//!
//! # Pipeline
//!
//! ```text
//! ScaleOptions --build--> ScaleSpec --> ScaleOp
//!                                         | per destination tile
//!                                         v
//!                                  TileOrchestrator
//!                                         | per source sub-rectangle
//!                                         v
//!                                    ScaleEngine
//!                         PositionTable -> Interpolator + policy
//! ```

mod binary;
pub mod engine;
mod error;
pub mod interp;
pub mod mapper;
pub mod op;
pub mod options;
pub mod orchestrator;
pub mod policy;

pub use engine::ScaleEngine;
pub use error::{TransformError, TransformResult};
pub use interp::{Interpolator, KernelTable, Padding};
pub use mapper::{AxisMap, PositionTable, RationalMapper};
pub use op::{ScaleOp, scale};
pub use options::{
    CubicVariant, DEFAULT_PRECISION_BITS, DEFAULT_SUBSAMPLE_BITS, Interpolation,
    MAX_PRECISION_BITS, MAX_SUBSAMPLE_BITS, RATIONAL_TOLERANCE, ScaleOptions, ScaleSpec,
};
pub use orchestrator::TileOrchestrator;
pub use policy::PolicyCase;
