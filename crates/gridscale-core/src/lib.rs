//! gridscale Core - Basic data structures for raster scaling
//!
//! This crate provides the data model shared by the scaling engine:
//!
//! - [`Raster`] / [`RasterMut`] - Multi-band sample grids (immutable / mutable)
//! - [`TiledImage`] / [`BorderExtender`] - Tile-addressed sources and edge policy
//! - [`Rect`] - Integer rectangles in the global pixel grid
//! - [`Rational`] - Exact fractions for coordinate mapping
//! - [`Roi`] / [`RectRoi`] / [`MaskRoi`] - Regions of interest
//! - [`NoDataRange`] - Sentinel sample values

pub mod error;
pub mod nodata;
pub mod rational;
pub mod raster;
pub mod rect;
pub mod roi;
pub mod tiled;

pub use error::{Error, Result};
pub use nodata::NoDataRange;
pub use rational::Rational;
pub use raster::{Raster, RasterBuffer, RasterMut, Sample, SampleType};
pub use rect::Rect;
pub use roi::{MaskRoi, RectRoi, Roi};
pub use tiled::{BorderExtender, TiledImage};
