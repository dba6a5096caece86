//! Whole-image scale operation
//!
//! [`ScaleOp`] binds a [`ScaleSpec`] to a tiled source, computes the
//! destination layout and serves destination tiles. Tiles are independent;
//! [`ScaleOp::compute_image`] computes them on the rayon thread pool.

use crate::engine::ScaleEngine;
use crate::options::ScaleSpec;
use crate::orchestrator::TileOrchestrator;
use crate::{TransformError, TransformResult};
use gridscale_core::{Raster, Rect, TiledImage};
use log::debug;
use rayon::prelude::*;

/// A scale operation over one source image
#[derive(Debug, Clone)]
pub struct ScaleOp {
    spec: ScaleSpec,
    source: TiledImage,
    engine: ScaleEngine,
    dest_bounds: Rect,
    tile_width: i32,
    tile_height: i32,
    roi_mask: Option<Raster>,
}

impl ScaleOp {
    /// Prepare a scale of `source`
    ///
    /// Destination tiles default to the source tile size, anchored at the
    /// destination origin. In ROI accessor mode the ROI is rasterized once
    /// over the source bounds.
    ///
    /// # Errors
    ///
    /// - [`TransformError::UnsupportedBands`] if the background does not
    ///   match the source band count.
    /// - [`TransformError::InvalidParameters`] if the destination does not
    ///   fit in the `i32` pixel grid.
    pub fn new(source: TiledImage, spec: ScaleSpec) -> TransformResult<Self> {
        let raster = source.raster();
        spec.background_for(raster.bands())?;
        let engine = ScaleEngine::new(&spec, raster.sample_type());
        let dest_bounds = engine.mapper().layout(source.bounds())?;
        let roi_mask = match spec.roi() {
            Some(roi) if spec.use_roi_accessor() && engine.policy().has_roi() => {
                Some(roi.rasterize(source.bounds())?)
            }
            _ => None,
        };
        debug!(
            "scale {:?} -> {:?}, {:?}, policy {:?}",
            source.bounds(),
            dest_bounds,
            spec.interpolation(),
            engine.policy()
        );
        Ok(ScaleOp {
            tile_width: source.tile_width(),
            tile_height: source.tile_height(),
            spec,
            source,
            engine,
            dest_bounds,
            roi_mask,
        })
    }

    /// Override the destination tile size
    pub fn with_tile_size(mut self, tile_width: i32, tile_height: i32) -> TransformResult<Self> {
        if tile_width <= 0 || tile_height <= 0 {
            return Err(TransformError::InvalidParameters(format!(
                "tile size must be positive: {}x{}",
                tile_width, tile_height
            )));
        }
        self.tile_width = tile_width;
        self.tile_height = tile_height;
        Ok(self)
    }

    /// Destination image bounds
    pub fn dest_bounds(&self) -> Rect {
        self.dest_bounds
    }

    /// Scale configuration
    pub fn spec(&self) -> &ScaleSpec {
        &self.spec
    }

    /// Source image
    pub fn source(&self) -> &TiledImage {
        &self.source
    }

    /// Destination tile size
    pub fn tile_size(&self) -> (i32, i32) {
        (self.tile_width, self.tile_height)
    }

    /// Number of destination tile columns and rows
    pub fn tile_counts(&self) -> (i32, i32) {
        (
            (self.dest_bounds.w + self.tile_width - 1) / self.tile_width,
            (self.dest_bounds.h + self.tile_height - 1) / self.tile_height,
        )
    }

    /// Rectangle of destination tile (tx, ty), or `None` outside the grid
    pub fn tile_rect(&self, tx: i32, ty: i32) -> Option<Rect> {
        let cell = Rect::new_unchecked(
            self.dest_bounds.x + tx * self.tile_width,
            self.dest_bounds.y + ty * self.tile_height,
            self.tile_width,
            self.tile_height,
        );
        cell.intersect(&self.dest_bounds)
    }

    fn orchestrator(&self) -> TileOrchestrator<'_> {
        TileOrchestrator::new(&self.spec, &self.source, &self.engine, self.roi_mask.as_ref())
    }

    /// Compute destination tile (tx, ty)
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidParameters`] for a tile outside the
    /// grid.
    pub fn compute_tile(&self, tx: i32, ty: i32) -> TransformResult<Raster> {
        let rect = self.tile_rect(tx, ty).ok_or_else(|| {
            TransformError::InvalidParameters(format!("tile ({}, {}) is outside the grid", tx, ty))
        })?;
        self.orchestrator().compute_tile(rect)
    }

    /// Compute an arbitrary destination rectangle
    ///
    /// Pixels outside the destination bounds are computed like any other
    /// when source data covers them.
    pub fn compute_rect(&self, rect: Rect) -> TransformResult<Raster> {
        if rect.is_empty() {
            return Err(TransformError::InvalidParameters(format!(
                "empty destination rectangle {:?}",
                rect
            )));
        }
        self.orchestrator().compute_tile(rect)
    }

    /// Compute every destination tile in parallel and assemble the image
    pub fn compute_image(&self) -> TransformResult<Raster> {
        let (cols, rows) = self.tile_counts();
        let indices: Vec<(i32, i32)> = (0..rows)
            .flat_map(|ty| (0..cols).map(move |tx| (tx, ty)))
            .collect();
        let tiles = indices
            .par_iter()
            .map(|&(tx, ty)| self.compute_tile(tx, ty))
            .collect::<TransformResult<Vec<Raster>>>()?;

        let raster = self.source.raster();
        let background = self.spec.background_for(raster.bands())?;
        let mut out = Raster::new_filled(self.dest_bounds, raster.sample_type(), &background)?
            .try_into_mut()
            .unwrap_or_else(|r| r.to_mut());
        for tile in &tiles {
            out.copy_from(tile)?;
        }
        debug!("assembled {} tiles into {:?}", tiles.len(), self.dest_bounds);
        Ok(out.into())
    }
}

/// Scale a whole image
///
/// # Example
///
/// ```
/// use gridscale_core::{Raster, Rect, SampleType, TiledImage};
/// use gridscale_transform::{ScaleOptions, scale};
///
/// let rect = Rect::new(0, 0, 10, 10).unwrap();
/// let src = Raster::new_filled(rect, SampleType::U8, &[42.0]).unwrap();
/// let spec = ScaleOptions::new(2.5, 2.5).build().unwrap();
/// let out = scale(&TiledImage::untiled(src), &spec).unwrap();
/// assert_eq!(out.width(), 25);
/// ```
pub fn scale(source: &TiledImage, spec: &ScaleSpec) -> TransformResult<Raster> {
    ScaleOp::new(source.clone(), spec.clone())?.compute_image()
}
