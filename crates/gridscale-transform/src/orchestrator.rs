//! Tile orchestration
//!
//! A destination tile request is turned into one or more
//! [`ScaleEngine::compute_rect`] calls, each fed with a source region that
//! holds the full kernel footprint of the destination pixels it computes.
//!
//! - With a border extender, the backward-mapped source region is fetched
//!   through the extender and computed in one call.
//! - Otherwise only destination pixels whose kernel lies inside the source
//!   image are computable. If their source region sits in one source tile,
//!   one call does it.
//! - Otherwise every source tile is handled in turn: the tile itself (a
//!   sliver narrower than the kernel is widened to kernel size), then the
//!   seams on its right, bottom and bottom-right corner, each probed with a
//!   source rectangle `kernel - 1` pixels either side of the seam. Each probe
//!   is forward-mapped and intersected with the pixels still pending, so
//!   every pixel is computed exactly once.
//!
//! Pixels that are not computable keep the background fill.

use crate::engine::ScaleEngine;
use crate::options::ScaleSpec;
use crate::TransformResult;
use gridscale_core::{Raster, RasterMut, Rect, TiledImage};
use log::{debug, trace};

/// Splits destination requests over a tiled source
#[derive(Debug, Clone, Copy)]
pub struct TileOrchestrator<'a> {
    spec: &'a ScaleSpec,
    source: &'a TiledImage,
    engine: &'a ScaleEngine,
    roi_mask: Option<&'a Raster>,
}

impl<'a> TileOrchestrator<'a> {
    /// Create an orchestrator
    ///
    /// `roi_mask` is the ROI rasterized over the source bounds, used in
    /// accessor mode.
    pub fn new(
        spec: &'a ScaleSpec,
        source: &'a TiledImage,
        engine: &'a ScaleEngine,
        roi_mask: Option<&'a Raster>,
    ) -> Self {
        TileOrchestrator {
            spec,
            source,
            engine,
            roi_mask,
        }
    }

    /// Compute `dest_rect` into a new raster pre-filled with the background
    ///
    /// # Errors
    ///
    /// Returns configuration errors from the engine, or an error for an
    /// empty rectangle.
    pub fn compute_tile(&self, dest_rect: Rect) -> TransformResult<Raster> {
        let src = self.source.raster();
        let background = self.spec.background_for(src.bands())?;
        let mut dest = Raster::new_filled(dest_rect, src.sample_type(), &background)?
            .try_into_mut()
            .unwrap_or_else(|r| r.to_mut());
        self.compute_into(&mut dest, dest_rect)?;
        Ok(dest.into())
    }

    /// Compute `dest_rect` into an existing raster
    ///
    /// Pixels of `dest_rect` that are not computable are left as they are.
    pub fn compute_into(&self, dest: &mut RasterMut, dest_rect: Rect) -> TransformResult<()> {
        let Some(rect) = dest_rect.intersect(&dest.rect()) else {
            return Ok(());
        };
        let mapper = self.engine.mapper();

        if let Some(extender) = self.spec.border_extender() {
            let Some(src_rect) = mapper.backward_rect(&rect) else {
                return Ok(());
            };
            debug!("tile {:?}: extended source {:?}", rect, src_rect);
            let data = self.source.get_extended_data(src_rect, extender)?;
            return self.engine.compute_rect(&data, dest, rect, self.roi_mask);
        }

        let bounds = self.source.bounds();
        let Some(computable) = rect.intersect(&mapper.forward_rect(&bounds)) else {
            debug!("tile {:?}: nothing computable", rect);
            return Ok(());
        };
        let Some(src_rect) = mapper.backward_rect(&computable) else {
            return Ok(());
        };
        let tiles = self.source.tiles_intersecting(&src_rect);
        if tiles.len() <= 1 {
            debug!("tile {:?}: single source tile, source {:?}", computable, src_rect);
            return self.compute_piece(dest, computable);
        }

        debug!(
            "tile {:?}: source {:?} spans {} tiles",
            computable,
            src_rect,
            tiles.len()
        );
        let pad = mapper.padding();
        let (kw, kh) = (pad.kernel_width(), pad.kernel_height());
        let mut pending = vec![computable];
        let mut calls = 0usize;
        for (tx, ty) in tiles {
            let Some(tile) = self
                .source
                .tile_rect(tx, ty)
                .and_then(|t| t.intersect(&src_rect))
            else {
                continue;
            };

            // Primary piece, widened to at least the kernel size
            let primary = Rect::new_unchecked(tile.x, tile.y, tile.w.max(kw), tile.h.max(kh));
            calls += self.compute_probe(dest, &mut pending, primary, &bounds)?;

            let seam_x = tile.right() < src_rect.right();
            let seam_y = tile.bottom() < src_rect.bottom();
            let across_x = (tile.right() - (kw - 1), tile.right() + (kw - 1));
            let across_y = (tile.bottom() - (kh - 1), tile.bottom() + (kh - 1));
            if seam_x {
                let probe = Rect::from_edges(across_x.0, tile.y, across_x.1, tile.bottom());
                calls += self.compute_probe(dest, &mut pending, probe, &bounds)?;
            }
            if seam_y {
                let probe = Rect::from_edges(tile.x, across_y.0, tile.right(), across_y.1);
                calls += self.compute_probe(dest, &mut pending, probe, &bounds)?;
            }
            if seam_x && seam_y {
                let probe = Rect::from_edges(across_x.0, across_y.0, across_x.1, across_y.1);
                calls += self.compute_probe(dest, &mut pending, probe, &bounds)?;
            }
            if pending.is_empty() {
                break;
            }
        }

        if !pending.is_empty() {
            debug!("tile {:?}: {} rects left after split pass", computable, pending.len());
        }
        for r in std::mem::take(&mut pending) {
            self.compute_piece(dest, r)?;
            calls += 1;
        }
        debug!("tile {:?}: {} compute calls", computable, calls);
        Ok(())
    }

    /// Forward-map a source probe and compute the pending pixels it covers
    fn compute_probe(
        &self,
        dest: &mut RasterMut,
        pending: &mut Vec<Rect>,
        probe: Rect,
        bounds: &Rect,
    ) -> TransformResult<usize> {
        let Some(probe) = probe.intersect(bounds) else {
            return Ok(0);
        };
        let covered = self.engine.mapper().forward_rect(&probe);
        if covered.is_empty() {
            return Ok(0);
        }
        let mut calls = 0;
        let mut next = Vec::with_capacity(pending.len());
        for p in pending.drain(..) {
            match p.intersect(&covered) {
                Some(part) => {
                    self.compute_piece(dest, part)?;
                    calls += 1;
                    next.extend(p.subtract(&part));
                }
                None => next.push(p),
            }
        }
        *pending = next;
        Ok(calls)
    }

    /// Fetch the source footprint of `rect` and compute it
    fn compute_piece(&self, dest: &mut RasterMut, rect: Rect) -> TransformResult<()> {
        let Some(src_rect) = self.engine.mapper().backward_rect(&rect) else {
            return Ok(());
        };
        trace!("piece {:?} from source {:?}", rect, src_rect);
        let data = self.source.get_data(src_rect)?;
        self.engine.compute_rect(&data, dest, rect, self.roi_mask)
    }
}
