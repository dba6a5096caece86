//! TiledImage - A raster addressed through a regular tile grid
//!
//! The tile grid is anchored at a grid offset and divides the global pixel
//! space into `tile_width x tile_height` cells. Tiles on the image edge are
//! clipped to the image bounds. Data requests return copies, so every
//! consumer gets a stable view regardless of what else reads the image.
//!
//! Reads that leave the image go through a [`BorderExtender`].

use crate::error::{Error, Result};
use crate::raster::Raster;
use crate::rational::floor_div;
use crate::rect::Rect;

/// Policy for synthesizing samples outside the image bounds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BorderExtender {
    /// All samples outside are zero
    #[default]
    Zero,
    /// All samples outside take a constant value in every band
    Constant(f64),
    /// Replicate the nearest edge sample
    Copy,
}

impl BorderExtender {
    /// Build a raster covering `rect` from `source`, extending as needed
    ///
    /// # Errors
    ///
    /// Returns an error if `rect` is empty.
    pub fn extend(&self, source: &Raster, rect: Rect) -> Result<Raster> {
        let bands = source.bands();
        let fill = match *self {
            BorderExtender::Zero | BorderExtender::Copy => 0.0,
            BorderExtender::Constant(v) => v,
        };
        let mut out = Raster::new_filled(rect, source.sample_type(), &vec![fill; bands as usize])?
            .to_mut();
        out.copy_from(source)?;

        if *self == BorderExtender::Copy {
            let b = source.rect();
            for y in rect.y..rect.bottom() {
                let sy = y.clamp(b.y, b.bottom() - 1);
                for x in rect.x..rect.right() {
                    if b.contains_point(x, y) {
                        continue;
                    }
                    let sx = x.clamp(b.x, b.right() - 1);
                    for band in 0..bands {
                        out.set_f64(x, y, band, source.get_f64(sx, sy, band)?)?;
                    }
                }
            }
        }
        Ok(out.into())
    }
}

/// A raster with a tile grid
#[derive(Debug, Clone)]
pub struct TiledImage {
    raster: Raster,
    tile_width: i32,
    tile_height: i32,
    grid_x: i32,
    grid_y: i32,
}

impl TiledImage {
    /// Create a tiled image whose grid is anchored at the raster origin
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if a tile dimension is not positive.
    pub fn new(raster: Raster, tile_width: i32, tile_height: i32) -> Result<Self> {
        let (gx, gy) = (raster.x(), raster.y());
        Self::with_grid_offset(raster, tile_width, tile_height, gx, gy)
    }

    /// Create a tiled image with an explicit grid anchor
    pub fn with_grid_offset(
        raster: Raster,
        tile_width: i32,
        tile_height: i32,
        grid_x: i32,
        grid_y: i32,
    ) -> Result<Self> {
        if tile_width <= 0 || tile_height <= 0 {
            return Err(Error::InvalidParameter(format!(
                "tile size must be positive: {}x{}",
                tile_width, tile_height
            )));
        }
        Ok(TiledImage {
            raster,
            tile_width,
            tile_height,
            grid_x,
            grid_y,
        })
    }

    /// Create an image consisting of a single tile
    pub fn untiled(raster: Raster) -> Self {
        let (w, h) = (raster.width(), raster.height());
        let (gx, gy) = (raster.x(), raster.y());
        TiledImage {
            raster,
            tile_width: w,
            tile_height: h,
            grid_x: gx,
            grid_y: gy,
        }
    }

    /// Image bounds
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.raster.rect()
    }

    /// Backing raster
    #[inline]
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Tile width
    #[inline]
    pub fn tile_width(&self) -> i32 {
        self.tile_width
    }

    /// Tile height
    #[inline]
    pub fn tile_height(&self) -> i32 {
        self.tile_height
    }

    /// Grid anchor
    #[inline]
    pub fn grid_offset(&self) -> (i32, i32) {
        (self.grid_x, self.grid_y)
    }

    /// Column index of the tile holding pixel column `x`
    #[inline]
    pub fn tile_x_index(&self, x: i32) -> i32 {
        floor_div((x - self.grid_x) as i128, self.tile_width as i128) as i32
    }

    /// Row index of the tile holding pixel row `y`
    #[inline]
    pub fn tile_y_index(&self, y: i32) -> i32 {
        floor_div((y - self.grid_y) as i128, self.tile_height as i128) as i32
    }

    /// Inclusive tile index range `(min_tx, min_ty, max_tx, max_ty)` of the image
    pub fn tile_range(&self) -> (i32, i32, i32, i32) {
        let b = self.bounds();
        (
            self.tile_x_index(b.x),
            self.tile_y_index(b.y),
            self.tile_x_index(b.right() - 1),
            self.tile_y_index(b.bottom() - 1),
        )
    }

    /// Rectangle of tile (tx, ty), clipped to the image
    ///
    /// Returns `None` for a tile that does not touch the image.
    pub fn tile_rect(&self, tx: i32, ty: i32) -> Option<Rect> {
        let cell = Rect::new_unchecked(
            self.grid_x + tx * self.tile_width,
            self.grid_y + ty * self.tile_height,
            self.tile_width,
            self.tile_height,
        );
        cell.intersect(&self.bounds())
    }

    /// Indices of all tiles overlapping `rect`, in row-major order
    pub fn tiles_intersecting(&self, rect: &Rect) -> Vec<(i32, i32)> {
        let Some(r) = rect.intersect(&self.bounds()) else {
            return Vec::new();
        };
        let (tx0, tx1) = (self.tile_x_index(r.x), self.tile_x_index(r.right() - 1));
        let (ty0, ty1) = (self.tile_y_index(r.y), self.tile_y_index(r.bottom() - 1));
        (ty0..=ty1)
            .flat_map(|ty| (tx0..=tx1).map(move |tx| (tx, ty)))
            .collect()
    }

    /// Copy the samples of `rect`, which must lie inside the image
    pub fn get_data(&self, rect: Rect) -> Result<Raster> {
        self.raster.sub_raster(rect)
    }

    /// Copy the samples of `rect`, synthesizing anything outside the image
    pub fn get_extended_data(&self, rect: Rect, extender: &BorderExtender) -> Result<Raster> {
        if self.bounds().contains_rect(&rect) {
            return self.get_data(rect);
        }
        extender.extend(&self.raster, rect)
    }
}
