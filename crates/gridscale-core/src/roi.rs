//! ROI - Regions of interest over source pixels
//!
//! A region is a predicate over global pixel coordinates plus a bounding
//! rectangle. It can be queried point by point, or rasterized into a U8
//! mask (1 = inside) that is read in lockstep with source samples.

use crate::error::{Error, Result};
use crate::raster::{Raster, SampleType};
use crate::rect::Rect;
use std::fmt::Debug;

/// A region of interest
pub trait Roi: Send + Sync + Debug {
    /// Bounding rectangle of every pixel inside the region
    fn bounds(&self) -> Rect;

    /// Check whether pixel (x, y) is inside the region
    fn contains(&self, x: i32, y: i32) -> bool;

    /// Rasterize the region over `rect` as a single-band U8 mask
    ///
    /// # Errors
    ///
    /// Returns an error if `rect` is empty.
    fn rasterize(&self, rect: Rect) -> Result<Raster> {
        rasterize_by(rect, |x, y| self.contains(x, y))
    }
}

/// Build a U8 mask over `rect` from a point predicate
fn rasterize_by(rect: Rect, inside: impl Fn(i32, i32) -> bool) -> Result<Raster> {
    let mut data = Vec::with_capacity(rect.area().max(0) as usize);
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            data.push(u8::from(inside(x, y)));
        }
    }
    Raster::from_vec(rect, 1, data)
}

/// Rectangular region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectRoi {
    rect: Rect,
}

impl RectRoi {
    /// Create a rectangular region
    pub fn new(rect: Rect) -> Self {
        RectRoi { rect }
    }
}

impl Roi for RectRoi {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        self.rect.contains_point(x, y)
    }
}

/// Region defined by the non-zero samples of a mask raster
#[derive(Debug, Clone)]
pub struct MaskRoi {
    mask: Raster,
    bounds: Rect,
}

impl MaskRoi {
    /// Create a region from band 0 of `mask`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the mask has no non-zero
    /// sample.
    pub fn new(mask: Raster) -> Result<Self> {
        let r = mask.rect();
        let (mut x0, mut y0, mut x1, mut y1) = (i32::MAX, i32::MAX, i32::MIN, i32::MIN);
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                if mask.get_f64(x, y, 0)? != 0.0 {
                    x0 = x0.min(x);
                    y0 = y0.min(y);
                    x1 = x1.max(x + 1);
                    y1 = y1.max(y + 1);
                }
            }
        }
        if x0 >= x1 {
            return Err(Error::InvalidParameter("ROI mask is empty".to_string()));
        }
        Ok(MaskRoi {
            mask,
            bounds: Rect::from_edges(x0, y0, x1, y1),
        })
    }

    /// Underlying mask raster
    pub fn mask(&self) -> &Raster {
        &self.mask
    }
}

impl Roi for MaskRoi {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        self.bounds.contains_point(x, y)
            && self.mask.get_f64(x, y, 0).is_ok_and(|v| v != 0.0)
    }

    fn rasterize(&self, rect: Rect) -> Result<Raster> {
        if self.mask.sample_type() == SampleType::U8 && self.mask.rect() == rect {
            return Ok(self.mask.clone());
        }
        rasterize_by(rect, |x, y| self.contains(x, y))
    }
}
