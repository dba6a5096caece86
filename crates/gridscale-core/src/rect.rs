//! Rect - Integer rectangle regions
//!
//! Rectangles describe raster extents, tile cells and requested regions.
//! The origin may be negative: rasters live in a global pixel grid and
//! scaled or translated images routinely start away from `(0, 0)`.

use crate::error::{Error, Result};

/// A rectangle region in the global pixel grid
///
/// `x`/`y` is the top-left pixel, `w`/`h` the extent. The right and bottom
/// edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is negative.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "rect dimensions must be non-negative: w={}, h={}",
                w, h
            )));
        }
        Ok(Self { x, y, w, h })
    }

    /// Create a rectangle without validation
    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle from inclusive-exclusive edges `[x0, x1) x [y0, y1)`
    ///
    /// Inverted edges produce an empty rectangle anchored at `(x0, y0)`.
    pub fn from_edges(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            x: x0,
            y: y0,
            w: (x1 - x0).max(0),
            h: (y1 - y0).max(0),
        }
    }

    /// Get the right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Get the bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Get the area
    #[inline]
    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    /// Check if the rectangle is empty (zero area)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check if a point is inside the rectangle
    #[inline]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if this rectangle contains another one
    ///
    /// An empty rectangle is contained everywhere.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.is_empty()
            || (other.x >= self.x
                && other.y >= self.y
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }

    /// Check if this rectangle overlaps with another
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Compute the intersection of two rectangles
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect {
                x,
                y,
                w: right - x,
                h: bottom - y,
            })
        } else {
            None
        }
    }

    /// Compute the union (bounding rectangle) of two rectangles
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rect {
            x,
            y,
            w: right - x,
            h: bottom - y,
        }
    }

    /// Translate the rectangle by (dx, dy)
    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            w: self.w,
            h: self.h,
        }
    }

    /// Grow the rectangle by a separate margin on each side
    ///
    /// Negative margins shrink it; the result never has negative extent.
    pub fn grow(&self, left: i32, top: i32, right: i32, bottom: i32) -> Rect {
        Rect::from_edges(
            self.x - left,
            self.y - top,
            self.right() + right,
            self.bottom() + bottom,
        )
    }

    /// Remove `other` from this rectangle
    ///
    /// Returns up to four disjoint rectangles covering `self \ other`:
    /// a top band, a bottom band, and left/right pieces of the middle band.
    pub fn subtract(&self, other: &Rect) -> Vec<Rect> {
        let Some(cut) = self.intersect(other) else {
            return if self.is_empty() { Vec::new() } else { vec![*self] };
        };

        let mut pieces = Vec::with_capacity(4);
        if cut.y > self.y {
            pieces.push(Rect::from_edges(self.x, self.y, self.right(), cut.y));
        }
        if cut.bottom() < self.bottom() {
            pieces.push(Rect::from_edges(
                self.x,
                cut.bottom(),
                self.right(),
                self.bottom(),
            ));
        }
        if cut.x > self.x {
            pieces.push(Rect::from_edges(self.x, cut.y, cut.x, cut.bottom()));
        }
        if cut.right() < self.right() {
            pieces.push(Rect::from_edges(
                cut.right(),
                cut.y,
                self.right(),
                cut.bottom(),
            ));
        }
        pieces
    }
}
