//! Exact rational coordinate mapping
//!
//! Destination pixel `d` maps to the source position
//!
//! ```text
//! s(d) = (d + 1/2 - trans) / scale - h
//! ```
//!
//! where `h` is `0` for nearest-neighbor sampling and `1/2` for kernel
//! interpolators. Per axis, `s(d)` is kept as the exact fraction
//! `(C + K * d) / D` with integer `C`, `K`, `D`, so that the integer part
//! and the sub-pixel remainder of every position come out of integer
//! arithmetic. A position table walks a row by adding the constant step
//! `K / D` with carry into the integer part; it never accumulates error,
//! however long the row.
//!
//! Kernel padding enters in two places: forward mapping keeps only the
//! destination pixels whose full kernel footprint lies inside the source
//! rectangle, and backward mapping grows the source rectangle by the
//! footprint.

use crate::interp::{Frac, Padding};
use crate::options::ScaleSpec;
use crate::{TransformError, TransformResult};
use gridscale_core::Rect;
use gridscale_core::rational::{ceil_div, floor_div};

/// Rational mapping along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMap {
    /// Scale numerator / denominator
    sn: i128,
    sd: i128,
    /// Translation numerator / denominator
    tn: i128,
    td: i128,
    /// Kernel taps before / after the anchor
    lead: i32,
    trail: i32,
    /// Numerator of `s(0)`
    c: i128,
    /// Numerator step per destination pixel
    k: i128,
    /// Common denominator
    d: i128,
}

impl AxisMap {
    /// Build the mapping from the inverse scale `step` (source pixels per
    /// destination pixel) and `trans`, both as `num / den` pairs
    ///
    /// `half` shifts positions by half a pixel for kernel interpolators.
    pub fn new(
        (sd, sn): (i64, i64),
        (tn, td): (i64, i64),
        half: bool,
        lead: i32,
        trail: i32,
    ) -> Self {
        let (sn, sd, tn, td) = (sn as i128, sd as i128, tn as i128, td as i128);
        // s(d) = ((2d + 1) td - 2 tn) sd / (2 td sn) - h
        let d = 2 * td * sn;
        let k = 2 * td * sd;
        let mut c = (td - 2 * tn) * sd;
        if half {
            c -= td * sn;
        }
        AxisMap {
            sn,
            sd,
            tn,
            td,
            lead,
            trail,
            c,
            k,
            d,
        }
    }

    /// Numerator of `s(dst)` over the common denominator
    #[inline]
    fn numerator(&self, dst: i64) -> i128 {
        self.c + self.k * dst as i128
    }

    /// Integer source position of destination pixel `dst`
    #[inline]
    pub fn source_int(&self, dst: i64) -> i64 {
        floor_div(self.numerator(dst), self.d) as i64
    }

    /// Exact source position of `dst` as `(integer, remainder, denominator)`
    ///
    /// The remainder lies in `[0, denominator)`.
    pub fn source_exact(&self, dst: i64) -> (i64, i128, i128) {
        let n = self.numerator(dst);
        let int = floor_div(n, self.d);
        (int as i64, n - int * self.d, self.d)
    }

    /// Destination range `[start, end)` whose kernels fit in source `[a, b)`
    pub fn forward(&self, a: i64, b: i64) -> (i64, i64) {
        let start = ceil_div((a as i128 + self.lead as i128) * self.d - self.c, self.k);
        let end = ceil_div((b as i128 - self.trail as i128) * self.d - self.c, self.k);
        (start as i64, end.max(start) as i64)
    }

    /// Source range `[start, end)` read by destination `[a, b)`, `a < b`
    pub fn backward(&self, a: i64, b: i64) -> (i64, i64) {
        (
            self.source_int(a) - self.lead as i64,
            self.source_int(b - 1) + self.trail as i64 + 1,
        )
    }

    /// Output extent `[min, max]` for a source axis starting at `origin`
    /// with `len` pixels, after trimming `lpad` / `rpad` pixels
    ///
    /// ```text
    /// min = ceil(a * scale - 1/2 + trans)
    /// max = ceil(b * scale - 3/2 + trans)
    /// ```
    pub fn layout(&self, origin: i64, len: i64, lpad: i64, rpad: i64) -> (i64, i64) {
        let a = (origin + lpad) as i128;
        let b = (origin + len - rpad) as i128;
        let den = 2 * self.sd * self.td;
        let min = ceil_div(2 * a * self.sn * self.td - self.sd * self.td + 2 * self.tn * self.sd, den);
        let max = ceil_div(
            2 * b * self.sn * self.td - 3 * self.sd * self.td + 2 * self.tn * self.sd,
            den,
        );
        (min as i64, max as i64)
    }

    /// Walk `count` destination pixels from `start`
    ///
    /// Pushes each integer position and fraction, the fraction quantized to
    /// `subsample_bits`.
    fn walk(&self, start: i64, count: usize, subsample_bits: u32, ints: &mut Vec<i32>, fracs: &mut Vec<Frac>) {
        let (mut int, mut rem, den) = self.source_exact(start);
        let step_int = floor_div(self.k, den) as i64;
        let step_rem = self.k - step_int as i128 * den;
        let inv_den = 1.0 / den as f64;
        for _ in 0..count {
            ints.push(int as i32);
            fracs.push(Frac {
                fixed: ((rem << subsample_bits) / den) as i32,
                real: rem as f64 * inv_den,
            });
            int += step_int;
            rem += step_rem;
            if rem >= den {
                rem -= den;
                int += 1;
            }
        }
    }
}

/// Integer source positions and fractions for a destination rectangle
///
/// Column `i` of the table describes destination column `rect.x + i`, row
/// `j` destination row `rect.y + j`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionTable {
    pub x_int: Vec<i32>,
    pub x_frac: Vec<Frac>,
    pub y_int: Vec<i32>,
    pub y_frac: Vec<Frac>,
    /// Source columns relative to the ROI mask origin (accessor mode)
    pub roi_x: Vec<i32>,
    /// Source rows relative to the ROI mask origin (accessor mode)
    pub roi_y: Vec<i32>,
}

impl PositionTable {
    /// Fill the ROI offsets relative to a mask raster at `mask_rect`
    pub fn attach_roi(&mut self, mask_rect: Rect) {
        self.roi_x = self.x_int.iter().map(|&x| x - mask_rect.x).collect();
        self.roi_y = self.y_int.iter().map(|&y| y - mask_rect.y).collect();
    }

    /// ROI column offset, or the integer position when none is attached
    #[inline]
    pub fn roi_col(&self, i: usize) -> i32 {
        self.roi_x.get(i).copied().unwrap_or(self.x_int[i])
    }

    /// ROI row offset, or the integer position when none is attached
    #[inline]
    pub fn roi_row(&self, j: usize) -> i32 {
        self.roi_y.get(j).copied().unwrap_or(self.y_int[j])
    }
}

/// Two-axis mapping between source and destination grids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RationalMapper {
    x: AxisMap,
    y: AxisMap,
    padding: Padding,
    trim_padding: bool,
}

impl RationalMapper {
    /// Build the mapper for a scale configuration
    pub fn new(spec: &ScaleSpec) -> Self {
        let interp = spec.interpolation();
        let padding = interp.padding();
        let half = !interp.is_nearest();
        let pair = |r: gridscale_core::Rational| (r.num(), r.den());
        RationalMapper {
            x: AxisMap::new(
                pair(spec.inv_scale_x()),
                pair(spec.trans_x()),
                half,
                padding.left,
                padding.right,
            ),
            y: AxisMap::new(
                pair(spec.inv_scale_y()),
                pair(spec.trans_y()),
                half,
                padding.top,
                padding.bottom,
            ),
            padding,
            trim_padding: half && spec.border_extender().is_none(),
        }
    }

    /// Horizontal axis
    pub fn x_axis(&self) -> &AxisMap {
        &self.x
    }

    /// Vertical axis
    pub fn y_axis(&self) -> &AxisMap {
        &self.y
    }

    /// Kernel padding
    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Destination image bounds for a source image at `source`
    ///
    /// Without a border extender, kernel interpolators lose their padding
    /// from the usable source extent first. Width and height are at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidParameters`] if the destination
    /// does not fit in the `i32` pixel grid.
    pub fn layout(&self, source: Rect) -> TransformResult<Rect> {
        let p = if self.trim_padding {
            self.padding
        } else {
            Padding::default()
        };
        let (x0, x1) = self
            .x
            .layout(source.x as i64, source.w as i64, p.left as i64, p.right as i64);
        let (y0, y1) = self
            .y
            .layout(source.y as i64, source.h as i64, p.top as i64, p.bottom as i64);
        let w = (x1 - x0 + 1).max(1);
        let h = (y1 - y0 + 1).max(1);
        let fits = |origin: i64, len: i64| {
            i32::try_from(origin).is_ok() && i32::try_from(len).is_ok() && i32::try_from(origin + len).is_ok()
        };
        if !fits(x0, w) || !fits(y0, h) {
            return Err(TransformError::InvalidParameters(format!(
                "destination layout at ({}, {}) size {}x{} exceeds the pixel grid",
                x0, y0, w, h
            )));
        }
        Ok(Rect::new_unchecked(x0 as i32, y0 as i32, w as i32, h as i32))
    }

    /// Destination pixels whose full kernel footprint lies inside `source`
    ///
    /// The result may be empty.
    pub fn forward_rect(&self, source: &Rect) -> Rect {
        let (x0, x1) = self.x.forward(source.x as i64, source.right() as i64);
        let (y0, y1) = self.y.forward(source.y as i64, source.bottom() as i64);
        Rect::from_edges(
            clamp_i32(x0),
            clamp_i32(y0),
            clamp_i32(x1),
            clamp_i32(y1),
        )
    }

    /// Minimal source rectangle, including kernel padding, read by `dest`
    ///
    /// Returns `None` for an empty destination rectangle.
    pub fn backward_rect(&self, dest: &Rect) -> Option<Rect> {
        if dest.is_empty() {
            return None;
        }
        let (x0, x1) = self.x.backward(dest.x as i64, dest.right() as i64);
        let (y0, y1) = self.y.backward(dest.y as i64, dest.bottom() as i64);
        let r = Rect::from_edges(
            clamp_i32(x0),
            clamp_i32(y0),
            clamp_i32(x1),
            clamp_i32(y1),
        );
        (!r.is_empty()).then_some(r)
    }

    /// Position table for every column and row of `dest`
    pub fn positions(&self, dest: &Rect, subsample_bits: u32) -> PositionTable {
        let (w, h) = (dest.w.max(0) as usize, dest.h.max(0) as usize);
        let mut table = PositionTable {
            x_int: Vec::with_capacity(w),
            x_frac: Vec::with_capacity(w),
            y_int: Vec::with_capacity(h),
            y_frac: Vec::with_capacity(h),
            ..Default::default()
        };
        self.x
            .walk(dest.x as i64, w, subsample_bits, &mut table.x_int, &mut table.x_frac);
        self.y
            .walk(dest.y as i64, h, subsample_bits, &mut table.y_int, &mut table.y_frac);
        table
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
