//! ROI and no-data policy
//!
//! The combination of ROI and no-data handling is resolved once per
//! [`ScaleSpec`](crate::ScaleSpec) into a [`PolicyCase`]; the engine picks a
//! specialized inner loop for it. Per pixel, only data is tested:
//!
//! 1. no-data: any kernel tap inside the range excludes the pixel (the
//!    interpolator checks this first);
//! 2. ROI: the anchor must lie inside the ROI bounds, then each tap gets a
//!    weight of 1 (inside) or 0 (outside) in a [`KernelMask`].
//!
//! Excluded pixels are written with the background value.

use crate::interp::{KernelMask, Padding};
use crate::{TransformError, TransformResult};
use gridscale_core::{Raster, Rect, Roi};

/// Which exclusion tests run per pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyCase {
    /// Every mapped pixel is interpolated
    Plain,
    /// ROI only
    Roi,
    /// No-data only
    NoData,
    /// No-data first, then ROI
    RoiNoData,
}

impl PolicyCase {
    /// Resolve from the configuration
    ///
    /// Kernels that do not evaluate the policy always run plain.
    pub fn resolve(has_roi: bool, has_nodata: bool, honors_policy: bool) -> Self {
        match (honors_policy, has_roi, has_nodata) {
            (false, _, _) | (true, false, false) => PolicyCase::Plain,
            (true, true, false) => PolicyCase::Roi,
            (true, false, true) => PolicyCase::NoData,
            (true, true, true) => PolicyCase::RoiNoData,
        }
    }

    /// Whether ROI tests run
    pub fn has_roi(self) -> bool {
        matches!(self, PolicyCase::Roi | PolicyCase::RoiNoData)
    }

    /// Whether no-data tests run
    pub fn has_nodata(self) -> bool {
        matches!(self, PolicyCase::NoData | PolicyCase::RoiNoData)
    }
}

/// Per-tap ROI membership test
#[derive(Debug, Clone, Copy)]
pub enum RoiProbe<'a> {
    /// No ROI; every tap is inside
    Disabled,
    /// Rasterized mask addressed by offsets relative to its origin
    Accessor {
        samples: &'a [u8],
        width: i32,
        height: i32,
        bounds: Rect,
    },
    /// Point queries against the region
    Iterator { roi: &'a dyn Roi, bounds: Rect },
}

impl<'a> RoiProbe<'a> {
    /// Probe through a rasterized U8 mask (non-zero = inside)
    ///
    /// # Errors
    ///
    /// Returns an error if the mask is not a single-band U8 raster.
    pub fn accessor(mask: &'a Raster, bounds: Rect) -> TransformResult<Self> {
        if mask.bands() != 1 {
            return Err(TransformError::UnsupportedBands(format!(
                "ROI mask must have one band, got {}",
                mask.bands()
            )));
        }
        Ok(RoiProbe::Accessor {
            samples: mask.samples::<u8>()?,
            width: mask.width(),
            height: mask.height(),
            bounds,
        })
    }

    /// Probe through point-containment queries
    pub fn iterator(roi: &'a dyn Roi) -> Self {
        RoiProbe::Iterator {
            roi,
            bounds: roi.bounds(),
        }
    }

    /// Kernel mask for an anchor at source position `(sx, sy)`
    ///
    /// `(rx, ry)` is the same position relative to the mask origin, taken
    /// from the position table in accessor mode. An anchor outside the ROI
    /// bounds gets an empty mask. Accessor lookups outside the mask raster
    /// count as outside.
    #[inline]
    pub fn kernel_mask(&self, sx: i32, sy: i32, rx: i32, ry: i32, pad: Padding) -> KernelMask {
        match *self {
            RoiProbe::Disabled => KernelMask::ALL,
            RoiProbe::Accessor {
                samples,
                width,
                height,
                bounds,
            } => {
                if !bounds.contains_point(sx, sy) {
                    return KernelMask::NONE;
                }
                Self::collect(pad, |dx, dy| {
                    let (x, y) = (rx + dx, ry + dy);
                    x >= 0
                        && y >= 0
                        && x < width
                        && y < height
                        && samples[y as usize * width as usize + x as usize] != 0
                })
            }
            RoiProbe::Iterator { roi, bounds } => {
                if !bounds.contains_point(sx, sy) {
                    return KernelMask::NONE;
                }
                Self::collect(pad, |dx, dy| roi.contains(sx + dx, sy + dy))
            }
        }
    }

    #[inline]
    fn collect(pad: Padding, inside: impl Fn(i32, i32) -> bool) -> KernelMask {
        let kw = pad.kernel_width();
        let mut bits = 0u32;
        for dy in -pad.top..=pad.bottom {
            for dx in -pad.left..=pad.right {
                if inside(dx, dy) {
                    bits |= 1 << ((dy + pad.top) * kw + dx + pad.left);
                }
            }
        }
        KernelMask(bits)
    }
}
