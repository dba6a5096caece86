//! Nearest-neighbor interpolation

use super::{BitWindow, Frac, Interpolate, KernelMask, NoDataCheck, Padding, Window};
use gridscale_core::Sample;

/// Copies the sample under the mapped source position
#[derive(Debug, Clone, Default)]
pub struct NearestInterp {
    nodata: Option<NoDataCheck>,
}

impl NearestInterp {
    /// Create a nearest-neighbor interpolator with an optional no-data check
    pub fn new(nodata: Option<NoDataCheck>) -> Self {
        NearestInterp { nodata }
    }
}

impl Interpolate for NearestInterp {
    fn padding(&self) -> Padding {
        Padding::default()
    }

    fn subsample_bits(&self) -> u32 {
        0
    }

    #[inline]
    fn sample<T: Sample, const NODATA: bool>(
        &self,
        win: &Window<'_, T>,
        _fx: Frac,
        _fy: Frac,
        mask: KernelMask,
    ) -> Option<T> {
        let v = win.at(0, 0);
        if NODATA && self.nodata.as_ref().is_some_and(|nd| nd.test(v)) {
            return None;
        }
        mask.get(0).then_some(v)
    }

    #[inline]
    fn sample_binary<const NODATA: bool>(
        &self,
        win: &BitWindow<'_>,
        _fx: Frac,
        _fy: Frac,
        mask: KernelMask,
    ) -> Option<u32> {
        let bit = win.at(0, 0);
        if NODATA && self.nodata.as_ref().is_some_and(|nd| nd.test_bit(bit)) {
            return None;
        }
        mask.get(0).then_some(bit)
    }
}
