//! Bilinear interpolation
//!
//! Integer samples are blended in fixed point with `subsample_bits` of
//! fractional precision per axis:
//!
//! ```text
//! top = s00 * (1 - fx) + s01 * fx
//! bot = s10 * (1 - fx) + s11 * fx
//! out = (top * (1 - fy) + bot * fy + round) >> (2 * subsample_bits)
//! ```
//!
//! Taps outside the ROI are replaced by an inside neighbor before
//! blending; the pixel is background only when all four are outside.

use super::{
    BitWindow, Frac, Interpolate, KernelMask, NoDataCheck, Padding, Window, substitute_excluded,
};
use gridscale_core::Sample;

/// 2x2 linear interpolation
#[derive(Debug, Clone)]
pub struct BilinearInterp {
    subsample_bits: u32,
    nodata: Option<NoDataCheck>,
}

impl BilinearInterp {
    /// Create a bilinear interpolator
    pub fn new(subsample_bits: u32, nodata: Option<NoDataCheck>) -> Self {
        BilinearInterp {
            subsample_bits,
            nodata,
        }
    }

    #[inline]
    fn gather<T: Sample>(win: &Window<'_, T>) -> [T; 4] {
        [win.at(0, 0), win.at(1, 0), win.at(0, 1), win.at(1, 1)]
    }

    /// Blend four integer samples with fixed-point fractions
    #[inline]
    fn blend_fixed(&self, s: [i64; 4], fx: i64, fy: i64) -> i64 {
        let bits = self.subsample_bits;
        let one = 1i64 << bits;
        let top = s[0] * (one - fx) + s[1] * fx;
        let bot = s[2] * (one - fx) + s[3] * fx;
        let sum = top * (one - fy) + bot * fy;
        if bits == 0 {
            sum
        } else {
            (sum + (1i64 << (2 * bits - 1))) >> (2 * bits)
        }
    }

    /// Blend four real samples with exact fractions
    #[inline]
    fn blend_real(s: [f64; 4], fx: f64, fy: f64) -> f64 {
        let top = s[0] + (s[1] - s[0]) * fx;
        let bot = s[2] + (s[3] - s[2]) * fx;
        top + (bot - top) * fy
    }
}

impl Interpolate for BilinearInterp {
    fn padding(&self) -> Padding {
        Padding {
            left: 0,
            right: 1,
            top: 0,
            bottom: 1,
        }
    }

    fn subsample_bits(&self) -> u32 {
        self.subsample_bits
    }

    fn sample<T: Sample, const NODATA: bool>(
        &self,
        win: &Window<'_, T>,
        fx: Frac,
        fy: Frac,
        mask: KernelMask,
    ) -> Option<T> {
        let mut s = Self::gather(win);
        if NODATA
            && let Some(nd) = &self.nodata
            && s.iter().any(|&v| nd.test(v))
        {
            return None;
        }
        if mask != KernelMask::ALL && !substitute_excluded(&mut s, mask) {
            return None;
        }
        if T::IS_FLOAT {
            let v = Self::blend_real(s.map(Sample::as_f64), fx.real, fy.real);
            Some(T::from_f64_clamped(v))
        } else {
            let v = self.blend_fixed(s.map(Sample::as_i64), fx.fixed as i64, fy.fixed as i64);
            Some(T::from_i64_clamped(v))
        }
    }

    fn sample_binary<const NODATA: bool>(
        &self,
        win: &BitWindow<'_>,
        fx: Frac,
        fy: Frac,
        mask: KernelMask,
    ) -> Option<u32> {
        let mut s = [win.at(0, 0), win.at(1, 0), win.at(0, 1), win.at(1, 1)];
        if NODATA
            && let Some(nd) = &self.nodata
            && s.iter().any(|&b| nd.test_bit(b))
        {
            return None;
        }
        if mask != KernelMask::ALL && !substitute_excluded(&mut s, mask) {
            return None;
        }
        let v = Self::blend_real(s.map(f64::from), fx.real, fy.real);
        Some(u32::from(v >= 0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridscale_core::{NoDataRange, SampleType};

    fn frac(real: f64, bits: u32) -> Frac {
        Frac {
            fixed: (real * (1 << bits) as f64) as i32,
            real,
        }
    }

    #[test]
    fn test_bilinear_integer_center() {
        // Anchor (0,0) of a 2x2 grid: 0 100 / 100 200
        let data = [0u8, 100, 100, 200];
        let win = Window::new(&data, 0, 2, 1);
        let k = BilinearInterp::new(8, None);
        let half = frac(0.5, 8);
        assert_eq!(k.sample::<u8, false>(&win, half, half, KernelMask::ALL), Some(100));
        let zero = frac(0.0, 8);
        assert_eq!(k.sample::<u8, false>(&win, zero, zero, KernelMask::ALL), Some(0));
        let q = frac(0.25, 8);
        assert_eq!(k.sample::<u8, false>(&win, q, zero, KernelMask::ALL), Some(25));
    }

    #[test]
    fn test_bilinear_negative_rounding() {
        let data = [-3i16, -4, -3, -4];
        let win = Window::new(&data, 0, 2, 1);
        let k = BilinearInterp::new(4, None);
        let half = frac(0.5, 4);
        // -3.5 rounds half up to -3
        assert_eq!(k.sample::<i16, false>(&win, half, half, KernelMask::ALL), Some(-3));
    }

    #[test]
    fn test_bilinear_float() {
        let data = [0.0f32, 1.0, 2.0, 3.0];
        let win = Window::new(&data, 0, 2, 1);
        let k = BilinearInterp::new(8, None);
        let v = k
            .sample::<f32, false>(&win, frac(0.3, 8), frac(0.6, 8), KernelMask::ALL)
            .unwrap();
        assert!((v - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_bilinear_nodata_any_tap() {
        let data = [10u8, 10, 10, 255];
        let win = Window::new(&data, 0, 2, 1);
        let nd = NoDataCheck::new(NoDataRange::single(255.0), SampleType::U8);
        let k = BilinearInterp::new(8, Some(nd));
        let z = frac(0.0, 8);
        assert_eq!(k.sample::<u8, true>(&win, z, z, KernelMask::ALL), None);
    }

    #[test]
    fn test_bilinear_roi_substitution() {
        let data = [10u8, 90, 10, 90];
        let win = Window::new(&data, 0, 2, 1);
        let k = BilinearInterp::new(8, None);
        let half = frac(0.5, 8);
        // Right column outside: both taps take the left value
        assert_eq!(k.sample::<u8, false>(&win, half, half, KernelMask(0b0101)), Some(10));
        assert_eq!(k.sample::<u8, false>(&win, half, half, KernelMask::NONE), None);
    }

    #[test]
    fn test_bilinear_binary_threshold() {
        let words = [0x8000_0000u32, 0x8000_0000];
        let win = BitWindow::new(&words, 1, 0, 0);
        let k = BilinearInterp::new(8, None);
        let z = frac(0.0, 8);
        assert_eq!(k.sample_binary::<false>(&win, frac(0.25, 8), z, KernelMask::ALL), Some(1));
        assert_eq!(k.sample_binary::<false>(&win, frac(0.75, 8), z, KernelMask::ALL), Some(0));
    }
}
