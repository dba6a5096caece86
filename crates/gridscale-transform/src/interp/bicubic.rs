//! Bicubic interpolation
//!
//! Keys cubic convolution over a 4x4 neighborhood. Integer samples use a
//! fixed-point weight table with `precision_bits` of precision, indexed by
//! the quantized fraction; float samples evaluate the kernel at the exact
//! fraction.

use super::{
    BitWindow, CubicTable, Frac, Interpolate, KernelMask, NoDataCheck, Padding, Window,
    cubic_weights,
};
use crate::options::CubicVariant;
use gridscale_core::Sample;
use std::sync::Arc;

const TAPS: [i32; 4] = [-1, 0, 1, 2];

/// 4x4 cubic convolution
#[derive(Debug, Clone)]
pub struct BicubicInterp {
    subsample_bits: u32,
    variant: CubicVariant,
    table: Arc<CubicTable>,
    nodata: Option<NoDataCheck>,
}

impl BicubicInterp {
    /// Create a bicubic interpolator
    pub fn new(
        subsample_bits: u32,
        precision_bits: u32,
        variant: CubicVariant,
        nodata: Option<NoDataCheck>,
    ) -> Self {
        BicubicInterp {
            subsample_bits,
            variant,
            table: Arc::new(CubicTable::new(
                variant.parameter(),
                subsample_bits,
                precision_bits,
            )),
            nodata,
        }
    }

    /// Fixed-point precision of the kernel coefficients
    pub fn precision_bits(&self) -> u32 {
        self.table.precision_bits()
    }

    /// Kernel parametrization
    pub fn variant(&self) -> CubicVariant {
        self.variant
    }

    #[inline]
    fn gather<V: Copy>(at: impl Fn(i32, i32) -> V) -> [[V; 4]; 4] {
        TAPS.map(|dy| TAPS.map(|dx| at(dx, dy)))
    }

    fn convolve_real(s: &[[f64; 4]; 4], wx: &[f64; 4], wy: &[f64; 4]) -> f64 {
        let mut sum = 0.0;
        for (row, w) in s.iter().zip(wy) {
            let h: f64 = row.iter().zip(wx).map(|(v, c)| v * c).sum();
            sum += h * w;
        }
        sum
    }

    fn convolve_fixed(&self, s: &[[i64; 4]; 4], fx: i32, fy: i32) -> i64 {
        let wx = self.table.weights(fx);
        let wy = self.table.weights(fy);
        let mut sum = 0i64;
        for (row, &w) in s.iter().zip(wy) {
            let h: i64 = row.iter().zip(wx).map(|(&v, &c)| v * c as i64).sum();
            sum += h * w as i64;
        }
        let shift = 2 * self.table.precision_bits();
        if shift == 0 {
            sum
        } else {
            (sum + (1i64 << (shift - 1))) >> shift
        }
    }
}

impl Interpolate for BicubicInterp {
    fn padding(&self) -> Padding {
        Padding {
            left: 1,
            right: 2,
            top: 1,
            bottom: 2,
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
        let s = Self::gather(|dx, dy| win.at(dx, dy));
        if NODATA
            && let Some(nd) = &self.nodata
            && s.iter().flatten().any(|&v| nd.test(v))
        {
            return None;
        }
        if mask.0 & 0xFFFF == 0 {
            return None;
        }
        if T::IS_FLOAT {
            let a = self.variant.parameter();
            let v = Self::convolve_real(
                &s.map(|row| row.map(Sample::as_f64)),
                &cubic_weights(a, fx.real),
                &cubic_weights(a, fy.real),
            );
            Some(T::from_f64_clamped(v))
        } else {
            let v = self.convolve_fixed(&s.map(|row| row.map(Sample::as_i64)), fx.fixed, fy.fixed);
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
        let s = Self::gather(|dx, dy| win.at(dx, dy));
        if NODATA
            && let Some(nd) = &self.nodata
            && s.iter().flatten().any(|&b| nd.test_bit(b))
        {
            return None;
        }
        if mask.0 & 0xFFFF == 0 {
            return None;
        }
        let a = self.variant.parameter();
        let v = Self::convolve_real(
            &s.map(|row| row.map(f64::from)),
            &cubic_weights(a, fx.real),
            &cubic_weights(a, fy.real),
        );
        Some(u32::from(v >= 0.5))
    }
}
