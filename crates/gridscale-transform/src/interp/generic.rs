//! Caller-supplied separable kernel
//!
//! Weights come from a [`KernelTable`]. This interpolator reads every tap
//! unconditionally: it does not evaluate the ROI mask or the no-data
//! range, so the engine always runs it with the plain policy.

use super::{BitWindow, Frac, Interpolate, KernelMask, KernelTable, Padding, Window};
use gridscale_core::Sample;
use std::sync::Arc;

/// Separable convolution with arbitrary weights
#[derive(Debug, Clone)]
pub struct GenericInterp {
    table: Arc<KernelTable>,
    padding: Padding,
}

impl GenericInterp {
    /// Wrap a kernel table
    pub fn new(table: Arc<KernelTable>) -> Self {
        let padding = table.padding();
        GenericInterp { table, padding }
    }

    /// The kernel in use
    pub fn table(&self) -> &KernelTable {
        &self.table
    }

    fn convolve(&self, at: impl Fn(i32, i32) -> f64, fx: i32, fy: i32) -> f64 {
        let wx = self.table.h_weights(fx);
        let wy = self.table.v_weights(fy);
        let p = self.padding;
        let mut sum = 0.0;
        for (j, &w) in wy.iter().enumerate() {
            let dy = j as i32 - p.top;
            let h: f64 = wx
                .iter()
                .enumerate()
                .map(|(i, &c)| at(i as i32 - p.left, dy) * c)
                .sum();
            sum += h * w;
        }
        sum
    }
}

impl Interpolate for GenericInterp {
    fn padding(&self) -> Padding {
        self.padding
    }

    fn subsample_bits(&self) -> u32 {
        self.table.subsample_bits()
    }

    fn honors_policy(&self) -> bool {
        false
    }

    fn sample<T: Sample, const NODATA: bool>(
        &self,
        win: &Window<'_, T>,
        fx: Frac,
        fy: Frac,
        _mask: KernelMask,
    ) -> Option<T> {
        let v = self.convolve(|dx, dy| win.at(dx, dy).as_f64(), fx.fixed, fy.fixed);
        Some(T::from_f64_clamped(v))
    }

    fn sample_binary<const NODATA: bool>(
        &self,
        win: &BitWindow<'_>,
        fx: Frac,
        fy: Frac,
        _mask: KernelMask,
    ) -> Option<u32> {
        let v = self.convolve(|dx, dy| f64::from(win.at(dx, dy)), fx.fixed, fy.fixed);
        Some(u32::from(v >= 0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_bilinear_table() {
        let k = GenericInterp::new(Arc::new(KernelTable::bilinear(2).unwrap()));
        assert!(!k.honors_policy());
        assert_eq!(k.padding(), Padding { left: 0, right: 1, top: 0, bottom: 1 });

        let data = [0u8, 100, 100, 200];
        let win = Window::new(&data, 0, 2, 1);
        let half = Frac { fixed: 2, real: 0.5 };
        // Mask is ignored
        assert_eq!(k.sample::<u8, true>(&win, half, half, KernelMask::NONE), Some(100));
    }

    #[test]
    fn test_generic_cubic_float() {
        let k = GenericInterp::new(Arc::new(KernelTable::cubic(3, -0.5).unwrap()));
        let data: Vec<f32> = (0..16).map(|i| (i % 4) as f32).collect();
        let win = Window::new(&data, 5, 4, 1);
        let fx = Frac { fixed: 4, real: 0.5 };
        let v = k.sample::<f32, false>(&win, fx, Frac::default(), KernelMask::ALL).unwrap();
        assert!((v - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_generic_box_kernel_rounds() {
        // Three-tap box with the key tap in the middle
        let table = KernelTable::new(3, 1, vec![1.0 / 3.0; 3], 1, 0, vec![1.0], 0).unwrap();
        let k = GenericInterp::new(Arc::new(table));
        let data = [1i32, 2, 4];
        let win = Window::new(&data, 1, 3, 1);
        let f = Frac::default();
        // 7 / 3 rounds to 2
        assert_eq!(k.sample::<i32, false>(&win, f, f, KernelMask::ALL), Some(2));
    }
}
