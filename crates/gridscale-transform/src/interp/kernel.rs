//! Interpolation kernel tables
//!
//! Weights are pre-computed once per subsample position: a fractional
//! offset `f` in `[0, 1)` is quantized to `f * 2^subsample_bits` and used
//! as the table row.
//!
//! - [`CubicTable`]: Keys cubic convolution weights in fixed point
//! - [`KernelTable`]: arbitrary separable kernels in `f64`, used by the
//!   generic interpolator

use super::Padding;
use crate::{TransformError, TransformResult};

/// Keys cubic convolution kernel value at distance `x`
///
/// `a` selects the parametrization: `-0.5` is the usual choice, `-1.0`
/// gives a sharper kernel.
pub fn keys_weight(a: f64, x: f64) -> f64 {
    let x = x.abs();
    if x <= 1.0 {
        ((a + 2.0) * x - (a + 3.0)) * x * x + 1.0
    } else if x < 2.0 {
        ((a * x - 5.0 * a) * x + 8.0 * a) * x - 4.0 * a
    } else {
        0.0
    }
}

/// Weights of the four taps at offsets -1, 0, 1, 2 for fraction `frac`
#[inline]
pub fn cubic_weights(a: f64, frac: f64) -> [f64; 4] {
    [
        keys_weight(a, 1.0 + frac),
        keys_weight(a, frac),
        keys_weight(a, 1.0 - frac),
        keys_weight(a, 2.0 - frac),
    ]
}

/// Fixed-point cubic weights for every subsample position
///
/// Each row sums to exactly `2^precision_bits`.
#[derive(Debug, Clone)]
pub struct CubicTable {
    precision_bits: u32,
    rows: Vec<[i32; 4]>,
}

impl CubicTable {
    /// Build the table for `2^subsample_bits` positions
    pub fn new(a: f64, subsample_bits: u32, precision_bits: u32) -> Self {
        let positions = 1usize << subsample_bits;
        let one = 1i32 << precision_bits;
        let scale = one as f64;
        let rows = (0..positions)
            .map(|i| {
                let f = i as f64 / positions as f64;
                let w = cubic_weights(a, f);
                let mut row = w.map(|v| (v * scale).round() as i32);
                let sum: i32 = row.iter().sum();
                row[1] += one - sum;
                row
            })
            .collect();
        CubicTable {
            precision_bits,
            rows,
        }
    }

    /// Fixed-point precision of the weights
    #[inline]
    pub fn precision_bits(&self) -> u32 {
        self.precision_bits
    }

    /// Weights for a quantized fraction
    #[inline]
    pub fn weights(&self, frac: i32) -> &[i32; 4] {
        &self.rows[frac as usize]
    }
}

/// A separable interpolation kernel supplied by the caller
///
/// The horizontal kernel has `width` taps, the tap at `key_x` sitting on
/// the integer source position; likewise vertically. Tables hold one row
/// of weights per subsample position.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelTable {
    width: u32,
    height: u32,
    key_x: u32,
    key_y: u32,
    subsample_bits: u32,
    h_weights: Vec<f64>,
    v_weights: Vec<f64>,
}

impl KernelTable {
    /// Create a kernel from explicit weight tables
    ///
    /// `h_weights` holds `2^subsample_bits` rows of `width` weights,
    /// `v_weights` the same with `height` weights.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidParameters`] for an empty kernel, a
    /// key tap outside the kernel, too many subsample bits, or weight
    /// tables of the wrong length.
    pub fn new(
        width: u32,
        key_x: u32,
        h_weights: Vec<f64>,
        height: u32,
        key_y: u32,
        v_weights: Vec<f64>,
        subsample_bits: u32,
    ) -> TransformResult<Self> {
        if width == 0 || height == 0 || key_x >= width || key_y >= height {
            return Err(TransformError::InvalidParameters(format!(
                "invalid kernel geometry: {}x{} with key ({}, {})",
                width, height, key_x, key_y
            )));
        }
        if subsample_bits > crate::MAX_SUBSAMPLE_BITS {
            return Err(TransformError::InvalidParameters(format!(
                "kernel subsample bits {} exceed {}",
                subsample_bits,
                crate::MAX_SUBSAMPLE_BITS
            )));
        }
        let positions = 1usize << subsample_bits;
        if h_weights.len() != positions * width as usize
            || v_weights.len() != positions * height as usize
        {
            return Err(TransformError::InvalidParameters(format!(
                "kernel tables must hold {} and {} weights",
                positions * width as usize,
                positions * height as usize
            )));
        }
        Ok(KernelTable {
            width,
            height,
            key_x,
            key_y,
            subsample_bits,
            h_weights,
            v_weights,
        })
    }

    /// Create a kernel by sampling a weight function
    ///
    /// `weight(offset, frac)` gives the weight of the tap `offset` pixels
    /// from the key tap, for a sub-pixel fraction `frac`. The same function
    /// is used in both directions.
    pub fn from_fn(
        width: u32,
        key_x: u32,
        height: u32,
        key_y: u32,
        subsample_bits: u32,
        weight: impl Fn(i32, f64) -> f64,
    ) -> TransformResult<Self> {
        let positions = 1usize << subsample_bits.min(crate::MAX_SUBSAMPLE_BITS);
        let table = |taps: u32, key: u32| -> Vec<f64> {
            (0..positions)
                .flat_map(|p| {
                    let f = p as f64 / positions as f64;
                    let weight = &weight;
                    (0..taps).map(move |t| weight(t as i32 - key as i32, f))
                })
                .collect()
        };
        let h = table(width, key_x);
        let v = table(height, key_y);
        Self::new(width, key_x, h, height, key_y, v, subsample_bits)
    }

    /// Two-tap linear kernel
    pub fn bilinear(subsample_bits: u32) -> TransformResult<Self> {
        Self::from_fn(2, 0, 2, 0, subsample_bits, |offset, f| {
            if offset == 0 { 1.0 - f } else { f }
        })
    }

    /// Four-tap Keys cubic kernel with parameter `a`
    pub fn cubic(subsample_bits: u32, a: f64) -> TransformResult<Self> {
        Self::from_fn(4, 1, 4, 1, subsample_bits, |offset, f| {
            keys_weight(a, f - offset as f64)
        })
    }

    /// Source pixels needed around the key tap
    pub fn padding(&self) -> Padding {
        Padding {
            left: self.key_x as i32,
            right: (self.width - self.key_x - 1) as i32,
            top: self.key_y as i32,
            bottom: (self.height - self.key_y - 1) as i32,
        }
    }

    /// Number of horizontal taps
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of vertical taps
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fixed-point precision of the fractional positions
    #[inline]
    pub fn subsample_bits(&self) -> u32 {
        self.subsample_bits
    }

    /// Horizontal weights for a quantized fraction
    #[inline]
    pub fn h_weights(&self, frac: i32) -> &[f64] {
        let w = self.width as usize;
        &self.h_weights[frac as usize * w..(frac as usize + 1) * w]
    }

    /// Vertical weights for a quantized fraction
    #[inline]
    pub fn v_weights(&self, frac: i32) -> &[f64] {
        let h = self.height as usize;
        &self.v_weights[frac as usize * h..(frac as usize + 1) * h]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_weight_interpolates() {
        assert_eq!(keys_weight(-0.5, 0.0), 1.0);
        assert_eq!(keys_weight(-0.5, 1.0), 0.0);
        assert_eq!(keys_weight(-0.5, 2.0), 0.0);
        let w = cubic_weights(-0.5, 0.5);
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((w[0] + 0.0625).abs() < 1e-12);
    }

    #[test]
    fn test_cubic_table_rows_normalized() {
        for a in [-0.5, -1.0] {
            let t = CubicTable::new(a, 4, 8);
            for f in 0..16 {
                assert_eq!(t.weights(f).iter().sum::<i32>(), 256);
            }
            assert_eq!(t.weights(0), &[0, 256, 0, 0]);
        }
    }

    #[test]
    fn test_kernel_table_validation() {
        assert!(KernelTable::new(2, 2, vec![0.0; 4], 2, 0, vec![0.0; 4], 1).is_err());
        assert!(KernelTable::new(2, 0, vec![0.0; 3], 2, 0, vec![0.0; 4], 1).is_err());
        assert!(KernelTable::new(2, 0, vec![0.0; 4], 2, 0, vec![0.0; 4], 1).is_ok());
    }

    #[test]
    fn test_builtin_kernels() {
        let k = KernelTable::bilinear(2).unwrap();
        assert_eq!(k.h_weights(1), &[0.75, 0.25]);
        assert_eq!(k.padding(), Padding { left: 0, right: 1, top: 0, bottom: 1 });

        let c = KernelTable::cubic(3, -0.5).unwrap();
        assert_eq!(c.padding(), Padding { left: 1, right: 2, top: 1, bottom: 2 });
        assert_eq!(c.v_weights(0), &[0.0, 1.0, 0.0, 0.0]);
    }
}
