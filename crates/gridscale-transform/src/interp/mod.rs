//! Interpolators
//!
//! One [`Interpolator`] is active per engine. Each variant turns a source
//! neighborhood ([`Window`]), a pair of sub-pixel fractions ([`Frac`]) and
//! a per-tap ROI mask ([`KernelMask`]) into one destination sample, or
//! `None` when the pixel must take the background value.
//!
//! # Kernel footprint
//!
//! Taps are addressed relative to the anchor, the integer source position
//! produced by the coordinate mapper. A kernel with [`Padding`] `p` reads
//! columns `-p.left..=p.right` and rows `-p.top..=p.bottom` around it.
//!
//! | Variant | Footprint | Padding (l, r, t, b) |
//! |---|---|---|
//! | Nearest | 1x1 | 0, 0, 0, 0 |
//! | Bilinear | 2x2 | 0, 1, 0, 1 |
//! | Bicubic | 4x4 | 1, 2, 1, 2 |
//! | Generic | from [`KernelTable`] | from [`KernelTable`] |
//!
//! # Numeric domains
//!
//! Integer samples interpolate with fixed-point weights and round to
//! nearest with saturation. Float samples use `f64` weights computed from
//! the exact fraction.

mod bicubic;
mod bilinear;
mod generic;
mod kernel;
mod nearest;

pub use bicubic::BicubicInterp;
pub use bilinear::BilinearInterp;
pub use generic::GenericInterp;
pub use kernel::{CubicTable, KernelTable, cubic_weights, keys_weight};
pub use nearest::NearestInterp;

use crate::options::Interpolation;
use gridscale_core::raster::get_data_bit;
use gridscale_core::{NoDataRange, Sample, SampleType};

/// Extra source pixels a kernel reads around its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Padding {
    /// Kernel width in taps
    #[inline]
    pub fn kernel_width(&self) -> i32 {
        self.left + self.right + 1
    }

    /// Kernel height in taps
    #[inline]
    pub fn kernel_height(&self) -> i32 {
        self.top + self.bottom + 1
    }
}

/// Sub-pixel fraction in both representations
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frac {
    /// `floor(frac * 2^subsample_bits)`
    pub fixed: i32,
    /// Exact fraction in `[0, 1)`
    pub real: f64,
}

/// Per-tap ROI membership, bit `row * kernel_width + col`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelMask(pub u32);

impl KernelMask {
    /// Every tap inside
    pub const ALL: KernelMask = KernelMask(u32::MAX);
    /// No tap inside
    pub const NONE: KernelMask = KernelMask(0);

    /// Check whether tap `index` is inside the ROI
    #[inline]
    pub fn get(self, index: u32) -> bool {
        (self.0 >> index) & 1 != 0
    }

    /// Check for a mask without any tap inside
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Source neighborhood of one band around an anchor sample
#[derive(Debug, Clone, Copy)]
pub struct Window<'a, T> {
    data: &'a [T],
    anchor: usize,
    row_stride: isize,
    pixel_stride: isize,
}

impl<'a, T: Sample> Window<'a, T> {
    /// Create a window; `anchor` indexes the anchor's sample of this band
    #[inline]
    pub fn new(data: &'a [T], anchor: usize, row_stride: usize, pixel_stride: usize) -> Self {
        Window {
            data,
            anchor,
            row_stride: row_stride as isize,
            pixel_stride: pixel_stride as isize,
        }
    }

    /// Sample at tap offset (dx, dy) from the anchor
    #[inline]
    pub fn at(&self, dx: i32, dy: i32) -> T {
        let i = self.anchor as isize + dy as isize * self.row_stride + dx as isize * self.pixel_stride;
        self.data[i as usize]
    }
}

/// Neighborhood of a packed 1-bit raster around an anchor bit
#[derive(Debug, Clone, Copy)]
pub struct BitWindow<'a> {
    words: &'a [u32],
    wpl: usize,
    row: usize,
    col: u32,
}

impl<'a> BitWindow<'a> {
    /// Create a window anchored at row `row`, column offset `col`
    #[inline]
    pub fn new(words: &'a [u32], wpl: usize, row: usize, col: u32) -> Self {
        BitWindow {
            words,
            wpl,
            row,
            col,
        }
    }

    /// Bit at tap offset (dx, dy) from the anchor
    #[inline]
    pub fn at(&self, dx: i32, dy: i32) -> u32 {
        let r = (self.row as isize + dy as isize) as usize;
        let line = &self.words[r * self.wpl..(r + 1) * self.wpl];
        get_data_bit(line, (self.col as i64 + dx as i64) as u32)
    }
}

/// No-data test specialized for a sample type
///
/// Byte sources test through a 256-entry lookup table.
#[derive(Debug, Clone)]
pub struct NoDataCheck {
    range: NoDataRange,
    lut: Option<Box<[bool; 256]>>,
}

impl NoDataCheck {
    /// Prepare a check of `range` for samples of `sample_type`
    pub fn new(range: NoDataRange, sample_type: SampleType) -> Self {
        let lut = (sample_type == SampleType::U8).then(|| {
            let mut t = Box::new([false; 256]);
            for (v, slot) in t.iter_mut().enumerate() {
                *slot = range.contains(v as f64);
            }
            t
        });
        NoDataCheck { range, lut }
    }

    /// The configured range
    pub fn range(&self) -> &NoDataRange {
        &self.range
    }

    /// Test one sample
    #[inline]
    pub fn test<T: Sample>(&self, v: T) -> bool {
        match &self.lut {
            Some(lut) if T::SAMPLE_TYPE == SampleType::U8 => lut[v.as_i64() as u8 as usize],
            _ if T::IS_FLOAT => self.range.contains(v.as_f64()),
            _ => self.range.contains_i64(v.as_i64()),
        }
    }

    /// Test one bit of a binary source
    #[inline]
    pub fn test_bit(&self, bit: u32) -> bool {
        self.range.contains(bit as f64)
    }
}

/// Sampling contract shared by every interpolator
///
/// `NODATA` selects whether the embedded no-data check runs; the engine
/// resolves it once per configuration so the inner loop carries no
/// configuration branches.
pub trait Interpolate {
    /// Source pixels needed around the anchor
    fn padding(&self) -> Padding;

    /// Fixed-point precision of the fractions this kernel consumes
    fn subsample_bits(&self) -> u32;

    /// Whether the kernel evaluates ROI and no-data itself
    fn honors_policy(&self) -> bool {
        true
    }

    /// Interpolate one band of a multi-bit source
    fn sample<T: Sample, const NODATA: bool>(
        &self,
        win: &Window<'_, T>,
        fx: Frac,
        fy: Frac,
        mask: KernelMask,
    ) -> Option<T>;

    /// Interpolate one bit of a packed binary source
    fn sample_binary<const NODATA: bool>(
        &self,
        win: &BitWindow<'_>,
        fx: Frac,
        fy: Frac,
        mask: KernelMask,
    ) -> Option<u32>;
}

/// The active interpolation strategy of an engine
#[derive(Debug, Clone)]
pub enum Interpolator {
    Nearest(NearestInterp),
    Bilinear(BilinearInterp),
    Bicubic(BicubicInterp),
    Generic(GenericInterp),
}

impl Interpolator {
    /// Instantiate the configured interpolation for a source sample type
    pub fn new(
        interpolation: &Interpolation,
        nodata: Option<&NoDataRange>,
        sample_type: SampleType,
    ) -> Self {
        let nodata = nodata.map(|r| NoDataCheck::new(*r, sample_type));
        match interpolation {
            Interpolation::Nearest => Interpolator::Nearest(NearestInterp::new(nodata)),
            Interpolation::Bilinear { subsample_bits } => {
                Interpolator::Bilinear(BilinearInterp::new(*subsample_bits, nodata))
            }
            Interpolation::Bicubic {
                subsample_bits,
                precision_bits,
                variant,
            } => Interpolator::Bicubic(BicubicInterp::new(
                *subsample_bits,
                *precision_bits,
                *variant,
                nodata,
            )),
            Interpolation::Generic(table) => Interpolator::Generic(GenericInterp::new(table.clone())),
        }
    }

    /// Source pixels needed around the anchor
    pub fn padding(&self) -> Padding {
        match self {
            Interpolator::Nearest(k) => k.padding(),
            Interpolator::Bilinear(k) => k.padding(),
            Interpolator::Bicubic(k) => k.padding(),
            Interpolator::Generic(k) => k.padding(),
        }
    }

    /// Fixed-point precision of the fractions
    pub fn subsample_bits(&self) -> u32 {
        match self {
            Interpolator::Nearest(k) => k.subsample_bits(),
            Interpolator::Bilinear(k) => k.subsample_bits(),
            Interpolator::Bicubic(k) => k.subsample_bits(),
            Interpolator::Generic(k) => k.subsample_bits(),
        }
    }
}

/// Replace taps outside the ROI in a 2x2 neighborhood
///
/// Samples are ordered `[top-left, top-right, bottom-left, bottom-right]`.
/// An excluded tap takes the value of its row partner when that one is
/// inside, otherwise of its column partner, otherwise of the diagonal one.
/// Returns `false` when all four taps are excluded.
pub(crate) fn substitute_excluded<V: Copy>(s: &mut [V; 4], mask: KernelMask) -> bool {
    let inside = [mask.get(0), mask.get(1), mask.get(2), mask.get(3)];
    if !inside.iter().any(|&b| b) {
        return false;
    }
    let orig = *s;
    for i in 0..4 {
        if inside[i] {
            continue;
        }
        let row_partner = i ^ 1;
        let col_partner = i ^ 2;
        let diagonal = i ^ 3;
        s[i] = if inside[row_partner] {
            orig[row_partner]
        } else if inside[col_partner] {
            orig[col_partner]
        } else {
            orig[diagonal]
        };
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_mask_bits() {
        let m = KernelMask(0b1010);
        assert!(!m.get(0));
        assert!(m.get(1));
        assert!(m.get(3));
        assert!(KernelMask::NONE.is_empty());
        assert!(KernelMask::ALL.get(15));
    }

    #[test]
    fn test_window_offsets() {
        // 3x3 single-band grid, anchor at the center
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8, 9];
        let w = Window::new(&data, 4, 3, 1);
        assert_eq!(w.at(0, 0), 5);
        assert_eq!(w.at(-1, -1), 1);
        assert_eq!(w.at(1, 1), 9);

        // 2x2 two-band grid, band 1
        let data = [0i16, 10, 1, 11, 2, 12, 3, 13];
        let w = Window::new(&data, 1, 4, 2);
        assert_eq!(w.at(1, 1), 13);
    }

    #[test]
    fn test_bit_window() {
        let words = [0x4000_0000u32, 0x8000_0000];
        let w = BitWindow::new(&words, 1, 0, 1);
        assert_eq!(w.at(0, 0), 1);
        assert_eq!(w.at(-1, 1), 1);
        assert_eq!(w.at(0, 1), 0);
    }

    #[test]
    fn test_nodata_check_lut_matches_range() {
        let range = NoDataRange::range(250.0, 255.0).unwrap();
        let byte = NoDataCheck::new(range, SampleType::U8);
        let wide = NoDataCheck::new(range, SampleType::U16);
        for v in 0u8..=255 {
            assert_eq!(byte.test(v), wide.test(v as u16));
        }
        assert!(byte.test(251u8));
        let nan = NoDataCheck::new(NoDataRange::nan(), SampleType::F32);
        assert!(nan.test(f32::NAN));
        assert!(!nan.test(0.0f32));
    }

    #[test]
    fn test_substitute_excluded() {
        let mut s = [1, 2, 3, 4];
        assert!(substitute_excluded(&mut s, KernelMask(0b0101)));
        assert_eq!(s, [1, 1, 3, 3]);

        let mut s = [1, 2, 3, 4];
        assert!(substitute_excluded(&mut s, KernelMask(0b0001)));
        assert_eq!(s, [1, 1, 1, 1]);

        let mut s = [1, 2, 3, 4];
        assert!(substitute_excluded(&mut s, KernelMask(0b0011)));
        assert_eq!(s, [1, 2, 1, 2]);

        let mut s = [1, 2, 3, 4];
        assert!(!substitute_excluded(&mut s, KernelMask::NONE));
    }
}
