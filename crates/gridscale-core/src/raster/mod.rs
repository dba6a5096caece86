//! Raster - Multi-band sample grids in a global pixel space
//!
//! A raster covers a rectangle of the global pixel grid (its origin may be
//! negative) and stores one or more bands of a single [`SampleType`].
//!
//! # Sample layout
//!
//! - Multi-bit samples are band-interleaved, row-major, with no row padding
//! - 1-bit samples are packed MSB to LSB into 32-bit words
//! - Every 1-bit row starts on a 32-bit boundary (`wpl` words per line)
//! - Pad bits past the last column of a 1-bit row are always zero
//!
//! # Ownership model
//!
//! `Raster` uses `Arc` for cheap cloning (shared ownership), so one source
//! can be read by many tile computations at once. To modify samples,
//! convert to [`RasterMut`] via [`Raster::try_into_mut`] or
//! [`Raster::to_mut`], then convert back with `Into<Raster>`.

mod access;
mod sample;

pub use access::*;
pub use sample::Sample;

use crate::error::{Error, Result};
use crate::rect::Rect;
use std::sync::Arc;

/// Numeric type of every sample in a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    /// 1-bit binary, packed
    Bit1,
    /// 8-bit unsigned
    U8,
    /// 16-bit unsigned
    U16,
    /// 16-bit signed
    I16,
    /// 32-bit signed
    I32,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
}

impl SampleType {
    /// Bits per sample
    pub fn bits(self) -> u32 {
        match self {
            SampleType::Bit1 => 1,
            SampleType::U8 => 8,
            SampleType::U16 | SampleType::I16 => 16,
            SampleType::I32 | SampleType::F32 => 32,
            SampleType::F64 => 64,
        }
    }

    /// Check for a floating-point sample type
    pub fn is_float(self) -> bool {
        matches!(self, SampleType::F32 | SampleType::F64)
    }

    /// Check for the packed binary sample type
    pub fn is_binary(self) -> bool {
        self == SampleType::Bit1
    }

    /// Smallest representable value as `f64`
    pub fn min_value(self) -> f64 {
        match self {
            SampleType::Bit1 | SampleType::U8 | SampleType::U16 => 0.0,
            SampleType::I16 => i16::MIN as f64,
            SampleType::I32 => i32::MIN as f64,
            SampleType::F32 => f32::MIN as f64,
            SampleType::F64 => f64::MIN,
        }
    }

    /// Largest representable value as `f64`
    pub fn max_value(self) -> f64 {
        match self {
            SampleType::Bit1 => 1.0,
            SampleType::U8 => u8::MAX as f64,
            SampleType::U16 => u16::MAX as f64,
            SampleType::I16 => i16::MAX as f64,
            SampleType::I32 => i32::MAX as f64,
            SampleType::F32 => f32::MAX as f64,
            SampleType::F64 => f64::MAX,
        }
    }
}

/// Typed sample storage
#[derive(Debug, Clone, PartialEq)]
pub enum RasterBuffer {
    /// Packed bits, `wpl` words per row
    Bit1(Vec<u32>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

/// Apply an expression to the vector inside any multi-bit buffer variant
macro_rules! with_typed_buffer {
    ($buf:expr, $v:ident => $body:expr, bits $w:ident => $bits:expr) => {
        match $buf {
            RasterBuffer::Bit1($w) => $bits,
            RasterBuffer::U8($v) => $body,
            RasterBuffer::U16($v) => $body,
            RasterBuffer::I16($v) => $body,
            RasterBuffer::I32($v) => $body,
            RasterBuffer::F32($v) => $body,
            RasterBuffer::F64($v) => $body,
        }
    };
}

impl RasterBuffer {
    fn zeroed(sample_type: SampleType, len: usize) -> Self {
        match sample_type {
            SampleType::Bit1 => RasterBuffer::Bit1(vec![0; len]),
            SampleType::U8 => RasterBuffer::U8(vec![0; len]),
            SampleType::U16 => RasterBuffer::U16(vec![0; len]),
            SampleType::I16 => RasterBuffer::I16(vec![0; len]),
            SampleType::I32 => RasterBuffer::I32(vec![0; len]),
            SampleType::F32 => RasterBuffer::F32(vec![0.0; len]),
            SampleType::F64 => RasterBuffer::F64(vec![0.0; len]),
        }
    }

    /// Sample type tag of this buffer
    pub fn sample_type(&self) -> SampleType {
        match self {
            RasterBuffer::Bit1(_) => SampleType::Bit1,
            RasterBuffer::U8(_) => SampleType::U8,
            RasterBuffer::U16(_) => SampleType::U16,
            RasterBuffer::I16(_) => SampleType::I16,
            RasterBuffer::I32(_) => SampleType::I32,
            RasterBuffer::F32(_) => SampleType::F32,
            RasterBuffer::F64(_) => SampleType::F64,
        }
    }

    /// Number of stored elements (words for packed bits)
    pub fn len(&self) -> usize {
        with_typed_buffer!(self, v => v.len(), bits w => w.len())
    }

    /// Check for an empty buffer
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read element `i` of a multi-bit buffer as `f64`
    fn get_f64(&self, i: usize) -> f64 {
        with_typed_buffer!(self, v => Sample::as_f64(v[i]), bits w => w[i] as f64)
    }

    /// Write element `i` of a multi-bit buffer from `f64`
    fn set_f64(&mut self, i: usize, val: f64) {
        with_typed_buffer!(
            self,
            v => v[i] = Sample::from_f64_clamped(val),
            bits w => w[i] = val as u32
        )
    }

    /// Copy `len` elements from `src[src_at..]` into `self[dst_at..]`
    fn copy_span(&mut self, dst_at: usize, src: &RasterBuffer, src_at: usize, len: usize) {
        macro_rules! span {
            ($d:expr, $s:expr) => {
                $d[dst_at..dst_at + len].copy_from_slice(&$s[src_at..src_at + len])
            };
        }
        match (self, src) {
            (RasterBuffer::U8(d), RasterBuffer::U8(s)) => span!(d, s),
            (RasterBuffer::U16(d), RasterBuffer::U16(s)) => span!(d, s),
            (RasterBuffer::I16(d), RasterBuffer::I16(s)) => span!(d, s),
            (RasterBuffer::I32(d), RasterBuffer::I32(s)) => span!(d, s),
            (RasterBuffer::F32(d), RasterBuffer::F32(s)) => span!(d, s),
            (RasterBuffer::F64(d), RasterBuffer::F64(s)) => span!(d, s),
            (RasterBuffer::Bit1(d), RasterBuffer::Bit1(s)) => span!(d, s),
            _ => {}
        }
    }
}

/// Internal raster data
#[derive(Debug, Clone, PartialEq)]
struct RasterData {
    /// Covered region of the global grid
    rect: Rect,
    /// Samples per pixel
    bands: u32,
    /// Sample type
    sample_type: SampleType,
    /// 32-bit words per line (1-bit rasters only, 0 otherwise)
    wpl: u32,
    /// Sample storage
    buffer: RasterBuffer,
}

impl RasterData {
    fn new(rect: Rect, bands: u32, sample_type: SampleType) -> Result<Self> {
        if rect.w <= 0 || rect.h <= 0 {
            return Err(Error::InvalidDimension {
                width: rect.w,
                height: rect.h,
            });
        }
        if bands == 0 || (sample_type == SampleType::Bit1 && bands != 1) {
            return Err(Error::InvalidBands { bands, sample_type });
        }
        let (wpl, len) = if sample_type == SampleType::Bit1 {
            let wpl = (rect.w as u32).div_ceil(32);
            (wpl, wpl as usize * rect.h as usize)
        } else {
            (0, rect.w as usize * rect.h as usize * bands as usize)
        };
        Ok(RasterData {
            rect,
            bands,
            sample_type,
            wpl,
            buffer: RasterBuffer::zeroed(sample_type, len),
        })
    }

    fn words(&self) -> &[u32] {
        match &self.buffer {
            RasterBuffer::Bit1(w) => w,
            _ => &[],
        }
    }

    fn words_mut(&mut self) -> &mut [u32] {
        match &mut self.buffer {
            RasterBuffer::Bit1(w) => w,
            _ => &mut [],
        }
    }

    fn samples<T: Sample>(&self) -> Result<&[T]> {
        T::slice(&self.buffer).ok_or(Error::SampleTypeMismatch {
            expected: T::SAMPLE_TYPE,
            actual: self.sample_type,
        })
    }

    fn samples_mut<T: Sample>(&mut self) -> Result<&mut [T]> {
        let actual = self.sample_type;
        T::slice_mut(&mut self.buffer).ok_or(Error::SampleTypeMismatch {
            expected: T::SAMPLE_TYPE,
            actual,
        })
    }

    fn check_binary(&self) -> Result<()> {
        if self.sample_type != SampleType::Bit1 {
            return Err(Error::SampleTypeMismatch {
                expected: SampleType::Bit1,
                actual: self.sample_type,
            });
        }
        Ok(())
    }

    /// Fill every pixel with per-band values (one value broadcasts)
    fn fill(&mut self, values: &[f64]) -> Result<()> {
        let bands = self.bands as usize;
        if values.len() != 1 && values.len() != bands {
            return Err(Error::InvalidParameter(format!(
                "{} fill values for {} bands",
                values.len(),
                bands
            )));
        }
        if self.sample_type == SampleType::Bit1 {
            let word = if values[0] >= 0.5 { u32::MAX } else { 0 };
            self.words_mut().fill(word);
            self.clear_pad_bits();
            return Ok(());
        }
        let pixel: Vec<f64> = (0..bands)
            .map(|b| if values.len() == 1 { values[0] } else { values[b] })
            .collect();
        let n = self.buffer.len();
        for i in 0..n {
            self.buffer.set_f64(i, pixel[i % bands]);
        }
        Ok(())
    }

    /// Zero the bits past the last column of every packed row
    fn clear_pad_bits(&mut self) {
        let used = (self.rect.w as u32) & 31;
        if used == 0 {
            return;
        }
        let mask = !(u32::MAX >> used);
        let wpl = self.wpl as usize;
        for row in self.words_mut().chunks_mut(wpl) {
            if let Some(last) = row.last_mut() {
                *last &= mask;
            }
        }
    }

    /// Copy the overlap of `src` into this raster
    fn copy_from(&mut self, src: &RasterData) -> Result<()> {
        if src.sample_type != self.sample_type {
            return Err(Error::SampleTypeMismatch {
                expected: self.sample_type,
                actual: src.sample_type,
            });
        }
        if src.bands != self.bands {
            return Err(Error::InvalidParameter(format!(
                "band count mismatch: {} vs {}",
                self.bands, src.bands
            )));
        }
        let Some(overlap) = self.rect.intersect(&src.rect) else {
            return Ok(());
        };

        if self.sample_type == SampleType::Bit1 {
            let (dwpl, swpl) = (self.wpl as usize, src.wpl as usize);
            let (dst_x0, dst_y0) = (self.rect.x, self.rect.y);
            let src_words = src.words();
            let dst_words = self.words_mut();
            for y in overlap.y..overlap.bottom() {
                let sy = (y - src.rect.y) as usize;
                let dy = (y - dst_y0) as usize;
                let src_row = &src_words[sy * swpl..(sy + 1) * swpl];
                let row = &mut dst_words[dy * dwpl..(dy + 1) * dwpl];
                for x in overlap.x..overlap.right() {
                    let bit = get_data_bit(src_row, (x - src.rect.x) as u32);
                    set_data_bit(row, (x - dst_x0) as u32, bit);
                }
            }
            return Ok(());
        }

        let bands = self.bands as usize;
        let len = overlap.w as usize * bands;
        for y in overlap.y..overlap.bottom() {
            let s = ((y - src.rect.y) as usize * src.rect.w as usize
                + (overlap.x - src.rect.x) as usize)
                * bands;
            let d = ((y - self.rect.y) as usize * self.rect.w as usize
                + (overlap.x - self.rect.x) as usize)
                * bands;
            self.buffer.copy_span(d, &src.buffer, s, len);
        }
        Ok(())
    }
}

/// Raster - Immutable, shared sample grid
///
/// # Examples
///
/// ```
/// use gridscale_core::{Raster, Rect, SampleType};
///
/// let r = Raster::new(Rect::new_unchecked(-8, 0, 16, 4), 3, SampleType::U16).unwrap();
/// assert_eq!(r.width(), 16);
/// assert_eq!(r.bands(), 3);
/// assert_eq!(r.get_f64(-8, 0, 2).unwrap(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Raster {
    inner: Arc<RasterData>,
}

impl Raster {
    /// Create a zero-filled raster
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for an empty rectangle and
    /// [`Error::InvalidBands`] for zero bands or a multi-band 1-bit raster.
    pub fn new(rect: Rect, bands: u32, sample_type: SampleType) -> Result<Self> {
        Ok(Raster {
            inner: Arc::new(RasterData::new(rect, bands, sample_type)?),
        })
    }

    /// Create a raster with one band per value in `values`, each band
    /// filled with its value
    pub fn new_filled(rect: Rect, sample_type: SampleType, values: &[f64]) -> Result<Self> {
        let mut data = RasterData::new(rect, values.len() as u32, sample_type)?;
        data.fill(values)?;
        Ok(Raster {
            inner: Arc::new(data),
        })
    }

    /// Create a raster from band-interleaved, row-major samples
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferLength`] if `data` does not hold exactly
    /// `w * h * bands` samples.
    pub fn from_vec<T: Sample>(rect: Rect, bands: u32, data: Vec<T>) -> Result<Self> {
        let mut inner = RasterData::new(rect, bands, T::SAMPLE_TYPE)?;
        if data.len() != inner.buffer.len() {
            return Err(Error::BufferLength {
                expected: inner.buffer.len(),
                actual: data.len(),
            });
        }
        inner.buffer = T::into_buffer(data);
        Ok(Raster {
            inner: Arc::new(inner),
        })
    }

    /// Create a 1-bit raster from row-major bit values (non-zero = 1)
    pub fn from_bits(rect: Rect, bits: &[u8]) -> Result<Self> {
        let mut inner = RasterData::new(rect, 1, SampleType::Bit1)?;
        let (w, h) = (rect.w as usize, rect.h as usize);
        if bits.len() != w * h {
            return Err(Error::BufferLength {
                expected: w * h,
                actual: bits.len(),
            });
        }
        let wpl = inner.wpl as usize;
        let words = inner.words_mut();
        for (y, row_bits) in bits.chunks(w).enumerate() {
            let row = &mut words[y * wpl..(y + 1) * wpl];
            for (x, &b) in row_bits.iter().enumerate() {
                if b != 0 {
                    set_data_bit_val(row, x as u32);
                }
            }
        }
        Ok(Raster {
            inner: Arc::new(inner),
        })
    }

    /// Covered rectangle
    #[inline]
    pub fn rect(&self) -> Rect {
        self.inner.rect
    }

    /// Leftmost column
    #[inline]
    pub fn x(&self) -> i32 {
        self.inner.rect.x
    }

    /// Top row
    #[inline]
    pub fn y(&self) -> i32 {
        self.inner.rect.y
    }

    /// Width in pixels
    #[inline]
    pub fn width(&self) -> i32 {
        self.inner.rect.w
    }

    /// Height in pixels
    #[inline]
    pub fn height(&self) -> i32 {
        self.inner.rect.h
    }

    /// Samples per pixel
    #[inline]
    pub fn bands(&self) -> u32 {
        self.inner.bands
    }

    /// Sample type
    #[inline]
    pub fn sample_type(&self) -> SampleType {
        self.inner.sample_type
    }

    /// 32-bit words per line of a 1-bit raster (0 for multi-bit rasters)
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Raw sample storage
    #[inline]
    pub fn buffer(&self) -> &RasterBuffer {
        &self.inner.buffer
    }

    /// Typed view of the samples
    ///
    /// # Errors
    ///
    /// Returns [`Error::SampleTypeMismatch`] if `T` is not the raster's type.
    pub fn samples<T: Sample>(&self) -> Result<&[T]> {
        self.inner.samples()
    }

    /// Packed words of a 1-bit raster
    pub fn words(&self) -> Result<&[u32]> {
        self.inner.check_binary()?;
        Ok(self.inner.words())
    }

    /// Copy out a sub-region
    ///
    /// # Errors
    ///
    /// Returns [`Error::RectOutOfBounds`] unless `rect` is non-empty and
    /// lies inside the raster.
    pub fn sub_raster(&self, rect: Rect) -> Result<Raster> {
        if rect.is_empty() || !self.rect().contains_rect(&rect) {
            return Err(Error::RectOutOfBounds {
                requested: rect,
                bounds: self.rect(),
            });
        }
        if rect == self.rect() {
            return Ok(self.clone());
        }
        let mut data = RasterData::new(rect, self.bands(), self.sample_type())?;
        data.copy_from(&self.inner)?;
        Ok(Raster {
            inner: Arc::new(data),
        })
    }

    /// Create a deep copy
    ///
    /// Unlike `clone()`, which shares data via `Arc`, this creates a
    /// completely independent copy.
    pub fn deep_clone(&self) -> Self {
        Raster {
            inner: Arc::new((*self.inner).clone()),
        }
    }

    /// Try to get mutable access to the samples
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<RasterMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(RasterMut { inner: data }),
            Err(arc) => Err(Raster { inner: arc }),
        }
    }

    /// Create a mutable copy
    pub fn to_mut(&self) -> RasterMut {
        RasterMut {
            inner: (*self.inner).clone(),
        }
    }
}

impl PartialEq for Raster {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

/// Mutable raster
///
/// Allows modification of samples. Convert back to an immutable
/// [`Raster`] using `Into<Raster>`.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterMut {
    inner: RasterData,
}

impl RasterMut {
    /// Covered rectangle
    #[inline]
    pub fn rect(&self) -> Rect {
        self.inner.rect
    }

    /// Width in pixels
    #[inline]
    pub fn width(&self) -> i32 {
        self.inner.rect.w
    }

    /// Height in pixels
    #[inline]
    pub fn height(&self) -> i32 {
        self.inner.rect.h
    }

    /// Samples per pixel
    #[inline]
    pub fn bands(&self) -> u32 {
        self.inner.bands
    }

    /// Sample type
    #[inline]
    pub fn sample_type(&self) -> SampleType {
        self.inner.sample_type
    }

    /// 32-bit words per line of a 1-bit raster
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Typed view of the samples
    pub fn samples<T: Sample>(&self) -> Result<&[T]> {
        self.inner.samples()
    }

    /// Mutable typed view of the samples
    pub fn samples_mut<T: Sample>(&mut self) -> Result<&mut [T]> {
        self.inner.samples_mut()
    }

    /// Packed words of a 1-bit raster
    pub fn words(&self) -> Result<&[u32]> {
        self.inner.check_binary()?;
        Ok(self.inner.words())
    }

    /// Mutable packed words of a 1-bit raster
    ///
    /// Callers must keep the pad bits past the last column zero.
    pub fn words_mut(&mut self) -> Result<&mut [u32]> {
        self.inner.check_binary()?;
        Ok(self.inner.words_mut())
    }

    /// Fill every pixel with per-band values
    ///
    /// A single value is broadcast to all bands.
    pub fn fill(&mut self, values: &[f64]) -> Result<()> {
        self.inner.fill(values)
    }

    /// Copy the overlapping part of `src` into this raster
    ///
    /// Pixels outside the overlap are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SampleTypeMismatch`] or [`Error::InvalidParameter`]
    /// if sample type or band count differ.
    pub fn copy_from(&mut self, src: &Raster) -> Result<()> {
        self.inner.copy_from(&src.inner)
    }
}

impl From<RasterMut> for Raster {
    fn from(raster_mut: RasterMut) -> Self {
        Raster {
            inner: Arc::new(raster_mut.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_creation() {
        let rect = Rect::new_unchecked(5, -2, 10, 3);
        let r = Raster::new(rect, 2, SampleType::F32).unwrap();
        assert_eq!(r.rect(), rect);
        assert_eq!(r.samples::<f32>().unwrap().len(), 60);
        assert!(r.samples::<u8>().is_err());

        assert!(Raster::new(Rect::new_unchecked(0, 0, 0, 3), 1, SampleType::U8).is_err());
        assert!(Raster::new(rect, 0, SampleType::U8).is_err());
        assert!(Raster::new(rect, 2, SampleType::Bit1).is_err());
    }

    #[test]
    fn test_binary_wpl() {
        let r = Raster::new(Rect::new_unchecked(0, 0, 33, 2), 1, SampleType::Bit1).unwrap();
        assert_eq!(r.wpl(), 2);
        assert_eq!(r.words().unwrap().len(), 4);
    }

    #[test]
    fn test_new_filled_clears_pad_bits() {
        let rect = Rect::new_unchecked(0, 0, 5, 2);
        let r = Raster::new_filled(rect, SampleType::Bit1, &[1.0]).unwrap();
        assert_eq!(r.words().unwrap(), &[0xF800_0000, 0xF800_0000]);

        let all_ones = Raster::from_bits(rect, &[1; 10]).unwrap();
        assert_eq!(r, all_ones);
    }

    #[test]
    fn test_from_vec_length_checked() {
        let rect = Rect::new_unchecked(0, 0, 2, 2);
        assert!(Raster::from_vec(rect, 1, vec![1u8, 2, 3]).is_err());
        let r = Raster::from_vec(rect, 1, vec![1u8, 2, 3, 4]).unwrap();
        assert_eq!(r.get_f64(1, 1, 0).unwrap(), 4.0);
    }

    #[test]
    fn test_sub_raster_and_copy_from() {
        let rect = Rect::new_unchecked(10, 10, 4, 3);
        let data: Vec<i32> = (0..12).collect();
        let r = Raster::from_vec(rect, 1, data).unwrap();

        let sub = r.sub_raster(Rect::new_unchecked(11, 11, 2, 2)).unwrap();
        assert_eq!(sub.samples::<i32>().unwrap(), &[5, 6, 9, 10]);
        assert!(r.sub_raster(Rect::new_unchecked(9, 10, 2, 2)).is_err());

        let mut dst = Raster::new(Rect::new_unchecked(12, 9, 4, 4), 1, SampleType::I32)
            .unwrap()
            .to_mut();
        dst.copy_from(&r).unwrap();
        assert_eq!(dst.get_f64(12, 10, 0).unwrap(), 2.0);
        assert_eq!(dst.get_f64(13, 12, 0).unwrap(), 11.0);
        assert_eq!(dst.get_f64(14, 10, 0).unwrap(), 0.0);
        assert_eq!(dst.get_f64(12, 9, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_copy_from_binary() {
        let src = Raster::from_bits(Rect::new_unchecked(0, 0, 3, 2), &[1, 0, 1, 0, 1, 0]).unwrap();
        let mut dst = Raster::new(Rect::new_unchecked(1, 0, 40, 2), 1, SampleType::Bit1)
            .unwrap()
            .to_mut();
        dst.copy_from(&src).unwrap();
        assert_eq!(dst.get_bit(1, 0).unwrap(), 0);
        assert_eq!(dst.get_bit(2, 0).unwrap(), 1);
        assert_eq!(dst.get_bit(1, 1).unwrap(), 1);
    }

    #[test]
    fn test_copy_from_binary_unaligned_offset() {
        let rect = Rect::new_unchecked(29, 1, 40, 3);
        let bits: Vec<u8> = (0..120).map(|i| u8::from(i % 3 == 0 || i % 7 == 0)).collect();
        let src = Raster::from_bits(rect, &bits).unwrap();
        let mut dst = Raster::new(Rect::new_unchecked(-5, 0, 80, 5), 1, SampleType::Bit1)
            .unwrap()
            .to_mut();
        dst.copy_from(&src).unwrap();
        for y in 0..5 {
            for x in -5..75 {
                let expected = if rect.contains_point(x, y) {
                    src.get_bit(x, y).unwrap()
                } else {
                    0
                };
                assert_eq!(dst.get_bit(x, y).unwrap(), expected, "at ({}, {})", x, y);
            }
        }
        let back = Raster::from(dst).sub_raster(rect).unwrap();
        assert_eq!(back, src);
    }

    #[test]
    fn test_copy_from_type_mismatch() {
        let rect = Rect::new_unchecked(0, 0, 2, 2);
        let src = Raster::new(rect, 1, SampleType::U8).unwrap();
        let mut dst = Raster::new(rect, 1, SampleType::U16).unwrap().to_mut();
        assert!(matches!(
            dst.copy_from(&src),
            Err(Error::SampleTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_ownership() {
        let r = Raster::new(Rect::new_unchecked(0, 0, 2, 2), 1, SampleType::U8).unwrap();
        let shared = r.clone();
        let r = r.try_into_mut().unwrap_err();
        drop(shared);
        let mut m = r.try_into_mut().unwrap();
        m.fill(&[7.0]).unwrap();
        let back: Raster = m.into();
        assert_eq!(back.samples::<u8>().unwrap(), &[7, 7, 7, 7]);
        let copy = back.deep_clone();
        assert_ne!(
            copy.samples::<u8>().unwrap().as_ptr(),
            back.samples::<u8>().unwrap().as_ptr()
        );
    }
}
