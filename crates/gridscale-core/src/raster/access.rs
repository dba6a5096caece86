//! Sample access functions
//!
//! Low-level helpers for packed 1-bit rows and per-sample getters/setters
//! on [`Raster`] and [`RasterMut`].
//!
//! # Bit packing
//!
//! Bits are packed MSB-to-LSB within each 32-bit word: in a 1-bit raster,
//! the pixel at column offset 0 occupies bit 31 of the row's first word.
//! `x` below is always the column offset relative to the raster origin.

use super::{Raster, RasterData, RasterMut, SampleType};
use crate::error::{Error, Result};

/// Get a 1-bit value from a packed row
#[inline]
pub fn get_data_bit(line: &[u32], x: u32) -> u32 {
    (line[(x >> 5) as usize] >> (31 - (x & 31))) & 1
}

/// Set a 1-bit value in a packed row (any non-zero `val` sets the bit)
#[inline]
pub fn set_data_bit(line: &mut [u32], x: u32, val: u32) {
    if val != 0 {
        set_data_bit_val(line, x);
    } else {
        clear_data_bit(line, x);
    }
}

/// Set a 1-bit value to 1
#[inline]
pub fn set_data_bit_val(line: &mut [u32], x: u32) {
    line[(x >> 5) as usize] |= 0x8000_0000 >> (x & 31);
}

/// Clear a 1-bit value to 0
#[inline]
pub fn clear_data_bit(line: &mut [u32], x: u32) {
    line[(x >> 5) as usize] &= !(0x8000_0000 >> (x & 31));
}

impl RasterData {
    /// Validate a pixel position and return its offsets from the origin
    #[inline]
    fn offsets(&self, x: i32, y: i32, band: u32) -> Result<(usize, usize)> {
        if !self.rect.contains_point(x, y) {
            return Err(Error::PixelOutOfBounds {
                x,
                y,
                bounds: self.rect,
            });
        }
        if band >= self.bands {
            return Err(Error::IndexOutOfBounds {
                index: band as usize,
                len: self.bands as usize,
            });
        }
        Ok(((x - self.rect.x) as usize, (y - self.rect.y) as usize))
    }

    /// Index of a typed sample in the interleaved buffer
    #[inline]
    fn sample_index(&self, dx: usize, dy: usize, band: u32) -> usize {
        (dy * self.rect.w as usize + dx) * self.bands as usize + band as usize
    }

    pub(super) fn get_f64(&self, x: i32, y: i32, band: u32) -> Result<f64> {
        let (dx, dy) = self.offsets(x, y, band)?;
        if self.sample_type == SampleType::Bit1 {
            let row = &self.words()[dy * self.wpl as usize..];
            return Ok(get_data_bit(row, dx as u32) as f64);
        }
        let i = self.sample_index(dx, dy, band);
        Ok(self.buffer.get_f64(i))
    }

    pub(super) fn set_f64(&mut self, x: i32, y: i32, band: u32, val: f64) -> Result<()> {
        let (dx, dy) = self.offsets(x, y, band)?;
        if self.sample_type == SampleType::Bit1 {
            let wpl = self.wpl as usize;
            let row = &mut self.words_mut()[dy * wpl..(dy + 1) * wpl];
            set_data_bit(row, dx as u32, u32::from(val >= 0.5));
            return Ok(());
        }
        let i = self.sample_index(dx, dy, band);
        self.buffer.set_f64(i, val);
        Ok(())
    }

    fn get_bit(&self, x: i32, y: i32) -> Result<u32> {
        if self.sample_type != SampleType::Bit1 {
            return Err(Error::SampleTypeMismatch {
                expected: SampleType::Bit1,
                actual: self.sample_type,
            });
        }
        let (dx, dy) = self.offsets(x, y, 0)?;
        Ok(get_data_bit(&self.words()[dy * self.wpl as usize..], dx as u32))
    }

    fn set_bit(&mut self, x: i32, y: i32, val: u32) -> Result<()> {
        if self.sample_type != SampleType::Bit1 {
            return Err(Error::SampleTypeMismatch {
                expected: SampleType::Bit1,
                actual: self.sample_type,
            });
        }
        let (dx, dy) = self.offsets(x, y, 0)?;
        let wpl = self.wpl as usize;
        set_data_bit(&mut self.words_mut()[dy * wpl..(dy + 1) * wpl], dx as u32, val);
        Ok(())
    }
}

impl Raster {
    /// Get a sample as `f64` at absolute position (x, y)
    ///
    /// 1-bit rasters return 0.0 or 1.0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PixelOutOfBounds`] or [`Error::IndexOutOfBounds`]
    /// for a position or band outside the raster.
    pub fn get_f64(&self, x: i32, y: i32, band: u32) -> Result<f64> {
        self.inner.get_f64(x, y, band)
    }

    /// Get a bit of a 1-bit raster at absolute position (x, y)
    pub fn get_bit(&self, x: i32, y: i32) -> Result<u32> {
        self.inner.get_bit(x, y)
    }
}

impl RasterMut {
    /// Get a sample as `f64` at absolute position (x, y)
    pub fn get_f64(&self, x: i32, y: i32, band: u32) -> Result<f64> {
        self.inner.get_f64(x, y, band)
    }

    /// Set a sample from `f64` at absolute position (x, y)
    ///
    /// Integer samples are rounded and saturated. For 1-bit rasters any
    /// value `>= 0.5` sets the bit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PixelOutOfBounds`] or [`Error::IndexOutOfBounds`]
    /// for a position or band outside the raster.
    pub fn set_f64(&mut self, x: i32, y: i32, band: u32, val: f64) -> Result<()> {
        self.inner.set_f64(x, y, band, val)
    }

    /// Get a bit of a 1-bit raster at absolute position (x, y)
    pub fn get_bit(&self, x: i32, y: i32) -> Result<u32> {
        self.inner.get_bit(x, y)
    }

    /// Set a bit of a 1-bit raster at absolute position (x, y)
    pub fn set_bit(&mut self, x: i32, y: i32, val: u32) -> Result<()> {
        self.inner.set_bit(x, y, val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::Rect;

    #[test]
    fn test_bit_helpers_msb_first() {
        let mut line = [0u32; 2];
        set_data_bit_val(&mut line, 0);
        assert_eq!(line[0], 0x8000_0000);
        set_data_bit(&mut line, 33, 1);
        assert_eq!(line[1], 0x4000_0000);
        assert_eq!(get_data_bit(&line, 33), 1);
        assert_eq!(get_data_bit(&line, 32), 0);
        clear_data_bit(&mut line, 0);
        assert_eq!(line[0], 0);
    }

    #[test]
    fn test_absolute_coordinates() {
        let rect = Rect::new_unchecked(-3, 10, 4, 2);
        let mut r = Raster::new(rect, 2, SampleType::I16).unwrap().to_mut();
        r.set_f64(-3, 10, 1, -12.0).unwrap();
        r.set_f64(0, 11, 0, 40_000.0).unwrap();
        assert_eq!(r.get_f64(-3, 10, 1).unwrap(), -12.0);
        assert_eq!(r.get_f64(0, 11, 0).unwrap(), i16::MAX as f64);
        assert!(r.get_f64(1, 10, 0).is_err());
        assert!(r.get_f64(-3, 10, 2).is_err());
    }

    #[test]
    fn test_bit_access_type_checked() {
        let rect = Rect::new_unchecked(0, 0, 40, 3);
        let mut r = Raster::new(rect, 1, SampleType::Bit1).unwrap().to_mut();
        r.set_bit(35, 2, 1).unwrap();
        assert_eq!(r.get_bit(35, 2).unwrap(), 1);
        assert_eq!(r.get_f64(35, 2, 0).unwrap(), 1.0);
        assert_eq!(r.get_bit(34, 2).unwrap(), 0);

        let gray = Raster::new(rect, 1, SampleType::U8).unwrap();
        assert!(gray.get_bit(0, 0).is_err());
    }
}
