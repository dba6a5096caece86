//! Numeric sample abstraction
//!
//! [`Sample`] ties a Rust scalar type to its [`SampleType`] tag and to the
//! matching [`RasterBuffer`] variant, and provides the handful of
//! conversions the resampling loops need. Integer samples are widened to
//! `i64` for fixed-point arithmetic; every type can round-trip through
//! `f64` with saturation.

use super::{RasterBuffer, SampleType};
use num_traits::{Bounded, NumCast, ToPrimitive};
use std::fmt::Debug;

/// A scalar type that can be stored in a multi-bit raster
pub trait Sample:
    Copy + Default + Debug + PartialOrd + Send + Sync + NumCast + Bounded + 'static
{
    /// Matching sample type tag
    const SAMPLE_TYPE: SampleType;
    /// Whether arithmetic on this type is floating point
    const IS_FLOAT: bool;

    /// Borrow the typed slice of a buffer holding this type
    fn slice(buffer: &RasterBuffer) -> Option<&[Self]>;

    /// Mutably borrow the typed slice of a buffer holding this type
    fn slice_mut(buffer: &mut RasterBuffer) -> Option<&mut [Self]>;

    /// Wrap a vector into the matching buffer variant
    fn into_buffer(data: Vec<Self>) -> RasterBuffer;

    /// Widen to `f64`
    #[inline]
    fn as_f64(self) -> f64 {
        ToPrimitive::to_f64(&self).unwrap_or(f64::NAN)
    }

    /// Widen to `i64` (floats are truncated toward zero)
    #[inline]
    fn as_i64(self) -> i64 {
        ToPrimitive::to_i64(&self).unwrap_or(0)
    }

    /// Narrow an `i64` with saturation at the type limits
    #[inline]
    fn from_i64_clamped(v: i64) -> Self {
        if Self::IS_FLOAT {
            return <Self as NumCast>::from(v).unwrap_or_default();
        }
        let lo = Self::min_value().as_i64();
        let hi = Self::max_value().as_i64();
        <Self as NumCast>::from(v.clamp(lo, hi)).unwrap_or_default()
    }

    /// Narrow an `f64`, rounding to nearest and saturating for integer types
    ///
    /// NaN maps to zero for integer types and stays NaN for float types.
    #[inline]
    fn from_f64_clamped(v: f64) -> Self {
        if Self::IS_FLOAT {
            return <Self as NumCast>::from(v).unwrap_or_else(|| {
                if v > 0.0 {
                    Self::max_value()
                } else {
                    Self::min_value()
                }
            });
        }
        if v.is_nan() {
            return Self::default();
        }
        let lo = Self::min_value().as_f64();
        let hi = Self::max_value().as_f64();
        <Self as NumCast>::from(v.round().clamp(lo, hi)).unwrap_or_default()
    }
}

macro_rules! impl_sample {
    ($t:ty, $variant:ident, $is_float:expr) => {
        impl Sample for $t {
            const SAMPLE_TYPE: SampleType = SampleType::$variant;
            const IS_FLOAT: bool = $is_float;

            #[inline]
            fn slice(buffer: &RasterBuffer) -> Option<&[Self]> {
                match buffer {
                    RasterBuffer::$variant(v) => Some(v.as_slice()),
                    _ => None,
                }
            }

            #[inline]
            fn slice_mut(buffer: &mut RasterBuffer) -> Option<&mut [Self]> {
                match buffer {
                    RasterBuffer::$variant(v) => Some(v.as_mut_slice()),
                    _ => None,
                }
            }

            #[inline]
            fn into_buffer(data: Vec<Self>) -> RasterBuffer {
                RasterBuffer::$variant(data)
            }
        }
    };
}

impl_sample!(u8, U8, false);
impl_sample!(u16, U16, false);
impl_sample!(i16, I16, false);
impl_sample!(i32, I32, false);
impl_sample!(f32, F32, true);
impl_sample!(f64, F64, true);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_clamping() {
        assert_eq!(u8::from_i64_clamped(300), 255);
        assert_eq!(u8::from_i64_clamped(-4), 0);
        assert_eq!(i16::from_i64_clamped(-40_000), i16::MIN);
        assert_eq!(u16::from_f64_clamped(12.5), 13);
        assert_eq!(u16::from_f64_clamped(12.4), 12);
        assert_eq!(i32::from_f64_clamped(f64::NAN), 0);
        assert_eq!(u8::from_f64_clamped(1e9), 255);
    }

    #[test]
    fn test_float_passthrough() {
        assert_eq!(f32::from_f64_clamped(0.25), 0.25f32);
        assert!(f64::from_f64_clamped(f64::NAN).is_nan());
        assert_eq!(f64::from_i64_clamped(-7), -7.0);
        assert_eq!(2.75f64.as_i64(), 2);
    }

    #[test]
    fn test_buffer_variant_matching() {
        let buf = u16::into_buffer(vec![1, 2, 3]);
        assert_eq!(buf.sample_type(), SampleType::U16);
        assert_eq!(u16::slice(&buf), Some(&[1u16, 2, 3][..]));
        assert!(u8::slice(&buf).is_none());
    }
}
