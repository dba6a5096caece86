//! NoDataRange - Sentinel sample values that carry no data
//!
//! A range marks source samples that must never be blended into an
//! interpolated result. Floating-point sources may also use the special
//! infinity and NaN sentinels, which are tested before any interval.

use crate::error::{Error, Result};

/// Range of source sample values treated as "no data"
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoDataRange {
    /// Interval with independently inclusive or exclusive ends
    Range {
        min: f64,
        max: f64,
        min_inclusive: bool,
        max_inclusive: bool,
    },
    /// Only `+inf` is no-data
    PositiveInfinity,
    /// Only `-inf` is no-data
    NegativeInfinity,
    /// NaN is no-data
    NaN,
}

impl NoDataRange {
    /// A single excluded value
    pub fn single(value: f64) -> Self {
        NoDataRange::Range {
            min: value,
            max: value,
            min_inclusive: true,
            max_inclusive: true,
        }
    }

    /// A closed interval `[min, max]`
    pub fn range(min: f64, max: f64) -> Result<Self> {
        Self::new(min, max, true, true)
    }

    /// An interval with explicit end inclusiveness
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if an end is NaN, if
    /// `min > max`, or if the interval cannot contain any value.
    pub fn new(min: f64, max: f64, min_inclusive: bool, max_inclusive: bool) -> Result<Self> {
        if min.is_nan() || max.is_nan() {
            return Err(Error::InvalidParameter(
                "no-data range bounds must not be NaN".to_string(),
            ));
        }
        if min > max || (min == max && !(min_inclusive && max_inclusive)) {
            return Err(Error::InvalidParameter(format!(
                "empty no-data range: {}{}, {}{}",
                if min_inclusive { '[' } else { '(' },
                min,
                max,
                if max_inclusive { ']' } else { ')' },
            )));
        }
        Ok(NoDataRange::Range {
            min,
            max,
            min_inclusive,
            max_inclusive,
        })
    }

    /// Only positive infinity
    pub fn positive_infinity() -> Self {
        NoDataRange::PositiveInfinity
    }

    /// Only negative infinity
    pub fn negative_infinity() -> Self {
        NoDataRange::NegativeInfinity
    }

    /// NaN sentinel
    pub fn nan() -> Self {
        NoDataRange::NaN
    }

    /// Test a sample value
    ///
    /// NaN is never inside an interval; it only matches [`NoDataRange::NaN`].
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            NoDataRange::NaN => value.is_nan(),
            NoDataRange::PositiveInfinity => value == f64::INFINITY,
            NoDataRange::NegativeInfinity => value == f64::NEG_INFINITY,
            NoDataRange::Range {
                min,
                max,
                min_inclusive,
                max_inclusive,
            } => {
                if value.is_nan() {
                    return false;
                }
                let above = if min_inclusive {
                    value >= min
                } else {
                    value > min
                };
                let below = if max_inclusive {
                    value <= max
                } else {
                    value < max
                };
                above && below
            }
        }
    }

    /// Test an integer sample value
    #[inline]
    pub fn contains_i64(&self, value: i64) -> bool {
        self.contains(value as f64)
    }
}
