//! Rational - Exact fractions for coordinate mapping
//!
//! Scale factors and translations are snapped to simple fractions once, at
//! configuration time. All geometric arithmetic downstream stays in integer
//! numerator/denominator form so that mapping a row of any length never
//! drifts the way repeated floating-point addition does.
//!
//! Values are always stored reduced, with a strictly positive denominator.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Maximum number of continued-fraction terms tried by [`Rational::approximate`]
const MAX_CONTINUED_FRACTION_TERMS: usize = 64;

/// An exact fraction `num / den` with `den > 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    num: i64,
    den: i64,
}

/// Greatest common divisor (always non-negative)
fn gcd(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Floor division for a positive divisor
#[inline]
pub fn floor_div(num: i128, den: i128) -> i128 {
    debug_assert!(den > 0);
    num.div_euclid(den)
}

/// Ceiling division for a positive divisor
#[inline]
pub fn ceil_div(num: i128, den: i128) -> i128 {
    debug_assert!(den > 0);
    -((-num).div_euclid(den))
}

impl Rational {
    /// Zero
    pub const ZERO: Rational = Rational { num: 0, den: 1 };
    /// One
    pub const ONE: Rational = Rational { num: 1, den: 1 };
    /// One half
    pub const HALF: Rational = Rational { num: 1, den: 2 };

    /// Create a reduced fraction
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `den` is zero.
    pub fn new(num: i64, den: i64) -> Result<Self> {
        if den == 0 {
            return Err(Error::InvalidParameter(
                "rational denominator must be non-zero".to_string(),
            ));
        }
        Self::from_wide(num as i128, den as i128).ok_or_else(|| {
            Error::InvalidParameter(format!("rational {}/{} out of range", num, den))
        })
    }

    /// Create an integral value
    pub const fn from_integer(n: i64) -> Self {
        Rational { num: n, den: 1 }
    }

    /// Reduce a wide fraction and narrow it back to 64 bits
    fn from_wide(mut num: i128, mut den: i128) -> Option<Self> {
        if den == 0 {
            return None;
        }
        if den < 0 {
            num = -num;
            den = -den;
        }
        let g = gcd(num, den);
        if g > 1 {
            num /= g;
            den /= g;
        }
        Some(Rational {
            num: i64::try_from(num).ok()?,
            den: i64::try_from(den).ok()?,
        })
    }

    /// Snap a real number to the simplest fraction within `tolerance`
    ///
    /// Expands `value` as a continued fraction and returns the first
    /// convergent whose distance from `value` is at most `tolerance`.
    /// With a tolerance of `1e-6`, `0.333333` becomes `1/3` and `2.5`
    /// becomes `5/2`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for non-finite input or a
    /// negative tolerance.
    pub fn approximate(value: f64, tolerance: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "cannot approximate non-finite value {}",
                value
            )));
        }
        if !(tolerance >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "approximation tolerance must be non-negative: {}",
                tolerance
            )));
        }

        let negative = value < 0.0;
        let x = value.abs();

        // Convergents h[n]/k[n], seeded with h[-2]/k[-2] = 0/1, h[-1]/k[-1] = 1/0
        let (mut h0, mut h1) = (0i128, 1i128);
        let (mut k0, mut k1) = (1i128, 0i128);
        let mut rem = x;

        for _ in 0..MAX_CONTINUED_FRACTION_TERMS {
            let a = rem.floor();
            if a > i64::MAX as f64 {
                break;
            }
            let a = a as i128;
            let h2 = a * h1 + h0;
            let k2 = a * k1 + k0;
            if h2 > i64::MAX as i128 || k2 > i64::MAX as i128 {
                break;
            }
            (h0, h1) = (h1, h2);
            (k0, k1) = (k1, k2);

            if (h1 as f64 / k1 as f64 - x).abs() <= tolerance {
                break;
            }
            let frac = rem - a as f64;
            if frac <= f64::EPSILON {
                break;
            }
            rem = 1.0 / frac;
        }

        if k1 == 0 {
            return Err(Error::InvalidParameter(format!(
                "cannot approximate {} as a 64-bit fraction",
                value
            )));
        }
        let num = if negative { -h1 } else { h1 };
        Self::from_wide(num, k1).ok_or_else(|| {
            Error::InvalidParameter(format!("cannot approximate {} as a 64-bit fraction", value))
        })
    }

    /// Numerator
    #[inline]
    pub fn num(&self) -> i64 {
        self.num
    }

    /// Denominator (always positive)
    #[inline]
    pub fn den(&self) -> i64 {
        self.den
    }

    /// Largest integer not greater than the value
    #[inline]
    pub fn floor(&self) -> i64 {
        self.num.div_euclid(self.den)
    }

    /// Smallest integer not less than the value
    #[inline]
    pub fn ceil(&self) -> i64 {
        -((-self.num).div_euclid(self.den))
    }

    /// Convert to floating point
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Check if the value is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// Check if the value is strictly positive
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.num > 0
    }

    /// Check if the value is an integer
    #[inline]
    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    /// Multiplicative inverse
    ///
    /// Returns `None` for zero.
    pub fn recip(&self) -> Option<Rational> {
        if self.num == 0 {
            None
        } else {
            Self::from_wide(self.den as i128, self.num as i128)
        }
    }

    /// Checked addition
    pub fn checked_add(self, rhs: Rational) -> Option<Rational> {
        let num = self.num as i128 * rhs.den as i128 + rhs.num as i128 * self.den as i128;
        Self::from_wide(num, self.den as i128 * rhs.den as i128)
    }

    /// Checked subtraction
    pub fn checked_sub(self, rhs: Rational) -> Option<Rational> {
        self.checked_add(-rhs)
    }

    /// Checked multiplication
    pub fn checked_mul(self, rhs: Rational) -> Option<Rational> {
        Self::from_wide(
            self.num as i128 * rhs.num as i128,
            self.den as i128 * rhs.den as i128,
        )
    }
}

impl Default for Rational {
    fn default() -> Self {
        Rational::ZERO
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Rational::from_integer(n)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.num as i128 * other.den as i128).cmp(&(other.num as i128 * self.den as i128))
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            num: -self.num,
            den: self.den,
        }
    }
}

/// # Panics
///
/// Panics if the reduced result does not fit in 64 bits.
impl Add for Rational {
    type Output = Rational;

    fn add(self, rhs: Rational) -> Rational {
        self.checked_add(rhs).expect("rational addition overflow")
    }
}

/// # Panics
///
/// Panics if the reduced result does not fit in 64 bits.
impl Sub for Rational {
    type Output = Rational;

    fn sub(self, rhs: Rational) -> Rational {
        self.checked_sub(rhs).expect("rational subtraction overflow")
    }
}

/// # Panics
///
/// Panics if the reduced result does not fit in 64 bits.
impl Mul for Rational {
    type Output = Rational;

    fn mul(self, rhs: Rational) -> Rational {
        self.checked_mul(rhs).expect("rational multiplication overflow")
    }
}
