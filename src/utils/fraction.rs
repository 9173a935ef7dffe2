//! Exact duration arithmetic
//!
//! Durations are fractions of a whole note. Every value is kept reduced by
//! `num_rational`, so equality and ordering are exact.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_rational::Rational64;

use crate::dom::{Edu, EDU_PER_WHOLE_NOTE};
use crate::error::{MusxError, Result};

/// Fraction of a whole note (or any exact ratio)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fraction(Rational64);

impl Fraction {
    /// Create a reduced fraction. A zero denominator is a domain error.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self> {
        if denominator == 0 {
            return Err(MusxError::domain(format!(
                "fraction {}/0 has a zero denominator",
                numerator
            )));
        }
        Ok(Fraction(Rational64::new(numerator, denominator)))
    }

    pub fn from_integer(value: i64) -> Self {
        Fraction(Rational64::from_integer(value))
    }

    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    pub fn one() -> Self {
        Self::from_integer(1)
    }

    /// Duration of `edu` Edus as a fraction of a whole note.
    pub fn from_edu(edu: Edu) -> Self {
        Fraction(Rational64::new(i64::from(edu), i64::from(EDU_PER_WHOLE_NOTE)))
    }

    /// Duration of `count` units of `edu` Edus each. The product is taken in
    /// 64 bits, so any pair of decoded 32-bit values is representable.
    pub fn from_edu_count(count: i32, edu: Edu) -> Self {
        Fraction(Rational64::new(
            i64::from(count) * i64::from(edu),
            i64::from(EDU_PER_WHOLE_NOTE),
        ))
    }

    pub fn numerator(&self) -> i64 {
        *self.0.numer()
    }

    pub fn denominator(&self) -> i64 {
        *self.0.denom()
    }

    pub fn is_zero(&self) -> bool {
        self.numerator() == 0
    }

    /// Integer part, truncated toward zero
    pub fn quotient(&self) -> i64 {
        self.0.to_integer()
    }

    /// Fractional part left after [`Fraction::quotient`]
    pub fn remainder(&self) -> Self {
        Fraction(self.0.fract())
    }

    /// Divide, failing with a domain error when `rhs` is zero.
    pub fn checked_div(self, rhs: Fraction) -> Result<Self> {
        if rhs.is_zero() {
            return Err(MusxError::domain(format!("division of {} by zero", self)));
        }
        Ok(Fraction(self.0 / rhs.0))
    }

    /// Convert to floating point (for display only)
    pub fn to_f64(&self) -> f64 {
        self.numerator() as f64 / self.denominator() as f64
    }

    /// Express in Edus, truncating anything finer than one Edu
    pub fn to_edu(&self) -> Edu {
        (self.0 * Rational64::from_integer(i64::from(EDU_PER_WHOLE_NOTE))).to_integer() as Edu
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator() == 1 {
            write!(f, "{}", self.numerator())
        } else {
            write!(f, "{}/{}", self.numerator(), self.denominator())
        }
    }
}

impl Add for Fraction {
    type Output = Fraction;
    fn add(self, rhs: Fraction) -> Fraction {
        Fraction(self.0 + rhs.0)
    }
}

impl Sub for Fraction {
    type Output = Fraction;
    fn sub(self, rhs: Fraction) -> Fraction {
        Fraction(self.0 - rhs.0)
    }
}

impl Mul for Fraction {
    type Output = Fraction;
    fn mul(self, rhs: Fraction) -> Fraction {
        Fraction(self.0 * rhs.0)
    }
}

impl Neg for Fraction {
    type Output = Fraction;
    fn neg(self) -> Fraction {
        Fraction(-self.0)
    }
}

impl AddAssign for Fraction {
    fn add_assign(&mut self, rhs: Fraction) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Fraction {
    fn sub_assign(&mut self, rhs: Fraction) {
        self.0 -= rhs.0;
    }
}

impl MulAssign for Fraction {
    fn mul_assign(&mut self, rhs: Fraction) {
        self.0 *= rhs.0;
    }
}
