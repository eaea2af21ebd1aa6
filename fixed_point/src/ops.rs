//! Arithmetic and comparison operators for [`Fixed`].
//!
//! Multiplication and division work on magnitudes and reapply the sign at
//! the end. Both avoid 128-bit intermediates by pre-shifting the operands:
//!
//! - `a * b`: `((|a| >> 8) * (|b| >> 8)) >> 8`, losing up to 8 fractional bits.
//! - `a / b`: `((|a| << 10) / (|b| >> 8)) << 6`, losing about 6 fractional bits.
//!
//! Mixed operands (`Fixed * i16`, `Fixed / u32`, ...) give the same bits as
//! converting the operand to `Fixed` first; they only skip the conversion.

use core::cmp::Ordering;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::FixedPointError;
use crate::fixed::{Fixed, signed_to_raw, unsigned_to_raw};
use crate::format::{
    DIV_DIVIDEND_SHIFT, DIV_DIVISOR_SHIFT, DIV_POST_SHIFT, FRAC_BITS, MUL_POST_SHIFT,
    MUL_PRE_SHIFT,
};

/// Reduced magnitude of an integer operand that fits in 32 bits:
/// `(|x| << 24) >> 8` without the round trip.
const SMALL_INT_SHIFT: u32 = FRAC_BITS - MUL_PRE_SHIFT;

const _: () = assert!(DIV_DIVISOR_SHIFT == MUL_PRE_SHIFT);

#[inline]
fn apply_sign(magnitude: u64, negative: bool) -> i64 {
    let value = magnitude as i64;
    if negative { value.wrapping_neg() } else { value }
}

/// Division-by-zero result. The sign is that of `a * b` with a zero
/// divisor counted as positive, so `x / 0` follows the sign of `x`.
#[inline]
fn saturated(negative: bool) -> i64 {
    if negative {
        Fixed::NEG_INFINITY.raw
    } else {
        Fixed::INFINITY.raw
    }
}

#[inline]
fn quotient_is_negative(a: i64, divisor_negative: bool) -> bool {
    if divisor_negative { a > 0 } else { a < 0 }
}

/// `a * b` where `b` is already reduced (`|b| >> 8`).
#[inline]
fn mul_reduced(a: i64, b_reduced: u64, b_negative: bool) -> i64 {
    let negative = (a < 0) ^ b_negative;
    let a_reduced = a.unsigned_abs() >> MUL_PRE_SHIFT;
    apply_sign(a_reduced.wrapping_mul(b_reduced) >> MUL_POST_SHIFT, negative)
}

#[inline]
pub(crate) fn mul_raw(a: i64, b: i64) -> i64 {
    mul_reduced(a, b.unsigned_abs() >> MUL_PRE_SHIFT, b < 0)
}

/// `a / b` where the divisor is already reduced (`|b| >> 8`).
#[inline]
fn div_reduced(a: i64, divisor: u64, divisor_negative: bool) -> i64 {
    let negative = quotient_is_negative(a, divisor_negative);
    if divisor == 0 {
        return saturated(negative);
    }
    let dividend = a.unsigned_abs() << DIV_DIVIDEND_SHIFT;
    apply_sign((dividend / divisor) << DIV_POST_SHIFT, negative)
}

#[inline]
pub(crate) fn div_raw(a: i64, b: i64) -> i64 {
    div_reduced(a, b.unsigned_abs() >> DIV_DIVISOR_SHIFT, b < 0)
}

/// Division through `f32`: `raw / divisor` is already the raw quotient.
#[cfg(feature = "float_div")]
#[inline]
fn div_float(a: i64, divisor: f32) -> i64 {
    if divisor == 0.0 {
        return saturated(a < 0);
    }
    (a as f32 / divisor) as i64
}

impl Neg for Fixed {
    type Output = Fixed;

    #[inline]
    fn neg(self) -> Fixed {
        Fixed::from_raw(self.raw.wrapping_neg())
    }
}

impl Add for Fixed {
    type Output = Fixed;

    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed::from_raw(self.raw.wrapping_add(rhs.raw))
    }
}

impl Sub for Fixed {
    type Output = Fixed;

    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed::from_raw(self.raw.wrapping_sub(rhs.raw))
    }
}

impl Mul for Fixed {
    type Output = Fixed;

    /// ```
    /// use fixed_point::Fixed;
    ///
    /// let product = Fixed::from(-3) * Fixed::from(2.5f32);
    /// assert_eq!(product, Fixed::from(-7.5f32));
    /// ```
    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed::from_raw(mul_raw(self.raw, rhs.raw))
    }
}

impl Div for Fixed {
    type Output = Fixed;

    /// ```
    /// use fixed_point::Fixed;
    ///
    /// assert_eq!(Fixed::from(7) / Fixed::from(2), Fixed::from(3.5f32));
    /// assert_eq!(Fixed::from(0) / Fixed::from(0), Fixed::INFINITY);
    /// ```
    #[inline]
    fn div(self, rhs: Fixed) -> Fixed {
        #[cfg(feature = "float_div")]
        {
            if rhs.raw == 0 {
                return Fixed::from_raw(saturated(self.raw < 0));
            }
            Fixed::from_raw(div_float(self.raw, rhs.to_f32()))
        }
        #[cfg(not(feature = "float_div"))]
        {
            Fixed::from_raw(div_raw(self.raw, rhs.raw))
        }
    }
}

impl<T> AddAssign<T> for Fixed
where
    Fixed: Add<T, Output = Fixed>,
{
    #[inline]
    fn add_assign(&mut self, rhs: T) {
        *self = *self + rhs;
    }
}

impl<T> SubAssign<T> for Fixed
where
    Fixed: Sub<T, Output = Fixed>,
{
    #[inline]
    fn sub_assign(&mut self, rhs: T) {
        *self = *self - rhs;
    }
}

impl<T> MulAssign<T> for Fixed
where
    Fixed: Mul<T, Output = Fixed>,
{
    #[inline]
    fn mul_assign(&mut self, rhs: T) {
        *self = *self * rhs;
    }
}

impl<T> DivAssign<T> for Fixed
where
    Fixed: Div<T, Output = Fixed>,
{
    #[inline]
    fn div_assign(&mut self, rhs: T) {
        *self = *self / rhs;
    }
}

// Add/sub with any integer is the conversion plus one integer add.
macro_rules! int_add_sub {
    ($to_raw:ident, $wide:ty: $($t:ty),*) => {
        $(
            impl Add<$t> for Fixed {
                type Output = Fixed;

                #[inline]
                fn add(self, rhs: $t) -> Fixed {
                    Fixed::from_raw(self.raw.wrapping_add($to_raw(rhs as $wide)))
                }
            }

            impl Sub<$t> for Fixed {
                type Output = Fixed;

                #[inline]
                fn sub(self, rhs: $t) -> Fixed {
                    Fixed::from_raw(self.raw.wrapping_sub($to_raw(rhs as $wide)))
                }
            }
        )*
    };
}

int_add_sub!(signed_to_raw, i64: i8, i16, i32, i64);
int_add_sub!(unsigned_to_raw, u64: u8, u16, u32, u64);

// Up to 32 bits the operand's converted storage cannot wrap, so its reduced
// magnitude is just `|x| << 16`.
macro_rules! small_int_mul_div {
    ($($t:ty),*) => {
        $(
            impl Mul<$t> for Fixed {
                type Output = Fixed;

                #[inline]
                fn mul(self, rhs: $t) -> Fixed {
                    #[allow(unused_comparisons)]
                    let negative = rhs < 0;
                    let reduced = (rhs as i64).unsigned_abs() << SMALL_INT_SHIFT;
                    Fixed::from_raw(mul_reduced(self.raw, reduced, negative))
                }
            }

            impl Div<$t> for Fixed {
                type Output = Fixed;

                #[inline]
                fn div(self, rhs: $t) -> Fixed {
                    #[cfg(feature = "float_div")]
                    {
                        Fixed::from_raw(div_float(self.raw, rhs as f32))
                    }
                    #[cfg(not(feature = "float_div"))]
                    {
                        #[allow(unused_comparisons)]
                        let negative = rhs < 0;
                        let reduced = (rhs as i64).unsigned_abs() << SMALL_INT_SHIFT;
                        Fixed::from_raw(div_reduced(self.raw, reduced, negative))
                    }
                }
            }
        )*
    };
}

small_int_mul_div!(i8, i16, i32, u8, u16, u32);

// 64-bit operands may wrap on conversion; go through the converted storage
// so the result still matches `self * Fixed::from(rhs)`.
macro_rules! wide_int_mul_div {
    ($to_raw:ident, $wide:ty: $($t:ty),*) => {
        $(
            impl Mul<$t> for Fixed {
                type Output = Fixed;

                #[inline]
                fn mul(self, rhs: $t) -> Fixed {
                    Fixed::from_raw(mul_raw(self.raw, $to_raw(rhs as $wide)))
                }
            }

            impl Div<$t> for Fixed {
                type Output = Fixed;

                #[inline]
                fn div(self, rhs: $t) -> Fixed {
                    self / Fixed::from_raw($to_raw(rhs as $wide))
                }
            }
        )*
    };
}

wide_int_mul_div!(signed_to_raw, i64: i64);
wide_int_mul_div!(unsigned_to_raw, u64: u64);

macro_rules! float_ops {
    ($($t:ty),*) => {
        $(
            impl Add<$t> for Fixed {
                type Output = Fixed;

                #[inline]
                fn add(self, rhs: $t) -> Fixed {
                    self + Fixed::from(rhs)
                }
            }

            impl Sub<$t> for Fixed {
                type Output = Fixed;

                #[inline]
                fn sub(self, rhs: $t) -> Fixed {
                    self - Fixed::from(rhs)
                }
            }

            #[cfg(feature = "fast_float_conversion")]
            impl Mul<$t> for Fixed {
                type Output = Fixed;

                #[inline]
                fn mul(self, rhs: $t) -> Fixed {
                    self * Fixed::from(rhs)
                }
            }

            #[cfg(feature = "fast_float_conversion")]
            impl Div<$t> for Fixed {
                type Output = Fixed;

                #[inline]
                fn div(self, rhs: $t) -> Fixed {
                    self / Fixed::from(rhs)
                }
            }

            // One float operation on the raw storage: scaling the operand
            // would cost a multiply of its own.
            #[cfg(not(feature = "fast_float_conversion"))]
            impl Mul<$t> for Fixed {
                type Output = Fixed;

                #[inline]
                fn mul(self, rhs: $t) -> Fixed {
                    Fixed::from_raw((self.raw as $t * rhs) as i64)
                }
            }

            #[cfg(not(feature = "fast_float_conversion"))]
            impl Div<$t> for Fixed {
                type Output = Fixed;

                #[inline]
                fn div(self, rhs: $t) -> Fixed {
                    if rhs == 0.0 {
                        return Fixed::from_raw(saturated(self.raw < 0));
                    }
                    Fixed::from_raw((self.raw as $t / rhs) as i64)
                }
            }
        )*
    };
}

float_ops!(f32, f64);

macro_rules! int_cmp {
    ($($t:ty),*) => {
        $(
            impl PartialEq<$t> for Fixed {
                #[inline]
                fn eq(&self, other: &$t) -> bool {
                    self.raw == Fixed::from(*other).raw
                }
            }

            impl PartialOrd<$t> for Fixed {
                #[inline]
                fn partial_cmp(&self, other: &$t) -> Option<Ordering> {
                    Some(self.raw.cmp(&Fixed::from(*other).raw))
                }
            }
        )*
    };
}

int_cmp!(i8, i16, i32, i64, u8, u16, u32, u64);

// NaN is unordered against every value, as it is for floats.
macro_rules! float_cmp {
    ($($t:ty),*) => {
        $(
            impl PartialEq<$t> for Fixed {
                #[inline]
                fn eq(&self, other: &$t) -> bool {
                    !other.is_nan() && self.raw == Fixed::from(*other).raw
                }
            }

            impl PartialOrd<$t> for Fixed {
                #[inline]
                fn partial_cmp(&self, other: &$t) -> Option<Ordering> {
                    if other.is_nan() {
                        return None;
                    }
                    Some(self.raw.cmp(&Fixed::from(*other).raw))
                }
            }
        )*
    };
}

float_cmp!(f32, f64);

/// Checked and saturating arithmetic.
///
/// These use the same reduced-precision kernels as the operators but report
/// wrap-around instead of producing it. Division always uses the integer
/// kernel, whatever the `float_div` setting.
impl Fixed {
    /// # Errors
    ///
    /// `FixedPointError::ArithmeticOverflow` if the sum wraps.
    pub fn checked_add(self, rhs: Fixed) -> Result<Fixed, FixedPointError> {
        self.raw
            .checked_add(rhs.raw)
            .map(Fixed::from_raw)
            .ok_or(FixedPointError::ArithmeticOverflow("addition"))
    }

    /// # Errors
    ///
    /// `FixedPointError::ArithmeticOverflow` if the difference wraps.
    pub fn checked_sub(self, rhs: Fixed) -> Result<Fixed, FixedPointError> {
        self.raw
            .checked_sub(rhs.raw)
            .map(Fixed::from_raw)
            .ok_or(FixedPointError::ArithmeticOverflow("subtraction"))
    }

    /// # Errors
    ///
    /// `FixedPointError::ArithmeticOverflow` for [`Fixed::min_value`].
    pub fn checked_neg(self) -> Result<Fixed, FixedPointError> {
        self.raw
            .checked_neg()
            .map(Fixed::from_raw)
            .ok_or(FixedPointError::ArithmeticOverflow("negation"))
    }

    /// Multiplies like `*`, failing instead of wrapping.
    ///
    /// # Errors
    ///
    /// `FixedPointError::ArithmeticOverflow` if the product does not fit.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixed_point::Fixed;
    ///
    /// let x = Fixed::from(1000).checked_mul(Fixed::from(1000))?;
    /// assert_eq!(x, Fixed::from(1_000_000));
    /// assert!(Fixed::from(1i64 << 30).checked_mul(Fixed::from(1i64 << 30)).is_err());
    /// # Ok::<(), fixed_point::FixedPointError>(())
    /// ```
    pub fn checked_mul(self, rhs: Fixed) -> Result<Fixed, FixedPointError> {
        let negative = (self.raw < 0) ^ (rhs.raw < 0);
        let a = self.raw.unsigned_abs() >> MUL_PRE_SHIFT;
        let b = rhs.raw.unsigned_abs() >> MUL_PRE_SHIFT;
        let magnitude = a
            .checked_mul(b)
            .map(|p| p >> MUL_POST_SHIFT)
            .filter(|&m| m <= i64::MAX as u64)
            .ok_or(FixedPointError::ArithmeticOverflow("multiplication"))?;
        Ok(Fixed::from_raw(apply_sign(magnitude, negative)))
    }

    /// Divides like `/` with the integer kernel, failing instead of
    /// saturating or wrapping.
    ///
    /// # Errors
    ///
    /// `FixedPointError::DivisionByZero` if the divisor's magnitude is below
    /// `2^-16` (it vanishes in the kernel's pre-shift), and
    /// `FixedPointError::ArithmeticOverflow` if the dividend or the quotient
    /// loses high bits.
    pub fn checked_div(self, rhs: Fixed) -> Result<Fixed, FixedPointError> {
        let divisor = rhs.raw.unsigned_abs() >> DIV_DIVISOR_SHIFT;
        if divisor == 0 {
            return Err(FixedPointError::DivisionByZero);
        }
        let a = self.raw.unsigned_abs();
        if a.leading_zeros() < DIV_DIVIDEND_SHIFT {
            return Err(FixedPointError::ArithmeticOverflow("division"));
        }
        if (a << DIV_DIVIDEND_SHIFT) / divisor > (i64::MAX as u64) >> DIV_POST_SHIFT {
            return Err(FixedPointError::ArithmeticOverflow("division"));
        }
        Ok(Fixed::from_raw(div_raw(self.raw, rhs.raw)))
    }

    /// Adds, clamping to [`Fixed::min_value`]/[`Fixed::max_value`].
    pub fn saturating_add(self, rhs: Fixed) -> Fixed {
        Fixed::from_raw(self.raw.saturating_add(rhs.raw))
    }

    /// Subtracts, clamping to [`Fixed::min_value`]/[`Fixed::max_value`].
    pub fn saturating_sub(self, rhs: Fixed) -> Fixed {
        Fixed::from_raw(self.raw.saturating_sub(rhs.raw))
    }

    /// Multiplies, clamping to [`Fixed::min_value`]/[`Fixed::max_value`].
    pub fn saturating_mul(self, rhs: Fixed) -> Fixed {
        self.checked_mul(rhs).unwrap_or_else(|_| {
            if (self.raw < 0) ^ (rhs.raw < 0) {
                Fixed::min_value()
            } else {
                Fixed::max_value()
            }
        })
    }
}
