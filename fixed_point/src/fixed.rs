use core::fmt;

use bytemuck_derive::{Pod, Zeroable};

use crate::error::FixedPointError;
use crate::format::{FRAC_BITS, INT_BITS, MAX_INT, SCALE};
#[cfg(not(feature = "fast_float_conversion"))]
use crate::format::{SCALE_F32, SCALE_F64};

/// A Q40.24 fixed-point number stored in a single `i64`.
///
/// The stored integer is `real * 2^24` truncated toward zero, which gives
/// 40 integer bits (sign included) and 24 fractional bits. `Fixed` is meant
/// as a drop-in stand-in for `f32`/`f64` on targets without a fast FPU:
/// every operator maps to one or two integer operations.
///
/// Arithmetic never fails. Overflow wraps like the underlying `i64`,
/// division by zero saturates to [`Fixed::INFINITY`] or
/// [`Fixed::NEG_INFINITY`], and multiplication/division trade a few low
/// fractional bits for staying within 64-bit intermediates.
///
/// # Examples
///
/// ```
/// use fixed_point::Fixed;
///
/// let a = Fixed::from(3);
/// let b = Fixed::from(4);
/// assert_eq!(a + b, Fixed::from(7));
///
/// let x = Fixed::from(1.5f64) * Fixed::from(2.0f64);
/// assert!((x.to_f64() - 3.0).abs() < 1.0 / 65536.0);
///
/// assert_eq!(Fixed::from(10) / Fixed::from(0), Fixed::INFINITY);
/// assert_eq!(Fixed::from(-10) / Fixed::from(0), Fixed::NEG_INFINITY);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Fixed {
    /// The raw integer representation.
    pub raw: i64,
}

/// Sign-then-magnitude shift: negative inputs are shifted as magnitudes so
/// the result never depends on shifting a negative number.
#[inline]
pub(crate) const fn signed_to_raw(x: i64) -> i64 {
    if x < 0 {
        (x.wrapping_neg() << FRAC_BITS).wrapping_neg()
    } else {
        x << FRAC_BITS
    }
}

#[inline]
pub(crate) const fn unsigned_to_raw(x: u64) -> i64 {
    (x as i64) << FRAC_BITS
}

#[cfg(not(feature = "fast_float_conversion"))]
#[inline]
fn f32_to_raw(x: f32) -> i64 {
    (x * SCALE_F32) as i64
}

#[cfg(feature = "fast_float_conversion")]
#[inline]
fn f32_to_raw(x: f32) -> i64 {
    crate::float_bits::scale_up_f32(x) as i64
}

#[cfg(not(feature = "fast_float_conversion"))]
#[inline]
fn f64_to_raw(x: f64) -> i64 {
    (x * SCALE_F64) as i64
}

#[cfg(feature = "fast_float_conversion")]
#[inline]
fn f64_to_raw(x: f64) -> i64 {
    crate::float_bits::scale_up_f64(x) as i64
}

impl Fixed {
    /// Number of fractional bits.
    pub const FRAC_BITS: u32 = FRAC_BITS;

    /// Raw value of `1.0`.
    pub const SCALE: i64 = SCALE;

    /// Positive division-by-zero result: the largest storage magnitude.
    pub const INFINITY: Fixed = Fixed { raw: i64::MAX };

    /// Negative division-by-zero result.
    pub const NEG_INFINITY: Fixed = Fixed { raw: -i64::MAX };

    /// Smallest positive value, `2^-24`.
    pub const EPSILON: Fixed = Fixed { raw: 1 };

    /// Creates a fixed-point number from its raw storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixed_point::Fixed;
    ///
    /// // With 24 fractional bits, raw value 2^24 represents 1.0
    /// let x = Fixed::from_raw(1 << 24);
    /// assert_eq!(x.to_f32(), 1.0);
    /// ```
    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Self { raw }
    }

    /// Returns the raw integer representation.
    #[inline]
    pub const fn raw_value(&self) -> i64 {
        self.raw
    }

    /// Create a fixed-point value of zero
    pub const fn zero() -> Self {
        Self { raw: 0 }
    }

    /// Create a fixed-point value of one
    pub const fn one() -> Self {
        Self { raw: SCALE }
    }

    /// Returns the maximum representable value.
    pub const fn max_value() -> Self {
        Self { raw: i64::MAX }
    }

    /// Returns the minimum representable value.
    pub const fn min_value() -> Self {
        Self { raw: i64::MIN }
    }

    /// Converts to `f32`.
    ///
    /// With `fast_float_conversion` the division by `2^24` is done on the
    /// exponent field.
    #[inline]
    pub fn to_f32(self) -> f32 {
        #[cfg(feature = "fast_float_conversion")]
        {
            crate::float_bits::scale_down_f32(self.raw as f32)
        }
        #[cfg(not(feature = "fast_float_conversion"))]
        {
            self.raw as f32 / SCALE_F32
        }
    }

    /// Converts to `f64`.
    #[inline]
    pub fn to_f64(self) -> f64 {
        #[cfg(feature = "fast_float_conversion")]
        {
            crate::float_bits::scale_down_f64(self.raw as f64)
        }
        #[cfg(not(feature = "fast_float_conversion"))]
        {
            self.raw as f64 / SCALE_F64
        }
    }

    /// Integer part, truncated toward zero.
    ///
    /// This is not `floor`: `-2.5` converts to `-2`.
    ///
    /// ```
    /// use fixed_point::Fixed;
    ///
    /// assert_eq!(Fixed::from(-2.5f32).to_i64(), -2);
    /// assert_eq!(Fixed::from(2.5f32).to_i64(), 2);
    /// ```
    #[inline]
    pub const fn to_i64(self) -> i64 {
        if self.raw < 0 {
            -((self.raw.unsigned_abs() >> FRAC_BITS) as i64)
        } else {
            self.raw >> FRAC_BITS
        }
    }

    /// Integer part truncated toward zero, then narrowed to `i32`.
    #[inline]
    pub const fn to_i32(self) -> i32 {
        self.to_i64() as i32
    }

    /// Returns the absolute value, wrapping for [`Fixed::min_value`].
    #[inline]
    pub const fn abs(self) -> Self {
        Self {
            raw: self.raw.wrapping_abs(),
        }
    }

    /// `-1`, `0` or `1` according to the sign.
    #[inline]
    pub const fn signum(self) -> i32 {
        self.raw.signum() as i32
    }

    /// Returns `true` if the value is below zero.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.raw < 0
    }

    /// Returns `true` if the value is exactly zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.raw == 0
    }

    /// Creates a fixed-point number from an `f64`, rejecting values that
    /// would saturate or are not finite.
    ///
    /// # Errors
    ///
    /// Returns `FixedPointError::NotFinite` for NaN and infinities and
    /// `FixedPointError::Overflow` if the value is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use fixed_point::Fixed;
    ///
    /// let x = Fixed::try_from_f64(3.14)?;
    /// assert!((x.to_f64() - 3.14).abs() < 1e-6);
    ///
    /// // Out of range
    /// assert!(Fixed::try_from_f64(1e12).is_err());
    /// # Ok::<(), fixed_point::FixedPointError>(())
    /// ```
    pub fn try_from_f64(value: f64) -> Result<Self, FixedPointError> {
        Self::check_float_range(value)?;
        Ok(Self::from(value))
    }

    /// Creates a fixed-point number from an `f32`, rejecting values that
    /// would saturate or are not finite.
    ///
    /// # Errors
    ///
    /// Same as [`Fixed::try_from_f64`].
    pub fn try_from_f32(value: f32) -> Result<Self, FixedPointError> {
        Self::check_float_range(value as f64)?;
        Ok(Self::from(value))
    }

    fn check_float_range(value: f64) -> Result<(), FixedPointError> {
        if !value.is_finite() {
            return Err(FixedPointError::NotFinite);
        }
        // Storage covers [-2^39, 2^39) in real terms.
        let limit = (1u64 << (INT_BITS - 1)) as f64;
        if value >= limit || value < -limit {
            return Err(FixedPointError::Overflow {
                value,
                bits: INT_BITS as usize,
                fractional: FRAC_BITS as usize,
            });
        }
        Ok(())
    }

    /// Creates a fixed-point number from an `i64` without wrapping.
    ///
    /// # Errors
    ///
    /// Returns `FixedPointError::Overflow` if `value` needs more than 40 bits.
    pub fn try_from_i64(value: i64) -> Result<Self, FixedPointError> {
        if (-(MAX_INT + 1)..=MAX_INT).contains(&value) {
            Ok(Self::from(value))
        } else {
            Err(FixedPointError::Overflow {
                value: value as f64,
                bits: INT_BITS as usize,
                fractional: FRAC_BITS as usize,
            })
        }
    }

    /// Creates a fixed-point number from a `u64` without wrapping.
    ///
    /// # Errors
    ///
    /// Returns `FixedPointError::Overflow` if `value` exceeds `2^39 - 1`.
    pub fn try_from_u64(value: u64) -> Result<Self, FixedPointError> {
        if value <= MAX_INT as u64 {
            Ok(Self::from(value))
        } else {
            Err(FixedPointError::Overflow {
                value: value as f64,
                bits: INT_BITS as usize,
                fractional: FRAC_BITS as usize,
            })
        }
    }

    /// Reinterprets a slice of raw storage as fixed-point values.
    ///
    /// ```
    /// use fixed_point::Fixed;
    ///
    /// let raw = [1i64 << 24, -(3i64 << 23)];
    /// let values = Fixed::slice_from_raw(&raw);
    /// assert_eq!(values[0], Fixed::one());
    /// assert_eq!(values[1].to_f64(), -1.5);
    /// ```
    pub fn slice_from_raw(raw: &[i64]) -> &[Fixed] {
        bytemuck::cast_slice(raw)
    }

    /// Views fixed-point values as their raw storage.
    pub fn slice_as_raw(values: &[Fixed]) -> &[i64] {
        bytemuck::cast_slice(values)
    }

    /// Views fixed-point values as native-endian bytes.
    pub fn slice_as_bytes(values: &[Fixed]) -> &[u8] {
        bytemuck::cast_slice(values)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Fixed {
                #[inline]
                fn from(x: $t) -> Self {
                    Self { raw: signed_to_raw(x as i64) }
                }
            }
        )*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Fixed {
                #[inline]
                fn from(x: $t) -> Self {
                    Self { raw: unsigned_to_raw(x as u64) }
                }
            }
        )*
    };
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<f32> for Fixed {
    /// Truncates `x * 2^24` toward zero. NaN maps to zero, out-of-range
    /// values saturate to the storage limits.
    #[inline]
    fn from(x: f32) -> Self {
        Self { raw: f32_to_raw(x) }
    }
}

impl From<f64> for Fixed {
    #[inline]
    fn from(x: f64) -> Self {
        Self { raw: f64_to_raw(x) }
    }
}

impl From<Fixed> for f32 {
    fn from(x: Fixed) -> Self {
        x.to_f32()
    }
}

impl From<Fixed> for f64 {
    fn from(x: Fixed) -> Self {
        x.to_f64()
    }
}

impl From<Fixed> for i32 {
    fn from(x: Fixed) -> Self {
        x.to_i32()
    }
}

impl From<Fixed> for i64 {
    fn from(x: Fixed) -> Self {
        x.to_i64()
    }
}

#[cfg(feature = "half_support")]
impl From<half::f16> for Fixed {
    fn from(x: half::f16) -> Self {
        Self::from(x.to_f32())
    }
}

#[cfg(feature = "half_support")]
impl Fixed {
    /// Converts to a half-precision float through `f32`.
    pub fn to_f16(self) -> half::f16 {
        half::f16::from_f32(self.to_f32())
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        assert_eq!(Fixed::default(), Fixed::zero());
        assert_eq!(Fixed::default().raw_value(), 0);
    }

    #[test]
    fn test_from_signed_integers() {
        assert_eq!(Fixed::from(1i8).raw, 1 << 24);
        assert_eq!(Fixed::from(-1i16).raw, -(1 << 24));
        assert_eq!(Fixed::from(-300i32).raw, -300 << 24);
        assert_eq!(Fixed::from(123_456_789i64).raw, 123_456_789i64 << 24);
        assert_eq!(Fixed::from(i8::MIN).to_i32(), -128);
    }

    #[test]
    fn test_from_unsigned_integers() {
        assert_eq!(Fixed::from(255u8).raw, 255 << 24);
        assert_eq!(Fixed::from(65535u16).to_i64(), 65535);
        assert_eq!(Fixed::from(u32::MAX).to_i64(), u32::MAX as i64);
        assert_eq!(Fixed::from(7u64).to_i32(), 7);
    }

    #[test]
    fn test_integer_range_limits() {
        assert_eq!(Fixed::from(MAX_INT).to_i64(), MAX_INT);
        assert_eq!(Fixed::from(-MAX_INT).to_i64(), -MAX_INT);
        assert_eq!(Fixed::from(-(MAX_INT + 1)).raw, i64::MIN);
        assert_eq!(Fixed::from(-(MAX_INT + 1)).to_i64(), -(MAX_INT + 1));
        assert_eq!(i64::from(Fixed::min_value()), -(MAX_INT + 1));
        // The low 32 bits of -2^39 are zero.
        assert_eq!(Fixed::min_value().to_i32(), 0);
        // One past the range wraps into the sign bit.
        assert!(Fixed::from(MAX_INT + 1).is_negative());
    }

    #[test]
    fn test_from_f32_truncates_toward_zero() {
        // 2^-25 is below the resolution and is dropped on both sides of zero.
        assert_eq!(Fixed::from(1.0f32 + 2f32.powi(-23)).raw, (1 << 24) + 2);
        assert_eq!(Fixed::from(2f32.powi(-25)).raw, 0);
        assert_eq!(Fixed::from(-(2f32.powi(-25))).raw, 0);
        assert_eq!(Fixed::from(-1.5f32).raw, -(3 << 23));
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Fixed::from(0.5f64).raw, 1 << 23);
        assert_eq!(Fixed::from(-0.25f64).raw, -(1 << 22));
        let x = Fixed::from(3.14159f64);
        assert!((x.to_f64() - 3.14159).abs() < 1e-7);
    }

    #[test]
    fn test_from_non_finite_floats() {
        assert_eq!(Fixed::from(f32::NAN), Fixed::zero());
        assert_eq!(Fixed::from(f64::INFINITY), Fixed::max_value());
        assert_eq!(Fixed::from(f64::NEG_INFINITY), Fixed::min_value());
    }

    #[test]
    fn test_to_float() {
        assert_eq!(Fixed::from(3).to_f32(), 3.0);
        assert_eq!(Fixed::from(-3).to_f64(), -3.0);
        assert_eq!(Fixed::from_raw(1).to_f64(), 1.0 / 16_777_216.0);
        assert_eq!(Fixed::zero().to_f32(), 0.0);
        assert_eq!(f64::from(Fixed::from(0.75f64)), 0.75);
        assert_eq!(f32::from(Fixed::from(-0.75f32)), -0.75);
    }

    #[test]
    fn test_to_int_truncates_toward_zero() {
        assert_eq!(Fixed::from(2.9f64).to_i32(), 2);
        assert_eq!(Fixed::from(-2.9f64).to_i32(), -2);
        assert_eq!(Fixed::from(-0.5f64).to_i64(), 0);
        assert_eq!(i32::from(Fixed::from(-7)), -7);
        assert_eq!(i64::from(Fixed::from(500_000_000_000i64)), 500_000_000_000);
    }

    #[test]
    fn test_constants() {
        assert_eq!(Fixed::one().to_f64(), 1.0);
        assert_eq!(Fixed::from_raw(Fixed::SCALE), Fixed::one());
        assert_eq!(Fixed::INFINITY, Fixed::max_value());
        assert_eq!(Fixed::NEG_INFINITY.raw, -Fixed::INFINITY.raw);
        assert!(Fixed::min_value() < Fixed::NEG_INFINITY);
        assert_eq!(Fixed::EPSILON.to_f64(), 2f64.powi(-24));
    }

    #[test]
    fn test_abs_and_signum() {
        let x = Fixed::from(-3.5f32);
        assert_eq!(x.abs(), Fixed::from(3.5f32));
        assert_eq!(x.signum(), -1);
        assert_eq!(Fixed::zero().signum(), 0);
        assert_eq!(Fixed::one().signum(), 1);
        assert!(x.is_negative());
        assert!(Fixed::zero().is_zero());
    }

    #[test]
    fn test_try_from_f64() {
        assert!(Fixed::try_from_f64(549_755_813_887.5).is_ok());
        assert_eq!(
            Fixed::try_from_f64(-549_755_813_888.0).unwrap().to_i64(),
            -549_755_813_888
        );
        assert!(matches!(
            Fixed::try_from_f64(549_755_813_888.0),
            Err(FixedPointError::Overflow { bits: 40, fractional: 24, .. })
        ));
        assert_eq!(Fixed::try_from_f64(f64::NAN), Err(FixedPointError::NotFinite));
        assert_eq!(
            Fixed::try_from_f32(f32::NEG_INFINITY),
            Err(FixedPointError::NotFinite)
        );
        assert!(Fixed::try_from_f32(1e12).is_err());
        assert_eq!(Fixed::try_from_f32(-2.5).unwrap(), Fixed::from(-2.5f32));
    }

    #[test]
    fn test_try_from_integers() {
        assert_eq!(Fixed::try_from_i64(MAX_INT).unwrap().to_i64(), MAX_INT);
        assert_eq!(Fixed::try_from_i64(-(MAX_INT + 1)).unwrap(), Fixed::min_value());
        assert_eq!(
            Fixed::try_from_i64(-(MAX_INT + 1)).unwrap().to_i64(),
            -(MAX_INT + 1)
        );
        assert!(Fixed::try_from_i64(MAX_INT + 1).is_err());
        assert!(Fixed::try_from_i64(i64::MIN).is_err());
        assert!(Fixed::try_from_u64(MAX_INT as u64).is_ok());
        assert!(Fixed::try_from_u64(u64::MAX).is_err());
    }

    #[test]
    fn test_slice_casts() {
        let values = [Fixed::from(1), Fixed::from(-2), Fixed::from(0.5f32)];
        let raw = Fixed::slice_as_raw(&values);
        assert_eq!(raw, &[1 << 24, -(2 << 24), 1 << 23]);
        assert_eq!(Fixed::slice_from_raw(raw), &values);
        assert_eq!(Fixed::slice_as_bytes(&values).len(), 3 * 8);
    }

    #[test]
    fn test_display() {
        assert_eq!(Fixed::from(-2.5f64).to_string(), "-2.5");
        assert_eq!(format!("{:.2}", Fixed::from(1)), "1.00");
    }

    #[cfg(feature = "half_support")]
    #[test]
    fn test_half_conversion() {
        let h = half::f16::from_f32(1.5);
        let x = Fixed::from(h);
        assert_eq!(x, Fixed::from(1.5f32));
        assert_eq!(x.to_f16(), h);
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_integer_roundtrip(value in -(MAX_INT + 1)..=MAX_INT) {
                prop_assert_eq!(Fixed::from(value).to_i64(), value);
            }

            #[test]
            fn test_i32_roundtrip(value in any::<i32>()) {
                prop_assert_eq!(Fixed::from(value).to_i32(), value);
            }

            #[test]
            fn test_f64_roundtrip(value in -1.0e11f64..1.0e11f64) {
                let recovered = Fixed::from(value).to_f64();
                prop_assert!((recovered - value).abs() <= 1.0 / SCALE as f64);
            }

            #[test]
            fn test_ordering_matches_floats(a in -1.0e6f64..1.0e6f64, b in -1.0e6f64..1.0e6f64) {
                let (x, y) = (Fixed::from(a), Fixed::from(b));
                if a < b {
                    prop_assert!(x <= y);
                } else {
                    prop_assert!(x >= y);
                }
            }
        }
    }
}
