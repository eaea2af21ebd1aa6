//! Scaling by `2^±24` through the IEEE-754 exponent field.
//!
//! Adding 24 to the biased exponent multiplies a normal float by `2^24`
//! without a floating-point multiply; subtracting divides. These helpers are
//! what the `fast_float_conversion` feature routes float conversions through.
//! Inputs whose exponent field would leave the normal range take the
//! arithmetic path instead, so the result never lands on an inf/NaN/sign-bit
//! pattern.

use crate::format::{FRAC_BITS, SCALE_F32, SCALE_F64};

const _: () = assert!(core::mem::size_of::<f32>() == core::mem::size_of::<u32>());
const _: () = assert!(core::mem::size_of::<f64>() == core::mem::size_of::<u64>());

const F32_EXP_SHIFT: u32 = 23;
const F32_EXP_MASK: u32 = 0xFF;
const F64_EXP_SHIFT: u32 = 52;
const F64_EXP_MASK: u64 = 0x7FF;

/// `x * 2^24` for `f32`.
#[inline]
pub fn scale_up_f32(x: f32) -> f32 {
    let bits = x.to_bits();
    let exp = (bits >> F32_EXP_SHIFT) & F32_EXP_MASK;
    if exp == 0 || exp >= F32_EXP_MASK - FRAC_BITS {
        return x * SCALE_F32;
    }
    f32::from_bits(bits + (FRAC_BITS << F32_EXP_SHIFT))
}

/// `x / 2^24` for `f32`. Returns `0.0` when the exponent is too small to
/// take the subtraction.
#[inline]
pub fn scale_down_f32(x: f32) -> f32 {
    let bits = x.to_bits();
    // Shifting out the sign leaves the exponent in the top 8 bits.
    if (bits << 1) < ((FRAC_BITS + 1) << (F32_EXP_SHIFT + 1)) {
        return 0.0;
    }
    f32::from_bits(bits - (FRAC_BITS << F32_EXP_SHIFT))
}

/// `x * 2^24` for `f64`.
#[inline]
pub fn scale_up_f64(x: f64) -> f64 {
    let bits = x.to_bits();
    let exp = (bits >> F64_EXP_SHIFT) & F64_EXP_MASK;
    if exp == 0 || exp >= F64_EXP_MASK - FRAC_BITS as u64 {
        return x * SCALE_F64;
    }
    f64::from_bits(bits + ((FRAC_BITS as u64) << F64_EXP_SHIFT))
}

/// `x / 2^24` for `f64`. Returns `0.0` when the exponent is too small to
/// take the subtraction.
#[inline]
pub fn scale_down_f64(x: f64) -> f64 {
    let bits = x.to_bits();
    if (bits << 1) < ((FRAC_BITS as u64 + 1) << (F64_EXP_SHIFT + 1)) {
        return 0.0;
    }
    f64::from_bits(bits - ((FRAC_BITS as u64) << F64_EXP_SHIFT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_up_matches_multiply() {
        for x in [1.0f32, -1.0, 1.5, -2.25, 3.14159, 1e-3, 123456.78, -7.5e9] {
            assert_eq!(scale_up_f32(x), x * SCALE_F32);
        }
        for x in [1.0f64, -1.0, 0.1, -2.25, 3.141592653589793, 1e-7, 5.5e11] {
            assert_eq!(scale_up_f64(x), x * SCALE_F64);
        }
    }

    #[test]
    fn test_scale_down_matches_divide() {
        for x in [16777216.0f32, -16777216.0, 1.0, 25165824.0, -3.0e15] {
            assert_eq!(scale_down_f32(x), x / SCALE_F32);
        }
        for x in [16777216.0f64, -16777216.0, 1.0, 25165824.0, -9.2e18] {
            assert_eq!(scale_down_f64(x), x / SCALE_F64);
        }
    }

    #[test]
    fn test_zero_stays_zero() {
        assert_eq!(scale_up_f32(0.0), 0.0);
        assert_eq!(scale_down_f32(0.0), 0.0);
        assert_eq!(scale_down_f32(-0.0), 0.0);
        assert_eq!(scale_up_f64(0.0), 0.0);
        assert_eq!(scale_down_f64(0.0), 0.0);
    }

    #[test]
    fn test_tiny_exponent_flushes_to_zero() {
        // Exponent field 24: subtracting 24 would produce a subnormal pattern.
        let tiny = f32::from_bits(24 << 23);
        assert_eq!(scale_down_f32(tiny), 0.0);
        let tiny = f64::from_bits(24 << 52);
        assert_eq!(scale_down_f64(tiny), 0.0);
    }

    #[test]
    fn test_huge_exponent_falls_back() {
        assert_eq!(scale_up_f32(f32::MAX), f32::INFINITY);
        assert_eq!(scale_up_f32(-f32::MAX), f32::NEG_INFINITY);
        assert!(scale_up_f32(f32::NAN).is_nan());
        assert_eq!(scale_up_f64(f64::INFINITY), f64::INFINITY);
        assert_eq!(scale_up_f64(-1e308), f64::NEG_INFINITY);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn scale_up_f32_is_exact(x in -1.0e12f32..1.0e12f32) {
                prop_assert_eq!(scale_up_f32(x), x * SCALE_F32);
            }

            #[test]
            fn scale_round_trip_f64(x in -1.0e12f64..1.0e12f64) {
                prop_assume!(x.abs() > 1e-200);
                prop_assert_eq!(scale_down_f64(scale_up_f64(x)), x);
            }
        }
    }
}
