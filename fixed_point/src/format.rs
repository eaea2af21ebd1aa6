//! Layout constants of the Q40.24 format.
//!
//! A value is stored as a signed 64-bit integer equal to `real * 2^24`,
//! leaving 40 bits (sign included) for the integer part.

/// Number of fractional bits.
pub const FRAC_BITS: u32 = 24;

/// Number of integer bits, sign bit included.
pub const INT_BITS: u32 = 64 - FRAC_BITS;

/// `2^24`, the factor between a real value and its storage.
pub const SCALE: i64 = 1 << FRAC_BITS;

pub(crate) const SCALE_F32: f32 = SCALE as f32;
pub(crate) const SCALE_F64: f64 = SCALE as f64;

/// Largest integer magnitude that converts without wrapping: `2^39 - 1`.
pub const MAX_INT: i64 = i64::MAX >> FRAC_BITS;

// Multiplication drops 8 bits from each factor, then 8 from the product.
pub(crate) const MUL_PRE_SHIFT: u32 = 8;
pub(crate) const MUL_POST_SHIFT: u32 = 8;

// Division: dividend << 10, divisor >> 8, quotient << 6.
pub(crate) const DIV_DIVIDEND_SHIFT: u32 = 10;
pub(crate) const DIV_DIVISOR_SHIFT: u32 = 8;
pub(crate) const DIV_POST_SHIFT: u32 = 6;

const _: () = assert!(MUL_PRE_SHIFT * 2 + MUL_POST_SHIFT == FRAC_BITS);
const _: () = assert!(DIV_DIVIDEND_SHIFT + DIV_DIVISOR_SHIFT + DIV_POST_SHIFT == FRAC_BITS);
