//! # fixed_point
//!
//! Floating-point emulation on integer hardware: a Q40.24 fixed-point number
//! held in one `i64`.
//!
//! ## Features
//!
//! - `Fixed` converts from every native integer and float type and back to
//!   `i32`, `i64`, `f32` and `f64`
//! - `+ - * /`, the compound assignments and all comparisons work against
//!   `Fixed` and native operands alike, so `float` code ports by changing
//!   the variable types
//! - Multiplication and division stay within 64-bit intermediates
//! - Division by zero saturates instead of trapping
//! - Zero-copy casts between `&[Fixed]`, `&[i64]` and bytes
//!
//! ## Cargo features
//!
//! - `std` (default): `std::error::Error` for [`FixedPointError`]. Without
//!   it the crate is `no_std`.
//! - `float_div`: divide through `f32` instead of 64-bit integer division,
//!   for targets where the latter is slower.
//! - `fast_float_conversion`: convert from/to floats by adjusting the
//!   IEEE-754 exponent instead of multiplying/dividing by `2^24`.
//! - `half_support`: conversions from/to `half::f16`.
//!
//! ## Examples
//!
//! ```
//! use fixed_point::Fixed;
//!
//! let mut a = Fixed::from(1.5f32);
//! let b = Fixed::from(-4);
//! let c = Fixed::from(0.25f64);
//!
//! if (a + b) / c < 0.0f32 {
//!     a -= b * c;
//! }
//! assert_eq!(a, 2.5f32);
//! assert_eq!(a.to_i32(), 2);
//! ```
//!
//! Precision-sensitive callers can use the checked API instead of the
//! wrapping operators:
//!
//! ```
//! use fixed_point::{Fixed, FixedPointError};
//!
//! let big = Fixed::try_from_i64(1 << 35)?;
//! assert!(big.checked_mul(big).is_err());
//! assert_eq!(Fixed::one().checked_div(Fixed::zero()), Err(FixedPointError::DivisionByZero));
//! # Ok::<(), fixed_point::FixedPointError>(())
//! ```

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

pub mod error;
pub mod fixed;
pub mod float_bits;
pub mod format;
pub mod ops;

pub use error::FixedPointError;
pub use fixed::Fixed;
pub use format::{FRAC_BITS, SCALE};
