#[cfg(feature = "std")]
use thiserror::Error;

/// Errors reported by the checked fixed-point API.
///
/// The arithmetic operators never return these: they wrap on overflow and
/// saturate on division by zero.
#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixedPointError {
    #[cfg_attr(
        feature = "std",
        error("Value {value} out of range for fixed-point format {bits}.{fractional}")
    )]
    Overflow {
        value: f64,
        bits: usize,
        fractional: usize,
    },

    #[cfg_attr(feature = "std", error("Value is not finite"))]
    NotFinite,

    #[cfg_attr(feature = "std", error("Fixed-point {0} overflowed"))]
    ArithmeticOverflow(&'static str),

    #[cfg_attr(feature = "std", error("Division by zero"))]
    DivisionByZero,
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for FixedPointError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FixedPointError::Overflow {
                value,
                bits,
                fractional,
            } => write!(
                f,
                "Value {} out of range for fixed-point format {}.{}",
                value, bits, fractional
            ),
            FixedPointError::NotFinite => write!(f, "Value is not finite"),
            FixedPointError::ArithmeticOverflow(op) => write!(f, "Fixed-point {} overflowed", op),
            FixedPointError::DivisionByZero => write!(f, "Division by zero"),
        }
    }
}
