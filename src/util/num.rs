use crate::{error::RuntimeError, interpreter::executor::core::EvalResult};

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_I64_INT: i64 = 9_007_199_254_740_991;

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// # Errors
/// Returns `RuntimeError::LiteralTooLarge` if the value exceeds
/// `MAX_SAFE_I64_INT` in absolute value.
///
/// # Example
/// ```
/// use mimic::util::num::{MAX_SAFE_I64_INT, i64_to_f64_checked};
///
/// assert_eq!(i64_to_f64_checked(42, 1).unwrap(), 42.0);
/// assert!(i64_to_f64_checked(MAX_SAFE_I64_INT + 1, 1).is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub const fn i64_to_f64_checked(value: i64, line: usize) -> EvalResult<f64> {
    if value.unsigned_abs() > MAX_SAFE_I64_INT as u64 {
        return Err(RuntimeError::LiteralTooLarge { line });
    }
    Ok(value as f64)
}

/// Safely converts an `f64` to `i64` if the value is finite, within range,
/// and not fractional.
///
/// # Errors
/// Returns `RuntimeError::TypeError` for non-finite values,
/// `RuntimeError::LiteralTooLarge` for out-of-range values, and
/// `RuntimeError::FractionalPart` for fractional values.
///
/// # Example
/// ```
/// use mimic::{error::RuntimeError, util::num::f64_to_i64_checked};
///
/// assert_eq!(f64_to_i64_checked(1000.0, 1).unwrap(), 1000);
///
/// let err = f64_to_i64_checked(1.5, 123).unwrap_err();
/// assert!(matches!(err, RuntimeError::FractionalPart { line: 123 }));
///
/// let err = f64_to_i64_checked(1e20, 5).unwrap_err();
/// assert!(matches!(err, RuntimeError::LiteralTooLarge { line: 5 }));
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64, line: usize) -> EvalResult<i64> {
    if !value.is_finite() {
        return Err(RuntimeError::TypeError { details: format!("Cannot convert non-finite value {value} to an integer"),
                                             line });
    }
    if value < i64::MIN as f64 || value > i64::MAX as f64 {
        return Err(RuntimeError::LiteralTooLarge { line });
    }
    if value.fract() != 0.0 {
        return Err(RuntimeError::FractionalPart { line });
    }
    Ok(value as i64)
}

/// Safely converts an `i64` to `u32`, for shift amounts and exponents.
///
/// # Errors
/// Returns `RuntimeError::LiteralTooLarge` for values above `u32::MAX` and
/// `RuntimeError::LiteralTooSmall` for negative values.
///
/// # Example
/// ```
/// use mimic::{error::RuntimeError, util::num::i64_to_u32_checked};
///
/// assert_eq!(i64_to_u32_checked(45, 5).unwrap(), 45);
///
/// let err = i64_to_u32_checked(-1, 5).unwrap_err();
/// assert!(matches!(err, RuntimeError::LiteralTooSmall { line: 5 }));
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
pub const fn i64_to_u32_checked(value: i64, line: usize) -> EvalResult<u32> {
    if value > u32::MAX as i64 {
        return Err(RuntimeError::LiteralTooLarge { line });
    }
    if value < 0 {
        return Err(RuntimeError::LiteralTooSmall { line });
    }
    Ok(value as u32)
}
