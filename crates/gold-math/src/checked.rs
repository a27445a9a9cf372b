//! Checked arithmetic over [`U256`] and [`I256`].
//!
//! Each operation returns [`MathError`] instead of wrapping or panicking.

use ethnum::{I256, U256};

use crate::{MathError, Result};

/// Largest signed 256-bit value, as an unsigned integer.
const MAX_I256_AS_U256: U256 = U256::from_words(i128::MAX as u128, u128::MAX);

/// Largest `u128`, widened.
const MAX_U128_AS_U256: U256 = U256::from_words(0, u128::MAX);

/// Convert an unsigned value into the signed domain.
///
/// # Errors
///
/// - [`MathError::Overflow`] if `x` exceeds `I256::MAX`
pub fn safe_to_signed(x: U256) -> Result<I256> {
    if x > MAX_I256_AS_U256 {
        return Err(MathError::Overflow);
    }
    Ok(x.as_i256())
}

/// Narrow a 256-bit value to `u128`.
///
/// # Errors
///
/// - [`MathError::Overflow`] if `x` exceeds `u128::MAX`
pub fn to_u128(x: U256) -> Result<u128> {
    if x > MAX_U128_AS_U256 {
        return Err(MathError::Overflow);
    }
    Ok(x.as_u128())
}

/// `a + b`, failing on overflow.
pub fn add(a: U256, b: U256) -> Result<U256> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

/// `a - b`, failing when `b > a`.
pub fn sub(a: U256, b: U256) -> Result<U256> {
    a.checked_sub(b).ok_or(MathError::Underflow)
}

/// `a * b`, failing on overflow.
pub fn mul(a: U256, b: U256) -> Result<U256> {
    a.checked_mul(b).ok_or(MathError::Overflow)
}

/// `a / b`, truncating.
///
/// # Errors
///
/// - [`MathError::DivideByZero`] if `b` is zero
pub fn div(a: U256, b: U256) -> Result<U256> {
    if b == U256::ZERO {
        return Err(MathError::DivideByZero);
    }
    Ok(a / b)
}

/// Signed `a - b`, failing on overflow.
pub fn signed_sub(a: I256, b: I256) -> Result<I256> {
    a.checked_sub(b).ok_or(MathError::Overflow)
}

/// Signed `a * b`, failing on overflow.
pub fn signed_mul(a: I256, b: I256) -> Result<I256> {
    a.checked_mul(b).ok_or(MathError::Overflow)
}

/// Signed `a / b`, truncating toward zero.
///
/// # Errors
///
/// - [`MathError::DivideByZero`] if `b` is zero
/// - [`MathError::Overflow`] for `I256::MIN / -1`
pub fn signed_div(a: I256, b: I256) -> Result<I256> {
    if b == I256::ZERO {
        return Err(MathError::DivideByZero);
    }
    a.checked_div(b).ok_or(MathError::Overflow)
}
