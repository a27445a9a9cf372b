//! Rate clamping, multiply-divide and supply bounds.

use ethnum::U256;

use crate::checked::{div, mul};
use crate::Result;

/// Cap an exchange rate at `max_rate`: `min(rate, max_rate)`.
pub fn clamped_scale(rate: U256, max_rate: U256) -> U256 {
    if rate > max_rate {
        max_rate
    } else {
        rate
    }
}

/// `a * b / denominator`, truncating.
///
/// # Errors
///
/// - [`MathError::Overflow`](crate::MathError::Overflow) if `a * b` overflows
/// - [`MathError::DivideByZero`](crate::MathError::DivideByZero) if `denominator` is zero
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256> {
    div(mul(a, b)?, denominator)
}

/// Clamp a prospective supply to `[min, max]`.
pub fn clamp_supply(supply: U256, min: u128, max: u128) -> u128 {
    let min_wide = U256::new(min);
    let max_wide = U256::new(max);
    if supply < min_wide {
        min
    } else if supply > max_wide {
        max
    } else {
        supply.as_u128()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MathError;

    #[test]
    fn test_clamped_scale_below_max_unchanged() {
        let rate = U256::new(150);
        assert_eq!(clamped_scale(rate, U256::new(1_000)), rate);
        assert_eq!(clamped_scale(U256::ZERO, U256::new(1_000)), U256::ZERO);
    }

    #[test]
    fn test_clamped_scale_caps_at_max() {
        let max = U256::new(1_000);
        assert_eq!(clamped_scale(U256::new(5_000), max), max);
        assert_eq!(clamped_scale(max, max), max);
        assert_eq!(clamped_scale(U256::MAX, max), max);
    }

    #[test]
    fn test_mul_div() {
        let v = mul_div(U256::new(12), U256::new(1), U256::new(10)).expect("mul_div");
        assert_eq!(v, U256::ONE);
        assert_eq!(
            mul_div(U256::ONE, U256::ONE, U256::ZERO),
            Err(MathError::DivideByZero)
        );
        assert_eq!(
            mul_div(U256::MAX, U256::new(2), U256::ONE),
            Err(MathError::Overflow)
        );
    }

    #[test]
    fn test_clamp_supply() {
        assert_eq!(clamp_supply(U256::new(5), 10, 100), 10);
        assert_eq!(clamp_supply(U256::new(50), 10, 100), 50);
        assert_eq!(clamp_supply(U256::new(500), 10, 100), 100);
        assert_eq!(clamp_supply(U256::MAX, 10, u128::MAX), u128::MAX);
    }
}
