//! # gold-math
//!
//! Deterministic integer fixed-point arithmetic shared by the ledger and the
//! rebase policy. Everything is exact over 256-bit integers; there is no
//! floating point anywhere in the monetary core.
//!
//! ## Modules
//!
//! - [`checked`] — checked arithmetic and signed/unsigned conversion
//! - [`scale`] — rate clamping, multiply-divide and supply bounds

pub mod checked;
pub mod scale;

pub use checked::{safe_to_signed, to_u128};
pub use ethnum::{I256, U256};
pub use scale::{clamp_supply, clamped_scale, mul_div};

use gold_types::ErrorKind;

/// Error types for fixed-point arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    /// Result does not fit the target representation.
    #[error("arithmetic overflow")]
    Overflow,

    /// Unsigned subtraction went below zero.
    #[error("arithmetic underflow")]
    Underflow,

    /// Division or remainder by zero.
    #[error("division by zero")]
    DivideByZero,
}

impl MathError {
    /// Error class of this failure.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Arithmetic
    }
}

/// Convenience result type for math operations.
pub type Result<T> = std::result::Result<T, MathError>;
