//! # gold-types
//!
//! Shared domain types used across the USDGOLD workspace: account
//! addresses, caller context, owner-gated access control, emitted records
//! and the error-kind taxonomy every component maps its failures onto.

pub mod access;
pub mod address;
pub mod events;

pub use access::{AccessError, CallContext, Ownable};
pub use address::Address;
pub use events::{Event, EventLog};

/// Token name.
pub const NAME: &str = "USDGOLD";

/// Token symbol.
pub const SYMBOL: &str = "USDGOLD";

/// Decimal places of the visible token unit.
pub const DECIMALS: u8 = 9;

/// One whole token in base units (10^9).
pub const UNIT: u128 = 1_000_000_000;

/// Supply minted to the owner at initialization: 3,025,000 tokens.
pub const INITIAL_SUPPLY: u128 = 3_025_000 * UNIT;

/// Upper bound on the visible total supply (2^128 - 1).
pub const MAX_SUPPLY: u128 = u128::MAX;

/// Lower bound on the visible total supply: one whole token.
pub const MIN_SUPPLY: u128 = UNIT;

/// Decimal places of exchange rates, CPI values and the deviation threshold.
pub const RATE_DECIMALS: u32 = 18;

/// One unit of rate precision (10^18).
pub const RATE_UNIT: u128 = 1_000_000_000_000_000_000;

/// Failure classes shared by every component.
///
/// Each crate error exposes a `kind()` so callers can react to the class of
/// a rejection without matching on crate-specific variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller failed an access-control predicate.
    Unauthorized,
    /// The operation is not allowed in the current configuration or pause state.
    InvalidState,
    /// A time window, interval or oracle validity gate was not satisfied.
    GateNotSatisfied,
    /// Overflow, sign conversion or division by zero.
    Arithmetic,
    /// Transfer to the zero address or to the ledger itself.
    InvalidRecipient,
    /// Balance or allowance is too small for the requested amount.
    InsufficientFunds,
    /// Transaction list index does not exist.
    IndexOutOfRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_supply() {
        assert_eq!(INITIAL_SUPPLY, 3_025_000_000_000_000);
    }

    #[test]
    fn test_supply_bounds() {
        assert!(MIN_SUPPLY > 0);
        assert!(MIN_SUPPLY < INITIAL_SUPPLY);
        assert_eq!(MAX_SUPPLY, (1u128 << 127) - 1 + (1u128 << 127));
    }

    #[test]
    fn test_rate_unit() {
        assert_eq!(RATE_UNIT, 10u128.pow(RATE_DECIMALS));
        assert_eq!(UNIT, 10u128.pow(DECIMALS as u32));
    }
}
