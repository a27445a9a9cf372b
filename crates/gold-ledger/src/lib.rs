//! # gold-ledger
//!
//! Elastic-supply token ledger.
//!
//! Accounts own *fragments*, an internal unit whose total never changes after
//! initialization. Visible balances are fragments divided by a global
//! [`ScalingFactor`]; a supply rebase only recomputes that factor, so every
//! balance moves proportionally in O(1).
//!
//! ## Modules
//!
//! - [`scaling`] — fragments-per-unit ratio
//! - [`fee`] — transfer fee routed to a reward address
//! - [`ledger`] — the [`ElasticLedger`] itself

pub mod fee;
pub mod ledger;
pub mod scaling;

pub use fee::RewardParams;
pub use ledger::ElasticLedger;
pub use scaling::ScalingFactor;

use ethnum::I256;
use gold_math::MathError;
use gold_types::{AccessError, Address, ErrorKind};

/// Error types for ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Caller failed an owner or monetary-policy check.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Rebases are paused.
    #[error("rebase is paused")]
    RebasePaused,

    /// Transfers and allowance changes are paused.
    #[error("token operations are paused")]
    TokenPaused,

    /// Recipient is the zero address or the ledger itself.
    #[error("invalid recipient {0}")]
    InvalidRecipient(Address),

    /// Sender balance is below the requested amount.
    #[error("insufficient balance: have {available}, need {required}")]
    InsufficientBalance {
        /// Visible balance available.
        available: u128,
        /// Visible amount requested.
        required: u128,
    },

    /// Spender allowance is below the requested amount.
    #[error("insufficient allowance: have {available}, need {required}")]
    InsufficientAllowance {
        /// Allowance available.
        available: u128,
        /// Visible amount requested.
        required: u128,
    },

    /// Fee fraction is not a proper fraction.
    #[error("invalid fee {numerator}/{denominator}")]
    InvalidFee {
        /// Fee numerator.
        numerator: u128,
        /// Fee denominator.
        denominator: u128,
    },

    /// Initial supply outside the allowed bounds.
    #[error("invalid initial supply {0}")]
    InvalidSupply(u128),

    /// Fixed-point arithmetic failure.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl LedgerError {
    /// Error class of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Access(e) => e.kind(),
            Self::RebasePaused | Self::TokenPaused => ErrorKind::InvalidState,
            Self::InvalidFee { .. } | Self::InvalidSupply(_) => ErrorKind::InvalidState,
            Self::InvalidRecipient(_) => ErrorKind::InvalidRecipient,
            Self::InsufficientBalance { .. } | Self::InsufficientAllowance { .. } => {
                ErrorKind::InsufficientFunds
            }
            Self::Math(e) => e.kind(),
        }
    }
}

/// Convenience result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// The ledger surface the rebase policy drives.
pub trait SupplyLedger {
    /// Current visible total supply.
    fn total_supply(&self) -> u128;

    /// Apply a signed supply delta on behalf of `caller` and return the new
    /// total supply.
    fn rebase(&mut self, caller: &Address, epoch: u64, supply_delta: I256) -> Result<u128>;
}

impl SupplyLedger for ElasticLedger {
    fn total_supply(&self) -> u128 {
        ElasticLedger::total_supply(self)
    }

    fn rebase(&mut self, caller: &Address, epoch: u64, supply_delta: I256) -> Result<u128> {
        ElasticLedger::rebase(self, caller, epoch, supply_delta)
    }
}
