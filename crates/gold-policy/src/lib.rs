//! # gold-policy
//!
//! The rebase policy: a state machine that turns the market exchange rate
//! and the consumer price index into a bounded, lagged supply adjustment and
//! applies it to the ledger once per rebase window.
//!
//! ## Modules
//!
//! - [`config`] — policy parameters and their defaults
//! - [`timing`] — rebase interval and window arithmetic
//! - [`policy`] — the [`RebasePolicy`] itself

pub mod config;
pub mod policy;
pub mod timing;

pub use config::PolicyConfig;
pub use policy::RebasePolicy;
pub use timing::RebaseTiming;

use ethnum::U256;
use gold_ledger::LedgerError;
use gold_math::MathError;
use gold_oracle::OracleError;
use gold_types::{AccessError, Address, ErrorKind};

/// Error types for policy operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// Caller failed an owner or orchestrator check.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// `now` falls outside the rebase window.
    #[error("not in rebase window at {now}")]
    NotInWindow {
        /// Rejected timestamp.
        now: u64,
    },

    /// The minimum interval since the last rebase has not elapsed.
    #[error("rebase too soon: now {now}, next allowed at {next_allowed}")]
    TooSoon {
        /// Rejected timestamp.
        now: u64,
        /// Earliest timestamp the interval allows.
        next_allowed: u64,
    },

    /// An oracle was missing or reported invalid data.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// Rebase lag must be at least one.
    #[error("rebase lag must be at least 1")]
    InvalidRebaseLag,

    /// Interval is zero, or the window offset is not below the interval.
    #[error("invalid timing parameters: interval {interval}, offset {offset}")]
    InvalidTimingParameters {
        /// Minimum rebase interval in seconds.
        interval: u64,
        /// Window offset in seconds.
        offset: u64,
    },

    /// Base CPI must be positive.
    #[error("base cpi must be positive")]
    InvalidBaseCpi,

    /// The rate cap sits below the target rate at base CPI.
    #[error("max rate {0} is below the base target rate")]
    InvalidMaxRate(U256),

    /// The ledger rejected the rebase.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Fixed-point arithmetic failure.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl PolicyError {
    /// Error class of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Access(e) => e.kind(),
            Self::NotInWindow { .. } | Self::TooSoon { .. } => ErrorKind::GateNotSatisfied,
            Self::Oracle(e) => e.kind(),
            Self::InvalidRebaseLag
            | Self::InvalidTimingParameters { .. }
            | Self::InvalidBaseCpi
            | Self::InvalidMaxRate(_) => ErrorKind::InvalidState,
            Self::Ledger(e) => e.kind(),
            Self::Math(e) => e.kind(),
        }
    }
}

/// Convenience result type for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;

/// The surface the orchestrator drives.
pub trait MonetaryPolicy {
    /// Run one rebase on behalf of `caller` at `now` and return the new
    /// total supply.
    fn rebase(&mut self, caller: &Address, now: u64) -> Result<u128>;
}
