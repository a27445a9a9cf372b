//! # gold-oracle
//!
//! Price inputs for the rebase policy.
//!
//! The policy consumes two oracles, a market exchange rate and a consumer
//! price index, each answering `(value, valid)`. Both values are 18-decimal
//! fixed-point integers. Oracles are opaque to the policy; this crate only
//! defines the seam and the in-process implementations used for simulation
//! and testing.
//!
//! ## Modules
//!
//! - [`stub`] — settable oracle with a query counter
//! - [`guard`] — emergency switch that forces reports invalid

pub mod guard;
pub mod stub;

pub use guard::GuardedOracle;
pub use stub::StubOracle;

use std::fmt;
use std::sync::Arc;

use ethnum::U256;
use gold_types::{AccessError, ErrorKind};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// One oracle answer.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleReport {
    /// Reported value, 18-decimal fixed point.
    #[serde_as(as = "DisplayFromStr")]
    pub value: U256,
    /// Whether the oracle vouches for `value`.
    pub valid: bool,
}

impl OracleReport {
    /// A report the oracle vouches for.
    pub fn valid(value: U256) -> Self {
        Self { value, valid: true }
    }

    /// A report the consumer must not act on.
    pub fn invalid(value: U256) -> Self {
        Self {
            value,
            valid: false,
        }
    }

    /// The value, if the report is valid.
    ///
    /// # Errors
    ///
    /// - [`OracleError::InvalidReport`] if `valid` is false
    pub fn require_valid(&self, kind: OracleKind) -> Result<U256> {
        if !self.valid {
            return Err(OracleError::InvalidReport(kind));
        }
        Ok(self.value)
    }
}

/// Which of the two policy inputs an oracle supplies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleKind {
    /// Market exchange rate.
    Market,
    /// Consumer price index.
    Cpi,
}

impl fmt::Display for OracleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Market => f.write_str("market"),
            Self::Cpi => f.write_str("cpi"),
        }
    }
}

/// Error types for oracle operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// The oracle answered with `valid = false`.
    #[error("{0} oracle reported invalid data")]
    InvalidReport(OracleKind),

    /// No oracle is registered for this input.
    #[error("{0} oracle is not configured")]
    NotConfigured(OracleKind),

    /// Caller may not operate the emergency switch.
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl OracleError {
    /// Error class of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidReport(_) => ErrorKind::GateNotSatisfied,
            Self::NotConfigured(_) => ErrorKind::InvalidState,
            Self::Access(e) => e.kind(),
        }
    }
}

/// Convenience result type for oracle operations.
pub type Result<T> = std::result::Result<T, OracleError>;

/// A read-only source of `(value, valid)` reports.
pub trait OracleGateway {
    /// Current report.
    fn get_data(&self) -> OracleReport;
}

impl<O: OracleGateway + ?Sized> OracleGateway for Arc<O> {
    fn get_data(&self) -> OracleReport {
        (**self).get_data()
    }
}

impl<O: OracleGateway + ?Sized> OracleGateway for Box<O> {
    fn get_data(&self) -> OracleReport {
        (**self).get_data()
    }
}
