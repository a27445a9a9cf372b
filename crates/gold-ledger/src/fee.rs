//! Transfer fee routed to a reward address.
//!
//! The fee is skimmed from the transferred amount, never added on top:
//!
//! ```text
//! fee       = value * numerator / denominator   (truncated)
//! recipient = value - fee
//! reward    = fee
//! ```

use ethnum::U256;
use serde::Serialize;

use gold_types::Address;

use crate::{LedgerError, Result};

/// Owner-configured fee parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RewardParams {
    reward_address: Address,
    fee_numerator: u128,
    fee_denominator: u128,
}

impl RewardParams {
    /// Validate and build fee parameters.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidFee`] if the denominator is zero or the
    ///   numerator exceeds it
    /// - [`LedgerError::InvalidRecipient`] if `reward_address` is zero
    pub fn new(reward_address: Address, fee_numerator: u128, fee_denominator: u128) -> Result<Self> {
        if fee_denominator == 0 || fee_numerator > fee_denominator {
            return Err(LedgerError::InvalidFee {
                numerator: fee_numerator,
                denominator: fee_denominator,
            });
        }
        if reward_address.is_zero() {
            return Err(LedgerError::InvalidRecipient(reward_address));
        }
        Ok(Self {
            reward_address,
            fee_numerator,
            fee_denominator,
        })
    }

    /// Account credited with every fee.
    pub fn reward_address(&self) -> Address {
        self.reward_address
    }

    /// Fee fraction numerator.
    pub fn fee_numerator(&self) -> u128 {
        self.fee_numerator
    }

    /// Fee fraction denominator.
    pub fn fee_denominator(&self) -> u128 {
        self.fee_denominator
    }

    /// Fee charged on a transfer of `value`.
    ///
    /// Never exceeds `value`.
    pub fn fee_for(&self, value: u128) -> u128 {
        let fee = U256::new(value) * U256::new(self.fee_numerator)
            / U256::new(self.fee_denominator);
        // numerator <= denominator, so fee <= value.
        fee.as_u128()
    }
}
