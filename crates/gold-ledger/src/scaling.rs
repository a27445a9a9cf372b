//! Fragments-per-unit ratio.
//!
//! ```text
//! total_fragments    = U256::MAX - (U256::MAX % initial_supply)
//! fragments_per_unit = total_fragments / total_supply
//! visible            = fragments / fragments_per_unit
//! ```
//!
//! `total_fragments` is fixed at initialization and is an exact multiple of
//! the initial supply, so the initial ratio is exact. With
//! `total_supply <= 2^128 - 1` the ratio stays above `2^128`, which keeps
//! `total_fragments / fragments_per_unit == total_supply` for every supply
//! the ledger can reach.

use ethnum::U256;
use gold_math::{checked, to_u128, MathError};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::Result;

/// Global scaling ratio between fragments and visible units.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingFactor {
    #[serde_as(as = "DisplayFromStr")]
    total_fragments: U256,
    #[serde_as(as = "DisplayFromStr")]
    fragments_per_unit: U256,
}

impl ScalingFactor {
    /// Fragment total for a ledger initialized with `initial_supply`.
    ///
    /// # Errors
    ///
    /// - [`MathError::DivideByZero`] if `initial_supply` is zero
    pub fn total_fragments_for(initial_supply: u128) -> Result<U256> {
        let supply = U256::new(initial_supply);
        if supply == U256::ZERO {
            return Err(MathError::DivideByZero.into());
        }
        Ok(U256::MAX - (U256::MAX % supply))
    }

    /// Ratio for `total_fragments` spread over `total_supply` visible units.
    ///
    /// # Errors
    ///
    /// - [`MathError::DivideByZero`] if `total_supply` is zero
    pub fn new(total_fragments: U256, total_supply: u128) -> Result<Self> {
        let fragments_per_unit = checked::div(total_fragments, U256::new(total_supply))?;
        Ok(Self {
            total_fragments,
            fragments_per_unit,
        })
    }

    /// Initial ratio for a fresh ledger.
    pub fn for_initial_supply(initial_supply: u128) -> Result<Self> {
        Self::new(Self::total_fragments_for(initial_supply)?, initial_supply)
    }

    /// Same fragment total, recomputed for a new visible supply.
    pub fn rescale(&self, total_supply: u128) -> Result<Self> {
        Self::new(self.total_fragments, total_supply)
    }

    /// Fixed fragment total.
    pub fn total_fragments(&self) -> U256 {
        self.total_fragments
    }

    /// Fragments per visible unit.
    pub fn fragments_per_unit(&self) -> U256 {
        self.fragments_per_unit
    }

    /// Visible units represented by `fragments`, truncating.
    pub fn to_visible(&self, fragments: U256) -> u128 {
        // Bounded by the total supply for any fragment count the ledger holds.
        to_u128(fragments / self.fragments_per_unit).unwrap_or(u128::MAX)
    }

    /// Fragments representing `visible` units.
    ///
    /// # Errors
    ///
    /// - [`MathError::Overflow`] if the product exceeds 256 bits
    pub fn to_fragments(&self, visible: u128) -> Result<U256> {
        Ok(checked::mul(U256::new(visible), self.fragments_per_unit)?)
    }

    /// Visible supply implied by the ratio.
    pub fn implied_supply(&self) -> u128 {
        self.to_visible(self.total_fragments)
    }
}
