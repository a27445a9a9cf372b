//! Policy parameters.
//!
//! Rates, CPI values and the deviation threshold are 18-decimal fixed-point
//! integers and are written as decimal strings so TOML can carry values past
//! `i64::MAX`.

use ethnum::U256;
use gold_types::RATE_UNIT;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::timing::RebaseTiming;
use crate::{PolicyError, Result};

/// Tunable parameters of a [`RebasePolicy`](crate::RebasePolicy).
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Fractional deviation from target below which no rebase is applied.
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_deviation_threshold")]
    pub deviation_threshold: U256,
    /// Divisor damping each indicated adjustment. At least 1.
    #[serde(default = "default_rebase_lag")]
    pub rebase_lag: u64,
    /// CPI at which the target exchange rate is 1.0.
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_base_cpi")]
    pub base_cpi: U256,
    /// Highest exchange rate the policy will act on.
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_max_rate")]
    pub max_rate: U256,
    /// Seconds between rebases.
    #[serde(default = "default_min_rebase_time_interval_sec")]
    pub min_rebase_time_interval_sec: u64,
    /// Start of the rebase window, in seconds past the interval start.
    #[serde(default)]
    pub rebase_window_offset_sec: u64,
    /// Length of the rebase window in seconds.
    #[serde(default = "default_rebase_window_length_sec")]
    pub rebase_window_length_sec: u64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            deviation_threshold: default_deviation_threshold(),
            rebase_lag: default_rebase_lag(),
            base_cpi: default_base_cpi(),
            max_rate: default_max_rate(),
            min_rebase_time_interval_sec: default_min_rebase_time_interval_sec(),
            rebase_window_offset_sec: 0,
            rebase_window_length_sec: default_rebase_window_length_sec(),
        }
    }
}

impl PolicyConfig {
    /// Check the parameters a policy cannot run with.
    ///
    /// # Errors
    ///
    /// - [`PolicyError::InvalidRebaseLag`] if `rebase_lag` is zero
    /// - [`PolicyError::InvalidBaseCpi`] if `base_cpi` is zero
    /// - [`PolicyError::InvalidMaxRate`] if `max_rate` is below one unit,
    ///   the target rate while CPI sits at `base_cpi`
    /// - [`PolicyError::InvalidTimingParameters`] if the interval is zero or
    ///   the offset is not below it
    pub fn validate(&self) -> Result<()> {
        if self.rebase_lag == 0 {
            return Err(PolicyError::InvalidRebaseLag);
        }
        if self.base_cpi == U256::ZERO {
            return Err(PolicyError::InvalidBaseCpi);
        }
        if self.max_rate < U256::new(RATE_UNIT) {
            return Err(PolicyError::InvalidMaxRate(self.max_rate));
        }
        self.timing()?;
        Ok(())
    }

    /// The timing parameters as a validated [`RebaseTiming`].
    pub fn timing(&self) -> Result<RebaseTiming> {
        RebaseTiming::new(
            self.min_rebase_time_interval_sec,
            self.rebase_window_offset_sec,
            self.rebase_window_length_sec,
        )
    }
}

// Default value functions

fn default_deviation_threshold() -> U256 {
    // 5%
    U256::new(RATE_UNIT / 20)
}

fn default_rebase_lag() -> u64 {
    10
}

fn default_base_cpi() -> U256 {
    U256::new(100 * RATE_UNIT)
}

fn default_max_rate() -> U256 {
    U256::new(1_000_000 * RATE_UNIT)
}

fn default_min_rebase_time_interval_sec() -> u64 {
    86_400
}

fn default_rebase_window_length_sec() -> u64 {
    86_399
}
