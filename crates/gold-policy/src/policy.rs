//! The rebase policy state machine.
//!
//! A rebase passes two gates before anything is computed:
//!
//! 1. **time**: `now` is inside the window and at least one interval has
//!    passed since the last rebase
//! 2. **oracles**: both the CPI and the market oracle report valid data
//!
//! Then:
//!
//! ```text
//! target = cpi * 10^18 / base_cpi
//! rate   = min(rate, max_rate)
//! delta  = 0                                        if |rate - target| < target * threshold / 10^18
//!        = supply * (rate - target) / target / lag  otherwise
//! ```
//!
//! A positive delta is capped so that `supply + delta <= MAX_SUPPLY`; a
//! negative one so that `supply + delta >= MIN_SUPPLY`, and to zero when the
//! supply is already at or below `MIN_SUPPLY`. A zero delta is never moved.
//!
//! The ledger is rebased with `epoch + 1` and, only once it accepts, the
//! epoch and the aligned window start are committed. A failed gate or a
//! rejected ledger call leaves the policy unchanged.

use ethnum::{I256, U256};
use gold_ledger::SupplyLedger;
use gold_math::{checked, clamped_scale, mul_div, safe_to_signed};
use gold_oracle::{OracleError, OracleGateway, OracleKind};
use gold_types::{
    AccessError, Address, Event, EventLog, Ownable, MAX_SUPPLY, MIN_SUPPLY, RATE_UNIT,
};

use crate::config::PolicyConfig;
use crate::timing::RebaseTiming;
use crate::{MonetaryPolicy, PolicyError, Result};

/// Rebase policy driving a [`SupplyLedger`].
pub struct RebasePolicy<L> {
    /// Address the policy calls the ledger as.
    address: Address,
    ownable: Ownable,
    ledger: L,
    market_oracle: Option<Box<dyn OracleGateway>>,
    cpi_oracle: Option<Box<dyn OracleGateway>>,
    orchestrator: Address,
    deviation_threshold: U256,
    rebase_lag: u64,
    base_cpi: U256,
    max_rate: U256,
    timing: RebaseTiming,
    epoch: u64,
    last_rebase_timestamp_sec: u64,
    events: EventLog,
}

impl<L: SupplyLedger> RebasePolicy<L> {
    /// A policy owned by `owner`, rebasing `ledger` as `address`.
    ///
    /// Oracles and the orchestrator start unset; rebases fail until they
    /// are registered.
    ///
    /// # Errors
    ///
    /// Any failure of [`PolicyConfig::validate`].
    pub fn new(owner: Address, address: Address, ledger: L, config: &PolicyConfig) -> Result<Self> {
        config.validate()?;
        let timing = config.timing()?;
        tracing::info!(%owner, %address, rebase_lag = config.rebase_lag, "policy initialized");
        Ok(Self {
            address,
            ownable: Ownable::new(owner),
            ledger,
            market_oracle: None,
            cpi_oracle: None,
            orchestrator: Address::ZERO,
            deviation_threshold: config.deviation_threshold,
            rebase_lag: config.rebase_lag,
            base_cpi: config.base_cpi,
            max_rate: config.max_rate,
            timing,
            epoch: 0,
            last_rebase_timestamp_sec: 0,
            events: EventLog::new(),
        })
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.ownable.owner()
    }

    /// Only address allowed to call [`rebase`](Self::rebase), `ZERO` when unset.
    pub fn orchestrator(&self) -> Address {
        self.orchestrator
    }

    /// Number of completed rebases.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Window start recorded by the last rebase.
    pub fn last_rebase_timestamp_sec(&self) -> u64 {
        self.last_rebase_timestamp_sec
    }

    pub fn deviation_threshold(&self) -> U256 {
        self.deviation_threshold
    }

    pub fn rebase_lag(&self) -> u64 {
        self.rebase_lag
    }

    pub fn base_cpi(&self) -> U256 {
        self.base_cpi
    }

    pub fn max_rate(&self) -> U256 {
        self.max_rate
    }

    pub fn min_rebase_time_interval_sec(&self) -> u64 {
        self.timing.min_rebase_time_interval_sec()
    }

    pub fn rebase_window_offset_sec(&self) -> u64 {
        self.timing.rebase_window_offset_sec()
    }

    pub fn rebase_window_length_sec(&self) -> u64 {
        self.timing.rebase_window_length_sec()
    }

    pub fn has_market_oracle(&self) -> bool {
        self.market_oracle.is_some()
    }

    pub fn has_cpi_oracle(&self) -> bool {
        self.cpi_oracle.is_some()
    }

    /// Whether `now` falls inside a rebase window.
    pub fn in_rebase_window(&self, now: u64) -> bool {
        self.timing.in_window(now)
    }

    /// The driven ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable access to the driven ledger, for operations that do not go
    /// through the policy (transfers, owner setters).
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take()
    }

    // ---------------------------------------------------------------------
    // Owner-gated setters
    // ---------------------------------------------------------------------

    pub fn set_market_oracle(
        &mut self,
        caller: &Address,
        oracle: Box<dyn OracleGateway>,
    ) -> Result<()> {
        self.ownable.only_owner(caller)?;
        self.market_oracle = Some(oracle);
        tracing::info!("market oracle updated");
        Ok(())
    }

    pub fn set_cpi_oracle(&mut self, caller: &Address, oracle: Box<dyn OracleGateway>) -> Result<()> {
        self.ownable.only_owner(caller)?;
        self.cpi_oracle = Some(oracle);
        tracing::info!("cpi oracle updated");
        Ok(())
    }

    pub fn set_orchestrator(&mut self, caller: &Address, orchestrator: Address) -> Result<()> {
        self.ownable.only_owner(caller)?;
        self.orchestrator = orchestrator;
        tracing::info!(%orchestrator, "orchestrator updated");
        Ok(())
    }

    /// Set the fractional deviation threshold, 18-decimal fixed point.
    pub fn set_deviation_threshold(&mut self, caller: &Address, threshold: U256) -> Result<()> {
        self.ownable.only_owner(caller)?;
        self.deviation_threshold = threshold;
        tracing::info!(%threshold, "deviation threshold updated");
        Ok(())
    }

    /// # Errors
    ///
    /// - [`PolicyError::InvalidRebaseLag`] if `rebase_lag` is zero
    pub fn set_rebase_lag(&mut self, caller: &Address, rebase_lag: u64) -> Result<()> {
        self.ownable.only_owner(caller)?;
        if rebase_lag == 0 {
            return Err(PolicyError::InvalidRebaseLag);
        }
        self.rebase_lag = rebase_lag;
        tracing::info!(rebase_lag, "rebase lag updated");
        Ok(())
    }

    /// # Errors
    ///
    /// - [`PolicyError::InvalidTimingParameters`] if the interval is zero or
    ///   the offset is not below it
    pub fn set_rebase_timing_parameters(
        &mut self,
        caller: &Address,
        min_rebase_time_interval_sec: u64,
        rebase_window_offset_sec: u64,
        rebase_window_length_sec: u64,
    ) -> Result<()> {
        self.ownable.only_owner(caller)?;
        self.timing = RebaseTiming::new(
            min_rebase_time_interval_sec,
            rebase_window_offset_sec,
            rebase_window_length_sec,
        )?;
        tracing::info!(
            min_rebase_time_interval_sec,
            rebase_window_offset_sec,
            rebase_window_length_sec,
            "rebase timing updated"
        );
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<()> {
        let event = self.ownable.transfer_ownership(caller, new_owner)?;
        self.events.emit(event);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Rebase
    // ---------------------------------------------------------------------

    /// Run one rebase at `now` and return the new total supply.
    ///
    /// # Errors
    ///
    /// - [`AccessError::NotRole`] if `caller` is not the orchestrator
    /// - [`PolicyError::NotInWindow`] / [`PolicyError::TooSoon`] on the time gate
    /// - [`PolicyError::Oracle`] if an oracle is missing or reports invalid data
    /// - [`PolicyError::Ledger`] if the ledger rejects the rebase
    pub fn rebase(&mut self, caller: &Address, now: u64) -> Result<u128> {
        if self.orchestrator.is_zero() || caller != &self.orchestrator {
            return Err(AccessError::NotRole {
                caller: *caller,
                role: "orchestrator",
            }
            .into());
        }

        let window_start = self.timing.check(now, self.last_rebase_timestamp_sec)?;

        let cpi = Self::query(self.cpi_oracle.as_deref(), OracleKind::Cpi)?;
        let target_rate = mul_div(cpi, U256::new(RATE_UNIT), self.base_cpi)?;
        let raw_rate = Self::query(self.market_oracle.as_deref(), OracleKind::Market)?;
        let exchange_rate = clamped_scale(raw_rate, self.max_rate);

        let supply = self.ledger.total_supply();
        let raw_delta = self.compute_supply_delta(supply, exchange_rate, target_rate)?;
        let supply_delta = clamp_supply_delta(supply, raw_delta);

        tracing::debug!(
            %cpi,
            %target_rate,
            %raw_rate,
            %exchange_rate,
            %raw_delta,
            %supply_delta,
            "rebase computed"
        );

        let epoch = self.epoch + 1;
        let new_supply = self.ledger.rebase(&self.address, epoch, supply_delta)?;

        self.epoch = epoch;
        self.last_rebase_timestamp_sec = window_start;
        self.events.emit(Event::LogPolicyRebase {
            epoch,
            exchange_rate,
            cpi,
            requested_supply_adjustment: supply_delta,
            new_total_supply: new_supply,
            timestamp_sec: now,
        });

        tracing::info!(
            epoch,
            %supply_delta,
            total_supply = new_supply,
            last_rebase_timestamp_sec = window_start,
            "policy rebase"
        );

        Ok(new_supply)
    }

    fn query(oracle: Option<&dyn OracleGateway>, kind: OracleKind) -> Result<U256> {
        let oracle = oracle.ok_or(OracleError::NotConfigured(kind))?;
        Ok(oracle.get_data().require_valid(kind)?)
    }

    /// Whether `rate` is within the deviation threshold of `target_rate`.
    fn within_deviation_threshold(&self, rate: U256, target_rate: U256) -> Result<bool> {
        let absolute_threshold =
            mul_div(target_rate, self.deviation_threshold, U256::new(RATE_UNIT))?;
        let deviation = if rate >= target_rate {
            rate - target_rate
        } else {
            target_rate - rate
        };
        Ok(deviation < absolute_threshold)
    }

    /// Lagged supply adjustment for `rate` against `target_rate`, before
    /// clamping to the supply bounds.
    fn compute_supply_delta(&self, supply: u128, rate: U256, target_rate: U256) -> Result<I256> {
        if self.within_deviation_threshold(rate, target_rate)? {
            return Ok(I256::ZERO);
        }
        let target_signed = safe_to_signed(target_rate)?;
        let deviation = checked::signed_sub(safe_to_signed(rate)?, target_signed)?;
        let scaled = checked::signed_mul(U256::new(supply).as_i256(), deviation)?;
        let delta = checked::signed_div(scaled, target_signed)?;
        Ok(checked::signed_div(delta, I256::new(i128::from(self.rebase_lag)))?)
    }
}

/// Limit `delta` in its own direction: expansion stops at `MAX_SUPPLY`,
/// contraction at `MIN_SUPPLY`.
fn clamp_supply_delta(supply: u128, delta: I256) -> I256 {
    let supply_signed = U256::new(supply).as_i256();
    let prospective = supply_signed.saturating_add(delta);
    if delta > I256::ZERO {
        let max = U256::new(MAX_SUPPLY).as_i256();
        if prospective > max {
            return max - supply_signed;
        }
    } else if delta < I256::ZERO {
        if supply <= MIN_SUPPLY {
            return I256::ZERO;
        }
        let min = U256::new(MIN_SUPPLY).as_i256();
        if prospective < min {
            return min - supply_signed;
        }
    }
    delta
}

impl<L: SupplyLedger> MonetaryPolicy for RebasePolicy<L> {
    fn rebase(&mut self, caller: &Address, now: u64) -> Result<u128> {
        RebasePolicy::rebase(self, caller, now)
    }
}
