//! The elastic-supply ledger.
//!
//! Balances are stored as fragments. The visible supply changes only through
//! [`ElasticLedger::rebase`], called by the registered monetary policy, which
//! clamps the new supply to `[MIN_SUPPLY, MAX_SUPPLY]` and recomputes the
//! scaling factor. Transfers and allowances work in visible units and are
//! converted to fragments at the current ratio.
//!
//! ## Pause flags
//!
//! - `rebase_paused` blocks [`rebase`](ElasticLedger::rebase) only
//! - `token_paused` blocks transfers and allowance changes, not rebases
//!
//! Read paths (`total_supply`, `balance_of`, `allowance`) are always open.
//!
//! Every fallible operation validates before it mutates, so a rejected call
//! leaves the ledger untouched.

use std::collections::HashMap;

use ethnum::{I256, U256};
use gold_math::clamp_supply;
use gold_types::{
    AccessError, Address, Event, EventLog, Ownable, DECIMALS, MAX_SUPPLY, MIN_SUPPLY, NAME,
    SYMBOL,
};

use crate::fee::RewardParams;
use crate::scaling::ScalingFactor;
use crate::{LedgerError, Result};

/// Token ledger with fragment balances and a global scaling factor.
#[derive(Debug, Clone)]
pub struct ElasticLedger {
    /// The ledger's own address. Never a valid transfer recipient.
    address: Address,
    ownable: Ownable,
    monetary_policy: Address,
    rebase_paused: bool,
    token_paused: bool,
    total_supply: u128,
    scaling: ScalingFactor,
    fragment_balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), u128>,
    reward: Option<RewardParams>,
    events: EventLog,
}

impl ElasticLedger {
    /// Initialize the ledger and credit the full supply to `owner`.
    ///
    /// The fragment total is fixed here and never changes afterwards. A
    /// ledger is initialized exactly once, by construction.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidSupply`] if `initial_supply` is outside
    ///   `[MIN_SUPPLY, MAX_SUPPLY]`
    pub fn initialize(owner: Address, address: Address, initial_supply: u128) -> Result<Self> {
        if initial_supply < MIN_SUPPLY {
            return Err(LedgerError::InvalidSupply(initial_supply));
        }
        let scaling = ScalingFactor::for_initial_supply(initial_supply)?;

        let mut fragment_balances = HashMap::new();
        fragment_balances.insert(owner, scaling.total_fragments());

        let mut events = EventLog::new();
        events.emit(Event::Transfer {
            from: Address::ZERO,
            to: owner,
            value: initial_supply,
        });

        tracing::info!(%owner, %address, initial_supply, "ledger initialized");

        Ok(Self {
            address,
            ownable: Ownable::new(owner),
            monetary_policy: Address::ZERO,
            rebase_paused: false,
            token_paused: false,
            total_supply: initial_supply,
            scaling,
            fragment_balances,
            allowances: HashMap::new(),
            reward: None,
            events,
        })
    }

    // ---------------------------------------------------------------------
    // Read paths
    // ---------------------------------------------------------------------

    /// Token name.
    pub fn name(&self) -> &'static str {
        NAME
    }

    /// Token symbol.
    pub fn symbol(&self) -> &'static str {
        SYMBOL
    }

    /// Visible-unit decimals.
    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    /// The ledger's own address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.ownable.owner()
    }

    /// Registered monetary policy, `ZERO` when unset.
    pub fn monetary_policy(&self) -> Address {
        self.monetary_policy
    }

    /// Visible total supply.
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Current scaling ratio.
    pub fn scaling_factor(&self) -> &ScalingFactor {
        &self.scaling
    }

    /// Visible balance of `account`.
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.scaling.to_visible(self.fragment_balance_of(account))
    }

    /// Fragment balance of `account`.
    pub fn fragment_balance_of(&self, account: &Address) -> U256 {
        self.fragment_balances
            .get(account)
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Remaining allowance of `spender` over `owner`'s balance.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// Current fee configuration, if any.
    pub fn reward_params(&self) -> Option<&RewardParams> {
        self.reward.as_ref()
    }

    /// Whether rebases are paused.
    pub fn is_rebase_paused(&self) -> bool {
        self.rebase_paused
    }

    /// Whether transfers and allowance changes are paused.
    pub fn is_token_paused(&self) -> bool {
        self.token_paused
    }

    /// Records emitted since the last drain.
    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    /// Drain emitted records.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take()
    }

    // ---------------------------------------------------------------------
    // Owner-gated setters
    // ---------------------------------------------------------------------

    /// Register the only address allowed to call [`rebase`](Self::rebase).
    pub fn set_monetary_policy(&mut self, caller: &Address, monetary_policy: Address) -> Result<()> {
        self.ownable.only_owner(caller)?;
        self.monetary_policy = monetary_policy;
        self.events
            .emit(Event::LogMonetaryPolicyUpdated { monetary_policy });
        tracing::info!(%monetary_policy, "monetary policy updated");
        Ok(())
    }

    /// Configure the transfer fee and its reward address.
    ///
    /// A zero numerator disables the fee. The reward address may be neither
    /// zero nor the ledger itself.
    pub fn set_reward_params(
        &mut self,
        caller: &Address,
        reward_address: Address,
        fee_numerator: u128,
        fee_denominator: u128,
    ) -> Result<()> {
        self.ownable.only_owner(caller)?;
        self.ensure_valid_recipient(&reward_address)?;
        let params = RewardParams::new(reward_address, fee_numerator, fee_denominator)?;
        self.reward = Some(params);
        tracing::info!(
            %reward_address,
            fee_numerator,
            fee_denominator,
            "reward params updated"
        );
        Ok(())
    }

    /// Pause or resume rebases.
    pub fn set_rebase_paused(&mut self, caller: &Address, paused: bool) -> Result<()> {
        self.ownable.only_owner(caller)?;
        self.rebase_paused = paused;
        self.events.emit(Event::LogRebasePaused { paused });
        tracing::info!(paused, "rebase pause changed");
        Ok(())
    }

    /// Pause or resume transfers and allowance changes.
    pub fn set_token_paused(&mut self, caller: &Address, paused: bool) -> Result<()> {
        self.ownable.only_owner(caller)?;
        self.token_paused = paused;
        self.events.emit(Event::LogTokenPaused { paused });
        tracing::info!(paused, "token pause changed");
        Ok(())
    }

    /// Hand ownership to `new_owner`.
    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<()> {
        let event = self.ownable.transfer_ownership(caller, new_owner)?;
        self.events.emit(event);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Supply
    // ---------------------------------------------------------------------

    /// Adjust the visible supply by `supply_delta`.
    ///
    /// The new supply is clamped to `[MIN_SUPPLY, MAX_SUPPLY]` and the
    /// scaling factor is recomputed from the fixed fragment total. A zero
    /// delta leaves the supply unchanged but still emits `LogRebase`.
    ///
    /// # Errors
    ///
    /// - [`AccessError::NotRole`] if `caller` is not the monetary policy
    /// - [`LedgerError::RebasePaused`] if rebases are paused
    pub fn rebase(&mut self, caller: &Address, epoch: u64, supply_delta: I256) -> Result<u128> {
        if self.monetary_policy.is_zero() || caller != &self.monetary_policy {
            return Err(AccessError::NotRole {
                caller: *caller,
                role: "monetary policy",
            }
            .into());
        }
        if self.rebase_paused {
            return Err(LedgerError::RebasePaused);
        }

        if supply_delta == I256::ZERO {
            self.events.emit(Event::LogRebase {
                epoch,
                total_supply: self.total_supply,
            });
            tracing::info!(epoch, total_supply = self.total_supply, "rebase: no change");
            return Ok(self.total_supply);
        }

        let prospective = U256::new(self.total_supply)
            .as_i256()
            .saturating_add(supply_delta);
        let new_supply = if prospective < I256::ZERO {
            MIN_SUPPLY
        } else {
            clamp_supply(prospective.as_u256(), MIN_SUPPLY, MAX_SUPPLY)
        };
        let scaling = self.scaling.rescale(new_supply)?;

        let previous = self.total_supply;
        self.total_supply = new_supply;
        self.scaling = scaling;
        self.events.emit(Event::LogRebase {
            epoch,
            total_supply: new_supply,
        });

        tracing::info!(
            epoch,
            %supply_delta,
            previous,
            total_supply = new_supply,
            "rebase applied"
        );

        Ok(new_supply)
    }

    // ---------------------------------------------------------------------
    // Transfers and allowances
    // ---------------------------------------------------------------------

    /// Move `value` visible units from `caller` to `to`.
    ///
    /// When a fee is configured the sender is debited the full `value`, the
    /// recipient receives `value - fee` and the reward address the fee.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::TokenPaused`] if token operations are paused
    /// - [`LedgerError::InvalidRecipient`] if `to` is zero or the ledger itself
    /// - [`LedgerError::InsufficientBalance`] if the sender holds too little
    pub fn transfer(&mut self, caller: &Address, to: Address, value: u128) -> Result<()> {
        self.ensure_token_active()?;
        self.ensure_valid_recipient(&to)?;
        self.move_value(*caller, to, value)
    }

    /// Move `value` from `from` to `to`, spending `caller`'s allowance.
    ///
    /// # Errors
    ///
    /// As [`transfer`](Self::transfer), plus
    /// [`LedgerError::InsufficientAllowance`] if the allowance is too small.
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: Address,
        to: Address,
        value: u128,
    ) -> Result<()> {
        self.ensure_token_active()?;
        self.ensure_valid_recipient(&to)?;

        let allowed = self.allowance(&from, caller);
        if allowed < value {
            return Err(LedgerError::InsufficientAllowance {
                available: allowed,
                required: value,
            });
        }

        self.move_value(from, to, value)?;
        self.allowances.insert((from, *caller), allowed - value);
        Ok(())
    }

    /// Set `spender`'s allowance over `caller`'s balance to `value`.
    ///
    /// Approving the zero address is permitted.
    pub fn approve(&mut self, caller: &Address, spender: Address, value: u128) -> Result<()> {
        self.ensure_token_active()?;
        self.set_allowance(*caller, spender, value);
        Ok(())
    }

    /// Raise `spender`'s allowance by `added_value`.
    ///
    /// # Errors
    ///
    /// - [`MathError::Overflow`](gold_math::MathError::Overflow) if the
    ///   allowance would exceed `u128::MAX`
    pub fn increase_allowance(
        &mut self,
        caller: &Address,
        spender: Address,
        added_value: u128,
    ) -> Result<()> {
        self.ensure_token_active()?;
        let value = self
            .allowance(caller, &spender)
            .checked_add(added_value)
            .ok_or(gold_math::MathError::Overflow)?;
        self.set_allowance(*caller, spender, value);
        Ok(())
    }

    /// Lower `spender`'s allowance by `subtracted_value`, flooring at zero.
    pub fn decrease_allowance(
        &mut self,
        caller: &Address,
        spender: Address,
        subtracted_value: u128,
    ) -> Result<()> {
        self.ensure_token_active()?;
        let value = self
            .allowance(caller, &spender)
            .saturating_sub(subtracted_value);
        self.set_allowance(*caller, spender, value);
        Ok(())
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, value: u128) {
        self.allowances.insert((owner, spender), value);
        self.events.emit(Event::Approval {
            owner,
            spender,
            value,
        });
    }

    fn ensure_token_active(&self) -> Result<()> {
        if self.token_paused {
            return Err(LedgerError::TokenPaused);
        }
        Ok(())
    }

    fn ensure_valid_recipient(&self, to: &Address) -> Result<()> {
        if to.is_zero() || to == &self.address {
            return Err(LedgerError::InvalidRecipient(*to));
        }
        Ok(())
    }

    /// Debit `from`, credit `to` net of fee and the reward address with the fee.
    fn move_value(&mut self, from: Address, to: Address, value: u128) -> Result<()> {
        // value <= floor(fragments / fpu) iff value * fpu <= fragments, and
        // comparing in visible units first keeps the conversion in range.
        let available = self.balance_of(&from);
        if value > available {
            return Err(LedgerError::InsufficientBalance {
                available,
                required: value,
            });
        }
        let fragment_value = self.scaling.to_fragments(value)?;
        let from_fragments = self.fragment_balance_of(&from);

        let (fee, reward_address) = match &self.reward {
            Some(params) => (params.fee_for(value), params.reward_address()),
            None => (0, Address::ZERO),
        };
        let fee_fragments = self.scaling.to_fragments(fee)?;
        // fee <= value, so this cannot underflow.
        let net_fragments = fragment_value - fee_fragments;

        // Debit before crediting so self-transfers net out.
        self.fragment_balances
            .insert(from, from_fragments - fragment_value);
        self.credit(to, net_fragments);
        self.events.emit(Event::Transfer {
            from,
            to,
            value: value - fee,
        });

        if fee > 0 {
            self.credit(reward_address, fee_fragments);
            self.events.emit(Event::Transfer {
                from,
                to: reward_address,
                value: fee,
            });
        }

        tracing::debug!(%from, %to, value, fee, "transfer");
        Ok(())
    }

    fn credit(&mut self, account: Address, fragments: U256) {
        // Bounded by the fixed fragment total, which fits in U256.
        let balance = self.fragment_balances.entry(account).or_insert(U256::ZERO);
        *balance = balance.saturating_add(fragments);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gold_types::{ErrorKind, INITIAL_SUPPLY, UNIT};

    const DEPLOYER: Address = Address::repeat_byte(0x01);
    const POLICY: Address = Address::repeat_byte(0x02);
    const A: Address = Address::repeat_byte(0x0a);
    const B: Address = Address::repeat_byte(0x0b);
    const C: Address = Address::repeat_byte(0x0c);
    const REWARD: Address = Address::repeat_byte(0x05);
    const LEDGER: Address = Address::repeat_byte(0xee);

    fn setup() -> ElasticLedger {
        let mut ledger =
            ElasticLedger::initialize(DEPLOYER, LEDGER, INITIAL_SUPPLY).expect("initialize");
        ledger
            .set_monetary_policy(&DEPLOYER, POLICY)
            .expect("set policy");
        ledger.take_events();
        ledger
    }

    fn setup_with_fee() -> ElasticLedger {
        let mut ledger = setup();
        ledger
            .set_reward_params(&DEPLOYER, REWARD, 1, 10)
            .expect("reward params");
        ledger
    }

    #[test]
    fn test_initialize_credits_owner() {
        let mut ledger =
            ElasticLedger::initialize(DEPLOYER, LEDGER, INITIAL_SUPPLY).expect("initialize");
        assert_eq!(ledger.balance_of(&DEPLOYER), INITIAL_SUPPLY);
        assert_eq!(ledger.total_supply(), INITIAL_SUPPLY);
        assert_eq!(ledger.owner(), DEPLOYER);
        assert_eq!(ledger.name(), "USDGOLD");
        assert_eq!(ledger.symbol(), "USDGOLD");
        assert_eq!(ledger.decimals(), 9);
        assert_eq!(
            ledger.take_events(),
            vec![Event::Transfer {
                from: Address::ZERO,
                to: DEPLOYER,
                value: INITIAL_SUPPLY,
            }]
        );
    }

    #[test]
    fn test_initialize_rejects_tiny_supply() {
        let err = ElasticLedger::initialize(DEPLOYER, LEDGER, MIN_SUPPLY - 1)
            .expect_err("below floor");
        assert!(matches!(err, LedgerError::InvalidSupply(_)));
    }

    #[test]
    fn test_set_monetary_policy_emits() {
        let mut ledger = setup();
        ledger
            .set_monetary_policy(&DEPLOYER, A)
            .expect("owner may set");
        assert_eq!(ledger.monetary_policy(), A);
        assert_eq!(
            ledger.take_events(),
            vec![Event::LogMonetaryPolicyUpdated { monetary_policy: A }]
        );
    }

    #[test]
    fn test_owner_setters_reject_non_owner() {
        let mut ledger = setup();
        let errors = [
            ledger.set_monetary_policy(&A, A).expect_err("policy"),
            ledger
                .set_reward_params(&A, REWARD, 1, 10)
                .expect_err("reward"),
            ledger.set_rebase_paused(&A, true).expect_err("rebase pause"),
            ledger.set_token_paused(&A, true).expect_err("token pause"),
            ledger.transfer_ownership(&A, A).expect_err("ownership"),
        ];
        for err in errors {
            assert_eq!(err.kind(), ErrorKind::Unauthorized);
        }
        assert_eq!(ledger.monetary_policy(), POLICY);
        assert!(!ledger.is_rebase_paused());
        assert!(!ledger.is_token_paused());
    }

    #[test]
    fn test_rebase_only_by_policy() {
        let mut ledger = setup();
        let err = ledger
            .rebase(&DEPLOYER, 1, I256::new(10))
            .expect_err("owner is not policy");
        assert!(matches!(
            err,
            LedgerError::Access(AccessError::NotRole { .. })
        ));
        ledger
            .rebase(&POLICY, 1, I256::new(10))
            .expect("policy may rebase");
    }

    #[test]
    fn test_rebase_expansion() {
        let mut ledger = setup();
        ledger.transfer(&DEPLOYER, A, 10 * UNIT).expect("to A");
        ledger.transfer(&DEPLOYER, B, 20 * UNIT).expect("to B");
        ledger.take_events();

        let delta = INITIAL_SUPPLY / 10;
        let supply = ledger
            .rebase(&POLICY, 1, I256::new(delta as i128))
            .expect("rebase");
        assert_eq!(supply, INITIAL_SUPPLY + delta);
        assert_eq!(ledger.total_supply(), INITIAL_SUPPLY + delta);
        assert!(ledger.balance_of(&A) > 10 * UNIT);
        assert!(ledger.balance_of(&B) > 20 * UNIT);
        assert_eq!(ledger.balance_of(&A), 11 * UNIT);
        assert_eq!(
            ledger.take_events(),
            vec![Event::LogRebase {
                epoch: 1,
                total_supply: INITIAL_SUPPLY + delta,
            }]
        );
    }

    #[test]
    fn test_rebase_contraction() {
        let mut ledger = setup();
        ledger.transfer(&DEPLOYER, A, 10 * UNIT).expect("to A");
        let delta = INITIAL_SUPPLY / 10;
        let supply = ledger
            .rebase(&POLICY, 1, I256::new(-(delta as i128)))
            .expect("rebase");
        assert_eq!(supply, INITIAL_SUPPLY - delta);
        assert!(ledger.balance_of(&A) < 10 * UNIT);
        assert_eq!(ledger.balance_of(&A), 9 * UNIT);
    }

    #[test]
    fn test_rebase_zero_delta_emits_unchanged_supply() {
        let mut ledger = setup();
        ledger.transfer(&DEPLOYER, A, 750 * UNIT).expect("to A");
        let scaling_before = *ledger.scaling_factor();
        ledger.take_events();

        let supply = ledger.rebase(&POLICY, 1, I256::ZERO).expect("rebase");
        assert_eq!(supply, INITIAL_SUPPLY);
        assert_eq!(ledger.balance_of(&A), 750 * UNIT);
        assert_eq!(ledger.scaling_factor(), &scaling_before);
        assert_eq!(
            ledger.take_events(),
            vec![Event::LogRebase {
                epoch: 1,
                total_supply: INITIAL_SUPPLY,
            }]
        );
    }

    #[test]
    fn test_rebase_clamps_at_max_supply() {
        let mut ledger = setup();
        let to_near_max = MAX_SUPPLY - INITIAL_SUPPLY - UNIT;
        ledger
            .rebase(&POLICY, 1, U256::new(to_near_max).as_i256())
            .expect("grow");
        let supply = ledger
            .rebase(&POLICY, 2, I256::new(2 * UNIT as i128))
            .expect("overshoot");
        assert_eq!(supply, MAX_SUPPLY);

        let supply = ledger
            .rebase(&POLICY, 3, I256::new(2 * UNIT as i128))
            .expect("at max");
        assert_eq!(supply, MAX_SUPPLY);
        assert_eq!(
            ledger.events().last(),
            Some(&Event::LogRebase {
                epoch: 3,
                total_supply: MAX_SUPPLY,
            })
        );
    }

    #[test]
    fn test_rebase_clamps_at_min_supply() {
        let mut ledger = setup();
        let supply = ledger
            .rebase(&POLICY, 1, I256::MIN)
            .expect("huge contraction");
        assert_eq!(supply, MIN_SUPPLY);
        assert_eq!(ledger.balance_of(&DEPLOYER), MIN_SUPPLY);
    }

    #[test]
    fn test_rebase_paused() {
        let mut ledger = setup();
        ledger.set_rebase_paused(&DEPLOYER, true).expect("pause");
        assert_eq!(
            ledger.take_events(),
            vec![Event::LogRebasePaused { paused: true }]
        );

        let err = ledger
            .rebase(&POLICY, 1, I256::new(500))
            .expect_err("paused");
        assert_eq!(err, LedgerError::RebasePaused);
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert!(ledger.events().is_empty());

        // Token paths stay open.
        ledger.transfer(&DEPLOYER, A, 10 * UNIT).expect("transfer");
        ledger.approve(&DEPLOYER, A, 10 * UNIT).expect("approve");
        ledger
            .transfer_from(&A, DEPLOYER, B, 10 * UNIT)
            .expect("transfer_from");
        ledger
            .increase_allowance(&DEPLOYER, A, 10 * UNIT)
            .expect("increase");
        ledger
            .decrease_allowance(&DEPLOYER, A, 10)
            .expect("decrease");
        assert_eq!(ledger.allowance(&DEPLOYER, &A), 10 * UNIT - 10);
    }

    #[test]
    fn test_token_paused() {
        let mut ledger = setup();
        ledger.set_token_paused(&DEPLOYER, true).expect("pause");
        assert_eq!(
            ledger.take_events(),
            vec![Event::LogTokenPaused { paused: true }]
        );

        ledger
            .rebase(&POLICY, 1, I256::new(500 * UNIT as i128))
            .expect("rebase still allowed");

        assert_eq!(
            ledger.transfer(&DEPLOYER, A, UNIT),
            Err(LedgerError::TokenPaused)
        );
        assert_eq!(
            ledger.approve(&DEPLOYER, A, UNIT),
            Err(LedgerError::TokenPaused)
        );
        assert_eq!(
            ledger.transfer_from(&A, DEPLOYER, B, UNIT),
            Err(LedgerError::TokenPaused)
        );
        assert_eq!(
            ledger.increase_allowance(&DEPLOYER, A, UNIT),
            Err(LedgerError::TokenPaused)
        );
        assert_eq!(
            ledger.decrease_allowance(&DEPLOYER, A, UNIT),
            Err(LedgerError::TokenPaused)
        );

        // Reads remain available.
        assert_eq!(ledger.allowance(&DEPLOYER, &A), 0);
        assert_eq!(ledger.total_supply(), INITIAL_SUPPLY + 500 * UNIT);
        assert_eq!(ledger.balance_of(&DEPLOYER), INITIAL_SUPPLY + 500 * UNIT);
    }

    #[test]
    fn test_transfer_with_fee() {
        let mut ledger = setup_with_fee();

        let before = ledger.balance_of(&DEPLOYER);
        ledger.transfer(&DEPLOYER, A, 12 * UNIT).expect("transfer");
        assert_eq!(ledger.balance_of(&DEPLOYER), before - 12 * UNIT);
        assert_eq!(ledger.balance_of(&A), 10_800_000_000);
        assert_eq!(ledger.balance_of(&REWARD), 1_200_000_000);

        let before = ledger.balance_of(&DEPLOYER);
        ledger.transfer(&DEPLOYER, B, 15 * UNIT).expect("transfer");
        assert_eq!(ledger.balance_of(&DEPLOYER), before - 15 * UNIT);
        assert_eq!(ledger.balance_of(&B), 13_500_000_000);

        let rest = ledger.balance_of(&DEPLOYER);
        ledger.transfer(&DEPLOYER, C, rest).expect("transfer rest");
        assert_eq!(ledger.balance_of(&DEPLOYER), 0);
        assert_eq!(ledger.balance_of(&C), rest - rest / 10);
    }

    #[test]
    fn test_transfer_fee_events() {
        let mut ledger = setup_with_fee();
        ledger.transfer(&DEPLOYER, A, 12 * UNIT).expect("transfer");
        assert_eq!(
            ledger.take_events(),
            vec![
                Event::Transfer {
                    from: DEPLOYER,
                    to: A,
                    value: 10_800_000_000,
                },
                Event::Transfer {
                    from: DEPLOYER,
                    to: REWARD,
                    value: 1_200_000_000,
                },
            ]
        );
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let mut ledger = setup();
        ledger.transfer(&DEPLOYER, A, 5 * UNIT).expect("fund A");
        let err = ledger.transfer(&A, B, 6 * UNIT).expect_err("too much");
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                available: 5 * UNIT,
                required: 6 * UNIT,
            }
        );
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert_eq!(ledger.balance_of(&A), 5 * UNIT);
        assert_eq!(ledger.balance_of(&B), 0);
    }

    #[test]
    fn test_transfer_above_total_supply_is_insufficient_balance() {
        let mut ledger = setup();
        let err = ledger
            .transfer(&DEPLOYER, A, INITIAL_SUPPLY * 2)
            .expect_err("more than exists");
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                available: INITIAL_SUPPLY,
                required: INITIAL_SUPPLY * 2,
            }
        );
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);

        ledger.approve(&DEPLOYER, A, u128::MAX).expect("approve");
        let err = ledger
            .transfer_from(&A, DEPLOYER, B, u128::MAX)
            .expect_err("u128::MAX");
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(ledger.allowance(&DEPLOYER, &A), u128::MAX);
        assert_eq!(ledger.balance_of(&DEPLOYER), INITIAL_SUPPLY);
    }

    #[test]
    fn test_reward_address_must_be_a_valid_recipient() {
        let mut ledger = setup();
        assert_eq!(
            ledger.set_reward_params(&DEPLOYER, LEDGER, 1, 10),
            Err(LedgerError::InvalidRecipient(LEDGER))
        );
        assert_eq!(
            ledger.set_reward_params(&DEPLOYER, Address::ZERO, 1, 10),
            Err(LedgerError::InvalidRecipient(Address::ZERO))
        );
        assert!(ledger.reward_params().is_none());
    }

    #[test]
    fn test_transfer_to_ledger_rejected() {
        let mut ledger = setup();
        ledger.transfer(&DEPLOYER, A, 5 * UNIT).expect("fund A");
        let err = ledger.transfer(&A, LEDGER, UNIT).expect_err("ledger");
        assert_eq!(err, LedgerError::InvalidRecipient(LEDGER));
        assert_eq!(err.kind(), ErrorKind::InvalidRecipient);

        ledger.approve(&A, A, UNIT).expect("approve self");
        assert_eq!(
            ledger.transfer_from(&A, A, LEDGER, UNIT),
            Err(LedgerError::InvalidRecipient(LEDGER))
        );
    }

    #[test]
    fn test_approve_zero_spender_allowed_but_zero_recipient_rejected() {
        let mut ledger = setup();
        ledger.transfer(&DEPLOYER, A, 10 * UNIT).expect("fund A");
        ledger.take_events();

        ledger
            .approve(&A, Address::ZERO, 10 * UNIT)
            .expect("approve zero");
        assert_eq!(
            ledger.take_events(),
            vec![Event::Approval {
                owner: A,
                spender: Address::ZERO,
                value: 10 * UNIT,
            }]
        );

        ledger.approve(&A, C, 10 * UNIT).expect("approve C");
        assert_eq!(
            ledger.transfer_from(&C, A, Address::ZERO, 10 * UNIT),
            Err(LedgerError::InvalidRecipient(Address::ZERO))
        );
        assert_eq!(
            ledger.transfer(&A, Address::ZERO, UNIT),
            Err(LedgerError::InvalidRecipient(Address::ZERO))
        );
    }

    #[test]
    fn test_transfer_from_spends_allowance() {
        let mut ledger = setup();
        ledger.approve(&DEPLOYER, A, 10 * UNIT).expect("approve");
        ledger
            .transfer_from(&A, DEPLOYER, B, 4 * UNIT)
            .expect("transfer_from");
        assert_eq!(ledger.allowance(&DEPLOYER, &A), 6 * UNIT);
        assert_eq!(ledger.balance_of(&B), 4 * UNIT);

        let err = ledger
            .transfer_from(&A, DEPLOYER, B, 7 * UNIT)
            .expect_err("over allowance");
        assert_eq!(
            err,
            LedgerError::InsufficientAllowance {
                available: 6 * UNIT,
                required: 7 * UNIT,
            }
        );
        assert_eq!(ledger.allowance(&DEPLOYER, &A), 6 * UNIT);
    }

    #[test]
    fn test_transfer_from_insufficient_balance_keeps_allowance() {
        let mut ledger = setup();
        ledger.transfer(&DEPLOYER, A, UNIT).expect("fund A");
        ledger.approve(&A, B, 10 * UNIT).expect("approve");
        assert!(ledger.transfer_from(&B, A, C, 2 * UNIT).is_err());
        assert_eq!(ledger.allowance(&A, &B), 10 * UNIT);
        assert_eq!(ledger.balance_of(&A), UNIT);
    }

    #[test]
    fn test_allowance_adjustments() {
        let mut ledger = setup();
        ledger
            .increase_allowance(&DEPLOYER, A, 5 * UNIT)
            .expect("increase");
        ledger
            .increase_allowance(&DEPLOYER, A, 5 * UNIT)
            .expect("increase");
        assert_eq!(ledger.allowance(&DEPLOYER, &A), 10 * UNIT);

        ledger
            .decrease_allowance(&DEPLOYER, A, 3 * UNIT)
            .expect("decrease");
        assert_eq!(ledger.allowance(&DEPLOYER, &A), 7 * UNIT);

        ledger
            .decrease_allowance(&DEPLOYER, A, 100 * UNIT)
            .expect("decrease past zero");
        assert_eq!(ledger.allowance(&DEPLOYER, &A), 0);

        ledger.approve(&DEPLOYER, A, u128::MAX).expect("approve max");
        let err = ledger
            .increase_allowance(&DEPLOYER, A, 1)
            .expect_err("overflow");
        assert_eq!(err.kind(), ErrorKind::Arithmetic);
    }

    #[test]
    fn test_self_transfer_nets_out() {
        let mut ledger = setup();
        ledger
            .transfer(&DEPLOYER, DEPLOYER, 100 * UNIT)
            .expect("self transfer");
        assert_eq!(ledger.balance_of(&DEPLOYER), INITIAL_SUPPLY);
    }

    #[test]
    fn test_transfer_ownership() {
        let mut ledger = setup();
        ledger
            .transfer_ownership(&DEPLOYER, A)
            .expect("transfer ownership");
        assert_eq!(ledger.owner(), A);
        assert!(ledger.set_token_paused(&DEPLOYER, true).is_err());
        ledger.set_token_paused(&A, true).expect("new owner");
    }
}
