//! Scripted policy run.
//!
//! Wires a ledger, a policy with stub oracles and an orchestrator, seeds a
//! few holders, then replays the configured market-rate path one rebase
//! window at a time. Between rebases the holders trade randomly; the sum
//! of visible balances is checked against the total supply after every
//! epoch.

use std::sync::Arc;

use anyhow::ensure;
use ethnum::U256;
use gold_ledger::ElasticLedger;
use gold_oracle::StubOracle;
use gold_orchestrator::{Downstream, DownstreamError, Orchestrator};
use gold_policy::RebasePolicy;
use gold_types::{Address, CallContext, Event};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_with::{serde_as, DisplayFromStr};

use crate::config::{DownstreamConfig, SimConfig};

const OWNER: Address = Address::repeat_byte(0x01);
const POLICY: Address = Address::repeat_byte(0x02);
const ORCHESTRATOR: Address = Address::repeat_byte(0x03);
const LEDGER: Address = Address::repeat_byte(0xee);
const KEEPER: Address = Address::repeat_byte(0x0f);

type System = Orchestrator<RebasePolicy<ElasticLedger>>;

/// Per-epoch summary.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpochReport {
    pub epoch: u64,
    pub timestamp_sec: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub market_rate: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub total_supply: u128,
    /// Downstream transactions that failed during this rebase.
    pub failed_transactions: Vec<usize>,
}

/// Outcome of a scripted run.
#[serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub epochs: Vec<EpochReport>,
    #[serde_as(as = "DisplayFromStr")]
    pub final_supply: u128,
    /// Every record emitted by the ledger, policy and orchestrator.
    pub events: Vec<Event>,
}

/// Downstream target that logs each call and optionally fails.
struct ScriptedTarget {
    destination: Address,
    fail: bool,
}

impl Downstream for ScriptedTarget {
    fn call(&mut self, call_data: &[u8]) -> Result<(), DownstreamError> {
        if self.fail {
            return Err(DownstreamError::new(format!(
                "{} configured to fail",
                self.destination
            )));
        }
        tracing::info!(destination = %self.destination, bytes = call_data.len(), "downstream called");
        Ok(())
    }
}

/// Run the scripted scenario described by `config`.
pub fn run(config: &SimConfig) -> anyhow::Result<ScenarioReport> {
    let sim = &config.simulation;
    let holders: Vec<Address> = (0..sim.holders)
        .map(|i| Address::repeat_byte(0x10 + (i % 0xd0) as u8))
        .collect();

    let market = Arc::new(StubOracle::new(U256::ZERO));
    let cpi = Arc::new(StubOracle::new(sim.cpi));
    let mut system = build(config, &holders, &market, &cpi)?;
    let mut events = drain(&mut system);

    let interval = config.policy.min_rebase_time_interval_sec;
    let first_interval = sim.start_time - sim.start_time % interval;
    let mut rng = StdRng::seed_from_u64(sim.seed);
    let mut epochs = Vec::with_capacity(sim.market_rates.len());

    for (i, rate) in sim.market_rates.iter().enumerate() {
        trade(&mut system, &holders, &mut rng, sim.transfers_per_epoch)?;

        let now = first_interval + (i as u64 + 1) * interval + config.policy.rebase_window_offset_sec;
        market.store_data(*rate, true);
        let outcome = system.rebase(&CallContext::direct(KEEPER, now))?;

        let ledger = system.policy().ledger();
        let visible: u128 = std::iter::once(OWNER)
            .chain(holders.iter().copied())
            .chain(config.ledger.fee.iter().map(|fee| fee.reward_address))
            .map(|account| ledger.balance_of(&account))
            .sum();
        ensure!(
            visible <= ledger.total_supply(),
            "balances sum to {visible}, above total supply {}",
            ledger.total_supply()
        );

        let epoch = system.policy().epoch();
        tracing::info!(
            epoch,
            %rate,
            total_supply = outcome.new_total_supply,
            "epoch complete"
        );
        epochs.push(EpochReport {
            epoch,
            timestamp_sec: now,
            market_rate: *rate,
            total_supply: outcome.new_total_supply,
            failed_transactions: outcome.failed,
        });
        events.extend(drain(&mut system));
    }

    Ok(ScenarioReport {
        epochs,
        final_supply: system.policy().ledger().total_supply(),
        events,
    })
}

fn build(
    config: &SimConfig,
    holders: &[Address],
    market: &Arc<StubOracle>,
    cpi: &Arc<StubOracle>,
) -> anyhow::Result<System> {
    let mut ledger = ElasticLedger::initialize(OWNER, LEDGER, config.ledger.initial_supply)?;
    ledger.set_monetary_policy(&OWNER, POLICY)?;

    // Seed holders before any fee applies so each starts with an equal share.
    let share = config.ledger.initial_supply / (holders.len() as u128 + 1);
    for holder in holders {
        ledger.transfer(&OWNER, *holder, share)?;
    }
    if let Some(fee) = &config.ledger.fee {
        ledger.set_reward_params(&OWNER, fee.reward_address, fee.numerator, fee.denominator)?;
    }

    let mut policy = RebasePolicy::new(OWNER, POLICY, ledger, &config.policy)?;
    policy.set_market_oracle(&OWNER, Box::new(Arc::clone(market)))?;
    policy.set_cpi_oracle(&OWNER, Box::new(Arc::clone(cpi)))?;
    policy.set_orchestrator(&OWNER, ORCHESTRATOR)?;

    let mut orchestrator = Orchestrator::new(OWNER, ORCHESTRATOR, policy);
    for DownstreamConfig {
        destination,
        call_data,
        fail,
    } in &config.simulation.downstream
    {
        orchestrator.add_transaction(
            &OWNER,
            *destination,
            call_data.clone(),
            Box::new(ScriptedTarget {
                destination: *destination,
                fail: *fail,
            }),
        )?;
    }
    Ok(orchestrator)
}

/// Random transfers of up to half the sender's balance between holders.
fn trade(
    system: &mut System,
    holders: &[Address],
    rng: &mut StdRng,
    transfers: usize,
) -> anyhow::Result<()> {
    if holders.len() < 2 {
        return Ok(());
    }
    let ledger = system.policy_mut().ledger_mut();
    for _ in 0..transfers {
        let from = holders[rng.gen_range(0..holders.len())];
        let to = holders[rng.gen_range(0..holders.len())];
        let balance = ledger.balance_of(&from);
        if balance < 2 {
            continue;
        }
        let value = rng.gen_range(1..=balance / 2);
        ledger.transfer(&from, to, value)?;
    }
    Ok(())
}

fn drain(system: &mut System) -> Vec<Event> {
    let mut events = system.policy_mut().ledger_mut().take_events();
    events.extend(system.policy_mut().take_events());
    events.extend(system.take_events());
    events
}
