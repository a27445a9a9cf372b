//! Integration tests for the USDGOLD rebase machinery.
//!
//! The library holds the shared deployment fixture: a ledger owned by the
//! policy, owned in turn by the orchestrator, with stub oracles the test
//! keeps handles to. The tests under `tests/` exercise end-to-end flows
//! across the workspace crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p gold-integration-tests
//! ```

use std::sync::Arc;

use ethnum::U256;
use gold_ledger::ElasticLedger;
use gold_oracle::StubOracle;
use gold_orchestrator::{Orchestrator, OrchestratorError, RebaseOutcome};
use gold_policy::{PolicyConfig, RebasePolicy};
use gold_types::{Address, CallContext, INITIAL_SUPPLY, RATE_UNIT};

pub const OWNER: Address = Address::repeat_byte(0x01);
pub const POLICY: Address = Address::repeat_byte(0x02);
pub const ORCHESTRATOR: Address = Address::repeat_byte(0x03);
pub const KEEPER: Address = Address::repeat_byte(0x0f);
pub const LEDGER: Address = Address::repeat_byte(0xee);

pub const DAY: u64 = 86_400;

/// A timestamp early in a default rebase window.
pub const T0: u64 = 19_000 * DAY + 60;

/// The fully wired system.
pub type System = Orchestrator<RebasePolicy<ElasticLedger>>;

/// `milli / 1000` as an 18-decimal rate.
pub fn rate(milli: u128) -> U256 {
    U256::new(milli * RATE_UNIT / 1_000)
}

/// A deployed system plus handles to its oracles.
pub struct Deployment {
    pub system: System,
    pub market: Arc<StubOracle>,
    pub cpi: Arc<StubOracle>,
}

/// Deploy with the initial supply and default policy parameters.
pub fn deploy() -> Deployment {
    deploy_with(INITIAL_SUPPLY, &PolicyConfig::default())
}

/// Deploy with explicit supply and policy parameters.
///
/// Market and CPI oracles start at target (rate 1.0, CPI = base CPI).
pub fn deploy_with(initial_supply: u128, config: &PolicyConfig) -> Deployment {
    let mut ledger =
        ElasticLedger::initialize(OWNER, LEDGER, initial_supply).expect("initialize ledger");
    ledger
        .set_monetary_policy(&OWNER, POLICY)
        .expect("register policy");

    let market = Arc::new(StubOracle::new(U256::new(RATE_UNIT)));
    let cpi = Arc::new(StubOracle::new(config.base_cpi));

    let mut policy = RebasePolicy::new(OWNER, POLICY, ledger, config).expect("policy");
    policy
        .set_market_oracle(&OWNER, Box::new(Arc::clone(&market)))
        .expect("market oracle");
    policy
        .set_cpi_oracle(&OWNER, Box::new(Arc::clone(&cpi)))
        .expect("cpi oracle");
    policy
        .set_orchestrator(&OWNER, ORCHESTRATOR)
        .expect("register orchestrator");

    Deployment {
        system: Orchestrator::new(OWNER, ORCHESTRATOR, policy),
        market,
        cpi,
    }
}

impl Deployment {
    pub fn ledger(&self) -> &ElasticLedger {
        self.system.policy().ledger()
    }

    pub fn ledger_mut(&mut self) -> &mut ElasticLedger {
        self.system.policy_mut().ledger_mut()
    }

    pub fn policy(&self) -> &RebasePolicy<ElasticLedger> {
        self.system.policy()
    }

    pub fn policy_mut(&mut self) -> &mut RebasePolicy<ElasticLedger> {
        self.system.policy_mut()
    }

    /// Report `market_rate` and rebase at `now` as the keeper.
    pub fn rebase_at(
        &mut self,
        now: u64,
        market_rate: U256,
    ) -> Result<RebaseOutcome, OrchestratorError> {
        self.market.store_data(market_rate, true);
        self.system.rebase(&CallContext::direct(KEEPER, now))
    }
}
