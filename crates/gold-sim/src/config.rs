//! Simulation configuration file.
//!
//! Read from the path in `GOLD_SIM_CONFIG`; every section and field falls
//! back to its default when absent.

use std::path::PathBuf;

use ethnum::U256;
use gold_policy::PolicyConfig;
use gold_types::{Address, INITIAL_SUPPLY, RATE_UNIT};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as, DisplayFromStr};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "GOLD_SIM_CONFIG";

/// Complete simulation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    /// Ledger settings.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Rebase policy parameters.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Scenario settings.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Ledger configuration.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Supply minted to the owner, in base units.
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_initial_supply")]
    pub initial_supply: u128,
    /// Transfer fee. No fee when absent.
    #[serde(default)]
    pub fee: Option<FeeConfig>,
}

/// Transfer fee configuration.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    /// `0x`-prefixed address credited with fees.
    #[serde_as(as = "DisplayFromStr")]
    pub reward_address: Address,
    pub numerator: u128,
    pub denominator: u128,
}

/// Scenario configuration.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Unix time the scenario starts from. The first rebase lands in the
    /// first window after the interval containing this time.
    #[serde(default = "default_start_time")]
    pub start_time: u64,
    /// CPI reported throughout, 18-decimal fixed point.
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_cpi")]
    pub cpi: U256,
    /// Market rate reported at each epoch, 18-decimal fixed point.
    #[serde_as(as = "Vec<DisplayFromStr>")]
    #[serde(default = "default_market_rates")]
    pub market_rates: Vec<U256>,
    /// Accounts the owner seeds with part of the supply.
    #[serde(default = "default_holders")]
    pub holders: usize,
    /// Random transfers between holders before each rebase.
    #[serde(default = "default_transfers_per_epoch")]
    pub transfers_per_epoch: usize,
    /// Seed for the transfer generator.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Run the supply precision walk before the scenario.
    #[serde(default = "default_true")]
    pub precision_check: bool,
    /// Downstream calls registered with the orchestrator.
    #[serde(default)]
    pub downstream: Vec<DownstreamConfig>,
}

/// One scripted downstream call.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownstreamConfig {
    #[serde_as(as = "DisplayFromStr")]
    pub destination: Address,
    /// Hex-encoded call data.
    #[serde_as(as = "Hex")]
    #[serde(default)]
    pub call_data: Vec<u8>,
    /// Make every call to this target fail.
    #[serde(default)]
    pub fail: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level for the `gold` crates: "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LogConfig {
    /// `EnvFilter` directive for the configured level.
    pub fn directive(&self) -> String {
        format!("gold={}", self.level)
    }
}

// Default value functions

fn default_initial_supply() -> u128 {
    INITIAL_SUPPLY
}

fn default_start_time() -> u64 {
    // 2024-01-01T00:00:00Z
    1_704_067_200
}

fn default_cpi() -> U256 {
    U256::new(100 * RATE_UNIT)
}

fn default_market_rates() -> Vec<U256> {
    [1_100u128, 1_080, 1_030, 1_000, 970, 900, 1_200]
        .into_iter()
        .map(|milli| U256::new(milli * RATE_UNIT / 1_000))
        .collect()
}

fn default_holders() -> usize {
    4
}

fn default_transfers_per_epoch() -> usize {
    8
}

fn default_seed() -> u64 {
    42
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_supply: default_initial_supply(),
            fee: None,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_time: default_start_time(),
            cpi: default_cpi(),
            market_rates: default_market_rates(),
            holders: default_holders(),
            transfers_per_epoch: default_transfers_per_epoch(),
            seed: default_seed(),
            precision_check: true,
            downstream: Vec::new(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SimConfig {
    /// Load the file named by `GOLD_SIM_CONFIG`, or defaults when unset.
    pub fn load() -> anyhow::Result<Self> {
        match Self::config_path() {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                Self::parse(&content)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate a TOML document.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: SimConfig = toml::from_str(content)?;
        config.policy.validate()?;
        Ok(config)
    }

    fn config_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_ENV).map(PathBuf::from)
    }
}
