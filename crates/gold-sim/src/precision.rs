//! Supply precision walk.
//!
//! Starting from the configured supply, alternately rebase by +1 (which must
//! move the supply by exactly 1) and double the supply, until it reaches
//! `MAX_SUPPLY`. A final +1 at the cap must leave the supply unchanged.

use anyhow::ensure;
use ethnum::{I256, U256};
use gold_ledger::ElasticLedger;
use gold_types::{Address, MAX_SUPPLY};
use serde::Serialize;
use serde_with::{serde_as, DisplayFromStr};

const OWNER: Address = Address::repeat_byte(0x01);
const LEDGER: Address = Address::repeat_byte(0xee);

/// Outcome of a precision walk.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrecisionReport {
    /// Number of +1 rebases checked.
    pub unit_steps: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub final_supply: u128,
}

/// Walk the supply from `initial_supply` up to `MAX_SUPPLY`.
pub fn run(initial_supply: u128) -> anyhow::Result<PrecisionReport> {
    let mut ledger = ElasticLedger::initialize(OWNER, LEDGER, initial_supply)?;
    // The walk drives the ledger directly, standing in for the policy.
    ledger.set_monetary_policy(&OWNER, OWNER)?;

    let mut epoch = 0u64;
    let mut unit_steps = 0u64;
    loop {
        let before = ledger.total_supply();
        if before == MAX_SUPPLY {
            break;
        }

        epoch += 1;
        let after = ledger.rebase(&OWNER, epoch, I256::new(1))?;
        ensure!(
            after == before + 1,
            "supply moved from {before} to {after} on a +1 rebase"
        );
        ensure!(
            ledger.scaling_factor().implied_supply() == after,
            "scaling factor implies {} at supply {after}",
            ledger.scaling_factor().implied_supply()
        );
        unit_steps += 1;

        epoch += 1;
        let doubled = U256::new(after).as_i256();
        let grown = ledger.rebase(&OWNER, epoch, doubled)?;
        tracing::debug!(epoch, supply = grown, "precision walk step");
    }

    epoch += 1;
    let capped = ledger.rebase(&OWNER, epoch, I256::new(1))?;
    ensure!(capped == MAX_SUPPLY, "supply {capped} moved past the cap");

    tracing::info!(unit_steps, final_supply = capped, "precision walk complete");
    Ok(PrecisionReport {
        unit_steps,
        final_supply: capped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gold_types::{INITIAL_SUPPLY, MIN_SUPPLY};

    #[test]
    fn test_walk_from_initial_supply() {
        let report = run(INITIAL_SUPPLY).expect("walk");
        assert_eq!(report.final_supply, MAX_SUPPLY);
        // 3.025e15 needs 76 doublings to pass 2^128.
        assert!(report.unit_steps > 70);
        assert!(report.unit_steps < 80);
    }

    #[test]
    fn test_walk_from_min_supply() {
        let report = run(MIN_SUPPLY).expect("walk");
        assert_eq!(report.final_supply, MAX_SUPPLY);
    }
}
