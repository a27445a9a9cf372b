//! Emitted records.
//!
//! Components buffer the records they emit in an [`EventLog`]; callers drain
//! them with [`EventLog::take`]. Records serialise to JSON with an `event`
//! tag carrying the record name. Wide integers serialise as decimal strings.

use ethnum::{I256, U256};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::Address;

/// Every record a component can emit.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum Event {
    /// Visible-unit movement between accounts. Mints use `from = ZERO`.
    Transfer {
        from: Address,
        to: Address,
        #[serde_as(as = "DisplayFromStr")]
        value: u128,
    },

    /// Spending allowance set for `spender` over `owner`'s balance.
    Approval {
        owner: Address,
        spender: Address,
        #[serde_as(as = "DisplayFromStr")]
        value: u128,
    },

    /// Ledger supply rebase applied.
    LogRebase {
        epoch: u64,
        #[serde_as(as = "DisplayFromStr")]
        total_supply: u128,
    },

    /// Policy rebase computed and applied.
    LogPolicyRebase {
        epoch: u64,
        #[serde_as(as = "DisplayFromStr")]
        exchange_rate: U256,
        #[serde_as(as = "DisplayFromStr")]
        cpi: U256,
        #[serde_as(as = "DisplayFromStr")]
        requested_supply_adjustment: I256,
        /// Supply reported by the ledger after the rebase.
        #[serde_as(as = "DisplayFromStr")]
        new_total_supply: u128,
        timestamp_sec: u64,
    },

    /// Rebase pause flag changed.
    LogRebasePaused { paused: bool },

    /// Token pause flag changed.
    LogTokenPaused { paused: bool },

    /// Ledger's monetary policy address changed.
    LogMonetaryPolicyUpdated { monetary_policy: Address },

    /// Component owner replaced.
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

/// Append-only buffer of emitted records.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn emit(&mut self, event: Event) {
        tracing::trace!(?event, "event emitted");
        self.events.push(event);
    }

    /// Append several records in order.
    pub fn extend(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.emit(event);
        }
    }

    /// Records emitted since the last drain.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Most recent record, if any.
    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    /// Drain all buffered records.
    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Number of buffered records.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no records are buffered.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
