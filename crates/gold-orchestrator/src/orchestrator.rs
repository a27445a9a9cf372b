//! The rebase orchestrator and its transaction list.
//!
//! Removing an entry moves the last entry into its slot, so indices are not
//! stable across removals.

use std::panic::{self, AssertUnwindSafe};

use gold_policy::MonetaryPolicy;
use gold_types::{AccessError, Address, CallContext, Event, EventLog, Ownable};
use serde::Serialize;
use serde_with::{hex::Hex, serde_as};

use crate::downstream::{Downstream, DownstreamError};
use crate::{OrchestratorError, Result};

struct Transaction {
    destination: Address,
    call_data: Vec<u8>,
    enabled: bool,
    target: Box<dyn Downstream>,
}

/// Read-only view of one transaction list entry.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransactionInfo {
    pub destination: Address,
    #[serde_as(as = "Hex")]
    pub call_data: Vec<u8>,
    pub enabled: bool,
}

/// Result of a successful orchestrated rebase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RebaseOutcome {
    /// Total supply reported by the policy.
    pub new_total_supply: u128,
    /// Indices of enabled transactions whose call failed, in list order.
    pub failed: Vec<usize>,
}

/// Drives the policy rebase and the post-rebase transaction list.
pub struct Orchestrator<P> {
    /// Address the orchestrator calls the policy as.
    address: Address,
    ownable: Ownable,
    policy: P,
    transactions: Vec<Transaction>,
    events: EventLog,
}

impl<P: MonetaryPolicy> Orchestrator<P> {
    pub fn new(owner: Address, address: Address, policy: P) -> Self {
        tracing::info!(%owner, %address, "orchestrator initialized");
        Self {
            address,
            ownable: Ownable::new(owner),
            policy,
            transactions: Vec::new(),
            events: EventLog::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.ownable.owner()
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    pub fn transactions_size(&self) -> usize {
        self.transactions.len()
    }

    /// Entry at `index`.
    ///
    /// # Errors
    ///
    /// - [`OrchestratorError::IndexOutOfRange`] if there is no such entry
    pub fn transaction(&self, index: usize) -> Result<TransactionInfo> {
        let tx = self.get(index)?;
        Ok(TransactionInfo {
            destination: tx.destination,
            call_data: tx.call_data.clone(),
            enabled: tx.enabled,
        })
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take()
    }

    /// Append an enabled transaction calling `target` with `call_data`.
    pub fn add_transaction(
        &mut self,
        caller: &Address,
        destination: Address,
        call_data: Vec<u8>,
        target: Box<dyn Downstream>,
    ) -> Result<()> {
        self.ownable.only_owner(caller)?;
        tracing::info!(
            %destination,
            call_data = %hex::encode(&call_data),
            index = self.transactions.len(),
            "transaction added"
        );
        self.transactions.push(Transaction {
            destination,
            call_data,
            enabled: true,
            target,
        });
        Ok(())
    }

    /// Remove the entry at `index`, moving the last entry into its slot.
    pub fn remove_transaction(&mut self, caller: &Address, index: usize) -> Result<()> {
        self.ownable.only_owner(caller)?;
        self.get(index)?;
        let removed = self.transactions.swap_remove(index);
        tracing::info!(destination = %removed.destination, index, "transaction removed");
        Ok(())
    }

    pub fn set_transaction_enabled(
        &mut self,
        caller: &Address,
        index: usize,
        enabled: bool,
    ) -> Result<()> {
        self.ownable.only_owner(caller)?;
        let len = self.transactions.len();
        let tx = self
            .transactions
            .get_mut(index)
            .ok_or(OrchestratorError::IndexOutOfRange { index, len })?;
        tx.enabled = enabled;
        tracing::info!(destination = %tx.destination, index, enabled, "transaction toggled");
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<()> {
        let event = self.ownable.transfer_ownership(caller, new_owner)?;
        self.events.emit(event);
        Ok(())
    }

    /// Rebase through the policy, then run every enabled transaction in
    /// list order.
    ///
    /// Open to any externally-owned account. A policy failure aborts before
    /// any transaction runs. A transaction failure is logged, recorded in
    /// [`RebaseOutcome::failed`] and otherwise ignored.
    ///
    /// # Errors
    ///
    /// - [`AccessError::NotRole`] if the call is relayed by a contract
    /// - [`OrchestratorError::Policy`] if the policy rejects the rebase
    pub fn rebase(&mut self, ctx: &CallContext) -> Result<RebaseOutcome> {
        if !ctx.is_direct() {
            return Err(AccessError::NotRole {
                caller: ctx.sender,
                role: "externally-owned account",
            }
            .into());
        }

        let new_total_supply = self.policy.rebase(&self.address, ctx.now)?;

        let mut failed = Vec::new();
        for (index, tx) in self.transactions.iter_mut().enumerate() {
            if !tx.enabled {
                continue;
            }
            let target = &mut tx.target;
            let call_data = &tx.call_data;
            let result = panic::catch_unwind(AssertUnwindSafe(|| target.call(call_data)))
                .unwrap_or_else(|_| Err(DownstreamError::new("call panicked")));
            match result {
                Ok(()) => {
                    tracing::debug!(index, destination = %tx.destination, "transaction succeeded");
                }
                Err(e) => {
                    tracing::warn!(
                        index,
                        destination = %tx.destination,
                        error = %e,
                        "transaction failed"
                    );
                    failed.push(index);
                }
            }
        }

        tracing::info!(
            new_total_supply,
            transactions = self.transactions.len(),
            failed = failed.len(),
            "orchestrated rebase"
        );

        Ok(RebaseOutcome {
            new_total_supply,
            failed,
        })
    }

    fn get(&self, index: usize) -> Result<&Transaction> {
        self.transactions
            .get(index)
            .ok_or(OrchestratorError::IndexOutOfRange {
                index,
                len: self.transactions.len(),
            })
    }
}
