//! Emergency switch for an oracle.
//!
//! A tripped guard answers every query with `valid = false` while keeping
//! the inner value visible, so the policy fails closed with an invalid
//! oracle error instead of acting on a suspect price. Only the guardian may
//! trip or reset it.

use std::sync::atomic::{AtomicBool, Ordering};

use gold_types::{Address, Ownable};

use crate::{OracleGateway, OracleReport, Result};

/// Wraps an oracle with a guardian-operated emergency switch.
#[derive(Debug)]
pub struct GuardedOracle<O> {
    inner: O,
    guardian: Ownable,
    tripped: AtomicBool,
}

impl<O: OracleGateway> GuardedOracle<O> {
    /// Guard `inner`, with `guardian` allowed to operate the switch.
    pub fn new(inner: O, guardian: Address) -> Self {
        Self {
            inner,
            guardian: Ownable::new(guardian),
            tripped: AtomicBool::new(false),
        }
    }

    /// Force all reports invalid until [`reset`](Self::reset).
    ///
    /// # Errors
    ///
    /// - [`OracleError::Access`](crate::OracleError::Access) if `caller` is not the guardian
    pub fn trip(&self, caller: &Address) -> Result<()> {
        self.guardian.only_owner(caller)?;
        self.tripped.store(true, Ordering::SeqCst);
        tracing::warn!(%caller, "oracle guard tripped");
        Ok(())
    }

    /// Let reports through again.
    pub fn reset(&self, caller: &Address) -> Result<()> {
        self.guardian.only_owner(caller)?;
        self.tripped.store(false, Ordering::SeqCst);
        tracing::info!(%caller, "oracle guard reset");
        Ok(())
    }

    /// Whether the switch is engaged.
    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }

    /// Address allowed to operate the switch.
    pub fn guardian(&self) -> Address {
        self.guardian.owner()
    }

    /// The wrapped oracle.
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: OracleGateway> OracleGateway for GuardedOracle<O> {
    fn get_data(&self) -> OracleReport {
        let report = self.inner.get_data();
        if self.is_tripped() {
            return OracleReport::invalid(report.value);
        }
        report
    }
}
