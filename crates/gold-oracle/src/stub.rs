//! Settable in-process oracle.
//!
//! Answers with whatever report was last stored. Used by the simulator to
//! replay a scripted rate path and by tests to drive the policy. Shared
//! through an `Arc` so the holder can keep adjusting the report after the
//! policy has taken a handle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use ethnum::U256;

use crate::{OracleGateway, OracleReport};

/// An oracle returning a stored report.
#[derive(Debug)]
pub struct StubOracle {
    report: RwLock<OracleReport>,
    queries: AtomicUsize,
}

impl StubOracle {
    /// A stub reporting `value` as valid.
    pub fn new(value: U256) -> Self {
        Self::with_report(OracleReport::valid(value))
    }

    /// A stub reporting `report` verbatim.
    pub fn with_report(report: OracleReport) -> Self {
        Self {
            report: RwLock::new(report),
            queries: AtomicUsize::new(0),
        }
    }

    /// Replace the stored report.
    pub fn store_data(&self, value: U256, valid: bool) {
        tracing::debug!(%value, valid, "stub oracle: report stored");
        *self.report.write().unwrap_or_else(PoisonError::into_inner) =
            OracleReport { value, valid };
    }

    /// Replace the value, keeping validity.
    pub fn set_value(&self, value: U256) {
        self.report
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .value = value;
    }

    /// Replace validity, keeping the value.
    pub fn set_valid(&self, valid: bool) {
        self.report
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .valid = valid;
    }

    /// The stored report, without counting a query.
    pub fn peek(&self) -> OracleReport {
        *self.report.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of `get_data` calls answered so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl OracleGateway for StubOracle {
    fn get_data(&self) -> OracleReport {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.peek()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_valid() {
        let oracle = StubOracle::new(U256::new(100));
        assert_eq!(oracle.get_data(), OracleReport::valid(U256::new(100)));
    }

    #[test]
    fn test_store_data() {
        let oracle = StubOracle::new(U256::new(100));
        oracle.store_data(U256::new(250), false);
        assert_eq!(oracle.get_data(), OracleReport::invalid(U256::new(250)));
    }

    #[test]
    fn test_setters_touch_one_field() {
        let oracle = StubOracle::new(U256::new(100));
        oracle.set_valid(false);
        assert_eq!(oracle.peek(), OracleReport::invalid(U256::new(100)));
        oracle.set_value(U256::new(5));
        assert_eq!(oracle.peek(), OracleReport::invalid(U256::new(5)));
    }

    #[test]
    fn test_query_counter() {
        let oracle = StubOracle::new(U256::ONE);
        assert_eq!(oracle.queries(), 0);
        oracle.peek();
        assert_eq!(oracle.queries(), 0);
        oracle.get_data();
        oracle.get_data();
        assert_eq!(oracle.queries(), 2);
    }
}
