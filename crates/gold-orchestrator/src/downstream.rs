//! Downstream call targets.
//!
//! The orchestrator knows nothing about what a target does with its call
//! data, only whether the call succeeded.

/// Failure reported by a downstream call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("downstream call failed: {reason}")]
pub struct DownstreamError {
    /// Target-supplied reason.
    pub reason: String,
}

impl DownstreamError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A destination invoked with pre-encoded call data after each rebase.
///
/// Implementations report failure by returning `Err`. A panic is caught and
/// counted as a failed call, which only holds when the build unwinds; under
/// `panic = "abort"` it takes the process down after the policy has already
/// committed the epoch.
pub trait Downstream {
    /// Invoke the target with `call_data`.
    fn call(&mut self, call_data: &[u8]) -> Result<(), DownstreamError>;
}
