//! # gold-orchestrator
//!
//! Entry point for rebases. The orchestrator asks the monetary policy to
//! rebase and then runs an owner-managed list of downstream calls, each in
//! its own fault boundary: a failing call is logged and skipped, never
//! aborting the rebase or the calls after it.
//!
//! ## Modules
//!
//! - [`downstream`] — the call-target seam
//! - [`orchestrator`] — the [`Orchestrator`] and its transaction list

pub mod downstream;
pub mod orchestrator;

pub use downstream::{Downstream, DownstreamError};
pub use orchestrator::{Orchestrator, RebaseOutcome, TransactionInfo};

use gold_policy::PolicyError;
use gold_types::{AccessError, ErrorKind};

/// Error types for orchestrator operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrchestratorError {
    /// Caller failed an owner or direct-caller check.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// No transaction at this index.
    #[error("transaction index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current list length.
        len: usize,
    },

    /// The policy rejected the rebase.
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

impl OrchestratorError {
    /// Error class of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Access(e) => e.kind(),
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::Policy(e) => e.kind(),
        }
    }
}

/// Convenience result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
