//! Owner-gated access control.
//!
//! Every component holds an [`Ownable`] capability naming its single current
//! owner. Administrative setters call [`Ownable::only_owner`] before touching
//! state; ownership moves with a single atomic swap in
//! [`Ownable::transfer_ownership`].

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::{Address, ErrorKind};

/// Access-control failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Caller is not the current owner.
    #[error("caller {caller} is not the owner")]
    NotOwner {
        /// The rejected caller.
        caller: Address,
    },

    /// Caller does not hold the role required by the operation.
    #[error("caller {caller} is not the registered {role}")]
    NotRole {
        /// The rejected caller.
        caller: Address,
        /// Name of the required role.
        role: &'static str,
    },

    /// Ownership cannot be handed to the zero address.
    #[error("new owner is the zero address")]
    ZeroOwner,
}

impl AccessError {
    /// Error class of this failure.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Unauthorized
    }
}

/// Single-owner access capability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownable {
    owner: Address,
}

impl Ownable {
    /// Create the capability with `owner` as the current owner.
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// The current owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Whether `caller` is the current owner.
    pub fn is_owner(&self, caller: &Address) -> bool {
        &self.owner == caller
    }

    /// Reject any caller other than the owner.
    ///
    /// # Errors
    ///
    /// - [`AccessError::NotOwner`] if `caller` is not the owner
    pub fn only_owner(&self, caller: &Address) -> Result<(), AccessError> {
        if !self.is_owner(caller) {
            return Err(AccessError::NotOwner { caller: *caller });
        }
        Ok(())
    }

    /// Replace the owner.
    ///
    /// Returns the `OwnershipTransferred` record to emit.
    ///
    /// # Errors
    ///
    /// - [`AccessError::NotOwner`] if `caller` is not the owner
    /// - [`AccessError::ZeroOwner`] if `new_owner` is the zero address
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<Event, AccessError> {
        self.only_owner(caller)?;
        if new_owner.is_zero() {
            return Err(AccessError::ZeroOwner);
        }
        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        tracing::info!(%previous_owner, %new_owner, "ownership transferred");
        Ok(Event::OwnershipTransferred {
            previous_owner,
            new_owner,
        })
    }
}

/// Who is calling, and at what time.
///
/// `sender` is the immediate caller; `origin` is the account that signed the
/// outer transaction. They differ when a contract relays the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// Immediate caller.
    pub sender: Address,
    /// Account that initiated the outer transaction.
    pub origin: Address,
    /// Current time in Unix seconds.
    pub now: u64,
}

impl CallContext {
    /// A call made directly by an externally-owned account.
    pub fn direct(account: Address, now: u64) -> Self {
        Self {
            sender: account,
            origin: account,
            now,
        }
    }

    /// Whether the call was made directly, not relayed by a contract.
    pub fn is_direct(&self) -> bool {
        self.sender == self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: Address = Address::repeat_byte(1);
    const USER: Address = Address::repeat_byte(2);

    #[test]
    fn test_only_owner() {
        let ownable = Ownable::new(OWNER);
        ownable.only_owner(&OWNER).expect("owner accepted");
        let err = ownable.only_owner(&USER).expect_err("user rejected");
        assert_eq!(err, AccessError::NotOwner { caller: USER });
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_transfer_ownership() {
        let mut ownable = Ownable::new(OWNER);
        let event = ownable
            .transfer_ownership(&OWNER, USER)
            .expect("transfer");
        assert_eq!(ownable.owner(), USER);
        assert_eq!(
            event,
            Event::OwnershipTransferred {
                previous_owner: OWNER,
                new_owner: USER,
            }
        );
        assert!(ownable.only_owner(&OWNER).is_err());
    }

    #[test]
    fn test_transfer_ownership_non_owner_rejected() {
        let mut ownable = Ownable::new(OWNER);
        assert!(ownable.transfer_ownership(&USER, USER).is_err());
        assert_eq!(ownable.owner(), OWNER);
    }

    #[test]
    fn test_transfer_ownership_to_zero_rejected() {
        let mut ownable = Ownable::new(OWNER);
        let err = ownable
            .transfer_ownership(&OWNER, Address::ZERO)
            .expect_err("zero owner");
        assert_eq!(err, AccessError::ZeroOwner);
    }

    #[test]
    fn test_call_context() {
        let ctx = CallContext::direct(USER, 100);
        assert!(ctx.is_direct());
        let relayed = CallContext {
            sender: OWNER,
            ..ctx
        };
        assert!(!relayed.is_direct());
    }
}
