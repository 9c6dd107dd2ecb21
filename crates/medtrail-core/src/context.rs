//! Per-call context supplied by the host.

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, Timestamp};
use crate::principal::Principal;

/// Identities and block time for a single invocation.
///
/// The host distinguishes the principal that signed the transaction
/// (`tx_sender`) from the immediate caller (`contract_caller`). For a direct
/// call both are the same principal; when a collaborator contract calls in
/// on a user's behalf, `contract_caller` is the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Principal that signed the transaction.
    pub tx_sender: Principal,
    /// Immediate caller of this operation.
    pub contract_caller: Principal,
    /// Block time of the operation.
    pub block_time: Timestamp,
}

impl CallContext {
    /// A direct call: sender and caller are the same principal.
    #[must_use]
    pub fn direct(principal: Principal, block_time: Timestamp) -> Self {
        Self {
            tx_sender: principal.clone(),
            contract_caller: principal,
            block_time,
        }
    }

    /// A call relayed through `contract` on behalf of `sender`.
    #[must_use]
    pub fn via_contract(sender: Principal, contract: Principal, block_time: Timestamp) -> Self {
        Self {
            tx_sender: sender,
            contract_caller: contract,
            block_time,
        }
    }

    /// A direct call stamped with the clock's current time.
    #[must_use]
    pub fn direct_now(principal: Principal, clock: &dyn Clock) -> Self {
        Self::direct(principal, clock.now())
    }

    /// Whether the call arrived through an intermediate contract.
    #[must_use]
    pub fn is_relayed(&self) -> bool {
        self.tx_sender != self.contract_caller
    }
}
