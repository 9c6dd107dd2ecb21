//! Principal and call-context fixtures.
//!
//! The principals mirror a typical deployment: one administrator, two
//! human actors, and the three registry contracts allowed to write.

use medtrail_core::{CallContext, Principal, Timestamp};

/// Block time used by fixture contexts.
pub const BLOCK_TIME: Timestamp = Timestamp(1_617_984_000);

fn principal(s: &str) -> Principal {
    Principal::new(s).expect("fixture principal is valid")
}

/// The administrator.
#[must_use]
pub fn administrator() -> Principal {
    principal("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM")
}

/// A healthcare provider (not privileged).
#[must_use]
pub fn provider() -> Principal {
    principal("ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG")
}

/// A patient (not privileged).
#[must_use]
pub fn patient() -> Principal {
    principal("ST2JHG361ZXG51QTKY2NQCVBPPRRE2KZB1HR05NNC")
}

/// Patient registry contract.
#[must_use]
pub fn patient_identity() -> Principal {
    principal(".patient-identity")
}

/// Provider registry contract.
#[must_use]
pub fn provider_verification() -> Principal {
    principal(".provider-verification")
}

/// Record access contract.
#[must_use]
pub fn record_access() -> Principal {
    principal(".record-access")
}

/// A contract that is not on any allow-list.
#[must_use]
pub fn unauthorized_contract() -> Principal {
    principal(".unauthorized-contract")
}

/// The three registry contracts, in allow-list order.
#[must_use]
pub fn test_writers() -> Vec<Principal> {
    vec![patient_identity(), provider_verification(), record_access()]
}

/// A direct call by `principal` at [`BLOCK_TIME`].
#[must_use]
pub fn direct(principal: Principal) -> CallContext {
    CallContext::direct(principal, BLOCK_TIME)
}

/// A call by `sender` relayed through `caller` at [`BLOCK_TIME`].
#[must_use]
pub fn at(sender: Principal, caller: Principal) -> CallContext {
    CallContext::via_contract(sender, caller, BLOCK_TIME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_principals() {
        assert!(!administrator().is_contract());
        assert!(patient_identity().is_contract());
        assert_eq!(test_writers().len(), 3);
        assert!(!test_writers().contains(&unauthorized_contract()));
    }

    #[test]
    fn test_contexts() {
        let ctx = at(provider(), record_access());
        assert!(ctx.is_relayed());
        assert_eq!(ctx.block_time, BLOCK_TIME);
        assert!(!direct(administrator()).is_relayed());
    }
}
