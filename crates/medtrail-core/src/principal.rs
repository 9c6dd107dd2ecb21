//! Principal identities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Longest principal string accepted.
pub const MAX_PRINCIPAL_LEN: usize = 256;

/// An identity recognized by the host execution environment.
///
/// Standard principals are account addresses
/// (`ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG`). Contract principals
/// start with `.` (`.record-access`) or name a contract on an account
/// (`ST1...ABC.record-access`).
///
/// A principal is never empty and never contains whitespace or control
/// characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// Validate and wrap a principal string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPrincipal`] if the value is empty, longer
    /// than [`MAX_PRINCIPAL_LEN`], or contains whitespace or control
    /// characters.
    pub fn new(value: impl Into<String>) -> CoreResult<Self> {
        let value = value.into();
        if let Err(reason) = check(&value) {
            return Err(CoreError::InvalidPrincipal {
                value,
                reason: reason.to_owned(),
            });
        }
        Ok(Self(value))
    }

    /// The principal as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this principal names a contract rather than an account.
    #[must_use]
    pub fn is_contract(&self) -> bool {
        self.0.contains('.')
    }
}

fn check(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        return Err("must not be empty");
    }
    if value.len() > MAX_PRINCIPAL_LEN {
        return Err("too long");
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("must not contain whitespace or control characters");
    }
    if value == "." {
        return Err("contract principal has no name");
    }
    Ok(())
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Principal {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Principal {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Principal {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Principal> for String {
    fn from(principal: Principal) -> Self {
        principal.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_principal() {
        let p = Principal::new("ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG").unwrap();
        assert!(!p.is_contract());
        assert_eq!(p.to_string(), "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG");
    }

    #[test]
    fn test_contract_principal() {
        let short: Principal = ".record-access".parse().unwrap();
        assert!(short.is_contract());

        let qualified: Principal = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM.record-access"
            .parse()
            .unwrap();
        assert!(qualified.is_contract());
        assert_ne!(short, qualified);
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            Principal::new(""),
            Err(CoreError::InvalidPrincipal { .. })
        ));
    }

    #[test]
    fn test_rejects_whitespace_and_control() {
        assert!(Principal::new("ST1 ABC").is_err());
        assert!(Principal::new("ST1\nABC").is_err());
        assert!(Principal::new("ST1\0ABC").is_err());
    }

    #[test]
    fn test_rejects_bare_dot() {
        assert!(Principal::new(".").is_err());
    }

    #[test]
    fn test_rejects_oversized() {
        let long = "S".repeat(MAX_PRINCIPAL_LEN + 1);
        assert!(Principal::new(long).is_err());
        let max = "S".repeat(MAX_PRINCIPAL_LEN);
        assert!(Principal::new(max).is_ok());
    }

    #[test]
    fn test_serde_validates() {
        let p: Principal = serde_json::from_str("\".patient-identity\"").unwrap();
        assert_eq!(p.as_str(), ".patient-identity");
        assert_eq!(serde_json::to_string(&p).unwrap(), "\".patient-identity\"");

        let bad: Result<Principal, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}
