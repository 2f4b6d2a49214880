//! Account-related types for the ledger
//!
//! This module defines account identifiers, roles, and the account record
//! itself, plus the administrator singleton record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account identifier
///
/// A validated handle (alphanumeric/underscore, bounded length). Validation
/// happens at registration time in the `AccountRegistry`; the newtype itself
/// accepts any string so lookups for unknown ids stay cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        AccountId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AccountId(s.to_string()))
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        AccountId(s.to_string())
    }
}

/// Role attached to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account holder: may transfer own funds
    Standard,
    /// Administrative role: may mint and burn balances
    Administrator,
}

/// Durable account record
///
/// Owned exclusively by the `AccountStore`; balance and session are mutated
/// only through the `LedgerEngine` and `AuthGate`, profile fields only through
/// the `AccountRegistry`. The balance is never negative in any committed
/// state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, immutable once created
    pub id: AccountId,

    /// Optional display name shown to other holders
    pub display_name: Option<String>,

    /// Opaque credential hash produced by the `PasswordHasher` capability
    pub credential_hash: String,

    /// Role of this account
    pub role: Role,

    /// Current balance in the 4-decimal-place ledger unit, always >= 0
    pub balance: Decimal,

    /// Currently bound session token, if a session is active
    ///
    /// Exactly one session may be active at a time; issuing a new one
    /// replaces this value and invalidates the old token.
    pub session: Option<String>,
}

impl Account {
    /// Create a new standard account with the given starting balance
    pub fn new(
        id: AccountId,
        credential_hash: String,
        display_name: Option<String>,
        starting_balance: Decimal,
    ) -> Self {
        Account {
            id,
            display_name,
            credential_hash,
            role: Role::Standard,
            balance: starting_balance,
            session: None,
        }
    }
}

/// Administrator singleton record
///
/// The administrator is not an account: it holds no balance, only the
/// credential hash and the currently bound admin session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminRecord {
    pub credential_hash: String,
    pub session: Option<String>,
}

impl AdminRecord {
    pub fn new(credential_hash: String) -> Self {
        AdminRecord {
            credential_hash,
            session: None,
        }
    }
}
