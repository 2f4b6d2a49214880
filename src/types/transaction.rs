//! Transaction record types for the append-only ledger history

use crate::types::AccountId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction identifier, assigned monotonically by the log
pub type TransactionId = u64;

/// Kind of ledger movement recorded in the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    /// Peer-to-peer transfer between two accounts
    Transfer,
    /// Administrative credit with no counterparty account
    Mint,
    /// Administrative debit with no counterparty account
    Burn,
}

/// One side of a transaction
///
/// Administrative adjustments have no counterparty account; the `System`
/// sentinel stands in for it (source of a mint, destination of a burn).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxParty {
    Account(AccountId),
    System,
}

impl TxParty {
    /// The account id on this side, if it is an account
    pub fn account(&self) -> Option<&AccountId> {
        match self {
            TxParty::Account(id) => Some(id),
            TxParty::System => None,
        }
    }
}

impl std::fmt::Display for TxParty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxParty::Account(id) => write!(f, "{id}"),
            TxParty::System => f.write_str("system"),
        }
    }
}

impl std::fmt::Display for TxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxKind::Transfer => f.write_str("transfer"),
            TxKind::Mint => f.write_str("mint"),
            TxKind::Burn => f.write_str("burn"),
        }
    }
}

/// A completed ledger movement awaiting an id and timestamp
///
/// Built by the `LedgerEngine` after the balance mutation committed; the
/// `TransactionLog` assigns the identifier and timestamp on append.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub kind: TxKind,
    pub from: TxParty,
    pub to: TxParty,
    /// Amount actually applied, always positive
    pub amount: Decimal,
}

impl TransactionDraft {
    pub fn transfer(from: AccountId, to: AccountId, amount: Decimal) -> Self {
        TransactionDraft {
            kind: TxKind::Transfer,
            from: TxParty::Account(from),
            to: TxParty::Account(to),
            amount,
        }
    }

    pub fn mint(to: AccountId, amount: Decimal) -> Self {
        TransactionDraft {
            kind: TxKind::Mint,
            from: TxParty::System,
            to: TxParty::Account(to),
            amount,
        }
    }

    pub fn burn(from: AccountId, amount: Decimal) -> Self {
        TransactionDraft {
            kind: TxKind::Burn,
            from: TxParty::Account(from),
            to: TxParty::System,
            amount,
        }
    }
}

/// Immutable entry in the transaction history
///
/// References accounts by identifier only; entries are never rewritten or
/// deleted once appended. Invariants: `amount > 0`, and for transfers
/// `from != to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub kind: TxKind,
    pub from: TxParty,
    pub to: TxParty,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    /// Whether the given account took part in this movement on either side
    pub fn involves(&self, id: &AccountId) -> bool {
        self.from.account() == Some(id) || self.to.account() == Some(id)
    }
}

/// Filter for querying the transaction history
///
/// All fields are optional; an empty filter matches every entry. Results keep
/// insertion order (insertion order is commit order).
#[derive(Debug, Clone, Default)]
pub struct TxFilter {
    /// Match entries where this account is either party
    pub participant: Option<AccountId>,
    /// Inclusive lower bound on the entry timestamp
    pub from_time: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the entry timestamp
    pub to_time: Option<DateTime<Utc>>,
}

impl TxFilter {
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        if let Some(participant) = &self.participant {
            if !record.involves(participant) {
                return false;
            }
        }
        if let Some(from) = self.from_time {
            if record.timestamp < from {
                return false;
            }
        }
        if let Some(to) = self.to_time {
            if record.timestamp > to {
                return false;
            }
        }
        true
    }
}
