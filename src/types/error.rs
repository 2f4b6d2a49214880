//! Error types for the ledger core
//!
//! Every rejection path returns a distinguishable variant so a transport layer
//! can map it to a response. Variants group into four classes (validation,
//! authorization, conflict, not-found) exposed through [`LedgerError::class`].
//!
//! Durability degradation (a log append failing after the balance mutation
//! committed) is deliberately *not* an error: it is surfaced as a warning flag
//! on an otherwise-successful result.

use crate::types::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Coarse classification of a rejection, for transport-level mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed input; never retried
    Validation,
    /// Missing, invalid, or insufficient credentials; never retried
    Authorization,
    /// Request conflicts with current ledger state; never retried
    Conflict,
    /// Referenced account does not exist
    NotFound,
}

/// Main error type for the ledger core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Identifier does not match the required syntax
    #[error("invalid identifier '{id}': expected {min_len}-{max_len} alphanumeric/underscore characters")]
    InvalidIdentifier {
        id: String,
        min_len: usize,
        max_len: usize,
    },

    /// Credential fails the minimum-strength policy
    #[error("credential too weak: at least {min_len} characters required")]
    WeakCredential { min_len: usize },

    /// Amount is non-positive or not representable in the ledger unit
    #[error("invalid amount '{amount}' for {operation}")]
    InvalidAmount { amount: Decimal, operation: String },

    /// Checked decimal arithmetic overflowed
    #[error("arithmetic overflow in {operation} for account {id}")]
    ArithmeticOverflow { operation: String, id: AccountId },

    /// Login failed; intentionally does not say whether the identifier or
    /// the credential was wrong
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Request carried no bearer token
    #[error("missing token")]
    MissingToken,

    /// Token failed structural or signature verification
    #[error("invalid token")]
    InvalidToken,

    /// Token verified but its expiry has passed
    #[error("expired token")]
    ExpiredToken,

    /// Token verified but has been superseded by a newer session
    #[error("stale token: a newer session is active for this identity")]
    StaleToken,

    /// Principal is not allowed to perform this operation
    #[error("forbidden")]
    Forbidden,

    /// Identifier is already taken
    #[error("account '{id}' already exists")]
    DuplicateIdentifier { id: AccountId },

    /// Transfer names the same account on both sides
    #[error("cannot transfer from account '{id}' to itself")]
    SelfTransfer { id: AccountId },

    /// Sender balance does not cover the requested amount
    #[error("insufficient funds for account '{id}': balance {balance}, requested {requested}")]
    InsufficientFunds {
        id: AccountId,
        balance: Decimal,
        requested: Decimal,
    },

    /// Adjustment delta of zero
    #[error("adjustment for account '{id}' is a no-op")]
    NoOpAdjustment { id: AccountId },

    /// Referenced account does not exist
    #[error("account '{id}' not found")]
    AccountNotFound { id: AccountId },

    /// Transfer recipient does not exist
    #[error("recipient '{id}' not found")]
    RecipientNotFound { id: AccountId },
}

impl LedgerError {
    /// Classify this error for transport-level mapping
    pub fn class(&self) -> ErrorClass {
        match self {
            LedgerError::InvalidIdentifier { .. }
            | LedgerError::WeakCredential { .. }
            | LedgerError::InvalidAmount { .. }
            | LedgerError::ArithmeticOverflow { .. } => ErrorClass::Validation,

            LedgerError::InvalidCredentials
            | LedgerError::MissingToken
            | LedgerError::InvalidToken
            | LedgerError::ExpiredToken
            | LedgerError::StaleToken
            | LedgerError::Forbidden => ErrorClass::Authorization,

            LedgerError::DuplicateIdentifier { .. }
            | LedgerError::SelfTransfer { .. }
            | LedgerError::InsufficientFunds { .. }
            | LedgerError::NoOpAdjustment { .. } => ErrorClass::Conflict,

            LedgerError::AccountNotFound { .. } | LedgerError::RecipientNotFound { .. } => {
                ErrorClass::NotFound
            }
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(id: &AccountId, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            id: id.clone(),
            balance,
            requested,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal, operation: &str) -> Self {
        LedgerError::InvalidAmount {
            amount,
            operation: operation.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, id: &AccountId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            id: id.clone(),
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(id: &AccountId) -> Self {
        LedgerError::AccountNotFound { id: id.clone() }
    }
}
