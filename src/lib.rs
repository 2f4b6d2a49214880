//! Bank Ledger Library
//! # Overview
//!
//! A single-ledger balance-transfer service: named accounts with exact
//! decimal balances, authenticated peer-to-peer transfers, privileged
//! administrative adjustment, and an append-only history of every movement.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, TransactionRecord, LedgerError)
//! - [`cli`] - CLI argument parsing and command dispatch
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Transfer/adjust orchestration and atomicity
//!   - [`core::store`] - Concurrent account store with per-key atomic sections
//!   - [`core::log`] - Append-only transaction history
//!   - [`core::registry`] - Account creation, lookup, authentication
//!   - [`core::auth`] - Session tokens, principals, credential hashing
//!
//! # Authorization model
//!
//! Requests carry a bearer token. The [`core::auth::AuthGate`] resolves it to
//! a principal (one account, or the administrator), rejecting missing,
//! invalid, expired, and superseded tokens distinctly. Transfers require the
//! principal bound to the sending account; adjustments require the
//! administrator.
//!
//! # Ledger invariants
//!
//! Balances never go negative in any committed state; transfers conserve the
//! total; the history is append-only and its identifier order is commit
//! order.

pub mod cli;
pub mod core;
pub mod types;

pub use crate::core::{
    AccountRegistry, AccountStore, AuthGate, JwtTokens, LedgerConfig, LedgerEngine,
    LogAppendError, MemoryLog, MemoryStore, PasswordHasher, Principal, Sha256Hasher, TokenIssuer,
    TokenVerifier, TransactionLog,
};
pub use crate::types::{
    Account, AccountId, AdminRecord, ErrorClass, LedgerError, Role, TransactionDraft,
    TransactionId, TransactionRecord, TxFilter, TxKind, TxParty,
};
