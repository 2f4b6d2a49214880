//! Core data types for the ledger

pub mod account;
pub mod error;
pub mod transaction;

pub use account::{Account, AccountId, AdminRecord, Role};
pub use error::{ErrorClass, LedgerError};
pub use transaction::{
    TransactionDraft, TransactionId, TransactionRecord, TxFilter, TxKind, TxParty,
};
