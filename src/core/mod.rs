//! Business logic components of the ledger

pub mod auth;
pub mod config;
pub mod engine;
pub mod log;
pub mod registry;
pub mod store;
pub mod traits;

pub use auth::{AuthGate, JwtTokens, Principal, Sha256Hasher};
pub use config::LedgerConfig;
pub use engine::{AdjustResult, LedgerEngine, TransferResult};
pub use log::MemoryLog;
pub use registry::AccountRegistry;
pub use store::MemoryStore;
pub use traits::{
    AccountStore, LogAppendError, PasswordHasher, SessionClaims, TokenIssuer, TokenVerifier,
    TransactionLog,
};
