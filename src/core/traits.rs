//! Collaborator contracts for the ledger core
//!
//! These traits are the seams between the mutation/authorization engine and
//! its external collaborators: durable account storage, the append-only
//! transaction history, credential hashing, and bearer-token encoding.
//! In-memory implementations live in [`crate::core::store`] and
//! [`crate::core::log`]; default capability implementations live in
//! [`crate::core::auth`].

use crate::types::{
    Account, AccountId, LedgerError, Role, TransactionDraft, TransactionRecord, TxFilter,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Durable mapping from account identifier to account record
///
/// The store is the single owner of all account records and the mechanism the
/// engine relies on to close the read-check/write race: a mutator passed to
/// `update`/`update_pair` observes a consistent snapshot, and no other update
/// touching any of the same identifiers interleaves with it.
pub trait AccountStore: Send + Sync {
    /// Look up an account by identifier. Pure read, never mutates.
    fn get(&self, id: &AccountId) -> Option<Account>;

    /// Persist a new account, enforcing identifier uniqueness.
    fn insert(&self, account: Account) -> Result<(), LedgerError>;

    /// Atomically mutate a single account record.
    ///
    /// The mutator receives the current record; if it returns an error the
    /// record is left untouched. Returns the committed snapshot.
    fn update<F>(&self, id: &AccountId, f: F) -> Result<Account, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<(), LedgerError>;

    /// Atomically mutate two distinct account records as one section.
    ///
    /// No observer of another `update`/`update_pair` on either identifier may
    /// interleave. The two identifiers must differ. Returns both committed
    /// snapshots in argument order.
    fn update_pair<F>(
        &self,
        first: &AccountId,
        second: &AccountId,
        f: F,
    ) -> Result<(Account, Account), LedgerError>
    where
        F: FnOnce(&mut Account, &mut Account) -> Result<(), LedgerError>;

    /// Snapshot of every account, sorted by identifier.
    fn all(&self) -> Vec<Account>;
}

/// Failure to append to the transaction log
///
/// Deliberately not a `LedgerError`: by the time an append can fail the
/// balance mutation has already committed, so the engine downgrades this to a
/// durability warning on the result instead of rejecting the operation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("transaction log append failed: {reason}")]
pub struct LogAppendError {
    pub reason: String,
}

/// Append-only durable sequence of completed ledger movements
pub trait TransactionLog: Send + Sync {
    /// Append a completed movement, assigning its identifier and timestamp.
    ///
    /// Identifiers are unique and monotonic; insertion order is commit order.
    fn append(&self, draft: TransactionDraft) -> Result<TransactionRecord, LogAppendError>;

    /// Retrieve entries matching the filter, in insertion order.
    ///
    /// Non-destructive; repeated calls with the same filter return identical
    /// results absent intervening appends.
    fn query(&self, filter: &TxFilter) -> Vec<TransactionRecord>;
}

/// Opaque credential hashing capability
pub trait PasswordHasher: Send + Sync {
    /// Hash a secret for storage.
    fn hash(&self, secret: &str) -> String;

    /// Check a secret against a stored hash.
    fn verify(&self, secret: &str, stored: &str) -> bool;
}

/// Claims carried by a session token once decoded and verified
///
/// Structural validity (signature, expiry) is the verifier's concern; whether
/// the token is the *currently bound* session for its subject is checked
/// separately by the `AuthGate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject identifier (account id, or the admin namespace)
    pub sub: String,
    /// Role the token was issued under
    pub role: Role,
    /// Random token id, so two tokens for the same subject never collide
    pub jti: String,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

/// Opaque bearer-token issuance capability
pub trait TokenIssuer: Send + Sync {
    /// Issue a fresh token for the subject under the given role.
    fn issue(&self, subject: &str, role: Role) -> Result<String, LedgerError>;
}

/// Opaque bearer-token verification capability
pub trait TokenVerifier: Send + Sync {
    /// Verify a raw token structurally and return its claims.
    ///
    /// Fails with `InvalidToken` on malformed/forged input and `ExpiredToken`
    /// past expiry. Staleness is out of scope here.
    fn verify(&self, raw: &str) -> Result<SessionClaims, LedgerError>;
}
