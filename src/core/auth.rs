//! Bearer-credential resolution and session management
//!
//! The `AuthGate` turns a raw bearer token into a [`Principal`] or a typed
//! rejection. Token encoding and credential hashing are capabilities behind
//! the traits in [`crate::core::traits`]; the provided implementations are
//! [`JwtTokens`] (HS256 signed tokens with expiry) and [`Sha256Hasher`]
//! (salted SHA-256).
//!
//! Staleness is the gate's own concern: a token that verifies structurally is
//! still rejected unless it is the session currently bound to its identity.

use crate::core::traits::{PasswordHasher, SessionClaims, TokenIssuer, TokenVerifier};
use crate::core::AccountStore;
use crate::types::{Account, AccountId, AdminRecord, LedgerError, Role};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex, PoisonError};

/// Resolved identity of a request
///
/// Ephemeral: derived per request from a token, never persisted beyond the
/// session token stored on the account or admin record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// Standard session bound to exactly one account
    Account(AccountId),
    /// Administrator session bound to the admin singleton
    Admin,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin)
    }

    /// The bound account id, if this is a standard principal
    pub fn account(&self) -> Option<&AccountId> {
        match self {
            Principal::Account(id) => Some(id),
            Principal::Admin => None,
        }
    }
}

/// Salted SHA-256 credential hashing
///
/// Stored form is `hex(salt)$hex(sha256(salt || secret))` with a random
/// 16-byte salt per credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    fn digest(salt: &[u8], secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl PasswordHasher for Sha256Hasher {
    fn hash(&self, secret: &str) -> String {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        format!("{}${}", hex::encode(salt), Self::digest(&salt, secret))
    }

    fn verify(&self, secret: &str, stored: &str) -> bool {
        let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
            return false;
        };
        let Ok(salt) = hex::decode(salt_hex) else {
            return false;
        };
        Self::digest(&salt, secret) == digest_hex
    }
}

/// HS256-signed session tokens with expiry
pub struct JwtTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtTokens {
    pub fn new(secret: &[u8], ttl_hours: i64) -> Self {
        JwtTokens {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::hours(ttl_hours),
        }
    }
}

impl TokenIssuer for JwtTokens {
    fn issue(&self, subject: &str, role: Role) -> Result<String, LedgerError> {
        let now = Utc::now();
        let mut jti = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut jti);
        let claims = SessionClaims {
            sub: subject.to_string(),
            role,
            jti: hex::encode(jti),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| LedgerError::InvalidToken)
    }
}

impl TokenVerifier for JwtTokens {
    fn verify(&self, raw: &str) -> Result<SessionClaims, LedgerError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<SessionClaims>(raw, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => LedgerError::ExpiredToken,
                _ => LedgerError::InvalidToken,
            })
    }
}

/// Subject name carried by admin tokens; not a valid account identifier
/// namespace clash since admin sessions are resolved by role, not subject.
const ADMIN_SUBJECT: &str = "admin";

/// Validates bearer credentials and manages active sessions
///
/// One session per identity: issuing a new token replaces the one bound to
/// the account (or admin record), and the superseded token resolves to
/// `StaleToken` from then on.
pub struct AuthGate<S, T, H> {
    store: Arc<S>,
    tokens: T,
    hasher: Arc<H>,
    admin: Mutex<AdminRecord>,
}

impl<S, T, H> AuthGate<S, T, H>
where
    S: AccountStore,
    T: TokenIssuer + TokenVerifier,
    H: PasswordHasher,
{
    pub fn new(store: Arc<S>, tokens: T, hasher: Arc<H>, admin: AdminRecord) -> Self {
        AuthGate {
            store,
            tokens,
            hasher,
            admin: Mutex::new(admin),
        }
    }

    /// Issue a fresh session token for an account, replacing any prior one
    pub fn issue_session(&self, account: &Account) -> Result<String, LedgerError> {
        let token = self.tokens.issue(account.id.as_str(), account.role)?;
        self.store.update(&account.id, |acct| {
            acct.session = Some(token.clone());
            Ok(())
        })?;
        tracing::debug!(account = %account.id, "session issued");
        Ok(token)
    }

    /// Authenticate the admin credential and issue an admin session token
    pub fn issue_admin_session(&self, credential: &str) -> Result<String, LedgerError> {
        let mut admin = self.admin.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.hasher.verify(credential, &admin.credential_hash) {
            return Err(LedgerError::InvalidCredentials);
        }
        let token = self.tokens.issue(ADMIN_SUBJECT, Role::Administrator)?;
        admin.session = Some(token.clone());
        tracing::debug!("admin session issued");
        Ok(token)
    }

    /// Resolve a raw bearer token into a principal
    ///
    /// Verification order: presence, structure/signature, expiry (all from
    /// the verifier), then the explicit staleness check against the currently
    /// bound session.
    pub fn resolve(&self, raw: Option<&str>) -> Result<Principal, LedgerError> {
        let raw = raw.ok_or(LedgerError::MissingToken)?;
        let claims = self.tokens.verify(raw)?;

        match claims.role {
            Role::Administrator => {
                let admin = self.admin.lock().unwrap_or_else(PoisonError::into_inner);
                if admin.session.as_deref() != Some(raw) {
                    return Err(LedgerError::StaleToken);
                }
                Ok(Principal::Admin)
            }
            Role::Standard => {
                let id = AccountId::from(claims.sub.as_str());
                // A verified token for an unknown account can only be forged
                // or from another deployment; report it as invalid.
                let account = self.store.get(&id).ok_or(LedgerError::InvalidToken)?;
                if account.session.as_deref() != Some(raw) {
                    return Err(LedgerError::StaleToken);
                }
                Ok(Principal::Account(id))
            }
        }
    }

    /// Gate for administrative operations
    pub fn require_admin(&self, principal: &Principal) -> Result<(), LedgerError> {
        if principal.is_admin() {
            Ok(())
        } else {
            Err(LedgerError::Forbidden)
        }
    }

    /// Snapshot of the admin record, for persistence by the transport layer
    pub fn admin_record(&self) -> AdminRecord {
        self.admin
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
