//! Account creation, lookup, and credential authentication

use crate::core::config::LedgerConfig;
use crate::core::traits::{AccountStore, PasswordHasher};
use crate::types::{Account, AccountId, LedgerError};
use std::sync::Arc;

/// Account registry: enforces identifier syntax, credential policy, and
/// identifier uniqueness
pub struct AccountRegistry<S, H> {
    store: Arc<S>,
    hasher: Arc<H>,
    config: LedgerConfig,
}

impl<S, H> AccountRegistry<S, H>
where
    S: AccountStore,
    H: PasswordHasher,
{
    pub fn new(store: Arc<S>, hasher: Arc<H>, config: LedgerConfig) -> Self {
        AccountRegistry {
            store,
            hasher,
            config,
        }
    }

    /// Create a new standard account
    ///
    /// The identifier must be alphanumeric/underscore within the configured
    /// length bounds; the credential must meet the minimum length. Uniqueness
    /// is enforced by the store's insert. The new account starts with the
    /// configured balance and no active session.
    pub fn create(
        &self,
        identifier: &str,
        credential: &str,
        display_name: Option<String>,
    ) -> Result<Account, LedgerError> {
        self.validate_identifier(identifier)?;
        if credential.len() < self.config.min_credential_len {
            return Err(LedgerError::WeakCredential {
                min_len: self.config.min_credential_len,
            });
        }

        let account = Account::new(
            AccountId::from(identifier),
            self.hasher.hash(credential),
            display_name,
            self.config.starting_balance,
        );
        self.store.insert(account.clone())?;
        tracing::info!(account = %account.id, "account created");
        Ok(account)
    }

    /// Look up an account by identifier. No side effects.
    pub fn find(&self, identifier: &AccountId) -> Option<Account> {
        self.store.get(identifier)
    }

    /// Authenticate an identifier/credential pair
    ///
    /// Returns one generic failure whether the identifier is unknown or the
    /// credential is wrong, so callers cannot probe for registered names.
    pub fn authenticate(
        &self,
        identifier: &AccountId,
        credential: &str,
    ) -> Result<Account, LedgerError> {
        let account = self
            .store
            .get(identifier)
            .ok_or(LedgerError::InvalidCredentials)?;
        if !self.hasher.verify(credential, &account.credential_hash) {
            return Err(LedgerError::InvalidCredentials);
        }
        Ok(account)
    }

    fn validate_identifier(&self, identifier: &str) -> Result<(), LedgerError> {
        let valid_length = (self.config.min_identifier_len..=self.config.max_identifier_len)
            .contains(&identifier.len());
        let valid_chars = identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_length || !valid_chars {
            return Err(LedgerError::InvalidIdentifier {
                id: identifier.to_string(),
                min_len: self.config.min_identifier_len,
                max_len: self.config.max_identifier_len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::Sha256Hasher;
    use crate::core::store::MemoryStore;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn registry() -> AccountRegistry<MemoryStore, Sha256Hasher> {
        AccountRegistry::new(
            Arc::new(MemoryStore::new()),
            Arc::new(Sha256Hasher),
            LedgerConfig::default(),
        )
    }

    #[test]
    fn test_create_persists_account_with_default_balance() {
        let registry = registry();

        let account = registry
            .create("alice", "correcthorse", Some("Alice".to_string()))
            .unwrap();

        assert_eq!(account.balance, Decimal::ZERO);
        assert!(account.session.is_none());
        let found = registry.find(&AccountId::from("alice")).unwrap();
        assert_eq!(found, account);
    }

    #[test]
    fn test_create_honors_configured_starting_grant() {
        let config = LedgerConfig {
            starting_balance: Decimal::new(1_000_000, 4),
            ..LedgerConfig::default()
        };
        let registry = AccountRegistry::new(
            Arc::new(MemoryStore::new()),
            Arc::new(Sha256Hasher),
            config,
        );

        let account = registry.create("alice", "correcthorse", None).unwrap();
        assert_eq!(account.balance, Decimal::new(1_000_000, 4));
    }

    #[test]
    fn test_create_duplicate_identifier_rejected() {
        let registry = registry();
        registry.create("alice", "correcthorse", None).unwrap();

        let result = registry.create("alice", "othersecret", None);

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::DuplicateIdentifier { .. }
        ));
    }

    #[rstest]
    #[case::too_short("al")]
    #[case::too_long("a_very_long_identifier_that_exceeds_the_limit")]
    #[case::bad_chars("al!ce")]
    #[case::whitespace("al ce")]
    #[case::empty("")]
    fn test_create_invalid_identifier_rejected(#[case] identifier: &str) {
        let registry = registry();

        let result = registry.create(identifier, "correcthorse", None);

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::InvalidIdentifier { .. }
        ));
    }

    #[test]
    fn test_create_weak_credential_rejected() {
        let registry = registry();

        let result = registry.create("alice", "short", None);

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::WeakCredential { min_len: 8 }
        ));
        // Nothing persisted
        assert!(registry.find(&AccountId::from("alice")).is_none());
    }

    #[test]
    fn test_authenticate_success() {
        let registry = registry();
        registry.create("alice", "correcthorse", None).unwrap();

        let account = registry
            .authenticate(&AccountId::from("alice"), "correcthorse")
            .unwrap();
        assert_eq!(account.id.as_str(), "alice");
    }

    #[test]
    fn test_authenticate_failures_are_indistinguishable() {
        let registry = registry();
        registry.create("alice", "correcthorse", None).unwrap();

        let wrong_credential = registry
            .authenticate(&AccountId::from("alice"), "wrongsecret")
            .unwrap_err();
        let unknown_identifier = registry
            .authenticate(&AccountId::from("ghost"), "correcthorse")
            .unwrap_err();

        assert_eq!(wrong_credential, LedgerError::InvalidCredentials);
        assert_eq!(unknown_identifier, LedgerError::InvalidCredentials);
    }

    #[test]
    fn test_find_never_mutates() {
        let registry = registry();
        registry.create("alice", "correcthorse", None).unwrap();

        let first = registry.find(&AccountId::from("alice"));
        let second = registry.find(&AccountId::from("alice"));
        assert_eq!(first, second);
        assert!(registry.find(&AccountId::from("ghost")).is_none());
    }
}
