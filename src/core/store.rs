//! In-memory account store with per-account atomic sections
//!
//! `MemoryStore` keeps all account records in a `DashMap` and serializes
//! writers through a per-account lock table. Single-record updates take one
//! lock; pair updates take both locks in lexicographic identifier order, so
//! two concurrent transfers over the same pair of accounts in opposite
//! directions cannot deadlock. Readers never block behind the lock table:
//! `get` returns a committed snapshot.

use crate::core::traits::AccountStore;
use crate::types::{Account, AccountId, LedgerError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Thread-safe in-memory account store
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Committed account records, keyed by identifier
    accounts: DashMap<AccountId, Account>,

    /// One writer lock per account identifier
    ///
    /// Kept separate from the record map so a mutator can run while holding
    /// only its own account locks, never a map shard lock.
    locks: DashMap<AccountId, Arc<Mutex<()>>>,
}

fn relock<'a, T>(
    result: Result<MutexGuard<'a, T>, PoisonError<MutexGuard<'a, T>>>,
) -> MutexGuard<'a, T> {
    // A poisoned writer lock only means a mutator panicked; the committed
    // record map is still consistent, so keep serving.
    result.unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing account records
    pub fn with_accounts<I>(accounts: I) -> Self
    where
        I: IntoIterator<Item = Account>,
    {
        let store = Self::new();
        for account in accounts {
            store.accounts.insert(account.id.clone(), account);
        }
        store
    }

    fn lock_for(&self, id: &AccountId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl AccountStore for MemoryStore {
    fn get(&self, id: &AccountId) -> Option<Account> {
        self.accounts.get(id).map(|entry| entry.value().clone())
    }

    fn insert(&self, account: Account) -> Result<(), LedgerError> {
        match self.accounts.entry(account.id.clone()) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateIdentifier {
                id: account.id.clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(account);
                Ok(())
            }
        }
    }

    fn update<F>(&self, id: &AccountId, f: F) -> Result<Account, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<(), LedgerError>,
    {
        let lock = self.lock_for(id);
        let _guard = relock(lock.lock());

        let mut snapshot = self.get(id).ok_or_else(|| LedgerError::account_not_found(id))?;
        f(&mut snapshot)?;
        self.accounts.insert(id.clone(), snapshot.clone());
        Ok(snapshot)
    }

    fn update_pair<F>(
        &self,
        first: &AccountId,
        second: &AccountId,
        f: F,
    ) -> Result<(Account, Account), LedgerError>
    where
        F: FnOnce(&mut Account, &mut Account) -> Result<(), LedgerError>,
    {
        debug_assert!(first != second, "update_pair requires distinct identifiers");

        // Stable acquisition order regardless of transfer direction.
        let (lo, hi) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        let lo_lock = self.lock_for(lo);
        let hi_lock = self.lock_for(hi);
        let _lo_guard = relock(lo_lock.lock());
        let _hi_guard = relock(hi_lock.lock());

        let mut first_snapshot = self
            .get(first)
            .ok_or_else(|| LedgerError::account_not_found(first))?;
        let mut second_snapshot = self
            .get(second)
            .ok_or_else(|| LedgerError::account_not_found(second))?;

        f(&mut first_snapshot, &mut second_snapshot)?;

        self.accounts
            .insert(first.clone(), first_snapshot.clone());
        self.accounts
            .insert(second.clone(), second_snapshot.clone());
        Ok((first_snapshot, second_snapshot))
    }

    fn all(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        accounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn account(id: &str, balance: i64) -> Account {
        Account::new(
            AccountId::from(id),
            "hash".to_string(),
            None,
            Decimal::new(balance * 10_000, 4),
        )
    }

    #[test]
    fn test_insert_then_get_roundtrips() {
        let store = MemoryStore::new();

        store.insert(account("alice", 100)).unwrap();

        let fetched = store.get(&AccountId::from("alice")).unwrap();
        assert_eq!(fetched.balance, Decimal::new(1_000_000, 4));
    }

    #[test]
    fn test_insert_duplicate_identifier_rejected() {
        let store = MemoryStore::new();
        store.insert(account("alice", 100)).unwrap();

        let result = store.insert(account("alice", 0));

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::DuplicateIdentifier { .. }
        ));
        // Original record untouched
        let fetched = store.get(&AccountId::from("alice")).unwrap();
        assert_eq!(fetched.balance, Decimal::new(1_000_000, 4));
    }

    #[test]
    fn test_get_unknown_returns_none() {
        let store = MemoryStore::new();
        assert!(store.get(&AccountId::from("ghost")).is_none());
    }

    #[test]
    fn test_get_is_idempotent() {
        let store = MemoryStore::new();
        store.insert(account("alice", 5)).unwrap();

        let first = store.get(&AccountId::from("alice"));
        let second = store.get(&AccountId::from("alice"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_update_commits_mutation() {
        let store = MemoryStore::new();
        store.insert(account("alice", 100)).unwrap();

        let committed = store
            .update(&AccountId::from("alice"), |acct| {
                acct.balance = Decimal::new(700_000, 4);
                Ok(())
            })
            .unwrap();

        assert_eq!(committed.balance, Decimal::new(700_000, 4));
        assert_eq!(
            store.get(&AccountId::from("alice")).unwrap().balance,
            Decimal::new(700_000, 4)
        );
    }

    #[test]
    fn test_update_rejection_leaves_record_untouched() {
        let store = MemoryStore::new();
        store.insert(account("alice", 100)).unwrap();

        let result = store.update(&AccountId::from("alice"), |acct| {
            acct.balance = Decimal::ZERO;
            Err(LedgerError::Forbidden)
        });

        assert_eq!(result.unwrap_err(), LedgerError::Forbidden);
        assert_eq!(
            store.get(&AccountId::from("alice")).unwrap().balance,
            Decimal::new(1_000_000, 4)
        );
    }

    #[test]
    fn test_update_unknown_account() {
        let store = MemoryStore::new();

        let result = store.update(&AccountId::from("ghost"), |_| Ok(()));

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::AccountNotFound { .. }
        ));
    }

    #[test]
    fn test_update_pair_commits_both_or_neither() {
        let store = MemoryStore::new();
        store.insert(account("alice", 100)).unwrap();
        store.insert(account("bob", 0)).unwrap();

        let amount = Decimal::new(300_000, 4);
        store
            .update_pair(&AccountId::from("alice"), &AccountId::from("bob"), |a, b| {
                a.balance -= amount;
                b.balance += amount;
                Ok(())
            })
            .unwrap();

        assert_eq!(
            store.get(&AccountId::from("alice")).unwrap().balance,
            Decimal::new(700_000, 4)
        );
        assert_eq!(
            store.get(&AccountId::from("bob")).unwrap().balance,
            Decimal::new(300_000, 4)
        );

        // Rejected section: neither side moves
        let result =
            store.update_pair(&AccountId::from("alice"), &AccountId::from("bob"), |a, b| {
                a.balance = Decimal::ZERO;
                b.balance = Decimal::ZERO;
                Err(LedgerError::Forbidden)
            });
        assert!(result.is_err());
        assert_eq!(
            store.get(&AccountId::from("alice")).unwrap().balance,
            Decimal::new(700_000, 4)
        );
        assert_eq!(
            store.get(&AccountId::from("bob")).unwrap().balance,
            Decimal::new(300_000, 4)
        );
    }

    #[test]
    fn test_update_pair_missing_side_fails_whole_section() {
        let store = MemoryStore::new();
        store.insert(account("alice", 100)).unwrap();

        let result = store.update_pair(
            &AccountId::from("alice"),
            &AccountId::from("ghost"),
            |a, _| {
                a.balance = Decimal::ZERO;
                Ok(())
            },
        );

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::AccountNotFound { .. }
        ));
        assert_eq!(
            store.get(&AccountId::from("alice")).unwrap().balance,
            Decimal::new(1_000_000, 4)
        );
    }

    #[test]
    fn test_all_returns_sorted_snapshot() {
        let store = MemoryStore::new();
        store.insert(account("carol", 1)).unwrap();
        store.insert(account("alice", 2)).unwrap();
        store.insert(account("bob", 3)).unwrap();

        let ids: Vec<String> = store.all().iter().map(|a| a.id.to_string()).collect();
        assert_eq!(ids, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_concurrent_opposite_direction_pair_updates() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryStore::new());
        store.insert(account("alice", 1000)).unwrap();
        store.insert(account("bob", 1000)).unwrap();

        let mut handles = vec![];
        for i in 0..50 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let (from, to) = if i % 2 == 0 {
                    ("alice", "bob")
                } else {
                    ("bob", "alice")
                };
                let amount = Decimal::new(10_000, 4);
                store
                    .update_pair(&AccountId::from(from), &AccountId::from(to), |f, t| {
                        f.balance -= amount;
                        t.balance += amount;
                        Ok(())
                    })
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // 25 transfers each way cancel out
        let total: Decimal = store.all().iter().map(|a| a.balance).sum();
        assert_eq!(total, Decimal::new(20_000_000, 4));
        assert_eq!(
            store.get(&AccountId::from("alice")).unwrap().balance,
            Decimal::new(10_000_000, 4)
        );
    }

    #[test]
    fn test_concurrent_single_key_updates_serialize() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryStore::new());
        store.insert(account("alice", 0)).unwrap();

        let mut handles = vec![];
        for _ in 0..100 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                store
                    .update(&AccountId::from("alice"), |acct| {
                        acct.balance += Decimal::new(10_000, 4);
                        Ok(())
                    })
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            store.get(&AccountId::from("alice")).unwrap().balance,
            Decimal::new(1_000_000, 4)
        );
    }
}
