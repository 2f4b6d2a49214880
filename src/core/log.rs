//! In-memory append-only transaction log
//!
//! Appends serialize behind a single mutex so identifier order, insertion
//! order, and commit order all agree. Entries are immutable once appended and
//! queries are non-destructive.

use crate::core::traits::{LogAppendError, TransactionLog};
use crate::types::{TransactionDraft, TransactionId, TransactionRecord, TxFilter};
use chrono::Utc;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct LogInner {
    entries: Vec<TransactionRecord>,
    next_id: TransactionId,
}

/// Thread-safe in-memory transaction history
#[derive(Debug)]
pub struct MemoryLog {
    inner: Mutex<LogInner>,
}

impl MemoryLog {
    /// Create an empty log; identifiers start at 1
    pub fn new() -> Self {
        MemoryLog {
            inner: Mutex::new(LogInner {
                entries: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a log seeded with existing entries
    ///
    /// The next identifier continues after the highest seeded one, keeping
    /// assignment monotonic across restarts.
    pub fn with_entries(entries: Vec<TransactionRecord>) -> Self {
        let next_id = entries.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        MemoryLog {
            inner: Mutex::new(LogInner { entries, next_id }),
        }
    }

    /// Snapshot of every entry, in insertion order
    pub fn snapshot(&self) -> Vec<TransactionRecord> {
        self.lock().entries.clone()
    }

    fn lock(&self) -> MutexGuard<'_, LogInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionLog for MemoryLog {
    fn append(&self, draft: TransactionDraft) -> Result<TransactionRecord, LogAppendError> {
        let mut inner = self.lock();
        let record = TransactionRecord {
            id: inner.next_id,
            kind: draft.kind,
            from: draft.from,
            to: draft.to,
            amount: draft.amount,
            timestamp: Utc::now(),
        };
        inner.next_id += 1;
        inner.entries.push(record.clone());
        Ok(record)
    }

    fn query(&self, filter: &TxFilter) -> Vec<TransactionRecord> {
        self.lock()
            .entries
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }
}
