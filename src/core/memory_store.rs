//! Thread-safe, versioned in-memory record store
//!
//! This module provides [`MemoryLedger`], an in-process implementation of the
//! [`RecordStore`] contract. Every key owns an append-only revision log; the
//! current value of a key is the last entry of its log.
//!
//! # Design
//!
//! Revision logs live in a `DashMap`, so reads of different keys proceed in
//! parallel without a global lock. Transactions are optimistic:
//!
//! - `get` records the revision it observed in the transaction's read set
//! - `put` buffers the value locally
//! - `commit` takes the commit lock, checks that every key in the read set is
//!   still at the observed revision, and only then appends the buffered values
//!
//! A transaction whose read set went stale fails with `Conflict` and applies
//! nothing. Reads inside a transaction always observe committed state, never
//! the transaction's own buffered writes.
//!
//! # Sharing
//!
//! `MemoryLedger` is a cheap handle around shared state: clones observe and
//! modify the same ledger, which is how the engine and a reporting step share
//! one store.

use crate::core::traits::{RecordStore, Revision, StoreTxn};
use crate::types::LedgerError;
use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

#[derive(Debug)]
struct Shared {
    /// Revision log per key, oldest first
    logs: DashMap<String, Vec<Revision>>,

    /// Serializes read-set validation and apply across committing transactions
    commit_lock: Mutex<()>,

    /// Last assigned commit id
    last_tx_id: AtomicU64,
}

impl Shared {
    fn current_version(&self, key: &str) -> u64 {
        self.logs.get(key).map_or(0, |log| log.len() as u64)
    }
}

/// Shared handle to an in-memory versioned ledger
#[derive(Debug, Clone)]
pub struct MemoryLedger {
    shared: Arc<Shared>,
}

impl MemoryLedger {
    /// Create a new, empty ledger
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                logs: DashMap::new(),
                commit_lock: Mutex::new(()),
                last_tx_id: AtomicU64::new(0),
            }),
        }
    }

    /// Number of committed revisions for `key` (0 if never written)
    pub fn revision_count(&self, key: &str) -> u64 {
        self.shared.current_version(key)
    }

    /// Number of keys holding a value
    pub fn len(&self) -> usize {
        self.shared.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.logs.is_empty()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryLedger {
    type Txn = MemoryTxn;

    fn begin(&self) -> Result<MemoryTxn, LedgerError> {
        Ok(MemoryTxn {
            shared: Arc::clone(&self.shared),
            reads: HashMap::new(),
            writes: BTreeMap::new(),
        })
    }
}

/// Optimistic transaction over a [`MemoryLedger`]
#[derive(Debug)]
pub struct MemoryTxn {
    shared: Arc<Shared>,

    /// Revision observed by the first read of each key
    reads: HashMap<String, u64>,

    /// Buffered values, applied in key order at commit
    writes: BTreeMap<String, Vec<u8>>,
}

/// Snapshot of one key's revision log taken when the history was requested
#[derive(Debug)]
pub struct MemoryHistory {
    revisions: std::vec::IntoIter<Revision>,
}

impl Iterator for MemoryHistory {
    type Item = Result<Revision, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.revisions.next().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.revisions.size_hint()
    }
}

impl StoreTxn for MemoryTxn {
    type History = MemoryHistory;

    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let (version, value) = match self.shared.logs.get(key) {
            Some(log) => (
                log.len() as u64,
                log.last().map(|revision| revision.value.clone()),
            ),
            None => (0, None),
        };

        // The first observation is the one the commit must validate
        self.reads.entry(key.to_string()).or_insert(version);
        trace!(key, version, "read");

        Ok(value)
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn history(&mut self, key: &str) -> Result<MemoryHistory, LedgerError> {
        let revisions = self
            .shared
            .logs
            .get(key)
            .map(|log| log.value().clone())
            .unwrap_or_default();

        Ok(MemoryHistory {
            revisions: revisions.into_iter(),
        })
    }

    fn scan(&mut self) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        let mut entries: Vec<(String, Vec<u8>)> = self
            .shared
            .logs
            .iter()
            .filter_map(|entry| {
                entry
                    .value()
                    .last()
                    .map(|revision| (entry.key().clone(), revision.value.clone()))
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    fn commit(self) -> Result<(), LedgerError> {
        if self.writes.is_empty() {
            return Ok(());
        }

        let _guard = self
            .shared
            .commit_lock
            .lock()
            .map_err(|_| LedgerError::store_unavailable("commit lock poisoned"))?;

        for (key, observed) in &self.reads {
            let current = self.shared.current_version(key);
            if current != *observed {
                debug!(key = %key, observed, current, "commit rejected: stale read");
                return Err(LedgerError::conflict(key));
            }
        }

        let tx_id = self.shared.last_tx_id.fetch_add(1, Ordering::SeqCst) + 1;
        for (key, value) in self.writes {
            let mut log = self.shared.logs.entry(key).or_default();
            let version = log.len() as u64 + 1;
            log.push(Revision {
                version,
                tx_id,
                value,
            });
        }

        trace!(tx_id, "committed");
        Ok(())
    }
}
