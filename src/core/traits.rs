//! Core traits for record storage, secret verification and time
//!
//! These are the seams the engine is written against. The engine holds no
//! ledger state itself; everything it reads or writes goes through a
//! [`RecordStore`] transaction, so an in-memory map and a replicated ledger
//! are interchangeable behind the same contract.

use crate::types::LedgerError;
use chrono::{DateTime, Utc};

/// One committed value in a key's revision log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Position in the key's log, starting at 1
    pub version: u64,

    /// Store-global id of the commit that wrote this value
    pub tx_id: u64,

    /// The value as written
    pub value: Vec<u8>,
}

/// Source of transaction contexts
///
/// A store handle is shared across concurrent invocations; all per-operation
/// state lives in the transaction it hands out.
pub trait RecordStore: Send + Sync {
    type Txn: StoreTxn;

    /// Open a new transaction context
    fn begin(&self) -> Result<Self::Txn, LedgerError>;
}

/// A single atomic read-validate-write context
///
/// Reads observe committed state. Writes are buffered and become visible only
/// when [`StoreTxn::commit`] succeeds; dropping the transaction discards them.
pub trait StoreTxn {
    /// Lazy, finite iterator over a key's revisions, oldest first
    type History: Iterator<Item = Result<Revision, LedgerError>>;

    /// Latest committed value for `key`, if any
    ///
    /// The observed revision joins the transaction's read set.
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Buffer `value` as the new value for `key`
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Every committed value ever written for `key`, in write order
    ///
    /// Each call returns a fresh iterator. A key with no writes yields an
    /// empty iterator.
    fn history(&mut self, key: &str) -> Result<Self::History, LedgerError>;

    /// All current values, ordered by key
    fn scan(&mut self) -> Result<Vec<(String, Vec<u8>)>, LedgerError>;

    /// Atomically apply buffered writes
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if a key in the read set was committed by another
    /// transaction after it was read. Nothing is applied in that case.
    fn commit(self) -> Result<(), LedgerError>;

    /// Whether a value is currently present for `key`
    fn exists(&mut self, key: &str) -> Result<bool, LedgerError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Check a presented secret against the stored one
///
/// Kept apart from balance logic so a hashed or external credential check can
/// replace the plaintext comparison without touching the engine.
pub trait SecretVerifier: Send + Sync {
    fn verify(&self, stored: &str, presented: &str) -> bool;
}

/// Source of the current time for record timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
