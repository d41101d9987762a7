//! Core business logic module
//!
//! This module contains the ledger engine and its collaborators:
//! - `traits` - Store, verifier and clock abstractions the engine is written against
//! - `engine` - Asset operations as atomic read-validate-write steps
//! - `memory_store` - Versioned in-memory store with optimistic commits
//! - `auth` - Constant-time PIN check
//! - `clock` - System time source
//! - `retry` - Caller-side retry of conflicting commands
//! - `async` - Concurrent batch processing

pub mod r#async;
pub mod auth;
pub mod clock;
pub mod engine;
pub mod memory_store;
pub mod retry;
pub mod traits;

pub use auth::PinVerifier;
pub use clock::SystemClock;
pub use engine::{AssetEngine, AssetHistory, HistoryEntry};
pub use memory_store::{MemoryHistory, MemoryLedger, MemoryTxn};
pub use r#async::{BatchProcessor, ProcessingResult};
pub use retry::{apply_with_retry, DEFAULT_MAX_RETRIES};
pub use traits::{Clock, RecordStore, Revision, SecretVerifier, StoreTxn};
