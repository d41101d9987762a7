//! Asset Ledger Library
//! # Overview
//!
//! This library keeps prepaid-style asset records on top of a versioned,
//! transactional record store and applies create and balance-update commands
//! from CSV input with either a sync or an async strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Asset, commands, LedgerError)
//! - [`cli`] - CLI arguments parsing and log setup
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Asset operations as atomic read-validate-write steps
//!   - [`core::memory_store`] - Versioned in-memory store with optimistic commits
//!   - [`core::traits`] - Store, secret and clock seams
//!   - [`core::retry`] - Caller-side retry of conflicting commands
//! - [`io`] - CSV input and report output
//! - [`strategy`] - Sync and async processing pipelines
//!
//! # Operations
//!
//! - **CreateAsset**: Open a record with a dealer, PIN and opening balance
//! - **ReadAsset**: Fetch the current record
//! - **UpdateBalance**: PIN-authenticated credit or debit; debits never
//!   overdraw
//! - **GetAssetHistory**: Every committed snapshot of a record, oldest first
//!
//! # Asset Records
//!
//! Each record carries its dealer, PIN, balance and `ACTIVE` status, plus a
//! summary of the last mutation (type, amount, remarks) and a
//! non-decreasing `lastUpdated` timestamp.

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{AssetEngine, MemoryLedger, PinVerifier, SystemClock};
pub use io::{write_assets_csv, write_history_csv};
pub use types::{
    Asset, AssetId, AssetStatus, BalanceUpdate, DealerId, ErrorKind, LedgerCommand, LedgerError,
    NewAsset, TransactionType,
};
