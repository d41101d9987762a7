//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `asset`: The persisted asset record and its status
//! - `transaction`: Transaction types, identifiers and engine commands
//! - `error`: Error types for the asset ledger

pub mod asset;
pub mod error;
pub mod transaction;

pub use asset::{Asset, AssetStatus, CREATE_REMARKS, RECORD_KIND};
pub use error::{ErrorKind, LedgerError};
pub use transaction::{
    AssetId, BalanceUpdate, DealerId, LedgerCommand, NewAsset, TransactionType,
};
