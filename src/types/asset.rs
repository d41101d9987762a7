//! Asset record types for the asset ledger
//!
//! This module defines the persisted [`Asset`] record and its lifecycle
//! status. Records are stored as JSON using the ledger's established field
//! names (`docType`, `dealerId`, `msisdn`, `mpin`, ...).

use super::transaction::{AssetId, DealerId, NewAsset, TransactionType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator stored in `docType` for asset records
pub const RECORD_KIND: &str = "asset";

/// Remarks written by CreateAsset
pub const CREATE_REMARKS: &str = "Account Created";

/// Lifecycle status of an asset
///
/// Only `ACTIVE` exists; no operation moves a record out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetStatus {
    Active,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Active => "ACTIVE",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Balance-bearing record keyed by its identifier
///
/// The `last_*` fields summarize the most recent mutation and are
/// overwritten on every write.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Always [`RECORD_KIND`] for records written by the engine
    #[serde(rename = "docType")]
    pub record_kind: String,

    /// Issuing/owning party, fixed at creation
    #[serde(rename = "dealerId")]
    pub dealer_id: DealerId,

    /// Unique key of the record
    #[serde(rename = "msisdn")]
    pub identifier: AssetId,

    /// Shared-secret PIN, stored as supplied
    #[serde(rename = "mpin")]
    pub secret: String,

    /// Current balance, never negative
    pub balance: Decimal,

    pub status: AssetStatus,

    #[serde(rename = "transAmount")]
    pub last_transaction_amount: Decimal,

    #[serde(rename = "transType")]
    pub last_transaction_type: TransactionType,

    #[serde(rename = "remarks")]
    pub last_transaction_remarks: String,

    /// Time of the most recent successful write
    ///
    /// Non-decreasing across the record's revisions.
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

impl Asset {
    /// Build the initial record for a CreateAsset operation
    ///
    /// # Arguments
    ///
    /// * `new_asset` - Validated creation arguments
    /// * `now` - Creation timestamp
    ///
    /// # Returns
    ///
    /// An `ACTIVE` record with `CREATE` as its last transaction type, a zero
    /// last amount, and [`CREATE_REMARKS`] as remarks.
    pub fn open(new_asset: NewAsset, now: DateTime<Utc>) -> Self {
        Asset {
            record_kind: RECORD_KIND.to_string(),
            dealer_id: new_asset.dealer_id,
            identifier: new_asset.identifier,
            secret: new_asset.secret,
            balance: new_asset.initial_balance,
            status: AssetStatus::Active,
            last_transaction_amount: Decimal::ZERO,
            last_transaction_type: TransactionType::Create,
            last_transaction_remarks: CREATE_REMARKS.to_string(),
            last_updated: now,
        }
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("record_kind", &self.record_kind)
            .field("dealer_id", &self.dealer_id)
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .field("balance", &self.balance)
            .field("status", &self.status)
            .field("last_transaction_amount", &self.last_transaction_amount)
            .field("last_transaction_type", &self.last_transaction_type)
            .field("last_transaction_remarks", &self.last_transaction_remarks)
            .field("last_updated", &self.last_updated)
            .finish()
    }
}
