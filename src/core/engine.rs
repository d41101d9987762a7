//! Asset transaction engine
//!
//! This module provides the [`AssetEngine`] that implements every ledger
//! operation as one read-validate-write step inside a single store
//! transaction.
//!
//! The engine enforces business rules such as:
//! - One live record per identifier (creation never upserts)
//! - PIN authentication before any balance mutation
//! - Balance never negative; over-debits are rejected
//! - Non-decreasing `last_updated` across a record's revisions
//!
//! The engine holds no ledger state and never retries. Atomicity and conflict
//! detection belong to the store; retry policy belongs to the caller.

use crate::core::auth::PinVerifier;
use crate::core::clock::SystemClock;
use crate::core::traits::{Clock, RecordStore, Revision, SecretVerifier, StoreTxn};
use crate::types::{
    Asset, BalanceUpdate, LedgerCommand, LedgerError, NewAsset, TransactionType, RECORD_KIND,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

/// One entry of an asset's change history
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Position in the record's revision log, starting at 1
    pub version: u64,

    /// Store-global id of the commit that produced this snapshot
    pub tx_id: u64,

    /// The full record as it was after that commit
    pub asset: Asset,
}

/// Lazy iterator over an asset's history, oldest first
///
/// Revisions are decoded one at a time as the iterator advances.
pub struct AssetHistory<I> {
    key: String,
    revisions: I,
}

impl<I> Iterator for AssetHistory<I>
where
    I: Iterator<Item = Result<Revision, LedgerError>>,
{
    type Item = Result<HistoryEntry, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let revision = self.revisions.next()?;
        Some(revision.and_then(|revision| {
            decode(&self.key, &revision.value).map(|asset| HistoryEntry {
                version: revision.version,
                tx_id: revision.tx_id,
                asset,
            })
        }))
    }
}

/// Minimal view of a stored document, enough to tell its kind
#[derive(Deserialize)]
struct DocumentHeader {
    #[serde(rename = "docType")]
    record_kind: Option<String>,
}

/// Asset transaction engine
///
/// Generic over the record store, the secret check and the time source so
/// each can be substituted independently. `AssetEngine::new` wires the
/// plaintext [`PinVerifier`] and the [`SystemClock`].
///
/// All operations take `&self`; one engine can serve concurrent callers when
/// its parts are `Send + Sync`.
#[derive(Debug)]
pub struct AssetEngine<S, V = PinVerifier, C = SystemClock> {
    store: S,
    verifier: V,
    clock: C,
}

impl<S: RecordStore> AssetEngine<S> {
    /// Create an engine over `store` with the default verifier and clock
    pub fn new(store: S) -> Self {
        Self::with_parts(store, PinVerifier, SystemClock)
    }
}

impl<S, V, C> AssetEngine<S, V, C>
where
    S: RecordStore,
    V: SecretVerifier,
    C: Clock,
{
    /// Create an engine from explicit parts
    pub fn with_parts(store: S, verifier: V, clock: C) -> Self {
        AssetEngine {
            store,
            verifier,
            clock,
        }
    }

    /// The underlying record store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Route a decoded command to the matching operation
    ///
    /// # Returns
    ///
    /// The record as written by the operation.
    pub fn apply(&self, command: &LedgerCommand) -> Result<Asset, LedgerError> {
        match command {
            LedgerCommand::Create(new_asset) => self.create_asset(new_asset.clone()),
            LedgerCommand::Update(update) => self.update_balance(update.clone()),
        }
    }

    /// Create a new asset record
    ///
    /// # Arguments
    ///
    /// * `new_asset` - Dealer, identifier, PIN and opening balance
    ///
    /// # Returns
    ///
    /// * `Ok(Asset)` - The record as written
    /// * `Err(LedgerError)` - If validation fails or the record already exists
    ///
    /// # Errors
    ///
    /// - `Validation` if the identifier, dealer id or PIN is blank
    /// - `Validation` if the opening balance is negative
    /// - `AlreadyExists` if any record is present for the identifier
    /// - `Conflict` if another writer created the record concurrently
    /// - `StoreUnavailable` for store failures
    pub fn create_asset(&self, new_asset: NewAsset) -> Result<Asset, LedgerError> {
        validate_new_asset(&new_asset)?;

        let mut txn = self.store.begin()?;
        if txn.exists(&new_asset.identifier)? {
            debug!(msisdn = %new_asset.identifier, "create rejected: asset exists");
            return Err(LedgerError::already_exists(&new_asset.identifier));
        }

        let asset = Asset::open(new_asset, self.clock.now());
        txn.put(&asset.identifier, encode(&asset)?)?;
        txn.commit()?;

        debug!(
            msisdn = %asset.identifier,
            dealer = %asset.dealer_id,
            balance = %asset.balance,
            "asset created"
        );
        Ok(asset)
    }

    /// Read the current record for `identifier`
    ///
    /// # Errors
    ///
    /// - `NotFound` if no record exists
    /// - `CorruptRecord` if the stored value is not an asset record
    /// - `StoreUnavailable` for store failures
    pub fn read_asset(&self, identifier: &str) -> Result<Asset, LedgerError> {
        let mut txn = self.store.begin()?;
        read_in(&mut txn, identifier)
    }

    /// Apply an authenticated credit or debit
    ///
    /// Checks run in a fixed order: existence, PIN, amount sign, then the
    /// type-specific transition. The first failing check wins and nothing is
    /// written.
    ///
    /// # Arguments
    ///
    /// * `update` - Identifier, PIN, amount, type and remarks
    ///
    /// # Returns
    ///
    /// * `Ok(Asset)` - The updated record as written
    /// * `Err(LedgerError)` - If any check fails or the commit conflicts
    ///
    /// # Errors
    ///
    /// - `NotFound` if no record exists
    /// - `AuthenticationFailed` if the PIN does not match
    /// - `InvalidTransactionType` if the amount is negative or the type is
    ///   not `CREDIT` or `DEBIT`
    /// - `InsufficientBalance` if a debit exceeds the balance
    /// - `ArithmeticOverflow` if a credit leaves the decimal range
    /// - `Conflict` if the record changed concurrently
    pub fn update_balance(&self, update: BalanceUpdate) -> Result<Asset, LedgerError> {
        let mut txn = self.store.begin()?;
        let mut asset = read_in(&mut txn, &update.identifier)?;

        if !self.verifier.verify(&asset.secret, &update.secret) {
            warn!(msisdn = %update.identifier, "balance update rejected: incorrect MPIN");
            return Err(LedgerError::authentication_failed(&update.identifier));
        }

        if update.amount < Decimal::ZERO {
            return Err(LedgerError::negative_amount(
                update.tx_type.as_str(),
                update.amount,
            ));
        }

        let balance = match update.tx_type {
            TransactionType::Debit => {
                if update.amount > asset.balance {
                    debug!(
                        msisdn = %update.identifier,
                        balance = %asset.balance,
                        requested = %update.amount,
                        "debit rejected: insufficient balance"
                    );
                    return Err(LedgerError::insufficient_balance(
                        &update.identifier,
                        asset.balance,
                        update.amount,
                    ));
                }
                asset
                    .balance
                    .checked_sub(update.amount)
                    .ok_or_else(|| LedgerError::arithmetic_overflow("debit", &update.identifier))?
            }
            TransactionType::Credit => asset
                .balance
                .checked_add(update.amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow("credit", &update.identifier))?,
            TransactionType::Create => {
                return Err(LedgerError::invalid_transaction_type(
                    update.tx_type.as_str(),
                ))
            }
        };

        // Never move the timestamp backwards, even if the clock does
        let now = self.clock.now().max(asset.last_updated);

        asset.balance = balance;
        asset.last_transaction_amount = update.amount;
        asset.last_transaction_type = update.tx_type;
        asset.last_transaction_remarks = update.remarks;
        asset.last_updated = now;

        txn.put(&asset.identifier, encode(&asset)?)?;
        txn.commit()?;

        debug!(
            msisdn = %asset.identifier,
            tx_type = %asset.last_transaction_type,
            amount = %asset.last_transaction_amount,
            balance = %asset.balance,
            "balance updated"
        );
        Ok(asset)
    }

    /// Whether a record exists for `identifier`
    pub fn asset_exists(&self, identifier: &str) -> Result<bool, LedgerError> {
        let mut txn = self.store.begin()?;
        txn.exists(identifier)
    }

    /// Lazily iterate over every committed snapshot of `identifier`
    ///
    /// An identifier that was never written yields an empty iterator.
    pub fn asset_history(
        &self,
        identifier: &str,
    ) -> Result<AssetHistory<<S::Txn as StoreTxn>::History>, LedgerError> {
        let mut txn = self.store.begin()?;
        let revisions = txn.history(identifier)?;
        Ok(AssetHistory {
            key: identifier.to_string(),
            revisions,
        })
    }

    /// Collect the history of `identifier` into records, oldest first
    ///
    /// After `n` successful writes this returns exactly `n` records and the
    /// last equals the current [`read_asset`](Self::read_asset) result.
    pub fn get_asset_history(&self, identifier: &str) -> Result<Vec<Asset>, LedgerError> {
        self.asset_history(identifier)?
            .map(|entry| entry.map(|entry| entry.asset))
            .collect()
    }

    /// All current asset records, ordered by identifier
    ///
    /// Documents of other kinds sharing the store are skipped.
    pub fn list_assets(&self) -> Result<Vec<Asset>, LedgerError> {
        let mut txn = self.store.begin()?;
        let mut assets = Vec::new();

        for (key, value) in txn.scan()? {
            let header: DocumentHeader = serde_json::from_slice(&value)
                .map_err(|e| LedgerError::corrupt_record(&key, e.to_string()))?;
            if header.record_kind.as_deref() != Some(RECORD_KIND) {
                continue;
            }
            assets.push(decode(&key, &value)?);
        }

        Ok(assets)
    }
}

fn validate_new_asset(new_asset: &NewAsset) -> Result<(), LedgerError> {
    if new_asset.identifier.trim().is_empty() {
        return Err(LedgerError::validation("msisdn", "must not be empty"));
    }
    if new_asset.dealer_id.trim().is_empty() {
        return Err(LedgerError::validation("dealerId", "must not be empty"));
    }
    if new_asset.secret.trim().is_empty() {
        return Err(LedgerError::validation("mpin", "must not be empty"));
    }
    if new_asset.initial_balance < Decimal::ZERO {
        return Err(LedgerError::validation("balance", "must not be negative"));
    }
    Ok(())
}

fn read_in<T: StoreTxn>(txn: &mut T, identifier: &str) -> Result<Asset, LedgerError> {
    match txn.get(identifier)? {
        Some(bytes) => decode(identifier, &bytes),
        None => Err(LedgerError::not_found(identifier)),
    }
}

fn encode(asset: &Asset) -> Result<Vec<u8>, LedgerError> {
    serde_json::to_vec(asset).map_err(|e| LedgerError::corrupt_record(&asset.identifier, e.to_string()))
}

fn decode(key: &str, bytes: &[u8]) -> Result<Asset, LedgerError> {
    let asset: Asset =
        serde_json::from_slice(bytes).map_err(|e| LedgerError::corrupt_record(key, e.to_string()))?;
    if asset.record_kind != RECORD_KIND {
        return Err(LedgerError::corrupt_record(
            key,
            format!("expected docType '{}', found '{}'", RECORD_KIND, asset.record_kind),
        ));
    }
    Ok(asset)
}
