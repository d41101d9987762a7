//! CSV format handling for ledger commands and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to ledger commands
//! - Asset snapshot and history serialization
//!
//! All functions are pure (no I/O beyond the supplied writer) for easy testing.

use crate::core::HistoryEntry;
use crate::types::{Asset, BalanceUpdate, LedgerCommand, NewAsset, TransactionType};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the input columns `op,msisdn,dealer,mpin,amount,type,remarks`.
/// Everything after `msisdn` is optional at this level; which fields an
/// operation needs is checked by [`convert_csv_record`].
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub op: String,
    pub msisdn: String,
    pub dealer: Option<String>,
    pub mpin: Option<String>,
    pub amount: Option<String>,
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    pub remarks: Option<String>,
}

/// Convert a CsvRecord to a LedgerCommand
///
/// This function:
/// - Parses the operation (`create` / `update`, case-insensitive)
/// - Parses the amount into a Decimal
/// - Parses the transaction type for updates (case-insensitive)
///
/// Blank dealer ids and PINs are passed through; rejecting them is the
/// engine's job.
///
/// # Returns
///
/// * `Ok(LedgerCommand)` - Successfully converted record
/// * `Err(String)` - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<LedgerCommand, String> {
    let CsvRecord {
        op,
        msisdn,
        dealer,
        mpin,
        amount,
        tx_type,
        remarks,
    } = csv_record;

    let amount = match non_blank(amount) {
        Some(amount_str) => Some(
            Decimal::from_str(&amount_str)
                .map_err(|_| format!("Invalid amount '{}' for msisdn {}", amount_str, msisdn))?,
        ),
        None => None,
    };

    match op.to_lowercase().as_str() {
        "create" => {
            let initial_balance =
                amount.ok_or_else(|| format!("create for msisdn {} requires an amount", msisdn))?;
            Ok(LedgerCommand::Create(NewAsset {
                dealer_id: dealer.unwrap_or_default(),
                identifier: msisdn,
                secret: mpin.unwrap_or_default(),
                initial_balance,
            }))
        }
        "update" => {
            let amount =
                amount.ok_or_else(|| format!("update for msisdn {} requires an amount", msisdn))?;
            let type_str = non_blank(tx_type)
                .ok_or_else(|| format!("update for msisdn {} requires a type", msisdn))?;
            let tx_type = TransactionType::from_str(&type_str.to_uppercase()).map_err(|_| {
                format!(
                    "Invalid transaction type '{}' for msisdn {}",
                    type_str, msisdn
                )
            })?;
            Ok(LedgerCommand::Update(BalanceUpdate {
                identifier: msisdn,
                secret: mpin.unwrap_or_default(),
                amount,
                tx_type,
                remarks: remarks.unwrap_or_default(),
            }))
        }
        _ => Err(format!("Invalid operation '{}' for msisdn {}", op, msisdn)),
    }
}

fn non_blank(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Write the asset snapshot in CSV format
///
/// Columns: msisdn, dealer, balance, status, last_type, last_amount, remarks.
/// Assets are sorted by identifier for deterministic output.
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_assets_csv(assets: &[Asset], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record([
            "msisdn",
            "dealer",
            "balance",
            "status",
            "last_type",
            "last_amount",
            "remarks",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_assets: Vec<&Asset> = assets.iter().collect();
    sorted_assets.sort_by(|a, b| a.identifier.cmp(&b.identifier));

    for asset in sorted_assets {
        let balance = format!("{:.4}", asset.balance);
        let last_amount = format!("{:.4}", asset.last_transaction_amount);
        writer
            .write_record([
                asset.identifier.as_str(),
                asset.dealer_id.as_str(),
                balance.as_str(),
                asset.status.as_str(),
                asset.last_transaction_type.as_str(),
                last_amount.as_str(),
                asset.last_transaction_remarks.as_str(),
            ])
            .map_err(|e| format!("Failed to write asset record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write one asset's history in CSV format, oldest first
///
/// Columns: version, type, amount, balance, remarks.
pub fn write_history_csv(entries: &[HistoryEntry], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["version", "type", "amount", "balance", "remarks"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for entry in entries {
        let asset = &entry.asset;
        let version = entry.version.to_string();
        let amount = format!("{:.4}", asset.last_transaction_amount);
        let balance = format!("{:.4}", asset.balance);
        writer
            .write_record([
                version.as_str(),
                asset.last_transaction_type.as_str(),
                amount.as_str(),
                balance.as_str(),
                asset.last_transaction_remarks.as_str(),
            ])
            .map_err(|e| format!("Failed to write history record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
