//! Transaction-related types for the asset ledger
//!
//! This module defines transaction types and the command records an adapter
//! hands to the engine: [`NewAsset`] for creation and [`BalanceUpdate`] for
//! authenticated credits and debits.

use crate::types::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asset identifier (the subscriber number, MSISDN)
pub type AssetId = String;

/// Identifier of the issuing/owning dealer
pub type DealerId = String;

/// Kind of the most recent mutation applied to an asset
///
/// Serialized in upper case (`CREATE`, `CREDIT`, `DEBIT`), matching the
/// stored record format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Record creation; never valid for a balance update
    Create,

    /// Add funds to the balance
    Credit,

    /// Remove funds from the balance
    ///
    /// Rejected when the amount exceeds the current balance.
    Debit,
}

impl TransactionType {
    /// Wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Create => "CREATE",
            TransactionType::Credit => "CREDIT",
            TransactionType::Debit => "DEBIT",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    /// Parse an exact upper-case wire name
    ///
    /// Anything else is an `InvalidTransactionType` error carrying the
    /// original text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(TransactionType::Create),
            "CREDIT" => Ok(TransactionType::Credit),
            "DEBIT" => Ok(TransactionType::Debit),
            other => Err(LedgerError::invalid_transaction_type(other)),
        }
    }
}

/// Arguments of a CreateAsset operation
#[derive(Clone, PartialEq)]
pub struct NewAsset {
    /// Owning dealer
    pub dealer_id: DealerId,

    /// Unique key of the new record
    pub identifier: AssetId,

    /// PIN required by every later mutation
    pub secret: String,

    /// Opening balance (must not be negative)
    pub initial_balance: Decimal,
}

/// Arguments of an UpdateBalance operation
#[derive(Clone, PartialEq)]
pub struct BalanceUpdate {
    /// Key of the record to mutate
    pub identifier: AssetId,

    /// PIN presented by the caller
    pub secret: String,

    /// Amount to credit or debit (must not be negative)
    pub amount: Decimal,

    /// `Credit` or `Debit`; anything else is rejected
    pub tx_type: TransactionType,

    /// Free-text remarks stored with the mutation
    pub remarks: String,
}

/// A single decoded command for the engine
///
/// This is the unit the command adapter reads from its input and routes
/// through [`crate::core::AssetEngine::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    Create(NewAsset),
    Update(BalanceUpdate),
}

impl LedgerCommand {
    /// Key of the record the command touches
    ///
    /// Used to partition commands so that each asset sees its commands in
    /// input order.
    pub fn identifier(&self) -> &str {
        match self {
            LedgerCommand::Create(new_asset) => &new_asset.identifier,
            LedgerCommand::Update(update) => &update.identifier,
        }
    }
}

impl fmt::Debug for NewAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAsset")
            .field("dealer_id", &self.dealer_id)
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .field("initial_balance", &self.initial_balance)
            .finish()
    }
}

impl fmt::Debug for BalanceUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BalanceUpdate")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .field("amount", &self.amount)
            .field("tx_type", &self.tx_type)
            .field("remarks", &self.remarks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("CREATE", TransactionType::Create)]
    #[case("CREDIT", TransactionType::Credit)]
    #[case("DEBIT", TransactionType::Debit)]
    fn test_parse_known_types(#[case] input: &str, #[case] expected: TransactionType) {
        assert_eq!(input.parse::<TransactionType>().unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[rstest]
    #[case::unknown("REFUND")]
    #[case::lowercase("debit")]
    #[case::empty("")]
    fn test_parse_rejects_other_values(#[case] input: &str) {
        let err = input.parse::<TransactionType>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTransactionType);
        assert_eq!(err, LedgerError::invalid_transaction_type(input));
    }

    #[test]
    fn test_serde_uses_upper_case_names() {
        let json = serde_json::to_string(&TransactionType::Debit).unwrap();
        assert_eq!(json, "\"DEBIT\"");
        let parsed: TransactionType = serde_json::from_str("\"CREDIT\"").unwrap();
        assert_eq!(parsed, TransactionType::Credit);
    }

    #[test]
    fn test_command_identifier() {
        let create = LedgerCommand::Create(NewAsset {
            dealer_id: "D1".to_string(),
            identifier: "111".to_string(),
            secret: "1234".to_string(),
            initial_balance: dec!(10),
        });
        let update = LedgerCommand::Update(BalanceUpdate {
            identifier: "222".to_string(),
            secret: "1234".to_string(),
            amount: dec!(1),
            tx_type: TransactionType::Credit,
            remarks: String::new(),
        });

        assert_eq!(create.identifier(), "111");
        assert_eq!(update.identifier(), "222");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let update = BalanceUpdate {
            identifier: "222".to_string(),
            secret: "s3cr3t-pin".to_string(),
            amount: dec!(1),
            tx_type: TransactionType::Credit,
            remarks: String::new(),
        };

        let rendered = format!("{:?}", LedgerCommand::Update(update));
        assert!(!rendered.contains("s3cr3t-pin"));
        assert!(rendered.contains("<redacted>"));
    }
}
