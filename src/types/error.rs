//! Error types for the asset ledger
//!
//! This module defines every error an engine operation or a store transaction
//! can produce. Each variant maps to exactly one [`ErrorKind`], which is the
//! stable outcome an adapter translates into its own response code.
//!
//! # Error Categories
//!
//! - **Record Errors**: record already exists, record not found
//! - **Authorization Errors**: PIN mismatch
//! - **Transaction Errors**: insufficient balance, invalid type or negative amount, overflow
//! - **Input Errors**: empty required fields
//! - **Store Errors**: write conflicts, unavailable store, undecodable records
//!
//! Messages never include the secret.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the asset ledger
///
/// All variants are terminal for the operation that produced them. The
/// engine performs no retries; [`LedgerError::is_retryable`] tells a caller
/// which failures are worth re-submitting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// A record already exists for the identifier
    ///
    /// Creation never upserts: presence alone is enough to reject.
    #[error("Asset {identifier} already exists")]
    AlreadyExists {
        /// The identifier that is already taken
        identifier: String,
    },

    /// No record exists for the identifier
    #[error("Asset {identifier} does not exist")]
    NotFound {
        /// The identifier that was looked up
        identifier: String,
    },

    /// The presented PIN does not match the stored one
    #[error("Incorrect MPIN for asset {identifier}")]
    AuthenticationFailed {
        /// The identifier whose PIN check failed
        identifier: String,
    },

    /// A debit asked for more than the current balance
    ///
    /// The record and its history are left untouched.
    #[error("Insufficient balance for asset {identifier}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        /// The identifier of the debited asset
        identifier: String,
        /// Balance at the time of the request
        balance: Decimal,
        /// Requested debit amount
        requested: Decimal,
    },

    /// The transaction is not a valid balance mutation
    ///
    /// Raised for unknown type names, for `CREATE` passed to a balance
    /// update, and for a credit or debit of a negative amount.
    #[error("Invalid transaction type '{tx_type}'")]
    InvalidTransactionType {
        /// The rejected type as supplied by the caller
        tx_type: String,
    },

    /// A required input field is missing or blank
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Crediting would overflow the decimal range
    #[error("Arithmetic overflow in {operation} for asset {identifier}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// The identifier of the affected asset
        identifier: String,
    },

    /// The store detected a concurrent committed write to a key this
    /// transaction read
    #[error("Conflicting concurrent write detected for key {key}")]
    Conflict {
        /// The key whose revision changed under the transaction
        key: String,
    },

    /// Any I/O-level failure reported by the store
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        /// Description reported by the store
        message: String,
    },

    /// A stored value could not be encoded or decoded as an asset record
    #[error("Corrupt record for key {key}: {message}")]
    CorruptRecord {
        /// The key holding the bad value
        key: String,
        /// Codec error description
        message: String,
    },
}

/// Stable, payload-free classification of a [`LedgerError`]
///
/// Adapters match on this to pick a response code without depending on the
/// error's message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AlreadyExists,
    NotFound,
    AuthenticationFailed,
    InsufficientBalance,
    InvalidTransactionType,
    Validation,
    ArithmeticOverflow,
    Conflict,
    StoreUnavailable,
    CorruptRecord,
}

impl LedgerError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::AuthenticationFailed { .. } => ErrorKind::AuthenticationFailed,
            LedgerError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            LedgerError::InvalidTransactionType { .. } => ErrorKind::InvalidTransactionType,
            LedgerError::Validation { .. } => ErrorKind::Validation,
            LedgerError::ArithmeticOverflow { .. } => ErrorKind::ArithmeticOverflow,
            LedgerError::Conflict { .. } => ErrorKind::Conflict,
            LedgerError::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
            LedgerError::CorruptRecord { .. } => ErrorKind::CorruptRecord,
        }
    }

    /// Whether re-submitting the same operation may succeed
    ///
    /// Only write conflicts qualify; every other failure is deterministic
    /// for the same input and state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Conflict { .. })
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an AlreadyExists error
    pub fn already_exists(identifier: &str) -> Self {
        LedgerError::AlreadyExists {
            identifier: identifier.to_string(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(identifier: &str) -> Self {
        LedgerError::NotFound {
            identifier: identifier.to_string(),
        }
    }

    /// Create an AuthenticationFailed error
    pub fn authentication_failed(identifier: &str) -> Self {
        LedgerError::AuthenticationFailed {
            identifier: identifier.to_string(),
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(identifier: &str, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientBalance {
            identifier: identifier.to_string(),
            balance,
            requested,
        }
    }

    /// Create an InvalidTransactionType error
    pub fn invalid_transaction_type(tx_type: &str) -> Self {
        LedgerError::InvalidTransactionType {
            tx_type: tx_type.to_string(),
        }
    }

    /// Create an InvalidTransactionType error for a negative credit or debit
    pub fn negative_amount(tx_type: &str, amount: Decimal) -> Self {
        LedgerError::InvalidTransactionType {
            tx_type: format!("{} of {}", tx_type, amount),
        }
    }

    /// Create a Validation error
    pub fn validation(field: &str, message: &str) -> Self {
        LedgerError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, identifier: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            identifier: identifier.to_string(),
        }
    }

    /// Create a Conflict error
    pub fn conflict(key: &str) -> Self {
        LedgerError::Conflict {
            key: key.to_string(),
        }
    }

    /// Create a StoreUnavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        LedgerError::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Create a CorruptRecord error
    pub fn corrupt_record(key: &str, message: impl Into<String>) -> Self {
        LedgerError::CorruptRecord {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
