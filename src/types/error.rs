//! Error types for the transaction ledger
//!
//! This module defines all error types that can occur while building or
//! querying the ledger and while importing transfers from CSV.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Parsing Errors**: Malformed CSV, invalid amounts, empty names
//! - **Ledger Errors**: Unknown users, negative amounts, ID collisions
//!
//! Lookups that find nothing are not errors: stores return `Option` for
//! absence and `bool` for rejected inserts.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents an import from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// This is a recoverable error - the malformed row is skipped
    /// and the import continues with the next row.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Amount could not be parsed as a decimal number
    #[error("Invalid amount '{amount}'")]
    InvalidAmount {
        /// The raw amount string
        amount: String,
    },

    /// Transfers never move a negative amount
    #[error("Negative amount {amount} is not allowed")]
    NegativeAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// A transfer row names no sender or no recipient
    #[error("Transfer is missing a {role} name")]
    EmptyName {
        /// "sender" or "recipient"
        role: String,
    },

    /// Sender or recipient is not registered in the user store
    #[error("Unknown {role} {user}")]
    UnknownUser {
        /// "sender" or "recipient"
        role: String,
        /// The user ID that was not found
        user: String,
    },

    /// The ID generator produced an ID that is already taken
    #[error("Duplicate {kind} ID {id}")]
    DuplicateId {
        /// "user" or "transaction"
        kind: String,
        /// The colliding ID
        id: String,
    },

    /// A worker task failed before returning its results
    #[error("Import task failed: {message}")]
    TaskFailed {
        /// Description of the failure
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for LedgerError {
    fn from(error: csv_async::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Create an UnknownUser error
    pub fn unknown_user(role: &str, user: &str) -> Self {
        LedgerError::UnknownUser {
            role: role.to_string(),
            user: user.to_string(),
        }
    }

    /// Create a DuplicateId error
    pub fn duplicate_id(kind: &str, id: &str) -> Self {
        LedgerError::DuplicateId {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }

    /// Create a NegativeAmount error
    pub fn negative_amount(amount: Decimal) -> Self {
        LedgerError::NegativeAmount { amount }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str) -> Self {
        LedgerError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create an EmptyName error
    pub fn empty_name(role: &str) -> Self {
        LedgerError::EmptyName {
            role: role.to_string(),
        }
    }

    /// Create a ParseError carrying a line number
    pub fn parse_error(line: u64, message: impl Into<String>) -> Self {
        LedgerError::ParseError {
            line: Some(line),
            message: message.into(),
        }
    }

    /// Attach a line number to a row-level error
    ///
    /// Errors that already carry a line, and fatal errors, are returned unchanged.
    pub fn at_line(self, line: u64) -> Self {
        match self {
            LedgerError::ParseError { line: None, message } => LedgerError::ParseError {
                line: Some(line),
                message,
            },
            error @ (LedgerError::InvalidAmount { .. }
            | LedgerError::NegativeAmount { .. }
            | LedgerError::EmptyName { .. }) => LedgerError::ParseError {
                line: Some(line),
                message: error.to_string(),
            },
            other => other,
        }
    }
}
