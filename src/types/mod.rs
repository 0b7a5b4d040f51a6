//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `user`: User identities
//! - `transaction`: Transaction records, identifiers and import rows
//! - `error`: Error types for the ledger

pub mod error;
pub mod transaction;
pub mod user;

pub use error::LedgerError;
pub use transaction::{Transaction, TransactionId, TransferRecord};
pub use user::{User, UserId};
