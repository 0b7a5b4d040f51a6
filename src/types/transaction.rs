//! Transaction-related types for the transaction ledger
//!
//! This module defines the immutable transfer record stored by the ledger and
//! the raw transfer row produced by the CSV readers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::user::{User, UserId};

/// Transaction identifier
///
/// Opaque, globally unique string. IDs are never reused, even after the
/// transaction has been deleted from the store.
pub type TransactionId = String;

/// A directed transfer between two users
///
/// A transaction is an edge of the transaction graph, directed from `from`
/// (the sender) to `to` (the recipient). Transactions are immutable once
/// created: the ledger shares one `Arc<Transaction>` between the
/// transaction store and the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: TransactionId,

    /// Snapshot of the sending user
    pub from: User,

    /// Snapshot of the receiving user
    pub to: User,

    /// Transferred amount (never negative)
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,

    /// Creation time, serialized as RFC 3339
    pub at: DateTime<Utc>,
}

impl Transaction {
    /// Whether the user is the sender or the recipient of this transaction
    pub fn involves(&self, user_id: &str) -> bool {
        self.from.id == user_id || self.to.id == user_id
    }

    /// Sender and recipient are the same user
    ///
    /// Self-loops are structurally allowed and show up as cycles of length one.
    pub fn is_self_loop(&self) -> bool {
        self.from.id == self.to.id
    }

    pub fn sender_id(&self) -> &UserId {
        &self.from.id
    }

    pub fn recipient_id(&self) -> &UserId {
        &self.to.id
    }
}

/// Input transfer row from CSV
///
/// Users are referenced by display name; the importer resolves names to
/// ledger users, creating them on first sight.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRecord {
    /// Name of the sending user
    pub from: String,

    /// Name of the receiving user
    pub to: String,

    /// Amount to transfer
    pub amount: Decimal,
}
