//! Transaction storage
//!
//! This module provides the TransactionStore component that keeps every
//! recorded transaction keyed by its ID. It supports direct lookup, listing,
//! per-user queries and deletion.
//!
//! # Duplicate Handling
//!
//! If a transaction ID is already present, or belonged to a deleted
//! transaction, the insert is rejected and the store is left unchanged. This
//! is the only guard against duplicate IDs in the store.
//!
//! # Locking
//!
//! The store itself is not synchronized; the [`Ledger`](crate::core::Ledger)
//! keeps it behind a reader-writer lock shared with nobody else, and takes the
//! graph lock alongside it when a transaction is created or deleted.

use crate::types::{Transaction, TransactionId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Transaction store
///
/// Maintains a HashMap of transaction ID to the shared transaction record.
#[derive(Debug, Default)]
pub struct TransactionStore {
    /// Map of transaction ID to stored transaction
    transactions: HashMap<TransactionId, Arc<Transaction>>,
    /// IDs of deleted transactions
    retired: HashSet<TransactionId>,
}

impl TransactionStore {
    /// Create a new empty transaction store
    pub fn new() -> Self {
        TransactionStore {
            transactions: HashMap::new(),
            retired: HashSet::new(),
        }
    }

    /// Store a transaction
    ///
    /// # Returns
    ///
    /// * `true` - The transaction was stored
    /// * `false` - The ID already exists (first occurrence wins) or was deleted
    pub fn add_transaction(&mut self, tx: Arc<Transaction>) -> bool {
        if self.transactions.contains_key(&tx.id) || self.retired.contains(&tx.id) {
            return false;
        }
        self.transactions.insert(tx.id.clone(), tx);
        true
    }

    /// Look up a transaction by ID
    ///
    /// # Returns
    ///
    /// * `Some(Arc<Transaction>)` - If the transaction exists
    /// * `None` - If the transaction ID is not found
    pub fn get_transaction_by_id(&self, id: &str) -> Option<Arc<Transaction>> {
        self.transactions.get(id).cloned()
    }

    /// Every transaction where the user is the sender or the recipient
    ///
    /// The result is unordered.
    pub fn get_transactions_by_user(&self, user_id: &str) -> Vec<Arc<Transaction>> {
        self.transactions
            .values()
            .filter(|tx| tx.involves(user_id))
            .cloned()
            .collect()
    }

    /// Snapshot of all stored transactions, in no particular order
    pub fn list_transactions(&self) -> Vec<Arc<Transaction>> {
        self.transactions.values().cloned().collect()
    }

    /// Remove a transaction if present
    ///
    /// Returns the removed transaction and retires its ID. The graph is not
    /// touched here.
    pub fn delete_transaction(&mut self, id: &str) -> Option<Arc<Transaction>> {
        let tx = self.transactions.remove(id)?;
        self.retired.insert(tx.id.clone());
        Some(tx)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
