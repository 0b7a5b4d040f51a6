//! Adjacency-list index over transactions
//!
//! The `TransactionGraph` maps each sender's user ID to the ordered list of
//! transactions it sent. It is a directed multigraph: parallel edges between
//! the same pair of users and self-loops are both kept as-is.
//!
//! # Trade-offs
//!
//! Only the forward direction is indexed. Incoming-edge queries scan every
//! adjacency list, which is O(total edges); this is fine for an in-memory
//! ledger and keeps inserts to a single append.

use crate::types::{Transaction, User, UserId};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// Directed transaction graph keyed by sender ID
#[derive(Debug, Default)]
pub struct TransactionGraph {
    /// Sender ID -> outgoing transactions, in insertion order
    adjacency: HashMap<UserId, Vec<Arc<Transaction>>>,
}

impl TransactionGraph {
    pub fn new() -> Self {
        TransactionGraph {
            adjacency: HashMap::new(),
        }
    }

    /// Append a transaction to the sender's outgoing list
    ///
    /// Pure append: parallel edges are not merged and the transaction's own
    /// sender is not checked against `sender_id`. Callers keep the two in
    /// agreement.
    pub fn add_edge(&mut self, sender_id: &str, tx: Arc<Transaction>) {
        self.adjacency
            .entry(sender_id.to_string())
            .or_default()
            .push(tx);
    }

    /// Remove the edge carrying the given transaction ID
    ///
    /// Returns whether an edge was removed. A sender left without edges is
    /// dropped from the index.
    pub fn remove_edge(&mut self, sender_id: &str, tx_id: &str) -> bool {
        let Some(edges) = self.adjacency.get_mut(sender_id) else {
            return false;
        };

        let before = edges.len();
        edges.retain(|tx| tx.id != tx_id);
        let removed = edges.len() != before;

        if edges.is_empty() {
            self.adjacency.remove(sender_id);
        }
        removed
    }

    /// Outgoing transactions of a user, in insertion order
    ///
    /// A user without outgoing edges yields an empty vector.
    pub fn get_out_transactions(&self, user_id: &str) -> Vec<Arc<Transaction>> {
        self.adjacency.get(user_id).cloned().unwrap_or_default()
    }

    /// Incoming transactions of a user
    ///
    /// Full scan over every adjacency list, selecting edges whose recipient
    /// matches. Edges of one sender keep their insertion order; the order
    /// between senders is unspecified.
    pub fn get_in_transactions(&self, user_id: &str) -> Vec<Arc<Transaction>> {
        self.adjacency
            .values()
            .flatten()
            .filter(|tx| tx.to.id == user_id)
            .cloned()
            .collect()
    }

    /// Distinct counterparties reached through the user's outgoing transactions
    ///
    /// Deduplicated by user ID, order unspecified. A self-loop makes the user
    /// its own neighbour.
    pub fn get_neighbours(&self, user_id: &str) -> Vec<User> {
        let Some(edges) = self.adjacency.get(user_id) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut neighbours = Vec::new();
        for tx in edges {
            if seen.insert(tx.to.id.as_str()) {
                neighbours.push(tx.to.clone());
            }
        }
        neighbours
    }

    /// Every sender with its outgoing transactions
    ///
    /// This is the edge-listing view consumed by the cycle detector.
    pub fn adjacency(&self) -> impl Iterator<Item = (&UserId, &[Arc<Transaction>])> {
        self.adjacency
            .iter()
            .map(|(sender, edges)| (sender, edges.as_slice()))
    }

    /// Every user ID that appears as a sender or a recipient, sorted
    pub fn users(&self) -> BTreeSet<&UserId> {
        let mut users = BTreeSet::new();
        for (sender, edges) in &self.adjacency {
            users.insert(sender);
            users.extend(edges.iter().map(|tx| &tx.to.id));
        }
        users
    }

    /// Total number of edges, parallel edges counted separately
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Number of users with at least one outgoing edge
    pub fn sender_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}
