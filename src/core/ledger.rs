//! Ledger orchestration
//!
//! This module provides the `Ledger`, which composes the user store, the
//! transaction store and the transaction graph, and is the single entry point
//! for creating and deleting transactions.
//!
//! # Architecture
//!
//! ```text
//! Ledger
//!     ├── UserStore                   (DashMap, sharded locks)
//!     ├── RwLock<TransactionStore>    (records by ID)
//!     ├── RwLock<TransactionGraph>    (edges by sender)
//!     ├── Arc<dyn IdGenerator>
//!     └── Arc<dyn Clock>
//! ```
//!
//! # Consistency
//!
//! A transaction is in the store if and only if its edge is in the graph.
//! Creating or deleting a transaction takes the store write lock and then the
//! graph write lock, and releases both only after both structures are
//! updated. Every path that holds both locks acquires them in that order.
//!
//! IDs of deleted users and transactions are retired by their stores and
//! rejected if offered again.
//!
//! Transaction creation requires both counterparties to exist in the user
//! store. Deleting a user does not cascade: transactions that name a deleted
//! user remain and keep their snapshot of it.

use crate::core::cycle::{Cycle, CycleDetector};
use crate::core::graph::TransactionGraph;
use crate::core::traits::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::core::transaction_store::TransactionStore;
use crate::core::user_store::UserStore;
use crate::types::{LedgerError, Transaction, User};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

/// Users, transactions and the graph between them
///
/// Share it across threads behind an `Arc`; every method takes `&self`.
pub struct Ledger {
    users: UserStore,
    transactions: RwLock<TransactionStore>,
    graph: RwLock<TransactionGraph>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    /// Create an empty ledger with UUID identifiers and the system clock
    pub fn new() -> Self {
        Self::with_services(Arc::new(UuidGenerator), Arc::new(SystemClock))
    }

    /// Create an empty ledger with injected ID and time sources
    pub fn with_services(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Ledger {
            users: UserStore::new(),
            transactions: RwLock::new(TransactionStore::new()),
            graph: RwLock::new(TransactionGraph::new()),
            ids,
            clock,
        }
    }

    // ---------------------------------------------------------------------
    // Users
    // ---------------------------------------------------------------------

    /// Register a new user with a freshly generated ID
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if the generator hands out an ID that is
    /// already registered.
    pub fn new_user(&self, name: &str) -> Result<User, LedgerError> {
        let user = User::new(self.ids.generate_id(), name);

        if !self.users.add_user(user.clone()) {
            return Err(LedgerError::duplicate_id("user", &user.id));
        }

        tracing::debug!(user = %user.id, name = %user.name, "user created");
        Ok(user)
    }

    /// Insert a pre-built user; false if the ID is taken
    pub fn add_user(&self, user: User) -> bool {
        self.users.add_user(user)
    }

    pub fn get_user(&self, id: &str) -> Option<User> {
        self.users.get_user(id)
    }

    pub fn list_users(&self) -> Vec<User> {
        self.users.list_users()
    }

    /// Remove a user from the user store
    ///
    /// Transactions that reference the user are kept.
    pub fn delete_user(&self, id: &str) -> Option<User> {
        self.users.delete_user(id)
    }

    // ---------------------------------------------------------------------
    // Transactions
    // ---------------------------------------------------------------------

    /// Record a transfer from `from` to `to`
    ///
    /// Assigns an ID and timestamp, then registers the transaction in the
    /// store and the graph as one atomic step.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is negative
    /// - The sender or the recipient is not registered in the user store
    /// - The generated transaction ID is already taken
    pub fn new_transaction(
        &self,
        from: &User,
        to: &User,
        amount: Decimal,
    ) -> Result<Arc<Transaction>, LedgerError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(LedgerError::negative_amount(amount));
        }
        if !self.users.contains(&from.id) {
            return Err(LedgerError::unknown_user("sender", &from.id));
        }
        if !self.users.contains(&to.id) {
            return Err(LedgerError::unknown_user("recipient", &to.id));
        }

        let tx = Arc::new(Transaction {
            id: self.ids.generate_id(),
            from: from.clone(),
            to: to.clone(),
            amount,
            at: self.clock.now(),
        });

        if !self.add_transaction(Arc::clone(&tx)) {
            return Err(LedgerError::duplicate_id("transaction", &tx.id));
        }

        Ok(tx)
    }

    /// Register a pre-built transaction in the store and the graph
    ///
    /// Both structures are updated under their write locks, held together.
    /// Returns false, changing nothing, if the ID is already stored.
    pub fn add_transaction(&self, tx: Arc<Transaction>) -> bool {
        let mut transactions = self.transactions.write();
        let mut graph = self.graph.write();

        if !transactions.add_transaction(Arc::clone(&tx)) {
            return false;
        }
        graph.add_edge(&tx.from.id, Arc::clone(&tx));

        tracing::debug!(
            tx = %tx.id,
            from = %tx.from.id,
            to = %tx.to.id,
            amount = %tx.amount,
            "transaction recorded"
        );
        true
    }

    pub fn get_transaction_by_id(&self, id: &str) -> Option<Arc<Transaction>> {
        self.transactions.read().get_transaction_by_id(id)
    }

    /// Every transaction the user sent or received, unordered
    pub fn get_transactions_by_user(&self, user_id: &str) -> Vec<Arc<Transaction>> {
        self.transactions.read().get_transactions_by_user(user_id)
    }

    pub fn list_transactions(&self) -> Vec<Arc<Transaction>> {
        self.transactions.read().list_transactions()
    }

    /// Delete a transaction from the store and its edge from the graph
    ///
    /// Returns the deleted transaction; unknown IDs are a no-op.
    pub fn delete_transaction(&self, id: &str) -> Option<Arc<Transaction>> {
        let mut transactions = self.transactions.write();
        let mut graph = self.graph.write();

        let tx = transactions.delete_transaction(id)?;
        graph.remove_edge(&tx.from.id, &tx.id);

        tracing::debug!(tx = %tx.id, "transaction deleted");
        Some(tx)
    }

    // ---------------------------------------------------------------------
    // Graph queries
    // ---------------------------------------------------------------------

    /// Transactions sent by the user, in insertion order
    pub fn get_out_transactions(&self, user_id: &str) -> Vec<Arc<Transaction>> {
        self.graph.read().get_out_transactions(user_id)
    }

    /// Transactions received by the user
    pub fn get_in_transactions(&self, user_id: &str) -> Vec<Arc<Transaction>> {
        self.graph.read().get_in_transactions(user_id)
    }

    /// Distinct recipients of the user's outgoing transactions
    pub fn get_neighbours(&self, user_id: &str) -> Vec<User> {
        self.graph.read().get_neighbours(user_id)
    }

    /// Circular transfer chains, as user IDs
    ///
    /// The graph read lock is held for the whole traversal, so the result
    /// reflects one consistent state of the graph.
    pub fn detect_cycles(&self) -> Vec<Cycle> {
        let graph = self.graph.read();
        let cycles = CycleDetector::detect(&graph);
        tracing::debug!(
            edges = graph.edge_count(),
            cycles = cycles.len(),
            "cycle detection finished"
        );
        cycles
    }

    /// Number of registered users
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of stored transactions
    pub fn transaction_count(&self) -> usize {
        self.transactions.read().len()
    }

    /// Number of graph edges; equals `transaction_count` at rest
    pub fn edge_count(&self) -> usize {
        self.graph.read().edge_count()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("users", &self.users.len())
            .field("transactions", &self.transactions.read().len())
            .field("edges", &self.graph.read().edge_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::{FixedClock, SequentialIdGenerator};
    use crate::core::cycle::canonical_rotation;
    use chrono::{DateTime, Utc};
    use rstest::{fixture, rstest};
    use std::collections::HashSet;
    use std::thread;

    fn instant() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[fixture]
    fn ledger() -> Ledger {
        Ledger::with_services(
            Arc::new(SequentialIdGenerator::new("id")),
            Arc::new(FixedClock(instant())),
        )
    }

    fn ids(txs: &[Arc<Transaction>]) -> HashSet<String> {
        txs.iter().map(|tx| tx.id.clone()).collect()
    }

    #[rstest]
    fn test_new_user_is_registered(ledger: Ledger) {
        let alice = ledger.new_user("alice").unwrap();

        assert_eq!(alice.id, "id-000001");
        assert_eq!(ledger.get_user(&alice.id), Some(alice.clone()));
        assert_eq!(ledger.list_users(), vec![alice]);
    }

    #[rstest]
    fn test_new_transaction_assigns_id_and_timestamp(ledger: Ledger) {
        let alice = ledger.new_user("alice").unwrap();
        let bob = ledger.new_user("bob").unwrap();

        let tx = ledger
            .new_transaction(&alice, &bob, Decimal::new(2500, 2))
            .unwrap();

        assert_eq!(tx.id, "id-000003");
        assert_eq!(tx.at, instant());
        assert_eq!(tx.from, alice);
        assert_eq!(tx.to, bob);
        assert_eq!(ledger.get_transaction_by_id(&tx.id), Some(Arc::clone(&tx)));
    }

    #[rstest]
    fn test_direction_of_queries(ledger: Ledger) {
        let a = ledger.new_user("a").unwrap();
        let b = ledger.new_user("b").unwrap();
        let tx = ledger.new_transaction(&a, &b, Decimal::ONE).unwrap();

        assert!(ids(&ledger.get_out_transactions(&a.id)).contains(&tx.id));
        assert!(ids(&ledger.get_in_transactions(&b.id)).contains(&tx.id));
        assert!(ledger.get_out_transactions(&b.id).is_empty());
        assert!(ledger.get_in_transactions(&a.id).is_empty());
    }

    #[rstest]
    fn test_neighbours_deduplicated(ledger: Ledger) {
        let a = ledger.new_user("a").unwrap();
        let b = ledger.new_user("b").unwrap();
        let c = ledger.new_user("c").unwrap();

        ledger.new_transaction(&a, &b, Decimal::ONE).unwrap();
        ledger.new_transaction(&a, &c, Decimal::ONE).unwrap();
        ledger.new_transaction(&a, &b, Decimal::TWO).unwrap();

        let neighbours: HashSet<User> = ledger.get_neighbours(&a.id).into_iter().collect();
        assert_eq!(neighbours, HashSet::from([b, c]));
    }

    #[rstest]
    fn test_user_without_transactions_has_empty_queries(ledger: Ledger) {
        let loner = ledger.new_user("loner").unwrap();

        assert!(ledger.get_out_transactions(&loner.id).is_empty());
        assert!(ledger.get_in_transactions(&loner.id).is_empty());
        assert!(ledger.get_neighbours(&loner.id).is_empty());
        assert!(ledger.get_transactions_by_user(&loner.id).is_empty());
    }

    #[rstest]
    fn test_detect_triangle(ledger: Ledger) {
        let a = ledger.new_user("a").unwrap();
        let b = ledger.new_user("b").unwrap();
        let c = ledger.new_user("c").unwrap();
        ledger.new_transaction(&a, &b, Decimal::ONE).unwrap();
        ledger.new_transaction(&b, &c, Decimal::ONE).unwrap();
        ledger.new_transaction(&c, &a, Decimal::ONE).unwrap();

        let cycles = ledger.detect_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(canonical_rotation(&cycles[0]), vec![a.id, b.id, c.id]);
    }

    #[rstest]
    fn test_detect_acyclic_and_self_loop(ledger: Ledger) {
        let a = ledger.new_user("a").unwrap();
        let b = ledger.new_user("b").unwrap();
        let c = ledger.new_user("c").unwrap();
        ledger.new_transaction(&a, &b, Decimal::ONE).unwrap();
        ledger.new_transaction(&b, &c, Decimal::ONE).unwrap();

        assert!(ledger.detect_cycles().is_empty());

        ledger.new_transaction(&a, &a, Decimal::ONE).unwrap();
        assert_eq!(ledger.detect_cycles(), vec![vec![a.id]]);
    }

    #[rstest]
    #[case::negative(Decimal::new(-1, 2), true)]
    #[case::zero(Decimal::ZERO, false)]
    #[case::negative_zero(Decimal::new(-0, 2), false)]
    #[case::positive(Decimal::new(1, 2), false)]
    fn test_amount_validation(ledger: Ledger, #[case] amount: Decimal, #[case] rejected: bool) {
        let a = ledger.new_user("a").unwrap();
        let b = ledger.new_user("b").unwrap();

        let result = ledger.new_transaction(&a, &b, amount);
        assert_eq!(
            matches!(result, Err(LedgerError::NegativeAmount { .. })),
            rejected
        );
    }

    #[rstest]
    fn test_unknown_counterparties_rejected(ledger: Ledger) {
        let a = ledger.new_user("a").unwrap();
        let ghost = User::new("ghost", "ghost");

        let err = ledger.new_transaction(&ghost, &a, Decimal::ONE).unwrap_err();
        assert_eq!(err, LedgerError::unknown_user("sender", "ghost"));

        let err = ledger.new_transaction(&a, &ghost, Decimal::ONE).unwrap_err();
        assert_eq!(err, LedgerError::unknown_user("recipient", "ghost"));

        assert_eq!(ledger.transaction_count(), 0);
        assert_eq!(ledger.edge_count(), 0);
    }

    #[rstest]
    fn test_add_transaction_collision_changes_nothing(ledger: Ledger) {
        let a = ledger.new_user("a").unwrap();
        let b = ledger.new_user("b").unwrap();
        let original = ledger.new_transaction(&a, &b, Decimal::ONE).unwrap();

        let impostor = Arc::new(Transaction {
            id: original.id.clone(),
            from: b.clone(),
            to: a.clone(),
            amount: Decimal::TEN,
            at: instant(),
        });

        assert!(!ledger.add_transaction(impostor));
        assert_eq!(ledger.get_transaction_by_id(&original.id), Some(original));
        assert_eq!(ledger.edge_count(), 1);
        assert!(ledger.get_out_transactions(&b.id).is_empty());
    }

    #[rstest]
    fn test_delete_transaction_cascades_to_graph(ledger: Ledger) {
        let a = ledger.new_user("a").unwrap();
        let b = ledger.new_user("b").unwrap();
        let keep = ledger.new_transaction(&a, &b, Decimal::ONE).unwrap();
        let gone = ledger.new_transaction(&a, &b, Decimal::TWO).unwrap();
        ledger.new_transaction(&b, &a, Decimal::ONE).unwrap();

        assert!(ledger.delete_transaction(&gone.id).is_some());

        assert!(ledger.get_transaction_by_id(&gone.id).is_none());
        assert_eq!(ids(&ledger.get_out_transactions(&a.id)), ids(&[keep]));
        assert!(!ids(&ledger.get_in_transactions(&b.id)).contains(&gone.id));
        assert_eq!(ledger.transaction_count(), ledger.edge_count());

        // Deleting again is a no-op
        assert!(ledger.delete_transaction(&gone.id).is_none());
    }

    #[rstest]
    fn test_delete_user_does_not_cascade(ledger: Ledger) {
        let a = ledger.new_user("a").unwrap();
        let b = ledger.new_user("b").unwrap();
        let tx = ledger.new_transaction(&a, &b, Decimal::ONE).unwrap();

        assert_eq!(ledger.delete_user(&b.id), Some(b.clone()));

        assert!(ledger.get_user(&b.id).is_none());
        assert_eq!(ledger.get_transaction_by_id(&tx.id), Some(Arc::clone(&tx)));
        assert_eq!(ledger.get_neighbours(&a.id), vec![b.clone()]);

        // New transfers to the deleted user are refused
        let err = ledger.new_transaction(&a, &b, Decimal::ONE).unwrap_err();
        assert!(matches!(err, LedgerError::UnknownUser { .. }));
    }

    #[rstest]
    fn test_deleted_ids_are_never_reused(ledger: Ledger) {
        let a = ledger.new_user("a").unwrap();
        let b = ledger.new_user("b").unwrap();
        let tx = ledger.new_transaction(&a, &b, Decimal::ONE).unwrap();

        ledger.delete_transaction(&tx.id);
        assert!(!ledger.add_transaction(Arc::clone(&tx)));
        assert!(ledger.get_transaction_by_id(&tx.id).is_none());
        assert_eq!(ledger.edge_count(), 0);

        ledger.delete_user(&a.id);
        assert!(!ledger.add_user(a.clone()));
        assert!(ledger.get_user(&a.id).is_none());
    }

    #[test]
    fn test_concurrent_creation_keeps_store_and_graph_in_step() {
        let ledger = Arc::new(Ledger::new());
        let users: Vec<User> = (0..8)
            .map(|i| ledger.new_user(&format!("user{}", i)).unwrap())
            .collect();
        let users = Arc::new(users);

        let mut handles = vec![];
        for t in 0..8 {
            let ledger = Arc::clone(&ledger);
            let users = Arc::clone(&users);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    let from = &users[t];
                    let to = &users[(t + i + 1) % users.len()];
                    ledger
                        .new_transaction(from, to, Decimal::new(i as i64, 0))
                        .unwrap();
                }
            }));
        }

        // Readers running alongside the writers never see a torn write
        let reader = {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                for _ in 0..200 {
                    for tx in ledger.list_transactions() {
                        let out = ledger.get_out_transactions(&tx.from.id);
                        assert!(out.iter().any(|edge| edge.id == tx.id));
                    }
                }
            })
        };

        for handle in handles {
            handle.join().unwrap();
        }
        reader.join().unwrap();

        assert_eq!(ledger.transaction_count(), 800);
        assert_eq!(ledger.edge_count(), 800);
        for user in users.iter() {
            assert_eq!(ledger.get_out_transactions(&user.id).len(), 100);
        }
    }

    #[test]
    fn test_concurrent_detection_sees_consistent_graph() {
        let ledger = Arc::new(Ledger::new());
        let a = ledger.new_user("a").unwrap();
        let b = ledger.new_user("b").unwrap();
        ledger.new_transaction(&a, &b, Decimal::ONE).unwrap();
        ledger.new_transaction(&b, &a, Decimal::ONE).unwrap();

        let writer = {
            let ledger = Arc::clone(&ledger);
            let (a, b) = (a.clone(), b.clone());
            thread::spawn(move || {
                for _ in 0..500 {
                    ledger.new_transaction(&a, &b, Decimal::ONE).unwrap();
                }
            })
        };

        for _ in 0..100 {
            // Parallel a -> b edges never add cycles
            assert_eq!(ledger.detect_cycles().len(), 1);
        }
        writer.join().unwrap();
    }
}
