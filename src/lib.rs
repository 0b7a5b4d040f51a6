//! Transaction Ledger Library
//! # Overview
//!
//! This library records money transfers between users as a directed graph and
//! finds circular transfer chains in it. Transfers can be created through the
//! [`Ledger`] API or imported in bulk from CSV with a sync or an async strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (User, Transaction, LedgerError)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Ledger components:
//!   - [`core::user_store`] - User identities by ID
//!   - [`core::transaction_store`] - Transaction records by ID
//!   - [`core::graph`] - Outgoing transactions per sender
//!   - [`core::cycle`] - Depth-first cycle detection
//!   - [`core::ledger`] - Consistent create/delete across store and graph
//! - [`io`] - CSV reading and report writing
//! - [`strategy`] - Sync and async import pipelines
//! - [`report`] - Cycle and user reports
//!
//! # Graph Model
//!
//! Users are vertices. Every transaction is a directed edge from its sender
//! to its recipient. Parallel edges and self-loops are allowed.
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use transaction_ledger::Ledger;
//!
//! let ledger = Ledger::new();
//! let alice = ledger.new_user("alice").unwrap();
//! let bob = ledger.new_user("bob").unwrap();
//!
//! ledger.new_transaction(&alice, &bob, Decimal::new(10, 0)).unwrap();
//! ledger.new_transaction(&bob, &alice, Decimal::new(5, 0)).unwrap();
//!
//! assert_eq!(ledger.detect_cycles().len(), 1);
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod report;
pub mod strategy;
pub mod types;

pub use core::{Cycle, CycleDetector, Ledger, TransactionGraph, TransactionStore, UserStore};
pub use io::{write_cycles_csv, write_users_csv};
pub use types::{LedgerError, Transaction, TransactionId, TransferRecord, User, UserId};
