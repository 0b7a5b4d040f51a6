//! Core ledger module
//!
//! This module contains the ledger components:
//! - `traits` - Injected ID and clock capabilities
//! - `user_store` - User identities by ID
//! - `transaction_store` - Transaction records by ID
//! - `graph` - Adjacency-list index of transactions by sender
//! - `cycle` - Circular transfer detection over the graph
//! - `ledger` - Orchestration and the atomic create/delete entry points
//! - `importer` - Name-based transfer import
//! - `batch_processor` - Concurrent batch import partitioned by sender

pub mod batch_processor;
pub mod cycle;
pub mod graph;
pub mod importer;
pub mod ledger;
pub mod traits;
pub mod transaction_store;
pub mod user_store;

pub use batch_processor::{BatchProcessor, ImportResult};
pub use cycle::{canonical_rotation, Cycle, CycleDetector};
pub use graph::TransactionGraph;
pub use importer::TransferImporter;
pub use ledger::Ledger;
pub use traits::{
    Clock, FixedClock, IdGenerator, SequentialIdGenerator, SystemClock, UuidGenerator,
};
pub use transaction_store::TransactionStore;
pub use user_store::UserStore;
