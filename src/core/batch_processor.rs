//! Batch import with sender-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which imports a batch of
//! transfers concurrently while keeping each sender's transfers in input
//! order.
//!
//! # Design
//!
//! A sender's outgoing edges are kept in insertion order by the graph, so a
//! batch is partitioned by sender name. Partitions for different senders are
//! imported in parallel tokio tasks; transfers within one partition are
//! imported sequentially.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── TransferImporter
//!             └── Arc<Ledger>  (shared, internally locked)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::importer::TransferImporter;
use crate::types::{LedgerError, Transaction, TransferRecord};

/// Result of importing a single transfer
#[derive(Debug, Clone)]
pub struct ImportResult {
    /// The transfer that was imported
    pub record: TransferRecord,

    /// The recorded transaction, or why it was rejected
    pub result: Result<Arc<Transaction>, LedgerError>,
}

/// Concurrent batch importer
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    importer: TransferImporter,
}

impl BatchProcessor {
    pub fn new(importer: TransferImporter) -> Self {
        Self { importer }
    }

    /// Split a batch into per-sender partitions
    ///
    /// # Guarantees
    ///
    /// - Each transfer appears in exactly one partition
    /// - Transfers in a partition keep their original order
    /// - A partition holds transfers of a single sender only
    pub fn partition_by_sender(
        &self,
        batch: Vec<TransferRecord>,
    ) -> HashMap<String, Vec<TransferRecord>> {
        let mut partitions: HashMap<String, Vec<TransferRecord>> = HashMap::new();

        for record in batch {
            partitions
                .entry(record.from.clone())
                .or_default()
                .push(record);
        }

        partitions
    }

    /// Import one sender's transfers in order
    ///
    /// Failed transfers are captured in the results and do not stop the rest.
    pub async fn import_sender_transfers(
        &self,
        transfers: Vec<TransferRecord>,
    ) -> Vec<ImportResult> {
        let mut results = Vec::with_capacity(transfers.len());

        for record in transfers {
            let result = self.importer.import(&record);
            results.push(ImportResult { record, result });
        }

        results
    }

    /// Import a batch, running different senders concurrently
    ///
    /// Users are registered up front in order of first appearance, so user
    /// creation does not depend on task scheduling. Results are grouped by
    /// sender; the order between senders is unspecified.
    ///
    /// # Errors
    ///
    /// Returns `TaskFailed` if an import task panicked. Results of the other
    /// tasks are discarded in that case.
    pub async fn process_batch(
        &self,
        batch: Vec<TransferRecord>,
    ) -> Result<Vec<ImportResult>, LedgerError> {
        self.importer.register_users(&batch);
        let partitions = self.partition_by_sender(batch);

        let mut tasks = Vec::with_capacity(partitions.len());
        for (_sender, transfers) in partitions {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.import_sender_transfers(transfers).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(sender_results) => results.extend(sender_results),
                Err(e) => {
                    tracing::error!(error = %e, "import task failed");
                    return Err(LedgerError::TaskFailed {
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(results)
    }
}
