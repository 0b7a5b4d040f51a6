//! Asynchronous batch import strategy
//!
//! Multi-threaded implementation of [`ProcessingStrategy`]. Transfers are read
//! in batches and each batch is imported by a [`BatchProcessor`], which runs
//! different senders in parallel tokio tasks.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (sender partitioning + tasks)
//!         └── TransferImporter
//!             └── Arc<Ledger>
//! ```
//!
//! # Ordering
//!
//! Batches are imported one after another, so a sender whose transfers span
//! several batches still gets its outgoing edges in file order.

use crate::cli::ReportType;
use crate::core::{BatchProcessor, TransferImporter};
use crate::io::async_reader::AsyncReader;
use crate::report::write_report;
use crate::strategy::{ImportSummary, ProcessingStrategy};
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;

/// Configuration for batch importing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of transfers per batch
    pub batch_size: usize,
    /// Number of runtime worker threads importing a batch
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a BatchConfig, replacing zero values with the defaults
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid worker count, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch import strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    async fn import(
        &self,
        input_path: &Path,
        importer: &TransferImporter,
    ) -> Result<ImportSummary, LedgerError> {
        let processor = BatchProcessor::new(importer.clone());

        let file = tokio::fs::File::open(input_path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => LedgerError::FileNotFound {
                    path: input_path.display().to_string(),
                },
                _ => LedgerError::from(e),
            })?;

        // csv-async reads from futures-io traits
        let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
        let mut reader = AsyncReader::new(compat_file);

        let mut summary = ImportSummary::default();
        loop {
            let batch = reader.read_batch(self.config.batch_size).await?;
            if batch.is_empty() {
                break;
            }

            for outcome in processor.process_batch(batch).await? {
                match outcome.result {
                    Ok(_) => summary.imported += 1,
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            from = %outcome.record.from,
                            to = %outcome.record.to,
                            "skipping transfer"
                        );
                        summary.skipped += 1;
                    }
                }
            }
        }

        summary.skipped += reader.skipped_rows();
        Ok(summary)
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(
        &self,
        input_path: &Path,
        report: ReportType,
        output: &mut dyn Write,
    ) -> Result<ImportSummary, LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .enable_all()
            .build()?;

        let importer = TransferImporter::sequential();
        let summary = runtime.block_on(self.import(input_path, &importer))?;

        tracing::info!(
            imported = summary.imported,
            skipped = summary.skipped,
            users = importer.ledger().user_count(),
            batch_size = self.config.batch_size,
            "import finished"
        );

        write_report(&importer, report, output)?;
        Ok(summary)
    }
}
