//! Synchronous import strategy
//!
//! Single-threaded implementation of [`ProcessingStrategy`]. It streams rows
//! through [`SyncReader`], records each one with a [`TransferImporter`], and
//! hands the finished ledger to the report writer.
//!
//! # Memory
//!
//! Rows are read one at a time. Memory grows with the ledger, not with the
//! size of the input file.

use crate::cli::ReportType;
use crate::core::TransferImporter;
use crate::io::sync_reader::SyncReader;
use crate::report::write_report;
use crate::strategy::{ImportSummary, ProcessingStrategy};
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;

/// Synchronous import strategy
///
/// # Examples
///
/// ```no_run
/// use transaction_ledger::cli::ReportType;
/// use transaction_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let mut output = std::io::stdout();
/// SyncProcessingStrategy
///     .process(Path::new("transfers.csv"), ReportType::Cycles, &mut output)
///     .expect("import failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        input_path: &Path,
        report: ReportType,
        output: &mut dyn Write,
    ) -> Result<ImportSummary, LedgerError> {
        let importer = TransferImporter::sequential();
        let reader = SyncReader::new(input_path)?;

        let mut summary = ImportSummary::default();
        for result in reader {
            match result.and_then(|record| importer.import(&record)) {
                Ok(_) => summary.imported += 1,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping transfer");
                    summary.skipped += 1;
                }
            }
        }

        tracing::info!(
            imported = summary.imported,
            skipped = summary.skipped,
            users = importer.ledger().user_count(),
            "import finished"
        );

        write_report(&importer, report, output)?;
        Ok(summary)
    }
}
