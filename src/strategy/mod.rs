//! Import strategy module
//!
//! This module defines the Strategy pattern for the complete import pipeline:
//! reading transfers from CSV, recording them in a fresh ledger, and writing
//! the requested report. Synchronous and asynchronous batch implementations
//! can be selected at runtime.

use crate::cli::{ReportType, StrategyType};
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Counts of transfers handled by one import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Transfers recorded in the ledger
    pub imported: usize,
    /// Rows or transfers that were rejected and logged
    pub skipped: usize,
}

/// Import pipeline trait
///
/// Each strategy reads transfer rows from a CSV file into a new ledger and
/// writes the requested report to `output`.
pub trait ProcessingStrategy: Send + Sync {
    /// Import transfers from `input_path` and write `report` to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened or its header cannot be read
    /// - The async runtime cannot be started or an import task panics
    /// - The report cannot be written
    ///
    /// Invalid rows and rejected transfers are logged as warnings and counted
    /// in the returned summary; they do not stop the import.
    fn process(
        &self,
        input_path: &Path,
        report: ReportType,
        output: &mut dyn Write,
    ) -> Result<ImportSummary, LedgerError>;
}

/// Create an import strategy for the given type
///
/// `config` is only used by the async strategy; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
