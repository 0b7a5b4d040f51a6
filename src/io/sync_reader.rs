//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over transfer records from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<TransferRecord, LedgerError>` for each CSV row:
//!
//! ```no_run
//! use transaction_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("transfers.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Importing transfer: {:?}", record),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row errors are yielded as Err variants carrying the line number

use crate::io::csv_format::{convert_csv_record, CsvTransfer};
use crate::types::{LedgerError, TransferRecord};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one row at a time; memory use does not grow with the file.
pub struct SyncReader {
    headers: StringRecord,
    rows: StringRecordsIntoIter<File>,
}

impl SyncReader {
    /// Open a CSV file for streaming iteration
    ///
    /// The CSV reader trims whitespace from all fields and allows a missing
    /// trailing amount column.
    ///
    /// # Errors
    ///
    /// * `FileNotFound` - the path does not exist
    /// * `IoError` - the file could not be opened
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LedgerError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => LedgerError::from(e),
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);
        let headers = reader.headers()?.clone();

        Ok(Self {
            headers,
            rows: reader.into_records(),
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<TransferRecord, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;

        Some(row.map_err(LedgerError::from).and_then(|record| {
            // The header is line 1
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            record
                .deserialize::<CsvTransfer>(Some(&self.headers))
                .map_err(LedgerError::from)
                .and_then(convert_csv_record)
                .map_err(|e| e.at_line(line))
        }))
    }
}
