//! Asynchronous CSV reader with batch interface
//!
//! Provides batched reading of transfer records from a CSV source, for the
//! async import strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of TransferRecords
//!                  ↓
//!           csv_format module
//!           (CsvTransfer, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvTransfer};
use crate::types::{LedgerError, TransferRecord};
use csv_async::{AsyncReaderBuilder, StringRecord};
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous CSV reader
///
/// Reads up to a batch of rows at a time. Invalid rows are logged and
/// skipped.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncReader<R>,
    headers: Option<StringRecord>,
    skipped: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_reader(reader);

        Self {
            csv_reader,
            headers: None,
            skipped: 0,
        }
    }

    /// Number of rows skipped so far because they could not be read or converted
    pub fn skipped_rows(&self) -> usize {
        self.skipped
    }

    /// Read a batch of transfer records
    ///
    /// Returns an empty vector when the end of the input is reached.
    ///
    /// # Errors
    ///
    /// Returns an error only if the header row cannot be read. Row-level
    /// problems are logged with their line number and skipped.
    pub async fn read_batch(
        &mut self,
        batch_size: usize,
    ) -> Result<Vec<TransferRecord>, LedgerError> {
        if self.headers.is_none() {
            let headers = self.csv_reader.headers().await?.clone();
            self.headers = Some(headers);
        }
        let headers = self.headers.as_ref();

        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.records();

        while batch.len() < batch_size {
            let record = match records.next().await {
                Some(Ok(record)) => record,
                Some(Err(e)) => {
                    tracing::warn!(error = %LedgerError::from(e), "skipping unreadable row");
                    self.skipped += 1;
                    continue;
                }
                None => break,
            };

            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            let converted = record
                .deserialize::<CsvTransfer>(headers)
                .map_err(LedgerError::from)
                .and_then(convert_csv_record)
                .map_err(|e| e.at_line(line));

            match converted {
                Ok(transfer) => batch.push(transfer),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping invalid row");
                    self.skipped += 1;
                }
            }
        }

        Ok(batch)
    }
}
