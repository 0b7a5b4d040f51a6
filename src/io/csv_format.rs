//! CSV format handling for transfer input and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvTransfer structure for deserialization
//! - Conversion from CSV rows to domain types
//! - Cycle and user report serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{LedgerError, TransferRecord};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV row structure for deserialization
///
/// Matches the input CSV format with columns: from, to, amount
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvTransfer {
    pub from: String,
    pub to: String,
    pub amount: Option<String>,
}

/// One row of the cycle report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleRow {
    /// User names in transfer order, smallest name first
    pub path: Vec<String>,
}

/// One row of the user report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub user: String,
    pub outgoing: usize,
    pub incoming: usize,
    pub neighbours: usize,
}

/// Convert a CsvTransfer to a TransferRecord
///
/// This function:
/// - Trims both names and rejects empty ones
/// - Parses the amount string into a Decimal
/// - Rejects negative amounts
///
/// Errors carry no line number; readers attach one with
/// [`LedgerError::at_line`].
pub fn convert_csv_record(csv_record: CsvTransfer) -> Result<TransferRecord, LedgerError> {
    let from = csv_record.from.trim();
    if from.is_empty() {
        return Err(LedgerError::empty_name("sender"));
    }

    let to = csv_record.to.trim();
    if to.is_empty() {
        return Err(LedgerError::empty_name("recipient"));
    }

    let amount = match csv_record.amount.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            Decimal::from_str(raw).map_err(|_| LedgerError::invalid_amount(raw))?
        }
        _ => {
            return Err(LedgerError::ParseError {
                line: None,
                message: format!("transfer from {} to {} requires an amount", from, to),
            })
        }
    };

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(LedgerError::negative_amount(amount));
    }

    Ok(TransferRecord {
        from: from.to_string(),
        to: to.to_string(),
        amount,
    })
}

/// Write the cycle report
///
/// Columns: cycle, length, path. Rows are sorted by path and numbered from 1;
/// the path joins names with ` -> `.
pub fn write_cycles_csv(cycles: &[CycleRow], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["cycle", "length", "path"])?;

    let mut sorted: Vec<&CycleRow> = cycles.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    for (i, cycle) in sorted.into_iter().enumerate() {
        writer.write_record(&[
            (i + 1).to_string(),
            cycle.path.len().to_string(),
            cycle.path.join(" -> "),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the user report
///
/// Columns: user, outgoing, incoming, neighbours. Rows are sorted by user name.
pub fn write_users_csv(users: &[UserRow], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["user", "outgoing", "incoming", "neighbours"])?;

    let mut sorted = users.to_vec();
    sorted.sort_by(|a, b| a.user.cmp(&b.user));

    for row in sorted {
        writer.write_record(&[
            row.user,
            row.outgoing.to_string(),
            row.incoming.to_string(),
            row.neighbours.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
