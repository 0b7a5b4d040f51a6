//! Reports over an imported ledger
//!
//! Turns ledger query results into the row types written by
//! [`csv_format`](crate::io::csv_format). Users are shown by display name.

use crate::cli::ReportType;
use crate::core::{canonical_rotation, Ledger, TransferImporter};
use crate::io::csv_format::{write_cycles_csv, write_users_csv, CycleRow, UserRow};
use crate::types::LedgerError;
use std::io::Write;

/// Detected cycles, named and rotated so the smallest name leads
pub fn cycle_rows(importer: &TransferImporter) -> Vec<CycleRow> {
    importer
        .ledger()
        .detect_cycles()
        .iter()
        .map(|cycle| {
            let names: Vec<String> = cycle
                .iter()
                .map(|user_id| importer.display_name(user_id))
                .collect();
            CycleRow {
                path: canonical_rotation(&names),
            }
        })
        .collect()
}

/// Edge counts for every registered user
pub fn user_rows(ledger: &Ledger) -> Vec<UserRow> {
    ledger
        .list_users()
        .into_iter()
        .map(|user| UserRow {
            outgoing: ledger.get_out_transactions(&user.id).len(),
            incoming: ledger.get_in_transactions(&user.id).len(),
            neighbours: ledger.get_neighbours(&user.id).len(),
            user: user.name,
        })
        .collect()
}

/// Build the requested report and write it as CSV
pub fn write_report(
    importer: &TransferImporter,
    report: ReportType,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    match report {
        ReportType::Cycles => write_cycles_csv(&cycle_rows(importer), output),
        ReportType::Users => write_users_csv(&user_rows(importer.ledger()), output),
    }
}
