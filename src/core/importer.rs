//! Name-based transfer import
//!
//! CSV input refers to users by display name. The `TransferImporter` keeps a
//! name directory for one import run, creating a ledger user the first time a
//! name is seen and reusing it afterwards.
//!
//! The directory is a `DashMap`, so one importer can be shared by concurrent
//! import tasks: creating a user for a name happens under that name's shard
//! lock, and no two tasks create a user for the same name.
//!
//! Cycle detection visits users in ID order. [`TransferImporter::sequential`]
//! pairs the importer with sequential IDs, so users registered in order of
//! first appearance get IDs in that order, and the reports depend only on
//! the input file.

use crate::core::ledger::Ledger;
use crate::core::traits::{SequentialIdGenerator, SystemClock};
use crate::types::{LedgerError, Transaction, TransferRecord, User};
use dashmap::DashMap;
use std::sync::Arc;

/// Imports name-addressed transfers into a [`Ledger`]
#[derive(Debug, Clone)]
pub struct TransferImporter {
    ledger: Arc<Ledger>,
    directory: Arc<DashMap<String, User>>,
}

impl TransferImporter {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self {
            ledger,
            directory: Arc::new(DashMap::new()),
        }
    }

    /// Importer over a fresh ledger with sequential, creation-ordered IDs
    pub fn sequential() -> Self {
        Self::new(Arc::new(Ledger::with_services(
            Arc::new(SequentialIdGenerator::with_width("id", 20)),
            Arc::new(SystemClock),
        )))
    }

    /// The ledger transfers are imported into
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Look up the user registered for a name, creating it on first sight
    pub fn resolve(&self, name: &str) -> Result<User, LedgerError> {
        if let Some(user) = self.directory.get(name) {
            return Ok(user.value().clone());
        }

        let entry = self
            .directory
            .entry(name.to_string())
            .or_try_insert_with(|| self.ledger.new_user(name))?;
        Ok(entry.value().clone())
    }

    /// Register the users of a batch in order of first appearance
    ///
    /// Names are resolved row by row, sender before recipient, which is the
    /// order [`import`](Self::import) creates them in. Rows with an empty
    /// name are skipped. Resolution errors are left for `import` to report.
    pub fn register_users(&self, records: &[TransferRecord]) {
        for record in records {
            if record.from.is_empty() || record.to.is_empty() {
                continue;
            }
            let _ = self
                .resolve(&record.from)
                .and_then(|_| self.resolve(&record.to));
        }
    }

    /// Record one transfer, creating its users as needed
    ///
    /// # Errors
    ///
    /// Returns an error if a name is empty, the amount is negative, or the
    /// ledger rejects the transaction.
    pub fn import(&self, record: &TransferRecord) -> Result<Arc<Transaction>, LedgerError> {
        if record.from.is_empty() {
            return Err(LedgerError::empty_name("sender"));
        }
        if record.to.is_empty() {
            return Err(LedgerError::empty_name("recipient"));
        }

        let from = self.resolve(&record.from)?;
        let to = self.resolve(&record.to)?;
        self.ledger.new_transaction(&from, &to, record.amount)
    }

    /// Name of a user ID as known to this import, falling back to the ledger
    pub fn display_name(&self, user_id: &str) -> String {
        self.ledger
            .get_user(user_id)
            .map(|user| user.name)
            .unwrap_or_else(|| user_id.to_string())
    }
}
