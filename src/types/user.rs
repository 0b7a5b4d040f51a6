//! User identity types for the transaction ledger

use serde::{Deserialize, Serialize};

/// User identifier
///
/// Opaque, globally unique string assigned at creation by an
/// [`IdGenerator`](crate::core::IdGenerator). Never reused.
pub type UserId = String;

/// A ledger participant
///
/// Users are owned by the [`UserStore`](crate::core::UserStore). Transactions
/// carry an immutable snapshot of the sender and recipient, so a transaction
/// keeps its counterparties even after the user is deleted from the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, immutable once assigned
    pub id: UserId,

    /// Display name (not required to be unique)
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        User {
            id: id.into(),
            name: name.into(),
        }
    }
}
