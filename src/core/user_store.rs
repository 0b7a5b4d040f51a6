//! Thread-safe user storage
//!
//! This module provides the `UserStore` struct, which owns every registered
//! user keyed by ID.
//!
//! # Design
//!
//! The `UserStore` uses `DashMap` (a concurrent HashMap) for fine-grained
//! locking: inserts and removals take an exclusive lock on one shard, lookups
//! take a shared lock, and no lock outlives a single call. Values are cloned
//! out so callers never hold a shard lock.
//!
//! # Retired IDs
//!
//! A deleted user's ID is remembered and never accepted again. Deletion
//! records the ID while it still holds the entry's shard lock, and insertion
//! checks under the same lock, so a concurrent insert cannot slip in between.
//!
//! # Referential Integrity
//!
//! Deleting a user does not touch transactions that name it. Transactions
//! keep their own snapshot of sender and recipient.

use crate::types::{User, UserId};
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};

/// Thread-safe user store
#[derive(Debug, Default)]
pub struct UserStore {
    /// Concurrent HashMap storing users by ID
    users: DashMap<UserId, User>,
    /// IDs of deleted users
    retired: DashSet<UserId>,
}

impl UserStore {
    /// Create a new empty UserStore
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            retired: DashSet::new(),
        }
    }

    /// Insert a user if its ID is not taken yet
    ///
    /// # Returns
    ///
    /// * `true` - The user was inserted
    /// * `false` - The ID is taken or belonged to a deleted user; nothing changes
    pub fn add_user(&self, user: User) -> bool {
        match self.users.entry(user.id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                if self.retired.contains(entry.key()) {
                    return false;
                }
                entry.insert(user);
                true
            }
        }
    }

    /// Look up a user by ID
    pub fn get_user(&self, id: &str) -> Option<User> {
        self.users.get(id).map(|entry| entry.value().clone())
    }

    /// Snapshot of all current users, in no particular order
    pub fn list_users(&self) -> Vec<User> {
        self.users
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Remove a user if present
    ///
    /// Returns the removed user and retires its ID. Removing an unknown ID is
    /// a no-op.
    pub fn delete_user(&self, id: &str) -> Option<User> {
        match self.users.entry(id.to_string()) {
            Entry::Occupied(entry) => {
                self.retired.insert(id.to_string());
                Some(entry.remove())
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Whether the ID belonged to a user that has been deleted
    pub fn is_retired(&self, id: &str) -> bool {
        self.retired.contains(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.users.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_add_and_get_user() {
        let store = UserStore::new();

        assert!(store.add_user(User::new("u-1", "alice")));

        let retrieved = store.get_user("u-1");
        assert_eq!(retrieved, Some(User::new("u-1", "alice")));
    }

    #[test]
    fn test_get_unknown_user() {
        let store = UserStore::new();
        assert!(store.get_user("missing").is_none());
    }

    #[test]
    fn test_duplicate_id_keeps_original() {
        let store = UserStore::new();

        assert!(store.add_user(User::new("u-1", "alice")));
        assert!(!store.add_user(User::new("u-1", "mallory")));

        let retrieved = store.get_user("u-1").unwrap();
        assert_eq!(retrieved.name, "alice");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_list_users() {
        let store = UserStore::new();
        store.add_user(User::new("u-1", "alice"));
        store.add_user(User::new("u-2", "bob"));
        store.add_user(User::new("u-3", "carol"));

        let names: HashSet<String> = store.list_users().into_iter().map(|u| u.name).collect();
        assert_eq!(
            names,
            HashSet::from(["alice".to_string(), "bob".to_string(), "carol".to_string()])
        );
    }

    #[test]
    fn test_delete_user() {
        let store = UserStore::new();
        store.add_user(User::new("u-1", "alice"));

        let removed = store.delete_user("u-1");
        assert_eq!(removed.map(|u| u.name), Some("alice".to_string()));
        assert!(store.get_user("u-1").is_none());
        assert!(store.is_empty());

        // Deleting again is a no-op
        assert!(store.delete_user("u-1").is_none());
    }

    #[test]
    fn test_deleted_id_is_not_reused() {
        let store = UserStore::new();
        store.add_user(User::new("u-1", "alice"));
        store.delete_user("u-1");

        assert!(store.is_retired("u-1"));
        assert!(!store.add_user(User::new("u-1", "alice")));
        assert!(store.get_user("u-1").is_none());

        // Unknown IDs are not retired by a no-op delete
        assert!(store.delete_user("u-2").is_none());
        assert!(!store.is_retired("u-2"));
        assert!(store.add_user(User::new("u-2", "bob")));
    }

    #[test]
    fn test_concurrent_delete_and_reinsert() {
        let store = Arc::new(UserStore::new());
        for i in 0..100 {
            store.add_user(User::new(format!("u-{}", i), "original"));
        }

        let deleter = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..100 {
                    store.delete_user(&format!("u-{}", i));
                }
            })
        };
        let inserter = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..10 {
                    for i in 0..100 {
                        store.add_user(User::new(format!("u-{}", i), "intruder"));
                    }
                }
            })
        };
        deleter.join().unwrap();
        inserter.join().unwrap();

        // Once deleted, no ID came back
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_inserts_with_colliding_ids() {
        let store = Arc::new(UserStore::new());

        // Every thread tries to claim the same ten IDs
        let mut handles = vec![];
        for t in 0..8 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                (0..10)
                    .filter(|i| store.add_user(User::new(format!("u-{}", i), format!("t{}", t))))
                    .count()
            }));
        }

        let wins: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        // Exactly one insert per ID succeeded
        assert_eq!(wins, 10);
        assert_eq!(store.len(), 10);
    }
}
