//! Injected capabilities used by the ledger
//!
//! This module defines the trait abstractions the ledger depends on for
//! identifier generation and timestamps, along with their production and
//! deterministic implementations. Tests swap in the deterministic ones to get
//! stable IDs and times.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of unique identifiers for users and transactions
///
/// Implementations must be safe to call from several threads at once and
/// must never hand out the same ID twice.
pub trait IdGenerator: Send + Sync {
    /// Produce a fresh, unique ID
    fn generate_id(&self) -> String;
}

/// Source of creation timestamps
pub trait Clock: Send + Sync {
    /// Current time in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// Random UUID v4 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Monotonic `<prefix>-<n>` identifiers starting at 1
///
/// Numbers are zero-padded so that lexical order matches creation order, up
/// to the padded width.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    width: usize,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Six-digit padding
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_width(prefix, 6)
    }

    /// Pad to `width` digits; 20 covers every `u64`
    pub fn with_width(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width,
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:0width$}", self.prefix, n, width = self.width)
    }
}

/// Wall clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
