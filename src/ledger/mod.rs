//! Round and contribution state machine over a `StateStore`.
//!
//! This module provides:
//! - `rounds`: round creation, status transitions and finalization
//! - `contributions`: contribution recording and participant-set upkeep
//! - `query`: contributions-by-round lookups and index rebuild
//! - `digest`: replica state fingerprint
//!
//! A `Ledger` is built per invocation and holds no state of its own; every
//! call re-reads what it needs from the store.

pub mod contributions;
pub mod digest;
pub mod query;
pub mod rounds;

pub use contributions::ContributionSubmission;
pub use digest::StateDigest;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clock::SystemClock;
use crate::config::{ConflictPolicy, QueryStrategy};
use crate::error::{LedgerError, LedgerResult};
use crate::traits::{Clock, StateStore};

/// Behaviour switches for one ledger instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerOptions {
    pub conflict_policy: ConflictPolicy,
    pub query_strategy: QueryStrategy,
    /// Write per-round index entries next to each contribution.
    pub maintain_index: bool,
}

/// Entry points for one ledger invocation.
pub struct Ledger<S: StateStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    options: LedgerOptions,
}

impl<S: StateStore> Ledger<S, SystemClock> {
    /// Ledger on the local wall clock with default options.
    pub fn with_store(store: S) -> Self {
        Self::new(store, SystemClock, LedgerOptions::default())
    }
}

impl<S: StateStore, C: Clock> Ledger<S, C> {
    pub fn new(store: S, clock: C, options: LedgerOptions) -> Self {
        Self {
            store,
            clock,
            options,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &LedgerOptions {
        &self.options
    }

    fn now(&self) -> i64 {
        self.clock.now_unix()
    }

    fn rejects_conflicts(&self) -> bool {
        self.options.conflict_policy == ConflictPolicy::Reject
    }

    fn read_raw(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        self.store
            .get_state(key)
            .map_err(|e| LedgerError::store_read(key, e))
    }

    fn read_record<T: DeserializeOwned>(&self, key: &str) -> LedgerResult<Option<T>> {
        match self.read_raw(key)? {
            Some(bytes) => decode_record(key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    fn write_raw(&self, key: &str, value: &[u8]) -> LedgerResult<()> {
        self.store
            .put_state(key, value)
            .map_err(|e| LedgerError::store_write(key, e))
    }

    fn write_record<T: Serialize>(&self, key: &str, record: &T) -> LedgerResult<()> {
        let bytes = encode_record(key, record)?;
        self.write_raw(key, &bytes)
    }

    /// Scan `[start, end)` and decode every value; one corrupt record fails the scan.
    fn scan_records<T: DeserializeOwned>(&self, start: &str, end: &str) -> LedgerResult<Vec<T>> {
        let entries = self
            .store
            .get_state_by_range(start, end)
            .map_err(|e| LedgerError::store_read(start, e))?;
        entries
            .iter()
            .map(|(key, value)| decode_record(key, value))
            .collect()
    }
}

fn encode_record<T: Serialize>(key: &str, record: &T) -> LedgerResult<Vec<u8>> {
    serde_json::to_vec(record).map_err(|source| LedgerError::Serialization {
        key: key.to_string(),
        source,
    })
}

fn decode_record<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> LedgerResult<T> {
    serde_json::from_slice(bytes).map_err(|source| LedgerError::Deserialization {
        key: key.to_string(),
        source,
    })
}
