use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::Ledger;
use crate::error::{LedgerError, LedgerResult};
use crate::traits::{Clock, StateStore};

/// Fingerprint of a replica's entire ledger state.
///
/// Replicas that applied the same transactions with the same transaction
/// times produce the same digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDigest {
    /// Number of keys hashed.
    pub entries: usize,
    /// Hex SHA-256 over every length-prefixed `(key, value)` pair in key order.
    pub digest: String,
}

impl<S: StateStore, C: Clock> Ledger<S, C> {
    pub fn state_digest(&self) -> LedgerResult<StateDigest> {
        let entries = self
            .store
            .get_state_by_range("", "")
            .map_err(|e| LedgerError::store_read("", e))?;

        let mut hasher = Sha256::new();
        for (key, value) in &entries {
            hasher.update((key.len() as u64).to_be_bytes());
            hasher.update(key.as_bytes());
            hasher.update((value.len() as u64).to_be_bytes());
            hasher.update(value);
        }

        Ok(StateDigest {
            entries: entries.len(),
            digest: hex::encode(hasher.finalize()),
        })
    }
}
