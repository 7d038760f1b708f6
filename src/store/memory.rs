use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, bail, Result};

use crate::traits::{KeyValue, StateStore};

/// In-memory ledger state for tests and single-process use.
///
/// Clones share the same underlying map, so several ledgers (or a test and
/// the ledger under test) can observe one state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    /// Writes to keys starting with this prefix fail.
    failing_prefix: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write to a key starting with `prefix` fail.
    pub fn fail_writes_with_prefix(&self, prefix: &str) -> Result<()> {
        *lock(&self.failing_prefix)? = Some(prefix.to_string());
        Ok(())
    }

    /// Clear any write failure set by `fail_writes_with_prefix`.
    pub fn heal(&self) -> Result<()> {
        *lock(&self.failing_prefix)? = None;
        Ok(())
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock_state()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Copy of the whole state, in key order.
    pub fn snapshot(&self) -> Result<Vec<KeyValue>> {
        let state = self.lock_state()?;
        Ok(state.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, BTreeMap<String, Vec<u8>>>> {
        lock(&self.state)
    }

    fn check_writable(&self, key: &str) -> Result<()> {
        let guard = lock(&self.failing_prefix)?;
        if let Some(prefix) = guard.as_deref() {
            if key.starts_with(prefix) {
                bail!("injected write failure for {}", key);
            }
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| anyhow!("memory store lock poisoned"))
}

impl StateStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock_state()?.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<()> {
        self.check_writable(key)?;
        self.lock_state()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    /// All-or-nothing: no entry is written if any key is unwritable.
    fn put_states(&self, entries: &[KeyValue]) -> Result<()> {
        for (key, _) in entries {
            self.check_writable(key)?;
        }
        let mut state = self.lock_state()?;
        for (key, value) in entries {
            state.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn get_state_by_range(&self, start: &str, end: &str) -> Result<Vec<KeyValue>> {
        let state = self.lock_state()?;
        let out = state
            .range::<str, _>((Bound::Included(start), Bound::Unbounded))
            .take_while(|(k, _)| end.is_empty() || k.as_str() < end)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(out)
    }
}
