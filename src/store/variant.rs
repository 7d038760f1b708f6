use anyhow::Result;

use super::{memory::MemoryStore, rocks::RocksStore};
use crate::traits::{KeyValue, StateStore};

/// Enum representing all state store implementations.
#[derive(Clone)]
pub enum StoreVariant {
    Rocks(RocksStore),
    Memory(MemoryStore),
}

impl StateStore for StoreVariant {
    fn name(&self) -> &'static str {
        match self {
            StoreVariant::Rocks(inner) => inner.name(),
            StoreVariant::Memory(inner) => inner.name(),
        }
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self {
            StoreVariant::Rocks(inner) => inner.get_state(key),
            StoreVariant::Memory(inner) => inner.get_state(key),
        }
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<()> {
        match self {
            StoreVariant::Rocks(inner) => inner.put_state(key, value),
            StoreVariant::Memory(inner) => inner.put_state(key, value),
        }
    }

    fn put_states(&self, entries: &[KeyValue]) -> Result<()> {
        match self {
            StoreVariant::Rocks(inner) => inner.put_states(entries),
            StoreVariant::Memory(inner) => inner.put_states(entries),
        }
    }

    fn get_state_by_range(&self, start: &str, end: &str) -> Result<Vec<KeyValue>> {
        match self {
            StoreVariant::Rocks(inner) => inner.get_state_by_range(start, end),
            StoreVariant::Memory(inner) => inner.get_state_by_range(start, end),
        }
    }
}
