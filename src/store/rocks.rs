use std::sync::Arc;

use anyhow::{anyhow, Result};
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};
use tracing::debug;

use crate::traits::{KeyValue, StateStore};

/// RocksDB-backed ledger state.
///
/// Keys are stored as their UTF-8 bytes, so RocksDB's default bytewise
/// comparator gives the same order the ledger's string ranges assume.
#[derive(Clone)]
pub struct RocksStore {
    db: Arc<DB>,
}

impl RocksStore {
    pub fn open(path: &str) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db: Arc::new(db) })
    }

    fn decode_key(raw: Box<[u8]>) -> Result<String> {
        String::from_utf8(raw.into_vec()).map_err(|e| anyhow!("non utf-8 key in state: {}", e))
    }
}

impl StateStore for RocksStore {
    fn name(&self) -> &'static str {
        "rocksdb"
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(key.as_bytes())?)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<()> {
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }

    fn put_states(&self, entries: &[KeyValue]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut batch = WriteBatch::default();
        for (key, value) in entries {
            batch.put(key.as_bytes(), value);
        }
        self.db.write(batch)?;
        debug!("RocksStore: wrote batch of {} entries", entries.len());
        Ok(())
    }

    fn get_state_by_range(&self, start: &str, end: &str) -> Result<Vec<KeyValue>> {
        let mode = if start.is_empty() {
            IteratorMode::Start
        } else {
            IteratorMode::From(start.as_bytes(), Direction::Forward)
        };

        let mut out = Vec::new();
        for item in self.db.iterator(mode) {
            let (raw_key, value) = item?;
            if !end.is_empty() && raw_key.as_ref() >= end.as_bytes() {
                break;
            }
            out.push((Self::decode_key(raw_key)?, value.into_vec()));
        }
        Ok(out)
    }
}
