use anyhow::Result;

/// A single key/value pair returned by a range scan.
pub type KeyValue = (String, Vec<u8>);

/// Ordered key-value state of one ledger replica.
///
/// This is the only persistence the ledger logic sees. Implementations must
/// return range-scan results in ascending byte order of the key.
pub trait StateStore: Send + Sync {
    /// Store name for logging.
    fn name(&self) -> &'static str;

    /// Read the value stored at `key`, if any.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `value` at `key`, replacing any previous value.
    fn put_state(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Write several entries, atomically if the backend supports it.
    fn put_states(&self, entries: &[KeyValue]) -> Result<()> {
        for (key, value) in entries {
            self.put_state(key, value)?;
        }
        Ok(())
    }

    /// Scan the half-open range `[start, end)` in ascending key order.
    ///
    /// An empty `start` scans from the first key; an empty `end` scans to
    /// the last key.
    fn get_state_by_range(&self, start: &str, end: &str) -> Result<Vec<KeyValue>>;
}

impl<T: StateStore + ?Sized> StateStore for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).put_state(key, value)
    }

    fn put_states(&self, entries: &[KeyValue]) -> Result<()> {
        (**self).put_states(entries)
    }

    fn get_state_by_range(&self, start: &str, end: &str) -> Result<Vec<KeyValue>> {
        (**self).get_state_by_range(start, end)
    }
}
