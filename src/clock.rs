use std::time::{SystemTime, UNIX_EPOCH};

use crate::traits::Clock;

/// Earliest timestamp a clock reports. `0` is the stored form of an unset
/// `EndTime`, so no record may be stamped with it.
pub const MIN_TIMESTAMP: i64 = 1;

/// Reads the executing replica's wall clock.
///
/// Two replicas applying the same transaction will generally stamp
/// different times. Use `TxClock` when replicas must agree on state.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
            .max(MIN_TIMESTAMP)
    }
}

/// Transaction time agreed by the ordering substrate for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxClock {
    timestamp: i64,
}

impl TxClock {
    /// Timestamps below `MIN_TIMESTAMP` are raised to it.
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp: timestamp.max(MIN_TIMESTAMP),
        }
    }
}

impl Clock for TxClock {
    fn now_unix(&self) -> i64 {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_clock_is_fixed() {
        let clock = TxClock::new(1_700_000_000);
        assert_eq!(clock.now_unix(), 1_700_000_000);
        assert_eq!(clock.now_unix(), clock.now_unix());
    }

    #[test]
    fn test_clocks_never_report_zero() {
        assert_eq!(TxClock::new(0).now_unix(), MIN_TIMESTAMP);
        assert_eq!(TxClock::new(-5).now_unix(), MIN_TIMESTAMP);
        assert!(SystemClock.now_unix() >= MIN_TIMESTAMP);
    }

    #[test]
    fn test_system_clock_is_after_epoch() {
        assert!(SystemClock.now_unix() > 0);
    }
}
