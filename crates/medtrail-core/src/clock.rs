//! Block time and clocks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{CoreError, CoreResult};

/// Block time in whole seconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Create a timestamp from seconds since the epoch.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Seconds since the epoch.
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Convert a wall-clock time. Times before the epoch are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTimestamp`] for pre-epoch times.
    pub fn from_datetime(time: DateTime<Utc>) -> CoreResult<Self> {
        u64::try_from(time.timestamp())
            .map(Self)
            .map_err(|_| CoreError::InvalidTimestamp(format!("{time} is before the epoch")))
    }

    /// Convert to a wall-clock time, if representable.
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        i64::try_from(self.0)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of the current block time.
pub trait Clock: Send + Sync {
    /// The time to stamp on the current operation.
    fn now(&self) -> Timestamp;
}

/// Wall clock. Used by hosts that have no block time of their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // Pre-epoch system clocks collapse to zero.
        Timestamp::from_datetime(Utc::now()).unwrap_or_default()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct FixedClock {
    secs: AtomicU64,
}

impl FixedClock {
    /// Create a clock stopped at `time`.
    #[must_use]
    pub fn new(time: Timestamp) -> Self {
        Self {
            secs: AtomicU64::new(time.0),
        }
    }

    /// Move the clock to `time`.
    pub fn set(&self, time: Timestamp) {
        self.secs.store(time.0, Ordering::SeqCst);
    }

    /// Move the clock forward by `secs`, saturating at `u64::MAX`.
    pub fn advance(&self, secs: u64) {
        let _ = self
            .secs
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                Some(cur.saturating_add(secs))
            });
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.secs.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_round_trip() {
        let ts = Timestamp::from_secs(1_617_984_000);
        let dt = ts.to_datetime().unwrap();
        assert_eq!(dt.to_rfc3339(), "2021-04-09T16:00:00+00:00");
        assert_eq!(Timestamp::from_datetime(dt).unwrap(), ts);
    }

    #[test]
    fn test_pre_epoch_rejected() {
        let dt = DateTime::from_timestamp(-1, 0).unwrap();
        assert!(Timestamp::from_datetime(dt).is_err());
    }

    #[test]
    fn test_unrepresentable_datetime() {
        assert!(Timestamp::from_secs(u64::MAX).to_datetime().is_none());
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new(Timestamp::from_secs(100));
        assert_eq!(clock.now(), Timestamp::from_secs(100));
        clock.advance(5);
        assert_eq!(clock.now(), Timestamp::from_secs(105));
        clock.set(Timestamp::from_secs(7));
        assert_eq!(clock.now(), Timestamp::from_secs(7));
        clock.set(Timestamp::from_secs(u64::MAX));
        clock.advance(1);
        assert_eq!(clock.now(), Timestamp::from_secs(u64::MAX));
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now() > Timestamp::from_secs(1_577_836_800));
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_string(&Timestamp::from_secs(42)).unwrap();
        assert_eq!(json, "42");
    }
}
