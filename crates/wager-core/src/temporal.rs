//! # Temporal Types — UTC Timestamps and the Clock Capability
//!
//! [`Timestamp`] is UTC-only and truncated to seconds, so deadlines compare
//! exactly and serialize as `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! ## Time Is a Guard, Not a Timer
//!
//! Nothing in the protocol fires on its own. Each time-dependent entry
//! point reads a [`Clock`] once, when some caller invokes it, and checks a
//! guard against that reading. [`SystemClock`] reads wall time;
//! [`ManualClock`] is set explicitly, which makes every deadline
//! deterministic under test.

use std::sync::Arc;

use chrono::{DateTime, Duration, Timelike, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 string. Only the `Z` suffix is accepted.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if !s.ends_with('Z') {
            return Err(ValidationError::InvalidTimestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            ValidationError::InvalidTimestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from Unix epoch seconds.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, ValidationError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidTimestamp(format!("unix timestamp {secs}")))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// `self + period`, or an error if the result is unrepresentable.
    pub fn checked_add(&self, period: Duration) -> Result<Self, ValidationError> {
        self.0
            .checked_add_signed(period)
            .map(|dt| Self(truncate_to_seconds(dt)))
            .ok_or_else(|| {
                ValidationError::InvalidTimestamp(format!("{self} + {}s overflows", period.num_seconds()))
            })
    }

    /// `self - earlier`, which may be negative.
    pub fn since(&self, earlier: &Timestamp) -> Duration {
        self.0 - earlier.0
    }

    /// Render as ISO8601 with Z suffix.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

// ─── Clock ──────────────────────────────────────────────────────────

/// Source of "now" for every time-guarded operation.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same reading, so a test can hand one clone to the
/// engine and keep another to advance time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    /// Create a clock reading `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Set the reading.
    pub fn set(&self, at: Timestamp) {
        *self.current.lock() = at;
    }

    /// Move the reading forward by `period`.
    ///
    /// Saturates at the current reading if the result is unrepresentable.
    pub fn advance(&self, period: Duration) {
        let mut current = self.current.lock();
        if let Ok(next) = current.checked_add(period) {
            *current = next;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }

    #[test]
    fn from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 45).unwrap();
        let ts = Timestamp::from_utc(dt.with_nanosecond(123_456_789).unwrap());
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:30:45Z");
    }

    #[test]
    fn parse_requires_z_suffix() {
        assert!(Timestamp::parse("2026-01-15T12:00:00Z").is_ok());
        assert!(Timestamp::parse("2026-01-15T12:00:00+00:00").is_err());
        assert!(Timestamp::parse("not-a-date").is_err());
    }

    #[test]
    fn checked_add_moves_forward() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let later = ts.checked_add(Duration::hours(24)).unwrap();
        assert_eq!(later.to_iso8601(), "2026-01-16T12:00:00Z");
        assert_eq!(later.since(&ts), Duration::hours(24));
    }

    #[test]
    fn checked_add_reports_overflow() {
        let ts = Timestamp::from_utc(DateTime::<Utc>::MAX_UTC);
        assert!(ts.checked_add(Duration::days(1)).is_err());
    }

    #[test]
    fn epoch_roundtrip() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        assert_eq!(Timestamp::from_epoch_secs(ts.epoch_secs()).unwrap(), ts);
    }

    #[test]
    fn manual_clock_clones_share_reading() {
        let start = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let clock = ManualClock::new(start);
        let handle = clock.clone();
        handle.advance(Duration::seconds(90));
        assert_eq!(clock.now().to_iso8601(), "2026-01-15T12:01:30Z");
        handle.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn serde_roundtrip() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }
}
