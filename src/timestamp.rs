//! Timestamp prefixes for decorated log calls.
//!
//! Timestamps are always rendered in UTC using strftime-compatible format
//! strings. The current time comes from a [`Clock`] so that callers (and
//! tests) can substitute their own time source.

use std::fmt;
use std::sync::Arc;

use jiff::tz::TimeZone;
use parking_lot::Mutex;

use crate::error::WrapError;

/// Default timestamp format (`YYYY-MM-DDTHH:MM:SS.mmmZ`).
pub const DEFAULT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A source of the current instant.
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> jiff::Timestamp;
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> jiff::Timestamp {
        jiff::Timestamp::now()
    }
}

/// A clock that stays at one instant until it is moved by hand.
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to a decorated logger.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Arc<Mutex<jiff::Timestamp>>,
}

impl FixedClock {
    pub fn new(instant: jiff::Timestamp) -> Self {
        Self {
            instant: Arc::new(Mutex::new(instant)),
        }
    }

    /// Clock fixed at a Unix epoch offset in milliseconds.
    pub fn from_millisecond(ms: i64) -> Result<Self, WrapError> {
        let instant = jiff::Timestamp::from_millisecond(ms)
            .map_err(|e| WrapError::invalid(format!("timestamp out of range: {e}")))?;
        Ok(Self::new(instant))
    }

    pub fn set(&self, instant: jiff::Timestamp) {
        *self.instant.lock() = instant;
    }

    /// Move the clock forward (or backward, for a negative duration).
    ///
    /// The clock is left unchanged if the result would be out of range.
    pub fn advance(&self, by: jiff::SignedDuration) {
        let mut guard = self.instant.lock();
        if let Ok(next) = guard.checked_add(by) {
            *guard = next;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> jiff::Timestamp {
        *self.instant.lock()
    }
}

/// Format `instant` in UTC using the given strftime-compatible format string.
pub fn format_utc(instant: jiff::Timestamp, format: &str) -> Result<String, WrapError> {
    let zoned = instant.to_zoned(TimeZone::UTC);
    jiff::fmt::strtime::format(format, &zoned)
        .map_err(|e| WrapError::invalid(format!("invalid timestamp format {format:?}: {e}")))
}

/// A validated timestamp format bound to a clock.
#[derive(Debug, Clone)]
pub struct TimestampPrefix {
    format: String,
    clock: Arc<dyn Clock>,
}

impl TimestampPrefix {
    /// Build a prefix renderer. `format` of `None` selects [`DEFAULT_FORMAT`].
    ///
    /// The format is checked once here so rendering during a log call cannot fail.
    pub fn new(format: Option<&str>, clock: Arc<dyn Clock>) -> Result<Self, WrapError> {
        let format = format.unwrap_or(DEFAULT_FORMAT).to_string();
        format_utc(jiff::Timestamp::UNIX_EPOCH, &format)?;
        Ok(Self { format, clock })
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Current time rendered with this prefix's format.
    pub fn render(&self) -> String {
        let now = self.clock.now();
        // Validated in `new`; the default format is a safe fallback.
        format_utc(now, &self.format)
            .or_else(|_| format_utc(now, DEFAULT_FORMAT))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> jiff::Timestamp {
        // 2026-01-15T10:30:00.123Z
        jiff::Timestamp::from_millisecond(1_768_473_000_123).unwrap()
    }

    #[test]
    fn test_format_utc_default() {
        assert_eq!(
            format_utc(sample(), DEFAULT_FORMAT).unwrap(),
            "2026-01-15T10:30:00.123Z"
        );
    }

    #[test]
    fn test_format_utc_custom() {
        assert_eq!(format_utc(sample(), "%H:%M:%S").unwrap(), "10:30:00");
        assert_eq!(
            format_utc(sample(), "%Y-%m-%d %H:%M:%S").unwrap(),
            "2026-01-15 10:30:00"
        );
    }

    #[test]
    fn test_format_utc_rejects_dangling_percent() {
        let err = format_utc(sample(), "%Y-%").unwrap_err();
        assert!(matches!(err, WrapError::InvalidArgument(_)));
    }

    #[test]
    fn test_epoch_zero() {
        assert_eq!(
            format_utc(jiff::Timestamp::UNIX_EPOCH, DEFAULT_FORMAT).unwrap(),
            "1970-01-01T00:00:00.000Z"
        );
    }

    #[test]
    fn test_fixed_clock_set_and_advance() {
        let clock = FixedClock::new(sample());
        assert_eq!(clock.now(), sample());

        clock.advance(jiff::SignedDuration::from_secs(60));
        assert_eq!(
            format_utc(clock.now(), "%H:%M:%S").unwrap(),
            "10:31:00"
        );

        clock.set(jiff::Timestamp::UNIX_EPOCH);
        assert_eq!(clock.now(), jiff::Timestamp::UNIX_EPOCH);
    }

    #[test]
    fn test_fixed_clock_clones_share_instant() {
        let clock = FixedClock::new(sample());
        let other = clock.clone();
        clock.set(jiff::Timestamp::UNIX_EPOCH);
        assert_eq!(other.now(), jiff::Timestamp::UNIX_EPOCH);
    }

    #[test]
    fn test_prefix_renders_with_clock() {
        let clock = Arc::new(FixedClock::new(sample()));
        let prefix = TimestampPrefix::new(None, clock).unwrap();
        assert_eq!(prefix.format(), DEFAULT_FORMAT);
        assert_eq!(prefix.render(), "2026-01-15T10:30:00.123Z");
    }

    #[test]
    fn test_prefix_custom_format() {
        let clock = Arc::new(FixedClock::new(sample()));
        let prefix = TimestampPrefix::new(Some("%Y/%m/%d"), clock).unwrap();
        assert_eq!(prefix.render(), "2026/01/15");
    }

    #[test]
    fn test_prefix_rejects_bad_format_up_front() {
        let clock = Arc::new(SystemClock);
        assert!(TimestampPrefix::new(Some("%"), clock).is_err());
    }
}
