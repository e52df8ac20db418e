//! Timestamp data type implementation

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Timestamp data type (milliseconds since Unix epoch)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    /// Milliseconds since Unix epoch
    millis: i64,
}

impl Timestamp {
    /// Create a timestamp from milliseconds
    pub fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    /// Create a timestamp from seconds
    pub fn from_secs(secs: i64) -> Self {
        Self {
            millis: secs * 1000,
        }
    }

    /// Get current timestamp
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();

        Self {
            millis: duration.as_millis() as i64,
        }
    }

    /// Get timestamp in milliseconds
    pub fn as_millis(&self) -> i64 {
        self.millis
    }

    /// Get timestamp in seconds
    pub fn as_secs(&self) -> i64 {
        self.millis / 1000
    }

    /// Elapsed time from `earlier` to `self`, in milliseconds.
    /// Clamped at zero when clocks run backwards.
    pub fn millis_since(&self, earlier: Timestamp) -> i64 {
        (self.millis - earlier.millis).max(0)
    }

    /// Elapsed time from `earlier` to `self`, in fractional days.
    pub fn days_since(&self, earlier: Timestamp) -> f64 {
        self.millis_since(earlier) as f64 / 86_400_000.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_creation() {
        let ts = Timestamp::from_secs(1000);
        assert_eq!(ts.as_secs(), 1000);
        assert_eq!(ts.as_millis(), 1_000_000);
    }

    #[test]
    fn test_timestamp_ordering() {
        let ts1 = Timestamp::from_secs(100);
        let ts2 = Timestamp::from_secs(200);

        assert!(ts1 < ts2);
        assert!(ts2 > ts1);
    }

    #[test]
    fn test_elapsed() {
        let earlier = Timestamp::from_millis(1_000);
        let later = Timestamp::from_millis(87_401_000);

        assert_eq!(later.millis_since(earlier), 86_400_000);
        assert_eq!(later.days_since(earlier), 1.0);
        // Backwards clock clamps to zero
        assert_eq!(earlier.millis_since(later), 0);
    }

    #[test]
    fn test_timestamp_now() {
        let ts = Timestamp::now();
        assert!(ts.as_secs() > 0);
    }
}
