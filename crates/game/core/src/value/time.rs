//! Millisecond time primitives.
//!
//! All time comparison and arithmetic in the core goes through [`Timestamp`]
//! and [`Duration`]. No other module performs raw numeric time math, which
//! rules out unit-confusion bugs between seconds, millis, and minutes.
//!
//! The core never reads a clock: every entry point takes `now` as an
//! argument, which is what makes offline catch-up deterministic.

use std::fmt;

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60_000;

/// Absolute instant expressed as milliseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Self = Self(0);

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Elapsed time since `earlier`, zero if `earlier` is in the future.
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0 + rhs.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Span of time expressed in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Duration(u64);

impl Duration {
    pub const ZERO: Self = Self(0);

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn from_seconds(seconds: u64) -> Self {
        Self(seconds * MILLIS_PER_SECOND)
    }

    pub const fn from_minutes(minutes: u64) -> Self {
        Self(minutes * MILLIS_PER_MINUTE)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Fractional minutes, used by the slot generation rate formula.
    pub fn as_minutes_f64(self) -> f64 {
        self.0 as f64 / MILLIS_PER_MINUTE as f64
    }

    /// Scales the duration by a factor, flooring to whole milliseconds.
    ///
    /// Negative factors are treated as zero.
    pub fn scaled(self, factor: f64) -> Duration {
        if factor <= 0.0 {
            return Duration::ZERO;
        }
        Duration((self.0 as f64 * factor).floor() as u64)
    }
}

impl std::ops::Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0 + rhs.0)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_plus_duration() {
        let at = Timestamp::from_millis(1_000) + Duration::from_seconds(2);
        assert_eq!(at, Timestamp::from_millis(3_000));
    }

    #[test]
    fn saturating_since_clamps_to_zero() {
        let earlier = Timestamp::from_millis(5_000);
        let later = Timestamp::from_millis(2_000);
        assert_eq!(later.saturating_since(earlier), Duration::ZERO);
        assert_eq!(
            earlier.saturating_since(later),
            Duration::from_seconds(3)
        );
    }

    #[test]
    fn minutes_conversion() {
        assert_eq!(Duration::from_minutes(2).as_millis(), 120_000);
        assert!((Duration::from_seconds(30).as_minutes_f64() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn scaled_floors_to_whole_millis() {
        assert_eq!(Duration::from_millis(1_001).scaled(0.5).as_millis(), 500);
        assert_eq!(Duration::from_millis(100).scaled(-1.0), Duration::ZERO);
    }
}
