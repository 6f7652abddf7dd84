//! Named relative durations ("last 12 hours", "last 7 days", ...) and their
//! conversion to and from concrete ranges.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum FriendlyDuration {
    Half,
    Day,
    ThreeDays,
    Week,
    Month,
}

impl FriendlyDuration {
    pub const ALL: [FriendlyDuration; 5] = [
        FriendlyDuration::Half,
        FriendlyDuration::Day,
        FriendlyDuration::ThreeDays,
        FriendlyDuration::Week,
        FriendlyDuration::Month,
    ];

    pub const fn seconds(self) -> i64 {
        match self {
            FriendlyDuration::Half => 12 * 3600,
            FriendlyDuration::Day => 86_400,
            FriendlyDuration::ThreeDays => 3 * 86_400,
            FriendlyDuration::Week => 7 * 86_400,
            FriendlyDuration::Month => 30 * 86_400,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FriendlyDuration::Half => "12h",
            FriendlyDuration::Day => "1d",
            FriendlyDuration::ThreeDays => "3d",
            FriendlyDuration::Week => "7d",
            FriendlyDuration::Month => "30d",
        }
    }

    pub fn from_seconds(seconds: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.seconds() == seconds)
    }
}

impl fmt::Display for FriendlyDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FriendlyDuration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.label() == s)
            .ok_or_else(|| Error::UnknownFriendlyDuration(s.to_owned()))
    }
}

impl From<FriendlyDuration> for &'static str {
    fn from(duration: FriendlyDuration) -> Self {
        duration.label()
    }
}

impl TryFrom<String> for FriendlyDuration {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// A concrete `[start, end]` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        TimeRange { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Default)]
pub struct FriendlyRangeConverter<C = SystemClock> {
    clock: C,
}

impl FriendlyRangeConverter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> FriendlyRangeConverter<C> {
    pub fn with_clock(clock: C) -> Self {
        FriendlyRangeConverter { clock }
    }

    /// The range of length `duration` ending at `end`, or at "now" when no end
    /// is given.
    pub fn to_real_range(
        &self,
        duration: FriendlyDuration,
        end: impl Into<Option<DateTime<Utc>>>,
    ) -> TimeRange {
        let end = end.into().unwrap_or_else(|| self.clock.now());
        TimeRange::new(end - Duration::seconds(duration.seconds()), end)
    }

    /// Recovers the friendly duration a range was built from.
    ///
    /// The range must span exactly one of the named durations, in whole
    /// seconds; there is no tolerance.
    pub fn to_friendly_duration(&self, range: &TimeRange) -> Result<FriendlyDuration> {
        let seconds = range.duration().num_seconds();
        FriendlyDuration::from_seconds(seconds).ok_or(Error::NoMatchingFriendlyRange { seconds })
    }
}
