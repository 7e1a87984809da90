//! Round-based durations.
//!
//! Combat and spell timing is counted in rounds of six seconds. A duration is
//! stored as a round count and can be shown as wall-clock time. Converting
//! wall-clock time back only works for whole rounds.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::DomainError;

/// Seconds in one round.
pub const SECONDS_PER_ROUND: u32 = 6;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3600;

/// Wall-clock time that cannot be expressed as a whole number of rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidDurationError {
    /// The seconds component is not a multiple of six.
    #[error("Invalid duration: {seconds}s is not a multiple of {SECONDS_PER_ROUND} seconds")]
    NotWholeRounds { seconds: u32 },
    /// Durations cannot run backwards.
    #[error("Invalid duration: negative time span")]
    Negative,
    /// Sub-second precision has no round equivalent.
    #[error("Invalid duration: fractional seconds are not representable")]
    FractionalSeconds,
    /// The round count does not fit the storage type.
    #[error("Invalid duration: too long to count in rounds")]
    TooLong,
}

/// Hours, minutes and seconds of a wall-clock span.
///
/// Produced by [`Duration::to_clock_time`] with minutes and seconds below 60.
/// Values built by hand may carry larger components; conversion back to rounds
/// still adds them up correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockTime {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl ClockTime {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Total length in seconds.
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * SECONDS_PER_HOUR
            + u64::from(self.minutes) * SECONDS_PER_MINUTE
            + u64::from(self.seconds)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

impl FromStr for ClockTime {
    type Err = DomainError;

    /// Parses `HH:MM:SS`. Hours may exceed 24.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let [h, m, sec] = parts.as_slice() else {
            return Err(DomainError::parse(format!(
                "Expected HH:MM:SS clock time, got '{}'",
                s
            )));
        };
        let field = |value: &str, name: &str| {
            value.parse::<u32>().map_err(|_| {
                DomainError::parse(format!("Invalid {} in clock time '{}'", name, s))
            })
        };
        Ok(Self {
            hours: field(*h, "hours")?,
            minutes: field(*m, "minutes")?,
            seconds: field(*sec, "seconds")?,
        })
    }
}

/// A span of in-game time counted in rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration(u32);

impl Duration {
    pub const fn from_rounds(rounds: u32) -> Self {
        Self(rounds)
    }

    pub const fn rounds(&self) -> u32 {
        self.0
    }

    /// Total length in seconds.
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.0) * u64::from(SECONDS_PER_ROUND)
    }

    /// Breaks the duration into hours, minutes and seconds.
    ///
    /// Each unit is taken from what the larger units leave over, so the
    /// breakdown converts back to the same round count.
    pub fn to_clock_time(&self) -> ClockTime {
        let total = self.total_seconds();
        // u32 rounds * 6 / 3600 always fits in u32
        let hours = (total / SECONDS_PER_HOUR) as u32;
        let minutes = ((total / SECONDS_PER_MINUTE) % 60) as u32;
        let seconds = (total % SECONDS_PER_MINUTE) as u32;
        ClockTime {
            hours,
            minutes,
            seconds,
        }
    }

    /// Converts wall-clock time to rounds.
    ///
    /// Fails when the seconds component is not a multiple of six.
    pub fn from_clock_time(time: ClockTime) -> Result<Self, InvalidDurationError> {
        if time.seconds % SECONDS_PER_ROUND != 0 {
            return Err(InvalidDurationError::NotWholeRounds {
                seconds: time.seconds,
            });
        }
        let rounds = u64::from(time.seconds / SECONDS_PER_ROUND)
            + u64::from(time.minutes) * 10
            + u64::from(time.hours) * 600;
        u32::try_from(rounds)
            .map(Self)
            .map_err(|_| InvalidDurationError::TooLong)
    }

    /// The duration as a chrono time span.
    pub fn to_time_delta(&self) -> TimeDelta {
        // total_seconds is at most u32::MAX * 6, far inside the TimeDelta range
        TimeDelta::seconds(self.total_seconds() as i64)
    }
}

impl TryFrom<ClockTime> for Duration {
    type Error = InvalidDurationError;

    fn try_from(value: ClockTime) -> Result<Self, Self::Error> {
        Self::from_clock_time(value)
    }
}

impl TryFrom<TimeDelta> for Duration {
    type Error = InvalidDurationError;

    fn try_from(value: TimeDelta) -> Result<Self, Self::Error> {
        if value < TimeDelta::zero() {
            return Err(InvalidDurationError::Negative);
        }
        if value.subsec_nanos() != 0 {
            return Err(InvalidDurationError::FractionalSeconds);
        }
        let total = u64::try_from(value.num_seconds()).map_err(|_| InvalidDurationError::Negative)?;
        let time = ClockTime {
            hours: u32::try_from(total / SECONDS_PER_HOUR)
                .map_err(|_| InvalidDurationError::TooLong)?,
            minutes: ((total / SECONDS_PER_MINUTE) % 60) as u32,
            seconds: (total % SECONDS_PER_MINUTE) as u32,
        };
        Self::from_clock_time(time)
    }
}

impl From<Duration> for TimeDelta {
    fn from(value: Duration) -> Self {
        value.to_time_delta()
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            1 => write!(f, "1 round"),
            n => write!(f, "{} rounds", n),
        }
    }
}
