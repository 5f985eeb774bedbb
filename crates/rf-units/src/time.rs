//! Game time: turns since the start of the calendar
//!
//! One turn is one second of game time.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::parse::{RawQuantity, UnitError, parse_quantity};

const TIME_UNITS: &[(&str, i64)] = &[
    ("turns", 1),
    ("turn", 1),
    ("t", 1),
    ("seconds", 1),
    ("second", 1),
    ("s", 1),
    ("minutes", 60),
    ("minute", 60),
    ("m", 60),
    ("hours", 3_600),
    ("hour", 3_600),
    ("h", 3_600),
    ("days", 86_400),
    ("day", 86_400),
    ("d", 86_400),
];

/// A span of game time, in turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeDuration(i64);

impl TimeDuration {
    pub const ZERO: TimeDuration = TimeDuration(0);

    pub const fn from_turns(turns: i64) -> Self {
        TimeDuration(turns)
    }

    pub const fn from_minutes(m: i64) -> Self {
        TimeDuration(m * 60)
    }

    pub const fn from_hours(h: i64) -> Self {
        TimeDuration(h * 3_600)
    }

    pub const fn from_days(d: i64) -> Self {
        TimeDuration(d * 86_400)
    }

    pub const fn turns(&self) -> i64 {
        self.0
    }

    /// Movement points for this duration (100 per turn), clamped to `i32`
    pub fn to_moves(&self) -> i32 {
        let moves = self.0.saturating_mul(100);
        i32::try_from(moves).unwrap_or(if moves < 0 { i32::MIN } else { i32::MAX })
    }

    /// `self - rhs`, never below zero
    pub const fn saturating_sub(self, rhs: TimeDuration) -> TimeDuration {
        let left = self.0.saturating_sub(rhs.0);
        TimeDuration(if left < 0 { 0 } else { left })
    }
}

impl Add for TimeDuration {
    type Output = TimeDuration;
    fn add(self, rhs: TimeDuration) -> TimeDuration {
        TimeDuration(self.0 + rhs.0)
    }
}

impl fmt::Display for TimeDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (amount, unit) = match self.0 {
            t if t != 0 && t % 86_400 == 0 => (t / 86_400, "day"),
            t if t != 0 && t % 3_600 == 0 => (t / 3_600, "hour"),
            t if t != 0 && t % 60 == 0 => (t / 60, "minute"),
            t => (t, "turn"),
        };
        if amount == 1 {
            write!(f, "1 {}", unit)
        } else {
            write!(f, "{} {}s", amount, unit)
        }
    }
}

impl FromStr for TimeDuration {
    type Err = UnitError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_quantity(s, TIME_UNITS).map(TimeDuration)
    }
}

impl Serialize for TimeDuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawQuantity::deserialize(deserializer)?
            .resolve(TIME_UNITS)
            .map(TimeDuration)
            .map_err(serde::de::Error::custom)
    }
}

/// An absolute moment of game time, in turns since turn zero
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct TimePoint(i64);

impl TimePoint {
    pub const TURN_ZERO: TimePoint = TimePoint(0);

    pub const fn from_turn(turn: i64) -> Self {
        TimePoint(turn)
    }

    pub const fn turn(&self) -> i64 {
        self.0
    }
}

impl Add<TimeDuration> for TimePoint {
    type Output = TimePoint;
    fn add(self, rhs: TimeDuration) -> TimePoint {
        TimePoint(self.0 + rhs.0)
    }
}

impl Sub for TimePoint {
    type Output = TimeDuration;
    fn sub(self, rhs: TimePoint) -> TimeDuration {
        TimeDuration(self.0 - rhs.0)
    }
}
