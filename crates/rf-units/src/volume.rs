//! Volume in millilitres

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::parse::{RawQuantity, UnitError, parse_quantity};

const VOLUME_UNITS: &[(&str, i64)] = &[("ml", 1), ("L", 1000)];

/// A volume, stored in millilitres
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Volume(i64);

impl Volume {
    pub const ZERO: Volume = Volume(0);
    pub const MAX: Volume = Volume(i64::MAX);

    pub const fn from_milliliter(ml: i64) -> Self {
        Volume(ml)
    }

    pub const fn from_liter(l: i64) -> Self {
        Volume(l * 1000)
    }

    pub const fn milliliters(&self) -> i64 {
        self.0
    }

    /// Whole litres, truncated toward zero
    pub const fn to_liter(&self) -> i64 {
        self.0 / 1000
    }

    /// Whole litres, rounded up
    pub const fn to_liter_ceil(&self) -> i64 {
        if self.0 <= 0 {
            0
        } else {
            (self.0 + 999) / 1000
        }
    }

    pub fn saturating_sub(self, other: Volume) -> Volume {
        Volume(self.0.saturating_sub(other.0).max(0))
    }
}

impl Add for Volume {
    type Output = Volume;
    fn add(self, rhs: Volume) -> Volume {
        Volume(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Volume {
    fn add_assign(&mut self, rhs: Volume) {
        *self = *self + rhs;
    }
}

impl Sub for Volume {
    type Output = Volume;
    fn sub(self, rhs: Volume) -> Volume {
        Volume(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Volume {
    fn sub_assign(&mut self, rhs: Volume) {
        *self = *self - rhs;
    }
}

impl Mul<i64> for Volume {
    type Output = Volume;
    fn mul(self, rhs: i64) -> Volume {
        Volume(self.0.saturating_mul(rhs))
    }
}

/// How many times `rhs` fits into `self`; zero when `rhs` is empty
impl Div for Volume {
    type Output = i64;
    fn div(self, rhs: Volume) -> i64 {
        if rhs.0 == 0 { 0 } else { self.0 / rhs.0 }
    }
}

impl Sum for Volume {
    fn sum<I: Iterator<Item = Volume>>(iter: I) -> Volume {
        iter.fold(Volume::ZERO, |acc, v| acc + v)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 1000 == 0 {
            write!(f, "{} L", self.0 / 1000)
        } else {
            write!(f, "{} ml", self.0)
        }
    }
}

impl FromStr for Volume {
    type Err = UnitError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_quantity(s, VOLUME_UNITS).map(Volume)
    }
}

impl Serialize for Volume {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Volume {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawQuantity::deserialize(deserializer)?
            .resolve(VOLUME_UNITS)
            .map(Volume)
            .map_err(serde::de::Error::custom)
    }
}
