//! Mass in milligrams

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::parse::{RawQuantity, UnitError, parse_quantity};

const MASS_UNITS: &[(&str, i64)] = &[("mg", 1), ("g", 1_000), ("kg", 1_000_000)];

/// A mass, stored in milligrams
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Mass(i64);

impl Mass {
    pub const ZERO: Mass = Mass(0);
    pub const MAX: Mass = Mass(i64::MAX);

    pub const fn from_milligram(mg: i64) -> Self {
        Mass(mg)
    }

    pub const fn from_gram(g: i64) -> Self {
        Mass(g * 1_000)
    }

    pub const fn from_kilogram(kg: i64) -> Self {
        Mass(kg * 1_000_000)
    }

    pub const fn milligrams(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Mass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 1_000_000 == 0 {
            write!(f, "{} kg", self.0 / 1_000_000)
        } else if self.0 % 1_000 == 0 {
            write!(f, "{} g", self.0 / 1_000)
        } else {
            write!(f, "{} mg", self.0)
        }
    }
}

impl FromStr for Mass {
    type Err = UnitError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_quantity(s, MASS_UNITS).map(Mass)
    }
}

impl Serialize for Mass {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Mass {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawQuantity::deserialize(deserializer)?
            .resolve(MASS_UNITS)
            .map(Mass)
            .map_err(serde::de::Error::custom)
    }
}
