//! Seasons

use rf_units::{TimeDuration, TimePoint};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

pub const NUM_SEASONS: usize = 4;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Season {
    #[default]
    Spring = 0,
    Summer = 1,
    Autumn = 2,
    Winter = 3,
}

impl Season {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Self {
        match index % NUM_SEASONS {
            0 => Season::Spring,
            1 => Season::Summer,
            2 => Season::Autumn,
            _ => Season::Winter,
        }
    }
}

/// Season at `now`, counting from spring at turn zero
pub fn season_of_year(now: TimePoint, season_length: TimeDuration) -> Season {
    let length = season_length.turns().max(1);
    let season = now.turn().div_euclid(length) as usize;
    Season::from_index(season)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_of_year() {
        let length = TimeDuration::from_days(91);
        assert_eq!(season_of_year(TimePoint::TURN_ZERO, length), Season::Spring);
        let summer = TimePoint::TURN_ZERO + TimeDuration::from_days(91);
        assert_eq!(season_of_year(summer, length), Season::Summer);
        let next_spring = TimePoint::TURN_ZERO + TimeDuration::from_days(91 * 4 + 3);
        assert_eq!(season_of_year(next_spring, length), Season::Spring);
    }

    #[test]
    fn test_season_names() {
        assert_eq!("autumn".parse::<Season>(), Ok(Season::Autumn));
        assert_eq!(Season::Winter.to_string(), "winter");
        assert!("monsoon".parse::<Season>().is_err());
    }
}
