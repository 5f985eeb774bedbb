//! rf-units: quantities used by definition files
//!
//! Volumes, masses and game time are stored as integers of their smallest
//! unit and read from strings such as `"250 ml"`, `"2 L"` or `"6 hours"`.
//! Bare integers are accepted everywhere and are taken in the base unit.

mod mass;
mod parse;
mod time;
mod volume;

pub use mass::Mass;
pub use parse::{UnitError, parse_quantity};
pub use time::{TimeDuration, TimePoint};
pub use volume::Volume;
