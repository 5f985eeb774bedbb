//! Terrain/furniture flags and connection groups
//!
//! Flags are free-form strings in definition files. The ones queried on hot
//! paths (movement, vision, fire) are mirrored in [`TerBitflags`] so that a
//! lookup is a single bit test.

use std::collections::BTreeSet;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

bitflags! {
    /// Fast flags; constant names match the flag strings used in data files
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TerBitflags: u64 {
        const TRANSPARENT = 1 << 0;
        const FLAMMABLE = 1 << 1;
        const REDUCE_SCENT = 1 << 2;
        const SWIMMABLE = 1 << 3;
        const SUPPORTS_ROOF = 1 << 4;
        const MINEABLE = 1 << 5;
        const NOITEM = 1 << 6;
        const NO_SIGHT = 1 << 7;
        const NO_SCENT = 1 << 8;
        const SEALED = 1 << 9;
        const ALLOW_FIELD_EFFECT = 1 << 10;
        const LIQUID = 1 << 11;
        const COLLAPSES = 1 << 12;
        const FLAMMABLE_ASH = 1 << 13;
        const DESTROY_ITEM = 1 << 14;
        const INDOORS = 1 << 15;
        const LIQUIDCONT = 1 << 16;
        const FIRE_CONTAINER = 1 << 17;
        const FLAMMABLE_HARD = 1 << 18;
        const SUPPRESS_SMOKE = 1 << 19;
        const SHARP = 1 << 20;
        const DIGGABLE = 1 << 21;
        const ROUGH = 1 << 22;
        const UNSTABLE = 1 << 23;
        const WALL = 1 << 24;
        const DEEP_WATER = 1 << 25;
        const SHALLOW_WATER = 1 << 26;
        const NO_SHOOT = 1 << 27;
        const CURRENT = 1 << 28;
        const HARVESTED = 1 << 29;
        const PERMEABLE = 1 << 30;
        const AUTO_WALL_SYMBOL = 1 << 31;
        const CONNECT_TO_WALL = 1 << 32;
        const CLIMBABLE = 1 << 33;
        const GOES_DOWN = 1 << 34;
        const GOES_UP = 1 << 35;
        const NO_FLOOR = 1 << 36;
        const SEEN_FROM_ABOVE = 1 << 37;
        const RAMP_DOWN = 1 << 38;
        const RAMP_UP = 1 << 39;
        const RAMP = 1 << 40;
        const HIDE_PLACE = 1 << 41;
        const BLOCK_WIND = 1 << 42;
        const FLAT = 1 << 43;
        const RAIL = 1 << 44;
        const THIN_OBSTACLE = 1 << 45;
        const SMALL_PASSAGE = 1 << 46;
        const Z_TRANSPARENT = 1 << 47;
        const SUN_ROOF_ABOVE = 1 << 48;
        const FUNGUS = 1 << 49;
    }
}

// Manual serde impl for TerBitflags
impl Serialize for TerBitflags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TerBitflags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u64::deserialize(deserializer)?;
        Ok(TerBitflags::from_bits_truncate(bits))
    }
}

/// Visual connection group of a tile
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
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectGroup {
    #[default]
    None,
    Wall,
    Chainfence,
    Woodfence,
    Railing,
    Poolwater,
    Water,
    Pavement,
    Rail,
    Counter,
    CanvasWall,
}

/// String flag set with a bit mirror for the fast flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    names: BTreeSet<String>,
    bits: TerBitflags,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a flag; returns its fast bit when it has one
    pub fn insert(&mut self, name: &str) -> Option<TerBitflags> {
        self.names.insert(name.to_string());
        let bit = TerBitflags::from_name(name)?;
        self.bits.insert(bit);
        Some(bit)
    }

    pub fn remove(&mut self, name: &str) {
        self.names.remove(name);
        if let Some(bit) = TerBitflags::from_name(name) {
            self.bits.remove(bit);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        match TerBitflags::from_name(name) {
            Some(bit) => self.bits.contains(bit),
            None => self.names.contains(name),
        }
    }

    pub fn has_bit(&self, bit: TerBitflags) -> bool {
        self.bits.contains(bit)
    }

    pub fn bits(&self) -> TerBitflags {
        self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
        self.bits = TerBitflags::empty();
    }
}
