//! Collaborators the examine actors talk to
//!
//! The map, the acting character, the UI and the creature list belong to the
//! wider game. Actors only see them through these traits.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::itype::{Item, ItypeId};
use crate::mapdata::{FurnId, TerId};

/// Tiles per side of one overmap tile (map chunk)
pub const OMT_SIZE: i32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Tripoint {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Tripoint {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// All points with Chebyshev distance `<= radius` on the same z-level
    pub fn points_in_radius(self, radius: i32) -> impl Iterator<Item = Tripoint> {
        let r = radius.max(0);
        (self.y - r..=self.y + r)
            .flat_map(move |y| (self.x - r..=self.x + r).map(move |x| Tripoint::new(x, y, self.z)))
    }

    /// Overmap tile containing this absolute map square
    pub const fn to_omt(self) -> Tripoint {
        Tripoint::new(self.x.div_euclid(OMT_SIZE), self.y.div_euclid(OMT_SIZE), self.z)
    }
}

/// Terrain, furniture and items of the loaded map
pub trait MapAccess {
    fn ter(&self, p: Tripoint) -> TerId;
    fn ter_set(&mut self, p: Tripoint, ter: TerId) -> bool;
    fn furn(&self, p: Tripoint) -> FurnId;
    fn furn_set(&mut self, p: Tripoint, furn: FurnId);

    fn items(&self, p: Tripoint) -> &[Item];
    fn items_mut(&mut self, p: Tripoint) -> &mut Vec<Item>;
    fn add_item(&mut self, p: Tripoint, item: Item) {
        self.items_mut(p).push(item);
    }

    fn set_seen_cache_dirty(&mut self, p: Tripoint);
    fn set_transparency_cache_dirty(&mut self, z: i32);

    /// Convert a local map square to absolute coordinates
    fn get_abs(&self, p: Tripoint) -> Tripoint;
}

/// The character examining a tile
pub trait Character {
    fn pos(&self) -> Tripoint;

    /// Carried items having `flag`
    fn items_with_flag(&self, flag: &str) -> Vec<&Item>;
    fn has_item_with_flag(&self, flag: &str) -> bool {
        !self.items_with_flag(flag).is_empty()
    }

    /// Remove `amount` units of `what` from the carried items
    fn use_amount(&mut self, what: &ItypeId, amount: i32) -> Vec<Item>;

    fn moves(&self) -> i32;
    fn mod_moves(&mut self, delta: i32);

    /// Copy of every item usable for crafting (carried and nearby)
    fn crafting_inventory(&self) -> Vec<Item>;

    /// Remove `amount` units of `what` from the crafting inventory, using only
    /// items accepted by `filter`
    fn consume_items(&mut self, what: &ItypeId, amount: i32, filter: &dyn Fn(&Item) -> bool)
    -> Vec<Item>;

    /// Move points spent handling one item
    fn item_handling_cost(&self, item: &Item) -> i32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MsgType {
    #[default]
    Neutral,
    Info,
    Good,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub retval: i32,
    pub enabled: bool,
    pub hotkey: Option<char>,
    pub text: String,
    pub desc: String,
}

impl MenuEntry {
    pub fn new(retval: i32, enabled: bool, hotkey: Option<char>, text: impl Into<String>) -> Self {
        Self {
            retval,
            enabled,
            hotkey,
            text: text.into(),
            desc: String::new(),
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    pub title: String,
    pub entries: Vec<MenuEntry>,
    pub desc_enabled: bool,
}

impl Menu {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn add(&mut self, entry: MenuEntry) {
        self.entries.push(entry);
    }

    pub fn entry(&self, retval: i32) -> Option<&MenuEntry> {
        self.entries.iter().find(|e| e.retval == retval)
    }
}

/// Blocking user interface; every query may be cancelled
pub trait Ui {
    /// Returns the `retval` of an enabled entry, `None` on cancel
    fn menu(&mut self, menu: &Menu) -> Option<i32>;
    fn query_yn(&mut self, msg: &str) -> bool;
    /// Numeric input prefilled with `default`; `None` on cancel
    fn query_int(&mut self, title: &str, default: i32, only_digits: bool) -> Option<i32>;
    fn popup(&mut self, text: &str);
    fn add_msg(&mut self, kind: MsgType, msg: &str);
}

pub type CreatureHandle = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatureInfo {
    pub handle: CreatureHandle,
    pub pos: Tripoint,
    pub flags: BTreeSet<String>,
    /// Hostile toward the acting character
    pub hostile: bool,
}

impl CreatureInfo {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }
}

pub trait CreatureRegistry {
    fn creatures(&self) -> Vec<CreatureInfo>;
    fn despawn(&mut self, handle: CreatureHandle) -> bool;
}

/// Runs a named map generator over one overmap tile
pub trait MapgenHook {
    fn update(&mut self, mapgen_id: &str, omt: Tripoint) -> bool;
}

/// Interactions owned by other game systems
pub trait InteractionHooks {
    fn try_start_hacking(&mut self, who: &mut dyn Character, p: Tripoint);
    fn reload_furniture(&mut self, who: &mut dyn Character, map: &mut dyn MapAccess, p: Tripoint);
}
