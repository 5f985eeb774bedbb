//! Item types and item instances as seen by map furniture

use std::collections::BTreeSet;

use hashbrown::HashMap;
use rf_units::{TimeDuration, TimePoint, Volume};
use serde::Deserialize;

use crate::flag_registry::FlagRegistry;
use crate::ids::{NullId, StringId};
use crate::json::JsonError;

pub type ItypeId = StringId<ItemType>;

pub const FLAG_PROCESSING: &str = "PROCESSING";
pub const FLAG_COOKED: &str = "COOKED";
pub const FLAG_NUTRIENT_OVERRIDE: &str = "NUTRIENT_OVERRIDE";

/// The parts of an item definition that map furniture cares about
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemType {
    pub id: ItypeId,
    #[serde(default)]
    pub name: String,
    /// Volume of one unit (one charge for items counted by charges)
    #[serde(default = "default_volume")]
    pub volume: Volume,
    #[serde(default)]
    pub count_by_charges: bool,
    /// Zero never spoils
    #[serde(default)]
    pub spoils_in: TimeDuration,
    /// Item produced when this one is processed (`smoking_result`)
    #[serde(default, alias = "smoking_result")]
    pub processing_result: ItypeId,
    #[serde(default)]
    pub cooks_like: ItypeId,
    #[serde(default)]
    pub flags: BTreeSet<String>,
}

fn default_volume() -> Volume {
    Volume::from_milliliter(250)
}

impl NullId for ItemType {
    const NULL_ID: &'static str = "null";
}

#[derive(Debug, Clone, Default)]
pub struct ItemTypes {
    types: HashMap<ItypeId, ItemType>,
}

impl ItemTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, record: &serde_json::Value) -> Result<&ItemType, JsonError> {
        let itype = ItemType::deserialize(record)?;
        log::debug!(target: "rf_mapdata::items", "loaded item type {}", itype.id);
        let id = itype.id.clone();
        self.types.insert(id.clone(), itype);
        Ok(&self.types[&id])
    }

    pub fn insert(&mut self, itype: ItemType) {
        self.types.insert(itype.id.clone(), itype);
    }

    pub fn get(&self, id: &ItypeId) -> Option<&ItemType> {
        self.types.get(id)
    }

    pub fn is_valid(&self, id: &ItypeId) -> bool {
        self.types.contains_key(id)
    }

    /// Display name; unknown types show their id
    pub fn nname<'a>(&'a self, id: &'a ItypeId) -> &'a str {
        match self.types.get(id) {
            Some(itype) if !itype.name.is_empty() => &itype.name,
            _ => id.as_str(),
        }
    }

    pub fn count_by_charges(&self, id: &ItypeId) -> bool {
        self.types.get(id).is_some_and(|t| t.count_by_charges)
    }

    /// Flag set on the item itself or on its type
    pub fn item_has_flag(&self, item: &Item, flag: &str) -> bool {
        item.has_flag(flag)
            || self
                .types
                .get(&item.type_id)
                .is_some_and(|t| t.flags.contains(flag))
    }

    /// Volume of one unit of `id`
    pub fn unit_volume(&self, id: &ItypeId) -> Volume {
        self.types.get(id).map_or_else(default_volume, |t| t.volume)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn reset(&mut self) {
        self.types.clear();
    }
}

/// One item stack on a tile or in an inventory
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub type_id: ItypeId,
    /// Stack size for items counted by charges, 1 otherwise
    pub charges: i32,
    /// General purpose counter; processing markers keep remaining turns here
    pub counter: i64,
    pub birthday: TimePoint,
    pub flags: BTreeSet<String>,
    /// Spoilage progress, 1.0 is rotten
    pub relative_rot: f64,
    pub components: Vec<Item>,
    /// Charges of the recipe that produced this item
    pub recipe_charges: i32,
}

impl Item {
    pub fn new(type_id: ItypeId, birthday: TimePoint, charges: i32) -> Self {
        Self {
            type_id,
            charges,
            counter: 0,
            birthday,
            flags: BTreeSet::new(),
            relative_rot: 0.0,
            components: Vec::new(),
            recipe_charges: 1,
        }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn set_flag(&mut self, flag: &str) {
        self.flags.insert(flag.to_string());
    }

    pub fn unset_flag(&mut self, flag: &str) {
        self.flags.remove(flag);
    }

    /// Set a flag on this item and every component
    pub fn set_flag_recursive(&mut self, flag: &str) {
        self.set_flag(flag);
        for component in &mut self.components {
            component.set_flag_recursive(flag);
        }
    }

    /// Take over the inheritable flags of `source`
    pub fn inherit_flags(&mut self, source: &Item, registry: &FlagRegistry) {
        for flag in source.flags.iter().filter(|f| registry.inherits(f)) {
            self.flags.insert(flag.clone());
        }
    }

    pub fn age(&self, now: TimePoint) -> TimeDuration {
        now - self.birthday
    }

    pub fn is_rotten(&self) -> bool {
        self.relative_rot >= 1.0
    }

    /// Volume of the whole stack
    pub fn volume(&self, types: &ItemTypes) -> Volume {
        let unit = types.unit_volume(&self.type_id);
        if types.count_by_charges(&self.type_id) {
            unit * i64::from(self.charges.max(0))
        } else {
            unit
        }
    }

    /// Spoilage accrued while sitting in a processing station for `duration`;
    /// processing halves the normal rate
    pub fn calc_rot_while_processing(&mut self, duration: TimeDuration, types: &ItemTypes) {
        let Some(itype) = types.get(&self.type_id) else {
            return;
        };
        if itype.spoils_in.turns() <= 0 {
            return;
        }
        let fraction = duration.turns() as f64 / itype.spoils_in.turns() as f64;
        self.relative_rot += fraction * 0.5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> ItemTypes {
        let mut types = ItemTypes::new();
        types
            .load(&json!({
                "id": "meat", "name": "chunk of meat", "volume": "250 ml",
                "spoils_in": "1 day", "smoking_result": "meat_smoked"
            }))
            .unwrap();
        types
            .load(&json!({
                "id": "charcoal", "name": "charcoal", "volume": "10 ml", "count_by_charges": true
            }))
            .unwrap();
        types
    }

    #[test]
    fn test_item_type_fields() {
        let types = catalog();
        let meat = types.get(&ItypeId::new("meat")).unwrap();
        assert_eq!(meat.processing_result, ItypeId::new("meat_smoked"));
        assert!(meat.cooks_like.is_null());
        assert_eq!(meat.spoils_in, TimeDuration::from_days(1));
        assert_eq!(types.nname(&ItypeId::new("meat")), "chunk of meat");
        assert_eq!(types.nname(&ItypeId::new("mystery")), "mystery");
    }

    #[test]
    fn test_stack_volume() {
        let types = catalog();
        let coal = Item::new(ItypeId::new("charcoal"), TimePoint::TURN_ZERO, 30);
        assert_eq!(coal.volume(&types), Volume::from_milliliter(300));
        let meat = Item::new(ItypeId::new("meat"), TimePoint::TURN_ZERO, 1);
        assert_eq!(meat.volume(&types), Volume::from_milliliter(250));
    }

    #[test]
    fn test_rot_while_processing() {
        let types = catalog();
        let mut meat = Item::new(ItypeId::new("meat"), TimePoint::TURN_ZERO, 1);
        meat.calc_rot_while_processing(TimeDuration::from_hours(6), &types);
        assert!((meat.relative_rot - 0.125).abs() < 1e-9);

        let mut coal = Item::new(ItypeId::new("charcoal"), TimePoint::TURN_ZERO, 5);
        coal.calc_rot_while_processing(TimeDuration::from_hours(6), &types);
        assert_eq!(coal.relative_rot, 0.0);
    }

    #[test]
    fn test_set_flag_recursive() {
        let mut item = Item::new(ItypeId::new("meat_smoked"), TimePoint::TURN_ZERO, 1);
        item.components
            .push(Item::new(ItypeId::new("meat"), TimePoint::TURN_ZERO, 1));
        item.set_flag_recursive(FLAG_COOKED);
        assert!(item.has_flag(FLAG_COOKED));
        assert!(item.components[0].has_flag(FLAG_COOKED));
    }
}
