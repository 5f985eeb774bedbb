//! In-memory world shared by the integration tests

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap, VecDeque};

use rf_mapdata::examine::ExamineContext;
use rf_mapdata::itype::{Item, ItypeId};
use rf_mapdata::world::{
    Character, CreatureHandle, CreatureInfo, CreatureRegistry, InteractionHooks, MapAccess, MapgenHook,
    Menu, MsgType, Tripoint, Ui,
};
use rf_mapdata::{Diagnostics, FurnId, FurnStrId, MapData, TerId, TerStrId};
use rf_units::TimePoint;

/// Definitions used by most tests
pub const BASE_DATA: &str = r#"[
    { "type": "json_flag", "id": "SCIENCE_CARD" },
    { "type": "json_flag", "id": "SMOKABLE" },
    { "type": "json_flag", "id": "PROCESSING", "inherit": false },
    { "type": "json_flag", "id": "COOKED" },
    { "type": "json_flag", "id": "FILTHY" },

    { "type": "GENERIC", "id": "science_id_card", "name": "science ID card", "volume": "10 ml" },
    { "type": "GENERIC", "id": "guest_pass", "name": "guest pass", "volume": "10 ml" },
    { "type": "COMESTIBLE", "id": "meat", "name": "chunk of meat", "volume": "250 ml",
      "spoils_in": "1 day", "smoking_result": "meat_smoked", "flags": ["SMOKABLE"] },
    { "type": "COMESTIBLE", "id": "meat_smoked", "name": "smoked meat", "volume": "250 ml" },
    { "type": "COMESTIBLE", "id": "fish_bones", "name": "fish bones", "volume": "250 ml",
      "flags": ["SMOKABLE"] },
    { "type": "GENERIC", "id": "rock", "name": "rock", "volume": "500 ml" },
    { "type": "GENERIC", "id": "charcoal", "name": "charcoal", "volume": "10 ml",
      "count_by_charges": true },
    { "type": "GENERIC", "id": "fake_smoke_plume", "name": "smoke plume" },
    { "type": "GENERIC", "id": "rack_kit", "name": "smoking rack kit" },

    { "type": "terrain", "id": "t_floor", "name": "floor", "description": "A floor.",
      "symbol": ".", "color": "cyan", "move_cost": 2, "flags": ["TRANSPARENT", "FLAT"] },
    { "type": "terrain", "id": "t_door_metal_locked", "name": "locked metal door",
      "description": "A locked door.", "symbol": "+", "color": "cyan", "move_cost": 0,
      "flags": ["LOCKED"] },
    { "type": "terrain", "id": "t_door_metal_c", "name": "closed metal door",
      "description": "A closed door.", "symbol": "+", "color": "cyan", "move_cost": 0,
      "open": "t_door_metal_o" },
    { "type": "terrain", "id": "t_door_metal_o", "name": "open metal door",
      "description": "An open door.", "symbol": "'", "color": "cyan", "move_cost": 2,
      "flags": ["TRANSPARENT"], "close": "t_door_metal_c" },
    { "type": "terrain", "id": "t_card_science", "name": "card reader",
      "description": "A card reader.", "symbol": "6", "color": "pink", "move_cost": 0,
      "examine_action": {
        "type": "cardreader",
        "flags": ["SCIENCE_CARD"],
        "terrain_changes": { "t_door_metal_locked": "t_door_metal_c" },
        "query_msg": "Swipe your card?",
        "success_msg": "You hear a click.",
        "redundant_msg": "Nothing happens."
      } },

    { "type": "furniture", "id": "f_smoking_rack", "name": "smoking rack",
      "description": "A rack for smoking food.", "symbol": "=", "color": "brown",
      "move_cost_mod": 2, "required_str": -1,
      "examine_action": {
        "type": "crafter",
        "active": false,
        "portable": true,
        "furniture_transform": "f_smoking_rack_active",
        "processing_item": "fake_smoke_plume",
        "fuel": "charcoal",
        "min_fuel": 100,
        "fuel_per_liter": 10,
        "max_volume": "2 L",
        "processed_flag": "SMOKABLE",
        "time": "6 hours",
        "disassemble_item": "rack_kit",
        "name": "smoking rack"
      } },
    { "type": "furniture", "id": "f_smoking_rack_active", "name": "active smoking rack",
      "description": "A smoking rack, smoking.", "symbol": "=", "color": "red",
      "move_cost_mod": 2, "required_str": -1,
      "examine_action": {
        "type": "crafter",
        "active": true,
        "can_disable": true,
        "furniture_transform": "f_smoking_rack",
        "processing_item": "fake_smoke_plume",
        "fuel": "charcoal",
        "min_fuel": 100,
        "fuel_per_liter": 10,
        "max_volume": "2 L",
        "processed_flag": "SMOKABLE",
        "time": "6 hours",
        "name": "smoking rack"
      } }
]"#;

/// Load, finalize and check `texts` into a fresh registry
pub fn load_data(texts: &[&str]) -> (MapData, Diagnostics) {
    let mut data = MapData::default();
    let mut diag = Diagnostics::new();
    for text in texts {
        data.load_json_str(text, "core", &mut diag)
            .expect("test data is valid JSON");
    }
    data.finalize(&mut diag);
    data.check(&mut diag);
    (data, diag)
}

pub fn ter(data: &MapData, id: &str) -> TerId {
    data.terrain().obj_by_string(&TerStrId::new(id))
}

pub fn furn(data: &MapData, id: &str) -> FurnId {
    data.furniture().obj_by_string(&FurnStrId::new(id))
}

pub fn item(id: &str, charges: i32) -> Item {
    Item::new(ItypeId::new(id), TimePoint::TURN_ZERO, charges)
}

/// Sparse map; unset squares hold the null terrain and furniture
#[derive(Debug, Default)]
pub struct GridMap {
    ter: HashMap<Tripoint, TerId>,
    furn: HashMap<Tripoint, FurnId>,
    items: HashMap<Tripoint, Vec<Item>>,
    /// Added to local coordinates to get absolute ones
    pub abs_offset: Tripoint,
    pub seen_dirty: Vec<Tripoint>,
    pub transparency_dirty: Vec<i32>,
}

impl GridMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill_ter(&mut self, center: Tripoint, radius: i32, ter: TerId) {
        for p in center.points_in_radius(radius) {
            self.ter.insert(p, ter);
        }
    }
}

impl MapAccess for GridMap {
    fn ter(&self, p: Tripoint) -> TerId {
        self.ter.get(&p).copied().unwrap_or(TerId::NULL)
    }

    fn ter_set(&mut self, p: Tripoint, ter: TerId) -> bool {
        self.ter.insert(p, ter) != Some(ter)
    }

    fn furn(&self, p: Tripoint) -> FurnId {
        self.furn.get(&p).copied().unwrap_or(FurnId::NULL)
    }

    fn furn_set(&mut self, p: Tripoint, furn: FurnId) {
        self.furn.insert(p, furn);
    }

    fn items(&self, p: Tripoint) -> &[Item] {
        self.items.get(&p).map(Vec::as_slice).unwrap_or(&[])
    }

    fn items_mut(&mut self, p: Tripoint) -> &mut Vec<Item> {
        self.items.entry(p).or_default()
    }

    fn set_seen_cache_dirty(&mut self, p: Tripoint) {
        self.seen_dirty.push(p);
    }

    fn set_transparency_cache_dirty(&mut self, z: i32) {
        self.transparency_dirty.push(z);
    }

    fn get_abs(&self, p: Tripoint) -> Tripoint {
        Tripoint::new(
            p.x + self.abs_offset.x,
            p.y + self.abs_offset.y,
            p.z + self.abs_offset.z,
        )
    }
}

/// UI answering from scripted queues and recording what it was shown.
///
/// An empty queue cancels menus, declines yes/no questions and accepts
/// the default of numeric prompts. Picking a disabled entry cancels.
#[derive(Debug, Default)]
pub struct ScriptedUi {
    pub menu_choices: VecDeque<Option<i32>>,
    pub yn_answers: VecDeque<bool>,
    pub int_answers: VecDeque<Option<i32>>,
    pub menus: Vec<Menu>,
    pub questions: Vec<String>,
    pub int_prompts: Vec<(String, i32)>,
    pub popups: Vec<String>,
    pub messages: Vec<(MsgType, String)>,
}

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn choose(&mut self, retval: i32) -> &mut Self {
        self.menu_choices.push_back(Some(retval));
        self
    }

    pub fn cancel(&mut self) -> &mut Self {
        self.menu_choices.push_back(None);
        self
    }

    pub fn answer(&mut self, yes: bool) -> &mut Self {
        self.yn_answers.push_back(yes);
        self
    }

    pub fn enter(&mut self, value: Option<i32>) -> &mut Self {
        self.int_answers.push_back(value);
        self
    }

    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(|(_, msg)| msg.as_str())
    }

    pub fn has_message(&self, needle: &str) -> bool {
        self.messages.iter().any(|(_, msg)| msg.contains(needle))
    }
}

impl Ui for ScriptedUi {
    fn menu(&mut self, menu: &Menu) -> Option<i32> {
        self.menus.push(menu.clone());
        let choice = self.menu_choices.pop_front().flatten()?;
        match menu.entry(choice) {
            Some(entry) if entry.enabled => Some(choice),
            _ => None,
        }
    }

    fn query_yn(&mut self, msg: &str) -> bool {
        self.questions.push(msg.to_string());
        self.yn_answers.pop_front().unwrap_or(false)
    }

    fn query_int(&mut self, title: &str, default: i32, _only_digits: bool) -> Option<i32> {
        self.int_prompts.push((title.to_string(), default));
        self.int_answers.pop_front().unwrap_or(Some(default))
    }

    fn popup(&mut self, text: &str) {
        self.popups.push(text.to_string());
    }

    fn add_msg(&mut self, kind: MsgType, msg: &str) {
        self.messages.push((kind, msg.to_string()));
    }
}

/// A character with a flat inventory. Charges are split off stacks when
/// consumed; an item with one charge is taken whole.
#[derive(Debug, Clone)]
pub struct TestCharacter {
    pub pos: Tripoint,
    pub inventory: Vec<Item>,
    pub moves: i32,
    pub handling_cost: i32,
}

impl TestCharacter {
    pub fn at(pos: Tripoint) -> Self {
        Self {
            pos,
            inventory: Vec::new(),
            moves: 100,
            handling_cost: 10,
        }
    }

    pub fn with(mut self, item: Item) -> Self {
        self.inventory.push(item);
        self
    }

    pub fn count(&self, id: &str) -> i32 {
        self.inventory
            .iter()
            .filter(|it| it.type_id.as_str() == id)
            .map(|it| it.charges)
            .sum()
    }

    fn take(&mut self, what: &ItypeId, amount: i32, filter: &dyn Fn(&Item) -> bool) -> Vec<Item> {
        let mut remaining = amount;
        let mut taken = Vec::new();
        let mut kept = Vec::new();
        for mut it in std::mem::take(&mut self.inventory) {
            if remaining <= 0 || it.type_id != *what || !filter(&it) {
                kept.push(it);
                continue;
            }
            let used = remaining.min(it.charges.max(1));
            remaining -= used;
            if used >= it.charges {
                taken.push(it);
            } else {
                let mut piece = it.clone();
                piece.charges = used;
                it.charges -= used;
                taken.push(piece);
                kept.push(it);
            }
        }
        self.inventory = kept;
        taken
    }
}

impl Character for TestCharacter {
    fn pos(&self) -> Tripoint {
        self.pos
    }

    fn items_with_flag(&self, flag: &str) -> Vec<&Item> {
        self.inventory.iter().filter(|it| it.has_flag(flag)).collect()
    }

    fn use_amount(&mut self, what: &ItypeId, amount: i32) -> Vec<Item> {
        self.take(what, amount, &|_: &Item| true)
    }

    fn moves(&self) -> i32 {
        self.moves
    }

    fn mod_moves(&mut self, delta: i32) {
        self.moves += delta;
    }

    fn crafting_inventory(&self) -> Vec<Item> {
        self.inventory.clone()
    }

    fn consume_items(&mut self, what: &ItypeId, amount: i32, filter: &dyn Fn(&Item) -> bool) -> Vec<Item> {
        self.take(what, amount, filter)
    }

    fn item_handling_cost(&self, _item: &Item) -> i32 {
        self.handling_cost
    }
}

#[derive(Debug, Default)]
pub struct TestCreatures {
    pub list: Vec<CreatureInfo>,
    pub despawned: Vec<CreatureHandle>,
}

impl TestCreatures {
    pub fn spawn(&mut self, pos: Tripoint, hostile: bool, flags: &[&str]) -> CreatureHandle {
        let handle = self.list.len() + self.despawned.len() + 1;
        self.list.push(CreatureInfo {
            handle,
            pos,
            flags: flags.iter().map(|f| f.to_string()).collect::<BTreeSet<_>>(),
            hostile,
        });
        handle
    }
}

impl CreatureRegistry for TestCreatures {
    fn creatures(&self) -> Vec<CreatureInfo> {
        self.list.clone()
    }

    fn despawn(&mut self, handle: CreatureHandle) -> bool {
        let before = self.list.len();
        self.list.retain(|c| c.handle != handle);
        if self.list.len() == before {
            return false;
        }
        self.despawned.push(handle);
        true
    }
}

#[derive(Debug)]
pub struct TestMapgen {
    pub succeed: bool,
    pub calls: Vec<(String, Tripoint)>,
}

impl Default for TestMapgen {
    fn default() -> Self {
        Self {
            succeed: true,
            calls: Vec::new(),
        }
    }
}

impl MapgenHook for TestMapgen {
    fn update(&mut self, mapgen_id: &str, omt: Tripoint) -> bool {
        self.calls.push((mapgen_id.to_string(), omt));
        self.succeed
    }
}

#[derive(Debug, Default)]
pub struct TestHooks {
    pub hacks: Vec<Tripoint>,
    pub reloads: Vec<Tripoint>,
}

impl InteractionHooks for TestHooks {
    fn try_start_hacking(&mut self, _who: &mut dyn Character, p: Tripoint) {
        self.hacks.push(p);
    }

    fn reload_furniture(&mut self, _who: &mut dyn Character, _map: &mut dyn MapAccess, p: Tripoint) {
        self.reloads.push(p);
    }
}

/// Everything an examine call needs besides the definitions
#[derive(Debug, Default)]
pub struct World {
    pub map: GridMap,
    pub ui: ScriptedUi,
    pub creatures: TestCreatures,
    pub mapgen: TestMapgen,
    pub hooks: TestHooks,
    pub diag: Diagnostics,
    pub now: TimePoint,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn examine(&mut self, data: &MapData, who: Option<&mut dyn Character>, pos: Tripoint) {
        let mut ctx = ExamineContext {
            map: &mut self.map,
            ui: &mut self.ui,
            creatures: &mut self.creatures,
            mapgen: &mut self.mapgen,
            hooks: &mut self.hooks,
            data,
            diag: &mut self.diag,
            now: self.now,
        };
        rf_mapdata::examine(&mut ctx, who, pos);
    }
}
