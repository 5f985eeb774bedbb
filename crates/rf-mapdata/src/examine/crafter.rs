//! Crafter: furniture that processes loaded items over time (smokers, kilns)
//!
//! A crafter keeps no state of its own. Payload items carry the processed
//! flag, fuel items are of the fuel type, and an active crafter holds one
//! marker item born when processing started.
//! [`ProcessingSnapshot::scan`] rebuilds that state from the tile's items on
//! every call.

use rf_units::{TimeDuration, TimePoint, Volume};
use strum::FromRepr;

use crate::data::MapData;
use crate::diagnostics::Diagnostics;
use crate::flag_registry::FlagId;
use crate::ids::IntId;
use crate::itype::{FLAG_COOKED, FLAG_NUTRIENT_OVERRIDE, FLAG_PROCESSING, Item, ItemTypes, ItypeId};
use crate::json::FieldReader;
use crate::mapdata::FurnStrId;
use crate::world::{Character, Menu, MenuEntry, MsgType, Tripoint};

use super::{ExamineActor, ExamineContext};

const NEVER_MIND: &str = "Never mind.";

/// Entries of the crafter menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr)]
#[repr(i32)]
pub enum CrafterOption {
    Inspect,
    Start,
    Add,
    Remove,
    Reload,
    RemoveFuel,
    Disable,
    Disassemble,
}

impl CrafterOption {
    pub fn retval(self) -> i32 {
        self as i32
    }
}

/// Menu labels and messages. `{name}`, `{max_volume}`, `{fuel_per_liter}`,
/// `{min_fuel}` and per-message values such as `{item}` are substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct CrafterStrings {
    pub name: String,
    pub disable_name: String,
    pub disable_desc: String,
    pub start_msg: String,
    pub start_desc: String,
    pub start_msg_no_items: String,
    pub start_msg_no_fuel: String,
    pub add_full_msg: String,
    pub add_space_msg: String,
    pub add_desc: String,
    pub remove_items_msg: String,
    pub remove_no_msg: String,
    pub removed_item_msg: String,
    pub reload_items_msg: String,
    pub reload_no_msg: String,
    pub reload_desc: String,
    pub disassemble_msg: String,
    pub remove_fuel_msg: String,
    pub active_str: String,
    pub no_load_active_msg: String,
    pub load_query_msg: String,
    pub finished_msg: String,
}

impl Default for CrafterStrings {
    fn default() -> Self {
        Self {
            name: "crafter".to_string(),
            disable_name: "Disable".to_string(),
            disable_desc: "Stop the {name} and let it cool down.".to_string(),
            start_msg: "Start processing".to_string(),
            start_desc: "Light the {name} and process its contents.".to_string(),
            start_msg_no_items: "Start processing (nothing to process)".to_string(),
            start_msg_no_fuel: "Start processing (not enough fuel)".to_string(),
            add_full_msg: "Add items (full)".to_string(),
            add_space_msg: "Add items".to_string(),
            add_desc: "Load items to process, up to {max_volume}.".to_string(),
            remove_items_msg: "Remove items".to_string(),
            remove_no_msg: "Remove items (nothing inside)".to_string(),
            removed_item_msg: "You remove the {item} from the {name}.".to_string(),
            reload_items_msg: "Reload fuel".to_string(),
            reload_no_msg: "Reload fuel (none at hand)".to_string(),
            reload_desc: "Needs {fuel_per_liter} fuel per liter of contents and at least {min_fuel}."
                .to_string(),
            disassemble_msg: "Disassemble".to_string(),
            remove_fuel_msg: "Remove fuel ({amount})".to_string(),
            active_str: "It is running.".to_string(),
            no_load_active_msg: "You cannot add items to the {name} while it is running.".to_string(),
            load_query_msg: "Load which item?".to_string(),
            finished_msg: "The {name} has finished processing.".to_string(),
        }
    }
}

impl CrafterStrings {
    fn load(&mut self, jo: &mut FieldReader<'_, '_>) {
        let fields: [(&str, &mut String); 22] = [
            ("name", &mut self.name),
            ("disable_name", &mut self.disable_name),
            ("disable_desc", &mut self.disable_desc),
            ("start_msg", &mut self.start_msg),
            ("start_desc", &mut self.start_desc),
            ("start_msg_no_items", &mut self.start_msg_no_items),
            ("start_msg_no_fuel", &mut self.start_msg_no_fuel),
            ("add_full_msg", &mut self.add_full_msg),
            ("add_space_msg", &mut self.add_space_msg),
            ("add_desc", &mut self.add_desc),
            ("remove_items_msg", &mut self.remove_items_msg),
            ("remove_no_msg", &mut self.remove_no_msg),
            ("removed_item_msg", &mut self.removed_item_msg),
            ("reload_items_msg", &mut self.reload_items_msg),
            ("reload_no_msg", &mut self.reload_no_msg),
            ("reload_desc", &mut self.reload_desc),
            ("disassemble_msg", &mut self.disassemble_msg),
            ("remove_fuel_msg", &mut self.remove_fuel_msg),
            ("active_str", &mut self.active_str),
            ("no_load_active_msg", &mut self.no_load_active_msg),
            ("load_query_msg", &mut self.load_query_msg),
            ("finished_msg", &mut self.finished_msg),
        ];
        for (key, field) in fields {
            jo.assign(key, field);
        }
    }
}

/// The processing marker of an active crafter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerState {
    pub counter: i64,
    /// When processing started
    pub birthday: TimePoint,
    /// Processing time still to run at the scanned turn
    pub time_left: TimeDuration,
    pub done: bool,
}

impl MarkerState {
    pub fn time_left(&self) -> TimeDuration {
        self.time_left
    }
}

/// State of a crafter tile, rebuilt from its items
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingSnapshot {
    /// Volume of the items carrying the processed flag
    pub payload_volume: Volume,
    pub payload_count: usize,
    /// Volume of everything except fuel and the marker
    pub used_volume: Volume,
    /// Fuel charges on the tile
    pub fuel: i32,
    pub fuel_stacks: usize,
    pub marker: Option<MarkerState>,
    /// Indices of items that are neither payload, fuel nor the marker
    pub foreign: Vec<usize>,
    pub item_count: usize,
}

impl ProcessingSnapshot {
    pub fn scan(items: &[Item], crafter: &CrafterActor, types: &ItemTypes, now: TimePoint) -> Self {
        let mut snapshot = Self {
            payload_volume: Volume::ZERO,
            payload_count: 0,
            used_volume: Volume::ZERO,
            fuel: 0,
            fuel_stacks: 0,
            marker: None,
            foreign: Vec::new(),
            item_count: items.len(),
        };
        for (i, it) in items.iter().enumerate() {
            if it.type_id == crafter.processing_item {
                let time_left = if it.counter <= 0 {
                    TimeDuration::ZERO
                } else {
                    crafter.time.saturating_sub(it.age(now))
                };
                snapshot.marker = Some(MarkerState {
                    counter: it.counter,
                    birthday: it.birthday,
                    time_left,
                    done: time_left == TimeDuration::ZERO,
                });
            } else if !crafter.fuel.is_null() && it.type_id == crafter.fuel {
                snapshot.fuel = snapshot.fuel.saturating_add(it.charges);
                snapshot.fuel_stacks += 1;
            } else {
                let volume = it.volume(types);
                snapshot.used_volume += volume;
                if types.item_has_flag(it, crafter.processed_flag.as_str()) {
                    snapshot.payload_volume += volume;
                    snapshot.payload_count += 1;
                } else {
                    snapshot.foreign.push(i);
                }
            }
        }
        snapshot
    }

    pub fn has_payload(&self) -> bool {
        self.payload_count > 0
    }

    pub fn has_fuel(&self) -> bool {
        self.fuel_stacks > 0
    }

    /// Items the remove option would take out
    pub fn removable_count(&self) -> usize {
        self.payload_count + self.foreign.len()
    }

    /// Fuel burnt to process the current payload
    pub fn required_fuel(&self, crafter: &CrafterActor) -> i32 {
        let per_volume =
            i64::from(crafter.fuel_per_liter).saturating_mul(self.payload_volume.to_liter_ceil());
        i32::try_from(per_volume)
            .unwrap_or(i32::MAX)
            .max(crafter.min_fuel)
    }

    pub fn has_required_fuel(&self, crafter: &CrafterActor) -> bool {
        self.fuel >= self.required_fuel(crafter)
    }

    pub fn free_volume(&self, crafter: &CrafterActor) -> Volume {
        crafter.max_volume.saturating_sub(self.used_volume)
    }

    pub fn is_full(&self, crafter: &CrafterActor) -> bool {
        self.used_volume >= crafter.max_volume
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrafterActor {
    active: bool,
    portable: bool,
    can_disable: bool,
    /// Furniture switched to when starting (inactive form) or finishing
    /// (active form)
    furniture_transform: FurnStrId,
    /// Item type of the marker
    processing_item: ItypeId,
    fuel: ItypeId,
    min_fuel: i32,
    fuel_per_liter: i32,
    max_volume: Volume,
    processed_flag: FlagId,
    time: TimeDuration,
    disassemble_item: ItypeId,
    strings: CrafterStrings,
}

impl Default for CrafterActor {
    fn default() -> Self {
        Self {
            active: false,
            portable: false,
            can_disable: false,
            furniture_transform: FurnStrId::null(),
            processing_item: ItypeId::null(),
            fuel: ItypeId::null(),
            min_fuel: 0,
            fuel_per_liter: 0,
            max_volume: Volume::ZERO,
            processed_flag: FlagId::null(),
            time: TimeDuration::from_hours(6),
            disassemble_item: ItypeId::null(),
            strings: CrafterStrings::default(),
        }
    }
}

impl CrafterActor {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn max_volume(&self) -> Volume {
        self.max_volume
    }

    pub fn processing_item(&self) -> &ItypeId {
        &self.processing_item
    }

    pub fn fuel(&self) -> &ItypeId {
        &self.fuel
    }

    pub fn processed_flag(&self) -> &FlagId {
        &self.processed_flag
    }

    pub fn time(&self) -> TimeDuration {
        self.time
    }

    pub fn strings(&self) -> &CrafterStrings {
        &self.strings
    }

    fn text(&self, template: &str, extra: &[(&str, String)]) -> String {
        let mut out = template
            .replace("{name}", &self.strings.name)
            .replace("{max_volume}", &self.max_volume.to_string())
            .replace("{fuel_per_liter}", &self.fuel_per_liter.to_string())
            .replace("{min_fuel}", &self.min_fuel.to_string());
        for (key, value) in extra {
            out = out.replace(&format!("{{{}}}", key), value);
        }
        out
    }

    fn scan_tile(&self, ctx: &ExamineContext<'_>, pos: Tripoint) -> ProcessingSnapshot {
        ProcessingSnapshot::scan(ctx.map.items(pos), self, ctx.data.item_types(), ctx.now)
    }

    fn show_options(&self, ctx: &mut ExamineContext<'_>, guy: &mut dyn Character, pos: Tripoint) {
        let snapshot = self.scan_tile(ctx, pos);
        if self.active {
            if snapshot.item_count == usize::from(snapshot.marker.is_some()) {
                ctx.diag.report(
                    format!("crafter {}", self.strings.name),
                    "is active, but has no items in it",
                );
                self.transform(ctx, pos);
                return;
            }
            if snapshot.marker.is_some_and(|m| m.done) && self.process(ctx, pos) {
                let msg = self.text(&self.strings.finished_msg, &[]);
                ctx.ui.add_msg(MsgType::Info, &msg);
                return;
            }
        }

        match self.query_options(ctx, &*guy, &snapshot) {
            Some(CrafterOption::Inspect) => self.display_info(ctx, &snapshot, pos),
            Some(CrafterOption::Start) if !self.active => self.activate(ctx, pos),
            Some(CrafterOption::Start) => {}
            Some(CrafterOption::Add) => self.load_items(ctx, guy, pos),
            Some(CrafterOption::Remove) => self.remove_items(ctx, guy, pos),
            Some(CrafterOption::Reload) => ctx.hooks.reload_furniture(guy, &mut *ctx.map, pos),
            Some(CrafterOption::RemoveFuel) => self.remove_fuel(ctx, guy, pos),
            Some(CrafterOption::Disable) if self.active && self.can_disable => {
                self.disable(ctx, pos)
            }
            Some(CrafterOption::Disable) => {}
            Some(CrafterOption::Disassemble) => self.disassemble(ctx, pos),
            None => ctx.ui.add_msg(MsgType::Neutral, NEVER_MIND),
        }
    }

    fn query_options(
        &self,
        ctx: &mut ExamineContext<'_>,
        guy: &dyn Character,
        snapshot: &ProcessingSnapshot,
    ) -> Option<CrafterOption> {
        let s = &self.strings;
        let mut menu = Menu::new(format!("Do what with this {}:", s.name));
        menu.desc_enabled = true;
        menu.add(MenuEntry::new(
            CrafterOption::Inspect.retval(),
            true,
            Some('i'),
            format!("Inspect {}", s.name),
        ));

        if self.active {
            menu.add(
                MenuEntry::new(
                    CrafterOption::Disable.retval(),
                    self.can_disable,
                    Some('x'),
                    self.text(&s.disable_name, &[]),
                )
                .with_desc(self.text(&s.disable_desc, &[])),
            );
        } else {
            let has_required_fuel = snapshot.has_required_fuel(self);
            let has_items = snapshot.has_payload();
            let start_msg = if !has_items {
                &s.start_msg_no_items
            } else if !has_required_fuel {
                &s.start_msg_no_fuel
            } else {
                &s.start_msg
            };
            menu.add(
                MenuEntry::new(
                    CrafterOption::Start.retval(),
                    has_required_fuel && has_items,
                    Some('s'),
                    self.text(start_msg, &[]),
                )
                .with_desc(self.text(&s.start_desc, &[])),
            );

            let full = snapshot.is_full(self);
            let add_msg = if full { &s.add_full_msg } else { &s.add_space_msg };
            menu.add(
                MenuEntry::new(CrafterOption::Add.retval(), !full, Some('a'), self.text(add_msg, &[]))
                    .with_desc(self.text(&s.add_desc, &[])),
            );

            let removable = snapshot.removable_count() > 0;
            let remove_msg = if removable { &s.remove_items_msg } else { &s.remove_no_msg };
            menu.add(MenuEntry::new(
                CrafterOption::Remove.retval(),
                removable,
                Some('e'),
                self.text(remove_msg, &[]),
            ));

            let fuel_at_hand: i32 = if self.fuel.is_null() {
                0
            } else {
                guy.crafting_inventory()
                    .iter()
                    .filter(|it| it.type_id == self.fuel)
                    .map(|it| it.charges)
                    .sum()
            };
            let can_reload = fuel_at_hand > 0;
            let reload_msg = if can_reload { &s.reload_items_msg } else { &s.reload_no_msg };
            menu.add(
                MenuEntry::new(
                    CrafterOption::Reload.retval(),
                    can_reload,
                    Some('r'),
                    self.text(reload_msg, &[]),
                )
                .with_desc(self.text(&s.reload_desc, &[])),
            );

            if self.portable {
                menu.add(MenuEntry::new(
                    CrafterOption::Disassemble.retval(),
                    true,
                    Some('z'),
                    self.text(&s.disassemble_msg, &[]),
                ));
            }
        }

        if snapshot.has_fuel() {
            menu.add(MenuEntry::new(
                CrafterOption::RemoveFuel.retval(),
                true,
                Some('f'),
                self.text(&s.remove_fuel_msg, &[("amount", snapshot.fuel.to_string())]),
            ));
        }

        ctx.ui.menu(&menu).and_then(CrafterOption::from_repr)
    }

    fn display_info(&self, ctx: &mut ExamineContext<'_>, snapshot: &ProcessingSnapshot, pos: Tripoint) {
        let data = ctx.data;
        let types = data.item_types();
        let mut display = String::new();
        if self.active {
            let time_left = snapshot.marker.map_or(TimeDuration::ZERO, |m| m.time_left());
            display.push_str(&self.text(&self.strings.active_str, &[]));
            display.push('\n');
            display.push_str(&format!("It will take about {} to finish.\n", time_left));
        } else {
            display.push_str(&format!("There is a {} here.\n", self.strings.name));
        }
        display.push_str("You inspect the contents and find:\n");

        let items = ctx.map.items(pos);
        if items.is_empty() {
            display.push_str("...that it is empty.");
        } else {
            for it in items {
                display.push_str(&format!("-> {} ({})\n", types.nname(&it.type_id), it.charges));
            }
        }
        ctx.ui.popup(&display);
    }

    /// Burn the fuel, mark the payload and switch to the active furniture
    fn activate(&self, ctx: &mut ExamineContext<'_>, pos: Tripoint) {
        let data = ctx.data;
        let types = data.item_types();
        let snapshot = self.scan_tile(ctx, pos);

        if !snapshot.foreign.is_empty() {
            let items = ctx.map.items(pos);
            let rejects: Vec<String> = snapshot
                .foreign
                .iter()
                .filter_map(|&i| items.get(i))
                .map(|it| types.nname(&it.type_id).to_string())
                .collect();
            let msg = format!(
                "The {} cannot be activated while it contains {}!",
                self.strings.name,
                rejects.join(", ")
            );
            ctx.ui.add_msg(MsgType::Info, &msg);
            return;
        }
        if !snapshot.has_payload() {
            let msg = format!("There is nothing to process in the {}.", self.strings.name);
            ctx.ui.add_msg(MsgType::Info, &msg);
            return;
        }
        if !snapshot.has_required_fuel(self) {
            let msg = format!("The {} does not have enough fuel.", self.strings.name);
            ctx.ui.add_msg(MsgType::Info, &msg);
            return;
        }

        let mut remaining = snapshot.required_fuel(self);
        let items = ctx.map.items_mut(pos);
        for it in items.iter_mut().filter(|it| it.type_id == self.fuel) {
            let used = remaining.min(it.charges);
            it.charges -= used;
            remaining -= used;
        }
        items.retain(|it| it.type_id != self.fuel || it.charges > 0);
        for it in items.iter_mut() {
            if types.item_has_flag(it, self.processed_flag.as_str()) {
                it.set_flag(FLAG_PROCESSING);
            }
        }
        let mut marker = Item::new(self.processing_item.clone(), ctx.now, 1);
        marker.counter = self.time.turns();
        items.push(marker);

        self.transform(ctx, pos);
        let msg = format!("You start the {}.", self.strings.name);
        ctx.ui.add_msg(MsgType::Good, &msg);
    }

    /// Passive check; produces the results once the marker is done.
    /// Returns true if it did.
    pub fn process(&self, ctx: &mut ExamineContext<'_>, pos: Tripoint) -> bool {
        match self.scan_tile(ctx, pos).marker {
            Some(marker) if marker.done => {
                self.produce_items(ctx, pos, marker.birthday);
                true
            }
            _ => false,
        }
    }

    fn produce_items(&self, ctx: &mut ExamineContext<'_>, pos: Tripoint, start: TimePoint) {
        let data = ctx.data;
        let types = data.item_types();
        let items = ctx.map.items_mut(pos);
        items.retain(|it| it.type_id != self.processing_item);

        for it in items.iter_mut() {
            if !types.item_has_flag(it, self.processed_flag.as_str()) {
                continue;
            }
            let result_id = types
                .get(&it.type_id)
                .map(|t| t.processing_result.clone())
                .unwrap_or_default();
            if result_id.is_null() {
                it.unset_flag(FLAG_PROCESSING);
                continue;
            }
            *it = self.process_item(it, result_id, start, data);
        }
        log::debug!(target: "rf_mapdata::examine", "crafter {} finished at {:?}", self.strings.name, pos);

        self.transform(ctx, pos);
    }

    /// The result of processing `input` for the full duration
    fn process_item(&self, input: &Item, result_id: ItypeId, start: TimePoint, data: &MapData) -> Item {
        let types = data.item_types();
        let mut input = input.clone();
        input.unset_flag(FLAG_PROCESSING);
        input.calc_rot_while_processing(self.time, types);

        let mut result = Item::new(result_id, start + self.time, input.charges);
        result.relative_rot = input.relative_rot;
        result.inherit_flags(&input, data.flags());
        result.unset_flag(FLAG_PROCESSING);

        if !types.item_has_flag(&result, FLAG_NUTRIENT_OVERRIDE) {
            let cooks_like = types
                .get(&input.type_id)
                .map(|t| t.cooks_like.clone())
                .unwrap_or_default();
            // Processing is 1:1, the recipe charges follow the input
            result.recipe_charges = input.charges;
            let component = if cooks_like.is_null() {
                input
            } else {
                Item::new(cooks_like, input.birthday, 1)
            };
            result.components.push(component);
            result.set_flag_recursive(FLAG_COOKED);
        }
        result
    }

    /// Stop processing: drop the marker, untag the payload, revert the furniture
    fn disable(&self, ctx: &mut ExamineContext<'_>, pos: Tripoint) {
        let items = ctx.map.items_mut(pos);
        items.retain(|it| it.type_id != self.processing_item);
        for it in items.iter_mut() {
            it.unset_flag(FLAG_PROCESSING);
        }
        self.transform(ctx, pos);
    }

    fn transform(&self, ctx: &mut ExamineContext<'_>, pos: Tripoint) {
        if self.furniture_transform.is_null() {
            return;
        }
        let furn = ctx.data.furniture().obj_by_string(&self.furniture_transform);
        ctx.map.furn_set(pos, furn);
    }

    fn disassemble(&self, ctx: &mut ExamineContext<'_>, pos: Tripoint) {
        if !self.portable {
            ctx.diag.report(
                format!("crafter {}", self.strings.name),
                "tried to disassemble a crafter that cannot be disassembled",
            );
            return;
        }
        if !self.disassemble_item.is_null() {
            ctx.map
                .add_item(pos, Item::new(self.disassemble_item.clone(), ctx.now, 1));
        }
        ctx.map.furn_set(pos, IntId::NULL);
    }

    fn select_item_to_load(&self, ctx: &mut ExamineContext<'_>, inventory: &[Item]) -> Option<ItypeId> {
        let data = ctx.data;
        let types = data.item_types();
        let mut candidates: Vec<ItypeId> = Vec::new();
        for it in inventory
            .iter()
            .filter(|it| types.item_has_flag(it, self.processed_flag.as_str()))
        {
            if !candidates.contains(&it.type_id) {
                candidates.push(it.type_id.clone());
            }
        }
        if candidates.is_empty() {
            ctx.ui.add_msg(MsgType::Neutral, NEVER_MIND);
            return None;
        }

        let mut menu = Menu::new(self.text(&self.strings.load_query_msg, &[]));
        for (i, candidate) in candidates.iter().enumerate() {
            menu.add(MenuEntry::new(i as i32, true, None, types.nname(candidate)));
        }
        let chosen = ctx
            .ui
            .menu(&menu)
            .and_then(|ret| usize::try_from(ret).ok())
            .and_then(|i| candidates.get(i).cloned());
        if chosen.is_none() {
            ctx.ui.add_msg(MsgType::Neutral, NEVER_MIND);
        }
        chosen
    }

    fn load_items(&self, ctx: &mut ExamineContext<'_>, guy: &mut dyn Character, pos: Tripoint) {
        if self.active {
            let msg = self.text(&self.strings.no_load_active_msg, &[]);
            ctx.ui.add_msg(MsgType::Info, &msg);
            return;
        }

        let data = ctx.data;
        let types = data.item_types();
        let inventory: Vec<Item> = guy
            .crafting_inventory()
            .into_iter()
            .filter(|it| !it.is_rotten())
            .collect();
        let Some(chosen) = self.select_item_to_load(ctx, &inventory) else {
            return;
        };

        let of_type = inventory.iter().filter(|it| it.type_id == chosen);
        let available: i32 = if types.count_by_charges(&chosen) {
            of_type.map(|it| it.charges).sum()
        } else {
            i32::try_from(of_type.count()).unwrap_or(i32::MAX)
        };
        let mut free = self.scan_tile(ctx, pos).free_volume(self);
        let unit_volume = types.unit_volume(&chosen);
        let count = if unit_volume == Volume::ZERO {
            available
        } else {
            available.min(i32::try_from(free / unit_volume).unwrap_or(i32::MAX))
        };
        let item_name = types.nname(&chosen).to_string();
        if count <= 0 {
            ctx.ui.add_msg(MsgType::Neutral, NEVER_MIND);
            return;
        }

        let title = format!("Insert how many of the {}?", item_name);
        let amount = match ctx.ui.query_int(&title, count, true) {
            Some(amount) if amount > 0 => amount.min(count),
            _ => {
                ctx.ui.add_msg(MsgType::Neutral, NEVER_MIND);
                return;
            }
        };

        let removed = guy.consume_items(&chosen, amount, &|it: &Item| !it.is_rotten());
        for item in removed {
            let cost = guy.item_handling_cost(&item);
            guy.mod_moves(-cost);
            let volume = item.volume(types);
            if volume <= free {
                free = free.saturating_sub(volume);
                ctx.map.add_item(pos, item);
            } else {
                // Overflow stays on the examiner's square
                ctx.map.add_item(guy.pos(), item);
            }
        }
        let msg = format!("You place {} {} in the {}.", amount, item_name, self.strings.name);
        ctx.ui.add_msg(MsgType::Info, &msg);
    }

    fn remove_from_crafter(
        &self,
        ctx: &mut ExamineContext<'_>,
        guy: &mut dyn Character,
        pos: Tripoint,
        selector: impl Fn(&Item) -> bool,
    ) {
        let data = ctx.data;
        let types = data.item_types();
        let items = std::mem::take(ctx.map.items_mut(pos));
        let (removed, kept): (Vec<Item>, Vec<Item>) = items.into_iter().partition(|it| selector(it));
        *ctx.map.items_mut(pos) = kept;

        for item in removed {
            let msg = self.text(
                &self.strings.removed_item_msg,
                &[("item", types.nname(&item.type_id).to_string())],
            );
            ctx.ui.add_msg(MsgType::Neutral, &msg);
            let cost = guy.item_handling_cost(&item);
            guy.mod_moves(-cost);
            ctx.map.add_item(guy.pos(), item);
        }
    }

    fn remove_items(&self, ctx: &mut ExamineContext<'_>, guy: &mut dyn Character, pos: Tripoint) {
        self.remove_from_crafter(ctx, guy, pos, |it| {
            it.type_id != self.fuel && it.type_id != self.processing_item
        });
    }

    fn remove_fuel(&self, ctx: &mut ExamineContext<'_>, guy: &mut dyn Character, pos: Tripoint) {
        self.remove_from_crafter(ctx, guy, pos, |it| it.type_id == self.fuel);
    }
}

impl ExamineActor for CrafterActor {
    fn type_name(&self) -> &str {
        "crafter"
    }

    fn load(&mut self, jo: &mut FieldReader<'_, '_>) {
        jo.mandatory("active", &mut self.active);
        jo.optional("portable", &mut self.portable, false);
        jo.optional("can_disable", &mut self.can_disable, false);
        jo.optional("furniture_transform", &mut self.furniture_transform, FurnStrId::null());
        jo.mandatory("processing_item", &mut self.processing_item);
        jo.optional("fuel", &mut self.fuel, ItypeId::null());
        jo.optional("min_fuel", &mut self.min_fuel, 0);
        jo.optional("fuel_per_liter", &mut self.fuel_per_liter, 0);
        jo.optional("max_volume", &mut self.max_volume, Volume::ZERO);
        jo.mandatory("processed_flag", &mut self.processed_flag);
        jo.optional("time", &mut self.time, TimeDuration::from_hours(6));
        jo.optional("disassemble_item", &mut self.disassemble_item, ItypeId::null());
        self.strings.load(jo);
    }

    fn call(&self, ctx: &mut ExamineContext<'_>, who: Option<&mut dyn Character>, pos: Tripoint) {
        match who {
            Some(guy) => self.show_options(ctx, guy, pos),
            None if self.active => {
                self.process(ctx, pos);
            }
            None => ctx.diag.report(
                format!("crafter {}", self.strings.name),
                "called with no character",
            ),
        }
    }

    fn finalize(&self, owner: &str, data: &MapData, diag: &mut Diagnostics) {
        if !data.furniture().is_valid(&self.furniture_transform) {
            diag.report(
                owner,
                format!(
                    "crafter has no valid furniture to transform into ({} is set)",
                    self.furniture_transform
                ),
            );
        }
        let items = data.item_types();
        if !items.is_valid(&self.processing_item) {
            diag.report(
                owner,
                format!("crafter processing item {} does not exist", self.processing_item),
            );
        }
        if !self.fuel.is_null() && !items.is_valid(&self.fuel) {
            diag.report(owner, format!("crafter fuel {} does not exist", self.fuel));
        }
        if !data.flags().is_valid(&self.processed_flag) {
            diag.report(
                owner,
                format!("crafter processed flag {} does not exist", self.processed_flag),
            );
        }
        if self.portable && self.disassemble_item.is_null() {
            diag.report(owner, "portable crafter has no disassemble_item");
        }
    }

    fn clone_box(&self) -> Box<dyn ExamineActor> {
        Box::new(self.clone())
    }
}
