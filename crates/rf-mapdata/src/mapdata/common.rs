//! Fields shared by terrain and furniture

use std::collections::BTreeSet;
use std::str::FromStr;

use rf_units::Volume;
use serde_json::Value;

use crate::calendar::{NUM_SEASONS, Season};
use crate::catalog::{EmitId, HarvestId};
use crate::data::MapData;
use crate::diagnostics::Diagnostics;
use crate::error::LoadError;
use crate::examine::{Examine, ExamineFunction};
use crate::factory::LoadContext;
use crate::flags::{ConnectGroup, FlagSet, TerBitflags};
use crate::json::FieldReader;
use crate::symbol::{TileColor, symbol_from_string};

use super::TerStrId;

#[derive(Debug, Clone)]
pub struct MapDataCommon {
    pub name: String,
    pub description: String,
    /// Id whose tile graphics this one borrows
    pub looks_like: String,
    pub symbol: [char; NUM_SEASONS],
    pub color: [TileColor; NUM_SEASONS],
    /// Move cost (terrain) or move cost modifier (furniture)
    pub movecost: i32,
    pub coverage: i32,
    pub light_emitted: i32,
    pub heat_radiation: i32,
    pub max_volume: Volume,
    pub flags: FlagSet,
    pub transparent: bool,
    pub connect_group: ConnectGroup,
    pub examine: Examine,
    pub harvest_by_season: [HarvestId; NUM_SEASONS],
    pub curtain_transform: TerStrId,
    pub emissions: BTreeSet<EmitId>,
}

impl MapDataCommon {
    pub fn new(max_volume: Volume) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            looks_like: String::new(),
            symbol: [' '; NUM_SEASONS],
            color: [TileColor::default(); NUM_SEASONS],
            movecost: 0,
            coverage: 0,
            light_emitted: 0,
            heat_radiation: 0,
            max_volume,
            flags: FlagSet::new(),
            transparent: false,
            connect_group: ConnectGroup::None,
            examine: Examine::none(),
            harvest_by_season: Default::default(),
            curtain_transform: TerStrId::null(),
            emissions: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn can_examine(&self) -> bool {
        !self.examine.is_function("none")
    }

    /// True if the examine behavior is the function or actor type `action`
    pub fn has_examine(&self, action: &str) -> bool {
        self.examine.name() == action
    }

    pub fn set_examine(&mut self, func: ExamineFunction) {
        self.examine = Examine::Function(func);
    }

    pub fn has_curtains(&self) -> bool {
        !self.curtain_transform.is_null()
    }

    /// Add a flag, applying the side effects of fast flags
    pub fn set_flag(&mut self, flag: &str) {
        let Some(bit) = self.flags.insert(flag) else {
            return;
        };
        if bit == TerBitflags::TRANSPARENT {
            self.transparent = true;
        }
        if bit == TerBitflags::WALL || bit == TerBitflags::CONNECT_TO_WALL {
            self.connect_group = ConnectGroup::Wall;
        }
    }

    /// Set the connection group by name; unknown names leave it unchanged
    pub fn set_connects(&mut self, group: &str) -> bool {
        match ConnectGroup::from_str(group) {
            Ok(group) => {
                self.connect_group = group;
                true
            }
            Err(_) => false,
        }
    }

    pub fn connects(&self) -> Option<ConnectGroup> {
        (self.connect_group != ConnectGroup::None).then_some(self.connect_group)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn has_bitflag(&self, bit: TerBitflags) -> bool {
        self.flags.has_bit(bit)
    }

    pub fn symbol(&self, season: Season) -> char {
        self.symbol[season.index()]
    }

    pub fn color(&self, season: Season) -> TileColor {
        self.color[season.index()]
    }

    pub fn get_harvest(&self, season: Season) -> &HarvestId {
        &self.harvest_by_season[season.index()]
    }

    /// Members read before the terrain or furniture specific ones
    pub(crate) fn load(
        &mut self,
        jo: &mut FieldReader<'_, '_>,
        ctx: &mut LoadContext<'_>,
    ) -> Result<(), LoadError> {
        let obj = jo.obj();
        if let Some(name) = obj.get_str("examine_action") {
            self.examine = match ExamineFunction::from_name(name) {
                Some(func) => Examine::Function(func),
                None => {
                    jo.report(format!("unknown examine function \"{}\"", name));
                    Examine::none()
                }
            };
        } else if let Some(data) = obj.get_object("examine_action") {
            let actor_type = data.get_str("type").unwrap_or_default();
            let mut actor = ctx.actors.create(actor_type)?;
            let context = format!("{} examine_action", jo.context());
            actor.load(&mut jo.nested(data, context));
            self.examine = Examine::Actor(actor);
        } else if obj.has_member("examine_action") {
            jo.report("examine_action must be a function name or an actor object");
        } else if !jo.was_loaded {
            self.examine = Examine::none();
        }

        if let Some(Value::Array(entries)) = obj.get("harvest_by_season") {
            for entry in entries {
                self.load_harvest_entry(jo, entry);
            }
        }

        jo.mandatory("description", &mut self.description);
        jo.optional("curtain_transform", &mut self.curtain_transform, TerStrId::null());
        Ok(())
    }

    fn load_harvest_entry(&mut self, jo: &mut FieldReader<'_, '_>, entry: &Value) {
        let seasons: Vec<String> = entry
            .get("seasons")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        let id = entry
            .get("id")
            .and_then(Value::as_str)
            .map(HarvestId::new)
            .unwrap_or_default();
        for season in seasons {
            match Season::from_str(&season) {
                Ok(season) => self.harvest_by_season[season.index()] = id.clone(),
                Err(_) => jo.report(format!("unknown season \"{}\"", season)),
            }
        }
    }

    pub(crate) fn load_symbol(&mut self, jo: &mut FieldReader<'_, '_>) {
        let obj = jo.obj();
        if self.looks_like.is_empty() {
            if let Some(parent) = obj.get_str("copy-from") {
                self.looks_like = parent.to_string();
            }
        }
        jo.assign("looks_like", &mut self.looks_like);

        match obj.get("symbol") {
            Some(value) => {
                if let Some(symbol) = load_season_array(jo, "symbol", value, symbol_from_string) {
                    self.symbol = symbol;
                }
            }
            None if !jo.was_loaded => jo.report("missing member \"symbol\""),
            None => {}
        }

        match (obj.get("color"), obj.get("bgcolor")) {
            (Some(_), Some(_)) => {
                jo.report("found both color and bgcolor, only one of these is allowed")
            }
            (Some(value), None) => {
                if let Some(color) =
                    load_season_array(jo, "color", value, TileColor::from_color_string)
                {
                    self.color = color;
                }
            }
            (None, Some(value)) => {
                if let Some(color) =
                    load_season_array(jo, "bgcolor", value, TileColor::from_bgcolor_string)
                {
                    self.color = color;
                }
            }
            (None, None) if !jo.was_loaded => {
                jo.report("missing member: one of \"color\", \"bgcolor\" must exist")
            }
            (None, None) => {}
        }
    }

    /// Rebuild the flag set from `flags`, `extend` and `delete`, then apply
    /// `connects_to`, which wins over connections implied by flags
    pub(crate) fn load_flags(&mut self, jo: &mut FieldReader<'_, '_>) {
        let obj = jo.obj();
        if obj.has_member("flags") {
            self.flags.clear();
            for flag in jo.get_string_array("flags") {
                self.flags.insert(&flag);
            }
        } else if !jo.was_loaded {
            self.flags.clear();
        }
        if let Some(extend) = obj.get_object("extend") {
            let added: Vec<String> = jo.nested(extend, "extend").get_string_array("flags");
            for flag in added {
                self.flags.insert(&flag);
            }
        }
        if let Some(delete) = obj.get_object("delete") {
            let removed: Vec<String> = jo.nested(delete, "delete").get_string_array("flags");
            for flag in removed {
                self.flags.remove(&flag);
            }
        }

        self.transparent = false;
        self.connect_group = ConnectGroup::None;
        let names: Vec<String> = self.flags.iter().map(str::to_string).collect();
        for flag in names {
            self.set_flag(&flag);
        }

        if let Some(group) = obj.get_str("connects_to") {
            if !self.set_connects(group) {
                jo.report(format!("can't find terrain connection group {}", group));
            }
        }
    }

    /// Checks shared by terrain and furniture
    pub(crate) fn check(&self, context: &str, data: &MapData, diag: &mut Diagnostics) {
        if let Examine::Actor(actor) = &self.examine {
            actor.finalize(context, data, diag);
        }
        for harvest in self.harvest_by_season.iter().filter(|h| !h.is_null()) {
            if !data.harvests().contains(harvest) {
                diag.report(context, format!("harvest list {} does not exist", harvest));
            }
            if !self.can_examine() {
                diag.report(
                    context,
                    format!("harvest data defined without examine function for {}", self.name),
                );
            }
        }
        for emit in &self.emissions {
            if !data.emits().contains(emit) {
                diag.report(context, format!("invalid emission {} set", emit));
            }
        }
    }
}

/// Read a per-season member: one value for all seasons or one per season
fn load_season_array<T: Copy, E: std::fmt::Display>(
    jo: &mut FieldReader<'_, '_>,
    key: &str,
    value: &Value,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Option<[T; NUM_SEASONS]> {
    let strings: Vec<&str> = match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => match items.iter().map(Value::as_str).collect::<Option<Vec<_>>>() {
            Some(strings) => strings,
            None => {
                jo.report(format!("member \"{}\": expected an array of strings", key));
                return None;
            }
        },
        _ => {
            jo.report(format!("member \"{}\": expected string or array", key));
            return None;
        }
    };

    let parsed = match strings
        .iter()
        .map(|s| parse(s))
        .collect::<Result<Vec<T>, E>>()
    {
        Ok(parsed) => parsed,
        Err(err) => {
            jo.report(format!("member \"{}\": {}", key, err));
            return None;
        }
    };

    match parsed.as_slice() {
        [single] => Some([*single; NUM_SEASONS]),
        [spring, summer, autumn, winter] => Some([*spring, *summer, *autumn, *winter]),
        _ => {
            jo.report(format!("member \"{}\": incorrect number of entries", key));
            None
        }
    }
}
