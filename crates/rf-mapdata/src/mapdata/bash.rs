//! Bash and deconstruct results

use serde_json::Value;

use crate::catalog::ItemGroupId;
use crate::data::MapData;
use crate::diagnostics::Diagnostics;
use crate::factory::LoadContext;
use crate::json::FieldReader;

use super::{FurnStrId, TerStrId};

/// What kind of map object a bash record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapObjectType {
    Terrain,
    Furniture,
    Field,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapBashInfo {
    /// Minimum strength to bash; anything below never succeeds
    pub str_min: i32,
    /// Strength that always succeeds
    pub str_max: i32,
    /// Thresholds when the tile is blocked from the other side
    pub str_min_blocked: i32,
    pub str_max_blocked: i32,
    /// Thresholds when the tile supports a roof
    pub str_min_supported: i32,
    pub str_max_supported: i32,
    /// Explosion on destruction, -1 for none
    pub explosive: i32,
    pub sound_vol: i32,
    pub sound_fail_vol: i32,
    pub collapse_radius: i32,
    pub fd_bash_move_cost: i32,
    pub destroy_only: bool,
    /// Bashing also bashes the tile below
    pub bash_below: bool,
    pub drop_group: ItemGroupId,
    pub sound: String,
    pub sound_fail: String,
    pub field_bash_msg_success: String,
    pub ter_set: TerStrId,
    pub ter_set_bashed_from_above: TerStrId,
    pub furn_set: FurnStrId,
    /// Furniture at the center of a tent this piece belongs to
    pub tent_centers: Vec<FurnStrId>,
}

impl Default for MapBashInfo {
    fn default() -> Self {
        Self {
            str_min: -1,
            str_max: -1,
            str_min_blocked: -1,
            str_max_blocked: -1,
            str_min_supported: -1,
            str_max_supported: -1,
            explosive: 0,
            sound_vol: -1,
            sound_fail_vol: -1,
            collapse_radius: 1,
            fd_bash_move_cost: 100,
            destroy_only: false,
            bash_below: false,
            drop_group: ItemGroupId::null(),
            sound: String::new(),
            sound_fail: String::new(),
            field_bash_msg_success: String::new(),
            ter_set: TerStrId::null(),
            ter_set_bashed_from_above: TerStrId::null(),
            furn_set: FurnStrId::null(),
            tent_centers: Vec::new(),
        }
    }
}

impl MapBashInfo {
    /// Read `member` of `jo`; returns false (and changes nothing) if absent
    pub fn load(
        &mut self,
        jo: &mut FieldReader<'_, '_>,
        member: &str,
        obj_type: MapObjectType,
        ctx: &mut LoadContext<'_>,
    ) -> bool {
        let Some(obj) = jo.obj().get_object(member) else {
            return false;
        };
        let context = format!("{} {}", jo.context(), member);
        let mut j = jo.nested(obj, context.clone());

        self.str_min = j.get_int("str_min", 0);
        self.str_max = j.get_int("str_max", 0);
        self.str_min_blocked = j.get_int("str_min_blocked", -1);
        self.str_max_blocked = j.get_int("str_max_blocked", -1);
        self.str_min_supported = j.get_int("str_min_supported", -1);
        self.str_max_supported = j.get_int("str_max_supported", -1);
        self.explosive = j.get_int("explosive", -1);
        self.sound_vol = j.get_int("sound_vol", -1);
        self.sound_fail_vol = j.get_int("sound_fail_vol", -1);
        self.collapse_radius = j.get_int("collapse_radius", 1);
        self.destroy_only = j.get_bool("destroy_only", false);
        self.bash_below = j.get_bool("bash_below", false);
        self.sound = j.get_string("sound", "smash!");
        self.sound_fail = j.get_string("sound_fail", "thump!");

        match obj_type {
            MapObjectType::Furniture => {
                self.furn_set = j.read("furn_set").unwrap_or_default();
            }
            MapObjectType::Terrain => {
                self.ter_set = TerStrId::null();
                j.mandatory("ter_set", &mut self.ter_set);
                self.ter_set_bashed_from_above = j
                    .read("ter_set_bashed_from_above")
                    .unwrap_or_else(|| self.ter_set.clone());
            }
            MapObjectType::Field => {
                self.fd_bash_move_cost = j.get_int("move_cost", 100);
                self.field_bash_msg_success = j.get_string("msg_success", "");
            }
        }

        self.drop_group =
            load_drop_group(&mut j, "items", &context, ctx).unwrap_or_else(ItemGroupId::null);

        if j.obj().has_array("tent_centers") {
            self.tent_centers = j.read("tent_centers").unwrap_or_default();
        }

        true
    }

    /// Result ids must exist once everything is loaded
    pub(crate) fn check(
        &self,
        context: &str,
        is_terrain: bool,
        data: &MapData,
        diag: &mut Diagnostics,
    ) {
        if !data.item_groups().contains(&self.drop_group) {
            diag.report(context, format!("bash result item group {} does not exist", self.drop_group));
        }
        if self.str_max == -1 {
            return;
        }
        // Some tiles name t_null explicitly, an empty id is always a mistake
        if is_terrain && self.ter_set.is_empty() {
            diag.report(context, "bash result terrain is undefined/empty");
        }
        if !data.terrain().is_valid(&self.ter_set) {
            diag.report(context, format!("bash result terrain {} does not exist", self.ter_set));
        }
        if !data.furniture().is_valid(&self.furn_set) {
            diag.report(context, format!("bash result furniture {} does not exist", self.furn_set));
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapDeconstructInfo {
    pub can_do: bool,
    /// Also deconstruct the tile above
    pub deconstruct_above: bool,
    pub drop_group: ItemGroupId,
    pub ter_set: TerStrId,
    pub furn_set: FurnStrId,
}

impl Default for MapDeconstructInfo {
    fn default() -> Self {
        Self {
            can_do: false,
            deconstruct_above: false,
            drop_group: ItemGroupId::null(),
            ter_set: TerStrId::null(),
            furn_set: FurnStrId::null(),
        }
    }
}

impl MapDeconstructInfo {
    pub fn load(
        &mut self,
        jo: &mut FieldReader<'_, '_>,
        member: &str,
        is_furniture: bool,
        ctx: &mut LoadContext<'_>,
    ) -> bool {
        let Some(obj) = jo.obj().get_object(member) else {
            return false;
        };
        let context = format!("{} {}", jo.context(), member);
        let mut j = jo.nested(obj, context.clone());

        self.furn_set = j.read("furn_set").unwrap_or_default();
        if !is_furniture {
            self.ter_set = TerStrId::null();
            j.mandatory("ter_set", &mut self.ter_set);
        }
        self.can_do = true;
        self.deconstruct_above = j.get_bool("deconstruct_above", false);

        self.drop_group = if j.obj().has_member("items") {
            load_drop_group(&mut j, "items", &context, ctx).unwrap_or_else(ItemGroupId::null)
        } else {
            j.report("missing member \"items\"");
            ItemGroupId::null()
        };
        true
    }

    pub(crate) fn check(
        &self,
        context: &str,
        is_terrain: bool,
        data: &MapData,
        diag: &mut Diagnostics,
    ) {
        if !self.can_do {
            return;
        }
        if !data.item_groups().contains(&self.drop_group) {
            diag.report(
                context,
                format!("deconstruct result item group {} does not exist", self.drop_group),
            );
        }
        if is_terrain && self.ter_set.is_empty() {
            diag.report(context, "deconstruct result terrain is undefined/empty");
        }
        if !data.terrain().is_valid(&self.ter_set) {
            diag.report(context, format!("deconstruct result terrain {} does not exist", self.ter_set));
        }
        if !data.furniture().is_valid(&self.furn_set) {
            diag.report(
                context,
                format!("deconstruct result furniture {} does not exist", self.furn_set),
            );
        }
    }
}

/// Item group reference: a group id or an inline list that becomes an
/// anonymous group
fn load_drop_group(
    j: &mut FieldReader<'_, '_>,
    key: &str,
    context: &str,
    ctx: &mut LoadContext<'_>,
) -> Option<ItemGroupId> {
    match j.obj().get(key)? {
        Value::String(id) => Some(ItemGroupId::new(id.as_str())),
        Value::Array(_) | Value::Object(_) => Some(ctx.item_groups.register_anonymous(context)),
        _ => {
            j.report(format!("member \"{}\" must be an item group id or a list", key));
            None
        }
    }
}
