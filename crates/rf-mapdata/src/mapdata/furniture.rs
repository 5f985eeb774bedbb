//! Furniture definitions

use std::ops::{Deref, DerefMut};

use rf_units::Volume;
use serde_json::Value;

use crate::config::MapDataConfig;
use crate::data::MapData;
use crate::diagnostics::Diagnostics;
use crate::error::LoadError;
use crate::factory::{FactoryEntry, LoadContext};
use crate::ids::{IntId, NullId, StringId};
use crate::itype::ItypeId;
use crate::json::FieldReader;

use super::{
    FurnWorkbenchInfo, MapBashInfo, MapDataCommon, MapDeconstructInfo, MapObjectType, PlantData,
};

pub type FurnStrId = StringId<FurnT>;
pub type FurnId = IntId<FurnT>;

/// Legacy keg capacities count 250 ml units
const LEGACY_VOLUME_UNIT: i64 = 250;

/// One furniture type
#[derive(Debug, Clone)]
pub struct FurnT {
    pub id: FurnStrId,
    pub common: MapDataCommon,
    pub open: FurnStrId,
    pub close: FurnStrId,
    /// Strength needed to drag it; negative means immovable
    pub move_str_req: i32,
    pub crafting_pseudo_item: ItypeId,
    pub keg_capacity: Volume,
    pub comfort: i32,
    pub floor_bedding_warmth: i32,
    pub bonus_fire_warmth_feet: i32,
    /// Item this furniture was deployed from
    pub deployed_item: ItypeId,
    pub workbench: Option<FurnWorkbenchInfo>,
    pub plant: Option<PlantData>,
    pub surgery_skill_multiplier: Option<f32>,
    pub bash: MapBashInfo,
    pub deconstruct: MapDeconstructInfo,
}

impl NullId for FurnT {
    const NULL_ID: &'static str = "f_null";
}

impl Deref for FurnT {
    type Target = MapDataCommon;

    fn deref(&self) -> &MapDataCommon {
        &self.common
    }
}

impl DerefMut for FurnT {
    fn deref_mut(&mut self) -> &mut MapDataCommon {
        &mut self.common
    }
}

impl FurnT {
    pub fn new(max_volume: Volume) -> Self {
        Self {
            id: FurnStrId::null(),
            common: MapDataCommon::new(max_volume),
            open: FurnStrId::null(),
            close: FurnStrId::null(),
            move_str_req: -1,
            crafting_pseudo_item: ItypeId::null(),
            keg_capacity: Volume::ZERO,
            comfort: 0,
            floor_bedding_warmth: 0,
            bonus_fire_warmth_feet: 300,
            deployed_item: ItypeId::null(),
            workbench: None,
            plant: None,
            surgery_skill_multiplier: None,
            bash: MapBashInfo::default(),
            deconstruct: MapDeconstructInfo::default(),
        }
    }

    pub fn is_movable(&self) -> bool {
        self.move_str_req >= 0
    }

    fn load_keg_capacity(&mut self, jo: &mut FieldReader<'_, '_>) {
        match jo.obj().get("keg_capacity") {
            Some(Value::Number(n)) => match n.as_i64() {
                Some(units) => {
                    self.keg_capacity =
                        Volume::from_milliliter(units.saturating_mul(LEGACY_VOLUME_UNIT))
                }
                None => jo.report("member \"keg_capacity\": expected an integer or a volume"),
            },
            Some(_) => {
                jo.assign("keg_capacity", &mut self.keg_capacity);
            }
            None if !jo.was_loaded => self.keg_capacity = Volume::ZERO,
            None => {}
        }
    }

    pub(crate) fn check(&self, data: &MapData, diag: &mut Diagnostics) {
        let context = format!("furniture {}", self.id);
        self.common.check(&context, data, diag);
        self.bash.check(&context, false, data, diag);
        self.deconstruct.check(&context, false, data, diag);

        let furniture = data.furniture();
        if !furniture.is_valid(&self.open) {
            diag.report(&context, format!("invalid furniture {} for opening", self.open));
        }
        if !furniture.is_valid(&self.close) {
            diag.report(&context, format!("invalid furniture {} for closing", self.close));
        }
        if let Some(plant) = &self.plant {
            for stage in [&plant.transform, &plant.base] {
                if !furniture.is_valid(stage) {
                    diag.report(&context, format!("invalid plant furniture {}", stage));
                }
            }
        }

        let items = data.item_types();
        if !self.deployed_item.is_null() && !items.is_valid(&self.deployed_item) {
            diag.report(&context, format!("deployed item {} does not exist", self.deployed_item));
        }
        if self.has_examine("deployed_furniture") && self.deployed_item.is_null() {
            diag.report(&context, "is deployed furniture, but has no deployed_item");
        }
        if !self.crafting_pseudo_item.is_null() && !items.is_valid(&self.crafting_pseudo_item) {
            diag.report(
                &context,
                format!("crafting pseudo item {} does not exist", self.crafting_pseudo_item),
            );
        }
    }
}

impl FactoryEntry for FurnT {
    const KIND: &'static str = "furniture";

    fn new_entry(config: &MapDataConfig) -> Self {
        Self::new(config.default_max_volume)
    }

    fn null_entry(config: &MapDataConfig) -> Self {
        let mut furn = Self::new(config.default_max_volume);
        furn.common.name = "nothing".to_string();
        furn.set_flag("TRANSPARENT");
        furn
    }

    fn id(&self) -> &FurnStrId {
        &self.id
    }

    fn set_id(&mut self, id: FurnStrId) {
        self.id = id;
    }

    fn load(
        &mut self,
        jo: &mut FieldReader<'_, '_>,
        ctx: &mut LoadContext<'_>,
    ) -> Result<(), LoadError> {
        self.common.load(jo, ctx)?;
        jo.mandatory("name", &mut self.common.name);
        jo.mandatory("move_cost_mod", &mut self.common.movecost);
        jo.optional("coverage", &mut self.common.coverage, 0);
        jo.optional("comfort", &mut self.comfort, 0);
        jo.optional("floor_bedding_warmth", &mut self.floor_bedding_warmth, 0);
        jo.optional_default("emissions", &mut self.common.emissions);
        jo.optional("bonus_fire_warmth_feet", &mut self.bonus_fire_warmth_feet, 300);
        self.load_keg_capacity(jo);
        jo.mandatory("required_str", &mut self.move_str_req);
        jo.optional("max_volume", &mut self.common.max_volume, ctx.config.default_max_volume);
        jo.optional("crafting_pseudo_item", &mut self.crafting_pseudo_item, ItypeId::null());
        jo.optional("deployed_item", &mut self.deployed_item, ItypeId::null());
        self.common.load_symbol(jo);
        jo.optional("light_emitted", &mut self.common.light_emitted, 0);

        self.common.load_flags(jo);

        jo.optional("open", &mut self.open, FurnStrId::null());
        jo.optional("close", &mut self.close, FurnStrId::null());

        self.bash.load(jo, "bash", MapObjectType::Furniture, ctx);
        self.deconstruct.load(jo, "deconstruct", true, ctx);

        if let Some(obj) = jo.obj().get_object("workbench") {
            let context = format!("{} workbench", jo.context());
            let mut workbench = FurnWorkbenchInfo::default();
            workbench.load(&mut jo.nested(obj, context));
            self.workbench = Some(workbench);
        }
        if let Some(obj) = jo.obj().get_object("plant_data") {
            let context = format!("{} plant_data", jo.context());
            let mut plant = PlantData::default();
            plant.load(&mut jo.nested(obj, context));
            self.plant = Some(plant);
        }
        if jo.obj().has_number("surgery_skill_multiplier") {
            self.surgery_skill_multiplier = jo.read("surgery_skill_multiplier");
        }
        Ok(())
    }
}
