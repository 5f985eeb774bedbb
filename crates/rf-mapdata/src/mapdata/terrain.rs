//! Terrain definitions

use std::ops::{Deref, DerefMut};

use rf_units::Volume;

use crate::catalog::TrapId;
use crate::config::MapDataConfig;
use crate::data::MapData;
use crate::diagnostics::Diagnostics;
use crate::error::LoadError;
use crate::factory::{FactoryEntry, LoadContext};
use crate::ids::{IntId, NullId, StringId};
use crate::json::FieldReader;

use super::{FLAG_LOCKED, MapBashInfo, MapDataCommon, MapDeconstructInfo, MapObjectType};

pub type TerStrId = StringId<TerT>;
pub type TerId = IntId<TerT>;

/// One terrain type
#[derive(Debug, Clone)]
pub struct TerT {
    pub id: TerStrId,
    pub common: MapDataCommon,
    /// Terrain this becomes when opened
    pub open: TerStrId,
    /// Terrain this becomes when closed
    pub close: TerStrId,
    pub transforms_into: TerStrId,
    /// Terrain placed on the level above
    pub roof: TerStrId,
    pub trap_id_str: String,
    /// Resolved from `trap_id_str` once every trap is known
    pub trap: TrapId,
    pub allowed_template_ids: Vec<String>,
    pub bash: MapBashInfo,
    pub deconstruct: MapDeconstructInfo,
}

impl NullId for TerT {
    const NULL_ID: &'static str = "t_null";
}

impl Deref for TerT {
    type Target = MapDataCommon;

    fn deref(&self) -> &MapDataCommon {
        &self.common
    }
}

impl DerefMut for TerT {
    fn deref_mut(&mut self) -> &mut MapDataCommon {
        &mut self.common
    }
}

impl TerT {
    pub fn new(max_volume: Volume) -> Self {
        Self {
            id: TerStrId::null(),
            common: MapDataCommon::new(max_volume),
            open: TerStrId::null(),
            close: TerStrId::null(),
            transforms_into: TerStrId::null(),
            roof: TerStrId::null(),
            trap_id_str: String::new(),
            trap: TrapId::NULL,
            allowed_template_ids: Vec::new(),
            bash: MapBashInfo::default(),
            deconstruct: MapDeconstructInfo::default(),
        }
    }

    /// Core data restating an inherited `max_volume` is an error; mods may
    /// override freely
    fn load_max_volume(&mut self, jo: &mut FieldReader<'_, '_>, ctx: &LoadContext<'_>) {
        let Some(volume) = jo.read::<Volume>("max_volume") else {
            return;
        };
        let strict = ctx.config.strict_max_volume && ctx.src == ctx.config.core_source;
        if strict && jo.was_loaded && volume == self.common.max_volume {
            jo.report("assignment does not update max_volume");
        }
        self.common.max_volume = volume;
    }

    pub(crate) fn check(&self, data: &MapData, diag: &mut Diagnostics) {
        let context = format!("terrain {}", self.id);
        self.common.check(&context, data, diag);
        self.bash.check(&context, true, data, diag);
        self.deconstruct.check(&context, true, data, diag);

        let terrain = data.terrain();
        if !terrain.is_valid(&self.transforms_into) {
            diag.report(&context, format!("invalid transforms_into {}", self.transforms_into));
        }
        if !terrain.is_valid(&self.open) {
            diag.report(&context, format!("invalid terrain {} for opening", self.open));
        }
        if !terrain.is_valid(&self.close) {
            diag.report(&context, format!("invalid terrain {} for closing", self.close));
        }

        // Locked terrain is not expected to lock again
        if !self.has_flag(FLAG_LOCKED) {
            if let Some(open) = terrain.obj(&self.open).filter(|_| !self.open.is_null()) {
                if !open.close.is_null() && open.close != self.id {
                    diag.report(
                        &context,
                        format!("opening terrain {} doesn't reciprocate", self.open),
                    );
                }
            }
            if let Some(close) = terrain.obj(&self.close).filter(|_| !self.close.is_null()) {
                if !close.open.is_null() && close.open != self.id {
                    diag.report(
                        &context,
                        format!("closing terrain {} doesn't reciprocate", self.close),
                    );
                }
            }
        }

        let is_curtain = self.has_examine("curtains");
        if is_curtain && !self.has_curtains() {
            diag.report(&context, "is a curtain, but has no curtain_transform");
        }
        if !is_curtain && self.has_curtains() {
            diag.report(&context, "is not a curtain, but has curtain_transform");
        }
        if !self.curtain_transform.is_empty() && !terrain.is_valid(&self.curtain_transform) {
            diag.report(
                &context,
                format!("invalid curtain transform target {}", self.curtain_transform),
            );
        }

        if !self.transforms_into.is_null() && self.transforms_into == self.id {
            diag.report(&context, "transforms_into itself");
        }
    }
}

impl FactoryEntry for TerT {
    const KIND: &'static str = "terrain";

    fn new_entry(config: &MapDataConfig) -> Self {
        Self::new(config.default_max_volume)
    }

    fn null_entry(config: &MapDataConfig) -> Self {
        let mut ter = Self::new(config.default_max_volume);
        ter.common.name = "nothing".to_string();
        ter.common.movecost = 2;
        ter.set_flag("TRANSPARENT");
        ter
    }

    fn id(&self) -> &TerStrId {
        &self.id
    }

    fn set_id(&mut self, id: TerStrId) {
        self.id = id;
    }

    fn load(
        &mut self,
        jo: &mut FieldReader<'_, '_>,
        ctx: &mut LoadContext<'_>,
    ) -> Result<(), LoadError> {
        self.common.load(jo, ctx)?;
        jo.mandatory("name", &mut self.common.name);
        jo.mandatory("move_cost", &mut self.common.movecost);
        jo.optional("coverage", &mut self.common.coverage, 0);
        self.load_max_volume(jo, ctx);
        jo.optional_default("trap", &mut self.trap_id_str);
        jo.optional("heat_radiation", &mut self.common.heat_radiation, 0);
        jo.optional("light_emitted", &mut self.common.light_emitted, 0);

        self.common.load_symbol(jo);

        self.trap = TrapId::NULL;
        self.common.load_flags(jo);

        jo.optional_default("allowed_template_ids", &mut self.allowed_template_ids);
        jo.optional("open", &mut self.open, TerStrId::null());
        jo.optional("close", &mut self.close, TerStrId::null());
        jo.optional("transforms_into", &mut self.transforms_into, TerStrId::null());
        jo.optional("roof", &mut self.roof, TerStrId::null());
        jo.optional_default("emissions", &mut self.common.emissions);

        self.bash.load(jo, "bash", MapObjectType::Terrain, ctx);
        self.deconstruct.load(jo, "deconstruct", false, ctx);
        Ok(())
    }
}
