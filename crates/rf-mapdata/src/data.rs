//! The map data context
//!
//! [`MapData`] owns every catalog the terrain and furniture definitions refer
//! to. Loading happens in three passes: [`load_json_str`](MapData::load_json_str)
//! (or [`load_object`](MapData::load_object)) per record,
//! [`finalize`](MapData::finalize) once every file is read, then
//! [`check`](MapData::check) for cross-validation.

use std::path::Path;

use rf_units::TimePoint;
use serde_json::Value;

use crate::calendar::{Season, season_of_year};
use crate::catalog::{
    Emit, EmitId, HarvestId, HarvestList, IdCatalog, ItemGroup, ItemGroupId, Trap, TrapId, TrapStrId,
};
use crate::config::MapDataConfig;
use crate::diagnostics::Diagnostics;
use crate::error::LoadError;
use crate::examine::{ExamineActor, ExamineActorTable};
use crate::factory::{GenericFactory, LoadContext};
use crate::flag_registry::FlagRegistry;
use crate::itype::ItemTypes;
use crate::json::{self, JsonObject};
use crate::mapdata::{FurnId, FurnT, TerId, TerT};

/// Record types holding an item definition
const ITEM_TYPES: &[&str] = &["GENERIC", "COMESTIBLE", "TOOL", "AMMO", "item"];

#[derive(Debug, Clone)]
pub struct MapData {
    config: MapDataConfig,
    terrain: GenericFactory<TerT>,
    furniture: GenericFactory<FurnT>,
    flags: FlagRegistry,
    item_types: ItemTypes,
    emits: IdCatalog<Emit>,
    harvests: IdCatalog<HarvestList>,
    traps: IdCatalog<Trap>,
    item_groups: IdCatalog<ItemGroup>,
    actors: ExamineActorTable,
}

impl Default for MapData {
    fn default() -> Self {
        Self::new(MapDataConfig::default())
    }
}

impl MapData {
    pub fn new(config: MapDataConfig) -> Self {
        let mut data = Self {
            terrain: GenericFactory::new(&config),
            furniture: GenericFactory::new(&config),
            flags: FlagRegistry::new(),
            item_types: ItemTypes::new(),
            emits: IdCatalog::new(),
            harvests: IdCatalog::new(),
            traps: IdCatalog::new(),
            item_groups: IdCatalog::new(),
            actors: ExamineActorTable::new(),
            config,
        };
        data.init();
        data
    }

    /// Register the built-in examine actors
    pub fn init(&mut self) {
        self.actors.register_builtin();
    }

    /// Add an examine actor type; definitions loaded afterwards may use it
    pub fn register_actor(&mut self, prototype: Box<dyn ExamineActor>) {
        self.actors.register(prototype);
    }

    /// Load one record, dispatching on its `type`
    pub fn load_object(
        &mut self,
        record: &Value,
        src: &str,
        diag: &mut Diagnostics,
    ) -> Result<(), LoadError> {
        let jo = JsonObject::new(record)?;
        let kind = jo.get_str("type").ok_or(LoadError::MissingType)?;
        match kind {
            "terrain" => {
                let mut ctx = LoadContext {
                    src,
                    config: &self.config,
                    actors: &self.actors,
                    item_groups: &mut self.item_groups,
                };
                self.terrain.load(record, &mut ctx, diag)?;
            }
            "furniture" => {
                let mut ctx = LoadContext {
                    src,
                    config: &self.config,
                    actors: &self.actors,
                    item_groups: &mut self.item_groups,
                };
                self.furniture.load(record, &mut ctx, diag)?;
            }
            "json_flag" => {
                self.flags.load(record)?;
            }
            kind if ITEM_TYPES.contains(&kind) => {
                self.item_types.load(record)?;
            }
            "emit" => {
                self.emits.register(EmitId::new(Self::record_id(jo, "emit")?));
            }
            "harvest" => {
                self.harvests
                    .register(HarvestId::new(Self::record_id(jo, "harvest")?));
            }
            "trap" => {
                self.traps.register(TrapStrId::new(Self::record_id(jo, "trap")?));
            }
            "item_group" => {
                self.item_groups
                    .register(ItemGroupId::new(Self::record_id(jo, "item_group")?));
            }
            other => return Err(LoadError::UnknownType(other.to_string())),
        }
        Ok(())
    }

    fn record_id<'a>(jo: JsonObject<'a>, kind: &'static str) -> Result<&'a str, LoadError> {
        jo.get_str("id").ok_or(LoadError::MissingId { kind })
    }

    /// Load every record of a JSON document. Records that cannot be
    /// registered are reported and skipped; returns how many were loaded.
    pub fn load_json_str(
        &mut self,
        text: &str,
        src: &str,
        diag: &mut Diagnostics,
    ) -> Result<usize, LoadError> {
        let value: Value = serde_json::from_str(text)?;
        let mut loaded = 0;
        for record in json::records(&value)? {
            match self.load_object(record, src, diag) {
                Ok(()) => loaded += 1,
                Err(LoadError::UnknownType(kind)) => {
                    log::debug!(target: "rf_mapdata::data", "skipping record of type {}", kind);
                }
                Err(err) => diag.report(record_context(record), err.to_string()),
            }
        }
        log::debug!(target: "rf_mapdata::data", "loaded {} records from {}", loaded, src);
        Ok(loaded)
    }

    pub fn load_file(
        &mut self,
        path: &Path,
        src: &str,
        diag: &mut Diagnostics,
    ) -> Result<usize, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.load_json_str(&text, src, diag)
    }

    /// Resolve deferred `copy-from` records, then terrain traps
    pub fn finalize(&mut self, diag: &mut Diagnostics) {
        let mut ctx = LoadContext {
            src: &self.config.core_source,
            config: &self.config,
            actors: &self.actors,
            item_groups: &mut self.item_groups,
        };
        self.terrain.finalize(&mut ctx, diag);
        self.furniture.finalize(&mut ctx, diag);
        self.set_ter_ids(diag);
    }

    fn set_ter_ids(&mut self, diag: &mut Diagnostics) {
        let traps = &self.traps;
        for ter in self.terrain.entries_mut() {
            ter.trap = if ter.trap_id_str.is_empty() {
                TrapId::NULL
            } else {
                match traps.find(&TrapStrId::new(ter.trap_id_str.as_str())) {
                    Some(handle) => handle,
                    None => {
                        diag.report(
                            format!("terrain {}", ter.id),
                            format!("unknown trap {}", ter.trap_id_str),
                        );
                        TrapId::NULL
                    }
                }
            };
        }
    }

    /// Cross-validate every definition
    pub fn check(&self, diag: &mut Diagnostics) {
        for ter in self.terrain.all().iter().skip(1) {
            ter.check(self, diag);
        }
        for furn in self.furniture.all().iter().skip(1) {
            furn.check(self, diag);
        }
    }

    /// Drop every definition; the null entries and actor types stay
    pub fn reset(&mut self) {
        self.terrain.reset(&self.config);
        self.furniture.reset(&self.config);
        self.flags.reset();
        self.item_types.reset();
        self.emits.reset();
        self.harvests.reset();
        self.traps.reset();
        self.item_groups.reset();
    }

    pub fn config(&self) -> &MapDataConfig {
        &self.config
    }

    pub fn terrain(&self) -> &GenericFactory<TerT> {
        &self.terrain
    }

    pub fn furniture(&self) -> &GenericFactory<FurnT> {
        &self.furniture
    }

    pub fn ter(&self, handle: TerId) -> &TerT {
        self.terrain.get(handle)
    }

    pub fn furn(&self, handle: FurnId) -> &FurnT {
        self.furniture.get(handle)
    }

    pub fn flags(&self) -> &FlagRegistry {
        &self.flags
    }

    pub fn item_types(&self) -> &ItemTypes {
        &self.item_types
    }

    pub fn item_types_mut(&mut self) -> &mut ItemTypes {
        &mut self.item_types
    }

    pub fn emits(&self) -> &IdCatalog<Emit> {
        &self.emits
    }

    pub fn harvests(&self) -> &IdCatalog<HarvestList> {
        &self.harvests
    }

    pub fn traps(&self) -> &IdCatalog<Trap> {
        &self.traps
    }

    pub fn item_groups(&self) -> &IdCatalog<ItemGroup> {
        &self.item_groups
    }

    pub fn actors(&self) -> &ExamineActorTable {
        &self.actors
    }

    pub fn season(&self, now: TimePoint) -> Season {
        season_of_year(now, self.config.season_length())
    }
}

/// `type id` of a record for diagnostics
fn record_context(record: &Value) -> String {
    let kind = record.get("type").and_then(Value::as_str).unwrap_or("record");
    let id = record
        .get("id")
        .or_else(|| record.get("abstract"))
        .and_then(Value::as_str)
        .unwrap_or("(no id)");
    format!("{} {}", kind, id)
}
