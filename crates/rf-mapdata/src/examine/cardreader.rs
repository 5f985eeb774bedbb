//! Card reader: swaps tiles around it (or regenerates the map chunk) when the
//! examiner presents an access card

use std::collections::BTreeMap;

use rf_units::TimeDuration;

use crate::data::MapData;
use crate::diagnostics::Diagnostics;
use crate::flag_registry::FlagId;
use crate::itype::ItypeId;
use crate::json::FieldReader;
use crate::mapdata::{FurnStrId, TerStrId, known};
use crate::world::{Character, Menu, MenuEntry, MsgType, Tripoint};

use super::{ExamineActor, ExamineContext};

/// Creatures despawned by a successful card swipe
pub const FLAG_ID_CARD_DESPAWN: &str = "ID_CARD_DESPAWN";

#[derive(Debug, Clone, PartialEq)]
pub struct CardReaderActor {
    allowed_flags: Vec<FlagId>,
    consume: bool,
    allow_hacking: bool,
    despawn_monsters: bool,

    // Point edits around the reader
    radius: i32,
    terrain_changes: BTreeMap<TerStrId, TerStrId>,
    furn_changes: BTreeMap<FurnStrId, FurnStrId>,

    // Or regenerate the whole overmap tile
    mapgen_id: String,
    map_regen: bool,

    query: bool,
    query_msg: String,
    success_msg: String,
    redundant_msg: String,
}

impl Default for CardReaderActor {
    fn default() -> Self {
        Self {
            allowed_flags: Vec::new(),
            consume: true,
            allow_hacking: true,
            despawn_monsters: true,
            radius: 3,
            terrain_changes: BTreeMap::new(),
            furn_changes: BTreeMap::new(),
            mapgen_id: String::new(),
            map_regen: false,
            query: true,
            query_msg: String::new(),
            success_msg: String::new(),
            redundant_msg: String::new(),
        }
    }
}

impl CardReaderActor {
    pub fn allowed_flags(&self) -> &[FlagId] {
        &self.allowed_flags
    }

    pub fn is_map_regen(&self) -> bool {
        self.map_regen
    }

    /// Use up one card; asks which one when several kinds qualify
    fn consume_card(&self, ctx: &mut ExamineContext<'_>, guy: &mut dyn Character) {
        let mut cards: Vec<ItypeId> = Vec::new();
        for flag in &self.allowed_flags {
            for card in guy.items_with_flag(flag.as_str()) {
                if !cards.contains(&card.type_id) {
                    cards.push(card.type_id.clone());
                }
            }
        }

        let chosen = if cards.len() > 1 {
            let mut menu = Menu::new("Use which item?");
            for (i, card) in cards.iter().enumerate() {
                let name = ctx.data.item_types().nname(card);
                menu.add(MenuEntry::new(i as i32, true, None, name));
            }
            // Cancelling still swipes a card
            ctx.ui
                .menu(&menu)
                .and_then(|ret| usize::try_from(ret).ok())
                .and_then(|i| cards.get(i))
        } else {
            None
        };

        if let Some(card) = chosen.or_else(|| cards.first()) {
            guy.use_amount(card, 1);
        }
    }

    /// Returns true if anything changed
    fn apply(&self, ctx: &mut ExamineContext<'_>, pos: Tripoint) -> bool {
        if self.map_regen {
            let omt = ctx.map.get_abs(pos).to_omt();
            let applied = ctx.mapgen.update(&self.mapgen_id, omt);
            if !applied {
                ctx.diag.report(
                    "cardreader",
                    format!("failed to apply mapgen function {}", self.mapgen_id),
                );
            }
            ctx.map.set_seen_cache_dirty(pos);
            ctx.map.set_transparency_cache_dirty(pos.z);
            return applied;
        }

        let data = ctx.data;
        let mut open = false;
        for p in pos.points_in_radius(self.radius) {
            let ter = &data.ter(ctx.map.ter(p)).id;
            if let Some(to) = self.terrain_changes.get(ter) {
                ctx.map.ter_set(p, data.terrain().obj_by_string(to));
                open = true;
            }
            let furn = &data.furn(ctx.map.furn(p)).id;
            if let Some(to) = self.furn_changes.get(furn) {
                ctx.map.furn_set(p, data.furniture().obj_by_string(to));
                open = true;
            }
        }
        open
    }

    /// Hostile card-despawn creatures in the same overmap tile
    fn despawn_creatures(&self, ctx: &mut ExamineContext<'_>, pos: Tripoint) {
        let omt = ctx.map.get_abs(pos).to_omt();
        for critter in ctx.creatures.creatures() {
            if critter.hostile
                && critter.has_flag(FLAG_ID_CARD_DESPAWN)
                && ctx.map.get_abs(critter.pos).to_omt() == omt
            {
                log::debug!(target: "rf_mapdata::examine", "card reader despawns creature {}", critter.handle);
                ctx.creatures.despawn(critter.handle);
            }
        }
    }

    fn hacking_matches_changes(&self) -> bool {
        let locked = TerStrId::new(known::T_DOOR_METAL_LOCKED);
        let closed = TerStrId::new(known::T_DOOR_METAL_C);
        self.furn_changes.is_empty()
            && self.terrain_changes.len() == 1
            && self.terrain_changes.get(&locked) == Some(&closed)
    }
}

impl ExamineActor for CardReaderActor {
    fn type_name(&self) -> &str {
        "cardreader"
    }

    fn load(&mut self, jo: &mut FieldReader<'_, '_>) {
        jo.mandatory("flags", &mut self.allowed_flags);
        jo.optional("consume_card", &mut self.consume, true);
        jo.optional("allow_hacking", &mut self.allow_hacking, true);
        jo.optional("despawn_monsters", &mut self.despawn_monsters, true);
        if jo.obj().has_string("mapgen_id") {
            jo.optional_default("mapgen_id", &mut self.mapgen_id);
            self.map_regen = true;
        } else {
            jo.optional("radius", &mut self.radius, 3);
            jo.optional_default("terrain_changes", &mut self.terrain_changes);
            jo.optional_default("furn_changes", &mut self.furn_changes);
        }
        jo.optional("query", &mut self.query, true);
        jo.optional_default("query_msg", &mut self.query_msg);
        jo.mandatory("success_msg", &mut self.success_msg);
        jo.mandatory("redundant_msg", &mut self.redundant_msg);
    }

    fn call(&self, ctx: &mut ExamineContext<'_>, who: Option<&mut dyn Character>, pos: Tripoint) {
        let Some(guy) = who else {
            ctx.diag.report("cardreader", "called with no character");
            return;
        };

        let has_card = self
            .allowed_flags
            .iter()
            .any(|flag| guy.has_item_with_flag(flag.as_str()));

        if has_card && (!self.query || ctx.ui.query_yn(&self.query_msg)) {
            guy.mod_moves(-TimeDuration::from_turns(1).to_moves());
            let open = self.apply(ctx, pos);
            if self.despawn_monsters {
                self.despawn_creatures(ctx, pos);
            }
            if open {
                ctx.ui.add_msg(MsgType::Neutral, &self.success_msg);
                if self.consume {
                    self.consume_card(ctx, guy);
                }
            } else {
                ctx.ui.add_msg(MsgType::Neutral, &self.redundant_msg);
            }
        } else if self.allow_hacking && ctx.ui.query_yn("Attempt to hack this card-reader?") {
            ctx.hooks.try_start_hacking(guy, pos);
        }
    }

    fn finalize(&self, owner: &str, data: &MapData, diag: &mut Diagnostics) {
        if self.allowed_flags.is_empty() {
            diag.report(owner, "cardreader has no allowed card flags");
        }
        for flag in &self.allowed_flags {
            if !data.flags().is_valid(flag) {
                diag.report(owner, format!("cardreader uses flag {} that does not exist", flag));
            }
        }

        if self.terrain_changes.is_empty() && self.furn_changes.is_empty() && self.mapgen_id.is_empty()
        {
            diag.report(owner, "cardreader does not change either terrain or furniture");
        }
        for (from, to) in &self.terrain_changes {
            for id in [from, to] {
                if !data.terrain().is_valid(id) {
                    diag.report(owner, format!("cardreader changes unknown terrain {}", id));
                }
            }
        }
        for (from, to) in &self.furn_changes {
            for id in [from, to] {
                if !data.furniture().is_valid(id) {
                    diag.report(owner, format!("cardreader changes unknown furniture {}", id));
                }
            }
        }

        if self.query && self.query_msg.is_empty() {
            diag.report(
                owner,
                "cardreader is told to query, yet does not have a query message defined",
            );
        }

        if self.allow_hacking && !self.hacking_matches_changes() {
            diag.report(owner, "cardreader allows hacking, but its changes differ from a hack");
        }
    }

    fn clone_box(&self) -> Box<dyn ExamineActor> {
        Box::new(self.clone())
    }
}
