//! Hard-coded examine functions

use crate::flags::TerBitflags;
use crate::ids::IntId;
use crate::itype::Item;
use crate::world::{Character, MsgType, Tripoint};

use super::ExamineContext;

/// Moves spent drawing curtains
const CURTAIN_MOVES: i32 = 100;

pub(super) fn none(ctx: &mut ExamineContext<'_>, _who: Option<&mut dyn Character>, pos: Tripoint) {
    let furn = ctx.map.furn(pos);
    let name = if furn.is_null() {
        ctx.data.ter(ctx.map.ter(pos)).name()
    } else {
        ctx.data.furn(furn).name()
    };
    let msg = format!("That is a {}.", name);
    ctx.ui.add_msg(MsgType::Neutral, &msg);
}

pub(super) fn curtains(ctx: &mut ExamineContext<'_>, who: Option<&mut dyn Character>, pos: Tripoint) {
    let Some(who) = who else {
        ctx.diag.report("curtains", "examined with no character");
        return;
    };
    let data = ctx.data;
    let ter = data.ter(ctx.map.ter(pos));
    let target = data.terrain().obj_by_string(&ter.curtain_transform);
    if target.is_null() {
        ctx.diag.report(format!("terrain {}", ter.id), "curtains lead nowhere");
        return;
    }
    let opening = data.ter(target).has_bitflag(TerBitflags::TRANSPARENT);
    ctx.map.ter_set(pos, target);
    ctx.map.set_transparency_cache_dirty(pos.z);
    who.mod_moves(-CURTAIN_MOVES);
    let msg = if opening {
        "You open the curtains."
    } else {
        "You close the curtains."
    };
    ctx.ui.add_msg(MsgType::Neutral, msg);
}

pub(super) fn deployed_furniture(
    ctx: &mut ExamineContext<'_>,
    who: Option<&mut dyn Character>,
    pos: Tripoint,
) {
    let Some(who) = who else {
        ctx.diag.report("deployed_furniture", "examined with no character");
        return;
    };
    let data = ctx.data;
    let furn = data.furn(ctx.map.furn(pos));
    if furn.deployed_item.is_null() {
        ctx.diag.report(format!("furniture {}", furn.id), "has no deployed_item");
        return;
    }
    if !ctx.ui.query_yn(&format!("Take down the {}?", furn.name())) {
        return;
    }
    let msg = format!("You take down the {}.", furn.name());
    ctx.ui.add_msg(MsgType::Info, &msg);
    ctx.map.add_item(who.pos(), Item::new(furn.deployed_item.clone(), ctx.now, 1));
    ctx.map.furn_set(pos, IntId::NULL);
}
