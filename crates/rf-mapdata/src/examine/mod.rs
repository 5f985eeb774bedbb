//! Examine behaviors of terrain and furniture
//!
//! A definition examines either through a hard-coded [`ExamineFunction`] or
//! through an [`ExamineActor`], a configurable behavior cloned from a
//! prototype in the [`ExamineActorTable`] and loaded from the definition's
//! `examine_action` object.

mod cardreader;
mod crafter;
mod functions;

use std::fmt;

use hashbrown::HashMap;
use rf_units::TimePoint;

use crate::data::MapData;
use crate::diagnostics::Diagnostics;
use crate::error::LoadError;
use crate::json::FieldReader;
use crate::world::{Character, CreatureRegistry, InteractionHooks, MapAccess, MapgenHook, Tripoint, Ui};

pub use cardreader::{CardReaderActor, FLAG_ID_CARD_DESPAWN};
pub use crafter::{CrafterActor, CrafterOption, CrafterStrings, MarkerState, ProcessingSnapshot};

/// Everything an examine behavior may touch while it runs
pub struct ExamineContext<'a> {
    pub map: &'a mut dyn MapAccess,
    pub ui: &'a mut dyn Ui,
    pub creatures: &'a mut dyn CreatureRegistry,
    pub mapgen: &'a mut dyn MapgenHook,
    pub hooks: &'a mut dyn InteractionHooks,
    pub data: &'a MapData,
    pub diag: &'a mut Diagnostics,
    pub now: TimePoint,
}

/// A configurable examine behavior
pub trait ExamineActor: fmt::Debug {
    /// Prototype name used in `examine_action.type`
    fn type_name(&self) -> &str;

    /// Read the per-definition configuration
    fn load(&mut self, jo: &mut FieldReader<'_, '_>);

    /// Examine `pos`. `who` is `None` when the world ticks the tile
    fn call(&self, ctx: &mut ExamineContext<'_>, who: Option<&mut dyn Character>, pos: Tripoint);

    /// Consistency checks once every definition is loaded
    fn finalize(&self, owner: &str, data: &MapData, diag: &mut Diagnostics);

    fn clone_box(&self) -> Box<dyn ExamineActor>;
}

impl Clone for Box<dyn ExamineActor> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

pub type ExamineFn = fn(&mut ExamineContext<'_>, Option<&mut dyn Character>, Tripoint);

/// A named hard-coded examine function
#[derive(Clone, Copy)]
pub struct ExamineFunction {
    name: &'static str,
    func: ExamineFn,
}

impl fmt::Debug for ExamineFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExamineFunction({})", self.name)
    }
}

const EXAMINE_FUNCTIONS: &[ExamineFunction] = &[
    ExamineFunction::NONE,
    ExamineFunction {
        name: "curtains",
        func: functions::curtains,
    },
    ExamineFunction {
        name: "deployed_furniture",
        func: functions::deployed_furniture,
    },
];

impl ExamineFunction {
    pub const NONE: ExamineFunction = ExamineFunction {
        name: "none",
        func: functions::none,
    };

    pub fn from_name(name: &str) -> Option<Self> {
        EXAMINE_FUNCTIONS.iter().find(|f| f.name == name).copied()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Every registered function name
    pub fn names() -> impl Iterator<Item = &'static str> {
        EXAMINE_FUNCTIONS.iter().map(|f| f.name)
    }
}

/// Examine behavior of one definition; a function or an actor, never both
#[derive(Debug, Clone)]
pub enum Examine {
    Function(ExamineFunction),
    Actor(Box<dyn ExamineActor>),
}

impl Examine {
    pub fn none() -> Self {
        Examine::Function(ExamineFunction::NONE)
    }

    pub fn is_function(&self, name: &str) -> bool {
        matches!(self, Examine::Function(f) if f.name == name)
    }

    /// Function name or actor type
    pub fn name(&self) -> &str {
        match self {
            Examine::Function(f) => f.name,
            Examine::Actor(actor) => actor.type_name(),
        }
    }

    pub fn actor(&self) -> Option<&dyn ExamineActor> {
        match self {
            Examine::Actor(actor) => Some(actor.as_ref()),
            Examine::Function(_) => None,
        }
    }

    pub fn call(&self, ctx: &mut ExamineContext<'_>, who: Option<&mut dyn Character>, pos: Tripoint) {
        match self {
            Examine::Function(f) => (f.func)(ctx, who, pos),
            Examine::Actor(actor) => actor.call(ctx, who, pos),
        }
    }
}

/// Prototypes of every examine actor type
#[derive(Debug, Clone, Default)]
pub struct ExamineActorTable {
    prototypes: HashMap<String, Box<dyn ExamineActor>>,
}

impl ExamineActorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the built-in `cardreader` and `crafter` actors
    pub fn with_builtin() -> Self {
        let mut table = Self::new();
        table.register_builtin();
        table
    }

    /// Add the built-in actors, keeping any other registered type
    pub fn register_builtin(&mut self) {
        self.register(Box::new(CardReaderActor::default()));
        self.register(Box::new(CrafterActor::default()));
    }

    /// Add a prototype, replacing one of the same type
    pub fn register(&mut self, prototype: Box<dyn ExamineActor>) {
        let name = prototype.type_name().to_string();
        log::debug!(target: "rf_mapdata::examine", "registered examine actor {}", name);
        self.prototypes.insert(name, prototype);
    }

    /// Fresh copy of the prototype named `type_name`
    pub fn create(&self, type_name: &str) -> Result<Box<dyn ExamineActor>, LoadError> {
        self.prototypes
            .get(type_name)
            .map(|prototype| prototype.clone_box())
            .ok_or_else(|| LoadError::UnknownActor(type_name.to_string()))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.prototypes.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}

/// Examine the tile at `pos`: examinable furniture first, else the terrain
pub fn examine(ctx: &mut ExamineContext<'_>, who: Option<&mut dyn Character>, pos: Tripoint) {
    let data = ctx.data;
    let furn = data.furn(ctx.map.furn(pos));
    if furn.can_examine() {
        furn.examine.call(ctx, who, pos);
    } else {
        data.ter(ctx.map.ter(pos)).examine.call(ctx, who, pos);
    }
}
