//! Id-only catalogs for records this crate references but does not interpret
//!
//! Traps, emissions, harvest lists and item groups are defined elsewhere;
//! terrain and furniture only need to know that an id exists (and, for
//! traps, its handle).

use hashbrown::HashMap;

use crate::ids::{IntId, NullId, StringId};

#[derive(Debug, Clone, Copy)]
pub struct Trap;

impl NullId for Trap {
    const NULL_ID: &'static str = "tr_null";
}

#[derive(Debug, Clone, Copy)]
pub struct Emit;

impl NullId for Emit {
    const NULL_ID: &'static str = "null";
}

#[derive(Debug, Clone, Copy)]
pub struct HarvestList;

impl NullId for HarvestList {
    const NULL_ID: &'static str = "null";
}

#[derive(Debug, Clone, Copy)]
pub struct ItemGroup;

impl NullId for ItemGroup {
    const NULL_ID: &'static str = "EMPTY_GROUP";
}

pub type TrapStrId = StringId<Trap>;
pub type TrapId = IntId<Trap>;
pub type EmitId = StringId<Emit>;
pub type HarvestId = StringId<HarvestList>;
pub type ItemGroupId = StringId<ItemGroup>;

/// Ordered set of known ids; the null id is always entry 0
#[derive(Debug, Clone)]
pub struct IdCatalog<T> {
    ids: Vec<StringId<T>>,
    index: HashMap<StringId<T>, IntId<T>>,
    anonymous: usize,
}

impl<T: NullId> Default for IdCatalog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NullId> IdCatalog<T> {
    pub fn new() -> Self {
        let mut catalog = Self {
            ids: Vec::new(),
            index: HashMap::new(),
            anonymous: 0,
        };
        catalog.register(StringId::null());
        catalog
    }

    /// Register an id, returning its handle (existing ids keep theirs)
    pub fn register(&mut self, id: StringId<T>) -> IntId<T> {
        if let Some(handle) = self.index.get(&id) {
            return *handle;
        }
        let handle = IntId::new(self.ids.len());
        self.ids.push(id.clone());
        self.index.insert(id, handle);
        handle
    }

    /// Register a generated id for an inline definition
    pub fn register_anonymous(&mut self, context: &str) -> StringId<T> {
        self.anonymous += 1;
        let id = StringId::new(format!("{} #{}", context, self.anonymous));
        self.register(id.clone());
        id
    }

    pub fn find(&self, id: &StringId<T>) -> Option<IntId<T>> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &StringId<T>) -> bool {
        self.index.contains_key(id)
    }

    pub fn id(&self, handle: IntId<T>) -> &StringId<T> {
        self.ids.get(handle.to_i()).unwrap_or(&self.ids[0])
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.len() <= 1
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
