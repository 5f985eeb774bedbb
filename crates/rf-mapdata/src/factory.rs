//! Generic catalog of loadable definitions
//!
//! Definitions are registered by string id and addressed at runtime through
//! dense [`IntId`] handles assigned in load order. Handle 0 is always the
//! null entry, so an unknown or reset id still dereferences to something.

use hashbrown::HashMap;
use serde_json::Value;

use crate::catalog::{IdCatalog, ItemGroup};
use crate::config::MapDataConfig;
use crate::diagnostics::Diagnostics;
use crate::error::LoadError;
use crate::examine::ExamineActorTable;
use crate::ids::{IntId, NullId, StringId};
use crate::json::{FieldReader, JsonObject};

/// Everything a definition may consult while loading
pub struct LoadContext<'a> {
    /// Source tag of the file being loaded (`core` or a mod id)
    pub src: &'a str,
    pub config: &'a MapDataConfig,
    pub actors: &'a ExamineActorTable,
    pub item_groups: &'a mut IdCatalog<ItemGroup>,
}

/// A definition type stored in a [`GenericFactory`]
pub trait FactoryEntry: Clone + NullId + Sized {
    /// Record type name, also used in diagnostics
    const KIND: &'static str;

    /// Fresh definition before any member is read
    fn new_entry(config: &MapDataConfig) -> Self;

    /// The entry behind handle 0
    fn null_entry(config: &MapDataConfig) -> Self;

    fn id(&self) -> &StringId<Self>;
    fn set_id(&mut self, id: StringId<Self>);

    fn load(
        &mut self,
        jo: &mut FieldReader<'_, '_>,
        ctx: &mut LoadContext<'_>,
    ) -> Result<(), LoadError>;
}

/// Result of loading one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus<T> {
    Loaded(IntId<T>),
    Abstract,
    /// Waiting for the `copy-from` parent to be loaded
    Deferred { parent: String },
}

#[derive(Debug, Clone)]
struct DeferredLoad {
    id: String,
    parent: String,
    src: String,
    record: Value,
}

#[derive(Debug, Clone)]
pub struct GenericFactory<T> {
    list: Vec<T>,
    map: HashMap<StringId<T>, IntId<T>>,
    abstracts: HashMap<StringId<T>, T>,
    deferred: Vec<DeferredLoad>,
}

impl<T: FactoryEntry> GenericFactory<T> {
    pub fn new(config: &MapDataConfig) -> Self {
        let mut factory = Self {
            list: Vec::new(),
            map: HashMap::new(),
            abstracts: HashMap::new(),
            deferred: Vec::new(),
        };
        factory.insert(T::null_entry(config));
        factory
    }

    /// Load one record. A record whose `copy-from` parent is not known yet
    /// is kept and retried by [`finalize`](Self::finalize).
    pub fn load(
        &mut self,
        record: &Value,
        ctx: &mut LoadContext<'_>,
        diag: &mut Diagnostics,
    ) -> Result<LoadStatus<T>, LoadError> {
        let status = self.try_load(record, ctx, diag)?;
        if let LoadStatus::Deferred { parent } = &status {
            let jo = JsonObject::new(record)?;
            let id = jo
                .get_str("id")
                .or_else(|| jo.get_str("abstract"))
                .unwrap_or_default();
            log::debug!(
                target: "rf_mapdata::factory",
                "deferring {} {} until {} is loaded",
                T::KIND,
                id,
                parent
            );
            self.deferred.push(DeferredLoad {
                id: id.to_string(),
                parent: parent.clone(),
                src: ctx.src.to_string(),
                record: record.clone(),
            });
        }
        Ok(status)
    }

    fn try_load(
        &mut self,
        record: &Value,
        ctx: &mut LoadContext<'_>,
        diag: &mut Diagnostics,
    ) -> Result<LoadStatus<T>, LoadError> {
        let jo = JsonObject::new(record)?;
        let (id, is_abstract) = match (jo.get_str("abstract"), jo.get_str("id")) {
            (Some(id), _) => (StringId::<T>::new(id), true),
            (None, Some(id)) => (StringId::<T>::new(id), false),
            (None, None) => return Err(LoadError::MissingId { kind: T::KIND }),
        };

        let (mut def, was_loaded) = if let Some(parent) = jo.get_str("copy-from") {
            match self.find_any(&StringId::new(parent)) {
                Some(base) => (base.clone(), true),
                None => {
                    return Ok(LoadStatus::Deferred {
                        parent: parent.to_string(),
                    });
                }
            }
        } else {
            let existing = if is_abstract {
                self.abstracts.get(&id)
            } else {
                self.obj(&id)
            };
            match existing {
                Some(existing) => (existing.clone(), true),
                None => (T::new_entry(ctx.config), false),
            }
        };

        def.set_id(id.clone());
        let context = format!("{} {}", T::KIND, id);
        let mut reader = FieldReader::new(jo, was_loaded, context, diag);
        def.load(&mut reader, ctx)?;

        log::debug!(target: "rf_mapdata::factory", "loaded {} {} from {}", T::KIND, id, ctx.src);
        if is_abstract {
            self.abstracts.insert(id, def);
            Ok(LoadStatus::Abstract)
        } else {
            Ok(LoadStatus::Loaded(self.insert(def)))
        }
    }

    fn find_any(&self, id: &StringId<T>) -> Option<&T> {
        self.obj(id).or_else(|| self.abstracts.get(id))
    }

    fn insert(&mut self, def: T) -> IntId<T> {
        if let Some(handle) = self.map.get(def.id()) {
            let handle = *handle;
            self.list[handle.to_i()] = def;
            return handle;
        }
        let handle = IntId::new(self.list.len());
        self.map.insert(def.id().clone(), handle);
        self.list.push(def);
        handle
    }

    /// Retry deferred `copy-from` records until no more resolve; whatever is
    /// left is reported
    pub fn finalize(&mut self, ctx: &mut LoadContext<'_>, diag: &mut Diagnostics) {
        loop {
            let pending = std::mem::take(&mut self.deferred);
            if pending.is_empty() {
                return;
            }
            let before = pending.len();
            for deferred in pending {
                let mut retry = LoadContext {
                    src: &deferred.src,
                    config: ctx.config,
                    actors: ctx.actors,
                    item_groups: &mut *ctx.item_groups,
                };
                let status = self.try_load(&deferred.record, &mut retry, diag);
                match status {
                    Ok(LoadStatus::Deferred { .. }) => self.deferred.push(deferred),
                    Ok(_) => {}
                    Err(err) => diag.report(format!("{} {}", T::KIND, deferred.id), err.to_string()),
                }
            }
            if self.deferred.len() == before {
                break;
            }
        }
        for deferred in self.deferred.drain(..) {
            diag.report(
                format!("{} {}", T::KIND, deferred.id),
                format!("copy-from {} does not exist", deferred.parent),
            );
        }
    }

    /// O(1) dereference; out-of-range handles resolve to the null entry
    pub fn get(&self, handle: IntId<T>) -> &T {
        self.list.get(handle.to_i()).unwrap_or(&self.list[0])
    }

    pub fn obj(&self, id: &StringId<T>) -> Option<&T> {
        self.map.get(id).map(|handle| &self.list[handle.to_i()])
    }

    /// Handle for `id`, or the null handle if unknown
    pub fn obj_by_string(&self, id: &StringId<T>) -> IntId<T> {
        self.map.get(id).copied().unwrap_or(IntId::NULL)
    }

    pub fn is_valid(&self, id: &StringId<T>) -> bool {
        self.map.contains_key(id)
    }

    pub fn is_abstract(&self, id: &StringId<T>) -> bool {
        self.abstracts.contains_key(id)
    }

    /// Number of definitions, including the null entry
    pub fn size(&self) -> usize {
        self.list.len()
    }

    pub fn all(&self) -> &[T] {
        &self.list
    }

    pub fn handles(&self) -> impl Iterator<Item = (IntId<T>, &T)> {
        self.list
            .iter()
            .enumerate()
            .map(|(i, def)| (IntId::new(i), def))
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.list.iter_mut()
    }

    pub fn deferred_count(&self) -> usize {
        self.deferred.len()
    }

    /// Drop every definition and re-seed the null entry
    pub fn reset(&mut self, config: &MapDataConfig) {
        *self = Self::new(config);
    }
}
