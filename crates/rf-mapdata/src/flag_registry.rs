//! Known item flags (`json_flag` records)

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::ids::{NullId, StringId};
use crate::json::JsonError;

pub type FlagId = StringId<JsonFlag>;

/// One declared flag
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonFlag {
    pub id: FlagId,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub conflicts: BTreeSet<String>,
    /// Copied from a processing input onto its result
    #[serde(default = "default_inherit")]
    pub inherit: bool,
}

fn default_inherit() -> bool {
    true
}

impl NullId for JsonFlag {
    const NULL_ID: &'static str = "null";
}

#[derive(Debug, Clone, Default)]
pub struct FlagRegistry {
    flags: BTreeMap<FlagId, JsonFlag>,
}

impl FlagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a `json_flag` record; a repeated id replaces the earlier one
    pub fn load(&mut self, record: &serde_json::Value) -> Result<&JsonFlag, JsonError> {
        let flag = JsonFlag::deserialize(record)?;
        log::debug!(target: "rf_mapdata::flags", "loaded json_flag {}", flag.id);
        let id = flag.id.clone();
        self.flags.insert(id.clone(), flag);
        Ok(&self.flags[&id])
    }

    pub fn is_valid(&self, id: &FlagId) -> bool {
        self.flags.contains_key(id)
    }

    pub fn get(&self, id: &FlagId) -> Option<&JsonFlag> {
        self.flags.get(id)
    }

    /// Whether an item flag carries over onto processing results
    pub fn inherits(&self, name: &str) -> bool {
        self.flags
            .get(&FlagId::new(name))
            .is_some_and(|flag| flag.inherit)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JsonFlag> {
        self.flags.values()
    }

    pub fn reset(&mut self) {
        self.flags.clear();
    }
}
