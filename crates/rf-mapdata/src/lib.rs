//! rf-mapdata: terrain and furniture definitions for the map
//!
//! Definitions are loaded from JSON records into [`MapData`], addressed at
//! runtime through dense handles, and examined through hard-coded functions
//! or configurable examine actors (card readers, crafting stations).
//!
//! The crate does no I/O beyond reading definition files. The map, the UI
//! and the acting character are reached through the traits in [`world`].

pub mod calendar;
pub mod catalog;
pub mod config;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod examine;
pub mod factory;
pub mod flag_registry;
pub mod flags;
pub mod ids;
pub mod itype;
pub mod json;
pub mod mapdata;
pub mod symbol;
pub mod world;

pub use config::{ConfigError, MapDataConfig};
pub use data::MapData;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::LoadError;
pub use examine::{Examine, ExamineActor, ExamineContext, examine};
pub use flags::{ConnectGroup, TerBitflags};
pub use ids::{IntId, StringId};
pub use mapdata::{FurnId, FurnStrId, FurnT, TerId, TerStrId, TerT};
