//! Terrain and furniture definitions

mod bash;
mod common;
mod furniture;
mod furniture_info;
mod terrain;

pub use bash::{MapBashInfo, MapDeconstructInfo, MapObjectType};
pub use common::MapDataCommon;
pub use furniture::{FurnId, FurnStrId, FurnT};
pub use furniture_info::{FurnWorkbenchInfo, PlantData};
pub use terrain::{TerId, TerStrId, TerT};

pub const FLAG_LOCKED: &str = "LOCKED";

/// Canonical ids referenced from code
pub mod known {
    pub const T_NULL: &str = "t_null";
    pub const F_NULL: &str = "f_null";
    pub const T_DOOR_METAL_LOCKED: &str = "t_door_metal_locked";
    pub const T_DOOR_METAL_C: &str = "t_door_metal_c";
}
