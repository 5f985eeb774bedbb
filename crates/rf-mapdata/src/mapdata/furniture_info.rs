//! Optional furniture sub-records

use rf_units::{Mass, Volume};

use crate::json::FieldReader;

use super::FurnStrId;

/// Crafting speed and load limits of furniture usable as a workbench
#[derive(Debug, Clone, PartialEq)]
pub struct FurnWorkbenchInfo {
    pub multiplier: f32,
    pub allowed_mass: Mass,
    pub allowed_volume: Volume,
}

impl Default for FurnWorkbenchInfo {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            allowed_mass: Mass::MAX,
            allowed_volume: Volume::MAX,
        }
    }
}

impl FurnWorkbenchInfo {
    pub fn load(&mut self, j: &mut FieldReader<'_, '_>) {
        j.assign("multiplier", &mut self.multiplier);
        j.assign("mass", &mut self.allowed_mass);
        j.assign("volume", &mut self.allowed_volume);
    }
}

/// Growth stages of planted furniture
#[derive(Debug, Clone, PartialEq)]
pub struct PlantData {
    /// Furniture the plant becomes at the next stage
    pub transform: FurnStrId,
    /// Furniture left behind when the plant is removed
    pub base: FurnStrId,
    pub growth_multiplier: f32,
    pub harvest_multiplier: f32,
}

impl Default for PlantData {
    fn default() -> Self {
        Self {
            transform: FurnStrId::null(),
            base: FurnStrId::null(),
            growth_multiplier: 1.0,
            harvest_multiplier: 1.0,
        }
    }
}

impl PlantData {
    pub fn load(&mut self, j: &mut FieldReader<'_, '_>) {
        j.assign("transform", &mut self.transform);
        j.assign("base", &mut self.base);
        j.assign("growth_multiplier", &mut self.growth_multiplier);
        j.assign("harvest_multiplier", &mut self.harvest_multiplier);
    }
}
