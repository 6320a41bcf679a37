//! World settings - the flat, serializable generation parameter record
//!
//! One record captures everything needed to (re)generate a world. Settings
//! are persisted as RON; a round trip reproduces an identical record. Every
//! numeric field is range-clamped by [`WorldSettings::clamped`] before the
//! engine consumes it, so the generator itself never validates.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Noise basis for world generation.
///
/// Both styles share all threshold semantics; the style only selects the
/// underlying noise function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldStyle {
    /// Smooth coherent noise - natural-looking caverns
    #[default]
    Organic,
    /// Lattice noise - blocky, angular chambers
    Geometric,
}

/// Complete world generation and simulation settings.
///
/// The record is flat on purpose: it is the save format. Dimensions and seed
/// are part of the record (regenerating with the same record reproduces the
/// same world byte for byte).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSettings {
    /// World width in cells
    pub width: i32,
    /// World height in cells
    pub height: i32,
    /// World-space size of one cell
    pub cell_size: f32,
    /// Generation seed
    pub seed: i32,
    /// Noise basis selection
    pub style: WorldStyle,
    /// Minimum interval between simulation steps in seconds (0 = every update)
    pub update_rate: f32,

    /// How dense the world is (0.2 = very hollow, 0.6 = very dense)
    pub cave_threshold: f32,
    /// Horizontal cave frequency (4 = tight, 16 = sprawling)
    pub cave_frequency_x: f32,
    /// Vertical cave frequency (8 = flat, 32 = tall chambers)
    pub cave_frequency_y: f32,
    /// Weight of the secondary cave detail layer (0 = off, 1 = full)
    pub cave_layer_blend: f32,

    /// Chance of water pools in caves (0 = none, 1 = everywhere)
    pub water_pool_chance: f32,
    /// How high water pools may form, as a fraction of world height
    pub water_depth_threshold: f32,
    /// Noise threshold for water spawning (0.3 = common, 0.7 = rare)
    pub water_noise_threshold: f32,

    /// Frequency of sand pockets (10 = scattered, 40 = dense)
    pub sand_frequency: f32,
    /// Rarity of sand in the dirt layer (0.4 = common, 0.9 = rare)
    pub sand_threshold_shallow: f32,
    /// Rarity of sand pockets deep underground (0.5 = common, 0.95 = very rare)
    pub sand_threshold_deep: f32,

    /// Solid-neighbor count at or below which rock and dirt crumble to sand
    /// (0 = only isolated cells, 3 = aggressive cleanup)
    pub stability_threshold: u32,
    /// Normalized row above which the world is open sky
    pub surface_level: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            width: 4096,
            height: 1536,
            cell_size: 0.02,
            seed: 12345,
            style: WorldStyle::Organic,
            update_rate: 0.0,
            cave_threshold: 0.35,
            cave_frequency_x: 8.0,
            cave_frequency_y: 16.0,
            cave_layer_blend: 0.5,
            water_pool_chance: 0.3,
            water_depth_threshold: 0.25,
            water_noise_threshold: 0.55,
            sand_frequency: 20.0,
            sand_threshold_shallow: 0.6,
            sand_threshold_deep: 0.7,
            stability_threshold: 2,
            surface_level: 0.85,
        }
    }
}

impl WorldSettings {
    /// Return a copy with every generation field clamped to its documented
    /// range. Dimensions, cell size and seed are not clamped; invalid
    /// dimensions are a fatal construction error instead.
    pub fn clamped(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cell_size: self.cell_size,
            seed: self.seed,
            style: self.style,
            update_rate: self.update_rate.max(0.0),
            cave_threshold: self.cave_threshold.clamp(0.2, 0.6),
            cave_frequency_x: self.cave_frequency_x.clamp(4.0, 16.0),
            cave_frequency_y: self.cave_frequency_y.clamp(8.0, 32.0),
            cave_layer_blend: self.cave_layer_blend.clamp(0.0, 1.0),
            water_pool_chance: self.water_pool_chance.clamp(0.0, 1.0),
            water_depth_threshold: self.water_depth_threshold.clamp(0.05, 0.6),
            water_noise_threshold: self.water_noise_threshold.clamp(0.3, 0.7),
            sand_frequency: self.sand_frequency.clamp(10.0, 40.0),
            sand_threshold_shallow: self.sand_threshold_shallow.clamp(0.4, 0.9),
            sand_threshold_deep: self.sand_threshold_deep.clamp(0.5, 0.95),
            stability_threshold: self.stability_threshold.min(3),
            surface_level: self.surface_level.clamp(0.5, 1.0),
        }
    }

    /// Balanced defaults - moderate caves, some water, scattered sand.
    pub fn preset_default_balanced() -> Self {
        Self::default()
    }

    /// Very hollow, complex cave systems with frequent pools.
    pub fn preset_cave_explorer() -> Self {
        Self {
            cave_threshold: 0.25,
            cave_frequency_x: 10.0,
            cave_frequency_y: 20.0,
            cave_layer_blend: 0.8,
            water_pool_chance: 0.5,
            water_depth_threshold: 0.35,
            water_noise_threshold: 0.5,
            sand_frequency: 25.0,
            sand_threshold_shallow: 0.5,
            sand_threshold_deep: 0.6,
            ..Self::default()
        }
    }

    /// Mostly solid ground, little water - digging-heavy worlds.
    pub fn preset_dense_solid() -> Self {
        Self {
            cave_threshold: 0.5,
            cave_frequency_x: 6.0,
            cave_frequency_y: 12.0,
            cave_layer_blend: 0.2,
            water_pool_chance: 0.15,
            water_depth_threshold: 0.15,
            water_noise_threshold: 0.65,
            sand_frequency: 15.0,
            sand_threshold_shallow: 0.7,
            sand_threshold_deep: 0.8,
            ..Self::default()
        }
    }

    /// Flooded cave systems with sandy floors.
    pub fn preset_underwater_caves() -> Self {
        Self {
            cave_threshold: 0.32,
            cave_frequency_x: 9.0,
            cave_frequency_y: 18.0,
            cave_layer_blend: 0.6,
            water_pool_chance: 0.8,
            water_depth_threshold: 0.5,
            water_noise_threshold: 0.4,
            sand_frequency: 30.0,
            sand_threshold_shallow: 0.45,
            sand_threshold_deep: 0.55,
            ..Self::default()
        }
    }

    /// Dry world dominated by sand pockets.
    pub fn preset_desert_caves() -> Self {
        Self {
            cave_threshold: 0.38,
            cave_frequency_x: 7.0,
            cave_frequency_y: 14.0,
            cave_layer_blend: 0.4,
            water_pool_chance: 0.1,
            water_depth_threshold: 0.1,
            water_noise_threshold: 0.7,
            sand_frequency: 35.0,
            sand_threshold_shallow: 0.4,
            sand_threshold_deep: 0.5,
            ..Self::default()
        }
    }

    /// Apply a world-size preset, keeping all generation fields.
    pub fn with_size(mut self, preset: WorldSizePreset) -> Self {
        let (width, height) = preset.dimensions();
        self.width = width;
        self.height = height;
        self
    }

    /// Serialize to a pretty RON string.
    pub fn to_ron_string(&self) -> Result<String, SettingsError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Parse from a RON string.
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(text)?)
    }

    /// Write the settings record to a RON file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Load a settings record from a RON file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::from_ron_str(&std::fs::read_to_string(path)?)
    }
}

/// World size presets (screens wide x screens deep; one screen is roughly
/// 1024x512 cells).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldSizePreset {
    /// 1024x3072 - narrow vertical shaft, deep exploration
    Narrow1x6,
    /// 3072x1536 - balanced exploration and digging
    Balanced3x3,
    /// 6144x3072 - massive open world
    Huge6x6,
}

impl WorldSizePreset {
    /// Cell dimensions for this preset.
    pub fn dimensions(self) -> (i32, i32) {
        match self {
            WorldSizePreset::Narrow1x6 => (1024, 3072),
            WorldSizePreset::Balanced3x3 => (3072, 1536),
            WorldSizePreset::Huge6x6 => (6144, 3072),
        }
    }
}
