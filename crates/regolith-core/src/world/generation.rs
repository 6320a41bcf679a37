//! Noise field generation - seeds the initial world buffer
//!
//! A pure function of (cell coordinate, settings): the same settings produce
//! the same world byte for byte. Layers, from the outside in: a sealed rock
//! border ring, open sky above the surface row, a two-band cave carve, water
//! pools in the deep hollows, and a dirt/rock depth split with sand pockets.

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};

use super::settings::{WorldSettings, WorldStyle};
use crate::simulation::Material;

/// Width of the sealed rock ring at every edge of the generated world.
pub const BORDER_WIDTH: i32 = 5;

/// Coarse noise frequency selecting which cave regions may hold pools.
const POOL_REGION_FREQUENCY: f32 = 3.0;

/// Frequency of the water placement noise inside pool regions.
const WATER_NOISE_FREQUENCY: f32 = 12.0;

/// Per-cell material generator for a fixed settings record.
///
/// Settings are taken as already clamped; the generator has no error path.
pub struct NoiseField {
    width: i32,
    height: i32,
    surface_row: i32,
    dirt_floor_row: i32,
    cave_threshold: f32,
    cave_frequency_x: f32,
    cave_frequency_y: f32,
    cave_layer_blend: f32,
    water_pool_chance: f32,
    water_depth_threshold: f32,
    water_noise_threshold: f32,
    sand_frequency: f32,
    sand_threshold_shallow: f32,
    sand_threshold_deep: f32,

    cave_primary: FastNoiseLite,
    cave_detail: FastNoiseLite,
    material_noise: FastNoiseLite,
    pool_noise: FastNoiseLite,
    water_noise: FastNoiseLite,
}

impl NoiseField {
    pub fn new(settings: &WorldSettings) -> Self {
        let surface_row = (settings.surface_level * settings.height as f32) as i32;
        Self {
            width: settings.width,
            height: settings.height,
            surface_row,
            // Solid cells above this row are the dirt layer, below it rock
            dirt_floor_row: surface_row / 2,
            cave_threshold: settings.cave_threshold,
            cave_frequency_x: settings.cave_frequency_x,
            cave_frequency_y: settings.cave_frequency_y,
            cave_layer_blend: settings.cave_layer_blend,
            water_pool_chance: settings.water_pool_chance,
            water_depth_threshold: settings.water_depth_threshold,
            water_noise_threshold: settings.water_noise_threshold,
            sand_frequency: settings.sand_frequency,
            sand_threshold_shallow: settings.sand_threshold_shallow,
            sand_threshold_deep: settings.sand_threshold_deep,
            cave_primary: basis(settings.style, settings.seed),
            cave_detail: basis(settings.style, settings.seed.wrapping_add(1)),
            material_noise: basis(settings.style, settings.seed.wrapping_add(2)),
            pool_noise: basis(settings.style, settings.seed.wrapping_add(3)),
            water_noise: basis(settings.style, settings.seed.wrapping_add(4)),
        }
    }

    /// Material for the cell at (x, y). Deterministic for fixed settings.
    pub fn material_at(&self, x: i32, y: i32) -> Material {
        // Sealed boundary wall, independent of style and noise
        if x < BORDER_WIDTH
            || x >= self.width - BORDER_WIDTH
            || y < BORDER_WIDTH
            || y >= self.height - BORDER_WIDTH
        {
            return Material::Rock;
        }

        // Open sky above the surface row
        if y >= self.surface_row {
            return Material::Empty;
        }

        let nx = x as f32 / self.width as f32;
        let ny = y as f32 / self.height as f32;

        // Two cave bands: the detail layer runs at double frequency and is
        // weighted in by cave_layer_blend
        let primary = self
            .cave_primary
            .get_noise_2d(nx * self.cave_frequency_x, ny * self.cave_frequency_y);
        let detail = self.cave_detail.get_noise_2d(
            nx * self.cave_frequency_x * 2.0,
            ny * self.cave_frequency_y * 2.0,
        );
        let carve =
            to_unit((primary + detail * self.cave_layer_blend) / (1.0 + self.cave_layer_blend));

        if carve > self.cave_threshold {
            // Hollow: deep cave floors may pool water
            if ny < self.water_depth_threshold
                && to_unit(
                    self.pool_noise
                        .get_noise_2d(nx * POOL_REGION_FREQUENCY, ny * POOL_REGION_FREQUENCY),
                ) < self.water_pool_chance
                && to_unit(
                    self.water_noise
                        .get_noise_2d(nx * WATER_NOISE_FREQUENCY, ny * WATER_NOISE_FREQUENCY),
                ) > self.water_noise_threshold
            {
                return Material::Water;
            }
            return Material::Empty;
        }

        // Solid: dirt layer near the surface, rock below, each with its own
        // sand pocket rarity
        let shallow = y >= self.dirt_floor_row;
        let sand = to_unit(
            self.material_noise
                .get_noise_2d(nx * self.sand_frequency, ny * self.sand_frequency),
        );
        let sand_threshold = if shallow {
            self.sand_threshold_shallow
        } else {
            self.sand_threshold_deep
        };

        if sand > sand_threshold {
            Material::Sand
        } else if shallow {
            Material::Dirt
        } else {
            Material::Rock
        }
    }
}

/// Build the noise basis for a style: smooth fractal coherent noise for
/// organic worlds, plain lattice noise for geometric ones.
fn basis(style: WorldStyle, seed: i32) -> FastNoiseLite {
    let mut noise = FastNoiseLite::with_seed(seed);
    // Coordinates are pre-scaled by the field, so the internal frequency is 1
    noise.set_frequency(Some(1.0));
    match style {
        WorldStyle::Organic => {
            noise.set_noise_type(Some(NoiseType::OpenSimplex2));
            noise.set_fractal_type(Some(FractalType::FBm));
            noise.set_fractal_octaves(Some(3));
        }
        WorldStyle::Geometric => {
            noise.set_noise_type(Some(NoiseType::Value));
            noise.set_fractal_type(Some(FractalType::None));
        }
    }
    noise
}

/// Map a noise sample from [-1, 1] to [0, 1].
fn to_unit(value: f32) -> f32 {
    (value * 0.5 + 0.5).clamp(0.0, 1.0)
}
