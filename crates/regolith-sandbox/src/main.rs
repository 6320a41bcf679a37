//! Regolith Sandbox - headless demo
//!
//! Generates a world, steps it at a fixed cadence, pours some sand, sets off
//! a bomb mid-run, and reports what the collision snapshot sees at the end.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use regolith_core::world::{
    CollisionSystem, EditPriority, EditRouter, World, WorldSettings, WorldStyle, WorldTransform,
};
use regolith_simulation::Material;

/// Collision readback interval in seconds (50 Hz, faster than typical frame
/// rate so landing checks stay responsive).
const READBACK_INTERVAL: f32 = 0.02;

const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "regolith-sandbox")]
#[command(about = "Headless Regolith world simulation demo")]
struct Args {
    /// World width in cells
    #[arg(long, default_value_t = 512)]
    width: i32,

    /// World height in cells
    #[arg(long, default_value_t = 256)]
    height: i32,

    /// Generation seed
    #[arg(long, default_value_t = 12345)]
    seed: i32,

    /// Generation preset: balanced, caves, dense, underwater or desert
    #[arg(long, default_value = "balanced")]
    preset: String,

    /// Use the geometric (lattice) noise basis instead of the organic one
    #[arg(long)]
    geometric: bool,

    /// Number of simulation steps to run
    #[arg(long, default_value_t = 600)]
    steps: u32,

    /// Load settings from a RON file instead of preset/dimension flags
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the effective settings to a RON file and exit
    #[arg(long)]
    write_settings: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = build_settings(&args)?;

    if let Some(path) = &args.write_settings {
        settings
            .save_to(path)
            .with_context(|| format!("writing settings to {}", path.display()))?;
        log::info!("settings written to {}", path.display());
        return Ok(());
    }

    run(settings, args.steps)
}

fn build_settings(args: &Args) -> anyhow::Result<WorldSettings> {
    if let Some(path) = &args.settings {
        return WorldSettings::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()));
    }

    let mut settings = match args.preset.as_str() {
        "balanced" => WorldSettings::preset_default_balanced(),
        "caves" => WorldSettings::preset_cave_explorer(),
        "dense" => WorldSettings::preset_dense_solid(),
        "underwater" => WorldSettings::preset_underwater_caves(),
        "desert" => WorldSettings::preset_desert_caves(),
        other => bail!("unknown preset '{other}'"),
    };
    settings.width = args.width;
    settings.height = args.height;
    settings.seed = args.seed;
    if args.geometric {
        settings.style = WorldStyle::Geometric;
    }
    Ok(settings)
}

fn run(settings: WorldSettings, steps: u32) -> anyhow::Result<()> {
    log::info!("starting regolith sandbox");

    let mut world = World::new(settings)?;
    let transform = world.transform();
    let mut router = EditRouter::new(transform);
    let mut collision = CollisionSystem::new(transform, READBACK_INTERVAL);
    let mut rng = Xoshiro256StarStar::seed_from_u64(world.settings().seed as u64);

    census("initial", &world);

    // Pour sand from a fixed point just above the surface for the first
    // stretch of the run, then set off a bomb at the half-way mark.
    let surface_y =
        (world.settings().surface_level - 0.5) * world.height() as f32 * transform.cell_size();
    let pour_pos = Vec2::new(0.0, surface_y + 2.0 * transform.cell_size());
    let bomb_step = steps / 2;
    let mut bomb: Option<Bomb> = None;

    let started = Instant::now();
    for step in 0..steps {
        if step < steps / 4 {
            router.request_edit(pour_pos, 3.0, Material::Sand);
        }

        if step == bomb_step {
            log::info!("bomb placed at world origin");
            bomb = Some(Bomb::new(Vec2::ZERO, 8.0));
        }
        let finished = bomb
            .as_mut()
            .is_some_and(|active| active.update(&mut router, &collision, &mut rng, &transform));
        if finished {
            bomb = None;
        }

        router.flush(&mut world);
        world.update(FIXED_TIMESTEP);
        collision.tick(FIXED_TIMESTEP, &world);
    }
    let elapsed = started.elapsed();

    log::info!(
        "ran {} steps in {:.2?} ({:.0} steps/s)",
        world.tick(),
        elapsed,
        world.tick() as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );

    census("final", &world);
    collision.validate_against(&world);
    probe(&collision);
    Ok(())
}

/// Log a material census of the current buffer.
fn census(label: &str, world: &World) {
    let grid = world.current_grid();
    let counts: Vec<String> = Material::ALL
        .iter()
        .map(|&m| format!("{}={}", m.name(), grid.count(m)))
        .collect();
    log::info!("{label} census: {}", counts.join(", "));
}

/// Probe the collision snapshot along the world's horizontal midline.
fn probe(collision: &CollisionSystem) {
    for x in [-2.0_f32, 0.0, 2.0] {
        let pos = Vec2::new(x, 0.0);
        log::info!(
            "probe ({x:+.1}, 0.0): material={}, solid={}, grounded={}",
            collision.material_at(pos).name(),
            collision.is_solid(pos),
            collision.is_solid_below(pos, 3),
        );
    }
}

/// A scripted explosion: one authoritative crater stamp, then a splash of
/// debris stamps submitted one per tick - only one edit is honored per
/// simulation step, so the sequence self-throttles instead of batching.
struct Bomb {
    center: Vec2,
    crater_radius: f32,
    splashes_left: u32,
    debris: Material,
    exploded: bool,
}

impl Bomb {
    fn new(center: Vec2, crater_radius: f32) -> Self {
        Self {
            center,
            crater_radius,
            splashes_left: 0,
            debris: Material::Sand,
            exploded: false,
        }
    }

    /// Advance the sequence by one tick. Returns true once finished.
    fn update(
        &mut self,
        router: &mut EditRouter,
        collision: &CollisionSystem,
        rng: &mut impl Rng,
        transform: &WorldTransform,
    ) -> bool {
        if !self.exploded {
            // Submerged bombs splash water instead of sand, and fewer of it
            if collision.material_at(self.center) == Material::Water {
                self.debris = Material::Water;
                self.splashes_left = 15;
            } else {
                self.debris = Material::Sand;
                self.splashes_left = 30;
            }
            router.request_edit_with_priority(
                self.center,
                self.crater_radius,
                Material::Empty,
                EditPriority::Authoritative,
            );
            self.exploded = true;
            return false;
        }

        if self.splashes_left == 0 {
            return true;
        }
        self.splashes_left -= 1;

        // Upward-biased splash direction, landing just outside the crater
        let angle = rng.gen_range(0.0..std::f32::consts::PI);
        let direction = Vec2::new(angle.cos(), angle.sin().abs());
        let offset = direction * self.crater_radius * 1.5 * transform.cell_size();
        let radius = rng.gen_range(1.5..3.5);
        router.request_edit_with_priority(
            self.center + offset,
            radius,
            self.debris,
            EditPriority::Authoritative,
        );
        false
    }
}
