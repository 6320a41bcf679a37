//! World - the double-buffered grid simulation engine
//!
//! Owns two equally-sized cell buffers. Each step reads the whole current
//! buffer, writes the whole other buffer through the transition rules, and
//! flips which one is current - consumers never hold a buffer across a step,
//! they re-fetch through [`World::current_grid`]. At most one edit command is
//! honored per step; the collision side copies the current buffer through the
//! [`SnapshotSource`] seam.

use super::edits::EditCommand;
use super::generation::NoiseField;
use super::grid::Grid;
use super::rules::TransitionRules;
use super::settings::WorldSettings;
use super::snapshot::{CopyTicket, GridSnapshot, SnapshotSource};
use super::transform::WorldTransform;
use crate::error::WorldError;

/// The simulated pixel world.
pub struct World {
    settings: WorldSettings,
    buffers: [Grid; 2],
    /// Index of the buffer holding the last completed state
    current: usize,
    pending_edit: Option<EditCommand>,
    /// Time accumulated toward the next step when an update rate is set
    step_timer: f32,
    tick: u64,
}

impl World {
    /// Build and seed a world. Validates dimensions and cell size (fatal,
    /// never retried), clamps all generation fields, then fills the first
    /// buffer from the noise field.
    pub fn new(settings: WorldSettings) -> Result<Self, WorldError> {
        let settings = Self::validated(settings)?;

        log::info!(
            "initializing world {}x{} with seed {} ({:?})",
            settings.width,
            settings.height,
            settings.seed,
            settings.style
        );
        log::debug!(
            "  cave: threshold={:.2}, freq=({:.1},{:.1}), blend={:.2}",
            settings.cave_threshold,
            settings.cave_frequency_x,
            settings.cave_frequency_y,
            settings.cave_layer_blend
        );
        log::debug!(
            "  water: chance={:.2}, depth<{:.2}; sand: freq={:.1}; stability={}",
            settings.water_pool_chance,
            settings.water_depth_threshold,
            settings.sand_frequency,
            settings.stability_threshold
        );

        let field = NoiseField::new(&settings);
        let mut seeded = Grid::new(settings.width, settings.height);
        for y in 0..settings.height {
            for x in 0..settings.width {
                seeded.set(x, y, field.material_at(x, y));
            }
        }

        let back = Grid::new(settings.width, settings.height);
        log::info!("world initialization complete");

        Ok(Self {
            settings,
            buffers: [seeded, back],
            current: 0,
            pending_edit: None,
            step_timer: 0.0,
            tick: 0,
        })
    }

    /// Build a world around an existing grid instead of generating one.
    /// Used for scripted scenarios and tests.
    pub fn from_grid(grid: Grid, settings: WorldSettings) -> Result<Self, WorldError> {
        let settings = Self::validated(settings)?;
        if grid.width() != settings.width || grid.height() != settings.height {
            return Err(WorldError::GridMismatch {
                grid_width: grid.width(),
                grid_height: grid.height(),
                width: settings.width,
                height: settings.height,
            });
        }
        let back = Grid::new(grid.width(), grid.height());
        Ok(Self {
            settings,
            buffers: [grid, back],
            current: 0,
            pending_edit: None,
            step_timer: 0.0,
            tick: 0,
        })
    }

    fn validated(settings: WorldSettings) -> Result<WorldSettings, WorldError> {
        if settings.width <= 0 || settings.height <= 0 {
            return Err(WorldError::InvalidDimensions {
                width: settings.width,
                height: settings.height,
            });
        }
        if settings.cell_size <= 0.0 {
            return Err(WorldError::InvalidCellSize(settings.cell_size));
        }
        Ok(settings.clamped())
    }

    /// Tear both buffers down and re-run generation with new settings.
    /// The only way a running world is replaced.
    pub fn regenerate(&mut self, settings: WorldSettings) -> Result<(), WorldError> {
        *self = Self::new(settings)?;
        log::info!("world regenerated");
        Ok(())
    }

    /// Store the edit consumed by the next step. A second submission before
    /// that step silently replaces the first (the router arbitrates priority
    /// ahead of this slot).
    pub fn submit_edit(&mut self, command: EditCommand) {
        if self.pending_edit.is_some() {
            log::debug!("pending edit replaced before being consumed");
        }
        self.pending_edit = Some(command);
    }

    /// Advance the simulation one step: apply the transition rules from the
    /// current buffer into the other, consume the pending edit, flip.
    pub fn step(&mut self) {
        let edit = self.pending_edit.take();
        let [a, b] = &mut self.buffers;
        let (src, dst) = if self.current == 0 { (&*a, b) } else { (&*b, a) };

        TransitionRules::step_buffer(src, dst, edit.as_ref(), self.settings.stability_threshold);

        self.current = 1 - self.current;
        self.tick += 1;
    }

    /// Rate-capped stepping: accumulates `dt` against the configured minimum
    /// inter-step interval and steps at most once. An interval of zero steps
    /// on every call. Returns whether a step ran.
    pub fn update(&mut self, dt: f32) -> bool {
        self.step_timer += dt;
        if self.settings.update_rate > 0.0 && self.step_timer < self.settings.update_rate {
            return false;
        }
        self.step_timer = 0.0;
        self.step();
        true
    }

    /// The last completed buffer. Only valid for the current tick; re-fetch
    /// after each step.
    pub fn current_grid(&self) -> &Grid {
        &self.buffers[self.current]
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn width(&self) -> i32 {
        self.settings.width
    }

    pub fn height(&self) -> i32 {
        self.settings.height
    }

    /// The clamped settings this world runs with.
    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// The world/grid transform implied by the settings, shared by edit
    /// routing and collision queries.
    pub fn transform(&self) -> WorldTransform {
        WorldTransform::new(
            self.settings.width,
            self.settings.height,
            self.settings.cell_size,
        )
    }
}

impl SnapshotSource for World {
    fn begin_copy(&self) -> CopyTicket {
        CopyTicket::completed(GridSnapshot::capture(self.current_grid(), self.tick))
    }
}
