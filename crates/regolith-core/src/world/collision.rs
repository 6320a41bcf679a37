//! Collision queries against the latest complete grid snapshot
//!
//! The collision system runs on its own cadence, independent of (and
//! typically slower than) the simulation's step rate. Each readback interval
//! it requests one asynchronous copy of the last completed buffer; a query
//! only ever sees the most recent copy that finished without error, never a
//! partial one. A failed copy is logged and discarded - stale-but-valid wins
//! over unavailable.

use glam::Vec2;

use super::snapshot::{CopyTicket, GridSnapshot, SnapshotSource};
use super::transform::WorldTransform;
use super::world::World;
use crate::simulation::Material;

/// Serves point and area solidity queries from grid snapshots.
pub struct CollisionSystem {
    transform: WorldTransform,
    /// Seconds between readback requests
    interval: f32,
    accumulator: f32,
    pending: Option<CopyTicket>,
    snapshot: Option<GridSnapshot>,
}

impl CollisionSystem {
    pub fn new(transform: WorldTransform, interval: f32) -> Self {
        Self {
            transform,
            interval: interval.max(0.0),
            accumulator: 0.0,
            pending: None,
            snapshot: None,
        }
    }

    /// Advance the readback clock. Polls the outstanding copy first, then
    /// requests a new one if the interval elapsed and none is in flight - an
    /// interval that elapses mid-copy is skipped, not queued.
    pub fn tick(&mut self, dt: f32, source: &impl SnapshotSource) {
        if let Some(ticket) = &mut self.pending {
            match ticket.poll() {
                None => {}
                Some(Ok(snapshot)) => {
                    if self.snapshot.is_none() {
                        log::info!(
                            "first collision snapshot received ({}x{}, tick {})",
                            snapshot.width(),
                            snapshot.height(),
                            snapshot.tick()
                        );
                    }
                    self.snapshot = Some(snapshot);
                    self.pending = None;
                }
                Some(Err(error)) => {
                    log::warn!("collision snapshot copy failed: {error}; keeping previous");
                    self.pending = None;
                }
            }
        }

        self.accumulator += dt;
        if self.accumulator >= self.interval {
            self.accumulator = 0.0;
            if self.pending.is_none() {
                self.pending = Some(source.begin_copy());
            }
        }
    }

    /// True once the first complete snapshot has landed. Never reverts.
    pub fn has_data(&self) -> bool {
        self.snapshot.is_some()
    }

    /// The snapshot queries are currently served from.
    pub fn snapshot(&self) -> Option<&GridSnapshot> {
        self.snapshot.as_ref()
    }

    /// Is the cell under this world position solid? Rock, dirt and sand are
    /// solid; water is walkable-through (swim logic reads [`material_at`]).
    ///
    /// The boundary answers hold with or without a snapshot: outside the
    /// sides or below, solid; above, open. In-bounds queries before the
    /// first snapshot report non-solid - the world must not read as
    /// impassable while the first copy is still in flight.
    ///
    /// [`material_at`]: Self::material_at
    pub fn is_solid(&self, world_pos: Vec2) -> bool {
        let cell = self.transform.world_to_grid(world_pos);
        if cell.x < 0 || cell.x >= self.transform.width() || cell.y < 0 {
            return true;
        }
        if cell.y >= self.transform.height() {
            return false;
        }
        match &self.snapshot {
            Some(snapshot) => snapshot.sample(cell.x, cell.y).is_solid(),
            None => false,
        }
    }

    /// Area variant for landing checks: samples a 3-wide, 2-deep window
    /// under the position and reports solid only when the count of solid
    /// cells exceeds `min_solid`, so isolated single-cell debris does not
    /// register as ground.
    pub fn is_solid_below(&self, world_pos: Vec2, min_solid: u32) -> bool {
        let center = self.transform.world_to_grid(world_pos);
        let mut solid = 0;
        for y in center.y - 1..=center.y {
            for x in center.x - 1..=center.x + 1 {
                if x < 0 || x >= self.transform.width() || y < 0 {
                    solid += 1; // bounds are solid
                    continue;
                }
                if y >= self.transform.height() {
                    continue;
                }
                if let Some(snapshot) = &self.snapshot {
                    if snapshot.sample(x, y).is_solid() {
                        solid += 1;
                    }
                }
            }
        }
        solid > min_solid
    }

    /// Raw material under a world position, for gameplay that distinguishes
    /// water from solids (submersion tracking, splash decisions). Out of
    /// bounds reads as the boundary material; before the first snapshot,
    /// everything in bounds reads empty.
    pub fn material_at(&self, world_pos: Vec2) -> Material {
        let cell = self.transform.world_to_grid(world_pos);
        if cell.x < 0 || cell.x >= self.transform.width() || cell.y < 0 {
            return Material::Rock;
        }
        if cell.y >= self.transform.height() {
            return Material::Empty;
        }
        match &self.snapshot {
            Some(snapshot) => snapshot.sample(cell.x, cell.y),
            None => Material::Empty,
        }
    }

    /// Check that the current snapshot matches the live world's dimensions,
    /// logging the outcome. Returns false until a snapshot exists.
    pub fn validate_against(&self, world: &World) -> bool {
        let Some(snapshot) = &self.snapshot else {
            log::warn!("collision system has no snapshot yet");
            return false;
        };
        let matches = snapshot.width() == world.width() && snapshot.height() == world.height();
        if matches {
            log::info!(
                "collision snapshot valid: {}x{} cells, tick {}",
                snapshot.width(),
                snapshot.height(),
                snapshot.tick()
            );
        } else {
            log::error!(
                "collision snapshot dimension mismatch: snapshot {}x{}, world {}x{}",
                snapshot.width(),
                snapshot.height(),
                world.width(),
                world.height()
            );
        }
        matches
    }
}
