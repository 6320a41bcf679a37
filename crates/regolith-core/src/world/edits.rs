//! Edit commands and the request router
//!
//! Gameplay expresses edits in world space (dig here, splash water there);
//! the router converts them to grid space and arbitrates the single command
//! the engine honors per tick. Multi-stamp effects (an explosion's debris
//! splashes) submit one stamp per tick across several ticks - the slot holds
//! exactly one command and a newer submission of equal or higher priority
//! silently replaces an unconsumed one.

use glam::{IVec2, Vec2};

use super::transform::WorldTransform;
use super::world::World;
use crate::simulation::Material;

/// A single circular stamp edit, in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditCommand {
    /// Stamp center, grid cells
    pub center: IVec2,
    /// Stamp radius, grid cells
    pub radius: f32,
    /// Material written to every covered cell
    pub material: Material,
}

impl EditCommand {
    pub fn new(center: IVec2, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    /// Circular coverage test in grid units.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let dx = (x - self.center.x) as f32;
        let dy = (y - self.center.y) as f32;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// Who is asking for an edit. An authoritative source (a scripted sequence
/// mid-explosion) wins over routine input (idle painting) submitted in the
/// same tick; between equals the last submission wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EditPriority {
    Routine,
    Authoritative,
}

/// Translates world-space edit intents into the engine's per-tick edit slot.
#[derive(Debug)]
pub struct EditRouter {
    transform: WorldTransform,
    pending: Option<(EditPriority, EditCommand)>,
}

impl EditRouter {
    pub fn new(transform: WorldTransform) -> Self {
        Self {
            transform,
            pending: None,
        }
    }

    /// Fire-and-forget routine edit request. `radius` is in grid cells, the
    /// center in world space.
    pub fn request_edit(&mut self, center: Vec2, radius: f32, material: Material) {
        self.request_edit_with_priority(center, radius, material, EditPriority::Routine);
    }

    /// Edit request with an explicit priority tag.
    pub fn request_edit_with_priority(
        &mut self,
        center: Vec2,
        radius: f32,
        material: Material,
        priority: EditPriority,
    ) {
        let command = EditCommand::new(self.transform.world_to_grid(center), radius, material);

        match &self.pending {
            Some((held, _)) if *held > priority => {
                log::debug!(
                    "edit request ({} r={:.1}) dropped: an authoritative edit is already pending",
                    material.name(),
                    radius
                );
            }
            _ => {
                if self.pending.is_some() {
                    log::debug!("edit request superseded within tick");
                }
                self.pending = Some((priority, command));
            }
        }
    }

    /// True if an arbitrated command is waiting for the next flush.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Hand this tick's winning command to the engine. Call once per tick,
    /// before stepping.
    pub fn flush(&mut self, world: &mut World) {
        if let Some((_, command)) = self.pending.take() {
            world.submit_edit(command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> EditRouter {
        EditRouter::new(WorldTransform::new(10, 10, 1.0))
    }

    #[test]
    fn test_contains_is_circular() {
        let command = EditCommand::new(IVec2::new(5, 5), 2.0, Material::Empty);
        assert!(command.contains(5, 5));
        assert!(command.contains(5, 7)); // distance 2, inclusive
        assert!(command.contains(4, 4));
        assert!(!command.contains(7, 7)); // distance ~2.83
        assert!(!command.contains(5, 8));
    }

    #[test]
    fn test_center_is_converted_to_grid_space() {
        let mut router = router();
        // World origin is the grid center for a 10x10 grid with cell size 1
        router.request_edit(Vec2::ZERO, 1.0, Material::Sand);
        let (_, command) = router.pending.expect("pending edit");
        assert_eq!(command.center, IVec2::new(5, 5));
    }

    #[test]
    fn test_last_routine_submission_wins() {
        let mut router = router();
        router.request_edit(Vec2::ZERO, 1.0, Material::Sand);
        router.request_edit(Vec2::ZERO, 2.0, Material::Water);
        let (_, command) = router.pending.expect("pending edit");
        assert_eq!(command.material, Material::Water);
        assert_eq!(command.radius, 2.0);
    }

    #[test]
    fn test_authoritative_edit_is_not_replaced_by_routine() {
        let mut router = router();
        router.request_edit_with_priority(
            Vec2::ZERO,
            4.0,
            Material::Empty,
            EditPriority::Authoritative,
        );
        router.request_edit(Vec2::ZERO, 1.0, Material::Sand);
        let (priority, command) = router.pending.expect("pending edit");
        assert_eq!(priority, EditPriority::Authoritative);
        assert_eq!(command.material, Material::Empty);
    }

    #[test]
    fn test_authoritative_replaces_routine() {
        let mut router = router();
        router.request_edit(Vec2::ZERO, 1.0, Material::Sand);
        router.request_edit_with_priority(
            Vec2::ZERO,
            4.0,
            Material::Empty,
            EditPriority::Authoritative,
        );
        let (priority, command) = router.pending.expect("pending edit");
        assert_eq!(priority, EditPriority::Authoritative);
        assert_eq!(command.material, Material::Empty);
    }
}
