//! World simulation - generation, stepping, edits, collision snapshots

mod collision;
mod edits;
mod generation;
mod grid;
mod rules;
mod settings;
mod snapshot;
mod transform;
#[allow(clippy::module_inception)]
mod world;

pub use collision::CollisionSystem;
pub use edits::{EditCommand, EditPriority, EditRouter};
pub use generation::{NoiseField, BORDER_WIDTH};
pub use grid::Grid;
pub use rules::TransitionRules;
pub use settings::{WorldSettings, WorldSizePreset, WorldStyle};
pub use snapshot::{CopyTicket, GridSnapshot, SnapshotSource};
pub use transform::WorldTransform;
pub use world::World;
