//! Regolith core - grid cellular-automaton engine and collision snapshots
//!
//! The engine owns two equally-sized cell buffers and advances the world one
//! whole-grid step at a time; the collision side periodically copies the last
//! completed buffer into an immutable snapshot so gameplay can query solidity
//! without ever observing a half-written step.

pub mod error;
pub mod world;

// Re-export the material data crate under the path the engine modules use
pub mod simulation {
    pub use regolith_simulation::*;
}

pub use error::{CopyError, SettingsError, WorldError};
