//! Material data for the Regolith pixel-world simulation
//!
//! This crate provides the foundational cell type shared by the engine and
//! every consumer of collision queries: the closed [`Material`] set and its
//! persisted integer code form.

mod material;

pub use material::Material;
