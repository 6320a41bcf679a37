//! Material definitions

use serde::{Deserialize, Serialize};

/// A single cell's material.
///
/// The world is a closed set of five materials; every rule in the engine
/// matches exhaustively on this enum, so adding a material surfaces every
/// unhandled branch at compile time. The discriminants are the persisted
/// integer codes (0 = empty through 4 = water).
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    /// Open air, passable
    #[default]
    Empty = 0,
    /// Structural stone, crumbles only when unsupported
    Rock = 1,
    /// Structural soil, crumbles only when unsupported
    Dirt = 2,
    /// Granular, falls and slides
    Sand = 3,
    /// Liquid, falls and spreads, non-solid for collision
    Water = 4,
}

impl Material {
    /// All materials, in code order.
    pub const ALL: [Material; 5] = [
        Material::Empty,
        Material::Rock,
        Material::Dirt,
        Material::Sand,
        Material::Water,
    ];

    /// Integer code used in the persisted settings record and external APIs.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode an integer material code. Unknown codes are rejected rather
    /// than mapped to a sentinel.
    pub fn from_code(code: u8) -> Option<Material> {
        match code {
            0 => Some(Material::Empty),
            1 => Some(Material::Rock),
            2 => Some(Material::Dirt),
            3 => Some(Material::Sand),
            4 => Some(Material::Water),
            _ => None,
        }
    }

    /// Solid for collision purposes. Water is walkable-through; swim logic
    /// distinguishes it via the raw material query.
    pub const fn is_solid(self) -> bool {
        matches!(self, Material::Rock | Material::Dirt | Material::Sand)
    }

    /// Structural solids are subject to the stability rule.
    pub const fn is_structural(self) -> bool {
        matches!(self, Material::Rock | Material::Dirt)
    }

    /// Granular materials fall and slide.
    pub const fn is_granular(self) -> bool {
        matches!(self, Material::Sand)
    }

    /// Liquids fall and spread horizontally.
    pub const fn is_liquid(self) -> bool {
        matches!(self, Material::Water)
    }

    /// Display name for logging and the demo census.
    pub const fn name(self) -> &'static str {
        match self {
            Material::Empty => "empty",
            Material::Rock => "rock",
            Material::Dirt => "dirt",
            Material::Sand => "sand",
            Material::Water => "water",
        }
    }
}
