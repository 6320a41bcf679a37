//! Transition rules - the per-cell step function
//!
//! Every cell computes its own next value from the previous buffer only (the
//! pull model): movement is expressed as matched receive/vacate decisions,
//! where a cell that gives up a grain replays the receiving cell's decision
//! and only vacates if that decision names it as the donor. Two cells can
//! therefore never disagree about where a grain went, and a step neither
//! duplicates nor loses material.
//!
//! Rule priority per cell: edit override, then sand gravity (straight fall
//! swaps with empty or water below, diagonal slide into an open corner when
//! blocked), then water (straight fall, then horizontal spread, never
//! upward), then stability crumbling of rock and dirt. One rule class per
//! cell per tick: a cell crumbled this step starts falling next step.
//!
//! Two-way choices (both diagonals open, both sides open) break the tie on
//! coordinate parity, keeping the step a pure deterministic function of the
//! previous buffer.

use super::edits::EditCommand;
use super::grid::Grid;
use crate::simulation::Material;

/// The per-step cell update, applied from one buffer into the other.
pub struct TransitionRules;

impl TransitionRules {
    /// Apply one full step: read every cell of `src`, write every cell of
    /// `dst`. The buffers must have equal dimensions and be distinct.
    pub fn step_buffer(
        src: &Grid,
        dst: &mut Grid,
        edit: Option<&EditCommand>,
        stability_threshold: u32,
    ) {
        debug_assert_eq!(src.width(), dst.width());
        debug_assert_eq!(src.height(), dst.height());

        for y in 0..src.height() {
            for x in 0..src.width() {
                dst.set(x, y, Self::next_cell(src, edit, stability_threshold, x, y));
            }
        }
    }

    /// Next value of the in-bounds cell at (x, y).
    pub fn next_cell(
        src: &Grid,
        edit: Option<&EditCommand>,
        stability_threshold: u32,
        x: i32,
        y: i32,
    ) -> Material {
        // Rule 1: the edit stamp overrides everything for covered cells
        if let Some(e) = edit {
            if e.contains(x, y) {
                return e.material;
            }
        }

        match src.get(x, y) {
            Material::Empty => incoming(src, edit, x, y)
                .map(|(material, _)| material)
                .unwrap_or(Material::Empty),

            Material::Water => {
                // Sand falling from above swaps into this cell
                if receives_sand(src, edit, x, y) {
                    return Material::Sand;
                }
                // Fall into the empty cell below, if it takes this cell's water
                if src.sample(x, y - 1) == Material::Empty
                    && !covered(edit, x, y - 1)
                    && incoming(src, edit, x, y - 1) == Some((Material::Water, (x, y)))
                {
                    return Material::Empty;
                }
                // Spread sideways when blocked below
                if let Some(dir) = water_flow_dir(src, edit, x, y) {
                    if incoming(src, edit, x + dir, y) == Some((Material::Water, (x, y))) {
                        return Material::Empty;
                    }
                }
                Material::Water
            }

            Material::Sand => {
                // Straight fall: swap with empty or water below. The cell
                // below takes this grain unconditionally (straight-above is
                // its highest-priority donor), so no acceptance check is
                // needed.
                if !covered(edit, x, y - 1) {
                    match src.sample(x, y - 1) {
                        Material::Empty => return Material::Empty,
                        Material::Water => return Material::Water,
                        _ => {}
                    }
                }
                // Diagonal slide into an open corner
                if let Some(dir) = sand_slide_dir(src, edit, x, y) {
                    if incoming(src, edit, x + dir, y - 1) == Some((Material::Sand, (x, y))) {
                        return Material::Empty;
                    }
                }
                Material::Sand
            }

            me @ (Material::Rock | Material::Dirt) => {
                if solid_neighbors(src, x, y) <= stability_threshold {
                    Material::Sand
                } else {
                    me
                }
            }
        }
    }
}

fn covered(edit: Option<&EditCommand>, x: i32, y: i32) -> bool {
    edit.is_some_and(|e| e.contains(x, y))
}

/// Does a sand grain fall straight into (x, y) this tick? Holds for empty
/// and water receivers alike; the stamped region neither donates nor
/// receives.
fn receives_sand(src: &Grid, edit: Option<&EditCommand>, x: i32, y: i32) -> bool {
    src.sample(x, y + 1) == Material::Sand && !covered(edit, x, y + 1)
}

/// Direction the sand cell at (x, y) slides diagonally, if any. Only fires
/// when the straight fall is blocked; a two-way choice is broken on
/// coordinate parity to avoid one-sided pillars.
fn sand_slide_dir(src: &Grid, edit: Option<&EditCommand>, x: i32, y: i32) -> Option<i32> {
    if matches!(src.sample(x, y - 1), Material::Empty | Material::Water)
        && !covered(edit, x, y - 1)
    {
        return None; // falls straight instead
    }
    let left_open = src.sample(x - 1, y - 1) == Material::Empty && !covered(edit, x - 1, y - 1);
    let right_open = src.sample(x + 1, y - 1) == Material::Empty && !covered(edit, x + 1, y - 1);
    match (left_open, right_open) {
        (true, true) => Some(if (x + y) & 1 == 0 { -1 } else { 1 }),
        (true, false) => Some(-1),
        (false, true) => Some(1),
        (false, false) => None,
    }
}

/// Does the water cell at (x, y) fall straight down this tick? A water cell
/// being displaced by falling sand becomes sand instead and stays put.
fn water_falls(src: &Grid, edit: Option<&EditCommand>, x: i32, y: i32) -> bool {
    !receives_sand(src, edit, x, y)
        && src.sample(x, y - 1) == Material::Empty
        && !covered(edit, x, y - 1)
}

/// Direction the water cell at (x, y) spreads horizontally, if any. Only
/// fires when it can neither swap with sand nor fall.
fn water_flow_dir(src: &Grid, edit: Option<&EditCommand>, x: i32, y: i32) -> Option<i32> {
    if receives_sand(src, edit, x, y) {
        return None;
    }
    if src.sample(x, y - 1) == Material::Empty && !covered(edit, x, y - 1) {
        return None; // falls instead
    }
    let left_open = src.sample(x - 1, y) == Material::Empty && !covered(edit, x - 1, y);
    let right_open = src.sample(x + 1, y) == Material::Empty && !covered(edit, x + 1, y);
    match (left_open, right_open) {
        (true, true) => Some(if (x + y) & 1 == 0 { -1 } else { 1 }),
        (true, false) => Some(-1),
        (false, true) => Some(1),
        (false, false) => None,
    }
}

/// What arrives into the empty, unstamped cell at (x, y) this tick, and from
/// which donor. The fixed priority (straight sand, up-left slide, up-right
/// slide, falling water, left spread, right spread) is the single source of
/// truth: donors replay this decision to know whether to vacate.
fn incoming(
    src: &Grid,
    edit: Option<&EditCommand>,
    x: i32,
    y: i32,
) -> Option<(Material, (i32, i32))> {
    if receives_sand(src, edit, x, y) {
        return Some((Material::Sand, (x, y + 1)));
    }
    if src.sample(x - 1, y + 1) == Material::Sand
        && !covered(edit, x - 1, y + 1)
        && sand_slide_dir(src, edit, x - 1, y + 1) == Some(1)
    {
        return Some((Material::Sand, (x - 1, y + 1)));
    }
    if src.sample(x + 1, y + 1) == Material::Sand
        && !covered(edit, x + 1, y + 1)
        && sand_slide_dir(src, edit, x + 1, y + 1) == Some(-1)
    {
        return Some((Material::Sand, (x + 1, y + 1)));
    }
    if src.sample(x, y + 1) == Material::Water
        && !covered(edit, x, y + 1)
        && water_falls(src, edit, x, y + 1)
    {
        return Some((Material::Water, (x, y + 1)));
    }
    if src.sample(x - 1, y) == Material::Water
        && !covered(edit, x - 1, y)
        && water_flow_dir(src, edit, x - 1, y) == Some(1)
    {
        return Some((Material::Water, (x - 1, y)));
    }
    if src.sample(x + 1, y) == Material::Water
        && !covered(edit, x + 1, y)
        && water_flow_dir(src, edit, x + 1, y) == Some(-1)
    {
        return Some((Material::Water, (x + 1, y)));
    }
    None
}

/// Count solid cells in the 8-neighborhood, boundary policy applied (side
/// and bottom walls count as solid, the open sky does not).
fn solid_neighbors(src: &Grid, x: i32, y: i32) -> u32 {
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            if src.sample(x + dx, y + dy).is_solid() {
                count += 1;
            }
        }
    }
    count
}
