//! World-space to grid-space mapping
//!
//! The grid is centered on the world origin and scaled by the cell size;
//! every component that crosses the boundary (edit routing, collision
//! queries) shares this one transform so they can never disagree about
//! which cell a world position lands in.

use glam::{IVec2, Vec2};

/// Shared world/grid coordinate transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    width: i32,
    height: i32,
    cell_size: f32,
}

impl WorldTransform {
    /// Dimensions are in cells; `cell_size` is the world-space extent of one
    /// cell. Both are validated by the world construction path before a
    /// transform is built.
    pub fn new(width: i32, height: i32, cell_size: f32) -> Self {
        debug_assert!(width > 0 && height > 0 && cell_size > 0.0);
        Self {
            width,
            height,
            cell_size,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Half the world-space extent of the grid.
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.cell_size * 0.5,
            self.height as f32 * self.cell_size * 0.5,
        )
    }

    /// Map a world position to the grid cell containing it. The result may
    /// lie outside the grid; callers resolve that through the boundary
    /// policy.
    pub fn world_to_grid(&self, world_pos: Vec2) -> IVec2 {
        let half = self.half_extents();
        IVec2::new(
            ((world_pos.x + half.x) / self.cell_size).floor() as i32,
            ((world_pos.y + half.y) / self.cell_size).floor() as i32,
        )
    }

    /// World-space center of a grid cell.
    pub fn grid_to_world(&self, cell: IVec2) -> Vec2 {
        let half = self.half_extents();
        Vec2::new(
            (cell.x as f32 + 0.5) * self.cell_size - half.x,
            (cell.y as f32 + 0.5) * self.cell_size - half.y,
        )
    }
}
