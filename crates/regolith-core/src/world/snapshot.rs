//! Grid snapshots - the asynchronous readback seam
//!
//! A snapshot copy is a two-phase operation: [`SnapshotSource::begin_copy`]
//! captures the source's last completed buffer into a [`CopyTicket`], and the
//! ticket is polled once per host tick until it resolves. A ticket never
//! resolves on the tick that created it - the completion always lands at
//! least one poll later, the way a hardware readback would - so a consumer
//! keeps serving its previous snapshot while a copy is in flight.
//!
//! Failures travel inside the ticket: a failed copy resolves to a
//! [`CopyError`] instead of a snapshot and the requester decides what to keep.

use super::grid::Grid;
use crate::error::CopyError;
use crate::simulation::Material;

/// An immutable, fully-copied view of one grid buffer.
///
/// Exists only in complete form: a snapshot is built from a whole grid in one
/// motion and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSnapshot {
    width: i32,
    height: i32,
    tick: u64,
    cells: Vec<Material>,
}

impl GridSnapshot {
    /// Copy a completed grid buffer, tagging it with the simulation tick it
    /// reflects.
    pub fn capture(grid: &Grid, tick: u64) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            tick,
            cells: grid.cells().to_vec(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Simulation tick this snapshot reflects.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of cells in the snapshot.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Read a cell with the same boundary policy as the live grid: sides and
    /// bottom are solid rock, above is open sky.
    pub fn sample(&self, x: i32, y: i32) -> Material {
        if x < 0 || x >= self.width || y < 0 {
            Material::Rock
        } else if y >= self.height {
            Material::Empty
        } else {
            self.cells[(y as usize) * (self.width as usize) + (x as usize)]
        }
    }

    /// Count cells holding the given material.
    pub fn count(&self, material: Material) -> usize {
        self.cells.iter().filter(|&&c| c == material).count()
    }
}

/// An in-flight snapshot copy.
///
/// Poll once per tick; `None` means still in flight. The result is yielded
/// exactly once.
#[derive(Debug)]
pub struct CopyTicket {
    in_flight: bool,
    result: Option<Result<GridSnapshot, CopyError>>,
}

impl CopyTicket {
    /// A copy that will resolve successfully on a later poll.
    pub fn completed(snapshot: GridSnapshot) -> Self {
        Self {
            in_flight: true,
            result: Some(Ok(snapshot)),
        }
    }

    /// A copy that will resolve to an error on a later poll.
    pub fn failed(error: CopyError) -> Self {
        Self {
            in_flight: true,
            result: Some(Err(error)),
        }
    }

    /// Check for completion. Returns `None` while the copy is in flight;
    /// the first poll never completes.
    pub fn poll(&mut self) -> Option<Result<GridSnapshot, CopyError>> {
        if self.in_flight {
            self.in_flight = false;
            return None;
        }
        self.result.take()
    }
}

/// Anything the collision side can request grid copies from.
///
/// The simulation engine is the production source; tests substitute failing
/// or fixed sources to drive the error paths.
pub trait SnapshotSource {
    fn begin_copy(&self) -> CopyTicket;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> GridSnapshot {
        let mut grid = Grid::new(4, 4);
        grid.set(1, 1, Material::Sand);
        GridSnapshot::capture(&grid, 7)
    }

    #[test]
    fn test_capture_copies_everything() {
        let snap = snapshot();
        assert_eq!(snap.len(), 16);
        assert_eq!(snap.tick(), 7);
        assert_eq!(snap.sample(1, 1), Material::Sand);
        assert_eq!(snap.sample(0, 0), Material::Empty);
    }

    #[test]
    fn test_snapshot_boundary_policy() {
        let snap = snapshot();
        assert_eq!(snap.sample(-1, 1), Material::Rock);
        assert_eq!(snap.sample(4, 1), Material::Rock);
        assert_eq!(snap.sample(1, -1), Material::Rock);
        assert_eq!(snap.sample(1, 4), Material::Empty);
    }

    #[test]
    fn test_ticket_never_resolves_on_first_poll() {
        let mut ticket = CopyTicket::completed(snapshot());
        assert!(ticket.poll().is_none());
        match ticket.poll() {
            Some(Ok(snap)) => assert_eq!(snap.tick(), 7),
            other => panic!("expected completed copy, got {other:?}"),
        }
        // Resolved tickets yield nothing further
        assert!(ticket.poll().is_none());
    }

    #[test]
    fn test_failed_ticket_resolves_to_error() {
        let mut ticket = CopyTicket::failed(CopyError::Failed("device lost".into()));
        assert!(ticket.poll().is_none());
        assert!(matches!(ticket.poll(), Some(Err(CopyError::Failed(_)))));
    }
}
