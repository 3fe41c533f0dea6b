use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::config::GridSize;
use crate::snake::Cell;

/// Placement failure for a new board entity.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum SpawnError {
    #[error("no free cell left on the {width}x{height} board")]
    BoardFull { width: u16, height: u16 },
}

/// Lists every cell of the grid that is not in `occupied`, row by row.
#[must_use]
pub fn free_cells(bounds: GridSize, occupied: &HashSet<Cell>) -> Vec<Cell> {
    let mut candidates = Vec::with_capacity(bounds.total_cells().saturating_sub(occupied.len()));

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let cell = Cell { x, y };
            if !occupied.contains(&cell) {
                candidates.push(cell);
            }
        }
    }

    candidates
}

/// Picks a uniformly random free cell.
///
/// The search is a single pass over the grid, so a saturated board reports
/// [`SpawnError::BoardFull`] instead of retrying forever.
pub fn spawn_cell<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    occupied: &HashSet<Cell>,
) -> Result<Cell, SpawnError> {
    free_cells(bounds, occupied)
        .choose(rng)
        .copied()
        .ok_or(SpawnError::BoardFull {
            width: bounds.width,
            height: bounds.height,
        })
}
