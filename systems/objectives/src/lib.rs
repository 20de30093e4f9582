#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Dead-end classification and objective placement.
//!
//! Objectives are hidden in dead ends: floor cells with a single open
//! neighbour. The entrance is never a candidate, and neither is anything on
//! the entrance line, so the first objective is never visible from the
//! threshold.

use maze_hunt_core::{CellCoord, Grid, Side};
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

/// Per-cell dead-end flags for a grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeadEndFlags {
    width: u32,
    height: u32,
    flags: Vec<bool>,
}

impl DeadEndFlags {
    /// Reports whether the cell is a dead end. Out-of-bounds cells are not.
    #[must_use]
    pub fn is_dead_end(&self, cell: CellCoord) -> bool {
        if cell.column() >= self.width || cell.row() >= self.height {
            return false;
        }
        let index = cell.row() as usize * self.width as usize + cell.column() as usize;
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// Flagged cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let width = self.width as usize;
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, flagged)| **flagged)
            .map(move |(index, _)| CellCoord::new((index % width) as u32, (index / width) as u32))
    }

    /// Number of flagged cells.
    #[must_use]
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|flagged| **flagged).count()
    }
}

/// Flags every floor cell, other than the entrance, with exactly one floor
/// neighbour.
#[must_use]
pub fn classify_dead_ends(grid: &Grid) -> DeadEndFlags {
    let entrance = grid.entrance();
    let mut flags = vec![false; grid.cells().len()];

    for cell in grid.floor_cells() {
        if cell == entrance {
            continue;
        }
        if grid.floor_neighbors(cell).count() != 1 {
            continue;
        }
        if let Some(slot) = grid.index_of(cell).and_then(|index| flags.get_mut(index)) {
            *slot = true;
        }
    }

    DeadEndFlags {
        width: grid.width(),
        height: grid.height(),
        flags,
    }
}

/// Picks up to `count` objective cells from the flagged dead ends.
///
/// Candidates on the entrance line (its row for west and east entrances, its
/// column for north and south ones) are skipped. The remaining candidates are
/// shuffled with `rng` and the first `count` returned; when fewer exist, all
/// of them are.
pub fn select_objectives<R: Rng>(
    grid: &Grid,
    flags: &DeadEndFlags,
    count: usize,
    rng: &mut R,
) -> Vec<CellCoord> {
    let entrance = grid.entrance();
    let on_entrance_line = |cell: &CellCoord| match grid.entrance_side() {
        Side::West | Side::East => cell.row() == entrance.row(),
        Side::North | Side::South => cell.column() == entrance.column(),
    };

    let mut candidates: Vec<CellCoord> = flags
        .cells()
        .filter(|cell| !on_entrance_line(cell))
        .collect();
    candidates.shuffle(rng);
    candidates.truncate(count);

    debug!(
        requested = count,
        selected = candidates.len(),
        dead_ends = flags.count(),
        "objectives selected"
    );
    candidates
}
