//! Breadth-first distance fields over the floor graph.

use std::collections::VecDeque;

use maze_hunt_core::{CellCoord, Grid};
use tracing::trace;

/// Sentinel stored for cells that cannot be reached from the source.
pub const UNREACHABLE: u32 = u32::MAX;

/// Dense step-count grid seeded from a single source cell.
///
/// The field mirrors the grid's dimensions and stores the number of
/// orthogonal floor-to-floor steps along a shortest path from the source.
/// Walls and disconnected floor cells hold [`UNREACHABLE`]. A field is a
/// snapshot: it is rebuilt from scratch for every query and never updated in
/// place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    width: u32,
    height: u32,
    source: CellCoord,
    distances: Vec<u32>,
}

/// Computes shortest step distances from `source` to every cell of `grid`.
///
/// Sources on a wall or outside the grid produce an all-unreachable field,
/// since callers probe with live positions that may briefly be invalid.
#[must_use]
pub fn compute_distances(grid: &Grid, source: CellCoord) -> DistanceField {
    let mut field = DistanceField {
        width: grid.width(),
        height: grid.height(),
        source,
        distances: vec![UNREACHABLE; grid.cells().len()],
    };

    let Some(source_index) = grid.index_of(source) else {
        trace!(?source, "distance source outside grid");
        return field;
    };
    if !grid.is_floor(source) {
        trace!(?source, "distance source on wall");
        return field;
    }

    field.distances[source_index] = 0;
    let mut queue = VecDeque::with_capacity(field.distances.len().min(1024));
    queue.push_back(source);

    while let Some(cell) = queue.pop_front() {
        let Some(current_index) = grid.index_of(cell) else {
            continue;
        };
        let next_distance = field.distances[current_index].saturating_add(1);

        for neighbor in grid.floor_neighbors(cell) {
            let Some(neighbor_index) = grid.index_of(neighbor) else {
                continue;
            };

            if field.distances[neighbor_index] <= next_distance {
                continue;
            }

            field.distances[neighbor_index] = next_distance;
            queue.push_back(neighbor);
        }
    }

    field
}

impl DistanceField {
    /// Width of the field in cells.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the field in cells.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cell the field was seeded from.
    #[must_use]
    pub fn source(&self) -> CellCoord {
        self.source
    }

    /// Dense distances stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[u32] {
        &self.distances
    }

    /// Raw stored value, [`UNREACHABLE`] for cells outside the field.
    #[must_use]
    pub fn raw(&self, cell: CellCoord) -> u32 {
        self.index(cell)
            .and_then(|offset| self.distances.get(offset).copied())
            .unwrap_or(UNREACHABLE)
    }

    /// Step distance to the cell, `None` when unreachable or out of bounds.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        Some(self.raw(cell)).filter(|distance| *distance != UNREACHABLE)
    }

    /// Number of cells reachable from the source, the source included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.distances
            .iter()
            .filter(|distance| **distance != UNREACHABLE)
            .count()
    }

    /// First cell in row-major order holding the largest finite distance.
    #[must_use]
    pub fn farthest(&self) -> Option<(CellCoord, u32)> {
        let mut best: Option<(usize, u32)> = None;
        for (offset, distance) in self.distances.iter().copied().enumerate() {
            if distance == UNREACHABLE {
                continue;
            }
            if best.map_or(true, |(_, current)| distance > current) {
                best = Some((offset, distance));
            }
        }

        let (offset, distance) = best?;
        let width = usize::try_from(self.width).ok()?;
        let column = u32::try_from(offset % width).ok()?;
        let row = u32::try_from(offset / width).ok()?;
        Some((CellCoord::new(column, row), distance))
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}
