#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic maze generation system.
//!
//! Mazes are carved by a randomized depth-first backtracker over a lattice of
//! room cells at odd coordinates, with wall cells between neighbouring rooms.
//! The walk visits every room and only ever opens the wall between the current
//! room and an unvisited one, so the floor forms a spanning tree and every
//! floor cell is reachable from the entrance. The entrance sits on the west
//! edge, next to the room in the middle row.

use maze_hunt_core::{CellCoord, CellState, Direction, Grid, GridError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Smallest width or height that fits a wall border around one floor cell.
pub const MIN_DIMENSION: u32 = 3;
/// Largest accepted width or height.
pub const MAX_DIMENSION: u32 = 1024;

/// Configuration parameters required to construct the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    width: u32,
    height: u32,
    seed: u64,
}

impl Config {
    /// Creates a new configuration for a `width × height` maze.
    #[must_use]
    pub const fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
        }
    }

    /// Number of columns in generated mazes.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in generated mazes.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Seed feeding the carving walk.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

/// Seeded maze generator; the same configuration always yields the same grid.
#[derive(Debug)]
pub struct MazeGenerator {
    config: Config,
}

impl MazeGenerator {
    /// Creates a generator using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Carves a maze from a fresh random stream seeded by the configuration.
    pub fn generate(&self) -> Result<Grid, GridError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        generate(self.config.width, self.config.height, &mut rng)
    }
}

/// Carves a `width × height` maze using randomness drawn from `rng`.
///
/// Fails with [`GridError::InvalidDimensions`] when either dimension is below
/// [`MIN_DIMENSION`] or above [`MAX_DIMENSION`].
pub fn generate<R: Rng>(width: u32, height: u32, rng: &mut R) -> Result<Grid, GridError> {
    let allowed = MIN_DIMENSION..=MAX_DIMENSION;
    if !allowed.contains(&width) || !allowed.contains(&height) {
        return Err(GridError::InvalidDimensions { width, height });
    }

    let lattice = RoomLattice::new(width, height);
    let mut cells = vec![CellState::Wall; lattice.cell_count()];
    let mut visited = vec![false; lattice.room_count()];
    let mut stack: Vec<CellCoord> = Vec::with_capacity(lattice.room_count());

    let entrance_row = entrance_row(height);
    let entrance = CellCoord::new(0, entrance_row);
    let start = CellCoord::new(1, entrance_row);

    lattice.open(&mut cells, entrance);
    lattice.open(&mut cells, start);
    lattice.mark_visited(&mut visited, start);
    stack.push(start);

    while let Some(&current) = stack.last() {
        let mut candidates = [None; 4];
        let mut count = 0;
        for direction in Direction::ALL {
            if let Some(next) = lattice.room_towards(current, direction) {
                if !lattice.is_visited(&visited, next) {
                    candidates[count] = Some((direction, next));
                    count += 1;
                }
            }
        }

        if count == 0 {
            let _ = stack.pop();
            continue;
        }

        let Some((direction, next)) = candidates[rng.gen_range(0..count)] else {
            continue;
        };
        if let Some(between) = current.step(direction) {
            lattice.open(&mut cells, between);
        }
        lattice.open(&mut cells, next);
        lattice.mark_visited(&mut visited, next);
        stack.push(next);
    }

    debug!(width, height, rooms = lattice.room_count(), "maze carved");
    Grid::from_cells(width, height, cells, entrance)
}

/// Row hosting the entrance: the middle row, moved up onto the room lattice
/// when the middle falls on an even row.
#[must_use]
pub fn entrance_row(height: u32) -> u32 {
    let middle = height / 2;
    if middle % 2 == 1 {
        middle
    } else {
        middle.saturating_sub(1).max(1)
    }
}

/// Rooms sit at odd coordinates strictly inside the wall border.
#[derive(Clone, Copy, Debug)]
struct RoomLattice {
    width: u32,
    height: u32,
    room_columns: u32,
    room_rows: u32,
}

impl RoomLattice {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            room_columns: (width - 1) / 2,
            room_rows: (height - 1) / 2,
        }
    }

    fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn room_count(&self) -> usize {
        self.room_columns as usize * self.room_rows as usize
    }

    fn room_towards(&self, room: CellCoord, direction: Direction) -> Option<CellCoord> {
        let next = room.step(direction)?.step(direction)?;
        self.room_index(next).map(|_| next)
    }

    fn room_index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() % 2 == 0 || cell.row() % 2 == 0 {
            return None;
        }
        let column = cell.column() / 2;
        let row = cell.row() / 2;
        if column >= self.room_columns || row >= self.room_rows {
            return None;
        }
        Some(row as usize * self.room_columns as usize + column as usize)
    }

    fn is_visited(&self, visited: &[bool], room: CellCoord) -> bool {
        self.room_index(room)
            .and_then(|index| visited.get(index).copied())
            .unwrap_or(true)
    }

    fn mark_visited(&self, visited: &mut [bool], room: CellCoord) {
        if let Some(slot) = self.room_index(room).and_then(|index| visited.get_mut(index)) {
            *slot = true;
        }
    }

    fn open(&self, cells: &mut [CellState], cell: CellCoord) {
        if cell.column() >= self.width || cell.row() >= self.height {
            return;
        }
        let index = cell.row() as usize * self.width as usize + cell.column() as usize;
        if let Some(slot) = cells.get_mut(index) {
            *slot = CellState::Floor;
        }
    }
}
