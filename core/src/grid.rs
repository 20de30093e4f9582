//! Immutable wall/floor grid shared by every maze algorithm.

use std::{fmt, str::FromStr};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, Direction};

const WALL_GLYPH: char = '#';
const FLOOR_GLYPH: char = '.';
const ENTRANCE_GLYPH: char = 'E';

/// Classification of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Solid cell that blocks movement.
    Wall,
    /// Open cell that agents may traverse.
    Floor,
}

/// Edge of the grid that hosts the entrance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Row zero.
    North,
    /// Last column.
    East,
    /// Last row.
    South,
    /// Column zero.
    West,
}

impl Side {
    /// Direction pointing from the edge into the grid interior.
    #[must_use]
    pub const fn inward(self) -> Direction {
        match self {
            Side::North => Direction::South,
            Side::East => Direction::West,
            Side::South => Direction::North,
            Side::West => Direction::East,
        }
    }
}

/// Errors raised while building or querying a [`Grid`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The dimensions cannot host the requested layout.
    #[error("grid dimensions {width}x{height} are too small or too large")]
    InvalidDimensions {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// A query addressed a cell outside the grid.
    #[error("cell ({column}, {row}) lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Column that was queried.
        column: u32,
        /// Row that was queried.
        row: u32,
        /// Number of columns in the grid.
        width: u32,
        /// Number of rows in the grid.
        height: u32,
    },
    /// A row length differs from the first row.
    #[error("row {row} has {actual} cells, expected {expected}")]
    Ragged {
        /// Index of the offending row.
        row: u32,
        /// Length of the first row.
        expected: u32,
        /// Length of the offending row.
        actual: u32,
    },
    /// The entrance does not touch the outer edge.
    #[error("entrance ({column}, {row}) is not on the grid boundary")]
    EntranceNotOnBoundary {
        /// Entrance column.
        column: u32,
        /// Entrance row.
        row: u32,
    },
    /// The entrance is a wall cell.
    #[error("entrance ({column}, {row}) is not a floor cell")]
    EntranceNotFloor {
        /// Entrance column.
        column: u32,
        /// Entrance row.
        row: u32,
    },
    /// A text layout did not mark an entrance.
    #[error("layout does not mark an entrance")]
    MissingEntrance,
    /// A text layout marked more than one entrance.
    #[error("layout marks more than one entrance")]
    MultipleEntrances,
    /// A text layout contained an unsupported character.
    #[error("unknown glyph {glyph:?} at ({column}, {row})")]
    UnknownGlyph {
        /// Character that could not be interpreted.
        glyph: char,
        /// Column of the character.
        column: u32,
        /// Row of the character.
        row: u32,
    },
}

/// Rectangular, row-major wall/floor layout with a single boundary entrance.
///
/// A grid is never mutated once built. Cell `(x, y)` maps to the world-space
/// point `(x - width / 2 + 0.5, y - height / 2 + 0.5)`, which places cell
/// centres on half-integer offsets around the origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<CellState>,
    entrance: CellCoord,
}

impl Grid {
    /// Builds a grid from row-major cells.
    pub fn from_cells(
        width: u32,
        height: u32,
        cells: Vec<CellState>,
        entrance: CellCoord,
    ) -> Result<Self, GridError> {
        let expected = usize::try_from(u64::from(width) * u64::from(height)).ok();
        if width == 0 || height == 0 || expected != Some(cells.len()) {
            return Err(GridError::InvalidDimensions { width, height });
        }

        let grid = Self {
            width,
            height,
            cells,
            entrance,
        };
        grid.validate_entrance()?;
        Ok(grid)
    }

    /// Builds a grid from explicit rows of cells.
    pub fn from_rows(rows: Vec<Vec<CellState>>, entrance: CellCoord) -> Result<Self, GridError> {
        let height = u32::try_from(rows.len()).map_err(|_| GridError::InvalidDimensions {
            width: 0,
            height: u32::MAX,
        })?;
        let first_len = rows.first().map_or(0, Vec::len);
        let width = u32::try_from(first_len).map_err(|_| GridError::InvalidDimensions {
            width: u32::MAX,
            height,
        })?;

        let mut cells = Vec::with_capacity(first_len * rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != first_len {
                return Err(GridError::Ragged {
                    row: u32::try_from(index).unwrap_or(u32::MAX),
                    expected: width,
                    actual: u32::try_from(row.len()).unwrap_or(u32::MAX),
                });
            }
            cells.extend(row);
        }

        Self::from_cells(width, height, cells, entrance)
    }

    /// Builds a grid from a text layout.
    ///
    /// `#` is a wall, `.` a floor cell and `E` the floor cell designated as the
    /// entrance. Blank lines and surrounding whitespace are ignored.
    pub fn parse(layout: &str) -> Result<Self, GridError> {
        let mut rows = Vec::new();
        let mut entrance = None;

        for (row_index, line) in layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
        {
            let row = u32::try_from(row_index).unwrap_or(u32::MAX);
            let mut cells = Vec::with_capacity(line.len());
            for (column_index, glyph) in line.chars().enumerate() {
                let column = u32::try_from(column_index).unwrap_or(u32::MAX);
                let state = match glyph {
                    WALL_GLYPH => CellState::Wall,
                    FLOOR_GLYPH => CellState::Floor,
                    ENTRANCE_GLYPH => {
                        if entrance.replace(CellCoord::new(column, row)).is_some() {
                            return Err(GridError::MultipleEntrances);
                        }
                        CellState::Floor
                    }
                    other => {
                        return Err(GridError::UnknownGlyph {
                            glyph: other,
                            column,
                            row,
                        })
                    }
                };
                cells.push(state);
            }
            rows.push(cells);
        }

        let entrance = entrance.ok_or(GridError::MissingEntrance)?;
        Self::from_rows(rows, entrance)
    }

    fn validate_entrance(&self) -> Result<(), GridError> {
        let entrance = self.entrance;
        let state = self.cell_at(entrance)?;
        if self.boundary_side(entrance).is_none() {
            return Err(GridError::EntranceNotOnBoundary {
                column: entrance.column(),
                row: entrance.row(),
            });
        }
        if state != CellState::Floor {
            return Err(GridError::EntranceNotFloor {
                column: entrance.column(),
                row: entrance.row(),
            });
        }
        Ok(())
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell designated as the single entrance.
    #[must_use]
    pub const fn entrance(&self) -> CellCoord {
        self.entrance
    }

    /// Edge of the grid that hosts the entrance.
    #[must_use]
    pub fn entrance_side(&self) -> Side {
        self.boundary_side(self.entrance).unwrap_or(Side::West)
    }

    /// Cell adjacent to the entrance on the interior side, if it exists.
    #[must_use]
    pub fn entrance_inward(&self) -> Option<CellCoord> {
        self.entrance
            .step(self.entrance_side().inward())
            .filter(|cell| self.contains(*cell))
    }

    /// Dense cell states stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// State of the provided cell.
    pub fn cell_at(&self, cell: CellCoord) -> Result<CellState, GridError> {
        self.index_of(cell)
            .and_then(|index| self.cells.get(index).copied())
            .ok_or(GridError::OutOfBounds {
                column: cell.column(),
                row: cell.row(),
                width: self.width,
                height: self.height,
            })
    }

    /// Reports whether the cell is an in-bounds floor cell.
    #[must_use]
    pub fn is_floor(&self, cell: CellCoord) -> bool {
        matches!(self.cell_at(cell), Ok(CellState::Floor))
    }

    /// Row-major offset of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Coordinate stored at the provided row-major offset.
    #[must_use]
    pub fn coord_of(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cells.len() {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// In-bounds orthogonal neighbours in north, east, south, west order.
    #[must_use]
    pub fn neighbors(&self, cell: CellCoord) -> Neighbors {
        let mut neighbors = Neighbors::default();
        for direction in Direction::ALL {
            if let Some(next) = cell.step(direction).filter(|next| self.contains(*next)) {
                neighbors.push(next);
            }
        }
        neighbors
    }

    /// Orthogonal neighbours that are floor cells.
    pub fn floor_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        self.neighbors(cell).filter(move |next| self.is_floor(*next))
    }

    /// Every floor cell in row-major order.
    pub fn floor_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, state)| **state == CellState::Floor)
            .filter_map(move |(index, _)| self.coord_of(index))
    }

    /// World-space centre of the cell; `y` carries the world `z` axis.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 - self.width as f32 / 2.0 + 0.5,
            cell.row() as f32 - self.height as f32 / 2.0 + 0.5,
        )
    }

    /// Cell containing the world-space point, or `None` when off-grid.
    #[must_use]
    pub fn cell_containing(&self, point: Vec2) -> Option<CellCoord> {
        let column = (point.x + self.width as f32 / 2.0).floor();
        let row = (point.y + self.height as f32 / 2.0).floor();
        if !column.is_finite() || !row.is_finite() || column < 0.0 || row < 0.0 {
            return None;
        }
        if column >= self.width as f32 || row >= self.height as f32 {
            return None;
        }
        Some(CellCoord::new(column as u32, row as u32))
    }

    fn boundary_side(&self, cell: CellCoord) -> Option<Side> {
        if !self.contains(cell) {
            None
        } else if cell.column() == 0 {
            Some(Side::West)
        } else if cell.column() + 1 == self.width {
            Some(Side::East)
        } else if cell.row() == 0 {
            Some(Side::North)
        } else if cell.row() + 1 == self.height {
            Some(Side::South)
        } else {
            None
        }
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(layout: &str) -> Result<Self, Self::Err> {
        Self::parse(layout)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, state) in self.cells.iter().enumerate() {
            let glyph = match (self.coord_of(index), state) {
                (Some(cell), _) if cell == self.entrance => ENTRANCE_GLYPH,
                (_, CellState::Wall) => WALL_GLYPH,
                (_, CellState::Floor) => FLOOR_GLYPH,
            };
            write!(f, "{glyph}")?;
            if (index + 1) % self.width as usize == 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Iterator over at most four orthogonal neighbours.
#[derive(Clone, Debug, Default)]
pub struct Neighbors {
    buffer: [Option<CellCoord>; 4],
    len: usize,
    cursor: usize,
}

impl Neighbors {
    fn push(&mut self, cell: CellCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for Neighbors {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN_FIVE: &str = "
        #####
        #...#
        E...#
        #...#
        #####
    ";

    #[test]
    fn parse_reads_dimensions_and_entrance() {
        let grid: Grid = OPEN_FIVE.parse().expect("valid layout");
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 5);
        assert_eq!(grid.entrance(), CellCoord::new(0, 2));
        assert_eq!(grid.entrance_side(), Side::West);
        assert_eq!(grid.entrance_inward(), Some(CellCoord::new(1, 2)));
        assert_eq!(grid.floor_cells().count(), 10);
    }

    #[test]
    fn display_round_trips_layout() {
        let grid = Grid::parse(OPEN_FIVE).expect("valid layout");
        let rendered = grid.to_string();
        assert_eq!(Grid::parse(&rendered).expect("rendered layout"), grid);
        assert!(rendered.starts_with("#####\n#...#\nE...#\n"));
    }

    #[test]
    fn cell_at_rejects_out_of_bounds() {
        let grid = Grid::parse(OPEN_FIVE).expect("valid layout");
        assert_eq!(grid.cell_at(CellCoord::new(2, 2)), Ok(CellState::Floor));
        assert_eq!(grid.cell_at(CellCoord::new(0, 0)), Ok(CellState::Wall));
        assert_eq!(
            grid.cell_at(CellCoord::new(5, 0)),
            Err(GridError::OutOfBounds {
                column: 5,
                row: 0,
                width: 5,
                height: 5,
            })
        );
        assert!(!grid.is_floor(CellCoord::new(0, 9)));
    }

    #[test]
    fn neighbors_skip_cells_outside_grid() {
        let grid = Grid::parse(OPEN_FIVE).expect("valid layout");
        let corner: Vec<_> = grid.neighbors(CellCoord::new(0, 0)).collect();
        assert_eq!(corner, vec![CellCoord::new(1, 0), CellCoord::new(0, 1)]);

        let centre: Vec<_> = grid.neighbors(CellCoord::new(2, 2)).collect();
        assert_eq!(
            centre,
            vec![
                CellCoord::new(2, 1),
                CellCoord::new(3, 2),
                CellCoord::new(2, 3),
                CellCoord::new(1, 2),
            ]
        );
    }

    #[test]
    fn floor_neighbors_exclude_walls() {
        let grid = Grid::parse(OPEN_FIVE).expect("valid layout");
        let around_entrance: Vec<_> = grid.floor_neighbors(CellCoord::new(0, 2)).collect();
        assert_eq!(around_entrance, vec![CellCoord::new(1, 2)]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let error = Grid::parse("###\nE.\n###").expect_err("ragged layout");
        assert_eq!(
            error,
            GridError::Ragged {
                row: 1,
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn entrance_must_sit_on_boundary_floor() {
        assert_eq!(
            Grid::parse("###\n#E#\n###"),
            Err(GridError::EntranceNotOnBoundary { column: 1, row: 1 })
        );

        let rows = vec![vec![CellState::Wall; 3]; 3];
        assert_eq!(
            Grid::from_rows(rows, CellCoord::new(0, 1)),
            Err(GridError::EntranceNotFloor { column: 0, row: 1 })
        );
    }

    #[test]
    fn layout_errors_are_reported() {
        assert_eq!(Grid::parse("###\n#.#"), Err(GridError::MissingEntrance));
        assert_eq!(Grid::parse("E.E\n###"), Err(GridError::MultipleEntrances));
        assert_eq!(
            Grid::parse("E?#"),
            Err(GridError::UnknownGlyph {
                glyph: '?',
                column: 1,
                row: 0,
            })
        );
        assert_eq!(
            Grid::from_rows(Vec::new(), CellCoord::new(0, 0)),
            Err(GridError::InvalidDimensions {
                width: 0,
                height: 0
            })
        );
    }

    #[test]
    fn from_cells_checks_cell_count() {
        assert_eq!(
            Grid::from_cells(3, 3, vec![CellState::Floor; 8], CellCoord::new(0, 1)),
            Err(GridError::InvalidDimensions {
                width: 3,
                height: 3
            })
        );
        let grid = Grid::from_cells(3, 1, vec![CellState::Floor; 3], CellCoord::new(0, 0))
            .expect("single row corridor");
        assert_eq!(grid.floor_cells().count(), 3);
    }

    #[test]
    fn world_mapping_centres_cells_on_origin() {
        let grid = Grid::parse(OPEN_FIVE).expect("valid layout");
        assert_eq!(grid.cell_center(CellCoord::new(2, 2)), Vec2::new(0.0, 0.0));
        assert_eq!(grid.cell_center(CellCoord::new(0, 0)), Vec2::new(-2.0, -2.0));

        for cell in [CellCoord::new(0, 0), CellCoord::new(4, 1), CellCoord::new(3, 4)] {
            assert_eq!(grid.cell_containing(grid.cell_center(cell)), Some(cell));
        }
        assert_eq!(grid.cell_containing(Vec2::new(-3.0, 0.0)), None);
        assert_eq!(grid.cell_containing(Vec2::new(0.0, 2.5)), None);
    }

    #[test]
    fn index_and_coord_are_inverse() {
        let grid = Grid::parse(OPEN_FIVE).expect("valid layout");
        for index in 0..grid.cells().len() {
            let cell = grid.coord_of(index).expect("in range");
            assert_eq!(grid.index_of(cell), Some(index));
        }
        assert_eq!(grid.coord_of(25), None);
        assert_eq!(grid.index_of(CellCoord::new(5, 0)), None);
    }
}
