#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Hunt engine.
//!
//! This crate defines the vocabulary that connects the adapters, the
//! authoritative world, and the pure systems. The [`Grid`] is the immutable
//! wall/floor layout every algorithm operates on. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what changed.

mod grid;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use grid::{CellState, Grid, GridError, Neighbors, Side};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Hunt.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Reports the target's live position in world space.
    MoveTarget {
        /// Planar position of the target; `y` carries the world `z` axis.
        position: Vec2,
    },
    /// Replaces the pursuer's planar velocity.
    SteerPursuer {
        /// Velocity in world units per second; `y` carries the world `z` axis.
        velocity: Vec2,
    },
    /// Requests removal of an outstanding objective.
    CollectObjective {
        /// Cell holding the objective.
        cell: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// The target crossed into a different grid cell.
    TargetMoved {
        /// Cell occupied before the move, `None` when off-grid.
        from: Option<CellCoord>,
        /// Cell occupied after the move, `None` when off-grid.
        to: Option<CellCoord>,
    },
    /// A target move was refused because the entrance is sealed.
    TargetBlocked {
        /// Cell the target attempted to enter.
        cell: CellCoord,
    },
    /// A target move across the maze boundary away from the entrance was refused.
    TargetConfined {
        /// On-grid cell at the refused crossing.
        cell: CellCoord,
    },
    /// The entrance gate changed state.
    GateChanged {
        /// State the gate transitioned into.
        state: GateState,
    },
    /// An objective was removed from the outstanding set.
    ObjectiveCollected {
        /// Cell that held the objective.
        cell: CellCoord,
        /// Number of objectives still outstanding.
        remaining: u32,
    },
    /// An objective collection request referenced a cell that holds none.
    ObjectiveRejected {
        /// Cell named by the rejected request.
        cell: CellCoord,
    },
    /// The pursuer reached the target.
    TargetCaught {
        /// Cell the target occupied when caught.
        cell: CellCoord,
    },
    /// The target left the maze through the open entrance.
    TargetEscaped,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Cell one step away in the provided direction.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are the grid's concern.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Self::new(self.column, row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
            Direction::South => self.row.checked_add(1).map(|row| Self::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
        }
    }
}

/// Immutable representation of the pursuer's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PursuerSnapshot {
    /// Planar world-space position; `y` carries the world `z` axis.
    pub position: Vec2,
    /// Current planar velocity in world units per second.
    pub velocity: Vec2,
    /// Grid cell containing the position, `None` when off-grid.
    pub cell: Option<CellCoord>,
}

/// Immutable representation of the target's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSnapshot {
    /// Planar world-space position; `y` carries the world `z` axis.
    pub position: Vec2,
    /// Grid cell containing the position, `None` when off-grid.
    pub cell: Option<CellCoord>,
}

/// Cardinal movement directions. Diagonals are never considered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction leading from `from` to an orthogonally adjacent `to`.
    ///
    /// Returns `None` when the cells are not adjacent.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Direction> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Direction::East)
            } else {
                Some(Direction::West)
            }
        } else if to.row() > from.row() {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// Logical state of the entrance gate.
///
/// The grid itself never changes; sealing the entrance is tracked here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateState {
    /// The hunt has not started and the entrance is passable.
    NeverOpened,
    /// Every objective was collected and the entrance is passable again.
    Open,
    /// The entrance is sealed while objectives remain.
    Closed,
}

impl GateState {
    /// Reports whether the target may cross the entrance cell.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, GateState::Closed)
    }
}

/// Result of a hunt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Neither capture nor escape has happened yet.
    InProgress,
    /// The pursuer reached the target.
    Caught,
    /// The target left through the open entrance with every objective.
    Escaped,
}

impl Outcome {
    /// Reports whether the hunt has concluded.
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}
