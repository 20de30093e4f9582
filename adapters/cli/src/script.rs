//! Scripted target that walks in, gathers every objective and walks out.

use std::time::Duration;

use glam::Vec2;
use maze_hunt_core::CellCoord;
use maze_hunt_world::{navigation::compute_distances, query, World};

/// Moves the target between adjacent cell centres along shortest paths.
///
/// At most one waypoint is reached per tick so each reported move crosses at
/// most one cell boundary.
#[derive(Debug)]
pub(crate) struct ScriptedTarget {
    speed: f32,
    exit: Vec2,
    waypoint: Option<Vec2>,
}

impl ScriptedTarget {
    /// Creates a script moving at `speed` cells per second that leaves the
    /// maze through `exit`, a point outside the grid beyond the entrance.
    pub(crate) fn new(speed: f32, exit: Vec2) -> Self {
        Self {
            speed,
            exit,
            waypoint: None,
        }
    }

    /// Position the target should report after `dt`, or `None` when it stays put.
    pub(crate) fn advance(&mut self, world: &World, dt: Duration) -> Option<Vec2> {
        let start = query::target(world).position;
        if self.waypoint.is_none() {
            self.waypoint = self.next_waypoint(world, start);
        }
        let waypoint = self.waypoint?;

        let stride = self.speed * dt.as_secs_f32();
        let offset = waypoint - start;
        let distance = offset.length();
        let position = if distance <= stride {
            self.waypoint = None;
            waypoint
        } else {
            start + offset / distance * stride
        };

        (position != start).then_some(position)
    }

    fn next_waypoint(&self, world: &World, position: Vec2) -> Option<Vec2> {
        let grid = query::grid(world);
        let Some(cell) = grid.cell_containing(position) else {
            return Some(grid.cell_center(grid.entrance()));
        };

        let goal = nearest_objective(world, cell).unwrap_or_else(|| grid.entrance());
        if cell == goal {
            let leaving = query::objectives(world).is_empty() && query::gate(world).is_passable();
            return leaving.then_some(self.exit);
        }

        let field = compute_distances(grid, goal);
        let own = field.distance(cell)?;
        grid.floor_neighbors(cell)
            .find(|neighbor| field.distance(*neighbor).map_or(false, |distance| distance < own))
            .map(|neighbor| grid.cell_center(neighbor))
    }
}

fn nearest_objective(world: &World, from: CellCoord) -> Option<CellCoord> {
    let field = compute_distances(query::grid(world), from);
    query::objectives(world)
        .iter()
        .copied()
        .min_by_key(|objective| field.distance(*objective).unwrap_or(u32::MAX))
}
