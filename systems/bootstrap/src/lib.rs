#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that stages a Maze Hunt session.
//!
//! A single seeded random stream drives maze carving and then objective
//! placement, so a seed fully determines the dungeon.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use maze_hunt_core::{CellCoord, Direction, GridError};
use maze_hunt_system_generation::generate;
use maze_hunt_system_objectives::{classify_dead_ends, select_objectives};
use maze_hunt_world::{navigation::compute_distances, query, Dungeon, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info};

/// Parameters describing the session to stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of maze columns.
    pub width: u32,
    /// Number of maze rows.
    pub height: u32,
    /// Number of objectives to hide.
    pub objective_count: usize,
    /// Seed for the random stream.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 30,
            height: 30,
            objective_count: 3,
            seed: 0,
        }
    }
}

impl Config {
    /// Replaces the seed with one derived from the system clock.
    #[must_use]
    pub fn with_time_seed(mut self) -> Self {
        self.seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        self
    }
}

/// Failures raised while staging a session.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The maze could not be generated.
    #[error("failed to generate maze: {0}")]
    Grid(#[from] GridError),
}

/// Produces the world for a new session and the data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Stages the dungeon described by `config` and wraps it in a world.
    pub fn build(config: Config) -> Result<World, BootstrapError> {
        Ok(World::new(Self::dungeon(config)?))
    }

    /// Stages the dungeon described by `config` without creating a world.
    pub fn dungeon(config: Config) -> Result<Dungeon, BootstrapError> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let grid = generate(config.width, config.height, &mut rng)?;

        let flags = classify_dead_ends(&grid);
        let objectives = select_objectives(&grid, &flags, config.objective_count, &mut rng);

        let threshold = grid.entrance_inward().unwrap_or_else(|| grid.entrance());
        let field = compute_distances(&grid, threshold);
        let pursuer_spawn = field
            .farthest()
            .map(|(cell, _)| cell)
            .filter(|cell| *cell != grid.entrance())
            .unwrap_or(threshold);
        debug!(?threshold, ?pursuer_spawn, "pursuer spawn chosen");

        let outward = grid.entrance_side().inward().opposite();
        let target_spawn = grid.cell_center(grid.entrance()) + direction_vector(outward);

        info!(
            seed = config.seed,
            width = config.width,
            height = config.height,
            objectives = objectives.len(),
            "dungeon staged"
        );

        Ok(Dungeon {
            grid,
            objectives,
            pursuer_spawn,
            target_spawn,
        })
    }

    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Exposes the objectives still hidden in the maze.
    #[must_use]
    pub fn objectives<'world>(&self, world: &'world World) -> &'world [CellCoord] {
        query::objectives(world)
    }
}

/// Unit step in world space for a grid direction; `y` carries the world `z` axis.
#[must_use]
pub fn direction_vector(direction: Direction) -> Vec2 {
    match direction {
        Direction::North => Vec2::new(0.0, -1.0),
        Direction::East => Vec2::new(1.0, 0.0),
        Direction::South => Vec2::new(0.0, 1.0),
        Direction::West => Vec2::new(-1.0, 0.0),
    }
}
