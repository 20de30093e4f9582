#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game-progress state for Maze Hunt.
//!
//! The world owns everything that changes while a hunt plays out: the
//! outstanding objectives, the logical entrance gate, the actors' positions
//! and the outcome. The grid itself is immutable; the world only reads it.

pub mod navigation;

use std::time::Duration;

use glam::Vec2;
use maze_hunt_core::{
    CellCoord, Command, Event, GateState, Grid, Outcome, PursuerSnapshot, TargetSnapshot,
    WELCOME_BANNER,
};
use tracing::{debug, info, warn};

/// Distance in world units at which the pursuer catches the target.
pub const DEFAULT_CATCH_RADIUS: f32 = 0.35;

/// Everything required to stage a hunt.
#[derive(Clone, Debug, PartialEq)]
pub struct Dungeon {
    /// Immutable maze layout.
    pub grid: Grid,
    /// Cells holding the objectives the target must collect.
    pub objectives: Vec<CellCoord>,
    /// Cell where the pursuer starts.
    pub pursuer_spawn: CellCoord,
    /// World-space position where the target starts.
    pub target_spawn: Vec2,
}

/// Represents the authoritative Maze Hunt world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    objectives: Vec<CellCoord>,
    collected: Vec<CellCoord>,
    gate: GateState,
    outcome: Outcome,
    target: Target,
    pursuer: Pursuer,
    catch_radius: f32,
    tick_index: u64,
    elapsed: Duration,
}

#[derive(Clone, Copy, Debug)]
struct Target {
    position: Vec2,
    cell: Option<CellCoord>,
}

#[derive(Clone, Copy, Debug)]
struct Pursuer {
    position: Vec2,
    velocity: Vec2,
}

impl World {
    /// Creates a world ready for the hunt described by `dungeon`.
    ///
    /// Objectives that are not floor cells or that repeat are dropped.
    #[must_use]
    pub fn new(dungeon: Dungeon) -> Self {
        let Dungeon {
            grid,
            objectives,
            pursuer_spawn,
            target_spawn,
        } = dungeon;

        let mut accepted: Vec<CellCoord> = Vec::with_capacity(objectives.len());
        for cell in objectives {
            if !grid.is_floor(cell) || accepted.contains(&cell) {
                warn!(?cell, "dropping objective that is not a distinct floor cell");
                continue;
            }
            accepted.push(cell);
        }

        let target = Target {
            position: target_spawn,
            cell: grid.cell_containing(target_spawn),
        };
        let pursuer = Pursuer {
            position: grid.cell_center(pursuer_spawn),
            velocity: Vec2::ZERO,
        };

        Self {
            banner: WELCOME_BANNER,
            grid,
            objectives: accepted,
            collected: Vec::new(),
            gate: GateState::NeverOpened,
            outcome: Outcome::InProgress,
            target,
            pursuer,
            catch_radius: DEFAULT_CATCH_RADIUS,
            tick_index: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Replaces the capture distance.
    #[must_use]
    pub fn with_catch_radius(mut self, catch_radius: f32) -> Self {
        self.catch_radius = catch_radius.max(0.0);
        self
    }

    fn set_gate(&mut self, state: GateState, out_events: &mut Vec<Event>) {
        if self.gate == state {
            return;
        }
        debug!(from = ?self.gate, to = ?state, "gate changed");
        self.gate = state;
        out_events.push(Event::GateChanged { state });
    }

    fn conclude(&mut self, outcome: Outcome) {
        info!(?outcome, tick = self.tick_index, "hunt concluded");
        self.outcome = outcome;
        self.pursuer.velocity = Vec2::ZERO;
    }

    fn collect(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let Some(index) = self.objectives.iter().position(|objective| *objective == cell) else {
            out_events.push(Event::ObjectiveRejected { cell });
            return;
        };

        let _ = self.objectives.remove(index);
        self.collected.push(cell);
        let remaining = u32::try_from(self.objectives.len()).unwrap_or(u32::MAX);
        debug!(?cell, remaining, "objective collected");
        out_events.push(Event::ObjectiveCollected { cell, remaining });

        if remaining == 0 {
            self.set_gate(GateState::Open, out_events);
        }
    }

    fn move_target(&mut self, position: Vec2, out_events: &mut Vec<Event>) {
        let entrance = self.grid.entrance();
        let from = self.target.cell;
        let to = self.grid.cell_containing(position);

        if to == Some(entrance) && from != to && !self.gate.is_passable() {
            out_events.push(Event::TargetBlocked { cell: entrance });
            return;
        }
        let crossing = match (from, to) {
            (Some(cell), None) | (None, Some(cell)) => Some(cell),
            _ => None,
        };
        if let Some(cell) = crossing.filter(|cell| *cell != entrance) {
            debug!(?cell, "target crossed the maze boundary away from the entrance");
            out_events.push(Event::TargetConfined { cell });
            return;
        }

        self.target.position = position;
        if from == to {
            return;
        }
        self.target.cell = to;
        out_events.push(Event::TargetMoved { from, to });

        let left_threshold = from.is_some() && from == self.grid.entrance_inward();
        let entered_maze = to.map_or(false, |cell| cell != entrance);
        if self.gate == GateState::NeverOpened
            && left_threshold
            && entered_maze
            && !self.objectives.is_empty()
        {
            self.set_gate(GateState::Closed, out_events);
        }

        if let Some(cell) = to {
            if self.objectives.contains(&cell) {
                self.collect(cell, out_events);
            }
        }

        if to.is_none()
            && from == Some(entrance)
            && self.gate.is_passable()
            && self.objectives.is_empty()
        {
            self.conclude(Outcome::Escaped);
            out_events.push(Event::TargetEscaped);
        }
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.pursuer.position += self.pursuer.velocity * dt.as_secs_f32();

        let Some(cell) = self.target.cell.filter(|cell| self.grid.is_floor(*cell)) else {
            return;
        };
        if self.pursuer.position.distance(self.target.position) <= self.catch_radius {
            self.conclude(Outcome::Caught);
            out_events.push(Event::TargetCaught { cell });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if let Command::Tick { dt } = command {
        world.tick_index = world.tick_index.saturating_add(1);
        world.elapsed = world.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });
        if !world.outcome.is_decided() {
            world.advance(dt, out_events);
        }
        return;
    }

    if world.outcome.is_decided() {
        return;
    }

    match command {
        Command::Tick { .. } => {}
        Command::MoveTarget { position } => world.move_target(position, out_events),
        Command::SteerPursuer { velocity } => {
            world.pursuer.velocity = velocity;
        }
        Command::CollectObjective { cell } => world.collect(cell, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use maze_hunt_core::{
        CellCoord, GateState, Grid, Outcome, PursuerSnapshot, TargetSnapshot,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the maze layout.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Objectives that have not been collected yet.
    #[must_use]
    pub fn objectives(world: &World) -> &[CellCoord] {
        &world.objectives
    }

    /// Objectives collected so far, in collection order.
    #[must_use]
    pub fn collected(world: &World) -> &[CellCoord] {
        &world.collected
    }

    /// Number of objectives still outstanding.
    #[must_use]
    pub fn remaining_objectives(world: &World) -> u32 {
        u32::try_from(world.objectives.len()).unwrap_or(u32::MAX)
    }

    /// Current state of the entrance gate.
    #[must_use]
    pub fn gate(world: &World) -> GateState {
        world.gate
    }

    /// Current outcome of the hunt.
    #[must_use]
    pub fn outcome(world: &World) -> Outcome {
        world.outcome
    }

    /// Captures the pursuer's state.
    #[must_use]
    pub fn pursuer(world: &World) -> PursuerSnapshot {
        super::pursuer_snapshot(world)
    }

    /// Captures the target's state.
    #[must_use]
    pub fn target(world: &World) -> TargetSnapshot {
        super::target_snapshot(world)
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Simulated time accumulated across all ticks.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }
}

fn pursuer_snapshot(world: &World) -> PursuerSnapshot {
    PursuerSnapshot {
        position: world.pursuer.position,
        velocity: world.pursuer.velocity,
        cell: world.grid.cell_containing(world.pursuer.position),
    }
}

fn target_snapshot(world: &World) -> TargetSnapshot {
    TargetSnapshot {
        position: world.target.position,
        cell: world.target.cell,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = "
        #######
        #.....#
        E.###.#
        #.....#
        #######
    ";

    fn dungeon() -> Dungeon {
        let grid = Grid::parse(LAYOUT).expect("valid layout");
        let target_spawn = grid.cell_center(grid.entrance()) - Vec2::new(1.0, 0.0);
        Dungeon {
            grid,
            objectives: vec![CellCoord::new(5, 1), CellCoord::new(5, 3)],
            pursuer_spawn: CellCoord::new(5, 2),
            target_spawn,
        }
    }

    fn walk(world: &mut World, cells: &[CellCoord]) -> Vec<Event> {
        let mut events = Vec::new();
        for cell in cells {
            let position = query::grid(world).cell_center(*cell);
            apply(world, Command::MoveTarget { position }, &mut events);
        }
        events
    }

    #[test]
    fn new_world_starts_outside_with_gate_never_opened() {
        let world = World::new(dungeon());

        assert_eq!(query::gate(&world), GateState::NeverOpened);
        assert_eq!(query::outcome(&world), Outcome::InProgress);
        assert_eq!(query::target(&world).cell, None);
        assert_eq!(query::pursuer(&world).cell, Some(CellCoord::new(5, 2)));
        assert_eq!(query::remaining_objectives(&world), 2);
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn invalid_objectives_are_dropped() {
        let mut staged = dungeon();
        staged.objectives = vec![
            CellCoord::new(5, 1),
            CellCoord::new(5, 1),
            CellCoord::new(0, 0),
            CellCoord::new(40, 40),
        ];
        let world = World::new(staged);

        assert_eq!(query::objectives(&world), &[CellCoord::new(5, 1)]);
    }

    #[test]
    fn gate_closes_once_target_moves_past_threshold() {
        let mut world = World::new(dungeon());
        let events = walk(
            &mut world,
            &[
                CellCoord::new(0, 2),
                CellCoord::new(1, 2),
                CellCoord::new(1, 1),
            ],
        );

        assert_eq!(query::gate(&world), GateState::Closed);
        assert!(events.contains(&Event::GateChanged {
            state: GateState::Closed
        }));
        assert!(events.contains(&Event::TargetMoved {
            from: None,
            to: Some(CellCoord::new(0, 2)),
        }));
    }

    #[test]
    fn stepping_back_to_entrance_does_not_close_gate() {
        let mut world = World::new(dungeon());
        let _ = walk(
            &mut world,
            &[
                CellCoord::new(0, 2),
                CellCoord::new(1, 2),
                CellCoord::new(0, 2),
            ],
        );

        assert_eq!(query::gate(&world), GateState::NeverOpened);
    }

    #[test]
    fn closed_gate_blocks_entrance() {
        let mut world = World::new(dungeon());
        let _ = walk(
            &mut world,
            &[
                CellCoord::new(0, 2),
                CellCoord::new(1, 2),
                CellCoord::new(1, 1),
                CellCoord::new(1, 2),
            ],
        );
        let events = walk(&mut world, &[CellCoord::new(0, 2)]);

        assert_eq!(
            events,
            vec![Event::TargetBlocked {
                cell: CellCoord::new(0, 2)
            }]
        );
        assert_eq!(query::target(&world).cell, Some(CellCoord::new(1, 2)));
    }

    #[test]
    fn boundary_is_crossed_only_at_the_entrance() {
        let mut world = World::new(dungeon());
        let outside = query::target(&world).position;
        let inward = CellCoord::new(1, 2);

        let mut events = Vec::new();
        let shortcut = query::grid(&world).cell_center(inward);
        apply(&mut world, Command::MoveTarget { position: shortcut }, &mut events);
        assert_eq!(events, vec![Event::TargetConfined { cell: inward }]);
        assert_eq!(query::target(&world).position, outside);

        let _ = walk(&mut world, &[CellCoord::new(0, 2), inward]);
        let mut events = Vec::new();
        apply(&mut world, Command::MoveTarget { position: outside }, &mut events);

        assert_eq!(events, vec![Event::TargetConfined { cell: inward }]);
        assert_eq!(query::target(&world).cell, Some(inward));
        assert_eq!(query::gate(&world), GateState::NeverOpened);
    }

    #[test]
    fn collecting_every_objective_opens_gate() {
        let mut world = World::new(dungeon());
        let route = [
            CellCoord::new(0, 2),
            CellCoord::new(1, 2),
            CellCoord::new(1, 1),
            CellCoord::new(2, 1),
            CellCoord::new(3, 1),
            CellCoord::new(4, 1),
            CellCoord::new(5, 1),
        ];
        let events = walk(&mut world, &route);
        assert!(events.contains(&Event::ObjectiveCollected {
            cell: CellCoord::new(5, 1),
            remaining: 1,
        }));
        assert_eq!(query::gate(&world), GateState::Closed);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::CollectObjective {
                cell: CellCoord::new(5, 3),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::ObjectiveCollected {
                    cell: CellCoord::new(5, 3),
                    remaining: 0,
                },
                Event::GateChanged {
                    state: GateState::Open
                },
            ]
        );
        assert_eq!(
            query::collected(&world),
            &[CellCoord::new(5, 1), CellCoord::new(5, 3)]
        );
    }

    #[test]
    fn collecting_twice_is_rejected() {
        let mut world = World::new(dungeon());
        let mut events = Vec::new();
        let cell = CellCoord::new(5, 1);

        apply(&mut world, Command::CollectObjective { cell }, &mut events);
        apply(&mut world, Command::CollectObjective { cell }, &mut events);

        assert_eq!(
            events,
            vec![
                Event::ObjectiveCollected { cell, remaining: 1 },
                Event::ObjectiveRejected { cell },
            ]
        );
    }

    #[test]
    fn target_escapes_through_open_gate() {
        let mut world = World::new(dungeon());
        let mut events = Vec::new();
        for cell in [CellCoord::new(5, 1), CellCoord::new(5, 3)] {
            apply(&mut world, Command::CollectObjective { cell }, &mut events);
        }
        let _ = walk(
            &mut world,
            &[
                CellCoord::new(0, 2),
                CellCoord::new(1, 2),
                CellCoord::new(0, 2),
            ],
        );

        let outside = query::grid(&world).cell_center(CellCoord::new(0, 2)) - Vec2::new(1.0, 0.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MoveTarget { position: outside },
            &mut events,
        );

        assert_eq!(query::outcome(&world), Outcome::Escaped);
        assert_eq!(events.last(), Some(&Event::TargetEscaped));
    }

    #[test]
    fn leaving_without_objectives_is_not_an_escape() {
        let mut world = World::new(dungeon());
        let _ = walk(&mut world, &[CellCoord::new(0, 2)]);
        let outside = query::grid(&world).cell_center(CellCoord::new(0, 2)) - Vec2::new(1.0, 0.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MoveTarget { position: outside },
            &mut events,
        );

        assert_eq!(query::outcome(&world), Outcome::InProgress);
        assert!(!events.contains(&Event::TargetEscaped));
    }

    #[test]
    fn tick_integrates_pursuer_velocity() {
        let mut world = World::new(dungeon());
        let start = query::pursuer(&world).position;
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SteerPursuer {
                velocity: Vec2::new(0.0, -1.0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(500),
            },
            &mut events,
        );

        let pursuer = query::pursuer(&world);
        assert!((pursuer.position - (start + Vec2::new(0.0, -0.5))).length() < 1e-5);
        assert_eq!(query::tick_index(&world), 1);
        assert_eq!(query::elapsed(&world), Duration::from_millis(500));
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(500)
            }]
        );
    }

    #[test]
    fn pursuer_catches_target_within_radius() {
        let mut world = World::new(dungeon());
        let _ = walk(
            &mut world,
            &[
                CellCoord::new(0, 2),
                CellCoord::new(1, 2),
                CellCoord::new(1, 1),
                CellCoord::new(2, 1),
                CellCoord::new(3, 1),
                CellCoord::new(4, 1),
            ],
        );
        let target = query::target(&world).position;
        let velocity = (target - query::pursuer(&world).position) * 2.0;
        let mut events = Vec::new();
        apply(&mut world, Command::SteerPursuer { velocity }, &mut events);
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(500),
            },
            &mut events,
        );

        assert_eq!(query::outcome(&world), Outcome::Caught);
        assert!(events.contains(&Event::TargetCaught {
            cell: CellCoord::new(4, 1)
        }));
        assert_eq!(query::pursuer(&world).velocity, Vec2::ZERO);
    }

    #[test]
    fn target_outside_maze_cannot_be_caught() {
        let mut staged = dungeon();
        staged.pursuer_spawn = staged.grid.entrance();
        let target_spawn = staged.target_spawn;
        let mut world = World::new(staged).with_catch_radius(2.0);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );

        assert_eq!(query::target(&world).position, target_spawn);
        assert_eq!(query::outcome(&world), Outcome::InProgress);
    }

    #[test]
    fn decided_world_ignores_commands_but_keeps_time() {
        let mut world = World::new(dungeon());
        let mut events = Vec::new();
        for cell in [CellCoord::new(5, 1), CellCoord::new(5, 3)] {
            apply(&mut world, Command::CollectObjective { cell }, &mut events);
        }
        let _ = walk(&mut world, &[CellCoord::new(0, 2)]);
        let outside = query::grid(&world).cell_center(CellCoord::new(0, 2)) - Vec2::new(1.0, 0.0);
        apply(
            &mut world,
            Command::MoveTarget { position: outside },
            &mut events,
        );
        assert_eq!(query::outcome(&world), Outcome::Escaped);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SteerPursuer {
                velocity: Vec2::new(1.0, 0.0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
            &mut events,
        );

        assert_eq!(query::pursuer(&world).velocity, Vec2::ZERO);
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(100)
            }]
        );
    }
}
