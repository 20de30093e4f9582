#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic pursuit system that steers the pursuer down a distance field.
//!
//! Every tick the system seeds a fresh distance field at the target's cell and
//! moves the pursuer toward the neighbouring cell one step closer. Once the
//! pursuer shares or borders the target's cell it abandons the grid and closes
//! in on the target's exact position.

use std::time::Duration;

use glam::Vec2;
use maze_hunt_core::{
    CellCoord, Command, Direction, Event, Grid, Outcome, PursuerSnapshot, TargetSnapshot,
};
use maze_hunt_world::navigation::{compute_distances, DistanceField};
use tracing::trace;

/// Neighbour scan order used when looking for a downhill step.
const SCAN_ORDER: [Direction; 4] = [
    Direction::East,
    Direction::West,
    Direction::South,
    Direction::North,
];

/// Speed parameters for the pursuit policy, in world units per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PursuitTuning {
    /// Upper bound on speed while following the distance gradient.
    pub follow_max_speed: f32,
    /// Speed floor added to the distance term while following.
    pub follow_base_speed: f32,
    /// Speed gained per unit of distance to the next cell centre.
    pub follow_gain: f32,
    /// Upper bound on speed during the final approach.
    pub arrive_max_speed: f32,
    /// Speed gained per unit of distance to the target during the final approach.
    pub arrive_gain: f32,
    /// Distances below this are treated as zero.
    pub epsilon: f32,
}

impl Default for PursuitTuning {
    fn default() -> Self {
        Self {
            follow_max_speed: 1.5,
            follow_base_speed: 0.6,
            follow_gain: 1.0,
            arrive_max_speed: 0.5,
            arrive_gain: 2.0,
            epsilon: 1e-3,
        }
    }
}

/// Pursuer location as seen by the policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PursuerProbe {
    /// Cell containing the pursuer, `None` when off-grid.
    pub cell: Option<CellCoord>,
    /// Exact planar position.
    pub position: Vec2,
}

impl From<PursuerSnapshot> for PursuerProbe {
    fn from(snapshot: PursuerSnapshot) -> Self {
        Self {
            cell: snapshot.cell,
            position: snapshot.position,
        }
    }
}

/// Target location as seen by the policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetProbe {
    /// Cell containing the target, `None` when off-grid.
    pub cell: Option<CellCoord>,
    /// Exact planar position.
    pub position: Vec2,
}

impl From<TargetSnapshot> for TargetProbe {
    fn from(snapshot: TargetSnapshot) -> Self {
        Self {
            cell: snapshot.cell,
            position: snapshot.position,
        }
    }
}

/// Steering decision for a single tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PursuitStep {
    /// Stand still.
    Hold,
    /// Close in on the target's exact position.
    Arrive {
        /// Point being approached.
        toward: Vec2,
        /// Speed in world units per second.
        speed: f32,
    },
    /// Move toward the centre of a downhill neighbour.
    Follow {
        /// Direction of the chosen neighbour.
        direction: Direction,
        /// Centre of the chosen neighbour.
        toward: Vec2,
        /// Speed in world units per second.
        speed: f32,
    },
}

impl PursuitStep {
    /// Planar velocity that carries a pursuer at `from` along this step.
    #[must_use]
    pub fn velocity(self, from: Vec2) -> Vec2 {
        match self {
            PursuitStep::Hold => Vec2::ZERO,
            PursuitStep::Arrive { toward, speed } | PursuitStep::Follow { toward, speed, .. } => {
                (toward - from).normalize_or_zero() * speed
            }
        }
    }

    /// Velocity like [`PursuitStep::velocity`], slowed so that integrating it
    /// over `horizon` stops at `toward` instead of passing it.
    #[must_use]
    pub fn velocity_within(self, from: Vec2, horizon: Duration) -> Vec2 {
        let velocity = self.velocity(from);
        let seconds = horizon.as_secs_f32();
        match self {
            PursuitStep::Hold => velocity,
            _ if seconds <= 0.0 => velocity,
            PursuitStep::Arrive { toward, .. } | PursuitStep::Follow { toward, .. } => {
                velocity.clamp_length_max(from.distance(toward) / seconds)
            }
        }
    }
}

/// Decides how the pursuer should move given a field seeded at the target.
///
/// The decision depends only on the arguments. Invalid inputs (target off the
/// floor, pursuer off-grid or cut off from the target) produce
/// [`PursuitStep::Hold`].
#[must_use]
pub fn choose_pursuit_step(
    grid: &Grid,
    pursuer: PursuerProbe,
    target: TargetProbe,
    field: &DistanceField,
    tuning: &PursuitTuning,
) -> PursuitStep {
    if target.cell.map_or(true, |cell| !grid.is_floor(cell)) {
        return PursuitStep::Hold;
    }
    let Some(pursuer_cell) = pursuer.cell else {
        return PursuitStep::Hold;
    };
    let Some(own_distance) = field.distance(pursuer_cell) else {
        return PursuitStep::Hold;
    };

    if own_distance <= 1 {
        let remaining = pursuer.position.distance(target.position);
        let speed = if remaining < tuning.epsilon {
            0.0
        } else {
            (remaining * tuning.arrive_gain).min(tuning.arrive_max_speed)
        };
        return PursuitStep::Arrive {
            toward: target.position,
            speed,
        };
    }

    let mut best_distance = own_distance;
    let mut best: Option<(Direction, CellCoord)> = None;
    for direction in SCAN_ORDER {
        let Some(neighbor) = pursuer_cell.step(direction) else {
            continue;
        };
        let Some(distance) = field.distance(neighbor) else {
            continue;
        };
        if distance < best_distance {
            best_distance = distance;
            best = Some((direction, neighbor));
        }
    }

    let Some((direction, neighbor)) = best else {
        return PursuitStep::Hold;
    };
    let toward = grid.cell_center(neighbor);
    let remaining = pursuer.position.distance(toward);
    PursuitStep::Follow {
        direction,
        toward,
        speed: (tuning.follow_base_speed + remaining * tuning.follow_gain)
            .min(tuning.follow_max_speed),
    }
}

/// Pure system that reacts to world events and emits pursuer steering commands.
#[derive(Debug, Default)]
pub struct Pursuit {
    tuning: PursuitTuning,
    last_step: Option<PursuitStep>,
}

impl Pursuit {
    /// Creates a pursuit system with the provided tuning.
    #[must_use]
    pub fn new(tuning: PursuitTuning) -> Self {
        Self {
            tuning,
            last_step: None,
        }
    }

    /// Tuning in effect.
    #[must_use]
    pub fn tuning(&self) -> &PursuitTuning {
        &self.tuning
    }

    /// Decision taken on the most recent tick, if any.
    #[must_use]
    pub fn last_step(&self) -> Option<PursuitStep> {
        self.last_step
    }

    /// Consumes world events and snapshots to emit a steering command per tick.
    ///
    /// The latest tick length is taken as the horizon of the next one, so the
    /// pursuer never passes the point it steers toward while ticks stay even.
    pub fn handle(
        &mut self,
        events: &[Event],
        grid: &Grid,
        pursuer: PursuerSnapshot,
        target: TargetSnapshot,
        outcome: Outcome,
        out: &mut Vec<Command>,
    ) {
        if outcome.is_decided() {
            return;
        }
        let Some(horizon) = events.iter().rev().find_map(|event| match event {
            Event::TimeAdvanced { dt } => Some(*dt),
            _ => None,
        }) else {
            return;
        };

        let step = match target.cell {
            Some(source) => {
                let field = compute_distances(grid, source);
                choose_pursuit_step(
                    grid,
                    PursuerProbe::from(pursuer),
                    TargetProbe::from(target),
                    &field,
                    &self.tuning,
                )
            }
            None => PursuitStep::Hold,
        };

        let previous = self.last_step.as_ref().map(std::mem::discriminant);
        if previous != Some(std::mem::discriminant(&step)) {
            trace!(?step, "pursuit mode changed");
        }
        self.last_step = Some(step);
        out.push(Command::SteerPursuer {
            velocity: step.velocity_within(pursuer.position, horizon),
        });
    }
}
