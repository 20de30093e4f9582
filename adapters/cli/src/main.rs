#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Maze Hunt chase.

mod narration;
mod render;
mod script;

use std::time::Duration;

use anyhow::{anyhow, ensure, Context, Result};
use clap::Parser;
use maze_hunt_core::{Command, Outcome};
use maze_hunt_system_bootstrap::{Bootstrap, Config};
use maze_hunt_system_pursuit::Pursuit;
use maze_hunt_world::{self as world, query, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::script::ScriptedTarget;

/// Headless Maze Hunt chase between a scripted target and the pursuer.
#[derive(Debug, Parser)]
#[command(name = "maze-hunt", version, long_about = None)]
struct Args {
    /// Number of maze columns.
    #[arg(long, default_value_t = 30)]
    width: u32,
    /// Number of maze rows.
    #[arg(long, default_value_t = 30)]
    height: u32,
    /// Number of objectives to hide in dead ends.
    #[arg(long, default_value_t = 3)]
    objectives: usize,
    /// Seed for maze generation; derived from the clock when absent.
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of simulation ticks.
    #[arg(long, default_value_t = 2000)]
    ticks: u32,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 50)]
    dt_ms: u64,
    /// Scripted target speed in cells per second.
    #[arg(long, default_value_t = 2.0)]
    target_speed: f32,
    /// Print the maze before and after the chase.
    #[arg(long)]
    render: bool,
}

impl Args {
    fn bootstrap_config(&self) -> Config {
        let config = Config {
            width: self.width,
            height: self.height,
            objective_count: self.objectives,
            seed: 0,
        };
        match self.seed {
            Some(seed) => Config { seed, ..config },
            None => config.with_time_seed(),
        }
    }
}

/// Entry point for the Maze Hunt command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing()?;

    ensure!(args.dt_ms > 0, "--dt-ms must be positive");
    ensure!(
        args.target_speed.is_finite() && args.target_speed > 0.0,
        "--target-speed must be a positive number"
    );

    let config = args.bootstrap_config();
    let mut world = Bootstrap::build(config).with_context(|| {
        format!(
            "failed to stage a {}x{} maze with seed {}",
            config.width, config.height, config.seed
        )
    })?;
    info!(seed = config.seed, "session seed");

    let bootstrap = Bootstrap;
    println!("{}", bootstrap.welcome_banner(&world));
    println!("{}", narration::INTRO);
    if args.render {
        print!("{}", render::render(&world));
    }

    let total = query::remaining_objectives(&world);
    run(&mut world, &args);

    if args.render {
        print!("{}", render::render(&world));
    }
    println!("{}", summary(&world, total));
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("failed to initialise logging: {error}"))
}

fn run(world: &mut World, args: &Args) {
    let dt = Duration::from_millis(args.dt_ms);
    let mut pursuit = Pursuit::default();
    let mut target = ScriptedTarget::new(args.target_speed, query::target(world).position);

    for _ in 0..args.ticks {
        let mut events = Vec::new();
        world::apply(world, Command::Tick { dt }, &mut events);

        let mut commands = Vec::new();
        pursuit.handle(
            &events,
            query::grid(world),
            query::pursuer(world),
            query::target(world),
            query::outcome(world),
            &mut commands,
        );
        if !query::outcome(world).is_decided() {
            if let Some(position) = target.advance(world, dt) {
                commands.push(Command::MoveTarget { position });
            }
        }
        for command in commands {
            world::apply(world, command, &mut events);
        }

        for line in events.iter().filter_map(narration::narrate) {
            println!("{line}");
        }
        if query::outcome(world).is_decided() {
            break;
        }
    }
}

fn summary(world: &World, total: u32) -> String {
    let verdict = match query::outcome(world) {
        Outcome::Caught => "caught",
        Outcome::Escaped => "escaped",
        Outcome::InProgress => "out of time",
    };
    format!(
        "{verdict} after {} ticks ({:.2}s), objectives collected {}/{total}",
        query::tick_index(world),
        query::elapsed(world).as_secs_f32(),
        query::collected(world).len(),
    )
}
