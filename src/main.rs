//! Katamari headless entry point
//!
//! Loads settings, scatters a seeded pickup field with a couple of portals,
//! and rolls the ball around on a scripted route while logging progress.

use std::path::PathBuf;

use clap::Parser;
use env_logger::{Builder, Env};
use glam::{Vec2, Vec3};
use log::LevelFilter;

use katamari::Settings;
use katamari::sim::{Dimension, GameEvent, Session, TickInput, scatter_pickups};

/// Presentation frame rate of the scripted run
const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Debug, Parser)]
#[command(name = "katamari", about = "Roll up everything smaller than you")]
struct Args {
    /// JSON settings file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Frames to simulate
    #[arg(long, default_value_t = 3600)]
    frames: u32,
    /// Pickup field seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Number of pickups to scatter
    #[arg(long, default_value_t = 200)]
    pickups: usize,
    /// Log debug output
    #[arg(long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    // Only fails if a logger is already installed
    let _ = Builder::from_env(env).try_init();
}

/// Steady forward roll with a slow camera sweep; tries to switch dimension
/// every five seconds (only works while inside a portal)
fn scripted_input(frame: u32) -> TickInput {
    let t = frame as f32 * FRAME_DT;
    TickInput {
        move_axis: Vec2::new((t * 0.3).sin() * 0.4, 1.0),
        look_delta: Vec2::new(0.25, ((t * 0.5).sin()) * 0.002),
        switch_dimension: frame > 0 && frame % 300 == 0,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);
    log::info!("Katamari (headless) starting...");

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => {
            log::info!("Using default settings");
            Settings::default()
        }
    };

    let mut session = Session::new(settings)?;
    scatter_pickups(&mut session, args.seed, args.pickups, 25.0);
    for position in [Vec3::new(0.0, 1.0, 6.0), Vec3::new(-8.0, 1.0, 14.0)] {
        session.spawn_portal(position, Vec3::new(2.0, 1.0, 2.0));
    }
    session.spawn_scenery(Vec3::new(0.0, 1.0, 30.0), Vec3::new(30.0, 1.0, 0.5), Dimension::Normal);
    session.spawn_scenery(Vec3::new(0.0, 1.0, -30.0), Vec3::new(30.0, 1.0, 0.5), Dimension::Inverted);
    log::info!("Game initialized with seed: {}", args.seed);

    let mut absorbed = 0usize;
    for frame in 0..args.frames {
        session.advance(FRAME_DT, &scripted_input(frame));
        for event in session.drain_events() {
            match event {
                GameEvent::Absorbed { .. } => absorbed += 1,
                GameEvent::DimensionChanged(dimension) => {
                    log::info!("Frame {frame}: now in {dimension:?} dimension")
                }
                GameEvent::Milestone { radius_increase } => {
                    log::info!("Frame {frame}: camera orbits +{radius_increase:.2}")
                }
            }
        }
    }

    let body = session.body();
    log::info!(
        "Done after {} ticks: absorbed {absorbed}, radius {:.3}, mass {:.2}, speed {:.2}, score {:.2}",
        session.time_ticks,
        body.radius,
        body.mass,
        body.speed(),
        session.score()
    );
    Ok(())
}
