#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Revert simulation.

mod ascii;
mod autopilot;

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    sync::{mpsc, Arc, Mutex, PoisonError},
    thread,
};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use revert_core::Clock;
use revert_system_input::Controller;
use revert_system_objectives::{Objective, ScoreObjective, TimeObjective, OBJECTIVE_KINDS};
use revert_world::{query, Config, RenderHandle, TileMap, World};

use crate::{ascii::AsciiCanvas, autopilot::Autopilot};

/// Level used when no `--level` file is given.
const DEFAULT_LEVEL: &str = "
    ........................................
    ........................................
    ....S..........######..........S........
    ..........####..........####............
    .....................S..................
    ...####.........................####....
    ........................................
    ########################################
";

/// Bonus awarded for meeting the score objective in full.
const SCORE_OBJECTIVE_REWARD: u64 = 5_000;

#[derive(Debug, Parser)]
#[command(name = "revert")]
#[command(about = "Run a headless Revert simulation driven by a scripted player")]
struct Args {
    /// Path to a TOML simulation config; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Path to an ASCII level: `#` solid, `.` open, `S` spawn point.
    #[arg(long)]
    level: Option<PathBuf>,
    /// Tile width in pixels.
    #[arg(long, default_value_t = 16)]
    tile_width: u32,
    /// Tile height in pixels.
    #[arg(long, default_value_t = 32)]
    tile_height: u32,
    /// Timer period in milliseconds.
    #[arg(long, default_value_t = 20)]
    period_ms: u64,
    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 3_000)]
    frames: u64,
    /// Overrides the wave layout seed from the config.
    #[arg(long)]
    seed: Option<u64>,
    /// Draw every n-th frame to stdout; 0 draws only the final frame.
    #[arg(long, default_value_t = 0)]
    render_every: u64,
    /// Width of the drawn view in tiles.
    #[arg(long, default_value_t = 24)]
    view_columns: usize,
    /// Height of the drawn view in tiles.
    #[arg(long, default_value_t = 8)]
    view_rows: usize,
}

/// Entry point for the Revert command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_ref())?;
    if let Some(seed) = args.seed {
        config.spawn_seed = seed;
    }
    let map = load_level(args.level.as_ref(), args.tile_width, args.tile_height)?;
    let clock = Clock::from_period_nanos(args.period_ms.saturating_mul(1_000_000));

    let score_target = u64::from(config.waves)
        * config.wave_size as u64
        * (config.kill_bonus + config.hit_bonus);
    let time_limit = config.waves as f32 * config.wave_time_allowance;
    let score_objective = Arc::new(Mutex::new(ScoreObjective::new(
        score_target,
        SCORE_OBJECTIVE_REWARD,
    )));
    let time_objective = Arc::new(Mutex::new(TimeObjective::new(time_limit)));

    let mut world = World::with_map(config, clock, map);
    let _ = world.subscribe(&OBJECTIVE_KINDS, Arc::clone(&score_objective));
    let _ = world.subscribe(&OBJECTIVE_KINDS, Arc::clone(&time_objective));

    for objective in [
        &*lock(&score_objective) as &dyn Objective,
        &*lock(&time_objective),
    ] {
        println!("objective: {}", objective.message());
    }

    let (frames_tx, frames_rx) = mpsc::sync_channel::<u64>(2);
    let renderer = {
        let handle = world.render_handle();
        let (columns, rows) = (args.view_columns, args.view_rows);
        thread::Builder::new()
            .name("render".to_owned())
            .spawn(move || render_loop(&handle, &frames_rx, columns, rows))
            .context("failed to start render thread")?
    };

    let frames = simulate(&mut world, &args, &frames_tx);
    drop(frames_tx);
    let drawn = renderer
        .join()
        .map_err(|_| anyhow!("render thread panicked"))?;

    let mut canvas = AsciiCanvas::new(args.view_columns, args.view_rows);
    world.display(&mut canvas);
    println!("{}", canvas.render());

    let score_objective = lock(&score_objective);
    let time_objective = lock(&time_objective);
    let player = query::player(&world);
    println!("frames:      {frames} ({drawn} drawn)");
    println!(
        "waves:       {}/{}{}",
        query::current_wave(&world),
        query::total_waves(&world),
        if world.done() { " cleared" } else { "" }
    );
    println!("score:       {}", query::score(&world));
    println!("time:        {:.1}", query::elapsed_time(&world));
    println!("time bonus:  {}", query::time_bonus(&world));
    println!("player:      health {} ammo {}", player.health(), player.ammo());
    for (name, objective) in [
        ("score rank:", &*score_objective as &dyn Objective),
        ("time rank: ", &*time_objective),
    ] {
        println!(
            "{name}  {} (bonus {})",
            objective.rank().label(),
            objective.bonus()
        );
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let Some(path) = path else {
        let config = Config::default();
        config.validate().context("default config is invalid")?;
        return Ok(config);
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    Config::from_toml_str(&contents)
        .with_context(|| format!("failed to load config from {}", path.display()))
}

fn load_level(path: Option<&PathBuf>, tile_width: u32, tile_height: u32) -> Result<TileMap> {
    let contents = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read level at {}", path.display()))?,
        None => DEFAULT_LEVEL.to_owned(),
    };
    TileMap::parse(&contents, tile_width, tile_height).context("failed to parse level")
}

/// Runs the update loop until the level is done or the frame budget is spent.
fn simulate(world: &mut World, args: &Args, frames_tx: &mpsc::SyncSender<u64>) -> u64 {
    let mut controller = Controller::new();
    let mut autopilot = Autopilot::default();
    let mut frame = 0;

    tracing::info!(frames = args.frames, "simulation started");
    while frame < args.frames && !world.done() {
        for event in autopilot.plan(world, frame) {
            let _ = controller.dispatch(event, world);
        }
        world.update();
        frame += 1;

        let due = args.render_every > 0 && frame % args.render_every == 0;
        if due && frames_tx.send(frame).is_err() {
            tracing::warn!(frame, "render thread stopped early");
        }
    }
    tracing::info!(
        frame,
        score = query::score(world),
        done = world.done(),
        "simulation finished"
    );
    frame
}

fn render_loop(
    handle: &RenderHandle,
    frames: &mpsc::Receiver<u64>,
    columns: usize,
    rows: usize,
) -> usize {
    let mut drawn = 0;
    for frame in frames {
        let mut canvas = AsciiCanvas::new(columns, rows);
        handle.display(&mut canvas);
        let bullets = handle.bullet_count();
        let mut out = io::stdout().lock();
        if writeln!(out, "frame {frame} ({bullets} bullets)\n{}\n", canvas.render()).is_err() {
            break;
        }
        drawn += 1;
    }
    drawn
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
