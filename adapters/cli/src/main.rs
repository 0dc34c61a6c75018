#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that flies a Nova Siege session headlessly.

mod autopilot;
mod headless;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{anyhow, Context, Result as AnyResult};
use clap::Parser;
use nova_siege_core::{Event, GameState, HudSnapshot};
use nova_siege_rendering::{
    draw_world, palette, FrameControl, Presentation, RenderingBackend,
};
use nova_siege_simulation::{SessionConfig, Simulation, TickInput};
use nova_siege_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{autopilot::Autopilot, headless::HeadlessBackend};

/// Runs a headless Nova Siege session flown by the autopilot.
#[derive(Debug, Parser)]
#[command(name = "nova-siege", version)]
struct Cli {
    /// TOML file with session tuning; missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the session seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 20_000)]
    ticks: u64,
    /// Overrides the simulated tick length in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Log filter applied when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug)]
struct Summary {
    hud: HudSnapshot,
    ticks: u64,
    kills: u32,
}

/// Entry point for the Nova Siege command-line interface.
fn main() -> AnyResult<()> {
    let cli = Cli::parse();
    install_logging(&cli.log_level)?;

    let config = load_config(&cli)?;
    let summary = run_session(&config, cli.ticks)?;

    println!("state: {:?}", summary.hud.state);
    println!("wave: {}/{}", summary.hud.wave, summary.hud.max_waves);
    println!("score: {}", summary.hud.score);
    println!("lives: {}", summary.hud.lives);
    println!("kills: {}", summary.kills);
    println!("ticks: {}", summary.ticks);
    Ok(())
}

fn install_logging(level: &str) -> AnyResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level `{level}`"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to install log subscriber: {error}"))
}

fn load_config(cli: &Cli) -> AnyResult<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => SessionConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_ms = tick_ms;
    }
    Ok(config)
}

fn run_session(config: &SessionConfig, ticks: u64) -> AnyResult<Summary> {
    let mut simulation = Simulation::new(config).context("invalid session configuration")?;
    let presentation = Presentation::new(config.arena, 1.0, palette::BACKGROUND)?;
    let autopilot = Autopilot::new();

    let mut now = Duration::ZERO;
    let mut elapsed = 0;
    let mut kills = 0;
    HeadlessBackend::new(ticks, config.tick_length()).run(
        presentation,
        |delta, input, canvas| {
            now += delta;
            elapsed += 1;

            let world = simulation.world();
            let frame = if input.pointer.is_some() {
                input
            } else {
                autopilot.steer(world)
            };
            let tick = TickInput {
                now,
                pointer: frame
                    .pointer
                    .unwrap_or_else(|| query::player_position(world)),
                keys: frame.keys,
                primary_action: frame.primary_action,
                home_requested: frame.home_requested,
            };

            for event in simulation.step(tick) {
                if matches!(event, Event::EnemyDestroyed { .. }) {
                    kills += 1;
                }
            }
            draw_world(simulation.world(), &presentation, canvas);

            Ok(match simulation.hud().state {
                GameState::GameOver | GameState::Victory => FrameControl::Exit,
                GameState::Home | GameState::Playing => FrameControl::Continue,
            })
        },
    )?;

    let hud = simulation.hud();
    info!(state = ?hud.state, wave = hud.wave, score = hud.score, "session finished");
    Ok(Summary {
        hud,
        ticks: elapsed,
        kills,
    })
}
