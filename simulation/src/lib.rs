#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-order tick driver that wires the world to every gameplay system.
//!
//! A [`Simulation`] owns the [`World`] and one instance of each system. Each
//! call to [`Simulation::step`] applies the host input as commands, lets the
//! systems react to the resulting events, and repeats until no system has
//! anything left to say. Every wave transition therefore completes within the
//! tick of the kill that triggered it.

mod config;
mod seed;

use std::time::Duration;

use glam::Vec2;
use nova_siege_core::{Command, Event, GameState, HudSnapshot, MovementKeys};
use nova_siege_system_boss_combat::{self as boss_combat, BossCombat};
use nova_siege_system_collision::{Collision, Scene};
use nova_siege_system_powerups::PowerupLifecycle;
use nova_siege_system_progression::{Progression, WaveStage};
use nova_siege_system_spawning::{self as spawning, Spawning};
use nova_siege_world::{self as world, query, World};
use tracing::{info, trace};

pub use config::{BossConfig, ConfigError, SessionConfig, SpawningConfig};

/// Input sampled by the host for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickInput {
    /// Timestamp of the tick measured from the start of the host clock.
    pub now: Duration,
    /// Pointer position in arena coordinates.
    pub pointer: Vec2,
    /// Movement keys held during the tick.
    pub keys: MovementKeys,
    /// Whether the primary action (fire, or start from a menu) is pressed.
    pub primary_action: bool,
    /// Whether the host asked to abandon the session for the title screen.
    pub home_requested: bool,
}

/// Owns the world and its systems and advances them one tick at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    spawning: Spawning,
    collision: Collision,
    progression: Progression,
    powerups: PowerupLifecycle,
    boss_combat: BossCombat,
    log: Vec<Event>,
    commands: Vec<Command>,
}

impl Simulation {
    /// Creates a simulation on the title screen using the provided configuration.
    pub fn new(config: &SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let spawning = Spawning::new(spawning::Config::new(
            config.arena,
            config.powerup_interval(),
            config.spawning.placement_attempts,
            seed::stream_seed(config.seed, seed::STREAM_SPAWNING),
        ));
        let collision = Collision::new(seed::stream_seed(config.seed, seed::STREAM_COLLISION));
        let boss_combat = BossCombat::new(boss_combat::Config::new(
            config.boss.volley_interval_ticks,
            config.boss.ring_interval_ticks,
        ));

        info!(
            seed = config.seed,
            width = config.arena.width(),
            height = config.arena.height(),
            "simulation configured"
        );

        Ok(Self {
            world: World::with_arena(config.arena),
            spawning,
            collision,
            progression: Progression::new(),
            powerups: PowerupLifecycle::new(),
            boss_combat,
            log: Vec::new(),
            commands: Vec::new(),
        })
    }

    /// Read-only access to the world for queries and rendering.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// State surfaced to the heads-up display.
    #[must_use]
    pub fn hud(&self) -> HudSnapshot {
        query::hud(&self.world)
    }

    /// Lifecycle stage of the wave being fought.
    #[must_use]
    pub fn wave_stage(&self) -> WaveStage {
        self.progression.stage()
    }

    /// Advances the simulation by one tick and returns every event it produced.
    pub fn step(&mut self, input: TickInput) -> &[Event] {
        self.log.clear();
        let mut fresh = Vec::new();

        let state = query::game_state(&self.world);
        if state != GameState::Playing {
            world::apply(&mut self.world, Command::Tick { now: input.now }, &mut fresh);
            if input.primary_action {
                world::apply(&mut self.world, Command::StartGame, &mut fresh);
            } else if input.home_requested && state != GameState::Home {
                world::apply(&mut self.world, Command::ReturnHome, &mut fresh);
            }
            self.pump(fresh);
            return &self.log;
        }

        if input.home_requested {
            world::apply(&mut self.world, Command::ReturnHome, &mut fresh);
            self.pump(fresh);
            return &self.log;
        }

        world::apply(&mut self.world, Command::Tick { now: input.now }, &mut fresh);
        world::apply(
            &mut self.world,
            Command::MovePlayer {
                keys: input.keys,
                pointer: input.pointer,
            },
            &mut fresh,
        );

        let player = query::player(&self.world);
        self.powerups
            .handle(state, input.now, &player, &mut self.commands);
        self.flush_commands(&mut fresh);

        if input.primary_action {
            world::apply(
                &mut self.world,
                Command::FirePlayerWeapon {
                    pointer: input.pointer,
                },
                &mut fresh,
            );
        }
        self.pump(fresh);

        let mut fresh = Vec::new();
        self.resolve_collisions();
        self.flush_commands(&mut fresh);
        self.pump(fresh);

        trace!(
            tick = query::tick_index(&self.world),
            events = self.log.len(),
            "step complete"
        );
        &self.log
    }

    /// Applies a command outside the regular input flow and lets the systems react.
    pub fn submit(&mut self, command: Command) -> &[Event] {
        self.log.clear();
        let mut fresh = Vec::new();
        world::apply(&mut self.world, command, &mut fresh);
        self.pump(fresh);
        &self.log
    }

    fn resolve_collisions(&mut self) {
        let player = query::player(&self.world);
        let enemies = query::enemy_view(&self.world);
        let boss = query::boss(&self.world);
        let bullets = query::bullets(&self.world);
        let boss_bullets = query::boss_bullets(&self.world);
        let powerups = query::powerups(&self.world);

        self.collision.handle(
            query::game_state(&self.world),
            Scene {
                player: &player,
                enemies: &enemies,
                boss: boss.as_ref(),
                bullets: &bullets,
                boss_bullets: &boss_bullets,
                powerups: &powerups,
            },
            &mut self.commands,
        );
    }

    // Feeds events to the reactive systems until they stop issuing commands.
    fn pump(&mut self, mut pending: Vec<Event>) {
        while !pending.is_empty() {
            let state = query::game_state(&self.world);
            let player = query::player_position(&self.world);
            let boss = query::boss(&self.world);

            self.boss_combat
                .handle(&pending, state, boss.as_ref(), player, &mut self.commands);
            self.progression.handle(&pending, state, &mut self.commands);
            self.spawning
                .handle(&pending, state, player, &mut self.commands);

            self.log.append(&mut pending);
            self.flush_commands(&mut pending);
        }
    }

    fn flush_commands(&mut self, out_events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(simulation: &mut Simulation) {
        let _ = simulation.step(TickInput {
            primary_action: true,
            ..TickInput::default()
        });
    }

    #[test]
    fn rejects_invalid_configuration() {
        let config = SessionConfig {
            tick_ms: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            Simulation::new(&config),
            Err(ConfigError::ZeroTickLength)
        ));
    }

    #[test]
    fn primary_action_starts_a_session_without_firing() {
        let mut simulation = Simulation::new(&SessionConfig::default()).expect("valid config");
        start(&mut simulation);
        assert_eq!(simulation.hud().state, GameState::Playing);
        assert!(query::bullets(simulation.world()).is_empty());
        assert_eq!(
            query::enemy_count(simulation.world()),
            nova_siege_system_spawning::total_enemies(1)
        );
        assert_eq!(simulation.wave_stage(), WaveStage::InProgress);
    }

    #[test]
    fn home_request_abandons_session() {
        let mut simulation = Simulation::new(&SessionConfig::default()).expect("valid config");
        start(&mut simulation);
        let events = simulation.step(TickInput {
            now: Duration::from_millis(16),
            home_requested: true,
            ..TickInput::default()
        });
        assert_eq!(events, &[Event::ReturnedHome]);
        assert_eq!(simulation.hud().state, GameState::Home);
        assert_eq!(query::enemy_count(simulation.world()), 0);
        assert_eq!(simulation.wave_stage(), WaveStage::Idle);
    }
}
