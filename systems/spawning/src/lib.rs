#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for populating waves and pickups.

use std::time::Duration;

use glam::Vec2;
use nova_siege_core::{Arena, BossKind, Command, Event, GameState, PowerupKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

const EDGE_MARGIN: f32 = 50.0;
const PICKUP_MARGIN: f32 = 50.0;
const MIN_PLAYER_DISTANCE: f32 = 150.0;

const MIN_ENEMY_SIZE: f32 = 15.0;
const MAX_ENEMY_SIZE: f32 = 25.0;
const SMALL_ENEMY_SPEED: f32 = 1.8;
const LARGE_ENEMY_SPEED: f32 = 1.2;
const MAX_ENEMY_HEALTH: u32 = 2;

const EXTRA_LIFE_CHANCE: f32 = 0.2;
const DAMAGE_BOOST_CHANCE: f32 = 0.35;
const DAMAGE_BOOST_FIRST_WAVE: u32 = 6;
const COMMON_POWERUPS: [PowerupKind; 3] = [
    PowerupKind::Shield,
    PowerupKind::RapidFire,
    PowerupKind::TripleShot,
];

/// Number of regular enemies spawned when `wave` starts.
///
/// Boss waves spawn no regular enemies; callers check [`BossKind::for_wave`] first.
#[must_use]
pub fn total_enemies(wave: u32) -> usize {
    let base = 2 + wave * 7 / 10;
    let late = if wave > 15 { (wave - 15).min(5) } else { 0 };
    (base + late) as usize
}

/// Starting health of enemies spawned during `wave`.
#[must_use]
pub fn enemy_health(wave: u32) -> u32 {
    (1 + wave / 6).min(MAX_ENEMY_HEALTH)
}

/// Speed added on top of an enemy's size-derived base speed.
#[must_use]
pub fn enemy_speed_bonus(wave: u32) -> f32 {
    if wave <= 5 {
        0.05 * wave.saturating_sub(1) as f32
    } else {
        0.05 * 5.0 + 0.08 * (wave - 5).min(10) as f32
    }
}

/// Size added to enemies spawned during `wave`.
#[must_use]
pub fn enemy_size_bonus(wave: u32) -> f32 {
    if wave > 3 {
        (1.5 + (wave - 3) as f32 * 0.8).min(8.0)
    } else {
        0.0
    }
}

/// Base speed of an enemy with the provided unscaled size; smaller enemies are faster.
#[must_use]
pub fn enemy_base_speed(size: f32) -> f32 {
    let t = (size - MIN_ENEMY_SIZE) / (MAX_ENEMY_SIZE - MIN_ENEMY_SIZE);
    SMALL_ENEMY_SPEED + t * (LARGE_ENEMY_SPEED - SMALL_ENEMY_SPEED)
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    arena: Arena,
    powerup_interval: Duration,
    placement_attempts: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided arena, pickup cadence and seed.
    ///
    /// `placement_attempts` bounds the search for an enemy position far enough
    /// from the player; the last candidate is used when every attempt fails.
    #[must_use]
    pub const fn new(
        arena: Arena,
        powerup_interval: Duration,
        placement_attempts: u32,
        rng_seed: u64,
    ) -> Self {
        Self {
            arena,
            powerup_interval,
            placement_attempts,
            rng_seed,
        }
    }
}

/// Pure system that deterministically emits enemy, boss and pickup spawn commands.
#[derive(Debug)]
pub struct Spawning {
    arena: Arena,
    powerup_interval: Duration,
    placement_attempts: u32,
    rng: ChaCha8Rng,
    wave: u32,
    last_powerup_at: Option<Duration>,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            arena: config.arena,
            powerup_interval: config.powerup_interval,
            placement_attempts: config.placement_attempts.max(1),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            wave: 1,
            last_powerup_at: None,
        }
    }

    /// Consumes events and the player's position to emit spawn commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        state: GameState,
        player: Vec2,
        out: &mut Vec<Command>,
    ) {
        if state != GameState::Playing {
            self.last_powerup_at = None;
            return;
        }

        for event in events {
            match *event {
                Event::GameStarted => {
                    self.wave = 1;
                    self.last_powerup_at = None;
                }
                Event::WaveStarted { wave } => {
                    self.wave = wave;
                    self.populate_wave(wave, player, out);
                }
                Event::TimeAdvanced { now, .. } => self.pace_powerups(now, out),
                _ => {}
            }
        }
    }

    fn populate_wave(&mut self, wave: u32, player: Vec2, out: &mut Vec<Command>) {
        if let Some(kind) = BossKind::for_wave(wave) {
            out.push(Command::SpawnBoss { kind });
            return;
        }

        let count = total_enemies(wave);
        out.reserve(count);
        for _ in 0..count {
            let command = self.spawn_enemy(wave, player);
            out.push(command);
        }
    }

    fn spawn_enemy(&mut self, wave: u32, player: Vec2) -> Command {
        let position = self.place_enemy(player);
        let base_size = self.rng.gen_range(MIN_ENEMY_SIZE..MAX_ENEMY_SIZE);
        Command::SpawnEnemy {
            position,
            size: base_size + enemy_size_bonus(wave),
            speed: enemy_base_speed(base_size) + enemy_speed_bonus(wave),
            health: enemy_health(wave),
        }
    }

    fn place_enemy(&mut self, player: Vec2) -> Vec2 {
        let mut candidate = self.edge_point();
        for _ in 1..self.placement_attempts {
            if candidate.distance(player) >= MIN_PLAYER_DISTANCE {
                return candidate;
            }
            candidate = self.edge_point();
        }
        if candidate.distance(player) < MIN_PLAYER_DISTANCE {
            debug!(?candidate, "enemy placed near player after exhausting attempts");
        }
        candidate
    }

    fn edge_point(&mut self) -> Vec2 {
        let width = self.arena.width();
        let height = self.arena.height();
        let far_x = width - EDGE_MARGIN;
        let far_y = height - EDGE_MARGIN;
        match self.rng.gen_range(0..4) {
            0 => Vec2::new(between(&mut self.rng, EDGE_MARGIN, far_x), EDGE_MARGIN),
            1 => Vec2::new(far_x, between(&mut self.rng, EDGE_MARGIN, far_y)),
            2 => Vec2::new(between(&mut self.rng, EDGE_MARGIN, far_x), far_y),
            _ => Vec2::new(EDGE_MARGIN, between(&mut self.rng, EDGE_MARGIN, far_y)),
        }
    }

    fn pace_powerups(&mut self, now: Duration, out: &mut Vec<Command>) {
        let Some(last) = self.last_powerup_at else {
            self.last_powerup_at = Some(now);
            return;
        };
        if now.saturating_sub(last) <= self.powerup_interval {
            return;
        }

        self.last_powerup_at = Some(now);
        let kind = self.roll_powerup_kind();
        let position = Vec2::new(
            between(&mut self.rng, PICKUP_MARGIN, self.arena.width() - PICKUP_MARGIN),
            between(&mut self.rng, PICKUP_MARGIN, self.arena.height() - PICKUP_MARGIN),
        );
        out.push(Command::SpawnPowerup { kind, position });
    }

    fn roll_powerup_kind(&mut self) -> PowerupKind {
        if self.rng.gen::<f32>() < EXTRA_LIFE_CHANCE {
            return PowerupKind::ExtraLife;
        }
        if self.wave >= DAMAGE_BOOST_FIRST_WAVE && self.rng.gen::<f32>() < DAMAGE_BOOST_CHANCE {
            return PowerupKind::DamageBoost;
        }
        COMMON_POWERUPS[self.rng.gen_range(0..COMMON_POWERUPS.len())]
    }
}

// Degenerate arenas collapse the range to its lower bound.
fn between(rng: &mut ChaCha8Rng, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}
