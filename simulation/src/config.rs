//! Session tuning loaded from TOML or built in code.
//!
//! Every table carries `#[serde(default)]`, so a file only needs the keys it
//! overrides. [`SessionConfig::validate`] rejects values the simulation cannot
//! run with.

use std::time::Duration;

use nova_siege_core::Arena;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a session configuration cannot drive a simulation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The arena has a non-positive or non-finite dimension.
    #[error("arena dimensions must be positive and finite, got {width}x{height}")]
    InvalidArena {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
    /// The simulated tick length is zero.
    #[error("tick length must be at least one millisecond")]
    ZeroTickLength,
    /// Pickups would spawn on every tick.
    #[error("powerup interval must be at least one millisecond")]
    ZeroPowerupInterval,
    /// Enemy placement would never sample a candidate.
    #[error("enemy placement needs at least one attempt")]
    ZeroPlacementAttempts,
    /// The boss would never fire.
    #[error("boss volley interval must be at least one tick")]
    ZeroVolleyInterval,
}

/// Tuning of the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawningConfig {
    /// Simulated time that must pass between two pickups.
    pub powerup_interval_ms: u64,
    /// Candidates sampled when placing an enemy away from the player.
    pub placement_attempts: u32,
}

impl Default for SpawningConfig {
    fn default() -> Self {
        Self {
            powerup_interval_ms: 10_000,
            placement_attempts: 32,
        }
    }
}

/// Tuning of the boss weapons, in ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    /// Ticks between aimed spreads.
    pub volley_interval_ticks: u64,
    /// Ticks between ring volleys of the final boss; zero disables the ring.
    pub ring_interval_ticks: u64,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            volley_interval_ticks: 60,
            ring_interval_ticks: 180,
        }
    }
}

/// Complete configuration of a play session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seed from which every random stream of the session is derived.
    pub seed: u64,
    /// Simulated time covered by one tick when the host does not supply timestamps.
    pub tick_ms: u64,
    /// Play field dimensions.
    pub arena: Arena,
    /// Spawning tuning.
    pub spawning: SpawningConfig,
    /// Boss weapon tuning.
    pub boss: BossConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0x6e6f_7661,
            tick_ms: 16,
            arena: Arena::default(),
            spawning: SpawningConfig::default(),
            boss: BossConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Checks that the configuration can drive a simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let width = self.arena.width();
        let height = self.arena.height();
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidArena { width, height });
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickLength);
        }
        if self.spawning.powerup_interval_ms == 0 {
            return Err(ConfigError::ZeroPowerupInterval);
        }
        if self.spawning.placement_attempts == 0 {
            return Err(ConfigError::ZeroPlacementAttempts);
        }
        if self.boss.volley_interval_ticks == 0 {
            return Err(ConfigError::ZeroVolleyInterval);
        }
        Ok(())
    }

    /// Simulated time covered by one tick.
    #[must_use]
    pub fn tick_length(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Minimum simulated time between two pickups.
    #[must_use]
    pub fn powerup_interval(&self) -> Duration {
        Duration::from_millis(self.spawning.powerup_interval_ms)
    }
}
