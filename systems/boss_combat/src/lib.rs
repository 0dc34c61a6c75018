#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits boss firing commands on a fixed tick cadence.

use glam::Vec2;
use nova_siege_core::{BossSnapshot, Command, Event, GameState};

/// Tick cadence of the boss weapons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    volley_interval: u64,
    ring_interval: u64,
}

impl Config {
    /// Creates a cadence firing a spread every `volley_interval` ticks and adding
    /// the ring on ticks divisible by `ring_interval`. A zero interval disables
    /// the corresponding pattern.
    #[must_use]
    pub const fn new(volley_interval: u64, ring_interval: u64) -> Self {
        Self {
            volley_interval,
            ring_interval,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(60, 180)
    }
}

/// Boss combat system that queues volleys aimed at the player.
#[derive(Debug)]
pub struct BossCombat {
    config: Config,
}

impl BossCombat {
    /// Creates a new boss combat system using the supplied cadence.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Emits `Command::FireBossVolley` for every elapsed tick on the cadence.
    pub fn handle(
        &mut self,
        events: &[Event],
        state: GameState,
        boss: Option<&BossSnapshot>,
        player: Vec2,
        out: &mut Vec<Command>,
    ) {
        if state != GameState::Playing || boss.is_none() {
            return;
        }

        if self.config.volley_interval == 0 {
            return;
        }

        for event in events {
            let Event::TimeAdvanced { tick, .. } = *event else {
                continue;
            };
            if tick % self.config.volley_interval != 0 {
                continue;
            }
            out.push(Command::FireBossVolley {
                target: player,
                ring: self.fires_ring(tick),
            });
        }
    }

    fn fires_ring(&self, tick: u64) -> bool {
        self.config.ring_interval != 0 && tick % self.config.ring_interval == 0
    }
}
