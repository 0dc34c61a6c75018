#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that advances waves once their hostiles are gone.

use nova_siege_core::{Command, Event, GameState};
use tracing::debug;

/// Lifecycle of the wave currently being fought.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WaveStage {
    /// No session is running.
    #[default]
    Idle,
    /// The wave started and is waiting for its spawns.
    Spawning,
    /// Hostiles of the wave are alive.
    InProgress,
    /// The last hostile fell; the next wave or victory is pending.
    Cleared,
}

/// Wave controller that requests the next wave when the current one is cleared.
#[derive(Debug, Default)]
pub struct Progression {
    wave: u32,
    stage: WaveStage,
}

impl Progression {
    /// Creates an idle progression controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of the wave being tracked.
    #[must_use]
    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Current lifecycle stage of the tracked wave.
    #[must_use]
    pub fn stage(&self) -> WaveStage {
        self.stage
    }

    /// Consumes world events and emits `Command::AdvanceWave` when a wave is cleared.
    pub fn handle(&mut self, events: &[Event], state: GameState, out: &mut Vec<Command>) {
        let mut cleared = false;

        for event in events {
            match *event {
                Event::WaveStarted { wave } => {
                    self.wave = wave;
                    self.stage = WaveStage::Spawning;
                }
                Event::EnemySpawned { .. } | Event::BossSpawned { .. } => {
                    if self.stage == WaveStage::Spawning {
                        self.stage = WaveStage::InProgress;
                    }
                }
                Event::EnemyDestroyed {
                    remaining_enemies: 0,
                    ..
                }
                | Event::EnemyRammed {
                    remaining_enemies: 0,
                    ..
                }
                | Event::BossDefeated { .. } => {
                    self.stage = WaveStage::Cleared;
                    cleared = true;
                }
                Event::GameOver { .. } | Event::Victory { .. } | Event::ReturnedHome => {
                    self.stage = WaveStage::Idle;
                    cleared = false;
                }
                _ => {}
            }
        }

        if cleared && state == GameState::Playing {
            debug!(wave = self.wave, "wave cleared");
            out.push(Command::AdvanceWave);
        }
    }
}
