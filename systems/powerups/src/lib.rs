#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that ends timed player effects once their deadline passes.

use std::time::Duration;

use nova_siege_core::{Command, GameState, PlayerSnapshot};

/// Powerup lifecycle system that queues expiry commands for lapsed effects.
#[derive(Debug, Default)]
pub struct PowerupLifecycle {
    scratch: Vec<Command>,
}

impl PowerupLifecycle {
    /// Creates a new lifecycle system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::ExpirePowerup` and `Command::EndInvincibility` entries
    /// for every deadline strictly earlier than `now`.
    pub fn handle(
        &mut self,
        state: GameState,
        now: Duration,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        if state != GameState::Playing {
            return;
        }

        self.scratch.clear();
        self.scratch.extend(
            player
                .powerups
                .iter()
                .filter(|active| active.is_expired(now))
                .map(|active| Command::ExpirePowerup { kind: active.kind }),
        );

        if matches!(player.invincible_until, Some(until) if now > until) {
            self.scratch.push(Command::EndInvincibility);
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use nova_siege_core::{ActivePowerup, PowerupKind};

    fn player(powerups: Vec<ActivePowerup>, invincible_until: Option<Duration>) -> PlayerSnapshot {
        PlayerSnapshot {
            position: Vec2::ZERO,
            angle: 0.0,
            size: 20.0,
            lives: 3,
            invincible_until,
            powerups,
            damage_multiplier: 1.0,
        }
    }

    #[test]
    fn expires_only_lapsed_effects() {
        let snapshot = player(
            vec![
                ActivePowerup {
                    kind: PowerupKind::Shield,
                    expires_at: Duration::from_secs(5),
                },
                ActivePowerup {
                    kind: PowerupKind::TripleShot,
                    expires_at: Duration::from_secs(9),
                },
            ],
            None,
        );
        let mut lifecycle = PowerupLifecycle::new();
        let mut out = Vec::new();

        lifecycle.handle(GameState::Playing, Duration::from_secs(5), &snapshot, &mut out);
        assert!(out.is_empty(), "deadline itself is still active");

        lifecycle.handle(
            GameState::Playing,
            Duration::from_millis(5_001),
            &snapshot,
            &mut out,
        );
        assert_eq!(
            out,
            vec![Command::ExpirePowerup {
                kind: PowerupKind::Shield
            }]
        );
    }

    #[test]
    fn invincibility_ends_after_window() {
        let snapshot = player(Vec::new(), Some(Duration::from_secs(2)));
        let mut lifecycle = PowerupLifecycle::new();
        let mut out = Vec::new();
        lifecycle.handle(GameState::Playing, Duration::from_secs(2), &snapshot, &mut out);
        assert!(out.is_empty());
        lifecycle.handle(GameState::Playing, Duration::from_secs(3), &snapshot, &mut out);
        assert_eq!(out, vec![Command::EndInvincibility]);
    }

    #[test]
    fn idle_outside_play() {
        let snapshot = player(Vec::new(), Some(Duration::ZERO));
        let mut out = Vec::new();
        PowerupLifecycle::new().handle(
            GameState::Home,
            Duration::from_secs(9),
            &snapshot,
            &mut out,
        );
        assert!(out.is_empty());
    }
}
