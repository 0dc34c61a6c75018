//! Player ship state: movement, firing cadence, hits and timed effects.

use std::time::Duration;

use glam::Vec2;
use nova_siege_core::{
    ActivePowerup, Arena, HitOutcome, MovementKeys, PlayerSnapshot, PowerupKind, MAX_LIVES,
};

pub(crate) const PLAYER_SIZE: f32 = 20.0;
const PLAYER_SPEED: f32 = 3.0;
const STARTING_LIVES: u32 = 3;
const INVINCIBILITY_WINDOW: Duration = Duration::from_secs(2);
const FIRE_COOLDOWN: Duration = Duration::from_millis(150);
const RAPID_FIRE_COOLDOWN: Duration = Duration::from_millis(80);
const TRIPLE_SHOT_SPREAD: f32 = 0.3;
const EXTRA_LIFE_BONUS: u32 = 200;

const DAMAGE_BOOST_BASE: f32 = 1.5;
const DAMAGE_BOOST_STEP: f32 = 0.25;
const DAMAGE_BOOST_CAP: f32 = 3.5;
const DAMAGE_BOOST_FIRST_WAVE: u32 = 6;

/// Multiplier granted by a damage boost collected during `wave`.
///
/// Starts at 1.5 on wave six, grows by 0.25 every two waves and never exceeds 3.5.
#[must_use]
pub fn damage_boost_multiplier(wave: u32) -> f32 {
    let steps = wave.saturating_sub(DAMAGE_BOOST_FIRST_WAVE) / 2;
    (DAMAGE_BOOST_BASE + steps as f32 * DAMAGE_BOOST_STEP).min(DAMAGE_BOOST_CAP)
}

/// Origin and heading of a bullet the player just fired.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Shot {
    pub(crate) origin: Vec2,
    pub(crate) angle: f32,
    pub(crate) damage: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct Player {
    position: Vec2,
    angle: f32,
    lives: u32,
    invincible_until: Option<Duration>,
    powerups: Vec<ActivePowerup>,
    damage_multiplier: f32,
    last_shot_at: Option<Duration>,
}

impl Player {
    pub(crate) fn spawn_at(position: Vec2) -> Self {
        Self {
            position,
            angle: 0.0,
            lives: STARTING_LIVES,
            invincible_until: None,
            powerups: Vec::new(),
            damage_multiplier: 1.0,
            last_shot_at: None,
        }
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn lives(&self) -> u32 {
        self.lives
    }

    pub(crate) fn is_invincible(&self) -> bool {
        self.invincible_until.is_some()
    }

    pub(crate) fn has_powerup(&self, kind: PowerupKind) -> bool {
        self.powerups.iter().any(|active| active.kind == kind)
    }

    /// Applies the held keys on each axis independently, then clamps to the arena.
    pub(crate) fn steer(&mut self, keys: MovementKeys, pointer: Vec2, arena: &Arena) {
        self.position += keys.axes() * PLAYER_SPEED;
        self.angle = heading(self.position, pointer);
        self.position = arena.clamp(self.position);
    }

    /// Fires if the cooldown elapsed, returning the bullets that leave the ship.
    pub(crate) fn fire(&mut self, now: Duration, pointer: Vec2) -> Vec<Shot> {
        let cooldown = if self.has_powerup(PowerupKind::RapidFire) {
            RAPID_FIRE_COOLDOWN
        } else {
            FIRE_COOLDOWN
        };
        if let Some(last) = self.last_shot_at {
            if now.saturating_sub(last) <= cooldown {
                return Vec::new();
            }
        }
        self.last_shot_at = Some(now);

        let damage = self.bullet_damage();
        let origin = self.position;
        if self.has_powerup(PowerupKind::TripleShot) {
            [-TRIPLE_SHOT_SPREAD, 0.0, TRIPLE_SHOT_SPREAD]
                .into_iter()
                .map(|offset| Shot {
                    origin,
                    angle: self.angle + offset,
                    damage,
                })
                .collect()
        } else {
            vec![Shot {
                origin,
                angle: heading(origin, pointer),
                damage,
            }]
        }
    }

    fn bullet_damage(&self) -> f32 {
        if self.has_powerup(PowerupKind::DamageBoost) {
            self.damage_multiplier
        } else {
            1.0
        }
    }

    pub(crate) fn hit(&mut self, now: Duration) -> HitOutcome {
        if self.has_powerup(PowerupKind::Shield) {
            self.powerups.retain(|active| active.kind != PowerupKind::Shield);
            return HitOutcome::ShieldAbsorbed;
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            return HitOutcome::Killed;
        }

        self.invincible_until = Some(now.saturating_add(INVINCIBILITY_WINDOW));
        HitOutcome::LifeLost {
            lives_remaining: self.lives,
        }
    }

    /// Grants the effect of a pickup and returns any score awarded instead.
    pub(crate) fn apply_powerup(&mut self, kind: PowerupKind, wave: u32, now: Duration) -> u32 {
        match kind {
            PowerupKind::Shield | PowerupKind::RapidFire | PowerupKind::TripleShot => {
                self.refresh(kind, now);
                0
            }
            PowerupKind::DamageBoost => {
                self.damage_multiplier = damage_boost_multiplier(wave);
                self.refresh(kind, now);
                0
            }
            PowerupKind::ExtraLife => {
                if self.lives < MAX_LIVES {
                    self.lives += 1;
                    0
                } else {
                    EXTRA_LIFE_BONUS
                }
            }
        }
    }

    // An effect already active keeps its slot; only the deadline moves.
    fn refresh(&mut self, kind: PowerupKind, now: Duration) {
        let Some(duration) = kind.duration() else {
            return;
        };
        let expires_at = now.saturating_add(duration);
        match self.powerups.iter_mut().find(|active| active.kind == kind) {
            Some(active) => active.expires_at = expires_at,
            None => self.powerups.push(ActivePowerup { kind, expires_at }),
        }
    }

    /// Removes a timed effect, returning whether it was active.
    pub(crate) fn expire(&mut self, kind: PowerupKind) -> bool {
        let before = self.powerups.len();
        self.powerups.retain(|active| active.kind != kind);
        if self.powerups.len() == before {
            return false;
        }
        if kind == PowerupKind::DamageBoost {
            self.damage_multiplier = 1.0;
        }
        true
    }

    pub(crate) fn end_invincibility(&mut self) -> bool {
        self.invincible_until.take().is_some()
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            angle: self.angle,
            size: PLAYER_SIZE,
            lives: self.lives,
            invincible_until: self.invincible_until,
            powerups: self.powerups.clone(),
            damage_multiplier: self.damage_multiplier,
        }
    }
}

pub(crate) fn heading(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::spawn_at(Vec2::new(300.0, 200.0))
    }

    #[test]
    fn damage_boost_scales_with_wave() {
        assert!((damage_boost_multiplier(6) - 1.5).abs() < f32::EPSILON);
        assert!((damage_boost_multiplier(7) - 1.5).abs() < f32::EPSILON);
        assert!((damage_boost_multiplier(8) - 1.75).abs() < f32::EPSILON);
        assert!((damage_boost_multiplier(20) - 3.25).abs() < f32::EPSILON);
        assert!((damage_boost_multiplier(40) - 3.5).abs() < f32::EPSILON);
    }

    #[test]
    fn diagonal_movement_applies_full_speed_per_axis() {
        let mut player = player();
        let keys = MovementKeys {
            down: true,
            left: true,
            ..MovementKeys::default()
        };
        player.steer(keys, Vec2::new(0.0, 0.0), &Arena::default());
        assert_eq!(player.position(), Vec2::new(297.0, 203.0));
    }

    #[test]
    fn movement_clamps_to_arena() {
        let mut player = Player::spawn_at(Vec2::new(1.0, 399.0));
        let keys = MovementKeys {
            down: true,
            left: true,
            ..MovementKeys::default()
        };
        player.steer(keys, Vec2::ZERO, &Arena::default());
        assert_eq!(player.position(), Vec2::new(0.0, 400.0));
    }

    #[test]
    fn firing_respects_cooldown() {
        let mut player = player();
        let pointer = Vec2::new(400.0, 200.0);
        assert_eq!(player.fire(Duration::from_millis(1_000), pointer).len(), 1);
        assert!(player.fire(Duration::from_millis(1_150), pointer).is_empty());
        assert_eq!(player.fire(Duration::from_millis(1_151), pointer).len(), 1);
    }

    #[test]
    fn rapid_fire_shortens_cooldown() {
        let mut player = player();
        let _ = player.apply_powerup(PowerupKind::RapidFire, 1, Duration::ZERO);
        let pointer = Vec2::new(400.0, 200.0);
        assert_eq!(player.fire(Duration::from_millis(1_000), pointer).len(), 1);
        assert_eq!(player.fire(Duration::from_millis(1_081), pointer).len(), 1);
    }

    #[test]
    fn triple_shot_fans_around_facing() {
        let mut player = player();
        let _ = player.apply_powerup(PowerupKind::TripleShot, 1, Duration::ZERO);
        player.steer(MovementKeys::default(), Vec2::new(300.0, 100.0), &Arena::default());
        let shots = player.fire(Duration::from_millis(10), Vec2::ZERO);
        assert_eq!(shots.len(), 3);
        let facing = -std::f32::consts::FRAC_PI_2;
        assert!((shots[0].angle - (facing - 0.3)).abs() < 1e-6);
        assert!((shots[1].angle - facing).abs() < 1e-6);
        assert!((shots[2].angle - (facing + 0.3)).abs() < 1e-6);
    }

    #[test]
    fn shield_absorbs_exactly_one_hit() {
        let mut player = player();
        let _ = player.apply_powerup(PowerupKind::Shield, 1, Duration::ZERO);
        assert_eq!(player.hit(Duration::from_secs(1)), HitOutcome::ShieldAbsorbed);
        assert!(!player.has_powerup(PowerupKind::Shield));
        assert!(!player.is_invincible());
        assert_eq!(
            player.hit(Duration::from_secs(1)),
            HitOutcome::LifeLost { lives_remaining: 2 }
        );
        assert!(player.is_invincible());
    }

    #[test]
    fn last_life_is_fatal() {
        let mut player = player();
        let _ = player.hit(Duration::ZERO);
        let _ = player.hit(Duration::ZERO);
        assert_eq!(player.hit(Duration::ZERO), HitOutcome::Killed);
        assert_eq!(player.lives(), 0);
        assert_eq!(player.hit(Duration::ZERO), HitOutcome::Killed);
        assert_eq!(player.lives(), 0);
    }

    #[test]
    fn extra_life_caps_at_five_then_scores() {
        let mut player = player();
        assert_eq!(player.apply_powerup(PowerupKind::ExtraLife, 1, Duration::ZERO), 0);
        assert_eq!(player.apply_powerup(PowerupKind::ExtraLife, 1, Duration::ZERO), 0);
        assert_eq!(player.lives(), MAX_LIVES);
        assert_eq!(
            player.apply_powerup(PowerupKind::ExtraLife, 1, Duration::ZERO),
            EXTRA_LIFE_BONUS
        );
        assert_eq!(player.lives(), MAX_LIVES);
    }

    #[test]
    fn repeated_pickup_refreshes_without_duplicating() {
        let mut player = player();
        let _ = player.apply_powerup(PowerupKind::Shield, 1, Duration::from_secs(1));
        let _ = player.apply_powerup(PowerupKind::Shield, 1, Duration::from_secs(5));
        let snapshot = player.snapshot();
        assert_eq!(snapshot.powerups.len(), 1);
        assert_eq!(snapshot.powerups[0].expires_at, Duration::from_secs(25));
    }

    #[test]
    fn expiring_damage_boost_resets_multiplier() {
        let mut player = player();
        let _ = player.apply_powerup(PowerupKind::DamageBoost, 12, Duration::ZERO);
        assert!((player.snapshot().damage_multiplier - 2.25).abs() < f32::EPSILON);
        let shots = player.fire(Duration::from_millis(500), Vec2::ZERO);
        assert!((shots[0].damage - 2.25).abs() < f32::EPSILON);

        assert!(player.expire(PowerupKind::DamageBoost));
        assert!(!player.expire(PowerupKind::DamageBoost));
        assert!((player.snapshot().damage_multiplier - 1.0).abs() < f32::EPSILON);
    }
}
