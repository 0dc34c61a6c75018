//! Regular enemies that chase the player.

use std::time::Duration;

use glam::Vec2;
use nova_siege_core::{EnemyId, EnemySnapshot, Health};

use crate::player::heading;

pub(crate) const HIT_FLASH: Duration = Duration::from_millis(200);

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) position: Vec2,
    size: f32,
    speed: f32,
    health: Health,
    flash_until: Option<Duration>,
}

impl Enemy {
    pub(crate) fn new(id: EnemyId, position: Vec2, size: f32, speed: f32, health: u32) -> Self {
        Self {
            id,
            position,
            size,
            speed,
            health: Health::full(health.max(1)),
            flash_until: None,
        }
    }

    /// Steps straight toward `target`.
    pub(crate) fn chase(&mut self, target: Vec2, now: Duration) {
        let angle = heading(self.position, target);
        self.position += Vec2::new(angle.cos(), angle.sin()) * self.speed;
        if matches!(self.flash_until, Some(until) if now > until) {
            self.flash_until = None;
        }
    }

    pub(crate) fn take_damage(&mut self, amount: f32, roll: f32, now: Duration) -> bool {
        self.flash_until = Some(now.saturating_add(HIT_FLASH));
        self.health.take_damage(amount, roll)
    }

    pub(crate) fn health(&self) -> Health {
        self.health
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position,
            size: self.size,
            speed: self.speed,
            health: self.health,
            flashing: self.flash_until.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chase_closes_distance_by_speed() {
        let mut enemy = Enemy::new(EnemyId::new(0), Vec2::new(0.0, 0.0), 20.0, 1.5, 1);
        enemy.chase(Vec2::new(10.0, 0.0), Duration::ZERO);
        assert!((enemy.position.x - 1.5).abs() < 1e-6);
        assert!(enemy.position.y.abs() < 1e-6);
    }

    #[test]
    fn hit_flash_clears_after_window() {
        let mut enemy = Enemy::new(EnemyId::new(0), Vec2::ZERO, 20.0, 1.0, 2);
        assert!(!enemy.take_damage(1.0, 0.0, Duration::from_millis(100)));
        assert!(enemy.snapshot().flashing);
        enemy.chase(Vec2::ZERO, Duration::from_millis(300));
        assert!(enemy.snapshot().flashing);
        enemy.chase(Vec2::ZERO, Duration::from_millis(301));
        assert!(!enemy.snapshot().flashing);
        assert_eq!(enemy.health().current(), 1);
    }
}
