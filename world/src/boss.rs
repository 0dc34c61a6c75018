//! Scripted bosses and the bullets they own.

use std::{f32::consts::FRAC_PI_4, time::Duration};

use glam::Vec2;
use nova_siege_core::{Arena, BossBulletId, BossKind, BossSnapshot, Health};

use crate::{
    enemy::HIT_FLASH,
    player::heading,
    projectile::BossBullet,
};

const SPAWN_HEIGHT: f32 = 50.0;
const OSCILLATION_RATE: f32 = 0.02;
const NUDGE_INTERVAL_TICKS: u64 = 180;
const MUZZLE_OFFSET: f32 = 30.0;
const RING_BULLETS: u32 = 8;

#[derive(Clone, Debug)]
pub(crate) struct Boss {
    kind: BossKind,
    position: Vec2,
    health: Health,
    flash_until: Option<Duration>,
    bullets: Vec<BossBullet>,
    next_bullet_id: BossBulletId,
}

impl Boss {
    pub(crate) fn spawn(kind: BossKind, arena: &Arena) -> Self {
        Self {
            kind,
            position: Vec2::new(arena.width() / 2.0, SPAWN_HEIGHT),
            health: Health::full(kind.max_health()),
            flash_until: None,
            bullets: Vec::new(),
            next_bullet_id: BossBulletId::new(0),
        }
    }

    pub(crate) fn kind(&self) -> BossKind {
        self.kind
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn health(&self) -> Health {
        self.health
    }

    /// Sways horizontally, dips every few seconds, and keeps to the upper third.
    pub(crate) fn advance(&mut self, tick: u64, now: Duration, arena: &Arena) {
        let speed = self.kind.speed();
        self.position.x += (tick as f32 * OSCILLATION_RATE).sin() * speed;
        if tick % NUDGE_INTERVAL_TICKS == 0 {
            self.position.y += speed * 2.0;
        }

        let half_width = self.kind.width() / 2.0;
        let half_height = self.kind.height() / 2.0;
        // max/min rather than clamp: a narrow arena may invert the bounds.
        self.position.x = self
            .position
            .x
            .max(half_width)
            .min(arena.width() - half_width);
        self.position.y = self
            .position
            .y
            .max(half_height)
            .min(arena.height() / 3.0);

        for bullet in &mut self.bullets {
            bullet.advance();
        }
        self.bullets.retain(|bullet| bullet.is_inside(arena));

        if matches!(self.flash_until, Some(until) if now > until) {
            self.flash_until = None;
        }
    }

    /// Fires the aimed spread, plus the ring when requested and supported.
    pub(crate) fn fire(&mut self, target: Vec2, ring: bool) -> usize {
        let before = self.bullets.len();
        let aim = heading(self.position, target);
        let (count, step) = self.kind.spread();
        let half = (count as i32 - 1) / 2;
        for offset in -half..=half {
            self.launch(aim + offset as f32 * step);
        }
        if ring && self.kind.fires_ring() {
            for index in 0..RING_BULLETS {
                self.launch(index as f32 * FRAC_PI_4);
            }
        }
        self.bullets.len() - before
    }

    fn launch(&mut self, angle: f32) {
        let muzzle = self.position + Vec2::new(angle.cos(), angle.sin()) * MUZZLE_OFFSET;
        let id = self.next_bullet_id;
        self.next_bullet_id = id.next();
        self.bullets.push(BossBullet::new(id, muzzle, angle));
    }

    pub(crate) fn take_damage(&mut self, amount: f32, roll: f32, now: Duration) -> bool {
        self.flash_until = Some(now.saturating_add(HIT_FLASH));
        self.health.take_damage(amount, roll)
    }

    pub(crate) fn bullets(&self) -> &[BossBullet] {
        &self.bullets
    }

    pub(crate) fn remove_bullet(&mut self, id: BossBulletId) -> bool {
        let before = self.bullets.len();
        self.bullets.retain(|bullet| bullet.id != id);
        self.bullets.len() != before
    }

    pub(crate) fn snapshot(&self) -> BossSnapshot {
        BossSnapshot {
            kind: self.kind,
            position: self.position,
            health: self.health,
            flashing: self.flash_until.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_centred_near_the_top() {
        let boss = Boss::spawn(BossKind::Mid, &Arena::default());
        assert_eq!(boss.position(), Vec2::new(300.0, 50.0));
        assert_eq!(boss.health().current(), 30);
    }

    #[test]
    fn mid_boss_fires_three_way_spread() {
        let mut boss = Boss::spawn(BossKind::Mid, &Arena::default());
        assert_eq!(boss.fire(Vec2::new(300.0, 300.0), true), 3);
        let angles: Vec<f32> = boss.bullets().iter().map(|b| b.snapshot().angle).collect();
        let aim = std::f32::consts::FRAC_PI_2;
        assert!((angles[0] - (aim - 0.3)).abs() < 1e-5);
        assert!((angles[1] - aim).abs() < 1e-5);
        assert!((angles[2] - (aim + 0.3)).abs() < 1e-5);
    }

    #[test]
    fn final_boss_adds_ring_volley() {
        let mut boss = Boss::spawn(BossKind::Final, &Arena::default());
        assert_eq!(boss.fire(Vec2::new(300.0, 300.0), false), 5);
        assert_eq!(boss.fire(Vec2::new(300.0, 300.0), true), 13);
    }

    #[test]
    fn bullets_spawn_at_muzzle_offset() {
        let mut boss = Boss::spawn(BossKind::Mid, &Arena::default());
        let _ = boss.fire(Vec2::new(300.0, 300.0), false);
        let centre = boss.bullets()[1].snapshot().position;
        assert!((centre - Vec2::new(300.0, 80.0)).length() < 1e-3);
    }

    #[test]
    fn stays_within_upper_third() {
        let arena = Arena::default();
        let mut boss = Boss::spawn(BossKind::Final, &arena);
        for tick in 1..=20_000 {
            boss.advance(tick, Duration::ZERO, &arena);
            let position = boss.position();
            assert!(position.x >= 60.0 && position.x <= 540.0);
            assert!(position.y >= 40.0 && position.y <= 400.0 / 3.0 + 1e-3);
        }
    }

    #[test]
    fn removing_unknown_bullet_is_noop() {
        let mut boss = Boss::spawn(BossKind::Mid, &Arena::default());
        let _ = boss.fire(Vec2::ZERO, false);
        assert!(!boss.remove_bullet(BossBulletId::new(99)));
        assert!(boss.remove_bullet(BossBulletId::new(0)));
        assert_eq!(boss.bullets().len(), 2);
    }
}
