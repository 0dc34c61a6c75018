//! Player bullets and boss bullets.

use std::collections::VecDeque;

use glam::Vec2;
use nova_siege_core::{Arena, BossBulletId, BossBulletSnapshot, BulletId, BulletSnapshot};

const BULLET_SPEED: f32 = 5.0;
const BULLET_SIZE: f32 = 5.0;
const TRAIL_LENGTH: usize = 5;

pub(crate) const BOSS_BULLET_SPEED: f32 = 3.0;
pub(crate) const BOSS_BULLET_SIZE: f32 = 8.0;

#[derive(Clone, Debug)]
pub(crate) struct Bullet {
    pub(crate) id: BulletId,
    position: Vec2,
    velocity: Vec2,
    pub(crate) damage: f32,
    trail: VecDeque<Vec2>,
}

impl Bullet {
    pub(crate) fn new(id: BulletId, origin: Vec2, angle: f32, damage: f32) -> Self {
        Self {
            id,
            position: origin,
            velocity: Vec2::new(angle.cos(), angle.sin()) * BULLET_SPEED,
            damage,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    pub(crate) fn advance(&mut self) {
        self.trail.push_back(self.position);
        while self.trail.len() > TRAIL_LENGTH {
            let _ = self.trail.pop_front();
        }
        self.position += self.velocity;
    }

    pub(crate) fn is_inside(&self, arena: &Arena) -> bool {
        arena.contains(self.position)
    }

    // Boosted bullets grow with their damage.
    fn size(&self) -> f32 {
        if self.damage >= 2.5 {
            BULLET_SIZE + 2.0
        } else if self.damage >= 1.5 {
            BULLET_SIZE + 1.0
        } else {
            BULLET_SIZE
        }
    }

    pub(crate) fn snapshot(&self) -> BulletSnapshot {
        BulletSnapshot {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            size: self.size(),
            damage: self.damage,
            trail: self.trail.iter().copied().collect(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct BossBullet {
    pub(crate) id: BossBulletId,
    position: Vec2,
    angle: f32,
}

impl BossBullet {
    pub(crate) fn new(id: BossBulletId, position: Vec2, angle: f32) -> Self {
        Self {
            id,
            position,
            angle,
        }
    }

    pub(crate) fn advance(&mut self) {
        self.position += Vec2::new(self.angle.cos(), self.angle.sin()) * BOSS_BULLET_SPEED;
    }

    pub(crate) fn is_inside(&self, arena: &Arena) -> bool {
        arena.contains(self.position)
    }

    pub(crate) fn snapshot(&self) -> BossBulletSnapshot {
        BossBulletSnapshot {
            id: self.id,
            position: self.position,
            angle: self.angle,
            size: BOSS_BULLET_SIZE,
        }
    }
}
