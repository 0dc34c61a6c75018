#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves overlaps between ships, bullets and pickups.
//!
//! The system never mutates the world. It predicts the outcome of each hit
//! it reports so that a bullet is consumed by its first target only and a
//! target destroyed earlier in the same pass is not struck again.

use glam::Vec2;
use nova_siege_core::{
    BossBulletSnapshot, BossSnapshot, BulletSnapshot, Command, EnemyId, EnemyView, GameState,
    Health, HitSource, PlayerSnapshot, PowerupKind, PowerupSnapshot,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Read-only views of every collidable entity for one tick.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    /// The player ship.
    pub player: &'a PlayerSnapshot,
    /// Regular enemies in identifier order.
    pub enemies: &'a EnemyView,
    /// The active boss, if any.
    pub boss: Option<&'a BossSnapshot>,
    /// Player bullets in flight.
    pub bullets: &'a [BulletSnapshot],
    /// Boss bullets in flight.
    pub boss_bullets: &'a [BossBulletSnapshot],
    /// Pickups resting on the field.
    pub powerups: &'a [PowerupSnapshot],
}

/// Collision system that converts overlaps into damage, hit and pickup commands.
#[derive(Debug)]
pub struct Collision {
    rng: ChaCha8Rng,
    enemy_health: Vec<(EnemyId, Health)>,
}

impl Collision {
    /// Creates a collision system whose fractional damage rolls use `rng_seed`.
    #[must_use]
    pub fn new(rng_seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
            enemy_health: Vec::new(),
        }
    }

    /// Emits commands for every overlap in the scene.
    pub fn handle(&mut self, state: GameState, scene: Scene<'_>, out: &mut Vec<Command>) {
        if state != GameState::Playing {
            return;
        }

        self.enemy_health.clear();
        self.enemy_health
            .extend(scene.enemies.iter().map(|enemy| (enemy.id, enemy.health)));
        let mut boss_health = scene.boss.map(|boss| boss.health);

        self.resolve_bullets(&scene, &mut boss_health, out);
        self.resolve_player_contacts(&scene, boss_health.is_some(), out);
        resolve_pickups(&scene, out);
    }

    fn resolve_bullets(
        &mut self,
        scene: &Scene<'_>,
        boss_health: &mut Option<Health>,
        out: &mut Vec<Command>,
    ) {
        for bullet in scene.bullets.iter().rev() {
            if let Some(boss) = scene.boss.filter(|_| boss_health.is_some()) {
                if boss.contains(bullet.position) {
                    let roll = self.roll();
                    let destroyed = boss_health
                        .as_mut()
                        .map_or(false, |health| health.take_damage(bullet.damage, roll));
                    if destroyed {
                        *boss_health = None;
                    }
                    out.push(Command::DamageBoss {
                        bullet: bullet.id,
                        roll,
                    });
                    continue;
                }
            }

            for enemy in scene.enemies.iter().rev() {
                let Some(slot) = self.enemy_health.iter().position(|(id, _)| *id == enemy.id)
                else {
                    continue;
                };
                if !touches(bullet.position, bullet.size, enemy.position, enemy.size / 2.0) {
                    continue;
                }

                let roll = self.roll();
                if self.enemy_health[slot].1.take_damage(bullet.damage, roll) {
                    let _ = self.enemy_health.remove(slot);
                }
                out.push(Command::DamageEnemy {
                    bullet: bullet.id,
                    enemy: enemy.id,
                    roll,
                });
                break;
            }
        }
    }

    fn resolve_player_contacts(
        &self,
        scene: &Scene<'_>,
        boss_alive: bool,
        out: &mut Vec<Command>,
    ) {
        let player = scene.player;
        let mut contacts = Contacts {
            vulnerable: !player.is_invincible(),
            shielded: player.has_powerup(PowerupKind::Shield),
        };
        let radius = player.size / 2.0;

        for bullet in scene.boss_bullets.iter().rev() {
            if touches(bullet.position, bullet.size / 2.0, player.position, radius) {
                contacts.strike(HitSource::BossBullet(bullet.id), out);
            }
        }

        if let Some(boss) = scene.boss.filter(|_| boss_alive) {
            if boss.overlaps(player.position, radius) {
                contacts.strike(HitSource::Boss, out);
            }
        }

        for enemy in scene.enemies.iter().rev() {
            let alive = self.enemy_health.iter().any(|(id, _)| *id == enemy.id);
            if alive && touches(enemy.position, enemy.size / 2.0, player.position, radius) {
                contacts.strike(HitSource::Enemy(enemy.id), out);
            }
        }
    }

    fn roll(&mut self) -> f32 {
        self.rng.gen()
    }
}

// Tracks whether further contacts this tick can still hurt the player.
struct Contacts {
    vulnerable: bool,
    shielded: bool,
}

impl Contacts {
    fn strike(&mut self, source: HitSource, out: &mut Vec<Command>) {
        if !self.vulnerable {
            return;
        }
        out.push(Command::HitPlayer { source });
        if self.shielded {
            self.shielded = false;
        } else {
            self.vulnerable = false;
        }
    }
}

fn resolve_pickups(scene: &Scene<'_>, out: &mut Vec<Command>) {
    let player = scene.player;
    for powerup in scene.powerups.iter().rev() {
        if touches(
            powerup.position,
            powerup.size / 2.0,
            player.position,
            player.size / 2.0,
        ) {
            out.push(Command::CollectPowerup {
                powerup: powerup.id,
            });
        }
    }
}

fn touches(a: Vec2, a_reach: f32, b: Vec2, b_reach: f32) -> bool {
    a.distance(b) < a_reach + b_reach
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_is_strict() {
        assert!(touches(Vec2::ZERO, 5.0, Vec2::new(9.9, 0.0), 5.0));
        assert!(!touches(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn shield_lets_one_more_contact_through() {
        let mut contacts = Contacts {
            vulnerable: true,
            shielded: true,
        };
        let mut out = Vec::new();
        contacts.strike(HitSource::Boss, &mut out);
        contacts.strike(HitSource::Boss, &mut out);
        contacts.strike(HitSource::Boss, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn rolls_stay_in_unit_interval() {
        let mut collision = Collision::new(42);
        for _ in 0..1_000 {
            let roll = collision.roll();
            assert!((0.0..1.0).contains(&roll));
        }
    }
}
