#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Nova Siege.
//!
//! [`World`] is the single owned simulation state: the player, every hostile,
//! projectile and pickup, the score, the wave counter and the session state.
//! It is only ever mutated through [`apply`], which executes one [`Command`]
//! and reports what happened as [`Event`] values.

mod boss;
mod enemy;
mod pickup;
mod player;
mod projectile;

use std::time::Duration;

use nova_siege_core::{
    Arena, BulletId, Command, EnemyId, Event, GameState, HitSource, PowerupId,
    MAX_WAVES,
};
use tracing::{debug, info, trace};

use crate::{
    boss::Boss,
    enemy::Enemy,
    pickup::Pickup,
    player::{Player, Shot},
    projectile::Bullet,
};

pub use player::damage_boost_multiplier;

/// Represents the authoritative Nova Siege world state.
#[derive(Debug)]
pub struct World {
    arena: Arena,
    state: GameState,
    score: u32,
    wave: u32,
    now: Duration,
    tick_index: u64,
    player: Player,
    enemies: Vec<Enemy>,
    boss: Option<Boss>,
    bullets: Vec<Bullet>,
    pickups: Vec<Pickup>,
    next_enemy_id: EnemyId,
    next_bullet_id: BulletId,
    next_powerup_id: PowerupId,
}

impl World {
    /// Creates a world on the title screen using the default arena.
    #[must_use]
    pub fn new() -> Self {
        Self::with_arena(Arena::default())
    }

    /// Creates a world on the title screen using the provided arena.
    #[must_use]
    pub fn with_arena(arena: Arena) -> Self {
        Self {
            arena,
            state: GameState::Home,
            score: 0,
            wave: 1,
            now: Duration::ZERO,
            tick_index: 0,
            player: Player::spawn_at(arena.center()),
            enemies: Vec::new(),
            boss: None,
            bullets: Vec::new(),
            pickups: Vec::new(),
            next_enemy_id: EnemyId::new(0),
            next_bullet_id: BulletId::new(0),
            next_powerup_id: PowerupId::new(0),
        }
    }

    fn reset_session(&mut self) {
        self.score = 0;
        self.wave = 1;
        self.tick_index = 0;
        self.player = Player::spawn_at(self.arena.center());
        self.enemies.clear();
        self.boss = None;
        self.bullets.clear();
        self.pickups.clear();
        self.next_enemy_id = EnemyId::new(0);
        self.next_bullet_id = BulletId::new(0);
        self.next_powerup_id = PowerupId::new(0);
    }

    fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }

    fn advance_entities(&mut self) {
        let now = self.now;
        let arena = self.arena;

        for bullet in &mut self.bullets {
            bullet.advance();
        }
        self.bullets.retain(|bullet| bullet.is_inside(&arena));

        if let Some(boss) = self.boss.as_mut() {
            boss.advance(self.tick_index, now, &arena);
        }

        let target = self.player.position();
        for enemy in &mut self.enemies {
            enemy.chase(target, now);
        }

        for pickup in &mut self.pickups {
            pickup.spin();
        }
    }

    fn fire(&mut self, shots: Vec<Shot>, out_events: &mut Vec<Event>) {
        for shot in shots {
            let id = self.next_bullet_id;
            self.next_bullet_id = id.next();
            self.bullets
                .push(Bullet::new(id, shot.origin, shot.angle, shot.damage));
            out_events.push(Event::BulletFired {
                bullet: id,
                damage: shot.damage,
            });
        }
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|candidate| candidate.id == enemy)
    }

    fn take_bullet(&mut self, bullet: BulletId) -> Option<Bullet> {
        let index = self.bullets.iter().position(|candidate| candidate.id == bullet)?;
        Some(self.bullets.remove(index))
    }

    fn damage_enemy(
        &mut self,
        bullet: BulletId,
        enemy: EnemyId,
        roll: f32,
        out_events: &mut Vec<Event>,
    ) {
        let Some(enemy_index) = self.enemy_index(enemy) else {
            return;
        };
        let Some(bullet) = self.take_bullet(bullet) else {
            return;
        };

        let now = self.now;
        let target = &mut self.enemies[enemy_index];
        if !target.take_damage(bullet.damage, roll, now) {
            out_events.push(Event::EnemyDamaged {
                enemy,
                remaining: target.health().current(),
            });
            return;
        }

        let destroyed = self.enemies.remove(enemy_index);
        let points = enemy_points(self.wave);
        self.score = self.score.saturating_add(points);
        out_events.push(Event::EnemyDestroyed {
            enemy,
            position: destroyed.position,
            points,
            remaining_enemies: self.enemies.len(),
        });
    }

    fn damage_boss(&mut self, bullet: BulletId, roll: f32, out_events: &mut Vec<Event>) {
        if self.boss.is_none() {
            return;
        }
        let Some(bullet) = self.take_bullet(bullet) else {
            return;
        };
        let now = self.now;
        let Some(boss) = self.boss.as_mut() else {
            return;
        };

        if !boss.take_damage(bullet.damage, roll, now) {
            out_events.push(Event::BossDamaged {
                kind: boss.kind(),
                remaining: boss.health().current(),
            });
            return;
        }

        let kind = boss.kind();
        let position = boss.position();
        self.boss = None;
        self.score = self.score.saturating_add(kind.points());
        info!(?kind, score = self.score, "boss defeated");
        out_events.push(Event::BossDefeated {
            kind,
            position,
            points: kind.points(),
        });
    }

    fn source_is_present(&self, source: HitSource) -> bool {
        match source {
            HitSource::Enemy(enemy) => self.enemy_index(enemy).is_some(),
            HitSource::Boss => self.boss.is_some(),
            HitSource::BossBullet(bullet) => self.boss.as_ref().map_or(false, |boss| {
                boss.bullets().iter().any(|candidate| candidate.id == bullet)
            }),
        }
    }

    fn hit_player(&mut self, source: HitSource, out_events: &mut Vec<Event>) {
        if self.player.is_invincible() || !self.source_is_present(source) {
            return;
        }

        let outcome = self.player.hit(self.now);
        debug!(?source, ?outcome, "player hit");
        out_events.push(Event::PlayerHit { source, outcome });

        if outcome.is_fatal() {
            self.state = GameState::GameOver;
            info!(wave = self.wave, score = self.score, "game over");
            out_events.push(Event::GameOver {
                wave: self.wave,
                score: self.score,
            });
            return;
        }

        match source {
            HitSource::Enemy(enemy) => {
                if let Some(index) = self.enemy_index(enemy) {
                    let rammed = self.enemies.remove(index);
                    out_events.push(Event::EnemyRammed {
                        enemy,
                        position: rammed.position,
                        remaining_enemies: self.enemies.len(),
                    });
                }
            }
            HitSource::BossBullet(bullet) => {
                if let Some(boss) = self.boss.as_mut() {
                    let _ = boss.remove_bullet(bullet);
                }
            }
            HitSource::Boss => {}
        }
    }

    fn collect_powerup(&mut self, powerup: PowerupId, out_events: &mut Vec<Event>) {
        let Some(index) = self.pickups.iter().position(|candidate| candidate.id == powerup) else {
            return;
        };
        let pickup = self.pickups.remove(index);
        let bonus_points = self.player.apply_powerup(pickup.kind, self.wave, self.now);
        self.score = self.score.saturating_add(bonus_points);
        debug!(kind = pickup.kind.label(), bonus_points, "powerup collected");
        out_events.push(Event::PowerupCollected {
            powerup,
            kind: pickup.kind,
            bonus_points,
        });
    }

    fn advance_wave(&mut self, out_events: &mut Vec<Event>) {
        if !self.enemies.is_empty() || self.boss.is_some() {
            return;
        }

        out_events.push(Event::WaveCleared { wave: self.wave });
        self.wave = self.wave.saturating_add(1);

        if self.wave > MAX_WAVES {
            self.state = GameState::Victory;
            info!(score = self.score, "victory");
            out_events.push(Event::Victory { score: self.score });
            return;
        }

        info!(wave = self.wave, "wave started");
        out_events.push(Event::WaveStarted { wave: self.wave });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Score awarded for shooting down a regular enemy during `wave`.
#[must_use]
pub const fn enemy_points(wave: u32) -> u32 {
    10 + wave * 2
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Gameplay commands are ignored unless a session is in progress; commands
/// naming entities that no longer exist are ignored as well.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame => {
            world.reset_session();
            world.state = GameState::Playing;
            info!(wave = world.wave, "game started");
            out_events.push(Event::GameStarted);
            out_events.push(Event::WaveStarted { wave: world.wave });
        }
        Command::ReturnHome => {
            world.reset_session();
            world.state = GameState::Home;
            out_events.push(Event::ReturnedHome);
        }
        Command::Tick { now } => {
            world.now = now;
            if !world.is_playing() {
                return;
            }
            world.tick_index = world.tick_index.saturating_add(1);
            world.advance_entities();
            trace!(tick = world.tick_index, ?now, "tick");
            out_events.push(Event::TimeAdvanced {
                now,
                tick: world.tick_index,
            });
        }
        _ if !world.is_playing() => {}
        Command::MovePlayer { keys, pointer } => {
            let arena = world.arena;
            world.player.steer(keys, pointer, &arena);
        }
        Command::FirePlayerWeapon { pointer } => {
            let shots = world.player.fire(world.now, pointer);
            world.fire(shots, out_events);
        }
        Command::SpawnEnemy {
            position,
            size,
            speed,
            health,
        } => {
            let id = world.next_enemy_id;
            world.next_enemy_id = id.next();
            world
                .enemies
                .push(Enemy::new(id, position, size, speed, health));
            out_events.push(Event::EnemySpawned {
                enemy: id,
                position,
            });
        }
        Command::SpawnBoss { kind } => {
            if world.boss.is_some() {
                return;
            }
            world.boss = Some(Boss::spawn(kind, &world.arena));
            info!(?kind, wave = world.wave, "boss spawned");
            out_events.push(Event::BossSpawned { kind });
        }
        Command::SpawnPowerup { kind, position } => {
            let id = world.next_powerup_id;
            world.next_powerup_id = id.next();
            world.pickups.push(Pickup::new(id, kind, position));
            out_events.push(Event::PowerupSpawned {
                powerup: id,
                kind,
                position,
            });
        }
        Command::FireBossVolley { target, ring } => {
            if let Some(boss) = world.boss.as_mut() {
                let bullets = boss.fire(target, ring);
                out_events.push(Event::BossVolleyFired { bullets });
            }
        }
        Command::DamageEnemy {
            bullet,
            enemy,
            roll,
        } => world.damage_enemy(bullet, enemy, roll, out_events),
        Command::DamageBoss { bullet, roll } => world.damage_boss(bullet, roll, out_events),
        Command::HitPlayer { source } => world.hit_player(source, out_events),
        Command::CollectPowerup { powerup } => world.collect_powerup(powerup, out_events),
        Command::ExpirePowerup { kind } => {
            if world.player.expire(kind) {
                debug!(kind = kind.label(), "powerup expired");
                out_events.push(Event::PowerupExpired { kind });
            }
        }
        Command::EndInvincibility => {
            if world.player.end_invincibility() {
                out_events.push(Event::InvincibilityEnded);
            }
        }
        Command::AdvanceWave => world.advance_wave(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec2;
    use nova_siege_core::{
        Arena, BossBulletSnapshot, BossSnapshot, BulletSnapshot, EnemyView, GameState,
        HudSnapshot, PlayerSnapshot, PowerupSnapshot, MAX_WAVES,
    };

    use super::World;

    /// Which of the mutually exclusive wave phases the session is in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum WavePhase {
        /// Regular enemies remain.
        Fighting,
        /// A boss is active.
        Boss,
        /// The previous wave is cleared and the next one has not spawned yet.
        BetweenWaves,
    }

    /// Current session state.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Dimensions of the play field.
    #[must_use]
    pub fn arena(world: &World) -> Arena {
        world.arena
    }

    /// Accumulated score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Current wave number; exceeds [`MAX_WAVES`] once the session is won.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Timestamp of the most recent tick.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.now
    }

    /// Ticks simulated since the session started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Current position of the player ship.
    #[must_use]
    pub fn player_position(world: &World) -> Vec2 {
        world.player.position()
    }

    /// Captures the player state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Captures a read-only view of the enemies in the arena.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Number of regular enemies alive.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures the active boss, if any.
    #[must_use]
    pub fn boss(world: &World) -> Option<BossSnapshot> {
        world.boss.as_ref().map(|boss| boss.snapshot())
    }

    /// Reports whether a boss is active.
    #[must_use]
    pub fn is_boss_active(world: &World) -> bool {
        world.boss.is_some()
    }

    /// Captures the player bullets in flight.
    #[must_use]
    pub fn bullets(world: &World) -> Vec<BulletSnapshot> {
        world.bullets.iter().map(|bullet| bullet.snapshot()).collect()
    }

    /// Captures the boss bullets in flight.
    #[must_use]
    pub fn boss_bullets(world: &World) -> Vec<BossBulletSnapshot> {
        world.boss.as_ref().map_or_else(Vec::new, |boss| {
            boss.bullets().iter().map(|bullet| bullet.snapshot()).collect()
        })
    }

    /// Captures the pickups resting on the field.
    #[must_use]
    pub fn powerups(world: &World) -> Vec<PowerupSnapshot> {
        world.pickups.iter().map(|pickup| pickup.snapshot()).collect()
    }

    /// Resolves the current wave phase.
    #[must_use]
    pub fn wave_phase(world: &World) -> WavePhase {
        if world.boss.is_some() {
            WavePhase::Boss
        } else if !world.enemies.is_empty() {
            WavePhase::Fighting
        } else {
            WavePhase::BetweenWaves
        }
    }

    /// Collects everything the heads-up display shows.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        let player = world.player.snapshot();
        HudSnapshot {
            state: world.state,
            score: world.score,
            wave: world.wave,
            max_waves: MAX_WAVES,
            lives: world.player.lives(),
            powerups: player
                .powerups
                .iter()
                .map(|active| (active.kind, active.remaining(world.now)))
                .collect(),
            damage_multiplier: player.damage_multiplier,
        }
    }
}
