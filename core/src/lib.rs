#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Nova Siege engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Number of waves that must be cleared to win a session.
pub const MAX_WAVES: u32 = 20;

/// Wave that replaces the regular enemy batch with the mid boss.
pub const MID_BOSS_WAVE: u32 = 10;

/// Wave that replaces the regular enemy batch with the final boss.
pub const FINAL_BOSS_WAVE: u32 = MAX_WAVES;

/// Most lives a player may hold at once.
pub const MAX_LIVES: u32 = 5;

/// Top-level state of a play session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Title screen; no simulation runs.
    #[default]
    Home,
    /// Waves are being fought.
    Playing,
    /// The player lost every life.
    GameOver,
    /// Every wave, including the final boss, was cleared.
    Victory,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets every collection and begins wave one.
    StartGame,
    /// Abandons the current session and returns to the title screen.
    ReturnHome,
    /// Samples the simulation clock and advances every moving entity by one step.
    Tick {
        /// Timestamp of this tick measured from the start of the host clock.
        now: Duration,
    },
    /// Moves the player using the held movement keys and turns it toward the pointer.
    MovePlayer {
        /// Movement keys held during this tick.
        keys: MovementKeys,
        /// Pointer position in arena coordinates.
        pointer: Vec2,
    },
    /// Requests that the player fire toward the pointer, subject to cooldown.
    FirePlayerWeapon {
        /// Pointer position in arena coordinates.
        pointer: Vec2,
    },
    /// Requests that a regular enemy be created.
    SpawnEnemy {
        /// Spawn position in arena coordinates.
        position: Vec2,
        /// Diameter of the enemy.
        size: f32,
        /// Distance travelled per tick while chasing the player.
        speed: f32,
        /// Starting and maximum health.
        health: u32,
    },
    /// Requests that a boss of the provided kind be created.
    SpawnBoss {
        /// Kind of boss to create.
        kind: BossKind,
    },
    /// Requests that a pickup be placed on the field.
    SpawnPowerup {
        /// Effect granted when the pickup is collected.
        kind: PowerupKind,
        /// Pickup position in arena coordinates.
        position: Vec2,
    },
    /// Requests that the active boss fire its pattern at the provided target.
    FireBossVolley {
        /// Position the spread is aimed at.
        target: Vec2,
        /// Whether the eight-direction ring accompanies the spread.
        ring: bool,
    },
    /// Applies a player bullet's damage to an enemy and consumes the bullet.
    DamageEnemy {
        /// Bullet that struck the enemy.
        bullet: BulletId,
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Uniform roll in `0.0..1.0` deciding fractional damage.
        roll: f32,
    },
    /// Applies a player bullet's damage to the boss and consumes the bullet.
    DamageBoss {
        /// Bullet that struck the boss.
        bullet: BulletId,
        /// Uniform roll in `0.0..1.0` deciding fractional damage.
        roll: f32,
    },
    /// Reports that something hostile touched the player.
    HitPlayer {
        /// Entity responsible for the contact.
        source: HitSource,
    },
    /// Grants the effect of a pickup touching the player.
    CollectPowerup {
        /// Pickup that was touched.
        powerup: PowerupId,
    },
    /// Ends a timed powerup effect.
    ExpirePowerup {
        /// Effect that ran out.
        kind: PowerupKind,
    },
    /// Ends the post-hit invincibility window.
    EndInvincibility,
    /// Moves on to the next wave, or to victory after the last one.
    AdvanceWave,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A new session began; all collections were reset.
    GameStarted,
    /// The session was abandoned for the title screen.
    ReturnedHome,
    /// The simulation clock advanced.
    TimeAdvanced {
        /// Timestamp sampled for the tick.
        now: Duration,
        /// Number of ticks simulated since the session started.
        tick: u64,
    },
    /// A wave began and is awaiting its spawns.
    WaveStarted {
        /// Number of the wave that started.
        wave: u32,
    },
    /// Every hostile of a wave was destroyed.
    WaveCleared {
        /// Number of the wave that was cleared.
        wave: u32,
    },
    /// An enemy entered the arena.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Spawn position.
        position: Vec2,
    },
    /// A boss entered the arena.
    BossSpawned {
        /// Kind of boss that appeared.
        kind: BossKind,
    },
    /// A pickup was placed on the field.
    PowerupSpawned {
        /// Identifier assigned to the pickup.
        powerup: PowerupId,
        /// Effect granted by the pickup.
        kind: PowerupKind,
        /// Position of the pickup.
        position: Vec2,
    },
    /// The player fired one or more bullets.
    BulletFired {
        /// Identifier of the bullet.
        bullet: BulletId,
        /// Damage carried by the bullet.
        damage: f32,
    },
    /// The boss fired a volley.
    BossVolleyFired {
        /// Number of bullets in the volley.
        bullets: usize,
    },
    /// An enemy survived a bullet hit.
    EnemyDamaged {
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Health left after the hit.
        remaining: u32,
    },
    /// An enemy was shot down.
    EnemyDestroyed {
        /// Enemy that was destroyed.
        enemy: EnemyId,
        /// Last known position.
        position: Vec2,
        /// Score awarded for the kill.
        points: u32,
        /// Enemies still alive after the removal.
        remaining_enemies: usize,
    },
    /// An enemy was destroyed by ramming a surviving player.
    EnemyRammed {
        /// Enemy that was destroyed.
        enemy: EnemyId,
        /// Last known position.
        position: Vec2,
        /// Enemies still alive after the removal.
        remaining_enemies: usize,
    },
    /// The boss survived a bullet hit.
    BossDamaged {
        /// Kind of boss that was struck.
        kind: BossKind,
        /// Health left after the hit.
        remaining: u32,
    },
    /// The boss was destroyed.
    BossDefeated {
        /// Kind of boss that was destroyed.
        kind: BossKind,
        /// Last known position.
        position: Vec2,
        /// Score awarded for the kill.
        points: u32,
    },
    /// The player was touched by a hostile while vulnerable.
    PlayerHit {
        /// Entity responsible for the contact.
        source: HitSource,
        /// Consequence of the hit.
        outcome: HitOutcome,
    },
    /// The player collected a pickup.
    PowerupCollected {
        /// Pickup that was collected.
        powerup: PowerupId,
        /// Effect that was granted.
        kind: PowerupKind,
        /// Score awarded instead of an effect, if any.
        bonus_points: u32,
    },
    /// A timed effect ran out.
    PowerupExpired {
        /// Effect that ended.
        kind: PowerupKind,
    },
    /// The post-hit invincibility window closed.
    InvincibilityEnded,
    /// The player lost their last life.
    GameOver {
        /// Wave the player died on.
        wave: u32,
        /// Final score.
        score: u32,
    },
    /// The final wave was cleared.
    Victory {
        /// Final score.
        score: u32,
    },
}

/// Movement keys held by the player during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MovementKeys {
    /// Up arrow or `W`.
    pub up: bool,
    /// Down arrow or `S`.
    pub down: bool,
    /// Left arrow or `A`.
    pub left: bool,
    /// Right arrow or `D`.
    pub right: bool,
}

impl MovementKeys {
    /// Per-axis unit offsets implied by the held keys.
    ///
    /// Each axis is resolved independently, so a diagonal yields `(±1, ±1)`.
    #[must_use]
    pub fn axes(&self) -> Vec2 {
        let mut axes = Vec2::ZERO;
        if self.left {
            axes.x -= 1.0;
        }
        if self.right {
            axes.x += 1.0;
        }
        if self.up {
            axes.y -= 1.0;
        }
        if self.down {
            axes.y += 1.0;
        }
        axes
    }
}

/// Rectangular play field. The origin is the upper-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    width: f32,
    height: f32,
}

impl Arena {
    /// Creates an arena with the provided dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent of the arena.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent of the arena.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Centre point of the arena.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Reports whether the point lies inside the arena, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    /// Clamps the point onto the arena.
    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(point.x.clamp(0.0, self.width), point.y.clamp(0.0, self.height))
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(600.0, 400.0)
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }

            /// Returns the identifier that follows this one.
            #[must_use]
            pub const fn next(&self) -> Self {
                Self(self.0.wrapping_add(1))
            }
        }
    };
}

entity_id!(
    /// Unique identifier assigned to a regular enemy.
    EnemyId
);
entity_id!(
    /// Unique identifier assigned to a player bullet.
    BulletId
);
entity_id!(
    /// Unique identifier assigned to a boss bullet.
    BossBulletId
);
entity_id!(
    /// Unique identifier assigned to a powerup pickup.
    PowerupId
);

/// Hostile entity that touched the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitSource {
    /// A regular enemy rammed the player.
    Enemy(EnemyId),
    /// The player flew into the boss hull.
    Boss,
    /// A boss bullet struck the player.
    BossBullet(BossBulletId),
}

/// Result of the player absorbing a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitOutcome {
    /// An active shield soaked the hit and was consumed.
    ShieldAbsorbed,
    /// A life was lost and the invincibility window opened.
    LifeLost {
        /// Lives left after the hit.
        lives_remaining: u32,
    },
    /// The last life was lost.
    Killed,
}

impl HitOutcome {
    /// Reports whether the hit ended the session.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Killed)
    }
}

/// The two scripted bosses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    /// Guardian of wave ten.
    Mid,
    /// Guardian of the last wave.
    Final,
}

impl BossKind {
    /// Boss guarding the provided wave, if it is a boss wave.
    #[must_use]
    pub const fn for_wave(wave: u32) -> Option<Self> {
        if wave == MID_BOSS_WAVE || wave == FINAL_BOSS_WAVE {
            Some(Self::for_boss_wave(wave))
        } else {
            None
        }
    }

    /// Boss spawned on a boss wave: the mid boss on wave ten, otherwise the final boss.
    #[must_use]
    pub const fn for_boss_wave(wave: u32) -> Self {
        if wave == MID_BOSS_WAVE {
            Self::Mid
        } else {
            Self::Final
        }
    }

    /// Hull width.
    #[must_use]
    pub const fn width(self) -> f32 {
        match self {
            Self::Mid => 80.0,
            Self::Final => 120.0,
        }
    }

    /// Hull height.
    #[must_use]
    pub const fn height(self) -> f32 {
        match self {
            Self::Mid => 60.0,
            Self::Final => 80.0,
        }
    }

    /// Starting and maximum health.
    #[must_use]
    pub const fn max_health(self) -> u32 {
        match self {
            Self::Mid => 30,
            Self::Final => 50,
        }
    }

    /// Oscillation amplitude per tick.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Mid => 0.8,
            Self::Final => 0.6,
        }
    }

    /// Score awarded for destroying the boss.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            Self::Mid => 500,
            Self::Final => 1000,
        }
    }

    /// Number of bullets in the aimed spread and the angular step between them.
    #[must_use]
    pub const fn spread(self) -> (u32, f32) {
        match self {
            Self::Mid => (3, 0.3),
            Self::Final => (5, 0.25),
        }
    }

    /// Whether the boss adds an eight-direction ring to its volleys.
    #[must_use]
    pub const fn fires_ring(self) -> bool {
        match self {
            Self::Mid => false,
            Self::Final => true,
        }
    }
}

/// Effects granted by pickups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerupKind {
    /// Absorbs the next hit.
    Shield,
    /// Shortens the firing cooldown.
    RapidFire,
    /// Fires a three-bullet fan.
    TripleShot,
    /// Grants a life, or bonus score at the cap.
    ExtraLife,
    /// Multiplies bullet damage by a wave-scaled factor.
    DamageBoost,
}

impl PowerupKind {
    /// Every powerup kind in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Shield,
        Self::RapidFire,
        Self::TripleShot,
        Self::ExtraLife,
        Self::DamageBoost,
    ];

    /// How long the effect lasts, or `None` for instant effects.
    #[must_use]
    pub const fn duration(self) -> Option<Duration> {
        match self {
            Self::Shield | Self::RapidFire | Self::TripleShot => Some(Duration::from_secs(20)),
            Self::DamageBoost => Some(Duration::from_secs(15)),
            Self::ExtraLife => None,
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Shield => "shield",
            Self::RapidFire => "rapid-fire",
            Self::TripleShot => "triple-shot",
            Self::ExtraLife => "extra-life",
            Self::DamageBoost => "damage-boost",
        }
    }
}

/// Hit points of a damageable hostile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    /// Creates full health with the provided maximum.
    #[must_use]
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Remaining health as a fraction of the maximum.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }

    /// Applies `amount` damage and reports whether the health is depleted.
    ///
    /// The whole part is subtracted directly. The fractional remainder becomes
    /// one extra point when `roll` (uniform in `0.0..1.0`) falls below it, so
    /// the expected loss equals `amount`.
    pub fn take_damage(&mut self, amount: f32, roll: f32) -> bool {
        let amount = amount.max(0.0);
        let whole = amount.floor();
        let fraction = amount - whole;
        let mut damage = whole as u32;
        if roll < fraction {
            damage = damage.saturating_add(1);
        }
        self.current = self.current.saturating_sub(damage);
        self.is_depleted()
    }
}

/// Timed effect currently applied to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActivePowerup {
    /// Effect that is active.
    pub kind: PowerupKind,
    /// Instant after which the effect ends.
    pub expires_at: Duration,
}

impl ActivePowerup {
    /// Time left before the effect ends.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Duration {
        self.expires_at.saturating_sub(now)
    }

    /// Reports whether the effect ended strictly before `now`.
    #[must_use]
    pub fn is_expired(&self, now: Duration) -> bool {
        now > self.expires_at
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Centre of the ship.
    pub position: Vec2,
    /// Facing angle in radians.
    pub angle: f32,
    /// Diameter of the ship.
    pub size: f32,
    /// Lives left.
    pub lives: u32,
    /// Instant the invincibility window closes, when one is open.
    pub invincible_until: Option<Duration>,
    /// Timed effects in pickup order.
    pub powerups: Vec<ActivePowerup>,
    /// Damage scalar applied to fired bullets.
    pub damage_multiplier: f32,
}

impl PlayerSnapshot {
    /// Reports whether collisions are currently ignored.
    #[must_use]
    pub const fn is_invincible(&self) -> bool {
        self.invincible_until.is_some()
    }

    /// Reports whether the provided timed effect is active.
    #[must_use]
    pub fn has_powerup(&self, kind: PowerupKind) -> bool {
        self.powerups.iter().any(|active| active.kind == kind)
    }
}

/// Immutable representation of a single enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Centre of the enemy.
    pub position: Vec2,
    /// Diameter of the enemy.
    pub size: f32,
    /// Distance travelled per tick.
    pub speed: f32,
    /// Remaining hit points.
    pub health: Health,
    /// Whether the hit flash is showing.
    pub flashing: bool,
}

/// Read-only snapshot describing all enemies in the arena.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of the active boss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossSnapshot {
    /// Kind of boss.
    pub kind: BossKind,
    /// Centre of the hull.
    pub position: Vec2,
    /// Remaining hit points.
    pub health: Health,
    /// Whether the hit flash is showing.
    pub flashing: bool,
}

impl BossSnapshot {
    /// Reports whether the point lies strictly inside the hull.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        self.overlaps(point, 0.0)
    }

    /// Reports whether a circle of `radius` centred on `point` overlaps the hull.
    ///
    /// The hull is inflated by `radius` on every side.
    #[must_use]
    pub fn overlaps(&self, point: Vec2, radius: f32) -> bool {
        let half_width = self.kind.width() / 2.0 + radius;
        let half_height = self.kind.height() / 2.0 + radius;
        point.x > self.position.x - half_width
            && point.x < self.position.x + half_width
            && point.y > self.position.y - half_height
            && point.y < self.position.y + half_height
    }
}

/// Immutable representation of a player bullet.
#[derive(Clone, Debug, PartialEq)]
pub struct BulletSnapshot {
    /// Unique identifier assigned to the bullet.
    pub id: BulletId,
    /// Centre of the bullet.
    pub position: Vec2,
    /// Displacement applied each tick.
    pub velocity: Vec2,
    /// Diameter of the bullet.
    pub size: f32,
    /// Damage dealt on hit.
    pub damage: f32,
    /// Recent positions, oldest first.
    pub trail: Vec<Vec2>,
}

/// Immutable representation of a boss bullet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossBulletSnapshot {
    /// Unique identifier assigned to the bullet.
    pub id: BossBulletId,
    /// Centre of the bullet.
    pub position: Vec2,
    /// Heading in radians.
    pub angle: f32,
    /// Diameter of the bullet.
    pub size: f32,
}

/// Immutable representation of a pickup on the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerupSnapshot {
    /// Unique identifier assigned to the pickup.
    pub id: PowerupId,
    /// Effect granted on pickup.
    pub kind: PowerupKind,
    /// Centre of the pickup.
    pub position: Vec2,
    /// Diameter of the pickup.
    pub size: f32,
    /// Spin angle in radians.
    pub angle: f32,
}

/// State surfaced to the heads-up display and menus.
#[derive(Clone, Debug, PartialEq)]
pub struct HudSnapshot {
    /// Current session state.
    pub state: GameState,
    /// Accumulated score.
    pub score: u32,
    /// Current wave.
    pub wave: u32,
    /// Waves required for victory.
    pub max_waves: u32,
    /// Lives left.
    pub lives: u32,
    /// Active timed effects with their remaining time.
    pub powerups: Vec<(PowerupKind, Duration)>,
    /// Damage scalar applied to fired bullets.
    pub damage_multiplier: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn unit_damage_reduces_health_exactly() {
        let mut health = Health::full(10);
        for _ in 0..4 {
            let _ = health.take_damage(1.0, 0.99);
        }
        assert_eq!(health.current(), 6);
    }

    #[test]
    fn depleting_damage_reports_destroyed() {
        let mut health = Health::full(2);
        assert!(!health.take_damage(1.0, 0.0));
        assert!(health.take_damage(1.0, 0.0));
        assert!(health.is_depleted());
        assert!(health.take_damage(3.0, 0.0), "overkill saturates at zero");
        assert_eq!(health.current(), 0);
    }

    #[test]
    fn fractional_damage_rounds_on_roll() {
        let mut low_roll = Health::full(10);
        let _ = low_roll.take_damage(2.5, 0.2);
        assert_eq!(low_roll.current(), 7);

        let mut high_roll = Health::full(10);
        let _ = high_roll.take_damage(2.5, 0.7);
        assert_eq!(high_roll.current(), 8);
    }

    #[test]
    fn fractional_damage_preserves_expectation() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_0001);
        let trials = 20_000;
        let mut extra = 0;
        for _ in 0..trials {
            let mut health = Health::full(10);
            let _ = health.take_damage(2.5, rng.gen::<f32>());
            let lost = 10 - health.current();
            assert!(lost == 2 || lost == 3, "lost {lost}");
            if lost == 3 {
                extra += 1;
            }
        }
        let ratio = f64::from(extra) / f64::from(trials);
        assert!((ratio - 0.5).abs() < 0.02, "ratio {ratio}");
    }

    #[test]
    fn boss_kind_follows_wave() {
        assert_eq!(BossKind::for_wave(10), Some(BossKind::Mid));
        assert_eq!(BossKind::for_wave(20), Some(BossKind::Final));
        assert_eq!(BossKind::for_wave(9), None);
        assert_eq!(BossKind::for_boss_wave(20), BossKind::Final);
    }

    #[test]
    fn diagonal_keys_resolve_both_axes() {
        let keys = MovementKeys {
            up: true,
            right: true,
            ..MovementKeys::default()
        };
        assert_eq!(keys.axes(), Vec2::new(1.0, -1.0));
        assert_eq!(MovementKeys::default().axes(), Vec2::ZERO);
    }

    #[test]
    fn boss_hull_is_open_rectangle() {
        let boss = BossSnapshot {
            kind: BossKind::Mid,
            position: Vec2::new(100.0, 100.0),
            health: Health::full(30),
            flashing: false,
        };
        assert!(boss.contains(Vec2::new(100.0, 100.0)));
        assert!(!boss.contains(Vec2::new(140.0, 100.0)), "edge is exclusive");
        assert!(boss.overlaps(Vec2::new(145.0, 100.0), 10.0));
    }

    #[test]
    fn timed_powerups_expire_strictly_after_deadline() {
        let active = ActivePowerup {
            kind: PowerupKind::Shield,
            expires_at: Duration::from_millis(500),
        };
        assert!(!active.is_expired(Duration::from_millis(500)));
        assert!(active.is_expired(Duration::from_millis(501)));
        assert_eq!(active.remaining(Duration::from_millis(200)), Duration::from_millis(300));
        assert_eq!(PowerupKind::ExtraLife.duration(), None);
    }
}
