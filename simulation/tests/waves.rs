use std::time::Duration;

use glam::Vec2;
use nova_siege_core::{
    Arena, BossKind, Command, Event, GameState, MovementKeys, FINAL_BOSS_WAVE, MAX_WAVES,
};
use nova_siege_system_collision::{Collision, Scene};
use nova_siege_system_progression::Progression;
use nova_siege_system_spawning::{enemy_health, total_enemies, Config, Spawning};
use nova_siege_world::{self as world, query, World};

struct Harness {
    world: World,
    spawning: Spawning,
    collision: Collision,
    progression: Progression,
}

impl Harness {
    fn at_wave(wave: u32) -> Self {
        let mut world = World::new();
        let mut ignored = Vec::new();
        world::apply(&mut world, Command::StartGame, &mut ignored);
        for _ in 1..wave {
            world::apply(&mut world, Command::AdvanceWave, &mut ignored);
        }
        assert_eq!(query::wave(&world), wave);

        Self {
            world,
            spawning: Spawning::new(Config::new(
                Arena::default(),
                Duration::from_secs(10),
                32,
                0x0bad_cafe,
            )),
            collision: Collision::new(0x5eed),
            progression: Progression::new(),
        }
    }

    fn apply(&mut self, commands: impl IntoIterator<Item = Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        events
    }

    fn pump(&mut self, mut events: Vec<Event>) -> Vec<Event> {
        let mut log = Vec::new();
        while !events.is_empty() {
            let mut commands = Vec::new();
            let state = query::game_state(&self.world);
            self.progression.handle(&events, state, &mut commands);
            self.spawning.handle(
                &events,
                state,
                query::player_position(&self.world),
                &mut commands,
            );
            log.append(&mut events);
            events = self.apply(commands);
        }
        log
    }

    fn collisions(&mut self) -> Vec<Command> {
        let player = query::player(&self.world);
        let enemies = query::enemy_view(&self.world);
        let boss = query::boss(&self.world);
        let bullets = query::bullets(&self.world);
        let boss_bullets = query::boss_bullets(&self.world);
        let powerups = query::powerups(&self.world);
        let mut commands = Vec::new();
        self.collision.handle(
            query::game_state(&self.world),
            Scene {
                player: &player,
                enemies: &enemies,
                boss: boss.as_ref(),
                bullets: &bullets,
                boss_bullets: &boss_bullets,
                powerups: &powerups,
            },
            &mut commands,
        );
        commands
    }
}

#[test]
fn clearing_last_enemy_of_wave_three_starts_wave_four() {
    let mut harness = Harness::at_wave(3);
    let _ = harness.apply([
        Command::SpawnEnemy {
            position: Vec2::new(310.0, 200.0),
            size: 20.0,
            speed: 1.5,
            health: 1,
        },
        Command::FirePlayerWeapon {
            pointer: Vec2::new(400.0, 200.0),
        },
    ]);

    let commands = harness.collisions();
    let events = harness.apply(commands);
    let log = harness.pump(events);

    assert!(log.contains(&Event::WaveCleared { wave: 3 }));
    assert!(log.contains(&Event::WaveStarted { wave: 4 }));
    assert_eq!(query::wave(&harness.world), 4);
    assert_eq!(query::enemy_count(&harness.world), total_enemies(4));
    assert!(query::enemy_view(&harness.world)
        .iter()
        .all(|enemy| enemy.health.current() == enemy_health(4)));
    assert_eq!(query::player(&harness.world).lives, 3);
}

#[test]
fn boss_wave_spawns_exactly_one_boss() {
    let mut harness = Harness::at_wave(9);
    let log = harness.pump(vec![Event::WaveStarted { wave: 9 }]);
    assert!(log.iter().any(|event| matches!(event, Event::EnemySpawned { .. })));

    let mut harness = Harness::at_wave(10);
    let log = harness.pump(vec![Event::WaveStarted { wave: 10 }]);
    assert_eq!(
        log,
        vec![
            Event::WaveStarted { wave: 10 },
            Event::BossSpawned {
                kind: BossKind::Mid
            }
        ]
    );
    assert_eq!(query::enemy_count(&harness.world), 0);
}

#[test]
fn final_boss_kill_is_victory_not_another_wave() {
    let mut harness = Harness::at_wave(FINAL_BOSS_WAVE);
    let _ = harness.pump(vec![Event::WaveStarted {
        wave: FINAL_BOSS_WAVE,
    }]);
    assert!(query::is_boss_active(&harness.world));

    let up = MovementKeys {
        up: true,
        ..MovementKeys::default()
    };
    let _ = harness.apply(
        std::iter::repeat(Command::MovePlayer {
            keys: up,
            pointer: Vec2::new(300.0, 0.0),
        })
        .take(47),
    );

    let mut log = Vec::new();
    for step in 1..=200u64 {
        let _ = harness.apply([
            Command::Tick {
                now: Duration::from_millis(200 * step),
            },
            Command::FirePlayerWeapon {
                pointer: Vec2::new(300.0, 0.0),
            },
        ]);
        let damage: Vec<Command> = harness
            .collisions()
            .into_iter()
            .filter(|command| matches!(command, Command::DamageBoss { .. }))
            .collect();
        let events = harness.apply(damage);
        log.extend(harness.pump(events));
        if query::game_state(&harness.world) != GameState::Playing {
            break;
        }
    }

    assert_eq!(query::game_state(&harness.world), GameState::Victory);
    assert_eq!(query::wave(&harness.world), MAX_WAVES + 1);
    assert_eq!(query::score(&harness.world), BossKind::Final.points());
    assert!(log.contains(&Event::Victory {
        score: BossKind::Final.points()
    }));
    assert!(!log
        .iter()
        .any(|event| matches!(event, Event::WaveStarted { .. })));
    assert_eq!(query::enemy_count(&harness.world), 0);
}
