//! Scripted pilot used when no human is at the controls.

use glam::Vec2;
use nova_siege_core::{Arena, GameState, MovementKeys};
use nova_siege_rendering::FrameInput;
use nova_siege_world::{query, World};

// Headings shorter than this along an axis leave that axis idle.
const AXIS_DEADZONE: f32 = 0.3;

/// Aims at the closest hostile, dodges anything within reach and collects pickups.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Autopilot {
    danger_radius: f32,
    edge_margin: f32,
}

impl Autopilot {
    pub(crate) const fn new() -> Self {
        Self {
            danger_radius: 110.0,
            edge_margin: 40.0,
        }
    }

    /// Produces the input for the next tick.
    ///
    /// Outside of play the pilot presses the primary action, which starts a
    /// fresh session.
    pub(crate) fn steer(&self, world: &World) -> FrameInput {
        if query::game_state(world) != GameState::Playing {
            return FrameInput {
                primary_action: true,
                ..FrameInput::default()
            };
        }

        let arena = query::arena(world);
        let position = query::player_position(world);
        let target = aim(world, position);

        let mut heading = self.evade(world, position);
        if heading == Vec2::ZERO {
            heading = nearest_pickup(world, position)
                .map_or(Vec2::ZERO, |pickup| (pickup - position).normalize_or_zero());
        }
        heading += self.edge_push(arena, position);

        FrameInput {
            pointer: Some(target.unwrap_or_else(|| arena.center())),
            keys: keys_toward(heading),
            primary_action: target.is_some(),
            home_requested: false,
        }
    }

    fn evade(&self, world: &World, position: Vec2) -> Vec2 {
        let enemies = query::enemy_view(world);
        let threats = enemies
            .iter()
            .map(|enemy| enemy.position)
            .chain(query::boss_bullets(world).into_iter().map(|bullet| bullet.position))
            .chain(query::boss(world).map(|boss| boss.position));

        let mut push = Vec2::ZERO;
        for threat in threats {
            let away = position - threat;
            let distance = away.length();
            if distance < self.danger_radius && distance > f32::EPSILON {
                push += away / (distance * distance);
            }
        }
        push.normalize_or_zero()
    }

    fn edge_push(&self, arena: Arena, position: Vec2) -> Vec2 {
        let mut push = Vec2::ZERO;
        if position.x < self.edge_margin {
            push.x += 1.0;
        } else if position.x > arena.width() - self.edge_margin {
            push.x -= 1.0;
        }
        if position.y < self.edge_margin {
            push.y += 1.0;
        } else if position.y > arena.height() - self.edge_margin {
            push.y -= 1.0;
        }
        push
    }
}

fn aim(world: &World, position: Vec2) -> Option<Vec2> {
    if let Some(boss) = query::boss(world) {
        return Some(boss.position);
    }
    query::enemy_view(world)
        .iter()
        .map(|enemy| enemy.position)
        .min_by(|a, b| {
            a.distance_squared(position)
                .total_cmp(&b.distance_squared(position))
        })
}

fn nearest_pickup(world: &World, position: Vec2) -> Option<Vec2> {
    query::powerups(world)
        .into_iter()
        .map(|powerup| powerup.position)
        .min_by(|a, b| {
            a.distance_squared(position)
                .total_cmp(&b.distance_squared(position))
        })
}

fn keys_toward(heading: Vec2) -> MovementKeys {
    MovementKeys {
        up: heading.y < -AXIS_DEADZONE,
        down: heading.y > AXIS_DEADZONE,
        left: heading.x < -AXIS_DEADZONE,
        right: heading.x > AXIS_DEADZONE,
    }
}
