#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Nova Siege adapters.
//!
//! Adapters implement [`Canvas`] for their drawing surface and [`RenderingBackend`]
//! for their frame loop. [`draw_world`] turns the world queries into primitive
//! draw calls, so every backend presents the same scene.

use anyhow::Result as AnyResult;
use glam::Vec2;
use nova_siege_core::{
    Arena, BossBulletSnapshot, BossSnapshot, BulletSnapshot, EnemySnapshot,
    MovementKeys, PlayerSnapshot, PowerupKind, PowerupSnapshot,
};
use nova_siege_world::{query, World};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with the provided alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Fixed colors of the scene.
pub mod palette {
    use super::Color;
    use nova_siege_core::{BossKind, PowerupKind};

    /// Default clear color behind the arena.
    pub const BACKGROUND: Color = Color::from_rgb_u8(8, 8, 24);
    /// Hull of the player ship.
    pub const PLAYER: Color = Color::from_rgb_u8(200, 220, 255);
    /// Shield bubble drawn around the ship.
    pub const SHIELD: Color = Color::new(100.0 / 255.0, 200.0 / 255.0, 1.0, 150.0 / 255.0);
    /// Projectiles fired by bosses.
    pub const BOSS_BULLET: Color = Color::from_rgb_u8(255, 0, 0);
    /// Depleted part of the boss health bar.
    pub const HEALTH_TRACK: Color = Color::from_rgb_u8(60, 60, 60);
    /// Remaining part of the boss health bar.
    pub const HEALTH_FILL: Color = Color::from_rgb_u8(0, 220, 80);

    /// Color of a pickup of the provided kind.
    #[must_use]
    pub const fn powerup(kind: PowerupKind) -> Color {
        match kind {
            PowerupKind::Shield => Color::from_rgb_u8(100, 200, 255),
            PowerupKind::RapidFire => Color::from_rgb_u8(255, 100, 0),
            PowerupKind::TripleShot => Color::from_rgb_u8(0, 255, 0),
            PowerupKind::ExtraLife => Color::from_rgb_u8(255, 50, 100),
            PowerupKind::DamageBoost => Color::from_rgb_u8(255, 50, 255),
        }
    }

    /// Hull color of a boss.
    #[must_use]
    pub const fn boss(kind: BossKind) -> Color {
        match kind {
            BossKind::Mid => Color::from_rgb_u8(255, 0, 100),
            BossKind::Final => Color::from_rgb_u8(255, 50, 0),
        }
    }

    /// Trail color of a player bullet carrying the provided damage.
    #[must_use]
    pub fn bullet_trail(damage: f32) -> Color {
        if damage >= 2.5 {
            Color::from_rgb_u8(255, 50, 255)
        } else if damage >= 1.5 {
            Color::from_rgb_u8(255, 150, 255)
        } else {
            Color::from_rgb_u8(0, 200, 255)
        }
    }

    /// Reddish tint of an enemy, stable for its identifier.
    #[must_use]
    pub const fn enemy(seed: u32) -> Color {
        let red = 200 + (seed.wrapping_mul(37) % 56) as u8;
        let blue = (seed.wrapping_mul(53) % 101) as u8;
        Color::from_rgb_u8(red, 0, blue)
    }
}

/// Describes how the arena maps onto the adapter's drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Presentation {
    arena: Arena,
    scale: f32,
    background: Color,
}

impl Presentation {
    /// Creates a presentation of `arena` magnified by `scale` screen units per arena unit.
    pub fn new(arena: Arena, scale: f32, background: Color) -> Result<Self, RenderingError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(RenderingError::InvalidScale { scale });
        }

        Ok(Self {
            arena,
            scale,
            background,
        })
    }

    /// Arena being presented.
    #[must_use]
    pub const fn arena(&self) -> Arena {
        self.arena
    }

    /// Screen units per arena unit.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Clear color of each frame.
    #[must_use]
    pub const fn background(&self) -> Color {
        self.background
    }

    /// Size of the drawing surface in screen units.
    #[must_use]
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.arena.width(), self.arena.height()) * self.scale
    }

    /// Maps an arena point onto the drawing surface.
    #[must_use]
    pub fn to_screen(&self, point: Vec2) -> Vec2 {
        point * self.scale
    }

    /// Maps a screen point back into the arena, clamped to its bounds.
    #[must_use]
    pub fn to_arena(&self, point: Vec2) -> Vec2 {
        self.arena.clamp(point / self.scale)
    }
}

/// Input snapshot gathered by adapters before updating the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer position in arena units, when the pointer is over the surface.
    pub pointer: Option<Vec2>,
    /// Movement keys held on this frame.
    pub keys: MovementKeys,
    /// Whether the primary action was held on this frame.
    pub primary_action: bool,
    /// Whether the adapter detected a request to leave for the title screen.
    pub home_requested: bool,
}

/// Decision returned by the frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Keep presenting frames.
    Continue,
    /// Stop the frame loop after this frame.
    Exit,
}

/// Drawing surface that accepts primitives in screen units.
pub trait Canvas {
    /// Fills the whole surface.
    fn clear(&mut self, color: Color);

    /// Draws a filled circle.
    fn circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Draws a filled axis-aligned rectangle.
    fn rectangle(&mut self, center: Vec2, size: Vec2, color: Color);

    /// Draws a line segment.
    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color);

    /// Draws a filled convex polygon.
    fn polygon(&mut self, points: &[Vec2], color: Color);
}

/// Primitive captured by a [`RecordingCanvas`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    /// Surface cleared.
    Clear(Color),
    /// Filled circle.
    Circle {
        /// Centre in screen units.
        center: Vec2,
        /// Radius in screen units.
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// Filled rectangle.
    Rectangle {
        /// Centre in screen units.
        center: Vec2,
        /// Width and height in screen units.
        size: Vec2,
        /// Fill color.
        color: Color,
    },
    /// Line segment.
    Line {
        /// Start point in screen units.
        from: Vec2,
        /// End point in screen units.
        to: Vec2,
        /// Stroke width in screen units.
        thickness: f32,
        /// Stroke color.
        color: Color,
    },
    /// Filled polygon.
    Polygon {
        /// Vertices in screen units.
        points: Vec<Vec2>,
        /// Fill color.
        color: Color,
    },
}

/// Canvas that records primitives instead of rasterising them.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    /// Creates an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Primitives recorded since the last reset.
    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Discards every recorded primitive.
    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Color) {
        self.calls.push(DrawCall::Clear(color));
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
        });
    }

    fn rectangle(&mut self, center: Vec2, size: Vec2, color: Color) {
        self.calls.push(DrawCall::Rectangle {
            center,
            size,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            thickness,
            color,
        });
    }

    fn polygon(&mut self, points: &[Vec2], color: Color) {
        self.calls.push(DrawCall::Polygon {
            points: points.to_vec(),
            color,
        });
    }
}

/// Draws the current world onto the canvas.
///
/// Layers are painted back to front: pickups, bullet trails, enemies, the boss,
/// boss bullets, and finally the ship.
pub fn draw_world<C>(world: &World, presentation: &Presentation, canvas: &mut C)
where
    C: Canvas + ?Sized,
{
    canvas.clear(presentation.background());

    for powerup in query::powerups(world) {
        draw_powerup(&powerup, presentation, canvas);
    }
    for bullet in query::bullets(world) {
        draw_bullet(&bullet, presentation, canvas);
    }
    for enemy in query::enemy_view(world).iter() {
        draw_enemy(enemy, presentation, canvas);
    }
    if let Some(boss) = query::boss(world) {
        draw_boss(&boss, presentation, canvas);
    }
    for bullet in query::boss_bullets(world) {
        draw_boss_bullet(&bullet, presentation, canvas);
    }

    let player = query::player(world);
    let now = query::now(world);
    // Invincible ships blink every 100ms.
    if !(player.is_invincible() && now.as_millis() / 100 % 2 == 1) {
        draw_player(&player, presentation, canvas);
    }
}

fn draw_powerup<C: Canvas + ?Sized>(
    powerup: &PowerupSnapshot,
    presentation: &Presentation,
    canvas: &mut C,
) {
    let half = powerup.size / 2.0;
    let corners = [
        Vec2::new(-half, -half),
        Vec2::new(half, -half),
        Vec2::new(half, half),
        Vec2::new(-half, half),
    ];
    let rotation = Vec2::from_angle(powerup.angle);
    let points: Vec<Vec2> = corners
        .iter()
        .map(|corner| presentation.to_screen(powerup.position + rotation.rotate(*corner)))
        .collect();
    canvas.polygon(&points, palette::powerup(powerup.kind));
}

fn draw_bullet<C: Canvas + ?Sized>(
    bullet: &BulletSnapshot,
    presentation: &Presentation,
    canvas: &mut C,
) {
    let color = palette::bullet_trail(bullet.damage);
    let thickness = bullet.size * presentation.scale() / 2.0;
    let count = bullet.trail.len();
    for (index, segment) in bullet.trail.windows(2).enumerate() {
        let fade = (index + 1) as f32 / count as f32;
        canvas.line(
            presentation.to_screen(segment[0]),
            presentation.to_screen(segment[1]),
            thickness,
            color.with_alpha(fade * 0.6),
        );
    }
    canvas.circle(
        presentation.to_screen(bullet.position),
        bullet.size / 2.0 * presentation.scale(),
        color.lighten(0.5),
    );
}

fn draw_enemy<C: Canvas + ?Sized>(
    enemy: &EnemySnapshot,
    presentation: &Presentation,
    canvas: &mut C,
) {
    let mut color = palette::enemy(enemy.id.get());
    if enemy.flashing {
        color = color.lighten(0.8);
    }
    canvas.circle(
        presentation.to_screen(enemy.position),
        enemy.size / 2.0 * presentation.scale(),
        color,
    );
}

fn draw_boss<C: Canvas + ?Sized>(boss: &BossSnapshot, presentation: &Presentation, canvas: &mut C) {
    let hull = Vec2::new(boss.kind.width(), boss.kind.height());
    let mut color = palette::boss(boss.kind);
    if boss.flashing {
        color = color.lighten(0.8);
    }
    canvas.rectangle(
        presentation.to_screen(boss.position),
        hull * presentation.scale(),
        color,
    );

    let bar_center = boss.position - Vec2::new(0.0, hull.y / 2.0 + 10.0);
    let bar = Vec2::new(hull.x, 5.0);
    canvas.rectangle(
        presentation.to_screen(bar_center),
        bar * presentation.scale(),
        palette::HEALTH_TRACK,
    );
    let ratio = boss.health.ratio();
    let filled = Vec2::new(bar.x * ratio, bar.y);
    let filled_center = bar_center - Vec2::new((bar.x - filled.x) / 2.0, 0.0);
    canvas.rectangle(
        presentation.to_screen(filled_center),
        filled * presentation.scale(),
        palette::HEALTH_FILL,
    );
}

fn draw_boss_bullet<C: Canvas + ?Sized>(
    bullet: &BossBulletSnapshot,
    presentation: &Presentation,
    canvas: &mut C,
) {
    canvas.circle(
        presentation.to_screen(bullet.position),
        bullet.size / 2.0 * presentation.scale(),
        palette::BOSS_BULLET,
    );
}

fn draw_player<C: Canvas + ?Sized>(
    player: &PlayerSnapshot,
    presentation: &Presentation,
    canvas: &mut C,
) {
    let size = player.size;
    let outline = [
        Vec2::new(size, 0.0),
        Vec2::new(size / 2.0, size / 4.0),
        Vec2::new(-size / 2.0, size / 2.0),
        Vec2::new(-size / 2.0, -size / 2.0),
        Vec2::new(size / 2.0, -size / 4.0),
    ];
    let rotation = Vec2::from_angle(player.angle);
    let points: Vec<Vec2> = outline
        .iter()
        .map(|vertex| presentation.to_screen(player.position + rotation.rotate(*vertex)))
        .collect();
    canvas.polygon(&points, palette::PLAYER);

    if player.has_powerup(PowerupKind::Shield) {
        canvas.circle(
            presentation.to_screen(player.position),
            size * presentation.scale(),
            palette::SHIELD,
        );
    }
}

/// Rendering backend capable of presenting Nova Siege sessions.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_frame` closure receives the frame delta and the input
    /// captured by the adapter, advances the session, and draws it onto the
    /// canvas. Returning [`FrameControl::Exit`] ends the loop.
    fn run<F>(self, presentation: Presentation, update_frame: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut dyn Canvas) -> AnyResult<FrameControl>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The presentation scale must be positive and finite.
    InvalidScale {
        /// Provided scale that failed validation.
        scale: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScale { scale } => {
                write!(f, "scale must be positive and finite (received {scale})")
            }
        }
    }
}

impl Error for RenderingError {}
