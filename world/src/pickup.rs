//! Powerup pickups resting on the field.

use glam::Vec2;
use nova_siege_core::{PowerupId, PowerupKind, PowerupSnapshot};

const PICKUP_SIZE: f32 = 15.0;
const PICKUP_SPIN: f32 = 0.05;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Pickup {
    pub(crate) id: PowerupId,
    pub(crate) kind: PowerupKind,
    position: Vec2,
    angle: f32,
}

impl Pickup {
    pub(crate) fn new(id: PowerupId, kind: PowerupKind, position: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            angle: 0.0,
        }
    }

    pub(crate) fn spin(&mut self) {
        self.angle += PICKUP_SPIN;
    }

    pub(crate) fn snapshot(&self) -> PowerupSnapshot {
        PowerupSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            size: PICKUP_SIZE,
            angle: self.angle,
        }
    }
}
