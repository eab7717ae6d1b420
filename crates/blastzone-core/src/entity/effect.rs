//! Transient visual markers. They carry no simulation weight; the
//! presentation layer reads them from the arena and they expire on their own.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::timer::Seconds;

/// Kind of visual marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Flash at a barrel's nozzle when it fires.
    MuzzleFlash,
    /// Burst where a projectile struck something damageable.
    Explosion,
    /// Track marks left behind by a moving tank.
    Tracks,
}

/// A visual marker with a fixed lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Marker kind.
    pub kind: EffectKind,
    /// Center position.
    pub position: Vec2,
    /// Orientation in degrees.
    pub rotation: f32,
    /// When the marker appeared.
    pub spawned_at: Seconds,
    /// How long it lingers.
    pub lifetime: Seconds,
}

impl Effect {
    /// `true` once strictly more than `lifetime` has passed.
    #[must_use]
    pub fn is_expired(&self, now: Seconds) -> bool {
        now - self.spawned_at > self.lifetime
    }
}
