//! Projectiles: straight-line, friction-free shots.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::sizes;
use crate::geometry::{heading_vector, HitBox};
use crate::timer::Seconds;

use super::{Collidable, EntityId, Shot};

/// An in-flight shot.
///
/// `owner` is a plain id comparison, not a handle: ids are never reused, so
/// a destroyed owner simply matches nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Center position.
    pub position: Vec2,
    /// Constant velocity.
    pub velocity: Vec2,
    /// Damage dealt on impact.
    pub damage: f32,
    /// Entity whose barrel fired this projectile.
    pub owner: EntityId,
    /// When the projectile was fired.
    pub spawned_at: Seconds,
    /// Seconds until the projectile expires.
    pub lifetime: Seconds,
}

impl Projectile {
    /// Builds the projectile for a shot fired at `now`.
    #[must_use]
    pub fn from_shot(shot: &Shot, now: Seconds) -> Self {
        let stats = shot.category.stats();
        Self {
            position: shot.position,
            velocity: heading_vector(shot.rotation) * stats.speed,
            damage: stats.damage,
            owner: shot.owner,
            spawned_at: now,
            lifetime: stats.lifetime,
        }
    }

    /// `true` once strictly more than `lifetime` has passed since firing.
    #[must_use]
    pub fn is_expired(&self, now: Seconds) -> bool {
        now - self.spawned_at > self.lifetime
    }

    /// Moves along the velocity for `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    /// `false` for the entity that fired this projectile.
    #[must_use]
    pub fn can_hit(&self, other: EntityId) -> bool {
        other != self.owner
    }
}

impl Collidable for Projectile {
    fn hit_box(&self) -> HitBox {
        HitBox::new(self.position, sizes::PROJECTILE)
    }
}
