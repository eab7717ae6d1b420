//! Barrels: the only source of projectiles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{sizes, AmmoCategory};
use crate::geometry::{heading_vector, rotate_by};
use crate::timer::{Seconds, Stopwatch};

use super::EntityId;

/// A gun mounted on a tank or turret.
///
/// A barrel is owned exclusively by its mount and dies with it. Its position
/// is derived from the mount's center, so it has no registry entry of its own.
///
/// # Example
///
/// ```
/// use blastzone_core::config::AmmoCategory;
/// use blastzone_core::entity::{Barrel, EntityId};
/// use glam::Vec2;
///
/// let mut barrel = Barrel::new(AmmoCategory::Rapid, Vec2::ZERO);
/// let owner = EntityId::new(1);
///
/// assert!(barrel.fire(owner, Vec2::ZERO, 0.0).is_some());
/// // Still cooling down.
/// assert!(barrel.fire(owner, Vec2::ZERO, 0.1).is_none());
/// assert_eq!(barrel.ammo(), 19);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrel {
    category: AmmoCategory,
    ammo: u32,
    mount: Vec2,
    length: f32,
    rotation: f32,
    last_fired: Stopwatch,
}

/// A successful trigger pull: where and how the projectile leaves the nozzle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Entity that owns the firing barrel.
    pub owner: EntityId,
    /// Nozzle position.
    pub position: Vec2,
    /// Barrel rotation at the moment of firing.
    pub rotation: f32,
    /// Ammo category of the barrel.
    pub category: AmmoCategory,
}

impl Barrel {
    /// Creates a full barrel mounted at `mount`, an offset from the owner's
    /// center expressed in the barrel's own frame.
    #[must_use]
    pub fn new(category: AmmoCategory, mount: Vec2) -> Self {
        Self {
            category,
            ammo: category.stats().max_ammo,
            mount,
            length: sizes::BARREL_LENGTH,
            rotation: 0.0,
            last_fired: Stopwatch::idle(),
        }
    }

    /// Ammo category.
    #[must_use]
    pub const fn category(&self) -> AmmoCategory {
        self.category
    }

    /// Rounds left in the magazine.
    #[must_use]
    pub const fn ammo(&self) -> u32 {
        self.ammo
    }

    /// Reach of this barrel's projectiles.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.category.range()
    }

    /// Facing in degrees.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Turns the barrel to `rotation_deg`.
    pub fn set_rotation(&mut self, rotation_deg: f32) {
        self.rotation = rotation_deg;
    }

    /// Where projectiles appear, given the owner's center.
    #[must_use]
    pub fn nozzle(&self, origin: Vec2) -> Vec2 {
        origin + rotate_by(self.mount, self.rotation) + heading_vector(self.rotation) * self.length
    }

    /// Returns `true` if the barrel can fire at `now`.
    #[must_use]
    pub fn is_ready(&self, now: Seconds) -> bool {
        self.ammo > 0 && self.last_fired.has_elapsed(now, self.category.stats().fire_delay)
    }

    /// Pulls the trigger.
    ///
    /// Does nothing and returns `None` when the magazine is empty or the fire
    /// delay has not elapsed. Otherwise consumes one round, restarts the
    /// cooldown, and returns the shot for the caller to spawn.
    pub fn fire(&mut self, owner: EntityId, origin: Vec2, now: Seconds) -> Option<Shot> {
        if !self.is_ready(now) {
            return None;
        }
        self.ammo -= 1;
        self.last_fired.restart(now);
        Some(Shot {
            owner,
            position: self.nozzle(origin),
            rotation: self.rotation,
            category: self.category,
        })
    }

    /// Refills the magazine.
    pub fn reload(&mut self) {
        self.ammo = self.category.stats().max_ammo;
    }
}
