//! Turrets: stationary gun emplacements.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{sizes, AmmoCategory, TURRET_MAX_HEALTH};
use crate::geometry::HitBox;
use crate::timer::Seconds;

use super::{Barrel, Collidable, Damageable, EntityId, Health, Rotatable, Shot};

/// A stationary, damageable unit with one barrel. Turrets block movement
/// like obstacles but are driven by an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turret {
    position: Vec2,
    health: Health,
    barrel: Barrel,
    /// Cosmetic barrel variant from the level file.
    pub special: u8,
}

impl Turret {
    /// A turret at `position` firing `category` rounds.
    #[must_use]
    pub fn new(position: Vec2, category: AmmoCategory, special: u8) -> Self {
        Self {
            position,
            health: Health::full(TURRET_MAX_HEALTH),
            barrel: Barrel::new(category, Vec2::ZERO),
            special,
        }
    }

    /// The turret's barrel.
    #[must_use]
    pub const fn barrel(&self) -> &Barrel {
        &self.barrel
    }

    /// Rounds left.
    #[must_use]
    pub const fn ammo(&self) -> u32 {
        self.barrel.ammo()
    }

    /// Reach of the turret's projectiles.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.barrel.range()
    }

    /// Turns the barrel to `bearing`.
    pub fn aim(&mut self, bearing: f32) {
        self.barrel.set_rotation(bearing);
    }

    /// Fires the barrel if it is ready.
    pub fn fire(&mut self, id: EntityId, now: Seconds) -> Option<Shot> {
        self.barrel.fire(id, self.position, now)
    }

    /// Refills the barrel.
    pub fn reload(&mut self) {
        self.barrel.reload();
    }
}

impl Collidable for Turret {
    fn hit_box(&self) -> HitBox {
        HitBox::new(self.position, sizes::TURRET)
    }
}

impl Rotatable for Turret {
    fn rotation(&self) -> f32 {
        self.barrel.rotation()
    }

    fn set_rotation(&mut self, rotation_deg: f32) {
        self.aim(rotation_deg);
    }
}

impl Damageable for Turret {
    fn health(&self) -> &Health {
        &self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turret_fires_along_aim() {
        let mut turret = Turret::new(Vec2::new(50.0, 50.0), AmmoCategory::Power, 1);
        turret.aim(180.0);
        let shot = turret.fire(EntityId::new(4), 0.0).unwrap();
        assert!(shot.position.abs_diff_eq(Vec2::new(26.0, 50.0), 1e-3));
        assert_eq!(turret.ammo(), 19);
        assert!((turret.range() - 300.0).abs() < 1e-3);
    }

    #[test]
    fn turret_is_damageable() {
        let mut turret = Turret::new(Vec2::ZERO, AmmoCategory::Standard, 1);
        assert!(!turret.inflict_damage(99.0));
        assert!(turret.inflict_damage(1.0));
    }

    #[test]
    fn rotatable_drives_barrel() {
        let mut turret = Turret::new(Vec2::ZERO, AmmoCategory::Standard, 1);
        turret.rotate_by(30.0);
        turret.rotate_by(15.0);
        assert_eq!(turret.rotation(), 45.0);
    }
}
