//! Entity types for the Blast Zone simulation.
//!
//! Entities live in per-category registries inside the [`Arena`]; this module
//! provides the identity types and the concrete kinds stored there:
//! - [`EntityId`]: unique, never-reused identifier
//! - [`EntityTag`]: category classification
//! - [`Tank`], [`Barrel`], [`Turret`], [`Projectile`], [`Pickup`],
//!   [`Obstacle`], [`ItemBox`], [`Effect`]: the concrete kinds
//!
//! # Capabilities
//!
//! Behavior is composed from small traits that each kind implements
//! selectively instead of inheriting from a common base:
//!
//! | Kind       | [`Collidable`] | [`Movable`] | [`Rotatable`] | [`Damageable`] |
//! |------------|:--------------:|:-----------:|:-------------:|:--------------:|
//! | Tank       | yes            | yes         | yes           | yes            |
//! | Turret     | yes            |             | yes           | yes            |
//! | Projectile | yes            |             |               |                |
//! | Pickup     | yes            |             |               |                |
//! | Obstacle   | yes            |             |               |                |
//! | ItemBox    | yes            |             |               |                |
//!
//! # Example
//!
//! ```
//! use blastzone_core::config::{AmmoCategory, TankColor};
//! use blastzone_core::entity::{Damageable, EntityId, Tank};
//! use glam::Vec2;
//!
//! let mut tank = Tank::color_tank(Vec2::ZERO, TankColor::Blue, AmmoCategory::Standard, 768.0);
//! tank.inflict_damage(30.0);
//! assert_eq!(tank.health().current(), 70.0);
//! assert!(EntityId::new(1) < EntityId::new(2));
//! ```
//!
//! [`Arena`]: crate::arena::Arena

pub mod barrel;
pub mod components;
pub mod effect;
pub mod obstacle;
pub mod pickup;
pub mod projectile;
pub mod tank;
pub mod turret;

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::HitBox;

pub use barrel::{Barrel, Shot};
pub use components::{Health, MovementState};
pub use effect::{Effect, EffectKind};
pub use obstacle::{ItemBox, Obstacle, ObstacleKind};
pub use pickup::{ActiveItem, ItemEffect, Pickup, PickupKind};
pub use projectile::Projectile;
pub use tank::Tank;
pub use turret::Turret;

/// Unique identifier for an entity.
///
/// Ids are allocated monotonically by the arena and never reused, so a stale
/// id held after its entity died can never alias a newer entity.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Category of an entity; each category has its own registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// Mobile armored unit (player or enemy).
    Tank,
    /// Stationary gun emplacement.
    Turret,
    /// In-flight shot.
    Projectile,
    /// Loose item waiting to be collected.
    Pickup,
    /// Static blocker (tree, boundary wall).
    Obstacle,
    /// Destructible blocker that drops a pickup when worn out.
    ItemBox,
    /// Transient visual marker (flash, explosion, tracks).
    Effect,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tank => "Tank",
            Self::Turret => "Turret",
            Self::Projectile => "Projectile",
            Self::Pickup => "Pickup",
            Self::Obstacle => "Obstacle",
            Self::ItemBox => "ItemBox",
            Self::Effect => "Effect",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Capability Traits
// =============================================================================

/// Something with a hit box.
pub trait Collidable {
    /// The collision rectangle at the entity's current position.
    fn hit_box(&self) -> HitBox;

    /// Center of the hit box.
    fn position(&self) -> Vec2 {
        self.hit_box().center
    }
}

/// Something integrated by the kinematic integrator.
pub trait Movable {
    /// Current kinematic state.
    fn movement(&self) -> &MovementState;

    /// Mutable kinematic state.
    fn movement_mut(&mut self) -> &mut MovementState;
}

/// Something with a facing.
pub trait Rotatable {
    /// Facing in degrees.
    fn rotation(&self) -> f32;

    /// Turns to face `rotation_deg`.
    fn set_rotation(&mut self, rotation_deg: f32);

    /// Turns by `delta_deg` relative to the current facing.
    fn rotate_by(&mut self, delta_deg: f32) {
        let next = self.rotation() + delta_deg;
        self.set_rotation(next);
    }
}

/// Something that takes damage and can be destroyed by it.
pub trait Damageable {
    /// Current hit points.
    fn health(&self) -> &Health;

    /// Mutable hit points.
    fn health_mut(&mut self) -> &mut Health;

    /// Subtracts `amount` hit points and returns `true` if the entity is now
    /// destroyed (health at or below zero).
    fn inflict_damage(&mut self, amount: f32) -> bool {
        self.health_mut().damage(amount);
        self.health().is_depleted()
    }

    /// Restores `fraction` of max health, clamped at max. Returns the amount
    /// actually restored.
    fn heal(&mut self, fraction: f32) -> f32 {
        let amount = self.health().max() * fraction;
        self.health_mut().restore(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod entity_id_tests {
        use super::*;

        #[test]
        fn ids_order_numerically() {
            let mut ids = vec![EntityId::new(9), EntityId::new(2), EntityId::new(5)];
            ids.sort();
            assert_eq!(ids, vec![EntityId::new(2), EntityId::new(5), EntityId::new(9)]);
        }

        #[test]
        fn display_and_debug() {
            let id = EntityId::from(42);
            assert_eq!(format!("{id}"), "42");
            assert_eq!(format!("{id:?}"), "EntityId(42)");
            assert_eq!(id.as_u64(), 42);
        }
    }

    mod tag_tests {
        use super::*;

        #[test]
        fn tags_display_their_name() {
            assert_eq!(EntityTag::ItemBox.to_string(), "ItemBox");
            assert_eq!(EntityTag::Tank.to_string(), "Tank");
        }

        #[test]
        fn tags_serialize() {
            let json = serde_json::to_string(&EntityTag::Projectile).unwrap();
            assert_eq!(json, "\"Projectile\"");
        }
    }
}
