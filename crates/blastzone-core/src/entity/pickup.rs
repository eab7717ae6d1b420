//! Pickups and the item effects they grant.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{sizes, ItemConfig};
use crate::geometry::HitBox;
use crate::output::SoundCue;
use crate::timer::Seconds;

use super::Collidable;

/// What a pickup does when collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    /// Restores part of the collector's health.
    Heal,
    /// Refills every barrel of the collector.
    Reload,
    /// Temporarily raises the collector's acceleration cap.
    SpeedBoost,
}

impl PickupKind {
    /// Every kind, in drop-table order.
    pub const ALL: [Self; 3] = [Self::Heal, Self::Reload, Self::SpeedBoost];

    /// Picks a kind uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Sound played on collection.
    #[must_use]
    pub const fn sound(self) -> SoundCue {
        match self {
            Self::Heal => SoundCue::Heal,
            Self::Reload => SoundCue::Reload,
            Self::SpeedBoost => SoundCue::SpeedUp,
        }
    }

    /// Rolls the concrete effect for this kind.
    ///
    /// Heal amounts are drawn uniformly from the configured fraction range.
    pub fn roll_effect<R: Rng + ?Sized>(self, rng: &mut R, items: &ItemConfig) -> ItemEffect {
        match self {
            Self::Heal => {
                let span = items.heal_max_fraction - items.heal_min_fraction;
                ItemEffect::Heal {
                    fraction: items.heal_min_fraction + rng.gen::<f32>() * span,
                }
            }
            Self::Reload => ItemEffect::Reload,
            Self::SpeedBoost => ItemEffect::SpeedBoost {
                factor: items.speed_boost_factor,
                duration: items.speed_boost_duration,
            },
        }
    }
}

/// A concrete effect applied to a tank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemEffect {
    /// Restore `fraction` of max health.
    Heal {
        /// Fraction of max health restored.
        fraction: f32,
    },
    /// Refill every barrel.
    Reload,
    /// Multiply the acceleration cap by `factor` for `duration` seconds.
    SpeedBoost {
        /// Acceleration multiplier.
        factor: f32,
        /// Seconds the boost lasts.
        duration: Seconds,
    },
}

/// A timed effect held by a tank until it subsides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveItem {
    /// Kind of the originating pickup.
    pub kind: PickupKind,
    /// Acceleration multiplier while active.
    pub factor: f32,
    /// When the effect was applied.
    pub applied_at: Seconds,
    /// How long the effect lasts.
    pub duration: Seconds,
}

impl ActiveItem {
    /// `true` once strictly more than `duration` has passed.
    #[must_use]
    pub fn has_subsided(&self, now: Seconds) -> bool {
        now - self.applied_at > self.duration
    }
}

/// A collectible lying in the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    /// What collecting it does.
    pub kind: PickupKind,
    /// Center position.
    pub position: Vec2,
}

impl Pickup {
    /// A pickup of `kind` at `position`.
    #[must_use]
    pub const fn new(kind: PickupKind, position: Vec2) -> Self {
        Self { kind, position }
    }
}

impl Collidable for Pickup {
    fn hit_box(&self) -> HitBox {
        HitBox::new(self.position, sizes::PICKUP)
    }
}
