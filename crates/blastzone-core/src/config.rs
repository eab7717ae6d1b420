//! Tuning constants, fixed stat tables, and the loadable [`SimConfig`].
//!
//! Units throughout: seconds for durations, world units for lengths, degrees
//! for angles. Acceleration is in world units per second squared.
//!
//! # Example
//!
//! ```
//! use blastzone_core::config::{AmmoCategory, SimConfig};
//!
//! let config = SimConfig::from_json(r#"{ "physics": { "friction": 5.0 } }"#).unwrap();
//! assert_eq!(config.physics.friction, 5.0);
//! // Unspecified fields keep their defaults.
//! assert_eq!(config.physics.max_acceleration, 768.0);
//!
//! let power: AmmoCategory = "power".parse().unwrap();
//! assert_eq!(power.stats().damage, 10.0);
//! assert!((power.range() - 300.0).abs() < 1e-3);
//! ```

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::timer::Seconds;

// =============================================================================
// Fixed Constants
// =============================================================================

/// Magazine size shared by every ammo category.
pub const MAX_AMMO: u32 = 20;

/// Hit points of every tank.
pub const TANK_MAX_HEALTH: f32 = 100.0;

/// Hit points of every turret.
pub const TURRET_MAX_HEALTH: f32 = 100.0;

/// Projectile hits an item box absorbs before breaking.
pub const BOX_WEAR: u32 = 3;

/// Hit box sizes per entity kind.
pub mod sizes {
    use glam::Vec2;

    /// Player and other color tanks.
    pub const COLOR_TANK: Vec2 = Vec2::new(42.0, 42.0);
    /// Enemy tank, `big`.
    pub const BIG_TANK: Vec2 = Vec2::new(46.0, 46.0);
    /// Enemy tank, `large`.
    pub const LARGE_TANK: Vec2 = Vec2::new(50.0, 50.0);
    /// Enemy tank, `huge`.
    pub const HUGE_TANK: Vec2 = Vec2::new(56.0, 56.0);
    /// Projectiles.
    pub const PROJECTILE: Vec2 = Vec2::new(8.0, 8.0);
    /// Trees.
    pub const TREE: Vec2 = Vec2::new(32.0, 32.0);
    /// Turret base.
    pub const TURRET: Vec2 = Vec2::new(36.0, 36.0);
    /// Destructible item boxes.
    pub const ITEM_BOX: Vec2 = Vec2::new(28.0, 28.0);
    /// Loose pickups.
    pub const PICKUP: Vec2 = Vec2::new(24.0, 24.0);
    /// Thickness of the level boundary walls.
    pub const WALL_THICKNESS: f32 = 1.0;
    /// Barrel length, mount to nozzle.
    pub const BARREL_LENGTH: f32 = 24.0;
}

/// Returns the hit box size for a tank of the given size class.
#[must_use]
pub const fn tank_size(size: Option<TankSize>) -> Vec2 {
    match size {
        None => sizes::COLOR_TANK,
        Some(TankSize::Big) => sizes::BIG_TANK,
        Some(TankSize::Large) => sizes::LARGE_TANK,
        Some(TankSize::Huge) => sizes::HUGE_TANK,
    }
}

// =============================================================================
// Ammo Categories
// =============================================================================

/// Per-category projectile and barrel stats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmmoStats {
    /// Damage dealt on impact.
    pub damage: f32,
    /// Muzzle speed.
    pub speed: f32,
    /// Seconds before the projectile expires.
    pub lifetime: Seconds,
    /// Minimum seconds between two shots of one barrel.
    pub fire_delay: Seconds,
    /// Magazine size.
    pub max_ammo: u32,
}

/// Ammunition category of a barrel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum AmmoCategory {
    /// Balanced damage and rate of fire.
    #[default]
    Standard,
    /// Fast, weak shots.
    Rapid,
    /// Slow, heavy shots.
    Power,
}

impl AmmoCategory {
    /// All categories in table order.
    pub const ALL: [Self; 3] = [Self::Standard, Self::Rapid, Self::Power];

    /// Returns the fixed stat table row for this category.
    #[must_use]
    pub const fn stats(self) -> AmmoStats {
        match self {
            Self::Standard => AmmoStats {
                damage: 8.0,
                speed: 500.0,
                lifetime: 0.75,
                fire_delay: 0.35,
                max_ammo: MAX_AMMO,
            },
            Self::Rapid => AmmoStats {
                damage: 6.0,
                speed: 600.0,
                lifetime: 0.75,
                fire_delay: 0.25,
                max_ammo: MAX_AMMO,
            },
            Self::Power => AmmoStats {
                damage: 10.0,
                speed: 400.0,
                lifetime: 0.75,
                fire_delay: 0.40,
                max_ammo: MAX_AMMO,
            },
        }
    }

    /// Distance a projectile of this category travels before expiring.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn range(self) -> f32 {
        let stats = self.stats();
        stats.speed * stats.lifetime as f32
    }

    /// Lowercase key used in level files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Rapid => "rapid",
            Self::Power => "power",
        }
    }
}

impl fmt::Display for AmmoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for AmmoCategory {
    type Error = ConfigError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        key.parse()
    }
}

impl FromStr for AmmoCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKey {
                table: "ammo category",
                key: s.to_owned(),
            })
    }
}

// =============================================================================
// Tank Variants
// =============================================================================

/// Size class of an enemy tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum TankSize {
    /// Two front barrels, full acceleration.
    Big,
    /// Two front barrels, 90 % acceleration.
    Large,
    /// Two forward barrels plus a rear one, 80 % acceleration.
    Huge,
}

impl TankSize {
    const ALL: [Self; 3] = [Self::Big, Self::Large, Self::Huge];

    /// Multiplier applied to the base acceleration cap.
    #[must_use]
    pub const fn acceleration_factor(self) -> f32 {
        match self {
            Self::Big => 1.0,
            Self::Large => 0.9,
            Self::Huge => 0.8,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Big => "big",
            Self::Large => "large",
            Self::Huge => "huge",
        }
    }
}

impl TryFrom<String> for TankSize {
    type Error = ConfigError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        key.parse()
    }
}

impl FromStr for TankSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKey {
                table: "tank size",
                key: s.to_owned(),
            })
    }
}

/// Paint scheme of a color tank. Cosmetic, carried for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum TankColor {
    /// Blue.
    #[default]
    Blue,
    /// Dark.
    Dark,
    /// Green.
    Green,
    /// Red.
    Red,
    /// Sand.
    Sand,
}

impl TryFrom<String> for TankColor {
    type Error = ConfigError;

    fn try_from(key: String) -> Result<Self, Self::Error> {
        key.parse()
    }
}

impl FromStr for TankColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blue" => Ok(Self::Blue),
            "dark" => Ok(Self::Dark),
            "green" => Ok(Self::Green),
            "red" => Ok(Self::Red),
            "sand" => Ok(Self::Sand),
            _ => Err(ConfigError::UnknownKey {
                table: "tank color",
                key: s.to_owned(),
            }),
        }
    }
}

// =============================================================================
// SimConfig
// =============================================================================

/// Integrator and contact tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Friction coefficient μ; deceleration is `μ · velocity`.
    pub friction: f32,
    /// Squared speed below which a tank comes to rest.
    pub stop_epsilon: f32,
    /// Speed imparted to each tank of an overlapping pair.
    pub knockback: f32,
    /// Base acceleration cap of a tank.
    pub max_acceleration: f32,
    /// Hull turn rate of player-driven tanks, degrees per second.
    pub turn_rate: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction: 4.0,
            stop_epsilon: 1.0,
            knockback: 100.0,
            max_acceleration: 768.0,
            turn_rate: 150.0,
        }
    }
}

/// Agent behavior tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Seconds state logic is suppressed after hitting a wall.
    pub wall_avoid_time: Seconds,
    /// Degrees turned on hitting a wall.
    pub wall_avoid_turn: f32,
    /// Squared distance at which a waypoint counts as reached.
    pub patrol_epsilon: f32,
    /// Fraction of max acceleration while patrolling.
    pub patrol_acceleration: f32,
    /// Fraction of max acceleration while pursuing.
    pub pursue_acceleration: f32,
    /// Fraction of max acceleration while fleeing.
    pub flee_acceleration: f32,
    /// Offset added to the bearing to the target while fleeing.
    pub flee_angle: f32,
    /// Seconds spent fleeing before reloading.
    pub flee_reload_time: Seconds,
    /// Seconds a turret waits before reloading.
    pub turret_reload_time: Seconds,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            wall_avoid_time: 1.0,
            wall_avoid_turn: 15.0,
            patrol_epsilon: 100.0,
            patrol_acceleration: 0.75,
            pursue_acceleration: 0.9,
            flee_acceleration: 1.0,
            flee_angle: 210.0,
            flee_reload_time: 5.0,
            turret_reload_time: 10.0,
        }
    }
}

/// Pickup and item box tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    /// Acceleration multiplier of a speed boost.
    pub speed_boost_factor: f32,
    /// Seconds a speed boost lasts.
    pub speed_boost_duration: Seconds,
    /// Minimum heal, as a fraction of max health.
    pub heal_min_fraction: f32,
    /// Maximum heal, as a fraction of max health.
    pub heal_max_fraction: f32,
    /// Upper bound on item boxes plus loose pickups for periodic respawn.
    pub item_cap: usize,
    /// Seconds between box breakage and the next periodic respawn.
    pub respawn_time: Seconds,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            speed_boost_factor: 1.8,
            speed_boost_duration: 10.0,
            heal_min_fraction: 0.1,
            heal_max_fraction: 0.2,
            item_cap: 1,
            respawn_time: 5.0,
        }
    }
}

/// Transient visual effect tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Minimum seconds between two track marks of one tank.
    pub track_interval: Seconds,
    /// Squared speed above which tanks leave tracks.
    pub track_min_speed_sq: f32,
    /// Seconds a track mark lingers.
    pub track_lifetime: Seconds,
    /// Seconds a muzzle flash lingers.
    pub muzzle_flash_lifetime: Seconds,
    /// Seconds an explosion lingers.
    pub explosion_lifetime: Seconds,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            track_interval: 0.1,
            track_min_speed_sq: 100.0,
            track_lifetime: 1.0,
            muzzle_flash_lifetime: 0.025,
            explosion_lifetime: 0.1,
        }
    }
}

/// Complete simulation tuning.
///
/// Every section defaults independently, so a JSON document only needs to
/// name the values it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Integrator and contact tuning.
    pub physics: PhysicsConfig,
    /// Agent behavior tuning.
    pub ai: AiConfig,
    /// Pickup tuning.
    pub items: ItemConfig,
    /// Visual effect tuning.
    pub effects: EffectConfig,
}

impl SimConfig {
    /// Parses a config from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidTuning`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every tuning value against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTuning`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        non_negative("physics.friction", f64::from(p.friction))?;
        non_negative("physics.stop_epsilon", f64::from(p.stop_epsilon))?;
        non_negative("physics.knockback", f64::from(p.knockback))?;
        positive("physics.max_acceleration", f64::from(p.max_acceleration))?;
        non_negative("physics.turn_rate", f64::from(p.turn_rate))?;

        let ai = &self.ai;
        positive("ai.wall_avoid_time", ai.wall_avoid_time)?;
        non_negative("ai.patrol_epsilon", f64::from(ai.patrol_epsilon))?;
        fraction("ai.patrol_acceleration", ai.patrol_acceleration)?;
        fraction("ai.pursue_acceleration", ai.pursue_acceleration)?;
        fraction("ai.flee_acceleration", ai.flee_acceleration)?;
        positive("ai.flee_reload_time", ai.flee_reload_time)?;
        positive("ai.turret_reload_time", ai.turret_reload_time)?;

        let items = &self.items;
        positive("items.speed_boost_factor", f64::from(items.speed_boost_factor))?;
        positive("items.speed_boost_duration", items.speed_boost_duration)?;
        fraction("items.heal_min_fraction", items.heal_min_fraction)?;
        fraction("items.heal_max_fraction", items.heal_max_fraction)?;
        if items.heal_max_fraction < items.heal_min_fraction {
            return Err(ConfigError::InvalidTuning {
                field: "items.heal_max_fraction",
                value: f64::from(items.heal_max_fraction),
                reason: "must not be below items.heal_min_fraction",
            });
        }
        positive("items.respawn_time", items.respawn_time)?;

        let fx = &self.effects;
        positive("effects.track_interval", fx.track_interval)?;
        non_negative("effects.track_min_speed_sq", f64::from(fx.track_min_speed_sq))?;
        positive("effects.track_lifetime", fx.track_lifetime)?;
        positive("effects.muzzle_flash_lifetime", fx.muzzle_flash_lifetime)?;
        positive("effects.explosion_lifetime", fx.explosion_lifetime)?;
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTuning {
            field,
            value,
            reason: "must be finite and non-negative",
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTuning {
            field,
            value,
            reason: "must be finite and positive",
        })
    }
}

fn fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidTuning {
            field,
            value: f64::from(value),
            reason: "must lie in [0, 1]",
        })
    }
}
