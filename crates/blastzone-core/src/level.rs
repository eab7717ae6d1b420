//! Level descriptions: what a world is built from.
//!
//! A level is a rectangle plus a flat list of typed spawn descriptors, read
//! once at construction. It must name exactly one player and exactly one
//! enemy tank (the boss), and give the boss at least one patrol point.
//! Everything else may appear any number of times.
//!
//! # Example
//!
//! ```
//! use blastzone_core::level::LevelDescription;
//!
//! let level = LevelDescription::from_json(r#"{
//!     "width": 1024, "height": 768,
//!     "spawns": [
//!         { "kind": "player", "position": [100, 100], "color": "red", "category": "rapid" },
//!         { "kind": "enemy_tank", "position": [900, 600], "size": "huge" },
//!         { "kind": "patrol_point", "position": [500, 400] },
//!         { "kind": "turret", "position": [700, 200], "category": "power" },
//!         { "kind": "tree", "position": [300, 300] },
//!         { "kind": "box_spawn", "position": [512, 100] }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(level.patrol_points().count(), 1);
//! assert_eq!(level.box_spawns().count(), 1);
//! ```

use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{AmmoCategory, TankColor, TankSize};
use crate::error::ConfigError;

/// One object placed in a level.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnDescriptor {
    /// The player's tank.
    Player {
        /// Center.
        position: Vec2,
        /// Paint scheme.
        color: TankColor,
        /// Ammo of the single barrel.
        category: AmmoCategory,
    },
    /// The boss tank.
    EnemyTank {
        /// Center.
        position: Vec2,
        /// Size class.
        size: TankSize,
    },
    /// A waypoint of the boss's patrol route.
    PatrolPoint {
        /// Waypoint.
        position: Vec2,
    },
    /// A stationary gun bound to the boss.
    Turret {
        /// Center.
        position: Vec2,
        /// Ammo category.
        category: AmmoCategory,
        /// Sprite variant, carried for the presentation layer.
        special: u8,
    },
    /// A tree.
    Tree {
        /// Center.
        position: Vec2,
    },
    /// Where item boxes appear, at construction and on respawn.
    BoxSpawn {
        /// Center.
        position: Vec2,
    },
}

impl SpawnDescriptor {
    /// Center of the spawned object.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        match self {
            Self::Player { position, .. }
            | Self::EnemyTank { position, .. }
            | Self::PatrolPoint { position }
            | Self::Turret { position, .. }
            | Self::Tree { position }
            | Self::BoxSpawn { position } => *position,
        }
    }
}

/// Player spawn attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSpawn {
    /// Center.
    pub position: Vec2,
    /// Paint scheme.
    pub color: TankColor,
    /// Ammo category.
    pub category: AmmoCategory,
}

/// Boss spawn attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossSpawn {
    /// Center.
    pub position: Vec2,
    /// Size class.
    pub size: TankSize,
}

/// Turret spawn attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurretSpawn {
    /// Center.
    pub position: Vec2,
    /// Ammo category.
    pub category: AmmoCategory,
    /// Sprite variant.
    pub special: u8,
}

/// A complete level.
///
/// Deserializing goes through the stat-table parsers, so a misspelled color,
/// size or category is reported as [`ConfigError::UnknownKey`] by
/// [`LevelDescription::from_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLevel")]
pub struct LevelDescription {
    /// World width.
    pub width: f32,
    /// World height.
    pub height: f32,
    /// Everything placed in the world.
    pub spawns: Vec<SpawnDescriptor>,
}

impl LevelDescription {
    /// Parses and validates a level from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or an unknown spawn
    /// kind, [`ConfigError::UnknownKey`] for an unknown color, size or ammo
    /// category, and any error [`LevelDescription::validate`] reports.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawLevel = serde_json::from_str(json)?;
        let level = Self::try_from(raw)?;
        level.validate()?;
        Ok(level)
    }

    /// Checks the structural rules a world relies on.
    ///
    /// # Errors
    ///
    /// Fails on non-positive dimensions, a player or boss count other than
    /// one, or an empty patrol route.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_side = |v: f32| v.is_finite() && v > 0.0;
        if !valid_side(self.width) || !valid_side(self.height) {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        self.player()?;
        self.boss()?;
        if self.patrol_points().next().is_none() {
            return Err(ConfigError::NoPatrolPoints);
        }
        Ok(())
    }

    /// The single player spawn.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingPlayer`] or [`ConfigError::DuplicatePlayer`].
    pub fn player(&self) -> Result<PlayerSpawn, ConfigError> {
        let players: Vec<PlayerSpawn> = self
            .spawns
            .iter()
            .filter_map(|s| match *s {
                SpawnDescriptor::Player {
                    position,
                    color,
                    category,
                } => Some(PlayerSpawn {
                    position,
                    color,
                    category,
                }),
                _ => None,
            })
            .collect();
        match players.as_slice() {
            [] => Err(ConfigError::MissingPlayer),
            [one] => Ok(*one),
            many => Err(ConfigError::DuplicatePlayer(many.len())),
        }
    }

    /// The single boss spawn.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingBoss`] or [`ConfigError::DuplicateBoss`].
    pub fn boss(&self) -> Result<BossSpawn, ConfigError> {
        let bosses: Vec<BossSpawn> = self
            .spawns
            .iter()
            .filter_map(|s| match *s {
                SpawnDescriptor::EnemyTank { position, size } => Some(BossSpawn { position, size }),
                _ => None,
            })
            .collect();
        match bosses.as_slice() {
            [] => Err(ConfigError::MissingBoss),
            [one] => Ok(*one),
            many => Err(ConfigError::DuplicateBoss(many.len())),
        }
    }

    /// Patrol waypoints in declaration order.
    pub fn patrol_points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.spawns.iter().filter_map(|s| match s {
            SpawnDescriptor::PatrolPoint { position } => Some(*position),
            _ => None,
        })
    }

    /// Turret spawns in declaration order.
    pub fn turrets(&self) -> impl Iterator<Item = TurretSpawn> + '_ {
        self.spawns.iter().filter_map(|s| match *s {
            SpawnDescriptor::Turret {
                position,
                category,
                special,
            } => Some(TurretSpawn {
                position,
                category,
                special,
            }),
            _ => None,
        })
    }

    /// Tree positions in declaration order.
    pub fn trees(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.spawns.iter().filter_map(|s| match s {
            SpawnDescriptor::Tree { position } => Some(*position),
            _ => None,
        })
    }

    /// Item box spawn points in declaration order.
    pub fn box_spawns(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.spawns.iter().filter_map(|s| match s {
            SpawnDescriptor::BoxSpawn { position } => Some(*position),
            _ => None,
        })
    }
}

// =============================================================================
// Wire Format
// =============================================================================

/// Spawn as written in a level file, with stat-table keys still unparsed.
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RawSpawn {
    Player {
        position: Vec2,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        category: Option<String>,
    },
    EnemyTank {
        position: Vec2,
        size: String,
    },
    PatrolPoint {
        position: Vec2,
    },
    Turret {
        position: Vec2,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        special: u8,
    },
    Tree {
        position: Vec2,
    },
    BoxSpawn {
        position: Vec2,
    },
}

#[derive(Deserialize)]
struct RawLevel {
    width: f32,
    height: f32,
    spawns: Vec<RawSpawn>,
}

/// Parses an optional table key, falling back to the default entry.
fn parse_or_default<T>(key: Option<String>) -> Result<T, ConfigError>
where
    T: FromStr<Err = ConfigError> + Default,
{
    key.map_or_else(|| Ok(T::default()), |key| key.parse())
}

impl TryFrom<RawSpawn> for SpawnDescriptor {
    type Error = ConfigError;

    fn try_from(raw: RawSpawn) -> Result<Self, Self::Error> {
        Ok(match raw {
            RawSpawn::Player {
                position,
                color,
                category,
            } => Self::Player {
                position,
                color: parse_or_default(color)?,
                category: parse_or_default(category)?,
            },
            RawSpawn::EnemyTank { position, size } => Self::EnemyTank {
                position,
                size: size.parse()?,
            },
            RawSpawn::PatrolPoint { position } => Self::PatrolPoint { position },
            RawSpawn::Turret {
                position,
                category,
                special,
            } => Self::Turret {
                position,
                category: parse_or_default(category)?,
                special,
            },
            RawSpawn::Tree { position } => Self::Tree { position },
            RawSpawn::BoxSpawn { position } => Self::BoxSpawn { position },
        })
    }
}

impl TryFrom<RawLevel> for LevelDescription {
    type Error = ConfigError;

    fn try_from(raw: RawLevel) -> Result<Self, Self::Error> {
        Ok(Self {
            width: raw.width,
            height: raw.height,
            spawns: raw
                .spawns
                .into_iter()
                .map(SpawnDescriptor::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}
