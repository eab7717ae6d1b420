//! Error taxonomy for the simulation core.
//!
//! - [`ConfigError`]: malformed level or tuning data and unknown stat keys.
//!   Fatal at load time; world construction aborts instead of proceeding
//!   with partial state.
//! - [`SimError`]: invariant violations detected while stepping the world.
//!   These indicate a caller bug and are surfaced from [`World::step`]
//!   rather than clamped or ignored.
//!
//! [`World::step`]: crate::simulation::World::step

use thiserror::Error;

use crate::entity::EntityId;

/// Load-time configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The level or tuning JSON could not be parsed.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// A stat table lookup used a key that does not exist.
    #[error("unknown {table} key `{key}`")]
    UnknownKey {
        /// Which table was consulted (e.g. `"ammo category"`).
        table: &'static str,
        /// The key that was requested.
        key: String,
    },
    /// The level declares no player spawn.
    #[error("level has no player spawn")]
    MissingPlayer,
    /// The level declares more than one player spawn.
    #[error("level declares {0} player spawns, expected exactly one")]
    DuplicatePlayer(usize),
    /// The level declares no enemy (boss) tank.
    #[error("level has no enemy tank")]
    MissingBoss,
    /// The level declares more than one enemy tank.
    #[error("level declares {0} enemy tanks, expected exactly one")]
    DuplicateBoss(usize),
    /// The enemy tank has nowhere to patrol.
    #[error("level has no patrol points for the enemy tank")]
    NoPatrolPoints,
    /// The level rectangle is empty or not finite.
    #[error("invalid level dimensions {width}x{height}")]
    InvalidDimensions {
        /// Declared width.
        width: f32,
        /// Declared height.
        height: f32,
    },
    /// A tuning value is out of its allowed range.
    #[error("invalid tuning value `{field}` = {value}: {reason}")]
    InvalidTuning {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Human readable constraint.
        reason: &'static str,
    },
}

/// Invariant violations raised while stepping the simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// The frame's elapsed time was negative or not finite.
    #[error("invalid frame time {0}")]
    InvalidFrameTime(f64),
    /// An agent asked for a negative acceleration fraction.
    #[error("negative acceleration fraction {fraction} requested for {entity}")]
    NegativeAcceleration {
        /// The controlled entity.
        entity: EntityId,
        /// The rejected fraction.
        fraction: f32,
    },
    /// A movement command was addressed to a stationary unit.
    #[error("{entity} cannot move")]
    Immobile {
        /// The stationary entity.
        entity: EntityId,
    },
    /// A command was addressed to an entity that is not live.
    #[error("{entity} is not a live controllable entity")]
    NotControllable {
        /// The missing entity.
        entity: EntityId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_convert() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let config: ConfigError = err.into();
        assert!(matches!(config, ConfigError::Parse(_)));
        assert!(config.to_string().starts_with("malformed configuration"));
    }

    #[test]
    fn unknown_key_names_table_and_key() {
        let err = ConfigError::UnknownKey {
            table: "ammo category",
            key: "laser".into(),
        };
        assert_eq!(err.to_string(), "unknown ammo category key `laser`");
    }

    #[test]
    fn sim_error_mentions_entity() {
        let err = SimError::NegativeAcceleration {
            entity: EntityId::new(7),
            fraction: -0.5,
        };
        assert_eq!(
            err.to_string(),
            "negative acceleration fraction -0.5 requested for 7"
        );
    }
}
