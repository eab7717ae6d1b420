//! # Blast Zone Core
//!
//! Per-frame simulation core for Blast Zone, a top-down tank arena.
//!
//! This crate owns everything that decides what happens in a frame: moving
//! tanks and projectiles, the enemy agents' state machines, collision
//! consequences, pickups and item boxes. Rendering, audio and input devices
//! live outside; the core reads a [`PlayerInput`] and reports what happened
//! through an [`EventLog`].
//!
//! ## Architecture
//!
//! - **Entities**: tanks, turrets, projectiles, pickups, obstacles, item
//!   boxes and effects, each in its own registry of the [`Arena`]
//! - **Agents**: pure state machines turning observations into commands
//! - **Resolver**: ordered interaction passes applied after movement
//! - **World**: the tick orchestrator tying them together
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blastzone_core::{LevelDescription, PlayerInput, SimConfig, World};
//!
//! let level = LevelDescription::from_json(&std::fs::read_to_string("level.json")?)?;
//! let mut world = World::from_level(&level, SimConfig::default(), seed)?;
//! let mut input = PlayerInput::default();
//! loop {
//!     // fill `input` from the keyboard and mouse
//!     world.step(frame_seconds, &mut input)?;
//!     for record in world.drain_events() {
//!         // play sounds, spawn particles
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ai;
pub mod arena;
pub mod config;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod input;
pub mod kinematics;
pub mod level;
pub mod output;
pub mod resolver;
pub mod simulation;
pub mod timer;

#[cfg(test)]
mod tests;

pub use arena::Arena;
pub use config::SimConfig;
pub use entity::EntityId;
pub use error::{ConfigError, SimError};
pub use input::{Actions, PlayerInput};
pub use level::LevelDescription;
pub use output::{Event, EventLog, EventRecord};
pub use simulation::World;
