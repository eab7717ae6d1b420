//! Agent state machines.
//!
//! An [`Agent`] binds a behavior to one controlled entity and one target.
//! Behaviors are plain state machines over a fixed variant set, written as
//! functions from an observation to an [`AgentStep`]: the commands to apply
//! to the controlled entity, plus the ordered enter/exit [`Hook`]s that fired.
//! They never touch the arena, so transitions can be unit tested with
//! hand-built observations.
//!
//! - [`tank`]: mobile units cycling Patrol → Pursue → Flee → Patrol
//! - [`turret`]: stationary units cycling Attack ⇄ Reload
//!
//! # Transitions
//!
//! A transition always emits `Exit(old)` before `Enter(new)`, each exactly
//! once. Starting a machine emits a lone `Enter` for the initial state.
//! Re-entering the current state is a no-op.
//!
//! # Wall avoidance
//!
//! Mobile agents share one [`WallAvoidance`] context, owned by the world and
//! passed in explicitly. Whenever a controlled tank hits a blocker, the
//! shared timer restarts and state logic is suspended for every mobile agent
//! until it runs out; only thrust is still applied.

pub mod tank;
pub mod turret;

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::error::ConfigError;
use crate::timer::{Seconds, Stopwatch};

pub use tank::{TankBrain, TankObservation, TankState, TankStateKind};
pub use turret::{TurretBrain, TurretObservation, TurretState, TurretStateKind};

// =============================================================================
// Step Output
// =============================================================================

/// An intent an agent issues to its controlled entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AgentCommand {
    /// Turn the hull and every barrel to a heading (degrees).
    Face(f32),
    /// Turn the barrels only (degrees).
    Aim(f32),
    /// Thrust along the hull heading at a fraction of max acceleration.
    Accelerate(f32),
    /// Pull the trigger on every barrel.
    Fire,
    /// Refill every barrel.
    Reload,
}

/// A state machine lifecycle hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hook<K> {
    /// The state `K` was left.
    Exit(K),
    /// The state `K` was entered.
    Enter(K),
}

/// Everything one agent update produced, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentStep<K> {
    /// Commands for the controlled entity, to be applied in order.
    pub commands: Vec<AgentCommand>,
    /// Lifecycle hooks that fired.
    pub hooks: Vec<Hook<K>>,
}

impl<K> Default for AgentStep<K> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            hooks: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq> AgentStep<K> {
    /// Kind entered during this step, if a transition happened.
    #[must_use]
    pub fn entered(&self) -> Option<K> {
        self.hooks.iter().rev().find_map(|hook| match hook {
            Hook::Enter(kind) => Some(*kind),
            Hook::Exit(_) => None,
        })
    }

    /// Number of times `hook` fired.
    #[must_use]
    pub fn count(&self, hook: Hook<K>) -> usize {
        self.hooks.iter().filter(|h| **h == hook).count()
    }
}

// =============================================================================
// Shared Context
// =============================================================================

/// Wall-avoidance timer shared by all mobile agents of a world.
#[derive(Debug, Clone, Default)]
pub struct WallAvoidance {
    since_hit: Stopwatch,
}

impl WallAvoidance {
    /// A timer that has never seen a wall hit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            since_hit: Stopwatch::idle(),
        }
    }

    /// Restarts the avoidance window at `now`.
    pub fn register_hit(&mut self, now: Seconds) {
        self.since_hit.restart(now);
    }

    /// `true` while less than `duration` has passed since the last hit.
    #[must_use]
    pub fn is_avoiding(&self, now: Seconds, duration: Seconds) -> bool {
        self.since_hit.elapsed(now) < duration
    }
}

/// An endless, shuffled cycle of waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct PatrolRoute {
    points: Vec<Vec2>,
    cursor: usize,
}

impl PatrolRoute {
    /// A route visiting `points` in the given order, forever.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoPatrolPoints`] if `points` is empty.
    pub fn new(points: Vec<Vec2>) -> Result<Self, ConfigError> {
        if points.is_empty() {
            return Err(ConfigError::NoPatrolPoints);
        }
        Ok(Self { points, cursor: 0 })
    }

    /// A route visiting `points` in a random order, forever.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoPatrolPoints`] if `points` is empty.
    pub fn shuffled<R: Rng + ?Sized>(mut points: Vec<Vec2>, rng: &mut R) -> Result<Self, ConfigError> {
        points.shuffle(rng);
        Self::new(points)
    }

    /// Returns the next waypoint, wrapping around at the end.
    pub fn next_waypoint(&mut self) -> Vec2 {
        let point = self.points[self.cursor];
        self.cursor = (self.cursor + 1) % self.points.len();
        point
    }

    /// Waypoints in visiting order.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

// =============================================================================
// Agent
// =============================================================================

/// The behavior an agent runs.
#[derive(Debug, Clone)]
pub enum Brain {
    /// Mobile-unit behavior.
    Tank(TankBrain),
    /// Stationary-unit behavior.
    Turret(TurretBrain),
}

/// A behavior bound to a controlled entity and a target.
#[derive(Debug, Clone)]
pub struct Agent {
    /// The entity this agent drives.
    pub controlled: EntityId,
    /// The entity this agent hunts.
    pub target: EntityId,
    /// The state machine.
    pub brain: Brain,
}

impl Agent {
    /// `true` if this is a mobile agent currently in `Pursue`.
    #[must_use]
    pub fn is_pursuing(&self) -> bool {
        matches!(&self.brain, Brain::Tank(brain) if brain.kind() == Some(TankStateKind::Pursue))
    }
}

/// `true` if `target` exists and lies strictly within `range` of `position`.
#[must_use]
pub fn in_range(position: Vec2, target: Option<Vec2>, range: f32) -> bool {
    target.is_some_and(|t| (t - position).length_squared() < range * range)
}
