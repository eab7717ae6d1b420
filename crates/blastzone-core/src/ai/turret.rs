//! Stationary-unit behavior: Attack ⇄ Reload.
//!
//! A turret in `Attack` aims and fires at a target inside its range. While
//! the boss tank it is bound to is pursuing, the turret holds fire so the two
//! don't fight over the kill. An empty magazine sends it to `Reload`, which
//! refills after a fixed wait and goes back to `Attack`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::entity::EntityId;
use crate::geometry::bearing_to;
use crate::timer::{Seconds, Stopwatch};

use super::{in_range, AgentCommand, AgentStep, Hook};

/// Names of the stationary-unit states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurretStateKind {
    /// Shooting whenever the target is in range.
    Attack,
    /// Waiting for a refill.
    Reload,
}

/// A stationary-unit state with its per-state data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurretState {
    /// Shooting.
    Attack,
    /// Reloading since the stopwatch was started.
    Reload {
        /// Started on entry.
        since: Stopwatch,
    },
}

impl TurretState {
    /// The state's name.
    #[must_use]
    pub const fn kind(&self) -> TurretStateKind {
        match self {
            Self::Attack => TurretStateKind::Attack,
            Self::Reload { .. } => TurretStateKind::Reload,
        }
    }
}

/// What a stationary agent sees of the world this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurretObservation {
    /// Simulation clock.
    pub now: Seconds,
    /// Turret center.
    pub position: Vec2,
    /// Rounds left.
    pub ammo: u32,
    /// Weapon range.
    pub range: f32,
    /// Target's center, or `None` once the target is gone.
    pub target: Option<Vec2>,
    /// Whether the bound boss agent is in `Pursue`.
    pub boss_pursuing: bool,
}

/// Stationary-unit state machine.
#[derive(Debug, Clone, Default)]
pub struct TurretBrain {
    state: Option<TurretState>,
    boss: Option<EntityId>,
}

impl TurretBrain {
    /// A brain bound to the agent controlling `boss`, if any.
    #[must_use]
    pub const fn new(boss: Option<EntityId>) -> Self {
        Self { state: None, boss }
    }

    /// Entity controlled by the boss agent this turret defers to.
    #[must_use]
    pub const fn boss(&self) -> Option<EntityId> {
        self.boss
    }

    /// Current state, `None` before [`TurretBrain::start`].
    #[must_use]
    pub const fn state(&self) -> Option<&TurretState> {
        self.state.as_ref()
    }

    /// Current state's name.
    #[must_use]
    pub fn kind(&self) -> Option<TurretStateKind> {
        self.state.map(|s| s.kind())
    }

    /// Enters the initial `Attack` state. Does nothing if already started.
    pub fn start(&mut self, obs: &TurretObservation) -> AgentStep<TurretStateKind> {
        let mut out = AgentStep::default();
        if self.state.is_none() {
            self.transition(TurretStateKind::Attack, obs, &mut out);
        }
        out
    }

    /// Runs one update. Starts the machine first if needed.
    pub fn step(&mut self, obs: &TurretObservation, cfg: &AiConfig) -> AgentStep<TurretStateKind> {
        let mut out = self.start(obs);
        let next = match self.state {
            Some(TurretState::Attack) => Self::attack(obs, &mut out),
            Some(TurretState::Reload { since }) => {
                if since.has_elapsed(obs.now, cfg.turret_reload_time) {
                    out.commands.push(AgentCommand::Reload);
                    Some(TurretStateKind::Attack)
                } else {
                    None
                }
            }
            None => None,
        };
        if let Some(next) = next {
            self.transition(next, obs, &mut out);
        }
        out
    }

    fn attack(obs: &TurretObservation, out: &mut AgentStep<TurretStateKind>) -> Option<TurretStateKind> {
        let target = obs.target?;
        if !in_range(obs.position, obs.target, obs.range) {
            return None;
        }
        if obs.ammo == 0 {
            return Some(TurretStateKind::Reload);
        }
        if !obs.boss_pursuing {
            out.commands.push(AgentCommand::Aim(bearing_to(target - obs.position)));
            out.commands.push(AgentCommand::Fire);
        }
        None
    }

    fn transition(
        &mut self,
        next: TurretStateKind,
        obs: &TurretObservation,
        out: &mut AgentStep<TurretStateKind>,
    ) {
        if let Some(current) = self.state {
            if current.kind() == next {
                return;
            }
            out.hooks.push(Hook::Exit(current.kind()));
        }
        out.hooks.push(Hook::Enter(next));
        self.state = Some(match next {
            TurretStateKind::Attack => TurretState::Attack,
            TurretStateKind::Reload => TurretState::Reload {
                since: Stopwatch::started(obs.now),
            },
        });
    }
}
