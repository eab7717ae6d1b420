//! Mobile-unit behavior: Patrol, Pursue, Flee.
//!
//! - `Patrol` heads for the current waypoint at 0.75 thrust, taking the next
//!   one on arrival, and switches to `Pursue` once the target is in range.
//! - `Pursue` faces the target and fires every tick at 0.9 thrust. It drops
//!   back to `Patrol` when the target leaves range and to `Flee` when the
//!   magazine runs dry.
//! - `Flee` runs at full thrust on a heading skewed away from the target.
//!   Once the flee time has passed it reloads and returns to `Patrol`.
//!
//! Each step ends with the thrust of the state the step *started* in, even
//! when a transition happened during the step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::geometry::bearing_to;
use crate::timer::Seconds;

use super::{in_range, AgentCommand, AgentStep, Hook, PatrolRoute, WallAvoidance};

/// Names of the mobile-unit states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TankStateKind {
    /// Wandering the patrol route.
    Patrol,
    /// Chasing and shooting the target.
    Pursue,
    /// Running away while reloading.
    Flee,
}

/// A mobile-unit state with its per-state data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TankState {
    /// Wandering towards `destination`.
    Patrol {
        /// Current waypoint.
        destination: Vec2,
    },
    /// Chasing the target.
    Pursue,
    /// Fleeing since `since`.
    Flee {
        /// When fleeing began.
        since: Seconds,
    },
}

impl TankState {
    /// The state's name.
    #[must_use]
    pub const fn kind(&self) -> TankStateKind {
        match self {
            Self::Patrol { .. } => TankStateKind::Patrol,
            Self::Pursue => TankStateKind::Pursue,
            Self::Flee { .. } => TankStateKind::Flee,
        }
    }
}

/// What a mobile agent sees of the world this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankObservation {
    /// Simulation clock.
    pub now: Seconds,
    /// Controlled tank's center.
    pub position: Vec2,
    /// Controlled tank's hull rotation.
    pub rotation: f32,
    /// Whether the controlled tank ran into a blocker last tick.
    pub hit_wall: bool,
    /// Rounds left in the lead barrel.
    pub ammo: u32,
    /// Weapon range.
    pub range: f32,
    /// Target's center, or `None` once the target is gone.
    pub target: Option<Vec2>,
}

impl TankObservation {
    fn target_in_range(&self) -> bool {
        in_range(self.position, self.target, self.range)
    }

    fn bearing_to_target(&self) -> Option<f32> {
        self.target.map(|t| bearing_to(t - self.position))
    }
}

/// Mobile-unit state machine.
///
/// # Example
///
/// ```
/// use blastzone_core::ai::{PatrolRoute, TankBrain, TankObservation, TankStateKind, WallAvoidance};
/// use blastzone_core::config::AiConfig;
/// use glam::Vec2;
///
/// let route = PatrolRoute::new(vec![Vec2::new(500.0, 0.0)]).unwrap();
/// let mut brain = TankBrain::new(route);
/// let cfg = AiConfig::default();
/// let mut obs = TankObservation {
///     now: 0.0,
///     position: Vec2::ZERO,
///     rotation: 0.0,
///     hit_wall: false,
///     ammo: 20,
///     range: 375.0,
///     target: Some(Vec2::new(1000.0, 0.0)),
/// };
///
/// brain.start(&obs);
/// assert_eq!(brain.kind(), Some(TankStateKind::Patrol));
///
/// obs.target = Some(Vec2::new(100.0, 0.0));
/// let step = brain.step(&obs, &mut WallAvoidance::new(), &cfg);
/// assert_eq!(step.entered(), Some(TankStateKind::Pursue));
/// ```
#[derive(Debug, Clone)]
pub struct TankBrain {
    state: Option<TankState>,
    route: PatrolRoute,
}

impl TankBrain {
    /// A brain that has not been started.
    #[must_use]
    pub const fn new(route: PatrolRoute) -> Self {
        Self { state: None, route }
    }

    /// Current state, `None` before [`TankBrain::start`].
    #[must_use]
    pub const fn state(&self) -> Option<&TankState> {
        self.state.as_ref()
    }

    /// Current state's name.
    #[must_use]
    pub fn kind(&self) -> Option<TankStateKind> {
        self.state.map(|s| s.kind())
    }

    /// Enters the initial `Patrol` state. Does nothing if already started.
    pub fn start(&mut self, obs: &TankObservation) -> AgentStep<TankStateKind> {
        let mut out = AgentStep::default();
        if self.state.is_none() {
            self.transition(TankStateKind::Patrol, obs, &mut out);
        }
        out
    }

    /// Runs one update. Starts the machine first if needed.
    pub fn step(
        &mut self,
        obs: &TankObservation,
        avoidance: &mut WallAvoidance,
        cfg: &AiConfig,
    ) -> AgentStep<TankStateKind> {
        let mut out = self.start(obs);
        let Some(state) = self.state else {
            return out;
        };

        if obs.hit_wall {
            avoidance.register_hit(obs.now);
            out.commands
                .push(AgentCommand::Face(obs.rotation + cfg.wall_avoid_turn));
        }

        let thrust = match state {
            TankState::Patrol { .. } => cfg.patrol_acceleration,
            TankState::Pursue => cfg.pursue_acceleration,
            TankState::Flee { .. } => cfg.flee_acceleration,
        };

        if !avoidance.is_avoiding(obs.now, cfg.wall_avoid_time) {
            let next = match state {
                TankState::Patrol { destination } => self.patrol(destination, obs, cfg, &mut out),
                TankState::Pursue => Self::pursue(obs, &mut out),
                TankState::Flee { since } => Self::flee(since, obs, cfg, &mut out),
            };
            if let Some(next) = next {
                self.transition(next, obs, &mut out);
            }
        }

        out.commands.push(AgentCommand::Accelerate(thrust));
        out
    }

    fn patrol(
        &mut self,
        mut destination: Vec2,
        obs: &TankObservation,
        cfg: &AiConfig,
        out: &mut AgentStep<TankStateKind>,
    ) -> Option<TankStateKind> {
        if obs.target_in_range() {
            return Some(TankStateKind::Pursue);
        }
        if (destination - obs.position).length_squared() < cfg.patrol_epsilon {
            destination = self.route.next_waypoint();
            self.state = Some(TankState::Patrol { destination });
        }
        out.commands
            .push(AgentCommand::Face(bearing_to(destination - obs.position)));
        None
    }

    fn pursue(obs: &TankObservation, out: &mut AgentStep<TankStateKind>) -> Option<TankStateKind> {
        if obs.ammo == 0 {
            return Some(TankStateKind::Flee);
        }
        match obs.bearing_to_target() {
            Some(bearing) if obs.target_in_range() => {
                out.commands.push(AgentCommand::Face(bearing));
                out.commands.push(AgentCommand::Fire);
                None
            }
            _ => Some(TankStateKind::Patrol),
        }
    }

    fn flee(
        since: Seconds,
        obs: &TankObservation,
        cfg: &AiConfig,
        out: &mut AgentStep<TankStateKind>,
    ) -> Option<TankStateKind> {
        if obs.now - since > cfg.flee_reload_time {
            out.commands.push(AgentCommand::Reload);
            return Some(TankStateKind::Patrol);
        }
        if let Some(bearing) = obs.bearing_to_target() {
            out.commands
                .push(AgentCommand::Face(bearing + cfg.flee_angle));
        }
        None
    }

    fn transition(
        &mut self,
        next: TankStateKind,
        obs: &TankObservation,
        out: &mut AgentStep<TankStateKind>,
    ) {
        if let Some(current) = self.state {
            if current.kind() == next {
                return;
            }
            out.hooks.push(Hook::Exit(current.kind()));
        }
        out.hooks.push(Hook::Enter(next));
        self.state = Some(match next {
            TankStateKind::Patrol => {
                let destination = self.route.next_waypoint();
                out.commands
                    .push(AgentCommand::Face(bearing_to(destination - obs.position)));
                TankState::Patrol { destination }
            }
            TankStateKind::Pursue => TankState::Pursue,
            TankStateKind::Flee => TankState::Flee { since: obs.now },
        });
    }
}
